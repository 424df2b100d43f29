//! System configuration parameters
//!
//! All tunable parameters for the Sprout irrigation controller. Defaults
//! match the bench-calibrated values of the reference board; every field
//! can be overridden at construction time so the policy and sequencer can
//! be exercised against arbitrary calibration.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemConfig {
    // --- Policy thresholds ---
    /// Moisture (%) strictly below which irrigation is requested
    pub dry_threshold: f32,
    /// Moisture (%) strictly above which irrigation is stopped
    pub wet_threshold: f32,

    // --- Moisture calibration ---
    /// Raw ADC reading with the probe in air (0 %)
    pub air_raw: u16,
    /// Raw ADC reading with the probe in water (100 %)
    pub water_raw: u16,

    // --- Sequencer timing ---
    /// Pump-on to valve-open delay (milliseconds)
    pub pressurize_delay_ms: u32,
    /// Valve-close to pump-off delay (milliseconds)
    pub depressurize_delay_ms: u32,

    // --- Control loop ---
    /// Sleep between control iterations (milliseconds)
    pub loop_period_ms: u32,

    // --- Boot diagnostics ---
    /// Pulse each relay and blink the status LED before entering the loop
    pub self_test_on_boot: bool,
    /// Relay pulse length during the self-test (milliseconds)
    pub self_test_pulse_ms: u32,
    /// Status LED blinks during the self-test
    pub led_test_blinks: u8,
    /// Half-period of a self-test LED blink (milliseconds)
    pub led_test_interval_ms: u32,
    /// Relay troubleshooting cycles to run at boot (0 = disabled)
    pub troubleshoot_cycles: u8,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Policy
            dry_threshold: 40.0,
            wet_threshold: 60.0,

            // Calibration
            air_raw: 800,
            water_raw: 375,

            // Sequencer
            pressurize_delay_ms: 2000,
            depressurize_delay_ms: 1000,

            // Loop
            loop_period_ms: 5000,

            // Diagnostics
            self_test_on_boot: true,
            self_test_pulse_ms: 2000,
            led_test_blinks: 5,
            led_test_interval_ms: 200,
            troubleshoot_cycles: 0,
        }
    }
}

impl SystemConfig {
    /// Reject parameter combinations the policy or the moisture mapping
    /// cannot work with. Values are never clamped silently.
    pub fn validate(&self) -> Result<()> {
        if self.dry_threshold.is_nan() || self.dry_threshold <= 0.0 {
            return Err(Error::Config("dry_threshold must be positive"));
        }
        if self.wet_threshold.is_nan() || self.dry_threshold >= self.wet_threshold {
            return Err(Error::Config("dry_threshold must be below wet_threshold"));
        }
        if self.wet_threshold > 100.0 {
            return Err(Error::Config("wet_threshold must not exceed 100"));
        }
        if self.air_raw <= self.water_raw {
            return Err(Error::Config("air_raw must be above water_raw"));
        }
        if self.loop_period_ms == 0 {
            return Err(Error::Config("loop_period_ms must be non-zero"));
        }
        Ok(())
    }
}
