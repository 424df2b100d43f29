//! Sensor subsystem: the moisture probe driver and the [`SnapshotBuilder`].
//!
//! The builder owns every sensor driver and produces a [`SensorSnapshot`]
//! each control iteration. Only soil moisture is measured today; the other
//! fields are fixed placeholders kept so a richer policy can consume them
//! without changing the snapshot's shape.

pub mod moisture;

use log::debug;

use crate::app::ports::AnalogPort;
use crate::config::SystemConfig;
use crate::error::SensorError;
use crate::pins;
use moisture::{Calibration, MoistureSensor};

/// Soil temperature until a probe is fitted (°C).
pub const PLACEHOLDER_SOIL_TEMPERATURE_C: f32 = 25.0;
/// Air humidity until a sensor is fitted (%).
pub const PLACEHOLDER_AIR_HUMIDITY: f32 = 60.0;
/// Days since rain until weather data is available.
pub const PLACEHOLDER_DAYS_SINCE_RAIN: f32 = 2.0;

// ---------------------------------------------------------------------------
// Sensor snapshot
// ---------------------------------------------------------------------------

/// A point-in-time record of every input the irrigation policy consumes.
/// Built fresh each iteration and never mutated afterwards.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SensorSnapshot {
    /// Soil moisture (%), 0–100.
    pub soil_moisture: f32,
    /// Soil temperature (°C).
    pub soil_temperature: f32,
    /// Air relative humidity (%).
    pub air_humidity: f32,
    /// Hour of day, 0–23, derived from uptime.
    pub time_of_day: f32,
    pub days_since_rain: f32,
    /// 0.0 while irrigating, otherwise a nominal 1.0.
    pub last_irrigation_hours: f32,
}

impl SensorSnapshot {
    /// Assemble a snapshot from a moisture reading and loop timing.
    pub fn from_reading(moisture_percent: u8, elapsed_ms: u64, currently_irrigating: bool) -> Self {
        let hours_since_boot = elapsed_ms / 1000 / 3600;
        Self {
            soil_moisture: f32::from(moisture_percent.min(100)),
            soil_temperature: PLACEHOLDER_SOIL_TEMPERATURE_C,
            air_humidity: PLACEHOLDER_AIR_HUMIDITY,
            time_of_day: (hours_since_boot % 24) as f32,
            days_since_rain: PLACEHOLDER_DAYS_SINCE_RAIN,
            last_irrigation_hours: if currently_irrigating { 0.0 } else { 1.0 },
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshot builder
// ---------------------------------------------------------------------------

/// Owns the sensor drivers and produces a unified snapshot.
pub struct SnapshotBuilder {
    pub moisture: MoistureSensor,
}

impl SnapshotBuilder {
    pub fn new(moisture: MoistureSensor) -> Self {
        Self { moisture }
    }

    /// Builder wired to the board's moisture channel with the configured
    /// calibration.
    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(MoistureSensor::new(
            pins::MOISTURE_ADC_CHANNEL,
            Calibration::from_config(config),
        ))
    }

    /// Read every sensor and return a snapshot.
    ///
    /// A moisture read failure is returned unchanged; the caller decides
    /// it is fatal.
    pub fn build(
        &mut self,
        adc: &mut impl AnalogPort,
        currently_irrigating: bool,
        elapsed_ms: u64,
    ) -> Result<SensorSnapshot, SensorError> {
        let moisture = self.moisture.read(adc)?;
        if let Some(raw) = self.moisture.last_raw() {
            debug!("moisture raw={} -> {}%", raw, moisture);
        }
        Ok(SensorSnapshot::from_reading(
            moisture,
            elapsed_ms,
            currently_irrigating,
        ))
    }
}
