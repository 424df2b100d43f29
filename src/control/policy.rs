//! Rule-based irrigation policy with a hysteresis band.
//!
//! ```text
//!   0 ──── IRRIGATE ────┤ DRY ──── hold current state ──── WET ├──── WAIT ──── 100
//! ```
//!
//! Both thresholds use strict comparisons, so a reading exactly on DRY or
//! WET falls into the hold band. The band keeps a moisture value hovering
//! around a single threshold from cycling the pump and valve every tick.

use crate::config::SystemConfig;
use crate::sensors::SensorSnapshot;

/// Recommended run length when the soil is dry (minutes).
pub const DRY_DURATION_MIN: f32 = 5.0;
/// Recommended run length when continuing inside the band (minutes).
pub const HOLD_DURATION_MIN: f32 = 2.0;

pub const DRY_CONFIDENCE: f32 = 0.85;
pub const WET_CONFIDENCE: f32 = 0.90;
pub const HOLD_CONFIDENCE: f32 = 0.70;
pub const HOLD_URGENCY: f32 = 0.3;

/// Output of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IrrigationDecision {
    pub should_irrigate: bool,
    /// Advisory only; the sequencer does not enforce it.
    pub irrigation_duration: f32,
    /// 0.0 = no urgency, 1.0 = critical.
    pub urgency_score: f32,
    pub confidence: f32,
}

/// Which rule produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Dry,
    Hold,
    Wet,
}

pub struct IrrigationPolicy {
    dry_threshold: f32,
    wet_threshold: f32,
}

impl IrrigationPolicy {
    pub fn new(dry_threshold: f32, wet_threshold: f32) -> Self {
        Self {
            dry_threshold,
            wet_threshold,
        }
    }

    pub fn from_config(config: &SystemConfig) -> Self {
        Self::new(config.dry_threshold, config.wet_threshold)
    }

    pub fn band(&self, moisture: f32) -> Band {
        if moisture < self.dry_threshold {
            Band::Dry
        } else if moisture > self.wet_threshold {
            Band::Wet
        } else {
            Band::Hold
        }
    }

    /// Pure and deterministic: the only state consulted is the caller's
    /// `currently_irrigating` flag, and only inside the hold band.
    pub fn decide(&self, snapshot: &SensorSnapshot, currently_irrigating: bool) -> IrrigationDecision {
        let moisture = snapshot.soil_moisture;
        match self.band(moisture) {
            Band::Dry => IrrigationDecision {
                should_irrigate: true,
                irrigation_duration: DRY_DURATION_MIN,
                urgency_score: (self.dry_threshold - moisture) / self.dry_threshold,
                confidence: DRY_CONFIDENCE,
            },
            Band::Wet => IrrigationDecision {
                should_irrigate: false,
                irrigation_duration: 0.0,
                urgency_score: 0.0,
                confidence: WET_CONFIDENCE,
            },
            Band::Hold => IrrigationDecision {
                should_irrigate: currently_irrigating,
                irrigation_duration: if currently_irrigating {
                    HOLD_DURATION_MIN
                } else {
                    0.0
                },
                urgency_score: HOLD_URGENCY,
                confidence: HOLD_CONFIDENCE,
            },
        }
    }
}
