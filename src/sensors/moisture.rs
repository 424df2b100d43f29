//! Capacitive soil-moisture probe driver.
//!
//! Reads one raw sample through the [`AnalogPort`] and applies a two-point
//! linear calibration: the raw value in air maps to 0 %, the raw value in
//! water maps to 100 %. Capacitive probes read *lower* when wet, so the
//! mapping is inverted.

use crate::app::ports::AnalogPort;
use crate::config::SystemConfig;
use crate::error::SensorError;

/// Two-point calibration for the probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calibration {
    /// Raw reading with the probe in air (0 %).
    pub air_raw: u16,
    /// Raw reading with the probe fully submerged (100 %).
    pub water_raw: u16,
}

impl Default for Calibration {
    fn default() -> Self {
        Self {
            air_raw: 800,
            water_raw: 375,
        }
    }
}

impl Calibration {
    pub fn from_config(config: &SystemConfig) -> Self {
        Self {
            air_raw: config.air_raw,
            water_raw: config.water_raw,
        }
    }

    /// `(air - raw) * 100 / (air - water)`, truncated, clamped to 0–100.
    pub fn to_percent(&self, raw: u16) -> u8 {
        let air = i32::from(self.air_raw);
        let span = air - i32::from(self.water_raw);
        if span <= 0 {
            return 0;
        }
        let percent = (air - i32::from(raw)) * 100 / span;
        percent.clamp(0, 100) as u8
    }
}

pub struct MoistureSensor {
    cal: Calibration,
    channel: u32,
    last_raw: Option<u16>,
}

impl MoistureSensor {
    pub fn new(channel: u32, cal: Calibration) -> Self {
        Self {
            cal,
            channel,
            last_raw: None,
        }
    }

    /// Take one sample and convert it to a moisture percentage.
    pub fn read(&mut self, adc: &mut impl AnalogPort) -> Result<u8, SensorError> {
        let raw = adc.read_raw(self.channel)?;
        self.last_raw = Some(raw);
        Ok(self.cal.to_percent(raw))
    }

    /// Raw value of the most recent successful read.
    pub fn last_raw(&self) -> Option<u16> {
        self.last_raw
    }
}
