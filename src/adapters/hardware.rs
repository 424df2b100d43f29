//! Hardware adapter. Bridges the ADC and GPIO drivers to domain port traits.
//!
//! Exposes the oneshot ADC through [`AnalogPort`] and the relay/LED pins
//! through [`OutputPort`]. This is the only module in the system that
//! touches actual hardware. On non-espidf targets, [`hw_init`] routes
//! every call to its simulation stubs.

use crate::app::ports::{AnalogPort, Output, OutputPort};
use crate::drivers::hw_init;
use crate::error::SensorError;
use crate::pins;

/// Concrete adapter over the board's ADC and GPIO outputs.
#[derive(Debug, Default)]
pub struct HardwareAdapter {
    /// Levels last written, indexed by [`Output`].
    levels: [bool; 3],
}

impl HardwareAdapter {
    /// Call after [`hw_init::init_peripherals`]; assumes every output is LOW.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pin_for(output: Output) -> i32 {
        match output {
            Output::Pump => pins::PUMP_GPIO,
            Output::Valve => pins::VALVE_GPIO,
            Output::StatusLed => pins::STATUS_LED_GPIO,
        }
    }

    /// Level last commanded on `output` (no hardware readback).
    pub fn level(&self, output: Output) -> bool {
        self.levels[output as usize]
    }
}

// ── AnalogPort implementation ─────────────────────────────────

impl AnalogPort for HardwareAdapter {
    fn read_raw(&mut self, channel: u32) -> Result<u16, SensorError> {
        hw_init::adc1_read(channel)
    }
}

// ── OutputPort implementation ─────────────────────────────────

impl OutputPort for HardwareAdapter {
    fn set_output(&mut self, output: Output, high: bool) {
        hw_init::gpio_write(Self::pin_for(output), high);
        self.levels[output as usize] = high;
    }
}
