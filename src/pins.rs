//! GPIO / peripheral pin assignments for the Sprout adapter board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Relay outputs (active HIGH, external 5 V relay module)
// ---------------------------------------------------------------------------

/// Relay IN1: irrigation pump.
pub const PUMP_GPIO: i32 = 15;
/// Relay IN2: solenoid valve.
pub const VALVE_GPIO: i32 = 14;

// ---------------------------------------------------------------------------
// Status LED (on-board)
// ---------------------------------------------------------------------------

pub const STATUS_LED_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Sensors: analog (ADC1)
// ---------------------------------------------------------------------------

/// Capacitive soil-moisture probe. ADC1 channel 0 (GPIO 1 on ESP32-S3).
pub const MOISTURE_ADC_GPIO: i32 = 1;
/// ADC1 channel carrying the moisture probe.
pub const MOISTURE_ADC_CHANNEL: u32 = 0;
