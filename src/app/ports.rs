//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlLoop (domain)
//! ```
//!
//! Driven adapters (ADC, relay outputs, clock, log) implement these traits.
//! The [`ControlLoop`](super::service::ControlLoop) and the
//! [`ActuatorSequencer`](crate::control::sequencer::ActuatorSequencer)
//! consume them via generics, so the domain core never touches hardware
//! directly.

use crate::error::SensorError;

// ───────────────────────────────────────────────────────────────
// Analog input port (driven adapter: hardware → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the analog front end.
pub trait AnalogPort {
    /// One oneshot conversion on `channel`.
    ///
    /// An `Err` is a hardware fault; callers treat it as fatal and never
    /// retry.
    fn read_raw(&mut self, channel: u32) -> Result<u16, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Digital output port (driven adapter: domain → hardware)
// ───────────────────────────────────────────────────────────────

/// The three binary outputs on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Output {
    Pump,
    Valve,
    StatusLed,
}

/// Write-side port. Writes are fire-and-forget; there is no readback.
pub trait OutputPort {
    fn set_output(&mut self, output: Output, high: bool);

    /// Drive every output low.
    fn all_off(&mut self) {
        // Valve before pump, same order as a normal shutdown.
        self.set_output(Output::Valve, false);
        self.set_output(Output::Pump, false);
        self.set_output(Output::StatusLed, false);
    }
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source plus a blocking delay.
pub trait ClockPort {
    /// Milliseconds since boot (monotonic).
    fn now_ms(&self) -> u64;

    /// Block the calling task for `ms` milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port. Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}
