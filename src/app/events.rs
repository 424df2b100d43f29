//! Outbound application events.
//!
//! The [`ControlLoop`](super::service::ControlLoop) and the actuator
//! sequencer emit these through the [`EventSink`](super::ports::EventSink)
//! port. Adapters on the other side decide what to do with them.

use core::fmt;

use crate::fsm::StateId;

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// The control loop has started.
    Started { loop_period_ms: u32 },

    /// One control iteration finished its decision.
    Cycle(CycleSummary),

    /// The actuator sequencer moved between phases.
    StateChanged { from: StateId, to: StateId },

    /// Valve is open and water is flowing.
    IrrigationStarted,

    /// Pump is off after an irrigation run.
    IrrigationCompleted { duration_ms: u64 },
}

/// The per-iteration status line.
///
/// Rendered as `Moisture: <float>% | Decision: IRRIGATE|WAIT | Confidence: <float>`.
/// The format is the only outward-facing protocol of the firmware, so black-box
/// tests parse it; keep it stable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleSummary {
    pub moisture: f32,
    pub should_irrigate: bool,
    pub confidence: f32,
}

impl CycleSummary {
    /// Render into a fixed-capacity buffer (no heap on the log path).
    pub fn to_line(&self) -> heapless::String<64> {
        use core::fmt::Write;
        let mut line = heapless::String::new();
        // Moisture is 0–100 and confidence 0–1, so the longest line is 56 bytes.
        let written = write!(line, "{self}");
        debug_assert!(written.is_ok(), "cycle summary exceeds line buffer");
        line
    }
}

impl fmt::Display for CycleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Moisture: {:.1}% | Decision: {} | Confidence: {:.2}",
            self.moisture,
            if self.should_irrigate { "IRRIGATE" } else { "WAIT" },
            self.confidence
        )
    }
}
