//! Context threaded through every sequencer state handler.
//!
//! `SequencerContext` holds the caller's latched target, the clock reading
//! for the current tick, the settling delays, and the output commands the
//! handlers write. It is the only place the actuator state lives.

use crate::config::SystemConfig;

// ---------------------------------------------------------------------------
// Actuator commands (written by state handlers; applied by the sequencer)
// ---------------------------------------------------------------------------

/// Desired relay levels after the current tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ActuatorCommands {
    pub pump: bool,
    pub valve: bool,
}

impl ActuatorCommands {
    /// Pump and valve off.
    pub fn all_off() -> Self {
        Self::default()
    }
}

// ---------------------------------------------------------------------------
// SequencerContext
// ---------------------------------------------------------------------------

pub struct SequencerContext {
    // -- Timing --
    /// Clock reading for the tick being processed (ms since boot).
    pub now_ms: u64,
    /// When the current state was entered.
    pub state_entered_ms: u64,
    pub pressurize_delay_ms: u32,
    pub depressurize_delay_ms: u32,

    // -- Request --
    /// Latched target: `true` = water should flow.
    pub want_irrigation: bool,

    // -- Outputs --
    pub commands: ActuatorCommands,

    // -- Run bookkeeping --
    /// Set when the valve opened; cleared when the pump stops.
    pub irrigation_started_ms: Option<u64>,
    /// Length of the last completed run (valve open → pump off). Taken by
    /// the sequencer once reported.
    pub completed_run_ms: Option<u64>,
}

impl SequencerContext {
    pub fn new(config: &SystemConfig) -> Self {
        Self {
            now_ms: 0,
            state_entered_ms: 0,
            pressurize_delay_ms: config.pressurize_delay_ms,
            depressurize_delay_ms: config.depressurize_delay_ms,
            want_irrigation: false,
            commands: ActuatorCommands::all_off(),
            irrigation_started_ms: None,
            completed_run_ms: None,
        }
    }

    /// Milliseconds spent in the current state.
    pub fn ms_in_state(&self) -> u64 {
        self.now_ms.saturating_sub(self.state_entered_ms)
    }

    /// Milliseconds left before a `delay_ms` wait completes (0 once elapsed).
    pub fn remaining_ms(&self, delay_ms: u32) -> u32 {
        u64::from(delay_ms).saturating_sub(self.ms_in_state()) as u32
    }
}
