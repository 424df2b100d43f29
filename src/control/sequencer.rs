//! Pump/valve actuator sequencer.
//!
//! Sole owner and writer of the pump and valve outputs. Wraps the table
//! driven [`Fsm`] with two ways of driving it:
//!
//! - **Non-blocking:** latch a target with [`request_start`] /
//!   [`request_stop`] and call [`poll`] from any timer or event source.
//!   A stop latched while the line is still pressurizing is observed on
//!   the next poll and routed through the depressurize wait.
//! - **Blocking:** [`start`] / [`stop`] latch the target and drive the
//!   machine to a settled state, sleeping on the [`ClockPort`] for the
//!   settling delays. Both are no-ops when already in the target state.
//!
//! Output writes are diffed against what was last applied and ordered so
//! a valve close always precedes a pump stop and a pump start always
//! precedes a valve open.
//!
//! [`request_start`]: ActuatorSequencer::request_start
//! [`request_stop`]: ActuatorSequencer::request_stop
//! [`poll`]: ActuatorSequencer::poll
//! [`start`]: ActuatorSequencer::start
//! [`stop`]: ActuatorSequencer::stop

use log::debug;

use crate::app::events::AppEvent;
use crate::app::ports::{ClockPort, EventSink, Output, OutputPort};
use crate::config::SystemConfig;
use crate::fsm::context::{ActuatorCommands, SequencerContext};
use crate::fsm::states::build_state_table;
use crate::fsm::{Fsm, StateId};

pub struct ActuatorSequencer {
    fsm: Fsm,
    ctx: SequencerContext,
    /// Levels last written to the hardware.
    applied: ActuatorCommands,
    last_run_ms: Option<u64>,
}

impl ActuatorSequencer {
    /// Build the sequencer in `Idle`. Assumes the outputs are already low
    /// (hardware init and the boot self-test both leave them that way).
    pub fn new(config: &SystemConfig) -> Self {
        let mut ctx = SequencerContext::new(config);
        let mut fsm = Fsm::new(build_state_table(), StateId::Idle);
        fsm.start(&mut ctx);
        Self {
            fsm,
            ctx,
            applied: ActuatorCommands::all_off(),
            last_run_ms: None,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> StateId {
        self.fsm.current_state()
    }

    /// `true` only once the valve is open.
    pub fn is_irrigating(&self) -> bool {
        self.state() == StateId::Irrigating
    }

    pub fn is_idle(&self) -> bool {
        self.state() == StateId::Idle
    }

    /// No phase is pending: idle with no start latched, or irrigating with
    /// no stop latched.
    pub fn is_settled(&self) -> bool {
        match self.state() {
            StateId::Idle => !self.ctx.want_irrigation,
            StateId::Irrigating => self.ctx.want_irrigation,
            StateId::Pressurizing | StateId::Depressurizing => false,
        }
    }

    /// Timestamp at which the valve opened for the current run.
    pub fn irrigation_started_ms(&self) -> Option<u64> {
        self.ctx.irrigation_started_ms
    }

    /// Time until the pending settling delay ends (0 when none is pending).
    pub fn remaining_ms(&self) -> u32 {
        match self.state() {
            StateId::Pressurizing => self.ctx.remaining_ms(self.ctx.pressurize_delay_ms),
            StateId::Depressurizing => self.ctx.remaining_ms(self.ctx.depressurize_delay_ms),
            StateId::Idle | StateId::Irrigating => 0,
        }
    }

    // ── Non-blocking interface ────────────────────────────────

    pub fn request_start(&mut self) {
        self.ctx.want_irrigation = true;
    }

    pub fn request_stop(&mut self) {
        self.ctx.want_irrigation = false;
    }

    /// Advance the machine at time `now_ms` and write any output changes.
    pub fn poll(
        &mut self,
        now_ms: u64,
        hw: &mut impl OutputPort,
        sink: &mut impl EventSink,
    ) -> Option<(StateId, StateId)> {
        self.ctx.now_ms = now_ms;
        let transition = self.fsm.tick(&mut self.ctx);
        self.apply_outputs(hw);

        if let Some((from, to)) = transition {
            sink.emit(&AppEvent::StateChanged { from, to });
            if to == StateId::Irrigating {
                sink.emit(&AppEvent::IrrigationStarted);
            }
            if let Some(run_ms) = self.ctx.completed_run_ms.take() {
                self.last_run_ms = Some(run_ms);
                sink.emit(&AppEvent::IrrigationCompleted {
                    duration_ms: run_ms,
                });
            }
        }
        transition
    }

    // ── Blocking interface ────────────────────────────────────

    /// Pump on, wait for pressure, valve open. Returns `false` without
    /// touching any output when already irrigating.
    ///
    /// Overrides any stop latched through [`request_stop`](Self::request_stop).
    pub fn start(
        &mut self,
        hw: &mut impl OutputPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> bool {
        self.request_start();
        if self.is_settled() {
            debug!("start ignored: already irrigating");
            return false;
        }
        self.settle(hw, clock, sink);
        true
    }

    /// Valve closed, wait for pressure to settle, pump off.
    ///
    /// Returns the length of the run (valve open → pump off), or `None`
    /// without touching any output when already idle. A start latched
    /// through [`request_start`](Self::request_start) but not yet polled is
    /// cancelled.
    pub fn stop(
        &mut self,
        hw: &mut impl OutputPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Option<u64> {
        self.request_stop();
        if self.is_settled() {
            debug!("stop ignored: already idle");
            return None;
        }
        self.last_run_ms = None;
        self.settle(hw, clock, sink);
        Some(self.last_run_ms.take().unwrap_or(0))
    }

    // ── Internal ──────────────────────────────────────────────

    fn settle(
        &mut self,
        hw: &mut impl OutputPort,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        loop {
            self.poll(clock.now_ms(), hw, sink);
            if self.is_settled() {
                return;
            }
            let wait = self.remaining_ms();
            if wait > 0 {
                clock.delay_ms(wait);
            }
        }
    }

    fn apply_outputs(&mut self, hw: &mut impl OutputPort) {
        let want = self.ctx.commands;
        let have = self.applied;

        if have.valve && !want.valve {
            hw.set_output(Output::Valve, false);
        }
        if have.pump != want.pump {
            hw.set_output(Output::Pump, want.pump);
        }
        if !have.valve && want.valve {
            hw.set_output(Output::Valve, true);
        }
        self.applied = want;
    }
}
