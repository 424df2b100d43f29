//! Control loop, the hexagonal core.
//!
//! [`ControlLoop`] owns the snapshot builder, the policy, the actuator
//! sequencer and the status indicator. All I/O flows through port traits
//! injected at call sites, making the whole loop testable with mock
//! adapters.
//!
//! ```text
//!  AnalogPort ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                 │         ControlLoop          │
//!  OutputPort ◀── │ Snapshot · Policy · Sequencer│ ◀── ClockPort
//!                 └──────────────────────────────┘
//! ```

use log::{error, info};

use crate::config::SystemConfig;
use crate::control::policy::{IrrigationDecision, IrrigationPolicy};
use crate::control::sequencer::ActuatorSequencer;
use crate::drivers::led_patterns::StatusIndicator;
use crate::error::Result;
use crate::sensors::{SensorSnapshot, SnapshotBuilder};

use super::events::{AppEvent, CycleSummary};
use super::ports::{AnalogPort, ClockPort, EventSink, Output, OutputPort};

/// What an iteration did to the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleAction {
    None,
    Started,
    Stopped { duration_ms: u64 },
}

/// Outcome of one [`ControlLoop::tick`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    pub snapshot: SensorSnapshot,
    pub decision: IrrigationDecision,
    pub action: CycleAction,
}

// ───────────────────────────────────────────────────────────────
// ControlLoop
// ───────────────────────────────────────────────────────────────

pub struct ControlLoop {
    snapshots: SnapshotBuilder,
    policy: IrrigationPolicy,
    sequencer: ActuatorSequencer,
    indicator: StatusIndicator,
    loop_period_ms: u32,
    /// Clock reading taken at boot; snapshot time-of-day is relative to it.
    boot_ms: u64,
    cycle_count: u64,
}

impl ControlLoop {
    pub fn new(config: &SystemConfig, boot_ms: u64) -> Self {
        Self {
            snapshots: SnapshotBuilder::from_config(config),
            policy: IrrigationPolicy::from_config(config),
            sequencer: ActuatorSequencer::new(config),
            indicator: StatusIndicator::new(),
            loop_period_ms: config.loop_period_ms,
            boot_ms,
            cycle_count: 0,
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn is_irrigating(&self) -> bool {
        self.sequencer.is_irrigating()
    }

    pub fn sequencer(&self) -> &ActuatorSequencer {
        &self.sequencer
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    // ── Lifecycle ─────────────────────────────────────────────

    pub fn start(&mut self, sink: &mut impl EventSink) {
        sink.emit(&AppEvent::Started {
            loop_period_ms: self.loop_period_ms,
        });
        info!("Control loop started, period {} ms", self.loop_period_ms);
    }

    /// One iteration: snapshot → decide → start/stop → indicator → summary.
    ///
    /// A sensor fault aborts the iteration before any actuator is touched
    /// and is returned to the caller.
    pub fn tick<H: AnalogPort + OutputPort>(
        &mut self,
        hw: &mut H,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<CycleReport> {
        self.cycle_count += 1;
        let irrigating = self.sequencer.is_irrigating();
        let elapsed_ms = clock.now_ms().saturating_sub(self.boot_ms);

        let snapshot = self
            .snapshots
            .build(hw, irrigating, elapsed_ms)
            .inspect_err(|e| error!("Moisture read failed on cycle {}: {}", self.cycle_count, e))?;
        let decision = self.policy.decide(&snapshot, irrigating);

        let action = match (decision.should_irrigate, irrigating) {
            (true, false) => {
                self.sequencer.start(hw, clock, sink);
                CycleAction::Started
            }
            (false, true) => {
                let duration_ms = self.sequencer.stop(hw, clock, sink).unwrap_or(0);
                CycleAction::Stopped { duration_ms }
            }
            _ => CycleAction::None,
        };

        let led = self.indicator.tick(self.sequencer.is_irrigating());
        hw.set_output(Output::StatusLed, led);

        sink.emit(&AppEvent::Cycle(CycleSummary {
            moisture: snapshot.soil_moisture,
            should_irrigate: decision.should_irrigate,
            confidence: decision.confidence,
        }));

        Ok(CycleReport {
            snapshot,
            decision,
            action,
        })
    }

    /// Iterate forever with `loop_period_ms` between iterations.
    ///
    /// Only returns on a sensor fault.
    pub fn run<H: AnalogPort + OutputPort>(
        &mut self,
        hw: &mut H,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) -> Result<()> {
        self.start(sink);
        loop {
            self.tick(hw, clock, sink)?;
            clock.delay_ms(self.loop_period_ms);
        }
    }
}
