//! Mock hardware adapter and fake clock for integration tests.
//!
//! Both record into one shared trace, so tests can assert on the exact
//! interleaving of output writes and delays without touching real GPIO.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

use sprout::app::events::AppEvent;
use sprout::app::ports::{AnalogPort, ClockPort, EventSink, Output, OutputPort};
use sprout::error::SensorError;

// ── Trace record ──────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trace {
    Set { output: Output, high: bool },
    Delay(u32),
}

pub type SharedTrace = Rc<RefCell<Vec<Trace>>>;

/// Build a connected hardware mock and clock.
pub fn rig() -> (MockHardware, FakeClock) {
    let trace = SharedTrace::default();
    let now = Rc::new(Cell::new(0));
    (
        MockHardware {
            trace: Rc::clone(&trace),
            readings: VecDeque::new(),
            fallback: Ok(600),
        },
        FakeClock { trace, now },
    )
}

// ── MockHardware ──────────────────────────────────────────────

pub struct MockHardware {
    pub trace: SharedTrace,
    /// Raw ADC values served in order; `fallback` once exhausted.
    pub readings: VecDeque<Result<u16, SensorError>>,
    pub fallback: Result<u16, SensorError>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn queue_raw(&mut self, raw: u16) {
        self.readings.push_back(Ok(raw));
    }

    pub fn queue_fault(&mut self, rc: i32) {
        self.readings.push_back(Err(SensorError::AdcReadFailed(rc)));
    }

    pub fn trace(&self) -> Vec<Trace> {
        self.trace.borrow().clone()
    }

    pub fn clear_trace(&self) {
        self.trace.borrow_mut().clear();
    }

    /// Writes to `output`, in order.
    pub fn writes_to(&self, output: Output) -> Vec<bool> {
        self.trace
            .borrow()
            .iter()
            .filter_map(|t| match *t {
                Trace::Set { output: o, high } if o == output => Some(high),
                _ => None,
            })
            .collect()
    }

    /// Last level written to `output` (LOW if never written).
    pub fn level(&self, output: Output) -> bool {
        self.writes_to(output).last().copied().unwrap_or(false)
    }

    /// Trace without status-LED writes.
    pub fn actuator_trace(&self) -> Vec<Trace> {
        self.trace
            .borrow()
            .iter()
            .copied()
            .filter(|t| {
                !matches!(
                    t,
                    Trace::Set {
                        output: Output::StatusLed,
                        ..
                    }
                )
            })
            .collect()
    }
}

impl AnalogPort for MockHardware {
    fn read_raw(&mut self, _channel: u32) -> Result<u16, SensorError> {
        self.readings.pop_front().unwrap_or(self.fallback)
    }
}

impl OutputPort for MockHardware {
    fn set_output(&mut self, output: Output, high: bool) {
        self.trace.borrow_mut().push(Trace::Set { output, high });
    }
}

// ── FakeClock ─────────────────────────────────────────────────

/// Time only moves when something waits on it (or a test calls `advance`).
pub struct FakeClock {
    pub trace: SharedTrace,
    pub now: Rc<Cell<u64>>,
}

#[allow(dead_code)]
impl FakeClock {
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    pub fn delays(&self) -> Vec<u32> {
        self.trace
            .borrow()
            .iter()
            .filter_map(|t| match *t {
                Trace::Delay(ms) => Some(ms),
                Trace::Set { .. } => None,
            })
            .collect()
    }
}

impl ClockPort for FakeClock {
    fn now_ms(&self) -> u64 {
        self.now.get()
    }

    fn delay_ms(&mut self, ms: u32) {
        self.trace.borrow_mut().push(Trace::Delay(ms));
        self.advance(u64::from(ms));
    }
}

// ── Event sink ────────────────────────────────────────────────

#[derive(Default)]
pub struct LogSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cycle_lines(&self) -> Vec<String> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Cycle(s) => Some(s.to_string()),
                _ => None,
            })
            .collect()
    }
}

impl EventSink for LogSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
