//! Integration tests for the blocking start/stop sequences against the
//! shared output/delay trace.

use crate::mock_hw::{LogSink, Trace, rig};

use sprout::app::events::AppEvent;
use sprout::app::ports::{ClockPort, Output};
use sprout::config::SystemConfig;
use sprout::control::sequencer::ActuatorSequencer;
use sprout::fsm::StateId;

const PUMP_ON: Trace = Trace::Set { output: Output::Pump, high: true };
const PUMP_OFF: Trace = Trace::Set { output: Output::Pump, high: false };
const VALVE_ON: Trace = Trace::Set { output: Output::Valve, high: true };
const VALVE_OFF: Trace = Trace::Set { output: Output::Valve, high: false };

#[test]
fn double_start_runs_the_sequence_once() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    assert!(seq.start(&mut hw, &mut clock, &mut sink));
    assert!(!seq.start(&mut hw, &mut clock, &mut sink));

    assert_eq!(hw.trace(), vec![PUMP_ON, Trace::Delay(2000), VALVE_ON]);
    assert!(seq.is_irrigating());
}

#[test]
fn double_stop_runs_the_sequence_once() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());
    seq.start(&mut hw, &mut clock, &mut sink);
    hw.clear_trace();

    assert!(seq.stop(&mut hw, &mut clock, &mut sink).is_some());
    assert_eq!(seq.stop(&mut hw, &mut clock, &mut sink), None);

    assert_eq!(hw.trace(), vec![VALVE_OFF, Trace::Delay(1000), PUMP_OFF]);
    assert_eq!(seq.state(), StateId::Idle);
}

#[test]
fn stop_from_idle_touches_nothing() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    assert_eq!(seq.stop(&mut hw, &mut clock, &mut sink), None);
    assert!(hw.trace().is_empty());
    assert!(sink.events.is_empty());
}

#[test]
fn reported_duration_spans_valve_open_to_pump_off() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    seq.start(&mut hw, &mut clock, &mut sink);
    clock.advance(60_000);
    let run = seq.stop(&mut hw, &mut clock, &mut sink);

    assert_eq!(run, Some(61_000));
    assert!(sink.events.contains(&AppEvent::IrrigationCompleted {
        duration_ms: 61_000
    }));
}

#[test]
fn state_changes_are_reported_in_order() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    seq.start(&mut hw, &mut clock, &mut sink);
    seq.stop(&mut hw, &mut clock, &mut sink);

    let changes: Vec<(StateId, StateId)> = sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::StateChanged { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        changes,
        vec![
            (StateId::Idle, StateId::Pressurizing),
            (StateId::Pressurizing, StateId::Irrigating),
            (StateId::Irrigating, StateId::Depressurizing),
            (StateId::Depressurizing, StateId::Idle),
        ]
    );
}

#[test]
fn custom_delays_are_honoured() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let config = SystemConfig {
        pressurize_delay_ms: 3500,
        depressurize_delay_ms: 750,
        ..SystemConfig::default()
    };
    let mut seq = ActuatorSequencer::new(&config);

    seq.start(&mut hw, &mut clock, &mut sink);
    seq.stop(&mut hw, &mut clock, &mut sink);
    assert_eq!(clock.delays(), vec![3500, 750]);
}

#[test]
fn polled_sequence_matches_blocking_order() {
    let (mut hw, clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    seq.request_start();
    for t in (0..=2500).step_by(100) {
        seq.poll(t, &mut hw, &mut sink);
    }
    assert!(seq.is_irrigating());
    assert_eq!(seq.irrigation_started_ms(), Some(2000));

    seq.request_stop();
    for t in (2600..=4000).step_by(100) {
        seq.poll(t, &mut hw, &mut sink);
    }
    assert!(seq.is_idle());
    assert_eq!(hw.trace(), vec![PUMP_ON, VALVE_ON, VALVE_OFF, PUMP_OFF]);
    assert!(clock.delays().is_empty());
}

#[test]
fn stop_cancels_an_unpolled_start_request() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    seq.request_start();
    assert_eq!(seq.stop(&mut hw, &mut clock, &mut sink), None);

    for t in (0..=3000).step_by(500) {
        seq.poll(t, &mut hw, &mut sink);
    }
    assert!(seq.is_idle());
    assert!(hw.trace().is_empty(), "pump started after stop()");
}

#[test]
fn start_overrides_an_unpolled_stop_request() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());
    seq.start(&mut hw, &mut clock, &mut sink);
    hw.clear_trace();

    seq.request_stop();
    assert!(!seq.start(&mut hw, &mut clock, &mut sink));

    let now = clock.now_ms();
    for t in (now..=now + 3000).step_by(500) {
        seq.poll(t, &mut hw, &mut sink);
    }
    assert!(seq.is_irrigating());
    assert!(hw.trace().is_empty());
}

#[test]
fn blocking_stop_finishes_a_polled_pressurize() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut seq = ActuatorSequencer::new(&SystemConfig::default());

    seq.request_start();
    seq.poll(clock.now_ms(), &mut hw, &mut sink);
    assert_eq!(seq.state(), StateId::Pressurizing);

    assert_eq!(seq.stop(&mut hw, &mut clock, &mut sink), Some(0));
    assert!(seq.is_idle());
    assert_eq!(hw.trace(), vec![PUMP_ON, Trace::Delay(1000), PUMP_OFF]);
}
