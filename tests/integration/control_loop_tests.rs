//! Integration tests for the ControlLoop → policy → sequencer pipeline.
//!
//! Raw ADC values are fed through the mock hardware; every output write
//! and delay lands in the shared trace.

use crate::mock_hw::{LogSink, Trace, rig};

use sprout::app::events::AppEvent;
use sprout::app::ports::Output;
use sprout::app::service::{ControlLoop, CycleAction};
use sprout::config::SystemConfig;
use sprout::error::{Error, SensorError};
use sprout::fsm::StateId;

/// 20 % with default calibration.
const RAW_20: u16 = 715;
/// 80 % with default calibration.
const RAW_80: u16 = 460;
/// 50 % with default calibration.
const RAW_50: u16 = 587;

#[test]
fn dry_soil_starts_irrigating() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut cl = ControlLoop::new(&SystemConfig::default(), 0);
    hw.queue_raw(RAW_20);

    let report = cl.tick(&mut hw, &mut clock, &mut sink).unwrap();

    assert_eq!(report.snapshot.soil_moisture, 20.0);
    assert!(report.decision.should_irrigate);
    assert_eq!(report.decision.irrigation_duration, 5.0);
    assert!((report.decision.urgency_score - 0.5).abs() < f32::EPSILON);
    assert_eq!(report.decision.confidence, 0.85);
    assert_eq!(report.action, CycleAction::Started);
    assert_eq!(cl.sequencer().state(), StateId::Irrigating);
    assert!(hw.level(Output::Pump));
    assert!(hw.level(Output::Valve));
}

#[test]
fn wet_soil_stops_irrigating() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut cl = ControlLoop::new(&SystemConfig::default(), 0);
    hw.queue_raw(RAW_20);
    hw.queue_raw(RAW_80);

    cl.tick(&mut hw, &mut clock, &mut sink).unwrap();
    clock.advance(5000);
    let report = cl.tick(&mut hw, &mut clock, &mut sink).unwrap();

    assert!(!report.decision.should_irrigate);
    assert_eq!(report.decision.confidence, 0.90);
    assert!(matches!(report.action, CycleAction::Stopped { .. }));
    assert_eq!(cl.sequencer().state(), StateId::Idle);
    assert!(!hw.level(Output::Pump));
    assert!(!hw.level(Output::Valve));
}

#[test]
fn hysteresis_keeps_running_through_the_band() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut cl = ControlLoop::new(&SystemConfig::default(), 0);
    for raw in [RAW_20, RAW_50, RAW_50, RAW_80, RAW_50] {
        hw.queue_raw(raw);
    }

    let actions: Vec<CycleAction> = (0..5)
        .map(|_| cl.tick(&mut hw, &mut clock, &mut sink).unwrap().action)
        .collect();

    assert_eq!(actions[0], CycleAction::Started);
    assert_eq!(actions[1], CycleAction::None);
    assert_eq!(actions[2], CycleAction::None);
    assert!(matches!(actions[3], CycleAction::Stopped { .. }));
    assert_eq!(actions[4], CycleAction::None, "band does not restart from idle");
    assert_eq!(hw.writes_to(Output::Pump), vec![true, false]);
}

#[test]
fn summary_line_follows_actuation() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut cl = ControlLoop::new(&SystemConfig::default(), 0);
    hw.queue_raw(RAW_20);

    cl.tick(&mut hw, &mut clock, &mut sink).unwrap();

    assert_eq!(
        sink.cycle_lines(),
        vec!["Moisture: 20.0% | Decision: IRRIGATE | Confidence: 0.85".to_string()]
    );
    let cycle_at = sink
        .events
        .iter()
        .position(|e| matches!(e, AppEvent::Cycle(_)))
        .unwrap();
    let started_at = sink
        .events
        .iter()
        .position(|e| *e == AppEvent::IrrigationStarted)
        .unwrap();
    assert!(started_at < cycle_at);
}

#[test]
fn status_led_follows_indicator_pattern() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut cl = ControlLoop::new(&SystemConfig::default(), 0);

    // Idle heartbeat: counter 1..=3 → high, low, low
    for _ in 0..3 {
        cl.tick(&mut hw, &mut clock, &mut sink).unwrap();
    }
    assert_eq!(hw.writes_to(Output::StatusLed), vec![true, false, false]);

    // Irrigating: toggle per tick
    hw.clear_trace();
    hw.queue_raw(RAW_20);
    hw.queue_raw(RAW_50);
    cl.tick(&mut hw, &mut clock, &mut sink).unwrap();
    cl.tick(&mut hw, &mut clock, &mut sink).unwrap();
    assert_eq!(hw.writes_to(Output::StatusLed), vec![true, false]);
}

#[test]
fn sensor_fault_halts_run_with_outputs_untouched() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    let mut cl = ControlLoop::new(&SystemConfig::default(), 0);
    hw.queue_raw(RAW_50);
    hw.queue_raw(RAW_50);
    hw.queue_fault(-1);

    let err = cl.run(&mut hw, &mut clock, &mut sink).unwrap_err();

    assert_eq!(err, Error::Sensor(SensorError::AdcReadFailed(-1)));
    assert_eq!(cl.cycle_count(), 3);
    assert_eq!(clock.delays(), vec![5000, 5000]);
    assert!(hw.actuator_trace().iter().all(|t| matches!(t, Trace::Delay(_))));
    assert_eq!(
        sink.events.first(),
        Some(&AppEvent::Started { loop_period_ms: 5000 })
    );
}

#[test]
fn boot_offset_sets_time_of_day() {
    let (mut hw, mut clock) = rig();
    let mut sink = LogSink::new();
    clock.advance(10 * 3_600_000);
    let mut cl = ControlLoop::new(&SystemConfig::default(), 3_600_000);

    let report = cl.tick(&mut hw, &mut clock, &mut sink).unwrap();
    assert_eq!(report.snapshot.time_of_day, 9.0);
}
