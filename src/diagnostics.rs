//! Boot-time hardware diagnostics.
//!
//! - [`self_test`] pulses each relay and blinks the status LED so an
//!   installer can confirm wiring by ear and eye before the control loop
//!   takes over.
//! - [`relay_troubleshoot`] prints the relay wiring checklist and runs slow
//!   observable relay cycles for diagnosing an under-powered relay board.
//! - [`install_panic_handler`] drops both relays if the firmware panics.
//!
//! Every routine starts and ends with all outputs OFF, and the valve is
//! never driven while the pump is on.

use log::{error, info, warn};

use crate::app::ports::{ClockPort, Output, OutputPort};
use crate::config::SystemConfig;
use crate::pins;

/// Relay on-time per troubleshooting cycle (ms).
pub const TROUBLESHOOT_ON_MS: u32 = 5000;
/// Relay off-time after each troubleshooting pulse (ms).
pub const TROUBLESHOOT_OFF_MS: u32 = 2000;
pub const TROUBLESHOOT_LED_MS: u32 = 200;
/// Pause between troubleshooting cycles (ms).
pub const TROUBLESHOOT_PAUSE_MS: u32 = 3000;

/// What a diagnostics routine did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfTestReport {
    pub pump_pulses: u16,
    pub valve_pulses: u16,
    pub led_blinks: u16,
    /// Time spent waiting on the clock.
    pub elapsed_ms: u64,
}

impl SelfTestReport {
    pub fn steps(&self) -> u32 {
        u32::from(self.pump_pulses) + u32::from(self.valve_pulses) + u32::from(self.led_blinks)
    }
}

/// Drives outputs and keeps the tally.
struct Runner<'a, O, C> {
    outputs: &'a mut O,
    clock: &'a mut C,
    report: SelfTestReport,
}

impl<O: OutputPort, C: ClockPort> Runner<'_, O, C> {
    fn wait(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
        self.report.elapsed_ms += u64::from(ms);
    }

    /// High for `on_ms`, then low for `off_ms`.
    fn pulse(&mut self, output: Output, on_ms: u32, off_ms: u32) {
        self.outputs.set_output(output, true);
        self.wait(on_ms);
        self.outputs.set_output(output, false);
        if off_ms > 0 {
            self.wait(off_ms);
        }
        match output {
            Output::Pump => self.report.pump_pulses += 1,
            Output::Valve => self.report.valve_pulses += 1,
            Output::StatusLed => self.report.led_blinks += 1,
        }
    }
}

/// Pulse the pump, then the valve, then blink the LED.
pub fn self_test(
    outputs: &mut impl OutputPort,
    clock: &mut impl ClockPort,
    cfg: &SystemConfig,
) -> SelfTestReport {
    outputs.all_off();
    let mut run = Runner {
        outputs: &mut *outputs,
        clock: &mut *clock,
        report: SelfTestReport::default(),
    };

    info!("SELFTEST | pump relay (GPIO{})...", pins::PUMP_GPIO);
    run.pulse(Output::Pump, cfg.self_test_pulse_ms, 0);
    info!("SELFTEST | pump relay done");

    info!("SELFTEST | valve relay (GPIO{})...", pins::VALVE_GPIO);
    run.pulse(Output::Valve, cfg.self_test_pulse_ms, 0);
    info!("SELFTEST | valve relay done");

    info!("SELFTEST | status LED (GPIO{})...", pins::STATUS_LED_GPIO);
    for _ in 0..cfg.led_test_blinks {
        run.pulse(Output::StatusLed, cfg.led_test_interval_ms, cfg.led_test_interval_ms);
    }
    info!("SELFTEST | LED done");

    let report = run.report;
    outputs.all_off();
    info!(
        "SELFTEST | complete: {} steps in {} ms",
        report.steps(),
        report.elapsed_ms
    );
    report
}

/// Log the wiring checklist and cycle each relay slowly `cycles` times.
pub fn relay_troubleshoot(
    outputs: &mut impl OutputPort,
    clock: &mut impl ClockPort,
    cycles: u8,
) -> SelfTestReport {
    outputs.all_off();

    warn!("SELFTEST | relay troubleshooting mode");
    info!("SELFTEST | relay boards draw more current than the ESP32-S3 3.3 V rail can supply");
    info!("SELFTEST | power relay VCC from an external 5 V supply or a USB wall adapter");
    info!("SELFTEST | wiring: VCC -> 5V (external PSU)");
    info!("SELFTEST | wiring: GND -> GND (shared with ESP32-S3)");
    info!("SELFTEST | wiring: IN1 -> GPIO{} (PUMP)", pins::PUMP_GPIO);
    info!("SELFTEST | wiring: IN2 -> GPIO{} (VALVE)", pins::VALVE_GPIO);

    let mut run = Runner {
        outputs: &mut *outputs,
        clock: &mut *clock,
        report: SelfTestReport::default(),
    };

    for cycle in 1..=cycles {
        info!("SELFTEST | === cycle {}/{} ===", cycle, cycles);
        if let Some(free) = free_heap_bytes() {
            info!("SELFTEST | free heap: {} bytes", free);
        }

        // One relay at a time keeps the coil current down.
        info!("SELFTEST | PUMP relay HIGH - check relay LED and listen for click");
        run.pulse(Output::Pump, TROUBLESHOOT_ON_MS, TROUBLESHOOT_OFF_MS);
        info!("SELFTEST | VALVE relay HIGH - check relay LED and listen for click");
        run.pulse(Output::Valve, TROUBLESHOOT_ON_MS, TROUBLESHOOT_OFF_MS);
        run.pulse(Output::StatusLed, TROUBLESHOOT_LED_MS, TROUBLESHOOT_PAUSE_MS);
    }

    let report = run.report;
    outputs.all_off();
    info!("SELFTEST | troubleshooting finished after {} cycles", cycles);
    report
}

#[cfg(target_os = "espidf")]
fn free_heap_bytes() -> Option<u32> {
    // SAFETY: read-only heap statistics query.
    Some(unsafe { esp_idf_svc::sys::esp_get_free_heap_size() })
}

#[cfg(not(target_os = "espidf"))]
fn free_heap_bytes() -> Option<u32> {
    None
}

// ───────────────────────────────────────────────────────────────
// Panic handler: relays off before reset
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that drives the valve and pump LOW.
///
/// Call once during init, after [`init_peripherals`](crate::drivers::hw_init::init_peripherals).
pub fn install_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        crate::drivers::hw_init::gpio_write(pins::VALVE_GPIO, false);
        crate::drivers::hw_init::gpio_write(pins::PUMP_GPIO, false);
        error!("PANIC: {} (relays forced off)", reason);
    }));
}
