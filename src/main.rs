//! Sprout Firmware: Main Entry Point
//!
//! Hexagonal architecture with a single blocking control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        LogEventSink       Esp32TimeAdapter    │
//! │  (Analog+Output)        (EventSink)        (ClockPort)         │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │              ControlLoop (pure logic)                  │    │
//! │  │  Snapshot · Policy · Sequencer FSM · Indicator         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::{error, info};

use sprout::adapters::hardware::HardwareAdapter;
use sprout::adapters::log_sink::LogEventSink;
use sprout::adapters::time::Esp32TimeAdapter;
use sprout::app::service::ControlLoop;
use sprout::config::SystemConfig;
use sprout::{diagnostics, drivers};

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  Sprout v{}                       ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Initialise hardware peripherals ────────────────────
    if let Err(e) = drivers::hw_init::init_peripherals() {
        error!("HAL init failed: {}", e);
        return Err(e.into());
    }
    diagnostics::install_panic_handler();

    // ── 3. Configuration ──────────────────────────────────────
    let config = SystemConfig::default();
    if let Err(e) = config.validate() {
        error!("Invalid config: {}", e);
        return Err(e.into());
    }
    info!(
        "Thresholds: dry<{:.0}% wet>{:.0}% | calibration air={} water={}",
        config.dry_threshold, config.wet_threshold, config.air_raw, config.water_raw
    );

    // ── 4. Construct adapters ─────────────────────────────────
    let mut hw = HardwareAdapter::new();
    let mut clock = Esp32TimeAdapter::new();
    let mut log_sink = LogEventSink::new();

    // ── 5. Boot diagnostics ───────────────────────────────────
    if config.self_test_on_boot {
        diagnostics::self_test(&mut hw, &mut clock, &config);
    }
    if config.troubleshoot_cycles > 0 {
        diagnostics::relay_troubleshoot(&mut hw, &mut clock, config.troubleshoot_cycles);
    }

    // ── 6. Control loop ───────────────────────────────────────
    info!("Hardware initialized - starting irrigation monitoring");
    // esp_timer counts from boot, so time-of-day includes the diagnostics above.
    let mut control = ControlLoop::new(&config, 0);

    // Only a sensor fault gets us here; returning lets the runtime reset.
    if let Err(e) = control.run(&mut hw, &mut clock, &mut log_sink) {
        error!("Control loop halted: {}", e);
        return Err(e.into());
    }
    Ok(())
}
