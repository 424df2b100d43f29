//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured application events to
//! the ESP-IDF logger (UART / USB-CDC in production). Cycle summaries are
//! logged bare in their fixed format; everything else carries a tag.

use log::{debug, info};

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
#[derive(Debug, Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Cycle(summary) => {
                info!("{}", summary.to_line());
            }
            AppEvent::StateChanged { from, to } => {
                debug!("SEQ | {:?} -> {:?}", from, to);
            }
            AppEvent::IrrigationStarted => {
                info!("IRRIG | water flowing");
            }
            AppEvent::IrrigationCompleted { duration_ms } => {
                info!("IRRIG | run complete, {} ms", duration_ms);
            }
            AppEvent::Started { loop_period_ms } => {
                info!("START | control loop running, period={}ms", loop_period_ms);
            }
        }
    }
}
