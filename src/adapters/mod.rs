//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements         | Connects to              |
//! |----------------|--------------------|--------------------------|
//! | `hardware`     | AnalogPort         | ESP32 ADC1 oneshot       |
//! |                | OutputPort         | ESP32 GPIO (relays, LED) |
//! | `log_sink`     | EventSink          | Serial log output        |
//! | `time`         | ClockPort          | ESP32 timer + FreeRTOS   |

pub mod hardware;
pub mod log_sink;
pub mod time;
