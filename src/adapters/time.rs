//! ESP32 time adapter.
//!
//! Provides monotonic time and the blocking delay behind [`ClockPort`].
//!
//! - **`target_os = "espidf"`**: wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer and delays with FreeRTOS `vTaskDelay`
//!   (via `esp_idf_hal::delay::FreeRtos`), so other tasks and the idle
//!   watchdog keep running during the settling waits.
//! - **`not(target_os = "espidf")`**: uses `std::time::Instant` and a
//!   thread-sleep delay for host-side simulation.

use embedded_hal::delay::DelayNs;

use crate::app::ports::ClockPort;

#[cfg(target_os = "espidf")]
type PlatformDelay = esp_idf_hal::delay::FreeRtos;

#[cfg(not(target_os = "espidf"))]
type PlatformDelay = ThreadSleep;

/// Host delay backed by `std::thread::sleep`.
#[cfg(not(target_os = "espidf"))]
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleep;

#[cfg(not(target_os = "espidf"))]
impl DelayNs for ThreadSleep {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(std::time::Duration::from_nanos(u64::from(ns)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(std::time::Duration::from_millis(u64::from(ms)));
    }
}

/// Time adapter for the ESP32-S3 platform.
pub struct Esp32TimeAdapter {
    delay: PlatformDelay,
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for Esp32TimeAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Esp32TimeAdapter {
    pub fn new() -> Self {
        Self {
            #[cfg(target_os = "espidf")]
            delay: esp_idf_hal::delay::FreeRtos,
            #[cfg(not(target_os = "espidf"))]
            delay: ThreadSleep,
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }

    /// Microseconds since boot (monotonic).
    #[cfg(target_os = "espidf")]
    pub fn uptime_us(&self) -> u64 {
        // SAFETY: esp_timer_get_time reads the monotonic RTC counter.
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64
    }

    /// Microseconds since this adapter was created (monotonic).
    #[cfg(not(target_os = "espidf"))]
    pub fn uptime_us(&self) -> u64 {
        self.start.elapsed().as_micros() as u64
    }
}

impl ClockPort for Esp32TimeAdapter {
    fn now_ms(&self) -> u64 {
        self.uptime_us() / 1000
    }

    fn delay_ms(&mut self, ms: u32) {
        DelayNs::delay_ms(&mut self.delay, ms);
    }
}
