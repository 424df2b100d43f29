//! Status LED blink patterns.
//!
//! The control loop calls [`StatusIndicator::tick`] once per iteration and
//! writes the returned level to the status LED output.
//!
//! | Pattern    | Shown while | Output                                  |
//! |------------|-------------|-----------------------------------------|
//! | FastBlink  | irrigating  | toggles every tick                      |
//! | Heartbeat  | idle        | high for 2 of every 10 ticks            |
//!
//! Both phase values persist across mode changes: leaving irrigation does
//! not restart the heartbeat, and the toggle bit resumes where it stopped.

/// Ticks in one heartbeat period.
pub const HEARTBEAT_PERIOD_TICKS: u32 = 10;
/// Ticks per period with the LED lit.
pub const HEARTBEAT_ON_TICKS: u32 = 2;

/// Pattern identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PatternId {
    FastBlink,
    Heartbeat,
}

impl PatternId {
    pub fn for_state(is_irrigating: bool) -> Self {
        if is_irrigating {
            Self::FastBlink
        } else {
            Self::Heartbeat
        }
    }
}

/// Blink phase state. Stack-allocated, no heap.
#[derive(Debug, Default)]
pub struct StatusIndicator {
    blink: bool,
    counter: u32,
}

impl StatusIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance the active pattern by one step and return the LED level.
    pub fn tick(&mut self, is_irrigating: bool) -> bool {
        match PatternId::for_state(is_irrigating) {
            PatternId::FastBlink => {
                self.blink = !self.blink;
                self.blink
            }
            PatternId::Heartbeat => {
                self.counter = self.counter.wrapping_add(1);
                self.counter % HEARTBEAT_PERIOD_TICKS < HEARTBEAT_ON_TICKS
            }
        }
    }
}
