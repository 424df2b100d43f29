//! Function-pointer finite state machine engine for the actuator sequence.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  StateTable                                                  │
//! │  ┌────────────────┬───────────┬──────────┬─────────────────┐ │
//! │  │ StateId        │ on_enter  │ on_exit  │ on_update       │ │
//! │  ├────────────────┼───────────┼──────────┼─────────────────┤ │
//! │  │ Idle           │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ Pressurizing   │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ Irrigating     │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  │ Depressurizing │ fn(ctx)   │ fn(ctx)  │ fn(ctx)->Option │ │
//! │  └────────────────┴───────────┴──────────┴─────────────────┘ │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each tick the engine calls `on_update` for the **current** state.
//! If it returns `Some(next_id)`, the engine runs `on_exit` for the
//! current state, then `on_enter` for the next, and stamps the entry time
//! in the context. Handlers only write `ctx.commands`; the sequencer turns
//! those into hardware writes after the tick.

pub mod context;
pub mod states;

use context::SequencerContext;
use log::debug;

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Every phase of the pump/valve sequence.
/// Must stay in sync with the table built in [`states::build_state_table`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum StateId {
    /// Pump off, valve closed.
    Idle = 0,
    /// Pump on, valve closed, waiting for line pressure.
    Pressurizing = 1,
    /// Pump on, valve open.
    Irrigating = 2,
    /// Valve closed, pump still on, waiting for pressure to settle.
    Depressurizing = 3,
}

impl StateId {
    /// Total number of states; sizes the table array.
    pub const COUNT: usize = 4;

    /// Convert a table index back to `StateId`. Panics on out-of-range in
    /// debug builds; returns `Idle` in release.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Self::Idle,
            1 => Self::Pressurizing,
            2 => Self::Irrigating,
            3 => Self::Depressurizing,
            _ => {
                debug_assert!(false, "invalid state index: {idx}");
                Self::Idle
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Function-pointer type aliases
// ---------------------------------------------------------------------------

/// Signature for `on_enter` and `on_exit` actions.
pub type StateActionFn = fn(&mut SequencerContext);

/// Per-tick update handler. Returns `Some(next)` to transition.
pub type StateUpdateFn = fn(&mut SequencerContext) -> Option<StateId>;

// ---------------------------------------------------------------------------
// State descriptor (one row in the table)
// ---------------------------------------------------------------------------

pub struct StateDescriptor {
    pub name: &'static str,
    pub on_enter: Option<StateActionFn>,
    pub on_exit: Option<StateActionFn>,
    pub on_update: StateUpdateFn,
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

pub struct Fsm {
    /// Fixed-size table indexed by `StateId as usize`.
    table: [StateDescriptor; StateId::COUNT],
    current: usize,
}

impl Fsm {
    pub fn new(table: [StateDescriptor; StateId::COUNT], initial: StateId) -> Self {
        Self {
            table,
            current: initial as usize,
        }
    }

    /// Run the initial `on_enter`. Call once before the first `tick()`.
    pub fn start(&mut self, ctx: &mut SequencerContext) {
        debug!("FSM starting in state: {}", self.table[self.current].name);
        ctx.state_entered_ms = ctx.now_ms;
        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }

    /// Advance by one tick. At most one transition per tick.
    ///
    /// Returns `Some((from, to))` when a transition happened.
    pub fn tick(&mut self, ctx: &mut SequencerContext) -> Option<(StateId, StateId)> {
        let next = (self.table[self.current].on_update)(ctx)?;
        let from = self.current_state();
        if next == from {
            return None;
        }
        self.transition(next, ctx);
        Some((from, next))
    }

    pub fn current_state(&self) -> StateId {
        StateId::from_index(self.current)
    }

    // -----------------------------------------------------------------------
    // Internal
    // -----------------------------------------------------------------------

    fn transition(&mut self, next_id: StateId, ctx: &mut SequencerContext) {
        let next_idx = next_id as usize;

        debug!(
            "FSM transition: {} -> {}",
            self.table[self.current].name, self.table[next_idx].name
        );

        if let Some(exit) = self.table[self.current].on_exit {
            exit(ctx);
        }

        self.current = next_idx;
        ctx.state_entered_ms = ctx.now_ms;

        if let Some(enter) = self.table[self.current].on_enter {
            enter(ctx);
        }
    }
}
