//! Concrete state handler functions and table builder.
//!
//! Each state is three plain `fn` pointers: no closures, no dynamic
//! dispatch, no heap.
//!
//! ```text
//!  IDLE ──[start]──▶ PRESSURIZING ──[delay]──▶ IRRIGATING
//!    ▲                   │                         │
//!    │                [stop]                    [stop]
//!    │                   ▼                         │
//!    └────[delay]─── DEPRESSURIZING ◀──────────────┘
//! ```
//!
//! The valve opens only on entry to IRRIGATING and closes on exit from it,
//! so every path out of the pump-on states passes the depressurize wait
//! with the valve closed.

use super::context::{ActuatorCommands, SequencerContext};
use super::{StateDescriptor, StateId};
use log::info;

// ═══════════════════════════════════════════════════════════════════════════
//  Table builder
// ═══════════════════════════════════════════════════════════════════════════

pub fn build_state_table() -> [StateDescriptor; StateId::COUNT] {
    [
        // 0: Idle
        StateDescriptor {
            name: "Idle",
            on_enter: Some(idle_enter),
            on_exit: None,
            on_update: idle_update,
        },
        // 1: Pressurizing
        StateDescriptor {
            name: "Pressurizing",
            on_enter: Some(pressurizing_enter),
            on_exit: None,
            on_update: pressurizing_update,
        },
        // 2: Irrigating
        StateDescriptor {
            name: "Irrigating",
            on_enter: Some(irrigating_enter),
            on_exit: Some(irrigating_exit),
            on_update: irrigating_update,
        },
        // 3: Depressurizing
        StateDescriptor {
            name: "Depressurizing",
            on_enter: Some(depressurizing_enter),
            on_exit: None,
            on_update: depressurizing_update,
        },
    ]
}

// ═══════════════════════════════════════════════════════════════════════════
//  IDLE
// ═══════════════════════════════════════════════════════════════════════════

fn idle_enter(ctx: &mut SequencerContext) {
    let pump_was_on = ctx.commands.pump;
    ctx.commands = ActuatorCommands::all_off();
    if pump_was_on {
        info!("Pump OFF");
    }
    if let Some(started) = ctx.irrigation_started_ms.take() {
        let run_ms = ctx.now_ms.saturating_sub(started);
        ctx.completed_run_ms = Some(run_ms);
        info!("Irrigation completed - Duration: {} seconds", run_ms / 1000);
    }
}

fn idle_update(ctx: &mut SequencerContext) -> Option<StateId> {
    ctx.want_irrigation.then_some(StateId::Pressurizing)
}

// ═══════════════════════════════════════════════════════════════════════════
//  PRESSURIZING: pump on, valve held closed until the line has pressure
// ═══════════════════════════════════════════════════════════════════════════

fn pressurizing_enter(ctx: &mut SequencerContext) {
    info!("STARTING irrigation sequence");
    ctx.commands.valve = false;
    ctx.commands.pump = true;
    info!(
        "Pump ON - building pressure for {} ms...",
        ctx.pressurize_delay_ms
    );
}

fn pressurizing_update(ctx: &mut SequencerContext) -> Option<StateId> {
    if !ctx.want_irrigation {
        info!("Start cancelled before valve opened");
        return Some(StateId::Depressurizing);
    }
    if ctx.ms_in_state() >= u64::from(ctx.pressurize_delay_ms) {
        return Some(StateId::Irrigating);
    }
    None
}

// ═══════════════════════════════════════════════════════════════════════════
//  IRRIGATING: water flowing
// ═══════════════════════════════════════════════════════════════════════════

fn irrigating_enter(ctx: &mut SequencerContext) {
    debug_assert!(ctx.commands.pump, "valve opened against a dry line");
    ctx.commands.valve = true;
    ctx.irrigation_started_ms = Some(ctx.now_ms);
    info!("Valve OPEN - water flowing");
}

fn irrigating_exit(ctx: &mut SequencerContext) {
    ctx.commands.valve = false;
}

fn irrigating_update(ctx: &mut SequencerContext) -> Option<StateId> {
    (!ctx.want_irrigation).then_some(StateId::Depressurizing)
}

// ═══════════════════════════════════════════════════════════════════════════
//  DEPRESSURIZING: valve closed, pump still on until pressure settles
// ═══════════════════════════════════════════════════════════════════════════

fn depressurizing_enter(ctx: &mut SequencerContext) {
    info!("STOPPING irrigation sequence");
    ctx.commands.valve = false;
    info!(
        "Valve CLOSED - waiting {} ms for pressure to settle",
        ctx.depressurize_delay_ms
    );
}

fn depressurizing_update(ctx: &mut SequencerContext) -> Option<StateId> {
    // Runs to completion even if a new start is latched; Idle picks it up.
    if ctx.ms_in_state() >= u64::from(ctx.depressurize_delay_ms) {
        return Some(StateId::Idle);
    }
    None
}
