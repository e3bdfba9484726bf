//! Run lifecycle: Idle -> Running <-> Paused, Running -> GameOver -> Idle
//!
//! Commands that do not apply to the current phase are silently ignored.
//! GameOver is only ever entered by a crash inside the tick.

use serde::{Deserialize, Serialize};

use super::state::{GamePhase, GameState};

/// External commands driving the lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
}

/// Apply a command. Returns true if the phase changed.
pub fn apply(state: &mut GameState, command: Command) -> bool {
    match command {
        Command::Start => start(state),
        Command::Pause => pause(state),
        Command::Resume => resume(state),
        Command::Reset => reset(state),
    }
}

/// Idle -> Running, with every run value back at its default
pub fn start(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Idle {
        return false;
    }
    state.reset_run();
    state.phase = GamePhase::Running;
    log::info!("Run started");
    true
}

/// Running -> Paused
pub fn pause(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Running {
        return false;
    }
    state.phase = GamePhase::Paused;
    log::info!("Run paused at score {}", state.score);
    true
}

/// Paused -> Running
pub fn resume(state: &mut GameState) -> bool {
    if state.phase != GamePhase::Paused {
        return false;
    }
    state.phase = GamePhase::Running;
    log::info!("Run resumed");
    true
}

/// Any phase -> Idle, rebuilding the world from defaults.
///
/// Configuration (tuning and viewport) survives; nothing else does.
pub fn reset(state: &mut GameState) -> bool {
    let previous = state.phase;
    *state = GameState::new(state.tuning.clone(), state.viewport);
    log::info!("Reset from {previous:?}");
    previous != GamePhase::Idle
}

/// Running -> GameOver. Only the tick's collision step calls this.
pub(crate) fn crash(state: &mut GameState) {
    debug_assert_eq!(state.phase, GamePhase::Running);
    state.phase = GamePhase::GameOver;
    state.player.alive = false;
    log::info!("Game over, final score {}", state.score);
}
