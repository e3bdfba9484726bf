//! Simulation core
//!
//! All gameplay logic lives here. This module is free of rendering, audio
//! and platform concerns:
//! - Elapsed time is clamped per tick
//! - Randomness is injected through `RandomSource`
//! - Opponents are processed in spawn order

pub mod autopilot;
pub mod collision;
pub mod lifecycle;
pub mod policy;
pub mod projection;
pub mod rng;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{find_collision, rects_overlap};
pub use lifecycle::Command;
pub use policy::{PolicyContext, PolicyDecision};
pub use projection::{Projected, Rect, Viewport, opponent_rect, player_rect, project};
pub use rng::{RandomSource, ScriptedRandom};
pub use state::{GameEvent, GamePhase, GameState, Opponent, OpponentKind, Player};
pub use tick::{TickInput, tick};
