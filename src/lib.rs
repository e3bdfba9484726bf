//! Road Racer - A three-lane arcade road racer
//!
//! Core modules:
//! - `sim`: Simulation core (projection, opponent policy, spawning, tick, lifecycle)
//! - `input`: Abstract input intents and the tick-drained flag buffer
//! - `snapshot`: Read-only views published after every tick
//! - `session`: Command surface and frame clock around a single run
//! - `highscores` / `persistence`: Ranked leaderboard and its storage backends
//! - `settings` / `tuning`: Data-driven configuration and game balance

pub mod error;
pub mod highscores;
pub mod input;
pub mod persistence;
pub mod session;
pub mod settings;
pub mod sim;
pub mod snapshot;
pub mod tuning;

pub use error::{Error, Result};
pub use highscores::HighScores;
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

/// Game configuration constants
pub mod consts {
    /// Number of lanes on the track
    pub const LANE_COUNT: u8 = 3;
    /// Lane the player starts in
    pub const START_LANE: u8 = 1;
    /// Lane centres as a fraction of viewport width
    pub const LANE_FRACTIONS: [f32; 3] = [0.18, 0.5, 0.82];

    /// Default logical viewport
    pub const VIEWPORT_WIDTH: f32 = 720.0;
    pub const VIEWPORT_HEIGHT: f32 = 1280.0;

    /// Perspective model. Shared by collision and rendering, never tuned.
    pub const FAR_PLANE: f32 = 3600.0;
    /// Near baseline sits this far above the bottom edge
    pub const NEAR_BASELINE_OFFSET: f32 = 220.0;
    /// Far baseline sits this far below the top edge
    pub const FAR_BASELINE_OFFSET: f32 = 160.0;
    pub const MIN_SCALE: f32 = 0.6;
    pub const SCALE_RANGE: f32 = 1.6;

    /// Car sprite base box
    pub const CAR_BASE_WIDTH: f32 = 160.0;
    pub const CAR_BASE_HEIGHT: f32 = 260.0;
    /// Player car is drawn slightly smaller than the base box
    pub const PLAYER_SCALE: f32 = 0.9;
    /// Opponent box relative to the projected scale
    pub const OPPONENT_SCALE: f32 = 0.6;

    /// Distance deltas are expressed per 16ms of elapsed time
    pub const REFERENCE_FRAME_MS: f32 = 16.0;
}

/// Clamp a lane index into the track
#[inline]
pub fn clamp_lane(lane: i32) -> u8 {
    lane.clamp(0, consts::LANE_COUNT as i32 - 1) as u8
}
