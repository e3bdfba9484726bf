//! Demo-mode driver
//!
//! Picks inputs for the player the way a cautious human would: stay put
//! while the current lane is clear, otherwise step toward whichever lane
//! has the most room before its nearest oncoming opponent.

use super::state::GameState;
use super::tick::TickInput;
use crate::consts::LANE_COUNT;

/// Clearance (approach distance) the autopilot is happy to sit behind
pub const COMFORT_DISTANCE: f32 = 900.0;

/// How far inside the overtake line an opponent still counts as a threat.
/// Past this it has crossed the player's depth and can no longer close in.
pub const THREAT_MARGIN: f32 = 120.0;

/// Distance to the nearest opponent in `lane` that can still hit the player
pub fn lane_clearance(state: &GameState, lane: u8) -> f32 {
    state
        .opponents()
        .filter(|o| {
            o.lane == lane && o.distance > state.tuning.overtake_distance - THREAT_MARGIN
        })
        .map(|o| o.distance)
        .fold(f32::INFINITY, f32::min)
}

/// Suggest this tick's input
pub fn suggest(state: &GameState) -> TickInput {
    let current = state.player.lane;
    let here = lane_clearance(state, current);
    if here >= COMFORT_DISTANCE {
        return TickInput::default();
    }

    // Ties go to the lane nearest the player
    let best = (0..LANE_COUNT)
        .map(|lane| (lane, lane_clearance(state, lane)))
        .max_by(|(la, a), (lb, b)| {
            a.total_cmp(b)
                .then_with(|| lb.abs_diff(current).cmp(&la.abs_diff(current)))
        })
        .map(|(lane, _)| lane)
        .unwrap_or(current);

    // Don't step into a lane that is worse than staying
    let step = if best < current {
        current - 1
    } else if best > current {
        current + 1
    } else {
        return TickInput::default();
    };
    if lane_clearance(state, step) <= here {
        return TickInput::default();
    }

    TickInput {
        move_left: step < current,
        move_right: step > current,
        ..Default::default()
    }
}
