//! Difficulty and spawn scheduling
//!
//! Time feeds an accumulator at a rate that grows with score; each time it
//! reaches the threshold one opponent (sometimes two) joins the track.
//! This is the only difficulty curve in the game.

use super::rng::RandomSource;
use super::state::{GameEvent, GameState, Opponent, OpponentKind};
use crate::consts::LANE_COUNT;
use crate::tuning::Tuning;

/// Roll a fresh opponent's attributes
pub fn roll_opponent(tuning: &Tuning, rng: &mut impl RandomSource) -> Opponent {
    let kind = OpponentKind::ALL[rng.pick_index(OpponentKind::ALL.len())];
    let lane = rng.pick_index(LANE_COUNT as usize) as u8;
    let distance = rng.range(tuning.spawn_distance_min, tuning.spawn_distance_span);
    let approach_speed = rng.range(tuning.approach_speed_min, tuning.approach_speed_span);
    let aggressiveness = rng.range(0.0, tuning.max_aggressiveness);
    Opponent {
        id: 0,
        kind,
        lane,
        distance,
        approach_speed,
        aggressiveness,
        overtaken: false,
    }
}

/// Slack on the inclusive threshold compare, absorbing float rounding
const THRESHOLD_TOLERANCE: f64 = 1e-6;

/// Accumulator gain per ms at the given score
pub fn spawn_rate(tuning: &Tuning, score: u64) -> f32 {
    tuning.spawn_base_rate + score as f32 * tuning.spawn_score_rate
}

/// Advance the spawn accumulator and create opponents when it fills.
///
/// Returns one `Spawned` event per opponent created (zero, one or two).
pub fn advance(state: &mut GameState, dt_ms: f32, rng: &mut impl RandomSource) -> Vec<GameEvent> {
    state.spawn_accumulator += dt_ms as f64 * spawn_rate(&state.tuning, state.score) as f64;
    if state.spawn_accumulator + THRESHOLD_TOLERANCE < state.tuning.spawn_threshold as f64 {
        return Vec::new();
    }
    state.spawn_accumulator = 0.0;

    let mut events = Vec::with_capacity(2);
    let first = roll_opponent(&state.tuning, rng);
    events.push(spawn(state, first));
    if rng.chance(state.tuning.second_spawn_chance) {
        let second = roll_opponent(&state.tuning, rng);
        events.push(spawn(state, second));
    }
    events
}

fn spawn(state: &mut GameState, opponent: Opponent) -> GameEvent {
    let (lane, distance) = (opponent.lane, opponent.distance);
    let id = state.add_opponent(opponent);
    log::debug!("Spawned opponent {id} in lane {lane} at {distance:.0}");
    GameEvent::Spawned { id }
}
