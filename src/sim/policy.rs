//! Opponent decision policy
//!
//! Each tick every live opponent may drift between lanes and closes some
//! distance on the player. Aggressive opponents that are already close
//! sometimes steer toward the player's lane; everyone else occasionally
//! jitters at random. There is no path planning: blocking and overtaking
//! emerge from these two rules and the speed regimes below.

use super::rng::RandomSource;
use super::state::Opponent;
use crate::clamp_lane;
use crate::consts::{LANE_COUNT, REFERENCE_FRAME_MS};
use crate::tuning::Tuning;

/// World facts the policy reads for one tick
#[derive(Debug, Clone, Copy)]
pub struct PolicyContext {
    pub player_lane: u8,
    /// Speed multiplier including any nitro boost
    pub effective_speed: f32,
    pub dt_ms: f32,
}

/// What an opponent does this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyDecision {
    pub lane: u8,
    /// How far the opponent closes in (positive = nearer)
    pub distance_delta: f32,
}

/// Choose a lane for this tick.
///
/// Eligible opponents roll the bias chance first; a successful roll picks
/// the player's lane or one of its neighbours. Opponents that are not
/// eligible, or fail the roll, fall through to the random jitter.
pub fn choose_lane(
    opponent: &Opponent,
    player_lane: u8,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> u8 {
    let eligible = opponent.aggressiveness > tuning.lane_bias_aggressiveness
        && opponent.distance < tuning.lane_bias_range;

    if eligible && rng.chance(tuning.lane_bias_chance) {
        let offset = if rng.chance(tuning.lane_bias_same_lane) {
            0
        } else if rng.chance(0.5) {
            -1
        } else {
            1
        };
        clamp_lane(player_lane as i32 + offset)
    } else if rng.chance(tuning.lane_jitter_chance) {
        rng.pick_index(LANE_COUNT as usize) as u8
    } else {
        opponent.lane
    }
}

/// Distance closed this tick for an opponent in `lane`.
///
/// Three regimes: cruising while far away, pressing when close and in
/// the player's lane, and a normal approach otherwise.
pub fn approach_delta(opponent: &Opponent, lane: u8, ctx: &PolicyContext, tuning: &Tuning) -> f32 {
    let boost = ctx.effective_speed - 1.0;
    let per_frame = if opponent.distance > tuning.cruise_distance {
        opponent.approach_speed * 1.6 + boost * 1.2
    } else if lane == ctx.player_lane && opponent.distance < tuning.press_distance {
        opponent.approach_speed * 2.2 + 0.6 + opponent.aggressiveness
    } else {
        opponent.approach_speed * 1.8 + boost
    };
    per_frame * (ctx.dt_ms / REFERENCE_FRAME_MS)
}

/// Run the full policy for one opponent
pub fn decide(
    opponent: &Opponent,
    ctx: &PolicyContext,
    tuning: &Tuning,
    rng: &mut impl RandomSource,
) -> PolicyDecision {
    let lane = choose_lane(opponent, ctx.player_lane, tuning, rng);
    PolicyDecision {
        lane,
        distance_delta: approach_delta(opponent, lane, ctx, tuning),
    }
}
