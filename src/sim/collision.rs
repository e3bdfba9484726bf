//! Collision detection between the player and nearby opponents
//!
//! Everything is an axis-aligned box produced by the projection model, so
//! collision reduces to interval overlap on both axes.

use super::projection::{Rect, Viewport, opponent_rect, player_rect};
use super::state::{Opponent, Player};

/// Two boxes overlap iff their projections on both axes overlap.
///
/// Intervals are closed: boxes that merely touch count as a hit.
pub fn rects_overlap(a: &Rect, b: &Rect) -> bool {
    let (a_max, b_max) = (a.max(), b.max());
    a.min.x <= b_max.x && b.min.x <= a_max.x && a.min.y <= b_max.y && b.min.y <= a_max.y
}

/// Check one opponent against the player.
///
/// Only opponents sharing the player's lane and closer than
/// `danger_distance` are candidates; everything else is a miss without
/// touching the geometry.
pub fn player_hit_by(
    player: &Player,
    opponent: &Opponent,
    danger_distance: f32,
    viewport: &Viewport,
) -> bool {
    if opponent.distance >= danger_distance || opponent.lane != player.lane {
        return false;
    }
    let player_box = player_rect(player.lane, viewport);
    let opponent_box = opponent_rect(opponent.lane, opponent.distance, viewport);
    rects_overlap(&player_box, &opponent_box)
}

/// First opponent (in store order) that collides with the player
pub fn find_collision<'a>(
    player: &Player,
    opponents: &'a [Opponent],
    danger_distance: f32,
    viewport: &Viewport,
) -> Option<&'a Opponent> {
    opponents
        .iter()
        .find(|o| player_hit_by(player, o, danger_distance, viewport))
}
