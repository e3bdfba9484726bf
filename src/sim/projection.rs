//! Perspective projection from approach distance to screen geometry
//!
//! The track is one-dimensional: an opponent is just a lane and an approach
//! distance. This module turns that into a screen row and a scale factor,
//! and from there into the axis-aligned boxes that collision detection and
//! any renderer share. Both must go through here so they never disagree.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Logical screen dimensions the geometry is laid out in
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: VIEWPORT_WIDTH,
            height: VIEWPORT_HEIGHT,
        }
    }
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Horizontal centre of a lane
    pub fn lane_x(&self, lane: u8) -> f32 {
        let idx = (lane as usize).min(LANE_FRACTIONS.len() - 1);
        self.width * LANE_FRACTIONS[idx]
    }

    /// Screen row of an object at distance 0
    #[inline]
    pub fn near_baseline(&self) -> f32 {
        self.height - NEAR_BASELINE_OFFSET
    }

    /// Screen row of an object at the far plane
    #[inline]
    pub fn far_baseline(&self) -> f32 {
        FAR_BASELINE_OFFSET
    }
}

/// Result of projecting an approach distance
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projected {
    /// Screen row of the object's centre
    pub screen_y: f32,
    /// Size multiplier (2.2 at the player, 0.6 at the far plane)
    pub scale: f32,
    /// Normalized depth in [0, 1]
    pub depth: f32,
}

/// Project an approach distance onto the screen.
///
/// Total over all inputs: distances behind the player clamp to the near
/// baseline, distances past the far plane clamp to the horizon.
pub fn project(distance: f32, viewport: &Viewport) -> Projected {
    let t = (distance / FAR_PLANE).clamp(0.0, 1.0);
    let t = if t.is_nan() { 0.0 } else { t };
    let near = viewport.near_baseline();
    let far = viewport.far_baseline();
    Projected {
        screen_y: near + (far - near) * t,
        scale: MIN_SCALE + (1.0 - t) * SCALE_RANGE,
        depth: t,
    }
}

/// Axis-aligned rectangle in screen space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle of the given size centred on a point
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            min: center - size / 2.0,
            size,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    pub fn center(&self) -> Vec2 {
        self.min + self.size / 2.0
    }
}

/// Player bounding box: fixed size, always on the near baseline
pub fn player_rect(lane: u8, viewport: &Viewport) -> Rect {
    let size = Vec2::new(
        (CAR_BASE_WIDTH * PLAYER_SCALE).round(),
        (CAR_BASE_HEIGHT * PLAYER_SCALE).round(),
    );
    let center = Vec2::new(viewport.lane_x(lane), viewport.near_baseline());
    Rect::centered(center, size)
}

/// Opponent bounding box at its projected depth
pub fn opponent_rect(lane: u8, distance: f32, viewport: &Viewport) -> Rect {
    let proj = project(distance, viewport);
    // Whole-pixel sizes keep the hitbox identical to what gets drawn
    let size = Vec2::new(
        (CAR_BASE_WIDTH * proj.scale * OPPONENT_SCALE).round(),
        (CAR_BASE_HEIGHT * proj.scale * OPPONENT_SCALE).round(),
    );
    let center = Vec2::new(viewport.lane_x(lane), proj.screen_y);
    Rect::centered(center, size)
}
