//! Data-driven game balance
//!
//! Every threshold and probability the simulation uses lives here so a
//! settings file can rebalance a run without touching code. Projection
//! geometry is fixed and lives in `consts`.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Timing ===
    /// Longest elapsed time a single tick will simulate (ms)
    pub max_step_ms: f32,

    // === Speed ===
    /// Constant forward speed of the world
    pub base_speed: f32,
    /// Multiplier gained per accelerate intent
    pub accelerate_step: f32,
    /// Multiplier lost per brake intent
    pub brake_step: f32,
    /// Brakes never push the multiplier below this
    pub brake_floor: f32,
    /// Hard clamp applied after every tick
    pub min_speed_multiplier: f32,
    pub max_speed_multiplier: f32,
    /// Multiplier shed per ms while above 1.0
    pub speed_relax_per_ms: f32,

    // === Nitro ===
    pub nitro_duration_ms: f32,
    /// Multiplicative boost applied while nitro is burning
    pub nitro_boost: f32,

    // === Spawning ===
    /// Accumulator value that triggers a spawn (inclusive)
    pub spawn_threshold: f32,
    /// Accumulator gain per ms at score 0
    pub spawn_base_rate: f32,
    /// Extra accumulator gain per ms per point of score
    pub spawn_score_rate: f32,
    /// Probability of a second opponent on the same spawn
    pub second_spawn_chance: f32,
    pub spawn_distance_min: f32,
    pub spawn_distance_span: f32,
    pub approach_speed_min: f32,
    pub approach_speed_span: f32,
    pub max_aggressiveness: f32,

    // === Opponent policy ===
    /// Opponents above this aggressiveness may steer toward the player
    pub lane_bias_aggressiveness: f32,
    /// ...but only once they are closer than this
    pub lane_bias_range: f32,
    pub lane_bias_chance: f32,
    /// Share of biased moves that pick the player's own lane
    pub lane_bias_same_lane: f32,
    pub lane_jitter_chance: f32,
    /// Beyond this distance opponents use the cruising regime
    pub cruise_distance: f32,
    /// Same-lane opponents closer than this use the pressing regime
    pub press_distance: f32,
    /// Minimum forward approach stops once an opponent is this far behind
    pub min_approach_cutoff: f32,

    // === Scoring & cleanup ===
    pub overtake_distance: f32,
    pub overtake_points: u64,
    pub removal_distance: f32,
    /// Only opponents nearer than this are checked for collisions
    pub danger_distance: f32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            max_step_ms: 40.0,

            base_speed: 3.0,
            accelerate_step: 0.08,
            brake_step: 0.25,
            brake_floor: 0.6,
            min_speed_multiplier: 0.5,
            max_speed_multiplier: 3.0,
            speed_relax_per_ms: 0.0008,

            nitro_duration_ms: 900.0,
            nitro_boost: 1.6,

            spawn_threshold: 850.0,
            spawn_base_rate: 0.8,
            spawn_score_rate: 0.002,
            second_spawn_chance: 0.36,
            spawn_distance_min: 2000.0,
            spawn_distance_span: 1400.0,
            approach_speed_min: 0.9,
            approach_speed_span: 0.9,
            max_aggressiveness: 1.2,

            lane_bias_aggressiveness: 0.9,
            lane_bias_range: 1400.0,
            lane_bias_chance: 0.015,
            lane_bias_same_lane: 0.6,
            lane_jitter_chance: 0.008,
            cruise_distance: 900.0,
            press_distance: 600.0,
            min_approach_cutoff: -100.0,

            overtake_distance: 60.0,
            overtake_points: 25,
            removal_distance: -360.0,
            danger_distance: 420.0,
        }
    }
}

impl Tuning {
    /// Reject values that would break the simulation invariants
    pub fn validate(&self) -> Result<()> {
        fn positive(field: &'static str, value: f32) -> Result<()> {
            if value > 0.0 && value.is_finite() {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    reason: format!("must be a positive number, got {value}"),
                })
            }
        }
        fn probability(field: &'static str, value: f32) -> Result<()> {
            if (0.0..=1.0).contains(&value) {
                Ok(())
            } else {
                Err(Error::InvalidConfig {
                    field,
                    reason: format!("must be within [0, 1], got {value}"),
                })
            }
        }

        positive("max_step_ms", self.max_step_ms)?;
        positive("base_speed", self.base_speed)?;
        positive("min_speed_multiplier", self.min_speed_multiplier)?;
        positive("spawn_threshold", self.spawn_threshold)?;
        positive("spawn_base_rate", self.spawn_base_rate)?;
        positive("approach_speed_min", self.approach_speed_min)?;
        positive("nitro_boost", self.nitro_boost)?;

        if self.max_speed_multiplier < self.min_speed_multiplier {
            return Err(Error::InvalidConfig {
                field: "max_speed_multiplier",
                reason: format!(
                    "must not be below min_speed_multiplier ({})",
                    self.min_speed_multiplier
                ),
            });
        }
        if !(self.min_speed_multiplier..=self.max_speed_multiplier).contains(&self.brake_floor) {
            return Err(Error::InvalidConfig {
                field: "brake_floor",
                reason: "must lie within the speed multiplier clamp".into(),
            });
        }
        if self.removal_distance >= self.overtake_distance {
            return Err(Error::InvalidConfig {
                field: "removal_distance",
                reason: "must be below overtake_distance".into(),
            });
        }

        probability("second_spawn_chance", self.second_spawn_chance)?;
        probability("lane_bias_chance", self.lane_bias_chance)?;
        probability("lane_bias_same_lane", self.lane_bias_same_lane)?;
        probability("lane_jitter_chance", self.lane_jitter_chance)?;
        Ok(())
    }
}
