//! Variable timestep simulation tick
//!
//! Core game loop that advances one rendered frame of simulation. Elapsed
//! time is clamped so a long stall (backgrounded tab, debugger) can never
//! teleport opponents through the player.

use super::collision::find_collision;
use super::lifecycle;
use super::policy::{self, PolicyContext};
use super::rng::RandomSource;
use super::spawn;
use super::state::{GameEvent, GameState};
use crate::consts::REFERENCE_FRAME_MS;
use crate::tuning::Tuning;

/// Intents consumed by a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Shift one lane left (edge-triggered)
    pub move_left: bool,
    /// Shift one lane right (edge-triggered)
    pub move_right: bool,
    /// Throttle up (level-triggered while held)
    pub accelerate: bool,
    /// Brake, from either brake binding
    pub brake: bool,
    /// Light the nitro (edge-triggered)
    pub nitro: bool,
    /// Pause the run (edge-triggered)
    pub pause: bool,
}

impl TickInput {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Combine two inputs, keeping every intent either one carries
    pub fn merge(self, other: TickInput) -> TickInput {
        TickInput {
            move_left: self.move_left || other.move_left,
            move_right: self.move_right || other.move_right,
            accelerate: self.accelerate || other.accelerate,
            brake: self.brake || other.brake,
            nitro: self.nitro || other.nitro,
            pause: self.pause || other.pause,
        }
    }
}

/// Advance the game state by one frame of `dt_ms` milliseconds.
///
/// Does nothing unless the run is in `Running`. A pause intent freezes the
/// run before any entity is touched.
pub fn tick(
    state: &mut GameState,
    input: &TickInput,
    dt_ms: f32,
    rng: &mut impl RandomSource,
) -> Vec<GameEvent> {
    let mut events = Vec::new();

    if input.pause && lifecycle::pause(state) {
        events.push(GameEvent::Paused);
        return events;
    }
    if !state.is_running() {
        return events;
    }

    let dt = dt_ms.clamp(0.0, state.tuning.max_step_ms);
    state.time_ticks += 1;

    apply_input(state, input, &mut events);

    // Nitro burns down; the boost only lasts for this tick's motion
    let boost = if state.nitro_remaining > 0.0 {
        state.nitro_remaining = (state.nitro_remaining - dt).max(0.0);
        state.tuning.nitro_boost
    } else {
        1.0
    };

    // Coast back toward cruising speed
    if state.speed_multiplier > 1.0 {
        state.speed_multiplier =
            (state.speed_multiplier - state.tuning.speed_relax_per_ms * dt).max(1.0);
    }
    state.speed_multiplier = state.speed_multiplier.clamp(
        state.tuning.min_speed_multiplier,
        state.tuning.max_speed_multiplier,
    );

    events.extend(spawn::advance(state, dt, rng));

    let ctx = PolicyContext {
        player_lane: state.player.lane,
        effective_speed: state.speed_multiplier * boost,
        dt_ms: dt,
    };
    let tuning = &state.tuning;
    for opponent in state.opponents.iter_mut() {
        let decision = policy::decide(opponent, &ctx, tuning, rng);
        if decision.lane != opponent.lane {
            log::debug!("Opponent {} -> lane {}", opponent.id, decision.lane);
            events.push(GameEvent::LaneChanged {
                id: opponent.id,
                lane: decision.lane,
            });
        }
        opponent.lane = decision.lane;
        opponent.distance -= decision.distance_delta;
        opponent.distance -= minimum_approach(opponent.distance, &ctx, tuning);

        // Dodged: crossed the player's depth in another lane
        if !opponent.overtaken
            && opponent.distance < tuning.overtake_distance
            && opponent.lane != ctx.player_lane
            && opponent.mark_overtaken()
        {
            state.score += tuning.overtake_points;
            log::debug!("Overtook opponent {}, score {}", opponent.id, state.score);
            events.push(GameEvent::Overtaken {
                id: opponent.id,
                score: state.score,
            });
        }
    }

    let removal_distance = state.tuning.removal_distance;
    events.extend(
        state
            .remove_passed(removal_distance)
            .into_iter()
            .map(|id| GameEvent::Removed { id }),
    );

    let crashed_into = find_collision(
        &state.player,
        &state.opponents,
        state.tuning.danger_distance,
        &state.viewport,
    )
    .map(|o| o.id);
    if let Some(id) = crashed_into {
        lifecycle::crash(state);
        events.push(GameEvent::Crashed { id });
    }

    events
}

/// Apply this tick's intents to the player and the throttle
fn apply_input(state: &mut GameState, input: &TickInput, events: &mut Vec<GameEvent>) {
    if input.move_left {
        state.player.move_left();
    }
    if input.move_right {
        state.player.move_right();
    }

    let tuning = &state.tuning;
    if input.accelerate {
        state.speed_multiplier =
            (state.speed_multiplier + tuning.accelerate_step).min(tuning.max_speed_multiplier);
    }
    if input.brake {
        state.speed_multiplier = (state.speed_multiplier - tuning.brake_step).max(tuning.brake_floor);
    }
    if input.nitro {
        state.nitro_remaining = tuning.nitro_duration_ms;
        events.push(GameEvent::NitroEngaged);
    }
}

/// Forward approach every opponent gets regardless of what its policy
/// chose, until it is well behind the player
pub fn minimum_approach(distance: f32, ctx: &PolicyContext, tuning: &Tuning) -> f32 {
    if distance <= tuning.min_approach_cutoff {
        return 0.0;
    }
    let per_frame = tuning.base_speed * 0.9 + (ctx.effective_speed - 1.0) * 1.6;
    per_frame * (ctx.dt_ms / REFERENCE_FRAME_MS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::lifecycle;
    use crate::sim::rng::ScriptedRandom;
    use crate::sim::state::{GamePhase, Opponent, OpponentKind};
    use proptest::prelude::*;

    fn running() -> GameState {
        let mut state = GameState::default();
        lifecycle::start(&mut state);
        state
    }

    fn place(state: &mut GameState, lane: u8, distance: f32, approach_speed: f32) -> u32 {
        state.add_opponent(Opponent {
            id: 0,
            kind: OpponentKind::Coupe,
            lane,
            distance,
            approach_speed,
            aggressiveness: 0.0,
            overtaken: false,
        })
    }

    #[test]
    fn test_tick_idle_does_nothing() {
        let mut state = GameState::default();
        let mut rng = ScriptedRandom::quiet();
        let input = TickInput {
            move_left: true,
            ..Default::default()
        };
        let events = tick(&mut state, &input, 16.0, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.player.lane, 1);
        assert_eq!(state.time_ticks, 0);
    }

    #[test]
    fn test_collision_same_lane() {
        let mut state = running();
        let id = place(&mut state, 1, 400.0, 10.0);
        let mut rng = ScriptedRandom::quiet();

        let events = tick(&mut state, &TickInput::default(), 16.0, &mut rng);

        assert_eq!(state.phase, GamePhase::GameOver);
        assert!(!state.player.alive);
        assert!(events.contains(&GameEvent::Crashed { id }));
    }

    #[test]
    fn test_no_mutation_after_game_over() {
        let mut state = running();
        place(&mut state, 1, 400.0, 10.0);
        let mut rng = ScriptedRandom::quiet();
        tick(&mut state, &TickInput::default(), 16.0, &mut rng);
        let frozen = state.opponents.clone();
        let ticks = state.time_ticks;

        tick(&mut state, &TickInput::default(), 16.0, &mut rng);
        assert_eq!(state.opponents, frozen);
        assert_eq!(state.time_ticks, ticks);
    }

    #[test]
    fn test_overtake_other_lane_scores() {
        let mut state = running();
        // Closes (20 * 1.8 + 2.7) * 20/16 = 48.4 in one tick
        let id = place(&mut state, 0, 100.0, 20.0);
        let mut rng = ScriptedRandom::quiet();

        let events = tick(&mut state, &TickInput::default(), 20.0, &mut rng);

        let o = &state.opponents[0];
        assert!(o.distance < 60.0 && o.distance > 50.0);
        assert!(o.overtaken);
        assert_eq!(state.score, 25);
        assert!(events.contains(&GameEvent::Overtaken { id, score: 25 }));
        assert_eq!(state.phase, GamePhase::Running);
    }

    #[test]
    fn test_overtake_awarded_once() {
        let mut state = running();
        place(&mut state, 2, 55.0, 1.0);
        let mut rng = ScriptedRandom::quiet();
        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 16.0, &mut rng);
        }
        assert_eq!(state.score, 25);
    }

    #[test]
    fn test_same_lane_crossing_does_not_score() {
        let mut state = running();
        place(&mut state, 1, 61.0, 1.0);
        let mut rng = ScriptedRandom::quiet();
        tick(&mut state, &TickInput::default(), 16.0, &mut rng);
        assert_eq!(state.score, 0);
        assert!(!state.opponents[0].overtaken);
        assert_eq!(state.phase, GamePhase::GameOver);
    }

    #[test]
    fn test_passed_opponents_removed() {
        let mut state = running();
        let id = place(&mut state, 0, -355.0, 5.0);
        let mut rng = ScriptedRandom::quiet();
        let events = tick(&mut state, &TickInput::default(), 16.0, &mut rng);
        assert!(state.opponents.is_empty());
        assert!(events.contains(&GameEvent::Removed { id }));
    }

    #[test]
    fn test_minimum_approach_stops_behind_player() {
        let tuning = Tuning::default();
        let ctx = PolicyContext {
            player_lane: 1,
            effective_speed: 1.0,
            dt_ms: 16.0,
        };
        assert!((minimum_approach(0.0, &ctx, &tuning) - 2.7).abs() < 1e-4);
        assert_eq!(minimum_approach(-100.0, &ctx, &tuning), 0.0);
    }

    #[test]
    fn test_elapsed_time_is_clamped() {
        let mut a = running();
        let mut b = running();
        place(&mut a, 0, 3000.0, 1.0);
        place(&mut b, 0, 3000.0, 1.0);
        let mut rng = ScriptedRandom::quiet();
        tick(&mut a, &TickInput::default(), 40.0, &mut rng);
        tick(&mut b, &TickInput::default(), 5000.0, &mut rng);
        assert_eq!(a.opponents[0].distance, b.opponents[0].distance);
        assert_eq!(a.spawn_accumulator, b.spawn_accumulator);
    }

    #[test]
    fn test_lane_moves_respect_edges() {
        let mut state = running();
        let mut rng = ScriptedRandom::quiet();
        let left = TickInput {
            move_left: true,
            ..Default::default()
        };
        tick(&mut state, &left, 16.0, &mut rng);
        tick(&mut state, &left, 16.0, &mut rng);
        assert_eq!(state.player.lane, 0);

        let right = TickInput {
            move_right: true,
            ..Default::default()
        };
        for _ in 0..4 {
            tick(&mut state, &right, 16.0, &mut rng);
        }
        assert_eq!(state.player.lane, 2);
    }

    #[test]
    fn test_accelerate_then_relax() {
        let mut state = running();
        let mut rng = ScriptedRandom::quiet();
        let accel = TickInput {
            accelerate: true,
            ..Default::default()
        };
        tick(&mut state, &accel, 0.0, &mut rng);
        assert!((state.speed_multiplier - 1.08).abs() < 1e-5);

        // 0.0008 per ms: 40ms sheds 0.032
        tick(&mut state, &TickInput::default(), 40.0, &mut rng);
        assert!((state.speed_multiplier - 1.048).abs() < 1e-5);

        for _ in 0..10 {
            tick(&mut state, &TickInput::default(), 40.0, &mut rng);
        }
        assert_eq!(state.speed_multiplier, 1.0);
    }

    #[test]
    fn test_brake_floor() {
        let mut state = running();
        let mut rng = ScriptedRandom::quiet();
        let brake = TickInput {
            brake: true,
            ..Default::default()
        };
        for _ in 0..5 {
            tick(&mut state, &brake, 16.0, &mut rng);
        }
        assert!((state.speed_multiplier - 0.6).abs() < 1e-5);
    }

    #[test]
    fn test_nitro_burns_down() {
        let mut state = running();
        let mut rng = ScriptedRandom::quiet();
        let nitro = TickInput {
            nitro: true,
            ..Default::default()
        };
        let events = tick(&mut state, &nitro, 40.0, &mut rng);
        assert!(events.contains(&GameEvent::NitroEngaged));
        assert!((state.nitro_remaining - 860.0).abs() < 1e-3);
        for _ in 0..30 {
            tick(&mut state, &TickInput::default(), 40.0, &mut rng);
        }
        assert_eq!(state.nitro_remaining, 0.0);
        assert!(!state.nitro_active());
    }

    #[test]
    fn test_nitro_speeds_up_approach() {
        let mut plain = running();
        let mut boosted = running();
        place(&mut plain, 0, 3000.0, 1.0);
        place(&mut boosted, 0, 3000.0, 1.0);
        boosted.nitro_remaining = 500.0;
        let mut rng = ScriptedRandom::quiet();
        tick(&mut plain, &TickInput::default(), 16.0, &mut rng);
        tick(&mut boosted, &TickInput::default(), 16.0, &mut rng);
        assert!(boosted.opponents[0].distance < plain.opponents[0].distance);
        // Boost is transient: the throttle itself is untouched
        assert_eq!(boosted.speed_multiplier, 1.0);
    }

    #[test]
    fn test_pause_intent_freezes_run() {
        let mut state = running();
        place(&mut state, 0, 2000.0, 1.0);
        let mut rng = ScriptedRandom::quiet();
        let pause = TickInput {
            pause: true,
            ..Default::default()
        };
        let events = tick(&mut state, &pause, 16.0, &mut rng);
        assert_eq!(events, vec![GameEvent::Paused]);
        assert_eq!(state.phase, GamePhase::Paused);
        assert_eq!(state.opponents[0].distance, 2000.0);

        // A second pause while paused changes nothing
        let events = tick(&mut state, &pause, 16.0, &mut rng);
        assert!(events.is_empty());
        assert_eq!(state.phase, GamePhase::Paused);
    }

    #[test]
    fn test_spawn_at_threshold() {
        let mut state = running();
        let mut rng = ScriptedRandom::quiet();
        // 0.8 per ms at score 0: 26 full ticks reach 832, the 27th crosses 850
        for _ in 0..26 {
            tick(&mut state, &TickInput::default(), 40.0, &mut rng);
        }
        assert!(state.opponents.is_empty());
        let events = tick(&mut state, &TickInput::default(), 40.0, &mut rng);
        let spawned = events
            .iter()
            .filter(|e| matches!(e, GameEvent::Spawned { .. }))
            .count();
        assert_eq!(spawned, 1);
        assert_eq!(state.opponents.len(), 1);
    }

    #[test]
    fn test_ticks_summing_exactly_to_threshold_spawn() {
        let mut state = running();
        let mut rng = ScriptedRandom::quiet();
        let mut spawned = 0;
        for _ in 0..125 {
            spawned += tick(&mut state, &TickInput::default(), 8.5, &mut rng)
                .iter()
                .filter(|e| matches!(e, GameEvent::Spawned { .. }))
                .count();
        }
        assert_eq!(spawned, 1);
        assert_eq!(state.spawn_accumulator, 0.0);
    }

    #[test]
    fn test_determinism() {
        use rand::SeedableRng;
        use rand_pcg::Pcg32;

        let mut a = running();
        let mut b = running();
        let mut rng_a = Pcg32::seed_from_u64(99999);
        let mut rng_b = Pcg32::seed_from_u64(99999);
        for i in 0..600 {
            let input = TickInput {
                move_left: i % 97 == 0,
                move_right: i % 89 == 0,
                ..Default::default()
            };
            tick(&mut a, &input, 16.0, &mut rng_a);
            tick(&mut b, &input, 16.0, &mut rng_b);
        }
        assert_eq!(a.score, b.score);
        assert_eq!(a.phase, b.phase);
        assert_eq!(a.opponents, b.opponents);
    }

    fn arb_input() -> impl Strategy<Value = TickInput> {
        (any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>(), any::<bool>()).prop_map(
            |(move_left, move_right, accelerate, brake, nitro)| TickInput {
                move_left,
                move_right,
                accelerate,
                brake,
                nitro,
                pause: false,
            },
        )
    }

    proptest! {
        #[test]
        fn speed_and_lanes_stay_in_bounds(
            seed in any::<u64>(),
            inputs in prop::collection::vec((arb_input(), 0.0f32..100.0), 1..200),
        ) {
            use rand::SeedableRng;
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let mut state = running();
            for (input, dt) in inputs {
                tick(&mut state, &input, dt, &mut rng);
                prop_assert!((0.5..=3.0).contains(&state.speed_multiplier));
                prop_assert!(state.player.lane < 3);
                prop_assert!(state.opponents.iter().all(|o| o.lane < 3));
                prop_assert!(state.nitro_remaining >= 0.0);
            }
        }

        #[test]
        fn overtaken_never_reverts_and_score_never_drops(seed in any::<u64>(), ticks in 1usize..400) {
            use rand::SeedableRng;
            let mut rng = rand_pcg::Pcg32::seed_from_u64(seed);
            let mut state = running();
            for _ in 0..20 {
                let o = crate::sim::spawn::roll_opponent(&state.tuning, &mut rng);
                state.add_opponent(Opponent { distance: o.distance - 1800.0, ..o });
            }
            let mut seen_overtaken = std::collections::HashSet::new();
            let mut last_score = 0;
            for _ in 0..ticks {
                tick(&mut state, &TickInput::default(), 16.0, &mut rng);
                for o in &state.opponents {
                    prop_assert!(!seen_overtaken.contains(&o.id) || o.overtaken);
                    if o.overtaken {
                        seen_overtaken.insert(o.id);
                    }
                }
                prop_assert!(state.score >= last_score);
                prop_assert_eq!(state.score % 25, 0);
                last_score = state.score;
            }
        }
    }
}
