//! Game state and core simulation types
//!
//! `GameState` is the entity store: it owns the player, the live opponents
//! and the world scalars. Only the tick and the lifecycle commands mutate it.

use serde::{Deserialize, Serialize};

use super::projection::Viewport;
use crate::consts::*;
use crate::tuning::Tuning;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Before the first start, or after a reset
    #[default]
    Idle,
    /// Active gameplay; the only phase in which the tick mutates anything
    Running,
    /// Frozen mid-run
    Paused,
    /// Crashed. Terminal until reset.
    GameOver,
}

/// The player's car
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub lane: u8,
    pub alive: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            lane: START_LANE,
            alive: true,
        }
    }
}

impl Player {
    /// Shift one lane left. No-op in the leftmost lane.
    pub fn move_left(&mut self) -> bool {
        if self.lane > 0 {
            self.lane -= 1;
            true
        } else {
            false
        }
    }

    /// Shift one lane right. No-op in the rightmost lane.
    pub fn move_right(&mut self) -> bool {
        if self.lane + 1 < LANE_COUNT {
            self.lane += 1;
            true
        } else {
            false
        }
    }
}

/// Opponent livery. Purely cosmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OpponentKind {
    Coupe,
    Sedan,
    Van,
}

impl OpponentKind {
    pub const ALL: [OpponentKind; 3] = [OpponentKind::Coupe, OpponentKind::Sedan, OpponentKind::Van];
}

/// A computer-controlled car approaching the player
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opponent {
    pub id: u32,
    pub kind: OpponentKind,
    pub lane: u8,
    /// Approach distance: large = far, negative = already behind the player
    pub distance: f32,
    /// Per-opponent base closing rate
    pub approach_speed: f32,
    /// In [0, max_aggressiveness], fixed at spawn
    pub aggressiveness: f32,
    /// Set once when dodged; never reverts
    pub overtaken: bool,
}

impl Opponent {
    /// Mark as dodged. Returns true only on the first call.
    pub fn mark_overtaken(&mut self) -> bool {
        !std::mem::replace(&mut self.overtaken, true)
    }
}

/// Things that happened during a tick, for audio and presentation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Spawned { id: u32 },
    LaneChanged { id: u32, lane: u8 },
    Overtaken { id: u32, score: u64 },
    Removed { id: u32 },
    NitroEngaged,
    Crashed { id: u32 },
    Paused,
}

/// Complete world state (serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Current phase
    pub phase: GamePhase,
    pub score: u64,
    /// Throttle: 1.0 is cruising, clamped to the tuning's range
    pub speed_multiplier: f32,
    /// Accumulates toward the next spawn. Wide so long runs of small
    /// steps still sum to the threshold exactly.
    pub spawn_accumulator: f64,
    /// Nitro burn left (ms)
    pub nitro_remaining: f32,
    /// Ticks simulated this run
    pub time_ticks: u64,
    pub player: Player,
    /// Live opponents, in spawn order
    pub opponents: Vec<Opponent>,
    pub tuning: Tuning,
    pub viewport: Viewport,
    /// Next entity ID
    next_id: u32,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(Tuning::default(), Viewport::default())
    }
}

impl GameState {
    pub fn new(tuning: Tuning, viewport: Viewport) -> Self {
        Self {
            phase: GamePhase::Idle,
            score: 0,
            speed_multiplier: 1.0,
            spawn_accumulator: 0.0,
            nitro_remaining: 0.0,
            time_ticks: 0,
            player: Player::default(),
            opponents: Vec::new(),
            tuning,
            viewport,
            next_id: 1,
        }
    }

    /// Restore every run-scoped value to its default, keeping configuration
    pub fn reset_run(&mut self) {
        self.score = 0;
        self.speed_multiplier = 1.0;
        self.spawn_accumulator = 0.0;
        self.nitro_remaining = 0.0;
        self.time_ticks = 0;
        self.player = Player::default();
        self.opponents.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Insert an opponent, assigning it a fresh ID
    pub fn add_opponent(&mut self, mut opponent: Opponent) -> u32 {
        opponent.id = self.next_entity_id();
        opponent.lane = opponent.lane.min(LANE_COUNT - 1);
        let id = opponent.id;
        self.opponents.push(opponent);
        id
    }

    /// Remove an opponent by ID. Returns it if it was live.
    pub fn remove_opponent(&mut self, id: u32) -> Option<Opponent> {
        let idx = self.opponents.iter().position(|o| o.id == id)?;
        Some(self.opponents.remove(idx))
    }

    /// Drop every opponent that has fallen past `threshold`, returning their IDs
    pub fn remove_passed(&mut self, threshold: f32) -> Vec<u32> {
        let mut removed = Vec::new();
        self.opponents.retain(|o| {
            let keep = o.distance >= threshold;
            if !keep {
                removed.push(o.id);
            }
            keep
        });
        removed
    }

    pub fn opponents(&self) -> impl Iterator<Item = &Opponent> {
        self.opponents.iter()
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn nitro_active(&self) -> bool {
        self.nitro_remaining > 0.0
    }
}
