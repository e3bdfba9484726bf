//! Read-only views of the simulation for presentation, audio and storage
//!
//! A `Snapshot` is captured only after a tick (or lifecycle transition) has
//! fully completed and is then published through a `SnapshotCell`, so a
//! reader on another thread never observes a half-updated world.

use std::sync::{Arc, RwLock};

use serde::Serialize;

use crate::sim::{GamePhase, GameState, OpponentKind, Rect, opponent_rect, player_rect};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    pub lane: u8,
    pub alive: bool,
    /// Screen-space hitbox, identical to what collision used
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpponentView {
    pub id: u32,
    pub kind: OpponentKind,
    pub lane: u8,
    pub distance: f32,
    pub overtaken: bool,
    pub bounds: Rect,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub score: u64,
    pub speed_multiplier: f32,
    pub nitro_remaining: f32,
    pub phase: GamePhase,
    pub player: PlayerView,
    /// Far to near, the order a renderer paints them in
    pub opponents: Vec<OpponentView>,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let viewport = &state.viewport;
        let mut opponents: Vec<OpponentView> = state
            .opponents()
            .map(|o| OpponentView {
                id: o.id,
                kind: o.kind,
                lane: o.lane,
                distance: o.distance,
                overtaken: o.overtaken,
                bounds: opponent_rect(o.lane, o.distance, viewport),
            })
            .collect();
        opponents.sort_by(|a, b| b.distance.total_cmp(&a.distance));

        Self {
            tick: state.time_ticks,
            score: state.score,
            speed_multiplier: state.speed_multiplier,
            nitro_remaining: state.nitro_remaining,
            phase: state.phase,
            player: PlayerView {
                lane: state.player.lane,
                alive: state.player.alive,
                bounds: player_rect(state.player.lane, viewport),
            },
            opponents,
        }
    }
}

/// Latest published snapshot, swapped atomically as a whole
#[derive(Debug, Clone)]
pub struct SnapshotCell {
    inner: Arc<RwLock<Arc<Snapshot>>>,
}

impl SnapshotCell {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(initial))),
        }
    }

    /// Replace the published snapshot
    pub fn publish(&self, snapshot: Snapshot) {
        let snapshot = Arc::new(snapshot);
        match self.inner.write() {
            Ok(mut slot) => *slot = snapshot,
            // The slot only ever holds a complete Arc
            Err(poisoned) => *poisoned.into_inner() = snapshot,
        }
    }

    /// Most recent complete snapshot
    pub fn latest(&self) -> Arc<Snapshot> {
        match self.inner.read() {
            Ok(slot) => Arc::clone(&slot),
            Err(poisoned) => Arc::clone(&poisoned.into_inner()),
        }
    }
}
