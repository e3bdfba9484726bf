//! A single player's game session
//!
//! Wraps the simulation with everything a frontend needs: the seeded RNG,
//! the intent buffer device callbacks write into, the frame clock, and the
//! snapshot cell readers poll. Drive it by calling `frame` once per
//! rendered frame with a monotonic timestamp.

use std::sync::Arc;

use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::error::Result;
use crate::input::IntentBuffer;
use crate::persistence::{LeaderboardStore, now_ms};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GamePhase, GameState, autopilot, lifecycle, tick};
use crate::snapshot::{Snapshot, SnapshotCell};

pub struct Session {
    state: GameState,
    rng: Pcg32,
    intents: Arc<IntentBuffer>,
    snapshots: SnapshotCell,
    /// Timestamp of the previous frame (ms); None until the run starts
    last_frame_ms: Option<f64>,
    autopilot: bool,
}

impl Session {
    pub fn new(settings: &Settings, seed: u64) -> Self {
        let state = GameState::new(settings.tuning.clone(), settings.viewport);
        let snapshots = SnapshotCell::new(Snapshot::capture(&state));
        log::info!("Session created with seed {seed}");
        Self {
            state,
            rng: Pcg32::seed_from_u64(seed),
            intents: Arc::new(IntentBuffer::new()),
            snapshots,
            last_frame_ms: None,
            autopilot: settings.autopilot,
        }
    }

    /// Buffer for device callbacks to write intents into
    pub fn intents(&self) -> Arc<IntentBuffer> {
        Arc::clone(&self.intents)
    }

    /// Cell for readers on other threads
    pub fn snapshots(&self) -> SnapshotCell {
        self.snapshots.clone()
    }

    pub fn latest(&self) -> Arc<Snapshot> {
        self.snapshots.latest()
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn set_autopilot(&mut self, enabled: bool) {
        self.autopilot = enabled;
    }

    fn publish(&self) {
        self.snapshots.publish(Snapshot::capture(&self.state));
    }

    /// Run a lifecycle command, publishing on any transition
    fn command(&mut self, command: Command, now_ms: Option<f64>) -> bool {
        let changed = lifecycle::apply(&mut self.state, command);
        if changed {
            if let Some(now) = now_ms {
                self.last_frame_ms = Some(now);
            }
            // Stale presses from before the transition don't carry over
            self.intents.clear();
            self.publish();
        }
        changed
    }

    /// Idle -> Running. `now_ms` is the clock baseline for the first frame.
    pub fn start(&mut self, now_ms: f64) -> bool {
        self.command(Command::Start, Some(now_ms))
    }

    pub fn pause(&mut self) -> bool {
        self.command(Command::Pause, None)
    }

    /// Paused -> Running. Time spent paused is not simulated.
    pub fn resume(&mut self, now_ms: f64) -> bool {
        self.command(Command::Resume, Some(now_ms))
    }

    pub fn reset(&mut self) -> bool {
        let changed = self.command(Command::Reset, None);
        self.last_frame_ms = None;
        changed
    }

    /// Advance one rendered frame.
    ///
    /// Elapsed time since the previous frame is clamped to the tuning's
    /// maximum step; frames the caller skipped are simply lost.
    pub fn frame(&mut self, now_ms: f64) -> Vec<GameEvent> {
        if !self.state.is_running() {
            return Vec::new();
        }
        let last = self.last_frame_ms.replace(now_ms).unwrap_or(now_ms);
        let dt = ((now_ms - last).max(0.0) as f32).min(self.state.tuning.max_step_ms);

        let mut input = self.intents.drain();
        if self.autopilot {
            input = input.merge(autopilot::suggest(&self.state));
        }

        let phase_before = self.state.phase;
        let events = tick(&mut self.state, &input, dt, &mut self.rng);
        if self.state.phase != phase_before {
            self.intents.clear();
        }
        self.publish();
        events
    }

    /// Record the finished run. Only meaningful after a crash.
    pub fn save_score(
        &self,
        name: &str,
        store: &mut impl LeaderboardStore,
    ) -> Result<Option<usize>> {
        if self.state.phase != GamePhase::GameOver {
            log::debug!("Ignoring save outside of game over");
            return Ok(None);
        }
        let rank = store.record(name, self.state.score, now_ms())?;
        match rank {
            Some(rank) => log::info!("Score {} recorded at rank {rank}", self.state.score),
            None => log::info!("Score {} did not make the board", self.state.score),
        }
        Ok(rank)
    }
}
