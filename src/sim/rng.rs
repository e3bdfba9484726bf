//! Injectable randomness
//!
//! Spawning and the opponent policy only ever ask for a uniform float in
//! `[0, 1)`. Live runs use a seeded `Pcg32`; tests script exact draws.

use std::collections::VecDeque;

use rand::{Rng, RngCore};

/// A source of uniform floats in `[0, 1)`
pub trait RandomSource {
    fn next_f32(&mut self) -> f32;

    /// Roll against a probability
    fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index in `0..n`
    fn pick_index(&mut self, n: usize) -> usize {
        ((self.next_f32() * n as f32) as usize).min(n.saturating_sub(1))
    }

    /// Uniform value in `[min, min + span)`
    fn range(&mut self, min: f32, span: f32) -> f32 {
        min + self.next_f32() * span
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_f32(&mut self) -> f32 {
        self.random::<f32>()
    }
}

/// Replays a fixed sequence of draws, then a constant fallback
#[derive(Debug, Clone)]
pub struct ScriptedRandom {
    draws: VecDeque<f32>,
    fallback: f32,
}

/// Fallback that fails every probability gate the simulation uses
pub const QUIET_DRAW: f32 = 0.999;

impl ScriptedRandom {
    pub fn new(draws: impl IntoIterator<Item = f32>) -> Self {
        Self {
            draws: draws.into_iter().collect(),
            fallback: QUIET_DRAW,
        }
    }

    /// A source that never triggers a random event
    pub fn quiet() -> Self {
        Self::new([])
    }

    pub fn with_fallback(mut self, fallback: f32) -> Self {
        self.fallback = fallback;
        self
    }

    /// Draws not yet consumed
    pub fn remaining(&self) -> usize {
        self.draws.len()
    }
}

impl RandomSource for ScriptedRandom {
    fn next_f32(&mut self) -> f32 {
        let draw = self.draws.pop_front().unwrap_or(self.fallback);
        draw.clamp(0.0, 1.0 - f32::EPSILON)
    }
}
