//! Random source for tie-break rolls.
//!
//! Production bosses roll from a seeded `ChaCha8Rng` (same seed → same fight).
//! Tests and replays feed a fixed sequence through `ScriptedRolls` and assert exact branches.

use std::collections::VecDeque;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Uniform roll in `[0, 1)`.
pub trait RollSource: Send + Sync {
    fn roll(&mut self) -> f32;
}

impl RollSource for ChaCha8Rng {
    fn roll(&mut self) -> f32 {
        self.gen::<f32>()
    }
}

/// Pre-recorded rolls, then `fallback` forever.
#[derive(Debug, Clone)]
pub struct ScriptedRolls {
    queue: VecDeque<f32>,
    fallback: f32,
    consumed: usize,
}

impl ScriptedRolls {
    /// Fallback 0.999 picks the "else" branch of every roll and never triggers chance events.
    pub fn new(rolls: impl IntoIterator<Item = f32>) -> Self {
        Self::with_fallback(rolls, 0.999)
    }

    pub fn with_fallback(rolls: impl IntoIterator<Item = f32>, fallback: f32) -> Self {
        Self {
            queue: rolls.into_iter().collect(),
            fallback,
            consumed: 0,
        }
    }

    /// Never rolls below `fallback`.
    pub fn constant(fallback: f32) -> Self {
        Self::with_fallback(std::iter::empty(), fallback)
    }

    /// Scripted values not consumed yet.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Total rolls taken (scripted + fallback).
    pub fn consumed(&self) -> usize {
        self.consumed
    }
}

impl RollSource for ScriptedRolls {
    fn roll(&mut self) -> f32 {
        self.consumed += 1;
        self.queue.pop_front().unwrap_or(self.fallback)
    }
}
