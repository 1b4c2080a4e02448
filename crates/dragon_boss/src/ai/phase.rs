//! Health-derived phase

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Behavioural tier picked by health fraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Reflect, Serialize, Deserialize)]
pub enum Phase {
    Phase1,
    Phase2,
    Phase3,
}

impl Phase {
    /// `Phase3` if `fraction <= phase3`, `Phase2` if `phase3 < fraction <= phase2`, else `Phase1`.
    ///
    /// Total over every `f32` (NaN reads as Phase1): no gaps, no overlaps.
    pub fn from_fraction(fraction: f32, phase2_threshold: f32, phase3_threshold: f32) -> Self {
        if fraction <= phase3_threshold {
            Phase::Phase3
        } else if fraction <= phase2_threshold {
            Phase::Phase2
        } else {
            Phase::Phase1
        }
    }

    /// 1-based index reported to observers.
    pub fn index(&self) -> u8 {
        match self {
            Phase::Phase1 => 1,
            Phase::Phase2 => 2,
            Phase::Phase3 => 3,
        }
    }
}
