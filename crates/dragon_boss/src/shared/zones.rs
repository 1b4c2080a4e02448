//! Distance zones and flat (XZ) geometry.

use bevy::prelude::*;

use crate::ai::Phase;
use crate::config::BossConfig;

/// Flat offsets shorter than this have no usable direction.
const MIN_DIRECTION_SQ: f32 = 0.001;

/// Direction from `from` to `to` projected on the ground plane.
pub fn flat_direction(from: Vec3, to: Vec3) -> Option<Vec3> {
    let mut offset = to - from;
    offset.y = 0.0;

    if offset.length_squared() < MIN_DIRECTION_SQ {
        None
    } else {
        Some(offset.normalize())
    }
}

/// Distance interval that gates which attack kinds are eligible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum Zone {
    /// `distance <= melee reach`
    Melee,
    /// Phase2: AoE-only band. Phase3: dead band between melee reach and ranged zone.
    Mid,
    /// Phase3 only: `[melee_range + ranged margin, preferred_range]`
    Ranged,
    /// No attack fits (includes target unavailable, distance = +inf)
    Outside,
}

/// Per-phase zone edges.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZoneBounds {
    pub phase: Phase,
    pub melee_reach: f32,
    pub aoe_start: f32,
    pub ranged_start: f32,
    pub outer: f32,
}

impl ZoneBounds {
    pub fn for_phase(config: &BossConfig, phase: Phase) -> Self {
        let tuning = config.phase_tuning(phase);
        Self {
            phase,
            melee_reach: config.melee_range + tuning.melee_buffer,
            aoe_start: config.melee_range + tuning.aoe_zone_margin,
            ranged_start: config.melee_range + tuning.ranged_zone_margin,
            outer: config.preferred_range,
        }
    }

    pub fn classify(&self, distance: f32) -> Zone {
        if !distance.is_finite() {
            return Zone::Outside;
        }

        if distance <= self.melee_reach {
            return Zone::Melee;
        }

        match self.phase {
            Phase::Phase1 => Zone::Outside,
            Phase::Phase2 => {
                if distance >= self.aoe_start && distance <= self.outer {
                    Zone::Mid
                } else {
                    Zone::Outside
                }
            }
            Phase::Phase3 => {
                if distance >= self.ranged_start && distance <= self.outer {
                    Zone::Ranged
                } else if distance < self.ranged_start {
                    Zone::Mid
                } else {
                    Zone::Outside
                }
            }
        }
    }
}
