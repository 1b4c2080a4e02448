//! Motion command: what the core asks the movement executor to do

use bevy::prelude::*;

/// Horizontal speeds below this read as standing still for animation blending.
pub const LOCOMOTION_DEAD_ZONE: f32 = 0.05;

/// Desired velocity + facing for one tick.
///
/// Architecture:
/// - The core writes a `MotionCommand` every tick (high-level intent)
/// - The movement executor applies `velocity` at its own physics cadence
/// - `facing = None` means "keep current rotation" (attack lock, no target)
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub struct MotionCommand {
    pub velocity: Vec3,
    pub facing: Option<Vec3>,
}

impl Default for MotionCommand {
    fn default() -> Self {
        Self::HOLD
    }
}

impl MotionCommand {
    /// Zero velocity, no facing change.
    pub const HOLD: Self = Self {
        velocity: Vec3::ZERO,
        facing: None,
    };

    pub fn moving(velocity: Vec3) -> Self {
        Self {
            velocity,
            facing: None,
        }
    }

    pub fn with_facing(mut self, facing: Option<Vec3>) -> Self {
        self.facing = facing;
        self
    }

    pub fn is_holding(&self) -> bool {
        self.velocity == Vec3::ZERO
    }

    /// Horizontal speed for the locomotion blend parameter.
    pub fn locomotion_speed(&self) -> f32 {
        let speed = Vec3::new(self.velocity.x, 0.0, self.velocity.z).length();
        if speed < LOCOMOTION_DEAD_ZONE {
            0.0
        } else {
            speed
        }
    }
}

/// Last motion command of a boss + executor parameters.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BossMotion {
    pub command: MotionCommand,
    /// Slerp factor per second toward `command.facing`
    pub rotation_speed: f32,
}

impl Default for BossMotion {
    fn default() -> Self {
        Self {
            command: MotionCommand::HOLD,
            rotation_speed: 5.0,
        }
    }
}
