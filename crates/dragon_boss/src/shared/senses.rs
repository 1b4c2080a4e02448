//! Per-tick view of the world handed to the core.

use bevy::prelude::*;

use super::zones::flat_direction;

/// Resolves the opposing agent's position. `None` = unavailable (despawned, not spawned yet...).
pub trait TargetLocator {
    fn target_position(&self) -> Option<Vec3>;
}

impl TargetLocator for Option<Vec3> {
    fn target_position(&self) -> Option<Vec3> {
        *self
    }
}

impl TargetLocator for Vec3 {
    fn target_position(&self) -> Option<Vec3> {
        Some(*self)
    }
}

/// Snapshot for one tick: clock, own pose, target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Senses {
    /// Monotonic clock (seconds)
    pub now: f32,
    pub position: Vec3,
    /// Current facing (flat, normalized; -Z when degenerate)
    pub forward: Vec3,
    pub target: Option<Vec3>,
}

impl Senses {
    pub fn sample(now: f32, position: Vec3, forward: Vec3, locator: &dyn TargetLocator) -> Self {
        let mut flat_forward = forward;
        flat_forward.y = 0.0;

        Self {
            now,
            position,
            forward: flat_forward.try_normalize().unwrap_or(Vec3::NEG_Z),
            target: locator.target_position(),
        }
    }

    /// `+inf` when the target is unavailable.
    pub fn distance_to_target(&self) -> f32 {
        match self.target {
            Some(target) => self.position.distance(target),
            None => f32::INFINITY,
        }
    }

    /// Flat direction toward the target (`None` if unavailable or standing on it).
    pub fn direction_to_target(&self) -> Option<Vec3> {
        self.target.and_then(|target| flat_direction(self.position, target))
    }

    /// Point in front of the boss (melee point, fire point...).
    pub fn point_ahead(&self, forward_offset: f32, height: f32) -> Vec3 {
        self.position + self.forward * forward_offset + Vec3::Y * height
    }
}
