//! Health pool, target marker, hit receiver

use bevy::prelude::*;

/// Health pool.
///
/// Invariant: `0 ≤ current ≤ max`
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    /// `current / max` (0 for a degenerate pool).
    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            0.0
        } else {
            self.current / self.max
        }
    }

    /// Subtract and clamp into `[0, max]`. Non-positive amounts are ignored.
    pub fn take_damage(&mut self, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        self.current = (self.current - amount).clamp(0.0, self.max);
    }
}

/// Opposing agent the boss hunts (player). Needs `Health` + `Transform`.
#[derive(Component, Debug, Clone, Copy, Default, Reflect)]
#[reflect(Component)]
#[require(Health, Transform)]
pub struct BossTarget;

/// Turns weapon contacts into boss damage, at most one per `hit_cooldown`.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct HitReceiver {
    pub damage_per_hit: f32,
    pub hit_cooldown: f32,
    /// Clock of the last accepted contact
    pub last_hit: Option<f32>,
}

impl HitReceiver {
    pub fn new(damage_per_hit: f32, hit_cooldown: f32) -> Self {
        Self {
            damage_per_hit,
            hit_cooldown,
            last_hit: None,
        }
    }

    /// Accept a contact at `now`? Records it when accepted.
    pub fn accept(&mut self, now: f32) -> Option<f32> {
        if let Some(last) = self.last_hit {
            if now < last + self.hit_cooldown {
                return None;
            }
        }

        self.last_hit = Some(now);
        Some(self.damage_per_hit)
    }
}
