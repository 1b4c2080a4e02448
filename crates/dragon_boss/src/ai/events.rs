//! Boss signals and ECS events
//!
//! Architecture: the core never calls presentation code directly.
//! - Core → host: `BossSignal` values queued in the director's outbox (fire-and-forget)
//! - Host → core: `BossDamaged` / `BossStruck` events, read by `apply_boss_damage` / `receive_boss_hits`
//! - Core → world: `TargetHit` after the effect resolver damaged a target

use bevy::prelude::*;

use super::phase::Phase;

/// Animation triggers. Never queried for completion: stage timing is owned by the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AnimationTrigger {
    BasicAttack,
    ClawAttack,
    AoEAttack,
    RangedAttack,
    StrafeLeft,
    StrafeRight,
    StrafeBack,
    Defend,
    Die,
}

/// Outgoing notification from the boss core.
#[derive(Debug, Clone, Copy, PartialEq, Reflect)]
pub enum BossSignal {
    Animation(AnimationTrigger),

    /// Phase policy entered (phase index for observers / animator)
    PhaseEntered(Phase),

    /// Ask pathfinding for a route toward the target
    PathRequested { destination: Vec3 },

    /// Projectile launcher: fire from `origin` along `direction` (normalized)
    ProjectileLaunched { origin: Vec3, direction: Vec3 },

    /// Health display
    HealthMaxSet(f32),
    HealthChanged { current: f32, max: f32 },

    DefensiveStarted,
    DefensiveEnded,

    /// Fired exactly once
    Died,
}

/// Damage dealt to a boss by the world (player weapon, hazard...).
#[derive(Event, Debug, Clone, Copy)]
pub struct BossDamaged {
    pub boss: Entity,
    pub amount: f32,
}

/// Weapon contact on a boss hurtbox; converted to damage by its `HitReceiver`.
#[derive(Event, Debug, Clone, Copy)]
pub struct BossStruck {
    pub boss: Entity,
}

/// `BossSignal` forwarded into the ECS.
#[derive(Event, Debug, Clone, Copy)]
pub struct BossSignalEvent {
    pub boss: Entity,
    pub signal: BossSignal,
}

/// A boss attack damaged a target.
#[derive(Event, Debug, Clone, Copy)]
pub struct TargetHit {
    pub boss: Entity,
    pub target: Entity,
    pub damage: f32,
    /// Knockback impulse (direction × force)
    pub knockback: Vec3,
}
