//! Combat module: boss attacks
//!
//! Core responsibilities:
//! - AttackSubsystem: stage sequencing (windup → effect → recovery), cooldowns, movement lock
//! - RangedSubAttack: fireball spawn/end delays + own cooldown
//!
//! World responsibilities (through `EffectResolver`):
//! - Spatial query + damage application, at most one target per attack
//! - Projectile flight (fire-and-forget `ProjectileLaunched` signal)

pub mod attack;
pub mod damage;
pub mod ranged;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod attack_tests;

// Re-export основных типов
pub use attack::{AttackInstance, AttackKind, AttackStage, AttackSubsystem, CooldownSet, MeleeVariant};
pub use damage::{first_in_volume, AreaHit, EffectResolver, TargetQuery, TargetQueryResolver};
pub use ranged::{RangedProgress, RangedStage, RangedSubAttack};
