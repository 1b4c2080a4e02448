//! Boss AI module
//!
//! Phase director (Phase1/2/3 + defensive override) over the attack and evasion subsystems.
//!
//! Layout:
//! - Core (`director`, `policy`, `phase`): plain Rust, owned by value, ticked with explicit `dt`
//! - ECS shell (`systems`): `BossBrain` component, events in / signals out

use bevy::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::components::{BossMotion, HitReceiver, MotionCommand};
use crate::config::{BossConfig, ConfigError};

pub mod director;
pub mod events;
pub mod phase;
pub mod policy;
pub mod systems;

// Tests (separate files with _tests suffix)
#[cfg(test)]
mod director_tests;

// Re-export основных типов
pub use director::{BossDirector, DefensiveCause, DirectorMode};
pub use events::{AnimationTrigger, BossDamaged, BossSignal, BossSignalEvent, BossStruck, TargetHit};
pub use phase::Phase;
pub use policy::{PhasePolicy, PolicyContext, PolicyOutput};
pub use systems::BossBrain;

/// Boss AI Plugin
///
/// Регистрирует события и системы в FixedUpdate для детерминизма.
/// Порядок выполнения:
/// 1. receive_boss_hits: weapon contacts → BossDamaged
/// 2. apply_boss_damage: BossDamaged → director health
/// 3. tick_boss_brains: director tick → BossMotion, BossSignalEvent, TargetHit
/// 4. apply_boss_motion: BossMotion → rapier Velocity + facing
/// 5. integrate_headless_motion: bodies without RigidBody (headless / tests)
pub struct BossAiPlugin;

impl Plugin for BossAiPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<BossDamaged>()
            .add_event::<BossStruck>()
            .add_event::<BossSignalEvent>()
            .add_event::<TargetHit>();

        app.add_systems(
            FixedUpdate,
            (
                systems::receive_boss_hits,
                systems::apply_boss_damage,
                systems::tick_boss_brains,
                crate::physics::apply_boss_motion,
                crate::physics::integrate_headless_motion,
            )
                .chain(), // Последовательное выполнение для детерминизма
        );
    }
}

/// Spawn a boss at `position`. Rolls come from a `ChaCha8Rng` seeded with `seed`.
pub fn spawn_boss(
    commands: &mut Commands,
    config: BossConfig,
    position: Vec3,
    seed: u64,
) -> Result<Entity, ConfigError> {
    config.validate()?;

    let motion = BossMotion {
        command: MotionCommand::HOLD,
        rotation_speed: config.rotation_speed,
    };
    let receiver = HitReceiver::new(config.damage_per_hit, config.hit_cooldown);
    let director = BossDirector::new(config, Box::new(ChaCha8Rng::seed_from_u64(seed)));

    let entity = commands
        .spawn((
            BossBrain(director),
            motion,
            receiver,
            Transform::from_translation(position),
        ))
        .id();

    crate::log_info(&format!("🐉 Boss spawned: {:?} at {:?} (seed {})", entity, position, seed));

    Ok(entity)
}
