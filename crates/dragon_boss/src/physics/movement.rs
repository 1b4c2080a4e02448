//! Movement executor для босса
//!
//! Архитектура:
//! - Core пишет `BossMotion.command` каждый tick (velocity + optional facing)
//! - Rapier body: `Velocity.linvel` (horizontal), rapier step интегрирует позицию
//! - Headless (без `RigidBody`): прямая интеграция velocity → Transform
//! - Facing: slerp к `facing` с `rotation_speed` (forward = -Z)
//!
//! Детерминизм: fixed timestep, те же команды → те же позы

use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

use crate::components::BossMotion;

/// Yaw rotation whose forward (-Z) points along `direction` (flattened).
pub fn facing_rotation(direction: Vec3) -> Option<Quat> {
    let flat = Vec3::new(direction.x, 0.0, direction.z).try_normalize()?;
    Some(Quat::from_rotation_y(f32::atan2(-flat.x, -flat.z)))
}

/// Система: BossMotion → rapier Velocity + поворот
///
/// Y velocity остается (gravity handling, rapier).
pub fn apply_boss_motion(
    mut query: Query<(&BossMotion, &mut Transform, Option<&mut Velocity>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (motion, mut transform, velocity) in query.iter_mut() {
        if let Some(mut velocity) = velocity {
            let desired = motion.command.velocity;
            velocity.linvel = Vec3::new(desired.x, velocity.linvel.y, desired.z);
        }

        if let Some(target) = motion.command.facing.and_then(facing_rotation) {
            let t = (motion.rotation_speed * delta).clamp(0.0, 1.0);
            transform.rotation = transform.rotation.slerp(target, t);
        }
    }
}

/// Система интеграции velocity → Transform (headless режим, без Rapier)
pub fn integrate_headless_motion(
    mut query: Query<(&BossMotion, &mut Transform), Without<RigidBody>>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (motion, mut transform) in query.iter_mut() {
        transform.translation += motion.command.velocity * delta;
    }
}

/// Rapier body для босса (kinematic, velocity-based)
///
/// Тело двигает rapier step; `integrate_headless_motion` такие entity пропускает.
pub fn insert_boss_body(commands: &mut Commands, boss: Entity) {
    commands.entity(boss).insert((
        RigidBody::KinematicVelocityBased,
        Collider::capsule_y(1.0, 1.2),
        Velocity::default(),
    ));
}
