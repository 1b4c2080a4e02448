//! ECS shell around `BossDirector`.
//!
//! Order (FixedUpdate, chained):
//! 1. receive_boss_hits: weapon contacts → rate-limited `BossDamaged`
//! 2. apply_boss_damage: `BossDamaged` → `BossDirector::apply_damage`
//! 3. tick_boss_brains: senses → director tick → motion + signals + target hits

use bevy::prelude::*;

use crate::combat::{TargetQuery, TargetQueryResolver};
use crate::components::{BossMotion, HitReceiver};
use crate::shared::Senses;

use super::director::BossDirector;
use super::events::{BossDamaged, BossSignalEvent, BossStruck, TargetHit};

/// Boss decision core attached to an entity.
#[derive(Component, Debug)]
#[require(BossMotion, Transform)]
pub struct BossBrain(pub BossDirector);

/// System: weapon contacts → `BossDamaged` (one per `hit_cooldown`)
pub fn receive_boss_hits(
    mut struck_events: EventReader<BossStruck>,
    mut damaged_events: EventWriter<BossDamaged>,
    mut receivers: Query<&mut HitReceiver>,
    time: Res<Time<Fixed>>,
) {
    let now = time.elapsed_secs();

    for struck in struck_events.read() {
        let Ok(mut receiver) = receivers.get_mut(struck.boss) else {
            continue;
        };

        if let Some(amount) = receiver.accept(now) {
            damaged_events.write(BossDamaged {
                boss: struck.boss,
                amount,
            });
        }
    }
}

/// System: `BossDamaged` → director
pub fn apply_boss_damage(mut damage_events: EventReader<BossDamaged>, mut brains: Query<&mut BossBrain>) {
    for damage in damage_events.read() {
        let Ok(mut brain) = brains.get_mut(damage.boss) else {
            crate::log_warning(&format!("BossDamaged: {:?} has no BossBrain", damage.boss));
            continue;
        };

        brain.0.apply_damage(damage.amount);
    }
}

/// System: one director tick per boss
///
/// Target locator = nearest alive `BossTarget`. The effect resolver damages targets in place;
/// queued signals (also those from `apply_boss_damage`) are forwarded as `BossSignalEvent`.
pub fn tick_boss_brains(
    mut bosses: Query<(Entity, &mut BossBrain, &Transform, &mut BossMotion)>,
    mut targets: TargetQuery,
    mut signal_events: EventWriter<BossSignalEvent>,
    mut hit_events: EventWriter<TargetHit>,
    time: Res<Time<Fixed>>,
) {
    let dt = time.delta_secs();
    let now = time.elapsed_secs();

    for (boss, mut brain, transform, mut motion) in bosses.iter_mut() {
        let target = nearest_target(transform.translation, &targets);
        let senses = Senses::sample(now, transform.translation, transform.forward().as_vec3(), &target);

        let mut resolver = TargetQueryResolver::new(boss, &mut targets);
        brain.0.tick(dt, &senses, &mut resolver);

        for hit in resolver.hits {
            hit_events.write(hit);
        }

        motion.command = brain.0.motion();

        for signal in brain.0.drain_signals() {
            signal_events.write(BossSignalEvent { boss, signal });
        }
    }
}

/// Nearest alive target (ties: lowest entity index).
fn nearest_target(origin: Vec3, targets: &TargetQuery) -> Option<Vec3> {
    targets
        .iter()
        .filter(|(_, _, health)| health.is_alive())
        .map(|(entity, transform, _)| (entity, transform.translation))
        .min_by(|(a, a_pos), (b, b_pos)| {
            origin
                .distance_squared(*a_pos)
                .total_cmp(&origin.distance_squared(*b_pos))
                .then(a.index().cmp(&b.index()))
        })
        .map(|(_, position)| position)
}
