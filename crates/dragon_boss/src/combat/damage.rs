//! Attack effect resolution
//!
//! Layout:
//! - Core: `AttackSubsystem` builds an `AreaHit` when a windup elapses
//! - Resolver: spatial query + damage application (ECS query, test recorder...)
//! - Rule: **at most one target per attack** (first in resolver order)

use bevy::prelude::*;

use crate::ai::events::TargetHit;
use crate::components::{BossTarget, Health};
use crate::shared::flat_direction;

use super::attack::AttackKind;

/// Hit volume of one attack effect (sphere).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AreaHit {
    pub kind: AttackKind,
    /// Position of the attacking boss
    pub source: Vec3,
    pub origin: Vec3,
    pub radius: f32,
    pub damage: f32,
    /// Impulse strength, applied away from `source`
    pub knockback: f32,
}

impl AreaHit {
    pub fn contains(&self, point: Vec3) -> bool {
        self.origin.distance_squared(point) <= self.radius * self.radius
    }

    /// Flat knockback impulse pushing a target at `point` away from the boss (zero when standing
    /// on the boss).
    pub fn knockback_toward(&self, point: Vec3) -> Vec3 {
        flat_direction(self.source, point).map_or(Vec3::ZERO, |dir| dir * self.knockback)
    }
}

/// Applies attack effects to the world.
pub trait EffectResolver {
    /// Damage the first eligible target inside `hit`. Returns `true` if one target was damaged.
    fn apply_area_damage(&mut self, hit: &AreaHit) -> bool;
}

/// Lowest entity index inside the volume.
///
/// Query iteration order is not stable across archetype moves, so the first target is defined
/// by entity index.
pub fn first_in_volume(
    hit: &AreaHit,
    candidates: impl IntoIterator<Item = (Entity, Vec3)>,
) -> Option<(Entity, Vec3)> {
    candidates
        .into_iter()
        .filter(|(_, position)| hit.contains(*position))
        .min_by_key(|(entity, _)| entity.index())
}

/// Boss-target query type used by `TargetQueryResolver`.
pub type TargetQuery<'w, 's> = Query<
    'w,
    's,
    (Entity, &'static Transform, &'static mut Health),
    (With<BossTarget>, Without<crate::ai::BossBrain>),
>;

/// ECS resolver: sphere overlap over alive `BossTarget`s.
///
/// Damage is applied immediately; `TargetHit` events are collected in `hits` and written by the
/// calling system.
pub struct TargetQueryResolver<'q, 'w, 's> {
    pub boss: Entity,
    pub targets: &'q mut TargetQuery<'w, 's>,
    pub hits: Vec<TargetHit>,
}

impl<'q, 'w, 's> TargetQueryResolver<'q, 'w, 's> {
    pub fn new(boss: Entity, targets: &'q mut TargetQuery<'w, 's>) -> Self {
        Self {
            boss,
            targets,
            hits: Vec::new(),
        }
    }
}

impl EffectResolver for TargetQueryResolver<'_, '_, '_> {
    fn apply_area_damage(&mut self, hit: &AreaHit) -> bool {
        let candidates = self
            .targets
            .iter()
            .filter(|(_, _, health)| health.is_alive())
            .map(|(entity, transform, _)| (entity, transform.translation));

        let Some((target, position)) = first_in_volume(hit, candidates) else {
            return false;
        };

        let Ok((_, _, mut health)) = self.targets.get_mut(target) else {
            return false;
        };

        health.take_damage(hit.damage);

        crate::log(&format!(
            "💥 {:?} hit {:?} for {} (health: {}/{})",
            hit.kind, target, hit.damage, health.current, health.max
        ));

        self.hits.push(TargetHit {
            boss: self.boss,
            target,
            damage: hit.damage,
            knockback: hit.knockback_toward(position),
        });

        true
    }
}
