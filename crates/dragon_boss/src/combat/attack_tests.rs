//! Tests for the attack subsystem (stage timing, cooldowns, commitment).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::attack::{AttackKind, AttackStage, AttackSubsystem, MeleeVariant};
    use super::super::damage::{AreaHit, EffectResolver};
    use crate::ai::events::{AnimationTrigger, BossSignal};
    use crate::config::{AttackTuning, RangedTuning};
    use crate::shared::{ScriptedRolls, Senses};

    const DT: f32 = 0.1;

    #[derive(Default)]
    struct RecordingResolver {
        hits: Vec<AreaHit>,
    }

    impl EffectResolver for RecordingResolver {
        fn apply_area_damage(&mut self, hit: &AreaHit) -> bool {
            self.hits.push(*hit);
            true
        }
    }

    fn subsystem() -> AttackSubsystem {
        AttackSubsystem::new(AttackTuning::default(), RangedTuning::default())
    }

    /// Boss at origin facing -Z, target `distance` ahead.
    fn senses_at(now: f32, distance: f32) -> Senses {
        Senses::sample(now, Vec3::ZERO, Vec3::NEG_Z, &Vec3::new(0.0, 0.0, -distance))
    }

    /// Commit at t=0, run the commit tick, return the tick index (1-based) of the first effect.
    fn ticks_until_effect(attack: &mut AttackSubsystem, resolver: &mut RecordingResolver) -> Option<u32> {
        let mut signals = Vec::new();
        attack.tick(DT, &senses_at(0.0, 3.0), resolver, &mut signals);

        for i in 1..=40 {
            attack.tick(DT, &senses_at(i as f32 * DT, 3.0), resolver, &mut signals);
            if !resolver.hits.is_empty() {
                return Some(i);
            }
        }
        None
    }

    #[test]
    fn test_basic_melee_effect_on_eighth_tick() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.2]);

        attack.commit(AttackKind::Melee, &senses_at(0.0, 3.0), 1.0, &mut rolls, &mut signals);
        assert_eq!(signals, vec![BossSignal::Animation(AnimationTrigger::BasicAttack)]);
        assert_eq!(attack.current().and_then(|a| a.variant), Some(MeleeVariant::Basic));

        assert_eq!(ticks_until_effect(&mut attack, &mut resolver), Some(8));
        assert_eq!(resolver.hits.len(), 1);

        let hit = resolver.hits[0];
        assert_eq!(hit.kind, AttackKind::Melee);
        assert_eq!(hit.origin, Vec3::new(0.0, 0.0, -2.5));
        assert_eq!(hit.radius, 2.0);
        assert_eq!(attack.current().map(|a| a.stage), Some(AttackStage::Recovery));
        assert!(attack.locks_movement());
    }

    #[test]
    fn test_claw_windup_scaled_by_phase() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.7]);

        // 1.65 × 1.4 = 2.31s → 24th tick
        attack.commit(AttackKind::Melee, &senses_at(0.0, 3.0), 1.4, &mut rolls, &mut signals);
        assert_eq!(signals, vec![BossSignal::Animation(AnimationTrigger::ClawAttack)]);
        assert_eq!(ticks_until_effect(&mut attack, &mut resolver), Some(24));
    }

    #[test]
    fn test_aoe_has_no_variant_roll() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([]);

        attack.commit(AttackKind::AoE, &senses_at(0.0, 3.0), 1.0, &mut rolls, &mut signals);
        assert_eq!(rolls.consumed(), 0);
        assert_eq!(signals, vec![BossSignal::Animation(AnimationTrigger::AoEAttack)]);

        // 1.2s windup
        assert_eq!(ticks_until_effect(&mut attack, &mut resolver), Some(12));
        assert_eq!(resolver.hits[0].origin, Vec3::ZERO);
        assert_eq!(resolver.hits[0].radius, 4.0);
        assert_eq!(resolver.hits[0].damage, 2.0);
    }

    #[test]
    fn test_cooldown_starts_at_completion() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.2]);

        attack.commit(AttackKind::Melee, &senses_at(0.0, 3.0), 1.0, &mut rolls, &mut signals);
        attack.tick(DT, &senses_at(0.0, 3.0), &mut resolver, &mut signals);

        // windup 0.8 + recovery 0.2 → completes on tick 10 (t = 1.0)
        let mut now = 0.0;
        let mut i = 0;
        while attack.is_attacking() {
            i += 1;
            now = i as f32 * DT;
            assert!(!attack.can_commit(AttackKind::Melee, &senses_at(now, 3.0)));
            attack.tick(DT, &senses_at(now, 3.0), &mut resolver, &mut signals);
        }
        assert_eq!(i, 10);
        assert_eq!(attack.completed_count(), 1);

        let next = attack.cooldowns().next_available(AttackKind::Melee);
        assert!((next - (now + 2.0)).abs() < 1e-5);

        // Closed on [completion, next_available), open at exactly next_available
        assert!(!attack.can_commit(AttackKind::Melee, &senses_at(now, 3.0)));
        assert!(!attack.can_commit(AttackKind::Melee, &senses_at(next - 0.01, 3.0)));
        assert!(attack.can_commit(AttackKind::Melee, &senses_at(next, 3.0)));

        // Other kinds were never gated by the melee cooldown
        assert!(attack.can_commit(AttackKind::AoE, &senses_at(now, 3.0)));
    }

    #[test]
    fn test_commit_while_attacking_is_silent_noop() {
        let mut attack = subsystem();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.2, 0.2]);

        attack.commit(AttackKind::Melee, &senses_at(0.0, 3.0), 1.0, &mut rolls, &mut signals);
        let before = *attack.current().expect("committed");

        assert!(!attack.can_commit(AttackKind::AoE, &senses_at(0.0, 3.0)));
        attack.commit(AttackKind::AoE, &senses_at(0.0, 3.0), 1.0, &mut rolls, &mut signals);

        assert_eq!(*attack.current().expect("still committed"), before);
        assert_eq!(signals.len(), 1);
        assert_eq!(rolls.consumed(), 1);
    }

    #[test]
    fn test_ranged_needs_cast_range() {
        let attack = subsystem();
        assert!(attack.can_commit(AttackKind::Ranged, &senses_at(0.0, 15.0)));
        assert!(!attack.can_commit(AttackKind::Ranged, &senses_at(0.0, 25.0)));

        let no_target = Senses::sample(0.0, Vec3::ZERO, Vec3::NEG_Z, &None::<Vec3>);
        assert!(!attack.can_commit(AttackKind::Ranged, &no_target));
    }

    #[test]
    fn test_ranged_full_sequence() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([]);

        attack.commit(AttackKind::Ranged, &senses_at(0.0, 9.0), 1.4, &mut rolls, &mut signals);
        assert_eq!(signals, vec![BossSignal::Animation(AnimationTrigger::RangedAttack)]);
        attack.tick(DT, &senses_at(0.0, 9.0), &mut resolver, &mut signals);

        // spawn 0.6 → launch on tick 6; end 0.6 → release on tick 12; post-lock 0.2 → done on tick 14
        let mut launched_at = None;
        let mut i = 0;
        while attack.is_attacking() && i < 40 {
            i += 1;
            attack.tick(DT, &senses_at(i as f32 * DT, 9.0), &mut resolver, &mut signals);
            if launched_at.is_none()
                && signals
                    .iter()
                    .any(|s| matches!(s, BossSignal::ProjectileLaunched { .. }))
            {
                launched_at = Some(i);
                assert_eq!(attack.current().map(|a| a.stage), Some(AttackStage::Recovery));
            }
        }

        assert_eq!(launched_at, Some(6));
        assert_eq!(i, 14);
        assert!(resolver.hits.is_empty());

        // Wrapper cooldown 2.5 from completion; sub-attack cooldown 4.0 from release
        let now = i as f32 * DT;
        let next = attack.cooldowns().next_available(AttackKind::Ranged);
        assert!((next - (now + 2.5)).abs() < 1e-5);
        assert!(attack.ranged().is_on_cooldown());
        assert!(!attack.can_commit(AttackKind::Ranged, &senses_at(next, 9.0)));
    }

    #[test]
    fn test_commit_tick_skipped_under_frozen_clock() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.2]);

        // Clock never advances: the stage timers still run on dt
        let frozen = senses_at(0.0, 3.0);
        attack.commit(AttackKind::Melee, &frozen, 1.0, &mut rolls, &mut signals);

        let mut released_at = None;
        for i in 1..=30 {
            attack.tick(DT, &frozen, &mut resolver, &mut signals);
            if i == 9 {
                assert_eq!(resolver.hits.len(), 1);
            }
            if released_at.is_none() && !attack.is_attacking() {
                released_at = Some(i);
            }
        }

        // 1 commit tick + 8 windup → effect; 2 recovery → release
        assert_eq!(resolver.hits.len(), 1);
        assert_eq!(released_at, Some(11));
        assert!(!attack.locks_movement());
        assert_eq!(attack.completed_count(), 1);
        assert!((attack.cooldowns().next_available(AttackKind::Melee) - 2.0).abs() < 1e-5);
    }

    #[test]
    fn test_hit_carries_boss_position() {
        let mut attack = subsystem();
        let mut resolver = RecordingResolver::default();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.2]);

        let boss = Vec3::new(1.0, 0.0, 0.0);
        let senses = |now: f32| Senses::sample(now, boss, Vec3::NEG_Z, &Vec3::new(1.0, 0.0, -3.0));

        attack.commit(AttackKind::Melee, &senses(0.0), 1.0, &mut rolls, &mut signals);
        for i in 0..=8 {
            attack.tick(DT, &senses(i as f32 * DT), &mut resolver, &mut signals);
        }

        assert_eq!(resolver.hits.len(), 1);
        let hit = resolver.hits[0];
        assert_eq!(hit.source, boss);
        assert!((hit.origin - Vec3::new(1.0, 0.0, -2.5)).length() < 1e-5);
        // Target past the hit point: pushed away from the boss
        let push = hit.knockback_toward(Vec3::new(1.0, 0.0, -3.0));
        assert!(push.z < 0.0 && push.x.abs() < 1e-5);
    }

    #[test]
    fn test_abort_releases_lock() {
        let mut attack = subsystem();
        let mut signals = Vec::new();
        let mut rolls = ScriptedRolls::new([0.2]);

        attack.commit(AttackKind::Melee, &senses_at(0.0, 3.0), 1.0, &mut rolls, &mut signals);
        attack.abort();
        assert!(!attack.locks_movement());
        assert_eq!(attack.completed_count(), 0);
    }
}
