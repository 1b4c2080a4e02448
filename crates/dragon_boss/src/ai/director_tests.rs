//! Tests for the boss director (health, phases, override, motion priority).

#[cfg(test)]
mod tests {
    use bevy::prelude::*;

    use super::super::director::{BossDirector, DirectorMode};
    use super::super::events::{AnimationTrigger, BossSignal};
    use super::super::phase::Phase;
    use crate::combat::{AreaHit, AttackKind, EffectResolver};
    use crate::config::BossConfig;
    use crate::shared::{ScriptedRolls, Senses};

    const DT: f32 = 0.1;

    #[derive(Default)]
    struct CountingResolver {
        hits: Vec<AreaHit>,
    }

    impl EffectResolver for CountingResolver {
        fn apply_area_damage(&mut self, hit: &AreaHit) -> bool {
            self.hits.push(*hit);
            true
        }
    }

    struct Harness {
        director: BossDirector,
        resolver: CountingResolver,
        now: f32,
    }

    impl Harness {
        fn new(config: BossConfig, rolls: ScriptedRolls) -> Self {
            Self {
                director: BossDirector::new(config, Box::new(rolls)),
                resolver: CountingResolver::default(),
                now: 0.0,
            }
        }

        fn default_with(rolls: impl IntoIterator<Item = f32>) -> Self {
            Self::new(BossConfig::default(), ScriptedRolls::new(rolls))
        }

        /// Boss at origin facing -Z; target `distance` ahead (None = unavailable).
        fn tick(&mut self, distance: Option<f32>) {
            self.now += DT;
            let target = distance.map(|d| Vec3::new(0.0, 0.0, -d));
            let senses = Senses::sample(self.now, Vec3::ZERO, Vec3::NEG_Z, &target);
            self.director.tick(DT, &senses, &mut self.resolver);
        }

        fn ticks(&mut self, count: usize, distance: Option<f32>) {
            for _ in 0..count {
                self.tick(distance);
            }
        }

        fn count(&self, signal: BossSignal) -> usize {
            self.director.signals().iter().filter(|s| **s == signal).count()
        }
    }

    #[test]
    fn test_construction_notifies_health_and_phase() {
        let mut harness = Harness::default_with([]);

        assert_eq!(
            harness.director.signals(),
            &[
                BossSignal::HealthMaxSet(100.0),
                BossSignal::HealthChanged {
                    current: 100.0,
                    max: 100.0
                },
                BossSignal::PhaseEntered(Phase::Phase1),
            ]
        );

        harness.director.drain_signals();
        harness.tick(Some(9.0));
        assert_eq!(
            harness.director.signals().first(),
            Some(&BossSignal::PathRequested {
                destination: Vec3::new(0.0, 0.0, -9.0)
            })
        );
    }

    #[test]
    fn test_phase_follows_health_fraction() {
        let mut harness = Harness::default_with([]);
        assert_eq!(harness.director.phase(), Phase::Phase1);

        harness.director.apply_damage(40.0);
        assert_eq!(harness.director.health().current, 60.0);
        assert_eq!(harness.director.phase(), Phase::Phase2);

        harness.director.apply_damage(35.0);
        assert_eq!(harness.director.health().current, 25.0);
        assert_eq!(harness.director.phase(), Phase::Phase3);
    }

    #[test]
    fn test_policy_switch_exit_then_enter_on_next_tick() {
        let config = BossConfig {
            heavy_hit_threshold: 1000.0,
            ..BossConfig::default()
        };
        let mut harness = Harness::new(config, ScriptedRolls::new([]));
        harness.director.drain_signals();

        harness.director.apply_damage(40.0);
        assert_eq!(harness.director.policy_phase(), Phase::Phase1);

        harness.tick(Some(9.0));
        assert_eq!(harness.director.policy_phase(), Phase::Phase2);
        assert_eq!(harness.count(BossSignal::PhaseEntered(Phase::Phase2)), 1);

        // Level-triggered: no re-entry while the phase is unchanged
        harness.ticks(5, Some(9.0));
        assert_eq!(harness.count(BossSignal::PhaseEntered(Phase::Phase2)), 1);
    }

    #[test]
    fn test_heavy_hit_starts_override_in_any_phase() {
        for prior_damage in [0.0, 40.0, 70.0] {
            let config = BossConfig {
                heavy_hit_threshold: 25.0,
                max_health: 200.0,
                ..BossConfig::default()
            };
            let mut harness = Harness::new(config, ScriptedRolls::new([]));
            // spread prior damage under the heavy threshold
            let mut remaining: f32 = prior_damage;
            while remaining > 0.0 {
                harness.director.apply_damage(remaining.min(20.0));
                remaining -= 20.0;
            }
            assert!(!harness.director.is_defensive());

            harness.director.drain_signals();
            harness.director.apply_damage(30.0);

            assert!(harness.director.is_defensive(), "prior damage {}", prior_damage);
            assert_eq!(harness.count(BossSignal::Animation(AnimationTrigger::Defend)), 1);
            assert_eq!(harness.count(BossSignal::DefensiveStarted), 1);
        }
    }

    #[test]
    fn test_override_holds_then_resumes_policy() {
        let mut harness = Harness::default_with([]);
        harness.director.apply_damage(30.0);
        harness.director.drain_signals();

        harness.tick(Some(9.0));
        assert!(harness.director.motion().is_holding());
        // Still turning toward the target
        assert_eq!(harness.director.motion().facing, Some(Vec3::NEG_Z));

        // Re-trigger while active is ignored
        harness.director.apply_damage(30.0);
        assert_eq!(harness.count(BossSignal::DefensiveStarted), 0);

        // defensive_duration 2.0 → 20 ticks total
        harness.ticks(18, Some(9.0));
        assert!(harness.director.is_defensive());
        harness.tick(Some(9.0));
        assert_eq!(harness.director.mode(), DirectorMode::Active);
        assert_eq!(harness.count(BossSignal::DefensiveEnded), 1);
        assert_eq!(harness.count(BossSignal::PhaseEntered(Phase::Phase1)), 1);

        // Health 40% → Phase2 on the next tick; 12m is outside every Phase2 zone, so it walks
        harness.tick(Some(12.0));
        assert_eq!(harness.director.policy_phase(), Phase::Phase2);
        assert!(!harness.director.motion().is_holding());
    }

    #[test]
    fn test_punish_close_dwelling() {
        let mut harness = Harness::default_with([]);

        harness.ticks(19, Some(1.0));
        assert!(!harness.director.is_defensive());
        assert!(harness.director.close_timer() > 1.8);

        harness.ticks(2, Some(1.0));
        assert!(harness.director.is_defensive());
        assert_eq!(harness.director.close_timer(), 0.0);
    }

    #[test]
    fn test_punish_timer_resets_when_target_leaves() {
        let mut harness = Harness::default_with([]);

        harness.ticks(15, Some(1.0));
        harness.tick(Some(3.0));
        assert_eq!(harness.director.close_timer(), 0.0);
        harness.ticks(15, Some(1.0));
        assert!(!harness.director.is_defensive());
    }

    #[test]
    fn test_punish_can_be_disabled() {
        let config = BossConfig {
            punish_enabled: false,
            ..BossConfig::default()
        };
        let mut harness = Harness::new(config, ScriptedRolls::new([]));
        harness.ticks(40, Some(1.0));
        assert!(!harness.director.is_defensive());
    }

    #[test]
    fn test_override_does_not_cancel_committed_attack() {
        // evasion roll 0.9 (no), melee variant 0.2 → basic
        let mut harness = Harness::default_with([0.9, 0.2]);
        harness.tick(Some(3.0));
        assert_eq!(
            harness.director.attack().current().map(|a| a.kind),
            Some(AttackKind::Melee)
        );

        harness.director.apply_damage(30.0);
        assert!(harness.director.is_defensive());

        // windup 0.8 + recovery 0.2
        harness.ticks(10, Some(3.0));
        assert_eq!(harness.resolver.hits.len(), 1);
        assert_eq!(harness.director.attack().completed_count(), 1);
        assert!(harness.director.is_defensive());
    }

    #[test]
    fn test_death_is_terminal_and_fires_once() {
        let mut harness = Harness::default_with([]);
        harness.tick(Some(9.0));
        harness.director.drain_signals();

        harness.director.apply_damage(150.0);
        assert!(harness.director.is_dead());
        assert_eq!(harness.director.health().current, 0.0);
        assert!(harness.director.motion().is_holding());
        assert_eq!(harness.count(BossSignal::Died), 1);
        assert_eq!(harness.count(BossSignal::Animation(AnimationTrigger::Die)), 1);
        // A killing blow never starts the override
        assert_eq!(harness.count(BossSignal::DefensiveStarted), 0);

        harness.director.drain_signals();
        harness.director.apply_damage(10.0);
        harness.ticks(10, Some(2.0));
        assert!(harness.director.signals().is_empty());
        assert_eq!(harness.director.health().current, 0.0);
        assert!(harness.director.motion().is_holding());
    }

    #[test]
    fn test_non_positive_damage_ignored() {
        let mut harness = Harness::default_with([]);
        harness.director.drain_signals();

        harness.director.apply_damage(0.0);
        harness.director.apply_damage(-5.0);
        assert_eq!(harness.director.health().current, 100.0);
        assert!(harness.director.signals().is_empty());
    }

    #[test]
    fn test_attack_lock_zeroes_motion_and_facing() {
        let mut harness = Harness::default_with([0.9, 0.2]);
        harness.tick(Some(3.0));

        assert!(harness.director.attack().locks_movement());
        let motion = harness.director.motion();
        assert_eq!(motion.velocity, Vec3::ZERO);
        assert_eq!(motion.facing, None);
    }

    #[test]
    fn test_evasion_velocity_overrides_policy() {
        // melee reach 3 → holding at 4 is outside every attack zone
        let config = BossConfig {
            melee_range: 3.0,
            ..BossConfig::default()
        };
        // evasion roll 0.1 < 0.25, close → back-off roll 0.1
        let mut harness = Harness::new(config, ScriptedRolls::new([0.1, 0.1]));
        harness.tick(Some(4.0));

        assert!(harness.director.evasion().is_active());
        let motion = harness.director.motion();
        // away from the target: speed 3 × 0.6
        assert!((motion.velocity - Vec3::new(0.0, 0.0, 1.8)).length() < 1e-5);
        assert_eq!(motion.facing, Some(Vec3::NEG_Z));
    }

    #[test]
    fn test_unavailable_target_stands_still() {
        let mut harness = Harness::default_with([]);
        harness.ticks(30, None);

        assert!(harness.director.motion().is_holding());
        assert!(!harness.director.attack().is_attacking());
        assert!(!harness.director.evasion().is_active());
    }

    #[test]
    fn test_override_stops_evasion() {
        let config = BossConfig {
            melee_range: 3.0,
            ..BossConfig::default()
        };
        let mut harness = Harness::new(config, ScriptedRolls::new([0.1, 0.1]));
        harness.tick(Some(4.0));
        assert!(harness.director.evasion().is_active());

        harness.director.apply_damage(30.0);
        assert!(!harness.director.evasion().is_active());
    }
}
