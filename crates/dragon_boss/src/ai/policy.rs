//! Phase policies: movement mode + zone/roll attack selection.
//!
//! One `PhasePolicy` value per active phase; the variant-specific part is a match on `Phase`
//! inside `select_attack`. The shared prelude (phase re-evaluation) lives in the director.

use bevy::prelude::*;

use crate::combat::{AttackKind, AttackSubsystem};
use crate::config::{BossConfig, PhaseTuning};
use crate::movement::EvasionSubsystem;
use crate::shared::{RollSource, Senses, Zone, ZoneBounds};

use super::events::BossSignal;
use super::phase::Phase;

/// Borrowed view of everything a policy tick may touch.
pub struct PolicyContext<'a> {
    pub config: &'a BossConfig,
    pub senses: &'a Senses,
    pub attack: &'a mut AttackSubsystem,
    pub evasion: &'a mut EvasionSubsystem,
    pub rolls: &'a mut dyn RollSource,
    pub signals: &'a mut Vec<BossSignal>,
}

/// What the policy decided this tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyOutput {
    pub zone: Zone,
    /// Approach velocity (zero while holding)
    pub velocity: Vec3,
    pub committed: Option<AttackKind>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PhasePolicy {
    phase: Phase,
    /// Counts down while no attack is committed; selection runs at `<= 0`
    attack_timer: f32,
    /// Path request waiting for an available target
    path_pending: bool,
}

impl PhasePolicy {
    pub fn new(phase: Phase) -> Self {
        Self {
            phase,
            attack_timer: 0.0,
            path_pending: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn attack_timer(&self) -> f32 {
        self.attack_timer
    }

    /// Phase speed / stop distance → evasion, phase index → observers, approach path request.
    pub fn enter(&mut self, config: &BossConfig, evasion: &mut EvasionSubsystem, signals: &mut Vec<BossSignal>) {
        let tuning = config.phase_tuning(self.phase);

        self.attack_timer = 0.0;
        self.path_pending = true;
        evasion.set_phase_motion(tuning.move_speed, tuning.stop_distance);
        signals.push(BossSignal::PhaseEntered(self.phase));

        crate::log_info(&format!(
            "🐉 Enter {:?} (speed {:.1}, stop {:.1})",
            self.phase, tuning.move_speed, tuning.stop_distance
        ));
    }

    pub fn exit(&mut self) {
        self.path_pending = false;
        crate::log(&format!("🐉 Exit {:?}", self.phase));
    }

    pub fn tick(&mut self, dt: f32, ctx: &mut PolicyContext) -> PolicyOutput {
        let config = ctx.config;
        let senses = ctx.senses;
        let tuning = config.phase_tuning(self.phase);
        let distance = senses.distance_to_target();
        let zone = ZoneBounds::for_phase(config, self.phase).classify(distance);

        if self.path_pending {
            if let Some(destination) = senses.target {
                ctx.signals.push(BossSignal::PathRequested { destination });
                self.path_pending = false;
            }
        }

        // 1. Movement: approach outside stop distance, else hold (+ evasion chance)
        let velocity = if distance > tuning.stop_distance {
            senses
                .direction_to_target()
                .map_or(Vec3::ZERO, |dir| dir * tuning.move_speed)
        } else {
            let eligible = senses.target.is_some() && !ctx.attack.is_attacking() && ctx.evasion.can_start();
            if eligible && ctx.rolls.roll() < tuning.evasion_chance {
                ctx.evasion.try_start(distance, ctx.rolls, ctx.signals);
            }
            Vec3::ZERO
        };

        // 2. Attack selection
        let mut committed = None;
        if !ctx.attack.is_attacking() {
            self.attack_timer -= dt;
            if self.attack_timer <= 0.0 {
                committed = self.select_attack(zone, tuning, ctx);
            }
        }

        PolicyOutput {
            zone,
            velocity,
            committed,
        }
    }

    fn select_attack(&mut self, zone: Zone, tuning: &PhaseTuning, ctx: &mut PolicyContext) -> Option<AttackKind> {
        let senses = ctx.senses;
        let attack = &*ctx.attack;
        let can = |kind: AttackKind| attack.can_commit(kind, senses);

        let choice = match (self.phase, zone) {
            (Phase::Phase1, Zone::Melee) => {
                if can(AttackKind::Melee) {
                    Some(AttackKind::Melee)
                } else {
                    None
                }
            }
            // Re-evaluated every tick until the target walks into reach
            (Phase::Phase1, _) => return None,

            (Phase::Phase2 | Phase::Phase3, Zone::Melee) if can(AttackKind::Melee) => {
                if ctx.rolls.roll() < tuning.melee_chance || !can(AttackKind::AoE) {
                    Some(AttackKind::Melee)
                } else {
                    Some(AttackKind::AoE)
                }
            }
            (Phase::Phase2, Zone::Mid) if can(AttackKind::AoE) => Some(AttackKind::AoE),
            (Phase::Phase3, Zone::Ranged) => {
                if can(AttackKind::Ranged) {
                    Some(AttackKind::Ranged)
                } else if can(AttackKind::AoE) && ctx.rolls.roll() < tuning.ranged_zone_aoe_chance {
                    Some(AttackKind::AoE)
                } else {
                    None
                }
            }
            _ => None,
        };

        let Some(kind) = choice else {
            if self.phase != Phase::Phase1 {
                self.attack_timer = tuning.rethink_delay;
            }
            return None;
        };

        ctx.attack
            .commit(kind, senses, tuning.windup_multiplier, ctx.rolls, ctx.signals);

        self.attack_timer = match kind {
            AttackKind::Melee => tuning.melee_cadence,
            AttackKind::AoE => tuning.aoe_cadence,
            AttackKind::Ranged => tuning.ranged_cadence,
        };

        Some(kind)
    }
}
