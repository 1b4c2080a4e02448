//! Attack subsystem: one committed attack at a time.
//!
//! # Stages
//!
//! 1. **Windup**: telegraph (animation trigger fired at commit)
//! 2. **Effect**: effect resolver call (instantaneous, inside the tick the windup elapses)
//! 3. **Recovery**: post-attack lock, then release + cooldown start
//!
//! Commitment is irrevocable: phase changes and the defensive override never cancel an instance.
//! The commit tick itself does not advance the windup, so an effect always resolves on a later tick.
//!
//! Cooldowns are absolute timestamps (`next_available`), set when an instance **completes**.

use bevy::prelude::*;

use crate::ai::events::{AnimationTrigger, BossSignal};
use crate::config::{AttackTuning, RangedTuning};
use crate::shared::{Countdown, RollSource, Senses};

use super::damage::{AreaHit, EffectResolver};
use super::ranged::{RangedProgress, RangedSubAttack};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum AttackKind {
    Melee,
    AoE,
    Ranged,
}

impl AttackKind {
    fn slot(self) -> usize {
        match self {
            AttackKind::Melee => 0,
            AttackKind::AoE => 1,
            AttackKind::Ranged => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackStage {
    Windup,
    Effect,
    Recovery,
}

/// Melee swing variant (50/50 roll at commit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum MeleeVariant {
    Basic,
    Claw,
}

/// Transient: created at commit, dropped when recovery elapses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackInstance {
    pub kind: AttackKind,
    pub variant: Option<MeleeVariant>,
    pub stage: AttackStage,
    pub timer: Countdown,
    /// Clock at commit
    pub committed_at: f32,
    /// Set at commit; the first tick only clears it
    pub fresh: bool,
}

/// Per-kind `next_available` timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CooldownSet {
    next_available: [f32; 3],
}

impl CooldownSet {
    pub fn next_available(&self, kind: AttackKind) -> f32 {
        self.next_available[kind.slot()]
    }

    pub fn is_ready(&self, kind: AttackKind, now: f32) -> bool {
        now >= self.next_available(kind)
    }

    fn set(&mut self, kind: AttackKind, at: f32) {
        self.next_available[kind.slot()] = at;
    }
}

#[derive(Debug, Clone)]
pub struct AttackSubsystem {
    tuning: AttackTuning,
    current: Option<AttackInstance>,
    cooldowns: CooldownSet,
    ranged: RangedSubAttack,
    completed: u32,
}

impl AttackSubsystem {
    pub fn new(tuning: AttackTuning, ranged: RangedTuning) -> Self {
        Self {
            tuning,
            current: None,
            cooldowns: CooldownSet::default(),
            ranged: RangedSubAttack::new(ranged),
            completed: 0,
        }
    }

    pub fn is_attacking(&self) -> bool {
        self.current.is_some()
    }

    /// Zero velocity + no turning while an instance is between commit and recovery end.
    pub fn locks_movement(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<&AttackInstance> {
        self.current.as_ref()
    }

    pub fn cooldowns(&self) -> &CooldownSet {
        &self.cooldowns
    }

    pub fn ranged(&self) -> &RangedSubAttack {
        &self.ranged
    }

    /// Instances that ran through recovery.
    pub fn completed_count(&self) -> u32 {
        self.completed
    }

    pub fn can_commit(&self, kind: AttackKind, senses: &Senses) -> bool {
        if self.is_attacking() || !self.cooldowns.is_ready(kind, senses.now) {
            return false;
        }

        match kind {
            AttackKind::Ranged => self.ranged.can_use(senses.distance_to_target()),
            AttackKind::Melee | AttackKind::AoE => true,
        }
    }

    /// Start an attack. Silent no-op when `can_commit` is false.
    ///
    /// `windup_multiplier` scales melee / AoE windups (per phase).
    pub fn commit(
        &mut self,
        kind: AttackKind,
        senses: &Senses,
        windup_multiplier: f32,
        rolls: &mut dyn RollSource,
        signals: &mut Vec<BossSignal>,
    ) {
        if !self.can_commit(kind, senses) {
            return;
        }

        let (variant, windup) = match kind {
            AttackKind::Melee => {
                let (variant, windup, trigger) = if rolls.roll() < 0.5 {
                    (MeleeVariant::Basic, self.tuning.basic_windup, AnimationTrigger::BasicAttack)
                } else {
                    (MeleeVariant::Claw, self.tuning.claw_windup, AnimationTrigger::ClawAttack)
                };
                signals.push(BossSignal::Animation(trigger));
                (Some(variant), Countdown::new(windup * windup_multiplier))
            }
            AttackKind::AoE => {
                signals.push(BossSignal::Animation(AnimationTrigger::AoEAttack));
                (None, Countdown::new(self.tuning.aoe_windup * windup_multiplier))
            }
            AttackKind::Ranged => {
                // Windup timing is owned by the sub-attack
                if !self.ranged.start(signals) {
                    return;
                }
                (None, Countdown::default())
            }
        };

        crate::log(&format!(
            "⚔️ Attack committed: {:?} {:?} (windup {:.2}s) at t={:.2}",
            kind,
            variant,
            windup.remaining(),
            senses.now
        ));

        self.current = Some(AttackInstance {
            kind,
            variant,
            stage: AttackStage::Windup,
            timer: windup,
            committed_at: senses.now,
            fresh: true,
        });
    }

    /// Advance the current instance. Runs every tick (also under the defensive override).
    pub fn tick(
        &mut self,
        dt: f32,
        senses: &Senses,
        effects: &mut dyn EffectResolver,
        signals: &mut Vec<BossSignal>,
    ) {
        self.ranged.tick_cooldown(dt);

        let Some(mut instance) = self.current else {
            return;
        };

        // Commit tick: stage timers start on the next tick
        if instance.fresh {
            instance.fresh = false;
            self.current = Some(instance);
            return;
        }

        let finished = match instance.kind {
            AttackKind::Melee | AttackKind::AoE => self.advance_area(&mut instance, dt, senses, effects),
            AttackKind::Ranged => self.advance_ranged(&mut instance, dt, senses, signals),
        };

        if finished {
            let cooldown = match instance.kind {
                AttackKind::Melee => self.tuning.melee_cooldown,
                AttackKind::AoE => self.tuning.aoe_cooldown,
                AttackKind::Ranged => self.tuning.ranged_cooldown,
            };
            self.cooldowns.set(instance.kind, senses.now + cooldown);
            self.current = None;
            self.completed += 1;

            crate::log(&format!(
                "⚔️ Attack complete: {:?}, next at t={:.2}",
                instance.kind,
                senses.now + cooldown
            ));
        } else {
            self.current = Some(instance);
        }
    }

    /// Death: drop the instance without starting a cooldown.
    pub fn abort(&mut self) {
        self.current = None;
        self.ranged.abort();
    }

    /// Melee / AoE: windup → effect → recovery. Returns true when recovery elapsed.
    fn advance_area(
        &self,
        instance: &mut AttackInstance,
        dt: f32,
        senses: &Senses,
        effects: &mut dyn EffectResolver,
    ) -> bool {
        let Some(overshoot) = instance.timer.tick(dt) else {
            return false;
        };

        match instance.stage {
            AttackStage::Windup | AttackStage::Effect => {
                instance.stage = AttackStage::Effect;
                let hit = self.area_hit(instance.kind, senses);
                let landed = effects.apply_area_damage(&hit);

                crate::log(&format!(
                    "⚔️ {:?} effect at {:?}: {}",
                    instance.kind,
                    hit.origin,
                    if landed { "hit" } else { "miss" }
                ));

                let recovery = match instance.kind {
                    AttackKind::AoE => self.tuning.aoe_recovery,
                    _ => self.tuning.melee_recovery,
                };
                instance.stage = AttackStage::Recovery;
                instance.timer.start(recovery - overshoot);
                false
            }
            AttackStage::Recovery => true,
        }
    }

    /// Ranged: windup until launch, recovery = sub-attack end delay + post-lock.
    fn advance_ranged(
        &mut self,
        instance: &mut AttackInstance,
        dt: f32,
        senses: &Senses,
        signals: &mut Vec<BossSignal>,
    ) -> bool {
        if self.ranged.is_attacking() {
            match self.ranged.advance(dt, senses, signals) {
                RangedProgress::Launched => instance.stage = AttackStage::Recovery,
                RangedProgress::Finished { overshoot } => {
                    instance.stage = AttackStage::Recovery;
                    instance.timer.start(self.tuning.ranged_recovery - overshoot);
                }
                RangedProgress::Pending => {}
            }
            return false;
        }

        instance.timer.tick(dt).is_some()
    }

    fn area_hit(&self, kind: AttackKind, senses: &Senses) -> AreaHit {
        match kind {
            AttackKind::AoE => AreaHit {
                kind,
                source: senses.position,
                origin: senses.point_ahead(self.tuning.aoe_offset, 0.0),
                radius: self.tuning.aoe_radius,
                damage: self.tuning.aoe_damage,
                knockback: self.tuning.aoe_knockback,
            },
            _ => AreaHit {
                kind,
                source: senses.position,
                origin: senses.point_ahead(self.tuning.melee_offset, 0.0),
                radius: self.tuning.melee_radius,
                damage: self.tuning.melee_damage,
                knockback: self.tuning.melee_knockback,
            },
        }
    }
}
