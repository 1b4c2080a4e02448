//! Boss director: the per-tick decision loop.
//!
//! Owns health, the active phase policy, the defensive override and both subsystems (by value,
//! no back-references). Host contract:
//! - `apply_damage(amount)` whenever the boss is hurt
//! - `tick(dt, senses, effects)` once per simulation tick
//! - read `motion()`, drain `drain_signals()`
//!
//! # Tick order
//!
//! 1. Phase re-evaluation from health (skipped under the override): Exit old → Enter new
//! 2. Punish check (target dwelling too close)
//! 3. Override countdown **or** phase policy tick (movement + attack selection)
//! 4. Evasion tick, attack tick (attack also runs under the override: commitment is irrevocable)
//! 5. Motion: attack lock > evasion velocity > policy velocity

use bevy::prelude::*;

use crate::combat::{AttackSubsystem, EffectResolver};
use crate::components::{Health, MotionCommand};
use crate::config::BossConfig;
use crate::movement::EvasionSubsystem;
use crate::shared::{Countdown, RollSource, Senses};

use super::events::{AnimationTrigger, BossSignal};
use super::phase::Phase;
use super::policy::{PhasePolicy, PolicyContext};

/// Why the defensive override started.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefensiveCause {
    HeavyHit,
    Punish,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectorMode {
    /// Phase policy in charge
    Active,
    /// Policy suspended (not destroyed); resumes on expiry
    Defensive { timer: Countdown },
    /// Terminal
    Dead,
}

pub struct BossDirector {
    config: BossConfig,
    health: Health,
    policy: PhasePolicy,
    mode: DirectorMode,
    /// Seconds the target has been inside `punish_distance`
    close_timer: f32,
    attack: AttackSubsystem,
    evasion: EvasionSubsystem,
    rolls: Box<dyn RollSource>,
    motion: MotionCommand,
    outbox: Vec<BossSignal>,
}

impl BossDirector {
    /// Build a boss at full health in the phase its health maps to.
    ///
    /// `config` is assumed valid (`BossConfig::validate`).
    pub fn new(config: BossConfig, rolls: Box<dyn RollSource>) -> Self {
        let health = Health::new(config.max_health);
        let phase = Phase::from_fraction(health.fraction(), config.phase2_threshold, config.phase3_threshold);

        let mut director = Self {
            attack: AttackSubsystem::new(config.attack.clone(), config.ranged.clone()),
            evasion: EvasionSubsystem::new(config.evasion.clone()),
            policy: PhasePolicy::new(phase),
            mode: DirectorMode::Active,
            close_timer: 0.0,
            rolls,
            motion: MotionCommand::HOLD,
            outbox: Vec::new(),
            health,
            config,
        };

        director.outbox.push(BossSignal::HealthMaxSet(health.max));
        director.outbox.push(BossSignal::HealthChanged {
            current: health.current,
            max: health.max,
        });
        director
            .policy
            .enter(&director.config, &mut director.evasion, &mut director.outbox);

        director
    }

    // ========================================================================
    // Observers
    // ========================================================================

    pub fn config(&self) -> &BossConfig {
        &self.config
    }

    pub fn health(&self) -> Health {
        self.health
    }

    /// Health-derived phase (also while the override pins behaviour).
    pub fn phase(&self) -> Phase {
        Phase::from_fraction(
            self.health.fraction(),
            self.config.phase2_threshold,
            self.config.phase3_threshold,
        )
    }

    /// Phase of the active (or suspended) policy.
    pub fn policy_phase(&self) -> Phase {
        self.policy.phase()
    }

    pub fn policy(&self) -> &PhasePolicy {
        &self.policy
    }

    pub fn mode(&self) -> DirectorMode {
        self.mode
    }

    pub fn is_defensive(&self) -> bool {
        matches!(self.mode, DirectorMode::Defensive { .. })
    }

    pub fn is_dead(&self) -> bool {
        self.mode == DirectorMode::Dead
    }

    pub fn defensive_remaining(&self) -> f32 {
        match self.mode {
            DirectorMode::Defensive { timer } => timer.remaining(),
            _ => 0.0,
        }
    }

    pub fn close_timer(&self) -> f32 {
        self.close_timer
    }

    pub fn attack(&self) -> &AttackSubsystem {
        &self.attack
    }

    pub fn evasion(&self) -> &EvasionSubsystem {
        &self.evasion
    }

    /// Last motion command (for the movement executor).
    pub fn motion(&self) -> MotionCommand {
        self.motion
    }

    /// Signals queued since the last drain, oldest first.
    pub fn signals(&self) -> &[BossSignal] {
        &self.outbox
    }

    pub fn drain_signals(&mut self) -> Vec<BossSignal> {
        std::mem::take(&mut self.outbox)
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Hurt the boss. Non-positive amounts and damage after death are ignored.
    pub fn apply_damage(&mut self, amount: f32) {
        if amount <= 0.0 || self.is_dead() {
            return;
        }

        self.health.take_damage(amount);
        self.outbox.push(BossSignal::HealthChanged {
            current: self.health.current,
            max: self.health.max,
        });

        crate::log(&format!(
            "🩸 Boss took {} damage ({}/{})",
            amount, self.health.current, self.health.max
        ));

        if !self.health.is_alive() {
            self.die();
            return;
        }

        if amount >= self.config.heavy_hit_threshold {
            self.start_defensive(DefensiveCause::HeavyHit);
        }
    }

    pub fn tick(&mut self, dt: f32, senses: &Senses, effects: &mut dyn EffectResolver) {
        if self.is_dead() {
            return;
        }

        if !self.is_defensive() {
            self.update_phase();
            self.update_punish(dt, senses);
        }

        let mode = self.mode;
        let policy_velocity = match mode {
            DirectorMode::Active => {
                let mut ctx = PolicyContext {
                    config: &self.config,
                    senses,
                    attack: &mut self.attack,
                    evasion: &mut self.evasion,
                    rolls: &mut *self.rolls,
                    signals: &mut self.outbox,
                };
                self.policy.tick(dt, &mut ctx).velocity
            }
            DirectorMode::Defensive { mut timer } => {
                if timer.tick(dt).is_some() {
                    self.end_defensive();
                } else {
                    self.mode = DirectorMode::Defensive { timer };
                }
                Vec3::ZERO
            }
            DirectorMode::Dead => return,
        };

        self.evasion.tick(dt, &mut self.outbox);
        self.attack.tick(dt, senses, effects, &mut self.outbox);

        let facing = senses.direction_to_target();
        self.motion = if self.attack.locks_movement() {
            MotionCommand::HOLD
        } else if let Some(velocity) = self.evasion.velocity(facing) {
            MotionCommand::moving(velocity).with_facing(facing)
        } else {
            MotionCommand::moving(policy_velocity).with_facing(facing)
        };
    }

    // ========================================================================
    // Internals
    // ========================================================================

    /// Level-triggered: compares the health phase with the active policy every tick.
    fn update_phase(&mut self) {
        let phase = self.phase();
        if phase == self.policy.phase() {
            return;
        }

        crate::log_info(&format!(
            "🐉 Phase change {:?} → {:?} (health {:.0}%)",
            self.policy.phase(),
            phase,
            self.health.fraction() * 100.0
        ));

        self.policy.exit();
        self.policy = PhasePolicy::new(phase);
        self.policy.enter(&self.config, &mut self.evasion, &mut self.outbox);
    }

    fn update_punish(&mut self, dt: f32, senses: &Senses) {
        if !self.config.punish_enabled {
            return;
        }

        if senses.distance_to_target() < self.config.punish_distance {
            self.close_timer += dt;
        } else {
            self.close_timer = 0.0;
        }

        if self.close_timer >= self.config.punish_close_time {
            self.close_timer = 0.0;
            self.start_defensive(DefensiveCause::Punish);
        }
    }

    /// No nesting: ignored while already defensive (or dead). A committed attack keeps running.
    fn start_defensive(&mut self, cause: DefensiveCause) {
        if self.mode != DirectorMode::Active {
            return;
        }

        self.policy.exit();
        self.evasion.stop();
        self.close_timer = 0.0;
        self.mode = DirectorMode::Defensive {
            timer: Countdown::new(self.config.defensive_duration),
        };
        self.motion = MotionCommand::HOLD;

        self.outbox.push(BossSignal::Animation(AnimationTrigger::Defend));
        self.outbox.push(BossSignal::DefensiveStarted);

        crate::log_info(&format!(
            "🛡️ Defensive override ({:?}) for {:.1}s",
            cause, self.config.defensive_duration
        ));
    }

    /// Back to the suspended policy; next tick re-checks the health phase.
    fn end_defensive(&mut self) {
        self.mode = DirectorMode::Active;
        self.outbox.push(BossSignal::DefensiveEnded);
        self.policy.enter(&self.config, &mut self.evasion, &mut self.outbox);

        crate::log_info("🛡️ Defensive override ended");
    }

    fn die(&mut self) {
        self.mode = DirectorMode::Dead;
        self.motion = MotionCommand::HOLD;
        self.evasion.stop();
        self.attack.abort();

        self.outbox.push(BossSignal::Animation(AnimationTrigger::Die));
        self.outbox.push(BossSignal::Died);

        crate::log_info("💀 Boss died");
    }
}

impl std::fmt::Debug for BossDirector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BossDirector")
            .field("health", &self.health)
            .field("phase", &self.policy.phase())
            .field("mode", &self.mode)
            .field("close_timer", &self.close_timer)
            .field("attack", &self.attack.current())
            .field("evasion", &self.evasion.mode())
            .field("motion", &self.motion)
            .finish()
    }
}
