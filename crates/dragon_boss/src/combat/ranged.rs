//! Fireball sub-attack
//!
//! Sequence: animation → `spawn_delay` → launch → `end_delay` → release → own cooldown.
//! `is_attacking` and `is_on_cooldown` are separate windows; a new cast needs both clear.

use bevy::prelude::*;

use crate::ai::events::{AnimationTrigger, BossSignal};
use crate::config::RangedTuning;
use crate::shared::{Countdown, Senses};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum RangedStage {
    Idle,
    /// Waiting `spawn_delay` before the launch
    Spawning,
    /// Waiting `end_delay` after the launch
    Ending,
}

/// Progress reported to the owning attack instance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RangedProgress {
    Pending,
    /// Projectile launch requested this tick
    Launched,
    /// Attack flag released this tick (`overshoot` past the deadline)
    Finished { overshoot: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RangedSubAttack {
    tuning: RangedTuning,
    stage: RangedStage,
    timer: Countdown,
    cooldown: Countdown,
}

impl RangedSubAttack {
    pub fn new(tuning: RangedTuning) -> Self {
        Self {
            tuning,
            stage: RangedStage::Idle,
            timer: Countdown::default(),
            cooldown: Countdown::default(),
        }
    }

    pub fn stage(&self) -> RangedStage {
        self.stage
    }

    pub fn is_attacking(&self) -> bool {
        self.stage != RangedStage::Idle
    }

    pub fn is_on_cooldown(&self) -> bool {
        self.cooldown.is_running()
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    /// Free to cast and target inside cast range.
    pub fn can_use(&self, distance: f32) -> bool {
        !self.is_attacking() && !self.is_on_cooldown() && distance <= self.tuning.cast_range
    }

    /// Begin a cast. Ignored when already attacking or cooling down.
    pub fn start(&mut self, signals: &mut Vec<BossSignal>) -> bool {
        if self.is_attacking() || self.is_on_cooldown() {
            return false;
        }

        self.stage = RangedStage::Spawning;
        self.timer.start(self.tuning.spawn_delay);
        signals.push(BossSignal::Animation(AnimationTrigger::RangedAttack));
        true
    }

    /// Advance the own cooldown. Called every tick, attacking or not.
    pub fn tick_cooldown(&mut self, dt: f32) {
        if self.cooldown.tick(dt).is_some() {
            crate::log("🔥 Fireball ready");
        }
    }

    /// Advance the cast stages.
    pub fn advance(&mut self, dt: f32, senses: &Senses, signals: &mut Vec<BossSignal>) -> RangedProgress {
        let Some(overshoot) = self.timer.tick(dt) else {
            return RangedProgress::Pending;
        };

        match self.stage {
            RangedStage::Spawning => {
                self.launch(senses, signals);
                self.stage = RangedStage::Ending;
                self.timer.start(self.tuning.end_delay - overshoot);
                RangedProgress::Launched
            }
            RangedStage::Ending => {
                self.stage = RangedStage::Idle;
                self.cooldown.start(self.tuning.cooldown);
                RangedProgress::Finished { overshoot }
            }
            RangedStage::Idle => RangedProgress::Pending,
        }
    }

    /// Fire point → target + aim height. No target (or degenerate aim): nothing is launched.
    fn launch(&self, senses: &Senses, signals: &mut Vec<BossSignal>) {
        let origin = senses.point_ahead(self.tuning.fire_point_forward, self.tuning.fire_point_height);

        let Some(target) = senses.target else {
            crate::log("🔥 Fireball skipped: no target");
            return;
        };

        let aim = target + Vec3::Y * self.tuning.aim_height;
        if let Some(direction) = (aim - origin).try_normalize() {
            signals.push(BossSignal::ProjectileLaunched { origin, direction });
        }
    }

    /// Drop a cast in progress (death). The cooldown keeps running.
    pub fn abort(&mut self) {
        self.stage = RangedStage::Idle;
        self.timer.clear();
    }
}
