//! Evasion subsystem: back-off and strafe maneuvers
//!
//! Layout:
//! - Started by the phase policy while holding (per-phase chance roll)
//! - Owns its timers; ticked by the director after the policy
//! - While active its velocity overrides the policy's (attack lock still wins)
//!
//! One combined cooldown (`backoff + strafe + strafe_cooldown`) is armed when a maneuver starts,
//! whichever sub-path is taken.

use bevy::prelude::*;

use crate::ai::events::{AnimationTrigger, BossSignal};
use crate::config::EvasionTuning;
use crate::shared::{Countdown, RollSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum EvasionMode {
    #[default]
    None,
    BackOff,
    Strafe,
    /// Back-off leg, then a strafe toward the queued side
    BackThenStrafe,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
pub enum StrafeDirection {
    #[default]
    None,
    Left,
    Right,
}

impl StrafeDirection {
    fn trigger(self) -> Option<AnimationTrigger> {
        match self {
            StrafeDirection::Left => Some(AnimationTrigger::StrafeLeft),
            StrafeDirection::Right => Some(AnimationTrigger::StrafeRight),
            StrafeDirection::None => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvasionSubsystem {
    tuning: EvasionTuning,
    mode: EvasionMode,
    /// Side of the strafe leg in progress (`None` while backing off)
    direction: StrafeDirection,
    queued: StrafeDirection,
    timer: Countdown,
    cooldown: Countdown,
    /// Phase movement speed (set by the phase policy on enter)
    speed: f32,
    stop_distance: f32,
}

impl EvasionSubsystem {
    pub fn new(tuning: EvasionTuning) -> Self {
        Self {
            tuning,
            mode: EvasionMode::None,
            direction: StrafeDirection::None,
            queued: StrafeDirection::None,
            timer: Countdown::default(),
            cooldown: Countdown::default(),
            speed: 0.0,
            stop_distance: 0.0,
        }
    }

    pub fn set_phase_motion(&mut self, speed: f32, stop_distance: f32) {
        self.speed = speed;
        self.stop_distance = stop_distance;
    }

    pub fn is_active(&self) -> bool {
        self.mode != EvasionMode::None
    }

    pub fn mode(&self) -> EvasionMode {
        self.mode
    }

    pub fn direction(&self) -> StrafeDirection {
        self.direction
    }

    pub fn queued_direction(&self) -> StrafeDirection {
        self.queued
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown.remaining()
    }

    /// Time left in the current leg.
    pub fn time_remaining(&self) -> f32 {
        self.timer.remaining()
    }

    pub fn can_start(&self) -> bool {
        !self.is_active() && !self.cooldown.is_running()
    }

    /// Pick and start a maneuver for the current distance.
    ///
    /// Refused while active, cooling down, or with the target unavailable (`distance = +inf`).
    /// The side roll happens only on branches that strafe.
    pub fn try_start(&mut self, distance: f32, rolls: &mut dyn RollSource, signals: &mut Vec<BossSignal>) -> bool {
        if !self.can_start() || !distance.is_finite() {
            return false;
        }

        let close = distance <= self.stop_distance + self.tuning.close_buffer;
        let roll = rolls.roll();

        let mode = if close && roll < self.tuning.close_backoff_chance {
            EvasionMode::BackOff
        } else if !close && roll < self.tuning.far_strafe_chance {
            EvasionMode::Strafe
        } else {
            EvasionMode::BackThenStrafe
        };

        let side = match mode {
            EvasionMode::BackOff | EvasionMode::None => StrafeDirection::None,
            EvasionMode::Strafe | EvasionMode::BackThenStrafe => {
                if rolls.roll() < 0.5 {
                    StrafeDirection::Left
                } else {
                    StrafeDirection::Right
                }
            }
        };

        self.mode = mode;
        self.cooldown.start(self.tuning.total_cooldown());

        if mode == EvasionMode::Strafe {
            self.begin_strafe(side, self.tuning.strafe_duration, signals);
        } else {
            self.direction = StrafeDirection::None;
            self.queued = side;
            self.timer.start(self.tuning.backoff_duration);
            signals.push(BossSignal::Animation(AnimationTrigger::StrafeBack));
        }

        crate::log(&format!(
            "💨 Evasion start: {:?} (side {:?}, distance {:.2})",
            mode, side, distance
        ));

        true
    }

    pub fn tick(&mut self, dt: f32, signals: &mut Vec<BossSignal>) {
        self.cooldown.tick(dt);

        let Some(overshoot) = self.timer.tick(dt) else {
            return;
        };

        // Back-off leg elapsed with a queued side: strafe without a gap
        if self.direction == StrafeDirection::None && self.queued != StrafeDirection::None {
            let side = self.queued;
            self.queued = StrafeDirection::None;
            self.begin_strafe(side, self.tuning.strafe_duration - overshoot, signals);
            return;
        }

        self.finish();
    }

    /// Forced end (defensive override, death). The cooldown keeps running.
    pub fn stop(&mut self) {
        if self.is_active() {
            self.finish();
        }
    }

    /// Velocity of the current leg. `None` when inactive.
    ///
    /// Left = `up × to_target`, right = `to_target × up`. Without a direction the maneuver still
    /// owns the motion and stands still.
    pub fn velocity(&self, to_target: Option<Vec3>) -> Option<Vec3> {
        if !self.is_active() {
            return None;
        }

        let Some(dir) = to_target else {
            return Some(Vec3::ZERO);
        };

        let velocity = match self.direction {
            StrafeDirection::Left => Vec3::Y.cross(dir) * self.speed * self.tuning.strafe_multiplier,
            StrafeDirection::Right => dir.cross(Vec3::Y) * self.speed * self.tuning.strafe_multiplier,
            StrafeDirection::None => -dir * self.speed * self.tuning.backoff_multiplier,
        };

        Some(velocity)
    }

    fn begin_strafe(&mut self, side: StrafeDirection, duration: f32, signals: &mut Vec<BossSignal>) {
        self.direction = side;
        self.timer.start(duration);
        if let Some(trigger) = side.trigger() {
            signals.push(BossSignal::Animation(trigger));
        }
    }

    fn finish(&mut self) {
        crate::log(&format!(
            "💨 Evasion end: {:?} (cooldown {:.2}s)",
            self.mode,
            self.cooldown.remaining()
        ));

        self.mode = EvasionMode::None;
        self.direction = StrafeDirection::None;
        self.queued = StrafeDirection::None;
        self.timer.clear();
    }
}
