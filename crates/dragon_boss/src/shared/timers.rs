//! Countdown timer used by every multi-stage behaviour.
//!
//! Stages are not coroutines: a `Countdown` is decremented once per tick and reports the tick
//! on which it elapses. Durations of zero elapse on the next tick.

use bevy::prelude::*;

/// Remaining time at or below this counts as elapsed (absorbs f32 drift of repeated `dt` steps).
pub const ELAPSED_EPSILON: f32 = 1e-4;

#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct Countdown {
    remaining: f32,
    running: bool,
}

impl Countdown {
    /// Running countdown of `duration` seconds.
    pub fn new(duration: f32) -> Self {
        Self {
            remaining: duration.max(0.0),
            running: true,
        }
    }

    pub fn start(&mut self, duration: f32) {
        *self = Self::new(duration);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Seconds left (0 when stopped).
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    /// Advance by `dt`.
    ///
    /// Returns `Some(overshoot)` on the tick the countdown elapses, where `overshoot >= 0` is the
    /// part of `dt` past the deadline (lets the next stage start without a gap).
    pub fn tick(&mut self, dt: f32) -> Option<f32> {
        if !self.running {
            return None;
        }

        self.remaining -= dt;

        if self.remaining <= ELAPSED_EPSILON {
            let overshoot = (-self.remaining).max(0.0);
            self.clear();
            Some(overshoot)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_elapses_on_exact_tick() {
        // 0.8s in 0.1s steps: f32 drift must not push expiry to a 9th tick
        let mut timer = Countdown::new(0.8);
        for _ in 0..7 {
            assert!(timer.tick(0.1).is_none());
        }
        assert!(timer.tick(0.1).is_some());
        assert!(!timer.is_running());
        assert_eq!(timer.remaining(), 0.0);
    }

    #[test]
    fn test_countdown_overshoot() {
        let mut timer = Countdown::new(0.25);
        assert!(timer.tick(0.2).is_none());
        let overshoot = timer.tick(0.2).expect("elapsed");
        assert!((overshoot - 0.15).abs() < 1e-5);
    }

    #[test]
    fn test_zero_duration_elapses_next_tick() {
        let mut timer = Countdown::new(0.0);
        assert!(timer.is_running());
        assert!(timer.tick(0.016).is_some());
    }

    #[test]
    fn test_stopped_countdown_never_fires() {
        let mut timer = Countdown::default();
        assert!(!timer.is_running());
        assert!(timer.tick(1.0).is_none());

        let mut timer = Countdown::new(1.0);
        timer.clear();
        assert!(timer.tick(2.0).is_none());
    }
}
