//! Shared utilities for the boss core.
//!
//! - timers: `Countdown` (stage / cooldown timers advanced once per tick)
//! - zones: flat geometry and distance zones
//! - rolls: injected random source for tie-break rolls
//! - senses: per-tick target snapshot (`TargetLocator` → `Senses`)

pub mod rolls;
pub mod senses;
pub mod timers;
pub mod zones;

pub use rolls::{RollSource, ScriptedRolls};
pub use senses::{Senses, TargetLocator};
pub use timers::{Countdown, ELAPSED_EPSILON};
pub use zones::{flat_direction, Zone, ZoneBounds};
