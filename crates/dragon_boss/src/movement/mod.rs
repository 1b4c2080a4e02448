//! Movement domain: boss maneuvers
//!
//! Contains:
//! - EvasionSubsystem (back-off / strafe state machine, own timers)
//!
//! Motion commands themselves live in `components::movement`, their execution in `physics`.

pub mod evasion;


pub use evasion::{EvasionMode, EvasionSubsystem, StrafeDirection};
