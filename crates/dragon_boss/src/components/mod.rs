//! Components shared by the core and the ECS shell
//!
//! - actor: health pool (boss + targets), target marker, hit receiver
//! - movement: motion command handed to the movement executor

pub mod actor;
pub mod movement;

pub use actor::*;
pub use movement::*;
