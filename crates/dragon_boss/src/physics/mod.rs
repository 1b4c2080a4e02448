//! Physics simulation module
//!
//! Movement executor: применяет `BossMotion` к телу (rapier или headless интеграция).

pub mod movement;

// Re-export основных типов
pub use movement::{apply_boss_motion, facing_rotation, insert_boss_body, integrate_headless_motion};
