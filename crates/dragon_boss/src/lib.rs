//! Dragon Boss Core
//!
//! Boss combat AI on Bevy 0.16 ECS: phase director, attack/evasion subsystems, zone-and-roll
//! attack selection.
//!
//! Layout:
//! - Core = plain Rust (`BossDirector` + subsystems), explicit `dt`, injected rolls
//! - ECS shell = `BossAiPlugin` (events in, `BossSignalEvent` / `TargetHit` out)
//! - World = effect resolver (sphere overlap), movement executor (rapier / headless)

use bevy::prelude::*;
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

// Публичные модули
pub mod ai;
pub mod combat;
pub mod components;
pub mod config;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod shared;

// Re-export базовых типов для удобства
pub use ai::{
    spawn_boss, AnimationTrigger, BossAiPlugin, BossBrain, BossDamaged, BossDirector, BossSignal, BossSignalEvent,
    BossStruck, Phase, TargetHit,
};
pub use combat::{AreaHit, AttackKind, AttackStage, AttackSubsystem, EffectResolver};
pub use components::*;
pub use config::{BossConfig, ConfigError};
pub use logger::{
    init_logger, log, log_error, log_info, log_warning, log_with_level, set_log_level, set_logger,
    set_logger_if_needed, LogLevel, LogPrinter,
};
pub use movement::{EvasionMode, EvasionSubsystem, StrafeDirection};
pub use shared::{RollSource, ScriptedRolls, Senses, TargetLocator};

/// Главный plugin симуляции (fixed timestep + boss AI)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app
            // Fixed timestep 60Hz для simulation tick
            .insert_resource(Time::<Fixed>::from_hz(60.0))
            .add_plugins(BossAiPlugin);

        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }
    }
}

/// Детерминистичный RNG resource (seeded)
///
/// Source of per-boss roll seeds: same app seed → same fight.
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed for the next spawned boss.
    pub fn next_seed(&mut self) -> u64 {
        self.rng.next_u64()
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app(seed: u64) -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        .add_plugins(SimulationPlugin);

    app
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
