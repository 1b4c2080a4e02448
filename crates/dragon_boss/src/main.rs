//! Headless симуляция боя с драконом
//!
//! Босс против scripted dummy: dummy кружит вокруг босса, периодически бьёт (BossStruck) и раз в
//! 5 секунд наносит heavy hit. Без рендера, один FixedUpdate tick на update.

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use dragon_boss::{
    create_headless_app, spawn_boss, BossBrain, BossConfig, BossDamaged, BossMotion, BossSignal, BossSignalEvent,
    BossStruck, BossTarget, DeterministicRng, Health, TargetHit,
};

const TICKS: u32 = 3600;
const HIT_EVERY: u32 = 20;
const HEAVY_HIT_EVERY: u32 = 300;
const HEAVY_HIT_DAMAGE: f32 = 26.0;

#[derive(Resource)]
struct Dummy {
    target: Entity,
}

#[derive(Resource, Default)]
struct FightStats {
    hits_taken: u32,
    projectiles: u32,
    evasions: u32,
    defensives: u32,
}

/// Dummy кружит вокруг босса на радиусе, который медленно пульсирует 3..11m
fn move_dummy(dummy: Res<Dummy>, time: Res<Time<Fixed>>, mut transforms: Query<&mut Transform, With<BossTarget>>) {
    let Ok(mut transform) = transforms.get_mut(dummy.target) else {
        return;
    };

    let t = time.elapsed_secs();
    let radius = 7.0 + 4.0 * (t * 0.3).sin();
    transform.translation = Vec3::new(radius * (t * 0.4).cos(), 0.0, radius * (t * 0.4).sin());
}

fn collect_stats(
    mut signals: EventReader<BossSignalEvent>,
    mut hits: EventReader<TargetHit>,
    mut stats: ResMut<FightStats>,
) {
    stats.hits_taken += hits.read().count() as u32;

    for event in signals.read() {
        match event.signal {
            BossSignal::ProjectileLaunched { .. } => stats.projectiles += 1,
            BossSignal::Animation(dragon_boss::AnimationTrigger::StrafeBack)
            | BossSignal::Animation(dragon_boss::AnimationTrigger::StrafeLeft)
            | BossSignal::Animation(dragon_boss::AnimationTrigger::StrafeRight) => stats.evasions += 1,
            BossSignal::DefensiveStarted => stats.defensives += 1,
            BossSignal::PhaseEntered(phase) => println!("  → {:?} entered", phase),
            BossSignal::Died => println!("  → boss died"),
            _ => {}
        }
    }
}

/// Optional tuning file as the first argument.
fn load_config() -> Result<BossConfig, String> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(BossConfig::default());
    };

    let content = std::fs::read_to_string(&path).map_err(|e| format!("{}: {}", path, e))?;
    BossConfig::from_toml_str(&content).map_err(|e| format!("{}: {}", path, e))
}

fn main() {
    let seed = 42;
    println!("Starting dragon boss headless simulation (seed: {})", seed);

    let mut app = create_headless_app(seed);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_secs_f64(1.0 / 60.0)))
        .init_resource::<FightStats>()
        .add_systems(FixedUpdate, move_dummy.before(dragon_boss::ai::systems::tick_boss_brains))
        .add_systems(FixedPostUpdate, collect_stats);

    let config = match load_config() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Failed to load boss tuning: {}", err);
            std::process::exit(1);
        }
    };

    let boss_seed = app.world_mut().resource_mut::<DeterministicRng>().next_seed();
    let target = app
        .world_mut()
        .spawn((BossTarget, Health::new(200.0), Transform::from_xyz(9.0, 0.0, 0.0)))
        .id();

    let spawned = {
        let mut commands = app.world_mut().commands();
        spawn_boss(&mut commands, config, Vec3::ZERO, boss_seed)
    };
    let boss = match spawned {
        Ok(boss) => boss,
        Err(err) => {
            eprintln!("Invalid boss tuning: {}", err);
            std::process::exit(1);
        }
    };
    app.world_mut().flush();
    app.insert_resource(Dummy { target });

    for tick in 1..=TICKS {
        if tick % HIT_EVERY == 0 {
            app.world_mut().send_event(BossStruck { boss });
        }
        if tick % HEAVY_HIT_EVERY == 0 {
            app.world_mut().send_event(BossDamaged {
                boss,
                amount: HEAVY_HIT_DAMAGE,
            });
        }

        app.update();

        let world = app.world();
        let Some(brain) = world.get::<BossBrain>(boss) else {
            break;
        };

        if tick % 100 == 0 {
            let health = brain.0.health();
            let dummy_health = world.get::<Health>(target).map_or(0.0, |h| h.current);
            let speed = world.get::<BossMotion>(boss).map_or(0.0, |m| m.command.locomotion_speed());
            println!(
                "Tick {}: {:?} boss {:.0}/{:.0}, dummy {:.0}, speed {:.2}{}",
                tick,
                brain.0.phase(),
                health.current,
                health.max,
                dummy_health,
                speed,
                if brain.0.is_defensive() { " [defending]" } else { "" }
            );
        }

        if brain.0.is_dead() {
            println!("Boss defeated at tick {}", tick);
            break;
        }

        if world.get::<Health>(target).is_some_and(|h| !h.is_alive()) {
            println!("Dummy defeated at tick {}", tick);
            break;
        }
    }

    let stats = app.world().resource::<FightStats>();
    println!(
        "Simulation complete! hits on dummy: {}, fireballs: {}, evasion moves: {}, defensive overrides: {}",
        stats.hits_taken, stats.projectiles, stats.evasions, stats.defensives
    );
}
