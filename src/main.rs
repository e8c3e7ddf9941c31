//! Ridge Runner headless harness
//!
//! Runs a scripted ten second skirmish against the simulation core and logs
//! every effect signal. Pass a settings JSON path to override the defaults.

#[cfg(not(target_arch = "wasm32"))]
use ridge_runner::consts::SIM_DT;
#[cfg(not(target_arch = "wasm32"))]
use ridge_runner::sim::{
    BulletSpec, Combatant, GrenadeSpec, RocketSpec, SimEvent, Transform, World, tick,
};
#[cfg(not(target_arch = "wasm32"))]
use ridge_runner::SimulationConfig;

#[cfg(not(target_arch = "wasm32"))]
const RUN_SECONDS: f32 = 10.0;
#[cfg(not(target_arch = "wasm32"))]
const FIRE_INTERVAL_TICKS: u64 = 15;
#[cfg(not(target_arch = "wasm32"))]
const GRENADE_TICK: u64 = 60;
#[cfg(not(target_arch = "wasm32"))]
const ROCKET_TICK: u64 = 120;

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Ridge Runner (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => match SimulationConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("error: {}", e);
                std::process::exit(1);
            }
        },
        None => SimulationConfig::default(),
    };

    let mut world = match World::new(config) {
        Ok(world) => world,
        Err(e) => {
            eprintln!("error: {}", e);
            std::process::exit(1);
        }
    };

    let total_ticks = (RUN_SECONDS / SIM_DT).round() as u64;
    let mut hits = 0;
    let mut explosions = 0;
    let mut kills = 0;

    for _ in 0..total_ticks {
        script(&mut world);
        tick(&mut world, SIM_DT);

        for event in world.drain_events() {
            match &event {
                SimEvent::Hit { .. } => hits += 1,
                SimEvent::Explosion { .. } => explosions += 1,
                SimEvent::Killed { .. } => kills += 1,
                SimEvent::TerrainImpact { .. } => {}
            }
            log::debug!("tick {}: {:?}", world.time_ticks, event);
        }
    }

    println!("Simulated {} ticks", world.time_ticks);
    println!("  hits:       {}", hits);
    println!("  explosions: {}", explosions);
    println!("  kills:      {}", kills);
    println!(
        "  player:     {:.0}/{:.0} hp",
        world.player.health(),
        world.player.max_health
    );
    println!(
        "  enemies:    {}/{} standing",
        world.active_enemies(),
        world.enemies.len()
    );
}

/// Player inputs for the current tick
#[cfg(not(target_arch = "wasm32"))]
fn script(world: &mut World) {
    if !world.player.is_active() {
        return;
    }
    let Some(target) = nearest_enemy(world) else {
        return;
    };

    let origin = world.player.center_of_gravity();
    let aim = (target - origin).normalize_or_zero();
    let facing = if aim.x < 0.0 { -1.0 } else { 1.0 };
    let hand = Transform::new(origin, aim.y.atan2(aim.x), 1.0);
    world.player.transform.facing = facing;

    let now = world.time_ticks;
    if now % FIRE_INTERVAL_TICKS == 0 {
        world.fire_bullet(world.player.id, &hand, &BulletSpec::default());
    }
    if now == GRENADE_TICK {
        let lob = Transform::new(origin, lob_angle(facing), 1.0);
        world.throw_grenade(&lob, &GrenadeSpec::default());
    }
    if now == ROCKET_TICK {
        world.launch_rocket(world.player.id, &hand, &RocketSpec::default());
    }
}

/// Throw angle 45 degrees up, toward the facing side
#[cfg(not(target_arch = "wasm32"))]
fn lob_angle(facing: f32) -> f32 {
    if facing < 0.0 {
        std::f32::consts::FRAC_PI_4 * 3.0
    } else {
        std::f32::consts::FRAC_PI_4
    }
}

/// Center of gravity of the closest standing enemy
#[cfg(not(target_arch = "wasm32"))]
fn nearest_enemy(world: &World) -> Option<glam::Vec2> {
    let from = world.player.position();
    world
        .enemies
        .iter()
        .filter(|e| e.is_active())
        .min_by(|a, b| {
            a.position()
                .distance_squared(from)
                .total_cmp(&b.position().distance_squared(from))
        })
        .map(Combatant::center_of_gravity)
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The core is a library on the web; hosts drive `tick` themselves
}
