//! Fixed timestep simulation tick
//!
//! Every entity moves first, then a single collision pass runs against the
//! post-motion state, then dead projectiles are dropped.

use super::collision::resolve_collisions;
use super::combatant::Combatant;
use super::geometry::Aabb;
use super::state::{EntityId, World};

/// Current box of an active combatant
fn holder_bounds(player: &Combatant, enemies: &[Combatant], id: EntityId) -> Option<Aabb> {
    std::iter::once(player)
        .chain(enemies.iter())
        .find(|c| c.id == id && c.is_active())
        .map(Combatant::bounds)
}

/// Advance the world by one timestep
pub fn tick(world: &mut World, dt: f32) {
    world.time_ticks += 1;

    let terrain = &world.terrain;

    world.player.update(dt, terrain);
    for enemy in &mut world.enemies {
        enemy.update(dt, terrain);
    }

    for bullet in &mut world.bullets {
        bullet.update(dt);
    }
    for grenade in &mut world.grenades {
        grenade.update(dt, terrain);
    }
    for rocket in &mut world.rockets {
        let bounds = rocket
            .last_holder()
            .and_then(|id| holder_bounds(&world.player, &world.enemies, id));
        rocket.update(dt, terrain, bounds);
    }

    resolve_collisions(world);
    world.remove_inactive_projectiles();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::SimulationConfig;
    use crate::sim::bullet::BulletSpec;
    use crate::sim::events::SimEvent;
    use crate::sim::grenade::GrenadeSpec;
    use crate::sim::rocket::RocketSpec;
    use crate::sim::transform::Transform;
    use glam::Vec2;

    fn world() -> World {
        World::new(SimulationConfig {
            enemy_count: 0,
            ..Default::default()
        })
        .unwrap()
    }

    fn settle(world: &mut World) {
        for _ in 0..120 {
            tick(world, SIM_DT);
        }
    }

    #[test]
    fn test_player_settles_on_ground() {
        let mut w = world();
        settle(&mut w);
        assert!(w.player.grounded);
        assert_eq!(w.time_ticks, 120);
    }

    #[test]
    fn test_bullet_travels_and_hits_enemy() {
        let mut w = world();
        let enemy = w.spawn_enemy(700.0).unwrap();
        settle(&mut w);

        let target = w.combatant(enemy).unwrap().center_of_gravity();
        let player = w.player.center_of_gravity();
        let aim = (target - player).normalize();
        let muzzle = Transform::new(player, aim.y.atan2(aim.x), 1.0);
        w.fire_bullet(w.player.id, &muzzle, &BulletSpec::default());

        for _ in 0..60 {
            tick(&mut w, SIM_DT);
        }
        let enemy = w.combatant(enemy).unwrap();
        assert_eq!(enemy.health(), ENEMY_MAX_HEALTH - BulletSpec::default().damage);
        assert!(w.bullets.is_empty());
        assert!(w.events.iter().any(|e| matches!(e, SimEvent::Hit { .. })));
    }

    #[test]
    fn test_rocket_does_not_hit_its_launcher() {
        let mut w = world();
        settle(&mut w);
        let hand = Transform::at(w.player.center_of_gravity());
        w.launch_rocket(w.player.id, &hand, &RocketSpec::default());

        tick(&mut w, SIM_DT);
        assert_eq!(w.player.health(), PLAYER_MAX_HEALTH);
        assert!(w.rockets[0].has_last_holder());

        for _ in 0..10 {
            tick(&mut w, SIM_DT);
        }
        assert_eq!(w.player.health(), PLAYER_MAX_HEALTH);
        assert_eq!(w.rockets.len(), 1);
        assert!(!w.rockets[0].has_last_holder());
    }

    #[test]
    fn test_rocket_explodes_on_enemy() {
        let mut w = world();
        let enemy = w.spawn_enemy(600.0).unwrap();
        settle(&mut w);
        let hand = Transform::at(w.player.center_of_gravity() + Vec2::new(0.0, 10.0));
        let rise = w.combatant(enemy).unwrap().center_of_gravity().y - hand.position.y;
        // Straight at the enemy's middle
        let aim = Vec2::new(400.0, rise).normalize();
        let hand = Transform::new(hand.position, aim.y.atan2(aim.x), 1.0);
        w.launch_rocket(w.player.id, &hand, &RocketSpec::default());

        for _ in 0..90 {
            tick(&mut w, SIM_DT);
        }
        assert!(w.rockets.is_empty());
        assert!(w.events.iter().any(|e| matches!(e, SimEvent::Explosion { .. })));
        assert!(w.combatant(enemy).unwrap().health() < ENEMY_MAX_HEALTH);
    }

    #[test]
    fn test_grenade_removed_after_fuse() {
        let mut w = world();
        settle(&mut w);
        let hand = Transform::new(w.player.center_of_gravity() + Vec2::new(30.0, 20.0), 0.8, 1.0);
        w.throw_grenade(&hand, &GrenadeSpec::default());

        for _ in 0..170 {
            tick(&mut w, SIM_DT);
        }
        assert_eq!(w.grenades.len(), 1);

        for _ in 0..20 {
            tick(&mut w, SIM_DT);
        }
        assert!(w.grenades.is_empty());
        let explosions = w
            .events
            .iter()
            .filter(|e| matches!(e, SimEvent::Explosion { .. }))
            .count();
        assert_eq!(explosions, 1);
    }

    #[test]
    fn test_overlapping_enemies_spread_apart() {
        let mut w = world();
        let a = w.spawn_enemy(3000.0).unwrap();
        let b = w.spawn_enemy(3010.0).unwrap();
        settle(&mut w);
        let a = w.combatant(a).unwrap().bounds();
        let b = w.combatant(b).unwrap().bounds();
        assert!(a.x_overlap(&b) <= 1e-3);
    }

    #[test]
    fn test_determinism() {
        let run = || {
            let mut w = World::new(SimulationConfig::default()).unwrap();
            let muzzle = Transform::new(Vec2::new(220.0, 400.0), 0.1, 1.0);
            for frame in 0..240 {
                if frame % 20 == 0 {
                    w.fire_bullet(w.player.id, &muzzle, &BulletSpec::default());
                }
                tick(&mut w, SIM_DT);
            }
            (
                w.player.position(),
                w.enemies.iter().map(|e| e.health()).collect::<Vec<_>>(),
                w.events.len(),
            )
        };
        assert_eq!(run(), run());
    }
}
