//! Per-frame collision resolution
//!
//! Runs after every entity has moved. This is the only place that changes one
//! entity because of another: damage, hit deactivation, explosions and
//! body separation. Passes, in order:
//! 1. bullets vs combatants (swept), first victim wins
//! 2. bullets vs terrain
//! 3. rockets vs combatants, skipped while a rocket is clearing its launcher
//! 4. explosion damage, once per detonation
//! 5. horizontal separation of overlapping combatants (single pass)

use super::combatant::Combatant;
use super::events::{
    EXPLOSION_PARTICLES, HIT_PARTICLES, SimEvent, TERRAIN_IMPACT_PARTICLES, palette,
};
use super::geometry::swept_collision;
use super::projectile::{DeactivateReason, Detonation};
use super::state::World;
use crate::settings::SimulationConfig;

/// Damage from an explosion at `distance` from its centre
///
/// Full at the centre, falling linearly to zero at `radius` and beyond.
#[inline]
pub fn explosion_damage(full_damage: f32, radius: f32, distance: f32) -> f32 {
    if radius <= 0.0 {
        return 0.0;
    }
    full_damage * (1.0 - distance / radius).max(0.0)
}

/// Enemies in order, then the player
fn roster<'a>(
    player: &'a mut Combatant,
    enemies: &'a mut [Combatant],
) -> impl Iterator<Item = &'a mut Combatant> {
    enemies.iter_mut().chain(std::iter::once(player))
}

/// Resolve every cross-entity interaction for this frame
pub fn resolve_collisions(world: &mut World) {
    let World {
        config,
        terrain,
        player,
        enemies,
        bullets,
        grenades,
        rockets,
        events,
        ..
    } = world;

    // 1 + 2: bullets
    for bullet in bullets.iter_mut().filter(|b| b.is_active()) {
        for target in roster(&mut *player, enemies.as_mut_slice()) {
            if !target.is_active() || bullet.owner == Some(target.id) {
                continue;
            }
            let target_bounds = target.bounds();
            if !swept_collision(&bullet.body, &target_bounds) {
                continue;
            }

            let position = bullet.body.position();
            if config.debug {
                log::info!(
                    "bullet {} hit {:?} {}: bullet {:?} target {:?}",
                    bullet.body.id,
                    target.kind,
                    target.id,
                    bullet.body.bounds(),
                    target_bounds
                );
            }
            let killed = target.apply_damage(bullet.damage);
            events.push(SimEvent::Hit {
                target: target.id,
                target_kind: target.kind,
                projectile: bullet.body.id,
                position,
                damage: bullet.damage,
                colors: palette::BLOOD,
                particles: config.particles(HIT_PARTICLES),
            });
            if killed {
                events.push(SimEvent::Killed {
                    target: target.id,
                    target_kind: target.kind,
                    position: target.position(),
                });
            }
            bullet.body.deactivate(DeactivateReason::HitCombatant);
            break;
        }

        if bullet.is_active() && terrain.check_collision(&bullet.body.bounds()) {
            bullet.body.deactivate(DeactivateReason::HitTerrain);
            events.push(SimEvent::TerrainImpact {
                projectile: bullet.body.id,
                position: bullet.body.position(),
                colors: palette::DIRT,
                particles: config.particles(TERRAIN_IMPACT_PARTICLES),
            });
        }
    }

    // 3: rockets
    for rocket in rockets.iter_mut() {
        if !rocket.is_active() || !rocket.is_launched || rocket.is_exploded() || rocket.has_last_holder() {
            continue;
        }
        let bounds = rocket.body.bounds();
        let touching = roster(&mut *player, enemies.as_mut_slice()).any(|c| c.is_active() && c.bounds().overlaps(&bounds));
        if touching {
            rocket.explode();
        }
    }

    // 4: explosions (grenade fuse, rocket terrain/target contact)
    let mut detonations: Vec<Detonation> = Vec::new();
    for grenade in grenades.iter_mut() {
        if let Some(detonation) = grenade.take_detonation() {
            detonations.push(detonation);
            grenade.retire();
        }
    }
    for rocket in rockets.iter_mut() {
        if let Some(detonation) = rocket.take_detonation() {
            detonations.push(detonation);
            rocket.retire();
        }
    }
    for detonation in &detonations {
        apply_explosion(detonation, config, &mut *player, enemies.as_mut_slice(), events);
    }

    // 5: separation
    separate_combatants(player, enemies);
}

/// Radius damage against every active combatant plus the explosion signal
fn apply_explosion(
    detonation: &Detonation,
    config: &SimulationConfig,
    player: &mut Combatant,
    enemies: &mut [Combatant],
    events: &mut Vec<SimEvent>,
) {
    events.push(SimEvent::Explosion {
        projectile: detonation.projectile,
        kind: detonation.kind,
        position: detonation.center,
        radius: detonation.radius,
        colors: palette::FIRE,
        particles: config.particles(EXPLOSION_PARTICLES),
    });

    let mut damaged = 0;
    for target in roster(player, enemies) {
        if !target.is_active() {
            continue;
        }
        let distance = detonation.center.distance(target.center_of_gravity());
        let damage = explosion_damage(detonation.damage, detonation.radius, distance);
        if damage <= 0.0 {
            continue;
        }
        damaged += 1;
        if target.apply_damage(damage) {
            events.push(SimEvent::Killed {
                target: target.id,
                target_kind: target.kind,
                position: target.position(),
            });
        }
    }

    log::info!(
        "{} {} exploded at ({:.1}, {:.1}), {} combatant(s) damaged",
        detonation.kind.as_str(),
        detonation.projectile,
        detonation.center.x,
        detonation.center.y,
        damaged
    );
}

/// Push one overlapping pair apart along X, half the overlap each
///
/// Returns true if the pair overlapped.
pub fn separate_pair(a: &mut Combatant, b: &mut Combatant) -> bool {
    if !a.is_active() || !b.is_active() {
        return false;
    }
    let (box_a, box_b) = (a.bounds(), b.bounds());
    if !box_a.overlaps(&box_b) {
        return false;
    }

    let push = box_a.x_overlap(&box_b) * 0.5;
    if box_a.center().x <= box_b.center().x {
        a.transform.position.x -= push;
        b.transform.position.x += push;
    } else {
        a.transform.position.x += push;
        b.transform.position.x -= push;
    }
    true
}

/// One pass over every combatant pair
///
/// Three or more bodies piled together may need several frames to settle.
pub fn separate_combatants(player: &mut Combatant, enemies: &mut [Combatant]) {
    let mut bodies: Vec<&mut Combatant> = std::iter::once(player).chain(enemies.iter_mut()).collect();
    let count = bodies.len();
    for i in 0..count {
        for j in (i + 1)..count {
            let (head, tail) = bodies.split_at_mut(j);
            separate_pair(&mut *head[i], &mut *tail[0]);
        }
    }
}
