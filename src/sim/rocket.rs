//! Rockets: powered straight flight, explode on contact
//!
//! A rocket starts `Held` by whoever carries it. `prepare_for_launch` moves
//! it to the hand, gives it velocity and starts clearing the launcher. Until
//! the rocket's box has left the launcher's box it ignores combatants, so it
//! cannot detonate in the shooter's face.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Aabb;
use super::projectile::{
    DeactivateReason, Detonation, HolderState, ProjectileBody, ProjectileKind,
};
use super::state::EntityId;
use super::terrain::Terrain;
use super::transform::Transform;
use crate::consts::ROCKET_STABILIZER_SPIN;

/// Per-weapon rocket stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RocketSpec {
    pub damage: f32,
    pub speed: f32,
    pub size: f32,
    pub explosion_radius: f32,
}

impl Default for RocketSpec {
    fn default() -> Self {
        Self {
            damage: 100.0,
            speed: 600.0,
            size: 12.0,
            explosion_radius: 120.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rocket {
    pub body: ProjectileBody,
    pub damage: f32,
    pub explosion_radius: f32,
    pub holder: HolderState,
    pub is_launched: bool,
    /// Cosmetic fin spin, radians
    pub stabilizer_angle: f32,
    exploded: bool,
    pending: Option<Detonation>,
}

impl Rocket {
    /// A rocket carried by `holder`, not yet in flight
    pub fn new(id: EntityId, holder: EntityId, spec: &RocketSpec) -> Self {
        Self {
            body: ProjectileBody::new(id, ProjectileKind::Rocket, Vec2::ZERO, Vec2::ZERO, spec.size),
            damage: spec.damage,
            explosion_radius: spec.explosion_radius,
            holder: HolderState::Held(holder),
            is_launched: false,
            stabilizer_angle: 0.0,
            exploded: false,
            pending: None,
        }
    }

    /// Place the rocket at the hand, set it moving and start clearing the holder
    pub fn prepare_for_launch(&mut self, hand: &Transform, velocity: Vec2) {
        if self.is_launched {
            log::warn!("rocket {} is already launched", self.body.id);
            return;
        }
        self.body.transform = *hand;
        self.body.previous_position = hand.position;
        self.body.velocity = velocity;
        self.holder = self.holder.launch();
        self.is_launched = true;
    }

    pub fn is_active(&self) -> bool {
        self.body.is_active()
    }

    pub fn is_exploded(&self) -> bool {
        self.exploded
    }

    /// Still ignoring the launcher
    pub fn has_last_holder(&self) -> bool {
        self.holder.clearing().is_some()
    }

    /// Launcher id while clearing
    pub fn last_holder(&self) -> Option<EntityId> {
        self.holder.clearing()
    }

    /// Detonate now; no-op once exploded
    pub fn explode(&mut self) {
        if self.exploded {
            return;
        }
        self.exploded = true;
        self.body.velocity = Vec2::ZERO;
        self.pending = Some(Detonation {
            projectile: self.body.id,
            kind: ProjectileKind::Rocket,
            center: self.body.bounds().center(),
            radius: self.explosion_radius,
            damage: self.damage,
        });
        log::debug!(
            "rocket {} exploded at ({:.1}, {:.1})",
            self.body.id,
            self.body.position().x,
            self.body.position().y
        );
    }

    /// Hand the explosion to the caller exactly once
    pub fn take_detonation(&mut self) -> Option<Detonation> {
        self.pending.take()
    }

    /// Advance one frame
    ///
    /// `holder_bounds` is the launcher's current box while `last_holder()` is
    /// set; `None` (launcher gone) counts as cleared.
    pub fn update(&mut self, dt: f32, terrain: &Terrain, holder_bounds: Option<Aabb>) {
        if !self.is_launched || self.exploded || !self.body.begin_frame() {
            return;
        }

        self.body.transform.position += self.body.velocity * dt;
        self.stabilizer_angle += ROCKET_STABILIZER_SPIN * dt;

        let bottom = self.body.bottom();
        let hit_ground = terrain
            .height_at(self.body.position().x)
            .is_ok_and(|ground| bottom <= ground);
        if hit_ground {
            self.explode();
            return;
        }

        if self.has_last_holder() {
            let still_inside = holder_bounds.is_some_and(|b| b.overlaps(&self.body.bounds()));
            if !still_inside {
                self.holder = self.holder.clear();
                log::debug!("rocket {} cleared its launcher", self.body.id);
            }
        }
    }

    /// Mark removed after the explosion was consumed
    pub fn retire(&mut self) {
        self.body.deactivate(DeactivateReason::Exploded);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use crate::sim::geometry::BoxShape;
    use crate::sim::terrain::TerrainConfig;

    fn terrain() -> Terrain {
        Terrain::generated(&TerrainConfig::default()).unwrap()
    }

    fn launched(from: Vec2, velocity: Vec2) -> Rocket {
        let mut rocket = Rocket::new(10, 1, &RocketSpec::default());
        rocket.prepare_for_launch(&Transform::at(from), velocity);
        rocket
    }

    #[test]
    fn test_new_rocket_is_held() {
        let rocket = Rocket::new(10, 1, &RocketSpec::default());
        assert_eq!(rocket.holder, HolderState::Held(1));
        assert!(!rocket.is_launched);
        assert!(!rocket.has_last_holder());
    }

    #[test]
    fn test_unlaunched_rocket_does_not_move() {
        let t = terrain();
        let mut rocket = Rocket::new(10, 1, &RocketSpec::default());
        rocket.body.transform.position = Vec2::new(500.0, 550.0);
        rocket.update(SIM_DT, &t, None);
        assert_eq!(rocket.body.position(), Vec2::new(500.0, 550.0));
        assert_eq!(rocket.stabilizer_angle, 0.0);
    }

    #[test]
    fn test_prepare_for_launch() {
        let hand = Transform::new(Vec2::new(300.0, 550.0), 0.3, -1.0);
        let mut rocket = Rocket::new(10, 1, &RocketSpec::default());
        rocket.prepare_for_launch(&hand, Vec2::new(-600.0, 0.0));
        assert!(rocket.is_launched);
        assert!(rocket.has_last_holder());
        assert_eq!(rocket.last_holder(), Some(1));
        assert_eq!(rocket.body.transform, hand);
        assert_eq!(rocket.body.velocity, Vec2::new(-600.0, 0.0));

        // Second launch is ignored
        rocket.prepare_for_launch(&Transform::at(Vec2::ZERO), Vec2::ZERO);
        assert_eq!(rocket.body.transform, hand);
    }

    #[test]
    fn test_clears_holder_once_outside_its_box() {
        let t = terrain();
        let holder = BoxShape::standing(40.0, 80.0).bounds_at(Vec2::new(300.0, 500.0));
        let mut rocket = launched(Vec2::new(300.0, 540.0), Vec2::new(600.0, 0.0));

        rocket.update(SIM_DT, &t, Some(holder));
        assert!(rocket.has_last_holder());

        // 10 units/frame, needs to travel past x = 320 + 6
        for _ in 0..5 {
            rocket.update(SIM_DT, &t, Some(holder));
        }
        assert!(!rocket.has_last_holder());

        // Flying back through the holder does not re-arm the grace period
        rocket.body.transform.position = Vec2::new(300.0, 540.0);
        rocket.update(SIM_DT, &t, Some(holder));
        assert!(!rocket.has_last_holder());
        assert_eq!(rocket.holder, HolderState::Free);
    }

    #[test]
    fn test_missing_holder_counts_as_cleared() {
        let t = terrain();
        let mut rocket = launched(Vec2::new(300.0, 540.0), Vec2::new(600.0, 0.0));
        rocket.update(SIM_DT, &t, None);
        assert!(!rocket.has_last_holder());
    }

    #[test]
    fn test_explodes_on_terrain() {
        let t = terrain();
        let ground = t.height_at(2000.0).unwrap();
        let mut rocket = launched(Vec2::new(2000.0, ground + 20.0), Vec2::new(0.0, -600.0));
        for _ in 0..5 {
            rocket.update(SIM_DT, &t, None);
        }
        assert!(rocket.is_exploded());
        let detonation = rocket.take_detonation().unwrap();
        assert_eq!(detonation.kind, ProjectileKind::Rocket);
        assert_eq!(detonation.radius, RocketSpec::default().explosion_radius);
        assert!(rocket.take_detonation().is_none());
    }

    #[test]
    fn test_no_gravity_and_spin_advances() {
        let t = terrain();
        let mut rocket = launched(Vec2::new(1000.0, 560.0), Vec2::new(600.0, 0.0));
        rocket.update(SIM_DT, &t, None);
        assert_eq!(rocket.body.velocity, Vec2::new(600.0, 0.0));
        assert_eq!(rocket.body.position().y, 560.0);
        assert!((rocket.stabilizer_angle - ROCKET_STABILIZER_SPIN * SIM_DT).abs() < 1e-6);
    }

    #[test]
    fn test_explode_twice_yields_one_detonation() {
        let mut rocket = launched(Vec2::new(1000.0, 560.0), Vec2::new(600.0, 0.0));
        rocket.explode();
        rocket.explode();
        assert!(rocket.is_exploded());
        assert!(rocket.take_detonation().is_some());
        assert!(rocket.take_detonation().is_none());
    }
}
