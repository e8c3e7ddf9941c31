//! Bullets: straight-line, gravity-free, range-limited

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::projectile::{DeactivateReason, ProjectileBody, ProjectileKind};
use super::state::EntityId;
use crate::consts::BULLET_MAX_TRAVEL;

/// Per-weapon bullet stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BulletSpec {
    pub damage: f32,
    pub speed: f32,
    pub size: f32,
}

impl Default for BulletSpec {
    fn default() -> Self {
        Self {
            damage: 10.0,
            speed: 1000.0,
            size: 4.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bullet {
    pub body: ProjectileBody,
    pub damage: f32,
    /// Shooter; never damaged by its own bullet
    pub owner: Option<EntityId>,
    /// Total distance flown
    pub traveled: f32,
}

impl Bullet {
    pub fn new(id: EntityId, position: Vec2, velocity: Vec2, spec: &BulletSpec) -> Self {
        Self {
            body: ProjectileBody::new(id, ProjectileKind::Bullet, position, velocity, spec.size),
            damage: spec.damage,
            owner: None,
            traveled: 0.0,
        }
    }

    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn is_active(&self) -> bool {
        self.body.is_active()
    }

    pub fn update(&mut self, dt: f32) {
        if !self.body.begin_frame() {
            return;
        }

        let step = self.body.velocity * dt;
        self.body.transform.position += step;
        self.traveled += step.length();

        if self.traveled > BULLET_MAX_TRAVEL {
            self.body.deactivate(DeactivateReason::TravelLimit);
        }
    }
}
