//! Grenades: ballistic flight, a bounce into a roll, and a fuse
//!
//! The fuse burns every frame from the throw and fires no matter what the
//! grenade is doing. Ground handling:
//! - first contact: fast grenades lose speed to a damped bounce plus a slope
//!   nudge, slow ones go straight to rolling friction
//! - rolling: friction then slope each contact frame, with a dead zone so the
//!   grenade eventually stops

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::physics::apply_gravity;
use super::projectile::{DeactivateReason, Detonation, ProjectileBody, ProjectileKind};
use super::state::EntityId;
use super::terrain::Terrain;
use crate::consts::*;

/// Per-weapon grenade stats
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GrenadeSpec {
    pub damage: f32,
    pub throw_speed: f32,
    pub size: f32,
    pub explosion_radius: f32,
    /// Fuse length in seconds
    pub explosion_delay: f32,
}

impl Default for GrenadeSpec {
    fn default() -> Self {
        Self {
            damage: 80.0,
            throw_speed: 500.0,
            size: 10.0,
            explosion_radius: 150.0,
            explosion_delay: 3.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GrenadeState {
    Flying,
    Rolling,
    Exploded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grenade {
    pub body: ProjectileBody,
    pub state: GrenadeState,
    pub damage: f32,
    pub explosion_radius: f32,
    pub explosion_delay: f32,
    /// Seconds since the throw
    pub fuse: f32,
    /// Unconsumed explosion, taken once by the collision pass
    pending: Option<Detonation>,
}

impl Grenade {
    pub fn new(id: EntityId, position: Vec2, velocity: Vec2, spec: &GrenadeSpec) -> Self {
        Self {
            body: ProjectileBody::new(id, ProjectileKind::Grenade, position, velocity, spec.size),
            state: GrenadeState::Flying,
            damage: spec.damage,
            explosion_radius: spec.explosion_radius,
            explosion_delay: spec.explosion_delay,
            fuse: 0.0,
            pending: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.body.is_active()
    }

    pub fn is_exploded(&self) -> bool {
        self.state == GrenadeState::Exploded
    }

    /// Detonate now; no-op once exploded
    pub fn explode(&mut self) {
        if self.is_exploded() {
            return;
        }
        self.state = GrenadeState::Exploded;
        self.body.velocity = Vec2::ZERO;
        self.pending = Some(Detonation {
            projectile: self.body.id,
            kind: ProjectileKind::Grenade,
            center: self.body.bounds().center(),
            radius: self.explosion_radius,
            damage: self.damage,
        });
        log::debug!(
            "grenade {} exploded at ({:.1}, {:.1})",
            self.body.id,
            self.body.position().x,
            self.body.position().y
        );
    }

    /// Hand the explosion to the caller exactly once
    pub fn take_detonation(&mut self) -> Option<Detonation> {
        self.pending.take()
    }

    pub fn update(&mut self, dt: f32, terrain: &Terrain) {
        if self.is_exploded() || !self.body.begin_frame() {
            return;
        }

        self.fuse += dt;
        if self.fuse >= self.explosion_delay {
            self.explode();
            return;
        }

        apply_gravity(&mut self.body, dt);
        self.body.transform.rotation -= self.body.velocity.x * GRENADE_SPIN_FACTOR * dt;

        self.resolve_ground(dt, terrain);
    }

    fn resolve_ground(&mut self, dt: f32, terrain: &Terrain) {
        let x = self.body.position().x;
        // Past the last sample there is no ground to land on
        let Ok(ground) = terrain.height_at(x) else {
            return;
        };
        if self.body.bottom() > ground {
            return;
        }

        self.body.transform.position.y = ground + self.body.shape.bottom_offset();
        self.body.velocity.y = 0.0;
        let slope = terrain.slope_at(x);

        match self.state {
            GrenadeState::Flying => {
                if self.body.velocity.x.abs() > GRENADE_ROLL_THRESHOLD {
                    self.body.velocity.x *= GRENADE_BOUNCE_DAMPING;
                    self.body.velocity.x -= slope * GRAVITY * dt;
                } else {
                    self.roll(slope, dt);
                }
                self.state = GrenadeState::Rolling;
            }
            GrenadeState::Rolling => self.roll(slope, dt),
            GrenadeState::Exploded => {}
        }
    }

    /// Friction, then slope: uphill slows, downhill speeds up
    fn roll(&mut self, slope: f32, dt: f32) {
        // At rest the grenade starts downhill; +0.0 and -0.0 both count as rest
        let direction = if self.body.velocity.x != 0.0 {
            self.body.velocity.x.signum()
        } else if slope != 0.0 {
            -slope.signum()
        } else {
            return;
        };
        let mut speed = self.body.velocity.x.abs() * GRENADE_ROLL_FRICTION;
        // slope * direction > 0 means climbing
        speed -= slope * direction * GRAVITY * dt;
        speed = speed.max(0.0);
        if speed < GRENADE_MIN_ROLL_SPEED {
            speed = 0.0;
        }
        self.body.velocity.x = speed * direction;
    }

    /// Mark removed after the explosion was consumed
    pub fn retire(&mut self) {
        self.body.deactivate(DeactivateReason::Exploded);
    }
}
