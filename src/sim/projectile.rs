//! State shared by every projectile kind
//!
//! Lifecycle: spawned active, mutated by its own update each frame, and
//! removed from the world once inactive. Deactivation is terminal.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bullet::Bullet;
use super::geometry::{Aabb, BoxShape, Swept};
use super::grenade::Grenade;
use super::physics::Movable;
use super::rocket::Rocket;
use super::state::EntityId;
use super::transform::Transform;
use crate::out_of_world;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectileKind {
    Bullet,
    Grenade,
    Rocket,
}

impl ProjectileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectileKind::Bullet => "bullet",
            ProjectileKind::Grenade => "grenade",
            ProjectileKind::Rocket => "rocket",
        }
    }
}

/// Why a projectile left play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeactivateReason {
    OutOfBounds,
    TravelLimit,
    HitCombatant,
    HitTerrain,
    Exploded,
}

/// Who a projectile may not collide with yet
///
/// `Held` before launch, `Clearing` from launch until the projectile's box
/// stops overlapping the launcher, `Free` afterwards. Only `launch` and
/// `clear` move between states, and neither ever goes backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HolderState {
    Held(EntityId),
    Clearing(EntityId),
    Free,
}

impl HolderState {
    /// Held -> Clearing; any other state is returned unchanged
    pub fn launch(self) -> Self {
        match self {
            HolderState::Held(id) => HolderState::Clearing(id),
            other => other,
        }
    }

    /// Clearing -> Free; any other state is returned unchanged
    pub fn clear(self) -> Self {
        match self {
            HolderState::Clearing(_) => HolderState::Free,
            other => other,
        }
    }

    /// The launcher still being cleared, if any
    pub fn clearing(&self) -> Option<EntityId> {
        match self {
            HolderState::Clearing(id) => Some(*id),
            _ => None,
        }
    }
}

/// One-shot explosion produced when a grenade or rocket explodes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detonation {
    pub projectile: EntityId,
    pub kind: ProjectileKind,
    pub center: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// Position, motion and lifecycle common to bullets, grenades and rockets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileBody {
    pub id: EntityId,
    pub kind: ProjectileKind,
    pub transform: Transform,
    pub velocity: Vec2,
    pub shape: BoxShape,
    /// Position at the start of the current frame (for swept tests)
    pub previous_position: Vec2,
    active: bool,
    deactivated_by: Option<DeactivateReason>,
}

impl ProjectileBody {
    pub fn new(id: EntityId, kind: ProjectileKind, position: Vec2, velocity: Vec2, size: f32) -> Self {
        Self {
            id,
            kind,
            transform: Transform::at(position),
            velocity,
            shape: BoxShape::centered(size),
            previous_position: position,
            active: true,
            deactivated_by: None,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn deactivated_by(&self) -> Option<DeactivateReason> {
        self.deactivated_by
    }

    pub fn bounds(&self) -> Aabb {
        self.shape.bounds_at(self.transform.position)
    }

    /// Y of the bottom edge of the box
    pub fn bottom(&self) -> f32 {
        self.bounds().min_y()
    }

    /// Record the start-of-frame position and cull if out of the world
    ///
    /// Returns false when the projectile is (now) inactive and the caller
    /// must skip the rest of its update.
    pub fn begin_frame(&mut self) -> bool {
        if !self.active {
            return false;
        }
        self.previous_position = self.transform.position;
        if out_of_world(self.transform.position) {
            self.deactivate(DeactivateReason::OutOfBounds);
            return false;
        }
        true
    }

    /// Take the projectile out of play; repeated calls are no-ops
    pub fn deactivate(&mut self, reason: DeactivateReason) {
        if !self.active {
            return;
        }
        self.active = false;
        self.deactivated_by = Some(reason);
        log::debug!(
            "{} {} deactivated at ({:.1}, {:.1}): {:?}",
            self.kind.as_str(),
            self.id,
            self.transform.position.x,
            self.transform.position.y,
            reason
        );
    }
}

impl Movable for ProjectileBody {
    fn position(&self) -> Vec2 {
        self.transform.position
    }
    fn velocity(&self) -> Vec2 {
        self.velocity
    }
    fn position_mut(&mut self) -> &mut Vec2 {
        &mut self.transform.position
    }
    fn velocity_mut(&mut self) -> &mut Vec2 {
        &mut self.velocity
    }
}

impl Swept for ProjectileBody {
    fn bounds(&self) -> Aabb {
        ProjectileBody::bounds(self)
    }
    fn previous_position(&self) -> Vec2 {
        self.previous_position
    }
    fn current_position(&self) -> Vec2 {
        self.transform.position
    }
}

/// Read-only view over any live projectile, for renderers
#[derive(Debug, Clone, Copy)]
pub enum Projectile<'a> {
    Bullet(&'a Bullet),
    Grenade(&'a Grenade),
    Rocket(&'a Rocket),
}

impl<'a> Projectile<'a> {
    pub fn body(&self) -> &'a ProjectileBody {
        match self {
            Projectile::Bullet(b) => &b.body,
            Projectile::Grenade(g) => &g.body,
            Projectile::Rocket(r) => &r.body,
        }
    }

    pub fn id(&self) -> EntityId {
        self.body().id
    }

    pub fn kind(&self) -> ProjectileKind {
        self.body().kind
    }

    pub fn transform(&self) -> Transform {
        self.body().transform
    }

    pub fn velocity(&self) -> Vec2 {
        self.body().velocity
    }

    pub fn bounds(&self) -> Aabb {
        self.body().bounds()
    }

    pub fn is_active(&self) -> bool {
        self.body().is_active()
    }

    pub fn is_exploded(&self) -> bool {
        match self {
            Projectile::Bullet(_) => false,
            Projectile::Grenade(g) => g.is_exploded(),
            Projectile::Rocket(r) => r.is_exploded(),
        }
    }
}
