//! Player and enemy bodies
//!
//! Health stays within `[0, max_health]`. A combatant goes inactive exactly
//! when its health reaches zero and only `reset` brings it back.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Aabb, BoxShape};
use super::physics::{Movable, apply_gravity};
use super::state::EntityId;
use super::terrain::Terrain;
use super::transform::Transform;
use crate::consts::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CombatantKind {
    Player,
    Enemy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Combatant {
    pub id: EntityId,
    pub kind: CombatantKind,
    /// Anchored at the feet
    pub transform: Transform,
    pub velocity: Vec2,
    pub shape: BoxShape,
    /// Explosion falloff is measured to this point, relative to the feet
    pub center_of_gravity: Vec2,
    pub max_health: f32,
    health: f32,
    active: bool,
    pub grounded: bool,
}

impl Combatant {
    pub fn new(id: EntityId, kind: CombatantKind, position: Vec2) -> Self {
        let max_health = match kind {
            CombatantKind::Player => PLAYER_MAX_HEALTH,
            CombatantKind::Enemy => ENEMY_MAX_HEALTH,
        };
        Self {
            id,
            kind,
            transform: Transform::at(position),
            velocity: Vec2::ZERO,
            shape: BoxShape::standing(COMBATANT_WIDTH, COMBATANT_HEIGHT),
            center_of_gravity: Vec2::new(0.0, COMBATANT_HEIGHT * 0.5),
            max_health,
            health: max_health,
            active: true,
            grounded: false,
        }
    }

    pub fn player(id: EntityId, position: Vec2) -> Self {
        Self::new(id, CombatantKind::Player, position)
    }

    pub fn enemy(id: EntityId, position: Vec2) -> Self {
        Self::new(id, CombatantKind::Enemy, position)
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.transform.position
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn bounds(&self) -> Aabb {
        self.shape.bounds_at(self.transform.position)
    }

    pub fn center_of_gravity(&self) -> Vec2 {
        self.transform.position + self.center_of_gravity
    }

    /// Subtract health; returns true if this call killed the combatant
    pub fn apply_damage(&mut self, amount: f32) -> bool {
        if !self.active || amount <= 0.0 {
            return false;
        }
        self.health = (self.health - amount).max(0.0);
        if self.health == 0.0 {
            self.active = false;
            log::info!("{:?} {} killed", self.kind, self.id);
            return true;
        }
        false
    }

    /// Restore health up to the maximum; the dead stay dead
    pub fn heal(&mut self, amount: f32) {
        if self.active && amount > 0.0 {
            self.health = (self.health + amount).min(self.max_health);
        }
    }

    /// Full health, active again, at `position`
    pub fn reset(&mut self, position: Vec2) {
        self.transform.position = position;
        self.velocity = Vec2::ZERO;
        self.health = self.max_health;
        self.active = true;
        self.grounded = false;
    }

    /// Fall under gravity, stay inside the level and stand on the ground
    pub fn update(&mut self, dt: f32, terrain: &Terrain) {
        if !self.active {
            return;
        }

        apply_gravity(self, dt);

        let half_width = self.shape.width * 0.5;
        let max_x = terrain
            .span()
            .map(|(_, max)| max)
            .unwrap_or(LEVEL_WIDTH)
            .min(LEVEL_WIDTH);
        self.transform.position.x = self.transform.position.x.clamp(half_width, max_x - half_width);

        self.grounded = false;
        if let Ok(ground) = terrain.height_at(self.transform.position.x) {
            let bottom = self.bounds().min_y();
            if bottom <= ground {
                self.transform.position.y = ground + self.shape.bottom_offset();
                self.velocity.y = 0.0;
                self.grounded = true;
            }
        }
    }
}

impl Movable for Combatant {
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
