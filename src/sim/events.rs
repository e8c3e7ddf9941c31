//! Effect signals for particle and sound collaborators
//!
//! The simulation only says that something happened and where. Drawing and
//! playback are someone else's job.

use glam::Vec2;
use serde::Serialize;

use super::combatant::CombatantKind;
use super::projectile::ProjectileKind;
use super::state::EntityId;

/// Particle palettes (0xRRGGBB)
pub mod palette {
    pub const BLOOD: &[u32] = &[0x8a0303, 0xb31b1b, 0x5c0000];
    pub const DIRT: &[u32] = &[0x6b4f2a, 0x8b6b3d, 0x4a3720];
    pub const FIRE: &[u32] = &[0xff4500, 0xffa500, 0xffd700, 0x333333];
}

/// Full-quality particle counts per effect
pub const HIT_PARTICLES: u32 = 12;
pub const TERRAIN_IMPACT_PARTICLES: u32 = 8;
pub const EXPLOSION_PARTICLES: u32 = 40;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SimEvent {
    /// A bullet struck a combatant
    Hit {
        target: EntityId,
        target_kind: CombatantKind,
        projectile: EntityId,
        position: Vec2,
        damage: f32,
        colors: &'static [u32],
        particles: u32,
    },
    /// A bullet struck the ground
    TerrainImpact {
        projectile: EntityId,
        position: Vec2,
        colors: &'static [u32],
        particles: u32,
    },
    /// A grenade or rocket went off
    Explosion {
        projectile: EntityId,
        kind: ProjectileKind,
        position: Vec2,
        radius: f32,
        colors: &'static [u32],
        particles: u32,
    },
    /// A combatant's health reached zero
    Killed {
        target: EntityId,
        target_kind: CombatantKind,
        position: Vec2,
    },
}

impl SimEvent {
    pub fn position(&self) -> Vec2 {
        match self {
            SimEvent::Hit { position, .. }
            | SimEvent::TerrainImpact { position, .. }
            | SimEvent::Explosion { position, .. }
            | SimEvent::Killed { position, .. } => *position,
        }
    }
}
