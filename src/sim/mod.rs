//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or audio dependencies

pub mod bullet;
pub mod collision;
pub mod combatant;
pub mod events;
pub mod geometry;
pub mod grenade;
pub mod physics;
pub mod projectile;
pub mod rocket;
pub mod state;
pub mod terrain;
pub mod tick;
pub mod transform;

pub use bullet::{Bullet, BulletSpec};
pub use collision::{explosion_damage, resolve_collisions, separate_combatants};
pub use combatant::{Combatant, CombatantKind};
pub use events::SimEvent;
pub use geometry::{Aabb, BoxShape, Swept, aabb_overlap, point_in_rect, segment_intersects_rect, swept_collision};
pub use grenade::{Grenade, GrenadeSpec, GrenadeState};
pub use physics::{Movable, apply_gravity};
pub use projectile::{DeactivateReason, Detonation, HolderState, Projectile, ProjectileBody, ProjectileKind};
pub use rocket::{Rocket, RocketSpec};
pub use state::{EntityId, World};
pub use terrain::{Terrain, TerrainConfig, TerrainError, TerrainResult};
pub use tick::tick;
pub use transform::Transform;
