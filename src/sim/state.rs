//! World state: the live entity lists for one level
//!
//! Lists keep spawn order so a run replays identically for the same inputs.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::bullet::{Bullet, BulletSpec};
use super::combatant::Combatant;
use super::events::SimEvent;
use super::grenade::{Grenade, GrenadeSpec};
use super::projectile::Projectile;
use super::rocket::{Rocket, RocketSpec};
use super::terrain::{Terrain, TerrainResult};
use super::transform::Transform;
use crate::consts::*;
use crate::settings::SimulationConfig;

/// Identifier shared by combatants and projectiles
pub type EntityId = u32;

/// Everything the simulation steps each frame
#[derive(Debug, Clone)]
pub struct World {
    pub config: SimulationConfig,
    /// Immutable after creation
    pub terrain: Terrain,
    pub player: Combatant,
    /// Sorted by id
    pub enemies: Vec<Combatant>,
    pub bullets: Vec<Bullet>,
    pub grenades: Vec<Grenade>,
    pub rockets: Vec<Rocket>,
    /// Signals produced since the last `drain_events`
    pub events: Vec<SimEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    next_id: EntityId,
}

impl World {
    /// Generate the level and place the player and enemies on the ground
    pub fn new(config: SimulationConfig) -> TerrainResult<Self> {
        let terrain = Terrain::generated(&config.terrain)?;
        let (_, span_max) = terrain.span()?;

        let player_ground = terrain.height_at(PLAYER_SPAWN_X)?;
        let mut world = Self {
            player: Combatant::player(0, Vec2::new(PLAYER_SPAWN_X, player_ground)),
            terrain,
            enemies: Vec::new(),
            bullets: Vec::new(),
            grenades: Vec::new(),
            rockets: Vec::new(),
            events: Vec::new(),
            time_ticks: 0,
            next_id: 0,
            config,
        };
        world.player.id = world.next_entity_id();

        // Enemies wait in the right three quarters of the level
        let mut rng = Pcg32::seed_from_u64(world.config.seed);
        let min_x = LEVEL_WIDTH * 0.25;
        let max_x = span_max - COMBATANT_WIDTH;
        for _ in 0..world.config.enemy_count {
            let x = rng.random_range(min_x..max_x);
            world.spawn_enemy(x)?;
        }

        log::info!(
            "World created: seed={}, enemies={}",
            world.config.seed,
            world.enemies.len()
        );
        Ok(world)
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Add an enemy standing on the ground at `x`
    pub fn spawn_enemy(&mut self, x: f32) -> TerrainResult<EntityId> {
        let ground = self.terrain.height_at(x)?;
        let id = self.next_entity_id();
        self.enemies.push(Combatant::enemy(id, Vec2::new(x, ground)));
        Ok(id)
    }

    /// Fire a bullet along the muzzle's forward direction
    pub fn fire_bullet(&mut self, owner: EntityId, muzzle: &Transform, spec: &BulletSpec) -> EntityId {
        let id = self.next_entity_id();
        let velocity = muzzle.forward() * spec.speed;
        self.bullets
            .push(Bullet::new(id, muzzle.position, velocity, spec).with_owner(owner));
        id
    }

    /// Throw a grenade along the hand's forward direction
    pub fn throw_grenade(&mut self, hand: &Transform, spec: &GrenadeSpec) -> EntityId {
        let id = self.next_entity_id();
        let velocity = hand.forward() * spec.throw_speed;
        self.grenades.push(Grenade::new(id, hand.position, velocity, spec));
        id
    }

    /// Launch a rocket held by `holder` from the hand transform
    pub fn launch_rocket(&mut self, holder: EntityId, hand: &Transform, spec: &RocketSpec) -> EntityId {
        if self.combatant(holder).is_none() {
            log::warn!("rocket launched by unknown holder {}", holder);
        }
        let id = self.next_entity_id();
        let mut rocket = Rocket::new(id, holder, spec);
        rocket.prepare_for_launch(hand, hand.forward() * spec.speed);
        self.rockets.push(rocket);
        id
    }

    /// Player or enemy by id
    pub fn combatant(&self, id: EntityId) -> Option<&Combatant> {
        self.combatants().find(|c| c.id == id)
    }

    pub fn combatant_mut(&mut self, id: EntityId) -> Option<&mut Combatant> {
        if self.player.id == id {
            return Some(&mut self.player);
        }
        self.enemies.iter_mut().find(|c| c.id == id)
    }

    /// Player first, then enemies
    pub fn combatants(&self) -> impl Iterator<Item = &Combatant> {
        std::iter::once(&self.player).chain(self.enemies.iter())
    }

    pub fn active_enemies(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_active()).count()
    }

    /// Every projectile still in the live lists
    pub fn live_projectiles(&self) -> impl Iterator<Item = Projectile<'_>> {
        self.bullets
            .iter()
            .map(Projectile::Bullet)
            .chain(self.grenades.iter().map(Projectile::Grenade))
            .chain(self.rockets.iter().map(Projectile::Rocket))
    }

    /// Drop projectiles that went inactive this frame
    pub fn remove_inactive_projectiles(&mut self) {
        self.bullets.retain(|b| b.is_active());
        self.grenades.retain(|g| g.is_active());
        self.rockets.retain(|r| r.is_active());
    }

    /// Take this frame's effect signals
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }
}
