//! Ridge Runner - side-scrolling combat physics core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (terrain, projectiles, collisions, damage)
//! - `settings`: Simulation configuration (debug flag, seed, terrain parameters)
//!
//! Rendering, input, audio and animation are external collaborators. They read
//! entity state and consume the `SimEvent`s produced each tick.

pub mod settings;
pub mod sim;

pub use settings::{QualityPreset, SettingsError, SimulationConfig};

use glam::Vec2;

/// World constants and tuning values
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// World bounds (Y-up)
    pub const WORLD_TOP: f32 = 600.0;
    pub const WORLD_BOTTOM: f32 = 0.0;
    pub const LEVEL_WIDTH: f32 = 8000.0;
    /// Projectiles may rise this far above WORLD_TOP before they are culled
    pub const WORLD_TOP_MARGIN: f32 = 100.0;

    /// Terrain heightfield
    pub const TERRAIN_SAMPLE_SPACING: f32 = 100.0;
    pub const SLOPE_SAMPLE_DISTANCE: f32 = 20.0;
    pub const GROUND_LEVEL: f32 = 150.0;
    pub const TERRAIN_MIN_HEIGHT: f32 = WORLD_BOTTOM + 20.0;
    pub const TERRAIN_MAX_HEIGHT: f32 = WORLD_TOP - 100.0;

    /// Gravity (units/s², pulls toward -Y)
    pub const GRAVITY: f32 = 1500.0;

    /// Bullets die after travelling this far
    pub const BULLET_MAX_TRAVEL: f32 = 1500.0;

    /// Grenade ground behaviour
    pub const GRENADE_ROLL_THRESHOLD: f32 = 50.0;
    pub const GRENADE_BOUNCE_DAMPING: f32 = 0.6;
    pub const GRENADE_ROLL_FRICTION: f32 = 0.98;
    pub const GRENADE_MIN_ROLL_SPEED: f32 = 5.0;
    /// Visual spin per unit of horizontal velocity (radians per unit)
    pub const GRENADE_SPIN_FACTOR: f32 = 0.05;

    /// Rocket stabilizer fin spin (radians/s, cosmetic)
    pub const ROCKET_STABILIZER_SPIN: f32 = 12.0;

    /// Combatant defaults
    pub const PLAYER_MAX_HEALTH: f32 = 100.0;
    pub const ENEMY_MAX_HEALTH: f32 = 50.0;
    pub const COMBATANT_WIDTH: f32 = 40.0;
    pub const COMBATANT_HEIGHT: f32 = 80.0;
    pub const PLAYER_SPAWN_X: f32 = 200.0;
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// True if `p` lies outside the region projectiles are allowed to live in
#[inline]
pub fn out_of_world(p: Vec2) -> bool {
    use consts::*;
    p.x < 0.0 || p.x >= LEVEL_WIDTH || p.y < WORLD_BOTTOM || p.y > WORLD_TOP + WORLD_TOP_MARGIN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(10.0, 20.0, 0.5), 15.0);
        assert_eq!(lerp(10.0, 20.0, 0.0), 10.0);
        assert_eq!(lerp(10.0, 20.0, 1.0), 20.0);
    }

    #[test]
    fn test_out_of_world() {
        assert!(!out_of_world(Vec2::new(0.0, 0.0)));
        assert!(!out_of_world(Vec2::new(7999.0, 700.0)));
        assert!(out_of_world(Vec2::new(8000.0, 100.0)));
        assert!(out_of_world(Vec2::new(-0.1, 100.0)));
        assert!(out_of_world(Vec2::new(100.0, -0.1)));
        assert!(out_of_world(Vec2::new(100.0, 700.1)));
    }
}
