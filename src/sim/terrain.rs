//! Procedural terrain heightfield
//!
//! The ground is a piecewise-linear surface sampled every
//! `TERRAIN_SAMPLE_SPACING` units across the level. Each pair of neighbouring
//! samples also forms a solid column reaching down to `WORLD_BOTTOM`, which is
//! what boxes collide against.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::geometry::{Aabb, aabb_overlap};
use crate::consts::*;
use crate::lerp;

/// Terrain query/generation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TerrainError {
    #[error("terrain has not been generated")]
    NotGenerated,
    #[error("x = {x} is outside the terrain span [{min}, {max}]")]
    OutOfRange { x: f32, min: f32, max: f32 },
    #[error("invalid terrain config: {0}")]
    InvalidConfig(&'static str),
}

pub type TerrainResult<T> = Result<T, TerrainError>;

/// Generation parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerrainConfig {
    /// Peak deviation from ground level of the main wave
    pub amplitude: f32,
    /// Base angular frequency (radians per world unit)
    pub frequency: f32,
    /// Weight and phase of the low-frequency detail wave
    pub roughness: f32,
}

impl Default for TerrainConfig {
    fn default() -> Self {
        Self {
            amplitude: 80.0,
            frequency: 0.0015,
            roughness: 0.5,
        }
    }
}

impl TerrainConfig {
    fn validate(&self) -> TerrainResult<()> {
        let ok = |v: f32| v.is_finite() && v > 0.0;
        if !ok(self.amplitude) {
            return Err(TerrainError::InvalidConfig("amplitude must be positive"));
        }
        if !ok(self.frequency) {
            return Err(TerrainError::InvalidConfig("frequency must be positive"));
        }
        if !ok(self.roughness) {
            return Err(TerrainError::InvalidConfig("roughness must be positive"));
        }
        Ok(())
    }

    /// Raw surface height at `x` before clamping
    fn sample(&self, x: f32) -> f32 {
        let f = self.frequency;
        let main = (x * f * 2.0).sin() * self.amplitude;
        let ripple = (x * f * 5.0).sin() * self.amplitude * 0.25;
        let swell = (x * f + self.roughness * std::f32::consts::PI).sin()
            * self.amplitude
            * self.roughness
            * 0.5;
        GROUND_LEVEL + main + ripple + swell
    }
}

/// Heightfield terrain
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Terrain {
    /// Sample points, strictly increasing in x
    points: Vec<Vec2>,
}

impl Terrain {
    /// Empty terrain; queries fail until `generate` runs
    pub fn new() -> Self {
        Self::default()
    }

    /// Build and generate in one step
    pub fn generated(config: &TerrainConfig) -> TerrainResult<Self> {
        let mut terrain = Self::new();
        terrain.generate(config)?;
        Ok(terrain)
    }

    /// Replace the heightfield with one generated from `config`
    ///
    /// Deterministic: the same config always yields the same points.
    pub fn generate(&mut self, config: &TerrainConfig) -> TerrainResult<()> {
        config.validate()?;

        let count = (LEVEL_WIDTH / TERRAIN_SAMPLE_SPACING).ceil() as usize;
        self.points = (0..count)
            .map(|i| {
                let x = i as f32 * TERRAIN_SAMPLE_SPACING;
                let height = config
                    .sample(x)
                    .clamp(TERRAIN_MIN_HEIGHT, TERRAIN_MAX_HEIGHT);
                Vec2::new(x, height)
            })
            .collect();

        let (min_h, max_h) = self
            .points
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), p| (lo.min(p.y), hi.max(p.y)));
        log::info!(
            "Terrain generated: {} points, height {:.1}..{:.1}",
            self.points.len(),
            min_h,
            max_h
        );
        Ok(())
    }

    pub fn is_generated(&self) -> bool {
        self.points.len() >= 2
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    /// Valid query range `[first.x, last.x]`
    pub fn span(&self) -> TerrainResult<(f32, f32)> {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.is_generated() => Ok((first.x, last.x)),
            _ => Err(TerrainError::NotGenerated),
        }
    }

    /// Surface height at `x`, linearly interpolated between the bracketing samples
    pub fn height_at(&self, x: f32) -> TerrainResult<f32> {
        let (min, max) = self.span()?;
        if !(min..=max).contains(&x) {
            return Err(TerrainError::OutOfRange { x, min, max });
        }

        // Index of the first sample strictly right of x
        let upper = self.points.partition_point(|p| p.x <= x);
        if upper >= self.points.len() {
            // x == last.x
            return Ok(self.points[self.points.len() - 1].y);
        }
        let a = self.points[upper - 1];
        let b = self.points[upper];
        let t = (x - a.x) / (b.x - a.x);
        Ok(lerp(a.y, b.y, t))
    }

    /// Central-difference slope (dh/dx) at `x`; flat (0) wherever either sample is unavailable
    pub fn slope_at(&self, x: f32) -> f32 {
        self.slope_at_with(x, SLOPE_SAMPLE_DISTANCE)
    }

    pub fn slope_at_with(&self, x: f32, sample_distance: f32) -> f32 {
        match (
            self.height_at(x + sample_distance),
            self.height_at(x - sample_distance),
        ) {
            (Ok(ahead), Ok(behind)) => (ahead - behind) / (2.0 * sample_distance),
            _ => 0.0,
        }
    }

    /// Ground columns between consecutive samples, from the higher of the two
    /// samples down to the world bottom
    pub fn segments(&self) -> impl Iterator<Item = Aabb> + '_ {
        self.points.windows(2).map(|pair| {
            Aabb::new(
                Vec2::new(pair[0].x, pair[0].y.max(pair[1].y)),
                Vec2::new(pair[1].x, WORLD_BOTTOM),
            )
        })
    }

    /// True if the box strictly overlaps any ground column
    pub fn check_collision(&self, bounds: &Aabb) -> bool {
        self.segments().any(|segment| aabb_overlap(bounds, &segment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn terrain() -> Terrain {
        Terrain::generated(&TerrainConfig::default()).unwrap()
    }

    #[test]
    fn test_generate_layout() {
        let t = terrain();
        let points = t.points();
        assert_eq!(points.len(), 80);
        assert_eq!(points[0].x, 0.0);
        assert_eq!(points[79].x, 7900.0);
        assert!(points.windows(2).all(|w| w[1].x > w[0].x));
        assert!(
            points
                .iter()
                .all(|p| p.y >= TERRAIN_MIN_HEIGHT && p.y <= TERRAIN_MAX_HEIGHT)
        );
    }

    #[test]
    fn test_generate_clamps_extreme_amplitude() {
        let config = TerrainConfig {
            amplitude: 5000.0,
            ..Default::default()
        };
        let t = Terrain::generated(&config).unwrap();
        assert!(t.points().iter().any(|p| p.y == TERRAIN_MAX_HEIGHT));
        assert!(t.points().iter().any(|p| p.y == TERRAIN_MIN_HEIGHT));
    }

    #[test]
    fn test_generate_is_deterministic() {
        let a = terrain();
        let b = terrain();
        assert_eq!(a.points(), b.points());
        for x in [0.0, 123.4, 1050.0, 7899.0] {
            assert_eq!(a.height_at(x).unwrap(), b.height_at(x).unwrap());
        }
    }

    #[test]
    fn test_generate_rejects_bad_config() {
        let mut t = Terrain::new();
        let config = TerrainConfig {
            frequency: 0.0,
            ..Default::default()
        };
        assert!(matches!(t.generate(&config), Err(TerrainError::InvalidConfig(_))));
        assert!(!t.is_generated());
    }

    #[test]
    fn test_height_at_interpolates() {
        let t = terrain();
        let h1000 = t.height_at(1000.0).unwrap();
        let h1100 = t.height_at(1100.0).unwrap();
        let h1050 = t.height_at(1050.0).unwrap();
        assert!((h1050 - (h1000 + h1100) / 2.0).abs() < 0.001);
        assert_eq!(h1000, t.points()[10].y);
    }

    #[test]
    fn test_height_at_endpoints() {
        let t = terrain();
        assert_eq!(t.height_at(0.0).unwrap(), t.points()[0].y);
        assert_eq!(t.height_at(7900.0).unwrap(), t.points()[79].y);
    }

    #[test]
    fn test_height_at_out_of_range() {
        let t = terrain();
        assert!(matches!(t.height_at(-1.0), Err(TerrainError::OutOfRange { .. })));
        assert!(matches!(t.height_at(7950.0), Err(TerrainError::OutOfRange { .. })));
    }

    #[test]
    fn test_height_at_before_generate() {
        let t = Terrain::new();
        assert_eq!(t.height_at(100.0), Err(TerrainError::NotGenerated));
        assert_eq!(t.slope_at(100.0), 0.0);
    }

    #[test]
    fn test_slope_at_matches_central_difference() {
        let t = terrain();
        let x = 2010.0;
        let expected = (t.height_at(x + 20.0).unwrap() - t.height_at(x - 20.0).unwrap()) / 40.0;
        assert!((t.slope_at(x) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_slope_at_edges_is_flat() {
        let t = terrain();
        assert_eq!(t.slope_at(5.0), 0.0);
        assert_eq!(t.slope_at(7890.0), 0.0);
    }

    #[test]
    fn test_check_collision() {
        let t = terrain();
        let ground = t.height_at(1000.0).unwrap();

        // Box straddling the surface
        let buried = Aabb::new(Vec2::new(990.0, ground + 5.0), Vec2::new(1010.0, ground - 5.0));
        assert!(t.check_collision(&buried));

        // Box well above the highest possible column
        let high = Aabb::new(
            Vec2::new(990.0, TERRAIN_MAX_HEIGHT + 50.0),
            Vec2::new(1010.0, TERRAIN_MAX_HEIGHT + 10.0),
        );
        assert!(!t.check_collision(&high));
    }

    #[test]
    fn test_box_under_rising_surface_collides() {
        let t = terrain();
        // Ground climbs between x=0 and x=100
        assert!(t.points()[1].y > t.points()[0].y);
        let surface = t.height_at(90.0).unwrap();
        let buried = Aabb::new(Vec2::new(88.0, surface - 1.0), Vec2::new(92.0, surface - 5.0));
        assert!(buried.max_y() > t.points()[0].y);
        assert!(t.check_collision(&buried));
    }

    #[test]
    fn test_columns_cover_the_surface() {
        let t = terrain();
        for (column, pair) in t.segments().zip(t.points().windows(2)) {
            assert_eq!(column.max_y(), pair[0].y.max(pair[1].y));
            assert_eq!(column.min_x(), pair[0].x);
            assert_eq!(column.max_x(), pair[1].x);
        }
    }

    #[test]
    fn test_check_collision_touching_is_not_overlap() {
        let t = terrain();
        let top = t.segments().nth(20).unwrap().max_y();
        // Bottom edge exactly on the column top
        let resting = Aabb::new(Vec2::new(2010.0, top + 10.0), Vec2::new(2020.0, top));
        assert!(!t.check_collision(&resting));
    }

    proptest! {
        #[test]
        fn prop_height_between_bracketing_samples(x in 0.0f32..7900.0) {
            let t = terrain();
            let i = (x / TERRAIN_SAMPLE_SPACING).floor() as usize;
            let a = t.points()[i].y;
            let b = t.points()[(i + 1).min(79)].y;
            let h = t.height_at(x).unwrap();
            prop_assert!(h >= a.min(b) - 1e-3 && h <= a.max(b) + 1e-3);
        }
    }
}
