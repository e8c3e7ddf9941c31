//! Simulation settings
//!
//! Passed explicitly into the world and collision pass. Nothing here is
//! process-wide state.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::TerrainConfig;

/// Errors from loading settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub fn as_str(&self) -> &'static str {
        match self {
            QualityPreset::Low => "Low",
            QualityPreset::Medium => "Medium",
            QualityPreset::High => "High",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "low" => Some(QualityPreset::Low),
            "medium" | "med" => Some(QualityPreset::Medium),
            "high" => Some(QualityPreset::High),
            _ => None,
        }
    }

    /// Multiplier applied to particle counts in hit/explosion signals
    pub fn particle_scale(&self) -> f32 {
        match self {
            QualityPreset::Low => 0.25,
            QualityPreset::Medium => 0.6,
            QualityPreset::High => 1.0,
        }
    }
}

/// Simulation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Extra collision logging (bounding boxes on every resolved hit)
    pub debug: bool,
    /// Seed for enemy placement
    pub seed: u64,
    /// Terrain generation parameters
    pub terrain: TerrainConfig,
    /// Enemies spawned by `World::new`
    pub enemy_count: u32,
    /// Particle density for effect signals
    pub quality: QualityPreset,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            debug: false,
            seed: 12345,
            terrain: TerrainConfig::default(),
            enemy_count: 5,
            quality: QualityPreset::Medium,
        }
    }
}

impl SimulationConfig {
    /// Parse from a JSON document (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Scale a full-quality particle count by the quality preset (never below 1)
    pub fn particles(&self, full: u32) -> u32 {
        ((full as f32 * self.quality.particle_scale()).round() as u32).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quality_parse() {
        assert_eq!(QualityPreset::parse("LOW"), Some(QualityPreset::Low));
        assert_eq!(QualityPreset::parse("med"), Some(QualityPreset::Medium));
        assert_eq!(QualityPreset::parse("ultra"), None);
        assert_eq!(QualityPreset::High.as_str(), "High");
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SimulationConfig::from_json(r#"{ "debug": true, "enemy_count": 2 }"#).unwrap();
        assert!(config.debug);
        assert_eq!(config.enemy_count, 2);
        assert_eq!(config.seed, SimulationConfig::default().seed);
        assert_eq!(config.quality, QualityPreset::Medium);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = SimulationConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = SimulationConfig::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_particle_scaling() {
        let mut config = SimulationConfig::default();
        config.quality = QualityPreset::High;
        assert_eq!(config.particles(20), 20);
        config.quality = QualityPreset::Low;
        assert_eq!(config.particles(20), 5);
        assert_eq!(config.particles(1), 1);
    }
}
