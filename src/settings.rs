//! Simulation settings and preferences
//!
//! Persisted as JSON next to the game binary.

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

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

    /// Explosion particle ceiling for this preset (`None` = unbounded)
    pub fn particle_cap(&self) -> Option<usize> {
        match self {
            QualityPreset::Low => Some(256),
            QualityPreset::Medium => Some(1024),
            QualityPreset::High => None,
        }
    }
}

impl FromStr for QualityPreset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(QualityPreset::Low),
            "medium" | "med" => Ok(QualityPreset::Medium),
            "high" => Ok(QualityPreset::High),
            other => Err(ConfigError::invalid(
                "quality",
                format!("unknown preset `{other}`"),
            )),
        }
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Effects ===
    /// Spawn spent casings on each shot
    pub casings: bool,
    /// Spawn explosion particles
    pub particles: bool,

    // === Camera ===
    /// Horizontal lead added to the camera origin (world units)
    pub camera_look_ahead: f32,
    /// Vertical lead added to the camera origin (world units)
    pub camera_vertical_lead: f32,

    /// RNG seed for effect variance
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,
            casings: true,
            particles: true,
            camera_look_ahead: 0.0,
            camera_vertical_lead: 0.0,
            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective particle ceiling (`Some(0)` when particles are disabled)
    pub fn particle_cap(&self) -> Option<usize> {
        if !self.particles {
            Some(0)
        } else {
            self.quality.particle_cap()
        }
    }

    /// Parse settings from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any error
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load_from(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Using default settings: {e}");
                Self::default()
            }
        }
    }

    /// Save settings as pretty JSON
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        log::info!("Settings saved");
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.camera_look_ahead.is_finite() {
            return Err(ConfigError::invalid("camera_look_ahead", "must be finite"));
        }
        if !self.camera_vertical_lead.is_finite() {
            return Err(ConfigError::invalid(
                "camera_vertical_lead",
                "must be finite",
            ));
        }
        Ok(())
    }
}
