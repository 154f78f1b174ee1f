//! Sidearm - kinematics and effects core for a 2D side-view shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (transforms, weapons, pools, camera)
//! - `renderer`: Read-only draw data built from simulation state
//! - `settings`: User preferences and quality presets
//! - `error`: Configuration loading errors
//!
//! World space is Y-up. Time deltas are in seconds, timestamps in milliseconds.

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::ConfigError;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Hard cap on live casings (oldest evicted first)
    pub const CASING_CAPACITY: usize = 100;
    /// Downward acceleration applied to casings (units/s²)
    pub const CASING_GRAVITY: f32 = 980.0;
    /// Velocity multiplier applied once per casing update
    pub const CASING_DAMPING: f32 = 0.98;
    /// Ejection speed variance range (multiplier)
    pub const CASING_SPEED_VARIANCE: (f32, f32) = (0.7, 1.3);
    /// Life variance range (multiplier)
    pub const CASING_LIFE_VARIANCE: (f32, f32) = (0.8, 1.2);
    /// Spin variance range (multiplier)
    pub const CASING_SPIN_VARIANCE: (f32, f32) = (0.6, 1.4);
    /// Max angular perturbation around the ejection direction (radians)
    pub const CASING_ANGLE_JITTER: f32 = 0.25;

    /// Downward acceleration applied to non-smoke particles (units/s²)
    pub const PARTICLE_GRAVITY: f32 = 400.0;
    /// Velocity multiplier applied once per particle update
    pub const PARTICLE_DAMPING: f32 = 0.96;
    /// Absolute particle life range (seconds)
    pub const PARTICLE_LIFE_RANGE: (f32, f32) = (0.5, 1.5);
    /// Particle launch speed per unit of explosion radius
    pub const PARTICLE_SPEED_PER_RADIUS: f32 = 4.0;
    /// Particle speed variance range (multiplier)
    pub const PARTICLE_SPEED_VARIANCE: (f32, f32) = (0.5, 1.5);
    /// Max angular perturbation around the radial direction (radians)
    pub const PARTICLE_ANGLE_JITTER: f32 = 0.35;

    /// Default world bounds
    pub const LEVEL_WIDTH: f32 = 4000.0;
    pub const WORLD_BOTTOM: f32 = 0.0;
    pub const WORLD_TOP: f32 = 1200.0;
    /// Terrain height assumed when no terrain is attached
    pub const FALLBACK_TERRAIN_HEIGHT: f32 = 100.0;
    /// Camera exponential smoothing rate (1/s)
    pub const CAMERA_SMOOTHING: f32 = 5.0;

    /// Ejection port position between grip (0) and muzzle (1)
    pub const EJECTION_PORT_FRACTION: f32 = 0.6;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid can round up to TAU for tiny negative inputs
    if wrapped >= PI { -PI } else { wrapped }
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Rotate `v` by `angle` radians (counter-clockwise)
#[inline]
pub fn rotate(v: Vec2, angle: f32) -> Vec2 {
    Vec2::from_angle(angle).rotate(v)
}
