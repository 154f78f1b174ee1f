//! Timed pose animations
//!
//! Each animation holds a [`Timing`] and derives a relative pose from it.
//! Poses are composed onto the weapon's rest pose with `apply_transform`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::transform::Transform;

/// Start/duration bookkeeping shared by all animations
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Timing {
    pub active: bool,
    /// Milliseconds
    pub start_time: f64,
    /// Milliseconds
    pub duration: f64,
}

impl Timing {
    pub fn new(duration: f64) -> Self {
        Self {
            active: false,
            start_time: 0.0,
            duration,
        }
    }

    /// Restart from `now`
    pub fn start(&mut self, now: f64) {
        self.active = true;
        self.start_time = now;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    pub fn elapsed(&self, now: f64) -> f64 {
        if self.active {
            (now - self.start_time).max(0.0)
        } else {
            0.0
        }
    }

    /// 0..=1; an inactive timing reports 0
    pub fn progress(&self, now: f64) -> f32 {
        if !self.active {
            return 0.0;
        }
        if self.duration <= 0.0 {
            return 1.0;
        }
        (self.elapsed(now) / self.duration).clamp(0.0, 1.0) as f32
    }

    pub fn is_complete(&self, now: f64) -> bool {
        self.active && self.elapsed(now) >= self.duration
    }
}

/// An animation that contributes a relative pose
pub trait PoseAnimation {
    fn timing(&self) -> &Timing;

    /// Relative pose at `now` (identity when idle or finished)
    fn pose(&self, now: f64) -> Transform;

    fn is_playing(&self, now: f64) -> bool {
        self.timing().active && !self.timing().is_complete(now)
    }
}

/// Kick back and muzzle climb, easing out to rest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecoilAnimation {
    pub timing: Timing,
    /// Max backward displacement (world units)
    pub kick: f32,
    /// Max muzzle climb (radians)
    pub climb: f32,
}

impl RecoilAnimation {
    pub fn new(duration_ms: f64, kick: f32, climb: f32) -> Self {
        Self {
            timing: Timing::new(duration_ms),
            kick,
            climb,
        }
    }

    pub fn trigger(&mut self, now: f64) {
        self.timing.start(now);
    }
}

impl Default for RecoilAnimation {
    fn default() -> Self {
        Self::new(120.0, 6.0, 0.12)
    }
}

impl PoseAnimation for RecoilAnimation {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn pose(&self, now: f64) -> Transform {
        if !self.is_playing(now) {
            return Transform::IDENTITY;
        }
        // Full kick at t=0, quadratic ease back to rest
        let remaining = 1.0 - self.timing.progress(now);
        let strength = remaining * remaining;
        Transform {
            position: Vec2::new(-self.kick * strength, 0.0),
            rotation: self.climb * strength,
            ..Transform::IDENTITY
        }
    }
}

/// Tilt the weapon down and bring it back up
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReloadAnimation {
    pub timing: Timing,
    /// Max downward tilt (radians)
    pub tilt: f32,
    /// Max drop toward the body (world units)
    pub drop: f32,
}

impl ReloadAnimation {
    pub fn new(duration_ms: f64, tilt: f32, drop: f32) -> Self {
        Self {
            timing: Timing::new(duration_ms),
            tilt,
            drop,
        }
    }

    pub fn trigger(&mut self, now: f64) {
        self.timing.start(now);
    }
}

impl Default for ReloadAnimation {
    fn default() -> Self {
        Self::new(600.0, 0.6, 4.0)
    }
}

impl PoseAnimation for ReloadAnimation {
    fn timing(&self) -> &Timing {
        &self.timing
    }

    fn pose(&self, now: f64) -> Transform {
        if !self.is_playing(now) {
            return Transform::IDENTITY;
        }
        // Half-sine: down and back up over the duration
        let t = self.timing.progress(now);
        let amount = (t * std::f32::consts::PI).sin();
        Transform {
            position: Vec2::new(0.0, -self.drop * amount),
            rotation: -self.tilt * amount,
            ..Transform::IDENTITY
        }
    }
}
