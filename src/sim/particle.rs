//! Explosion particles
//!
//! Particles spawn in bursts from an [`Explosion`] and fly radially outward.
//! Smoke-colored particles ignore gravity and drift; everything else falls.

use std::collections::VecDeque;
use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::rng::SimRng;
use crate::consts::*;
use crate::polar_to_cartesian;

/// Greys that float instead of falling
pub const SMOKE_COLORS: [u32; 3] = [0x555555, 0x777777, 0x999999];

/// Fire palette used by explosive rounds
pub const FIRE_COLORS: [u32; 4] = [0xFF4500, 0xFF8C00, 0xFFD700, 0xB22222];

/// Whether a particle of this color is exempt from gravity
pub fn is_smoke(color: u32) -> bool {
    SMOKE_COLORS.contains(&color)
}

/// Burst descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Explosion {
    pub center: Vec2,
    pub radius: f32,
    /// Candidate colors (0xRRGGBB), one picked per particle
    pub colors: Vec<u32>,
    pub particle_count: usize,
}

impl Explosion {
    pub fn new(center: Vec2, radius: f32, colors: Vec<u32>, particle_count: usize) -> Self {
        Self {
            center,
            radius,
            colors,
            particle_count,
        }
    }

    /// Fire and smoke burst sized by radius
    pub fn fiery(center: Vec2, radius: f32) -> Self {
        let colors = FIRE_COLORS.iter().chain(SMOKE_COLORS.iter()).copied().collect();
        let count = ((radius * 0.5) as usize).clamp(8, 64);
        Self::new(center, radius, colors, count)
    }
}

/// A single debris/smoke particle
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    /// 0xRRGGBB
    pub color: u32,
    pub size: f32,
}

impl Particle {
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    fn step(&mut self, dt: f32) -> bool {
        self.position += self.velocity * dt;
        if !is_smoke(self.color) {
            self.velocity.y -= PARTICLE_GRAVITY * dt;
        }
        self.velocity *= PARTICLE_DAMPING;
        self.life -= dt;
        self.life > 0.0
    }
}

/// Particle pool; unbounded unless a ceiling is set
#[derive(Debug, Clone, Default)]
pub struct ParticlePool {
    particles: VecDeque<Particle>,
    cap: Option<usize>,
}

impl ParticlePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pool that evicts its oldest particles beyond `cap`
    pub fn with_cap(cap: Option<usize>) -> Self {
        Self {
            particles: VecDeque::new(),
            cap,
        }
    }

    pub fn cap(&self) -> Option<usize> {
        self.cap
    }

    pub fn set_cap(&mut self, cap: Option<usize>) {
        self.cap = cap;
        self.enforce_cap();
    }

    /// Spawn `explosion.particle_count` particles
    pub fn create_explosion(&mut self, explosion: &Explosion, rng: &mut SimRng) {
        let count = explosion.particle_count;
        if count == 0 {
            return;
        }
        log::info!(
            "explosion at ({:.0}, {:.0}) r={:.0}, {} particles",
            explosion.center.x,
            explosion.center.y,
            explosion.radius,
            count
        );

        let base_speed = explosion.radius * PARTICLE_SPEED_PER_RADIUS;
        let base_size = (explosion.radius * 0.08).max(1.0);
        for i in 0..count {
            let nominal = TAU * i as f32 / count as f32;
            let angle = nominal + rng.jitter(PARTICLE_ANGLE_JITTER);
            let offset = explosion.radius * 0.3 * rng.unit();
            let speed = base_speed * rng.range(PARTICLE_SPEED_VARIANCE.0, PARTICLE_SPEED_VARIANCE.1);
            let life = rng.range(PARTICLE_LIFE_RANGE.0, PARTICLE_LIFE_RANGE.1);
            let color = rng.pick(&explosion.colors).copied().unwrap_or(FIRE_COLORS[0]);
            let size = base_size * rng.range(0.5, 1.5);

            self.particles.push_back(Particle {
                position: explosion.center + polar_to_cartesian(offset, angle),
                velocity: Vec2::from_angle(angle) * speed,
                life,
                max_life: life,
                color,
                size,
            });
        }
        self.enforce_cap();
    }

    /// Advance every particle and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        self.particles.retain_mut(|p| p.step(dt));
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Particle> {
        self.particles.iter()
    }

    fn enforce_cap(&mut self) {
        if let Some(cap) = self.cap {
            let excess = self.particles.len().saturating_sub(cap);
            if excess > 0 {
                self.particles.drain(..excess);
                log::trace!("particle pool over cap, evicted {excess}");
            }
        }
    }
}
