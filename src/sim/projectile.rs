//! Bullets in flight
//!
//! Straight-line or ballistic motion, expiring at the weapon's range.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::WeaponKind;
use super::particle::Explosion;

/// Fraction of range pellets keep full damage for
const PELLET_FALLOFF_START: f32 = 0.5;
/// Damage multiplier for pellets at max range
const PELLET_MIN_DAMAGE: f32 = 0.3;

/// A fired projectile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Damage at the muzzle
    pub damage: f32,
    /// Part of a multi-pellet shot (damage falls off with distance)
    pub pellet: bool,
    pub traveled: f32,
    pub range: f32,
    /// Downward acceleration (units/s²)
    pub gravity: f32,
    /// Burst radius on expiry, for explosive rounds
    pub explosion_radius: Option<f32>,
}

impl Projectile {
    /// Projectile leaving `origin` along `angle` with `kind`'s ballistics
    pub fn fire(kind: &WeaponKind, origin: Vec2, angle: f32, damage: f32, pellet: bool) -> Self {
        Self {
            position: origin,
            velocity: Vec2::from_angle(angle) * kind.projectile_speed,
            damage,
            pellet,
            traveled: 0.0,
            range: kind.projectile_range,
            gravity: kind.projectile_gravity,
            explosion_radius: kind.explosion_radius,
        }
    }

    /// Damage dealt at the current travel distance
    pub fn damage_at(&self) -> f32 {
        if !self.pellet || self.range <= 0.0 {
            return self.damage;
        }
        let t = (self.traveled / self.range).clamp(0.0, 1.0);
        if t <= PELLET_FALLOFF_START {
            return self.damage;
        }
        let fade = (t - PELLET_FALLOFF_START) / (1.0 - PELLET_FALLOFF_START);
        self.damage * (1.0 - fade * (1.0 - PELLET_MIN_DAMAGE))
    }

    pub fn is_expired(&self) -> bool {
        self.traveled >= self.range
    }

    fn integrate(&mut self, dt: f32) {
        self.velocity.y -= self.gravity * dt;
        let step = self.velocity * dt;
        self.position += step;
        self.traveled += step.length();
    }
}

/// Live projectiles owned by the simulation
#[derive(Debug, Clone, Default)]
pub struct ProjectilePool {
    projectiles: Vec<Projectile>,
}

impl ProjectilePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, projectiles: impl IntoIterator<Item = Projectile>) {
        self.projectiles.extend(projectiles);
    }

    /// Advance all projectiles; returns bursts for explosive rounds that expired
    pub fn update(&mut self, dt: f32) -> Vec<Explosion> {
        let mut bursts = Vec::new();
        self.projectiles.retain_mut(|p| {
            p.integrate(dt);
            if !p.is_expired() {
                return true;
            }
            if let Some(radius) = p.explosion_radius {
                bursts.push(Explosion::fiery(p.position, radius));
            }
            false
        });
        bursts
    }

    pub fn count(&self) -> usize {
        self.projectiles.len()
    }

    pub fn clear(&mut self) {
        self.projectiles.clear();
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }
}
