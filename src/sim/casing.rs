//! Spent casings
//!
//! One casing per shot, thrown out of the ejection port with randomized speed,
//! angle, spin and life. The pool keeps at most `CASING_CAPACITY` live casings
//! and evicts the oldest when a new one would exceed that.

use std::collections::VecDeque;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::catalog::{CasingCategory, CasingSpec};
use super::rng::SimRng;
use super::weapon::CasingEjection;
use crate::consts::*;
use crate::normalize_angle;

/// A casing in flight
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Casing {
    pub position: Vec2,
    pub velocity: Vec2,
    pub rotation: f32,
    pub rotation_speed: f32,
    /// Seconds remaining
    pub life: f32,
    pub max_life: f32,
    pub category: CasingCategory,
    pub spec: CasingSpec,
}

impl Casing {
    /// 1 when fresh, 0 when about to expire
    pub fn life_fraction(&self) -> f32 {
        if self.max_life <= 0.0 {
            0.0
        } else {
            (self.life / self.max_life).clamp(0.0, 1.0)
        }
    }

    /// Integrate one step; returns false once expired
    fn step(&mut self, dt: f32) -> bool {
        self.position += self.velocity * dt;
        self.velocity.y -= CASING_GRAVITY * dt;
        self.velocity *= CASING_DAMPING;
        self.rotation = normalize_angle(self.rotation + self.rotation_speed * dt);
        self.life -= dt;
        self.life > 0.0
    }
}

/// Bounded FIFO pool of casings
#[derive(Debug, Clone)]
pub struct CasingPool {
    casings: VecDeque<Casing>,
    capacity: usize,
}

impl Default for CasingPool {
    fn default() -> Self {
        Self::new()
    }
}

impl CasingPool {
    pub fn new() -> Self {
        Self::with_capacity(CASING_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            casings: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Spawn a casing for `event` using the built-in spec for its category
    pub fn create_casing(&mut self, event: &CasingEjection, rng: &mut SimRng) {
        self.create_casing_with(event, event.category.spec(), rng);
    }

    /// Spawn a casing for `event` with an explicit spec (e.g. from a catalog)
    pub fn create_casing_with(&mut self, event: &CasingEjection, spec: CasingSpec, rng: &mut SimRng) {
        if self.capacity == 0 {
            return;
        }

        let speed = spec.ejection_speed * rng.range(CASING_SPEED_VARIANCE.0, CASING_SPEED_VARIANCE.1);
        let angle = event.direction + rng.jitter(CASING_ANGLE_JITTER);
        let life = spec.life * rng.range(CASING_LIFE_VARIANCE.0, CASING_LIFE_VARIANCE.1);
        // Spin follows the facing so mirrored guns tumble the mirrored way
        let spin = spec.spin_rate
            * rng.range(CASING_SPIN_VARIANCE.0, CASING_SPIN_VARIANCE.1)
            * event.facing.sign();

        let casing = Casing {
            position: event.position,
            velocity: Vec2::from_angle(angle) * speed,
            rotation: event.direction,
            rotation_speed: spin,
            life,
            max_life: life,
            category: event.category,
            spec,
        };

        while self.casings.len() >= self.capacity {
            self.casings.pop_front();
            log::trace!("casing pool full, evicted oldest");
        }
        self.casings.push_back(casing);
    }

    /// Advance every casing and drop the expired ones
    pub fn update(&mut self, dt: f32) {
        self.casings.retain_mut(|c| c.step(dt));
    }

    pub fn clear(&mut self) {
        self.casings.clear();
    }

    pub fn casing_count(&self) -> usize {
        self.casings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.casings.is_empty()
    }

    /// Oldest first
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Casing> {
        self.casings.iter()
    }
}
