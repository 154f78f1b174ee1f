//! Deterministic simulation module
//!
//! All kinematics and effects live here. This module must be deterministic:
//! - Time comes from an injected `Clock`
//! - Randomness comes from a seeded `SimRng`
//! - Pools iterate in spawn order
//! - No rendering or platform dependencies

pub mod animation;
pub mod camera;
pub mod casing;
pub mod catalog;
pub mod clock;
pub mod particle;
pub mod projectile;
pub mod rng;
pub mod tick;
pub mod transform;
pub mod weapon;

pub use animation::{PoseAnimation, RecoilAnimation, ReloadAnimation, Timing};
pub use camera::{Camera, Terrain, WorldBounds};
pub use casing::{Casing, CasingPool};
pub use catalog::{CasingCategory, CasingSpec, Catalog, FireMode, Sizing, WeaponKind};
pub use clock::{Clock, ManualClock, WallClock};
pub use particle::{Explosion, Particle, ParticlePool};
pub use projectile::{Projectile, ProjectilePool};
pub use rng::SimRng;
pub use tick::{FrameReport, Simulation, TickInput, tick};
pub use transform::{Facing, Transform, apply_transform, reverse_transform};
pub use weapon::{BoundingBox, BoundsTicket, CasingEjection, LoadedBounds, ShotResult, Weapon};
