//! Weapon fire control
//!
//! Cooldown and ammo gating, pellet fan-out, and ratio-addressed barrel
//! geometry (grip, muzzle, ejection port). The only state carried between
//! shots is the ammo count and the time of the last shot.

use std::f32::consts::FRAC_PI_2;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::{PoseAnimation, RecoilAnimation, ReloadAnimation};
use super::catalog::{CasingCategory, FireMode, Sizing, WeaponKind};
use super::clock::{Clock, WallClock};
use super::projectile::Projectile;
use super::transform::{Facing, Transform, apply_transform};
use crate::consts::EJECTION_PORT_FRACTION;

/// Visual bounds of a weapon sprite
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub width: f32,
    pub height: f32,
    /// Ratio position the box is anchored at (the grip)
    pub anchor: Vec2,
}

impl BoundingBox {
    /// Approximate bounds straight from the sizing descriptor
    pub fn fallback(sizing: Sizing, grip: Vec2) -> Self {
        Self {
            width: sizing.width,
            height: sizing.height,
            anchor: grip,
        }
    }
}

/// Result of an asset-bounds load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedBounds {
    pub bounds: BoundingBox,
    /// Name of the loaded asset, if the loader reports one
    pub asset: Option<String>,
}

/// Handed to an asset loader; resolving it delivers precise bounds to the weapon
#[derive(Debug)]
pub struct BoundsTicket {
    pub sizing: Sizing,
    pub grip: Vec2,
    sender: Sender<LoadedBounds>,
}

impl BoundsTicket {
    /// Deliver bounds; returns false if the weapon is gone
    pub fn resolve(self, loaded: LoadedBounds) -> bool {
        self.sender.send(loaded).is_ok()
    }
}

/// Spent-casing spawn request emitted by a successful shot
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CasingEjection {
    /// World position of the ejection port
    pub position: Vec2,
    /// World angle to eject along (radians)
    pub direction: f32,
    pub facing: Facing,
    pub category: CasingCategory,
}

/// Everything a single `shoot` call produced
#[derive(Debug, Clone, Default)]
pub struct ShotResult {
    pub projectiles: Vec<Projectile>,
    pub ejection: Option<CasingEjection>,
}

impl ShotResult {
    /// True when the shot was not permitted
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }
}

/// World firing angle for a pose, accounting for the facing mirror
pub fn firing_angle(transform: &Transform) -> f32 {
    transform
        .rotation
        .sin()
        .atan2(transform.rotation.cos() * transform.facing.sign())
}

/// Runtime state of a held weapon
pub struct Weapon<C: Clock = WallClock> {
    kind: WeaponKind,
    bullets_left: u32,
    last_shot_time: Option<f64>,
    bounds: BoundingBox,
    pending_bounds: Option<Receiver<LoadedBounds>>,
    clock: C,
    recoil: RecoilAnimation,
    reload_anim: ReloadAnimation,
}

impl Weapon<WallClock> {
    pub fn new(kind: WeaponKind) -> Self {
        Self::with_clock(kind, WallClock::new())
    }
}

impl<C: Clock> Weapon<C> {
    pub fn with_clock(kind: WeaponKind, clock: C) -> Self {
        let bounds = BoundingBox::fallback(kind.sizing, kind.grip_ratio);
        Self {
            bullets_left: kind.capacity,
            kind,
            last_shot_time: None,
            bounds,
            pending_bounds: None,
            clock,
            recoil: RecoilAnimation::default(),
            reload_anim: ReloadAnimation::default(),
        }
    }

    pub fn kind(&self) -> &WeaponKind {
        &self.kind
    }

    pub fn bullets_left(&self) -> u32 {
        self.bullets_left
    }

    pub fn capacity(&self) -> u32 {
        self.kind.capacity
    }

    pub fn last_shot_time(&self) -> Option<f64> {
        self.last_shot_time
    }

    pub fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Start an asset-bounds load; fallback bounds stay in use until it resolves
    pub fn request_bounds(&mut self) -> BoundsTicket {
        let (sender, receiver) = mpsc::channel();
        self.pending_bounds = Some(receiver);
        BoundsTicket {
            sizing: self.kind.sizing,
            grip: self.kind.grip_ratio,
            sender,
        }
    }

    /// Swap in loaded bounds if they have arrived; returns true on swap
    pub fn poll_bounds(&mut self) -> bool {
        let Some(receiver) = &self.pending_bounds else {
            return false;
        };
        match receiver.try_recv() {
            Ok(loaded) => {
                log::debug!(
                    "{}: bounds {}x{} -> {}x{} ({})",
                    self.kind.name,
                    self.bounds.width,
                    self.bounds.height,
                    loaded.bounds.width,
                    loaded.bounds.height,
                    loaded.asset.as_deref().unwrap_or("unnamed"),
                );
                self.bounds = loaded.bounds;
                self.pending_bounds = None;
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                log::warn!(
                    "{}: bounds loader dropped, keeping fallback bounds",
                    self.kind.name
                );
                self.pending_bounds = None;
                false
            }
        }
    }

    /// Whether a shot would be allowed right now
    pub fn can_shoot(&self, new_trigger_press: bool) -> bool {
        let now = self.clock.now_ms();
        let cooled = self
            .last_shot_time
            .is_none_or(|last| now - last > self.kind.fire_interval_ms);
        let ready = cooled && self.bullets_left > 0;
        match self.kind.fire_mode {
            FireMode::Auto => ready,
            FireMode::SemiAuto => ready && new_trigger_press,
        }
    }

    /// Fire from `transform`; an empty result means nothing happened.
    /// Casings eject perpendicular to the mirrored firing angle, not the raw
    /// pose rotation, so left-facing weapons still throw them upward.
    pub fn shoot(&mut self, transform: &Transform, new_trigger_press: bool) -> ShotResult {
        if !self.can_shoot(new_trigger_press) {
            return ShotResult::default();
        }

        let now = self.clock.now_ms();
        self.last_shot_time = Some(now);
        self.bullets_left -= 1;

        let muzzle = self.point_along_barrel(transform, self.kind.muzzle_ratio);
        let angle = firing_angle(transform);

        let projectiles = match self.kind.pellets() {
            Some(count) => {
                let damage = self.kind.damage / count as f32;
                (0..count)
                    .map(|i| {
                        let t = i as f32 / (count - 1) as f32;
                        let offset = self.kind.spread_angle * (t - 0.5);
                        Projectile::fire(&self.kind, muzzle, angle + offset, damage, true)
                    })
                    .collect()
            }
            None => vec![Projectile::fire(
                &self.kind,
                muzzle,
                angle,
                self.kind.damage,
                false,
            )],
        };

        let ejection = CasingEjection {
            position: self.ejection_port(transform),
            direction: angle + FRAC_PI_2 * transform.facing.sign(),
            facing: transform.facing,
            category: self.kind.casing,
        };

        self.recoil.trigger(now);
        log::debug!(
            "{} fired {} projectile(s) at {:.3} rad, {} left",
            self.kind.name,
            projectiles.len(),
            angle,
            self.bullets_left
        );

        ShotResult {
            projectiles,
            ejection: Some(ejection),
        }
    }

    /// Refill to capacity
    pub fn reload(&mut self) {
        self.bullets_left = self.kind.capacity;
        self.reload_anim.trigger(self.clock.now_ms());
        log::info!("{} reloaded ({})", self.kind.name, self.bullets_left);
    }

    /// World position of a ratio-addressed point on the weapon
    pub fn point_along_barrel(&self, transform: &Transform, ratio: Vec2) -> Vec2 {
        let grip = self.kind.grip_ratio;
        let local = Vec2::new(
            self.bounds.width * (ratio.x - grip.x),
            self.bounds.height * (ratio.y - grip.y),
        );
        transform.position + transform.transform_offset(local)
    }

    pub fn muzzle_position(&self, transform: &Transform) -> Vec2 {
        self.point_along_barrel(transform, self.kind.muzzle_ratio)
    }

    /// Ratio position of the ejection port
    pub fn ejection_ratio(&self) -> Vec2 {
        self.kind.ejection_ratio.unwrap_or_else(|| {
            self.kind
                .grip_ratio
                .lerp(self.kind.muzzle_ratio, EJECTION_PORT_FRACTION)
        })
    }

    pub fn ejection_port(&self, transform: &Transform) -> Vec2 {
        self.point_along_barrel(transform, self.ejection_ratio())
    }

    /// Rest pose with the active recoil/reload animations composed on top
    pub fn animated_pose(&self, rest: &Transform) -> Transform {
        let now = self.clock.now_ms();
        let recoiled = apply_transform(rest, &self.recoil.pose(now));
        apply_transform(&recoiled, &self.reload_anim.pose(now))
    }

    pub fn is_reloading(&self) -> bool {
        self.reload_anim.is_playing(self.clock.now_ms())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::clock::ManualClock;

    fn weapon(kind: WeaponKind, start: f64) -> (Weapon<ManualClock>, ManualClock) {
        let clock = ManualClock::new(start);
        (Weapon::with_clock(kind, clock.clone()), clock)
    }

    fn auto_kind(capacity: u32) -> WeaponKind {
        WeaponKind {
            capacity,
            fire_interval_ms: 100.0,
            ..WeaponKind::rifle()
        }
    }

    #[test]
    fn test_auto_cooldown() {
        let (mut w, clock) = weapon(auto_kind(30), 1000.0);
        assert!(!w.shoot(&Transform::IDENTITY, true).is_empty());

        clock.set(1050.0);
        assert!(!w.can_shoot(true));
        clock.set(1100.0);
        assert!(!w.can_shoot(true), "interval must be strictly exceeded");
        clock.set(1101.0);
        assert!(w.can_shoot(true));
        assert!(w.can_shoot(false), "auto ignores trigger edges");
    }

    #[test]
    fn test_semi_auto_needs_fresh_press() {
        let (w, _clock) = weapon(WeaponKind::pistol(), 5000.0);
        assert!(!w.can_shoot(false));
        assert!(w.can_shoot(true));
    }

    #[test]
    fn test_empty_magazine_blocks_and_reload_refills() {
        let (mut w, clock) = weapon(auto_kind(5), 1000.0);
        for t in [1000.0, 1101.0, 1202.0, 1303.0, 1404.0] {
            clock.set(t);
            assert_eq!(w.shoot(&Transform::IDENTITY, true).projectiles.len(), 1);
        }
        assert_eq!(w.bullets_left(), 0);

        clock.set(1500.0);
        let result = w.shoot(&Transform::IDENTITY, true);
        assert!(result.is_empty());
        assert!(result.ejection.is_none());

        clock.set(5000.0);
        assert!(!w.can_shoot(true));
        w.reload();
        assert_eq!(w.bullets_left(), 5);
        assert!(w.is_reloading());
        assert!(w.can_shoot(true));
    }

    #[test]
    fn test_pellet_fan() {
        let (mut w, _clock) = weapon(WeaponKind::shotgun(), 1000.0);
        let result = w.shoot(&Transform::IDENTITY, true);
        assert_eq!(result.projectiles.len(), 6);

        let total = w.kind().damage;
        for p in &result.projectiles {
            assert!(p.pellet);
            assert!((p.damage - total / 6.0).abs() < 1e-4);
        }

        let spread = w.kind().spread_angle;
        let first = result.projectiles[0].velocity.to_angle();
        let last = result.projectiles[5].velocity.to_angle();
        assert!((first + spread / 2.0).abs() < 1e-4);
        assert!((last - spread / 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_single_pellet_degrades_to_single_shot() {
        let kind = WeaponKind {
            pellet_count: Some(1),
            ..WeaponKind::shotgun()
        };
        let (mut w, _clock) = weapon(kind, 1000.0);
        let result = w.shoot(&Transform::IDENTITY, true);
        assert_eq!(result.projectiles.len(), 1);
        assert!(!result.projectiles[0].pellet);
        assert_eq!(result.projectiles[0].damage, w.kind().damage);
    }

    #[test]
    fn test_left_facing_fires_left_and_ejects_up() {
        let (mut w, _clock) = weapon(WeaponKind::pistol(), 1000.0);
        let pose = Transform::new(Vec2::new(100.0, 50.0), 0.0, Facing::Left);
        let result = w.shoot(&pose, true);

        let bullet = &result.projectiles[0];
        assert!(bullet.velocity.x < 0.0);
        assert!(bullet.velocity.y.abs() < 1e-3);
        assert!(bullet.position.x < 100.0, "muzzle is ahead of the grip");

        let ejection = result.ejection.unwrap();
        assert!(ejection.direction.sin() > 0.99, "casings eject upward");
        assert_eq!(ejection.facing, Facing::Left);
        assert_eq!(ejection.category, CasingCategory::Pistol);
    }

    #[test]
    fn test_firing_angle_mirrors_rotation() {
        let up_right = Transform::new(Vec2::ZERO, 0.3, Facing::Right);
        let up_left = Transform::new(Vec2::ZERO, 0.3, Facing::Left);
        assert!((firing_angle(&up_right) - 0.3).abs() < 1e-6);
        assert!((firing_angle(&up_left) - (std::f32::consts::PI - 0.3)).abs() < 1e-5);
    }

    #[test]
    fn test_barrel_projection() {
        let (w, _clock) = weapon(WeaponKind::pistol(), 0.0);
        let kind = w.kind().clone();
        let pose = Transform::from_position(Vec2::new(10.0, 10.0));

        // The grip sits exactly on the transform position
        assert_eq!(w.point_along_barrel(&pose, kind.grip_ratio), pose.position);

        let muzzle = w.muzzle_position(&pose);
        let expected = Vec2::new(
            10.0 + kind.sizing.width * (kind.muzzle_ratio.x - kind.grip_ratio.x),
            10.0 + kind.sizing.height * (kind.muzzle_ratio.y - kind.grip_ratio.y),
        );
        assert!(muzzle.abs_diff_eq(expected, 1e-4));

        let port = w.ejection_ratio();
        let expected_port = kind.grip_ratio.lerp(kind.muzzle_ratio, 0.6);
        assert!(port.abs_diff_eq(expected_port, 1e-6));
    }

    #[test]
    fn test_loaded_bounds_swap_in() {
        let (mut w, _clock) = weapon(WeaponKind::pistol(), 0.0);
        let pose = Transform::IDENTITY;
        let before = w.muzzle_position(&pose);

        let ticket = w.request_bounds();
        assert!(!w.poll_bounds(), "still pending");

        let bounds = BoundingBox {
            width: ticket.sizing.width * 2.0,
            height: ticket.sizing.height,
            anchor: ticket.grip,
        };
        assert!(ticket.resolve(LoadedBounds {
            bounds,
            asset: Some("pistol.svg".into()),
        }));
        assert!(w.poll_bounds());
        assert_eq!(w.bounds(), bounds);
        assert!((w.muzzle_position(&pose).x - before.x * 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_dropped_loader_keeps_fallback() {
        let (mut w, _clock) = weapon(WeaponKind::rifle(), 0.0);
        let fallback = w.bounds();
        drop(w.request_bounds());
        assert!(!w.poll_bounds());
        assert_eq!(w.bounds(), fallback);
        assert!(!w.poll_bounds());
    }

    #[test]
    fn test_recoil_moves_weapon_back() {
        let (mut w, clock) = weapon(WeaponKind::pistol(), 1000.0);
        let rest = Transform::new(Vec2::new(0.0, 0.0), 0.0, Facing::Left);
        assert_eq!(w.animated_pose(&rest), rest);

        w.shoot(&rest, true);
        let kicked = w.animated_pose(&rest);
        assert!(kicked.position.x > 0.0, "left-facing recoil pushes right");

        clock.advance(10_000.0);
        assert_eq!(w.animated_pose(&rest), rest);
    }
}
