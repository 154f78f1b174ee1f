//! Per-frame simulation step
//!
//! Input → fire control → pools → camera. Pools and camera never read each
//! other, so their update order is irrelevant; the order below only matters
//! for what a shot spawns this frame.

use glam::Vec2;

use super::camera::{Camera, WorldBounds};
use super::casing::CasingPool;
use super::catalog::{Catalog, WeaponKind};
use super::clock::Clock;
use super::particle::{Explosion, ParticlePool};
use super::projectile::ProjectilePool;
use super::rng::SimRng;
use super::transform::{Facing, Transform, apply_transform};
use super::weapon::Weapon;
use crate::settings::Settings;

/// Horizontal walk speed of the weapon holder (units/s)
pub const MOVE_SPEED: f32 = 240.0;

/// Hand position relative to the holder, authored facing right
pub const GRIP_OFFSET: Vec2 = Vec2::new(14.0, 22.0);

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Walk direction, -1..=1
    pub move_x: f32,
    /// Aim rotation in the facing-right frame (radians)
    pub aim: f32,
    /// Explicit facing; otherwise derived from `move_x`
    pub facing: Option<Facing>,
    /// Trigger is down this frame
    pub trigger_held: bool,
    /// Trigger went down this frame
    pub trigger_pressed: bool,
    pub reload: bool,
    /// Externally caused explosions (grenades, barrels)
    pub explosions: Vec<Explosion>,
}

/// What happened during one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub projectiles_fired: usize,
    pub casings_ejected: usize,
    pub explosions: usize,
}

/// Everything the core advances each frame
pub struct Simulation<C: Clock> {
    pub holder: Transform,
    weapon: Weapon<C>,
    catalog: Catalog,
    projectiles: ProjectilePool,
    casings: CasingPool,
    particles: ParticlePool,
    camera: Camera,
    rng: SimRng,
    spawn_casings: bool,
    camera_look_ahead: f32,
    frame: u64,
}

impl<C: Clock> Simulation<C> {
    pub fn new(
        kind: WeaponKind,
        clock: C,
        settings: &Settings,
        viewport: Vec2,
        bounds: WorldBounds,
    ) -> Self {
        let mut camera = Camera::new(viewport.x, viewport.y, bounds);
        camera.vertical_lead = settings.camera_vertical_lead;
        let start_x = viewport.x / 2.0;
        let holder = Transform::from_position(Vec2::new(start_x, camera.terrain_height(start_x)));

        Self {
            holder,
            weapon: Weapon::with_clock(kind, clock),
            catalog: Catalog::builtin(),
            projectiles: ProjectilePool::new(),
            casings: CasingPool::new(),
            particles: ParticlePool::with_cap(settings.particle_cap()),
            camera,
            rng: SimRng::new(settings.seed),
            spawn_casings: settings.casings,
            camera_look_ahead: settings.camera_look_ahead,
            frame: 0,
        }
    }

    pub fn with_catalog(mut self, catalog: Catalog) -> Self {
        self.catalog = catalog;
        self
    }

    /// Replace the camera (e.g. to attach terrain). The vertical lead from
    /// settings carries over and the holder is re-seated on the new terrain.
    pub fn with_camera(mut self, mut camera: Camera) -> Self {
        camera.vertical_lead = self.camera.vertical_lead;
        let x = self.holder.position.x;
        self.holder.position.y = camera.terrain_height(x);
        self.camera = camera;
        self
    }

    pub fn weapon(&self) -> &Weapon<C> {
        &self.weapon
    }

    pub fn weapon_mut(&mut self) -> &mut Weapon<C> {
        &mut self.weapon
    }

    /// Swap weapons; in-flight effects are kept
    pub fn equip(&mut self, weapon: Weapon<C>) {
        log::info!("equipped {}", weapon.kind().name);
        self.weapon = weapon;
    }

    pub fn projectiles(&self) -> &ProjectilePool {
        &self.projectiles
    }

    pub fn casings(&self) -> &CasingPool {
        &self.casings
    }

    pub fn particles(&self) -> &ParticlePool {
        &self.particles
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Weapon pose before recoil/reload animation
    pub fn weapon_rest_pose(&self, aim: f32) -> Transform {
        let hand = Transform::new(GRIP_OFFSET, aim, Facing::Right);
        apply_transform(&self.holder, &hand)
    }

    /// Weapon pose including the active animations
    pub fn weapon_pose(&self, aim: f32) -> Transform {
        self.weapon.animated_pose(&self.weapon_rest_pose(aim))
    }

    /// Drop all transient effects and re-snap the camera
    pub fn clear_effects(&mut self) {
        self.projectiles.clear();
        self.casings.clear();
        self.particles.clear();
        self.camera.reset();
    }
}

/// Advance the simulation by `dt` seconds
pub fn tick<C: Clock>(sim: &mut Simulation<C>, input: &TickInput, dt: f32) -> FrameReport {
    let mut report = FrameReport::default();

    sim.weapon.poll_bounds();

    // Holder walks along the terrain
    let level_width = sim.camera.bounds().level_width;
    let x = (sim.holder.position.x + input.move_x.clamp(-1.0, 1.0) * MOVE_SPEED * dt)
        .clamp(0.0, level_width);
    let y = sim.camera.terrain_height(x);
    sim.holder.set_position(Vec2::new(x, y));
    if let Some(facing) = input.facing {
        sim.holder.set_facing(facing);
    } else if input.move_x != 0.0 {
        sim.holder.set_facing(Facing::from_sign(input.move_x));
    }

    if input.reload {
        sim.weapon.reload();
    }

    if input.trigger_held || input.trigger_pressed {
        let pose = sim.weapon_pose(input.aim);
        let shot = sim.weapon.shoot(&pose, input.trigger_pressed);
        report.projectiles_fired = shot.projectiles.len();
        sim.projectiles.spawn(shot.projectiles);

        if let Some(ejection) = shot.ejection.filter(|_| sim.spawn_casings) {
            let spec = sim.catalog.casing(ejection.category);
            sim.casings.create_casing_with(&ejection, spec, &mut sim.rng);
            report.casings_ejected = 1;
        }
    }

    let bursts = sim.projectiles.update(dt);
    for explosion in input.explosions.iter().chain(bursts.iter()) {
        sim.particles.create_explosion(explosion, &mut sim.rng);
        report.explosions += 1;
    }

    sim.casings.update(dt);
    sim.particles.update(dt);

    sim.camera.look_ahead = sim.camera_look_ahead * sim.holder.facing.sign();
    sim.camera.follow_target(sim.holder.position, dt);

    sim.frame += 1;
    report
}
