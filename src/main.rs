//! Sidearm headless driver
//!
//! Runs a scripted firefight through the fixed-timestep loop and logs what
//! the effect pools and camera did. Usage:
//!
//! ```text
//! sidearm [settings.json] [catalog.json]
//! ```

use glam::Vec2;

use sidearm::Settings;
use sidearm::consts::{MAX_SUBSTEPS, SIM_DT};
use sidearm::renderer;
use sidearm::sim::{
    Catalog, Clock, Explosion, LoadedBounds, ManualClock, Simulation, TickInput, Weapon,
    WorldBounds, tick,
};

/// Frame time fed to the loop (a slightly uneven 60 Hz display)
const FRAME_TIME: f32 = 1.0 / 58.0;
const RUN_SECONDS: f32 = 6.0;

/// Fixed-step accumulator, same shape as a browser rAF loop
struct Game {
    sim: Simulation<ManualClock>,
    clock: ManualClock,
    accumulator: f32,
    input: TickInput,
}

impl Game {
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.clock.advance(f64::from(SIM_DT) * 1000.0);
            let report = tick(&mut self.sim, &self.input, SIM_DT);
            if report.projectiles_fired > 0 {
                log::trace!(
                    "frame {}: {} projectile(s), {} casing(s)",
                    self.sim.frame(),
                    report.projectiles_fired,
                    report.casings_ejected
                );
            }
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input.trigger_pressed = false;
            self.input.reload = false;
            self.input.explosions.clear();
        }
    }

    /// Scripted input for time `t` (seconds)
    fn script(&mut self, t: f32) {
        self.input.move_x = if t < 2.0 { 1.0 } else if t < 3.0 { -1.0 } else { 0.0 };
        self.input.aim = (t * 0.8).sin() * 0.3;
        self.input.trigger_held = (1.0..2.5).contains(&t);

        let frame_start = |at: f32| t >= at && t < at + FRAME_TIME;
        if frame_start(1.0) || frame_start(4.0) {
            self.input.trigger_pressed = true;
        }
        if frame_start(3.5) {
            self.input.reload = true;
        }
        if frame_start(4.5) {
            let target = self.sim.holder.position + Vec2::new(300.0, 0.0);
            self.input.explosions.push(Explosion::fiery(target, 90.0));
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let settings = args
        .next()
        .map(Settings::load_or_default)
        .unwrap_or_default();
    let catalog = match args.next() {
        Some(path) => match std::fs::read_to_string(&path)
            .map_err(sidearm::ConfigError::from)
            .and_then(|json| Catalog::from_json(&json))
        {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Using built-in catalog: {e}");
                Catalog::builtin()
            }
        },
        None => Catalog::builtin(),
    };

    let Some(kind) = catalog.weapon("rifle").cloned() else {
        log::error!("catalog has no rifle");
        return;
    };
    log::info!(
        "quality {}, seed {:#x}, weapon {}",
        settings.quality.as_str(),
        settings.seed,
        kind.name
    );

    let clock = ManualClock::new(0.0);
    let viewport = Vec2::new(960.0, 540.0);
    let terrain = |x: f32| 120.0 + (x * 0.004).sin() * 40.0;
    let camera = sidearm::sim::Camera::new(viewport.x, viewport.y, WorldBounds::default())
        .with_terrain(terrain);

    let mut sim = Simulation::new(kind, clock.clone(), &settings, viewport, WorldBounds::default())
        .with_catalog(catalog)
        .with_camera(camera);

    // Simulated asset load: precise bounds arrive after the first frames
    let mut weapon = Weapon::with_clock(sim.weapon().kind().clone(), clock.clone());
    let ticket = weapon.request_bounds();
    sim.equip(weapon);

    let mut game = Game {
        sim,
        clock,
        accumulator: 0.0,
        input: TickInput::default(),
    };
    let mut ticket = Some(ticket);

    let mut t = 0.0;
    let mut peak_casings = 0;
    let mut peak_particles = 0;
    while t < RUN_SECONDS {
        if t > 0.25 {
            if let Some(ticket) = ticket.take() {
                let mut bounds = sidearm::sim::BoundingBox::fallback(ticket.sizing, ticket.grip);
                bounds.width *= 1.1;
                ticket.resolve(LoadedBounds {
                    bounds,
                    asset: Some("rifle.svg".into()),
                });
            }
        }

        game.script(t);
        game.update(FRAME_TIME);
        t += FRAME_TIME;

        peak_casings = peak_casings.max(game.sim.casings().casing_count());
        peak_particles = peak_particles.max(game.sim.particles().particle_count());
    }

    let sim = &game.sim;
    let quads = renderer::casing_instances(sim.casings(), sim.camera()).len()
        + renderer::particle_instances(sim.particles(), sim.camera()).len()
        + renderer::projectile_instances(sim.projectiles(), sim.camera()).len();

    log::info!(
        "{} frames in {:.0} ms: ammo {}/{}, peak casings {}, peak particles {}, {} quads left",
        sim.frame(),
        game.clock.now_ms(),
        sim.weapon().bullets_left(),
        sim.weapon().capacity(),
        peak_casings,
        peak_particles,
        quads
    );
    log::info!(
        "camera origin ({:.1}, {:.1}), holder at ({:.1}, {:.1})",
        sim.camera().x,
        sim.camera().y,
        sim.holder.position.x,
        sim.holder.position.y
    );
}
