//! Draw data for the canvas layer
//!
//! Builds screen-space quad instances from the simulation. This is the only
//! code that reads individual pool elements; the drawing backend just uploads
//! `bytemuck::cast_slice(&instances)`.

pub mod vertex;

pub use vertex::{QuadInstance, rgba};

use crate::sim::{Camera, CasingPool, ParticlePool, ProjectilePool};

/// Projectile streak length (pixels)
const PROJECTILE_LENGTH: f32 = 8.0;
const PROJECTILE_THICKNESS: f32 = 2.0;

/// Casings, oldest first, fading out over their life
pub fn casing_instances(pool: &CasingPool, camera: &Camera) -> Vec<QuadInstance> {
    pool.iter()
        .map(|c| {
            let alpha = c.life_fraction();
            QuadInstance {
                position: camera.world_to_screen(c.position).to_array(),
                size: [c.spec.width, c.spec.height],
                // Y flip reverses the sense of rotation
                rotation: -c.rotation,
                outline: 0.5,
                color: rgba(c.spec.color, alpha),
                outline_color: rgba(c.spec.outline_color, alpha),
            }
        })
        .collect()
}

/// Particles as square quads, fading out over their life
pub fn particle_instances(pool: &ParticlePool, camera: &Camera) -> Vec<QuadInstance> {
    pool.iter()
        .map(|p| QuadInstance {
            position: camera.world_to_screen(p.position).to_array(),
            size: [p.size, p.size],
            rotation: 0.0,
            outline: 0.0,
            color: rgba(p.color, p.life_fraction()),
            outline_color: vertex::colors::NO_OUTLINE,
        })
        .collect()
}

/// Projectiles as streaks along their velocity
pub fn projectile_instances(pool: &ProjectilePool, camera: &Camera) -> Vec<QuadInstance> {
    pool.iter()
        .map(|p| {
            let color = if p.pellet {
                vertex::colors::PELLET
            } else {
                vertex::colors::PROJECTILE
            };
            QuadInstance {
                position: camera.world_to_screen(p.position).to_array(),
                size: [PROJECTILE_LENGTH, PROJECTILE_THICKNESS],
                rotation: -p.velocity.to_angle(),
                outline: 0.0,
                color,
                outline_color: vertex::colors::NO_OUTLINE,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{CasingCategory, CasingEjection, Explosion, Facing, SimRng, WorldBounds};
    use glam::Vec2;

    fn camera_at_origin() -> Camera {
        let mut camera = Camera::new(800.0, 600.0, WorldBounds::default());
        camera.follow_target(Vec2::new(400.0, 0.0), 0.0);
        camera
    }

    #[test]
    fn test_casing_instances_fade() {
        let camera = camera_at_origin();
        assert_eq!(camera.origin(), Vec2::ZERO);

        let mut pool = CasingPool::new();
        let mut rng = SimRng::new(1);
        pool.create_casing(
            &CasingEjection {
                position: Vec2::new(100.0, 50.0),
                direction: 1.5,
                facing: Facing::Right,
                category: CasingCategory::Pistol,
            },
            &mut rng,
        );

        let fresh = casing_instances(&pool, &camera);
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].position, [100.0, 550.0]);
        assert_eq!(fresh[0].color[3], 1.0);

        pool.update(0.5);
        let older = casing_instances(&pool, &camera);
        assert!(older[0].color[3] < 1.0);

        let bytes: &[u8] = bytemuck::cast_slice(&older);
        assert_eq!(bytes.len(), QuadInstance::STRIDE);
    }

    #[test]
    fn test_particle_instances_match_pool() {
        let camera = camera_at_origin();
        let mut pool = ParticlePool::new();
        pool.create_explosion(&Explosion::fiery(Vec2::new(300.0, 300.0), 40.0), &mut SimRng::new(2));
        let quads = particle_instances(&pool, &camera);
        assert_eq!(quads.len(), pool.particle_count());
        assert!(quads.iter().all(|q| q.size[0] == q.size[1]));
    }

    #[test]
    fn test_projectile_instances_point_along_flight() {
        use crate::sim::{Projectile, WeaponKind};
        let camera = camera_at_origin();
        let mut pool = ProjectilePool::new();
        let kind = WeaponKind::shotgun();
        pool.spawn([Projectile::fire(&kind, Vec2::new(10.0, 10.0), 0.5, 10.0, true)]);
        let quads = projectile_instances(&pool, &camera);
        assert_eq!(quads.len(), 1);
        assert!((quads[0].rotation + 0.5).abs() < 1e-5);
        assert_eq!(quads[0].color, vertex::colors::PELLET);
    }
}
