//! Follow camera
//!
//! Tracks a world position and produces the viewport's bottom-left origin
//! (world space is Y-up). The first follow after construction or reset snaps;
//! later follows ease toward the target with frame-rate independent
//! exponential smoothing. The origin is clamped to the world after every
//! follow.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Height-map query
pub trait Terrain {
    fn height_at(&self, x: f32) -> f32;
}

impl<F: Fn(f32) -> f32> Terrain for F {
    fn height_at(&self, x: f32) -> f32 {
        self(x)
    }
}

/// World-space extents
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WorldBounds {
    pub level_width: f32,
    pub world_bottom: f32,
    pub world_top: f32,
}

impl Default for WorldBounds {
    fn default() -> Self {
        Self {
            level_width: LEVEL_WIDTH,
            world_bottom: WORLD_BOTTOM,
            world_top: WORLD_TOP,
        }
    }
}

/// Viewport origin tracker
pub struct Camera {
    /// Bottom-left world x of the viewport
    pub x: f32,
    /// Bottom-left world y of the viewport
    pub y: f32,
    pub width: f32,
    pub height: f32,
    has_followed: bool,
    bounds: WorldBounds,
    /// Horizontal lead added to the desired origin
    pub look_ahead: f32,
    /// Vertical lead added to the desired origin
    pub vertical_lead: f32,
    /// Exponential smoothing rate (1/s)
    pub smoothing: f32,
    terrain: Option<Box<dyn Terrain>>,
}

impl Camera {
    pub fn new(width: f32, height: f32, bounds: WorldBounds) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width,
            height,
            has_followed: false,
            bounds,
            look_ahead: 0.0,
            vertical_lead: 0.0,
            smoothing: CAMERA_SMOOTHING,
            terrain: None,
        }
    }

    pub fn with_terrain(mut self, terrain: impl Terrain + 'static) -> Self {
        self.terrain = Some(Box::new(terrain));
        self
    }

    pub fn set_terrain(&mut self, terrain: Option<Box<dyn Terrain>>) {
        self.terrain = terrain;
    }

    pub fn bounds(&self) -> WorldBounds {
        self.bounds
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn has_followed(&self) -> bool {
        self.has_followed
    }

    /// Terrain height under `x`, or the fallback when no terrain is attached
    pub fn terrain_height(&self, x: f32) -> f32 {
        self.terrain
            .as_ref()
            .map_or(FALLBACK_TERRAIN_HEIGHT, |t| t.height_at(x))
    }

    /// Clamped origin the camera wants for `target`
    pub fn desired_origin(&self, target: Vec2) -> Vec2 {
        let max_x = (self.bounds.level_width - self.width).max(0.0);
        let x = (target.x - self.width / 2.0 + self.look_ahead).clamp(0.0, max_x);

        let extent = self.bounds.world_top - self.bounds.world_bottom;
        let y = if extent <= self.height {
            // Whole world fits vertically; no scrolling
            self.bounds.world_bottom
        } else {
            // Keep the ground under the target in frame
            let focus = target.y.max(self.terrain_height(target.x));
            let max_y = self.bounds.world_top - self.height;
            (focus - self.height / 2.0 + self.vertical_lead).clamp(self.bounds.world_bottom, max_y)
        };

        Vec2::new(x, y)
    }

    /// Move toward `target`; snaps on the first call
    pub fn follow_target(&mut self, target: Vec2, dt: f32) {
        let desired = self.desired_origin(target);

        if !self.has_followed {
            self.x = desired.x;
            self.y = desired.y;
            self.has_followed = true;
            return;
        }

        let t = 1.0 - (-self.smoothing * dt.max(0.0)).exp();
        let current = self.origin();
        let eased = current + (desired - current) * t;
        let clamped = self.clamp_origin(eased);
        self.x = clamped.x;
        self.y = clamped.y;
    }

    /// Forget the last follow; the next one snaps
    pub fn reset(&mut self) {
        self.has_followed = false;
        self.x = 0.0;
        self.y = 0.0;
    }

    /// Canvas-space y for a world y
    pub fn to_screen_y(&self, world_y: f32) -> f32 {
        self.height - self.bounds.world_top - world_y
    }

    /// Viewport-relative screen position (y down) for a world position
    pub fn world_to_screen(&self, world: Vec2) -> Vec2 {
        Vec2::new(world.x - self.x, self.height - (world.y - self.y))
    }

    /// Takes effect on the next follow
    pub fn update_size(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    fn clamp_origin(&self, origin: Vec2) -> Vec2 {
        let max_x = (self.bounds.level_width - self.width).max(0.0);
        let extent = self.bounds.world_top - self.bounds.world_bottom;
        let y = if extent <= self.height {
            self.bounds.world_bottom
        } else {
            origin
                .y
                .clamp(self.bounds.world_bottom, self.bounds.world_top - self.height)
        };
        Vec2::new(origin.x.clamp(0.0, max_x), y)
    }
}
