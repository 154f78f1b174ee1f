//! Instance types for 2D effect rendering

use bytemuck::{Pod, Zeroable};

/// One rotated, tinted quad (casings, particles, projectiles)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct QuadInstance {
    /// Screen-space center (pixels, y down)
    pub position: [f32; 2],
    /// Full width/height (pixels)
    pub size: [f32; 2],
    /// Radians, screen space (clockwise positive)
    pub rotation: f32,
    /// Outline thickness (pixels, 0 = none)
    pub outline: f32,
    pub color: [f32; 4],
    pub outline_color: [f32; 4],
}

impl QuadInstance {
    pub const STRIDE: usize = std::mem::size_of::<QuadInstance>();
}

/// Colors for effect elements
pub mod colors {
    pub const PROJECTILE: [f32; 4] = [1.0, 0.95, 0.6, 1.0];
    pub const PELLET: [f32; 4] = [1.0, 0.8, 0.4, 1.0];
    pub const NO_OUTLINE: [f32; 4] = [0.0, 0.0, 0.0, 0.0];
}

/// Unpack 0xRRGGBB into linear RGBA with the given alpha
pub fn rgba(hex: u32, alpha: f32) -> [f32; 4] {
    let channel = |shift: u32| ((hex >> shift) & 0xFF) as f32 / 255.0;
    [channel(16), channel(8), channel(0), alpha.clamp(0.0, 1.0)]
}
