//! Entity pose: position, rotation and horizontal facing
//!
//! Relative offsets are always authored for a right-facing parent (facing = 1).
//! Composition mirrors them for left-facing parents, so offset tables never
//! need a second, flipped copy.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::rotate;

/// Horizontal mirror flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// +1 for right, -1 for left
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    /// Facing from the sign of `x` (zero keeps right)
    pub fn from_sign(x: f32) -> Self {
        if x < 0.0 { Facing::Left } else { Facing::Right }
    }

    /// Product of two facings (self-inverse)
    #[inline]
    pub fn compose(self, other: Facing) -> Facing {
        if self == other { Facing::Right } else { Facing::Left }
    }

    pub fn flipped(self) -> Facing {
        self.compose(Facing::Left)
    }
}

/// Position + rotation + facing
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec2,
    /// Radians, counter-clockwise, in the facing = 1 frame
    pub rotation: f32,
    pub facing: Facing,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec2::ZERO,
        rotation: 0.0,
        facing: Facing::Right,
    };

    pub fn new(position: Vec2, rotation: f32, facing: Facing) -> Self {
        Self {
            position,
            rotation,
            facing,
        }
    }

    pub fn from_position(position: Vec2) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn set_position(&mut self, position: Vec2) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        self.rotation = rotation;
    }

    pub fn set_facing(&mut self, facing: Facing) {
        self.facing = facing;
    }

    /// Map a local offset into this transform's frame: rotate, then mirror x
    #[inline]
    pub fn transform_offset(&self, local: Vec2) -> Vec2 {
        let rotated = rotate(local, self.rotation);
        Vec2::new(rotated.x * self.facing.sign(), rotated.y)
    }

    /// Inverse of [`Transform::transform_offset`]
    #[inline]
    pub fn inverse_transform_offset(&self, world: Vec2) -> Vec2 {
        let unmirrored = Vec2::new(world.x * self.facing.sign(), world.y);
        rotate(unmirrored, -self.rotation)
    }

    /// Hand position `arm_length` ahead along the facing direction (x only)
    pub fn weapon_position(&self, arm_length: f32) -> Vec2 {
        self.position + Vec2::new(arm_length * self.facing.sign(), 0.0)
    }
}

/// Compose a child pose authored relative to `base` into world space
pub fn apply_transform(base: &Transform, relative: &Transform) -> Transform {
    Transform {
        position: base.position + base.transform_offset(relative.position),
        rotation: base.rotation + relative.rotation,
        facing: base.facing.compose(relative.facing),
    }
}

/// Recover the pose of `absolute` relative to `base`
pub fn reverse_transform(base: &Transform, absolute: &Transform) -> Transform {
    Transform {
        position: base.inverse_transform_offset(absolute.position - base.position),
        rotation: absolute.rotation - base.rotation,
        facing: absolute.facing.compose(base.facing),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::FRAC_PI_2;

    fn facing_strategy() -> impl Strategy<Value = Facing> {
        prop_oneof![Just(Facing::Right), Just(Facing::Left)]
    }

    fn transform_strategy() -> impl Strategy<Value = Transform> {
        (
            -1000.0f32..1000.0,
            -1000.0f32..1000.0,
            -6.3f32..6.3,
            facing_strategy(),
        )
            .prop_map(|(x, y, r, f)| Transform::new(Vec2::new(x, y), r, f))
    }

    #[test]
    fn test_apply_mirrors_offset_for_left_facing() {
        let base = Transform::new(Vec2::new(10.0, 5.0), 0.0, Facing::Left);
        let hand = Transform::from_position(Vec2::new(3.0, 1.0));
        let world = apply_transform(&base, &hand);
        assert!(world.position.abs_diff_eq(Vec2::new(7.0, 6.0), 1e-5));
        assert_eq!(world.facing, Facing::Left);
    }

    #[test]
    fn test_apply_rotates_before_mirroring() {
        let base = Transform::new(Vec2::ZERO, FRAC_PI_2, Facing::Left);
        let tip = Transform::from_position(Vec2::new(2.0, 0.0));
        let world = apply_transform(&base, &tip);
        // (2, 0) rotated a quarter turn is (0, 2); mirroring leaves it there
        assert!(world.position.abs_diff_eq(Vec2::new(0.0, 2.0), 1e-5));
        assert!((world.rotation - FRAC_PI_2).abs() < 1e-6);
    }

    #[test]
    fn test_facing_composition() {
        let base = Transform::new(Vec2::ZERO, 0.0, Facing::Left);
        let child = Transform::new(Vec2::ZERO, 0.0, Facing::Left);
        assert_eq!(apply_transform(&base, &child).facing, Facing::Right);
        assert_eq!(Facing::Right.compose(Facing::Left), Facing::Left);
        assert_eq!(Facing::Left.flipped(), Facing::Right);
    }

    #[test]
    fn test_weapon_position_ignores_rotation() {
        let mut t = Transform::new(Vec2::new(1.0, 2.0), 1.2, Facing::Right);
        assert_eq!(t.weapon_position(5.0), Vec2::new(6.0, 2.0));
        t.set_facing(Facing::Left);
        assert_eq!(t.weapon_position(5.0), Vec2::new(-4.0, 2.0));
    }

    #[test]
    fn test_setters_mutate_in_place() {
        let mut t = Transform::IDENTITY;
        t.set_position(Vec2::new(4.0, 4.0));
        t.set_rotation(0.5);
        t.set_facing(Facing::from_sign(-3.0));
        assert_eq!(t, Transform::new(Vec2::new(4.0, 4.0), 0.5, Facing::Left));
    }

    proptest! {
        #[test]
        fn prop_reverse_undoes_apply(base in transform_strategy(), rel in transform_strategy()) {
            let back = reverse_transform(&base, &apply_transform(&base, &rel));
            prop_assert!(back.position.abs_diff_eq(rel.position, 1e-2),
                "{:?} != {:?}", back.position, rel.position);
            prop_assert!((back.rotation - rel.rotation).abs() < 1e-4);
            prop_assert_eq!(back.facing, rel.facing);
        }

        #[test]
        fn prop_offset_roundtrip_preserves_length(t in transform_strategy(), x in -50.0f32..50.0, y in -50.0f32..50.0) {
            let local = Vec2::new(x, y);
            let world = t.transform_offset(local);
            prop_assert!((world.length() - local.length()).abs() < 1e-3);
            prop_assert!(t.inverse_transform_offset(world).abs_diff_eq(local, 1e-3));
        }
    }
}
