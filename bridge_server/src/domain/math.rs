// Small 2D helpers shared by ship, combat and AI code.
//
// Rotation convention: 0 rad points along +X, positive rotation is counter-clockwise.

use glam::Vec2;
use std::f32::consts::{PI, TAU};

/// Wraps an angle into `(-PI, PI]`.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut a = angle.rem_euclid(TAU);
    if a > PI {
        a -= TAU;
    }
    a
}

/// Signed shortest rotation from `from` to `to`.
pub fn angle_diff(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// World-space heading of the vector from `from` to `to`.
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

pub fn heading_vector(rotation: f32) -> Vec2 {
    Vec2::from_angle(rotation)
}

/// Transforms a ship-local offset into world space.
pub fn local_to_world(position: Vec2, rotation: f32, offset: Vec2) -> Vec2 {
    position + Vec2::from_angle(rotation).rotate(offset)
}

// Golden-angle spiral used for deterministic spawn placement.
pub fn spiral_point(index: u32, spacing: f32) -> Vec2 {
    const GOLDEN_ANGLE: f32 = 2.399_963;
    let i = index as f32 + 1.0;
    Vec2::from_angle(i * GOLDEN_ANGLE) * spacing * i.sqrt()
}
