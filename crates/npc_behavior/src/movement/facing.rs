//! Facing helpers: planar distance + framerate-independent smooth turning.

use bevy::prelude::*;

/// Planar components shorter than this give no usable heading
const MIN_PLANAR_LENGTH_SQUARED: f32 = 1e-6;

/// Distance with the vertical axis removed
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    Vec2::new(a.x - b.x, a.z - b.z).length()
}

/// Yaw rotation whose forward (-Z) points along the planar part of `direction`.
///
/// `None` when `direction` is (nearly) vertical or zero.
pub fn planar_look_rotation(direction: Vec3) -> Option<Quat> {
    let planar = Vec3::new(direction.x, 0.0, direction.z);
    if planar.length_squared() < MIN_PLANAR_LENGTH_SQUARED {
        return None;
    }

    Some(Quat::from_rotation_y(f32::atan2(-planar.x, -planar.z)))
}

/// Slerp `rotation` toward `direction` (horizontal only).
///
/// The slerp factor is `face_speed * delta` clamped to [0, 1], so turning
/// speed doesn't depend on tick rate and never snaps unless the factor
/// saturates. Degenerate directions leave the rotation untouched.
pub fn face_smoothly(rotation: &mut Quat, direction: Vec3, face_speed: f32, delta: f32) {
    let Some(look) = planar_look_rotation(direction) else {
        return;
    };

    let t = (face_speed * delta).clamp(0.0, 1.0);
    *rotation = rotation.slerp(look, t).normalize();
}
