//! Vector helpers and the three named axis rotations
use nalgebra::Vector3;

/// 3-vector used for every scene point and direction
pub type Vec3 = Vector3<f64>;

/// Shorthand constructor
pub fn vec3(x: f64, y: f64, z: f64) -> Vec3 {
    Vec3::new(x, y, z)
}

pub fn add3(a: &Vec3, b: &Vec3) -> Vec3 {
    a + b
}

pub fn scale3(v: &Vec3, s: f64) -> Vec3 {
    v * s
}

/// Rotate about the vertical (Y) axis
pub fn rot_y(p: &Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    vec3(c * p.x + s * p.z, p.y, -s * p.x + c * p.z)
}

/// Rotate about the horizontal (X) axis
pub fn rot_x(p: &Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    vec3(p.x, c * p.y - s * p.z, s * p.y + c * p.z)
}

/// Rotate about the depth (Z) axis
pub fn rot_z(p: &Vec3, angle: f64) -> Vec3 {
    let (s, c) = angle.sin_cos();
    vec3(c * p.x - s * p.y, s * p.x + c * p.y, p.z)
}

/// Orbit rotation used for the external view: yaw then pitch, no roll
pub fn rotate_world_to_view(p: &Vec3, yaw: f64, pitch: f64) -> Vec3 {
    rot_x(&rot_y(p, yaw), pitch)
}

/// Full camera orientation, applied in the fixed order Y, X, Z
pub fn rotate_euler(p: &Vec3, yaw: f64, pitch: f64, roll: f64) -> Vec3 {
    rot_z(&rot_x(&rot_y(p, yaw), pitch), roll)
}

pub fn clamp(x: f64, min: f64, max: f64) -> f64 {
    x.min(max).max(min)
}

pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Map a normalized slider position onto `[min, max]`.
///
/// Positions outside `[0, 1]` are clamped first.
pub fn map_slider(position: f64, min: f64, max: f64) -> f64 {
    lerp(min, max, clamp(position, 0.0, 1.0))
}

/// Inverse of [`map_slider`], for placing a widget at an existing value
pub fn unmap_slider(value: f64, min: f64, max: f64) -> f64 {
    if (max - min).abs() < f64::EPSILON {
        return 0.0;
    }
    clamp((value - min) / (max - min), 0.0, 1.0)
}
