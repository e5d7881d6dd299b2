//! Simulated pinhole camera pose
use serde::{Deserialize, Serialize};

use crate::math::{rotate_euler, vec3, Vec3};

/// Position and Euler orientation of the simulated camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPose {
    pub position: Vec3,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl CameraPose {
    pub fn new(position: Vec3, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            position,
            yaw,
            pitch,
            roll,
        }
    }

    /// Camera-local direction to world orientation
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        rotate_euler(v, self.yaw, self.pitch, self.roll)
    }

    /// World orientation back to camera-local.
    ///
    /// Negates all three angles and keeps the Y, X, Z order. This matches
    /// the true inverse only when at most one angle is non-zero.
    pub fn rotate_inverse(&self, v: &Vec3) -> Vec3 {
        rotate_euler(v, -self.yaw, -self.pitch, -self.roll)
    }

    /// Express a world point in camera coordinates
    pub fn world_to_camera(&self, p: &Vec3) -> Vec3 {
        self.rotate_inverse(&(p - self.position))
    }

    /// Express a camera-local point in world coordinates
    pub fn camera_to_world(&self, p: &Vec3) -> Vec3 {
        self.position + self.rotate(p)
    }

    pub fn right(&self) -> Vec3 {
        self.rotate(&vec3(1.0, 0.0, 0.0))
    }

    pub fn up(&self) -> Vec3 {
        self.rotate(&vec3(0.0, 1.0, 0.0))
    }

    pub fn forward(&self) -> Vec3 {
        self.rotate(&vec3(0.0, 0.0, 1.0))
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::new(vec3(-0.4, -0.2, 0.1), 0.35, 0.1, -0.05)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Rotation3;

    fn approx_eq(a: &Vec3, b: &Vec3, eps: f64) -> bool {
        (a - b).norm() < eps
    }

    /// Same composition as `rotate_euler`, built from nalgebra rotations
    fn matrix_for(pose: &CameraPose) -> Rotation3<f64> {
        Rotation3::from_axis_angle(&Vec3::z_axis(), pose.roll)
            * Rotation3::from_axis_angle(&Vec3::x_axis(), pose.pitch)
            * Rotation3::from_axis_angle(&Vec3::y_axis(), pose.yaw)
    }

    #[test]
    fn test_basis_is_orthonormal() {
        let pose = CameraPose::default();
        let (r, u, f) = (pose.right(), pose.up(), pose.forward());
        assert!((r.norm() - 1.0).abs() < 1e-9);
        assert!((u.norm() - 1.0).abs() < 1e-9);
        assert!((f.norm() - 1.0).abs() < 1e-9);
        assert!(r.dot(&u).abs() < 1e-9);
        assert!(r.dot(&f).abs() < 1e-9);
        assert!(approx_eq(&r.cross(&u), &f, 1e-9));
    }

    #[test]
    fn test_rotate_matches_matrix() {
        let pose = CameraPose::default();
        let v = vec3(0.3, -0.8, 1.1);
        assert!(approx_eq(&pose.rotate(&v), &(matrix_for(&pose) * v), 1e-9));
    }

    #[test]
    fn test_single_axis_inverse_is_exact() {
        let pose = CameraPose::new(Vec3::zeros(), 0.0, 0.7, 0.0);
        let v = vec3(0.3, -0.8, 1.1);
        assert!(approx_eq(&pose.rotate_inverse(&pose.rotate(&v)), &v, 1e-9));
    }

    #[test]
    fn test_negated_angle_inverse_differs_from_matrix_inverse() {
        let pose = CameraPose::new(Vec3::zeros(), 0.8, 0.6, 0.5);
        let v = vec3(0.3, -0.8, 1.1);
        let exact = matrix_for(&pose).inverse() * v;
        let shortcut = pose.rotate_inverse(&v);
        assert!((exact - shortcut).norm() > 1e-3);
        // both are still rotations
        assert!((shortcut.norm() - v.norm()).abs() < 1e-9);
    }

    #[test]
    fn test_camera_to_world_of_origin_is_position() {
        let pose = CameraPose::default();
        assert!(approx_eq(&pose.camera_to_world(&Vec3::zeros()), &pose.position, 1e-12));
    }
}
