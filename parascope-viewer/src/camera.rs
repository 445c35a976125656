//! Camera state and projection

use nalgebra::{Matrix4, Perspective3, Point3, Vector3};

/// Vertical field of view in radians
pub const FOV_Y: f32 = 75.0 * std::f32::consts::PI / 180.0;

/// Near clip plane
pub const NEAR: f32 = 0.1;

/// Far clip plane; world units are millimeters, so the scene is large
pub const FAR: f32 = 100_000.0;

/// A perspective camera for viewing the geometry scene.
///
/// Single-writer: only the orbit controller mutates this state; the render
/// pass reads it once per frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    pub fov: f32,
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    /// Create a camera looking from `position` toward `target`
    pub fn new(position: Point3<f32>, target: Point3<f32>, aspect_ratio: f32) -> Self {
        Self {
            position,
            target,
            up: Vector3::new(0.0, 1.0, 0.0),
            fov: FOV_Y,
            aspect_ratio,
            near: NEAR,
            far: FAR,
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let perspective = Perspective3::new(self.aspect_ratio, self.fov, self.near, self.far);
        perspective.into_inner()
    }

    /// Distance from the camera to its look-at target
    pub fn distance(&self) -> f32 {
        (self.position - self.target).norm()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(
            Point3::new(15_000.0, 10_000.0, -15_000.0),
            Point3::origin(),
            16.0 / 9.0,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_position_to_target() {
        let camera = Camera::new(
            Point3::new(3.0, 0.0, 4.0),
            Point3::origin(),
            1.0,
        );
        assert!((camera.distance() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn view_matrix_is_finite() {
        let camera = Camera::default();
        assert!(camera.view_matrix().iter().all(|v| v.is_finite()));
        assert!(camera.projection_matrix().iter().all(|v| v.is_finite()));
    }
}
