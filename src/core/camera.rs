//! Camera model (pinhole camera with intrinsics and extrinsics).
//!
//! Cameras are used to:
//! - Project world points to pixel coordinates
//! - Lift pixels with known depth back into the world frame

use crate::core::Pose;
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// A pinhole camera with intrinsic and extrinsic parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    // Intrinsic parameters (camera internals)
    /// Focal length in X (pixels)
    pub fx: f32,

    /// Focal length in Y (pixels)
    pub fy: f32,

    /// Principal point X (pixels)
    pub cx: f32,

    /// Principal point Y (pixels)
    pub cy: f32,

    /// Image width (pixels)
    pub width: u32,

    /// Image height (pixels)
    pub height: u32,

    // Extrinsic parameters (camera pose in world)
    /// Rotation from world to camera coordinates
    pub rotation: Matrix3<f32>,

    /// Translation from world to camera coordinates
    pub translation: Vector3<f32>,
}

impl Camera {
    /// Create a new camera with given parameters.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        fx: f32,
        fy: f32,
        cx: f32,
        cy: f32,
        width: u32,
        height: u32,
        rotation: Matrix3<f32>,
        translation: Vector3<f32>,
    ) -> Self {
        Self {
            fx,
            fy,
            cx,
            cy,
            width,
            height,
            rotation,
            translation,
        }
    }

    /// Build a camera from a 3×3 intrinsic matrix and a pose.
    ///
    /// Skew (`K[0,1]`) is not modelled and is ignored.
    pub fn from_intrinsic_matrix(k: &Matrix3<f32>, pose: &Pose, width: u32, height: u32) -> Self {
        Self::new(
            k[(0, 0)],
            k[(1, 1)],
            k[(0, 2)],
            k[(1, 2)],
            width,
            height,
            pose.rotation,
            pose.translation,
        )
    }

    /// Intrinsic matrix K = [[fx, 0, cx], [0, fy, cy], [0, 0, 1]].
    pub fn intrinsic_matrix(&self) -> Matrix3<f32> {
        Matrix3::new(self.fx, 0.0, self.cx, 0.0, self.fy, self.cy, 0.0, 0.0, 1.0)
    }

    /// World → camera pose.
    pub fn pose(&self) -> Pose {
        Pose::new(self.rotation, self.translation)
    }

    /// Transform a point from world coordinates to camera coordinates.
    ///
    /// p_camera = R * p_world + t
    pub fn world_to_camera(&self, point_world: &Vector3<f32>) -> Vector3<f32> {
        self.rotation * point_world + self.translation
    }

    /// Transform a point from camera coordinates back to world coordinates.
    ///
    /// p_world = R^T * (p_camera - t)
    pub fn camera_to_world(&self, point_camera: &Vector3<f32>) -> Vector3<f32> {
        self.rotation.transpose() * (point_camera - self.translation)
    }

    /// Project a point in camera coordinates to pixel coordinates.
    ///
    /// Returns None if the point is behind the camera (z <= 0).
    ///
    /// Projection: [u, v] = [fx * x/z + cx, fy * y/z + cy]
    pub fn project(&self, point_camera: &Vector3<f32>) -> Option<Vector2<f32>> {
        if point_camera.z <= 0.0 {
            return None;
        }

        let x = point_camera.x / point_camera.z;
        let y = point_camera.y / point_camera.z;

        let u = self.fx * x + self.cx;
        let v = self.fy * y + self.cy;

        Some(Vector2::new(u, v))
    }

    /// Lift a pixel with known depth (camera-frame z) into camera coordinates.
    ///
    /// Inverse of `project`: [x, y, z] = [(u - cx) * z / fx, (v - cy) * z / fy, z]
    pub fn unproject(&self, pixel: &Vector2<f32>, depth: f32) -> Vector3<f32> {
        Vector3::new(
            (pixel.x - self.cx) * depth / self.fx,
            (pixel.y - self.cy) * depth / self.fy,
            depth,
        )
    }

    /// Project a point from world coordinates directly to pixel coordinates.
    ///
    /// Convenience method combining world_to_camera and project.
    pub fn world_to_pixel(&self, point_world: &Vector3<f32>) -> Option<Vector2<f32>> {
        let point_camera = self.world_to_camera(point_world);
        self.project(&point_camera)
    }

    /// Get the camera center in world coordinates.
    pub fn camera_center(&self) -> Vector3<f32> {
        // Camera center in world: C = -R^T * t
        -self.rotation.transpose() * self.translation
    }

    /// True when the focal lengths allow `unproject` (K invertible).
    pub fn is_invertible(&self) -> bool {
        self.fx.is_finite() && self.fy.is_finite() && self.fx != 0.0 && self.fy != 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_projection() {
        // Simple test camera: identity rotation, zero translation
        let cam = Camera::new(
            100.0, // fx
            100.0, // fy
            50.0,  // cx
            50.0,  // cy
            100,   // width
            100,   // height
            Matrix3::identity(),
            Vector3::zeros(),
        );

        // Point at (1, 0, 2) should project to (100*1/2 + 50, 100*0/2 + 50) = (100, 50)
        let world_point = Vector3::new(1.0, 0.0, 2.0);
        let pixel = cam.world_to_pixel(&world_point).unwrap();

        assert_relative_eq!(pixel.x, 100.0, epsilon = 1e-5);
        assert_relative_eq!(pixel.y, 50.0, epsilon = 1e-5);
    }

    #[test]
    fn test_point_behind_camera() {
        let cam = Camera::new(
            100.0, 100.0, 50.0, 50.0, 100, 100,
            Matrix3::identity(),
            Vector3::zeros(),
        );

        // Point with negative z (behind camera)
        let world_point = Vector3::new(0.0, 0.0, -1.0);
        assert!(cam.world_to_pixel(&world_point).is_none());
    }

    #[test]
    fn test_unproject_inverts_project() {
        let cam = Camera::new(
            420.0, 380.0, 320.0, 240.0, 640, 480,
            Matrix3::identity(),
            Vector3::zeros(),
        );
        let p = Vector3::new(0.3, -0.2, 5.0);
        let pixel = cam.project(&p).unwrap();
        assert_relative_eq!(cam.unproject(&pixel, p.z), p, epsilon = 1e-5);
    }

    #[test]
    fn test_intrinsic_matrix_roundtrip() {
        let k = Matrix3::new(500.0, 0.0, 320.0, 0.0, 510.0, 240.0, 0.0, 0.0, 1.0);
        let cam = Camera::from_intrinsic_matrix(&k, &Pose::identity(), 640, 480);
        assert_relative_eq!(cam.intrinsic_matrix(), k);
    }

    #[test]
    fn test_camera_center_maps_to_origin() {
        // 90° about z
        let rotation = Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0);
        let cam = Camera::new(
            100.0, 100.0, 50.0, 50.0, 100, 100,
            rotation,
            Vector3::new(1.0, 2.0, 3.0),
        );

        let center = cam.camera_center();
        // -R^T t = -(2, -1, 3)
        assert_relative_eq!(center, Vector3::new(-2.0, 1.0, -3.0), epsilon = 1e-6);
        assert_relative_eq!(cam.world_to_camera(&center), Vector3::zeros(), epsilon = 1e-6);
        assert_relative_eq!(cam.pose().sensor_center(), center, epsilon = 1e-6);
    }
}
