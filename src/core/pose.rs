//! Rigid sensor pose (world → sensor).

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};

/// A rigid transform from world coordinates into a sensor's frame.
///
/// p_sensor = R * p_world + t
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    /// Rotation from world to sensor coordinates
    pub rotation: Matrix3<f32>,

    /// Translation from world to sensor coordinates
    pub translation: Vector3<f32>,
}

impl Pose {
    pub fn new(rotation: Matrix3<f32>, translation: Vector3<f32>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    /// World → sensor.
    pub fn transform(&self, point_world: &Vector3<f32>) -> Vector3<f32> {
        self.rotation * point_world + self.translation
    }

    /// Sensor → world: p_world = R^T * (p_sensor - t)
    pub fn inverse_transform(&self, point_sensor: &Vector3<f32>) -> Vector3<f32> {
        self.rotation.transpose() * (point_sensor - self.translation)
    }

    /// Sensor origin in world coordinates: C = -R^T * t
    pub fn sensor_center(&self) -> Vector3<f32> {
        -self.rotation.transpose() * self.translation
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Rotation3;

    #[test]
    fn test_inverse_transform_undoes_transform() {
        let rotation = Rotation3::from_euler_angles(0.1, -0.4, 0.7).into_inner();
        let pose = Pose::new(rotation, Vector3::new(0.5, -1.0, 2.0));
        let p = Vector3::new(3.0, 4.0, -5.0);

        let back = pose.inverse_transform(&pose.transform(&p));
        assert_relative_eq!(back, p, epsilon = 1e-5);
    }

    #[test]
    fn test_sensor_center_maps_to_origin() {
        let rotation = Rotation3::from_euler_angles(0.3, 0.2, -0.1).into_inner();
        let pose = Pose::new(rotation, Vector3::new(1.0, 2.0, 3.0));
        let origin = pose.transform(&pose.sensor_center());
        assert_relative_eq!(origin, Vector3::zeros(), epsilon = 1e-5);
    }
}
