//! Radar frame configuration and radar sensor placement.
//!
//! The radar observes a plane. Points in the radar frame are `(x, y, z)` in
//! metres with `z` the height above that plane; the intrinsic matrix maps the
//! planar part `(x, y, 1)` to pixel/bin indices of the Cartesian radar image.

use crate::core::Pose;
use nalgebra::{Matrix3, Vector2, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RadarError {
    #[error("max_range must be finite and positive, got {0}")]
    InvalidMaxRange(f32),

    #[error("{axis} bin count must be non-zero")]
    EmptyAxis { axis: &'static str },

    #[error("radar intrinsic matrix is not invertible")]
    SingularIntrinsics,
}

/// Configuration of one radar range/azimuth frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RadarFrame {
    /// Maximum observed range (metres)
    pub max_range: f32,

    /// Number of range bins (rows of the polar image)
    pub range_nbins: usize,

    /// Number of azimuth bins (columns of the polar image)
    pub angle_nbins: usize,

    /// Frame is stored flipped. Does not change the intrinsic matrix.
    #[serde(default)]
    pub flipped: bool,
}

impl RadarFrame {
    pub fn new(max_range: f32, range_nbins: usize, angle_nbins: usize) -> Self {
        Self {
            max_range,
            range_nbins,
            angle_nbins,
            flipped: false,
        }
    }

    pub fn validate(&self) -> Result<(), RadarError> {
        if !self.max_range.is_finite() || self.max_range <= 0.0 {
            return Err(RadarError::InvalidMaxRange(self.max_range));
        }
        if self.range_nbins == 0 {
            return Err(RadarError::EmptyAxis { axis: "range" });
        }
        if self.angle_nbins == 0 {
            return Err(RadarError::EmptyAxis { axis: "angle" });
        }
        Ok(())
    }

    /// Metres covered by one range bin.
    pub fn range_resolution(&self) -> f32 {
        self.max_range / self.range_nbins as f32
    }
}

/// A placed radar: intrinsic matrix plus world → radar pose.
#[derive(Clone, Debug, PartialEq)]
pub struct RadarSensor {
    intrinsic: Matrix3<f32>,
    intrinsic_inv: Matrix3<f32>,
    pose: Pose,
}

impl RadarSensor {
    pub fn new(intrinsic: Matrix3<f32>, pose: Pose) -> Result<Self, RadarError> {
        let intrinsic_inv = intrinsic
            .try_inverse()
            .ok_or(RadarError::SingularIntrinsics)?;
        Ok(Self {
            intrinsic,
            intrinsic_inv,
            pose,
        })
    }

    pub fn intrinsic(&self) -> &Matrix3<f32> {
        &self.intrinsic
    }

    pub fn pose(&self) -> &Pose {
        &self.pose
    }

    pub fn world_to_radar(&self, point_world: &Vector3<f32>) -> Vector3<f32> {
        self.pose.transform(point_world)
    }

    pub fn radar_to_world(&self, point_radar: &Vector3<f32>) -> Vector3<f32> {
        self.pose.inverse_transform(point_radar)
    }

    /// Planar radar coordinates (metres) → radar pixel coordinates.
    pub fn radar_to_pixel(&self, xy: &Vector2<f32>) -> Vector2<f32> {
        let h = self.intrinsic * Vector3::new(xy.x, xy.y, 1.0);
        Vector2::new(h.x / h.z, h.y / h.z)
    }

    /// Radar pixel coordinates → planar radar coordinates (metres).
    pub fn pixel_to_radar(&self, uv: &Vector2<f32>) -> Vector2<f32> {
        let h = self.intrinsic_inv * Vector3::new(uv.x, uv.y, 1.0);
        Vector2::new(h.x / h.z, h.y / h.z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_validate_rejects_bad_frames() {
        assert!(RadarFrame::new(50.0, 128, 128).validate().is_ok());
        assert_eq!(
            RadarFrame::new(0.0, 128, 128).validate(),
            Err(RadarError::InvalidMaxRange(0.0))
        );
        assert!(RadarFrame::new(f32::NAN, 128, 128).validate().is_err());
        assert_eq!(
            RadarFrame::new(50.0, 0, 128).validate(),
            Err(RadarError::EmptyAxis { axis: "range" })
        );
        assert_eq!(
            RadarFrame::new(50.0, 128, 0).validate(),
            Err(RadarError::EmptyAxis { axis: "angle" })
        );
    }

    #[test]
    fn test_flipped_defaults_to_false_in_json() {
        let frame: RadarFrame =
            serde_json::from_str(r#"{"max_range": 40.0, "range_nbins": 256, "angle_nbins": 64}"#)
                .unwrap();
        assert!(!frame.flipped);
        assert_relative_eq!(frame.range_resolution(), 0.15625);
    }

    #[test]
    fn test_singular_intrinsics_rejected() {
        let err = RadarSensor::new(Matrix3::zeros(), Pose::identity()).unwrap_err();
        assert_eq!(err, RadarError::SingularIntrinsics);
    }

    #[test]
    fn test_pixel_roundtrip() {
        let k = Matrix3::new(4.0, 0.0, 64.0, 0.0, -4.0, 64.0, 0.0, 0.0, 1.0);
        let radar = RadarSensor::new(k, Pose::identity()).unwrap();
        let xy = Vector2::new(-3.5, 12.25);

        let uv = radar.radar_to_pixel(&xy);
        assert_relative_eq!(uv, Vector2::new(50.0, 15.0), epsilon = 1e-5);
        assert_relative_eq!(radar.pixel_to_radar(&uv), xy, epsilon = 1e-4);
    }
}
