//! Radar intrinsic matrix.
//!
//! Maps radar-frame physical units to pixel/bin indices of the Cartesian
//! radar image:
//!
//! ```text
//! scale = 1 / max_range,  n = range_nbins
//!
//! K = scale * | n   0   n         |
//!             | 0  -n   n         |
//!             | 0   0   1 / scale |
//! ```

use crate::core::{Pose, RadarError, RadarFrame, RadarSensor};
use nalgebra::Matrix3;

/// Compute the radar intrinsic matrix from a frame's `max_range` and `range_nbins`.
///
/// The y axis is negated so that increasing range moves up the image.
/// `frame.flipped` produces the same matrix.
pub fn compute_radar_intrinsic_matrix(frame: &RadarFrame) -> Result<Matrix3<f32>, RadarError> {
    frame.validate()?;

    let scale = 1.0 / frame.max_range;
    let nbins = frame.range_nbins as f32;

    #[rustfmt::skip]
    let f = Matrix3::new(
        nbins, 0.0,    nbins,
        0.0,   -nbins, nbins,
        0.0,   0.0,    1.0 / scale,
    );

    Ok(f * scale)
}

/// Build a placed radar sensor whose intrinsics are derived from `frame`.
pub fn radar_sensor_for_frame(frame: &RadarFrame, pose: Pose) -> Result<RadarSensor, RadarError> {
    let k = compute_radar_intrinsic_matrix(frame)?;
    RadarSensor::new(k, pose)
}
