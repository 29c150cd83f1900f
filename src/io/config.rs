//! JSON configuration files.
//!
//! A radar frame file holds a bare `RadarFrame`:
//!
//! ```json
//! { "max_range": 50.0, "range_nbins": 256, "angle_nbins": 128, "flipped": false }
//! ```
//!
//! A sensor rig file adds the camera and the radar's world → radar pose:
//!
//! ```json
//! {
//!   "camera": { "fx": 500.0, "fy": 500.0, "cx": 320.0, "cy": 240.0,
//!               "width": 640, "height": 480,
//!               "rotation": [1,0,0, 0,1,0, 0,0,1], "translation": [0,0,0] },
//!   "radar_frame": { "max_range": 50.0, "range_nbins": 256, "angle_nbins": 128 },
//!   "radar_pose": { "rotation": [1,0,0, 0,1,0, 0,0,1], "translation": [0,0,0] }
//! }
//! ```
//!
//! Matrices are stored column-major (nalgebra's serde layout).

use crate::core::{Camera, Pose, RadarFrame};
use crate::intrinsics::radar_sensor_for_frame;
use crate::io::LoadError;
use crate::transform::{CameraRadarCoordinateTransform, TransformError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

/// Camera and radar placed in a shared world frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SensorRig {
    pub camera: Camera,
    pub radar_frame: RadarFrame,
    #[serde(default)]
    pub radar_pose: Pose,
}

impl SensorRig {
    /// Build the coordinate transform, deriving radar intrinsics from the frame.
    pub fn build_transform(&self) -> Result<CameraRadarCoordinateTransform, TransformError> {
        let radar = radar_sensor_for_frame(&self.radar_frame, self.radar_pose.clone())?;
        CameraRadarCoordinateTransform::new(self.camera.clone(), radar)
    }
}

/// Load and validate a radar frame description.
pub fn load_radar_frame(path: &Path) -> Result<RadarFrame, LoadError> {
    let text = fs::read_to_string(path)?;
    let frame: RadarFrame = serde_json::from_str(&text)?;
    frame.validate()?;
    info!(
        path = %path.display(),
        max_range = frame.max_range,
        range_nbins = frame.range_nbins,
        angle_nbins = frame.angle_nbins,
        "loaded radar frame"
    );
    Ok(frame)
}

/// Load a sensor rig; its radar frame is validated.
pub fn load_sensor_rig(path: &Path) -> Result<SensorRig, LoadError> {
    let text = fs::read_to_string(path)?;
    let rig: SensorRig = serde_json::from_str(&text)?;
    rig.radar_frame.validate()?;
    info!(path = %path.display(), "loaded sensor rig");
    Ok(rig)
}

pub fn save_sensor_rig(rig: &SensorRig, path: &Path) -> Result<(), LoadError> {
    let text = serde_json::to_string_pretty(rig)?;
    fs::write(path, text)?;
    Ok(())
}
