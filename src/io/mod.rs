//! I/O operations for loading and saving data.
//!
//! This module handles all file format parsing and export:
//! - JSON configuration (radar frames, camera/radar rigs)
//! - PNG polar and Cartesian images

mod config;
mod polar_image;

use crate::core::{RadarError, TensorError};
use thiserror::Error;

/// Errors that can occur when loading or saving files.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image data: {0}")]
    Tensor(#[from] TensorError),

    #[error("invalid radar configuration: {0}")]
    Radar(#[from] RadarError),

    #[error("cannot encode {0}-channel images (expected 1 or 3)")]
    UnsupportedChannels(usize),

    #[error("batch index {index} out of range for batch of {batch}")]
    BatchIndex { index: usize, batch: usize },
}

// Re-export public types and functions
pub use config::{load_radar_frame, load_sensor_rig, save_sensor_rig, SensorRig};
pub use polar_image::{load_polar_image, save_batch_item};
