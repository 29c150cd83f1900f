//! Core data structures.
//!
//! This module contains the fundamental types used throughout the crate:
//! - `ImageBatch`: NHWC image batch (the resampler's tensor)
//! - `SampleGrid`: per-output-pixel sampling coordinates
//! - `Camera`: pinhole intrinsics and extrinsics
//! - `RadarFrame` / `RadarSensor`: radar configuration and placement
//! - `Pose`: rigid world → sensor transform
//!
//! All types here are "pure data" - no I/O, no resampling logic.

mod camera;
mod pose;
mod radar;
mod tensor;

// Re-export public types
pub use camera::Camera;
pub use pose::Pose;
pub use radar::{RadarError, RadarFrame, RadarSensor};
pub use tensor::{ImageBatch, SampleGrid, TensorError};
