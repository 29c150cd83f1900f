//! # radar-fusion-geom: radar/camera coordinate geometry in Rust
//!
//! Geometry helpers for a sensor-fusion pipeline that relates a radar's polar
//! (range/azimuth) observations to camera pixels and to a shared world frame.
//!
//! ## Architecture
//!
//! - `core`: Pure data (image batches, sampling grids, cameras, radar frames, poses)
//! - `intrinsics`: Radar intrinsic matrix derived from the frame configuration
//! - `warp`: Polar → Cartesian resampling (forward pass)
//! - `diff`: Backward passes for the resampler
//! - `transform`: Camera ↔ world ↔ radar coordinate chain
//! - `io`: JSON configuration and PNG image I/O
//!
//! The warp is differentiable in the sense that every forward operation in
//! `warp` has an explicit backward pass in `diff`, checked against finite
//! differences in `tests/gradient_check.rs`.

// Core data structures
pub mod core;

// Radar intrinsic matrix
pub mod intrinsics;

// Forward resampling
pub mod warp;

// Backward passes
pub mod diff;

// Camera/world/radar transform chain
pub mod transform;

// Configuration and image I/O
pub mod io;

// Re-export commonly used types at crate root for convenience
pub use crate::core::{Camera, ImageBatch, Pose, RadarFrame, RadarSensor, SampleGrid};
pub use intrinsics::compute_radar_intrinsic_matrix;
pub use transform::CameraRadarCoordinateTransform;
pub use warp::PolarToCartesianWarp;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
