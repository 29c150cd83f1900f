//! Resampling operators (forward passes).
//!
//! - `resampler`: generic bilinear resampler driven by a `SampleGrid`
//! - `polar`: polar → Cartesian grid construction and the warp operator
//!
//! No gradients computed here - see `diff` module for backward passes.

pub mod polar;
pub mod resampler;

// Re-export
pub use polar::{polar_sampling_grid, PolarToCartesianWarp, WarpError};
pub use resampler::resample;
