//! Differentiable operations (backward passes).
//!
//! This module implements gradient computation for the forward operations in
//! `warp`. Each submodule corresponds to one forward operation.

pub mod resample_grad;

pub use resample_grad::{resample_backward, ResampleGrads};
