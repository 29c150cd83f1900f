//! Differentiable polar → Cartesian warp.
//!
//! Input batches are polar images `[n, range_bins, angle_bins, c]` (rows are
//! range bins, columns azimuth bins). The output is a Cartesian top-down view
//! `[n, range_bins, 2 * range_bins, c]` with the radar at the bottom centre.
//!
//! Grid construction, with R = range_bins and A = angle_bins:
//!
//! ```text
//! xx[j] = (j - R) / R        j in 0..2R     (normalised lateral position)
//! yy[i] = 1 - i / R          i in 0..R      (normalised forward position)
//! rr    = R - sqrt(xx² + yy²) * R           (input row)
//! tt    = A - atan2(yy, xx) / π * A         (input column)
//! ```
//!
//! Cells beyond the maximum range or behind the radar sample outside the
//! polar image and come out as zero.

use crate::core::{ImageBatch, RadarFrame, SampleGrid, TensorError};
use crate::diff::resample_grad::{resample_backward, ResampleGrads};
use crate::warp::resampler::resample;
use nalgebra::Vector2;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum WarpError {
    #[error("polar warp needs non-zero range and angle bins, got {range_bins}x{angle_bins}")]
    EmptyInput {
        range_bins: usize,
        angle_bins: usize,
    },

    #[error("input shape {got:?} does not match warp built for {range_bins} range x {angle_bins} angle bins")]
    InputShape {
        range_bins: usize,
        angle_bins: usize,
        got: [usize; 4],
    },

    #[error("gradient shape {got:?} does not match output shape {expected:?}")]
    GradientShape {
        expected: [usize; 4],
        got: [usize; 4],
    },

    #[error(transparent)]
    Tensor(#[from] TensorError),
}

/// Polar → Cartesian resampling operator with a precomputed grid.
#[derive(Clone, Debug)]
pub struct PolarToCartesianWarp {
    range_bins: usize,
    angle_bins: usize,
    grid: SampleGrid,
}

impl PolarToCartesianWarp {
    /// Build the warp for polar images with the given bin counts.
    pub fn new(range_bins: usize, angle_bins: usize) -> Result<Self, WarpError> {
        if range_bins == 0 || angle_bins == 0 {
            return Err(WarpError::EmptyInput {
                range_bins,
                angle_bins,
            });
        }

        let grid = polar_sampling_grid(range_bins, angle_bins);
        debug!(
            range_bins,
            angle_bins,
            out_height = grid.height(),
            out_width = grid.width(),
            "built polar-to-cartesian grid"
        );

        Ok(Self {
            range_bins,
            angle_bins,
            grid,
        })
    }

    /// Build the warp from an NHWC input shape (only H and W are used).
    pub fn from_input_shape(shape: [usize; 4]) -> Result<Self, WarpError> {
        Self::new(shape[1], shape[2])
    }

    /// Build the warp for a radar frame's polar layout.
    pub fn for_frame(frame: &RadarFrame) -> Result<Self, WarpError> {
        Self::new(frame.range_nbins, frame.angle_nbins)
    }

    pub fn range_bins(&self) -> usize {
        self.range_bins
    }

    pub fn angle_bins(&self) -> usize {
        self.angle_bins
    }

    pub fn grid(&self) -> &SampleGrid {
        &self.grid
    }

    /// Shape of the Cartesian output for a batch of `batch` items with `channels` channels.
    pub fn output_shape(&self, batch: usize, channels: usize) -> [usize; 4] {
        [batch, self.grid.height(), self.grid.width(), channels]
    }

    /// Forward pass: resample a polar batch onto the Cartesian grid.
    pub fn apply(&self, inputs: &ImageBatch) -> Result<ImageBatch, WarpError> {
        self.check_input(inputs)?;
        Ok(resample(inputs, &self.grid))
    }

    /// Backward pass: gradients of a scalar loss w.r.t. the polar inputs and
    /// the sampling grid, given `grad_output = dL/d(apply(inputs))`.
    pub fn backward(
        &self,
        inputs: &ImageBatch,
        grad_output: &ImageBatch,
    ) -> Result<ResampleGrads, WarpError> {
        self.check_input(inputs)?;
        let expected = self.output_shape(inputs.batch(), inputs.channels());
        if grad_output.shape() != expected {
            return Err(WarpError::GradientShape {
                expected,
                got: grad_output.shape(),
            });
        }
        resample_backward(inputs, &self.grid, grad_output).map_err(WarpError::from)
    }

    fn check_input(&self, inputs: &ImageBatch) -> Result<(), WarpError> {
        if inputs.height() != self.range_bins || inputs.width() != self.angle_bins {
            return Err(WarpError::InputShape {
                range_bins: self.range_bins,
                angle_bins: self.angle_bins,
                got: inputs.shape(),
            });
        }
        Ok(())
    }
}

/// Sampling grid mapping each Cartesian cell to its polar (column, row).
///
/// Evaluated in f64 and stored as f32.
pub fn polar_sampling_grid(range_bins: usize, angle_bins: usize) -> SampleGrid {
    let r = range_bins as f64;
    let a = angle_bins as f64;

    SampleGrid::from_fn(range_bins, 2 * range_bins, |i, j| {
        let yy = 1.0 - i as f64 / r;
        let xx = (j as f64 - r) / r;
        let rr = r - (xx * xx + yy * yy).sqrt() * r;
        let tt = a - yy.atan2(xx) / std::f64::consts::PI * a;
        Vector2::new(tt as f32, rr as f32)
    })
}
