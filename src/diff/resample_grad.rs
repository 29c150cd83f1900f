//! Gradients for bilinear resampling.
//!
//! Forward (see `warp::resampler::resample`), per sample point (x, y):
//!   out = dx·dy·A + (1-dx)(1-dy)·D + dx(1-dy)·C + (1-dx)dy·B
//!   A = I(fx,fy), B = I(cx,fy), C = I(fx,cy), D = I(cx,cy)
//!   dx = cx - x, dy = cy - y
//!
//! This module provides gradients w.r.t:
//! - input image values (scatter of the upstream gradient by corner weight)
//! - sampling point coordinates (x, y), summed over batch and channels
//!
//! Notes:
//! - The forward is piecewise bilinear; derivatives w.r.t. (x, y) jump at
//!   integer coordinates. Finite-difference checks must stay away from them.

use crate::core::{ImageBatch, SampleGrid, TensorError};
use crate::warp::resampler::{pixel_offset, read_or_zero, BilinearTap};
use nalgebra::Vector2;
use rayon::prelude::*;

#[derive(Clone, Debug)]
pub struct ResampleGrads {
    /// dL/d(input), same shape as the resampled input
    pub d_data: ImageBatch,
    /// dL/d(grid point), one entry per grid point
    pub d_grid: Vec<Vector2<f32>>,
}

/// Backward pass of `resample`.
///
/// `grad_output` must have shape `[batch, grid.height(), grid.width(), channels]`
/// of `data`, otherwise `TensorError::ShapeMismatch` is returned.
pub fn resample_backward(
    data: &ImageBatch,
    grid: &SampleGrid,
    grad_output: &ImageBatch,
) -> Result<ResampleGrads, TensorError> {
    let [batch, _, _, channels] = data.shape();
    let expected = [batch, grid.height(), grid.width(), channels];
    if grad_output.shape() != expected {
        return Err(TensorError::ShapeMismatch {
            expected,
            got: grad_output.shape(),
        });
    }

    let mut d_data = ImageBatch::zeros(data.shape());
    let item_len = data.item_len();
    if item_len == 0 {
        return Ok(ResampleGrads {
            d_data,
            d_grid: vec![Vector2::zeros(); grid.len()],
        });
    }

    // Each batch item owns its slice of d_data. d_grid is shared, so every
    // thread accumulates its own copy and the copies are summed at the end.
    let d_grid = d_data
        .data_mut()
        .par_chunks_mut(item_len)
        .enumerate()
        .fold(
            || vec![Vector2::<f32>::zeros(); grid.len()],
            |mut local_d_grid, (b, item_d_data)| {
                item_backward(data, grid, grad_output, b, item_d_data, &mut local_d_grid);
                local_d_grid
            },
        )
        .reduce(
            || vec![Vector2::<f32>::zeros(); grid.len()],
            |mut acc, local| {
                for (a, g) in acc.iter_mut().zip(local) {
                    *a += g;
                }
                acc
            },
        );

    Ok(ResampleGrads { d_data, d_grid })
}

/// Accumulate the gradients of batch item `b`.
///
/// `d_data` is the item's own HWC slice; `d_grid` is added to.
fn item_backward(
    data: &ImageBatch,
    grid: &SampleGrid,
    grad_output: &ImageBatch,
    b: usize,
    d_data: &mut [f32],
    d_grid: &mut [Vector2<f32>],
) {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let Some(tap) = BilinearTap::new(&grid.at(y, x), data.width(), data.height()) else {
                continue;
            };
            let (dx, dy) = (tap.dx, tap.dy);
            let upstream = grad_output.pixel(b, y, x);
            let mut d_point = Vector2::<f32>::zeros();

            for (ch, &g) in upstream.iter().enumerate() {
                if g == 0.0 {
                    continue;
                }

                let a = read_or_zero(data, b, tap.fx, tap.fy, ch);
                let bb = read_or_zero(data, b, tap.cx, tap.fy, ch);
                let c = read_or_zero(data, b, tap.fx, tap.cy, ch);
                let d = read_or_zero(data, b, tap.cx, tap.cy, ch);

                // d(out)/dx = -d(out)/d(dx)
                d_point.x += g * (dy * (bb - a) + (1.0 - dy) * (d - c));
                d_point.y += g * (dx * (c - a) + (1.0 - dx) * (d - bb));

                for (col, row, w) in tap.corners() {
                    // Offset with b = 0 is relative to the item.
                    if let Some(idx) = pixel_offset(data, 0, col, row) {
                        d_data[idx + ch] += g * w;
                    }
                }
            }

            d_grid[y * grid.width() + x] += d_point;
        }
    }
}
