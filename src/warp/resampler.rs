//! Bilinear resampler (forward pass).
//!
//! For each output pixel the grid supplies a sampling point `(x, y)` in input
//! pixel coordinates. Points strictly inside `(-1, width) × (-1, height)` are
//! interpolated from their four neighbours, with neighbours that fall outside
//! the image reading as zero. Anything else samples to zero.
//!
//! Corner weights, with `fx = floor(x)`, `cx = fx + 1`, `dx = cx - x`
//! (and likewise for y):
//!
//! ```text
//! out = dx·dy·I(fx,fy) + (1-dx)(1-dy)·I(cx,cy) + dx(1-dy)·I(fx,cy) + (1-dx)dy·I(cx,fy)
//! ```

use crate::core::{ImageBatch, SampleGrid};
use nalgebra::Vector2;
use rayon::prelude::*;
use tracing::warn;

/// The four neighbours of a sampling point and their interpolation weights.
#[derive(Clone, Copy, Debug)]
pub(crate) struct BilinearTap {
    pub fx: i64,
    pub fy: i64,
    pub cx: i64,
    pub cy: i64,
    /// Weight of the floor column (`cx - x`)
    pub dx: f32,
    /// Weight of the floor row (`cy - y`)
    pub dy: f32,
}

impl BilinearTap {
    /// Returns None when the point lies outside the sampling window (or is NaN).
    #[inline]
    pub fn new(point: &Vector2<f32>, width: usize, height: usize) -> Option<Self> {
        let (x, y) = (point.x, point.y);
        let inside = x > -1.0 && y > -1.0 && x < width as f32 && y < height as f32;
        if !inside {
            return None;
        }

        let fx = x.floor() as i64;
        let fy = y.floor() as i64;
        let cx = fx + 1;
        let cy = fy + 1;

        Some(Self {
            fx,
            fy,
            cx,
            cy,
            dx: cx as f32 - x,
            dy: cy as f32 - y,
        })
    }

    /// `(column, row, weight)` for each corner, in the order of the formula above.
    #[inline]
    pub fn corners(&self) -> [(i64, i64, f32); 4] {
        let (dx, dy) = (self.dx, self.dy);
        [
            (self.fx, self.fy, dx * dy),
            (self.cx, self.cy, (1.0 - dx) * (1.0 - dy)),
            (self.fx, self.cy, dx * (1.0 - dy)),
            (self.cx, self.fy, (1.0 - dx) * dy),
        ]
    }
}

/// Index of pixel `(col, row)` of item `b` if it lies inside the image.
#[inline]
pub(crate) fn pixel_offset(data: &ImageBatch, b: usize, col: i64, row: i64) -> Option<usize> {
    if col < 0 || row < 0 || col >= data.width() as i64 || row >= data.height() as i64 {
        return None;
    }
    Some(data.offset(b, row as usize, col as usize))
}

/// Read channel `ch` of pixel `(col, row)`; zero outside the image.
#[inline]
pub(crate) fn read_or_zero(data: &ImageBatch, b: usize, col: i64, row: i64, ch: usize) -> f32 {
    match pixel_offset(data, b, col, row) {
        Some(idx) => data.data()[idx + ch],
        None => 0.0,
    }
}

/// Resample every item of `data` at the points of `grid`.
///
/// Output shape is `[batch, grid.height(), grid.width(), channels]`. The grid is
/// shared by all batch items.
pub fn resample(data: &ImageBatch, grid: &SampleGrid) -> ImageBatch {
    let [batch, _, _, channels] = data.shape();
    let mut out = ImageBatch::zeros([batch, grid.height(), grid.width(), channels]);
    if out.data().is_empty() {
        return out;
    }

    let non_finite = grid
        .points()
        .iter()
        .filter(|p| !(p.x.is_finite() && p.y.is_finite()))
        .count();
    if non_finite > 0 {
        warn!(non_finite, "sampling grid contains non-finite points; they resample to zero");
    }

    let row_len = grid.width() * channels;
    out.data_mut()
        .par_chunks_mut(row_len)
        .enumerate()
        .for_each(|(row_idx, row)| {
            let b = row_idx / grid.height();
            let y = row_idx % grid.height();

            for x in 0..grid.width() {
                let Some(tap) = BilinearTap::new(&grid.at(y, x), data.width(), data.height())
                else {
                    continue;
                };
                let out_px = &mut row[x * channels..(x + 1) * channels];

                for (col, r, w) in tap.corners() {
                    let Some(idx) = pixel_offset(data, b, col, r) else {
                        continue;
                    };
                    for (ch, o) in out_px.iter_mut().enumerate() {
                        *o += w * data.data()[idx + ch];
                    }
                }
            }
        });

    out
}
