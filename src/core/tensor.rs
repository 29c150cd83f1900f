//! Dense image batches and sampling grids.
//!
//! `ImageBatch` stores `f32` samples in NHWC order (batch, row, column,
//! channel), the layout the polar warp consumes and produces.

use nalgebra::Vector2;
use thiserror::Error;

/// Errors raised when building or combining image batches.
#[derive(Debug, Error, PartialEq)]
pub enum TensorError {
    #[error("data length {got} does not match shape {shape:?} (expected {expected})")]
    LengthMismatch {
        shape: [usize; 4],
        expected: usize,
        got: usize,
    },

    #[error("shape mismatch: expected {expected:?}, got {got:?}")]
    ShapeMismatch {
        expected: [usize; 4],
        got: [usize; 4],
    },
}

/// A batch of multi-channel `f32` images, `[batch, height, width, channels]`.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBatch {
    batch: usize,
    height: usize,
    width: usize,
    channels: usize,
    data: Vec<f32>,
}

impl ImageBatch {
    /// Create a zero-filled batch of the given `[n, h, w, c]` shape.
    pub fn zeros(shape: [usize; 4]) -> Self {
        let [batch, height, width, channels] = shape;
        Self {
            batch,
            height,
            width,
            channels,
            data: vec![0.0; batch * height * width * channels],
        }
    }

    /// Wrap existing NHWC data. The length must match the shape exactly.
    pub fn from_vec(shape: [usize; 4], data: Vec<f32>) -> Result<Self, TensorError> {
        let expected = shape.iter().product::<usize>();
        if data.len() != expected {
            return Err(TensorError::LengthMismatch {
                shape,
                expected,
                got: data.len(),
            });
        }
        let [batch, height, width, channels] = shape;
        Ok(Self {
            batch,
            height,
            width,
            channels,
            data,
        })
    }

    pub fn shape(&self) -> [usize; 4] {
        [self.batch, self.height, self.width, self.channels]
    }

    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Number of `f32` values in one batch item.
    pub fn item_len(&self) -> usize {
        self.height * self.width * self.channels
    }

    /// Flat offset of `(b, y, x, 0)`.
    #[inline]
    pub fn offset(&self, b: usize, y: usize, x: usize) -> usize {
        ((b * self.height + y) * self.width + x) * self.channels
    }

    pub fn get(&self, b: usize, y: usize, x: usize, c: usize) -> f32 {
        self.data[self.offset(b, y, x) + c]
    }

    pub fn set(&mut self, b: usize, y: usize, x: usize, c: usize, value: f32) {
        let idx = self.offset(b, y, x) + c;
        self.data[idx] = value;
    }

    /// All channels of one pixel.
    pub fn pixel(&self, b: usize, y: usize, x: usize) -> &[f32] {
        let start = self.offset(b, y, x);
        &self.data[start..start + self.channels]
    }

    /// All values of one batch item (HWC).
    pub fn item(&self, b: usize) -> &[f32] {
        let len = self.item_len();
        &self.data[b * len..(b + 1) * len]
    }
}

/// Sampling coordinates for every output pixel.
///
/// `points()[y * width + x]` holds `(x, y)` in *input* pixel coordinates:
/// `.x` indexes input columns, `.y` input rows. There is always exactly one
/// point per output pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleGrid {
    height: usize,
    width: usize,
    points: Vec<Vector2<f32>>,
}

impl SampleGrid {
    pub fn new(height: usize, width: usize, points: Vec<Vector2<f32>>) -> Result<Self, TensorError> {
        if points.len() != height * width {
            return Err(TensorError::LengthMismatch {
                shape: [1, height, width, 2],
                expected: height * width,
                got: points.len(),
            });
        }
        Ok(Self {
            height,
            width,
            points,
        })
    }

    /// Build a grid by evaluating `f(y, x)` for every output pixel, row by row.
    pub fn from_fn(
        height: usize,
        width: usize,
        mut f: impl FnMut(usize, usize) -> Vector2<f32>,
    ) -> Self {
        let mut points = Vec::with_capacity(height * width);
        for y in 0..height {
            for x in 0..width {
                points.push(f(y, x));
            }
        }
        Self {
            height,
            width,
            points,
        }
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn points(&self) -> &[Vector2<f32>] {
        &self.points
    }

    #[inline]
    pub fn at(&self, y: usize, x: usize) -> Vector2<f32> {
        self.points[y * self.width + x]
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
