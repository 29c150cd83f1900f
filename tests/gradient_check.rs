//! Gradient checking tests for the resampler and the polar warp.
//!
//! These tests verify that analytical gradients match numerical gradients
//! computed via finite differences:
//! - Numerical: (f(x+ε) - f(x-ε)) / 2ε
//! - Analytical: backward pass implementation
//!
//! Loss used throughout: L = <W, forward(...)> for a random upstream W, so
//! dL/d(forward) = W.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radar_fusion_geom::core::{ImageBatch, SampleGrid};
use radar_fusion_geom::diff::resample_backward;
use radar_fusion_geom::warp::{resample, PolarToCartesianWarp};

fn rel_err(a: f32, b: f32) -> f32 {
    let denom = a.abs().max(b.abs()).max(1e-6);
    (a - b).abs() / denom
}

fn random_batch(rng: &mut StdRng, shape: [usize; 4]) -> ImageBatch {
    let len = shape.iter().product();
    let data = (0..len).map(|_| rng.gen_range(-1.0f32..1.0)).collect();
    ImageBatch::from_vec(shape, data).unwrap()
}

fn dot(a: &ImageBatch, b: &ImageBatch) -> f64 {
    a.data()
        .iter()
        .zip(b.data())
        .map(|(&x, &y)| x as f64 * y as f64)
        .sum()
}

/// Random coordinate whose fractional part stays away from the integer kinks.
fn smooth_coord(rng: &mut StdRng, lo: i32, hi: i32) -> f32 {
    rng.gen_range(lo..hi) as f32 + rng.gen_range(0.1f32..0.9)
}

#[test]
fn test_resample_gradient_wrt_grid() {
    let mut rng = StdRng::seed_from_u64(0x5A3D_1E_u64);
    let data = random_batch(&mut rng, [2, 5, 7, 3]);

    // Mix of interior points and points hanging over the border (-1, 0) band.
    let points: Vec<Vector2<f32>> = (0..24)
        .map(|_| Vector2::new(smooth_coord(&mut rng, -1, 7), smooth_coord(&mut rng, -1, 5)))
        .collect();
    let grid = SampleGrid::new(4, 6, points).unwrap();
    let upstream = random_batch(&mut rng, [2, 4, 6, 3]);

    let grads = resample_backward(&data, &grid, &upstream).unwrap();
    // Smaller than the 0.1 margin to the nearest integer coordinate.
    let eps = 1e-2f32;

    for idx in 0..grid.len() {
        for axis in 0..2 {
            let loss_at = |delta: f32| -> f64 {
                let mut points = grid.points().to_vec();
                points[idx][axis] += delta;
                let g = SampleGrid::new(grid.height(), grid.width(), points).unwrap();
                dot(&upstream, &resample(&data, &g))
            };
            let num = ((loss_at(eps) - loss_at(-eps)) / (2.0 * eps as f64)) as f32;
            let ana = grads.d_grid[idx][axis];

            let abs_err = (num - ana).abs();
            assert!(
                rel_err(num, ana) < 1e-2 || abs_err < 1e-3,
                "grid grad mismatch: point={idx} axis={axis} num={num} ana={ana} abs_err={abs_err}"
            );
        }
    }
}

#[test]
fn test_resample_gradient_wrt_data() {
    let mut rng = StdRng::seed_from_u64(0xDA7A_u64);
    let data = random_batch(&mut rng, [1, 4, 4, 2]);
    let points: Vec<Vector2<f32>> = (0..9)
        .map(|_| Vector2::new(rng.gen_range(-1.5f32..4.5), rng.gen_range(-1.5f32..4.5)))
        .collect();
    let grid = SampleGrid::new(3, 3, points).unwrap();
    let upstream = random_batch(&mut rng, [1, 3, 3, 2]);

    let grads = resample_backward(&data, &grid, &upstream).unwrap();
    let eps = 1e-2f32;

    for i in 0..data.data().len() {
        let loss_at = |delta: f32| -> f64 {
            let mut d = data.clone();
            d.data_mut()[i] += delta;
            dot(&upstream, &resample(&d, &grid))
        };
        let num = ((loss_at(eps) - loss_at(-eps)) / (2.0 * eps as f64)) as f32;
        let ana = grads.d_data.data()[i];

        let abs_err = (num - ana).abs();
        assert!(
            rel_err(num, ana) < 1e-3 || abs_err < 1e-4,
            "data grad mismatch: i={i} num={num} ana={ana} abs_err={abs_err}"
        );
    }
}

#[test]
fn test_polar_warp_backward_matches_finite_differences() {
    let mut rng = StdRng::seed_from_u64(0x9_01A2_u64);
    let warp = PolarToCartesianWarp::new(6, 8).unwrap();
    let polar = random_batch(&mut rng, [2, 6, 8, 1]);
    let upstream = random_batch(&mut rng, warp.output_shape(2, 1));

    let grads = warp.backward(&polar, &upstream).unwrap();
    assert_eq!(grads.d_data.shape(), polar.shape());
    assert_eq!(grads.d_grid.len(), warp.grid().len());

    let eps = 1e-2f32;
    for _ in 0..40 {
        let i = rng.gen_range(0..polar.data().len());
        let loss_at = |delta: f32| -> f64 {
            let mut p = polar.clone();
            p.data_mut()[i] += delta;
            dot(&upstream, &warp.apply(&p).unwrap())
        };
        let num = ((loss_at(eps) - loss_at(-eps)) / (2.0 * eps as f64)) as f32;
        let ana = grads.d_data.data()[i];

        let abs_err = (num - ana).abs();
        assert!(
            rel_err(num, ana) < 1e-3 || abs_err < 1e-4,
            "warp data grad mismatch: i={i} num={num} ana={ana}"
        );
    }
}

#[test]
fn test_polar_warp_backward_rejects_wrong_gradient_shape() {
    let warp = PolarToCartesianWarp::new(4, 4).unwrap();
    let polar = ImageBatch::zeros([1, 4, 4, 1]);
    let bad = ImageBatch::zeros([1, 4, 4, 1]);
    assert!(warp.backward(&polar, &bad).is_err());
}
