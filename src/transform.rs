//! Camera ↔ world ↔ radar coordinate chain.
//!
//! Conventions:
//! - Camera points are pixels `(u, v)` plus depth `z` along the optical axis.
//! - Radar points are pixel coordinates of the Cartesian radar image; the
//!   radar intrinsic matrix maps planar radar metres `(x, y, 1)` to them.
//!   Height above the radar plane is carried separately.
//! - World points are metres in the shared world frame.

use crate::core::{Camera, RadarError, RadarSensor};
use image::{ImageBuffer, Luma};
use nalgebra::{Vector2, Vector3};
use thiserror::Error;
use tracing::debug;

/// Single-channel `f32` depth image (camera-frame z per pixel).
pub type DepthImage = ImageBuffer<Luma<f32>, Vec<f32>>;

#[derive(Debug, Error, PartialEq)]
pub enum TransformError {
    #[error(transparent)]
    Radar(#[from] RadarError),

    #[error("camera focal lengths must be finite and non-zero (fx={fx}, fy={fy})")]
    SingularCamera { fx: f32, fy: f32 },

    #[error("point {index} at pixel ({u}, {v}) lies outside the {width}x{height} depth image")]
    DepthOutOfImage {
        index: usize,
        u: f32,
        v: f32,
        width: u32,
        height: u32,
    },

    #[error("point {index} has invalid depth {depth}")]
    InvalidDepth { index: usize, depth: f32 },

    #[error("expected {expected} heights, got {got}")]
    HeightCount { expected: usize, got: usize },
}

/// Chains camera, world and radar coordinates through one shared world frame.
#[derive(Clone, Debug)]
pub struct CameraRadarCoordinateTransform {
    camera: Camera,
    radar: RadarSensor,
}

impl CameraRadarCoordinateTransform {
    pub fn new(camera: Camera, radar: RadarSensor) -> Result<Self, TransformError> {
        if !camera.is_invertible() {
            return Err(TransformError::SingularCamera {
                fx: camera.fx,
                fy: camera.fy,
            });
        }
        Ok(Self { camera, radar })
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn radar(&self) -> &RadarSensor {
        &self.radar
    }

    /// Lift camera pixels with per-point depth `(u, v, z)` into world coordinates.
    pub fn camera_to_world(&self, uvz: &[Vector3<f32>]) -> Vec<Vector3<f32>> {
        uvz.iter()
            .map(|p| {
                let point_camera = self.camera.unproject(&p.xy(), p.z);
                self.camera.camera_to_world(&point_camera)
            })
            .collect()
    }

    /// Lift camera pixels into world coordinates, reading depth from `depth`.
    ///
    /// Depth is looked up at the nearest pixel. Every point must land inside
    /// the image on a finite, positive depth.
    pub fn camera_to_world_with_depth(
        &self,
        uv: &[Vector2<f32>],
        depth: &DepthImage,
    ) -> Result<Vec<Vector3<f32>>, TransformError> {
        let uvz = sample_depth_nearest(uv, depth)?;
        Ok(self.camera_to_world(&uvz))
    }

    /// Project world points into the camera as `(u, v, z)`.
    ///
    /// Points at or behind the image plane (z <= 0) map to None.
    pub fn world_to_camera(&self, xyz: &[Vector3<f32>]) -> Vec<Option<Vector3<f32>>> {
        xyz.iter()
            .map(|p| {
                let point_camera = self.camera.world_to_camera(p);
                self.camera
                    .project(&point_camera)
                    .map(|uv| Vector3::new(uv.x, uv.y, point_camera.z))
            })
            .collect()
    }

    /// Lift radar pixels into world coordinates.
    ///
    /// `heights` gives each point's height above the radar plane; without it
    /// every point lies on the plane.
    pub fn radar_to_world(
        &self,
        xy: &[Vector2<f32>],
        heights: Option<&[f32]>,
    ) -> Result<Vec<Vector3<f32>>, TransformError> {
        if let Some(h) = heights {
            if h.len() != xy.len() {
                return Err(TransformError::HeightCount {
                    expected: xy.len(),
                    got: h.len(),
                });
            }
        }

        Ok(xy
            .iter()
            .enumerate()
            .map(|(i, uv)| {
                let plane = self.radar.pixel_to_radar(uv);
                let h = heights.map_or(0.0, |h| h[i]);
                self.radar.radar_to_world(&Vector3::new(plane.x, plane.y, h))
            })
            .collect())
    }

    /// Project world points into radar pixel coordinates (height is dropped).
    pub fn world_to_radar(&self, xyz: &[Vector3<f32>]) -> Vec<Vector2<f32>> {
        xyz.iter()
            .map(|p| {
                let point_radar = self.radar.world_to_radar(p);
                self.radar.radar_to_pixel(&point_radar.xy())
            })
            .collect()
    }

    /// `camera_to_world` followed by `world_to_radar`.
    pub fn camera_to_radar(&self, uvz: &[Vector3<f32>]) -> Vec<Vector2<f32>> {
        let xyz = self.camera_to_world(uvz);
        self.world_to_radar(&xyz)
    }

    /// `camera_to_world_with_depth` followed by `world_to_radar`.
    pub fn camera_to_radar_with_depth(
        &self,
        uv: &[Vector2<f32>],
        depth: &DepthImage,
    ) -> Result<Vec<Vector2<f32>>, TransformError> {
        let xyz = self.camera_to_world_with_depth(uv, depth)?;
        Ok(self.world_to_radar(&xyz))
    }

    /// `radar_to_world` followed by `world_to_camera`.
    pub fn radar_to_camera(
        &self,
        xy: &[Vector2<f32>],
        heights: Option<&[f32]>,
    ) -> Result<Vec<Option<Vector3<f32>>>, TransformError> {
        let xyz = self.radar_to_world(xy, heights)?;
        Ok(self.world_to_camera(&xyz))
    }
}

/// Attach nearest-neighbour depth to each pixel.
fn sample_depth_nearest(
    uv: &[Vector2<f32>],
    depth: &DepthImage,
) -> Result<Vec<Vector3<f32>>, TransformError> {
    let (width, height) = depth.dimensions();
    debug!(points = uv.len(), width, height, "sampling depth image");

    uv.iter()
        .enumerate()
        .map(|(index, p)| {
            let col = p.x.round();
            let row = p.y.round();
            let inside = col >= 0.0 && row >= 0.0 && col < width as f32 && row < height as f32;
            if !inside {
                return Err(TransformError::DepthOutOfImage {
                    index,
                    u: p.x,
                    v: p.y,
                    width,
                    height,
                });
            }

            let z = depth.get_pixel(col as u32, row as u32)[0];
            if !z.is_finite() || z <= 0.0 {
                return Err(TransformError::InvalidDepth { index, depth: z });
            }
            Ok(Vector3::new(p.x, p.y, z))
        })
        .collect()
}
