//! PNG import/export for polar and Cartesian radar images.
//!
//! Pixels are mapped `u8 -> u8 / 255` on load and clamped back to `[0, 1]`
//! on save. Grayscale images load with one channel, colour images with three.

use crate::core::ImageBatch;
use crate::io::LoadError;
use image::{GrayImage, RgbImage};
use std::path::Path;
use tracing::debug;

/// Load a PNG as a one-item batch `[1, height, width, channels]`.
pub fn load_polar_image(path: &Path) -> Result<ImageBatch, LoadError> {
    let img = image::open(path)?;
    let (width, height) = (img.width() as usize, img.height() as usize);

    let (channels, raw) = if img.color().has_color() {
        (3, img.to_rgb8().into_raw())
    } else {
        (1, img.to_luma8().into_raw())
    };
    debug!(path = %path.display(), width, height, channels, "loaded image");

    let data = raw.into_iter().map(|v| v as f32 / 255.0).collect();
    Ok(ImageBatch::from_vec([1, height, width, channels], data)?)
}

/// Save item `index` of `batch` as a grayscale or RGB PNG.
pub fn save_batch_item(batch: &ImageBatch, index: usize, path: &Path) -> Result<(), LoadError> {
    if index >= batch.batch() {
        return Err(LoadError::BatchIndex {
            index,
            batch: batch.batch(),
        });
    }

    let width = batch.width() as u32;
    let height = batch.height() as u32;
    let raw: Vec<u8> = batch
        .item(index)
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect();

    match batch.channels() {
        1 => GrayImage::from_raw(width, height, raw)
            .ok_or(LoadError::UnsupportedChannels(1))?
            .save(path)?,
        3 => RgbImage::from_raw(width, height, raw)
            .ok_or(LoadError::UnsupportedChannels(3))?
            .save(path)?,
        c => return Err(LoadError::UnsupportedChannels(c)),
    }

    Ok(())
}
