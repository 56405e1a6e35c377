//! Image decoding for callers that start from an image file rather than raw
//! pixels.  The pipeline stages never touch container formats; these helpers
//! produce the row-major grayscale byte buffers they expect.

use image::imageops::FilterType;
use crate::error::Result;

/// A decoded grayscale buffer and its dimensions.
#[derive(Debug, Clone, PartialEq)]
pub struct GrayBuffer {
    pub width: usize,
    pub height: usize,
    pub bytes: Vec<u8>,
}

/// Decodes PNG/JPEG/BMP/GIF bytes and resizes to `size × size` grayscale,
/// the input shape of a single-digit photo.
pub fn decode_grayscale(bytes: &[u8], size: u32) -> Result<GrayBuffer> {
    let img = image::load_from_memory(bytes)?;
    let resized = img.resize_exact(size, size, FilterType::Lanczos3);
    Ok(into_buffer(resized.to_luma8()))
}

/// Decodes image bytes and resizes to `height` rows, keeping the aspect
/// ratio, for multi-digit scans.
pub fn decode_scan(bytes: &[u8], height: u32) -> Result<GrayBuffer> {
    let img = image::load_from_memory(bytes)?;
    let width = scaled_width(img.width(), img.height(), height);
    let resized = img.resize_exact(width, height, FilterType::Lanczos3);
    Ok(into_buffer(resized.to_luma8()))
}

fn scaled_width(width: u32, height: u32, target_height: u32) -> u32 {
    if height == 0 {
        return 1;
    }
    ((width as f64 * target_height as f64 / height as f64).round() as u32).max(1)
}

fn into_buffer(gray: image::GrayImage) -> GrayBuffer {
    GrayBuffer {
        width: gray.width() as usize,
        height: gray.height() as usize,
        bytes: gray.into_raw(),
    }
}
