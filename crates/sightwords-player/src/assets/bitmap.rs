//! Bitmap decoding and resizing
//!
//! Supports whatever the `image` crate is built with (PNG, JPEG, GIF, BMP).
//! Everything is converted to straight RGBA, 4 bytes per pixel, which is what
//! the engine blits.

use std::path::Path;

use sightwords_common::{GameError, Result};

/// Decoded bitmap in RGBA format, ready for rendering
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA, 4 bytes per pixel
}

impl DecodedBitmap {
    /// Solid-color bitmap (used by tests and as a placeholder)
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * 4) as usize)
            .collect();
        Self { width, height, pixels }
    }
}

/// Decode an encoded image held in memory
pub fn decode(bytes: &[u8], path: &Path) -> Result<DecodedBitmap> {
    let img = image::load_from_memory(bytes).map_err(|e| GameError::AssetInvalid {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();
    Ok(DecodedBitmap {
        width,
        height,
        pixels: rgba.into_raw(),
    })
}

/// Size that fits inside (max_w, max_h) keeping the aspect ratio.
/// Never upscales and never returns a zero dimension.
pub fn fit_within(width: u32, height: u32, max_w: u32, max_h: u32) -> (u32, u32) {
    if width <= max_w && height <= max_h {
        return (width, height);
    }
    let scale = f64::min(max_w as f64 / width as f64, max_h as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).max(1);
    let h = ((height as f64 * scale).round() as u32).max(1);
    (w, h)
}

/// Shrink a bitmap to fit inside (max_w, max_h), like a photo-viewer thumbnail
pub fn thumbnail(bitmap: &DecodedBitmap, max_w: u32, max_h: u32) -> DecodedBitmap {
    let (w, h) = fit_within(bitmap.width, bitmap.height, max_w.max(1), max_h.max(1));
    if (w, h) == (bitmap.width, bitmap.height) {
        return bitmap.clone();
    }
    let Some(src) = image::RgbaImage::from_raw(bitmap.width, bitmap.height, bitmap.pixels.clone())
    else {
        tracing::warn!(
            "Bitmap buffer does not match {}×{}, keeping original size",
            bitmap.width,
            bitmap.height
        );
        return bitmap.clone();
    };
    let small = image::imageops::thumbnail(&src, w, h);
    DecodedBitmap {
        width: w,
        height: h,
        pixels: small.into_raw(),
    }
}
