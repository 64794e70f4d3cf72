// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Canvas image loading and encoding.
//!
//! This module handles reading the startup image from disk and converting
//! canvas rasters to and from the PNG bytes exchanged with the edit
//! backend.

use crate::models::canvas::CanvasImage;
use anyhow::{bail, Context, Result};
use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

/// Load the startup canvas image.
///
/// A missing file and an undecodable file produce distinct errors, both
/// naming the absolute path.
pub fn load_image(path: &Path) -> Result<CanvasImage> {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    if !path.exists() {
        bail!("Initial image file not found:\n{}", absolute.display());
    }

    let decoded = image::open(path)
        .with_context(|| format!("Failed to load initial image:\n{}", absolute.display()))?;

    log::info!(
        "Loaded image: {} ({}x{})",
        absolute.display(),
        decoded.width(),
        decoded.height()
    );
    Ok(CanvasImage::from_rgba(decoded.to_rgba8()))
}

/// Decode image bytes returned by the backend.
pub fn decode_image(bytes: &[u8]) -> image::ImageResult<CanvasImage> {
    let decoded = image::load_from_memory(bytes)?;
    Ok(CanvasImage::from_rgba(decoded.to_rgba8()))
}

/// Encode a raster as PNG.
pub fn encode_png(pixels: &RgbaImage) -> image::ImageResult<Vec<u8>> {
    let mut bytes = Vec::new();
    pixels.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};

    #[test]
    fn test_png_roundtrip_keeps_pixels() {
        let mut pixels = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, image::Rgba([0, 0, 0, 255]));
        pixels.put_pixel(3, 4, image::Rgba([200, 100, 50, 0]));

        let bytes = encode_png(&pixels).unwrap();
        let decoded = decode_image(&bytes).unwrap();

        assert_eq!(decoded.rgba().get_pixel(3, 4).0, [200, 100, 50, 0]);
        assert_eq!(decoded.rgba().get_pixel(0, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(decode_image(b"definitely not a png").is_err());
    }

    #[test]
    fn test_load_image_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_image(&dir.path().join("init.png")).unwrap_err();
        assert!(err.to_string().starts_with("Initial image file not found"));
    }

    #[test]
    fn test_load_image_undecodable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.png");
        std::fs::write(&path, b"not an image").unwrap();

        let err = load_image(&path).unwrap_err();
        assert!(err.to_string().starts_with("Failed to load initial image"));
    }

    #[test]
    fn test_load_image_resizes_to_canvas() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("init.png");
        RgbaImage::from_pixel(30, 20, image::Rgba([1, 2, 3, 255]))
            .save(&path)
            .unwrap();

        let canvas = load_image(&path).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (CANVAS_WIDTH, CANVAS_HEIGHT));
    }
}
