// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! The shared canvas image.
//!
//! Every image that flows through the application is normalized to the
//! fixed canvas size so that all coordinate math can rely on a single pair
//! of dimensions.

use image::imageops::FilterType;
use image::RgbaImage;
use std::sync::Arc;

/// Canvas width in pixels. The edit backend is asked for this exact size.
pub const CANVAS_WIDTH: u32 = 1536;

/// Canvas height in pixels.
pub const CANVAS_HEIGHT: u32 = 1024;

/// Immutable RGBA snapshot of the canvas.
///
/// Clones share the same pixel buffer.
#[derive(Clone)]
pub struct CanvasImage {
    pixels: Arc<RgbaImage>,
}

impl std::fmt::Debug for CanvasImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CanvasImage")
            .field("width", &self.width())
            .field("height", &self.height())
            .finish_non_exhaustive()
    }
}

impl CanvasImage {
    /// Wrap a raster, resizing it to the canvas dimensions if needed.
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        let pixels = if pixels.dimensions() != (CANVAS_WIDTH, CANVAS_HEIGHT) {
            log::warn!(
                "Resizing {}x{} image to the {}x{} canvas",
                pixels.width(),
                pixels.height(),
                CANVAS_WIDTH,
                CANVAS_HEIGHT
            );
            image::imageops::resize(&pixels, CANVAS_WIDTH, CANVAS_HEIGHT, FilterType::Triangle)
        } else {
            pixels
        };

        Self {
            pixels: Arc::new(pixels),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> [usize; 2] {
        [self.width() as usize, self.height() as usize]
    }

    /// Raw RGBA bytes, row-major.
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    pub fn rgba(&self) -> &RgbaImage {
        &self.pixels
    }

    /// Whether two handles refer to the same snapshot.
    pub fn same_snapshot(&self, other: &CanvasImage) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}
