// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Lazily uploaded GPU texture for a canvas image.

use crate::models::canvas::CanvasImage;

/// Holds the latest canvas image and uploads it on first draw.
///
/// Images arrive from the session outside of any frame, so the upload is
/// deferred until an `egui::Context` is at hand.
pub struct CanvasTexture {
    name: &'static str,
    image: Option<CanvasImage>,
    uploaded: Option<egui::TextureHandle>,
    dirty: bool,
}

impl CanvasTexture {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            image: None,
            uploaded: None,
            dirty: false,
        }
    }

    pub fn set(&mut self, image: &CanvasImage) {
        self.image = Some(image.clone());
        self.dirty = true;
    }

    pub fn image(&self) -> Option<&CanvasImage> {
        self.image.as_ref()
    }

    /// Pixel size of the current image.
    pub fn size(&self) -> Option<egui::Vec2> {
        self.image
            .as_ref()
            .map(|image| egui::vec2(image.width() as f32, image.height() as f32))
    }

    /// Texture for drawing, uploading a new image if one is waiting.
    pub fn texture(&mut self, ctx: &egui::Context) -> Option<&egui::TextureHandle> {
        if self.dirty {
            if let Some(ref image) = self.image {
                let color_image = egui::ColorImage::from_rgba_unmultiplied(image.size(), image.as_raw());
                match self.uploaded {
                    Some(ref mut handle) => handle.set(color_image, egui::TextureOptions::LINEAR),
                    None => {
                        self.uploaded =
                            Some(ctx.load_texture(self.name, color_image, egui::TextureOptions::LINEAR));
                    }
                }
            }
            self.dirty = false;
        }
        self.uploaded.as_ref()
    }
}
