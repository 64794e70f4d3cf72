// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Read-only projector view of the latest accepted canvas image.

use crate::models::canvas::CanvasImage;
use crate::session::CanvasConsumer;
use crate::ui::texture::CanvasTexture;
use crate::util::geometry;

pub struct MirrorDisplay {
    texture: CanvasTexture,
}

impl Default for MirrorDisplay {
    fn default() -> Self {
        Self::new()
    }
}

impl MirrorDisplay {
    pub fn new() -> Self {
        Self {
            texture: CanvasTexture::new("mirror_image"),
        }
    }

    /// Letterbox the last published image on a black background.
    pub fn show(&mut self, ui: &mut egui::Ui) {
        let (rect, _) = ui.allocate_exact_size(ui.available_size(), egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, egui::Color32::BLACK);

        let Some(image_size) = self.texture.size() else {
            return;
        };
        let display_rect = geometry::letterbox(image_size, rect);
        if let Some(texture) = self.texture.texture(ui.ctx()) {
            painter.image(
                texture.id(),
                display_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                egui::Color32::WHITE,
            );
        }
    }
}

impl CanvasConsumer for MirrorDisplay {
    fn show_image(&mut self, image: &CanvasImage) {
        self.texture.set(image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbaImage;

    #[test]
    fn test_keeps_only_the_last_image() {
        let mut mirror = MirrorDisplay::new();
        assert!(mirror.texture.image().is_none());

        let first = CanvasImage::from_rgba(RgbaImage::new(4, 4));
        let second = CanvasImage::from_rgba(RgbaImage::new(4, 4));
        mirror.show_image(&first);
        mirror.show_image(&second);

        assert!(mirror.texture.image().unwrap().same_snapshot(&second));
    }
}
