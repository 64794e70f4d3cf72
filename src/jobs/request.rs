// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Turning an annotation into an edit request: the inpainting mask and
//! the position-aware prompt.

use crate::models::annotation::{Annotation, Region};
use crate::models::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};
use crate::util::geometry::NamedRegion;
use image::{Rgba, RgbaImage};

/// Pixels the backend must keep.
const MASK_FIXED: Rgba<u8> = Rgba([0, 0, 0, 255]);

/// Pixels the backend may repaint.
const MASK_EDITABLE: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Prompt text cleanup applied before sending.
pub type Sanitizer = fn(&str) -> String;

/// Transliterate to plain ASCII so the prompt survives every platform's
/// file and console encodings.
pub fn ascii_sanitizer(text: &str) -> String {
    deunicode::deunicode(text)
}

/// Size string sent to the backend, matching the canvas.
pub fn canvas_size_param() -> String {
    format!("{CANVAS_WIDTH}x{CANVAS_HEIGHT}")
}

/// Full-canvas mask: opaque everywhere except the transparent region.
pub fn build_mask(region: &Region) -> RgbaImage {
    let mut mask = RgbaImage::from_pixel(CANVAS_WIDTH, CANVAS_HEIGHT, MASK_FIXED);
    for y in region.y..(region.y + region.size).min(CANVAS_HEIGHT) {
        for x in region.x..(region.x + region.size).min(CANVAS_WIDTH) {
            mask.put_pixel(x, y, MASK_EDITABLE);
        }
    }
    mask
}

/// Prompt describing what to add and roughly where.
pub fn compose_prompt(annotation: &Annotation) -> String {
    let place = NamedRegion::from_point(annotation.region.center());
    format!(
        "Add the following objects into {}: {}. Keep the colors bright and realistic",
        place, annotation.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::annotation::CanvasPoint;

    fn balloon() -> Annotation {
        Annotation {
            region: Region::at(CanvasPoint { x: 800, y: 300 }),
            text: "a red balloon".to_string(),
        }
    }

    #[test]
    fn test_compose_prompt_balloon_scenario() {
        assert_eq!(
            compose_prompt(&balloon()),
            "Add the following objects into the middle of the image: a red balloon. \
             Keep the colors bright and realistic"
        );
    }

    #[test]
    fn test_compose_prompt_uses_region_center() {
        let annotation = Annotation {
            region: Region::at(CanvasPoint { x: 0, y: 2000 }),
            text: "a boat".to_string(),
        };
        assert!(compose_prompt(&annotation).contains("into the bottom left corner: a boat."));
    }

    #[test]
    fn test_build_mask_transparent_only_inside_region() {
        let region = balloon().region;
        let mask = build_mask(&region);

        assert_eq!(mask.dimensions(), (CANVAS_WIDTH, CANVAS_HEIGHT));
        assert_eq!(mask.get_pixel(800, 300)[3], 0);
        assert_eq!(mask.get_pixel(999, 499)[3], 0);
        assert_eq!(mask.get_pixel(1000, 400)[3], 255);
        assert_eq!(mask.get_pixel(900, 299)[3], 255);
        assert_eq!(mask.get_pixel(799, 400)[3], 255);

        let transparent = mask.pixels().filter(|p| p[3] == 0).count();
        assert_eq!(transparent, (region.size * region.size) as usize);
    }

    #[test]
    fn test_ascii_sanitizer_transliterates() {
        assert_eq!(ascii_sanitizer("a crème brûlée"), "a creme brulee");
        assert_eq!(ascii_sanitizer("plain"), "plain");
    }

    #[test]
    fn test_canvas_size_param() {
        assert_eq!(canvas_size_param(), "1536x1024");
    }
}
