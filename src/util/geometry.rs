// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Geometric utility functions.
//!
//! This module provides the coordinate transformations between on-screen
//! widget pixels and the fixed canvas space, the aspect-preserving
//! letterbox fit, and the coarse 3x3 naming of canvas positions used when
//! phrasing prompts.

use crate::models::annotation::{CanvasPoint, Region, REGION_SIZE};
use crate::models::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Fit `content` inside `container`, preserving aspect ratio and centering.
pub fn letterbox(content: egui::Vec2, container: egui::Rect) -> egui::Rect {
    if content.x <= 0.0 || content.y <= 0.0 {
        return egui::Rect::from_center_size(container.center(), egui::Vec2::ZERO);
    }

    let available = container.size();
    let content_aspect = content.x / content.y;
    let available_aspect = available.x / available.y;

    let size = if content_aspect > available_aspect {
        // Wider than the container - fit to width
        egui::vec2(available.x, available.x / content_aspect)
    } else {
        // Taller than the container - fit to height
        egui::vec2(available.y * content_aspect, available.y)
    };

    egui::Rect::from_center_size(container.center(), size)
}

/// Map a screen position inside `display_rect` to canvas space.
///
/// The result is clamped so that a [`Region`] placed at it stays on the
/// canvas.
pub fn to_canvas_point(screen: egui::Pos2, display_rect: egui::Rect) -> CanvasPoint {
    let width = display_rect.width().max(f32::EPSILON);
    let height = display_rect.height().max(f32::EPSILON);

    let x = ((screen.x - display_rect.min.x) * CANVAS_WIDTH as f32 / width).floor();
    let y = ((screen.y - display_rect.min.y) * CANVAS_HEIGHT as f32 / height).floor();

    CanvasPoint {
        x: x.clamp(0.0, (CANVAS_WIDTH - REGION_SIZE) as f32) as u32,
        y: y.clamp(0.0, (CANVAS_HEIGHT - REGION_SIZE) as f32) as u32,
    }
}

/// Map a canvas region back onto the screen, for drawing only.
pub fn to_screen_rect(region: &Region, display_rect: egui::Rect) -> egui::Rect {
    let sx = display_rect.width() / CANVAS_WIDTH as f32;
    let sy = display_rect.height() / CANVAS_HEIGHT as f32;

    egui::Rect::from_min_size(
        egui::pos2(
            display_rect.min.x + region.x as f32 * sx,
            display_rect.min.y + region.y as f32 * sy,
        ),
        egui::vec2(region.size as f32 * sx, region.size as f32 * sy),
    )
}

/// One cell of the 3x3 grid laid over the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedRegion {
    TopLeft,
    TopCenter,
    TopRight,
    LeftCenter,
    Middle,
    RightCenter,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl NamedRegion {
    /// Classify a canvas point. Points on a cell boundary fall into the
    /// cell to their right/below; points at or past the far edge fall into
    /// the last cell.
    pub fn from_point(point: CanvasPoint) -> Self {
        let column = grid_cell(point.x as f64, CANVAS_WIDTH as f64);
        let row = grid_cell(point.y as f64, CANVAS_HEIGHT as f64);

        match (column, row) {
            (0, 0) => Self::TopLeft,
            (1, 0) => Self::TopCenter,
            (2, 0) => Self::TopRight,
            (0, 1) => Self::LeftCenter,
            (1, 1) => Self::Middle,
            (2, 1) => Self::RightCenter,
            (0, _) => Self::BottomLeft,
            (1, _) => Self::BottomCenter,
            _ => Self::BottomRight,
        }
    }

    /// Natural-language phrase used in prompts.
    pub fn label(self) -> &'static str {
        match self {
            Self::TopLeft => "the top left corner",
            Self::TopCenter => "the top center",
            Self::TopRight => "the top right corner",
            Self::LeftCenter => "the left center",
            Self::Middle => "the middle of the image",
            Self::RightCenter => "the right center",
            Self::BottomLeft => "the bottom left corner",
            Self::BottomCenter => "the bottom center",
            Self::BottomRight => "the bottom right corner",
        }
    }
}

impl std::fmt::Display for NamedRegion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

fn grid_cell(coord: f64, dimension: f64) -> u8 {
    // floor(3 * clamp(coord / dimension, 0, 0.9999)), scaled before dividing
    // so that exact thirds land on their cell boundary
    (coord * 3.0 / dimension).floor().clamp(0.0, 2.0) as u8
}
