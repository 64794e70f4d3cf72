// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Annotation data structures.
//!
//! This module defines the canvas-space region an operator marks, the
//! text attached to it, and the single pending annotation with its
//! place/move/edit/finalize transitions.

use super::canvas::{CANVAS_HEIGHT, CANVAS_WIDTH};

/// Edge length of the square region, in canvas pixels.
pub const REGION_SIZE: u32 = 200;

/// Maximum annotation text length, in characters.
pub const TEXT_LIMIT: usize = 350;

/// Text must be longer than this to be submitted.
pub const MIN_TEXT_LEN: usize = 3;

/// A point in canvas pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CanvasPoint {
    pub x: u32,
    pub y: u32,
}

/// A square of [`REGION_SIZE`] that always lies fully on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub x: u32,
    pub y: u32,
    pub size: u32,
}

impl Region {
    /// Place a region with its top-left corner at `point`, clamped onto
    /// the canvas.
    pub fn at(point: CanvasPoint) -> Self {
        Self {
            x: point.x.min(CANVAS_WIDTH - REGION_SIZE),
            y: point.y.min(CANVAS_HEIGHT - REGION_SIZE),
            size: REGION_SIZE,
        }
    }

    pub fn center(&self) -> CanvasPoint {
        CanvasPoint {
            x: self.x + self.size / 2,
            y: self.y + self.size / 2,
        }
    }

    /// Whether the canvas pixel at (x, y) lies inside the region.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && x < self.x + self.size && y >= self.y && y < self.y + self.size
    }
}

/// A region plus the operator's description of what goes there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotation {
    pub region: Region,
    pub text: String,
}

impl Annotation {
    pub fn new(region: Region) -> Self {
        Self {
            region,
            text: String::new(),
        }
    }

    /// Length in characters, as shown in the counter.
    pub fn text_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_finalizable(&self) -> bool {
        self.text_len() > MIN_TEXT_LEN
    }
}

/// Truncate `text` to at most [`TEXT_LIMIT`] characters.
pub fn clamp_text(text: &str) -> String {
    match text.char_indices().nth(TEXT_LIMIT) {
        Some((byte_index, _)) => text[..byte_index].to_string(),
        None => text.to_string(),
    }
}

/// Holds at most one pending annotation.
#[derive(Debug, Default)]
pub struct AnnotationState {
    pending: Option<Annotation>,
}

impl AnnotationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&Annotation> {
        self.pending.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_none()
    }

    /// Create a new annotation at `point`, or move the existing one there
    /// keeping its text.
    pub fn place_or_move(&mut self, point: CanvasPoint) {
        let region = Region::at(point);
        match self.pending {
            Some(ref mut annotation) => annotation.region = region,
            None => self.pending = Some(Annotation::new(region)),
        }
    }

    /// Replace the text, truncated to the limit. Ignored when nothing is
    /// pending.
    pub fn update_text(&mut self, text: &str) {
        if let Some(ref mut annotation) = self.pending {
            annotation.text = clamp_text(text);
        }
    }

    pub fn clear(&mut self) {
        self.pending = None;
    }

    /// The pending annotation if its text is long enough to submit.
    pub fn try_finalize(&self) -> Option<Annotation> {
        self.pending
            .as_ref()
            .filter(|annotation| annotation.is_finalizable())
            .cloned()
    }

    /// Finalize and, on success, clear the pending annotation.
    pub fn take_finalized(&mut self) -> Option<Annotation> {
        let annotation = self.try_finalize()?;
        self.pending = None;
        Some(annotation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_is_clamped_on_creation() {
        let region = Region::at(CanvasPoint { x: 1500, y: 1000 });
        assert_eq!(region, Region { x: 1336, y: 824, size: 200 });
        assert!(region.contains(1535, 1023));
        assert!(!region.contains(1335, 900));
    }

    #[test]
    fn test_place_creates_then_moves_preserving_text() {
        let mut state = AnnotationState::new();
        state.place_or_move(CanvasPoint { x: 10, y: 20 });
        assert_eq!(state.pending().map(|a| a.text.as_str()), Some(""));

        state.update_text("a red balloon");
        state.place_or_move(CanvasPoint { x: 800, y: 300 });

        let pending = state.pending().unwrap();
        assert_eq!(pending.region, Region { x: 800, y: 300, size: 200 });
        assert_eq!(pending.text, "a red balloon");
    }

    #[test]
    fn test_update_text_never_exceeds_limit() {
        let mut state = AnnotationState::new();
        state.place_or_move(CanvasPoint { x: 0, y: 0 });

        let mut text = String::new();
        for i in 0..(TEXT_LIMIT + 40) {
            // Insert in the middle to mimic typing with the cursor moved
            let at = text.char_indices().nth(text.chars().count() / 2).map_or(text.len(), |(b, _)| b);
            text.insert(at, if i % 3 == 0 { 'é' } else { 'x' });
            state.update_text(&text);
            text = state.pending().unwrap().text.clone();
            assert!(state.pending().unwrap().text_len() <= TEXT_LIMIT);
        }
        assert_eq!(state.pending().unwrap().text_len(), TEXT_LIMIT);
    }

    #[test]
    fn test_clamp_text_counts_characters_not_bytes() {
        let long: String = "ü".repeat(TEXT_LIMIT + 1);
        let clamped = clamp_text(&long);
        assert_eq!(clamped.chars().count(), TEXT_LIMIT);
        assert_eq!(clamp_text("short"), "short");
    }

    #[test]
    fn test_try_finalize_short_text_is_idempotent_noop() {
        let mut state = AnnotationState::new();
        assert!(state.try_finalize().is_none());

        state.place_or_move(CanvasPoint { x: 100, y: 100 });
        state.update_text("abc");
        let before = state.pending().cloned();

        for _ in 0..3 {
            assert!(state.try_finalize().is_none());
            assert!(state.take_finalized().is_none());
            assert_eq!(state.pending().cloned(), before);
        }
    }

    #[test]
    fn test_take_finalized_clears_pending() {
        let mut state = AnnotationState::new();
        state.place_or_move(CanvasPoint { x: 800, y: 300 });
        state.update_text("abcd");

        let annotation = state.take_finalized().unwrap();
        assert_eq!(annotation.text, "abcd");
        assert!(state.is_empty());
    }

    #[test]
    fn test_clear_discards_pending() {
        let mut state = AnnotationState::new();
        state.place_or_move(CanvasPoint { x: 1, y: 1 });
        state.clear();
        assert!(state.pending().is_none());

        // Text updates without a pending annotation are ignored
        state.update_text("orphan");
        assert!(state.is_empty());
    }
}
