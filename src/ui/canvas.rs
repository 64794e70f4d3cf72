// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Interactive canvas for placing and describing the edit region.
//!
//! This module provides the operator's surface: it shows the current
//! canvas image, lets the operator place or move a single region and type
//! a description below it, and locks itself while an edit job runs.

use crate::models::annotation::{Annotation, AnnotationState, CanvasPoint, TEXT_LIMIT};
use crate::models::canvas::CanvasImage;
use crate::models::job::JobError;
use crate::session::{CanvasConsumer, JobListener};
use crate::ui::texture::CanvasTexture;
use crate::util::geometry;

const SELECTED_BORDER_COLOR: egui::Color32 = egui::Color32::from_rgb(255, 0, 0);
const SELECTED_BORDER_WIDTH: f32 = 4.0;

const TEXT_INPUT_ID: &str = "annotation_text";
const TEXT_INPUT_WIDTH: f32 = 300.0;
const TEXT_INPUT_HEIGHT: f32 = 120.0;
const TEXT_INPUT_OFFSET_Y: f32 = 5.0;

const SUBMIT_HINT: &str = "ctrl+enter to submit";
const BUSY_MESSAGE: &str = "Updating the image\n(takes about 1 minute)";

/// Interaction state of the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceMode {
    /// No pending annotation
    Idle,
    /// One pending annotation with its text box open
    Editing,
    /// A job is running; input is ignored
    Busy,
}

/// Result of canvas interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CanvasAction {
    None,
    PlaceOrMove(CanvasPoint),
    Dismiss,
    EditText(String),
    Submit,
    DismissNotification,
}

pub struct InteractionSurface {
    annotations: AnnotationState,
    /// Annotation of the running job, drawn dimmed while busy
    in_flight: Option<Annotation>,
    busy: bool,
    texture: CanvasTexture,
    notification: Option<String>,
    focus_text: bool,
}

impl Default for InteractionSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionSurface {
    pub fn new() -> Self {
        Self {
            annotations: AnnotationState::new(),
            in_flight: None,
            busy: false,
            texture: CanvasTexture::new("canvas_image"),
            notification: None,
            focus_text: false,
        }
    }

    pub fn mode(&self) -> SurfaceMode {
        if self.busy {
            SurfaceMode::Busy
        } else if self.annotations.is_empty() {
            SurfaceMode::Idle
        } else {
            SurfaceMode::Editing
        }
    }

    pub fn pending(&self) -> Option<&Annotation> {
        self.annotations.pending()
    }

    pub fn notification(&self) -> Option<&str> {
        self.notification.as_deref()
    }

    /// Apply one interaction. Returns the annotation to dispatch when the
    /// operator submits one that is long enough.
    pub fn apply(&mut self, action: CanvasAction) -> Option<Annotation> {
        if self.busy {
            if action != CanvasAction::None {
                log::debug!("Ignoring {:?} while busy", action);
            }
            return None;
        }

        match action {
            CanvasAction::None => {}
            CanvasAction::PlaceOrMove(point) => {
                self.annotations.place_or_move(point);
                self.focus_text = true;
                log::debug!("Annotation placed at ({}, {})", point.x, point.y);
            }
            CanvasAction::Dismiss => {
                if !self.annotations.is_empty() {
                    log::debug!("Annotation dismissed");
                }
                self.annotations.clear();
            }
            CanvasAction::EditText(text) => self.annotations.update_text(&text),
            CanvasAction::Submit => {
                // Too-short text leaves everything as is
                let annotation = self.annotations.take_finalized()?;
                self.in_flight = Some(annotation.clone());
                self.busy = true;
                return Some(annotation);
            }
            CanvasAction::DismissNotification => self.notification = None,
        }
        None
    }

    /// Leave the busy state after a job reached a terminal state.
    fn finish_job(&mut self) {
        self.busy = false;
        self.in_flight = None;
        self.annotations.clear();
    }

    /// Display the canvas and collect this frame's interaction.
    pub fn show(&mut self, ui: &mut egui::Ui) -> CanvasAction {
        let mut action = CanvasAction::None;
        let ctx = ui.ctx().clone();

        let (response, painter) = ui.allocate_painter(ui.available_size(), egui::Sense::click());
        let widget_rect = response.rect;
        painter.rect_filled(widget_rect, 0.0, egui::Color32::from_gray(40));

        let Some(image_size) = self.texture.size() else {
            return action;
        };
        let display_rect = geometry::letterbox(image_size, widget_rect);

        if let Some(texture) = self.texture.texture(&ctx) {
            let tint = if self.busy {
                egui::Color32::from_gray(128)
            } else {
                egui::Color32::WHITE
            };
            painter.image(
                texture.id(),
                display_rect,
                egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                tint,
            );
        }

        // Place on pointer-down, not on a completed click
        let pressed_at = ui.input(|i| {
            i.pointer
                .primary_pressed()
                .then(|| i.pointer.press_origin())
                .flatten()
        });
        if !self.busy && response.contains_pointer() {
            if let Some(pos) = pressed_at {
                action = if display_rect.contains(pos) {
                    CanvasAction::PlaceOrMove(geometry::to_canvas_point(pos, display_rect))
                } else {
                    CanvasAction::Dismiss
                };
            }
        }

        let overlay = self.annotations.pending().or(self.in_flight.as_ref()).cloned();
        if let Some(annotation) = overlay {
            let region_rect = geometry::to_screen_rect(&annotation.region, display_rect);
            let border = if self.busy {
                SELECTED_BORDER_COLOR.gamma_multiply(0.5)
            } else {
                SELECTED_BORDER_COLOR
            };
            painter.rect_stroke(region_rect, 0.0, egui::Stroke::new(SELECTED_BORDER_WIDTH, border));

            if !self.busy {
                let text_action = self.show_text_input(&ctx, widget_rect, region_rect, &annotation);
                if text_action != CanvasAction::None {
                    action = text_action;
                }
            }
        }

        if self.busy {
            painter.rect_filled(widget_rect, 10.0, egui::Color32::from_black_alpha(178));
            painter.text(
                widget_rect.center(),
                egui::Align2::CENTER_CENTER,
                BUSY_MESSAGE,
                egui::FontId::proportional(24.0),
                egui::Color32::WHITE,
            );
        }

        if let Some(ref message) = self.notification {
            if show_notification(&ctx, message) {
                action = CanvasAction::DismissNotification;
            }
        }

        action
    }

    /// Text box just below the region, with the submit hint and a live
    /// character counter.
    fn show_text_input(
        &mut self,
        ctx: &egui::Context,
        widget_rect: egui::Rect,
        region_rect: egui::Rect,
        annotation: &Annotation,
    ) -> CanvasAction {
        let max_x = (widget_rect.right() - TEXT_INPUT_WIDTH).max(widget_rect.left());
        let max_y = (widget_rect.bottom() - TEXT_INPUT_HEIGHT).max(widget_rect.top());
        let pos = egui::pos2(
            region_rect.left().clamp(widget_rect.left(), max_x),
            (region_rect.bottom() + TEXT_INPUT_OFFSET_Y).clamp(widget_rect.top(), max_y),
        );

        let text_id = egui::Id::new(TEXT_INPUT_ID);
        // Consume the gesture before the text box turns it into a newline
        let submitted = ctx.memory(|m| m.has_focus(text_id))
            && ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::Enter));

        let mut text = annotation.text.clone();
        let mut action = CanvasAction::None;

        egui::Area::new(egui::Id::new("annotation_input"))
            .fixed_pos(pos)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(egui::Color32::from_black_alpha(128))
                    .inner_margin(egui::Margin::same(4.0))
                    .show(ui, |ui| {
                        ui.set_width(TEXT_INPUT_WIDTH);
                        ui.label(
                            egui::RichText::new(SUBMIT_HINT)
                                .size(12.0)
                                .color(egui::Color32::from_gray(0x99)),
                        );

                        let output = egui::TextEdit::multiline(&mut text)
                            .id(text_id)
                            .char_limit(TEXT_LIMIT)
                            .desired_width(TEXT_INPUT_WIDTH)
                            .desired_rows(3)
                            .font(egui::FontId::proportional(14.0))
                            .text_color(egui::Color32::WHITE)
                            .frame(false)
                            .show(ui);

                        if self.focus_text {
                            if output.response.has_focus() {
                                self.focus_text = false;
                            } else {
                                output.response.request_focus();
                            }
                        }
                        if output.response.changed() {
                            action = CanvasAction::EditText(text.clone());
                        }

                        ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                            ui.label(
                                egui::RichText::new(format!("{}/{}", text.chars().count(), TEXT_LIMIT))
                                    .color(egui::Color32::WHITE),
                            );
                        });
                    });
            });

        if submitted {
            action = CanvasAction::Submit;
        }
        action
    }
}

/// Modal-style failure message. Returns true once dismissed.
fn show_notification(ctx: &egui::Context, message: &str) -> bool {
    let mut dismissed = false;
    egui::Window::new("Image Error")
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("OK").clicked() {
                dismissed = true;
            }
        });
    dismissed
}

impl CanvasConsumer for InteractionSurface {
    fn show_image(&mut self, image: &CanvasImage) {
        self.texture.set(image);
        self.finish_job();
    }
}

impl JobListener for InteractionSurface {
    fn job_failed(&mut self, error: &JobError) {
        self.notification = Some(format!("Failed to update the image:\n{error}"));
        self.finish_job();
    }
}
