// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module wires the interactive surface (the control panel, in the
//! root viewport) and the mirror display (the projector view, in a second
//! viewport) to the session controller.

use crate::session::SessionController;
use crate::ui::canvas::InteractionSurface;
use crate::ui::mirror::MirrorDisplay;

pub const CONTROL_TITLE: &str = "Control Panel";
pub const MIRROR_TITLE: &str = "Projector View";
pub const WINDOWED_SIZE: [f32; 2] = [800.0, 600.0];

pub struct CollageApp {
    session: SessionController,
    surface: InteractionSurface,
    mirror: MirrorDisplay,
    fullscreen: bool,
}

impl CollageApp {
    pub fn new(session: SessionController, fullscreen: bool) -> Self {
        let mut surface = InteractionSurface::new();
        let mut mirror = MirrorDisplay::new();
        session.publish_current(&mut surface, &mut [&mut mirror]);

        Self {
            session,
            surface,
            mirror,
            fullscreen,
        }
    }

    fn close_application(&self, ctx: &egui::Context) {
        if self.session.is_busy() {
            log::info!("Closing while an edit is still running; its result will be discarded");
        }
        ctx.send_viewport_cmd_to(egui::ViewportId::ROOT, egui::ViewportCommand::Close);
    }

    fn mirror_viewport(&self) -> egui::ViewportBuilder {
        let builder = egui::ViewportBuilder::default().with_title(MIRROR_TITLE);
        if self.fullscreen {
            builder.with_fullscreen(true)
        } else {
            builder.with_inner_size(WINDOWED_SIZE)
        }
    }

    /// Draw the projector window; returns true if it asked to quit.
    fn show_mirror(&mut self, ctx: &egui::Context) -> bool {
        let builder = self.mirror_viewport();
        let mirror = &mut self.mirror;

        ctx.show_viewport_immediate(
            egui::ViewportId::from_hash_of("projector_view"),
            builder,
            |ctx, _class| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none().fill(egui::Color32::BLACK))
                    .show(ctx, |ui| mirror.show(ui));

                ctx.input(|i| i.viewport().close_requested()) || quit_shortcut_pressed(ctx)
            },
        )
    }
}

/// Ctrl+F11 closes the application from either window.
fn quit_shortcut_pressed(ctx: &egui::Context) -> bool {
    ctx.input_mut(|i| i.consume_key(egui::Modifiers::COMMAND, egui::Key::F11))
}

impl eframe::App for CollageApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Apply finished jobs before drawing
        self.session.pump(&mut self.surface, &mut [&mut self.mirror]);

        if quit_shortcut_pressed(ctx) {
            log::info!("Ctrl+F11 detected. Closing application.");
            self.close_application(ctx);
        }

        let action = egui::CentralPanel::default()
            .frame(egui::Frame::none())
            .show(ctx, |ui| self.surface.show(ui))
            .inner;

        if let Some(annotation) = self.surface.apply(action) {
            self.session.on_annotation_finalized(annotation);
        }

        if self.show_mirror(ctx) {
            log::info!("Projector view closed. Closing application.");
            self.close_application(ctx);
        }
    }
}
