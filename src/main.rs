// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Collaborative Collage
//!
//! An operator marks a region of a shared canvas, describes what should
//! appear there, and an image model paints it in. The result is mirrored
//! to a second, read-only projector window.

mod app;
mod config;
mod io;
mod jobs;
mod models;
mod session;
mod ui;
mod util;

use anyhow::Result;
use app::CollageApp;
use clap::Parser;
use config::Config;
use io::backend::OpenAiImageEditor;
use io::output::OutputStore;
use jobs::runner::JobRunner;
use session::SessionController;
use std::sync::Arc;

#[derive(Debug, Parser)]
#[command(name = "collage", version, about = "Collaborative Collage")]
struct Args {
    /// Run both windows in fullscreen mode
    #[arg(long)]
    fullscreen: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let args = Args::parse();

    let config = Config::load().or_else(|e| fatal("Configuration Error", e))?;
    let initial_image = io::media::load_image(&config.init_image).or_else(|e| fatal("Image Error", e))?;
    let settings = config.openai_settings().or_else(|e| fatal("Configuration Error", e))?;
    let editor = Arc::new(OpenAiImageEditor::new(settings).or_else(|e| fatal("Backend Error", e))?);
    let output = OutputStore::new(&config.output_dir);
    log::info!("Writing edit results to {}", output.dir().display());

    if args.fullscreen {
        log::info!("Starting in fullscreen mode.");
    } else {
        log::info!("Starting in windowed mode.");
    }

    let viewport = egui::ViewportBuilder::default().with_title(app::CONTROL_TITLE);
    let viewport = if args.fullscreen {
        viewport.with_fullscreen(true)
    } else {
        viewport.with_inner_size(app::WINDOWED_SIZE)
    };
    let options = eframe::NativeOptions {
        viewport,
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Collaborative Collage",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let (runner, completions) =
                JobRunner::new(editor, output, jobs::request::ascii_sanitizer);
            let runner = runner.with_waker(Arc::new(move || ctx.request_repaint()));
            let session = SessionController::new(initial_image, runner, completions);
            Ok(Box::new(CollageApp::new(session, args.fullscreen)))
        }),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}

/// Tell the operator about a startup failure, then hand it back so the
/// process exits non-zero.
fn fatal<T>(title: &str, error: anyhow::Error) -> Result<T> {
    log::error!("{title}: {error:#}");
    rfd::MessageDialog::new()
        .set_level(rfd::MessageLevel::Error)
        .set_title(title)
        .set_description(format!("{error:#}"))
        .set_buttons(rfd::MessageButtons::Ok)
        .show();
    Err(error)
}
