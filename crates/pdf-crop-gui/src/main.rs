#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use anyhow::Context;
use clap::Parser;
use eframe::egui;
use log::LevelFilter;
use pdf_crop::{CropOptions, OverlayOptions, SaveTarget};
use std::path::PathBuf;

mod app;
mod handlers;
mod logger;
mod rasterizer;
mod views;
mod worker;

use logger::AppLogger;

const MAX_LOG_ENTRIES: usize = 1000;

/// Visually crop the pages of a PDF by overlaying them
#[derive(Parser, Debug)]
#[command(name = "croppdf", version, about)]
struct Cli {
    /// PDF to open at startup
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory to save into without asking
    #[arg(long)]
    save_to: Option<PathBuf>,

    /// File name to save as without asking
    #[arg(long)]
    save_as: Option<String>,

    /// Options file (JSON) with save, render and overlay settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Blend overlays front to back instead of averaging them
    #[arg(long)]
    layered: bool,

    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    if let Some(input) = &cli.input {
        anyhow::ensure!(input.is_file(), "Input file not found: {}", input.display());
    }
    let save_target = SaveTarget::new(cli.save_to, cli.save_as);
    save_target.validate()?;

    let level = if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    let logger = AppLogger::new(MAX_LOG_ENTRIES, level);
    logger.clone().init().context("Failed to install logger")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;

    let mut options = match &cli.config {
        Some(path) => runtime
            .block_on(CropOptions::load(path))
            .with_context(|| format!("Failed to load options from {}", path.display()))?,
        None => CropOptions::default(),
    };
    if cli.layered {
        options.overlay = OverlayOptions::layered();
    }
    options.validate()?;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_title("Crop PDF")
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let handle = runtime.handle().clone();
    let input = cli.input;
    eframe::run_native(
        "Crop PDF",
        native_options,
        Box::new(move |cc| {
            Ok(Box::new(app::CropApp::new(
                cc,
                handle,
                logger,
                options,
                save_target,
                input,
            )))
        }),
    )
    .map_err(|e| anyhow::anyhow!("{e}"))
}
