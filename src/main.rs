#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

mod app;
mod config;
mod error;
mod ffmpeg;
mod gesture;
mod library;
mod player;
mod ui;
mod utils;

use app::MediaFeedApp;
use eframe::egui;
use env_logger::{Builder, Target};
use log::LevelFilter;

fn init_logger() {
    if std::env::var("RUST_LOG").is_ok() {
        env_logger::init();
        return;
    }
    Builder::new()
        .target(Target::Stdout)
        .filter_level(LevelFilter::Warn)
        .filter_module("media_feed", LevelFilter::Info)
        .init();
}

fn main() -> eframe::Result<()> {
    init_logger();

    let config = config::load_config();
    log::info!("Media folders: {:?}", config.media_dirs);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([420.0, 780.0])
            .with_min_inner_size([320.0, 480.0])
            .with_title("Media Feed"),
        ..Default::default()
    };

    eframe::run_native(
        "Media Feed",
        options,
        Box::new(|cc| Ok(Box::new(MediaFeedApp::new(cc, config)?))),
    )
}
