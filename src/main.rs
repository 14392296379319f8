#![warn(clippy::all, rust_2018_idioms)]

use std::path::PathBuf;

use log::error;
use photo_annotator::{AnnotatorApp, EditorConfig, LaunchOptions};

fn parse_args() -> LaunchOptions {
    let mut options = LaunchOptions::default();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => match args.next().map(EditorConfig::from_file) {
                Some(Ok(config)) => options.config = config,
                Some(Err(e)) => error!("{e}; using default config"),
                None => error!("--config needs a path"),
            },
            "--font" => options.font = args.next().map(PathBuf::from),
            _ => options.image = Some(PathBuf::from(arg)),
        }
    }
    options
}

fn main() -> eframe::Result<()> {
    env_logger::init(); // Log to stderr (if you run with `RUST_LOG=debug`).

    let options = parse_args();
    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_title("Photo Annotator"),
        ..Default::default()
    };

    eframe::run_native(
        "Photo Annotator",
        native_options,
        Box::new(move |cc| Ok(Box::new(AnnotatorApp::new(cc, options)))),
    )
}
