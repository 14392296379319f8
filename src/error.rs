use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading an [`EditorConfig`](crate::config::EditorConfig)
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config data: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config value: {0}")]
    InvalidValue(String),
}

/// Errors raised at the raster hand-off points (decode, encode, crop)
#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Failed to decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error("Failed to encode image: {0}")]
    Encode(#[source] image::ImageError),

    #[error("Crop area is empty after clamping to {width}x{height}")]
    EmptyCrop { width: u32, height: u32 },
}

/// Errors that can occur while registering fonts for offscreen rendering
#[derive(Debug, Error)]
pub enum FontError {
    #[error("Invalid font data for family {family:?}")]
    InvalidFont { family: String },
}
