#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod id_generator;
pub mod raster;
pub mod render;
pub mod state;
pub mod tools;

pub use app::{AnnotatorApp, LaunchOptions};
pub use config::EditorConfig;
pub use editor::AnnotationEditor;
pub use element::{Element, ElementType};
pub use error::{ConfigError, FontError, RasterError};
pub use event::{EditorEvent, EventBus, EventHandler};
pub use history::{CanvasHistory, CanvasState};
pub use raster::Raster;
pub use render::{Compositor, RenderTarget, TextMeasure};
pub use state::{EditorState, PendingPlacement};
pub use tools::{ToolMode, ToolSettings};
