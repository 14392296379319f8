use egui::Color32;
use serde::{Deserialize, Serialize};

use crate::config::EditorConfig;
use crate::element::{FontRef, ShapeKind, StrokeStyle, TextStyle};

/// What a pointer-down on empty canvas does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ToolMode {
    /// Freehand stroke
    #[default]
    Draw,
    Line,
    Rect,
    Circle,
    /// Remove the topmost element under the pointer
    Eraser,
    /// Drag the topmost element under the pointer
    Move,
}

impl ToolMode {
    pub const ALL: [ToolMode; 6] = [
        ToolMode::Draw,
        ToolMode::Line,
        ToolMode::Rect,
        ToolMode::Circle,
        ToolMode::Eraser,
        ToolMode::Move,
    ];

    /// The shape this mode previews, if it is a shape mode.
    pub fn shape_kind(self) -> Option<ShapeKind> {
        match self {
            ToolMode::Line => Some(ShapeKind::Line),
            ToolMode::Rect => Some(ShapeKind::Rect),
            ToolMode::Circle => Some(ShapeKind::Circle),
            ToolMode::Draw | ToolMode::Eraser | ToolMode::Move => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ToolMode::Draw => "Draw",
            ToolMode::Line => "Line",
            ToolMode::Rect => "Rect",
            ToolMode::Circle => "Circle",
            ToolMode::Eraser => "Eraser",
            ToolMode::Move => "Move",
        }
    }
}

/// The current tool configuration, sampled once when an element is built.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolSettings {
    pub color: Color32,
    pub stroke_width: f32,
    pub text_size: f32,
    pub text_style: TextStyle,
    pub font: FontRef,
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self::from_config(&EditorConfig::default())
    }
}

impl ToolSettings {
    pub fn from_config(config: &EditorConfig) -> Self {
        Self {
            color: config.default_color(),
            stroke_width: config.default_stroke_width,
            text_size: config.default_text_size,
            text_style: TextStyle::default(),
            font: FontRef::default_face(),
        }
    }

    pub fn stroke_style(&self) -> StrokeStyle {
        StrokeStyle::new(self.color, self.stroke_width)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_modes() {
        assert_eq!(ToolMode::Line.shape_kind(), Some(ShapeKind::Line));
        assert_eq!(ToolMode::Rect.shape_kind(), Some(ShapeKind::Rect));
        assert_eq!(ToolMode::Circle.shape_kind(), Some(ShapeKind::Circle));
        assert_eq!(ToolMode::Draw.shape_kind(), None);
        assert_eq!(ToolMode::Eraser.shape_kind(), None);
        assert_eq!(ToolMode::Move.shape_kind(), None);
    }

    #[test]
    fn test_settings_from_config() {
        let config = EditorConfig {
            default_color: [255, 0, 0, 255],
            default_stroke_width: 3.0,
            default_text_size: 20.0,
            ..Default::default()
        };
        let tool = ToolSettings::from_config(&config);
        assert_eq!(tool.stroke_style(), StrokeStyle::new(Color32::RED, 3.0));
        assert_eq!(tool.text_size, 20.0);
        assert_eq!(tool.font, FontRef::default_face());
    }
}
