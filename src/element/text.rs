use egui::{Pos2, Rect, Vec2};

use super::Element;
use super::common::{FontDescriptor, FontRef, StrokeStyle, TextStyle};
use crate::geometry;
use crate::id_generator::{ElementId, generate_id};
use crate::render::{RenderTarget, TextMeasure};

/// A run of text whose anchor is the left end of its baseline.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    id: ElementId,
    pub anchor: Pos2,
    size: f32,
    content: String,
    text_style: TextStyle,
    font: FontRef,
    style: StrokeStyle,
}

impl Text {
    pub fn new(
        anchor: Pos2,
        content: impl Into<String>,
        size: f32,
        text_style: TextStyle,
        font: FontRef,
        style: StrokeStyle,
    ) -> Self {
        Self {
            id: generate_id(),
            anchor,
            size,
            content: content.into(),
            text_style,
            font,
            style,
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn text_style(&self) -> TextStyle {
        self.text_style
    }

    pub fn font(&self) -> &FontRef {
        &self.font
    }

    pub fn descriptor(&self) -> FontDescriptor {
        FontDescriptor::resolve(&self.font, self.size, self.text_style)
    }
}

impl Element for Text {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "text"
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        geometry::text_bounds(self.anchor, measure.measure(&self.content, &self.descriptor()))
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_text(self.anchor, &self.content, &self.descriptor(), self.style.color);
    }

    // Exact measured box, no tolerance.
    fn hit_test(&self, pos: Pos2, _tolerance: f32, measure: &dyn TextMeasure) -> bool {
        let size = measure.measure(&self.content, &self.descriptor());
        geometry::text_contains(self.anchor, size, pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.anchor += delta;
    }
}
