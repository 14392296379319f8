use egui::{Pos2, Rect, Vec2};

mod common;
pub(crate) mod shape;
pub(crate) mod stamp;
pub(crate) mod stroke;
pub(crate) mod text;

pub use common::{FontDescriptor, FontRef, StrokeStyle, TextStyle};
pub use shape::{Circle, Line, RectShape, ShapeKind};
pub use stamp::Stamp;
pub use stroke::Stroke;
pub use text::Text;

use crate::id_generator::ElementId;
use crate::render::{RenderTarget, TextMeasure};

/// Common trait that all drawable elements implement
pub trait Element {
    /// Get the unique identifier for this element
    fn id(&self) -> ElementId;

    /// Get the element type as a string
    fn element_type(&self) -> &'static str;

    /// Color and width fixed when the element was committed
    fn style(&self) -> StrokeStyle;

    /// Get the bounding rectangle for this element
    fn bounds(&self, measure: &dyn TextMeasure) -> Rect;

    /// Draw the element onto a render target
    fn draw(&self, target: &mut dyn RenderTarget);

    /// Test if the element contains or nears the given position.
    ///
    /// `tolerance` applies to line-like and point-like geometry only.
    fn hit_test(&self, pos: Pos2, tolerance: f32, measure: &dyn TextMeasure) -> bool;

    /// Translate the element by the given delta
    fn translate(&mut self, delta: Vec2);
}

/// One drawable unit on the canvas.
///
/// The variant is the element's shape kind; each carries only the fields it
/// needs. Order within an element list is paint order and hit priority.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementType {
    Stroke(Stroke),
    Line(Line),
    Rect(RectShape),
    Circle(Circle),
    Text(Text),
    Stamp(Stamp),
}

impl ElementType {
    fn as_element(&self) -> &dyn Element {
        match self {
            ElementType::Stroke(s) => s,
            ElementType::Line(l) => l,
            ElementType::Rect(r) => r,
            ElementType::Circle(c) => c,
            ElementType::Text(t) => t,
            ElementType::Stamp(s) => s,
        }
    }

    fn as_element_mut(&mut self) -> &mut dyn Element {
        match self {
            ElementType::Stroke(s) => s,
            ElementType::Line(l) => l,
            ElementType::Rect(r) => r,
            ElementType::Circle(c) => c,
            ElementType::Text(t) => t,
            ElementType::Stamp(s) => s,
        }
    }

    /// Build a two-point shape of the given kind.
    pub fn shape(kind: ShapeKind, start: Pos2, end: Pos2, style: StrokeStyle) -> Self {
        match kind {
            ShapeKind::Line => ElementType::Line(Line::new(start, end, style)),
            ShapeKind::Rect => ElementType::Rect(RectShape::new(start, end, style)),
            ShapeKind::Circle => ElementType::Circle(Circle::new(start, end, style)),
        }
    }

    /// Move the free endpoint of a two-point shape. No-op for other variants.
    pub fn set_shape_end(&mut self, end: Pos2) {
        match self {
            ElementType::Line(l) => l.end = end,
            ElementType::Rect(r) => r.end = end,
            ElementType::Circle(c) => c.edge = end,
            ElementType::Stroke(_) | ElementType::Text(_) | ElementType::Stamp(_) => {}
        }
    }

    pub fn is_stroke(&self) -> bool {
        matches!(self, ElementType::Stroke(_))
    }
}

impl Element for ElementType {
    fn id(&self) -> ElementId {
        self.as_element().id()
    }

    fn element_type(&self) -> &'static str {
        self.as_element().element_type()
    }

    fn style(&self) -> StrokeStyle {
        self.as_element().style()
    }

    fn bounds(&self, measure: &dyn TextMeasure) -> Rect {
        self.as_element().bounds(measure)
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        self.as_element().draw(target)
    }

    fn hit_test(&self, pos: Pos2, tolerance: f32, measure: &dyn TextMeasure) -> bool {
        self.as_element().hit_test(pos, tolerance, measure)
    }

    fn translate(&mut self, delta: Vec2) {
        self.as_element_mut().translate(delta)
    }
}

/// Factory functions that build elements from the current tool settings.
///
/// Style is sampled here, once, at construction; the model never consults
/// the tool afterwards.
pub mod factory {
    use super::*;
    use crate::raster::Raster;
    use crate::tools::ToolSettings;

    /// Start a freehand path at `start`.
    pub fn begin_stroke(start: Pos2, tool: &ToolSettings) -> Stroke {
        Stroke::begin(start, tool.stroke_style())
    }

    /// A zero-extent shape anchored at `anchor`, ready for live resizing.
    pub fn shape_preview(kind: ShapeKind, anchor: Pos2, tool: &ToolSettings) -> ElementType {
        ElementType::shape(kind, anchor, anchor, tool.stroke_style())
    }

    pub fn create_text(anchor: Pos2, content: &str, tool: &ToolSettings) -> ElementType {
        ElementType::Text(Text::new(
            anchor,
            content,
            tool.text_size,
            tool.text_style,
            tool.font.clone(),
            tool.stroke_style(),
        ))
    }

    pub fn create_stamp(
        center: Pos2,
        width: f32,
        height: f32,
        image: Raster,
        tool: &ToolSettings,
    ) -> ElementType {
        ElementType::Stamp(Stamp::centered_at(center, width, height, image, tool.stroke_style()))
    }
}
