use egui::{Pos2, Rect, Vec2};

use super::Element;
use super::common::StrokeStyle;
use crate::geometry;
use crate::id_generator::{ElementId, generate_id};
use crate::render::{RenderTarget, TextMeasure};

/// Which two-point shape a preview or committed element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeKind {
    Line,
    Rect,
    Circle,
}

/// Straight segment between two points.
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    id: ElementId,
    pub start: Pos2,
    pub end: Pos2,
    style: StrokeStyle,
}

impl Line {
    pub fn new(start: Pos2, end: Pos2, style: StrokeStyle) -> Self {
        Self {
            id: generate_id(),
            start,
            end,
            style,
        }
    }
}

impl Element for Line {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "line"
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        geometry::normalized_rect(self.start, self.end).expand(self.style.width / 2.0)
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_line(self.start, self.end, self.style);
    }

    // Strict: a point exactly `tolerance` away is a miss.
    fn hit_test(&self, pos: Pos2, tolerance: f32, _measure: &dyn TextMeasure) -> bool {
        geometry::distance_to_segment(pos, self.start, self.end) < tolerance
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

/// Axis-aligned rectangle outline given by two opposite corners.
///
/// The corners are stored as drawn and never normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct RectShape {
    id: ElementId,
    pub start: Pos2,
    pub end: Pos2,
    style: StrokeStyle,
}

impl RectShape {
    pub fn new(start: Pos2, end: Pos2, style: StrokeStyle) -> Self {
        Self {
            id: generate_id(),
            start,
            end,
            style,
        }
    }

    pub fn rect(&self) -> Rect {
        geometry::normalized_rect(self.start, self.end)
    }
}

impl Element for RectShape {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "rect"
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        self.rect().expand(self.style.width / 2.0)
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_rect(self.rect(), self.style);
    }

    fn hit_test(&self, pos: Pos2, tolerance: f32, _measure: &dyn TextMeasure) -> bool {
        geometry::rect_contains(self.start, self.end, pos, tolerance)
    }

    fn translate(&mut self, delta: Vec2) {
        self.start += delta;
        self.end += delta;
    }
}

/// Circle outline; the radius is the distance from `center` to `edge`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    id: ElementId,
    pub center: Pos2,
    pub edge: Pos2,
    style: StrokeStyle,
}

impl Circle {
    pub fn new(center: Pos2, edge: Pos2, style: StrokeStyle) -> Self {
        Self {
            id: generate_id(),
            center,
            edge,
            style,
        }
    }

    pub fn radius(&self) -> f32 {
        self.center.distance(self.edge)
    }
}

impl Element for Circle {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "circle"
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        Rect::from_center_size(self.center, Vec2::splat(self.radius() * 2.0))
            .expand(self.style.width / 2.0)
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_circle(self.center, self.radius(), self.style);
    }

    fn hit_test(&self, pos: Pos2, tolerance: f32, _measure: &dyn TextMeasure) -> bool {
        geometry::circle_contains(self.center, self.radius(), pos, tolerance)
    }

    fn translate(&mut self, delta: Vec2) {
        self.center += delta;
        self.edge += delta;
    }
}
