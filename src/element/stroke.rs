use egui::{Pos2, Rect, Vec2};

use super::Element;
use super::common::StrokeStyle;
use crate::geometry;
use crate::id_generator::{ElementId, generate_id};
use crate::render::{RenderTarget, TextMeasure};

/// Freehand path: an ordered run of points joined by straight segments.
#[derive(Debug, Clone, PartialEq)]
pub struct Stroke {
    id: ElementId,
    points: Vec<Pos2>,
    style: StrokeStyle,
}

impl Stroke {
    /// Start a path at `start`.
    pub fn begin(start: Pos2, style: StrokeStyle) -> Self {
        Self::new(vec![start], style)
    }

    pub fn new(points: Vec<Pos2>, style: StrokeStyle) -> Self {
        Self {
            id: generate_id(),
            points,
            style,
        }
    }

    /// Extend the live path while the pointer is down.
    pub fn append_point(&mut self, point: Pos2) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Pos2] {
        &self.points
    }
}

impl Element for Stroke {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "stroke"
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        geometry::calculate_bounds(&self.points, self.style.width / 2.0)
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_path(&self.points, self.style);
    }

    // Freehand paths are never picked by erase or move.
    fn hit_test(&self, _pos: Pos2, _tolerance: f32, _measure: &dyn TextMeasure) -> bool {
        false
    }

    fn translate(&mut self, delta: Vec2) {
        for point in &mut self.points {
            *point += delta;
        }
    }
}
