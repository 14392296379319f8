use egui::{Pos2, Rect, Vec2};

use super::Element;
use super::common::StrokeStyle;
use crate::id_generator::{ElementId, generate_id};
use crate::raster::Raster;
use crate::render::{RenderTarget, TextMeasure};

/// An image stamped onto the canvas at a fixed display size.
#[derive(Debug, Clone, PartialEq)]
pub struct Stamp {
    id: ElementId,
    pub top_left: Pos2,
    pub width: f32,
    pub height: f32,
    image: Raster,
    style: StrokeStyle,
}

impl Stamp {
    pub fn new(top_left: Pos2, width: f32, height: f32, image: Raster, style: StrokeStyle) -> Self {
        Self {
            id: generate_id(),
            top_left,
            width,
            height,
            image,
            style,
        }
    }

    /// Place a stamp so that `center` is the middle of its box.
    pub fn centered_at(center: Pos2, width: f32, height: f32, image: Raster, style: StrokeStyle) -> Self {
        let top_left = Pos2::new(center.x - width / 2.0, center.y - height / 2.0);
        Self::new(top_left, width, height, image, style)
    }

    pub fn image(&self) -> &Raster {
        &self.image
    }

    pub fn rect(&self) -> Rect {
        Rect::from_min_size(self.top_left, Vec2::new(self.width, self.height))
    }
}

impl Element for Stamp {
    fn id(&self) -> ElementId {
        self.id
    }

    fn element_type(&self) -> &'static str {
        "stamp"
    }

    fn style(&self) -> StrokeStyle {
        self.style
    }

    fn bounds(&self, _measure: &dyn TextMeasure) -> Rect {
        self.rect()
    }

    fn draw(&self, target: &mut dyn RenderTarget) {
        target.draw_image(&self.image, self.rect());
    }

    fn hit_test(&self, pos: Pos2, _tolerance: f32, _measure: &dyn TextMeasure) -> bool {
        self.rect().contains(pos)
    }

    fn translate(&mut self, delta: Vec2) {
        self.top_left += delta;
    }
}
