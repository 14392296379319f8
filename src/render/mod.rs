//! Turning element lists into pixels.
//!
//! The [`Compositor`] owns paint order; [`RenderTarget`] implementations own
//! the actual drawing. Live rendering goes through the egui painter adapter,
//! export goes through the software [`RasterCanvas`].

mod fonts;
mod painter;
mod raster_canvas;

pub use fonts::FontBook;
pub use painter::{EguiTextMeasure, PainterTarget, TextureCache};
pub use raster_canvas::RasterCanvas;

use egui::{Color32, Pos2, Rect, Vec2};
use log::trace;

use crate::element::{Element, ElementType, FontDescriptor, StrokeStyle};
use crate::raster::Raster;

/// The rendering primitive set the compositor draws with.
///
/// All coordinates are in model space; a target that displays a zoomed view
/// applies its own scale.
pub trait RenderTarget {
    /// Open polyline through `points`.
    fn draw_path(&mut self, points: &[Pos2], stroke: StrokeStyle);

    fn draw_line(&mut self, start: Pos2, end: Pos2, stroke: StrokeStyle);

    /// Outline of an axis-aligned rectangle.
    fn draw_rect(&mut self, rect: Rect, stroke: StrokeStyle);

    /// Outline of a circle.
    fn draw_circle(&mut self, center: Pos2, radius: f32, stroke: StrokeStyle);

    /// Filled text with its baseline starting at `anchor`.
    fn draw_text(&mut self, anchor: Pos2, content: &str, font: &FontDescriptor, color: Color32);

    /// Draw `image` stretched into `rect`.
    fn draw_image(&mut self, image: &Raster, rect: Rect);
}

/// Measures rendered text so hit-testing can match what is drawn.
pub trait TextMeasure {
    /// Width and height of `content` laid out on one line.
    fn measure(&self, content: &str, font: &FontDescriptor) -> Vec2;
}

/// Font-free text metrics: a fixed advance per character.
///
/// Used where no real font is available (headless sessions and tests).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ApproximateTextMeasure {
    /// Advance of one character as a fraction of the font size
    pub advance_ratio: f32,
}

impl Default for ApproximateTextMeasure {
    fn default() -> Self {
        Self { advance_ratio: 0.6 }
    }
}

impl TextMeasure for ApproximateTextMeasure {
    fn measure(&self, content: &str, font: &FontDescriptor) -> Vec2 {
        let chars = content.chars().count() as f32;
        let mut width = chars * font.size * self.advance_ratio;
        if font.bold {
            width += chars;
        }
        Vec2::new(width, font.size)
    }
}

/// Paints a background and an element list in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct Compositor;

impl Compositor {
    /// Background first, then the elements in list order, then the
    /// in-progress element so it always appears on top.
    pub fn render(
        target: &mut dyn RenderTarget,
        background: Option<&Raster>,
        elements: &[ElementType],
        in_progress: Option<&dyn Element>,
    ) {
        if let Some(background) = background {
            let rect = Rect::from_min_size(Pos2::ZERO, background.size());
            target.draw_image(background, rect);
        }

        for element in elements {
            element.draw(target);
        }

        if let Some(element) = in_progress {
            element.draw(target);
        }

        trace!(
            "composited {} elements (in progress: {})",
            elements.len(),
            in_progress.is_some()
        );
    }

    /// Flatten onto a fresh `width` x `height` raster. Nothing uncommitted is
    /// drawn.
    pub fn merge(
        width: u32,
        height: u32,
        background: Option<&Raster>,
        elements: &[ElementType],
        fonts: Option<&FontBook>,
    ) -> Raster {
        let mut canvas = RasterCanvas::new(width, height, fonts);
        Self::render(&mut canvas, background, elements, None);
        canvas.finish()
    }
}
