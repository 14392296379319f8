use std::collections::{HashMap, HashSet};

use egui::text::{LayoutJob, TextFormat};
use egui::{
    Color32, ColorImage, Context, FontFamily, FontId, Painter, Pos2, Rect, Shape, Stroke as EguiStroke,
    TextureHandle, TextureId, TextureOptions, Vec2,
};
use log::debug;
use uuid::Uuid;

use super::{RenderTarget, TextMeasure};
use crate::element::{FontDescriptor, StrokeStyle};
use crate::raster::Raster;

fn font_family(font: &FontDescriptor) -> FontFamily {
    match font.font.family() {
        Some("monospace") => FontFamily::Monospace,
        _ => FontFamily::Proportional,
    }
}

/// GPU textures for rasters, keyed by raster content id.
#[derive(Default)]
pub struct TextureCache {
    textures: HashMap<Uuid, TextureHandle>,
}

impl TextureCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload `raster` once per content id and return its texture.
    pub fn texture_for(&mut self, ctx: &Context, raster: &Raster) -> TextureId {
        self.textures
            .entry(raster.id())
            .or_insert_with(|| {
                debug!("uploading texture for raster {}", raster.id());
                let image = ColorImage::from_rgba_unmultiplied(
                    [raster.width() as usize, raster.height() as usize],
                    raster.pixels().as_raw(),
                );
                ctx.load_texture(format!("raster-{}", raster.id()), image, TextureOptions::LINEAR)
            })
            .id()
    }

    /// Drop textures whose raster is no longer referenced.
    pub fn retain(&mut self, live: &HashSet<Uuid>) {
        self.textures.retain(|id, _| live.contains(id));
    }
}

/// Live render target over an egui painter.
///
/// Model coordinates are multiplied by `scale` and offset by `origin`, the
/// screen position of the model origin.
pub struct PainterTarget<'a> {
    painter: &'a Painter,
    textures: &'a mut TextureCache,
    origin: Pos2,
    scale: f32,
}

impl<'a> PainterTarget<'a> {
    pub fn new(painter: &'a Painter, textures: &'a mut TextureCache, origin: Pos2, scale: f32) -> Self {
        Self {
            painter,
            textures,
            origin,
            scale,
        }
    }

    fn to_screen(&self, pos: Pos2) -> Pos2 {
        self.origin + pos.to_vec2() * self.scale
    }

    fn stroke(&self, stroke: StrokeStyle) -> EguiStroke {
        EguiStroke::new(stroke.width * self.scale, stroke.color)
    }
}

impl RenderTarget for PainterTarget<'_> {
    fn draw_path(&mut self, points: &[Pos2], stroke: StrokeStyle) {
        match points {
            [] => {}
            [only] => {
                let radius = stroke.width * self.scale / 2.0;
                self.painter.circle_filled(self.to_screen(*only), radius, stroke.color);
            }
            _ => {
                let screen: Vec<Pos2> = points.iter().map(|p| self.to_screen(*p)).collect();
                self.painter.add(Shape::line(screen, self.stroke(stroke)));
            }
        }
    }

    fn draw_line(&mut self, start: Pos2, end: Pos2, stroke: StrokeStyle) {
        self.painter
            .line_segment([self.to_screen(start), self.to_screen(end)], self.stroke(stroke));
    }

    fn draw_rect(&mut self, rect: Rect, stroke: StrokeStyle) {
        let screen = Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        self.painter.rect_stroke(screen, 0.0, self.stroke(stroke));
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, stroke: StrokeStyle) {
        self.painter
            .circle_stroke(self.to_screen(center), radius * self.scale, self.stroke(stroke));
    }

    fn draw_text(&mut self, anchor: Pos2, content: &str, font: &FontDescriptor, color: Color32) {
        let size = font.size * self.scale;
        let strikethrough = if font.strike {
            EguiStroke::new((size / 15.0).max(1.0), color)
        } else {
            EguiStroke::NONE
        };

        let mut job = LayoutJob::default();
        job.append(
            content,
            0.0,
            TextFormat {
                font_id: FontId::new(size, font_family(font)),
                color,
                italics: font.italic,
                strikethrough,
                ..Default::default()
            },
        );
        let galley = self.painter.layout_job(job);

        // The anchor is the baseline; egui positions galleys by their top.
        let top_left = self.to_screen(anchor) - Vec2::new(0.0, galley.size().y);
        // Faux bold: a second pass one model unit to the right, matching the measurers.
        if font.bold {
            self.painter.galley(top_left + Vec2::new(self.scale, 0.0), galley.clone(), color);
        }
        self.painter.galley(top_left, galley, color);
    }

    fn draw_image(&mut self, image: &Raster, rect: Rect) {
        let texture = self.textures.texture_for(self.painter.ctx(), image);
        let screen = Rect::from_min_max(self.to_screen(rect.min), self.to_screen(rect.max));
        let uv = Rect::from_min_max(Pos2::ZERO, Pos2::new(1.0, 1.0));
        self.painter.image(texture, screen, uv, Color32::WHITE);
    }
}

/// Text metrics from egui's own font atlas, so live hit-testing matches
/// what the painter target draws.
#[derive(Clone)]
pub struct EguiTextMeasure {
    ctx: Context,
}

impl EguiTextMeasure {
    pub fn new(ctx: Context) -> Self {
        Self { ctx }
    }
}

impl TextMeasure for EguiTextMeasure {
    fn measure(&self, content: &str, font: &FontDescriptor) -> Vec2 {
        let font_id = FontId::new(font.size, font_family(font));
        let mut size = self
            .ctx
            .fonts(|fonts| fonts.layout_no_wrap(content.to_owned(), font_id, Color32::WHITE).size());
        if font.bold {
            size.x += 1.0;
        }
        size
    }
}
