use egui::{Color32, Pos2, Rect};
use image::RgbaImage;
use log::debug;

use super::{FontBook, RenderTarget, TextMeasure};
use crate::element::{FontDescriptor, StrokeStyle};
use crate::geometry;
use crate::raster::{Raster, to_rgba};

/// Software render target drawing onto an offscreen RGBA image.
///
/// Used for export. Outlines are filled by distance coverage with a one
/// pixel soft edge; images are scaled nearest-neighbour and alpha blended.
pub struct RasterCanvas<'a> {
    image: RgbaImage,
    fonts: Option<&'a FontBook>,
}

impl<'a> RasterCanvas<'a> {
    /// A transparent canvas. Text is skipped when `fonts` is `None`.
    pub fn new(width: u32, height: u32, fonts: Option<&'a FontBook>) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            fonts,
        }
    }

    pub fn finish(self) -> Raster {
        self.image.into()
    }

    /// Source-over blend of `color` at `coverage` onto one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Color32, coverage: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let coverage = coverage.clamp(0.0, 1.0);
        if coverage == 0.0 {
            return;
        }

        let [sr, sg, sb, sa] = color.to_srgba_unmultiplied();
        let src_a = sa as f32 / 255.0 * coverage;
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let dst_a = dst[3] as f32 / 255.0;
        let out_a = src_a + dst_a * (1.0 - src_a);
        if out_a <= 0.0 {
            return;
        }

        for (channel, src) in [sr, sg, sb].into_iter().enumerate() {
            let mixed = (src as f32 * src_a + dst[channel] as f32 * dst_a * (1.0 - src_a)) / out_a;
            dst[channel] = mixed.round().clamp(0.0, 255.0) as u8;
        }
        dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }

    /// Fill every pixel whose centre satisfies `distance(p) <= half_width`,
    /// with a one pixel soft edge, inside `area`.
    fn fill_by_distance(
        &mut self,
        area: Rect,
        half_width: f32,
        color: Color32,
        distance: impl Fn(Pos2) -> f32,
    ) {
        let area = area.expand(half_width + 1.0);
        let min_x = area.min.x.floor().max(0.0) as i64;
        let min_y = area.min.y.floor().max(0.0) as i64;
        let max_x = area.max.x.ceil().min(self.image.width() as f32) as i64;
        let max_y = area.max.y.ceil().min(self.image.height() as f32) as i64;

        for y in min_y..max_y {
            for x in min_x..max_x {
                let centre = Pos2::new(x as f32 + 0.5, y as f32 + 0.5);
                let d = distance(centre);
                if d <= half_width {
                    self.blend(x, y, color, 1.0);
                } else if d < half_width + 1.0 {
                    self.blend(x, y, color, half_width + 1.0 - d);
                }
            }
        }
    }

    fn stroke_segment(&mut self, start: Pos2, end: Pos2, stroke: StrokeStyle) {
        let half_width = (stroke.width / 2.0).max(0.5);
        self.fill_by_distance(Rect::from_two_pos(start, end), half_width, stroke.color, |p| {
            geometry::distance_to_segment(p, start, end)
        });
    }
}

impl RenderTarget for RasterCanvas<'_> {
    fn draw_path(&mut self, points: &[Pos2], stroke: StrokeStyle) {
        match points {
            [] => {}
            [only] => self.stroke_segment(*only, *only, stroke),
            _ => {
                for pair in points.windows(2) {
                    self.stroke_segment(pair[0], pair[1], stroke);
                }
            }
        }
    }

    fn draw_line(&mut self, start: Pos2, end: Pos2, stroke: StrokeStyle) {
        self.stroke_segment(start, end, stroke);
    }

    fn draw_rect(&mut self, rect: Rect, stroke: StrokeStyle) {
        let corners = [rect.left_top(), rect.right_top(), rect.right_bottom(), rect.left_bottom()];
        let half_width = (stroke.width / 2.0).max(0.5);
        // One pass over the outline so shared corners are not blended twice.
        self.fill_by_distance(rect, half_width, stroke.color, |p| {
            (0..4)
                .map(|i| geometry::distance_to_segment(p, corners[i], corners[(i + 1) % 4]))
                .fold(f32::INFINITY, f32::min)
        });
    }

    fn draw_circle(&mut self, center: Pos2, radius: f32, stroke: StrokeStyle) {
        let half_width = (stroke.width / 2.0).max(0.5);
        let area = Rect::from_center_size(center, egui::Vec2::splat(radius * 2.0));
        self.fill_by_distance(area, half_width, stroke.color, |p| (p.distance(center) - radius).abs());
    }

    fn draw_text(&mut self, anchor: Pos2, content: &str, font: &FontDescriptor, color: Color32) {
        let Some(fonts) = self.fonts else {
            debug!("no font book attached to export canvas, skipping text {content:?}");
            return;
        };

        let mut coverage = Vec::new();
        if !fonts.rasterize(anchor, content, font, |x, y, c| coverage.push((x, y, c))) {
            return;
        }
        for (x, y, c) in coverage {
            self.blend(x, y, color, c);
        }

        if font.strike {
            let size = fonts.measure(content, font);
            let y = anchor.y - font.size * 0.3;
            let stroke = StrokeStyle::new(color, (font.size / 15.0).max(1.0));
            self.stroke_segment(Pos2::new(anchor.x, y), Pos2::new(anchor.x + size.x, y), stroke);
        }
    }

    fn draw_image(&mut self, image: &Raster, rect: Rect) {
        if rect.width() <= 0.0 || rect.height() <= 0.0 || image.width() == 0 || image.height() == 0 {
            return;
        }

        let source = image.pixels();
        let min_x = rect.min.x.floor().max(0.0) as i64;
        let min_y = rect.min.y.floor().max(0.0) as i64;
        let max_x = rect.max.x.ceil().min(self.image.width() as f32) as i64;
        let max_y = rect.max.y.ceil().min(self.image.height() as f32) as i64;

        for y in min_y..max_y {
            let v = (y as f32 + 0.5 - rect.min.y) / rect.height();
            if !(0.0..1.0).contains(&v) {
                continue;
            }
            let sy = ((v * source.height() as f32) as u32).min(source.height() - 1);
            for x in min_x..max_x {
                let u = (x as f32 + 0.5 - rect.min.x) / rect.width();
                if !(0.0..1.0).contains(&u) {
                    continue;
                }
                let sx = ((u * source.width() as f32) as u32).min(source.width() - 1);
                let pixel = source.get_pixel(sx, sy);
                let [r, g, b, a] = pixel.0;
                if a == 255 {
                    self.image.put_pixel(x as u32, y as u32, to_rgba(Color32::from_rgb(r, g, b)));
                } else {
                    self.blend(x, y, Color32::from_rgba_unmultiplied(r, g, b, a), 1.0);
                }
            }
        }
    }
}
