//! Reference-counted RGBA rasters with copy-on-write mutation.

use std::io::Cursor;
use std::sync::Arc;

use egui::{Color32, Rect, Vec2};
use image::{ImageFormat, Rgba, RgbaImage, imageops};
use log::debug;
use uuid::Uuid;

use crate::error::RasterError;

/// An RGBA8 image shared by value.
///
/// Cloning is cheap and shares pixels. Any mutation goes through
/// [`Raster::pixels_mut`], which detaches the pixels first if they are
/// shared, so a clone held by a history snapshot can never observe later
/// edits to the live raster. The id changes whenever the pixels do.
#[derive(Clone)]
pub struct Raster {
    id: Uuid,
    pixels: Arc<RgbaImage>,
}

impl std::fmt::Debug for Raster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Raster")
            .field("id", &self.id)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PartialEq for Raster {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id || Arc::ptr_eq(&self.pixels, &other.pixels) || *self.pixels == *other.pixels
    }
}

impl From<RgbaImage> for Raster {
    fn from(image: RgbaImage) -> Self {
        Self {
            id: Uuid::new_v4(),
            pixels: Arc::new(image),
        }
    }
}

impl Raster {
    /// A fully transparent raster.
    pub fn new(width: u32, height: u32) -> Self {
        RgbaImage::new(width, height).into()
    }

    pub fn filled(width: u32, height: u32, color: Color32) -> Self {
        RgbaImage::from_pixel(width, height, to_rgba(color)).into()
    }

    /// Decode an encoded image (PNG, JPEG) handed over by image acquisition.
    pub fn decode(bytes: &[u8]) -> Result<Self, RasterError> {
        let image = image::load_from_memory(bytes).map_err(RasterError::Decode)?;
        Ok(image.to_rgba8().into())
    }

    /// Encode as PNG for the export path.
    pub fn encode_png(&self) -> Result<Vec<u8>, RasterError> {
        let mut out = Cursor::new(Vec::new());
        self.pixels
            .write_to(&mut out, ImageFormat::Png)
            .map_err(RasterError::Encode)?;
        Ok(out.into_inner())
    }

    /// Content identity. Equal ids mean equal pixels.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width() as f32, self.height() as f32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Color32> {
        self.pixels.get_pixel_checked(x, y).map(|p| from_rgba(*p))
    }

    /// True if both rasters currently share one pixel buffer.
    pub fn shares_pixels_with(&self, other: &Raster) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }

    /// Mutable access, detaching from any other holder first.
    pub fn pixels_mut(&mut self) -> &mut RgbaImage {
        self.id = Uuid::new_v4();
        Arc::make_mut(&mut self.pixels)
    }

    /// The raster turned a quarter turn clockwise.
    pub fn rotated_clockwise(&self) -> Raster {
        imageops::rotate90(&*self.pixels).into()
    }

    /// The raster flipped left to right.
    pub fn mirrored(&self) -> Raster {
        imageops::flip_horizontal(&*self.pixels).into()
    }

    /// Crop by a rectangle given in the coordinates of a view of `view_size`
    /// that displays the whole raster stretched to fit.
    ///
    /// Each axis is mapped by its own raster/view ratio, then clamped to the
    /// raster bounds.
    pub fn crop_view_rect(&self, view_rect: Rect, view_size: Vec2) -> Result<Raster, RasterError> {
        let empty = RasterError::EmptyCrop {
            width: self.width(),
            height: self.height(),
        };
        if view_size.x <= 0.0 || view_size.y <= 0.0 {
            return Err(empty);
        }

        let scale_x = self.width() as f32 / view_size.x;
        let scale_y = self.height() as f32 / view_size.y;

        let left = (view_rect.min.x * scale_x).max(0.0) as u32;
        let top = (view_rect.min.y * scale_y).max(0.0) as u32;
        let width = (view_rect.width() * scale_x).max(0.0) as u32;
        let height = (view_rect.height() * scale_y).max(0.0) as u32;

        let width = width.min(self.width().saturating_sub(left));
        let height = height.min(self.height().saturating_sub(top));
        if width == 0 || height == 0 {
            return Err(empty);
        }

        debug!("cropping {}x{} raster to {width}x{height} at ({left}, {top})", self.width(), self.height());
        Ok(imageops::crop_imm(&*self.pixels, left, top, width, height).to_image().into())
    }
}

pub(crate) fn to_rgba(color: Color32) -> Rgba<u8> {
    let [r, g, b, a] = color.to_srgba_unmultiplied();
    Rgba([r, g, b, a])
}

pub(crate) fn from_rgba(pixel: Rgba<u8>) -> Color32 {
    let [r, g, b, a] = pixel.0;
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use egui::Pos2;

    #[test]
    fn mutation_detaches_shared_pixels() {
        let original = Raster::filled(4, 4, Color32::WHITE);
        let mut live = original.clone();
        assert!(live.shares_pixels_with(&original));

        live.pixels_mut().put_pixel(0, 0, to_rgba(Color32::RED));

        assert!(!live.shares_pixels_with(&original));
        assert_ne!(live.id(), original.id());
        assert_eq!(original.pixel(0, 0), Some(Color32::WHITE));
        assert_eq!(live.pixel(0, 0), Some(Color32::RED));
    }

    #[test]
    fn rotation_swaps_dimensions() {
        let raster = Raster::new(30, 10);
        let rotated = raster.rotated_clockwise();
        assert_eq!((rotated.width(), rotated.height()), (10, 30));
    }

    #[test]
    fn mirror_flips_columns() {
        let mut raster = Raster::new(3, 1);
        raster.pixels_mut().put_pixel(0, 0, to_rgba(Color32::RED));
        let mirrored = raster.mirrored();
        assert_eq!(mirrored.pixel(2, 0), Some(Color32::RED));
    }

    #[test]
    fn crop_maps_view_space_per_axis() {
        let raster = Raster::new(200, 100);
        // View is half the raster's width and the same height.
        let view = Vec2::new(100.0, 100.0);
        let rect = Rect::from_min_max(Pos2::new(10.0, 20.0), Pos2::new(60.0, 70.0));
        let cropped = raster.crop_view_rect(rect, view).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (100, 50));
    }

    #[test]
    fn crop_clamps_to_bounds_and_rejects_empty() {
        let raster = Raster::new(100, 100);
        let view = Vec2::new(100.0, 100.0);
        let overhanging = Rect::from_min_max(Pos2::new(80.0, 80.0), Pos2::new(150.0, 150.0));
        let cropped = raster.crop_view_rect(overhanging, view).unwrap();
        assert_eq!((cropped.width(), cropped.height()), (20, 20));

        let outside = Rect::from_min_max(Pos2::new(120.0, 0.0), Pos2::new(150.0, 50.0));
        assert!(matches!(
            raster.crop_view_rect(outside, view),
            Err(RasterError::EmptyCrop { .. })
        ));
    }

    #[test]
    fn png_round_trip_preserves_size() {
        let raster = Raster::filled(8, 5, Color32::BLUE);
        let bytes = raster.encode_png().unwrap();
        let decoded = Raster::decode(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 5));
        assert_eq!(decoded.pixel(3, 3), Some(Color32::BLUE));
    }
}
