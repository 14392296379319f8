use ab_glyph::{Font, FontArc, PxScale, ScaleFont, point};
use egui::{FontDefinitions, FontFamily, Pos2, Vec2};
use log::{debug, warn};

use super::{ApproximateTextMeasure, TextMeasure};
use crate::element::FontDescriptor;
use crate::error::FontError;

struct Face {
    family: String,
    bold: bool,
    italic: bool,
    font: FontArc,
}

/// Fonts available to offscreen rendering, keyed by family and style.
///
/// Lookup falls back from the exact (family, bold, italic) face to the
/// family's regular face, then to the first face registered.
#[derive(Default)]
pub struct FontBook {
    faces: Vec<Face>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontBook")
            .field("faces", &format!("<{} faces>", self.faces.len()))
            .finish()
    }
}

/// A face picked for a descriptor, and whether bold must be synthesized.
pub(crate) struct ResolvedFace<'a> {
    pub font: &'a FontArc,
    pub fake_bold: bool,
}

impl FontBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// The faces egui ships for its proportional and monospace families,
    /// registered as `"proportional"` (first, so it is the fallback) and
    /// `"monospace"`. Empty when egui is built without `default_fonts`.
    pub fn egui_defaults() -> Self {
        let definitions = FontDefinitions::default();
        let mut book = Self::new();
        for (family, name) in [
            (FontFamily::Proportional, "proportional"),
            (FontFamily::Monospace, "monospace"),
        ] {
            let Some(data) = definitions
                .families
                .get(&family)
                .and_then(|names| names.first())
                .and_then(|key| definitions.font_data.get(key))
            else {
                continue;
            };
            if let Err(err) = book.register(name, false, false, data.font.to_vec()) {
                warn!("{err}");
            }
        }
        if book.is_empty() {
            warn!("egui provided no default fonts, exported text will be skipped");
        }
        book
    }

    /// Register a TrueType/OpenType face from raw bytes.
    pub fn register(
        &mut self,
        family: impl Into<String>,
        bold: bool,
        italic: bool,
        bytes: Vec<u8>,
    ) -> Result<(), FontError> {
        let family = family.into();
        let font = FontArc::try_from_vec(bytes).map_err(|_| FontError::InvalidFont {
            family: family.clone(),
        })?;
        debug!("registered font face {family:?} (bold: {bold}, italic: {italic})");
        self.faces.push(Face {
            family,
            bold,
            italic,
            font,
        });
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    pub(crate) fn resolve(&self, descriptor: &FontDescriptor) -> Option<ResolvedFace<'_>> {
        let family = descriptor.font.family();
        let in_family = |face: &&Face| family.is_none_or(|name| face.family == name);

        let exact = self
            .faces
            .iter()
            .filter(in_family)
            .find(|face| face.bold == descriptor.bold && face.italic == descriptor.italic);
        let face = exact
            .or_else(|| self.faces.iter().filter(in_family).find(|face| !face.bold && !face.italic))
            .or_else(|| self.faces.first())?;

        Some(ResolvedFace {
            font: &face.font,
            fake_bold: descriptor.bold && !face.bold,
        })
    }

    /// Lay out `content` on one line starting at `anchor` (baseline-left) and
    /// report glyph coverage per pixel through `plot`.
    ///
    /// Returns `false` when no face is available.
    pub(crate) fn rasterize(
        &self,
        anchor: Pos2,
        content: &str,
        descriptor: &FontDescriptor,
        mut plot: impl FnMut(i64, i64, f32),
    ) -> bool {
        let Some(resolved) = self.resolve(descriptor) else {
            warn!("no font face available for {:?}, skipping text", descriptor.font);
            return false;
        };

        let scale = PxScale::from(descriptor.size);
        let scaled = resolved.font.as_scaled(scale);
        let passes: &[f32] = if resolved.fake_bold { &[0.0, 1.0] } else { &[0.0] };

        for &offset in passes {
            let mut caret = anchor.x + offset;
            let mut previous = None;
            for ch in content.chars() {
                let id = scaled.glyph_id(ch);
                if let Some(prev) = previous {
                    caret += scaled.kern(prev, id);
                }
                let glyph = id.with_scale_and_position(scale, point(caret, anchor.y));
                caret += scaled.h_advance(id);
                previous = Some(id);

                if let Some(outlined) = resolved.font.outline_glyph(glyph) {
                    let bounds = outlined.px_bounds();
                    outlined.draw(|gx, gy, coverage| {
                        plot(
                            bounds.min.x as i64 + gx as i64,
                            bounds.min.y as i64 + gy as i64,
                            coverage,
                        );
                    });
                }
            }
        }
        true
    }
}

impl TextMeasure for FontBook {
    fn measure(&self, content: &str, descriptor: &FontDescriptor) -> Vec2 {
        let Some(resolved) = self.resolve(descriptor) else {
            return ApproximateTextMeasure::default().measure(content, descriptor);
        };

        let scaled = resolved.font.as_scaled(PxScale::from(descriptor.size));
        let mut width = 0.0;
        let mut previous = None;
        for ch in content.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            previous = Some(id);
        }
        if resolved.fake_bold {
            width += 1.0;
        }

        Vec2::new(width, scaled.ascent() - scaled.descent())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{FontRef, TextStyle};

    fn proportional_bytes() -> Vec<u8> {
        let definitions = FontDefinitions::default();
        let key = &definitions.families[&FontFamily::Proportional][0];
        definitions.font_data[key].font.to_vec()
    }

    fn descriptor(font: FontRef, bold: bool, italic: bool) -> FontDescriptor {
        FontDescriptor::resolve(
            &font,
            32.0,
            TextStyle {
                bold,
                italic,
                strike: false,
            },
        )
    }

    fn face_index(book: &FontBook, resolved: &ResolvedFace<'_>) -> usize {
        book.faces
            .iter()
            .position(|face| std::ptr::eq(&face.font, resolved.font))
            .unwrap()
    }

    /// Faces: 0 = sans regular, 1 = sans bold, 2 = serif italic.
    fn sample_book() -> FontBook {
        let bytes = proportional_bytes();
        let mut book = FontBook::new();
        book.register("sans", false, false, bytes.clone()).unwrap();
        book.register("sans", true, false, bytes.clone()).unwrap();
        book.register("serif", false, true, bytes).unwrap();
        book
    }

    #[test]
    fn test_egui_defaults() {
        let book = FontBook::egui_defaults();
        assert!(!book.is_empty());
        let mono = book.resolve(&descriptor(FontRef::named("monospace"), false, false)).unwrap();
        assert_eq!(book.faces[face_index(&book, &mono)].family, "monospace");
        let default = book.resolve(&descriptor(FontRef::default_face(), false, false)).unwrap();
        assert_eq!(face_index(&book, &default), 0);
    }

    #[test]
    fn test_register_rejects_garbage() {
        let mut book = FontBook::new();
        let err = book.register("broken", false, false, vec![1, 2, 3]).unwrap_err();
        assert!(matches!(err, FontError::InvalidFont { family } if family == "broken"));
        assert!(book.is_empty());
    }

    #[test]
    fn test_resolve_exact_face() {
        let book = sample_book();
        let bold = book.resolve(&descriptor(FontRef::named("sans"), true, false)).unwrap();
        assert_eq!(face_index(&book, &bold), 1);
        assert!(!bold.fake_bold);

        let italic = book.resolve(&descriptor(FontRef::named("serif"), false, true)).unwrap();
        assert_eq!(face_index(&book, &italic), 2);
    }

    #[test]
    fn test_resolve_falls_back_to_regular_face() {
        let book = sample_book();
        let resolved = book.resolve(&descriptor(FontRef::named("sans"), false, true)).unwrap();
        assert_eq!(face_index(&book, &resolved), 0);
        assert!(!resolved.fake_bold);
    }

    #[test]
    fn test_resolve_falls_back_to_first_face() {
        let book = sample_book();
        let unknown = book.resolve(&descriptor(FontRef::named("cursive"), false, false)).unwrap();
        assert_eq!(face_index(&book, &unknown), 0);

        // serif has no regular face either
        let serif_bold = book.resolve(&descriptor(FontRef::named("serif"), true, false)).unwrap();
        assert_eq!(face_index(&book, &serif_bold), 0);
        assert!(serif_bold.fake_bold);
    }

    #[test]
    fn test_resolve_on_empty_book() {
        assert!(FontBook::new().resolve(&descriptor(FontRef::default_face(), false, false)).is_none());
    }

    #[test]
    fn test_measure() {
        let mut book = FontBook::new();
        book.register("sans", false, false, proportional_bytes()).unwrap();

        let regular = descriptor(FontRef::named("sans"), false, false);
        let short = book.measure("Hi", &regular);
        let long = book.measure("Hi there", &regular);
        assert!(short.x > 0.0);
        assert!(long.x > short.x);
        assert!(short.y > 20.0 && short.y < 64.0, "height {}", short.y);
        assert_eq!(book.measure("", &regular).x, 0.0);

        // bold is synthesized, one unit wider
        let bold = book.measure("Hi", &descriptor(FontRef::named("sans"), true, false));
        assert!((bold.x - short.x - 1.0).abs() < 1e-4);
        assert_eq!(bold.y, short.y);
    }

    #[test]
    fn test_measure_without_faces_is_approximate() {
        let regular = descriptor(FontRef::default_face(), false, false);
        assert_eq!(
            FontBook::new().measure("abc", &regular),
            ApproximateTextMeasure::default().measure("abc", &regular)
        );
    }

    #[test]
    fn test_rasterize_covers_glyph_box() {
        let mut book = FontBook::new();
        book.register("sans", false, false, proportional_bytes()).unwrap();
        let regular = descriptor(FontRef::named("sans"), false, false);
        let anchor = Pos2::new(10.0, 50.0);
        let size = book.measure("HI", &regular);

        let mut hits = Vec::new();
        let drawn = book.rasterize(anchor, "HI", &regular, |x, y, coverage| {
            if coverage > 0.5 {
                hits.push((x, y));
            }
        });
        assert!(drawn);
        assert!(!hits.is_empty());
        for (x, y) in hits {
            assert!(x as f32 >= anchor.x - 1.0 && x as f32 <= anchor.x + size.x + 1.0);
            // capitals sit above the baseline
            assert!(y as f32 <= anchor.y && y as f32 >= anchor.y - size.y);
        }
    }

    #[test]
    fn test_rasterize_fake_bold_spreads_coverage() {
        let mut book = FontBook::new();
        book.register("sans", false, false, proportional_bytes()).unwrap();
        let count = |bold| {
            let mut plotted = 0;
            book.rasterize(
                Pos2::new(0.0, 40.0),
                "I",
                &descriptor(FontRef::named("sans"), bold, false),
                |_, _, coverage| {
                    if coverage > 0.0 {
                        plotted += 1;
                    }
                },
            );
            plotted
        };
        assert!(count(true) > count(false));
    }

    #[test]
    fn test_rasterize_without_faces() {
        let drawn = FontBook::new().rasterize(
            Pos2::ZERO,
            "x",
            &descriptor(FontRef::default_face(), false, false),
            |_, _, _| panic!("nothing to plot"),
        );
        assert!(!drawn);
    }
}
