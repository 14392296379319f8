use egui::Color32;

/// Outline parameters fixed when an element is committed.
///
/// Every variant carries one; only strokes, lines, rects and circles draw
/// with the width. Text uses the color alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Color32,
    pub width: f32,
}

impl StrokeStyle {
    pub fn new(color: Color32, width: f32) -> Self {
        Self { color, width }
    }
}

impl Default for StrokeStyle {
    fn default() -> Self {
        Self::new(Color32::BLACK, 8.0)
    }
}

/// Name of a font family known to the rendering side.
///
/// The element model never resolves it; render targets look it up at draw
/// time and fall back to their default face when it is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct FontRef(Option<String>);

impl FontRef {
    /// The renderer's default face.
    pub fn default_face() -> Self {
        Self(None)
    }

    pub fn named(family: impl Into<String>) -> Self {
        Self(Some(family.into()))
    }

    pub fn family(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Style flags stored on a text element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStyle {
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
}

/// Concrete font rendering descriptor, resolved at render time from a text
/// element's stored style, font reference and size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontDescriptor {
    pub font: FontRef,
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub strike: bool,
}

impl FontDescriptor {
    pub fn resolve(font: &FontRef, size: f32, style: TextStyle) -> Self {
        Self {
            font: font.clone(),
            size,
            bold: style.bold,
            italic: style.italic,
            strike: style.strike,
        }
    }
}
