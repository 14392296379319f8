use egui::Pos2;
use log::trace;

use crate::element::{Element, ElementType};
use crate::render::TextMeasure;

/// Proximity margin for line-like and point-like geometry, in model units.
pub const HIT_TOLERANCE: f32 = 20.0;

/// Find the topmost element under `pos`.
///
/// Walks from the last element (top of the paint order) down and returns the
/// index of the first one whose containment test matches, so higher z-order
/// always wins. Freehand strokes are never returned.
pub fn find_topmost(
    pos: Pos2,
    elements: &[ElementType],
    tolerance: f32,
    measure: &dyn TextMeasure,
) -> Option<usize> {
    let hit = elements
        .iter()
        .enumerate()
        .rev()
        .filter(|(_, element)| !element.is_stroke())
        .find(|(_, element)| element.hit_test(pos, tolerance, measure))
        .map(|(index, _)| index);

    trace!("hit test at {:?} -> {:?}", pos, hit);
    hit
}
