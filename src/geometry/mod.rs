//! Pure geometry helpers shared by hit-testing, translation and rasterization.
//!
//! Everything here works in model space and holds no state.

pub mod hit_testing;

use egui::{Pos2, Rect, Vec2};

/// Distance from `point` to the segment `start..end`.
///
/// The projection is clamped to the segment, so points beyond either end
/// measure to the nearest endpoint. A zero-length segment degrades to a
/// point distance.
pub fn distance_to_segment(point: Pos2, start: Pos2, end: Pos2) -> f32 {
    let segment = end - start;
    let length_sq = segment.length_sq();
    if length_sq == 0.0 {
        return point.distance(start);
    }

    let t = ((point - start).dot(segment) / length_sq).clamp(0.0, 1.0);
    let projection = start + segment * t;
    point.distance(projection)
}

/// True if `point` lies within `radius + margin` of `center`.
pub fn circle_contains(center: Pos2, radius: f32, point: Pos2, margin: f32) -> bool {
    point.distance(center) <= radius + margin
}

/// Axis-aligned box spanned by two opposite corners, in any order.
pub fn normalized_rect(a: Pos2, b: Pos2) -> Rect {
    Rect::from_two_pos(a, b)
}

/// True if `point` lies inside the box spanned by `a` and `b`, grown by
/// `margin` on every side. Corner order does not matter.
pub fn rect_contains(a: Pos2, b: Pos2, point: Pos2, margin: f32) -> bool {
    normalized_rect(a, b).expand(margin).contains(point)
}

/// Bounds of a text run whose anchor is the left end of its baseline.
///
/// The run extends `size.x` to the right and `size.y` upward.
pub fn text_bounds(anchor: Pos2, size: Vec2) -> Rect {
    Rect::from_min_max(Pos2::new(anchor.x, anchor.y - size.y), Pos2::new(anchor.x + size.x, anchor.y))
}

/// True if `point` lies in the text run anchored at `anchor`, no margin.
pub fn text_contains(anchor: Pos2, size: Vec2, point: Pos2) -> bool {
    text_bounds(anchor, size).contains(point)
}

/// Bounding box of a point set, grown by `padding`.
pub fn calculate_bounds(points: &[Pos2], padding: f32) -> Rect {
    if points.is_empty() {
        return Rect::NOTHING;
    }

    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;

    for point in points {
        min_x = min_x.min(point.x);
        min_y = min_y.min(point.y);
        max_x = max_x.max(point.x);
        max_y = max_y.max(point.y);
    }

    Rect::from_min_max(
        Pos2::new(min_x - padding, min_y - padding),
        Pos2::new(max_x + padding, max_y + padding),
    )
}
