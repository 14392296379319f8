use egui::{Color32, Pos2};
use photo_annotator::element::{
    Circle, Element, ElementType, FontRef, Line, RectShape, Stamp, Stroke, StrokeStyle, Text, TextStyle,
};
use photo_annotator::geometry::hit_testing::{find_topmost, HIT_TOLERANCE};
use photo_annotator::raster::Raster;
use photo_annotator::render::ApproximateTextMeasure;

const MEASURE: ApproximateTextMeasure = ApproximateTextMeasure { advance_ratio: 0.6 };

fn style() -> StrokeStyle {
    StrokeStyle::new(Color32::BLACK, 4.0)
}

fn rect(a: (f32, f32), b: (f32, f32)) -> ElementType {
    ElementType::Rect(RectShape::new(Pos2::new(a.0, a.1), Pos2::new(b.0, b.1), style()))
}

fn hits(element: &ElementType, x: f32, y: f32) -> bool {
    element.hit_test(Pos2::new(x, y), HIT_TOLERANCE, &MEASURE)
}

#[test]
fn test_circle_includes_margin() {
    let circle = ElementType::Circle(Circle::new(Pos2::new(500.0, 500.0), Pos2::new(600.0, 500.0), style()));
    assert!(hits(&circle, 500.0, 500.0));
    assert!(hits(&circle, 620.0, 500.0));
    assert!(!hits(&circle, 621.0, 500.0));
}

#[test]
fn test_rect_independent_of_corner_order() {
    let forward = rect((100.0, 100.0), (300.0, 300.0));
    let backward = rect((300.0, 300.0), (100.0, 100.0));
    let mixed = rect((300.0, 100.0), (100.0, 300.0));
    for element in [&forward, &backward, &mixed] {
        assert!(hits(element, 200.0, 200.0));
        assert!(hits(element, 80.0, 80.0));
        assert!(!hits(element, 79.0, 200.0));
        assert!(!hits(element, 200.0, 321.0));
    }
}

#[test]
fn test_line_uses_clamped_segment() {
    let line = ElementType::Line(Line::new(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), style()));
    assert!(hits(&line, 50.0, 19.0));
    assert!(!hits(&line, 50.0, 20.0)); // strictly less than the margin
    // On the infinite line but past the end of the segment
    assert!(!hits(&line, 130.0, 0.0));
    assert!(hits(&line, 115.0, 0.0));
}

#[test]
fn test_degenerate_line_is_a_point() {
    let line = ElementType::Line(Line::new(Pos2::new(10.0, 10.0), Pos2::new(10.0, 10.0), style()));
    assert!(hits(&line, 20.0, 10.0));
    assert!(!hits(&line, 40.0, 10.0));
}

#[test]
fn test_text_box_grows_up_from_baseline() {
    // "abcd" at size 10: 24 wide, 10 tall
    let text = ElementType::Text(Text::new(
        Pos2::new(100.0, 100.0),
        "abcd",
        10.0,
        TextStyle::default(),
        FontRef::default_face(),
        style(),
    ));
    assert!(hits(&text, 101.0, 95.0));
    assert!(hits(&text, 123.0, 91.0));
    // No margin for text
    assert!(!hits(&text, 101.0, 101.0));
    assert!(!hits(&text, 126.0, 95.0));
    assert!(!hits(&text, 101.0, 89.0));
}

#[test]
fn test_stamp_box_has_no_margin() {
    let stamp = ElementType::Stamp(Stamp::new(Pos2::new(10.0, 10.0), 30.0, 20.0, Raster::new(3, 2), style()));
    assert!(hits(&stamp, 10.0, 10.0));
    assert!(hits(&stamp, 39.0, 29.0));
    assert!(!hits(&stamp, 41.0, 15.0));
    assert!(!hits(&stamp, 15.0, 5.0));
}

#[test]
fn test_strokes_are_never_hit() {
    let stroke = ElementType::Stroke(Stroke::new(
        vec![Pos2::new(0.0, 0.0), Pos2::new(100.0, 100.0)],
        style(),
    ));
    assert!(!hits(&stroke, 50.0, 50.0));

    let elements = vec![rect((0.0, 0.0), (10.0, 10.0)), stroke];
    // The stroke is on top and passes right through the point
    assert_eq!(find_topmost(Pos2::new(5.0, 5.0), &elements, HIT_TOLERANCE, &MEASURE), Some(0));
    assert_eq!(find_topmost(Pos2::new(80.0, 80.0), &elements, HIT_TOLERANCE, &MEASURE), None);
}

#[test]
fn test_topmost_wins() {
    let a = rect((0.0, 0.0), (100.0, 100.0));
    let b = rect((50.0, 50.0), (150.0, 150.0));
    let elements = vec![a, b];
    assert_eq!(find_topmost(Pos2::new(75.0, 75.0), &elements, HIT_TOLERANCE, &MEASURE), Some(1));
    assert_eq!(find_topmost(Pos2::new(10.0, 10.0), &elements, HIT_TOLERANCE, &MEASURE), Some(0));
    assert_eq!(find_topmost(Pos2::new(500.0, 500.0), &elements, HIT_TOLERANCE, &MEASURE), None);
}

#[test]
fn test_tolerance_is_a_parameter() {
    let line = ElementType::Line(Line::new(Pos2::new(0.0, 0.0), Pos2::new(100.0, 0.0), style()));
    let elements = vec![line];
    assert_eq!(find_topmost(Pos2::new(50.0, 8.0), &elements, 5.0, &MEASURE), None);
    assert_eq!(find_topmost(Pos2::new(50.0, 8.0), &elements, 10.0, &MEASURE), Some(0));
}

#[test]
fn test_empty_list_misses() {
    assert_eq!(find_topmost(Pos2::ZERO, &[], HIT_TOLERANCE, &MEASURE), None);
}
