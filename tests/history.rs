use egui::{Color32, Pos2};
use photo_annotator::element::{ElementType, Line, StrokeStyle};
use photo_annotator::history::{CanvasHistory, CanvasState};
use photo_annotator::raster::Raster;
use photo_annotator::tools::ToolMode;
use photo_annotator::{AnnotationEditor, EditorConfig};

fn drag(editor: &mut AnnotationEditor, from: (f32, f32), to: (f32, f32)) {
    assert!(editor.on_pointer_down(Pos2::new(from.0, from.1)));
    editor.on_pointer_move(Pos2::new((from.0 + to.0) / 2.0, (from.1 + to.1) / 2.0));
    assert!(editor.on_pointer_up(Pos2::new(to.0, to.1)));
}

fn draw_rect(editor: &mut AnnotationEditor, from: (f32, f32), to: (f32, f32)) {
    editor.set_mode(ToolMode::Rect);
    drag(editor, from, to);
}

fn line_state(n: usize) -> CanvasState {
    let elements = (0..n)
        .map(|i| {
            ElementType::Line(Line::new(
                Pos2::new(i as f32, 0.0),
                Pos2::new(i as f32, 10.0),
                StrokeStyle::default(),
            ))
        })
        .collect();
    CanvasState::new(None, elements)
}

#[test]
fn test_undo_redo_round_trip() {
    let mut editor = AnnotationEditor::default();
    editor.open_image(Raster::filled(400, 400, Color32::WHITE));
    let initial = editor.elements().to_vec();

    for i in 0..5 {
        let offset = i as f32 * 20.0;
        draw_rect(&mut editor, (offset, offset), (offset + 50.0, offset + 50.0));
    }
    let last = editor.elements().to_vec();
    assert_eq!(last.len(), 5);

    for _ in 0..5 {
        assert!(editor.undo());
    }
    assert_eq!(editor.elements(), initial.as_slice());
    assert!(editor.background().is_some());
    assert!(!editor.can_undo());

    for _ in 0..5 {
        assert!(editor.redo());
    }
    assert_eq!(editor.elements(), last.as_slice());
    assert!(!editor.can_redo());
}

#[test]
fn test_commit_after_undo_discards_redo() {
    let mut editor = AnnotationEditor::default();
    draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
    draw_rect(&mut editor, (20.0, 20.0), (40.0, 40.0));
    assert!(editor.undo());
    assert!(editor.can_redo());

    draw_rect(&mut editor, (60.0, 60.0), (80.0, 80.0));
    assert!(!editor.can_redo());
    let before = editor.elements().to_vec();
    assert!(!editor.redo());
    assert_eq!(editor.elements(), before.as_slice());
}

#[test]
fn test_undo_redo_on_empty_stacks_are_no_ops() {
    let mut editor = AnnotationEditor::default();
    assert!(!editor.undo());
    assert!(!editor.redo());
    assert!(editor.elements().is_empty());
    assert!(!editor.has_unsaved_changes());
}

#[test]
fn test_stroke_then_rect_scenario() {
    let mut editor = AnnotationEditor::default();
    editor.set_mode(ToolMode::Draw);
    drag(&mut editor, (10.0, 10.0), (60.0, 40.0));
    draw_rect(&mut editor, (100.0, 100.0), (200.0, 200.0));
    assert!(!editor.can_redo());
    let both = editor.elements().to_vec();

    assert!(editor.undo());
    assert_eq!(editor.elements().len(), 1);
    assert!(editor.elements()[0].is_stroke());

    assert!(editor.redo());
    assert_eq!(editor.elements(), both.as_slice());
}

#[test]
fn test_history_limit_evicts_oldest() {
    let config = EditorConfig {
        history_limit: 2,
        ..Default::default()
    };
    let mut editor = AnnotationEditor::new(config);
    for i in 0..4 {
        let x = i as f32 * 30.0;
        draw_rect(&mut editor, (x, 0.0), (x + 10.0, 10.0));
    }
    assert!(editor.undo());
    assert!(editor.undo());
    assert!(!editor.undo());
    assert_eq!(editor.elements().len(), 2);
}

#[test]
fn test_background_edits_are_undoable() {
    let mut editor = AnnotationEditor::default();
    editor.open_image(Raster::filled(40, 20, Color32::WHITE));
    assert!(!editor.can_undo());

    assert!(editor.rotate_background_clockwise());
    assert_eq!(editor.background().map(|b| (b.width(), b.height())), Some((20, 40)));

    assert!(editor.undo());
    assert_eq!(editor.background().map(|b| (b.width(), b.height())), Some((40, 20)));

    assert!(editor.redo());
    assert_eq!(editor.background().map(|b| (b.width(), b.height())), Some((20, 40)));
}

#[test]
fn test_snapshot_survives_live_raster_mutation() {
    let mut history = CanvasHistory::default();
    let mut live = Raster::filled(4, 4, Color32::WHITE);
    history.commit(CanvasState::new(Some(live.clone()), Vec::new()));

    live.pixels_mut().put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    assert_eq!(live.pixel(0, 0), Some(Color32::RED));

    let stored = history.current().background().cloned();
    assert_eq!(stored.and_then(|b| b.pixel(0, 0)), Some(Color32::WHITE));
}

#[test]
fn test_history_engine_law() {
    let mut history = CanvasHistory::new(line_state(0), 100);
    for n in 1..=4 {
        history.commit(line_state(n));
    }

    let mut live = line_state(4);
    for n in (0..4).rev() {
        live = history.undo(live).unwrap();
        assert_eq!(live.elements().len(), n);
    }
    assert!(history.undo(live.clone()).is_none());

    for n in 1..=4 {
        live = history.redo(live).unwrap();
        assert_eq!(live.elements().len(), n);
    }
    assert!(history.redo(live).is_none());
}

#[test]
fn test_open_image_resets_history() {
    let mut editor = AnnotationEditor::default();
    draw_rect(&mut editor, (0.0, 0.0), (10.0, 10.0));
    assert!(editor.can_undo());

    editor.open_image(Raster::filled(10, 10, Color32::WHITE));
    assert!(!editor.can_undo());
    assert!(!editor.can_redo());
    assert!(editor.elements().is_empty());
    assert!(!editor.has_unsaved_changes());
}
