//! The annotation editing session.
//!
//! [`AnnotationEditor`] owns the live background and element list, drives
//! the interaction state machine from pointer events, and records a
//! snapshot in its [`CanvasHistory`] after every committing mutation.
//! Pointer positions arrive in view space and are divided by the current
//! zoom before any geometry runs.

use egui::{Color32, Pos2, Rect, Vec2};
use log::{debug, info, trace, warn};

use crate::config::EditorConfig;
use crate::element::{factory, Element, ElementType, FontRef, TextStyle};
use crate::event::{EditorEvent, EventBus, EventHandler};
use crate::geometry::hit_testing::find_topmost;
use crate::history::{CanvasHistory, CanvasState};
use crate::raster::Raster;
use crate::render::{ApproximateTextMeasure, Compositor, FontBook, RenderTarget, TextMeasure};
use crate::state::{EditorState, PendingPlacement};
use crate::tools::{ToolMode, ToolSettings};

pub struct AnnotationEditor {
    config: EditorConfig,
    tool: ToolSettings,
    mode: ToolMode,
    state: EditorState,
    pending: Option<PendingPlacement>,
    background: Option<Raster>,
    elements: Vec<ElementType>,
    history: CanvasHistory,
    scale: f32,
    view_size: Option<Vec2>,
    measure: Box<dyn TextMeasure>,
    fonts: FontBook,
    events: EventBus,
    unsaved: bool,
}

impl std::fmt::Debug for AnnotationEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEditor")
            .field("mode", &self.mode)
            .field("state", &self.state.name())
            .field("elements", &self.elements.len())
            .field("background", &self.background)
            .field("scale", &self.scale)
            .field("undo_depth", &self.history.undo_depth())
            .field("redo_depth", &self.history.redo_depth())
            .finish()
    }
}

impl Default for AnnotationEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl AnnotationEditor {
    pub fn new(config: EditorConfig) -> Self {
        let history = CanvasHistory::new(CanvasState::default(), config.history_limit);
        Self {
            tool: ToolSettings::from_config(&config),
            mode: ToolMode::default(),
            state: EditorState::Idle,
            pending: None,
            background: None,
            elements: Vec::new(),
            history,
            scale: 1.0,
            view_size: None,
            measure: Box::new(ApproximateTextMeasure::default()),
            fonts: FontBook::egui_defaults(),
            events: EventBus::new(),
            unsaved: false,
            config,
        }
    }

    /// Replace the text metrics used for hit-testing text elements.
    pub fn with_text_measure(mut self, measure: impl TextMeasure + 'static) -> Self {
        self.measure = Box::new(measure);
        self
    }

    /// Fonts used to draw text when exporting, replacing egui's defaults.
    pub fn with_fonts(mut self, fonts: FontBook) -> Self {
        self.fonts = fonts;
        self
    }

    // --- Accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn tool(&self) -> &ToolSettings {
        &self.tool
    }

    pub fn mode(&self) -> ToolMode {
        self.mode
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn background(&self) -> Option<&Raster> {
        self.background.as_ref()
    }

    pub fn pending_placement(&self) -> Option<&PendingPlacement> {
        self.pending.as_ref()
    }

    pub fn history(&self) -> &CanvasHistory {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.unsaved
    }

    pub fn mark_saved(&mut self) {
        self.unsaved = false;
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Register a callback fired after state changes.
    pub fn subscribe(&self, handler: impl EventHandler + 'static) {
        self.events.subscribe(handler);
    }

    /// The stroke or shape under construction, drawn above the element list.
    pub fn in_progress_element(&self) -> Option<&dyn Element> {
        match &self.state {
            EditorState::DrawingStroke { stroke } => Some(stroke),
            EditorState::PreviewingShape { preview } => Some(preview),
            EditorState::Idle | EditorState::MovingElement { .. } => None,
        }
    }

    /// Hit margin in model units at the current zoom.
    pub fn hit_tolerance(&self) -> f32 {
        if self.config.scale_tolerance_with_zoom {
            self.config.hit_tolerance / self.scale
        } else {
            self.config.hit_tolerance
        }
    }

    /// Topmost hit-testable element at a model-space position.
    pub fn element_at(&self, pos: Pos2) -> Option<usize> {
        find_topmost(pos, &self.elements, self.hit_tolerance(), self.measure.as_ref())
    }

    // --- Tool settings ---

    /// Switch the active mode, discarding any live construction.
    pub fn set_mode(&mut self, mode: ToolMode) {
        self.abandon_gesture();
        if mode != self.mode {
            let old = std::mem::replace(&mut self.mode, mode);
            info!("mode {} -> {}", old.name(), mode.name());
            self.events.emit(EditorEvent::ModeChanged { old, new: mode });
        }
    }

    pub fn set_stroke_color(&mut self, color: Color32) {
        self.tool.color = color;
    }

    pub fn set_stroke_width(&mut self, width: f32) {
        self.tool.stroke_width = width;
    }

    pub fn set_text_style(&mut self, style: TextStyle, font: FontRef, size: f32) {
        self.tool.text_style = style;
        self.tool.font = font;
        self.tool.text_size = size;
    }

    // --- Pending placement ---

    /// Place `text` at the next pointer-down. Replaces any pending stamp and
    /// discards a live gesture.
    pub fn prepare_text_placement(&mut self, text: impl Into<String>) {
        self.abandon_gesture();
        let text = text.into();
        debug!("pending text placement: {text:?}");
        self.pending = Some(PendingPlacement::Text(text));
    }

    /// Center `image` on the next pointer-down. Replaces any pending text.
    pub fn prepare_stamp_placement(&mut self, image: Raster, width: f32, height: f32) {
        self.abandon_gesture();
        debug!("pending stamp placement: {width}x{height}");
        self.pending = Some(PendingPlacement::Stamp {
            image,
            width,
            height,
        });
    }

    /// Stamp at the configured default size, keeping the image's aspect ratio.
    pub fn prepare_stamp(&mut self, image: Raster) {
        let edge = self.config.default_stamp_size;
        let (w, h) = (image.width().max(1) as f32, image.height().max(1) as f32);
        let (width, height) = if w >= h {
            (edge, edge * h / w)
        } else {
            (edge * w / h, edge)
        };
        self.prepare_stamp_placement(image, width, height);
    }

    pub fn cancel_pending_placement(&mut self) -> Option<PendingPlacement> {
        self.pending.take()
    }

    // --- Pointer input ---

    fn to_model(&self, view: Pos2) -> Pos2 {
        (view.to_vec2() / self.scale).to_pos2()
    }

    /// Returns whether the event was consumed.
    pub fn on_pointer_down(&mut self, view_pos: Pos2) -> bool {
        if !self.state.is_idle() {
            trace!("pointer down ignored in {}", self.state.name());
            return false;
        }
        let pos = self.to_model(view_pos);

        if self.mode == ToolMode::Eraser {
            return self.erase_at(pos);
        }

        if let Some(pending) = self.pending.take() {
            self.place(pending, pos);
            return true;
        }

        if let Some(kind) = self.mode.shape_kind() {
            let preview = factory::shape_preview(kind, pos, &self.tool);
            trace!("previewing {:?} from {:?}", kind, pos);
            self.state = EditorState::PreviewingShape { preview };
            return true;
        }

        match self.mode {
            ToolMode::Draw => {
                let stroke = factory::begin_stroke(pos, &self.tool);
                trace!("stroke started at {:?}", pos);
                self.state = EditorState::DrawingStroke { stroke };
                true
            }
            ToolMode::Move => match self.element_at(pos) {
                Some(index) => {
                    debug!("moving element {index}");
                    self.state = EditorState::MovingElement {
                        index,
                        origin: pos,
                        last_pointer: pos,
                    };
                    true
                }
                None => false,
            },
            _ => false,
        }
    }

    pub fn on_pointer_move(&mut self, view_pos: Pos2) -> bool {
        let pos = self.to_model(view_pos);
        match &mut self.state {
            EditorState::Idle => false,
            EditorState::DrawingStroke { stroke } => {
                stroke.append_point(pos);
                true
            }
            EditorState::PreviewingShape { preview } => {
                preview.set_shape_end(pos);
                true
            }
            EditorState::MovingElement {
                index,
                last_pointer,
                ..
            } => {
                let delta = pos - *last_pointer;
                *last_pointer = pos;
                if let Some(element) = self.elements.get_mut(*index) {
                    element.translate(delta);
                }
                true
            }
        }
    }

    pub fn on_pointer_up(&mut self, view_pos: Pos2) -> bool {
        let pos = self.to_model(view_pos);
        match std::mem::take(&mut self.state) {
            EditorState::Idle => false,
            EditorState::DrawingStroke { mut stroke } => {
                stroke.append_point(pos);
                self.add_element(ElementType::Stroke(stroke));
                true
            }
            EditorState::PreviewingShape { mut preview } => {
                preview.set_shape_end(pos);
                self.add_element(preview);
                self.set_mode(ToolMode::Draw);
                true
            }
            EditorState::MovingElement {
                index,
                origin,
                last_pointer,
            } => {
                let step = pos - last_pointer;
                if let Some(element) = self.elements.get_mut(index) {
                    element.translate(step);
                }
                let delta = pos - origin;
                debug!("element {index} moved by {delta:?}");
                self.commit(EditorEvent::ElementMoved { index, delta });
                true
            }
        }
    }

    fn erase_at(&mut self, pos: Pos2) -> bool {
        let Some(index) = self.element_at(pos) else {
            trace!("eraser missed at {:?}", pos);
            return false;
        };
        let removed = self.elements.remove(index);
        let kind = removed.element_type();
        info!("erased {kind} {} at index {index}", removed.id());
        self.commit(EditorEvent::ElementRemoved { index, kind });
        true
    }

    fn place(&mut self, pending: PendingPlacement, pos: Pos2) {
        match pending {
            PendingPlacement::Text(content) => {
                let text = factory::create_text(pos, &content, &self.tool);
                self.add_element(text);
            }
            PendingPlacement::Stamp {
                image,
                width,
                height,
            } => {
                let stamp = factory::create_stamp(pos, width, height, image, &self.tool);
                self.add_element(stamp);
                self.set_mode(ToolMode::Draw);
            }
        }
    }

    fn add_element(&mut self, element: ElementType) {
        let kind = element.element_type();
        debug!("adding {kind} {}", element.id());
        self.elements.push(element);
        let index = self.elements.len() - 1;
        self.commit(EditorEvent::ElementAdded { index, kind });
    }

    /// Drop any live construction without committing. A half-finished move
    /// is rolled back to where it started.
    fn abandon_gesture(&mut self) {
        match std::mem::take(&mut self.state) {
            EditorState::Idle => {}
            EditorState::MovingElement {
                index,
                origin,
                last_pointer,
            } => {
                if let Some(element) = self.elements.get_mut(index) {
                    element.translate(origin - last_pointer);
                }
                debug!("abandoned move of element {index}");
            }
            other => debug!("abandoned {}", other.name()),
        }
    }

    // --- Zoom ---

    /// Apply a pinch step; the scale is clamped to the configured range.
    pub fn on_scale_changed(&mut self, factor: f32) {
        if !factor.is_finite() || factor <= 0.0 {
            warn!("ignoring invalid scale factor {factor}");
            return;
        }
        self.set_scale(self.scale * factor);
    }

    pub fn set_scale(&mut self, scale: f32) {
        let clamped = self.config.clamp_scale(scale);
        if clamped != self.scale {
            self.scale = clamped;
            trace!("scale {clamped}");
            self.events.emit(EditorEvent::ScaleChanged { scale: clamped });
        }
    }

    /// Size of the visible canvas in model units. Export uses it when set.
    pub fn set_view_size(&mut self, size: Vec2) {
        self.view_size = Some(size);
    }

    // --- History ---

    fn snapshot(&self) -> CanvasState {
        CanvasState::new(self.background.clone(), self.elements.clone())
    }

    fn install(&mut self, state: CanvasState) {
        let (background, elements) = state.into_parts();
        self.background = background;
        self.elements = elements;
    }

    fn commit(&mut self, event: EditorEvent) {
        self.history.commit(self.snapshot());
        self.unsaved = true;
        self.events.emit(event);
    }

    /// Returns false when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        self.abandon_gesture();
        let live = self.snapshot();
        match self.history.undo(live) {
            Some(state) => {
                self.install(state);
                self.unsaved = true;
                info!("undo -> {} elements", self.elements.len());
                self.events.emit(EditorEvent::Undone);
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.abandon_gesture();
        let live = self.snapshot();
        match self.history.redo(live) {
            Some(state) => {
                self.install(state);
                self.unsaved = true;
                info!("redo -> {} elements", self.elements.len());
                self.events.emit(EditorEvent::Redone);
                true
            }
            None => false,
        }
    }

    // --- Bulk state ---

    /// Replace the whole element list. Committed like any other edit.
    pub fn set_elements(&mut self, elements: Vec<ElementType>) {
        self.abandon_gesture();
        self.elements = elements;
        let count = self.elements.len();
        self.commit(EditorEvent::ElementsReplaced { count });
    }

    /// Install a freshly acquired photo: the element list is cleared and
    /// history restarts with this photo as its baseline.
    pub fn open_image(&mut self, raster: Raster) {
        self.abandon_gesture();
        self.pending = None;
        let (width, height) = (raster.width(), raster.height());
        self.background = Some(raster);
        self.elements.clear();
        self.history.reset(self.snapshot());
        self.unsaved = false;
        info!("opened {width}x{height} image");
        self.events.emit(EditorEvent::ImageOpened { width, height });
    }

    /// Replace the background as an undoable edit.
    pub fn set_background_raster(&mut self, raster: Raster) {
        self.abandon_gesture();
        let (width, height) = (raster.width(), raster.height());
        self.background = Some(raster);
        self.commit(EditorEvent::BackgroundChanged { width, height });
    }

    pub fn rotate_background_clockwise(&mut self) -> bool {
        let Some(rotated) = self.background.as_ref().map(Raster::rotated_clockwise) else {
            return false;
        };
        self.set_background_raster(rotated);
        true
    }

    pub fn mirror_background(&mut self) -> bool {
        let Some(mirrored) = self.background.as_ref().map(Raster::mirrored) else {
            return false;
        };
        self.set_background_raster(mirrored);
        true
    }

    /// Crop the background to `view_rect`, given in the coordinates of a
    /// view of `view_size` showing the whole raster. An empty crop is
    /// ignored.
    pub fn crop_background(&mut self, view_rect: Rect, view_size: Vec2) -> bool {
        let Some(background) = &self.background else {
            return false;
        };
        match background.crop_view_rect(view_rect, view_size) {
            Ok(cropped) => {
                self.set_background_raster(cropped);
                true
            }
            Err(err) => {
                warn!("crop ignored: {err}");
                false
            }
        }
    }

    // --- Rendering ---

    /// Draw the live canvas, including any shape or stroke under construction.
    pub fn render(&self, target: &mut dyn RenderTarget) {
        Compositor::render(
            target,
            self.background.as_ref(),
            &self.elements,
            self.in_progress_element(),
        );
    }

    /// Flatten background and committed elements into one raster, sized to
    /// the view if known, else to the background. `None` if neither is known.
    pub fn merge_with_background(&self) -> Option<Raster> {
        let (width, height) = match (self.view_size, &self.background) {
            (Some(size), _) => (size.x.round() as u32, size.y.round() as u32),
            (None, Some(background)) => (background.width(), background.height()),
            (None, None) => {
                warn!("nothing to export: no view size and no background");
                return None;
            }
        };
        if width == 0 || height == 0 {
            warn!("nothing to export: empty {width}x{height} canvas");
            return None;
        }
        info!("exporting {} elements at {width}x{height}", self.elements.len());
        Some(Compositor::merge(
            width,
            height,
            self.background.as_ref(),
            &self.elements,
            Some(&self.fonts),
        ))
    }
}
