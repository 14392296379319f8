use egui::Vec2;

use crate::tools::ToolMode;

/// Notifications emitted by the editor after it changes state.
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    /// An element was appended to the list at `index`
    ElementAdded {
        index: usize,
        kind: &'static str,
    },
    /// The eraser removed the element that was at `index`
    ElementRemoved {
        index: usize,
        kind: &'static str,
    },
    /// A move gesture finished with a total offset of `delta`
    ElementMoved {
        index: usize,
        delta: Vec2,
    },
    /// The background raster was replaced or transformed
    BackgroundChanged {
        width: u32,
        height: u32,
    },
    /// The element list was bulk-replaced from outside
    ElementsReplaced {
        count: usize,
    },
    Undone,
    Redone,
    /// A new photo was opened and history restarted
    ImageOpened {
        width: u32,
        height: u32,
    },
    ModeChanged {
        old: ToolMode,
        new: ToolMode,
    },
    ScaleChanged {
        scale: f32,
    },
}

impl EditorEvent {
    /// Whether this event follows a committing mutation, i.e. the document
    /// now differs from what was last saved.
    pub fn is_commit(&self) -> bool {
        match self {
            EditorEvent::ElementAdded { .. }
            | EditorEvent::ElementRemoved { .. }
            | EditorEvent::ElementMoved { .. }
            | EditorEvent::BackgroundChanged { .. }
            | EditorEvent::ElementsReplaced { .. }
            | EditorEvent::Undone
            | EditorEvent::Redone => true,
            EditorEvent::ImageOpened { .. }
            | EditorEvent::ModeChanged { .. }
            | EditorEvent::ScaleChanged { .. } => false,
        }
    }
}
