//! The interaction state machine for the annotation surface.
//!
//! At most one live construction is active at a time. Pending placements
//! (text or stamp waiting for a position) are tracked beside this state in
//! [`PendingPlacement`](super::PendingPlacement) and only start from `Idle`.
//!
//! # State Transitions
//!
//! ```text
//!                    ┌──────────────────┐
//!              ┌─────►  DrawingStroke   ├─────┐
//!              │     └──────────────────┘     │
//!              │                              │
//! ┌──────────┐ │     ┌──────────────────┐     │ ┌──────────┐
//! │          ├─┼─────► PreviewingShape  ├─────┼─►          │
//! │   Idle   │ │     └──────────────────┘     │ │   Idle   │
//! │          │ │                              │ │          │
//! └──────────┘ │     ┌──────────────────┐     │ └──────────┘
//!              └─────►  MovingElement   ├─────┘
//!                    └──────────────────┘
//! ```
//!
//! Pointer-down leaves `Idle`, pointer-up returns to it. A mode change from
//! any state discards the live construction and returns to `Idle`.
use egui::Pos2;

use crate::element::{ElementType, Stroke};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum EditorState {
    /// No gesture in progress
    #[default]
    Idle,
    /// A freehand path is growing under the pointer
    DrawingStroke { stroke: Stroke },
    /// A line, rect or circle follows the pointer with its free endpoint
    PreviewingShape { preview: ElementType },
    /// The element at `index` of the live list is being dragged; `origin` is
    /// where the drag started
    MovingElement {
        index: usize,
        origin: Pos2,
        last_pointer: Pos2,
    },
}

impl EditorState {
    pub fn is_idle(&self) -> bool {
        matches!(self, EditorState::Idle)
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self, EditorState::DrawingStroke { .. })
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self, EditorState::PreviewingShape { .. })
    }

    /// Index of the element being moved, if any
    pub fn moving_index(&self) -> Option<usize> {
        match self {
            EditorState::MovingElement { index, .. } => Some(*index),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EditorState::Idle => "Idle",
            EditorState::DrawingStroke { .. } => "DrawingStroke",
            EditorState::PreviewingShape { .. } => "PreviewingShape",
            EditorState::MovingElement { .. } => "MovingElement",
        }
    }
}
