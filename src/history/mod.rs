use std::collections::VecDeque;

use log::{debug, trace};

use crate::element::ElementType;
use crate::raster::Raster;

/// Default number of undo steps kept before the oldest is evicted
pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// The full editable state at one point in time.
///
/// A value, not a handle: it is never mutated after construction. The
/// background shares pixels with the live raster until the live one is
/// written to, at which point [`Raster::pixels_mut`] detaches it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasState {
    background: Option<Raster>,
    elements: Vec<ElementType>,
}

impl CanvasState {
    pub fn new(background: Option<Raster>, elements: Vec<ElementType>) -> Self {
        Self {
            background,
            elements,
        }
    }

    pub fn background(&self) -> Option<&Raster> {
        self.background.as_ref()
    }

    pub fn elements(&self) -> &[ElementType] {
        &self.elements
    }

    pub fn into_parts(self) -> (Option<Raster>, Vec<ElementType>) {
        (self.background, self.elements)
    }
}

/// Linear undo/redo over [`CanvasState`] snapshots.
///
/// `current` is the last committed state. Committing pushes it onto the
/// undo stack and clears the redo stack; undo and redo swap the live state
/// with the top of the opposite stack.
#[derive(Debug, Clone)]
pub struct CanvasHistory {
    current: CanvasState,
    undo_stack: VecDeque<CanvasState>,
    redo_stack: Vec<CanvasState>,
    limit: usize,
}

impl Default for CanvasHistory {
    fn default() -> Self {
        Self::new(CanvasState::default(), DEFAULT_HISTORY_LIMIT)
    }
}

impl CanvasHistory {
    /// A history whose oldest reachable state is `baseline`.
    pub fn new(baseline: CanvasState, limit: usize) -> Self {
        Self {
            current: baseline,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            limit: limit.max(1),
        }
    }

    /// Record `state` as the new committed state.
    pub fn commit(&mut self, state: CanvasState) {
        let previous = std::mem::replace(&mut self.current, state);
        self.push_undo(previous);
        if !self.redo_stack.is_empty() {
            trace!("commit discards {} redo states", self.redo_stack.len());
            self.redo_stack.clear();
        }
        debug!(
            "committed snapshot with {} elements (undo depth {})",
            self.current.elements.len(),
            self.undo_stack.len()
        );
    }

    /// Step back one commit.
    ///
    /// `live` is the state on screen; it becomes the redo target. Returns the
    /// state to install, or `None` when there is nothing to undo.
    pub fn undo(&mut self, live: CanvasState) -> Option<CanvasState> {
        let previous = self.undo_stack.pop_back()?;
        self.redo_stack.push(live);
        self.current = previous.clone();
        debug!(
            "undo (undo depth {}, redo depth {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Some(previous)
    }

    /// Mirror image of [`Self::undo`].
    pub fn redo(&mut self, live: CanvasState) -> Option<CanvasState> {
        let next = self.redo_stack.pop()?;
        self.push_undo(live);
        self.current = next.clone();
        debug!(
            "redo (undo depth {}, redo depth {})",
            self.undo_stack.len(),
            self.redo_stack.len()
        );
        Some(next)
    }

    fn push_undo(&mut self, state: CanvasState) {
        self.undo_stack.push_back(state);
        while self.undo_stack.len() > self.limit {
            self.undo_stack.pop_front();
            debug!("evicted oldest undo state (limit {})", self.limit);
        }
    }

    /// Forget all history and start over from `baseline`.
    pub fn reset(&mut self, baseline: CanvasState) {
        self.current = baseline;
        self.clear();
    }

    pub fn current(&self) -> &CanvasState {
        &self.current
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
