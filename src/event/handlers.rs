use log::{debug, trace};

use crate::event::{EditorEvent, EventHandler};

/// Writes every event to the log. Commits go to `debug`, the rest to `trace`.
#[derive(Debug, Default)]
pub struct LoggingEventHandler {
    seen: usize,
}

impl LoggingEventHandler {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EventHandler for LoggingEventHandler {
    fn handle_event(&mut self, event: &EditorEvent) {
        self.seen += 1;
        if event.is_commit() {
            debug!("event #{}: {:?}", self.seen, event);
        } else {
            trace!("event #{}: {:?}", self.seen, event);
        }
    }
}
