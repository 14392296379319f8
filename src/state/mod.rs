mod editor_state;
mod pending;

pub use editor_state::EditorState;
pub use pending::PendingPlacement;
