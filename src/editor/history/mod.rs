//! Undo/redo of frame edits.
//!
//! Before an edit touches a frame, the frame's whole image is copied into a
//! [`BackupElement`]. Undo writes those copies back. The history holds at
//! most [`MAX_HISTORY_SIZE`] entries and drops the oldest first.
//!
//! ## Module Structure
//!
//! - [`backup_element`] - One snapshot and how it is restored
//! - [`undo_history`] - UndoHistory resource (cursor, eviction, truncation)
//! - [`systems`] - Bevy systems handling undo/redo/backup requests
//!
//! ## Signals
//!
//! The history does not talk to the UI directly. Mutations queue
//! [`HistorySignal`]s which [`systems::forward_history_signals`] turns into
//! messages once per frame.

mod backup_element;
mod systems;
mod undo_history;

#[cfg(test)]
mod tests;

use crate::constants::MAX_UNDO_LEVELS;
use crate::object::Object;

use super::canvas::{CanvasState, EditorCursor};

// Re-exports
pub use backup_element::BackupElement;
pub use systems::{
    forward_history_signals, handle_backup, handle_mark_modified, handle_redo, handle_undo,
};
pub use undo_history::UndoHistory;

/// Maximum number of backups kept in history
pub(crate) const MAX_HISTORY_SIZE: usize = MAX_UNDO_LEVELS;

/// Label of the snapshot taken when undoing the newest entry
pub const NO_OP_LABEL: &str = "NoOp";

/// Mutable view of everything an edit or a restore touches.
pub struct EditContext<'a> {
    pub object: &'a mut Object,
    pub canvas: &'a mut CanvasState,
    pub cursor: &'a mut EditorCursor,
}

/// Notifications queued by [`UndoHistory`] for the surrounding UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistorySignal {
    /// The entry list or cursor changed
    HistoryChanged,
    /// A frame's image was replaced; `vectors` when it was a vector frame
    FrameUpdated { frame: i32, vectors: bool },
    /// The timeline cursor moved
    ScrubTo(i32),
}
