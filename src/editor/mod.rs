//! Editing core: undo history, clipboard and image import.
//!
//! Everything here acts on the active [`Object`] resource together with the
//! [`CanvasState`] selection and the [`EditorCursor`]. Operations are plain
//! functions over an [`EditContext`]; [`EditorPlugin`] wires them to request
//! messages.
//!
//! ## Module Structure
//!
//! - [`canvas`] - Selection rectangles and timeline cursor
//! - [`clipboard`] - Copy/paste service
//! - [`history`] - Undo history and its systems
//! - [`messages`] - Request and notification messages
//! - `import` - Importing image files into a layer
//! - `params` - SystemParam bundle handing out an [`EditContext`]

pub mod canvas;
pub mod clipboard;
pub mod history;
mod import;
pub mod messages;
mod params;


use bevy::prelude::*;

use crate::object::Object;

// Re-exports
pub use canvas::{CanvasState, EditorCursor};
pub use clipboard::{Clipboard, ClipboardContent};
pub use history::{EditContext, UndoHistory};
pub use import::{IMPORT_LABEL, import_image};
pub use params::EditParams;

use messages::{
    BackupRequest, CopyRequest, CurrentFrameChanged, FrameUpdated, HistoryChanged,
    ImportImageRequest, MarkModifiedRequest, PasteRequest, RedoRequest, UndoRequest,
};

/// Summary of the undo history for menus and status bars.
///
/// Refreshed whenever the history emits a change.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryStatus {
    pub len: usize,
    pub current_index: isize,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl Default for HistoryStatus {
    fn default() -> Self {
        Self {
            len: 0,
            current_index: -1,
            can_undo: false,
            can_redo: false,
        }
    }
}

impl HistoryStatus {
    pub fn from_history(history: &UndoHistory) -> Self {
        Self {
            len: history.len(),
            current_index: history.current_index(),
            can_undo: history.can_undo(),
            can_redo: history.can_redo(),
        }
    }
}

/// Make `object` the active document.
///
/// The cursor moves to the frame and layer saved in the document's editor
/// block (or the defaults for documents without one), the selection is
/// dropped and the undo history cleared.
pub fn set_object(history: &mut UndoHistory, ctx: &mut EditContext<'_>, object: Object) {
    *ctx.object = object;

    let state = ctx.object.editor_state.clone().unwrap_or_default();
    ctx.cursor.scrub_to(state.current_frame);
    let last_layer = ctx.object.layer_count().saturating_sub(1);
    ctx.cursor.current_layer = state.current_layer.min(last_layer);

    ctx.canvas.deselect_all();
    history.clear();
    info!(
        "Active document set ({} layers, frame {}, layer {})",
        ctx.object.layer_count(),
        ctx.cursor.current_frame,
        ctx.cursor.current_layer
    );
}

pub struct EditorPlugin;

impl Plugin for EditorPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Object>()
            .init_resource::<CanvasState>()
            .init_resource::<EditorCursor>()
            .init_resource::<UndoHistory>()
            .init_resource::<Clipboard>()
            .init_resource::<HistoryStatus>()
            .add_message::<UndoRequest>()
            .add_message::<RedoRequest>()
            .add_message::<BackupRequest>()
            .add_message::<MarkModifiedRequest>()
            .add_message::<CopyRequest>()
            .add_message::<PasteRequest>()
            .add_message::<ImportImageRequest>()
            .add_message::<HistoryChanged>()
            .add_message::<FrameUpdated>()
            .add_message::<CurrentFrameChanged>()
            .add_systems(
                Update,
                (
                    (
                        history::handle_backup.run_if(on_message::<BackupRequest>),
                        history::handle_mark_modified.run_if(on_message::<MarkModifiedRequest>),
                        history::handle_undo.run_if(on_message::<UndoRequest>),
                        history::handle_redo.run_if(on_message::<RedoRequest>),
                        clipboard::handle_copy.run_if(on_message::<CopyRequest>),
                        clipboard::handle_paste.run_if(on_message::<PasteRequest>),
                        import::handle_import_image.run_if(on_message::<ImportImageRequest>),
                    )
                        .chain(),
                    history::forward_history_signals,
                )
                    .chain(),
            );
    }
}
