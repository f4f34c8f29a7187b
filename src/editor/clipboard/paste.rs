//! Paste clipboard content into the current frame.

use bevy::prelude::*;

use crate::error::EditError;
use crate::object::LayerKind;

use super::super::history::{EditContext, UndoHistory};
use super::super::messages::{FrameUpdated, PasteRequest};
use super::super::params::EditParams;
use super::types::{Clipboard, ClipboardContent};

pub const PASTE_LABEL: &str = "Paste";

/// Paste into the current layer at the current frame.
///
/// A bitmap is moved to the selection's top-left corner when it fits in the
/// selection and scaled into it otherwise. Pasted vector curves become the
/// new selection. A "Paste" backup is recorded before anything changes.
pub fn paste(
    clipboard: &Clipboard,
    history: &mut UndoHistory,
    ctx: &mut EditContext<'_>,
) -> Result<(), EditError> {
    let content = clipboard.content().ok_or(EditError::EmptyClipboard)?;
    let (index, frame) = ctx.cursor.location();
    let kind = ctx
        .object
        .layer(index)
        .ok_or(EditError::NoSuchLayer(index))?
        .kind();
    if kind != content.kind() {
        return Err(EditError::InvalidLayerType(format!(
            "cannot paste {} content into a {} layer",
            content.kind().display_name(),
            kind.display_name()
        )));
    }

    history.backup(ctx, PASTE_LABEL);

    let Some(layer) = ctx.object.layer_mut(index) else {
        return Err(EditError::NoSuchLayer(index));
    };
    if layer.last_key_position(frame, 0).is_none() {
        layer.add_key(frame);
    }

    match content {
        ClipboardContent::Bitmap(image) => {
            let mut to_paste = image.clone();
            if ctx.canvas.something_selected {
                let selection = ctx.canvas.selection;
                if image.width() as f32 <= selection.width()
                    && image.height() as f32 <= selection.height()
                {
                    to_paste.move_top_left(selection.min.round().as_ivec2());
                } else {
                    to_paste = to_paste.transform_into(selection);
                }
            }
            if let Some(target) = layer.bitmap_at_mut(frame) {
                target.paste(&to_paste);
            }
        }
        ClipboardContent::Vector(image) => {
            ctx.canvas.deselect_all();
            if let Some(target) = layer.vector_at_mut(frame) {
                target.paste(image);
                if let Some(rect) = target.selection_rect() {
                    ctx.canvas.set_selection(rect);
                }
            }
        }
    }

    history.mark_modified(index, frame);
    ctx.object.set_modified(true);
    debug!("Pasted {} content at frame {}", kind.display_name(), frame);
    Ok(())
}

pub fn handle_paste(
    mut requests: MessageReader<PasteRequest>,
    clipboard: Res<Clipboard>,
    mut history: ResMut<UndoHistory>,
    mut edit: EditParams,
    mut frame_updated: MessageWriter<FrameUpdated>,
) {
    for _ in requests.read() {
        let mut ctx = edit.context();
        match paste(&clipboard, &mut history, &mut ctx) {
            Ok(()) => {
                frame_updated.write(FrameUpdated {
                    frame: ctx.cursor.current_frame,
                    vectors: clipboard
                        .content()
                        .is_some_and(|c| c.kind() == LayerKind::Vector),
                });
            }
            Err(e) => warn!("Paste failed: {}", e),
        }
    }
}
