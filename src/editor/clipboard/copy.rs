//! Copy the current frame (or its selection) to the clipboard.

use bevy::prelude::*;

use crate::error::EditError;
use crate::object::FrameImage;

use super::super::history::EditContext;
use super::super::messages::CopyRequest;
use super::super::params::EditParams;
use super::types::{Clipboard, ClipboardContent};

/// Bitmap layers copy the selected area, or the whole image when nothing is
/// selected. Vector layers always copy the whole image.
pub fn copy(clipboard: &mut Clipboard, ctx: &EditContext<'_>) -> Result<(), EditError> {
    let (index, frame) = ctx.cursor.location();
    let layer = ctx.object.layer(index).ok_or(EditError::NoSuchLayer(index))?;
    if !layer.kind().has_images() {
        return Err(EditError::InvalidLayerType(format!(
            "cannot copy from a {} layer",
            layer.kind().display_name()
        )));
    }

    match layer.image_at_frame(frame, 0) {
        Some(FrameImage::Bitmap(image)) => {
            let copied = if ctx.canvas.something_selected {
                let selection = ctx.canvas.selection;
                image.copy_rect(IRect::from_corners(
                    selection.min.floor().as_ivec2(),
                    selection.max.ceil().as_ivec2(),
                ))
            } else {
                image
            };
            clipboard.set(ClipboardContent::Bitmap(copied));
        }
        Some(FrameImage::Vector(image)) => clipboard.set(ClipboardContent::Vector(image)),
        None => debug!(
            "Nothing to copy on {} layer {} at frame {}",
            layer.kind().display_name(),
            index,
            frame
        ),
    }
    Ok(())
}

pub fn handle_copy(
    mut requests: MessageReader<CopyRequest>,
    mut clipboard: ResMut<Clipboard>,
    mut edit: EditParams,
) {
    for _ in requests.read() {
        if let Err(e) = copy(&mut clipboard, &edit.context()) {
            warn!("Copy failed: {}", e);
        }
    }
}
