//! A single recorded pre-edit snapshot.

use crate::object::{FrameImage, LayerKind};

use super::super::canvas::CanvasState;
use super::{EditContext, HistorySignal};

/// Image content of one frame captured before an edit, with the selection
/// that was active at the time.
#[derive(Debug, Clone, PartialEq)]
pub struct BackupElement {
    pub layer: usize,
    pub frame: i32,
    pub undo_label: String,
    pub selection: CanvasState,
    pub image: FrameImage,
}

impl BackupElement {
    pub fn kind(&self) -> LayerKind {
        self.image.kind()
    }

    /// Write the snapshot back into the document and canvas, then move the
    /// cursor to the restored frame.
    pub(super) fn restore(&self, ctx: &mut EditContext<'_>, signals: &mut Vec<HistorySignal>) {
        if let Some(layer) = ctx.object.layer_mut(self.layer)
            && layer.kind() == self.kind()
        {
            layer.replace_image_at_frame(self.frame, self.image.clone());
        }
        *ctx.canvas = self.selection;

        ctx.cursor.scrub_to(self.frame);
        signals.push(HistorySignal::FrameUpdated {
            frame: self.frame,
            vectors: self.kind() == LayerKind::Vector,
        });
        signals.push(HistorySignal::ScrubTo(self.frame));
    }
}
