//! Bevy systems driving the undo history.

use bevy::prelude::*;

use crate::object::Object;

use super::super::messages::{
    BackupRequest, CurrentFrameChanged, FrameUpdated, HistoryChanged, MarkModifiedRequest,
    RedoRequest, UndoRequest,
};
use super::super::params::EditParams;
use super::super::HistoryStatus;
use super::{HistorySignal, UndoHistory};

pub fn handle_undo(
    mut requests: MessageReader<UndoRequest>,
    mut history: ResMut<UndoHistory>,
    mut edit: EditParams,
) {
    for _ in requests.read() {
        history.undo(&mut edit.context());
    }
}

pub fn handle_redo(
    mut requests: MessageReader<RedoRequest>,
    mut history: ResMut<UndoHistory>,
    mut edit: EditParams,
) {
    for _ in requests.read() {
        history.redo(&mut edit.context());
    }
}

pub fn handle_backup(
    mut requests: MessageReader<BackupRequest>,
    mut history: ResMut<UndoHistory>,
    mut edit: EditParams,
) {
    for request in requests.read() {
        let ctx = edit.context();
        match request.target {
            Some((layer, frame)) if layer < ctx.object.layer_count() => {
                history.backup_at(&ctx, layer, frame, &request.label);
            }
            Some((layer, _)) => warn!("Ignoring backup of missing layer {}", layer),
            None => history.backup(&ctx, &request.label),
        }
    }
}

pub fn handle_mark_modified(
    mut requests: MessageReader<MarkModifiedRequest>,
    mut history: ResMut<UndoHistory>,
    mut object: ResMut<Object>,
) {
    for request in requests.read() {
        history.mark_modified(request.layer, request.frame);
        object.set_modified(true);
    }
}

/// Turn queued history signals into messages and refresh [`HistoryStatus`].
pub fn forward_history_signals(
    mut history: ResMut<UndoHistory>,
    mut status: ResMut<HistoryStatus>,
    mut history_changed: MessageWriter<HistoryChanged>,
    mut frame_updated: MessageWriter<FrameUpdated>,
    mut frame_changed: MessageWriter<CurrentFrameChanged>,
) {
    let signals = history.drain_signals();
    if signals.is_empty() {
        return;
    }

    for signal in signals {
        match signal {
            HistorySignal::HistoryChanged => {
                history_changed.write(HistoryChanged);
            }
            HistorySignal::FrameUpdated { frame, vectors } => {
                frame_updated.write(FrameUpdated { frame, vectors });
            }
            HistorySignal::ScrubTo(frame) => {
                frame_changed.write(CurrentFrameChanged { frame });
            }
        }
    }

    *status = HistoryStatus::from_history(&history);
}
