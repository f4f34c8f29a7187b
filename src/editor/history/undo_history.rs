//! Undo history resource: a bounded list of backups and a cursor.

use std::collections::VecDeque;

use bevy::prelude::*;

use super::backup_element::BackupElement;
use super::{EditContext, HistorySignal, MAX_HISTORY_SIZE, NO_OP_LABEL};

/// Linear undo history.
///
/// `index` points at the most recently applied entry, -1 when none is.
/// Entries after `index` form the redo branch and are dropped by the next
/// backup.
#[derive(Resource, Debug)]
pub struct UndoHistory {
    entries: VecDeque<BackupElement>,
    index: isize,
    /// Cell of the last committed edit, used by [`UndoHistory::backup`]
    last_modified: Option<(usize, i32)>,
    signals: Vec<HistorySignal>,
    recorded_total: u64,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self {
            entries: VecDeque::with_capacity(MAX_HISTORY_SIZE),
            index: -1,
            last_modified: None,
            signals: Vec::new(),
            recorded_total: 0,
        }
    }
}

impl UndoHistory {
    /// Record the image at `(layer, frame)` before it is edited.
    ///
    /// The redo branch is discarded and the oldest entry evicted when the
    /// history is full. Nothing is recorded for sound or camera layers or
    /// frames without content. Returns whether an entry was appended.
    pub fn backup_at(
        &mut self,
        ctx: &EditContext<'_>,
        layer: usize,
        frame: i32,
        label: &str,
    ) -> bool {
        self.entries.truncate((self.index + 1) as usize);
        while self.entries.len() >= MAX_HISTORY_SIZE {
            self.entries.pop_front();
            self.index -= 1;
        }

        debug_assert!(
            layer < ctx.object.layer_count(),
            "backup of layer {} but the document has {} layers",
            layer,
            ctx.object.layer_count()
        );

        let image = ctx
            .object
            .layer(layer)
            .and_then(|l| l.image_at_frame(frame, 0));
        let recorded = match image {
            Some(image) => {
                self.entries.push_back(BackupElement {
                    layer,
                    frame,
                    undo_label: label.to_string(),
                    selection: *ctx.canvas,
                    image,
                });
                self.index = self.entries.len() as isize - 1;
                self.recorded_total += 1;
                debug!("Backup '{}' of layer {} frame {}", label, layer, frame);
                true
            }
            None => false,
        };

        self.signals.push(HistorySignal::HistoryChanged);
        recorded
    }

    /// Record the current cell, first closing out the last modified cell
    /// when the cursor has moved away from it.
    pub fn backup(&mut self, ctx: &EditContext<'_>, label: &str) {
        let current = ctx.cursor.location();
        let last = self
            .last_modified
            .filter(|&(layer, frame)| frame > 0 && layer < ctx.object.layer_count());

        if let Some((layer, frame)) = last {
            self.backup_at(ctx, layer, frame, label);
        }
        if self.last_modified != Some(current) {
            self.backup_at(ctx, current.0, current.1, label);
        }
    }

    pub fn undo(&mut self, ctx: &mut EditContext<'_>) {
        if self.entries.is_empty() || self.index < 0 {
            return;
        }

        // At the newest entry the document holds an edit that was never
        // snapshotted. Record it so redo can return to it.
        if self.index as usize == self.entries.len() - 1 {
            let (layer, frame) = {
                let last = &self.entries[self.index as usize];
                (last.layer, last.frame)
            };
            let recorded = layer < ctx.object.layer_count()
                && self.backup_at(ctx, layer, frame, NO_OP_LABEL);
            if recorded {
                self.index -= 1;
            }
        }

        self.entries[self.index as usize].restore(ctx, &mut self.signals);
        self.index -= 1;

        ctx.canvas.cancel_transformed_selection();
        let (layer, frame) = ctx.cursor.location();
        ctx.canvas.calculate_selection_rect(&*ctx.object, layer, frame);
        self.signals.push(HistorySignal::HistoryChanged);
    }

    /// Step forward. The entry after the next one is restored since every
    /// entry holds the state from before its edit.
    pub fn redo(&mut self, ctx: &mut EditContext<'_>) {
        if !self.can_redo() {
            return;
        }
        self.index += 1;
        self.entries[(self.index + 1) as usize].restore(ctx, &mut self.signals);
        self.signals.push(HistorySignal::HistoryChanged);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.index = -1;
        self.last_modified = None;
        self.signals.push(HistorySignal::HistoryChanged);
    }

    /// Remember the cell an edit was just committed to.
    pub fn mark_modified(&mut self, layer: usize, frame: i32) {
        self.last_modified = Some((layer, frame));
    }

    pub fn last_modified(&self) -> Option<(usize, i32)> {
        self.last_modified
    }

    pub fn drain_signals(&mut self) -> Vec<HistorySignal> {
        std::mem::take(&mut self.signals)
    }

    pub fn can_undo(&self) -> bool {
        !self.entries.is_empty() && self.index >= 0
    }

    pub fn can_redo(&self) -> bool {
        !self.entries.is_empty() && self.index < self.entries.len() as isize - 2
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn current_index(&self) -> isize {
        self.index
    }

    pub fn current_backup(&self) -> Option<&BackupElement> {
        usize::try_from(self.index)
            .ok()
            .and_then(|i| self.entries.get(i))
    }

    pub fn entries(&self) -> impl Iterator<Item = &BackupElement> {
        self.entries.iter()
    }

    /// Number of entries ever recorded, unaffected by eviction or clear.
    pub fn recorded_total(&self) -> u64 {
        self.recorded_total
    }
}
