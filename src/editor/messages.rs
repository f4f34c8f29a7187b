//! Message types for editing operations and history notifications.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct UndoRequest;

#[derive(Message)]
pub struct RedoRequest;

/// Snapshot a frame before editing it. Without a target the current cell
/// (and the last modified cell, if different) is recorded.
#[derive(Message)]
pub struct BackupRequest {
    pub label: String,
    pub target: Option<(usize, i32)>,
}

/// Sent after an edit has been committed to a frame.
#[derive(Message)]
pub struct MarkModifiedRequest {
    pub layer: usize,
    pub frame: i32,
}

#[derive(Message)]
pub struct CopyRequest;

#[derive(Message)]
pub struct PasteRequest;

/// Import an image file into the current layer, centred on `centre`.
#[derive(Message)]
pub struct ImportImageRequest {
    pub path: PathBuf,
    pub centre: IVec2,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryChanged;

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameUpdated {
    pub frame: i32,
    /// Vector layers at this frame need redrawing too
    pub vectors: bool,
}

#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentFrameChanged {
    pub frame: i32,
}
