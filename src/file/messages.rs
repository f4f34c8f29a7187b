//! Message types for document persistence.

use bevy::prelude::*;
use std::path::PathBuf;

#[derive(Message)]
pub struct LoadDocumentRequest {
    pub path: PathBuf,
}

#[derive(Message)]
pub struct SaveDocumentRequest {
    pub path: PathBuf,
}

/// Load progress as a fraction between 0 and 1.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct LoadProgress {
    pub fraction: f32,
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct DocumentLoaded {
    pub path: PathBuf,
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct DocumentSaved {
    pub path: PathBuf,
}
