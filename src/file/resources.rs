//! Resources reporting the outcome of the last load or save.

use bevy::prelude::*;

/// Message of the last failed load, cleared by the next attempt.
#[derive(Resource, Default)]
pub struct DocumentLoadError {
    pub message: Option<String>,
}

/// Message of the last failed save, cleared by the next attempt.
#[derive(Resource, Default)]
pub struct DocumentSaveError {
    pub message: Option<String>,
}
