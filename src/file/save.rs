//! Save and auto-save systems.

use bevy::prelude::*;

use super::manager::FileManager;
use super::messages::{DocumentSaved, SaveDocumentRequest};
use super::resources::DocumentSaveError;
use crate::config::{AppConfig, UpdateLastDocumentPathRequest};
use crate::editor::UndoHistory;
use crate::object::Object;

pub fn save_document_system(
    mut events: MessageReader<SaveDocumentRequest>,
    mut manager: ResMut<FileManager>,
    object: Option<ResMut<Object>>,
    mut save_error: ResMut<DocumentSaveError>,
    mut saved: MessageWriter<DocumentSaved>,
    mut remember: MessageWriter<UpdateLastDocumentPathRequest>,
) {
    let Some(mut object) = object else {
        for event in events.read() {
            let message = format!("Nothing to save to {}", event.path.display());
            error!("{}", message);
            save_error.message = Some(message);
        }
        return;
    };

    for event in events.read() {
        save_error.message = None;
        match manager.save(&mut object, &event.path) {
            Ok(()) => {
                saved.write(DocumentSaved {
                    path: event.path.clone(),
                });
                remember.write(UpdateLastDocumentPathRequest {
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                let message = format!("Failed to save {}: {}", event.path.display(), e);
                error!("{}", message);
                save_error.message = Some(message);
            }
        }
    }
}

/// Request a save of the open document every `auto_save_number` recorded
/// history entries, when auto-save is enabled and the document has a path.
pub fn auto_save_system(
    history: Res<UndoHistory>,
    config: Option<Res<AppConfig>>,
    object: Res<Object>,
    mut last_saved_at: Local<u64>,
    mut requests: MessageWriter<SaveDocumentRequest>,
) {
    let Some(config) = config else {
        return;
    };
    if !config.data.auto_save {
        *last_saved_at = history.recorded_total();
        return;
    }

    let interval = u64::from(config.data.auto_save_number.max(1));
    if history.recorded_total() < *last_saved_at + interval {
        return;
    }
    *last_saved_at = history.recorded_total();

    if let Some(path) = &object.file_path
        && object.modified
    {
        debug!("Auto-saving {:?}", path);
        requests.write(SaveDocumentRequest { path: path.clone() });
    }
}
