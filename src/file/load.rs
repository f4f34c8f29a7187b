//! Load system.

use bevy::prelude::*;

use super::manager::FileManager;
use super::messages::{DocumentLoaded, LoadDocumentRequest, LoadProgress};
use super::resources::DocumentLoadError;
use crate::config::UpdateLastDocumentPathRequest;
use crate::editor::{EditParams, UndoHistory, set_object};

pub fn load_document_system(
    mut events: MessageReader<LoadDocumentRequest>,
    mut manager: ResMut<FileManager>,
    mut history: ResMut<UndoHistory>,
    mut edit: EditParams,
    mut load_error: ResMut<DocumentLoadError>,
    mut progress: MessageWriter<LoadProgress>,
    mut loaded: MessageWriter<DocumentLoaded>,
    mut remember: MessageWriter<UpdateLastDocumentPathRequest>,
) {
    for event in events.read() {
        load_error.message = None;

        let result = manager.load_with_progress(&event.path, |fraction| {
            progress.write(LoadProgress { fraction });
        });
        match result {
            Ok(object) => {
                set_object(&mut history, &mut edit.context(), object);
                loaded.write(DocumentLoaded {
                    path: event.path.clone(),
                });
                remember.write(UpdateLastDocumentPathRequest {
                    path: event.path.clone(),
                });
            }
            Err(e) => {
                let message = format!("Failed to load {}: {}", event.path.display(), e);
                error!("{}", message);
                load_error.message = Some(message);
            }
        }
    }
}
