//! Document persistence in the legacy and archive container formats.
//!
//! A legacy document is a flat XML file next to a `<file>.data/` folder of
//! frame assets. An archive is a zip of the same layout with the XML stored
//! as `main.xml`. Loading sniffs the format from the file contents, saving
//! picks it from the file name.
//!
//! ## Module Structure
//!
//! - [`format`] - Format detection and the legacy data folder name
//! - [`working_folder`] - Scratch folder for extraction and compression
//! - [`manager`] - FileManager resource: the load/save engine
//! - [`messages`] - Request and notification messages
//! - [`resources`] - Error reporting resources
//! - `load` / `save` - Bevy systems driving the engine
//!
//! ## Systems
//!
//! - [`load_document_system`] - Loads and activates a document
//! - [`save_document_system`] - Saves the active document
//! - [`auto_save_system`] - Periodic save driven by the undo history

pub mod format;
mod load;
pub mod manager;
pub mod messages;
pub mod resources;
mod save;
pub mod working_folder;


use bevy::prelude::*;

use crate::config::UpdateLastDocumentPathRequest;

// Re-exports - Types
pub use format::{DocumentFormat, detect_format};
pub use manager::FileManager;
pub use messages::{
    DocumentLoaded, DocumentSaved, LoadDocumentRequest, LoadProgress, SaveDocumentRequest,
};
pub use resources::{DocumentLoadError, DocumentSaveError};
pub use working_folder::WorkingFolder;

// Re-exports - Systems
pub use load::load_document_system;
pub use save::{auto_save_system, save_document_system};

/// Registers the persistence engine. Expects [`crate::editor::EditorPlugin`]
/// to provide the document and history resources.
pub struct FilePlugin;

impl Plugin for FilePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<FileManager>()
            .init_resource::<DocumentLoadError>()
            .init_resource::<DocumentSaveError>()
            .add_message::<LoadDocumentRequest>()
            .add_message::<SaveDocumentRequest>()
            .add_message::<LoadProgress>()
            .add_message::<DocumentLoaded>()
            .add_message::<DocumentSaved>()
            .add_message::<UpdateLastDocumentPathRequest>()
            .add_systems(
                Update,
                (
                    load_document_system.run_if(on_message::<LoadDocumentRequest>),
                    auto_save_system,
                    save_document_system.run_if(on_message::<SaveDocumentRequest>),
                )
                    .chain(),
            );
    }
}
