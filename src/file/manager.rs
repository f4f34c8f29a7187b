//! The persistence engine: loading and saving whole documents.

use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::format::{DocumentFormat, detect_format, format_for_save, legacy_data_dir};
use super::working_folder::WorkingFolder;
use crate::constants::{DATA_DIR_NAME, DOCTYPE_CURRENT, DOCTYPE_LEGACY, MAIN_XML_FILE_NAME};
use crate::error::{FileError, FileResult};
use crate::object::xml::{XmlElement, read_document, write_document};
use crate::object::{EditorState, LayerKind, Object};
use crate::paths::{temp_root, working_folder_for};

/// Root tags accepted for documents written before the `<document>` wrapper
/// existed. `MyOject` is how very old files spell it.
const OLD_ROOT_TAGS: [&str; 2] = ["object", "MyOject"];

/// Loads and saves documents in both container formats.
///
/// After a successful archive load the extracted working folder is kept
/// until [`FileManager::clean_up_working_folder`] or the next archive
/// operation releases it.
#[derive(Resource, Debug)]
pub struct FileManager {
    temp_root: PathBuf,
    last_working_folder: Option<WorkingFolder>,
}

impl Default for FileManager {
    fn default() -> Self {
        Self::with_temp_root(temp_root())
    }
}

impl FileManager {
    /// Engine whose working folders live under `root` instead of the system
    /// temp directory.
    pub fn with_temp_root(root: impl Into<PathBuf>) -> Self {
        Self {
            temp_root: root.into(),
            last_working_folder: None,
        }
    }

    /// Folder holding the extracted contents of the last loaded archive.
    pub fn working_folder(&self) -> Option<&Path> {
        self.last_working_folder.as_ref().map(WorkingFolder::path)
    }

    pub fn clean_up_working_folder(&mut self) {
        self.last_working_folder = None;
    }

    pub fn load(&mut self, path: &Path) -> FileResult<Object> {
        self.load_with_progress(path, |_| {})
    }

    /// Load the document at `path`, reporting progress as a fraction.
    ///
    /// Progress is reported once at the start and once on success.
    pub fn load_with_progress(
        &mut self,
        path: &Path,
        mut progress: impl FnMut(f32),
    ) -> FileResult<Object> {
        if !path.exists() {
            return Err(FileError::FileNotFound(path.to_path_buf()));
        }
        progress(0.0);
        info!("Loading document {:?}", path);

        let format = detect_format(path);
        debug!("Detected {:?} format", format);

        let mut object = match format {
            DocumentFormat::Legacy => read_main_xml(path, &legacy_data_dir(path))?,
            DocumentFormat::Archive => {
                self.clean_up_working_folder();
                let folder = WorkingFolder::create(working_folder_for(&self.temp_root, path))?;
                folder.unzip(path)?;
                let object =
                    read_main_xml(&folder.join(MAIN_XML_FILE_NAME), &folder.join(DATA_DIR_NAME))?;
                self.last_working_folder = Some(folder);
                object
            }
        };

        object.set_file_path(path);
        object.set_modified(false);
        progress(1.0);
        info!("Loaded {:?} ({} layers)", path, object.layer_count());
        Ok(object)
    }

    /// Save `object` to `path`.
    ///
    /// Paths ending in `.pcl` get the legacy layout, everything else is
    /// written as an archive. On success the document remembers `path` and
    /// is marked unmodified.
    pub fn save(&mut self, object: &mut Object, path: &Path) -> FileResult<()> {
        if path.is_dir() {
            return Err(FileError::InvalidTarget(format!(
                "{} is a directory",
                path.display()
            )));
        }

        let format = format_for_save(path);
        info!("Saving {:?} as {:?}", path, format);

        match format {
            DocumentFormat::Legacy => {
                let data_dir = legacy_data_dir(path);
                std::fs::create_dir_all(&data_dir)?;
                write_contents(object, path, &data_dir)?;
            }
            DocumentFormat::Archive => {
                self.clean_up_working_folder();
                let folder = WorkingFolder::create(working_folder_for(&self.temp_root, path))?;
                let data_dir = folder.join(DATA_DIR_NAME);
                std::fs::create_dir_all(&data_dir)?;
                write_contents(object, &folder.join(MAIN_XML_FILE_NAME), &data_dir)?;
                folder.compress_into(path)?;
            }
        }

        object.set_file_path(path);
        object.set_modified(false);
        info!("Saved {:?}", path);
        Ok(())
    }
}

/// Parse a main XML file into a fresh document whose assets live in
/// `data_dir`.
fn read_main_xml(main_xml: &Path, data_dir: &Path) -> FileResult<Object> {
    let document = read_document(main_xml)?;

    match document.doctype.as_deref() {
        Some(DOCTYPE_CURRENT) | Some(DOCTYPE_LEGACY) => {}
        other => {
            return Err(FileError::invalid_document(format!(
                "unexpected document type {:?}",
                other.unwrap_or("<none>")
            )));
        }
    }
    let root = document
        .root
        .ok_or_else(|| FileError::invalid_document("no root element"))?;

    let mut object = Object::default();
    if !object.load_palette(data_dir) {
        object.load_default_palette();
    }

    if root.name == "document" {
        for child in &root.children {
            match child.name.as_str() {
                "object" => object.load_xml(child, data_dir)?,
                "editor" => object.editor_state = Some(EditorState::from_xml(child)),
                other => {
                    return Err(FileError::invalid_document(format!(
                        "unexpected <{}> in <document>",
                        other
                    )));
                }
            }
        }
    } else if OLD_ROOT_TAGS.contains(&root.name.as_str()) {
        object.load_xml(&root, data_dir)?;
    } else {
        return Err(FileError::invalid_document(format!(
            "unexpected root element <{}>",
            root.name
        )));
    }

    Ok(object)
}

/// Write frame assets and the palette into `data_dir`, then the main XML.
fn write_contents(object: &Object, main_xml: &Path, data_dir: &Path) -> FileResult<()> {
    for layer in object.layers() {
        match layer.kind() {
            LayerKind::Bitmap | LayerKind::Vector | LayerKind::Sound => layer.save(data_dir)?,
            LayerKind::Camera => {}
        }
    }
    object.save_palette(data_dir)?;

    let root = XmlElement::new("document").with_child(object.save_xml());
    let bytes = write_document(DOCTYPE_CURRENT, &root)?;
    std::fs::write(main_xml, bytes).map_err(|e| FileError::cannot_open(main_xml, e))?;
    Ok(())
}
