//! Temporary folder an archive is extracted into or assembled in.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Component, Path, PathBuf};

use bevy::prelude::*;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

use crate::constants::MAX_EXTRACT_SIZE;
use crate::error::{FileError, FileResult};

/// A scratch folder owned by the persistence engine.
///
/// Creating one purges whatever a previous run left at the same path. The
/// folder is deleted when the value is dropped.
#[derive(Debug)]
pub struct WorkingFolder {
    path: PathBuf,
}

impl WorkingFolder {
    pub fn create(path: PathBuf) -> FileResult<Self> {
        if path.exists() {
            debug!("Purging stale working folder {:?}", path);
            std::fs::remove_dir_all(&path)?;
        }
        std::fs::create_dir_all(&path)?;
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.path.join(relative)
    }

    /// Extract `archive` into this folder.
    ///
    /// Every entry is checked before anything is written: absolute names and
    /// names climbing out with `..` are rejected, as are archives whose
    /// uncompressed size exceeds [`MAX_EXTRACT_SIZE`].
    pub fn unzip(&self, archive: &Path) -> FileResult<()> {
        let file = File::open(archive).map_err(|e| FileError::cannot_open(archive, e))?;
        let mut zip = ZipArchive::new(file)?;

        let mut total_size: u64 = 0;
        for i in 0..zip.len() {
            let entry = zip.by_index(i)?;
            if !is_safe_path(entry.name()) {
                return Err(FileError::invalid_document(format!(
                    "archive entry '{}' points outside the document",
                    entry.name()
                )));
            }
            total_size = total_size.saturating_add(entry.size());
        }
        if total_size > MAX_EXTRACT_SIZE {
            return Err(FileError::invalid_document(format!(
                "archive expands to {} MB (max {} MB)",
                total_size / (1024 * 1024),
                MAX_EXTRACT_SIZE / (1024 * 1024)
            )));
        }

        for i in 0..zip.len() {
            let mut entry = zip.by_index(i)?;
            let out_path = self.path.join(entry.name());
            if entry.is_dir() {
                std::fs::create_dir_all(&out_path)?;
                continue;
            }
            if let Some(parent) = out_path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut out = File::create(&out_path)?;
            std::io::copy(&mut entry, &mut out)?;
        }

        debug!("Extracted {} entries into {:?}", zip.len(), self.path);
        Ok(())
    }

    /// Zip the folder's contents into `target`.
    ///
    /// The archive is written next to the target first and renamed over it
    /// once complete, so a failed compression leaves `target` as it was.
    pub fn compress_into(&self, target: &Path) -> FileResult<()> {
        let mut partial = target.as_os_str().to_os_string();
        partial.push(".part");
        let partial = PathBuf::from(partial);

        let result = self.write_zip(&partial);
        if let Err(e) = result {
            let _ = std::fs::remove_file(&partial);
            return Err(e);
        }
        std::fs::rename(&partial, target)?;
        debug!("Compressed {:?} into {:?}", self.path, target);
        Ok(())
    }

    fn write_zip(&self, destination: &Path) -> FileResult<()> {
        let file = File::create(destination).map_err(|e| FileError::cannot_open(destination, e))?;
        let mut zip = ZipWriter::new(file);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        add_directory(&mut zip, &self.path, &self.path, options)?;
        zip.finish()?;
        Ok(())
    }
}

impl Drop for WorkingFolder {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!("Failed to remove working folder {:?}: {}", self.path, e);
            }
        } else {
            debug!("Removed working folder {:?}", self.path);
        }
    }
}

fn add_directory(
    zip: &mut ZipWriter<File>,
    base: &Path,
    current: &Path,
    options: SimpleFileOptions,
) -> FileResult<()> {
    let mut entries = std::fs::read_dir(current)?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());

    for entry in entries {
        let path = entry.path();
        let name = archive_name(base, &path);
        if path.is_dir() {
            zip.add_directory(format!("{}/", name), options)?;
            add_directory(zip, base, &path, options)?;
        } else {
            zip.start_file(name, options)?;
            let mut buffer = Vec::new();
            File::open(&path)?.read_to_end(&mut buffer)?;
            zip.write_all(&buffer)?;
        }
    }
    Ok(())
}

/// Entry name of `path` relative to `base`, always with forward slashes.
fn archive_name(base: &Path, path: &Path) -> String {
    path.strip_prefix(base)
        .unwrap_or(path)
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn is_safe_path(name: &str) -> bool {
    let path = Path::new(name);
    if path.is_absolute() || name.starts_with('/') || name.starts_with('\\') {
        return false;
    }
    !path
        .components()
        .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
}
