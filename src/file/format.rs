//! Telling the two container formats apart.

use std::fs::File;
use std::path::{Path, PathBuf};

use zip::ZipArchive;

use crate::constants::{DATA_DIR_NAME, LEGACY_EXTENSION};

/// On-disk container of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Flat XML file with a `<file>.data/` sidecar folder
    Legacy,
    /// Zip archive holding `main.xml` and a `data/` folder
    Archive,
}

/// Sniff the format of an existing file.
///
/// Anything that opens as a zip archive with at least one entry is an
/// archive. Unreadable files and empty archives count as legacy documents,
/// the XML parser reports the real problem later.
pub fn detect_format(path: &Path) -> DocumentFormat {
    let Ok(file) = File::open(path) else {
        return DocumentFormat::Legacy;
    };
    match ZipArchive::new(file) {
        Ok(archive) if !archive.is_empty() => DocumentFormat::Archive,
        _ => DocumentFormat::Legacy,
    }
}

/// Format written by a save to `path`, chosen by file name alone.
pub fn format_for_save(path: &Path) -> DocumentFormat {
    if path.to_string_lossy().ends_with(LEGACY_EXTENSION) {
        DocumentFormat::Legacy
    } else {
        DocumentFormat::Archive
    }
}

/// Sidecar folder of a legacy document: the full file name plus `.data`.
pub fn legacy_data_dir(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".");
    name.push(DATA_DIR_NAME);
    PathBuf::from(name)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::ZipWriter;
    use zip::write::SimpleFileOptions;

    use super::*;

    #[test]
    fn test_zip_with_entries_is_archive() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.bin");
        let mut zip = ZipWriter::new(File::create(&path).unwrap());
        zip.start_file("main.xml", SimpleFileOptions::default()).unwrap();
        zip.write_all(b"<document/>").unwrap();
        zip.finish().unwrap();

        assert_eq!(detect_format(&path), DocumentFormat::Archive);
    }

    #[test]
    fn test_empty_zip_is_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pclx");
        ZipWriter::new(File::create(&path).unwrap()).finish().unwrap();

        assert_eq!(detect_format(&path), DocumentFormat::Legacy);
    }

    #[test]
    fn test_plain_xml_is_legacy() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.pclx");
        std::fs::write(&path, "<!DOCTYPE PencilDocument><document/>").unwrap();

        assert_eq!(detect_format(&path), DocumentFormat::Legacy);
    }

    #[test]
    fn test_save_format_follows_suffix() {
        assert_eq!(format_for_save(Path::new("a/b.pcl")), DocumentFormat::Legacy);
        assert_eq!(format_for_save(Path::new("a/b.pclx")), DocumentFormat::Archive);
        assert_eq!(format_for_save(Path::new("a/b")), DocumentFormat::Archive);
    }

    #[test]
    fn test_legacy_data_dir_appends_to_full_name() {
        assert_eq!(
            legacy_data_dir(Path::new("/films/walk.pcl")),
            PathBuf::from("/films/walk.pcl.data")
        );
    }
}
