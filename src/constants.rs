//! Centralized constants used across the crate.
//!
//! File format names and limits that are shared between the undo engine,
//! the persistence engine and the configuration layer.

/// Number of undo levels kept in the history
pub const MAX_UNDO_LEVELS: usize = 20;

/// Extension of the legacy flat XML document
pub const LEGACY_EXTENSION: &str = ".pcl";

/// Name of the data folder: sidecar suffix for legacy files, subfolder inside archives
pub const DATA_DIR_NAME: &str = "data";

/// Main XML file at the root of an extracted archive
pub const MAIN_XML_FILE_NAME: &str = "main.xml";

/// Folder under the system temp directory that holds working folders
pub const TEMP_ROOT_DIR_NAME: &str = "Pencil2D";

/// Suffix appended to an archive's base name to form its working folder
pub const WORKING_FOLDER_SUFFIX: &str = ".Y2xD";

/// Document type written to every main XML file
pub const DOCTYPE_CURRENT: &str = "PencilDocument";

/// Document type used by very old files, still accepted on load
pub const DOCTYPE_LEGACY: &str = "MyObject";

/// Palette file name inside the data folder
pub const PALETTE_FILE_NAME: &str = "palette.xml";

/// Indentation width of written XML files
pub const XML_INDENT_SIZE: usize = 2;

/// Maximum total size of extracted archive contents (2 GB).
pub const MAX_EXTRACT_SIZE: u64 = 2 * 1024 * 1024 * 1024;

/// Maximum number of recent documents to remember in config
pub const MAX_RECENT_DOCUMENTS: usize = 10;

/// Default number of recorded edits between auto-saves
pub const DEFAULT_AUTO_SAVE_NUMBER: u32 = 20;
