//! Error types for document persistence and editing operations.

use std::path::PathBuf;

pub type FileResult<T> = Result<T, FileError>;

/// Failure of a load or save operation.
#[derive(thiserror::Error, Debug)]
pub enum FileError {
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("cannot open {path}: {source}")]
    CannotOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid xml: {0}")]
    InvalidXml(String),

    #[error("invalid pencil document: {0}")]
    InvalidDocument(String),

    #[error("invalid layer type: {0}")]
    InvalidLayerType(String),

    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

impl FileError {
    pub fn invalid_xml(msg: impl Into<String>) -> Self {
        Self::InvalidXml(msg.into())
    }

    pub fn invalid_document(msg: impl Into<String>) -> Self {
        Self::InvalidDocument(msg.into())
    }

    pub fn cannot_open(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::CannotOpen {
            path: path.into(),
            source,
        }
    }
}

/// Failure of an edit operation (paste, import).
#[derive(thiserror::Error, Debug)]
pub enum EditError {
    #[error("no layer at index {0}")]
    NoSuchLayer(usize),

    #[error("invalid layer type: {0}")]
    InvalidLayerType(String),

    #[error("clipboard is empty")]
    EmptyClipboard,

    #[error(transparent)]
    File(#[from] FileError),
}
