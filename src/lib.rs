//! Undo history and document persistence core of a frame-by-frame
//! animation editor.
//!
//! - [`editor`] - undo/redo, clipboard and import on the active document
//! - [`file`] - loading and saving `.pcl` / `.pclx` documents
//! - [`object`] - the document model (layers, frames, palette)
//! - [`config`] - persisted application settings

pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod file;
pub mod object;
pub mod paths;
