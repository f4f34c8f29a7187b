//! Clipboard service for copy/paste of frame content.
//!
//! The clipboard holds at most one payload, tagged with the kind of layer
//! it came from. Pasting into a layer of another kind is an error.
//!
//! ## Module Structure
//!
//! - [`types`] - Clipboard resource and payload type
//! - [`copy`] - Copy operation and system
//! - [`paste`] - Paste operation and system

mod copy;
mod paste;
mod types;


// Re-exports - Types
pub use types::{Clipboard, ClipboardContent};

// Re-exports - Operations and systems
pub use copy::{copy, handle_copy};
pub use paste::{PASTE_LABEL, handle_paste, paste};
