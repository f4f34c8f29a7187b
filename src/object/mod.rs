//! In-memory document model.
//!
//! ## Module Structure
//!
//! - [`xml`] - Element tree used by every XML file in a document
//! - `object` - The document resource and its layer stack
//! - `layer` - Layer variants and keyframe lookup
//! - `bitmap` / `vector` - Frame image content
//! - `palette` - Named colours stored in `palette.xml`
//! - `editor_state` - The `<editor>` session block

mod bitmap;
mod editor_state;
mod layer;
#[allow(clippy::module_inception)]
mod object;
mod palette;
mod vector;
pub mod xml;


pub use bitmap::BitmapImage;
pub use editor_state::EditorState;
pub use layer::{CameraKey, FrameImage, Layer, LayerContent, LayerKind, SoundClip};
pub use object::Object;
pub use palette::{ColourRef, Palette};
pub use vector::{Curve, VectorImage};
