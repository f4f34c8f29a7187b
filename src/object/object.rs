use std::path::{Path, PathBuf};

use bevy::prelude::*;

use super::editor_state::EditorState;
use super::layer::{Layer, LayerKind};
use super::palette::Palette;
use super::xml::XmlElement;
use crate::error::FileResult;

/// The open document: an ordered stack of layers plus its palette.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Object {
    layers: Vec<Layer>,
    pub palette: Palette,
    pub file_path: Option<PathBuf>,
    pub modified: bool,
    pub editor_state: Option<EditorState>,
    next_layer_id: i32,
}

impl Default for Object {
    fn default() -> Self {
        Self {
            layers: Vec::new(),
            palette: Palette::default(),
            file_path: None,
            modified: false,
            editor_state: None,
            next_layer_id: 1,
        }
    }
}

impl Object {
    /// A fresh document with the default palette and one layer of each
    /// drawable kind plus a camera.
    pub fn new_document() -> Self {
        let mut object = Self::default();
        object.load_default_palette();
        object.add_layer(LayerKind::Camera, "Camera Layer");
        object.add_layer(LayerKind::Vector, "Vector Layer");
        object.add_layer(LayerKind::Bitmap, "Bitmap Layer");
        for layer in &mut object.layers {
            layer.add_key(1);
        }
        object
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Append a new empty layer and return its index.
    pub fn add_layer(&mut self, kind: LayerKind, name: impl Into<String>) -> usize {
        let id = self.next_layer_id;
        self.next_layer_id += 1;
        self.layers.push(Layer::new(id, kind, name));
        self.layers.len() - 1
    }

    fn push_loaded_layer(&mut self, layer: Layer) {
        self.next_layer_id = self.next_layer_id.max(layer.id + 1);
        self.layers.push(layer);
    }

    pub fn load_palette(&mut self, data_dir: &Path) -> bool {
        match Palette::load(data_dir) {
            Some(palette) => {
                self.palette = palette;
                true
            }
            None => false,
        }
    }

    pub fn load_default_palette(&mut self) {
        self.palette = Palette::pencil_default();
    }

    pub fn save_palette(&self, data_dir: &Path) -> FileResult<()> {
        self.palette.save(data_dir)
    }

    /// Populate layers from an `<object>` element (or an old-format root).
    pub fn load_xml(&mut self, element: &XmlElement, data_dir: &Path) -> FileResult<()> {
        for child in element.children_named("layer") {
            if let Some(layer) = Layer::from_xml(child, data_dir)? {
                self.push_loaded_layer(layer);
            }
        }
        debug!("Loaded {} layers", self.layers.len());
        Ok(())
    }

    pub fn save_xml(&self) -> XmlElement {
        let mut element = XmlElement::new("object");
        element
            .children
            .extend(self.layers.iter().map(Layer::to_xml));
        element
    }

    pub fn set_file_path(&mut self, path: impl Into<PathBuf>) {
        self.file_path = Some(path.into());
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }
}
