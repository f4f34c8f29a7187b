//! Clipboard data types for copy/paste operations.

use bevy::prelude::*;

use crate::object::{BitmapImage, LayerKind, VectorImage};

/// Copied frame content. Only a layer of the matching kind accepts it.
#[derive(Debug, Clone, PartialEq)]
pub enum ClipboardContent {
    Bitmap(BitmapImage),
    Vector(VectorImage),
}

impl ClipboardContent {
    pub fn kind(&self) -> LayerKind {
        match self {
            ClipboardContent::Bitmap(_) => LayerKind::Bitmap,
            ClipboardContent::Vector(_) => LayerKind::Vector,
        }
    }
}

/// Resource that holds the last copied content
#[derive(Resource, Debug, Default)]
pub struct Clipboard {
    content: Option<ClipboardContent>,
}

impl Clipboard {
    pub fn set(&mut self, content: ClipboardContent) {
        self.content = Some(content);
    }

    pub fn content(&self) -> Option<&ClipboardContent> {
        self.content.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none()
    }

    pub fn clear(&mut self) {
        self.content = None;
    }
}
