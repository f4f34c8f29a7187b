//! SystemParam bundle for systems that edit the document.
//!
//! Undo, redo, paste and import all need the document, the canvas selection
//! and the timeline cursor at once; [`EditParams`] hands them out together as
//! an [`EditContext`].

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::object::Object;

use super::canvas::{CanvasState, EditorCursor};
use super::history::EditContext;

#[derive(SystemParam)]
pub struct EditParams<'w> {
    pub object: ResMut<'w, Object>,
    pub canvas: ResMut<'w, CanvasState>,
    pub cursor: ResMut<'w, EditorCursor>,
}

impl EditParams<'_> {
    pub fn context(&mut self) -> EditContext<'_> {
        EditContext {
            object: &mut self.object,
            canvas: &mut self.canvas,
            cursor: &mut self.cursor,
        }
    }
}
