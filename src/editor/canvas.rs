//! Canvas selection state and the timeline cursor.

use bevy::prelude::*;

use crate::object::{LayerContent, Object};

/// Selection rectangles of the drawing canvas.
///
/// Backup entries store a copy of this so undo can put the selection back
/// where it was when the edit started.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Default)]
pub struct CanvasState {
    pub something_selected: bool,
    pub selection: Rect,
    pub transformed_selection: Rect,
    /// Transform preview while a selection is being dragged
    pub temp_transformed_selection: Rect,
}

impl CanvasState {
    pub fn set_selection(&mut self, rect: Rect) {
        self.something_selected = true;
        self.selection = rect;
        self.transformed_selection = rect;
        self.temp_transformed_selection = rect;
    }

    pub fn deselect_all(&mut self) {
        *self = Self::default();
    }

    /// Drop any pending transform and snap both transform rectangles back
    /// onto the selection.
    pub fn cancel_transformed_selection(&mut self) {
        if self.something_selected {
            self.transformed_selection = self.selection;
            self.temp_transformed_selection = self.selection;
        }
    }

    /// Recompute the selection from the content of `layer` at `frame`.
    /// Only vector layers carry a selection of their own (selected curves).
    pub fn calculate_selection_rect(&mut self, object: &Object, layer: usize, frame: i32) {
        let Some(layer) = object.layer(layer) else {
            return;
        };
        let LayerContent::Vector(images) = &layer.content else {
            return;
        };
        let rect = layer
            .last_key_position(frame, 0)
            .and_then(|key| images.get(&key))
            .and_then(|image| image.selection_rect());
        match rect {
            Some(rect) => self.set_selection(rect),
            None => self.deselect_all(),
        }
    }
}

/// Current position on the timeline.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorCursor {
    pub current_layer: usize,
    pub current_frame: i32,
}

impl Default for EditorCursor {
    fn default() -> Self {
        Self {
            current_layer: 0,
            current_frame: 1,
        }
    }
}

impl EditorCursor {
    /// Move to `frame`. Frames are numbered from 1.
    pub fn scrub_to(&mut self, frame: i32) {
        self.current_frame = frame.max(1);
    }

    pub fn location(&self) -> (usize, i32) {
        (self.current_layer, self.current_frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::{Curve, FrameImage, LayerKind, VectorImage};

    #[test]
    fn test_scrub_to_clamps_to_first_frame() {
        let mut cursor = EditorCursor::default();
        cursor.scrub_to(12);
        assert_eq!(cursor.current_frame, 12);
        cursor.scrub_to(0);
        assert_eq!(cursor.current_frame, 1);
        cursor.scrub_to(-4);
        assert_eq!(cursor.current_frame, 1);
    }

    #[test]
    fn test_cancel_transform_snaps_back_to_selection() {
        let mut canvas = CanvasState::default();
        canvas.set_selection(Rect::new(0.0, 0.0, 10.0, 10.0));
        canvas.temp_transformed_selection = Rect::new(5.0, 5.0, 30.0, 30.0);
        canvas.transformed_selection = Rect::new(5.0, 5.0, 30.0, 30.0);

        canvas.cancel_transformed_selection();
        assert_eq!(canvas.transformed_selection, canvas.selection);
        assert_eq!(canvas.temp_transformed_selection, canvas.selection);
    }

    #[test]
    fn test_selection_rect_follows_selected_curves() {
        let mut object = Object::default();
        let index = object.add_layer(LayerKind::Vector, "Lines");
        let mut image = VectorImage {
            curves: vec![Curve::new(vec![Vec2::new(1.0, 2.0), Vec2::new(4.0, 8.0)], 1.0, 0)],
        };
        image.select_all();
        object
            .layer_mut(index)
            .unwrap()
            .replace_image_at_frame(1, FrameImage::Vector(image));

        let mut canvas = CanvasState::default();
        canvas.calculate_selection_rect(&object, index, 3);
        assert!(canvas.something_selected);
        assert_eq!(canvas.selection, Rect::new(1.0, 2.0, 4.0, 8.0));
    }

    #[test]
    fn test_selection_rect_clears_without_selected_curves() {
        let mut object = Object::default();
        let index = object.add_layer(LayerKind::Vector, "Lines");
        object.layer_mut(index).unwrap().add_key(1);

        let mut canvas = CanvasState::default();
        canvas.set_selection(Rect::new(0.0, 0.0, 1.0, 1.0));
        canvas.calculate_selection_rect(&object, index, 1);
        assert!(!canvas.something_selected);
    }

    #[test]
    fn test_selection_rect_ignores_bitmap_layers() {
        let mut object = Object::default();
        let index = object.add_layer(LayerKind::Bitmap, "Paint");
        let mut canvas = CanvasState::default();
        canvas.set_selection(Rect::new(0.0, 0.0, 2.0, 2.0));
        canvas.calculate_selection_rect(&object, index, 1);
        assert!(canvas.something_selected);
    }
}
