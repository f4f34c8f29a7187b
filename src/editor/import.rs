//! Import image files into the current layer.

use std::path::Path;

use bevy::prelude::*;

use crate::error::{EditError, FileError};
use crate::object::{BitmapImage, LayerKind, VectorImage};

use super::history::{EditContext, UndoHistory};
use super::messages::{FrameUpdated, ImportImageRequest};
use super::params::EditParams;

pub const IMPORT_LABEL: &str = "Import Image";

/// Import `path` into the current layer at the current frame.
///
/// Bitmap layers decode any raster format the `image` crate reads and paste
/// it centred on `centre`, then step the cursor one frame forward. Vector
/// layers read a `.vec` file and paste its curves as the new selection. A
/// key is created at the current frame when none exists.
pub fn import_image(
    history: &mut UndoHistory,
    ctx: &mut EditContext<'_>,
    path: &Path,
    centre: IVec2,
) -> Result<(), EditError> {
    let (index, frame) = ctx.cursor.location();
    let kind = ctx
        .object
        .layer(index)
        .ok_or(EditError::NoSuchLayer(index))?
        .kind();
    if !kind.has_images() {
        return Err(EditError::InvalidLayerType(format!(
            "cannot import an image into a {} layer",
            kind.display_name()
        )));
    }
    if !path.exists() {
        return Err(FileError::FileNotFound(path.to_path_buf()).into());
    }

    match kind {
        LayerKind::Bitmap => {
            let pixels = image::open(path).map_err(FileError::from)?.to_rgba8();
            let half = IVec2::new(pixels.width() as i32 / 2, pixels.height() as i32 / 2);
            let imported = BitmapImage::new(centre - half, pixels);

            history.backup(ctx, IMPORT_LABEL);
            if let Some(layer) = ctx.object.layer_mut(index) {
                layer.add_key(frame);
                if let Some(target) = layer.bitmap_at_mut(frame) {
                    target.paste(&imported);
                }
            }
            ctx.cursor.scrub_to(frame + 1);
        }
        _ => {
            let mut imported = VectorImage::read(path)?;
            imported.select_all();

            history.backup(ctx, IMPORT_LABEL);
            if let Some(layer) = ctx.object.layer_mut(index) {
                layer.add_key(frame);
                if let Some(target) = layer.vector_at_mut(frame) {
                    target.paste(&imported);
                }
            }
        }
    }

    history.mark_modified(index, frame);
    ctx.object.set_modified(true);
    info!("Imported {} into layer {} at frame {}", path.display(), index, frame);
    Ok(())
}

pub fn handle_import_image(
    mut requests: MessageReader<ImportImageRequest>,
    mut history: ResMut<UndoHistory>,
    mut edit: EditParams,
    mut frame_updated: MessageWriter<FrameUpdated>,
) {
    for request in requests.read() {
        let mut ctx = edit.context();
        let frame = ctx.cursor.current_frame;
        match import_image(&mut history, &mut ctx, &request.path, request.centre) {
            Ok(()) => {
                frame_updated.write(FrameUpdated {
                    frame,
                    vectors: false,
                });
            }
            Err(e) => warn!("Import of {} failed: {}", request.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::editor::canvas::{CanvasState, EditorCursor};
    use crate::object::{Curve, FrameImage, Object};

    fn run(
        object: &mut Object,
        cursor: &mut EditorCursor,
        history: &mut UndoHistory,
        path: &Path,
    ) -> Result<(), EditError> {
        let mut canvas = CanvasState::default();
        let mut ctx = EditContext {
            object,
            canvas: &mut canvas,
            cursor,
        };
        import_image(history, &mut ctx, path, IVec2::new(10, 10))
    }

    #[test]
    fn test_bitmap_import_is_centred_and_advances_cursor() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dot.png");
        RgbaImage::from_pixel(4, 2, Rgba([9, 9, 9, 255])).save(&path).unwrap();

        let mut object = Object::default();
        object.add_layer(LayerKind::Bitmap, "Paint");
        let mut cursor = EditorCursor::default();
        let mut history = UndoHistory::default();
        run(&mut object, &mut cursor, &mut history, &path).unwrap();

        let Some(FrameImage::Bitmap(image)) = object.layer(0).unwrap().image_at_frame(1, 0) else {
            panic!("expected bitmap content");
        };
        assert_eq!(image.bounds(), IRect::new(8, 9, 12, 11));
        assert_eq!(cursor.current_frame, 2);
        assert!(object.modified);
        assert_eq!(history.last_modified(), Some((0, 1)));
    }

    #[test]
    fn test_vector_import_pastes_selected_curves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shape.vec");
        VectorImage {
            curves: vec![Curve::new(vec![Vec2::ZERO, Vec2::splat(5.0)], 2.0, 1)],
        }
        .write(&path)
        .unwrap();

        let mut object = Object::default();
        let index = object.add_layer(LayerKind::Vector, "Lines");
        object.layer_mut(index).unwrap().add_key(1);
        let mut cursor = EditorCursor::default();
        let mut history = UndoHistory::default();
        run(&mut object, &mut cursor, &mut history, &path).unwrap();

        let Some(FrameImage::Vector(image)) = object.layer(index).unwrap().image_at_frame(1, 0) else {
            panic!("expected vector content");
        };
        assert_eq!(image.curves.len(), 1);
        assert!(image.curves[0].selected);
        assert_eq!(cursor.current_frame, 1);
        assert_eq!(history.current_backup().unwrap().undo_label, IMPORT_LABEL);
    }

    #[test]
    fn test_import_into_camera_layer_fails() {
        let mut object = Object::default();
        object.add_layer(LayerKind::Camera, "Camera");
        let mut cursor = EditorCursor::default();
        let mut history = UndoHistory::default();
        let err = run(&mut object, &mut cursor, &mut history, Path::new("any.png")).unwrap_err();
        assert!(matches!(err, EditError::InvalidLayerType(_)));
        assert!(history.is_empty());
    }

    #[test]
    fn test_import_missing_file_fails_without_backup() {
        let mut object = Object::default();
        object.add_layer(LayerKind::Bitmap, "Paint");
        let mut cursor = EditorCursor::default();
        let mut history = UndoHistory::default();
        let err = run(&mut object, &mut cursor, &mut history, Path::new("/no/such/file.png"))
            .unwrap_err();
        assert!(matches!(err, EditError::File(FileError::FileNotFound(_))));
        assert!(!object.modified);
    }
}
