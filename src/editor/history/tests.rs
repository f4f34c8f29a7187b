//! Unit tests for the history module.

use bevy::prelude::*;
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

use crate::object::{BitmapImage, Curve, FrameImage, LayerContent, LayerKind, Object, VectorImage};

use super::super::canvas::{CanvasState, EditorCursor};
use super::{EditContext, HistorySignal, MAX_HISTORY_SIZE, NO_OP_LABEL, UndoHistory};

const BITMAP: usize = 0;
const VECTOR: usize = 1;
const CAMERA: usize = 2;

struct Fixture {
    object: Object,
    canvas: CanvasState,
    cursor: EditorCursor,
    history: UndoHistory,
}

impl Fixture {
    fn new() -> Self {
        let mut object = Object::default();
        object.add_layer(LayerKind::Bitmap, "Paint");
        object.add_layer(LayerKind::Vector, "Lines");
        object.add_layer(LayerKind::Camera, "Camera");
        let mut fixture = Self {
            object,
            canvas: CanvasState::default(),
            cursor: EditorCursor::default(),
            history: UndoHistory::default(),
        };
        fixture.paint(1, 0);
        fixture.object.layer_mut(VECTOR).unwrap().add_key(1);
        fixture.object.layer_mut(CAMERA).unwrap().add_key(1);
        fixture
    }

    /// Overwrite the bitmap at `frame` with a single pixel of `value`.
    fn paint(&mut self, frame: i32, value: u8) {
        let pixels = RgbaImage::from_pixel(1, 1, Rgba([value, value, value, 255]));
        self.object
            .layer_mut(BITMAP)
            .unwrap()
            .replace_image_at_frame(frame, FrameImage::Bitmap(BitmapImage::new(IVec2::ZERO, pixels)));
    }

    fn pixel(&self, frame: i32) -> u8 {
        match self.object.layer(BITMAP).unwrap().image_at_frame(frame, 0) {
            Some(FrameImage::Bitmap(image)) => image.pixel(IVec2::ZERO).map_or(0, |p| p[0]),
            _ => panic!("no bitmap at frame {}", frame),
        }
    }

    /// Backup then paint, the way an edit tool commits a stroke.
    fn edit(&mut self, frame: i32, value: u8) {
        let ctx = EditContext {
            object: &mut self.object,
            canvas: &mut self.canvas,
            cursor: &mut self.cursor,
        };
        self.history.backup_at(&ctx, BITMAP, frame, &format!("paint {}", value));
        self.paint(frame, value);
    }

    fn undo(&mut self) {
        let mut ctx = EditContext {
            object: &mut self.object,
            canvas: &mut self.canvas,
            cursor: &mut self.cursor,
        };
        self.history.undo(&mut ctx);
    }

    fn redo(&mut self) {
        let mut ctx = EditContext {
            object: &mut self.object,
            canvas: &mut self.canvas,
            cursor: &mut self.cursor,
        };
        self.history.redo(&mut ctx);
    }

    fn backup(&mut self, label: &str) {
        let ctx = EditContext {
            object: &mut self.object,
            canvas: &mut self.canvas,
            cursor: &mut self.cursor,
        };
        self.history.backup(&ctx, label);
    }

    fn backup_at(&mut self, layer: usize, frame: i32) -> bool {
        let ctx = EditContext {
            object: &mut self.object,
            canvas: &mut self.canvas,
            cursor: &mut self.cursor,
        };
        self.history.backup_at(&ctx, layer, frame, "edit")
    }
}

#[test]
fn test_new_history_is_empty() {
    let history = UndoHistory::default();
    assert!(history.is_empty());
    assert_eq!(history.current_index(), -1);
    assert!(!history.can_undo());
    assert!(!history.can_redo());
    assert!(history.current_backup().is_none());
}

#[test]
fn test_backup_records_pre_edit_image() {
    let mut f = Fixture::new();
    f.paint(1, 10);
    f.edit(1, 20);

    assert_eq!(f.history.len(), 1);
    assert_eq!(f.history.current_index(), 0);
    let entry = f.history.current_backup().unwrap();
    assert_eq!(entry.undo_label, "paint 20");
    assert_eq!(entry.kind(), LayerKind::Bitmap);
    let FrameImage::Bitmap(image) = &entry.image else {
        panic!("expected a bitmap backup");
    };
    assert_eq!(image.pixel(IVec2::ZERO), Some(Rgba([10, 10, 10, 255])));
}

#[test]
fn test_camera_layer_backup_records_nothing_but_signals() {
    let mut f = Fixture::new();
    assert!(!f.backup_at(CAMERA, 1));
    assert!(f.history.is_empty());
    assert_eq!(f.history.drain_signals(), vec![HistorySignal::HistoryChanged]);
}

#[test]
fn test_frame_without_key_records_nothing() {
    let mut f = Fixture::new();
    f.object.layer_mut(VECTOR).unwrap().content = LayerContent::Vector(Default::default());
    assert!(!f.backup_at(VECTOR, 3));
    assert!(f.history.is_empty());
}

#[cfg(debug_assertions)]
#[test]
#[should_panic(expected = "backup of layer")]
fn test_backup_of_missing_layer_asserts() {
    let mut f = Fixture::new();
    f.backup_at(7, 1);
}

#[test]
fn test_capacity_evicts_oldest_entry() {
    let mut f = Fixture::new();
    for value in 0..MAX_HISTORY_SIZE as u8 {
        f.edit(1, value + 1);
    }
    assert_eq!(f.history.len(), MAX_HISTORY_SIZE);
    assert_eq!(f.history.current_index(), MAX_HISTORY_SIZE as isize - 1);

    f.edit(1, 200);
    assert_eq!(f.history.len(), MAX_HISTORY_SIZE);
    assert_eq!(f.history.current_index(), MAX_HISTORY_SIZE as isize - 1);
    assert_eq!(f.history.entries().next().unwrap().undo_label, "paint 2");
    assert_eq!(f.history.recorded_total(), MAX_HISTORY_SIZE as u64 + 1);
}

#[test]
fn test_undo_restores_previous_content() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    assert_eq!(f.pixel(1), 20);

    f.undo();
    assert_eq!(f.pixel(1), 10);
    f.undo();
    assert_eq!(f.pixel(1), 0);
    assert_eq!(f.history.current_index(), -1);

    // Nothing left to undo
    f.undo();
    assert_eq!(f.pixel(1), 0);
    assert_eq!(f.history.current_index(), -1);
}

#[test]
fn test_undo_then_redo_round_trips_content() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    f.edit(1, 30);

    f.undo();
    let after_first_undo = f.object.clone();
    f.undo();
    f.redo();
    assert_eq!(f.object, after_first_undo);

    f.redo();
    assert_eq!(f.pixel(1), 30);
}

#[test]
fn test_two_undos_from_the_newest_entry() {
    // Entries X, Y, Z hold the content before each of three edits.
    let mut f = Fixture::new();
    f.paint(1, 1);
    f.edit(1, 2);
    f.edit(1, 3);
    f.edit(1, 4);
    assert_eq!((f.history.len(), f.history.current_index()), (3, 2));

    f.undo();
    assert_eq!(f.history.len(), 4);
    assert_eq!(f.history.current_index(), 1);
    assert_eq!(f.pixel(1), 3);
    let labels: Vec<_> = f.history.entries().map(|e| e.undo_label.clone()).collect();
    assert_eq!(labels.last().map(String::as_str), Some(NO_OP_LABEL));

    f.undo();
    assert_eq!(f.history.len(), 4);
    assert_eq!(f.history.current_index(), 0);
    assert_eq!(f.pixel(1), 2);
}

#[test]
fn test_redo_reaches_the_newest_snapshot() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    f.undo();
    f.undo();
    assert_eq!(f.pixel(1), 0);

    f.redo();
    assert_eq!(f.pixel(1), 10);
    f.redo();
    assert_eq!(f.pixel(1), 20);
    assert_eq!(f.history.current_index(), f.history.len() as isize - 2);
    assert!(!f.history.can_redo());

    // At the bound redo does nothing
    f.redo();
    assert_eq!(f.pixel(1), 20);
    assert_eq!(f.history.current_index(), f.history.len() as isize - 2);
}

#[test]
fn test_redo_without_undo_is_noop() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    f.history.drain_signals();

    f.redo();
    assert_eq!(f.pixel(1), 20);
    assert_eq!(f.history.current_index(), 1);
    assert!(f.history.drain_signals().is_empty());
}

#[test]
fn test_new_backup_truncates_redo_branch() {
    let mut f = Fixture::new();
    f.edit(1, 1); // A
    f.edit(1, 2); // B
    f.edit(1, 3); // C
    f.undo();
    f.undo();
    assert_eq!(f.history.current_index(), 0);

    f.edit(1, 9); // D
    assert_eq!(f.history.len(), 2);
    assert_eq!(f.history.current_index(), 1);
    let labels: Vec<_> = f.history.entries().map(|e| e.undo_label.clone()).collect();
    assert_eq!(labels, vec!["paint 1", "paint 9"]);
}

#[test]
fn test_clear_then_undo_redo_are_noops() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    f.history.mark_modified(BITMAP, 1);
    f.history.clear();
    assert!(f.history.is_empty());
    assert_eq!(f.history.current_index(), -1);
    assert!(f.history.last_modified().is_none());

    f.undo();
    f.redo();
    assert_eq!(f.history.current_index(), -1);
    assert_eq!(f.pixel(1), 20);
}

#[test]
fn test_undo_when_newest_snapshot_cannot_be_taken() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    // The frame disappears, so no extra snapshot can be recorded.
    f.object.layer_mut(BITMAP).unwrap().content = LayerContent::Bitmap(Default::default());

    f.undo();
    assert_eq!(f.history.len(), 2);
    assert_eq!(f.history.current_index(), 0);
    assert_eq!(f.pixel(1), 10);
}

#[test]
fn test_undo_after_layer_removal_records_nothing() {
    let mut f = Fixture::new();
    f.edit(1, 10);
    f.edit(1, 20);
    f.object = Object::default();

    f.undo();
    assert_eq!(f.history.len(), 2);
    assert_eq!(f.history.current_index(), 0);
    assert!(f.history.entries().all(|e| e.undo_label != NO_OP_LABEL));
}

#[test]
fn test_undo_at_capacity_evicts_then_new_edit_truncates() {
    let mut f = Fixture::new();
    for value in 1..=MAX_HISTORY_SIZE as u8 {
        f.edit(1, value);
    }

    // The snapshot taken by the first undo pushes the oldest entry out.
    f.undo();
    assert_eq!(f.history.len(), MAX_HISTORY_SIZE);
    assert_eq!(f.history.current_index(), MAX_HISTORY_SIZE as isize - 3);
    assert_eq!(f.history.entries().next().unwrap().undo_label, "paint 2");
    assert_eq!(f.history.entries().last().unwrap().undo_label, NO_OP_LABEL);
    assert_eq!(f.pixel(1), MAX_HISTORY_SIZE as u8 - 1);

    f.redo();
    assert_eq!(f.pixel(1), MAX_HISTORY_SIZE as u8);
    f.undo();
    assert_eq!(f.pixel(1), MAX_HISTORY_SIZE as u8 - 1);
    assert_eq!(f.history.current_index(), MAX_HISTORY_SIZE as isize - 3);

    f.edit(1, 200);
    assert_eq!(f.history.len(), MAX_HISTORY_SIZE - 1);
    assert_eq!(f.history.current_index(), MAX_HISTORY_SIZE as isize - 2);
    assert_eq!(f.history.entries().next().unwrap().undo_label, "paint 2");
    assert_eq!(f.history.entries().last().unwrap().undo_label, "paint 200");
    assert!(!f.history.can_redo());
}

#[test]
fn test_undo_restores_selection_and_moves_cursor() {
    let mut f = Fixture::new();
    f.paint(5, 1);
    f.canvas.set_selection(Rect::new(0.0, 0.0, 8.0, 8.0));
    f.edit(5, 2);
    f.canvas.deselect_all();
    f.cursor.scrub_to(1);
    f.history.drain_signals();

    f.undo();
    assert!(f.canvas.something_selected);
    assert_eq!(f.canvas.selection, Rect::new(0.0, 0.0, 8.0, 8.0));
    assert_eq!(f.cursor.current_frame, 5);

    let signals = f.history.drain_signals();
    assert!(signals.contains(&HistorySignal::FrameUpdated {
        frame: 5,
        vectors: false
    }));
    assert!(signals.contains(&HistorySignal::ScrubTo(5)));
    assert_eq!(signals.last(), Some(&HistorySignal::HistoryChanged));
}

#[test]
fn test_vector_undo_signals_vector_update() {
    let mut f = Fixture::new();
    let ctx = EditContext {
        object: &mut f.object,
        canvas: &mut f.canvas,
        cursor: &mut f.cursor,
    };
    f.history.backup_at(&ctx, VECTOR, 1, "stroke");
    if let Some(image) = f.object.layer_mut(VECTOR).unwrap().vector_at_mut(1) {
        image.curves.push(Curve::new(vec![Vec2::ZERO, Vec2::ONE], 1.0, 0));
    }
    f.history.drain_signals();

    f.undo();
    let Some(FrameImage::Vector(image)) = f.object.layer(VECTOR).unwrap().image_at_frame(1, 0)
    else {
        panic!("expected vector content");
    };
    assert_eq!(image, VectorImage::default());
    assert!(f.history.drain_signals().contains(&HistorySignal::FrameUpdated {
        frame: 1,
        vectors: true
    }));
}

#[test]
fn test_zero_argument_backup_records_current_cell() {
    let mut f = Fixture::new();
    f.backup("draw");
    assert_eq!(f.history.len(), 1);
    let entry = f.history.current_backup().unwrap();
    assert_eq!((entry.layer, entry.frame), (BITMAP, 1));
}

#[test]
fn test_zero_argument_backup_same_cell_records_once() {
    let mut f = Fixture::new();
    f.history.mark_modified(BITMAP, 1);
    f.backup("draw");
    assert_eq!(f.history.len(), 1);
}

#[test]
fn test_zero_argument_backup_closes_out_previous_cell() {
    let mut f = Fixture::new();
    f.paint(4, 7);
    f.history.mark_modified(BITMAP, 1);
    f.cursor.scrub_to(4);

    f.backup("draw");
    let cells: Vec<_> = f.history.entries().map(|e| (e.layer, e.frame)).collect();
    assert_eq!(cells, vec![(BITMAP, 1), (BITMAP, 4)]);
    assert_eq!(f.history.current_index(), 1);
}

#[test]
fn test_zero_argument_backup_skips_stale_last_modified() {
    let mut f = Fixture::new();
    f.history.mark_modified(12, 3);
    f.backup("draw");
    let cells: Vec<_> = f.history.entries().map(|e| (e.layer, e.frame)).collect();
    assert_eq!(cells, vec![(BITMAP, 1)]);
}

#[derive(Debug, Clone)]
enum Op {
    Edit(u8),
    Undo,
    Redo,
    Clear,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => any::<u8>().prop_map(Op::Edit),
        2 => Just(Op::Undo),
        2 => Just(Op::Redo),
        1 => Just(Op::Clear),
    ]
}

proptest! {
    #[test]
    fn history_bounds_hold_for_any_sequence(ops in prop::collection::vec(op_strategy(), 0..80)) {
        let mut f = Fixture::new();
        for op in ops {
            match op {
                Op::Edit(value) => {
                    f.edit(1, value);
                    prop_assert_eq!(f.history.current_index(), f.history.len() as isize - 1);
                }
                Op::Undo => f.undo(),
                Op::Redo => f.redo(),
                Op::Clear => f.history.clear(),
            }
            let len = f.history.len() as isize;
            prop_assert!(f.history.len() <= MAX_HISTORY_SIZE);
            prop_assert!(f.history.current_index() >= -1);
            prop_assert!(f.history.current_index() <= len - 1);
        }
    }

    #[test]
    fn undo_then_redo_is_identity(values in prop::collection::vec(any::<u8>(), 3..30), undos in 1usize..5) {
        let mut f = Fixture::new();
        for value in values {
            f.edit(1, value);
        }
        f.undo();
        for _ in 1..undos {
            let before = f.object.clone();
            if !f.history.can_undo() {
                break;
            }
            f.undo();
            f.redo();
            prop_assert_eq!(&f.object, &before);
            f.undo();
        }
    }
}
