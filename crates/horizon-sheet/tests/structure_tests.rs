//! Row and column insertion, deletion and moves with named spans attached.

mod common;

use horizon_sheet::model::{CellOption, Highlight, NamedSpan, OptionKind, OptionTarget};
use horizon_sheet::widget::{EventKind, SheetEvent};
use horizon_sheet::{CellValue, SheetError, cells};
use horizon_sheet_core::Color;
use parking_lot::Mutex;
use std::sync::Arc;

use common::{column_text, numbered, sheet_with};

#[test]
fn test_moving_a_column_past_a_span_shifts_it() {
    let (mut sheet, _) = sheet_with(numbered(2, 4));
    let highlight = Highlight::bg(Color::from_rgb8(255, 240, 200));
    sheet
        .add_span(NamedSpan::columns("totals", 1..3).with_option(CellOption::Highlight(highlight)))
        .unwrap();

    assert!(sheet.move_columns(3, &[0]));

    let span = sheet.span("totals").unwrap();
    assert_eq!((span.from_c, span.upto_c), (0, 2));
    assert!(sheet.cell_options().highlight(0, 0).is_some());
    assert!(sheet.cell_options().highlight(0, 1).is_some());
    assert!(sheet.cell_options().highlight(0, 3).is_none());
    assert_eq!(column_text(&sheet, 3), ["0", "4"]);

    sheet.undo();
    let span = sheet.span("totals").unwrap();
    assert_eq!((span.from_c, span.upto_c), (1, 3));
    assert!(sheet.cell_options().highlight(0, 0).is_none());
}

#[test]
fn test_deleting_a_spanned_row_range_drops_the_span() {
    let (mut sheet, _) = sheet_with(numbered(5, 2));
    sheet
        .add_span(NamedSpan::rows("locked", 1..3).with_option(CellOption::Readonly))
        .unwrap();
    assert!(!sheet.edit_cell(2, 0, "nope"));

    sheet.delete_rows(&[1, 2]);
    assert!(matches!(sheet.span("locked"), Err(SheetError::SpanNotFound(_))));
    assert!((0..3).all(|r| sheet.cell_options().resolve(r, 0, OptionKind::Readonly).is_none()));

    sheet.undo();
    assert!(sheet.span("locked").is_ok());
    assert!(!sheet.edit_cell(2, 0, "nope"));
}

#[test]
fn test_cell_options_follow_their_rows() {
    let (mut sheet, _) = sheet_with(numbered(4, 2));
    sheet.set_option(OptionTarget::Cell(3, 1), CellOption::Readonly);
    sheet.insert_rows(0, 2, None);
    assert!(sheet.cell_options().is_readonly(5, 1));
    sheet.move_rows(0, &[5]);
    assert!(sheet.cell_options().is_readonly(0, 1));
    assert!(!sheet.cell_options().is_readonly(5, 1));
}

#[test]
fn test_structure_events() {
    let (mut sheet, _) = sheet_with(numbered(3, 3));
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    sheet.events().connect_any(move |event| match event {
        SheetEvent::RowsInserted(e) | SheetEvent::RowsDeleted(e) => sink.lock().push((event.kind(), e.indices.clone())),
        SheetEvent::ColumnsMoved(e) => sink.lock().push((event.kind(), e.old_to_new.clone())),
        _ => {}
    });

    sheet.insert_rows(1, 2, None);
    sheet.delete_rows(&[0, 4]);
    sheet.move_columns(0, &[2]);

    assert_eq!(
        seen.lock().as_slice(),
        &[
            (EventKind::RowsInserted, vec![1, 2]),
            (EventKind::RowsDeleted, vec![0, 4]),
            (EventKind::ColumnsMoved, vec![1, 2, 0]),
        ]
    );
}

#[test]
fn test_header_labels_follow_columns() {
    let (mut sheet, _) = sheet_with(numbered(2, 3));
    sheet.set_header_labels(horizon_sheet::model::Labels::Values(cells!["a", "b", "c"]));
    sheet.move_columns(0, &[2]);
    let labels: Vec<CellValue> = (0..3).filter_map(|c| sheet.header_label(c).cloned()).collect();
    assert_eq!(labels, cells!["c", "a", "b"]);
    sheet.delete_columns(&[1]);
    assert_eq!(sheet.header_label(1), Some(&CellValue::from("b")));
}
