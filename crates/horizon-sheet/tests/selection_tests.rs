//! Multi-box selection driven through the sheet.

mod common;

use horizon_sheet::widget::{Deselect, Pane};
use horizon_sheet::{Modifiers, Region, SelectionKind, SheetKey};

use common::{numbered, sheet_with};

fn regions(sheet: &horizon_sheet::Sheet) -> Vec<Region> {
    let mut regions: Vec<Region> = sheet.selection().boxes().map(|(_, b)| b.region).collect();
    regions.sort_by_key(|r| (r.from_r, r.from_c));
    regions
}

#[test]
fn test_partial_deselect_splits_box() {
    let (mut sheet, _) = sheet_with(numbered(5, 5));
    sheet.add_selection(Region::new(1, 1, 4, 4), SelectionKind::Cells);

    assert!(sheet.deselect(Deselect::Cell(2, 2)));

    let left = regions(&sheet);
    let covered: usize = left.iter().map(|r| r.height() * r.width()).sum();
    assert_eq!(covered, 8);
    assert!(!sheet.selection().is_cell_selected(2, 2));
    for (r, c) in Region::new(1, 1, 4, 4).cells().filter(|&cell| cell != (2, 2)) {
        assert!(sheet.selection().is_cell_selected(r, c), "({r}, {c}) lost");
    }
}

#[test]
fn test_deselect_column_from_row_selection() {
    let (mut sheet, _) = sheet_with(numbered(4, 3));
    sheet.select_rows(1..3);
    sheet.deselect(Deselect::Column(1));

    assert!(!sheet.selection().is_row_selected(1));
    assert!(sheet.selection().is_cell_selected(1, 0));
    assert!(sheet.selection().is_cell_selected(2, 2));
    assert!(!sheet.selection().is_cell_selected(2, 1));
}

#[test]
fn test_ctrl_click_adds_boxes_and_shift_extends() {
    let (mut sheet, _) = sheet_with(numbered(10, 5));
    let (w, h) = (sheet.options().default_column_width, sheet.options().default_row_height);
    let at = |r: usize, c: usize| (c as f64 * w + 5.0, r as f64 * h + 5.0);

    let (x, y) = at(0, 0);
    sheet.pointer_press(Pane::Table, x, y, Modifiers::default());
    sheet.pointer_release(Pane::Table, x, y);

    let (x, y) = at(5, 2);
    let ctrl = Modifiers { ctrl: true, ..Modifiers::default() };
    sheet.pointer_press(Pane::Table, x, y, ctrl);
    sheet.pointer_release(Pane::Table, x, y);

    let (x, y) = at(7, 3);
    let shift = Modifiers { shift: true, ..Modifiers::default() };
    sheet.pointer_press(Pane::Table, x, y, shift);
    sheet.pointer_release(Pane::Table, x, y);

    assert_eq!(regions(&sheet), [Region::cell(0, 0), Region::new(5, 2, 8, 4)]);
    assert_eq!(sheet.selection().current(), Some((5, 2)));
}

#[test]
fn test_header_click_selects_column() {
    let (mut sheet, _) = sheet_with(numbered(6, 4));
    let w = sheet.options().default_column_width;
    sheet.pointer_press(Pane::Header, 2.0 * w + w / 2.0, 10.0, Modifiers::default());
    sheet.pointer_release(Pane::Header, 2.0 * w + w / 2.0, 10.0);

    assert!(sheet.selection().is_column_selected(2));
    assert_eq!(sheet.selection().selected_columns().into_iter().collect::<Vec<_>>(), [2]);
}

#[test]
fn test_keyboard_select_all_and_move() {
    let (mut sheet, _) = sheet_with(numbered(3, 3));
    assert!(sheet.key_press(SheetKey::SelectAll));
    assert_eq!(regions(&sheet), [Region::new(0, 0, 3, 3)]);

    sheet.key_press(SheetKey::Right);
    assert_eq!(regions(&sheet), [Region::cell(0, 1)]);
}

#[test]
fn test_selection_survives_hidden_rows_as_displayed_indices() {
    let (mut sheet, _) = sheet_with(numbered(6, 2));
    sheet.hide_rows(&[1]);
    sheet.select_cell(1, 0);
    // Displayed row 1 is data row 2.
    assert!(sheet.key_press(SheetKey::Delete));
    assert!(sheet.get_cell(2, 0).unwrap().is_empty());
    assert!(!sheet.get_cell(1, 0).unwrap().is_empty());
}
