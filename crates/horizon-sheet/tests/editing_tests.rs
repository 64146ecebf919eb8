//! Typing into cells through the keyboard path.

mod common;

use std::sync::Arc;

use horizon_sheet::model::{CellOption, DropdownSpec, FormatKind, FormatSpec, OptionTarget};
use horizon_sheet::widget::{CloseKey, EditRequest, EditTarget, EditorState, Validation};
use horizon_sheet::{CellValue, SheetKey, cells};

use common::{numbered, sheet_with};

fn type_text(sheet: &mut horizon_sheet::Sheet, text: &str) {
    for ch in text.chars() {
        sheet.key_press(SheetKey::Char(ch));
    }
}

#[test]
fn test_type_and_commit_with_return_and_tab() {
    let (mut sheet, _) = sheet_with(numbered(3, 3));
    sheet.select_cell(0, 0);

    type_text(&mut sheet, "42");
    sheet.key_press(SheetKey::Return);
    assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::Int(42));
    assert_eq!(sheet.selection().current(), Some((1, 0)));

    type_text(&mut sheet, "hi");
    sheet.key_press(SheetKey::Tab);
    assert_eq!(sheet.get_cell(1, 0).unwrap(), &CellValue::from("hi"));
    assert_eq!(sheet.selection().current(), Some((1, 1)));
    assert_eq!(sheet.editor().state(), EditorState::Closed);
}

#[test]
fn test_backspace_edits_open_text() {
    let (mut sheet, _) = sheet_with(numbered(2, 2));
    sheet.select_cell(1, 1);
    sheet.key_press(SheetKey::Return);
    assert_eq!(sheet.editor_text(), Some("3"));
    sheet.key_press(SheetKey::Backspace);
    type_text(&mut sheet, "7");
    sheet.key_press(SheetKey::Return);
    assert_eq!(sheet.get_cell(1, 1).unwrap(), &CellValue::Int(7));
}

#[test]
fn test_dropdown_keyboard_choice() {
    let (mut sheet, _) = sheet_with(vec![cells!["low"], cells!["high"]]);
    let levels = DropdownSpec::new(cells!["low", "medium", "high"]).with_editable(true);
    sheet.set_option(OptionTarget::Column(0), CellOption::Dropdown(levels));

    sheet.select_cell(0, 0);
    type_text(&mut sheet, "me");
    // Return takes the highlighted completion.
    sheet.key_press(SheetKey::Return);
    assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::from("medium"));

    sheet.select_cell(1, 0);
    type_text(&mut sheet, "xyz");
    sheet.close_editor(CloseKey::Tab);
    assert_eq!(sheet.get_cell(1, 0).unwrap(), &CellValue::from("high"));
}

#[test]
fn test_formatted_column_parses_input() {
    let (mut sheet, _) = sheet_with(numbered(2, 2));
    let money = FormatSpec::new(FormatKind::Int).with_thousands_sep(',');
    sheet.set_option(OptionTarget::Column(1), CellOption::Format(money));

    assert!(sheet.edit_cell(0, 1, "1,250"));
    assert_eq!(sheet.get_cell(0, 1).unwrap(), &CellValue::Int(1250));
    assert_eq!(sheet.cell_text(0, 1).unwrap(), "1,250");
}

#[test]
fn test_validator_sees_header_edits() {
    let (mut sheet, _) = sheet_with(numbered(2, 2));
    sheet.set_validator(Some(Arc::new(|request: &EditRequest| match request.target {
        EditTarget::Header => Validation::Accept(CellValue::from(request.text.to_uppercase())),
        _ => Validation::Accept(request.value.clone()),
    })));

    assert!(sheet.open_header_editor(1));
    sheet.set_editor_text("price");
    sheet.key_press(SheetKey::Return);
    assert_eq!(sheet.header_label(1), Some(&CellValue::from("PRICE")));
}
