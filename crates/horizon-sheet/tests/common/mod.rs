//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use horizon_sheet::widget::MemoryClipboard;
use horizon_sheet::{CellValue, Sheet, SheetOptions};

/// Route `tracing` output through the test harness; `RUST_LOG` filters it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A sheet with an in-memory clipboard and a sized viewport.
pub fn sheet_with(rows: Vec<Vec<CellValue>>) -> (Sheet, MemoryClipboard) {
    init_tracing();
    let clipboard = MemoryClipboard::new();
    let sheet = Sheet::new(SheetOptions::default())
        .with_clipboard(Box::new(clipboard.clone()))
        .with_viewport(800.0, 600.0)
        .with_data(rows);
    (sheet, clipboard)
}

/// `rows x columns` integers numbered row-major from zero.
pub fn numbered(rows: usize, columns: usize) -> Vec<Vec<CellValue>> {
    (0..rows)
        .map(|r| (0..columns).map(|c| CellValue::Int((r * columns + c) as i64)).collect())
        .collect()
}

/// Everything an undo must put back: values, labels, sizes and visibility.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetState {
    pub cells: Vec<Vec<CellValue>>,
    pub rows: usize,
    pub columns: usize,
    pub row_sizes: Vec<f64>,
    pub column_sizes: Vec<f64>,
    pub hidden_rows: Vec<usize>,
    pub hidden_columns: Vec<usize>,
}

pub fn state(sheet: &Sheet) -> SheetState {
    SheetState {
        cells: sheet.data().rows().to_vec(),
        rows: sheet.total_rows(),
        columns: sheet.total_columns(),
        row_sizes: sheet.row_layout().positions().sizes(),
        column_sizes: sheet.column_layout().positions().sizes(),
        hidden_rows: sheet.row_layout().hidden(sheet.total_rows()),
        hidden_columns: sheet.column_layout().hidden(sheet.total_columns()),
    }
}

/// Displayed text of one data column, top to bottom.
pub fn column_text(sheet: &Sheet, column: usize) -> Vec<String> {
    (0..sheet.total_rows())
        .map(|r| sheet.cell_text(r, column).unwrap_or_default())
        .collect()
}
