//! Horizon Sheet - a virtualized spreadsheet grid widget core.
//!
//! The crate holds everything a spreadsheet-style table needs except the
//! pixels: cell storage, row and column layout with hidden elements, per-cell
//! options, multi-box selection, in-place editing, undo/redo, structural
//! edits that keep named spans attached, delimited-text clipboard transfer,
//! and a redraw pass that only touches the visible cells. The host toolkit
//! feeds pointer and key input in and draws the primitives that come out.
//!
//! # Example
//!
//! ```
//! use horizon_sheet::model::{CellOption, DropdownSpec, NamedSpan};
//! use horizon_sheet::widget::MemoryClipboard;
//! use horizon_sheet::{CellValue, Sheet, SheetOptions, cells};
//!
//! let mut sheet = Sheet::new(SheetOptions::default())
//!     .with_clipboard(Box::new(MemoryClipboard::new()))
//!     .with_viewport(800.0, 600.0)
//!     .with_data(vec![
//!         cells!["apple", 3, "fruit"],
//!         cells!["carrot", 7, "vegetable"],
//!     ]);
//!
//! // The third column only accepts listed values, wherever it moves.
//! let kinds = DropdownSpec::new(cells!["fruit", "vegetable"]);
//! sheet
//!     .add_span(NamedSpan::columns("kind", 2..3).with_option(CellOption::Dropdown(kinds)))
//!     .unwrap();
//!
//! assert!(!sheet.edit_cell(0, 2, "mineral"));
//! assert!(sheet.edit_cell(0, 1, "5"));
//! sheet.move_columns(0, &[2]);
//! let span = sheet.span("kind").unwrap();
//! assert_eq!((span.from_c, span.upto_c), (0, 1));
//!
//! sheet.undo();
//! sheet.undo();
//! assert_eq!(sheet.get_cell(0, 1).unwrap(), &CellValue::Int(3));
//! ```
//!
//! # Logging
//!
//! The crate logs through `tracing` under the targets in
//! [`horizon_sheet_core::logging::targets`]; install any subscriber to see
//! them, e.g. `RUST_LOG=horizon_sheet::history=debug`.

pub mod config;
pub mod error;
pub mod model;
pub mod widget;

pub use config::{FontSpec, FontStyle, Palette, SheetOptions, TextWrap};
pub use error::{ClipboardError, FormatError, Result, SheetError};
pub use model::{CellValue, Region, SelectionKind};
pub use widget::{Modifiers, Sheet, SheetEvent, SheetKey};
