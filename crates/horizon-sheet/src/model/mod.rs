//! Data side of the sheet.
//!
//! Everything here is free of rendering and input concerns:
//!
//! - `PositionIndex`: cumulative pixel boundaries for one axis
//! - `DisplayMapping`: which data rows/columns are displayed, in order
//! - `AxisLayout`: the two above plus sizes of hidden elements
//! - `DataGrid`: the cell store with header and index labels
//! - `OptionsRegistry`: dropdown, checkbox, format, highlight, align and
//!   readonly options with cell > row > column > global precedence
//! - `SpanRegistry`: named regions that carry an option across structural edits
//! - `IndexRemap`: old-to-new index mappings shared by every keyed structure
//! - `History`: bounded undo/redo stacks
//!
//! Row and column indices are *data* indices unless a name says otherwise.

mod axis;
mod cell;
mod data;
mod display;
mod format;
mod history;
mod options;
mod position;
mod region;
pub mod remap;
mod span;

pub use axis::{Axis, AxisLayout, RemovedSlot};
pub use cell::{CellValue, parse_bool_like};
pub use data::{DataGrid, Labels};
pub use display::DisplayMapping;
pub use format::{CellFormatter, FormatKind, FormatSpec, InvalidPolicy, localize_number};
pub use history::{
    CellOrder, CellSnapshot, ElementSnapshot, EventName, History, MovedBlock, SelectedBox,
    SelectionSnapshot, StructuralBlock, UndoEntry,
};
pub use options::{
    Align, CellOption, CheckboxSpec, DropdownSpec, Highlight, OptionKind, OptionSet,
    OptionTarget, OptionsRegistry, SearchFn, default_search,
};
pub use position::{PositionIndex, positions_for, stretch_to_fill};
pub use region::{Region, SelectionKind};
pub use remap::IndexRemap;
pub use span::{NamedSpan, SpanAdjustment, SpanKind, SpanRegistry, remap_target};
