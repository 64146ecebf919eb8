//! Undo and redo.
//!
//! Applying an entry reverts what it records and builds the entry that
//! reverts the revert, so undo and redo are the same operation run against
//! opposite stacks.

use horizon_sheet_core::PerfSpan;
use horizon_sheet_core::logging::{span_names, targets};

use crate::model::remap::invert;
use crate::model::{CellOrder, CellSnapshot, MovedBlock, StructuralBlock, UndoEntry};
use crate::widget::events::SheetEvent;

use super::Sheet;

impl Sheet {
    pub fn can_undo(&self) -> bool {
        self.config.enable_undo && self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.config.enable_undo && self.history.can_redo()
    }

    /// Revert the most recent operation.
    pub fn undo(&mut self) -> bool {
        if !self.config.enable_undo {
            return false;
        }
        let Some(entry) = self.history.pop_undo() else {
            return false;
        };
        let event = entry.event;
        self.discard_editor();
        let inverse = self.apply_entry(entry);
        self.history.push_redo(inverse);
        tracing::debug!(target: targets::HISTORY, ?event, "undone");
        self.emit(SheetEvent::Undo(event));
        self.emit_selection();
        self.schedule_redraw();
        true
    }

    /// Re-apply the most recently undone operation.
    pub fn redo(&mut self) -> bool {
        if !self.config.enable_undo {
            return false;
        }
        let Some(entry) = self.history.pop_redo() else {
            return false;
        };
        let event = entry.event;
        self.discard_editor();
        let inverse = self.apply_entry(entry);
        self.history.push_undo(inverse);
        tracing::debug!(target: targets::HISTORY, ?event, "redone");
        self.emit(SheetEvent::Redo(event));
        self.emit_selection();
        self.schedule_redraw();
        true
    }

    /// Revert what `entry` records and return the entry that reverts this.
    fn apply_entry(&mut self, entry: UndoEntry) -> UndoEntry {
        let _perf = PerfSpan::new(span_names::HISTORY);
        let mut inverse = UndoEntry::new(entry.event, self.selection.snapshot());
        inverse.cell_order = entry.cell_order.flipped();
        if entry.options.is_some() {
            inverse.options = Some(self.options.clone());
        }
        if entry.spans.is_some() {
            inverse.spans = Some(self.spans.clone());
        }

        if entry.cell_order == CellOrder::BeforeStructure {
            inverse.cells = self.restore_cells(&entry.cells);
        }

        for block in entry.added.iter().rev() {
            let elements = self.raw_delete(block.axis, &block.data_indices());
            inverse.deleted.push(StructuralBlock {
                axis: block.axis,
                elements,
            });
        }
        for block in entry.deleted.iter().rev() {
            self.raw_insert(block.axis, &block.elements);
            inverse.added.push(block.clone());
        }
        if let Some(moved) = &entry.moved {
            self.raw_permute(moved.axis, &moved.order);
            inverse.moved = Some(MovedBlock {
                axis: moved.axis,
                order: invert(&moved.order),
            });
        }

        if entry.cell_order == CellOrder::AfterStructure {
            inverse.cells = self.restore_cells(&entry.cells);
        }

        if let Some(options) = entry.options {
            self.options = options;
        }
        if let Some(spans) = entry.spans {
            self.spans = spans;
        }
        let bounds = self.bounds();
        self.selection.restore(&entry.selection, bounds);
        inverse
    }

    /// Write recorded values back, returning what they replaced.
    fn restore_cells(&mut self, cells: &CellSnapshot) -> CellSnapshot {
        let mut replaced = CellSnapshot::default();
        for (&(row, column), value) in &cells.table {
            let old = self.write_cell(row, column, value.clone());
            replaced.record(row, column, old);
        }
        for (&column, value) in &cells.header {
            let old = self.data.header_value(column).cloned().unwrap_or_default();
            if self.data.header_mut().set(column, value.clone()) {
                replaced.record_header(column, old);
            }
        }
        for (&row, value) in &cells.index {
            let old = self.data.index_value(row).cloned().unwrap_or_default();
            if self.data.index_mut().set(row, value.clone()) {
                replaced.record_index(row, old);
            }
        }
        replaced
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells;
    use crate::config::SheetOptions;
    use crate::model::{CellOption, CellValue, DropdownSpec, EventName, Labels, NamedSpan, OptionTarget};
    use crate::widget::clipboard::MemoryClipboard;
    use crate::widget::events::EventKind;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn setup() -> Sheet {
        Sheet::new(SheetOptions::default())
            .with_clipboard(Box::new(MemoryClipboard::new()))
            .with_data(vec![cells![1, 2, 3], cells![4, 5, 6], cells![7, 8, 9]])
    }

    fn snapshot(sheet: &Sheet) -> (Vec<Vec<CellValue>>, Vec<f64>, Vec<f64>) {
        (
            sheet.data().rows().to_vec(),
            sheet.row_layout().positions().sizes(),
            sheet.column_layout().positions().sizes(),
        )
    }

    #[test]
    fn test_undo_redo_edit() {
        let mut sheet = setup();
        let before = snapshot(&sheet);
        assert!(sheet.edit_cell(1, 1, "50"));
        let after = snapshot(&sheet);

        assert!(sheet.undo());
        assert_eq!(snapshot(&sheet), before);
        assert!(sheet.redo());
        assert_eq!(snapshot(&sheet), after);
        assert!(!sheet.redo());
    }

    #[test]
    fn test_undo_insert_then_redo() {
        let mut sheet = setup();
        let before = snapshot(&sheet);
        sheet.insert_columns(1, 2, None);
        let after = snapshot(&sheet);

        sheet.undo();
        assert_eq!(snapshot(&sheet), before);
        assert_eq!(sheet.total_columns(), 3);
        sheet.redo();
        assert_eq!(snapshot(&sheet), after);
        assert_eq!(sheet.total_columns(), 5);
    }

    #[test]
    fn test_undo_restores_options_and_spans() {
        let mut sheet = setup();
        sheet.set_option(OptionTarget::Row(2), CellOption::Readonly);
        sheet
            .add_span(NamedSpan::columns("pick", 0..1).with_option(CellOption::Dropdown(DropdownSpec::new(cells![
                1, 4, 7
            ]))))
            .unwrap();
        let options = sheet.cell_options().clone();
        let spans = sheet.spans().clone();

        sheet.delete_rows(&[0]);
        sheet.move_columns(2, &[0]);
        assert_ne!(sheet.cell_options(), &options);

        sheet.undo();
        sheet.undo();
        assert_eq!(sheet.cell_options(), &options);
        assert_eq!(sheet.spans(), &spans);
    }

    #[test]
    fn test_new_commit_clears_redo() {
        let mut sheet = setup();
        sheet.edit_cell(0, 0, "10");
        sheet.undo();
        assert!(sheet.can_redo());
        sheet.edit_cell(0, 1, "20");
        assert!(!sheet.can_redo());
    }

    #[test]
    fn test_history_capacity() {
        let mut sheet = setup();
        sheet.options_mut().max_undos = 2;
        for i in 0..4 {
            sheet.edit_cell(0, 0, &i.to_string());
        }
        assert_eq!(sheet.history().undo_len(), 2);
        assert!(sheet.undo());
        assert!(sheet.undo());
        assert!(!sheet.undo());
        assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::Int(1));
    }

    #[test]
    fn test_undo_disabled() {
        let mut sheet = setup();
        sheet.options_mut().enable_undo = false;
        sheet.edit_cell(0, 0, "10");
        assert!(!sheet.can_undo());
        assert!(!sheet.undo());
    }

    #[test]
    fn test_undo_header_edit() {
        let mut sheet = setup();
        sheet.set_header_labels(Labels::Values(cells!["x", "y", "z"]));
        assert!(sheet.edit_header(1, "why"));
        assert_eq!(sheet.header_label(1), Some(&CellValue::from("why")));
        sheet.undo();
        assert_eq!(sheet.header_label(1), Some(&CellValue::from("y")));
        sheet.redo();
        assert_eq!(sheet.header_label(1), Some(&CellValue::from("why")));
    }

    #[test]
    fn test_undo_emits_event_name() {
        let mut sheet = setup();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        sheet.connect(EventKind::Undo, move |e| {
            if let SheetEvent::Undo(name) = e {
                sink.lock().push(*name);
            }
        });
        sheet.move_rows(0, &[2]);
        sheet.undo();
        assert_eq!(seen.lock().as_slice(), &[EventName::MoveRows]);
    }

    #[test]
    fn test_undo_restores_selection() {
        let mut sheet = setup();
        sheet.select_cell(1, 1);
        sheet.edit_cell(0, 0, "x");
        sheet.select_cell(2, 2);
        sheet.undo();
        assert_eq!(sheet.selection().current(), Some((1, 1)));
    }
}
