//! Inserting, deleting and moving rows and columns.
//!
//! Every structural edit runs in the same order: capture the undo state,
//! change data, labels and layout together, re-key cell options, adjust
//! named spans, then fix the selection and notify listeners.

use horizon_sheet_core::PerfSpan;
use horizon_sheet_core::logging::{span_names, targets};

use crate::model::remap::{invert, move_order, order_to_mapping};
use crate::model::{
    Axis, CellValue, ElementSnapshot, EventName, IndexRemap, MovedBlock, Region, RemovedSlot, SelectionKind,
    StructuralBlock, UndoEntry,
};
use crate::widget::events::{MoveEvent, SheetEvent, StructureEvent};

use super::Sheet;

fn event_name(axis: Axis, insert: bool, delete: bool) -> EventName {
    match (axis, insert, delete) {
        (Axis::Row, true, _) => EventName::InsertRows,
        (Axis::Column, true, _) => EventName::InsertColumns,
        (Axis::Row, _, true) => EventName::DeleteRows,
        (Axis::Column, _, true) => EventName::DeleteColumns,
        (Axis::Row, _, _) => EventName::MoveRows,
        (Axis::Column, _, _) => EventName::MoveColumns,
    }
}

impl Sheet {
    /// Insert `count` rows before data row `at`.
    ///
    /// `rows` supplies values for the first rows inserted; missing rows get
    /// option defaults. Inserting past the end appends.
    pub fn insert_rows(&mut self, at: usize, count: usize, rows: Option<Vec<Vec<CellValue>>>) -> bool {
        self.insert_elements(Axis::Row, at, count, rows)
    }

    /// Insert `count` columns before data column `at`; `columns[k][r]` is the
    /// value for row `r` of the `k`th new column.
    pub fn insert_columns(&mut self, at: usize, count: usize, columns: Option<Vec<Vec<CellValue>>>) -> bool {
        self.insert_elements(Axis::Column, at, count, columns)
    }

    pub fn delete_rows(&mut self, rows: &[usize]) -> bool {
        self.delete_elements(Axis::Row, rows)
    }

    pub fn delete_columns(&mut self, columns: &[usize]) -> bool {
        self.delete_elements(Axis::Column, columns)
    }

    /// Move data rows so the first of them lands at `to`, keeping their
    /// relative order.
    pub fn move_rows(&mut self, to: usize, rows: &[usize]) -> bool {
        self.move_elements(Axis::Row, to, rows)
    }

    pub fn move_columns(&mut self, to: usize, columns: &[usize]) -> bool {
        self.move_elements(Axis::Column, to, columns)
    }

    fn structural_entry(&self, event: EventName) -> UndoEntry {
        let mut entry = UndoEntry::new(event, self.selection.snapshot());
        entry.options = Some(self.options.clone());
        entry.spans = Some(self.spans.clone());
        entry
    }

    fn remap_options(&mut self, axis: Axis, remap: &IndexRemap) {
        match axis {
            Axis::Row => self.options.remap_rows(remap),
            Axis::Column => self.options.remap_columns(remap),
        }
    }

    /// Values of a fresh element at data index `index`.
    fn default_values(&self, axis: Axis, index: usize) -> Vec<CellValue> {
        match axis {
            Axis::Row => (0..self.column_count)
                .map(|c| self.options.default_value(index, c))
                .collect(),
            Axis::Column => (0..self.row_count)
                .map(|r| self.options.default_value(r, index))
                .collect(),
        }
    }

    /// New elements at `at..at + count`, displayed at the default size.
    fn new_elements(
        &self,
        axis: Axis,
        at: usize,
        count: usize,
        values: Option<Vec<Vec<CellValue>>>,
    ) -> Vec<ElementSnapshot> {
        let size = self.layout(axis).default_size();
        let mut supplied = values.unwrap_or_default().into_iter();
        (0..count)
            .map(|k| {
                let index = at + k;
                ElementSnapshot {
                    slot: RemovedSlot {
                        data: index,
                        size,
                        displayed: true,
                    },
                    values: supplied.next().unwrap_or_else(|| self.default_values(axis, index)),
                    label: None,
                }
            })
            .collect()
    }

    // =========================================================================
    // Raw primitives: data, labels and layout only
    // =========================================================================

    /// Put elements back at their data indices, ascending.
    pub(super) fn raw_insert(&mut self, axis: Axis, elements: &[ElementSnapshot]) {
        for element in elements {
            let at = element.slot.data;
            let label = element.label.clone().map(|l| vec![l]);
            match axis {
                Axis::Row => {
                    self.data.insert_rows(at, vec![element.values.clone()]);
                    self.data.index_mut().insert(at, 1, label);
                }
                Axis::Column => {
                    self.data
                        .insert_columns(at, std::slice::from_ref(&element.values));
                    self.data.header_mut().insert(at, 1, label);
                }
            }
        }
        let slots: Vec<RemovedSlot> = elements.iter().map(|e| e.slot).collect();
        *self.count_mut(axis) += elements.len();
        let total = self.count(axis);
        self.layout_mut(axis).restore(&slots, total);
    }

    /// Remove elements by ascending data index, capturing what they were.
    pub(super) fn raw_delete(&mut self, axis: Axis, indices: &[usize]) -> Vec<ElementSnapshot> {
        let slots = self.layout_mut(axis).delete(indices);
        let (values, labels) = match axis {
            Axis::Row => (self.data.delete_rows(indices), self.data.index_mut().delete(indices)),
            Axis::Column => (
                self.data.delete_columns(indices),
                self.data.header_mut().delete(indices),
            ),
        };
        *self.count_mut(axis) -= slots.len();

        let mut values = values.into_iter().peekable();
        let mut labels = labels.into_iter().peekable();
        slots
            .into_iter()
            .map(|slot| ElementSnapshot {
                slot,
                values: values
                    .next_if(|(i, _)| *i == slot.data)
                    .map(|(_, v)| v)
                    .unwrap_or_default(),
                label: labels.next_if(|(i, _)| *i == slot.data).map(|(_, l)| l),
            })
            .collect()
    }

    /// Reorder elements; `order[new] == old`.
    pub(super) fn raw_permute(&mut self, axis: Axis, order: &[usize]) {
        match axis {
            Axis::Row => {
                self.data.reorder_rows(order);
                self.data.index_mut().reorder(order);
            }
            Axis::Column => {
                self.data.reorder_columns(order);
                self.data.header_mut().reorder(order);
            }
        }
        self.layout_mut(axis).permute(order);
    }

    // =========================================================================
    // Operations
    // =========================================================================

    fn insert_elements(
        &mut self,
        axis: Axis,
        at: usize,
        count: usize,
        values: Option<Vec<Vec<CellValue>>>,
    ) -> bool {
        let count = count.max(values.as_ref().map_or(0, Vec::len));
        if count == 0 {
            return false;
        }
        let _perf = PerfSpan::new(span_names::MUTATION);
        let at = at.min(self.count(axis));
        let mut entry = self.structural_entry(event_name(axis, true, false));

        self.remap_options(axis, &IndexRemap::insert(at, count));
        let elements = self.new_elements(axis, at, count, values);
        self.raw_insert(axis, &elements);
        let adjustments = self.spans.insert(axis, at, count);
        self.apply_span_adjustments(adjustments, &mut entry.cells);

        entry.added.push(StructuralBlock { axis, elements });
        self.commit(entry);
        tracing::debug!(target: targets::MUTATION, ?axis, at, count, "inserted");

        self.select_elements(axis, (at..at + count).collect());
        let event = StructureEvent {
            axis,
            indices: (at..at + count).collect(),
        };
        self.emit(match axis {
            Axis::Row => SheetEvent::RowsInserted(event),
            Axis::Column => SheetEvent::ColumnsInserted(event),
        });
        self.emit_selection();
        self.schedule_redraw();
        true
    }

    /// Append `count` elements at the end as part of a larger operation.
    pub(super) fn append_elements(&mut self, axis: Axis, count: usize, entry: &mut UndoEntry) -> StructureEvent {
        let at = self.count(axis);
        let elements = self.new_elements(axis, at, count, None);
        self.raw_insert(axis, &elements);
        let adjustments = self.spans.insert(axis, at, count);
        self.apply_span_adjustments(adjustments, &mut entry.cells);
        entry.added.push(StructuralBlock { axis, elements });
        StructureEvent {
            axis,
            indices: (at..at + count).collect(),
        }
    }

    fn delete_elements(&mut self, axis: Axis, indices: &[usize]) -> bool {
        let total = self.count(axis);
        let mut sorted: Vec<usize> = indices.iter().copied().filter(|&i| i < total).collect();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.is_empty() {
            return false;
        }
        let _perf = PerfSpan::new(span_names::MUTATION);
        let mut entry = self.structural_entry(event_name(axis, false, true));

        let elements = self.raw_delete(axis, &sorted);
        self.remap_options(axis, &IndexRemap::delete(&sorted));
        let adjustments = self.spans.delete(axis, &sorted);
        self.apply_span_adjustments(adjustments, &mut entry.cells);

        entry.deleted.push(StructuralBlock { axis, elements });
        self.commit(entry);
        tracing::debug!(target: targets::MUTATION, ?axis, count = sorted.len(), "deleted");

        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        let event = StructureEvent { axis, indices: sorted };
        self.emit(match axis {
            Axis::Row => SheetEvent::RowsDeleted(event),
            Axis::Column => SheetEvent::ColumnsDeleted(event),
        });
        if had_selection {
            self.emit_selection();
        }
        self.schedule_redraw();
        true
    }

    fn move_elements(&mut self, axis: Axis, to: usize, indices: &[usize]) -> bool {
        let total = self.count(axis);
        let order = move_order(total, to, indices);
        if order.iter().enumerate().all(|(new, &old)| new == old) {
            tracing::trace!(target: targets::MUTATION, ?axis, to, "move onto itself ignored");
            return false;
        }
        let _perf = PerfSpan::new(span_names::MUTATION);
        let mut entry = self.structural_entry(event_name(axis, false, false));

        self.raw_permute(axis, &order);
        let old_to_new = order_to_mapping(&order);
        self.remap_options(axis, &IndexRemap::permute(old_to_new.clone()));
        let adjustments = self.spans.permute(axis, &old_to_new);
        self.apply_span_adjustments(adjustments, &mut entry.cells);

        entry.moved = Some(MovedBlock {
            axis,
            order: invert(&order),
        });
        self.commit(entry);
        tracing::debug!(target: targets::MUTATION, ?axis, to, count = indices.len(), "moved");

        let moved: Vec<usize> = indices
            .iter()
            .filter_map(|&old| old_to_new.get(old).copied())
            .collect();
        self.select_elements(axis, moved);
        let event = MoveEvent { axis, old_to_new };
        self.emit(match axis {
            Axis::Row => SheetEvent::RowsMoved(event),
            Axis::Column => SheetEvent::ColumnsMoved(event),
        });
        self.emit_selection();
        self.schedule_redraw();
        true
    }

    /// Select whole rows or columns given by data index, one box per
    /// displayed run.
    fn select_elements(&mut self, axis: Axis, data: Vec<usize>) {
        let layout = self.layout(axis);
        let mut displayed: Vec<usize> = data.into_iter().filter_map(|d| layout.to_displayed(d)).collect();
        displayed.sort_unstable();
        displayed.dedup();

        self.selection.clear();
        let bounds = self.bounds();
        let mut runs: Vec<(usize, usize)> = Vec::new();
        for d in displayed {
            match runs.last_mut() {
                Some((_, end)) if *end == d => *end += 1,
                _ => runs.push((d, d + 1)),
            }
        }
        for (from, upto) in runs {
            let (region, kind) = match axis {
                Axis::Row => (Region::new(from, 0, upto, bounds.columns), SelectionKind::Rows),
                Axis::Column => (Region::new(0, from, bounds.rows, upto), SelectionKind::Columns),
            };
            self.selection.create_box(region, kind, bounds);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells;
    use crate::config::SheetOptions;
    use crate::model::{CellOption, DropdownSpec, Labels, NamedSpan, OptionTarget};
    use crate::widget::clipboard::MemoryClipboard;

    fn setup() -> Sheet {
        Sheet::new(SheetOptions::default())
            .with_clipboard(Box::new(MemoryClipboard::new()))
            .with_data(vec![
                cells!["a0", "a1", "a2", "a3"],
                cells!["b0", "b1", "b2", "b3"],
                cells!["c0", "c1", "c2", "c3"],
            ])
    }

    fn column(sheet: &Sheet, c: usize) -> Vec<String> {
        (0..sheet.total_rows())
            .map(|r| sheet.get_cell(r, c).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_insert_rows_with_values() {
        let mut sheet = setup();
        assert!(sheet.insert_rows(1, 2, Some(vec![cells!["x"], cells!["y"]])));
        assert_eq!(sheet.total_rows(), 5);
        assert_eq!(column(&sheet, 0), ["a0", "x", "y", "b0", "c0"]);
        assert_eq!(sheet.row_layout().displayed_count(), 5);
        assert_eq!(sheet.selection().selected_rows().into_iter().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_insert_uses_option_defaults() {
        let mut sheet = setup();
        sheet.set_option(
            OptionTarget::Column(2),
            CellOption::Dropdown(DropdownSpec::new(vec!["a2".into(), "b2".into(), "c2".into()])),
        );
        sheet.insert_rows(3, 1, None);
        assert_eq!(sheet.get_cell(3, 2).unwrap(), &CellValue::from("a2"));
        assert_eq!(sheet.get_cell(3, 0).unwrap(), &CellValue::Empty);
    }

    #[test]
    fn test_delete_columns_shifts_options() {
        let mut sheet = setup();
        sheet.set_option(OptionTarget::Column(3), CellOption::Readonly);
        assert!(sheet.delete_columns(&[0, 1, 9]));
        assert_eq!(sheet.total_columns(), 2);
        assert_eq!(column(&sheet, 0), ["a2", "b2", "c2"]);
        assert!(sheet.cell_options().is_readonly(0, 1));
        assert!(!sheet.cell_options().is_readonly(0, 0));
    }

    #[test]
    fn test_delete_keeps_labels_aligned() {
        let mut sheet = setup();
        sheet.set_index_labels(Labels::Values(cells!["first", "second", "third"]));
        sheet.delete_rows(&[1]);
        assert_eq!(sheet.index_label(1), Some(&CellValue::from("third")));

        sheet.undo();
        assert_eq!(sheet.index_label(1), Some(&CellValue::from("second")));
        assert_eq!(column(&sheet, 0), ["a0", "b0", "c0"]);
    }

    #[test]
    fn test_move_onto_itself_records_nothing() {
        let mut sheet = setup();
        assert!(!sheet.move_columns(1, &[1, 2]));
        assert!(!sheet.history().can_undo());
    }

    #[test]
    fn test_move_columns_carries_span() {
        let mut sheet = setup();
        let span = NamedSpan::columns("choice", 1..3)
            .with_option(CellOption::Dropdown(DropdownSpec::new(cells!["a1", "a2", "b1", "b2", "c1", "c2"])));
        sheet.add_span(span).unwrap();

        assert!(sheet.move_columns(3, &[0]));
        assert_eq!(column(&sheet, 3), ["a0", "b0", "c0"]);
        assert_eq!(sheet.span("choice").unwrap().column_range(), 0..2);
        assert!(sheet.cell_options().dropdown(0, 0).is_some());
        assert!(sheet.cell_options().dropdown(0, 1).is_some());
        assert!(sheet.cell_options().dropdown(0, 2).is_none());
        assert!(sheet.cell_options().dropdown(0, 3).is_none());
    }

    #[test]
    fn test_span_leaves_own_option_on_departing_column() {
        let mut sheet = setup();
        let span = NamedSpan::columns("choice", 0..3)
            .with_option(CellOption::Dropdown(
                DropdownSpec::new(cells!["a0", "b0", "c0"]).with_validate_input(false),
            ));
        sheet.add_span(span).unwrap();
        let own = DropdownSpec::new(cells!["a1", "b1", "c1"]).with_validate_input(false);
        sheet.set_option(OptionTarget::Column(1), CellOption::Dropdown(own.clone()));

        assert!(sheet.move_columns(3, &[1]));
        assert_eq!(sheet.span("choice").unwrap().column_range(), 0..2);
        assert_eq!(column(&sheet, 3), ["a1", "b1", "c1"]);
        assert_eq!(sheet.cell_options().dropdown(0, 3), Some(&own));
    }

    #[test]
    fn test_move_rows_keeps_sizes() {
        let mut sheet = setup();
        sheet.set_row_height(0, 40.0);
        assert!(sheet.move_rows(2, &[0]));
        assert_eq!(column(&sheet, 0), ["b0", "c0", "a0"]);
        assert_eq!(sheet.row_layout().positions().size(2), Some(40.0));
        assert_eq!(sheet.selection().selected_rows().into_iter().collect::<Vec<_>>(), vec![2]);
    }

    #[test]
    fn test_delete_hidden_row_restores_hidden() {
        let mut sheet = setup();
        sheet.hide_rows(&[1]);
        sheet.delete_rows(&[1]);
        assert_eq!(sheet.total_rows(), 2);
        assert_eq!(sheet.row_layout().displayed_count(), 2);

        sheet.undo();
        assert_eq!(sheet.total_rows(), 3);
        assert_eq!(sheet.row_layout().hidden(3), vec![1]);
    }

    #[test]
    fn test_span_grows_on_interior_insert() {
        let mut sheet = setup();
        sheet
            .add_span(NamedSpan::rows("band", 0..2).with_option(CellOption::Readonly))
            .unwrap();
        sheet.insert_rows(1, 1, None);
        assert_eq!(sheet.span("band").unwrap().row_range(), 0..3);
        assert!(sheet.cell_options().is_readonly(1, 0));
        assert!(!sheet.cell_options().is_readonly(3, 0));
    }
}
