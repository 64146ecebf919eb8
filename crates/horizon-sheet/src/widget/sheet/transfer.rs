//! Copy, cut, paste, delete and drag-fill.

use horizon_sheet_core::PerfSpan;
use horizon_sheet_core::logging::{span_names, targets};

use crate::model::{Axis, CellValue, EventName, Region, SelectionKind, UndoEntry};
use crate::widget::clipboard::{ClipboardFormat, decode_block, encode_block};
use crate::widget::editor::{CloseKey, EditRequest, EditTarget, Validation, accept_value, convert_input, is_valid_input};
use crate::widget::events::{CopyEvent, SheetEvent};

use super::Sheet;

impl Sheet {
    /// Copy the current box (or the bounding box of the selection) to the
    /// clipboard as delimited text.
    pub fn copy(&mut self) -> bool {
        if !self.config.enable_copy {
            return false;
        }
        let Some(region) = self.copy_region() else {
            return false;
        };
        self.copy_region_text(region).is_some()
    }

    /// Copy, then clear the copied cells as one undoable operation.
    pub fn cut(&mut self) -> bool {
        if !self.config.enable_cut {
            return false;
        }
        let Some(region) = self.copy_region() else {
            return false;
        };
        if self.copy_region_text(region).is_none() {
            return false;
        }
        self.clear_regions(EventName::Cut, &[region])
    }

    /// Clear every selected cell.
    pub fn delete_selected(&mut self) -> bool {
        if !self.config.enable_delete {
            return false;
        }
        let regions: Vec<Region> = self.selection.boxes().map(|(_, b)| b.region).collect();
        self.clear_regions(EventName::DeleteCells, &regions)
    }

    /// Paste clipboard text at the current box.
    pub fn paste(&mut self) -> bool {
        if !self.config.enable_paste {
            return false;
        }
        let text = match self.clipboard.get_text() {
            Ok(text) => text,
            Err(err) => {
                tracing::debug!(target: targets::CLIPBOARD, %err, "nothing to paste");
                return false;
            }
        };
        let format = ClipboardFormat::from_options(&self.config);
        match decode_block(&text, &format) {
            Ok(block) => self.paste_block(block),
            Err(err) => {
                tracing::debug!(target: targets::CLIPBOARD, %err, "clipboard text not parsed");
                false
            }
        }
    }

    /// Paste a block of text cells at the current box.
    ///
    /// A single-cell target takes the whole block, growing the sheet where
    /// allowed. A larger box that is an exact multiple of the block is tiled;
    /// otherwise the paste is cut to whichever of box and block is smaller.
    pub fn paste_block(&mut self, block: Vec<Vec<String>>) -> bool {
        let block_h = block.len();
        let block_w = block.iter().map(Vec::len).max().unwrap_or(0);
        if block_h == 0 || block_w == 0 {
            return false;
        }
        let _perf = PerfSpan::new(span_names::PASTE);

        let target = self.selection.current_box().map(|b| b.region);
        let (origin_r, origin_c) = target.map_or((0, 0), |r| (r.from_r, r.from_c));
        let (height, width) = match target {
            Some(region) if !region.is_single_cell() => {
                if region.height() % block_h == 0 && region.width() % block_w == 0 {
                    (region.height(), region.width())
                } else {
                    (region.height().min(block_h), region.width().min(block_w))
                }
            }
            _ => (block_h, block_w),
        };

        let bounds = self.bounds();
        let (add_rows, height) = self.expansion(Axis::Row, origin_r, height, bounds.rows);
        let (add_columns, width) = self.expansion(Axis::Column, origin_c, width, bounds.columns);
        if height == 0 || width == 0 {
            return false;
        }

        let mut entry = UndoEntry::new(EventName::Paste, self.selection.snapshot());
        let mut inserted = Vec::new();
        if add_rows > 0 || add_columns > 0 {
            entry.options = Some(self.options.clone());
            entry.spans = Some(self.spans.clone());
        }
        if add_rows > 0 {
            inserted.push(SheetEvent::RowsInserted(self.append_elements(Axis::Row, add_rows, &mut entry)));
        }
        if add_columns > 0 {
            inserted.push(SheetEvent::ColumnsInserted(self.append_elements(
                Axis::Column,
                add_columns,
                &mut entry,
            )));
        }

        let mut writes = Vec::new();
        let mut refused = 0usize;
        for i in 0..height {
            for j in 0..width {
                let Some((row, column)) = self.data_cell(origin_r + i, origin_c + j) else {
                    continue;
                };
                let text = block[i % block_h].get(j % block_w).map_or("", String::as_str);
                match self.convert_for(row, column, text, EventName::Paste) {
                    Some(value) => writes.push((row, column, value)),
                    None => refused += 1,
                }
            }
        }
        let changes = self.write_cells(&mut entry, writes);
        tracing::debug!(
            target: targets::CLIPBOARD,
            rows = height,
            columns = width,
            changed = changes.len(),
            refused,
            added_rows = add_rows,
            added_columns = add_columns,
            "pasted"
        );
        if changes.is_empty() && entry.added.is_empty() {
            return false;
        }
        self.commit(entry);

        let bounds = self.bounds();
        self.selection.select(
            Region::new(origin_r, origin_c, origin_r + height, origin_c + width),
            SelectionKind::Cells,
            bounds,
        );
        for event in inserted {
            self.emit(event);
        }
        if !changes.is_empty() {
            self.emit_modified(EventName::Paste, changes);
        }
        self.emit_selection();
        self.schedule_redraw();
        true
    }

    /// Fill `target` by repeating the current box across it.
    ///
    /// `target` must contain the current box and extend it along one axis.
    pub fn fill_to(&mut self, target: Region) -> bool {
        if !self.config.enable_drag_fill {
            return false;
        }
        let Some(origin) = self.selection.current_box().map(|b| b.region) else {
            return false;
        };
        let bounds = self.bounds();
        let Some(target) = target.clipped(bounds.rows, bounds.columns) else {
            return false;
        };
        if !target.covers(&origin) || target == origin {
            return false;
        }

        let (h, w) = (origin.height() as isize, origin.width() as isize);
        let mut writes = Vec::new();
        for (r, c) in target.cells() {
            if origin.contains(r, c) {
                continue;
            }
            let src_r = origin.from_r as isize + (r as isize - origin.from_r as isize).rem_euclid(h);
            let src_c = origin.from_c as isize + (c as isize - origin.from_c as isize).rem_euclid(w);
            let (Some(source), Some(dest)) = (
                self.data_cell(src_r as usize, src_c as usize),
                self.data_cell(r, c),
            ) else {
                continue;
            };
            let value = self.data.get_or_empty(source.0, source.1).clone();
            if let Some(value) = accept_value(&self.options, dest.0, dest.1, &value) {
                writes.push((dest.0, dest.1, value));
            }
        }

        let mut entry = UndoEntry::new(EventName::DragFill, self.selection.snapshot());
        let changes = self.write_cells(&mut entry, writes);
        self.commit(entry);
        self.selection.select(target, SelectionKind::Cells, bounds);
        self.selection.set_current(origin.from_r, origin.from_c, bounds);
        if !changes.is_empty() {
            self.emit_modified(EventName::DragFill, changes);
        }
        self.emit_selection();
        self.schedule_redraw();
        true
    }

    fn copy_region(&self) -> Option<Region> {
        self.selection
            .current_box()
            .map(|b| b.region)
            .or_else(|| self.selection.bounding_region())
    }

    /// Put the rendered text of a displayed region on the clipboard.
    fn copy_region_text(&mut self, region: Region) -> Option<String> {
        let view = self.view();
        let rows: Vec<Vec<String>> = region
            .rows()
            .map(|r| {
                region
                    .columns()
                    .map(|c| match self.data_cell(r, c) {
                        Some((row, column)) => view.cell_text(row, column),
                        None => String::new(),
                    })
                    .collect()
            })
            .collect();
        let format = ClipboardFormat::from_options(&self.config);
        let text = encode_block(&rows, &format)
            .and_then(|text| self.clipboard.set_text(&text).map(|()| text))
            .inspect_err(|err| tracing::debug!(target: targets::CLIPBOARD, %err, "copy failed"))
            .ok()?;
        self.emit(SheetEvent::Copied(CopyEvent {
            region,
            text: text.clone(),
        }));
        Some(text)
    }

    /// Blank every writable cell in `regions`; cells whose options refuse an
    /// empty value take the option default instead.
    fn clear_regions(&mut self, event: EventName, regions: &[Region]) -> bool {
        let mut writes = Vec::new();
        for region in regions {
            for (r, c) in region.cells() {
                let Some((row, column)) = self.data_cell(r, c) else {
                    continue;
                };
                if self.options.is_readonly(row, column) {
                    continue;
                }
                let blank = if is_valid_input(&self.options, row, column, &CellValue::Empty) {
                    CellValue::Empty
                } else {
                    self.options.default_value(row, column)
                };
                writes.push((row, column, blank));
            }
        }
        let mut entry = UndoEntry::new(event, self.selection.snapshot());
        let changes = self.write_cells(&mut entry, writes);
        if changes.is_empty() {
            return false;
        }
        self.commit(entry);
        self.emit_modified(event, changes);
        self.schedule_redraw();
        true
    }

    /// How many elements a paste of `extent` at `origin` must append on
    /// `axis`, and the extent left after any truncation.
    fn expansion(&self, axis: Axis, origin: usize, extent: usize, displayed: usize) -> (usize, usize) {
        let needed = (origin + extent).saturating_sub(displayed);
        let (allowed, limit) = match axis {
            Axis::Row => (self.config.paste_can_expand_y, self.config.paste_insert_row_limit),
            Axis::Column => (self.config.paste_can_expand_x, self.config.paste_insert_column_limit),
        };
        let added = if allowed {
            needed.min(limit.unwrap_or(usize::MAX))
        } else {
            0
        };
        (added, extent - (needed - added))
    }

    /// Text to stored value for a paste, with the user validator in the loop.
    pub(super) fn convert_for(&self, row: usize, column: usize, text: &str, event: EventName) -> Option<CellValue> {
        let value = convert_input(&self.options, row, column, text, self.config.infer_types)?;
        let request = EditRequest {
            row,
            column,
            target: EditTarget::Table,
            event,
            text: text.to_string(),
            value,
            key: None::<CloseKey>,
        };
        match self.editor.validate(&request) {
            Validation::Accept(value) => accept_value(&self.options, row, column, &value),
            Validation::NoChange => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells;
    use crate::config::SheetOptions;
    use crate::model::{CellOption, CheckboxSpec, DropdownSpec, OptionTarget};
    use crate::widget::clipboard::{ClipboardBackend, MemoryClipboard};
    use std::sync::Arc;

    fn setup() -> (Sheet, MemoryClipboard) {
        let clipboard = MemoryClipboard::new();
        let sheet = Sheet::new(SheetOptions::default())
            .with_clipboard(Box::new(clipboard.clone()))
            .with_data(vec![
                cells![1, 2, 3],
                cells![4, 5, 6],
                cells![7, 8, 9],
            ]);
        (sheet, clipboard)
    }

    #[test]
    fn test_copy_selection_as_tsv() {
        let (mut sheet, clipboard) = setup();
        sheet.add_selection(Region::new(0, 1, 2, 3), SelectionKind::Cells);
        assert!(sheet.copy());
        assert_eq!(clipboard.contents().as_deref(), Some("2\t3\n5\t6\n"));
    }

    #[test]
    fn test_paste_single_cell_grows_sheet() {
        let (mut sheet, mut clipboard) = setup();
        clipboard.set_text("a\tb\nc\td\n").unwrap();
        sheet.select_cell(2, 2);
        assert!(sheet.paste());
        assert_eq!(sheet.total_rows(), 4);
        assert_eq!(sheet.total_columns(), 4);
        assert_eq!(sheet.get_cell(3, 3).unwrap(), &CellValue::from("d"));

        assert!(sheet.undo());
        assert_eq!(sheet.total_rows(), 3);
        assert_eq!(sheet.total_columns(), 3);
        assert_eq!(sheet.get_cell(2, 2).unwrap(), &CellValue::Int(9));
    }

    #[test]
    fn test_paste_without_expansion_truncates() {
        let (mut sheet, mut clipboard) = setup();
        sheet.options_mut().paste_can_expand_y = false;
        clipboard.set_text("a\nb\nc\n").unwrap();
        sheet.select_cell(2, 0);
        assert!(sheet.paste());
        assert_eq!(sheet.total_rows(), 3);
        assert_eq!(sheet.get_cell(2, 0).unwrap(), &CellValue::from("a"));
    }

    #[test]
    fn test_paste_tiles_exact_multiple() {
        let (mut sheet, mut clipboard) = setup();
        clipboard.set_text("x\n").unwrap();
        sheet.add_selection(Region::new(0, 0, 2, 2), SelectionKind::Cells);
        assert!(sheet.paste());
        for (r, c) in Region::new(0, 0, 2, 2).cells() {
            assert_eq!(sheet.get_cell(r, c).unwrap(), &CellValue::from("x"));
        }
        assert_eq!(sheet.get_cell(2, 2).unwrap(), &CellValue::Int(9));
    }

    #[test]
    fn test_paste_partial_overlap_is_truncated() {
        let (mut sheet, _) = setup();
        sheet.add_selection(Region::new(0, 0, 3, 1), SelectionKind::Cells);
        let block = vec![vec!["p".to_string()], vec!["q".to_string()]];
        assert!(sheet.paste_block(block));
        assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::from("p"));
        assert_eq!(sheet.get_cell(1, 0).unwrap(), &CellValue::from("q"));
        assert_eq!(sheet.get_cell(2, 0).unwrap(), &CellValue::Int(7));
    }

    #[test]
    fn test_paste_respects_dropdown_and_validator() {
        let (mut sheet, _) = setup();
        sheet.set_option(
            OptionTarget::Column(0),
            CellOption::Dropdown(DropdownSpec::new(cells![1, 4, 7, 10])),
        );
        sheet.set_validator(Some(Arc::new(|req: &EditRequest| {
            if req.column == 1 {
                Validation::NoChange
            } else {
                Validation::Accept(req.value.clone())
            }
        })));
        sheet.select_cell(0, 0);
        assert!(sheet.paste_block(vec![vec!["99".into(), "0".into(), "0".into()]]));
        assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::Int(1));
        assert_eq!(sheet.get_cell(0, 1).unwrap(), &CellValue::Int(2));
        assert_eq!(sheet.get_cell(0, 2).unwrap(), &CellValue::Int(0));
    }

    #[test]
    fn test_cut_clears_and_restores() {
        let (mut sheet, clipboard) = setup();
        sheet.set_option(OptionTarget::Cell(0, 1), CellOption::Checkbox(CheckboxSpec::new("")));
        sheet.add_selection(Region::new(0, 0, 1, 2), SelectionKind::Cells);
        assert!(sheet.cut());
        assert_eq!(clipboard.contents().as_deref(), Some("1\tFalse\n"));
        assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::Empty);
        assert_eq!(sheet.get_cell(0, 1).unwrap(), &CellValue::Bool(false));

        sheet.undo();
        assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::Int(1));
    }

    #[test]
    fn test_delete_skips_readonly() {
        let (mut sheet, _) = setup();
        sheet.set_option(OptionTarget::Row(1), CellOption::Readonly);
        sheet.select_all();
        assert!(sheet.delete_selected());
        assert_eq!(sheet.get_cell(0, 0).unwrap(), &CellValue::Empty);
        assert_eq!(sheet.get_cell(1, 0).unwrap(), &CellValue::Int(4));
    }

    #[test]
    fn test_fill_down_repeats_origin() {
        let (mut sheet, _) = setup();
        sheet.add_selection(Region::new(0, 0, 1, 2), SelectionKind::Cells);
        assert!(sheet.fill_to(Region::new(0, 0, 3, 2)));
        for r in 0..3 {
            assert_eq!(sheet.get_cell(r, 0).unwrap(), &CellValue::Int(1));
            assert_eq!(sheet.get_cell(r, 1).unwrap(), &CellValue::Int(2));
        }
        assert_eq!(sheet.get_cell(2, 2).unwrap(), &CellValue::Int(9));
        assert!(!sheet.fill_to(Region::new(1, 1, 2, 2)));
    }
}
