//! Selection, in-place editing and pointer and keyboard input.
//!
//! Everything here works in displayed indices. Pointer coordinates are in
//! content space for the scrolling direction of their pane: table `x` and
//! `y`, header `x`, index `y`.

use std::ops::Range;

use horizon_sheet_core::logging::targets;

use crate::model::{Axis, CellValue, EventName, OptionKind, PositionIndex, Region, SelectionKind, UndoEntry};
use crate::widget::arena::Pane;
use crate::widget::editor::{
    CloseKey, EditRequest, EditSession, EditTarget, Validation, accept_value, convert_input, toggle_checkbox,
};
use crate::widget::events::{EditorEvent, ModifiedEvent, SheetEvent};
use crate::widget::mode::InteractionMode;
use crate::widget::selection::Deselect;

use super::Sheet;

/// Distance in pixels from a row or column edge that starts a resize.
const RESIZE_MARGIN: f64 = 3.0;

/// Size of the fill handle at the bottom-right corner of the current box.
const FILL_HANDLE: f64 = 6.0;

/// Keys the sheet reacts to; the host maps its own key events onto these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetKey {
    Up,
    Down,
    Left,
    Right,
    Return,
    Tab,
    Escape,
    Delete,
    Backspace,
    Char(char),
    Copy,
    Cut,
    Paste,
    Undo,
    Redo,
    SelectAll,
}

/// Modifier keys held during a pointer press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
}

impl Sheet {
    // =========================================================================
    // Selection
    // =========================================================================

    /// Select a single displayed cell, replacing the selection.
    pub fn select_cell(&mut self, row: usize, column: usize) -> bool {
        self.replace_selection(Region::cell(row, column), SelectionKind::Cells)
    }

    /// Select whole displayed rows.
    pub fn select_rows(&mut self, rows: Range<usize>) -> bool {
        self.replace_selection(Region::new(rows.start, 0, rows.end, 0), SelectionKind::Rows)
    }

    /// Select whole displayed columns.
    pub fn select_columns(&mut self, columns: Range<usize>) -> bool {
        self.replace_selection(Region::new(0, columns.start, 0, columns.end), SelectionKind::Columns)
    }

    pub fn select_all(&mut self) -> bool {
        if !self.config.enable_select_all {
            return false;
        }
        let bounds = self.bounds();
        if self.selection.select_all(bounds).is_none() {
            return false;
        }
        self.selection_changed();
        true
    }

    /// Add a box without dropping the existing ones; it becomes current.
    pub fn add_selection(&mut self, region: Region, kind: SelectionKind) -> bool {
        let bounds = self.bounds();
        let Some(id) = self.selection.create_box(region, kind, bounds) else {
            return false;
        };
        if let Some(created) = self.selection.get(id).map(|b| b.region) {
            self.selection.set_current(created.from_r, created.from_c, bounds);
        }
        self.selection_changed();
        true
    }

    /// Move the cursor, creating a single-cell box if no box contains it.
    pub fn set_current(&mut self, row: usize, column: usize) -> bool {
        let bounds = self.bounds();
        if self.selection.set_current(row, column, bounds).is_none() {
            return false;
        }
        self.selection_changed();
        true
    }

    pub fn deselect(&mut self, scope: Deselect) -> bool {
        let bounds = self.bounds();
        if !self.selection.deselect(scope, bounds) {
            return false;
        }
        self.selection_changed();
        true
    }

    fn replace_selection(&mut self, region: Region, kind: SelectionKind) -> bool {
        let bounds = self.bounds();
        if self.selection.select(region, kind, bounds).is_none() {
            return false;
        }
        self.selection_changed();
        true
    }

    fn selection_changed(&mut self) {
        self.emit_selection();
        self.schedule_redraw();
    }

    /// Select the cell `(dr, dc)` away from the current one and scroll to it.
    fn move_cursor(&mut self, dr: isize, dc: isize) -> bool {
        let bounds = self.bounds();
        if bounds.is_empty() {
            return false;
        }
        let (row, column) = self.selection.current().unwrap_or((0, 0));
        let row = row.saturating_add_signed(dr).min(bounds.rows - 1);
        let column = column.saturating_add_signed(dc).min(bounds.columns - 1);
        if self.selection.current() == Some((row, column)) && self.selection.len() == 1 {
            return false;
        }
        self.select_cell(row, column);
        self.see(row, column);
        true
    }

    // =========================================================================
    // Committing edits
    // =========================================================================

    /// Commit typed text to a data cell, as if entered in the cell editor.
    ///
    /// The text is converted by the cell's options and passed through the
    /// validator. The change is undoable and reported to listeners.
    pub fn edit_cell(&mut self, row: usize, column: usize, text: &str) -> bool {
        self.commit_text(row, column, text, None)
    }

    /// Commit typed text to the header label of a data column.
    pub fn edit_header(&mut self, column: usize, text: &str) -> bool {
        self.commit_label(Axis::Column, column, text, None)
    }

    /// Commit typed text to the index label of a data row.
    pub fn edit_index(&mut self, row: usize, text: &str) -> bool {
        self.commit_label(Axis::Row, row, text, None)
    }

    fn commit_text(&mut self, row: usize, column: usize, text: &str, key: Option<CloseKey>) -> bool {
        let Some(value) = convert_input(&self.options, row, column, text, self.config.infer_types) else {
            tracing::debug!(target: targets::EDIT, row, column, "input refused by cell options");
            return false;
        };
        self.commit_value(row, column, value, text, key)
    }

    /// Validate and store one value as an undoable table edit.
    fn commit_value(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue,
        text: &str,
        key: Option<CloseKey>,
    ) -> bool {
        let request = EditRequest {
            row,
            column,
            target: EditTarget::Table,
            event: EventName::EditTable,
            text: text.to_string(),
            value,
            key,
        };
        let value = match self.editor.validate(&request) {
            Validation::Accept(value) => value,
            Validation::NoChange => {
                tracing::debug!(target: targets::EDIT, row, column, "validator kept old value");
                return false;
            }
        };
        let Some(value) = accept_value(&self.options, row, column, &value) else {
            tracing::debug!(target: targets::EDIT, row, column, "validated value refused by cell options");
            return false;
        };
        let mut entry = UndoEntry::new(EventName::EditTable, self.selection.snapshot());
        let changes = self.write_cells(&mut entry, vec![(row, column, value)]);
        if changes.is_empty() {
            return false;
        }
        self.commit(entry);
        self.emit_modified(EventName::EditTable, changes);
        self.schedule_redraw();
        true
    }

    fn commit_label(&mut self, axis: Axis, index: usize, text: &str, key: Option<CloseKey>) -> bool {
        let readonly = match axis {
            Axis::Column => self.options.resolve_header(index, OptionKind::Readonly),
            Axis::Row => self.options.resolve_index(index, OptionKind::Readonly),
        }
        .is_some();
        if readonly {
            return false;
        }
        let value = if self.config.infer_types {
            CellValue::infer(text)
        } else if text.is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(text.to_string())
        };
        let (target, event, row, column) = match axis {
            Axis::Column => (EditTarget::Header, EventName::EditHeader, 0, index),
            Axis::Row => (EditTarget::Index, EventName::EditIndex, index, 0),
        };
        let request = EditRequest {
            row,
            column,
            target,
            event,
            text: text.to_string(),
            value,
            key,
        };
        let Validation::Accept(value) = self.editor.validate(&request) else {
            return false;
        };
        let Some(change) = self.write_label(axis, index, value) else {
            return false;
        };
        let mut modified = ModifiedEvent::new(event);
        match axis {
            Axis::Column => modified.header.push(change),
            Axis::Row => modified.index.push(change),
        }
        self.emit(SheetEvent::CellsModified(modified));
        self.schedule_redraw();
        true
    }

    // =========================================================================
    // Editors
    // =========================================================================

    /// Open the editor on the current cell.
    ///
    /// A checkbox cell toggles instead. With `force`, an already open editor
    /// is discarded first.
    pub fn open_cell(&mut self, force: bool) -> bool {
        let Some((row, column)) = self.selection.current() else {
            return false;
        };
        self.open_cell_with(row, column, None, force)
    }

    /// Open a text editor on the header of a displayed column.
    pub fn open_header_editor(&mut self, column: usize) -> bool {
        let Some(data) = self.columns.to_data(column) else {
            return false;
        };
        let text = self.data.header_value(data).map(ToString::to_string).unwrap_or_default();
        let session = EditSession::text(0, column, EditTarget::Header, text);
        self.start_session(session, InteractionMode::EditingCell, false)
    }

    /// Open a text editor on the index of a displayed row.
    pub fn open_index_editor(&mut self, row: usize) -> bool {
        let Some(data) = self.rows.to_data(row) else {
            return false;
        };
        let text = self.data.index_value(data).map(ToString::to_string).unwrap_or_default();
        let session = EditSession::text(row, 0, EditTarget::Index, text);
        self.start_session(session, InteractionMode::EditingCell, false)
    }

    fn open_cell_with(&mut self, row: usize, column: usize, initial: Option<String>, force: bool) -> bool {
        if !self.config.enable_edit {
            return false;
        }
        let Some((data_row, data_column)) = self.data_cell(row, column) else {
            return false;
        };
        if self.options.is_readonly(data_row, data_column) {
            tracing::debug!(target: targets::EDIT, row, column, "readonly cell not opened");
            return false;
        }
        if self.options.checkbox(data_row, data_column).is_some() {
            return self.toggle_checkbox(row, column);
        }

        let typed = initial.is_some();
        let text = initial.unwrap_or_else(|| self.view().cell_text(data_row, data_column));
        let (session, mode) = match self.options.dropdown(data_row, data_column) {
            Some(spec) => (
                EditSession::dropdown(row, column, EditTarget::Table, text.clone(), spec.clone()),
                InteractionMode::DropdownOpen,
            ),
            None => (
                EditSession::text(row, column, EditTarget::Table, text.clone()),
                InteractionMode::EditingCell,
            ),
        };
        if !self.start_session(session, mode, force) {
            return false;
        }
        if typed {
            self.editor.set_text(text);
        }
        true
    }

    fn start_session(&mut self, session: EditSession, mode: InteractionMode, force: bool) -> bool {
        if !self.modes.is_idle() && !(force && self.modes.mode().is_editing()) {
            return false;
        }
        let (row, column, kind) = (session.row, session.column, session.kind);
        if !self.editor.begin_open(session, force) {
            return false;
        }
        if self.modes.mode().is_editing() {
            self.modes.finish();
        }
        self.modes.enter(mode);
        self.emit(SheetEvent::EditorOpened(EditorEvent {
            row,
            column,
            kind,
            committed: false,
        }));
        self.editor.finish_open();
        self.schedule_redraw();
        true
    }

    /// Text in the open editor.
    pub fn editor_text(&self) -> Option<&str> {
        self.editor.text()
    }

    /// Replace the open editor's text; an editable dropdown re-filters.
    pub fn set_editor_text(&mut self, text: impl Into<String>) -> bool {
        let changed = self.editor.set_text(text);
        if changed {
            self.schedule_redraw();
        }
        changed
    }

    /// Pick a listed dropdown entry and commit it.
    pub fn choose_dropdown(&mut self, position: usize) -> bool {
        if !self.editor.choose(position) {
            return false;
        }
        self.close_editor(CloseKey::Return)
    }

    /// Close the open editor; returns whether a value was committed.
    ///
    /// Return and Tab move the cursor afterwards when configured to.
    pub fn close_editor(&mut self, key: CloseKey) -> bool {
        let Some(closing) = self.editor.begin_close(key) else {
            return false;
        };
        let session = &closing.session;
        let committed = match &closing.text {
            Some(text) => match session.target {
                EditTarget::Table => match self.data_cell(session.row, session.column) {
                    Some((row, column)) => self.commit_text(row, column, text, Some(key)),
                    None => false,
                },
                EditTarget::Header => match self.columns.to_data(session.column) {
                    Some(column) => self.commit_label(Axis::Column, column, text, Some(key)),
                    None => false,
                },
                EditTarget::Index => match self.rows.to_data(session.row) {
                    Some(row) => self.commit_label(Axis::Row, row, text, Some(key)),
                    None => false,
                },
            },
            None => false,
        };
        self.emit(SheetEvent::EditorClosed(EditorEvent {
            row: session.row,
            column: session.column,
            kind: session.kind,
            committed,
        }));
        self.editor.finish_close();
        if self.modes.mode().is_editing() {
            self.modes.finish();
        }

        if session.target == EditTarget::Table {
            match key {
                CloseKey::Return if self.config.edit_cell_return => {
                    self.move_cursor(1, 0);
                }
                CloseKey::Tab if self.config.edit_cell_tab => {
                    self.move_cursor(0, 1);
                }
                _ => {}
            }
        }
        self.schedule_redraw();
        committed
    }

    /// Flip a checkbox cell, as an undoable edit.
    pub fn toggle_checkbox(&mut self, row: usize, column: usize) -> bool {
        let Some((data_row, data_column)) = self.data_cell(row, column) else {
            return false;
        };
        let Some(spec) = self.options.checkbox(data_row, data_column) else {
            return false;
        };
        if !spec.editable || !self.config.enable_edit {
            return false;
        }
        let value = toggle_checkbox(self.data.get_or_empty(data_row, data_column));
        let text = value.to_string();
        self.commit_value(data_row, data_column, value, &text, None)
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Pointer pressed in a pane. Returns whether the press was handled.
    pub fn pointer_press(&mut self, pane: Pane, x: f64, y: f64, modifiers: Modifiers) -> bool {
        if self.editor.is_open() {
            self.close_editor(CloseKey::FocusOut);
        }
        if !self.modes.is_idle() {
            return false;
        }
        match pane {
            Pane::Table => self.press_table(x, y, modifiers),
            Pane::Header => self.press_gutter(Axis::Column, x, modifiers),
            Pane::Index => self.press_gutter(Axis::Row, y, modifiers),
            Pane::Corner => self.select_all(),
        }
    }

    fn press_table(&mut self, x: f64, y: f64, modifiers: Modifiers) -> bool {
        if self.config.enable_drag_fill
            && let Some(origin) = self.selection.current_box().map(|b| b.region)
            && self.near_fill_handle(origin, x, y)
        {
            return self.modes.enter(InteractionMode::DragFilling {
                origin,
                extended: origin,
            });
        }

        let hit = (
            self.rows.positions().index_at(y, false),
            self.columns.positions().index_at(x, false),
        );
        let (Some(row), Some(column)) = hit else {
            return self.deselect(Deselect::All);
        };
        let bounds = self.bounds();
        if modifiers.shift && self.selection.current().is_some() {
            if self.selection.shift_select(row, column, bounds) {
                self.selection_changed();
            }
        } else if modifiers.ctrl {
            self.add_selection(Region::cell(row, column), SelectionKind::Cells);
        } else {
            self.select_cell(row, column);
            if self
                .data_cell(row, column)
                .is_some_and(|(r, c)| self.options.checkbox(r, c).is_some())
            {
                self.toggle_checkbox(row, column);
                return true;
            }
        }
        if self.config.enable_drag_select {
            self.modes.enter(InteractionMode::DraggingSelection {
                kind: SelectionKind::Cells,
            });
        }
        true
    }

    /// Press in the header (`axis == Column`) or index (`axis == Row`).
    fn press_gutter(&mut self, axis: Axis, px: f64, modifiers: Modifiers) -> bool {
        let (resize_enabled, drag_enabled) = match axis {
            Axis::Row => (self.config.enable_row_height_resize, self.config.enable_row_drag_and_drop),
            Axis::Column => (
                self.config.enable_column_width_resize,
                self.config.enable_column_drag_and_drop,
            ),
        };
        let positions = self.layout(axis).positions();

        if resize_enabled && let Some(index) = resize_edge(positions, px) {
            let size = positions.size(index).unwrap_or_default();
            let mode = match axis {
                Axis::Row => InteractionMode::ResizingRow {
                    row: index,
                    anchor_px: px,
                    original: size,
                    current: size,
                },
                Axis::Column => InteractionMode::ResizingColumn {
                    column: index,
                    anchor_px: px,
                    original: size,
                    current: size,
                },
            };
            return self.modes.enter(mode);
        }

        let Some(index) = positions.index_at(px, false) else {
            return false;
        };
        let selected = match axis {
            Axis::Row => self.selection.is_row_selected(index),
            Axis::Column => self.selection.is_column_selected(index),
        };
        if selected && drag_enabled && !modifiers.shift {
            let mode = match axis {
                Axis::Row => InteractionMode::DraggingRowReorder {
                    rows: self.selection.selected_rows().into_iter().collect(),
                    target: index,
                },
                Axis::Column => InteractionMode::DraggingColumnReorder {
                    columns: self.selection.selected_columns().into_iter().collect(),
                    target: index,
                },
            };
            return self.modes.enter(mode);
        }

        let kind = match axis {
            Axis::Row => SelectionKind::Rows,
            Axis::Column => SelectionKind::Columns,
        };
        let bounds = self.bounds();
        if modifiers.shift && self.selection.current().is_some() {
            let (row, column) = match axis {
                Axis::Row => (index, 0),
                Axis::Column => (0, index),
            };
            if self.selection.set_current_kind(kind, bounds) | self.selection.shift_select(row, column, bounds) {
                self.selection_changed();
            }
        } else {
            match axis {
                Axis::Row => self.select_rows(index..index + 1),
                Axis::Column => self.select_columns(index..index + 1),
            };
        }
        if self.config.enable_drag_select {
            self.modes.enter(InteractionMode::DraggingSelection { kind });
        }
        true
    }

    fn near_fill_handle(&self, region: Region, x: f64, y: f64) -> bool {
        let (_, right) = self.columns.positions().span(region.columns());
        let (_, bottom) = self.rows.positions().span(region.rows());
        (x - right).abs() <= FILL_HANDLE && (y - bottom).abs() <= FILL_HANDLE
    }

    /// Pointer moved with a button held. Returns whether anything changed.
    pub fn pointer_move(&mut self, pane: Pane, x: f64, y: f64) -> bool {
        let row_at = self.rows.positions().index_at(y, true);
        let column_at = self.columns.positions().index_at(x, true);
        let bounds = self.bounds();

        match self.modes.mode().clone() {
            InteractionMode::ResizingRow {
                anchor_px, original, ..
            } => {
                let size = self.config.clamp_row_height(original + y - anchor_px);
                self.update_resize(size)
            }
            InteractionMode::ResizingColumn {
                anchor_px, original, ..
            } => {
                let size = self.config.clamp_column_width(original + x - anchor_px);
                self.update_resize(size)
            }
            InteractionMode::DraggingSelection { kind } => {
                let current = self.selection.current().unwrap_or((0, 0));
                let row = match (kind, pane) {
                    (SelectionKind::Columns, _) | (_, Pane::Header) => current.0,
                    _ => row_at.unwrap_or(current.0),
                };
                let column = match (kind, pane) {
                    (SelectionKind::Rows, _) | (_, Pane::Index) => current.1,
                    _ => column_at.unwrap_or(current.1),
                };
                let changed = self.selection.drag_to(row, column, bounds);
                if changed {
                    self.selection_changed();
                }
                changed
            }
            InteractionMode::DraggingRowReorder { .. } => self.update_reorder_target(row_at),
            InteractionMode::DraggingColumnReorder { .. } => self.update_reorder_target(column_at),
            InteractionMode::DragFilling { origin, extended } => {
                let (Some(row), Some(column)) = (row_at, column_at) else {
                    return false;
                };
                let next = fill_extent(origin, row, column);
                if next == extended {
                    return false;
                }
                if let InteractionMode::DragFilling { extended, .. } = self.modes.mode_mut() {
                    *extended = next;
                }
                self.schedule_redraw();
                true
            }
            _ => false,
        }
    }

    fn update_resize(&mut self, size: f64) -> bool {
        let slot = match self.modes.mode_mut() {
            InteractionMode::ResizingRow { current, .. } | InteractionMode::ResizingColumn { current, .. } => current,
            _ => return false,
        };
        if *slot == size {
            return false;
        }
        *slot = size;
        true
    }

    fn update_reorder_target(&mut self, at: Option<usize>) -> bool {
        let Some(at) = at else {
            return false;
        };
        let slot = match self.modes.mode_mut() {
            InteractionMode::DraggingRowReorder { target, .. }
            | InteractionMode::DraggingColumnReorder { target, .. } => target,
            _ => return false,
        };
        if *slot == at {
            return false;
        }
        *slot = at;
        true
    }

    /// Pointer released; finishes whatever drag was in progress.
    pub fn pointer_release(&mut self, pane: Pane, x: f64, y: f64) -> bool {
        if !self.modes.mode().is_dragging() {
            return false;
        }
        self.pointer_move(pane, x, y);
        match self.modes.finish() {
            InteractionMode::ResizingRow {
                row, original, current, ..
            } => current != original && self.set_row_height(row, current),
            InteractionMode::ResizingColumn {
                column,
                original,
                current,
                ..
            } => current != original && self.set_column_width(column, current),
            InteractionMode::DraggingRowReorder { rows, target } => self.drop_elements(Axis::Row, &rows, target),
            InteractionMode::DraggingColumnReorder { columns, target } => {
                self.drop_elements(Axis::Column, &columns, target)
            }
            InteractionMode::DragFilling { origin, extended } => extended != origin && self.fill_to(extended),
            InteractionMode::DraggingSelection { .. } => {
                if self.selection.merge() > 0 {
                    self.selection_changed();
                }
                true
            }
            _ => false,
        }
    }

    /// Move displayed elements so they land at the displayed `target`.
    fn drop_elements(&mut self, axis: Axis, displayed: &[usize], target: usize) -> bool {
        if displayed.is_empty() || displayed.contains(&target) {
            return false;
        }
        let layout = self.layout(axis);
        let Some(target) = layout.to_data(target) else {
            return false;
        };
        let mut moving: Vec<usize> = displayed.iter().filter_map(|&d| layout.to_data(d)).collect();
        moving.sort_unstable();
        let before = moving.iter().filter(|&&d| d < target).count();
        let past_last = moving.last().is_some_and(|&last| target > last);
        let to = target - before + usize::from(past_last);
        match axis {
            Axis::Row => self.move_rows(to, &moving),
            Axis::Column => self.move_columns(to, &moving),
        }
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// A key press. Returns whether the sheet handled it.
    pub fn key_press(&mut self, key: SheetKey) -> bool {
        if self.editor.is_open() {
            return self.editor_key(key);
        }
        if self.modes.mode().is_dragging() {
            if key == SheetKey::Escape {
                self.modes.finish();
                self.schedule_redraw();
                return true;
            }
            return false;
        }
        match key {
            SheetKey::Up => self.move_cursor(-1, 0),
            SheetKey::Down => self.move_cursor(1, 0),
            SheetKey::Left => self.move_cursor(0, -1),
            SheetKey::Right | SheetKey::Tab => self.move_cursor(0, 1),
            SheetKey::Return => self.open_cell(false),
            SheetKey::Escape => false,
            SheetKey::Delete | SheetKey::Backspace => self.delete_selected(),
            SheetKey::Char(ch) => match self.selection.current() {
                Some((row, column)) => self.open_cell_with(row, column, Some(ch.to_string()), false),
                None => false,
            },
            SheetKey::Copy => self.copy(),
            SheetKey::Cut => self.cut(),
            SheetKey::Paste => self.paste(),
            SheetKey::Undo => self.undo(),
            SheetKey::Redo => self.redo(),
            SheetKey::SelectAll => self.select_all(),
        }
    }

    fn editor_key(&mut self, key: SheetKey) -> bool {
        match key {
            SheetKey::Return => {
                self.close_editor(CloseKey::Return);
                true
            }
            SheetKey::Tab => {
                self.close_editor(CloseKey::Tab);
                true
            }
            SheetKey::Escape => {
                self.close_editor(CloseKey::Escape);
                true
            }
            SheetKey::Up => self.editor.move_highlight(-1),
            SheetKey::Down => self.editor.move_highlight(1),
            SheetKey::Char(ch) => {
                let mut text = self.editor.text().unwrap_or_default().to_string();
                text.push(ch);
                self.set_editor_text(text)
            }
            SheetKey::Backspace => {
                let mut text = self.editor.text().unwrap_or_default().to_string();
                text.pop();
                self.set_editor_text(text)
            }
            _ => false,
        }
    }
}

/// Element whose trailing edge lies within [`RESIZE_MARGIN`] of `px`.
fn resize_edge(positions: &PositionIndex, px: f64) -> Option<usize> {
    let index = positions.index_at(px, true)?;
    if positions.end(index).is_some_and(|end| (end - px).abs() <= RESIZE_MARGIN) {
        return Some(index);
    }
    let previous = index.checked_sub(1)?;
    positions
        .end(previous)
        .filter(|end| (end - px).abs() <= RESIZE_MARGIN)
        .map(|_| previous)
}

/// Region a fill drag to `(row, column)` covers: the origin stretched along
/// whichever axis the pointer moved further.
fn fill_extent(origin: Region, row: usize, column: usize) -> Region {
    let down = (row + 1).saturating_sub(origin.upto_r);
    let up = origin.from_r.saturating_sub(row);
    let right = (column + 1).saturating_sub(origin.upto_c);
    let left = origin.from_c.saturating_sub(column);
    let vertical = down.max(up);
    let horizontal = right.max(left);
    if vertical == 0 && horizontal == 0 {
        origin
    } else if vertical >= horizontal {
        Region::new(origin.from_r - up, origin.from_c, origin.upto_r + down, origin.upto_c)
    } else {
        Region::new(origin.from_r, origin.from_c - left, origin.upto_r, origin.upto_c + right)
    }
}
