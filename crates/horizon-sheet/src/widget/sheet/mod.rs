//! The sheet controller.
//!
//! [`Sheet`] owns every part of the widget: the data grid, both axis
//! layouts, the cell options and named spans, the selection, the editor,
//! the undo history, the renderer and the listener registry. The parts never
//! reference each other; the sheet hands each one what it needs for the call
//! at hand and keeps them consistent across structural edits.
//!
//! Methods that take `row` / `column` use **data** indices unless documented
//! otherwise. Selection, editing, scrolling and pointer input work in
//! **displayed** indices, which differ from data indices while rows or
//! columns are hidden.
//!
//! Redraws are coalesced: every change schedules one through a
//! [`Debouncer`], and the host pumps [`Sheet::process_timers`] from its event
//! loop to run it.

mod history;
mod input;
mod structure;
mod transfer;

pub use input::{Modifiers, SheetKey};

use std::fmt;
use std::time::{Duration, Instant};

use horizon_sheet_core::logging::targets;
use horizon_sheet_core::{ConnectionId, Debouncer, Rect, TimerManager};

use crate::config::SheetOptions;
use crate::error::{Result, SheetError};
use crate::model::{
    Axis, AxisLayout, CellOption, CellSnapshot, CellValue, DataGrid, DisplayMapping, EventName, History, Labels,
    NamedSpan, OptionKind, OptionTarget, OptionsRegistry, SpanAdjustment, SpanRegistry, UndoEntry,
};
use crate::widget::clipboard::ClipboardBackend;
use crate::widget::editor::{EditController, EditValidator, accept_value};
use crate::widget::events::{
    CellChange, EventKind, EventRegistry, LabelChange, ModifiedEvent, RedrawEvent, ResizeEvent, SelectionEvent,
    SheetEvent, VisibilityEvent,
};
use crate::widget::mode::{InteractionMode, ModeMachine};
use crate::widget::selection::{GridBounds, SelectionManager};
use crate::widget::text::TextMeasure;
use crate::widget::viewport::{GridView, RedrawStatus, Viewport, ViewportRenderer, fit_to_viewport};

#[cfg(feature = "system-clipboard")]
fn default_clipboard() -> Box<dyn ClipboardBackend> {
    Box::new(crate::widget::clipboard::SystemClipboard::new())
}

#[cfg(not(feature = "system-clipboard"))]
fn default_clipboard() -> Box<dyn ClipboardBackend> {
    Box::new(crate::widget::clipboard::MemoryClipboard::new())
}

/// A spreadsheet grid.
///
/// # Example
///
/// ```
/// use horizon_sheet::{CellValue, Sheet, SheetOptions, cells};
///
/// let mut sheet = Sheet::new(SheetOptions::default())
///     .with_data(vec![cells!["a", 1], cells!["b", 2]]);
///
/// assert!(sheet.edit_cell(0, 1, "10"));
/// assert_eq!(sheet.get_cell(0, 1).unwrap(), &CellValue::Int(10));
///
/// assert!(sheet.undo());
/// assert_eq!(sheet.get_cell(0, 1).unwrap(), &CellValue::Int(1));
/// ```
pub struct Sheet {
    data: DataGrid,
    row_count: usize,
    column_count: usize,
    rows: AxisLayout,
    columns: AxisLayout,
    options: OptionsRegistry,
    spans: SpanRegistry,
    selection: SelectionManager,
    editor: EditController,
    modes: ModeMachine,
    history: History,
    renderer: ViewportRenderer,
    viewport: Viewport,
    events: EventRegistry,
    clipboard: Box<dyn ClipboardBackend>,
    timers: TimerManager,
    redraw: Debouncer,
    last_frame: Option<RedrawEvent>,
    config: SheetOptions,
}

impl fmt::Debug for Sheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sheet")
            .field("rows", &self.row_count)
            .field("columns", &self.column_count)
            .field("selection", &self.selection.len())
            .field("mode", self.modes.mode())
            .field("undo", &self.history.undo_len())
            .field("redo", &self.history.redo_len())
            .finish_non_exhaustive()
    }
}

impl Default for Sheet {
    fn default() -> Self {
        Self::new(SheetOptions::default())
    }
}

impl Sheet {
    /// An empty sheet.
    pub fn new(config: SheetOptions) -> Self {
        Self {
            data: DataGrid::new(),
            row_count: 0,
            column_count: 0,
            rows: AxisLayout::new(0, config.default_row_height),
            columns: AxisLayout::new(0, config.default_column_width),
            options: OptionsRegistry::new(),
            spans: SpanRegistry::new(),
            selection: SelectionManager::new(),
            editor: EditController::new(),
            modes: ModeMachine::new(),
            history: History::new(config.max_undos),
            renderer: ViewportRenderer::new(),
            viewport: Viewport::default(),
            events: EventRegistry::new(),
            clipboard: default_clipboard(),
            timers: TimerManager::new(),
            redraw: Debouncer::new(Duration::from_millis(config.redraw_delay_ms)),
            last_frame: None,
            config,
        }
    }

    pub fn with_data(mut self, rows: Vec<Vec<CellValue>>) -> Self {
        self.set_data(rows);
        self
    }

    pub fn with_clipboard(mut self, clipboard: Box<dyn ClipboardBackend>) -> Self {
        self.clipboard = clipboard;
        self
    }

    pub fn with_text_measure(mut self, measure: Box<dyn TextMeasure>) -> Self {
        self.renderer.text_cache_mut().set_measure(measure);
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.viewport = Viewport::new(width, height);
        self
    }

    /// Replace all data.
    ///
    /// Sizes and visibility reset to defaults; history and selection are
    /// cleared. Options and spans are kept.
    pub fn set_data(&mut self, rows: Vec<Vec<CellValue>>) {
        self.discard_editor();
        self.data.set_rows(rows);
        self.row_count = self.data.total_rows();
        self.column_count = self.data.total_columns();
        self.rows = AxisLayout::new(self.row_count, self.config.default_row_height);
        self.columns = AxisLayout::new(self.column_count, self.config.default_column_width);
        self.history.clear();
        self.selection.clear();
        tracing::debug!(
            target: targets::SHEET,
            rows = self.row_count,
            columns = self.column_count,
            "data replaced"
        );
        self.schedule_redraw();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn options(&self) -> &SheetOptions {
        &self.config
    }

    /// Sheet options; changes apply from the next operation or redraw.
    pub fn options_mut(&mut self) -> &mut SheetOptions {
        &mut self.config
    }

    pub fn data(&self) -> &DataGrid {
        &self.data
    }

    /// Number of data rows, hidden ones included.
    pub fn total_rows(&self) -> usize {
        self.row_count
    }

    /// Number of data columns, hidden ones included.
    pub fn total_columns(&self) -> usize {
        self.column_count
    }

    pub fn row_layout(&self) -> &AxisLayout {
        &self.rows
    }

    pub fn column_layout(&self) -> &AxisLayout {
        &self.columns
    }

    pub fn cell_options(&self) -> &OptionsRegistry {
        &self.options
    }

    pub fn spans(&self) -> &SpanRegistry {
        &self.spans
    }

    pub fn selection(&self) -> &SelectionManager {
        &self.selection
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn mode(&self) -> &InteractionMode {
        self.modes.mode()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn renderer(&self) -> &ViewportRenderer {
        &self.renderer
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn events(&self) -> &EventRegistry {
        &self.events
    }

    /// Shorthand for `events().connect(kind, listener)`.
    pub fn connect<F>(&self, kind: EventKind, listener: F) -> ConnectionId
    where
        F: Fn(&SheetEvent) + Send + Sync + 'static,
    {
        self.events.connect(kind, listener)
    }

    /// The last completed redraw.
    pub fn last_frame(&self) -> Option<&RedrawEvent> {
        self.last_frame.as_ref()
    }

    /// Displayed extents.
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(self.rows.displayed_count(), self.columns.displayed_count())
    }

    pub fn view(&self) -> GridView<'_> {
        GridView {
            rows: &self.rows,
            columns: &self.columns,
            data: &self.data,
            options: &self.options,
            config: &self.config,
        }
    }

    // =========================================================================
    // Cell data
    // =========================================================================

    /// Value at a data cell; cells past a short row read as empty.
    pub fn get_cell(&self, row: usize, column: usize) -> Result<&CellValue> {
        self.check_cell(row, column)?;
        Ok(self.data.get_or_empty(row, column))
    }

    /// Text a data cell renders as.
    pub fn cell_text(&self, row: usize, column: usize) -> Result<String> {
        self.check_cell(row, column)?;
        Ok(self.view().cell_text(row, column))
    }

    /// Store a value programmatically.
    ///
    /// The value still has to suit the cell's options, but no validator runs,
    /// nothing is recorded for undo and no event is emitted. Writing past the
    /// end grows the sheet.
    pub fn set_cell(&mut self, row: usize, column: usize, value: impl Into<CellValue>) -> bool {
        let value = value.into();
        let Some(value) = accept_value(&self.options, row, column, &value) else {
            tracing::debug!(target: targets::SHEET, row, column, "value refused by cell options");
            return false;
        };
        self.write_cell(row, column, value);
        self.schedule_redraw();
        true
    }

    /// Header label of a data column.
    pub fn header_label(&self, column: usize) -> Option<&CellValue> {
        self.data.header_value(column)
    }

    /// Index label of a data row.
    pub fn index_label(&self, row: usize) -> Option<&CellValue> {
        self.data.index_value(row)
    }

    pub fn set_header_labels(&mut self, labels: Labels) {
        self.data.set_header(labels);
        self.schedule_redraw();
    }

    pub fn set_index_labels(&mut self, labels: Labels) {
        self.data.set_index(labels);
        self.schedule_redraw();
    }

    fn check_cell(&self, row: usize, column: usize) -> Result<()> {
        if row >= self.row_count {
            return Err(SheetError::RowOutOfBounds {
                row,
                total: self.row_count,
            });
        }
        if column >= self.column_count {
            return Err(SheetError::ColumnOutOfBounds {
                column,
                total: self.column_count,
            });
        }
        Ok(())
    }

    /// Store an accepted value, growing the sheet to hold it. Returns the old value.
    fn write_cell(&mut self, row: usize, column: usize, value: CellValue) -> CellValue {
        let options = &self.options;
        let old = self
            .data
            .set(row, column, value, |r, c| options.default_value(r, c));
        self.grow_to(row + 1, column + 1);
        old
    }

    /// Extend the row and column counts (and layouts) to at least the given sizes.
    fn grow_to(&mut self, rows: usize, columns: usize) {
        if rows > self.row_count {
            let extra = rows - self.row_count;
            self.rows
                .insert(self.row_count, &vec![self.config.default_row_height; extra]);
            self.row_count = rows;
        }
        if columns > self.column_count {
            let extra = columns - self.column_count;
            self.columns
                .insert(self.column_count, &vec![self.config.default_column_width; extra]);
            self.column_count = columns;
        }
    }

    /// Apply accepted values, recording the old ones in `entry`.
    ///
    /// Values equal to what is stored are skipped.
    fn write_cells(&mut self, entry: &mut UndoEntry, writes: Vec<(usize, usize, CellValue)>) -> Vec<CellChange> {
        let mut changes = Vec::new();
        for (row, column, value) in writes {
            let old = self.data.get_or_empty(row, column).clone();
            if old == value {
                continue;
            }
            entry.cells.record(row, column, old.clone());
            self.write_cell(row, column, value.clone());
            changes.push(CellChange {
                row,
                column,
                old,
                new: value,
            });
        }
        changes
    }

    /// Set a header or index label as one undoable edit.
    fn write_label(&mut self, axis: Axis, index: usize, value: CellValue) -> Option<LabelChange> {
        let (labels, event) = match axis {
            Axis::Column => (self.data.header(), EventName::EditHeader),
            Axis::Row => (self.data.index(), EventName::EditIndex),
        };
        // Labels drawn from a data row or column are edited through that cell.
        if let Labels::FromData(source) = *labels {
            let (row, column) = match axis {
                Axis::Column => (source, index),
                Axis::Row => (index, source),
            };
            let mut entry = UndoEntry::new(event, self.selection.snapshot());
            let change = self.write_cells(&mut entry, vec![(row, column, value)]).pop()?;
            self.commit(entry);
            return Some(LabelChange {
                index,
                old: change.old,
                new: change.new,
            });
        }

        let old = match axis {
            Axis::Column => self.data.header_value(index),
            Axis::Row => self.data.index_value(index),
        }
        .cloned()
        .unwrap_or_default();
        if old == value {
            return None;
        }
        let labels = match axis {
            Axis::Column => self.data.header_mut(),
            Axis::Row => self.data.index_mut(),
        };
        if !labels.set(index, value.clone()) {
            return None;
        }
        let mut entry = UndoEntry::new(event, self.selection.snapshot());
        match axis {
            Axis::Column => entry.cells.record_header(index, old.clone()),
            Axis::Row => entry.cells.record_index(index, old.clone()),
        }
        self.commit(entry);
        Some(LabelChange { index, old, new: value })
    }

    // =========================================================================
    // Cell options and named spans
    // =========================================================================

    /// Attach an option; values the option forbids are replaced by its default.
    pub fn set_option(&mut self, target: OptionTarget, option: CellOption) -> Option<CellOption> {
        let affects = option.kind().affects_values();
        let previous = self.options.set(target, option);
        if affects {
            self.enforce_option_values(&[target], None);
        }
        self.schedule_redraw();
        previous
    }

    pub fn remove_option(&mut self, target: OptionTarget, kind: OptionKind) -> Option<CellOption> {
        let removed = self.options.remove(target, kind);
        if removed.is_some() {
            self.schedule_redraw();
        }
        removed
    }

    /// Remove every option attached to `target`.
    pub fn clear_options(&mut self, target: OptionTarget) {
        self.options.clear(target);
        self.schedule_redraw();
    }

    /// Register a named span and attach its option to the area it covers.
    pub fn add_span(&mut self, span: NamedSpan) -> Result<()> {
        let targets: Vec<OptionTarget> = span.targets().into_iter().collect();
        let option = span.option.clone();
        self.spans.add(span)?;
        if let Some(option) = option {
            let affects = option.kind().affects_values();
            for &target in &targets {
                self.options.set(target, option.clone());
            }
            if affects {
                self.enforce_option_values(&targets, None);
            }
        }
        self.schedule_redraw();
        Ok(())
    }

    /// Drop a named span and the option it attached.
    pub fn remove_span(&mut self, name: &str) -> Result<NamedSpan> {
        let span = self.spans.remove(name)?;
        if let Some(option) = &span.option {
            for target in span.targets() {
                self.options.remove(target, option.kind());
            }
        }
        self.schedule_redraw();
        Ok(span)
    }

    pub fn span(&self, name: &str) -> Result<&NamedSpan> {
        self.spans.get(name)
    }

    /// Data cells covered by an option target within the current extents.
    fn target_cells(&self, target: OptionTarget) -> Vec<(usize, usize)> {
        match target {
            OptionTarget::Cell(row, column) if row < self.row_count && column < self.column_count => {
                vec![(row, column)]
            }
            OptionTarget::Row(row) if row < self.row_count => (0..self.column_count).map(|c| (row, c)).collect(),
            OptionTarget::Column(column) if column < self.column_count => {
                (0..self.row_count).map(|r| (r, column)).collect()
            }
            OptionTarget::Global => (0..self.row_count)
                .flat_map(|r| (0..self.column_count).map(move |c| (r, c)))
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Replace values a dropdown or checkbox no longer allows with the
    /// option default, recording old values into `snapshot` when given.
    fn enforce_option_values(&mut self, targets: &[OptionTarget], mut snapshot: Option<&mut CellSnapshot>) {
        let mut replaced = 0usize;
        for &target in targets {
            for (row, column) in self.target_cells(target) {
                let value = self.data.get_or_empty(row, column);
                let replacement = if let Some(spec) = self.options.dropdown(row, column) {
                    (spec.validate_input && !spec.values.contains(value)).then(|| spec.default_value())
                } else if self.options.checkbox(row, column).is_some() {
                    (!matches!(value, CellValue::Bool(_)))
                        .then(|| CellValue::Bool(value.bool_like().unwrap_or(false)))
                } else {
                    None
                };
                let Some(replacement) = replacement else {
                    continue;
                };
                let old = self.write_cell(row, column, replacement);
                if let Some(snapshot) = snapshot.as_deref_mut() {
                    snapshot.record(row, column, old);
                }
                replaced += 1;
            }
        }
        if replaced > 0 {
            tracing::debug!(target: targets::SHEET, replaced, "values replaced by option defaults");
        }
    }

    /// Move options along with spans that grew, shrank or moved.
    fn apply_span_adjustments(&mut self, adjustments: Vec<SpanAdjustment>, snapshot: &mut CellSnapshot) {
        for adjustment in adjustments {
            let Some(option) = adjustment.option else {
                continue;
            };
            let kind = option.kind();
            for &target in &adjustment.lost {
                self.options.remove_matching(target, &option);
            }
            for &target in &adjustment.gained {
                self.options.set(target, option.clone());
            }
            if kind.affects_values() && !adjustment.gained.is_empty() {
                self.enforce_option_values(&adjustment.gained, Some(snapshot));
            }
            tracing::trace!(
                target: targets::MUTATION,
                span = %adjustment.name,
                gained = adjustment.gained.len(),
                lost = adjustment.lost.len(),
                removed = adjustment.removed,
                "span adjusted"
            );
        }
    }

    // =========================================================================
    // Sizes and visibility
    // =========================================================================

    /// Set the height of a displayed row, clamped to the configured limits.
    pub fn set_row_height(&mut self, row: usize, height: f64) -> bool {
        let height = self.config.clamp_row_height(height);
        self.resize_element(Axis::Row, row, height)
    }

    /// Set the width of a displayed column, clamped to the configured limits.
    pub fn set_column_width(&mut self, column: usize, width: f64) -> bool {
        let width = self.config.clamp_column_width(width);
        self.resize_element(Axis::Column, column, width)
    }

    fn resize_element(&mut self, axis: Axis, index: usize, size: f64) -> bool {
        let Some(old) = self.layout_mut(axis).resize(index, size) else {
            return false;
        };
        if old == size {
            return false;
        }
        self.emit(SheetEvent::Resized(ResizeEvent {
            axis,
            index,
            old,
            new: size,
        }));
        self.schedule_redraw();
        true
    }

    pub fn hide_rows(&mut self, rows: &[usize]) -> bool {
        self.set_visibility(Axis::Row, rows, false)
    }

    pub fn show_rows(&mut self, rows: &[usize]) -> bool {
        self.set_visibility(Axis::Row, rows, true)
    }

    pub fn hide_columns(&mut self, columns: &[usize]) -> bool {
        self.set_visibility(Axis::Column, columns, false)
    }

    pub fn show_columns(&mut self, columns: &[usize]) -> bool {
        self.set_visibility(Axis::Column, columns, true)
    }

    pub fn show_all_rows(&mut self) -> bool {
        let hidden = self.rows.hidden(self.row_count);
        self.set_visibility(Axis::Row, &hidden, true)
    }

    pub fn show_all_columns(&mut self) -> bool {
        let hidden = self.columns.hidden(self.column_count);
        self.set_visibility(Axis::Column, &hidden, true)
    }

    /// Display exactly the given data rows, or all rows for `None`.
    ///
    /// The list must be strictly increasing and within the data.
    pub fn set_displayed_rows(&mut self, rows: Option<Vec<usize>>) -> Result<bool> {
        self.set_displayed(Axis::Row, rows)
    }

    /// Display exactly the given data columns, or all columns for `None`.
    pub fn set_displayed_columns(&mut self, columns: Option<Vec<usize>>) -> Result<bool> {
        self.set_displayed(Axis::Column, columns)
    }

    fn set_displayed(&mut self, axis: Axis, indices: Option<Vec<usize>>) -> Result<bool> {
        let total = self.count(axis);
        let Some(indices) = indices else {
            let hidden = self.layout(axis).hidden(total);
            return Ok(self.set_visibility(axis, &hidden, true));
        };
        let mapping = DisplayMapping::from_indices(indices, total)?;
        let hide: Vec<usize> = (0..total).filter(|&d| !mapping.is_displayed(d)).collect();
        let show: Vec<usize> = (0..total).filter(|&d| mapping.is_displayed(d)).collect();
        let shown = self.set_visibility(axis, &show, true);
        let hidden = self.set_visibility(axis, &hide, false);
        Ok(shown || hidden)
    }

    fn set_visibility(&mut self, axis: Axis, data: &[usize], shown: bool) -> bool {
        let total = self.count(axis);
        let layout = self.layout(axis);
        let mut changed: Vec<usize> = data
            .iter()
            .copied()
            .filter(|&d| d < total && layout.to_displayed(d).is_some() != shown)
            .collect();
        changed.sort_unstable();
        changed.dedup();
        if changed.is_empty() {
            return false;
        }

        if shown {
            self.layout_mut(axis).show(&changed, total);
        } else {
            self.layout_mut(axis).hide(&changed, total);
        }
        tracing::debug!(target: targets::SHEET, ?axis, count = changed.len(), shown, "visibility changed");

        // Displayed indices shifted under the selection.
        let had_selection = !self.selection.is_empty();
        self.selection.clear();
        self.emit(SheetEvent::VisibilityChanged(VisibilityEvent {
            axis,
            indices: changed,
            shown,
        }));
        if had_selection {
            self.emit_selection();
        }
        self.schedule_redraw();
        true
    }

    // =========================================================================
    // Viewport and redraw
    // =========================================================================

    /// Set the table pane size after a host layout pass.
    pub fn resize_viewport(&mut self, width: f64, height: f64) {
        self.viewport.width = width;
        self.viewport.height = height;
        self.schedule_redraw();
    }

    /// Scroll the table pane to an absolute content offset.
    pub fn scroll_to(&mut self, x: f64, y: f64) {
        let max_x = (self.columns.positions().total() - self.viewport.width).max(0.0);
        let max_y = (self.rows.positions().total() - self.viewport.height).max(0.0);
        self.viewport.scroll_x = x.clamp(0.0, max_x);
        self.viewport.scroll_y = y.clamp(0.0, max_y);
        self.schedule_redraw();
    }

    /// Content rectangle of a displayed cell.
    pub fn cell_rect(&self, row: usize, column: usize) -> Option<Rect> {
        if row >= self.rows.displayed_count() || column >= self.columns.displayed_count() {
            return None;
        }
        let (top, bottom) = self.rows.positions().span(row..row + 1);
        let (left, right) = self.columns.positions().span(column..column + 1);
        Some(Rect::from_edges(left, top, right, bottom))
    }

    /// Scroll the least distance that brings a displayed cell into view.
    pub fn see(&mut self, row: usize, column: usize) -> bool {
        let Some(rect) = self.cell_rect(row, column) else {
            return false;
        };
        if !self.viewport.scroll_to(rect) {
            return false;
        }
        self.schedule_redraw();
        true
    }

    /// Ask for a redraw; calls before the pending one runs are coalesced.
    pub fn schedule_redraw(&mut self) -> bool {
        self.schedule_redraw_at(Instant::now())
    }

    pub fn schedule_redraw_at(&mut self, now: Instant) -> bool {
        self.redraw
            .set_delay(Duration::from_millis(self.config.redraw_delay_ms));
        self.redraw.schedule(&mut self.timers, now)
    }

    pub fn is_redraw_pending(&self) -> bool {
        self.redraw.is_pending()
    }

    /// How long the host may sleep before calling [`process_timers`](Self::process_timers).
    pub fn time_until_next(&mut self, now: Instant) -> Option<Duration> {
        self.timers.time_until_next(now)
    }

    /// Run expired timers; returns the redraw outcome when one was due.
    pub fn process_timers(&mut self, now: Instant) -> Option<RedrawStatus> {
        let fired = self.timers.process_expired(now);
        if self.redraw.fire(&fired) {
            Some(self.redraw_now())
        } else {
            None
        }
    }

    /// Redraw immediately, bypassing the debounce.
    pub fn redraw_now(&mut self) -> RedrawStatus {
        if !self.viewport.is_ready() {
            tracing::debug!(target: targets::RENDER, "viewport not laid out, redraw deferred");
            return RedrawStatus::NotReady;
        }
        if let Some(min) = self.config.auto_resize_columns {
            fit_to_viewport(&mut self.columns, self.viewport.width, min);
        }
        if let Some(min) = self.config.auto_resize_rows {
            fit_to_viewport(&mut self.rows, self.viewport.height, min);
        }
        self.selection
            .layout(&self.rows, &self.columns, &self.config);

        let view = GridView {
            rows: &self.rows,
            columns: &self.columns,
            data: &self.data,
            options: &self.options,
            config: &self.config,
        };
        let status = self.renderer.redraw(&view, &self.viewport);
        if let RedrawStatus::Drawn(frame) = &status {
            self.last_frame = Some(frame.clone());
            self.events.emit(SheetEvent::RedrawCompleted(frame.clone()));
        }
        status
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn emit(&self, event: SheetEvent) {
        self.events.emit(event);
    }

    fn emit_selection(&self) {
        self.emit(SheetEvent::SelectionChanged(SelectionEvent {
            boxes: self.selection.selected_boxes(),
            current: self.selection.current(),
        }));
    }

    fn emit_modified(&self, event: EventName, table: Vec<CellChange>) {
        let mut modified = ModifiedEvent::new(event);
        modified.table = table;
        self.emit(SheetEvent::CellsModified(modified));
    }

    /// Record an undo entry unless undo is off or the entry changes nothing.
    fn commit(&mut self, entry: UndoEntry) {
        if !self.config.enable_undo || entry.is_noop() {
            return;
        }
        if self.history.max_undos() != self.config.max_undos {
            self.history.set_max_undos(self.config.max_undos);
        }
        tracing::debug!(target: targets::HISTORY, event = ?entry.event, "recorded");
        self.history.commit(entry);
    }

    fn count(&self, axis: Axis) -> usize {
        match axis {
            Axis::Row => self.row_count,
            Axis::Column => self.column_count,
        }
    }

    fn count_mut(&mut self, axis: Axis) -> &mut usize {
        match axis {
            Axis::Row => &mut self.row_count,
            Axis::Column => &mut self.column_count,
        }
    }

    fn layout(&self, axis: Axis) -> &AxisLayout {
        match axis {
            Axis::Row => &self.rows,
            Axis::Column => &self.columns,
        }
    }

    fn layout_mut(&mut self, axis: Axis) -> &mut AxisLayout {
        match axis {
            Axis::Row => &mut self.rows,
            Axis::Column => &mut self.columns,
        }
    }

    /// Data cell behind a displayed cell.
    fn data_cell(&self, row: usize, column: usize) -> Option<(usize, usize)> {
        Some((self.rows.to_data(row)?, self.columns.to_data(column)?))
    }

    /// Close any open editor without committing.
    fn discard_editor(&mut self) {
        if self.editor.begin_close(crate::widget::editor::CloseKey::Escape).is_some() {
            self.editor.finish_close();
        }
        if self.modes.mode().is_editing() {
            self.modes.finish();
        }
    }

    /// Install or remove the user validator run on every edit and paste.
    pub fn set_validator(&mut self, validator: Option<EditValidator>) {
        self.editor.set_validator(validator);
    }
}
