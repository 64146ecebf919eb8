//! Virtualized rendering of the table, header and index panes.
//!
//! A redraw looks up the displayed rows and columns intersecting the
//! viewport and places primitives for those cells only, so the work per frame
//! depends on the viewport size and not on the size of the sheet. Primitives
//! are recycled through the [`PrimitiveArena`] between frames.
//!
//! Coordinates: table primitives are in content coordinates (the host
//! subtracts the scroll offset). Header primitives use content x and pane y;
//! index primitives use pane x and content y.

use std::ops::Range;

use horizon_sheet_core::logging::{span_names, targets};
use horizon_sheet_core::{Color, PerfSpan, Rect};

use crate::config::{FontSpec, SheetOptions, TextWrap};
use crate::model::{
    Align, AxisLayout, CellFormatter, CellOption, CellValue, DataGrid, OptionKind, OptionsRegistry,
    stretch_to_fill,
};
use crate::widget::arena::{Pane, PrimitiveArena, PrimitiveKind, PrimitiveStyle};
use crate::widget::events::RedrawEvent;
use crate::widget::text::{CharWidthCache, TextMeasure};

const PANES: [Pane; 4] = [Pane::Table, Pane::Header, Pane::Index, Pane::Corner];

/// Scroll offset and size of the table pane.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_x: f64,
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Whether the host has laid the pane out yet.
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    pub fn right(&self) -> f64 {
        self.scroll_x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.scroll_y + self.height
    }

    /// Scroll the least distance that brings `rect` fully into view.
    ///
    /// A rect larger than the viewport is aligned to its leading edge.
    pub fn scroll_to(&mut self, rect: Rect) -> bool {
        let before = (self.scroll_x, self.scroll_y);
        if rect.left() < self.scroll_x || rect.width() > self.width {
            self.scroll_x = rect.left();
        } else if rect.right() > self.right() {
            self.scroll_x = rect.right() - self.width;
        }
        if rect.top() < self.scroll_y || rect.height() > self.height {
            self.scroll_y = rect.top();
        } else if rect.bottom() > self.bottom() {
            self.scroll_y = rect.bottom() - self.height;
        }
        (self.scroll_x, self.scroll_y) != before
    }
}

/// Read-only view of everything a redraw needs.
#[derive(Debug, Clone, Copy)]
pub struct GridView<'a> {
    pub rows: &'a AxisLayout,
    pub columns: &'a AxisLayout,
    pub data: &'a DataGrid,
    pub options: &'a OptionsRegistry,
    pub config: &'a SheetOptions,
}

impl GridView<'_> {
    /// Rendered text of a table cell.
    pub fn cell_text(&self, row: usize, column: usize) -> String {
        let value = self.data.get_or_empty(row, column);
        match self.options.format(row, column) {
            Some(format) => format.format(value),
            None => value.to_string(),
        }
    }

    fn blocks_overflow(&self, row: usize, column: usize) -> bool {
        !self.data.get_or_empty(row, column).is_empty() || self.options.is_interactive(row, column)
    }
}

/// Outcome of a redraw.
#[derive(Debug, Clone, PartialEq)]
pub enum RedrawStatus {
    Drawn(RedrawEvent),
    /// The viewport has no size yet; retry after the next layout.
    NotReady,
}

/// Spreadsheet-style column name: `A`..`Z`, `AA`, `AB`, ...
pub fn column_letters(column: usize) -> String {
    let mut n = column + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8_lossy(&out).into_owned()
}

/// Stretch the displayed elements of `layout` to fill `extent` when they
/// fall short of it. Returns whether any size changed.
pub fn fit_to_viewport(layout: &mut AxisLayout, extent: f64, min_size: f64) -> bool {
    let positions = layout.positions();
    if positions.is_empty() || positions.total() >= extent {
        return false;
    }
    let sizes = stretch_to_fill(&positions.sizes(), extent, min_size);
    if sizes == positions.sizes() {
        return false;
    }
    layout.set_displayed_sizes(&sizes);
    true
}

/// Draws the panes into its own primitive arena.
#[derive(Debug, Default)]
pub struct ViewportRenderer {
    arena: PrimitiveArena,
    text: CharWidthCache,
}

impl ViewportRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_measure(measure: Box<dyn TextMeasure>) -> Self {
        Self {
            text: CharWidthCache::new(measure),
            ..Self::default()
        }
    }

    pub fn arena(&self) -> &PrimitiveArena {
        &self.arena
    }

    pub fn text_cache(&self) -> &CharWidthCache {
        &self.text
    }

    pub fn text_cache_mut(&mut self) -> &mut CharWidthCache {
        &mut self.text
    }

    /// Displayed rows and columns intersecting the viewport.
    pub fn visible(view: &GridView<'_>, viewport: &Viewport) -> (Range<usize>, Range<usize>) {
        (
            view.rows.visible_range(viewport.scroll_y, viewport.bottom()),
            view.columns.visible_range(viewport.scroll_x, viewport.right()),
        )
    }

    /// Redraw every pane for the current viewport.
    #[tracing::instrument(skip_all, target = "horizon_sheet::render", level = "trace")]
    pub fn redraw(&mut self, view: &GridView<'_>, viewport: &Viewport) -> RedrawStatus {
        if !viewport.is_ready() {
            tracing::debug!(target: targets::RENDER, width = viewport.width, height = viewport.height, "redraw before layout");
            return RedrawStatus::NotReady;
        }
        let _perf = PerfSpan::new(span_names::REDRAW);

        let (rows, columns) = Self::visible(view, viewport);
        self.arena.begin_frame(&PANES);

        self.draw_backgrounds(view, viewport);
        for r in rows.clone() {
            for c in columns.clone() {
                self.draw_cell(view, viewport, r, c, &columns);
            }
            self.draw_row_extension(view, viewport, r);
        }
        self.draw_grid(view, viewport, &rows, &columns);
        self.draw_header(view, &columns);
        self.draw_index(view, &rows);

        let stats = self.arena.end_frame(&PANES);
        tracing::trace!(
            target: targets::RENDER,
            rows = rows.len(),
            columns = columns.len(),
            created = stats.created,
            reused = stats.reused,
            hidden = stats.hidden,
            "redraw"
        );
        RedrawStatus::Drawn(RedrawEvent { rows, columns, stats })
    }

    fn draw_backgrounds(&mut self, view: &GridView<'_>, viewport: &Viewport) {
        let palette = &view.config.palette;
        let table = Rect::new(viewport.scroll_x, viewport.scroll_y, viewport.width, viewport.height);
        self.arena
            .place(Pane::Table, PrimitiveKind::CellBackground, table, PrimitiveStyle::filled(palette.table_bg));
        self.arena.place(
            Pane::Header,
            PrimitiveKind::CellBackground,
            Rect::new(viewport.scroll_x, 0.0, viewport.width, view.config.header_height),
            PrimitiveStyle::filled(palette.header_bg),
        );
        self.arena.place(
            Pane::Index,
            PrimitiveKind::CellBackground,
            Rect::new(0.0, viewport.scroll_y, view.config.index_width, viewport.height),
            PrimitiveStyle::filled(palette.index_bg),
        );
        self.arena.place(
            Pane::Corner,
            PrimitiveKind::CellBackground,
            Rect::new(0.0, 0.0, view.config.index_width, view.config.header_height),
            PrimitiveStyle::filled(palette.header_bg),
        );
    }

    fn cell_rect(view: &GridView<'_>, r: usize, c: usize) -> Option<Rect> {
        let rows = view.rows.positions();
        let columns = view.columns.positions();
        Some(Rect::from_edges(columns.start(c)?, rows.start(r)?, columns.end(c)?, rows.end(r)?))
    }

    fn draw_cell(&mut self, view: &GridView<'_>, viewport: &Viewport, r: usize, c: usize, visible: &Range<usize>) {
        let (Some(dr), Some(dc)) = (view.rows.to_data(r), view.columns.to_data(c)) else {
            return;
        };
        let Some(rect) = Self::cell_rect(view, r, c) else {
            return;
        };
        let config = view.config;
        let palette = &config.palette;
        let highlight = view.options.highlight(dr, dc).copied();
        if let Some(bg) = highlight.and_then(|h| h.bg) {
            self.arena
                .place(Pane::Table, PrimitiveKind::CellBackground, rect, PrimitiveStyle::filled(bg));
        }
        let fg = highlight.and_then(|h| h.fg).unwrap_or(palette.table_fg);
        let align = view.options.align(dr, dc).unwrap_or_default();
        let padding = config.cell_padding;
        let mut text_rect = rect;
        let text;

        if let Some(spec) = view.options.checkbox(dr, dc) {
            let side = (rect.height() - 2.0 * padding).min(rect.width() - 2.0 * padding).max(0.0);
            let checked = view.data.get_or_empty(dr, dc).as_bool().unwrap_or(false);
            let box_rect = Rect::new(rect.left() + padding, rect.top() + (rect.height() - side) / 2.0, side, side);
            self.arena.place(
                Pane::Table,
                PrimitiveKind::Checkbox,
                box_rect,
                PrimitiveStyle {
                    outline: Some(palette.checkbox),
                    checked,
                    ..PrimitiveStyle::default()
                },
            );
            text_rect = Rect::from_edges(box_rect.right(), rect.top(), rect.right(), rect.bottom());
            text = spec.text.clone();
        } else {
            if view.options.dropdown(dr, dc).is_some() {
                let side = (rect.height() - 2.0 * padding).min(rect.width() / 2.0).max(0.0);
                let arrow = Rect::new(rect.right() - padding - side, rect.top() + (rect.height() - side) / 2.0, side, side);
                self.arena.place(
                    Pane::Table,
                    PrimitiveKind::DropdownArrow,
                    arrow,
                    PrimitiveStyle::filled(palette.dropdown_arrow),
                );
                text_rect = Rect::from_edges(rect.left(), rect.top(), arrow.left(), rect.bottom());
            }
            text = view.cell_text(dr, dc);
        }
        if text.is_empty() {
            return;
        }

        let font = &config.table_font;
        if config.allow_cell_overflow
            && config.table_wrap == TextWrap::None
            && !view.options.is_interactive(dr, dc)
            && self.text.text_width(font, &text) > text_rect.width() - 2.0 * padding
        {
            text_rect = self.overflow_rect(view, viewport, r, c, visible, align, text_rect);
        }
        self.place_text(Pane::Table, font, &text, text_rect, padding, config.table_wrap, fg, align);
    }

    /// Grow `rect` across empty, non-interactive neighbors in the direction
    /// the text flows, stopping at the viewport edge.
    #[allow(clippy::too_many_arguments)]
    fn overflow_rect(
        &mut self,
        view: &GridView<'_>,
        viewport: &Viewport,
        r: usize,
        c: usize,
        visible: &Range<usize>,
        align: Align,
        rect: Rect,
    ) -> Rect {
        let Some(dr) = view.rows.to_data(r) else {
            return rect;
        };
        let free = |col: usize| view.columns.to_data(col).is_some_and(|dc| !view.blocks_overflow(dr, dc));
        let positions = view.columns.positions();
        let (mut left, mut right) = (rect.left(), rect.right());
        if matches!(align, Align::Left | Align::Center) {
            let mut next = c + 1;
            while next < visible.end && free(next) {
                right = positions.end(next).unwrap_or(right);
                next += 1;
            }
            right = right.min(viewport.right());
        }
        if matches!(align, Align::Right | Align::Center) {
            let mut prev = c;
            while prev > visible.start && free(prev - 1) {
                prev -= 1;
                left = positions.start(prev).unwrap_or(left);
            }
            left = left.max(viewport.scroll_x);
        }
        Rect::from_edges(left, rect.top(), right, rect.bottom())
    }

    #[allow(clippy::too_many_arguments)]
    fn place_text(
        &mut self,
        pane: Pane,
        font: &FontSpec,
        text: &str,
        rect: Rect,
        padding: f64,
        wrap: TextWrap,
        color: Color,
        align: Align,
    ) {
        let inner = Rect::from_edges(rect.left() + padding, rect.top(), rect.right() - padding, rect.bottom());
        if inner.width() <= 0.0 {
            return;
        }
        let mut lines = self.text.wrap(font, text, inner.width(), wrap);
        let line_height = self.text.line_height(font);
        let max_lines = if line_height > 0.0 {
            ((inner.height() / line_height).floor() as usize).max(1)
        } else {
            1
        };
        lines.truncate(max_lines);
        if lines.iter().all(String::is_empty) {
            return;
        }
        self.arena
            .place(pane, PrimitiveKind::Text, inner, PrimitiveStyle::text(lines, color, align));
    }

    /// Row highlights marked `end_of_screen` continue past the last column.
    fn draw_row_extension(&mut self, view: &GridView<'_>, viewport: &Viewport, r: usize) {
        let Some(dr) = view.rows.to_data(r) else {
            return;
        };
        let Some(bg) = view.options.row_highlight(dr).filter(|h| h.end_of_screen).and_then(|h| h.bg) else {
            return;
        };
        let columns_end = view.columns.positions().total();
        if columns_end >= viewport.right() {
            return;
        }
        let rows = view.rows.positions();
        let (Some(top), Some(bottom)) = (rows.start(r), rows.end(r)) else {
            return;
        };
        let rect = Rect::from_edges(columns_end.max(viewport.scroll_x), top, viewport.right(), bottom);
        self.arena
            .place(Pane::Table, PrimitiveKind::CellBackground, rect, PrimitiveStyle::filled(bg));
    }

    fn draw_grid(&mut self, view: &GridView<'_>, viewport: &Viewport, rows: &Range<usize>, columns: &Range<usize>) {
        let config = view.config;
        let color = config.palette.table_grid;
        let (top, bottom) = view.rows.positions().span(rows.clone());
        let (left, right) = view.columns.positions().span(columns.clone());
        let right = right.min(viewport.right());
        let bottom = bottom.min(viewport.bottom());

        if config.show_horizontal_grid {
            for r in rows.clone() {
                if let Some(y) = view.rows.positions().end(r) {
                    let line = Rect::from_edges(left, y, right, y);
                    self.arena
                        .place(Pane::Table, PrimitiveKind::GridLine, line, PrimitiveStyle::filled(color));
                }
            }
        }
        if config.show_vertical_grid {
            for c in columns.clone() {
                if let Some(x) = view.columns.positions().end(c) {
                    let line = Rect::from_edges(x, top, x, bottom);
                    self.arena
                        .place(Pane::Table, PrimitiveKind::GridLine, line, PrimitiveStyle::filled(color));
                }
            }
        }
    }

    fn draw_header(&mut self, view: &GridView<'_>, columns: &Range<usize>) {
        let config = view.config;
        let palette = &config.palette;
        let height = config.header_height;
        for c in columns.clone() {
            let (Some(dc), Some(left), Some(right)) =
                (view.columns.to_data(c), view.columns.positions().start(c), view.columns.positions().end(c))
            else {
                continue;
            };
            let rect = Rect::from_edges(left, 0.0, right, height);
            let highlight = match view.options.resolve_header(dc, OptionKind::Highlight) {
                Some(CellOption::Highlight(h)) => Some(*h),
                _ => None,
            };
            if let Some(bg) = highlight.and_then(|h| h.bg) {
                self.arena
                    .place(Pane::Header, PrimitiveKind::CellBackground, rect, PrimitiveStyle::filled(bg));
            }
            let align = match view.options.resolve_header(dc, OptionKind::Align) {
                Some(CellOption::Align(a)) => *a,
                _ => Align::Center,
            };
            let text = label_text(view.data.header_value(dc), || column_letters(dc));
            let fg = highlight.and_then(|h| h.fg).unwrap_or(palette.header_fg);
            self.place_text(Pane::Header, &config.header_font, &text, rect, config.cell_padding, TextWrap::None, fg, align);
            self.arena.place(
                Pane::Header,
                PrimitiveKind::GridLine,
                Rect::from_edges(right, 0.0, right, height),
                PrimitiveStyle::filled(palette.header_grid),
            );
        }
    }

    fn draw_index(&mut self, view: &GridView<'_>, rows: &Range<usize>) {
        let config = view.config;
        let palette = &config.palette;
        let width = config.index_width;
        for r in rows.clone() {
            let (Some(dr), Some(top), Some(bottom)) =
                (view.rows.to_data(r), view.rows.positions().start(r), view.rows.positions().end(r))
            else {
                continue;
            };
            let rect = Rect::from_edges(0.0, top, width, bottom);
            let highlight = match view.options.resolve_index(dr, OptionKind::Highlight) {
                Some(CellOption::Highlight(h)) => Some(*h),
                _ => None,
            };
            if let Some(bg) = highlight.and_then(|h| h.bg) {
                self.arena
                    .place(Pane::Index, PrimitiveKind::CellBackground, rect, PrimitiveStyle::filled(bg));
            }
            let align = match view.options.resolve_index(dr, OptionKind::Align) {
                Some(CellOption::Align(a)) => *a,
                _ => Align::Center,
            };
            let text = label_text(view.data.index_value(dr), || (dr + 1).to_string());
            let fg = highlight.and_then(|h| h.fg).unwrap_or(palette.index_fg);
            self.place_text(Pane::Index, &config.index_font, &text, rect, config.cell_padding, TextWrap::None, fg, align);
            self.arena.place(
                Pane::Index,
                PrimitiveKind::GridLine,
                Rect::from_edges(0.0, bottom, width, bottom),
                PrimitiveStyle::filled(palette.index_grid),
            );
        }
    }
}

fn label_text(label: Option<&CellValue>, fallback: impl FnOnce() -> String) -> String {
    match label {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => fallback(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CheckboxSpec, DropdownSpec, Highlight, OptionTarget};

    struct Fixture {
        rows: AxisLayout,
        columns: AxisLayout,
        data: DataGrid,
        options: OptionsRegistry,
        config: SheetOptions,
    }

    impl Fixture {
        fn view(&self) -> GridView<'_> {
            GridView {
                rows: &self.rows,
                columns: &self.columns,
                data: &self.data,
                options: &self.options,
                config: &self.config,
            }
        }
    }

    fn setup(rows: usize, columns: usize) -> Fixture {
        let config = SheetOptions::default();
        Fixture {
            rows: AxisLayout::new(rows, config.default_row_height),
            columns: AxisLayout::new(columns, config.default_column_width),
            data: DataGrid::filled(rows, columns),
            options: OptionsRegistry::new(),
            config,
        }
    }

    fn drawn(status: RedrawStatus) -> RedrawEvent {
        match status {
            RedrawStatus::Drawn(event) => event,
            RedrawStatus::NotReady => panic!("redraw not ready"),
        }
    }

    fn texts(renderer: &ViewportRenderer, pane: Pane) -> Vec<String> {
        let mut out: Vec<String> = renderer
            .arena()
            .visible_of(pane, PrimitiveKind::Text)
            .map(|p| p.style.lines.join("\n"))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn test_not_ready_without_size() {
        let fixture = setup(3, 3);
        let mut renderer = ViewportRenderer::new();
        assert_eq!(renderer.redraw(&fixture.view(), &Viewport::new(0.0, 100.0)), RedrawStatus::NotReady);
        assert_eq!(renderer.arena().allocated(), 0);
    }

    #[test]
    fn test_large_sheet_touches_visible_only() {
        let fixture = setup(100_000, 5);
        let mut renderer = ViewportRenderer::new();
        let mut viewport = Viewport::new(600.0, 30.0 * fixture.config.default_row_height);

        let first = drawn(renderer.redraw(&fixture.view(), &viewport));
        assert_eq!(first.rows, 0..30);
        assert_eq!(first.columns, 0..5);
        let bound = 31 * 6 * 4 + 8;
        assert!(first.stats.touched() <= bound, "touched {}", first.stats.touched());

        viewport.scroll_y = 50_000.0 * fixture.config.default_row_height;
        let second = drawn(renderer.redraw(&fixture.view(), &viewport));
        assert_eq!(second.rows, 50_000..50_030);
        assert_eq!(second.stats.created, 0);
        assert!(second.stats.touched() <= bound);
        assert_eq!(texts(&renderer, Pane::Index).first().map(String::as_str), Some("50001"));
    }

    #[test]
    fn test_header_letters() {
        assert_eq!(column_letters(0), "A");
        assert_eq!(column_letters(25), "Z");
        assert_eq!(column_letters(26), "AA");
        assert_eq!(column_letters(27), "AB");
        assert_eq!(column_letters(701), "ZZ");
        assert_eq!(column_letters(702), "AAA");
    }

    #[test]
    fn test_hidden_rows_are_skipped() {
        let mut fixture = setup(4, 1);
        for r in 0..4 {
            fixture.data.set(r, 0, CellValue::Int(r as i64 * 10), |_, _| CellValue::Empty);
        }
        fixture.rows.hide(&[1], 4);
        let mut renderer = ViewportRenderer::new();
        let frame = drawn(renderer.redraw(&fixture.view(), &Viewport::new(200.0, 400.0)));
        assert_eq!(frame.rows, 0..3);
        assert_eq!(texts(&renderer, Pane::Table), vec!["0", "20", "30"]);
        assert_eq!(texts(&renderer, Pane::Index), vec!["1", "3", "4"]);
    }

    #[test]
    fn test_overflow_into_empty_neighbor() {
        let mut fixture = setup(1, 3);
        fixture.config.allow_cell_overflow = true;
        let long = "abcdefghijklmnopqrstuvwxyz0123";
        fixture.data.set(0, 0, CellValue::from(long), |_, _| CellValue::Empty);
        let mut renderer = ViewportRenderer::new();
        drawn(renderer.redraw(&fixture.view(), &Viewport::new(400.0, 100.0)));
        let text = renderer
            .arena()
            .visible_of(Pane::Table, PrimitiveKind::Text)
            .next()
            .cloned()
            .unwrap();
        assert_eq!(text.style.lines, vec![long.to_string()]);
        assert!(text.rect.width() > fixture.config.default_column_width);

        // A dropdown next door stops the overflow.
        fixture.options.set(
            OptionTarget::Column(1),
            CellOption::Dropdown(DropdownSpec::new(vec!["x".into()])),
        );
        drawn(renderer.redraw(&fixture.view(), &Viewport::new(400.0, 100.0)));
        let text = renderer
            .arena()
            .visible_of(Pane::Table, PrimitiveKind::Text)
            .find(|p| p.style.lines.first().is_some_and(|l| l.starts_with("abc")))
            .cloned()
            .unwrap();
        assert!(text.rect.width() < fixture.config.default_column_width);
    }

    #[test]
    fn test_interactive_cells() {
        let mut fixture = setup(2, 2);
        fixture.options.set(
            OptionTarget::Column(0),
            CellOption::Dropdown(DropdownSpec::new(vec!["a".into(), "b".into()])),
        );
        fixture
            .options
            .set(OptionTarget::Cell(1, 1), CellOption::Checkbox(CheckboxSpec::new("done")));
        fixture.data.set(1, 1, CellValue::Bool(true), |_, _| CellValue::Empty);

        let mut renderer = ViewportRenderer::new();
        drawn(renderer.redraw(&fixture.view(), &Viewport::new(400.0, 100.0)));
        assert_eq!(renderer.arena().visible_of(Pane::Table, PrimitiveKind::DropdownArrow).count(), 2);
        let boxes: Vec<bool> = renderer
            .arena()
            .visible_of(Pane::Table, PrimitiveKind::Checkbox)
            .map(|p| p.style.checked)
            .collect();
        assert_eq!(boxes, vec![true]);
        assert!(texts(&renderer, Pane::Table).contains(&"done".to_string()));
    }

    #[test]
    fn test_row_highlight_end_of_screen() {
        let mut fixture = setup(2, 1);
        let red = Color::from_rgb8(255, 0, 0);
        fixture.options.set(
            OptionTarget::Row(1),
            CellOption::Highlight(Highlight::bg(red).with_end_of_screen(true)),
        );
        let mut renderer = ViewportRenderer::new();
        drawn(renderer.redraw(&fixture.view(), &Viewport::new(500.0, 100.0)));
        let red_fills: Vec<Rect> = renderer
            .arena()
            .visible_of(Pane::Table, PrimitiveKind::CellBackground)
            .filter(|p| p.style.fill == Some(red))
            .map(|p| p.rect)
            .collect();
        assert_eq!(red_fills.len(), 2);
        assert!(red_fills.iter().any(|r| r.right() == 500.0));
    }

    #[test]
    fn test_fit_to_viewport() {
        let mut layout = AxisLayout::new(3, 100.0);
        assert!(fit_to_viewport(&mut layout, 400.0, 20.0));
        assert_eq!(layout.positions().total(), 400.0);
        assert!(!fit_to_viewport(&mut layout, 300.0, 20.0));
    }

    #[test]
    fn test_scroll_to() {
        let mut viewport = Viewport::new(100.0, 100.0);
        assert!(viewport.scroll_to(Rect::new(150.0, 20.0, 40.0, 20.0)));
        assert_eq!((viewport.scroll_x, viewport.scroll_y), (90.0, 0.0));
        assert!(!viewport.scroll_to(Rect::new(100.0, 10.0, 40.0, 20.0)));
    }
}
