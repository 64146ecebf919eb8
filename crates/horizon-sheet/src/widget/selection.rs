//! Multi-box selection with one current cell.
//!
//! Boxes are kept in creation order; where boxes overlap, the most recently
//! created one wins. Coordinates are displayed indices. Each box owns four
//! pinned primitives (fill, border, index gutter shade, header gutter shade)
//! that are recycled through the manager's [`PrimitiveArena`] when boxes come
//! and go.

use std::collections::BTreeSet;
use std::ops::Range;

use horizon_sheet_core::Rect;
use horizon_sheet_core::logging::targets;
use slotmap::{SlotMap, new_key_type};

use crate::config::SheetOptions;
use crate::model::{AxisLayout, Region, SelectedBox, SelectionKind, SelectionSnapshot};
use crate::widget::arena::{Pane, PrimitiveArena, PrimitiveId, PrimitiveKind, PrimitiveStyle};

new_key_type! {
    /// Handle of a selection box.
    pub struct BoxId;
}

/// Displayed extents that boxes are clipped against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridBounds {
    pub rows: usize,
    pub columns: usize,
}

impl GridBounds {
    pub fn new(rows: usize, columns: usize) -> Self {
        Self { rows, columns }
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        row < self.rows && column < self.columns
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.columns == 0
    }
}

#[derive(Debug, Clone, Copy)]
struct BoxHandles {
    fill: PrimitiveId,
    border: PrimitiveId,
    index_shade: PrimitiveId,
    header_shade: PrimitiveId,
}

/// One selection box.
#[derive(Debug, Clone, Copy)]
pub struct SelectionBox {
    pub region: Region,
    pub kind: SelectionKind,
    handles: BoxHandles,
}

impl SelectionBox {
    pub fn selected(&self) -> SelectedBox {
        SelectedBox {
            region: self.region,
            kind: self.kind,
        }
    }
}

/// The cell holding the edit cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentCell {
    pub row: usize,
    pub column: usize,
    pub box_id: BoxId,
}

/// What to remove from the selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Deselect {
    All,
    Row(usize),
    Column(usize),
    Cell(usize, usize),
    Rows(Range<usize>),
    Columns(Range<usize>),
    Region(Region),
}

/// Stretch a region to the full extent its kind implies, then clip it.
fn normalize(region: Region, kind: SelectionKind, bounds: GridBounds) -> Option<Region> {
    let region = match kind {
        SelectionKind::Cells => region,
        SelectionKind::Rows => Region::new(region.from_r, 0, region.upto_r, bounds.columns),
        SelectionKind::Columns => Region::new(0, region.from_c, bounds.rows, region.upto_c),
    };
    region.clipped(bounds.rows, bounds.columns)
}

/// `a` minus `b` as up to four disjoint pieces: full-width bands above and
/// below the cut, then the parts left and right of it.
fn subtract(a: Region, b: Region) -> Vec<Region> {
    if !a.intersects(&b) {
        return vec![a];
    }
    let cut = Region::new(
        a.from_r.max(b.from_r),
        a.from_c.max(b.from_c),
        a.upto_r.min(b.upto_r),
        a.upto_c.min(b.upto_c),
    );
    [
        Region::new(a.from_r, a.from_c, cut.from_r, a.upto_c),
        Region::new(cut.upto_r, a.from_c, a.upto_r, a.upto_c),
        Region::new(cut.from_r, a.from_c, cut.upto_r, cut.from_c),
        Region::new(cut.from_r, cut.upto_c, cut.upto_r, a.upto_c),
    ]
    .into_iter()
    .filter(|r| !r.is_empty())
    .collect()
}

/// Kind a piece of a split box keeps: whole rows or columns only while it
/// still spans the grid.
fn piece_kind(kind: SelectionKind, piece: Region, bounds: GridBounds) -> SelectionKind {
    match kind {
        SelectionKind::Rows if piece.from_c == 0 && piece.upto_c >= bounds.columns => SelectionKind::Rows,
        SelectionKind::Columns if piece.from_r == 0 && piece.upto_r >= bounds.rows => SelectionKind::Columns,
        _ => SelectionKind::Cells,
    }
}

/// Union of two regions when it is itself a rectangle.
fn rect_union(a: Region, b: Region) -> Option<Region> {
    if a.covers(&b) {
        return Some(a);
    }
    if b.covers(&a) {
        return Some(b);
    }
    let same_columns = a.columns() == b.columns();
    let same_rows = a.rows() == b.rows();
    let rows_touch = a.from_r <= b.upto_r && b.from_r <= a.upto_r;
    let columns_touch = a.from_c <= b.upto_c && b.from_c <= a.upto_c;
    if (same_columns && rows_touch) || (same_rows && columns_touch) {
        Some(Region::new(
            a.from_r.min(b.from_r),
            a.from_c.min(b.from_c),
            a.upto_r.max(b.upto_r),
            a.upto_c.max(b.upto_c),
        ))
    } else {
        None
    }
}

/// Selection boxes and the current cell.
#[derive(Debug, Default)]
pub struct SelectionManager {
    boxes: SlotMap<BoxId, SelectionBox>,
    order: Vec<BoxId>,
    current: Option<CurrentCell>,
    arena: PrimitiveArena,
    cursor: Option<PrimitiveId>,
    fill_handle: Option<PrimitiveId>,
}

impl SelectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn get(&self, id: BoxId) -> Option<&SelectionBox> {
        self.boxes.get(id)
    }

    /// Boxes in creation order.
    pub fn boxes(&self) -> impl Iterator<Item = (BoxId, &SelectionBox)> {
        self.order.iter().filter_map(|&id| self.boxes.get(id).map(|b| (id, b)))
    }

    /// Box regions and kinds in creation order.
    pub fn selected_boxes(&self) -> Vec<SelectedBox> {
        self.boxes().map(|(_, b)| b.selected()).collect()
    }

    pub fn current(&self) -> Option<(usize, usize)> {
        self.current.map(|c| (c.row, c.column))
    }

    pub fn current_cell(&self) -> Option<CurrentCell> {
        self.current
    }

    pub fn current_box(&self) -> Option<&SelectionBox> {
        self.current.and_then(|c| self.boxes.get(c.box_id))
    }

    /// Primitives drawn for the selection.
    pub fn arena(&self) -> &PrimitiveArena {
        &self.arena
    }

    // =========================================================================
    // Creating and removing boxes
    // =========================================================================

    /// Add a box, clipped to `bounds`. Returns `None` when nothing is left
    /// after clipping.
    pub fn create_box(&mut self, region: Region, kind: SelectionKind, bounds: GridBounds) -> Option<BoxId> {
        let region = normalize(region, kind, bounds)?;
        let id = self.insert_box(region, kind);
        self.order.push(id);
        tracing::debug!(target: targets::SELECTION, ?region, ?kind, "created selection box");
        Some(id)
    }

    fn insert_box(&mut self, region: Region, kind: SelectionKind) -> BoxId {
        let mut acquire =
            |pane, primitive| self.arena.acquire(pane, primitive, Rect::ZERO, PrimitiveStyle::default());
        let handles = BoxHandles {
            fill: acquire(Pane::Table, PrimitiveKind::SelectionFill),
            border: acquire(Pane::Table, PrimitiveKind::SelectionBorder),
            index_shade: acquire(Pane::Index, PrimitiveKind::GutterShade),
            header_shade: acquire(Pane::Header, PrimitiveKind::GutterShade),
        };
        self.boxes.insert(SelectionBox { region, kind, handles })
    }

    pub fn remove_box(&mut self, id: BoxId) -> bool {
        let Some(removed) = self.boxes.remove(id) else {
            return false;
        };
        for handle in [
            removed.handles.fill,
            removed.handles.border,
            removed.handles.index_shade,
            removed.handles.header_shade,
        ] {
            self.arena.release(handle);
        }
        self.order.retain(|&b| b != id);
        if self.current.is_some_and(|c| c.box_id == id) {
            self.current = None;
        }
        true
    }

    /// Remove every box and the current cell.
    pub fn clear(&mut self) {
        for id in self.order.clone() {
            self.remove_box(id);
        }
        self.current = None;
    }

    /// Replace the selection with one box whose top-left cell is current.
    pub fn select(&mut self, region: Region, kind: SelectionKind, bounds: GridBounds) -> Option<BoxId> {
        self.clear();
        let id = self.create_box(region, kind, bounds)?;
        let region = self.boxes[id].region;
        self.current = Some(CurrentCell {
            row: region.from_r,
            column: region.from_c,
            box_id: id,
        });
        Some(id)
    }

    pub fn select_all(&mut self, bounds: GridBounds) -> Option<BoxId> {
        self.select(Region::new(0, 0, bounds.rows, bounds.columns), SelectionKind::Cells, bounds)
    }

    /// Move the cursor to `(row, column)`.
    ///
    /// The most recently created box containing the cell becomes the
    /// current box; if none does, a single-cell box is created.
    pub fn set_current(&mut self, row: usize, column: usize, bounds: GridBounds) -> Option<BoxId> {
        if !bounds.contains(row, column) {
            return None;
        }
        let id = match self.box_at(row, column) {
            Some(id) => id,
            None => self.create_box(Region::cell(row, column), SelectionKind::Cells, bounds)?,
        };
        self.current = Some(CurrentCell { row, column, box_id: id });
        Some(id)
    }

    /// Most recently created box containing the cell.
    pub fn box_at(&self, row: usize, column: usize) -> Option<BoxId> {
        self.order
            .iter()
            .rev()
            .copied()
            .find(|&id| self.boxes.get(id).is_some_and(|b| b.region.contains(row, column)))
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_cell_selected(&self, row: usize, column: usize) -> bool {
        self.box_at(row, column).is_some()
    }

    /// Whether a whole-rows box covers `row`.
    pub fn is_row_selected(&self, row: usize) -> bool {
        self.boxes()
            .any(|(_, b)| b.kind == SelectionKind::Rows && b.region.rows().contains(&row))
    }

    /// Whether a whole-columns box covers `column`.
    pub fn is_column_selected(&self, column: usize) -> bool {
        self.boxes()
            .any(|(_, b)| b.kind == SelectionKind::Columns && b.region.columns().contains(&column))
    }

    /// Rows covered by whole-rows boxes.
    pub fn selected_rows(&self) -> BTreeSet<usize> {
        self.boxes()
            .filter(|(_, b)| b.kind == SelectionKind::Rows)
            .flat_map(|(_, b)| b.region.rows())
            .collect()
    }

    /// Columns covered by whole-columns boxes.
    pub fn selected_columns(&self) -> BTreeSet<usize> {
        self.boxes()
            .filter(|(_, b)| b.kind == SelectionKind::Columns)
            .flat_map(|(_, b)| b.region.columns())
            .collect()
    }

    /// Rows touched by any box.
    pub fn rows_touched(&self) -> BTreeSet<usize> {
        self.boxes().flat_map(|(_, b)| b.region.rows()).collect()
    }

    /// Columns touched by any box.
    pub fn columns_touched(&self) -> BTreeSet<usize> {
        self.boxes().flat_map(|(_, b)| b.region.columns()).collect()
    }

    /// Smallest region covering every box.
    pub fn bounding_region(&self) -> Option<Region> {
        self.boxes().map(|(_, b)| b.region).reduce(|a, b| {
            Region::new(
                a.from_r.min(b.from_r),
                a.from_c.min(b.from_c),
                a.upto_r.max(b.upto_r),
                a.upto_c.max(b.upto_c),
            )
        })
    }

    // =========================================================================
    // Changing boxes
    // =========================================================================

    /// Re-clip every box after the grid changed size.
    ///
    /// Boxes with nothing left are dropped. The current cell stays in its box
    /// when it can, moves to the box's top-left cell otherwise, and falls back
    /// to the newest remaining box when its own box is gone.
    pub fn recreate_all(&mut self, bounds: GridBounds) {
        for id in self.order.clone() {
            let Some(b) = self.boxes.get(id).copied() else {
                continue;
            };
            match normalize(b.region, b.kind, bounds) {
                Some(region) => self.boxes[id].region = region,
                None => {
                    self.remove_box(id);
                }
            }
        }
        self.current = match self.current {
            Some(c) => match self.boxes.get(c.box_id) {
                Some(b) if b.region.contains(c.row, c.column) => Some(c),
                Some(b) => Some(CurrentCell {
                    row: b.region.from_r,
                    column: b.region.from_c,
                    box_id: c.box_id,
                }),
                None => self.newest_corner(),
            },
            None => None,
        };
    }

    fn newest_corner(&self) -> Option<CurrentCell> {
        let &id = self.order.last()?;
        let b = self.boxes.get(id)?;
        Some(CurrentCell {
            row: b.region.from_r,
            column: b.region.from_c,
            box_id: id,
        })
    }

    /// Remove part of the selection. Boxes that partly overlap the removed
    /// area are split into the pieces that remain. Returns whether anything
    /// changed.
    pub fn deselect(&mut self, scope: Deselect, bounds: GridBounds) -> bool {
        let removed = match scope {
            Deselect::All => {
                let changed = !self.is_empty();
                self.clear();
                return changed;
            }
            Deselect::Row(r) => Region::new(r, 0, r + 1, bounds.columns),
            Deselect::Column(c) => Region::new(0, c, bounds.rows, c + 1),
            Deselect::Cell(r, c) => Region::cell(r, c),
            Deselect::Rows(rows) => Region::new(rows.start, 0, rows.end, bounds.columns),
            Deselect::Columns(columns) => Region::new(0, columns.start, bounds.rows, columns.end),
            Deselect::Region(region) => region,
        };
        if removed.is_empty() {
            return false;
        }

        let mut changed = false;
        let mut order = Vec::with_capacity(self.order.len());
        for id in std::mem::take(&mut self.order) {
            let Some(b) = self.boxes.get(id).copied() else {
                continue;
            };
            if !b.region.intersects(&removed) {
                order.push(id);
                continue;
            }
            changed = true;
            let mut pieces = subtract(b.region, removed).into_iter();
            match pieces.next() {
                Some(first) => {
                    self.boxes[id].region = first;
                    self.boxes[id].kind = piece_kind(b.kind, first, bounds);
                    order.push(id);
                }
                None => {
                    self.remove_box(id);
                }
            }
            for piece in pieces {
                let piece_id = self.insert_box(piece, piece_kind(b.kind, piece, bounds));
                order.push(piece_id);
            }
        }
        self.order = order;

        if changed {
            self.current = match self.current {
                Some(c) if !removed.contains(c.row, c.column) => self
                    .box_at(c.row, c.column)
                    .map(|box_id| CurrentCell { box_id, ..c }),
                _ => self.newest_corner(),
            };
            tracing::debug!(target: targets::SELECTION, ?removed, boxes = self.len(), "deselected");
        }
        changed
    }

    /// Stretch the current box from the current cell to `(row, column)`,
    /// as a drag or shift-click does.
    ///
    /// The target is clamped to `bounds`. Returns whether the box changed,
    /// so motion events that land on the same cell cause no redraw.
    pub fn drag_to(&mut self, row: usize, column: usize, bounds: GridBounds) -> bool {
        if bounds.is_empty() {
            return false;
        }
        let Some(current) = self.current else {
            return false;
        };
        let Some(b) = self.boxes.get(current.box_id).copied() else {
            return false;
        };
        let target = (row.min(bounds.rows - 1), column.min(bounds.columns - 1));
        let spanned = Region::spanning((current.row, current.column), target);
        let Some(region) = normalize(spanned, b.kind, bounds) else {
            return false;
        };
        if region == b.region {
            return false;
        }
        self.boxes[current.box_id].region = region;
        true
    }

    /// Shift-click: extend the current box, or start one if there is none.
    pub fn shift_select(&mut self, row: usize, column: usize, bounds: GridBounds) -> bool {
        match self.current {
            Some(_) => self.drag_to(row, column, bounds),
            None => self.set_current(row, column, bounds).is_some(),
        }
    }

    /// Change the kind of the current box, e.g. when a drag starts in a gutter.
    pub fn set_current_kind(&mut self, kind: SelectionKind, bounds: GridBounds) -> bool {
        let Some(current) = self.current else {
            return false;
        };
        let Some(b) = self.boxes.get(current.box_id).copied() else {
            return false;
        };
        match normalize(b.region, kind, bounds) {
            Some(region) => {
                self.boxes[current.box_id] = SelectionBox { region, kind, ..b };
                true
            }
            None => false,
        }
    }

    /// Merge boxes of the same kind whose union is a rectangle, and drop boxes
    /// covered by another. The newer box of each pair survives. Returns the
    /// number of boxes removed.
    pub fn merge(&mut self) -> usize {
        let mut removed = 0;
        while let Some((older, newer, region)) = self.mergeable_pair() {
            self.boxes[newer].region = region;
            let moved_current = self.current.filter(|c| c.box_id == older);
            self.remove_box(older);
            if let Some(c) = moved_current {
                self.current = Some(CurrentCell { box_id: newer, ..c });
            }
            removed += 1;
        }
        removed
    }

    fn mergeable_pair(&self) -> Option<(BoxId, BoxId, Region)> {
        for (i, &older) in self.order.iter().enumerate() {
            for &newer in &self.order[i + 1..] {
                let (a, b) = (self.boxes.get(older)?, self.boxes.get(newer)?);
                let union = if b.region.covers(&a.region) {
                    Some(b.region)
                } else if a.kind == b.kind {
                    rect_union(a.region, b.region)
                } else {
                    None
                };
                if let Some(region) = union {
                    return Some((older, newer, region));
                }
            }
        }
        None
    }

    // =========================================================================
    // Snapshots
    // =========================================================================

    pub fn snapshot(&self) -> SelectionSnapshot {
        SelectionSnapshot {
            boxes: self.selected_boxes(),
            current: self.current.and_then(|c| {
                let position = self.order.iter().position(|&id| id == c.box_id)?;
                Some((c.row, c.column, position))
            }),
        }
    }

    /// Rebuild the selection from a snapshot, clipping to `bounds`.
    pub fn restore(&mut self, snapshot: &SelectionSnapshot, bounds: GridBounds) {
        self.clear();
        let ids: Vec<Option<BoxId>> = snapshot
            .boxes
            .iter()
            .map(|b| self.create_box(b.region, b.kind, bounds))
            .collect();
        if let Some((row, column, position)) = snapshot.current
            && let Some(Some(box_id)) = ids.get(position)
            && bounds.contains(row, column)
        {
            self.current = Some(CurrentCell {
                row,
                column,
                box_id: *box_id,
            });
        } else {
            self.current = self.newest_corner();
        }
        self.recreate_all(bounds);
    }

    // =========================================================================
    // Primitives
    // =========================================================================

    /// Position and color every selection primitive for the current layout.
    ///
    /// Table-pane rectangles are in content coordinates; gutter shades use
    /// the gutter's own axis with the configured gutter thickness.
    pub fn layout(&mut self, rows: &AxisLayout, columns: &AxisLayout, options: &SheetOptions) {
        let palette = &options.palette;
        for &id in &self.order {
            let Some(b) = self.boxes.get(id) else {
                continue;
            };
            let (top, bottom) = rows.positions().span(b.region.rows());
            let (left, right) = columns.positions().span(b.region.columns());
            let table = Rect::from_edges(left, top, right, bottom);
            let fill = match b.kind {
                SelectionKind::Cells => palette.selected_cells_bg,
                SelectionKind::Rows => palette.selected_rows_bg,
                SelectionKind::Columns => palette.selected_columns_bg,
            };
            let handles = b.handles;
            self.arena.update(handles.fill, table, PrimitiveStyle::filled(fill));
            self.arena
                .update(handles.border, table, PrimitiveStyle::outlined(palette.selected_cells_border));
            self.arena.update(
                handles.index_shade,
                Rect::from_edges(0.0, top, options.index_width, bottom),
                PrimitiveStyle::filled(palette.index_selected_bg),
            );
            self.arena.update(
                handles.header_shade,
                Rect::from_edges(left, 0.0, right, options.header_height),
                PrimitiveStyle::filled(palette.header_selected_bg),
            );
        }

        let cursor_rect = self.current.and_then(|c| {
            let (top, bottom) = rows.positions().span(c.row..c.row + 1);
            let (left, right) = columns.positions().span(c.column..c.column + 1);
            (bottom > top && right > left).then(|| Rect::from_edges(left, top, right, bottom))
        });
        let handle_rect = self.current_box().map(|b| {
            let (_, bottom) = rows.positions().span(b.region.rows());
            let (_, right) = columns.positions().span(b.region.columns());
            Rect::new(right - 3.0, bottom - 3.0, 6.0, 6.0)
        });
        self.cursor = Self::place_pinned(
            &mut self.arena,
            self.cursor,
            PrimitiveKind::CurrentBorder,
            cursor_rect,
            PrimitiveStyle::outlined(palette.current_border),
        );
        let handle_rect = handle_rect.filter(|_| options.enable_drag_fill);
        self.fill_handle = Self::place_pinned(
            &mut self.arena,
            self.fill_handle,
            PrimitiveKind::FillHandle,
            handle_rect,
            PrimitiveStyle::filled(palette.fill_handle),
        );
    }

    fn place_pinned(
        arena: &mut PrimitiveArena,
        existing: Option<PrimitiveId>,
        kind: PrimitiveKind,
        rect: Option<Rect>,
        style: PrimitiveStyle,
    ) -> Option<PrimitiveId> {
        match (existing, rect) {
            (Some(id), Some(rect)) => {
                arena.update(id, rect, style);
                Some(id)
            }
            (None, Some(rect)) => Some(arena.acquire(Pane::Table, kind, rect, style)),
            (Some(id), None) => {
                arena.release(id);
                None
            }
            (None, None) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: GridBounds = GridBounds { rows: 10, columns: 5 };

    fn setup() -> SelectionManager {
        let mut selection = SelectionManager::new();
        selection.select(Region::new(2, 1, 6, 4), SelectionKind::Cells, BOUNDS);
        selection
    }

    fn coverage(selection: &SelectionManager) -> Vec<(usize, usize)> {
        let mut cells: Vec<(usize, usize)> = selection
            .boxes()
            .flat_map(|(_, b)| b.region.cells().collect::<Vec<_>>())
            .collect();
        cells.sort_unstable();
        cells
    }

    #[test]
    fn test_create_clips_and_expands() {
        let mut selection = SelectionManager::new();
        assert!(selection.create_box(Region::new(20, 0, 25, 2), SelectionKind::Cells, BOUNDS).is_none());

        let id = selection.create_box(Region::new(8, 3, 12, 4), SelectionKind::Rows, BOUNDS).unwrap();
        assert_eq!(selection.get(id).unwrap().region, Region::new(8, 0, 10, 5));
        assert_eq!(selection.selected_rows().into_iter().collect::<Vec<_>>(), vec![8, 9]);
    }

    #[test]
    fn test_set_current_prefers_newest_box() {
        let mut selection = setup();
        let newer = selection.create_box(Region::new(3, 2, 4, 3), SelectionKind::Cells, BOUNDS).unwrap();
        assert_eq!(selection.set_current(3, 2, BOUNDS), Some(newer));
        assert_eq!(selection.current(), Some((3, 2)));

        // Outside every box: a new single-cell box.
        let created = selection.set_current(9, 0, BOUNDS).unwrap();
        assert_eq!(selection.get(created).unwrap().region, Region::cell(9, 0));
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_deselect_row_splits_in_two() {
        let mut selection = setup();
        let before = coverage(&selection);
        assert!(selection.deselect(Deselect::Row(3), BOUNDS));

        assert_eq!(selection.len(), 2);
        let after = coverage(&selection);
        let expected: Vec<(usize, usize)> = before.into_iter().filter(|&(r, _)| r != 3).collect();
        assert_eq!(after, expected);
    }

    #[test]
    fn test_deselect_edge_row_leaves_one_box() {
        let mut selection = setup();
        selection.deselect(Deselect::Row(2), BOUNDS);
        assert_eq!(selection.len(), 1);
        assert!(selection.deselect(Deselect::Rows(0..10), BOUNDS));
        assert!(selection.is_empty());
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_deselect_cell_reassigns_current() {
        let mut selection = setup();
        assert_eq!(selection.current(), Some((2, 1)));
        selection.deselect(Deselect::Cell(2, 1), BOUNDS);
        assert_eq!(selection.len(), 2);
        assert!(!selection.is_cell_selected(2, 1));
        let (row, column) = selection.current().unwrap();
        assert!(selection.is_cell_selected(row, column));
        // No cell is covered twice.
        let cells = coverage(&selection);
        let mut unique = cells.clone();
        unique.dedup();
        assert_eq!(cells, unique);
    }

    #[test]
    fn test_deselect_column_of_row_box_degrades_kind() {
        let mut selection = SelectionManager::new();
        selection.select(Region::new(1, 0, 3, 5), SelectionKind::Rows, BOUNDS);
        selection.deselect(Deselect::Column(2), BOUNDS);
        assert!(selection.boxes().all(|(_, b)| b.kind == SelectionKind::Cells));
        assert!(selection.selected_rows().is_empty());
    }

    #[test]
    fn test_drag_reports_changes_only() {
        let mut selection = setup();
        selection.set_current(2, 1, BOUNDS);
        assert!(selection.drag_to(4, 1, BOUNDS));
        assert!(!selection.drag_to(4, 1, BOUNDS));
        assert_eq!(selection.current_box().unwrap().region, Region::new(2, 1, 5, 2));

        // Clamped to the grid.
        assert!(selection.drag_to(50, 50, BOUNDS));
        assert_eq!(selection.current_box().unwrap().region, Region::new(2, 1, 10, 5));
        assert_eq!(selection.current(), Some((2, 1)));
    }

    #[test]
    fn test_merge_adjacent_and_covered() {
        let mut selection = SelectionManager::new();
        selection.create_box(Region::new(0, 0, 2, 2), SelectionKind::Cells, BOUNDS);
        selection.create_box(Region::new(2, 0, 4, 2), SelectionKind::Cells, BOUNDS);
        selection.create_box(Region::new(1, 1, 2, 2), SelectionKind::Cells, BOUNDS);
        assert_eq!(selection.merge(), 2);
        assert_eq!(selection.selected_boxes()[0].region, Region::new(0, 0, 4, 2));
    }

    #[test]
    fn test_recreate_after_shrink() {
        let mut selection = setup();
        selection.set_current(5, 3, BOUNDS);
        selection.recreate_all(GridBounds::new(4, 5));
        assert_eq!(selection.current_box().unwrap().region, Region::new(2, 1, 4, 4));
        assert_eq!(selection.current(), Some((2, 1)));

        selection.recreate_all(GridBounds::new(1, 5));
        assert!(selection.is_empty());
        assert_eq!(selection.current(), None);
    }

    #[test]
    fn test_snapshot_restore() {
        let mut selection = setup();
        selection.create_box(Region::new(8, 0, 9, 5), SelectionKind::Rows, BOUNDS);
        selection.set_current(8, 4, BOUNDS);
        let snapshot = selection.snapshot();

        let mut other = SelectionManager::new();
        other.restore(&snapshot, BOUNDS);
        assert_eq!(other.snapshot(), snapshot);
    }

    #[test]
    fn test_primitives_recycled() {
        let mut selection = setup();
        let rows = AxisLayout::new(10, 20.0);
        let columns = AxisLayout::new(5, 100.0);
        let options = SheetOptions::default();
        selection.layout(&rows, &columns, &options);
        let allocated = selection.arena().allocated();

        selection.clear();
        selection.select(Region::cell(0, 0), SelectionKind::Cells, BOUNDS);
        selection.layout(&rows, &columns, &options);
        assert_eq!(selection.arena().allocated(), allocated);

        let fill = selection
            .arena()
            .visible_of(Pane::Table, PrimitiveKind::SelectionFill)
            .next()
            .unwrap();
        assert_eq!(fill.rect, Rect::new(0.0, 0.0, 100.0, 20.0));
    }
}
