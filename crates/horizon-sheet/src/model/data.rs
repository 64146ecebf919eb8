//! The two-dimensional cell store.
//!
//! Rows are not required to be the same length. Operations that need a
//! rectangular grid call [`DataGrid::equalize`] first. All indices here are
//! data indices.

use crate::error::{Result, SheetError};
use crate::model::cell::CellValue;
use crate::model::remap::reorder_vec;

/// Where header (or index) labels come from.
#[derive(Debug, Clone, PartialEq)]
pub enum Labels {
    /// Labels stored alongside the grid.
    Values(Vec<CellValue>),
    /// Use a data row (for headers) or data column (for the index).
    FromData(usize),
}

impl Default for Labels {
    fn default() -> Self {
        Self::Values(Vec::new())
    }
}

impl Labels {
    pub fn values(&self) -> Option<&[CellValue]> {
        match self {
            Self::Values(values) => Some(values),
            Self::FromData(_) => None,
        }
    }

    fn values_mut(&mut self) -> Option<&mut Vec<CellValue>> {
        match self {
            Self::Values(values) => Some(values),
            Self::FromData(_) => None,
        }
    }

    /// Splice `count` labels in at `at`, using `new` when supplied.
    ///
    /// Labels taken from data are unaffected; the caller shifts the source
    /// index when needed.
    pub fn insert(&mut self, at: usize, count: usize, new: Option<Vec<CellValue>>) {
        if let Some(values) = self.values_mut() {
            if at > values.len() && new.is_none() {
                return;
            }
            if at > values.len() {
                values.resize(at, CellValue::Empty);
            }
            let new = new.unwrap_or_else(|| vec![CellValue::Empty; count]);
            values.splice(at..at, new);
        }
    }

    /// Remove labels at `indices` (ascending), returning `(index, label)` pairs.
    pub fn delete(&mut self, indices: &[usize]) -> Vec<(usize, CellValue)> {
        let mut removed = Vec::new();
        if let Some(values) = self.values_mut() {
            for &i in indices.iter().rev() {
                if i < values.len() {
                    removed.push((i, values.remove(i)));
                }
            }
        }
        removed.reverse();
        removed
    }

    /// Apply an order (`order[new] == old`).
    pub fn reorder(&mut self, order: &[usize]) {
        if let Some(values) = self.values_mut() {
            let original_len = values.len();
            if values.len() < order.len() {
                values.resize(order.len(), CellValue::Empty);
            }
            let taken = std::mem::take(values);
            *values = reorder_vec(taken, order);
            while values.len() > original_len && values.last().is_some_and(CellValue::is_empty) {
                values.pop();
            }
        }
    }

    /// Set one stored label, growing the list as needed.
    pub fn set(&mut self, index: usize, value: CellValue) -> bool {
        match self.values_mut() {
            Some(values) => {
                if index >= values.len() {
                    values.resize(index + 1, CellValue::Empty);
                }
                values[index] = value;
                true
            }
            None => false,
        }
    }
}

/// Rows of cells plus header and index labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DataGrid {
    rows: Vec<Vec<CellValue>>,
    header: Labels,
    index: Labels,
}

impl DataGrid {
    /// An empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap existing rows.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    /// A `rows x columns` grid filled with `Empty`.
    pub fn filled(rows: usize, columns: usize) -> Self {
        Self::from_rows(vec![vec![CellValue::Empty; columns]; rows])
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Replace the rows wholesale, keeping labels.
    pub fn set_rows(&mut self, rows: Vec<Vec<CellValue>>) {
        self.rows = rows;
    }

    pub fn row(&self, row: usize) -> Option<&[CellValue]> {
        self.rows.get(row).map(Vec::as_slice)
    }

    pub fn total_rows(&self) -> usize {
        self.rows.len()
    }

    /// Width of the widest row.
    pub fn total_columns(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Read a cell; out-of-range reads are errors.
    pub fn get(&self, row: usize, column: usize) -> Result<&CellValue> {
        let cells = self.rows.get(row).ok_or(SheetError::RowOutOfBounds {
            row,
            total: self.rows.len(),
        })?;
        cells
            .get(column)
            .ok_or(SheetError::CellOutOfBounds { row, column })
    }

    /// Read a cell, treating missing cells as empty.
    pub fn get_or_empty(&self, row: usize, column: usize) -> &CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .unwrap_or(&EMPTY)
    }

    /// Whether `(row, column)` exists.
    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.rows.get(row).is_some_and(|cells| column < cells.len())
    }

    /// Write a cell, extending rows and columns as needed.
    ///
    /// Newly created cells (other than the target) are filled by
    /// `default_for(row, column)`. Returns the previous value, `Empty` for a
    /// freshly created cell.
    pub fn set(
        &mut self,
        row: usize,
        column: usize,
        value: CellValue,
        mut default_for: impl FnMut(usize, usize) -> CellValue,
    ) -> CellValue {
        while self.rows.len() <= row {
            self.rows.push(Vec::new());
        }
        let cells = &mut self.rows[row];
        if column < cells.len() {
            return std::mem::replace(&mut cells[column], value);
        }
        while cells.len() < column {
            let c = cells.len();
            cells.push(default_for(row, c));
        }
        cells.push(value);
        CellValue::Empty
    }

    /// Pad every row to `width` (at least the widest row) with defaults.
    pub fn equalize(&mut self, width: usize, mut default_for: impl FnMut(usize, usize) -> CellValue) {
        let width = width.max(self.total_columns());
        for (r, cells) in self.rows.iter_mut().enumerate() {
            while cells.len() < width {
                let c = cells.len();
                cells.push(default_for(r, c));
            }
        }
    }

    // =========================================================================
    // Rows
    // =========================================================================

    /// Insert rows before `at`.
    pub fn insert_rows(&mut self, at: usize, rows: Vec<Vec<CellValue>>) {
        let at = at.min(self.rows.len());
        let count = rows.len();
        self.rows.splice(at..at, rows);
        if let Labels::FromData(source) = &mut self.header
            && *source >= at
        {
            *source += count;
        }
    }

    /// Remove rows at ascending data indices, returning `(index, row)` pairs.
    pub fn delete_rows(&mut self, indices: &[usize]) -> Vec<(usize, Vec<CellValue>)> {
        let mut removed = Vec::new();
        for &i in indices.iter().rev() {
            if i < self.rows.len() {
                removed.push((i, self.rows.remove(i)));
            }
        }
        removed.reverse();
        if let Labels::FromData(source) = &mut self.header {
            let before = indices.partition_point(|&d| d < *source);
            *source -= before.min(*source);
        }
        removed
    }

    /// Apply a row order (`order[new] == old`).
    pub fn reorder_rows(&mut self, order: &[usize]) {
        let rows = std::mem::take(&mut self.rows);
        self.rows = reorder_vec(rows, order);
        if let Labels::FromData(source) = &mut self.header
            && let Some(new) = order.iter().position(|&old| old == *source)
        {
            *source = new;
        }
    }

    // =========================================================================
    // Columns
    // =========================================================================

    /// Insert columns before `at`.
    ///
    /// `columns[k][r]` is the value for row `r` of the `k`-th new column.
    /// Rows shorter than `at` are padded with `Empty` first; missing values
    /// are `Empty`.
    pub fn insert_columns(&mut self, at: usize, columns: &[Vec<CellValue>]) {
        let count = columns.len();
        if count == 0 {
            return;
        }
        for (r, cells) in self.rows.iter_mut().enumerate() {
            if cells.len() < at {
                cells.resize(at, CellValue::Empty);
            }
            let new: Vec<CellValue> = columns
                .iter()
                .map(|col| col.get(r).cloned().unwrap_or_default())
                .collect();
            cells.splice(at..at, new);
        }
        if let Labels::FromData(source) = &mut self.index
            && *source >= at
        {
            *source += count;
        }
    }

    /// Remove columns at ascending data indices.
    ///
    /// Returns `(index, column values by row)` pairs; rows too short to have
    /// the column contribute `Empty`.
    pub fn delete_columns(&mut self, indices: &[usize]) -> Vec<(usize, Vec<CellValue>)> {
        let mut removed: Vec<(usize, Vec<CellValue>)> =
            indices.iter().map(|&c| (c, Vec::with_capacity(self.rows.len()))).collect();
        for cells in &mut self.rows {
            for (k, &c) in indices.iter().enumerate().rev() {
                let value = if c < cells.len() {
                    cells.remove(c)
                } else {
                    CellValue::Empty
                };
                removed[k].1.push(value);
            }
        }
        if let Labels::FromData(source) = &mut self.index {
            let before = indices.partition_point(|&d| d < *source);
            *source -= before.min(*source);
        }
        removed
    }

    /// Apply a column order (`order[new] == old`) to every row.
    pub fn reorder_columns(&mut self, order: &[usize]) {
        for cells in &mut self.rows {
            if cells.len() < order.len() {
                cells.resize(order.len(), CellValue::Empty);
            }
            let taken = std::mem::take(cells);
            *cells = reorder_vec(taken, order);
        }
        if let Labels::FromData(source) = &mut self.index
            && let Some(new) = order.iter().position(|&old| old == *source)
        {
            *source = new;
        }
    }

    // =========================================================================
    // Labels
    // =========================================================================

    pub fn header(&self) -> &Labels {
        &self.header
    }

    pub fn header_mut(&mut self) -> &mut Labels {
        &mut self.header
    }

    pub fn set_header(&mut self, header: Labels) {
        self.header = header;
    }

    pub fn index(&self) -> &Labels {
        &self.index
    }

    pub fn index_mut(&mut self) -> &mut Labels {
        &mut self.index
    }

    pub fn set_index(&mut self, index: Labels) {
        self.index = index;
    }

    /// The header label for a data column, if any.
    pub fn header_value(&self, column: usize) -> Option<&CellValue> {
        match &self.header {
            Labels::Values(values) => values.get(column),
            Labels::FromData(row) => self.rows.get(*row)?.get(column),
        }
    }

    /// The index label for a data row, if any.
    pub fn index_value(&self, row: usize) -> Option<&CellValue> {
        match &self.index {
            Labels::Values(values) => values.get(row),
            Labels::FromData(column) => self.rows.get(row)?.get(*column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells;

    fn setup() -> DataGrid {
        DataGrid::from_rows(vec![cells![1, "a"], cells![2, "b"], cells![3]])
    }

    fn empty(_: usize, _: usize) -> CellValue {
        CellValue::Empty
    }

    #[test]
    fn test_extents() {
        let grid = setup();
        assert_eq!(grid.total_rows(), 3);
        assert_eq!(grid.total_columns(), 2);
    }

    #[test]
    fn test_get_bounds() {
        let grid = setup();
        assert_eq!(grid.get(1, 1).unwrap(), &CellValue::from("b"));
        assert!(matches!(grid.get(5, 0), Err(SheetError::RowOutOfBounds { row: 5, total: 3 })));
        assert!(matches!(grid.get(2, 1), Err(SheetError::CellOutOfBounds { .. })));
        assert_eq!(grid.get_or_empty(2, 1), &CellValue::Empty);
    }

    #[test]
    fn test_set_auto_extends() {
        let mut grid = setup();
        let old = grid.set(4, 2, CellValue::from("z"), |_, c| CellValue::Int(c as i64));
        assert_eq!(old, CellValue::Empty);
        assert_eq!(grid.total_rows(), 5);
        assert_eq!(grid.row(4).unwrap(), &cells![0, 1, "z"][..]);
        assert_eq!(grid.row(3).unwrap().len(), 0);
    }

    #[test]
    fn test_equalize() {
        let mut grid = setup();
        grid.equalize(0, empty);
        assert!(grid.rows().iter().all(|r| r.len() == 2));
    }

    #[test]
    fn test_row_insert_delete_inverse() {
        let original = setup();
        let mut grid = original.clone();
        grid.insert_rows(1, vec![cells!["x"], cells!["y"]]);
        assert_eq!(grid.row(1).unwrap(), &cells!["x"][..]);
        assert_eq!(grid.row(2).unwrap(), &cells!["y"][..]);

        let removed = grid.delete_rows(&[1, 2]);
        assert_eq!(removed[0], (1, cells!["x"]));
        assert_eq!(grid, original);
    }

    #[test]
    fn test_column_insert_delete_inverse() {
        let mut original = setup();
        original.equalize(0, empty);
        let mut grid = original.clone();

        grid.insert_columns(1, &[cells!["p", "q", "r"]]);
        assert_eq!(grid.row(0).unwrap(), &cells![1, "p", "a"][..]);

        let removed = grid.delete_columns(&[1]);
        assert_eq!(removed, vec![(1, cells!["p", "q", "r"])]);
        assert_eq!(grid, original);
    }

    #[test]
    fn test_reorder_columns() {
        let mut grid = DataGrid::from_rows(vec![cells![0, 1, 2, 3]]);
        grid.reorder_columns(&[1, 2, 3, 0]);
        assert_eq!(grid.row(0).unwrap(), &cells![1, 2, 3, 0][..]);
    }

    #[test]
    fn test_header_from_data_row_tracks_moves() {
        let mut grid = setup();
        grid.set_header(Labels::FromData(2));
        grid.insert_rows(0, vec![cells!["new"]]);
        assert_eq!(grid.header(), &Labels::FromData(3));
        assert_eq!(grid.header_value(0), Some(&CellValue::Int(3)));

        grid.delete_rows(&[0]);
        assert_eq!(grid.header(), &Labels::FromData(2));
    }

    #[test]
    fn test_labels_insert_delete() {
        let mut labels = Labels::Values(cells!["A", "B", "C"]);
        labels.insert(1, 2, None);
        assert_eq!(labels.values().unwrap().len(), 5);
        let removed = labels.delete(&[1, 2]);
        assert_eq!(removed, vec![(1, CellValue::Empty), (2, CellValue::Empty)]);
        assert_eq!(labels, Labels::Values(cells!["A", "B", "C"]));
    }
}
