//! Rectangular cell regions.

use std::ops::Range;

/// What a selection region stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SelectionKind {
    #[default]
    Cells,
    /// Whole rows: the region spans every column.
    Rows,
    /// Whole columns: the region spans every row.
    Columns,
}

/// Half-open block `from_r..upto_r` x `from_c..upto_c`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Region {
    pub from_r: usize,
    pub from_c: usize,
    pub upto_r: usize,
    pub upto_c: usize,
}

impl Region {
    pub const fn new(from_r: usize, from_c: usize, upto_r: usize, upto_c: usize) -> Self {
        Self {
            from_r,
            from_c,
            upto_r,
            upto_c,
        }
    }

    /// The single cell `(row, column)`.
    pub const fn cell(row: usize, column: usize) -> Self {
        Self::new(row, column, row + 1, column + 1)
    }

    /// Region spanning two corner cells given in any order, both inclusive.
    pub fn spanning(a: (usize, usize), b: (usize, usize)) -> Self {
        Self::new(a.0.min(b.0), a.1.min(b.1), a.0.max(b.0) + 1, a.1.max(b.1) + 1)
    }

    pub fn rows(&self) -> Range<usize> {
        self.from_r..self.upto_r
    }

    pub fn columns(&self) -> Range<usize> {
        self.from_c..self.upto_c
    }

    pub fn height(&self) -> usize {
        self.upto_r.saturating_sub(self.from_r)
    }

    pub fn width(&self) -> usize {
        self.upto_c.saturating_sub(self.from_c)
    }

    pub fn is_empty(&self) -> bool {
        self.height() == 0 || self.width() == 0
    }

    pub fn is_single_cell(&self) -> bool {
        self.height() == 1 && self.width() == 1
    }

    pub fn contains(&self, row: usize, column: usize) -> bool {
        self.rows().contains(&row) && self.columns().contains(&column)
    }

    /// Whether `other` lies entirely inside this region.
    pub fn covers(&self, other: &Region) -> bool {
        other.from_r >= self.from_r
            && other.upto_r <= self.upto_r
            && other.from_c >= self.from_c
            && other.upto_c <= self.upto_c
    }

    pub fn intersects(&self, other: &Region) -> bool {
        self.from_r < other.upto_r
            && other.from_r < self.upto_r
            && self.from_c < other.upto_c
            && other.from_c < self.upto_c
    }

    /// Clip to a grid of `rows` x `columns`; `None` if nothing is left.
    pub fn clipped(&self, rows: usize, columns: usize) -> Option<Region> {
        let clipped = Region::new(
            self.from_r.min(rows),
            self.from_c.min(columns),
            self.upto_r.min(rows),
            self.upto_c.min(columns),
        );
        (!clipped.is_empty()).then_some(clipped)
    }

    /// Cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows().flat_map(move |r| self.columns().map(move |c| (r, c)))
    }
}
