//! Cumulative pixel offsets for rows and columns.
//!
//! A [`PositionIndex`] stores `count + 1` boundaries: `positions[0] == 0.0`
//! and `positions[i + 1] - positions[i]` is the size of element `i`. Lookups
//! from pixel to index are binary searches; structural edits are `O(n)`
//! shifts that keep the prefix-sum shape intact.
//!
//! Indices here are always *displayed* indices. Hidden rows and columns have
//! no boundary of their own.

use std::ops::Range;

/// Prefix sums of element sizes with a leading zero.
pub fn positions_for(sizes: &[f64]) -> Vec<f64> {
    let mut positions = Vec::with_capacity(sizes.len() + 1);
    let mut pos = 0.0;
    positions.push(pos);
    for &size in sizes {
        pos += size.max(0.0);
        positions.push(pos);
    }
    positions
}

/// Monotonic boundary array for one axis of the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionIndex {
    positions: Vec<f64>,
}

impl Default for PositionIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl PositionIndex {
    /// An index with no elements.
    pub fn new() -> Self {
        Self {
            positions: vec![0.0],
        }
    }

    /// Build from explicit element sizes.
    pub fn from_sizes(sizes: &[f64]) -> Self {
        Self {
            positions: positions_for(sizes),
        }
    }

    /// `count` elements of the same size.
    pub fn uniform(count: usize, size: f64) -> Self {
        Self::from_sizes(&vec![size; count])
    }

    /// The raw boundary array (`len() + 1` entries).
    pub fn positions(&self) -> &[f64] {
        &self.positions
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.positions.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Size of element `index`.
    pub fn size(&self, index: usize) -> Option<f64> {
        Some(self.positions.get(index + 1)? - self.positions[index])
    }

    /// Leading edge of element `index`.
    pub fn start(&self, index: usize) -> Option<f64> {
        (index < self.len()).then(|| self.positions[index])
    }

    /// Trailing edge of element `index`.
    pub fn end(&self, index: usize) -> Option<f64> {
        (index < self.len()).then(|| self.positions[index + 1])
    }

    /// Pixel extent `(start, end)` of a run of elements, clipped to the axis.
    pub fn span(&self, range: Range<usize>) -> (f64, f64) {
        let last = self.positions.len() - 1;
        let start = self.positions[range.start.min(last)];
        let end = self.positions[range.end.min(last)];
        (start, end.max(start))
    }

    /// Total extent of all elements.
    pub fn total(&self) -> f64 {
        self.positions[self.positions.len() - 1]
    }

    /// All element sizes in order.
    pub fn sizes(&self) -> Vec<f64> {
        self.positions.windows(2).map(|w| w[1] - w[0]).collect()
    }

    /// Sizes for a subset of elements, in the order given.
    pub fn sizes_of(&self, indices: &[usize]) -> Vec<f64> {
        indices.iter().filter_map(|&i| self.size(i)).collect()
    }

    /// The element containing `pixel`.
    ///
    /// A pixel exactly on a boundary belongs to the element that starts
    /// there, so `index_at(start(i))` is `i` for every non-empty element.
    /// Pixels before the first boundary map to element 0. Pixels at or past
    /// the final boundary map to the last element when `allow_end` is set
    /// and to `None` otherwise.
    pub fn index_at(&self, pixel: f64, allow_end: bool) -> Option<usize> {
        let count = self.len();
        if count == 0 {
            return None;
        }
        if pixel >= self.total() {
            return allow_end.then_some(count - 1);
        }
        let after = self.positions.partition_point(|&p| p <= pixel);
        Some(after.saturating_sub(1).min(count - 1))
    }

    /// Elements intersecting the pixel span `[start_px, end_px)`.
    ///
    /// The range is clipped to valid indices and is empty when nothing
    /// intersects.
    pub fn visible_range(&self, start_px: f64, end_px: f64) -> Range<usize> {
        let count = self.len();
        if count == 0 || end_px <= start_px || start_px >= self.total() || end_px <= 0.0 {
            return 0..0;
        }
        let first = self.index_at(start_px.max(0.0), true).unwrap_or(0);
        // Every element starting before the trailing edge is at least partly visible.
        let end = self.positions.partition_point(|&p| p < end_px).min(count);
        first..end.max(first)
    }

    /// Insert a new element of `size` before `at`, shifting later boundaries.
    pub fn insert(&mut self, at: usize, size: f64) {
        self.insert_many(at, &[size]);
    }

    /// Insert consecutive elements starting at `at`.
    pub fn insert_many(&mut self, at: usize, sizes: &[f64]) {
        if sizes.is_empty() {
            return;
        }
        let at = at.min(self.len());
        let base = self.positions[at];
        let added: f64 = sizes.iter().map(|s| s.max(0.0)).sum();

        for pos in &mut self.positions[at + 1..] {
            *pos += added;
        }

        let mut pos = base;
        let mut new_bounds = Vec::with_capacity(sizes.len());
        for &size in sizes {
            pos += size.max(0.0);
            new_bounds.push(pos);
        }
        self.positions.splice(at + 1..at + 1, new_bounds);
    }

    /// Remove element `at`, returning its size.
    pub fn delete(&mut self, at: usize) -> Option<f64> {
        let size = self.size(at)?;
        self.positions.remove(at + 1);
        for pos in &mut self.positions[at + 1..] {
            *pos -= size;
        }
        Some(size)
    }

    /// Remove several elements, returning their sizes in ascending index order.
    ///
    /// Out-of-range and duplicate indices are ignored.
    pub fn delete_many(&mut self, indices: &[usize]) -> Vec<f64> {
        let mut sorted: Vec<usize> = indices.iter().copied().filter(|&i| i < self.len()).collect();
        sorted.sort_unstable();
        sorted.dedup();
        if sorted.is_empty() {
            return Vec::new();
        }

        let removed = self.sizes_of(&sorted);
        let mut sizes = self.sizes();
        for &i in sorted.iter().rev() {
            sizes.remove(i);
        }
        self.positions = positions_for(&sizes);
        removed
    }

    /// Change the size of element `at`, shifting every later boundary.
    pub fn resize(&mut self, at: usize, new_size: f64) -> Option<f64> {
        let old = self.size(at)?;
        let delta = new_size.max(0.0) - old;
        if delta != 0.0 {
            for pos in &mut self.positions[at + 1..] {
                *pos += delta;
            }
        }
        Some(old)
    }

    /// Rebuild so that new element `i` has the size of old element `order[i]`.
    ///
    /// `order` must be a permutation of `0..len()`.
    pub fn reorder(&mut self, order: &[usize]) {
        debug_assert_eq!(order.len(), self.len());
        let sizes = self.sizes();
        let reordered: Vec<f64> = order.iter().map(|&old| sizes[old]).collect();
        self.positions = positions_for(&reordered);
    }

    /// Replace every size at once.
    pub fn set_sizes(&mut self, sizes: &[f64]) {
        self.positions = positions_for(sizes);
    }
}

/// Stretch `sizes` so they sum to `target`, respecting a per-element floor.
///
/// Sizes are scaled proportionally and rounded down to whole pixels. The
/// rounding remainder goes one pixel at a time to the leading elements. When
/// the floor pushes elements above their share, the resulting deficit is
/// taken back from elements that still have room above the floor. If every
/// element sits on the floor the result exceeds `target`.
pub fn stretch_to_fill(sizes: &[f64], target: f64, min_size: f64) -> Vec<f64> {
    let count = sizes.len();
    if count == 0 {
        return Vec::new();
    }
    let total: f64 = sizes.iter().sum();
    let mut out: Vec<f64> = if total > 0.0 {
        sizes
            .iter()
            .map(|&s| ((s / total) * target).floor().max(min_size))
            .collect()
    } else {
        vec![(target / count as f64).floor().max(min_size); count]
    };

    let mut diff = target - out.iter().sum::<f64>();

    // Hand out the rounding remainder.
    let mut i = 0;
    while diff >= 1.0 {
        out[i % count] += 1.0;
        diff -= 1.0;
        i += 1;
    }

    // Claw back any floor-driven deficit from elements above the floor.
    while diff < 0.0 {
        let room: Vec<usize> = (0..count).filter(|&i| out[i] > min_size).collect();
        if room.is_empty() {
            break;
        }
        let share = (-diff / room.len() as f64).ceil();
        for &i in &room {
            let take = share.min(out[i] - min_size).min(-diff);
            out[i] -= take;
            diff += take;
            if diff >= 0.0 {
                break;
            }
        }
    }

    out
}
