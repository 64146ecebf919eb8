//! One axis (rows or columns) of the sheet layout.
//!
//! An [`AxisLayout`] pairs the [`PositionIndex`] of the displayed elements
//! with the [`DisplayMapping`] that says which data elements those are.
//! Hidden elements keep their size in a side table so showing them again
//! restores the size they had.

use std::collections::BTreeMap;
use std::ops::Range;

use crate::model::display::DisplayMapping;
use crate::model::position::PositionIndex;
use crate::model::remap::{IndexRemap, invert};

/// Rows or columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Row,
    Column,
}

impl Axis {
    pub fn other(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// A removed element, as reported by [`AxisLayout::delete`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemovedSlot {
    pub data: usize,
    pub size: f64,
    pub displayed: bool,
}

/// Displayed positions, display mapping and hidden sizes for one axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisLayout {
    positions: PositionIndex,
    mapping: DisplayMapping,
    hidden_sizes: BTreeMap<usize, f64>,
    default_size: f64,
}

impl AxisLayout {
    /// `count` displayed elements of `default_size`.
    pub fn new(count: usize, default_size: f64) -> Self {
        Self {
            positions: PositionIndex::uniform(count, default_size),
            mapping: DisplayMapping::all(),
            hidden_sizes: BTreeMap::new(),
            default_size,
        }
    }

    pub fn positions(&self) -> &PositionIndex {
        &self.positions
    }

    pub fn mapping(&self) -> &DisplayMapping {
        &self.mapping
    }

    pub fn default_size(&self) -> f64 {
        self.default_size
    }

    pub fn set_default_size(&mut self, size: f64) {
        self.default_size = size;
    }

    /// Number of displayed elements.
    pub fn displayed_count(&self) -> usize {
        self.positions.len()
    }

    pub fn to_data(&self, displayed: usize) -> Option<usize> {
        if displayed >= self.displayed_count() {
            return None;
        }
        self.mapping.to_data(displayed)
    }

    pub fn to_displayed(&self, data: usize) -> Option<usize> {
        self.mapping
            .to_displayed(data)
            .filter(|&d| d < self.displayed_count())
    }

    /// Displayed elements intersecting `[start_px, end_px)`.
    pub fn visible_range(&self, start_px: f64, end_px: f64) -> Range<usize> {
        self.positions.visible_range(start_px, end_px)
    }

    /// Size of a data element whether shown or hidden.
    pub fn data_size(&self, data: usize) -> f64 {
        match self.to_displayed(data) {
            Some(disp) => self.positions.size(disp).unwrap_or(self.default_size),
            None => self.hidden_sizes.get(&data).copied().unwrap_or(self.default_size),
        }
    }

    /// Set the size of a displayed element, returning the old size.
    pub fn resize(&mut self, displayed: usize, size: f64) -> Option<f64> {
        self.positions.resize(displayed, size)
    }

    /// Insert new data elements at data index `at`, all displayed.
    pub fn insert(&mut self, at: usize, sizes: &[f64]) {
        if sizes.is_empty() {
            return;
        }
        let count = sizes.len();
        let displayed_at = match self.mapping.indices() {
            None => at.min(self.displayed_count()),
            Some(list) => list.partition_point(|&d| d < at),
        };
        self.mapping.insert_data(at, count, true);
        self.hidden_sizes = IndexRemap::insert(at, count).remap_keys(std::mem::take(&mut self.hidden_sizes));
        self.positions.insert_many(displayed_at, sizes);
    }

    /// Remove data elements, returning what each one was.
    pub fn delete(&mut self, data: &[usize]) -> Vec<RemovedSlot> {
        let mut sorted = data.to_vec();
        sorted.sort_unstable();
        sorted.dedup();

        let mut removed = Vec::with_capacity(sorted.len());
        let mut displayed = Vec::new();
        for &d in &sorted {
            match self.to_displayed(d) {
                Some(disp) => {
                    displayed.push(disp);
                    removed.push(RemovedSlot {
                        data: d,
                        size: self.positions.size(disp).unwrap_or(self.default_size),
                        displayed: true,
                    });
                }
                None => removed.push(RemovedSlot {
                    data: d,
                    size: self.hidden_sizes.get(&d).copied().unwrap_or(self.default_size),
                    displayed: false,
                }),
            }
        }

        self.positions.delete_many(&displayed);
        self.mapping.delete_data(&sorted);
        self.hidden_sizes = IndexRemap::delete(&sorted).remap_keys(std::mem::take(&mut self.hidden_sizes));
        removed
    }

    /// Put back elements removed by [`delete`](Self::delete).
    ///
    /// `slots` must be sorted by data index. Elements that were hidden come
    /// back hidden.
    pub fn restore(&mut self, slots: &[RemovedSlot], total_after: usize) {
        for slot in slots {
            self.insert(slot.data, &[slot.size]);
        }
        let hidden: Vec<usize> = slots.iter().filter(|s| !s.displayed).map(|s| s.data).collect();
        if !hidden.is_empty() {
            self.hide(&hidden, total_after);
        }
    }

    /// Reorder data elements; `order[new] == old` over `0..total`.
    pub fn permute(&mut self, order: &[usize]) {
        let old_to_new = invert(order);
        match self.mapping.indices() {
            None => self.positions.reorder(order),
            Some(list) => {
                // Old displayed position of each data index.
                let old_displayed: BTreeMap<usize, usize> =
                    list.iter().enumerate().map(|(disp, &d)| (d, disp)).collect();
                let mut moved: Vec<(usize, usize)> = list
                    .iter()
                    .map(|&d| (old_to_new.get(d).copied().unwrap_or(d), d))
                    .collect();
                moved.sort_unstable();
                let displayed_order: Vec<usize> =
                    moved.iter().filter_map(|(_, old)| old_displayed.get(old).copied()).collect();
                self.positions.reorder(&displayed_order);
            }
        }
        let remap = IndexRemap::permute(old_to_new);
        self.mapping.remap(&remap);
        self.hidden_sizes = remap.remap_keys(std::mem::take(&mut self.hidden_sizes));
    }

    /// Hide data elements; their sizes are kept.
    pub fn hide(&mut self, data: &[usize], total: usize) {
        let mut displayed = Vec::new();
        for &d in data {
            if let Some(disp) = self.to_displayed(d) {
                displayed.push(disp);
                let size = self.positions.size(disp).unwrap_or(self.default_size);
                self.hidden_sizes.insert(d, size);
            }
        }
        self.positions.delete_many(&displayed);
        self.mapping.hide(data, total);
    }

    /// Show hidden data elements with the size they had.
    pub fn show(&mut self, data: &[usize], total: usize) {
        let mut newly: Vec<usize> = data
            .iter()
            .copied()
            .filter(|&d| d < total && self.to_displayed(d).is_none())
            .collect();
        newly.sort_unstable();
        newly.dedup();
        self.mapping.show(&newly, total);
        for d in newly {
            let size = self.hidden_sizes.remove(&d).unwrap_or(self.default_size);
            if let Some(disp) = self.mapping.to_displayed(d) {
                self.positions.insert(disp, size);
            }
        }
    }

    /// Show everything.
    pub fn show_all(&mut self, total: usize) {
        let hidden: Vec<usize> = (0..total).filter(|&d| !self.mapping.is_displayed(d)).collect();
        self.show(&hidden, total);
    }

    /// Data indices currently hidden.
    pub fn hidden(&self, total: usize) -> Vec<usize> {
        match self.mapping.indices() {
            None => Vec::new(),
            Some(_) => (0..total).filter(|&d| !self.mapping.is_displayed(d)).collect(),
        }
    }

    /// Replace displayed sizes wholesale.
    pub fn set_displayed_sizes(&mut self, sizes: &[f64]) {
        self.positions.set_sizes(sizes);
    }

    /// Reset to `count` displayed elements, dropping any display mapping.
    pub fn reset(&mut self, count: usize) {
        *self = Self::new(count, self.default_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> AxisLayout {
        let mut axis = AxisLayout::new(5, 10.0);
        axis.resize(1, 20.0);
        axis.resize(3, 40.0);
        axis
    }

    #[test]
    fn test_hide_show_keeps_size() {
        let mut axis = setup();
        axis.hide(&[1], 5);
        assert_eq!(axis.displayed_count(), 4);
        assert_eq!(axis.to_data(1), Some(2));
        assert_eq!(axis.data_size(1), 20.0);
        assert_eq!(axis.positions().total(), 70.0);

        axis.show(&[1], 5);
        assert!(axis.mapping().is_all());
        assert_eq!(axis.positions().sizes(), vec![10.0, 20.0, 10.0, 40.0, 10.0]);
    }

    #[test]
    fn test_insert_with_hidden() {
        let mut axis = setup();
        axis.hide(&[0], 5);
        axis.insert(2, &[7.0]);
        assert_eq!(axis.mapping().indices(), Some(&[1, 2, 3, 4, 5][..]));
        assert_eq!(axis.positions().sizes(), vec![20.0, 7.0, 10.0, 40.0, 10.0]);
        assert_eq!(axis.data_size(0), 10.0);
    }

    #[test]
    fn test_delete_and_restore() {
        let original = setup();
        let mut axis = original.clone();
        let removed = axis.delete(&[3, 1]);
        assert_eq!(removed.len(), 2);
        assert_eq!(removed[0].size, 20.0);
        assert_eq!(axis.positions().sizes(), vec![10.0, 10.0, 10.0]);

        axis.restore(&removed, 5);
        assert_eq!(axis, original);
    }

    #[test]
    fn test_restore_hidden_slot() {
        let mut original = setup();
        original.hide(&[3], 5);
        let mut axis = original.clone();
        let removed = axis.delete(&[3]);
        assert!(!removed[0].displayed);
        axis.restore(&removed, 5);
        assert_eq!(axis.mapping(), original.mapping());
        assert_eq!(axis.positions(), original.positions());
        assert_eq!(axis.data_size(3), 40.0);
    }

    #[test]
    fn test_permute_identity_mapping() {
        let mut axis = setup();
        // Move data 0 to the end.
        axis.permute(&[1, 2, 3, 4, 0]);
        assert_eq!(axis.positions().sizes(), vec![20.0, 10.0, 40.0, 10.0, 10.0]);
    }

    #[test]
    fn test_permute_with_hidden() {
        let mut axis = setup();
        axis.hide(&[2], 5);
        // Swap data 1 and 3.
        axis.permute(&[0, 3, 2, 1, 4]);
        assert_eq!(axis.mapping().indices(), Some(&[0, 1, 3, 4][..]));
        assert_eq!(axis.positions().sizes(), vec![10.0, 40.0, 20.0, 10.0]);
    }
}
