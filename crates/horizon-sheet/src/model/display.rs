//! Mapping between displayed and data indices.
//!
//! When every row (or column) is shown the mapping is the identity and no
//! list is stored. Otherwise the displayed data indices are kept as a strictly
//! increasing list, so `to_data` is an array lookup and `to_displayed` a
//! binary search.

use std::collections::BTreeSet;

use crate::error::{Result, SheetError};
use crate::model::remap::IndexRemap;

/// Displayed subset of one axis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DisplayMapping {
    displayed: Option<Vec<usize>>,
}

impl DisplayMapping {
    /// Everything displayed.
    pub fn all() -> Self {
        Self { displayed: None }
    }

    /// Display exactly `indices` out of `total` data elements.
    ///
    /// The list must be strictly increasing and in bounds.
    pub fn from_indices(indices: Vec<usize>, total: usize) -> Result<Self> {
        if let Some(w) = indices.windows(2).find(|w| w[0] >= w[1]) {
            return Err(SheetError::invalid_mapping(format!(
                "indices must be strictly increasing, found {} before {}",
                w[0], w[1]
            )));
        }
        if let Some(&last) = indices.last()
            && last >= total
        {
            return Err(SheetError::invalid_mapping(format!(
                "index {last} is out of bounds for {total} elements"
            )));
        }
        Ok(Self {
            displayed: Some(indices),
        })
    }

    /// Whether the identity mapping is in effect.
    pub fn is_all(&self) -> bool {
        self.displayed.is_none()
    }

    /// The displayed list, if not the identity.
    pub fn indices(&self) -> Option<&[usize]> {
        self.displayed.as_deref()
    }

    /// Number of displayed elements given `total` data elements.
    pub fn displayed_count(&self, total: usize) -> usize {
        match &self.displayed {
            None => total,
            Some(list) => list.len(),
        }
    }

    /// Data index shown at `displayed`.
    pub fn to_data(&self, displayed: usize) -> Option<usize> {
        match &self.displayed {
            None => Some(displayed),
            Some(list) => list.get(displayed).copied(),
        }
    }

    /// Displayed position of `data`, or `None` if hidden.
    pub fn to_displayed(&self, data: usize) -> Option<usize> {
        match &self.displayed {
            None => Some(data),
            Some(list) => list.binary_search(&data).ok(),
        }
    }

    /// Whether `data` is currently shown.
    pub fn is_displayed(&self, data: usize) -> bool {
        self.to_displayed(data).is_some()
    }

    /// Shift for `count` data elements inserted at `at`.
    ///
    /// When `show` is set and a list is active, the new elements are added to
    /// it; the identity mapping shows them automatically.
    pub fn insert_data(&mut self, at: usize, count: usize, show: bool) {
        if let Some(list) = &mut self.displayed {
            for idx in list.iter_mut() {
                if *idx >= at {
                    *idx += count;
                }
            }
            if show {
                let pos = list.partition_point(|&i| i < at);
                list.splice(pos..pos, at..at + count);
            }
        }
    }

    /// Remove deleted data indices and close the gaps.
    pub fn delete_data(&mut self, deleted: &[usize]) {
        self.remap(&IndexRemap::delete(deleted));
    }

    /// Translate every displayed index through `remap` and re-sort.
    pub fn remap(&mut self, remap: &IndexRemap) {
        if let Some(list) = &mut self.displayed {
            let mut remapped: Vec<usize> = list.iter().filter_map(|&i| remap.apply(i)).collect();
            remapped.sort_unstable();
            remapped.dedup();
            *list = remapped;
        }
    }

    /// Hide data indices, switching from identity to an explicit list if needed.
    pub fn hide(&mut self, data: &[usize], total: usize) {
        let hidden: BTreeSet<usize> = data.iter().copied().collect();
        let current: Vec<usize> = match self.displayed.take() {
            None => (0..total).collect(),
            Some(list) => list,
        };
        self.displayed = Some(current.into_iter().filter(|i| !hidden.contains(i)).collect());
    }

    /// Show data indices again; returns to identity once everything is shown.
    pub fn show(&mut self, data: &[usize], total: usize) {
        if let Some(list) = self.displayed.take() {
            let mut set: BTreeSet<usize> = list.into_iter().collect();
            set.extend(data.iter().copied().filter(|&i| i < total));
            if set.len() == total {
                self.displayed = None;
            } else {
                self.displayed = Some(set.into_iter().collect());
            }
        }
    }

    /// Return to the identity mapping.
    pub fn show_all(&mut self) {
        self.displayed = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity() {
        let mapping = DisplayMapping::all();
        assert_eq!(mapping.to_data(7), Some(7));
        assert_eq!(mapping.to_displayed(7), Some(7));
        assert_eq!(mapping.displayed_count(10), 10);
    }

    #[test]
    fn test_list_lookup() {
        let mapping = DisplayMapping::from_indices(vec![1, 4, 6], 8).unwrap();
        assert_eq!(mapping.to_data(1), Some(4));
        assert_eq!(mapping.to_data(3), None);
        assert_eq!(mapping.to_displayed(6), Some(2));
        assert_eq!(mapping.to_displayed(5), None);
        assert_eq!(mapping.displayed_count(8), 3);
    }

    #[test]
    fn test_validation() {
        assert!(DisplayMapping::from_indices(vec![2, 2], 5).is_err());
        assert!(DisplayMapping::from_indices(vec![3, 1], 5).is_err());
        assert!(DisplayMapping::from_indices(vec![1, 5], 5).is_err());
        assert!(DisplayMapping::from_indices(vec![], 0).is_ok());
    }

    #[test]
    fn test_insert_and_delete() {
        let mut mapping = DisplayMapping::from_indices(vec![0, 2, 4], 5).unwrap();
        mapping.insert_data(2, 2, true);
        assert_eq!(mapping.indices(), Some(&[0, 2, 3, 4, 6][..]));

        mapping.delete_data(&[2, 3]);
        assert_eq!(mapping.indices(), Some(&[0, 2, 4][..]));

        mapping.insert_data(0, 1, false);
        assert_eq!(mapping.indices(), Some(&[1, 3, 5][..]));
    }

    #[test]
    fn test_remap_permutation() {
        let mut mapping = DisplayMapping::from_indices(vec![0, 1], 4).unwrap();
        mapping.remap(&IndexRemap::permute(vec![3, 0, 1, 2]));
        assert_eq!(mapping.indices(), Some(&[0, 3][..]));
    }

    #[test]
    fn test_hide_show() {
        let mut mapping = DisplayMapping::all();
        mapping.hide(&[1, 3], 5);
        assert_eq!(mapping.indices(), Some(&[0, 2, 4][..]));
        mapping.show(&[1], 5);
        assert_eq!(mapping.indices(), Some(&[0, 1, 2, 4][..]));
        mapping.show(&[3], 5);
        assert!(mapping.is_all());
    }
}
