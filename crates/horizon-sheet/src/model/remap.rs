//! Full index remaps for structural row/column changes.
//!
//! Every keyed structure in the sheet (option maps, spans, display lists,
//! selection boxes) is updated through one [`IndexRemap`] so that inserts,
//! deletes and moves shift them identically.

use std::collections::BTreeMap;

/// How old indices on one axis map to new indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexRemap {
    /// Indices `>= at` shift up by `count`.
    Insert { at: usize, count: usize },
    /// Listed indices vanish; later ones shift down by the number removed before them.
    Delete { deleted: Vec<usize> },
    /// `old_to_new[old]` is the new position; indices past the end are unchanged.
    Permute { old_to_new: Vec<usize> },
}

impl IndexRemap {
    /// Remap for inserting `count` elements before `at`.
    pub fn insert(at: usize, count: usize) -> Self {
        Self::Insert { at, count }
    }

    /// Remap for deleting `indices` (any order, duplicates ignored).
    pub fn delete(indices: &[usize]) -> Self {
        let mut deleted = indices.to_vec();
        deleted.sort_unstable();
        deleted.dedup();
        Self::Delete { deleted }
    }

    /// Remap for an arbitrary permutation given as `old_to_new`.
    pub fn permute(old_to_new: Vec<usize>) -> Self {
        Self::Permute { old_to_new }
    }

    /// Where `old` ends up, or `None` if it was deleted.
    pub fn apply(&self, old: usize) -> Option<usize> {
        match self {
            Self::Insert { at, count } => Some(if old >= *at { old + count } else { old }),
            Self::Delete { deleted } => {
                let before = deleted.partition_point(|&d| d < old);
                if deleted.get(before) == Some(&old) {
                    None
                } else {
                    Some(old - before)
                }
            }
            Self::Permute { old_to_new } => Some(old_to_new.get(old).copied().unwrap_or(old)),
        }
    }

    /// Whether this remap leaves every index where it was.
    pub fn is_identity(&self) -> bool {
        match self {
            Self::Insert { count, .. } => *count == 0,
            Self::Delete { deleted } => deleted.is_empty(),
            Self::Permute { old_to_new } => old_to_new.iter().enumerate().all(|(i, &n)| i == n),
        }
    }

    /// Re-key a map, dropping entries whose index was deleted.
    pub fn remap_keys<V>(&self, map: BTreeMap<usize, V>) -> BTreeMap<usize, V> {
        map.into_iter()
            .filter_map(|(k, v)| self.apply(k).map(|k| (k, v)))
            .collect()
    }
}

/// New order after moving `moving` so the first of them lands at `to`.
///
/// `result[new] == old`. Moved elements keep their relative order; `to` is
/// clamped so the block fits.
pub fn move_order(total: usize, to: usize, moving: &[usize]) -> Vec<usize> {
    let mut moving: Vec<usize> = moving.iter().copied().filter(|&i| i < total).collect();
    moving.sort_unstable();
    moving.dedup();

    let mut rest: Vec<usize> = (0..total).filter(|i| moving.binary_search(i).is_err()).collect();
    let to = to.min(rest.len());
    rest.splice(to..to, moving);
    rest
}

/// Turn an order (`order[new] == old`) into `old_to_new`.
pub fn order_to_mapping(order: &[usize]) -> Vec<usize> {
    let mut mapping = vec![0; order.len()];
    for (new, &old) in order.iter().enumerate() {
        mapping[old] = new;
    }
    mapping
}

/// Inverse of a permutation given as `old_to_new`.
pub fn invert(old_to_new: &[usize]) -> Vec<usize> {
    order_to_mapping(old_to_new)
}

/// Apply `order` (`order[new] == old`) to a vector.
pub fn reorder_vec<T>(items: Vec<T>, order: &[usize]) -> Vec<T> {
    let mut slots: Vec<Option<T>> = items.into_iter().map(Some).collect();
    let mut out = Vec::with_capacity(order.len());
    for &old in order {
        if let Some(item) = slots.get_mut(old).and_then(Option::take) {
            out.push(item);
        }
    }
    // Anything beyond the permuted prefix keeps its place.
    out.extend(slots.into_iter().skip(order.len()).flatten());
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_remap() {
        let remap = IndexRemap::insert(2, 3);
        assert_eq!(remap.apply(1), Some(1));
        assert_eq!(remap.apply(2), Some(5));
        assert_eq!(remap.apply(10), Some(13));
    }

    #[test]
    fn test_delete_remap() {
        let remap = IndexRemap::delete(&[4, 1, 1]);
        assert_eq!(remap.apply(0), Some(0));
        assert_eq!(remap.apply(1), None);
        assert_eq!(remap.apply(2), Some(1));
        assert_eq!(remap.apply(4), None);
        assert_eq!(remap.apply(5), Some(3));
    }

    #[test]
    fn test_move_order() {
        // Move column 0 to index 3 of four.
        assert_eq!(move_order(4, 3, &[0]), vec![1, 2, 3, 0]);
        // Move a block upwards.
        assert_eq!(move_order(5, 0, &[3, 4]), vec![3, 4, 0, 1, 2]);
        // Moving a block onto itself is the identity.
        assert_eq!(move_order(5, 1, &[1, 2]), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_mapping_and_inverse() {
        let order = move_order(4, 3, &[0]);
        let mapping = order_to_mapping(&order);
        assert_eq!(mapping, vec![3, 0, 1, 2]);
        assert_eq!(invert(&mapping), order);
        assert!(!IndexRemap::permute(mapping).is_identity());
    }

    #[test]
    fn test_remap_keys() {
        let map: BTreeMap<usize, &str> = [(0, "a"), (1, "b"), (3, "d")].into_iter().collect();
        let remapped = IndexRemap::delete(&[1]).remap_keys(map);
        assert_eq!(remapped, [(0, "a"), (2, "d")].into_iter().collect());
    }

    #[test]
    fn test_reorder_vec() {
        let items = vec!["a", "b", "c", "d"];
        assert_eq!(reorder_vec(items, &[1, 2, 3, 0]), vec!["b", "c", "d", "a"]);
    }
}
