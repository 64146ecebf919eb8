//! Per-cell, per-row, per-column and sheet-wide cell options.
//!
//! Every option is one variant of the closed [`CellOption`] enum, so
//! resolving precedence is an exhaustive match instead of a string lookup.
//! The registry stores an [`OptionSet`] (at most one option of each
//! [`OptionKind`]) under each key, all keyed by *data* indices.
//!
//! Lookup precedence for table cells is cell, then row, then column, then the
//! sheet-wide global set. Header and index cells have their own maps.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use horizon_sheet_core::Color;

use crate::model::cell::CellValue;
use crate::model::format::FormatSpec;
use crate::model::remap::IndexRemap;

/// Finds the best dropdown entry for typed text.
///
/// Returns indices into `values`, best match first.
pub type SearchFn = Arc<dyn Fn(&str, &[CellValue]) -> Vec<usize> + Send + Sync>;

/// Default dropdown search: case-insensitive prefix matches, then substring matches.
pub fn default_search(text: &str, values: &[CellValue]) -> Vec<usize> {
    let needle = text.to_lowercase();
    if needle.is_empty() {
        return (0..values.len()).collect();
    }
    let lowered: Vec<String> = values.iter().map(|v| v.to_string().to_lowercase()).collect();
    let mut found: Vec<usize> = (0..values.len()).filter(|&i| lowered[i].starts_with(&needle)).collect();
    found.extend((0..values.len()).filter(|&i| !lowered[i].starts_with(&needle) && lowered[i].contains(&needle)));
    found
}

/// A dropdown cell.
#[derive(Clone)]
pub struct DropdownSpec {
    pub values: Vec<CellValue>,
    /// Reject values not in `values`.
    pub validate_input: bool,
    /// Whether the popup comes with a text editor for free typing and search.
    pub editable: bool,
    pub search: Option<SearchFn>,
}

impl DropdownSpec {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self {
            values,
            validate_input: true,
            editable: false,
            search: None,
        }
    }

    pub fn with_validate_input(mut self, validate: bool) -> Self {
        self.validate_input = validate;
        self
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn with_search(mut self, search: SearchFn) -> Self {
        self.search = Some(search);
        self
    }

    /// Indices of entries matching `text`, best first.
    pub fn search(&self, text: &str) -> Vec<usize> {
        match &self.search {
            Some(search) => search(text, &self.values),
            None => default_search(text, &self.values),
        }
    }

    /// Value an empty cell takes when created under this option.
    pub fn default_value(&self) -> CellValue {
        self.values.first().cloned().unwrap_or_default()
    }
}

impl fmt::Debug for DropdownSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DropdownSpec")
            .field("values", &self.values)
            .field("validate_input", &self.validate_input)
            .field("editable", &self.editable)
            .field("search", &self.search.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

impl PartialEq for DropdownSpec {
    fn eq(&self, other: &Self) -> bool {
        let search_eq = match (&self.search, &other.search) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        search_eq
            && self.values == other.values
            && self.validate_input == other.validate_input
            && self.editable == other.editable
    }
}

/// A checkbox cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckboxSpec {
    /// Label drawn beside the box.
    pub text: String,
    /// Whether clicking toggles the value.
    pub editable: bool,
}

impl CheckboxSpec {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            editable: true,
        }
    }

    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }
}

/// Background and foreground override.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Highlight {
    pub bg: Option<Color>,
    pub fg: Option<Color>,
    /// For row highlights, extend the background to the right edge of the viewport.
    pub end_of_screen: bool,
}

impl Highlight {
    pub fn bg(color: Color) -> Self {
        Self {
            bg: Some(color),
            ..Self::default()
        }
    }

    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = Some(color);
        self
    }

    pub fn with_end_of_screen(mut self, extend: bool) -> Self {
        self.end_of_screen = extend;
        self
    }
}

/// Horizontal text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// Discriminant of [`CellOption`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionKind {
    Dropdown,
    Checkbox,
    Format,
    Highlight,
    Align,
    Readonly,
}

impl OptionKind {
    pub const ALL: [OptionKind; 6] = [
        Self::Dropdown,
        Self::Checkbox,
        Self::Format,
        Self::Highlight,
        Self::Align,
        Self::Readonly,
    ];

    /// Kinds that change how values are stored or edited.
    pub fn affects_values(self) -> bool {
        matches!(self, Self::Dropdown | Self::Checkbox | Self::Format)
    }
}

/// One option attached to a cell, row, column or the whole sheet.
#[derive(Debug, Clone, PartialEq)]
pub enum CellOption {
    Dropdown(DropdownSpec),
    Checkbox(CheckboxSpec),
    Format(FormatSpec),
    Highlight(Highlight),
    Align(Align),
    Readonly,
}

impl CellOption {
    pub fn kind(&self) -> OptionKind {
        match self {
            Self::Dropdown(_) => OptionKind::Dropdown,
            Self::Checkbox(_) => OptionKind::Checkbox,
            Self::Format(_) => OptionKind::Format,
            Self::Highlight(_) => OptionKind::Highlight,
            Self::Align(_) => OptionKind::Align,
            Self::Readonly => OptionKind::Readonly,
        }
    }

    /// Value an empty cell takes when created under this option.
    pub fn default_value(&self) -> Option<CellValue> {
        match self {
            Self::Dropdown(spec) => Some(spec.default_value()),
            Self::Checkbox(_) => Some(CellValue::Bool(false)),
            _ => None,
        }
    }
}

/// At most one option per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionSet {
    options: BTreeMap<OptionKind, CellOption>,
}

impl OptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an option, replacing any of the same kind.
    pub fn set(&mut self, option: CellOption) -> Option<CellOption> {
        self.options.insert(option.kind(), option)
    }

    pub fn get(&self, kind: OptionKind) -> Option<&CellOption> {
        self.options.get(&kind)
    }

    pub fn remove(&mut self, kind: OptionKind) -> Option<CellOption> {
        self.options.remove(&kind)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CellOption> {
        self.options.values()
    }
}

impl FromIterator<CellOption> for OptionSet {
    fn from_iter<I: IntoIterator<Item = CellOption>>(iter: I) -> Self {
        let mut set = Self::new();
        for option in iter {
            set.set(option);
        }
        set
    }
}

/// Which map an option lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum OptionTarget {
    Cell(usize, usize),
    Row(usize),
    Column(usize),
    /// A header cell, keyed by data column.
    Header(usize),
    /// An index cell, keyed by data row.
    Index(usize),
    /// The sheet-wide default for table cells.
    Global,
}

/// All cell options of a sheet.
///
/// `Clone` produces the snapshot stored in undo entries; `PartialEq` compares
/// option-for-option.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OptionsRegistry {
    cell: BTreeMap<(usize, usize), OptionSet>,
    row: BTreeMap<usize, OptionSet>,
    column: BTreeMap<usize, OptionSet>,
    header: BTreeMap<usize, OptionSet>,
    index: BTreeMap<usize, OptionSet>,
    global: OptionSet,
}

impl OptionsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_for_mut(&mut self, target: OptionTarget) -> &mut OptionSet {
        match target {
            OptionTarget::Cell(r, c) => self.cell.entry((r, c)).or_default(),
            OptionTarget::Row(r) => self.row.entry(r).or_default(),
            OptionTarget::Column(c) => self.column.entry(c).or_default(),
            OptionTarget::Header(c) => self.header.entry(c).or_default(),
            OptionTarget::Index(r) => self.index.entry(r).or_default(),
            OptionTarget::Global => &mut self.global,
        }
    }

    /// The options stored directly at `target`.
    pub fn options_at(&self, target: OptionTarget) -> Option<&OptionSet> {
        match target {
            OptionTarget::Cell(r, c) => self.cell.get(&(r, c)),
            OptionTarget::Row(r) => self.row.get(&r),
            OptionTarget::Column(c) => self.column.get(&c),
            OptionTarget::Header(c) => self.header.get(&c),
            OptionTarget::Index(r) => self.index.get(&r),
            OptionTarget::Global => Some(&self.global),
        }
    }

    /// Attach an option, returning the one it replaced.
    pub fn set(&mut self, target: OptionTarget, option: CellOption) -> Option<CellOption> {
        self.set_for_mut(target).set(option)
    }

    /// Detach one kind of option from `target`.
    pub fn remove(&mut self, target: OptionTarget, kind: OptionKind) -> Option<CellOption> {
        let removed = self.set_for_mut(target).remove(kind);
        self.prune(target);
        removed
    }

    /// Detach `option` from `target` only if it is still the one stored there.
    pub fn remove_matching(&mut self, target: OptionTarget, option: &CellOption) -> bool {
        let kind = option.kind();
        if self.options_at(target).and_then(|set| set.get(kind)) != Some(option) {
            return false;
        }
        self.remove(target, kind).is_some()
    }

    /// Detach every option from `target`.
    pub fn clear(&mut self, target: OptionTarget) {
        match target {
            OptionTarget::Cell(r, c) => {
                self.cell.remove(&(r, c));
            }
            OptionTarget::Row(r) => {
                self.row.remove(&r);
            }
            OptionTarget::Column(c) => {
                self.column.remove(&c);
            }
            OptionTarget::Header(c) => {
                self.header.remove(&c);
            }
            OptionTarget::Index(r) => {
                self.index.remove(&r);
            }
            OptionTarget::Global => self.global = OptionSet::new(),
        }
    }

    fn prune(&mut self, target: OptionTarget) {
        let empty = self.options_at(target).is_some_and(OptionSet::is_empty);
        if empty && target != OptionTarget::Global {
            self.clear(target);
        }
    }

    /// Effective option of `kind` for table cell `(row, column)`.
    pub fn resolve(&self, row: usize, column: usize, kind: OptionKind) -> Option<&CellOption> {
        self.cell
            .get(&(row, column))
            .and_then(|set| set.get(kind))
            .or_else(|| self.row.get(&row).and_then(|set| set.get(kind)))
            .or_else(|| self.column.get(&column).and_then(|set| set.get(kind)))
            .or_else(|| self.global.get(kind))
    }

    /// Effective option of `kind` for a header cell.
    pub fn resolve_header(&self, column: usize, kind: OptionKind) -> Option<&CellOption> {
        self.header.get(&column).and_then(|set| set.get(kind))
    }

    /// Effective option of `kind` for an index cell.
    pub fn resolve_index(&self, row: usize, kind: OptionKind) -> Option<&CellOption> {
        self.index.get(&row).and_then(|set| set.get(kind))
    }

    pub fn dropdown(&self, row: usize, column: usize) -> Option<&DropdownSpec> {
        match self.resolve(row, column, OptionKind::Dropdown)? {
            CellOption::Dropdown(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn checkbox(&self, row: usize, column: usize) -> Option<&CheckboxSpec> {
        match self.resolve(row, column, OptionKind::Checkbox)? {
            CellOption::Checkbox(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn format(&self, row: usize, column: usize) -> Option<&FormatSpec> {
        match self.resolve(row, column, OptionKind::Format)? {
            CellOption::Format(spec) => Some(spec),
            _ => None,
        }
    }

    /// Highlight for a cell, falling back through row then column.
    pub fn highlight(&self, row: usize, column: usize) -> Option<&Highlight> {
        match self.resolve(row, column, OptionKind::Highlight)? {
            CellOption::Highlight(h) => Some(h),
            _ => None,
        }
    }

    /// Highlight stored on the row itself.
    pub fn row_highlight(&self, row: usize) -> Option<&Highlight> {
        match self.row.get(&row)?.get(OptionKind::Highlight)? {
            CellOption::Highlight(h) => Some(h),
            _ => None,
        }
    }

    pub fn align(&self, row: usize, column: usize) -> Option<Align> {
        match self.resolve(row, column, OptionKind::Align)? {
            CellOption::Align(a) => Some(*a),
            _ => None,
        }
    }

    pub fn is_readonly(&self, row: usize, column: usize) -> bool {
        self.resolve(row, column, OptionKind::Readonly).is_some()
    }

    /// Default for a newly created empty cell.
    pub fn default_value(&self, row: usize, column: usize) -> CellValue {
        [OptionKind::Dropdown, OptionKind::Checkbox]
            .into_iter()
            .find_map(|kind| self.resolve(row, column, kind)?.default_value())
            .unwrap_or_default()
    }

    /// Whether any interactive option (dropdown or checkbox) applies.
    pub fn is_interactive(&self, row: usize, column: usize) -> bool {
        self.dropdown(row, column).is_some() || self.checkbox(row, column).is_some()
    }

    // =========================================================================
    // Remapping
    // =========================================================================

    /// Re-key everything indexed by data row.
    pub fn remap_rows(&mut self, remap: &IndexRemap) {
        self.cell = std::mem::take(&mut self.cell)
            .into_iter()
            .filter_map(|((r, c), set)| remap.apply(r).map(|r| ((r, c), set)))
            .collect();
        self.row = remap.remap_keys(std::mem::take(&mut self.row));
        self.index = remap.remap_keys(std::mem::take(&mut self.index));
    }

    /// Re-key everything indexed by data column.
    pub fn remap_columns(&mut self, remap: &IndexRemap) {
        self.cell = std::mem::take(&mut self.cell)
            .into_iter()
            .filter_map(|((r, c), set)| remap.apply(c).map(|c| ((r, c), set)))
            .collect();
        self.column = remap.remap_keys(std::mem::take(&mut self.column));
        self.header = remap.remap_keys(std::mem::take(&mut self.header));
    }

    /// Number of keyed option sets (excluding the global set).
    pub fn len(&self) -> usize {
        self.cell.len() + self.row.len() + self.column.len() + self.header.len() + self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0 && self.global.is_empty()
    }

    /// Cells carrying their own options.
    pub fn cell_keys(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cell.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells;

    fn dropdown(values: Vec<CellValue>) -> CellOption {
        CellOption::Dropdown(DropdownSpec::new(values))
    }

    #[test]
    fn test_precedence() {
        let mut registry = OptionsRegistry::new();
        registry.set(OptionTarget::Global, CellOption::Align(Align::Right));
        registry.set(OptionTarget::Column(1), CellOption::Align(Align::Center));
        registry.set(OptionTarget::Row(2), CellOption::Align(Align::Left));
        registry.set(OptionTarget::Cell(2, 1), CellOption::Align(Align::Right));

        assert_eq!(registry.align(0, 0), Some(Align::Right));
        assert_eq!(registry.align(0, 1), Some(Align::Center));
        assert_eq!(registry.align(2, 0), Some(Align::Left));
        // Row beats column, cell beats row.
        assert_eq!(registry.align(2, 2), Some(Align::Left));
        assert_eq!(registry.align(2, 1), Some(Align::Right));
    }

    #[test]
    fn test_remove_matching_only() {
        let mut registry = OptionsRegistry::new();
        let spanned = dropdown(cells!["a", "b"]);
        registry.set(OptionTarget::Column(0), dropdown(cells!["x"]));
        assert!(!registry.remove_matching(OptionTarget::Column(0), &spanned));
        assert!(registry.dropdown(0, 0).is_some());

        registry.set(OptionTarget::Column(0), spanned.clone());
        assert!(registry.remove_matching(OptionTarget::Column(0), &spanned));
        assert_eq!(registry.options_at(OptionTarget::Column(0)), None);
    }

    #[test]
    fn test_one_option_per_kind() {
        let mut set = OptionSet::new();
        assert!(set.set(CellOption::Readonly).is_none());
        assert_eq!(set.set(CellOption::Readonly), Some(CellOption::Readonly));
        set.set(CellOption::Align(Align::Center));
        assert_eq!(set.iter().count(), 2);
    }

    #[test]
    fn test_remove_prunes_empty_sets() {
        let mut registry = OptionsRegistry::new();
        registry.set(OptionTarget::Cell(0, 0), CellOption::Readonly);
        assert_eq!(registry.len(), 1);
        registry.remove(OptionTarget::Cell(0, 0), OptionKind::Readonly);
        assert_eq!(registry.len(), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_default_values() {
        let mut registry = OptionsRegistry::new();
        registry.set(OptionTarget::Column(0), dropdown(cells!["x", "y"]));
        registry.set(OptionTarget::Column(1), CellOption::Checkbox(CheckboxSpec::new("")));
        assert_eq!(registry.default_value(5, 0), CellValue::from("x"));
        assert_eq!(registry.default_value(5, 1), CellValue::Bool(false));
        assert_eq!(registry.default_value(5, 2), CellValue::Empty);
        assert!(registry.is_interactive(0, 1));
    }

    #[test]
    fn test_remap_columns() {
        let mut registry = OptionsRegistry::new();
        registry.set(OptionTarget::Column(1), CellOption::Readonly);
        registry.set(OptionTarget::Cell(0, 2), CellOption::Readonly);
        registry.set(OptionTarget::Header(2), CellOption::Align(Align::Center));

        registry.remap_columns(&IndexRemap::delete(&[1]));
        assert!(!registry.is_readonly(3, 1));
        assert!(registry.is_readonly(0, 1));
        assert_eq!(registry.options_at(OptionTarget::Column(1)), None);
        assert!(registry.resolve_header(1, OptionKind::Align).is_some());
    }

    #[test]
    fn test_default_search() {
        let values = cells!["Apple", "Banana", "Pineapple"];
        assert_eq!(default_search("ap", &values), vec![0, 2]);
        assert_eq!(default_search("an", &values), vec![1]);
        assert_eq!(default_search("", &values), vec![0, 1, 2]);
    }

    #[test]
    fn test_snapshot_equality() {
        let mut registry = OptionsRegistry::new();
        registry.set(OptionTarget::Row(0), dropdown(cells![1, 2]));
        let snapshot = registry.clone();
        assert_eq!(snapshot, registry);
        registry.set(OptionTarget::Row(0), dropdown(cells![1, 3]));
        assert_ne!(snapshot, registry);
    }
}
