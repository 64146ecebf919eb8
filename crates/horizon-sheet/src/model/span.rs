//! Named spans: persistent regions with an attached option.
//!
//! A span covers data rows `from_r..upto_r` and data columns
//! `from_c..upto_c`. A [`SpanKind::Rows`] span covers every column and a
//! [`SpanKind::Columns`] span covers every row; their other axis is ignored.
//!
//! Spans follow structural changes. Each adjustment reports which option
//! targets the span newly covers and which it no longer covers, so the
//! caller can add or remove the attached option there.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use crate::error::{Result, SheetError};
use crate::model::axis::Axis;
use crate::model::options::{CellOption, OptionTarget};
use crate::model::remap::IndexRemap;

/// Shape of a span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Cells,
    Rows,
    Columns,
}

/// A persistent named region.
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSpan {
    pub name: String,
    pub kind: SpanKind,
    pub from_r: usize,
    pub upto_r: usize,
    pub from_c: usize,
    pub upto_c: usize,
    pub option: Option<CellOption>,
    /// Also apply the option to header cells of the covered columns.
    pub header: bool,
    /// Also apply the option to index cells of the covered rows.
    pub index: bool,
}

impl NamedSpan {
    /// A rectangular block of cells.
    pub fn cells(name: impl Into<String>, rows: Range<usize>, columns: Range<usize>) -> Self {
        Self {
            name: name.into(),
            kind: SpanKind::Cells,
            from_r: rows.start,
            upto_r: rows.end,
            from_c: columns.start,
            upto_c: columns.end,
            option: None,
            header: false,
            index: false,
        }
    }

    /// Whole rows.
    pub fn rows(name: impl Into<String>, rows: Range<usize>) -> Self {
        Self {
            kind: SpanKind::Rows,
            ..Self::cells(name, rows, 0..0)
        }
    }

    /// Whole columns.
    pub fn columns(name: impl Into<String>, columns: Range<usize>) -> Self {
        Self {
            kind: SpanKind::Columns,
            ..Self::cells(name, 0..0, columns)
        }
    }

    pub fn with_option(mut self, option: CellOption) -> Self {
        self.option = Some(option);
        self
    }

    pub fn with_header(mut self, header: bool) -> Self {
        self.header = header;
        self
    }

    pub fn with_index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn row_range(&self) -> Range<usize> {
        self.from_r..self.upto_r
    }

    pub fn column_range(&self) -> Range<usize> {
        self.from_c..self.upto_c
    }

    /// Whether the span has extent on `axis`.
    pub fn bounded_on(&self, axis: Axis) -> bool {
        match (self.kind, axis) {
            (SpanKind::Cells, _) => true,
            (SpanKind::Rows, Axis::Row) | (SpanKind::Columns, Axis::Column) => true,
            _ => false,
        }
    }

    fn range_on(&self, axis: Axis) -> Range<usize> {
        match axis {
            Axis::Row => self.row_range(),
            Axis::Column => self.column_range(),
        }
    }

    fn set_range_on(&mut self, axis: Axis, range: Range<usize>) {
        match axis {
            Axis::Row => {
                self.from_r = range.start;
                self.upto_r = range.end;
            }
            Axis::Column => {
                self.from_c = range.start;
                self.upto_c = range.end;
            }
        }
    }

    /// Check the span is well formed.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(SheetError::invalid_span(&self.name, "name must not be empty"));
        }
        for axis in [Axis::Row, Axis::Column] {
            if !self.bounded_on(axis) {
                continue;
            }
            let range = self.range_on(axis);
            if range.start >= range.end {
                return Err(SheetError::invalid_span(
                    &self.name,
                    format!("empty {axis:?} range {}..{}", range.start, range.end),
                ));
            }
        }
        Ok(())
    }

    /// Every option target the span's option applies to.
    pub fn targets(&self) -> BTreeSet<OptionTarget> {
        let mut out = BTreeSet::new();
        match self.kind {
            SpanKind::Cells => {
                for r in self.row_range() {
                    for c in self.column_range() {
                        out.insert(OptionTarget::Cell(r, c));
                    }
                }
            }
            SpanKind::Rows => out.extend(self.row_range().map(OptionTarget::Row)),
            SpanKind::Columns => out.extend(self.column_range().map(OptionTarget::Column)),
        }
        if self.header && self.kind != SpanKind::Rows {
            out.extend(self.column_range().map(OptionTarget::Header));
        }
        if self.index && self.kind != SpanKind::Columns {
            out.extend(self.row_range().map(OptionTarget::Index));
        }
        out
    }

    /// Whether table cell `(row, column)` lies inside the span.
    pub fn contains(&self, row: usize, column: usize) -> bool {
        let in_rows = !self.bounded_on(Axis::Row) || self.row_range().contains(&row);
        let in_columns = !self.bounded_on(Axis::Column) || self.column_range().contains(&column);
        in_rows && in_columns
    }
}

/// Translate an option target along `axis`; `None` if its index was deleted.
pub fn remap_target(target: OptionTarget, axis: Axis, remap: &IndexRemap) -> Option<OptionTarget> {
    use OptionTarget::*;
    Some(match (axis, target) {
        (Axis::Row, Cell(r, c)) => Cell(remap.apply(r)?, c),
        (Axis::Row, Row(r)) => Row(remap.apply(r)?),
        (Axis::Row, Index(r)) => Index(remap.apply(r)?),
        (Axis::Column, Cell(r, c)) => Cell(r, remap.apply(c)?),
        (Axis::Column, Column(c)) => Column(remap.apply(c)?),
        (Axis::Column, Header(c)) => Header(remap.apply(c)?),
        (_, other) => other,
    })
}

/// How one span changed under a structural edit.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SpanAdjustment {
    pub name: String,
    pub option: Option<CellOption>,
    /// Targets (in post-edit indices) that now need the option.
    pub gained: Vec<OptionTarget>,
    /// Targets (in post-edit indices) that must lose the option.
    pub lost: Vec<OptionTarget>,
    /// The span shrank to nothing and was dropped.
    pub removed: bool,
}

/// Named spans by name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpanRegistry {
    spans: BTreeMap<String, NamedSpan>,
}

impl SpanRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a span; names are unique.
    pub fn add(&mut self, span: NamedSpan) -> Result<()> {
        span.validate()?;
        if self.spans.contains_key(&span.name) {
            return Err(SheetError::DuplicateSpan(span.name));
        }
        self.spans.insert(span.name.clone(), span);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&NamedSpan> {
        self.spans
            .get(name)
            .ok_or_else(|| SheetError::SpanNotFound(name.to_string()))
    }

    pub fn remove(&mut self, name: &str) -> Result<NamedSpan> {
        self.spans
            .remove(name)
            .ok_or_else(|| SheetError::SpanNotFound(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &NamedSpan> {
        self.spans.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.spans.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Spans containing table cell `(row, column)`.
    pub fn spans_at(&self, row: usize, column: usize) -> impl Iterator<Item = &NamedSpan> {
        self.spans.values().filter(move |s| s.contains(row, column))
    }

    /// `count` elements inserted at `at` on `axis`.
    ///
    /// Spans after `at` shift; spans strictly containing `at` grow.
    pub fn insert(&mut self, axis: Axis, at: usize, count: usize) -> Vec<SpanAdjustment> {
        let remap = IndexRemap::insert(at, count);
        self.adjust(axis, &remap, |range| {
            if at <= range.start {
                Some(range.start + count..range.end + count)
            } else if at < range.end {
                Some(range.start..range.end + count)
            } else {
                Some(range)
            }
        })
    }

    /// Elements `deleted` removed from `axis`.
    ///
    /// Spans shrink by the deleted elements they covered and are dropped
    /// once empty.
    pub fn delete(&mut self, axis: Axis, deleted: &[usize]) -> Vec<SpanAdjustment> {
        let remap = IndexRemap::delete(deleted);
        let sorted = match &remap {
            IndexRemap::Delete { deleted } => deleted.clone(),
            _ => Vec::new(),
        };
        self.adjust(axis, &remap, |range| {
            let start = range.start - sorted.partition_point(|&d| d < range.start);
            let end = range.end - sorted.partition_point(|&d| d < range.end);
            (start < end).then_some(start..end)
        })
    }

    /// Elements of `axis` permuted by `old_to_new`.
    ///
    /// The new range runs between where the old first and last elements
    /// landed. Elements that moved into that range gain the option and
    /// covered elements that moved out of it lose it.
    pub fn permute(&mut self, axis: Axis, old_to_new: &[usize]) -> Vec<SpanAdjustment> {
        let remap = IndexRemap::permute(old_to_new.to_vec());
        self.adjust(axis, &remap, |range| {
            let first = remap.apply(range.start)?;
            let last = remap.apply(range.end - 1)?;
            Some(first.min(last)..first.max(last) + 1)
        })
    }

    fn adjust(
        &mut self,
        axis: Axis,
        remap: &IndexRemap,
        new_range: impl Fn(Range<usize>) -> Option<Range<usize>>,
    ) -> Vec<SpanAdjustment> {
        let mut adjustments = Vec::new();
        let mut dropped = Vec::new();

        for span in self.spans.values_mut() {
            if !span.bounded_on(axis) {
                // The span covers the whole axis; only its keyed options move.
                continue;
            }
            let carried: BTreeSet<OptionTarget> = span
                .targets()
                .into_iter()
                .filter_map(|t| remap_target(t, axis, remap))
                .collect();

            let range = span.range_on(axis);
            let Some(range) = new_range(range) else {
                dropped.push(span.name.clone());
                adjustments.push(SpanAdjustment {
                    name: span.name.clone(),
                    option: span.option.clone(),
                    gained: Vec::new(),
                    lost: carried.into_iter().collect(),
                    removed: true,
                });
                continue;
            };
            span.set_range_on(axis, range);

            let now = span.targets();
            let gained: Vec<OptionTarget> = now.difference(&carried).copied().collect();
            let lost: Vec<OptionTarget> = carried.difference(&now).copied().collect();
            if !gained.is_empty() || !lost.is_empty() {
                adjustments.push(SpanAdjustment {
                    name: span.name.clone(),
                    option: span.option.clone(),
                    gained,
                    lost,
                    removed: false,
                });
            }
        }

        for name in dropped {
            self.spans.remove(&name);
        }
        adjustments
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cells;
    use crate::model::options::{CellOption, DropdownSpec};
    use crate::model::remap::{move_order, order_to_mapping};

    fn setup() -> SpanRegistry {
        let mut spans = SpanRegistry::new();
        spans
            .add(
                NamedSpan::columns("choices", 1..3)
                    .with_option(CellOption::Dropdown(DropdownSpec::new(cells!["a", "b"]))),
            )
            .unwrap();
        spans
    }

    #[test]
    fn test_add_validates() {
        let mut spans = setup();
        assert!(matches!(
            spans.add(NamedSpan::rows("choices", 0..1)),
            Err(SheetError::DuplicateSpan(_))
        ));
        assert!(spans.add(NamedSpan::rows("empty", 2..2)).is_err());
        assert!(spans.add(NamedSpan::cells("block", 0..2, 0..2)).is_ok());
        assert!(matches!(spans.get("missing"), Err(SheetError::SpanNotFound(_))));
    }

    #[test]
    fn test_targets() {
        let span = NamedSpan::cells("block", 0..2, 3..4).with_header(true).with_index(true);
        let targets: Vec<_> = span.targets().into_iter().collect();
        assert_eq!(
            targets,
            vec![
                OptionTarget::Cell(0, 3),
                OptionTarget::Cell(1, 3),
                OptionTarget::Header(3),
                OptionTarget::Index(0),
                OptionTarget::Index(1),
            ]
        );
    }

    #[test]
    fn test_move_column_before_span() {
        let mut spans = setup();
        let order = move_order(4, 3, &[0]);
        let adjustments = spans.permute(Axis::Column, &order_to_mapping(&order));
        assert!(adjustments.is_empty());
        let span = spans.get("choices").unwrap();
        assert_eq!(span.column_range(), 0..2);
    }

    #[test]
    fn test_move_into_span_gains() {
        let mut spans = setup();
        // Column 0 lands between the two spanned columns.
        let order = move_order(4, 1, &[0]);
        assert_eq!(order, vec![1, 0, 2, 3]);
        let adjustments = spans.permute(Axis::Column, &order_to_mapping(&order));
        assert_eq!(spans.get("choices").unwrap().column_range(), 0..3);
        assert_eq!(adjustments[0].gained, vec![OptionTarget::Column(1)]);
        assert!(adjustments[0].lost.is_empty());
    }

    #[test]
    fn test_move_out_of_span_loses() {
        let mut spans = SpanRegistry::new();
        spans
            .add(NamedSpan::rows("r", 0..3).with_option(CellOption::Readonly))
            .unwrap();
        // Middle row moves to the end.
        let order = move_order(5, 4, &[1]);
        let adjustments = spans.permute(Axis::Row, &order_to_mapping(&order));
        assert_eq!(spans.get("r").unwrap().row_range(), 0..2);
        assert_eq!(adjustments[0].lost, vec![OptionTarget::Row(4)]);
    }

    #[test]
    fn test_insert_inside_grows() {
        let mut spans = setup();
        let adjustments = spans.insert(Axis::Column, 2, 2);
        assert_eq!(spans.get("choices").unwrap().column_range(), 1..5);
        assert_eq!(
            adjustments[0].gained,
            vec![OptionTarget::Column(2), OptionTarget::Column(3)]
        );

        let adjustments = spans.insert(Axis::Column, 0, 1);
        assert_eq!(spans.get("choices").unwrap().column_range(), 2..6);
        assert!(adjustments.is_empty());

        // Row inserts never touch a column span.
        assert!(spans.insert(Axis::Row, 0, 3).is_empty());
    }

    #[test]
    fn test_delete_shrinks_and_drops() {
        let mut spans = setup();
        spans.delete(Axis::Column, &[0, 1]);
        assert_eq!(spans.get("choices").unwrap().column_range(), 0..1);

        let adjustments = spans.delete(Axis::Column, &[0]);
        assert!(adjustments[0].removed);
        assert!(spans.is_empty());
    }
}
