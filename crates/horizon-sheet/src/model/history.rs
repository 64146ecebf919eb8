//! Undo/redo history.
//!
//! An [`UndoEntry`] records what is needed to return the sheet to the state
//! before an operation: old cell values, elements the operation added or
//! deleted, the permutation it applied, and snapshots of options and spans.
//! Applying an entry produces its inverse, which goes onto the opposite
//! stack, so undo and redo share one code path.

use std::collections::{BTreeMap, VecDeque};

use crate::model::axis::{Axis, RemovedSlot};
use crate::model::cell::CellValue;
use crate::model::options::OptionsRegistry;
use crate::model::region::{Region, SelectionKind};
use crate::model::span::SpanRegistry;

/// The user-level operation an entry belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventName {
    EditTable,
    EditHeader,
    EditIndex,
    Paste,
    Cut,
    DeleteCells,
    DragFill,
    InsertRows,
    InsertColumns,
    DeleteRows,
    DeleteColumns,
    MoveRows,
    MoveColumns,
}

impl EventName {
    /// Whether the operation changes the shape of the grid.
    pub fn is_structural(self) -> bool {
        matches!(
            self,
            Self::InsertRows
                | Self::InsertColumns
                | Self::DeleteRows
                | Self::DeleteColumns
                | Self::MoveRows
                | Self::MoveColumns
        )
    }
}

/// Old values keyed by data index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellSnapshot {
    pub table: BTreeMap<(usize, usize), CellValue>,
    pub header: BTreeMap<usize, CellValue>,
    pub index: BTreeMap<usize, CellValue>,
}

impl CellSnapshot {
    pub fn is_empty(&self) -> bool {
        self.table.is_empty() && self.header.is_empty() && self.index.is_empty()
    }

    /// Record a table cell's old value; the first record for a cell wins.
    pub fn record(&mut self, row: usize, column: usize, old: CellValue) {
        self.table.entry((row, column)).or_insert(old);
    }

    pub fn record_header(&mut self, column: usize, old: CellValue) {
        self.header.entry(column).or_insert(old);
    }

    pub fn record_index(&mut self, row: usize, old: CellValue) {
        self.index.entry(row).or_insert(old);
    }
}

/// Whether captured cells are restored before or after the structural part.
///
/// Cells are keyed in the index space that exists when they are written
/// back. An entry created right after an operation uses that operation's
/// post-state, so the cells go first; its inverse writes them after the
/// structure has been rebuilt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CellOrder {
    #[default]
    BeforeStructure,
    AfterStructure,
}

impl CellOrder {
    pub fn flipped(self) -> Self {
        match self {
            Self::BeforeStructure => Self::AfterStructure,
            Self::AfterStructure => Self::BeforeStructure,
        }
    }
}

/// One row or column as it existed before removal.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementSnapshot {
    pub slot: RemovedSlot,
    /// Row values, or one value per row for a column.
    pub values: Vec<CellValue>,
    /// Index label of a row, or header label of a column.
    pub label: Option<CellValue>,
}

/// Rows or columns added or deleted by an operation, ascending by data index.
#[derive(Debug, Clone, PartialEq)]
pub struct StructuralBlock {
    pub axis: Axis,
    pub elements: Vec<ElementSnapshot>,
}

impl StructuralBlock {
    pub fn data_indices(&self) -> Vec<usize> {
        self.elements.iter().map(|e| e.slot.data).collect()
    }
}

/// A permutation to apply, as `order[new] == old` over data indices.
#[derive(Debug, Clone, PartialEq)]
pub struct MovedBlock {
    pub axis: Axis,
    pub order: Vec<usize>,
}

/// One selection box, in displayed coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SelectedBox {
    pub region: Region,
    pub kind: SelectionKind,
}

/// Selection at the time an entry was captured.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectionSnapshot {
    pub boxes: Vec<SelectedBox>,
    /// Current cell and the position of its box in `boxes`.
    pub current: Option<(usize, usize, usize)>,
}

/// Everything needed to revert one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoEntry {
    pub event: EventName,
    pub cells: CellSnapshot,
    pub cell_order: CellOrder,
    /// Elements the operation added, in the order added; reverting removes
    /// them last block first.
    pub added: Vec<StructuralBlock>,
    /// Elements the operation deleted, in the order deleted; reverting
    /// reinserts them last block first.
    pub deleted: Vec<StructuralBlock>,
    /// Permutation that reverts a move.
    pub moved: Option<MovedBlock>,
    pub options: Option<OptionsRegistry>,
    pub spans: Option<SpanRegistry>,
    pub selection: SelectionSnapshot,
}

impl UndoEntry {
    pub fn new(event: EventName, selection: SelectionSnapshot) -> Self {
        Self {
            event,
            cells: CellSnapshot::default(),
            cell_order: CellOrder::BeforeStructure,
            added: Vec::new(),
            deleted: Vec::new(),
            moved: None,
            options: None,
            spans: None,
            selection,
        }
    }

    /// Whether reverting this entry would change nothing.
    pub fn is_noop(&self) -> bool {
        self.cells.is_empty()
            && self.added.is_empty()
            && self.deleted.is_empty()
            && self.moved.is_none()
            && self.options.is_none()
            && self.spans.is_none()
    }
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<UndoEntry>,
    redo: VecDeque<UndoEntry>,
    max_undos: usize,
}

impl History {
    pub fn new(max_undos: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_undos,
        }
    }

    pub fn max_undos(&self) -> usize {
        self.max_undos
    }

    /// Change the bound, evicting the oldest entries if needed.
    pub fn set_max_undos(&mut self, max_undos: usize) {
        self.max_undos = max_undos;
        while self.undo.len() > max_undos {
            self.undo.pop_front();
        }
        while self.redo.len() > max_undos {
            self.redo.pop_front();
        }
    }

    /// Record a new operation; the redo stack is cleared.
    pub fn commit(&mut self, entry: UndoEntry) {
        self.redo.clear();
        self.push_undo(entry);
    }

    /// Push onto the undo stack without touching redo.
    pub fn push_undo(&mut self, entry: UndoEntry) {
        if self.max_undos == 0 {
            return;
        }
        self.undo.push_back(entry);
        if self.undo.len() > self.max_undos {
            self.undo.pop_front();
        }
    }

    pub fn push_redo(&mut self, entry: UndoEntry) {
        if self.max_undos == 0 {
            return;
        }
        self.redo.push_back(entry);
        if self.redo.len() > self.max_undos {
            self.redo.pop_front();
        }
    }

    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        self.undo.pop_back()
    }

    pub fn pop_redo(&mut self) -> Option<UndoEntry> {
        self.redo.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Most recent undo entry.
    pub fn last_undo(&self) -> Option<&UndoEntry> {
        self.undo.back()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(40)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(event: EventName) -> UndoEntry {
        UndoEntry::new(event, SelectionSnapshot::default())
    }

    #[test]
    fn test_commit_clears_redo() {
        let mut history = History::new(10);
        history.commit(entry(EventName::EditTable));
        let popped = history.pop_undo().unwrap();
        history.push_redo(popped);
        assert!(history.can_redo());

        history.commit(entry(EventName::Paste));
        assert!(!history.can_redo());
        assert_eq!(history.undo_len(), 1);
    }

    #[test]
    fn test_eviction() {
        let mut history = History::new(2);
        history.commit(entry(EventName::EditTable));
        history.commit(entry(EventName::Paste));
        history.commit(entry(EventName::Cut));
        assert_eq!(history.undo_len(), 2);
        assert_eq!(history.pop_undo().unwrap().event, EventName::Cut);
        assert_eq!(history.pop_undo().unwrap().event, EventName::Paste);
        assert!(history.pop_undo().is_none());
    }

    #[test]
    fn test_shrinking_bound() {
        let mut history = History::new(5);
        for _ in 0..5 {
            history.commit(entry(EventName::EditTable));
        }
        history.set_max_undos(3);
        assert_eq!(history.undo_len(), 3);
    }

    #[test]
    fn test_first_record_wins() {
        let mut cells = CellSnapshot::default();
        cells.record(0, 0, CellValue::Int(1));
        cells.record(0, 0, CellValue::Int(2));
        assert_eq!(cells.table[&(0, 0)], CellValue::Int(1));
        assert!(entry(EventName::EditTable).is_noop());
    }

    #[test]
    fn test_cell_order_flips() {
        assert_eq!(CellOrder::BeforeStructure.flipped(), CellOrder::AfterStructure);
        assert!(EventName::MoveColumns.is_structural());
        assert!(!EventName::DragFill.is_structural());
    }
}
