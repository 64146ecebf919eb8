//! Logical sheet events and the listener registry.
//!
//! The sheet never calls host callbacks by name. It emits a [`SheetEvent`]
//! whose [`EventKind`] selects the listeners to run; the host maps those to
//! whatever its toolkit calls them.
//!
//! ```
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use horizon_sheet::widget::{EventKind, EventRegistry, SheetEvent};
//!
//! let events = EventRegistry::new();
//! let count = Arc::new(AtomicUsize::new(0));
//! let seen = count.clone();
//! events.connect(EventKind::Undo, move |_| {
//!     seen.fetch_add(1, Ordering::SeqCst);
//! });
//! events.emit(SheetEvent::Undo(horizon_sheet::model::EventName::Paste));
//! assert_eq!(count.load(Ordering::SeqCst), 1);
//! ```

use std::collections::HashMap;
use std::ops::Range;

use horizon_sheet_core::{ConnectionId, Signal};

use crate::model::{Axis, CellValue, EventName, Region, SelectedBox};
use crate::widget::arena::FrameStats;

/// Closed set of event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    CellsModified,
    RowsInserted,
    ColumnsInserted,
    RowsDeleted,
    ColumnsDeleted,
    RowsMoved,
    ColumnsMoved,
    RowsResized,
    ColumnsResized,
    VisibilityChanged,
    SelectionChanged,
    Copied,
    Undo,
    Redo,
    EditorOpened,
    EditorClosed,
    RedrawCompleted,
}

impl EventKind {
    pub const ALL: [EventKind; 17] = [
        Self::CellsModified,
        Self::RowsInserted,
        Self::ColumnsInserted,
        Self::RowsDeleted,
        Self::ColumnsDeleted,
        Self::RowsMoved,
        Self::ColumnsMoved,
        Self::RowsResized,
        Self::ColumnsResized,
        Self::VisibilityChanged,
        Self::SelectionChanged,
        Self::Copied,
        Self::Undo,
        Self::Redo,
        Self::EditorOpened,
        Self::EditorClosed,
        Self::RedrawCompleted,
    ];
}

/// One changed cell, in data indices.
#[derive(Debug, Clone, PartialEq)]
pub struct CellChange {
    pub row: usize,
    pub column: usize,
    pub old: CellValue,
    pub new: CellValue,
}

/// One changed header or index label.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelChange {
    pub index: usize,
    pub old: CellValue,
    pub new: CellValue,
}

/// Values changed by an edit, paste, cut, delete or drag-fill.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedEvent {
    pub event: EventName,
    pub table: Vec<CellChange>,
    pub header: Vec<LabelChange>,
    pub index: Vec<LabelChange>,
}

impl ModifiedEvent {
    pub fn new(event: EventName) -> Self {
        Self {
            event,
            table: Vec::new(),
            header: Vec::new(),
            index: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty() && self.header.is_empty() && self.index.is_empty()
    }
}

/// Rows or columns inserted or deleted.
#[derive(Debug, Clone, PartialEq)]
pub struct StructureEvent {
    pub axis: Axis,
    /// Data indices after an insert, or before a delete.
    pub indices: Vec<usize>,
}

/// Rows or columns reordered.
#[derive(Debug, Clone, PartialEq)]
pub struct MoveEvent {
    pub axis: Axis,
    /// `old_to_new[old]` over data indices.
    pub old_to_new: Vec<usize>,
}

/// A row height or column width changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeEvent {
    pub axis: Axis,
    /// Displayed index.
    pub index: usize,
    pub old: f64,
    pub new: f64,
}

/// Rows or columns hidden or shown.
#[derive(Debug, Clone, PartialEq)]
pub struct VisibilityEvent {
    pub axis: Axis,
    /// Data indices that changed.
    pub indices: Vec<usize>,
    pub shown: bool,
}

/// The selection after a change.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SelectionEvent {
    pub boxes: Vec<SelectedBox>,
    /// Current cell in displayed indices.
    pub current: Option<(usize, usize)>,
}

/// Text placed on the clipboard.
#[derive(Debug, Clone, PartialEq)]
pub struct CopyEvent {
    pub region: Region,
    pub text: String,
}

/// Which editor was opened or closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorKind {
    Text,
    Dropdown,
}

/// An editor bound to a cell, in displayed indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorEvent {
    pub row: usize,
    pub column: usize,
    pub kind: EditorKind,
    /// For close events, whether a value was committed.
    pub committed: bool,
}

/// A finished redraw.
#[derive(Debug, Clone, PartialEq)]
pub struct RedrawEvent {
    pub rows: Range<usize>,
    pub columns: Range<usize>,
    pub stats: FrameStats,
}

/// An event with its payload.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    CellsModified(ModifiedEvent),
    RowsInserted(StructureEvent),
    ColumnsInserted(StructureEvent),
    RowsDeleted(StructureEvent),
    ColumnsDeleted(StructureEvent),
    RowsMoved(MoveEvent),
    ColumnsMoved(MoveEvent),
    Resized(ResizeEvent),
    VisibilityChanged(VisibilityEvent),
    SelectionChanged(SelectionEvent),
    Copied(CopyEvent),
    Undo(EventName),
    Redo(EventName),
    EditorOpened(EditorEvent),
    EditorClosed(EditorEvent),
    RedrawCompleted(RedrawEvent),
}

impl SheetEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CellsModified(_) => EventKind::CellsModified,
            Self::RowsInserted(_) => EventKind::RowsInserted,
            Self::ColumnsInserted(_) => EventKind::ColumnsInserted,
            Self::RowsDeleted(_) => EventKind::RowsDeleted,
            Self::ColumnsDeleted(_) => EventKind::ColumnsDeleted,
            Self::RowsMoved(_) => EventKind::RowsMoved,
            Self::ColumnsMoved(_) => EventKind::ColumnsMoved,
            Self::Resized(e) => match e.axis {
                Axis::Row => EventKind::RowsResized,
                Axis::Column => EventKind::ColumnsResized,
            },
            Self::VisibilityChanged(_) => EventKind::VisibilityChanged,
            Self::SelectionChanged(_) => EventKind::SelectionChanged,
            Self::Copied(_) => EventKind::Copied,
            Self::Undo(_) => EventKind::Undo,
            Self::Redo(_) => EventKind::Redo,
            Self::EditorOpened(_) => EventKind::EditorOpened,
            Self::EditorClosed(_) => EventKind::EditorClosed,
            Self::RedrawCompleted(_) => EventKind::RedrawCompleted,
        }
    }
}

/// Listener registry keyed by [`EventKind`].
#[derive(Debug)]
pub struct EventRegistry {
    signals: HashMap<EventKind, Signal<SheetEvent>>,
    any: Signal<SheetEvent>,
}

impl Default for EventRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventRegistry {
    pub fn new() -> Self {
        Self {
            signals: EventKind::ALL.iter().map(|&kind| (kind, Signal::new())).collect(),
            any: Signal::new(),
        }
    }

    /// Listen for one kind of event.
    pub fn connect<F>(&self, kind: EventKind, listener: F) -> ConnectionId
    where
        F: Fn(&SheetEvent) + Send + Sync + 'static,
    {
        match self.signals.get(&kind) {
            Some(signal) => signal.connect(listener),
            None => self.any.connect(listener),
        }
    }

    /// Listen for every event.
    pub fn connect_any<F>(&self, listener: F) -> ConnectionId
    where
        F: Fn(&SheetEvent) + Send + Sync + 'static,
    {
        self.any.connect(listener)
    }

    pub fn disconnect(&self, kind: EventKind, id: ConnectionId) -> bool {
        self.signals.get(&kind).is_some_and(|s| s.disconnect(id))
    }

    pub fn disconnect_any(&self, id: ConnectionId) -> bool {
        self.any.disconnect(id)
    }

    /// Number of listeners for `kind`, not counting catch-all listeners.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.signals.get(&kind).map_or(0, Signal::connection_count)
    }

    /// Suppress or resume all emission.
    pub fn set_blocked(&self, blocked: bool) {
        self.any.set_blocked(blocked);
        for signal in self.signals.values() {
            signal.set_blocked(blocked);
        }
    }

    /// Run the listeners for the event's kind, then the catch-all listeners.
    pub fn emit(&self, event: SheetEvent) -> usize {
        let mut invoked = 0;
        if let Some(signal) = self.signals.get(&event.kind()) {
            invoked += signal.emit(event.clone());
        }
        invoked + self.any.emit(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::Arc;

    fn setup() -> (EventRegistry, Arc<Mutex<Vec<EventKind>>>) {
        let events = EventRegistry::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        (events, log)
    }

    #[test]
    fn test_kind_routing() {
        let (events, log) = setup();
        let sink = log.clone();
        events.connect(EventKind::RowsMoved, move |e| sink.lock().push(e.kind()));

        events.emit(SheetEvent::ColumnsMoved(MoveEvent {
            axis: Axis::Column,
            old_to_new: vec![1, 0],
        }));
        assert!(log.lock().is_empty());

        events.emit(SheetEvent::RowsMoved(MoveEvent {
            axis: Axis::Row,
            old_to_new: vec![1, 0],
        }));
        assert_eq!(*log.lock(), vec![EventKind::RowsMoved]);
    }

    #[test]
    fn test_any_listener_sees_everything() {
        let (events, log) = setup();
        let sink = log.clone();
        events.connect_any(move |e| sink.lock().push(e.kind()));
        events.emit(SheetEvent::Undo(EventName::Paste));
        events.emit(SheetEvent::Redo(EventName::Paste));
        assert_eq!(*log.lock(), vec![EventKind::Undo, EventKind::Redo]);
    }

    #[test]
    fn test_blocked_and_disconnect() {
        let (events, log) = setup();
        let sink = log.clone();
        let id = events.connect(EventKind::Undo, move |e| sink.lock().push(e.kind()));
        assert_eq!(events.listener_count(EventKind::Undo), 1);

        events.set_blocked(true);
        assert_eq!(events.emit(SheetEvent::Undo(EventName::Cut)), 0);
        events.set_blocked(false);

        assert!(events.disconnect(EventKind::Undo, id));
        assert_eq!(events.emit(SheetEvent::Undo(EventName::Cut)), 0);
        assert!(log.lock().is_empty());
    }

    #[test]
    fn test_resize_kind_follows_axis() {
        let event = SheetEvent::Resized(ResizeEvent {
            axis: Axis::Column,
            index: 2,
            old: 10.0,
            new: 20.0,
        });
        assert_eq!(event.kind(), EventKind::ColumnsResized);
    }
}
