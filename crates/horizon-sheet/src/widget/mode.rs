//! The pointer and keyboard interaction mode.
//!
//! Exactly one mode is active. Drags and edits start from `Idle` and return to
//! it on release, commit or Escape; the state a drag needs between motion
//! events lives in the mode itself.

use horizon_sheet_core::logging::targets;

use crate::model::{Region, SelectionKind};

/// What the user is doing right now.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum InteractionMode {
    #[default]
    Idle,
    /// Dragging the bottom edge of a row in the index gutter.
    ResizingRow {
        /// Displayed row.
        row: usize,
        /// Pointer position when the drag started.
        anchor_px: f64,
        original: f64,
        current: f64,
    },
    /// Dragging the right edge of a column in the header.
    ResizingColumn {
        /// Displayed column.
        column: usize,
        anchor_px: f64,
        original: f64,
        current: f64,
    },
    /// Marquee selection with the pointer held down.
    DraggingSelection { kind: SelectionKind },
    /// Dragging selected rows to a new position.
    DraggingRowReorder {
        /// Displayed rows being moved, ascending.
        rows: Vec<usize>,
        /// Displayed insertion point.
        target: usize,
    },
    /// Dragging selected columns to a new position.
    DraggingColumnReorder { columns: Vec<usize>, target: usize },
    /// Dragging the fill handle of the current box.
    DragFilling { origin: Region, extended: Region },
    EditingCell,
    DropdownOpen,
}

impl InteractionMode {
    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(
            self,
            Self::ResizingRow { .. }
                | Self::ResizingColumn { .. }
                | Self::DraggingSelection { .. }
                | Self::DraggingRowReorder { .. }
                | Self::DraggingColumnReorder { .. }
                | Self::DragFilling { .. }
        )
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::EditingCell | Self::DropdownOpen)
    }

    fn name(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::ResizingRow { .. } => "resizing_row",
            Self::ResizingColumn { .. } => "resizing_column",
            Self::DraggingSelection { .. } => "dragging_selection",
            Self::DraggingRowReorder { .. } => "dragging_row_reorder",
            Self::DraggingColumnReorder { .. } => "dragging_column_reorder",
            Self::DragFilling { .. } => "drag_filling",
            Self::EditingCell => "editing_cell",
            Self::DropdownOpen => "dropdown_open",
        }
    }
}

/// Holder of the active [`InteractionMode`] enforcing legal transitions.
#[derive(Debug, Default)]
pub struct ModeMachine {
    mode: InteractionMode,
}

impl ModeMachine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &InteractionMode {
        &self.mode
    }

    /// Mutable access for updating drag state on motion.
    pub fn mode_mut(&mut self) -> &mut InteractionMode {
        &mut self.mode
    }

    pub fn is_idle(&self) -> bool {
        self.mode.is_idle()
    }

    /// Whether `next` may start from the current mode.
    ///
    /// Everything starts from `Idle`; a dropdown can open over a text editor
    /// and the editor can come back when it closes.
    pub fn can_enter(&self, next: &InteractionMode) -> bool {
        match (&self.mode, next) {
            (_, InteractionMode::Idle) => true,
            (InteractionMode::Idle, _) => true,
            (InteractionMode::EditingCell, InteractionMode::DropdownOpen) => true,
            (InteractionMode::DropdownOpen, InteractionMode::EditingCell) => true,
            _ => false,
        }
    }

    /// Switch to `next` if the transition is legal.
    pub fn enter(&mut self, next: InteractionMode) -> bool {
        if !self.can_enter(&next) {
            tracing::trace!(
                target: targets::SHEET,
                from = self.mode.name(),
                to = next.name(),
                "mode transition refused"
            );
            return false;
        }
        tracing::trace!(target: targets::SHEET, from = self.mode.name(), to = next.name(), "mode");
        self.mode = next;
        true
    }

    /// Return to `Idle`, handing back the mode that ended.
    pub fn finish(&mut self) -> InteractionMode {
        std::mem::take(&mut self.mode)
    }
}
