//! Interactive side of the sheet.
//!
//! - [`Sheet`]: the facade tying data, layout, options, selection, editing,
//!   history, clipboard and rendering together
//! - [`SelectionManager`]: multi-box selection with a current cell
//! - [`EditController`]: the in-place editor lifecycle
//! - [`ViewportRenderer`]: virtualized redraw into a [`PrimitiveArena`]
//! - [`EventRegistry`]: typed listeners for everything the sheet reports
//! - [`ModeMachine`]: the single active pointer or keyboard interaction
//!
//! Indices here are *displayed* indices unless a name says otherwise; the
//! [`Sheet`] translates to data indices through the axis layouts.

pub mod arena;
pub mod clipboard;
pub mod editor;
pub mod events;
pub mod mode;
pub mod selection;
mod sheet;
pub mod text;
pub mod viewport;

pub use arena::{FrameStats, Pane, Primitive, PrimitiveArena, PrimitiveId, PrimitiveKind, PrimitiveStyle};
#[cfg(feature = "system-clipboard")]
pub use clipboard::SystemClipboard;
pub use clipboard::{ClipboardBackend, ClipboardFormat, MemoryClipboard, decode_block, encode_block};
pub use editor::{
    CloseKey, EditController, EditRequest, EditSession, EditTarget, EditValidator, EditorState, Validation,
};
pub use events::{
    CellChange, CopyEvent, EditorEvent, EditorKind, EventKind, EventRegistry, LabelChange, ModifiedEvent, MoveEvent,
    RedrawEvent, ResizeEvent, SelectionEvent, SheetEvent, StructureEvent, VisibilityEvent,
};
pub use mode::{InteractionMode, ModeMachine};
pub use selection::{BoxId, CurrentCell, Deselect, GridBounds, SelectionBox, SelectionManager};
pub use sheet::{Modifiers, Sheet, SheetKey};
pub use text::{CharWidthCache, FixedMetrics, TextMeasure};
pub use viewport::{GridView, RedrawStatus, Viewport, ViewportRenderer, column_letters};
