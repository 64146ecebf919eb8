//! Error types for the sheet widget.

/// Result type alias for sheet operations.
pub type Result<T> = std::result::Result<T, SheetError>;

/// Errors that can occur in sheet operations.
///
/// Interactive write paths (editing, pasting, dragging) never surface these;
/// they recover locally and become no-ops. Read paths and programmatic
/// configuration return them to the caller.
#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    /// A data row index beyond the grid.
    #[error("Row {row} is out of bounds (total rows: {total})")]
    RowOutOfBounds { row: usize, total: usize },

    /// A data column index beyond the grid.
    #[error("Column {column} is out of bounds (total columns: {total})")]
    ColumnOutOfBounds { column: usize, total: usize },

    /// A cell whose row exists but is too short.
    #[error("Cell ({row}, {column}) is out of bounds")]
    CellOutOfBounds { row: usize, column: usize },

    /// A displayed-index list that is not strictly increasing or in range.
    #[error("Invalid display mapping: {0}")]
    InvalidDisplayMapping(String),

    /// No named span with the given name.
    #[error("Named span '{0}' does not exist")]
    SpanNotFound(String),

    /// A named span with the given name already exists.
    #[error("Named span '{0}' already exists")]
    DuplicateSpan(String),

    /// Span coordinates are empty or reversed.
    #[error("Invalid span '{name}': {message}")]
    InvalidSpan { name: String, message: String },

    /// Clipboard access failed.
    #[error("Clipboard error: {0}")]
    Clipboard(#[from] ClipboardError),

    /// Options could not be parsed or serialized.
    #[error("Invalid sheet options: {0}")]
    Config(#[from] serde_json::Error),

    /// A value could not be converted by a cell format.
    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

impl SheetError {
    /// Create an invalid display mapping error.
    pub fn invalid_mapping(message: impl Into<String>) -> Self {
        Self::InvalidDisplayMapping(message.into())
    }

    /// Create an invalid span error.
    pub fn invalid_span(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidSpan {
            name: name.into(),
            message: message.into(),
        }
    }
}

/// Clipboard backend errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClipboardError {
    /// The clipboard could not be opened.
    #[error("Clipboard unavailable: {0}")]
    Unavailable(String),

    /// The clipboard holds no text.
    #[error("Clipboard is empty")]
    Empty,

    /// Clipboard text could not be parsed as delimited data.
    #[error("Failed to parse clipboard text: {0}")]
    Parse(String),

    /// Writing to the clipboard failed.
    #[error("Failed to write clipboard: {0}")]
    Write(String),
}

/// A value that a cell format cannot represent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{input}' is not a valid {expected}")]
pub struct FormatError {
    pub input: String,
    pub expected: &'static str,
}

impl FormatError {
    pub fn new(input: impl Into<String>, expected: &'static str) -> Self {
        Self {
            input: input.into(),
            expected,
        }
    }
}
