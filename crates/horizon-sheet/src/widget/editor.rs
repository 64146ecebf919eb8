//! In-place cell editing.
//!
//! The [`EditController`] tracks one editor session through
//! `Closed -> Opening -> Open -> Closing -> Closed`. The sheet drives the
//! transitions and emits events while a session is `Opening` or `Closing`;
//! no other editor can open during those windows, so a listener that reacts
//! to a commit by opening another editor is refused instead of re-entering.
//!
//! Converting typed text into a stored value and checking whether a value is
//! acceptable for a cell are free functions here, shared with paste and
//! drag-fill.

use std::fmt;
use std::sync::Arc;

use horizon_sheet_core::logging::targets;

use crate::model::{CellFormatter, CellValue, DropdownSpec, EventName, OptionsRegistry};
use crate::widget::events::EditorKind;

/// Editor lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditorState {
    #[default]
    Closed,
    Opening,
    Open,
    Closing,
}

/// How an editor was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseKey {
    Return,
    Tab,
    FocusOut,
    /// Discard the edit.
    Escape,
}

/// What an edit targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditTarget {
    Table,
    Header,
    Index,
}

/// Outcome of a user validator.
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// Store this value, possibly transformed.
    Accept(CellValue),
    /// Leave the cell untouched; nothing is recorded.
    NoChange,
}

/// A pending write offered to the validator.
#[derive(Debug, Clone, PartialEq)]
pub struct EditRequest {
    /// Data row; for header edits, unused.
    pub row: usize,
    /// Data column; for index edits, unused.
    pub column: usize,
    pub target: EditTarget,
    pub event: EventName,
    /// Text as entered.
    pub text: String,
    /// Value after conversion.
    pub value: CellValue,
    pub key: Option<CloseKey>,
}

/// User hook that may transform or veto a write.
pub type EditValidator = Arc<dyn Fn(&EditRequest) -> Validation + Send + Sync>;

/// Dropdown popup state.
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownState {
    pub spec: DropdownSpec,
    /// Indices into `spec.values` currently listed.
    pub visible: Vec<usize>,
    /// Position in `visible` of the highlighted row.
    pub highlighted: Option<usize>,
}

impl DropdownState {
    pub fn new(spec: DropdownSpec) -> Self {
        let visible: Vec<usize> = (0..spec.values.len()).collect();
        Self {
            spec,
            visible,
            highlighted: None,
        }
    }

    /// Re-filter the listed values for `text`.
    pub fn filter(&mut self, text: &str) {
        self.visible = self.spec.search(text);
        self.highlighted = if text.is_empty() || self.visible.is_empty() {
            None
        } else {
            Some(0)
        };
    }

    pub fn highlighted_value(&self) -> Option<&CellValue> {
        let index = *self.visible.get(self.highlighted?)?;
        self.spec.values.get(index)
    }
}

/// One open editor.
#[derive(Debug, Clone, PartialEq)]
pub struct EditSession {
    /// Displayed row, or the header row for header edits.
    pub row: usize,
    /// Displayed column, or the index column for index edits.
    pub column: usize,
    pub target: EditTarget,
    pub kind: EditorKind,
    pub text: String,
    pub original: String,
    pub dropdown: Option<DropdownState>,
}

impl EditSession {
    pub fn text(row: usize, column: usize, target: EditTarget, initial: impl Into<String>) -> Self {
        let initial = initial.into();
        Self {
            row,
            column,
            target,
            kind: EditorKind::Text,
            text: initial.clone(),
            original: initial,
            dropdown: None,
        }
    }

    pub fn dropdown(row: usize, column: usize, target: EditTarget, initial: impl Into<String>, spec: DropdownSpec) -> Self {
        Self {
            kind: EditorKind::Dropdown,
            dropdown: Some(DropdownState::new(spec)),
            ..Self::text(row, column, target, initial)
        }
    }

    /// Whether the session accepts typed text.
    pub fn is_editable(&self) -> bool {
        self.dropdown.as_ref().is_none_or(|d| d.spec.editable)
    }

    /// Best dropdown match for the typed text, when it extends the text.
    pub fn completion(&self) -> Option<String> {
        let candidate = self.dropdown.as_ref()?.highlighted_value()?.to_string();
        candidate
            .to_lowercase()
            .starts_with(&self.text.to_lowercase())
            .then_some(candidate)
    }
}

/// A session handed back when it starts closing.
#[derive(Debug, Clone, PartialEq)]
pub struct ClosingEdit {
    pub session: EditSession,
    pub key: CloseKey,
    /// Final text to commit; `None` when the edit is discarded.
    pub text: Option<String>,
}

/// Editor state machine.
#[derive(Default)]
pub struct EditController {
    state: EditorState,
    session: Option<EditSession>,
    validator: Option<EditValidator>,
}

impl fmt::Debug for EditController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditController")
            .field("state", &self.state)
            .field("session", &self.session)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> EditorState {
        self.state
    }

    /// Whether an editor is shown or about to be.
    pub fn is_open(&self) -> bool {
        matches!(self.state, EditorState::Opening | EditorState::Open)
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn set_validator(&mut self, validator: Option<EditValidator>) {
        self.validator = validator;
    }

    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }

    /// Run the user validator; without one every request is accepted as is.
    pub fn validate(&self, request: &EditRequest) -> Validation {
        match &self.validator {
            Some(validator) => validator(request),
            None => Validation::Accept(request.value.clone()),
        }
    }

    /// Start opening a session.
    ///
    /// Refused while a session is closing, or while one is open unless
    /// `force` is set, in which case the open session is discarded.
    pub fn begin_open(&mut self, session: EditSession, force: bool) -> bool {
        match self.state {
            EditorState::Closed => {}
            EditorState::Open | EditorState::Opening if force => {
                tracing::debug!(target: targets::EDIT, "discarding open editor");
            }
            _ => return false,
        }
        tracing::debug!(
            target: targets::EDIT,
            row = session.row,
            column = session.column,
            kind = ?session.kind,
            "opening editor"
        );
        self.session = Some(session);
        self.state = EditorState::Opening;
        true
    }

    pub fn finish_open(&mut self) {
        if self.state == EditorState::Opening {
            self.state = EditorState::Open;
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.text.as_str())
    }

    /// Replace the editor text, re-filtering an editable dropdown.
    pub fn set_text(&mut self, text: impl Into<String>) -> bool {
        if self.state != EditorState::Open {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        if !session.is_editable() {
            return false;
        }
        session.text = text.into();
        if let Some(dropdown) = session.dropdown.as_mut() {
            dropdown.filter(&session.text);
        }
        true
    }

    /// Move the dropdown highlight by `delta` rows, clamped to the list.
    pub fn move_highlight(&mut self, delta: isize) -> bool {
        let Some(dropdown) = self.session.as_mut().and_then(|s| s.dropdown.as_mut()) else {
            return false;
        };
        if dropdown.visible.is_empty() {
            return false;
        }
        let last = dropdown.visible.len() - 1;
        let next = match dropdown.highlighted {
            None => 0,
            Some(h) => h.saturating_add_signed(delta).min(last),
        };
        let changed = dropdown.highlighted != Some(next);
        dropdown.highlighted = Some(next);
        changed
    }

    /// Pick a listed dropdown row; the editor text becomes its value.
    pub fn choose(&mut self, position: usize) -> bool {
        let Some(session) = self.session.as_mut() else {
            return false;
        };
        let Some(dropdown) = session.dropdown.as_mut() else {
            return false;
        };
        let Some(value) = dropdown
            .visible
            .get(position)
            .and_then(|&i| dropdown.spec.values.get(i))
        else {
            return false;
        };
        session.text = value.to_string();
        dropdown.highlighted = Some(position);
        true
    }

    /// Start closing the open session.
    ///
    /// Escape discards. Return takes the dropdown completion when there is
    /// one. Returns `None` when no session is open.
    pub fn begin_close(&mut self, key: CloseKey) -> Option<ClosingEdit> {
        if !self.is_open() {
            return None;
        }
        let session = self.session.take()?;
        self.state = EditorState::Closing;
        let text = match key {
            CloseKey::Escape => None,
            CloseKey::Return => Some(session.completion().unwrap_or_else(|| session.text.clone())),
            CloseKey::Tab | CloseKey::FocusOut => Some(session.text.clone()),
        };
        tracing::debug!(target: targets::EDIT, ?key, discarded = text.is_none(), "closing editor");
        Some(ClosingEdit { session, key, text })
    }

    pub fn finish_close(&mut self) {
        if self.state == EditorState::Closing {
            self.state = EditorState::Closed;
        }
    }
}

/// Convert typed or pasted text into a candidate value for a cell.
///
/// Returns `None` for readonly cells and for text a rejecting format cannot
/// parse. Dropdown membership and checkbox coercion are left to
/// [`accept_value`], which runs on whatever the validator returns.
pub fn convert_input(
    options: &OptionsRegistry,
    row: usize,
    column: usize,
    text: &str,
    infer_types: bool,
) -> Option<CellValue> {
    if options.is_readonly(row, column) {
        return None;
    }
    if let Some(listed) = options
        .dropdown(row, column)
        .and_then(|spec| spec.values.iter().find(|v| v.to_string() == text))
    {
        return Some(listed.clone());
    }
    match options.format(row, column) {
        Some(format) => format.unformat(text).ok(),
        None if infer_types => Some(CellValue::infer(text)),
        None if text.is_empty() => Some(CellValue::Empty),
        None => Some(CellValue::Text(text.to_string())),
    }
}

/// Coerce an already typed value into what a cell stores, or `None` when the
/// cell refuses it.
pub fn accept_value(options: &OptionsRegistry, row: usize, column: usize, value: &CellValue) -> Option<CellValue> {
    if options.is_readonly(row, column) {
        return None;
    }
    if let Some(spec) = options.dropdown(row, column)
        && spec.validate_input
        && !spec.values.iter().any(|v| v == value || v.to_string() == value.to_string())
    {
        return None;
    }
    if options.checkbox(row, column).is_some() {
        return value.bool_like().map(CellValue::Bool);
    }
    match options.format(row, column) {
        Some(format) => format.coerce(value).ok(),
        None => Some(value.clone()),
    }
}

/// Whether `value` may be stored at the cell as it stands.
pub fn is_valid_input(options: &OptionsRegistry, row: usize, column: usize, value: &CellValue) -> bool {
    if options.is_readonly(row, column) {
        return false;
    }
    if let Some(spec) = options.dropdown(row, column)
        && spec.validate_input
        && !spec.values.contains(value)
    {
        return false;
    }
    if options.checkbox(row, column).is_some() && value.bool_like().is_none() {
        return false;
    }
    true
}

/// New value of a checkbox cell after a click.
///
/// Booleans flip; anything else counts as unchecked and becomes checked.
pub fn toggle_checkbox(value: &CellValue) -> CellValue {
    CellValue::Bool(!value.as_bool().unwrap_or(false))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CellOption, CheckboxSpec, FormatKind, FormatSpec, InvalidPolicy, OptionTarget};

    fn setup() -> OptionsRegistry {
        let mut options = OptionsRegistry::new();
        options.set(
            OptionTarget::Column(0),
            CellOption::Dropdown(DropdownSpec::new(vec!["red".into(), "green".into(), "blue".into()])),
        );
        options.set(OptionTarget::Column(1), CellOption::Checkbox(CheckboxSpec::new("done")));
        options.set(
            OptionTarget::Column(2),
            CellOption::Format(
                FormatSpec::new(FormatKind::Int)
                    .with_thousands_sep(',')
                    .with_invalid(InvalidPolicy::Reject),
            ),
        );
        options.set(OptionTarget::Cell(0, 3), CellOption::Readonly);
        options
    }

    fn dropdown_session() -> EditSession {
        let spec = DropdownSpec::new(vec!["apple".into(), "apricot".into(), "banana".into()]).with_editable(true);
        EditSession::dropdown(0, 0, EditTarget::Table, "", spec)
    }

    #[test]
    fn test_state_machine() {
        let mut editor = EditController::new();
        assert!(editor.begin_open(EditSession::text(1, 1, EditTarget::Table, "x"), false));
        assert_eq!(editor.state(), EditorState::Opening);
        assert!(!editor.begin_open(EditSession::text(2, 2, EditTarget::Table, "y"), false));
        editor.finish_open();
        assert_eq!(editor.state(), EditorState::Open);

        assert!(editor.set_text("hello"));
        let closing = editor.begin_close(CloseKey::Tab).unwrap();
        assert_eq!(closing.text.as_deref(), Some("hello"));
        assert_eq!(editor.state(), EditorState::Closing);

        // Nothing may open while closing, even forced.
        assert!(!editor.begin_open(EditSession::text(0, 0, EditTarget::Table, ""), true));
        editor.finish_close();
        assert_eq!(editor.state(), EditorState::Closed);
        assert!(editor.begin_close(CloseKey::Return).is_none());
    }

    #[test]
    fn test_escape_discards() {
        let mut editor = EditController::new();
        editor.begin_open(EditSession::text(0, 0, EditTarget::Table, "old"), false);
        editor.finish_open();
        editor.set_text("new");
        assert_eq!(editor.begin_close(CloseKey::Escape).unwrap().text, None);
    }

    #[test]
    fn test_force_replaces_open_session() {
        let mut editor = EditController::new();
        editor.begin_open(EditSession::text(0, 0, EditTarget::Table, ""), false);
        editor.finish_open();
        assert!(editor.begin_open(EditSession::text(4, 4, EditTarget::Table, ""), true));
        assert_eq!(editor.session().unwrap().row, 4);
    }

    #[test]
    fn test_dropdown_filter_and_completion() {
        let mut editor = EditController::new();
        editor.begin_open(dropdown_session(), false);
        editor.finish_open();

        editor.set_text("ap");
        let session = editor.session().unwrap();
        assert_eq!(session.dropdown.as_ref().unwrap().visible, vec![0, 1]);
        assert_eq!(session.completion().as_deref(), Some("apple"));

        assert!(editor.move_highlight(1));
        assert!(!editor.move_highlight(1));
        let closing = editor.begin_close(CloseKey::Return).unwrap();
        assert_eq!(closing.text.as_deref(), Some("apricot"));
    }

    #[test]
    fn test_dropdown_choose() {
        let mut editor = EditController::new();
        editor.begin_open(dropdown_session(), false);
        editor.finish_open();
        assert!(editor.choose(2));
        assert_eq!(editor.text(), Some("banana"));
        assert!(!editor.choose(9));
    }

    #[test]
    fn test_validator_may_veto() {
        let mut editor = EditController::new();
        editor.set_validator(Some(Arc::new(|request: &EditRequest| {
            if request.text == "no" {
                Validation::NoChange
            } else {
                Validation::Accept(CellValue::Text(request.text.to_uppercase()))
            }
        })));
        let mut request = EditRequest {
            row: 0,
            column: 0,
            target: EditTarget::Table,
            event: EventName::EditTable,
            text: "yes".to_string(),
            value: CellValue::from("yes"),
            key: Some(CloseKey::Return),
        };
        assert_eq!(editor.validate(&request), Validation::Accept(CellValue::from("YES")));
        request.text = "no".to_string();
        assert_eq!(editor.validate(&request), Validation::NoChange);
    }

    #[test]
    fn test_convert_input() {
        let options = setup();
        assert_eq!(convert_input(&options, 0, 0, "green", true), Some(CellValue::from("green")));
        assert_eq!(convert_input(&options, 0, 0, "purple", true), Some(CellValue::from("purple")));
        assert_eq!(accept_value(&options, 0, 0, &CellValue::from("purple")), None);
        let checked = convert_input(&options, 0, 1, "yes", true).unwrap();
        assert_eq!(accept_value(&options, 0, 1, &checked), Some(CellValue::Bool(true)));
        let unclear = convert_input(&options, 0, 1, "maybe", true).unwrap();
        assert_eq!(accept_value(&options, 0, 1, &unclear), None);
        assert_eq!(convert_input(&options, 0, 2, "1,200", true), Some(CellValue::Int(1200)));
        assert_eq!(convert_input(&options, 0, 2, "abc", true), None);
        assert_eq!(convert_input(&options, 0, 3, "x", true), None);
        assert_eq!(convert_input(&options, 0, 4, "12", true), Some(CellValue::Int(12)));
        assert_eq!(convert_input(&options, 0, 4, "12", false), Some(CellValue::from("12")));
    }

    #[test]
    fn test_accept_and_validity() {
        let options = setup();
        assert!(is_valid_input(&options, 5, 0, &CellValue::from("red")));
        assert!(!is_valid_input(&options, 5, 0, &CellValue::from("pink")));
        assert!(!is_valid_input(&options, 0, 3, &CellValue::Int(1)));
        assert_eq!(accept_value(&options, 1, 1, &CellValue::Int(0)), Some(CellValue::Bool(false)));
        assert_eq!(accept_value(&options, 1, 2, &CellValue::Float(3.0)), Some(CellValue::Int(3)));
    }

    #[test]
    fn test_toggle_checkbox() {
        assert_eq!(toggle_checkbox(&CellValue::Bool(true)), CellValue::Bool(false));
        assert_eq!(toggle_checkbox(&CellValue::Empty), CellValue::Bool(true));
        assert_eq!(toggle_checkbox(&CellValue::from("x")), CellValue::Bool(true));
    }
}
