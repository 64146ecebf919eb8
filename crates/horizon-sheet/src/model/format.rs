//! Cell formatting and type coercion.
//!
//! A cell's `Format` option decides how stored values are displayed and how
//! typed or pasted text is converted back into values. Two flavors exist:
//!
//! - Built-in coercion ([`FormatKind`]) with locale-style thousands and
//!   decimal separators and an [`InvalidPolicy`] for text that does not parse
//! - A user supplied [`CellFormatter`] that takes over all three boundaries
//!   (display, conversion, comparison)
//!
//! # Example
//!
//! ```
//! use horizon_sheet::model::{FormatKind, FormatSpec, CellFormatter};
//! use horizon_sheet::CellValue;
//!
//! let spec = FormatSpec::new(FormatKind::Float { decimals: Some(2) })
//!     .with_thousands_sep(',');
//!
//! assert_eq!(spec.format(&CellValue::Float(1234.5)), "1,234.50");
//! assert_eq!(spec.unformat("1,234.50").unwrap(), CellValue::Float(1234.5));
//! ```

use std::fmt;
use std::sync::Arc;

use crate::error::FormatError;
use crate::model::cell::{CellValue, parse_bool_like};

/// Converts between stored values and their textual form.
///
/// Implementations must be cheap to call: the renderer formats every visible
/// cell on each redraw.
pub trait CellFormatter: Send + Sync + fmt::Debug {
    /// Text shown for `value`.
    fn format(&self, value: &CellValue) -> String;

    /// Value stored when the user enters `text`.
    fn unformat(&self, text: &str) -> Result<CellValue, FormatError>;

    /// Whether two stored values are the same for change detection.
    fn values_equal(&self, a: &CellValue, b: &CellValue) -> bool {
        a == b
    }
}

/// Built-in value kinds.
#[derive(Debug, Clone, PartialEq)]
pub enum FormatKind {
    /// Whole numbers.
    Int,
    /// Floating point, optionally with a fixed number of decimals.
    Float { decimals: Option<usize> },
    /// Fractions shown multiplied by 100 with a `%` suffix.
    Percent { decimals: Option<usize> },
    /// Booleans shown as `True`/`False`.
    Bool,
    /// Text, stored as entered.
    Text,
}

impl FormatKind {
    fn name(&self) -> &'static str {
        match self {
            Self::Int => "integer",
            Self::Float { .. } => "number",
            Self::Percent { .. } => "percentage",
            Self::Bool => "boolean",
            Self::Text => "text",
        }
    }
}

/// What happens to text that does not convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidPolicy {
    /// Store the text as-is and display it unchanged.
    KeepText,
    /// Store the text as-is but display the sentinel instead.
    Sentinel(String),
    /// Refuse the input; the cell keeps its previous value.
    Reject,
}

impl Default for InvalidPolicy {
    fn default() -> Self {
        Self::Sentinel("NaN".to_string())
    }
}

/// Parameters of a `Format` cell option.
#[derive(Clone)]
pub struct FormatSpec {
    pub kind: FormatKind,
    pub thousands_sep: Option<char>,
    pub decimal_sep: char,
    /// Whether empty input stores `Empty` rather than being invalid.
    pub nullable: bool,
    pub invalid: InvalidPolicy,
    /// Replaces the built-in behavior entirely when present.
    pub custom: Option<Arc<dyn CellFormatter>>,
}

impl fmt::Debug for FormatSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FormatSpec")
            .field("kind", &self.kind)
            .field("thousands_sep", &self.thousands_sep)
            .field("decimal_sep", &self.decimal_sep)
            .field("nullable", &self.nullable)
            .field("invalid", &self.invalid)
            .field("custom", &self.custom)
            .finish()
    }
}

impl PartialEq for FormatSpec {
    fn eq(&self, other: &Self) -> bool {
        let custom_eq = match (&self.custom, &other.custom) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        };
        custom_eq
            && self.kind == other.kind
            && self.thousands_sep == other.thousands_sep
            && self.decimal_sep == other.decimal_sep
            && self.nullable == other.nullable
            && self.invalid == other.invalid
    }
}

impl FormatSpec {
    /// A built-in format of `kind` with `.` decimals and no grouping.
    pub fn new(kind: FormatKind) -> Self {
        Self {
            kind,
            thousands_sep: None,
            decimal_sep: '.',
            nullable: true,
            invalid: InvalidPolicy::default(),
            custom: None,
        }
    }

    /// A format delegating to a user formatter.
    pub fn custom(formatter: Arc<dyn CellFormatter>) -> Self {
        Self {
            custom: Some(formatter),
            ..Self::new(FormatKind::Text)
        }
    }

    pub fn with_thousands_sep(mut self, sep: char) -> Self {
        self.thousands_sep = Some(sep);
        self
    }

    pub fn with_decimal_sep(mut self, sep: char) -> Self {
        self.decimal_sep = sep;
        self
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }

    pub fn with_invalid(mut self, policy: InvalidPolicy) -> Self {
        self.invalid = policy;
        self
    }

    /// Convert any value (typed or text) into this format's stored form.
    pub fn coerce(&self, value: &CellValue) -> Result<CellValue, FormatError> {
        if let Some(custom) = &self.custom {
            return custom.unformat(&value.to_string());
        }
        match (&self.kind, value) {
            (_, CellValue::Text(text)) => self.unformat(text),
            (_, CellValue::Empty) => self.unformat(""),
            (FormatKind::Int, CellValue::Int(_)) => Ok(value.clone()),
            (FormatKind::Int, CellValue::Float(f)) if f.fract() == 0.0 => Ok(CellValue::Int(*f as i64)),
            (FormatKind::Float { .. } | FormatKind::Percent { .. }, v) if v.as_f64().is_some() => {
                Ok(CellValue::Float(v.as_f64().unwrap_or_default()))
            }
            (FormatKind::Bool, v) => v
                .bool_like()
                .map(CellValue::Bool)
                .ok_or_else(|| FormatError::new(v.to_string(), self.kind.name())),
            (FormatKind::Text, v) => Ok(CellValue::Text(v.to_string())),
            (_, v) => self.unformat(&v.to_string()),
        }
    }

    fn display_invalid(&self, value: &CellValue) -> String {
        match &self.invalid {
            InvalidPolicy::Sentinel(sentinel) => sentinel.clone(),
            InvalidPolicy::KeepText | InvalidPolicy::Reject => value.to_string(),
        }
    }

    fn format_number(&self, value: f64, decimals: Option<usize>) -> String {
        let text = match decimals {
            Some(d) => format!("{value:.d$}"),
            None => value.to_string(),
        };
        localize_number(&text, self.thousands_sep, self.decimal_sep)
    }

    fn delocalize(&self, text: &str) -> String {
        let mut out: String = text
            .chars()
            .filter(|c| Some(*c) != self.thousands_sep && !c.is_whitespace())
            .collect();
        if self.decimal_sep != '.' {
            out = out.replace(self.decimal_sep, ".");
        }
        out
    }

    fn invalid_input(&self, text: &str) -> Result<CellValue, FormatError> {
        match self.invalid {
            InvalidPolicy::Reject => Err(FormatError::new(text, self.kind.name())),
            InvalidPolicy::KeepText | InvalidPolicy::Sentinel(_) => Ok(CellValue::Text(text.to_string())),
        }
    }
}

impl CellFormatter for FormatSpec {
    fn format(&self, value: &CellValue) -> String {
        if let Some(custom) = &self.custom {
            return custom.format(value);
        }
        if value.is_empty() {
            return String::new();
        }
        match &self.kind {
            FormatKind::Int => match value {
                CellValue::Int(i) => localize_number(&i.to_string(), self.thousands_sep, self.decimal_sep),
                CellValue::Float(f) if f.fract() == 0.0 => self.format_number(*f, Some(0)),
                other => self.display_invalid(other),
            },
            FormatKind::Float { decimals } => match value.as_f64() {
                Some(f) => self.format_number(f, *decimals),
                None => self.display_invalid(value),
            },
            FormatKind::Percent { decimals } => match value.as_f64() {
                Some(f) => format!("{}%", self.format_number(f * 100.0, *decimals)),
                None => self.display_invalid(value),
            },
            FormatKind::Bool => match value.bool_like() {
                Some(b) => CellValue::Bool(b).to_string(),
                None => self.display_invalid(value),
            },
            FormatKind::Text => value.to_string(),
        }
    }

    fn unformat(&self, text: &str) -> Result<CellValue, FormatError> {
        if let Some(custom) = &self.custom {
            return custom.unformat(text);
        }
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return if self.nullable {
                Ok(CellValue::Empty)
            } else {
                self.invalid_input(text)
            };
        }
        match &self.kind {
            FormatKind::Int => {
                let plain = self.delocalize(trimmed);
                if let Ok(i) = plain.parse::<i64>() {
                    return Ok(CellValue::Int(i));
                }
                match plain.parse::<f64>() {
                    Ok(f) if f.fract() == 0.0 && f.is_finite() => Ok(CellValue::Int(f as i64)),
                    _ => self.invalid_input(text),
                }
            }
            FormatKind::Float { .. } => match self.delocalize(trimmed).parse::<f64>() {
                Ok(f) => Ok(CellValue::Float(f)),
                Err(_) => self.invalid_input(text),
            },
            FormatKind::Percent { .. } => {
                let plain = self.delocalize(trimmed);
                let (number, scaled) = match plain.strip_suffix('%') {
                    Some(number) => (number.to_string(), true),
                    None => (plain, false),
                };
                match number.parse::<f64>() {
                    Ok(f) if scaled => Ok(CellValue::Float(f / 100.0)),
                    Ok(f) => Ok(CellValue::Float(f)),
                    Err(_) => self.invalid_input(text),
                }
            }
            FormatKind::Bool => match parse_bool_like(trimmed) {
                Some(b) => Ok(CellValue::Bool(b)),
                None => self.invalid_input(text),
            },
            FormatKind::Text => Ok(CellValue::Text(text.to_string())),
        }
    }

    fn values_equal(&self, a: &CellValue, b: &CellValue) -> bool {
        match &self.custom {
            Some(custom) => custom.values_equal(a, b),
            None => match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => x == y,
                _ => a == b,
            },
        }
    }
}

/// Insert thousands separators and swap the decimal point in a plain number.
pub fn localize_number(text: &str, thousands_sep: Option<char>, decimal_sep: char) -> String {
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut out = String::with_capacity(text.len() + int_part.len() / 3);
    out.push_str(sign);
    match thousands_sep {
        Some(sep) if int_part.chars().all(|c| c.is_ascii_digit()) => {
            let len = int_part.len();
            for (i, ch) in int_part.chars().enumerate() {
                if i > 0 && (len - i) % 3 == 0 {
                    out.push(sep);
                }
                out.push(ch);
            }
        }
        _ => out.push_str(int_part),
    }
    if let Some(frac) = frac_part {
        out.push(decimal_sep);
        out.push_str(frac);
    }
    out
}
