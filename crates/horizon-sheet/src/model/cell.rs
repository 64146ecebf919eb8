//! Cell values.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The value stored in one cell of the grid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// No value.
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Whether the cell holds no value or an empty string.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Interpret the value as a boolean the way checkbox input does.
    ///
    /// Accepts booleans, `0`/`1`, and the strings `true`/`false`, `yes`/`no`,
    /// `on`/`off`, `1`/`0` in any case.
    pub fn bool_like(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Int(0) => Some(false),
            Self::Int(1) => Some(true),
            Self::Text(s) => parse_bool_like(s),
            _ => None,
        }
    }

    /// Parse `text` into the value whose display is exactly `text`.
    ///
    /// `"12"` becomes `Int(12)`, `"1.5"` becomes `Float(1.5)`, `"True"` becomes
    /// `Bool(true)`. Anything that would not display back identically, such as
    /// `"007"` or `"1e3"`, stays text. The empty string becomes `Empty`.
    pub fn infer(text: &str) -> Self {
        if text.is_empty() {
            return Self::Empty;
        }
        match text {
            "True" => return Self::Bool(true),
            "False" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>()
            && i.to_string() == text
        {
            return Self::Int(i);
        }
        if let Ok(f) = text.parse::<f64>()
            && f.is_finite()
            && f.to_string() == text
        {
            return Self::Float(f);
        }
        Self::Text(text.to_string())
    }
}

/// Parse the string forms accepted as booleans.
pub fn parse_bool_like(text: &str) -> Option<bool> {
    match text.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" | "y" | "t" => Some(true),
        "false" | "no" | "off" | "0" | "n" | "f" => Some(false),
        _ => None,
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(true) => write!(f, "True"),
            Self::Bool(false) => write!(f, "False"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<i64> for CellValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for CellValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for CellValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Empty, Into::into)
    }
}

/// Build a row of cell values from anything convertible.
///
/// ```
/// use horizon_sheet::{cells, CellValue};
/// let row = cells![1, "a", true];
/// assert_eq!(row[1], CellValue::from("a"));
/// ```
#[macro_export]
macro_rules! cells {
    ($($value:expr),* $(,)?) => {
        vec![$($crate::CellValue::from($value)),*]
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(CellValue::Empty.to_string(), "");
        assert_eq!(CellValue::Bool(true).to_string(), "True");
        assert_eq!(CellValue::Int(-4).to_string(), "-4");
        assert_eq!(CellValue::Float(1.5).to_string(), "1.5");
        assert_eq!(CellValue::from("abc").to_string(), "abc");
    }

    #[test]
    fn test_infer_canonical_only() {
        assert_eq!(CellValue::infer("12"), CellValue::Int(12));
        assert_eq!(CellValue::infer("-3.25"), CellValue::Float(-3.25));
        assert_eq!(CellValue::infer("False"), CellValue::Bool(false));
        assert_eq!(CellValue::infer("007"), CellValue::from("007"));
        assert_eq!(CellValue::infer("1e3"), CellValue::from("1e3"));
        assert_eq!(CellValue::infer("true"), CellValue::from("true"));
        assert_eq!(CellValue::infer(""), CellValue::Empty);
    }

    #[test]
    fn test_infer_round_trips_display() {
        for value in [
            CellValue::Int(42),
            CellValue::Float(0.1),
            CellValue::Bool(true),
            CellValue::from("a b"),
        ] {
            assert_eq!(CellValue::infer(&value.to_string()), value);
        }
    }

    #[test]
    fn test_bool_like() {
        assert_eq!(CellValue::from("Yes").bool_like(), Some(true));
        assert_eq!(CellValue::Int(0).bool_like(), Some(false));
        assert_eq!(CellValue::from("maybe").bool_like(), None);
        assert_eq!(CellValue::Float(1.0).bool_like(), None);
    }

    #[test]
    fn test_cells_macro() {
        let row = cells![1, "x", 2.5, false];
        assert_eq!(
            row,
            vec![
                CellValue::Int(1),
                CellValue::from("x"),
                CellValue::Float(2.5),
                CellValue::Bool(false)
            ]
        );
    }
}
