//! Sheet configuration.
//!
//! [`SheetOptions`] is the single structured options object. The sheet owns
//! it and every component reads it through the sheet on each operation, so a
//! change made through `Sheet::options_mut` takes effect on the next call
//! without rebuilding anything.
//!
//! All fields have defaults, so a partial JSON document is enough:
//!
//! ```
//! use horizon_sheet::SheetOptions;
//!
//! let options = SheetOptions::from_json_str(r#"{ "default_row_height": 30.0 }"#).unwrap();
//! assert_eq!(options.default_row_height, 30.0);
//! assert_eq!(options.max_undos, SheetOptions::default().max_undos);
//! ```

use horizon_sheet_core::Color;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Font weight and slant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    #[default]
    Normal,
    Bold,
    Italic,
    BoldItalic,
}

/// A font triple: family, point size and style.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    pub size: u16,
    #[serde(default)]
    pub style: FontStyle,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: u16, style: FontStyle) -> Self {
        Self {
            family: family.into(),
            size,
            style,
        }
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new("Calibri", 11, FontStyle::Normal)
    }
}

/// How cell text is broken into lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextWrap {
    /// One line per newline in the text, clipped to the cell.
    #[default]
    None,
    /// Break anywhere once the line is full.
    Character,
    /// Break at whitespace, falling back to characters for long words.
    Word,
}

/// Color roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub table_bg: Color,
    pub table_fg: Color,
    pub table_grid: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub header_grid: Color,
    pub index_bg: Color,
    pub index_fg: Color,
    pub index_grid: Color,
    pub selected_cells_bg: Color,
    pub selected_cells_border: Color,
    pub selected_rows_bg: Color,
    pub selected_columns_bg: Color,
    pub header_selected_bg: Color,
    pub index_selected_bg: Color,
    pub current_border: Color,
    pub dropdown_arrow: Color,
    pub checkbox: Color,
    pub fill_handle: Color,
    pub resize_line: Color,
    pub drag_indicator: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            table_bg: Color::WHITE,
            table_fg: Color::BLACK,
            table_grid: Color::from_rgb8(0xE1, 0xE1, 0xE1),
            header_bg: Color::from_rgb8(0xF7, 0xF7, 0xF7),
            header_fg: Color::from_rgb8(0x44, 0x44, 0x44),
            header_grid: Color::from_rgb8(0xCC, 0xCC, 0xCC),
            index_bg: Color::from_rgb8(0xF7, 0xF7, 0xF7),
            index_fg: Color::from_rgb8(0x44, 0x44, 0x44),
            index_grid: Color::from_rgb8(0xCC, 0xCC, 0xCC),
            selected_cells_bg: Color::from_rgba8(0x1A, 0x73, 0xE8, 0x33),
            selected_cells_border: Color::from_rgb8(0x1A, 0x73, 0xE8),
            selected_rows_bg: Color::from_rgba8(0x1A, 0x73, 0xE8, 0x26),
            selected_columns_bg: Color::from_rgba8(0x1A, 0x73, 0xE8, 0x26),
            header_selected_bg: Color::from_rgb8(0xD3, 0xE3, 0xFD),
            index_selected_bg: Color::from_rgb8(0xD3, 0xE3, 0xFD),
            current_border: Color::from_rgb8(0x1A, 0x73, 0xE8),
            dropdown_arrow: Color::from_rgb8(0x60, 0x60, 0x60),
            checkbox: Color::from_rgb8(0x60, 0x60, 0x60),
            fill_handle: Color::from_rgb8(0x1A, 0x73, 0xE8),
            resize_line: Color::BLACK,
            drag_indicator: Color::BLACK,
        }
    }
}

/// Every tunable of a sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetOptions {
    // Sizes
    pub default_row_height: f64,
    pub default_column_width: f64,
    pub min_row_height: f64,
    pub max_row_height: f64,
    pub min_column_width: f64,
    pub max_column_width: f64,
    pub header_height: f64,
    pub index_width: f64,

    // Fonts and colors
    pub table_font: FontSpec,
    pub header_font: FontSpec,
    pub index_font: FontSpec,
    pub palette: Palette,

    // Rendering
    pub table_wrap: TextWrap,
    pub allow_cell_overflow: bool,
    pub show_vertical_grid: bool,
    pub show_horizontal_grid: bool,
    /// Stretch columns to fill the viewport, never below this width.
    pub auto_resize_columns: Option<f64>,
    /// Stretch rows to fill the viewport, never below this height.
    pub auto_resize_rows: Option<f64>,
    /// Delay used to coalesce redraw requests.
    pub redraw_delay_ms: u64,
    /// Horizontal padding inside cells.
    pub cell_padding: f64,

    // Clipboard
    pub delimiter: char,
    pub quote_char: char,
    pub line_terminator: String,
    /// Delimiters tried when sniffing pasted text.
    pub paste_delimiters: Vec<char>,
    pub paste_can_expand_x: bool,
    pub paste_can_expand_y: bool,
    /// Most rows a paste may add; `None` is unlimited.
    pub paste_insert_row_limit: Option<usize>,
    /// Most columns a paste may add; `None` is unlimited.
    pub paste_insert_column_limit: Option<usize>,

    // Editing
    pub max_undos: usize,
    /// Parse typed and pasted text into numbers and booleans when no format applies.
    pub infer_types: bool,
    /// Move the cursor right after Tab commits an edit.
    pub edit_cell_tab: bool,
    /// Move the cursor down after Enter commits an edit.
    pub edit_cell_return: bool,

    // Feature switches
    pub enable_edit: bool,
    pub enable_drag_select: bool,
    pub enable_row_drag_and_drop: bool,
    pub enable_column_drag_and_drop: bool,
    pub enable_column_width_resize: bool,
    pub enable_row_height_resize: bool,
    pub enable_drag_fill: bool,
    pub enable_undo: bool,
    pub enable_copy: bool,
    pub enable_cut: bool,
    pub enable_paste: bool,
    pub enable_delete: bool,
    pub enable_select_all: bool,
}

impl Default for SheetOptions {
    fn default() -> Self {
        Self {
            default_row_height: 22.0,
            default_column_width: 120.0,
            min_row_height: 16.0,
            max_row_height: 1000.0,
            min_column_width: 20.0,
            max_column_width: 2000.0,
            header_height: 24.0,
            index_width: 50.0,

            table_font: FontSpec::default(),
            header_font: FontSpec::default(),
            index_font: FontSpec::default(),
            palette: Palette::default(),

            table_wrap: TextWrap::None,
            allow_cell_overflow: false,
            show_vertical_grid: true,
            show_horizontal_grid: true,
            auto_resize_columns: None,
            auto_resize_rows: None,
            redraw_delay_ms: 16,
            cell_padding: 4.0,

            delimiter: '\t',
            quote_char: '"',
            line_terminator: "\n".to_string(),
            paste_delimiters: vec!['\t', ','],
            paste_can_expand_x: true,
            paste_can_expand_y: true,
            paste_insert_row_limit: None,
            paste_insert_column_limit: None,

            max_undos: 40,
            infer_types: true,
            edit_cell_tab: true,
            edit_cell_return: true,

            enable_edit: true,
            enable_drag_select: true,
            enable_row_drag_and_drop: true,
            enable_column_drag_and_drop: true,
            enable_column_width_resize: true,
            enable_row_height_resize: true,
            enable_drag_fill: true,
            enable_undo: true,
            enable_copy: true,
            enable_cut: true,
            enable_paste: true,
            enable_delete: true,
            enable_select_all: true,
        }
    }
}

impl SheetOptions {
    /// Parse options from JSON; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize all options as pretty JSON.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Clamp a requested row height to the configured limits.
    pub fn clamp_row_height(&self, height: f64) -> f64 {
        height.clamp(self.min_row_height, self.max_row_height.max(self.min_row_height))
    }

    /// Clamp a requested column width to the configured limits.
    pub fn clamp_column_width(&self, width: f64) -> f64 {
        width.clamp(self.min_column_width, self.max_column_width.max(self.min_column_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_round_trip() {
        let mut options = SheetOptions::default();
        options.delimiter = ',';
        options.paste_insert_row_limit = Some(50);
        options.palette.table_bg = Color::from_rgb8(1, 2, 3);
        options.table_wrap = TextWrap::Word;

        let json = options.to_json_string().unwrap();
        let parsed = SheetOptions::from_json_str(&json).unwrap();
        assert_eq!(parsed, options);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let parsed = SheetOptions::from_json_str(
            r#"{ "table_font": { "family": "Arial", "size": 9 }, "enable_undo": false }"#,
        )
        .unwrap();
        assert_eq!(parsed.table_font, FontSpec::new("Arial", 9, FontStyle::Normal));
        assert!(!parsed.enable_undo);
        assert_eq!(parsed.delimiter, '\t');
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = SheetOptions::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, crate::SheetError::Config(_)));
    }

    #[test]
    fn test_clamps() {
        let options = SheetOptions::default();
        assert_eq!(options.clamp_column_width(1.0), options.min_column_width);
        assert_eq!(options.clamp_row_height(5000.0), options.max_row_height);
    }
}
