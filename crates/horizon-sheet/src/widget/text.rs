//! Text measurement and wrapping for cell contents.
//!
//! Font metrics come from the host through [`TextMeasure`]. Widths are
//! requested per grapheme and cached per font, so measuring a column of
//! similar values costs a hash lookup per grapheme after the first row.

use std::collections::HashMap;

use unicode_segmentation::UnicodeSegmentation;

use crate::config::{FontSpec, FontStyle, TextWrap};

/// Font metrics supplied by the host toolkit.
pub trait TextMeasure: Send + Sync {
    /// Advance width of one grapheme cluster.
    fn grapheme_width(&self, font: &FontSpec, grapheme: &str) -> f64;

    /// Distance between baselines of consecutive lines.
    fn line_height(&self, font: &FontSpec) -> f64;
}

/// Monospace-like metrics derived from the point size alone.
///
/// Used when the host has no font backend, and by tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedMetrics {
    /// Grapheme width as a multiple of the point size.
    pub width_ratio: f64,
    /// Line height as a multiple of the point size.
    pub height_ratio: f64,
}

impl Default for FixedMetrics {
    fn default() -> Self {
        Self {
            width_ratio: 0.6,
            height_ratio: 1.5,
        }
    }
}

impl TextMeasure for FixedMetrics {
    fn grapheme_width(&self, font: &FontSpec, grapheme: &str) -> f64 {
        let bold = matches!(font.style, FontStyle::Bold | FontStyle::BoldItalic);
        let base = f64::from(font.size) * self.width_ratio;
        // Wide scripts take two cells.
        let wide = grapheme.chars().next().is_some_and(|c| {
            matches!(c as u32, 0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF | 0xFF00..=0xFF60)
        });
        let width = if wide { base * 2.0 } else { base };
        if bold { (width * 1.1).round() } else { width.round() }
    }

    fn line_height(&self, font: &FontSpec) -> f64 {
        (f64::from(font.size) * self.height_ratio).round()
    }
}

/// Cache hit statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
}

/// Per-font grapheme width cache in front of a [`TextMeasure`].
pub struct CharWidthCache {
    measure: Box<dyn TextMeasure>,
    widths: HashMap<FontSpec, HashMap<String, f64>>,
    stats: CacheStats,
}

impl std::fmt::Debug for CharWidthCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CharWidthCache")
            .field("fonts", &self.widths.len())
            .field("stats", &self.stats)
            .finish()
    }
}

impl Default for CharWidthCache {
    fn default() -> Self {
        Self::new(Box::new(FixedMetrics::default()))
    }
}

impl CharWidthCache {
    pub fn new(measure: Box<dyn TextMeasure>) -> Self {
        Self {
            measure,
            widths: HashMap::new(),
            stats: CacheStats::default(),
        }
    }

    /// Swap the metrics backend; cached widths are dropped.
    pub fn set_measure(&mut self, measure: Box<dyn TextMeasure>) {
        self.measure = measure;
        self.widths.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn grapheme_width(&mut self, font: &FontSpec, grapheme: &str) -> f64 {
        if let Some(&width) = self.widths.get(font).and_then(|m| m.get(grapheme)) {
            self.stats.hits += 1;
            return width;
        }
        self.stats.misses += 1;
        let width = self.measure.grapheme_width(font, grapheme);
        self.widths
            .entry(font.clone())
            .or_default()
            .insert(grapheme.to_string(), width);
        width
    }

    /// Width of a single line of text.
    pub fn text_width(&mut self, font: &FontSpec, text: &str) -> f64 {
        text.graphemes(true).map(|g| self.grapheme_width(font, g)).sum()
    }

    pub fn line_height(&self, font: &FontSpec) -> f64 {
        self.measure.line_height(font)
    }

    /// Break `text` into lines no wider than `max_width`.
    ///
    /// Newlines always break. With [`TextWrap::None`] lines are truncated to
    /// what fits. An empty result means nothing fits.
    pub fn wrap(&mut self, font: &FontSpec, text: &str, max_width: f64, mode: TextWrap) -> Vec<String> {
        let mut lines = Vec::new();
        for raw in text.split('\n') {
            let raw = raw.strip_suffix('\r').unwrap_or(raw);
            match mode {
                TextWrap::None => {
                    let fitted = self.truncate(font, raw, max_width);
                    if !fitted.is_empty() || raw.is_empty() {
                        lines.push(fitted);
                    }
                }
                TextWrap::Character => self.wrap_characters(font, raw, max_width, &mut lines),
                TextWrap::Word => self.wrap_words(font, raw, max_width, &mut lines),
            }
        }
        lines
    }

    /// Longest prefix of `text` that fits in `max_width`.
    pub fn truncate(&mut self, font: &FontSpec, text: &str, max_width: f64) -> String {
        let mut width = 0.0;
        let mut out = String::new();
        for g in text.graphemes(true) {
            width += self.grapheme_width(font, g);
            if width > max_width {
                break;
            }
            out.push_str(g);
        }
        out
    }

    fn wrap_characters(&mut self, font: &FontSpec, text: &str, max_width: f64, lines: &mut Vec<String>) {
        let mut line = String::new();
        let mut width = 0.0;
        for g in text.graphemes(true) {
            let w = self.grapheme_width(font, g);
            if width + w > max_width && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                width = 0.0;
            }
            if w > max_width {
                // A single grapheme wider than the cell cannot be placed.
                continue;
            }
            line.push_str(g);
            width += w;
        }
        if !line.is_empty() || text.is_empty() {
            lines.push(line);
        }
    }

    fn wrap_words(&mut self, font: &FontSpec, text: &str, max_width: f64, lines: &mut Vec<String>) {
        let mut line = String::new();
        let mut width = 0.0;
        for word in text.split_word_bounds() {
            let w = self.text_width(font, word);
            if width + w <= max_width {
                line.push_str(word);
                width += w;
                continue;
            }
            if !line.trim_end().is_empty() {
                lines.push(line.trim_end().to_string());
            }
            line.clear();
            width = 0.0;
            if word.trim().is_empty() {
                continue;
            }
            if w <= max_width {
                line.push_str(word);
                width = w;
            } else {
                // Long word: fall back to character breaks.
                let mut pieces = Vec::new();
                self.wrap_characters(font, word, max_width, &mut pieces);
                if let Some(last) = pieces.pop() {
                    lines.extend(pieces);
                    width = self.text_width(font, &last);
                    line = last;
                }
            }
        }
        if !line.trim_end().is_empty() || text.is_empty() {
            lines.push(line.trim_end().to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CharWidthCache, FontSpec) {
        // Size 10 at ratio 0.6 gives 6px per grapheme.
        (CharWidthCache::default(), FontSpec::new("Mono", 10, FontStyle::Normal))
    }

    #[test]
    fn test_width_is_cached() {
        let (mut cache, font) = setup();
        assert_eq!(cache.text_width(&font, "aaa"), 18.0);
        assert_eq!(cache.stats(), CacheStats { hits: 2, misses: 1 });
    }

    #[test]
    fn test_cache_is_per_font() {
        let (mut cache, font) = setup();
        let big = FontSpec::new("Mono", 20, FontStyle::Normal);
        assert_eq!(cache.grapheme_width(&font, "x"), 6.0);
        assert_eq!(cache.grapheme_width(&big, "x"), 12.0);
        assert_eq!(cache.stats().misses, 2);
    }

    #[test]
    fn test_no_wrap_truncates() {
        let (mut cache, font) = setup();
        assert_eq!(cache.wrap(&font, "abcdef", 25.0, TextWrap::None), vec!["abcd"]);
        assert_eq!(cache.wrap(&font, "ab\ncd", 25.0, TextWrap::None), vec!["ab", "cd"]);
    }

    #[test]
    fn test_character_wrap() {
        let (mut cache, font) = setup();
        assert_eq!(
            cache.wrap(&font, "abcdefg", 18.0, TextWrap::Character),
            vec!["abc", "def", "g"]
        );
    }

    #[test]
    fn test_word_wrap() {
        let (mut cache, font) = setup();
        assert_eq!(
            cache.wrap(&font, "one two three", 30.0, TextWrap::Word),
            vec!["one", "two", "three"]
        );
        assert_eq!(
            cache.wrap(&font, "ab cd", 60.0, TextWrap::Word),
            vec!["ab cd"]
        );
    }

    #[test]
    fn test_word_wrap_long_word_falls_back() {
        let (mut cache, font) = setup();
        assert_eq!(
            cache.wrap(&font, "abcdefgh", 30.0, TextWrap::Word),
            vec!["abcde", "fgh"]
        );
    }

    #[test]
    fn test_graphemes_not_split() {
        let (mut cache, font) = setup();
        // "e" plus a combining acute accent is one grapheme.
        let text = "e\u{301}e\u{301}";
        assert_eq!(cache.text_width(&font, text), 12.0);
    }
}
