//! Clipboard backends and the delimited-text interchange format.
//!
//! Copy produces one line per selected row and one field per selected column.
//! A single cell whose text has no line break is copied raw, without quoting.
//! Paste sniffs the delimiter among the configured candidates and pads short
//! rows to the widest row.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SheetOptions;
use crate::error::ClipboardError;

/// Text clipboard used by copy, cut and paste.
pub trait ClipboardBackend: Send {
    fn get_text(&mut self) -> Result<String, ClipboardError>;
    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError>;
}

/// In-process clipboard; clones share the same contents.
#[derive(Debug, Clone, Default)]
pub struct MemoryClipboard {
    contents: Arc<Mutex<Option<String>>>,
}

impl MemoryClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents without going through the trait.
    pub fn contents(&self) -> Option<String> {
        self.contents.lock().clone()
    }
}

impl ClipboardBackend for MemoryClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.contents.lock().clone().ok_or(ClipboardError::Empty)
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock() = Some(text.to_string());
        Ok(())
    }
}

/// The operating system clipboard.
///
/// The platform handle is opened on first use, so constructing one never
/// fails.
#[cfg(feature = "system-clipboard")]
#[derive(Default)]
pub struct SystemClipboard {
    inner: Option<arboard::Clipboard>,
}

#[cfg(feature = "system-clipboard")]
impl std::fmt::Debug for SystemClipboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SystemClipboard")
            .field("open", &self.inner.is_some())
            .finish()
    }
}

#[cfg(feature = "system-clipboard")]
impl SystemClipboard {
    pub fn new() -> Self {
        Self::default()
    }

    fn handle(&mut self) -> Result<&mut arboard::Clipboard, ClipboardError> {
        if self.inner.is_none() {
            let clipboard =
                arboard::Clipboard::new().map_err(|e| ClipboardError::Unavailable(e.to_string()))?;
            self.inner = Some(clipboard);
        }
        self.inner
            .as_mut()
            .ok_or_else(|| ClipboardError::Unavailable("clipboard not open".to_string()))
    }
}

#[cfg(feature = "system-clipboard")]
impl ClipboardBackend for SystemClipboard {
    fn get_text(&mut self) -> Result<String, ClipboardError> {
        self.handle()?.get_text().map_err(|e| match e {
            arboard::Error::ContentNotAvailable => ClipboardError::Empty,
            other => ClipboardError::Unavailable(other.to_string()),
        })
    }

    fn set_text(&mut self, text: &str) -> Result<(), ClipboardError> {
        self.handle()?
            .set_text(text)
            .map_err(|e| ClipboardError::Write(e.to_string()))
    }
}

/// Delimiter, quoting and line settings for clipboard text.
#[derive(Debug, Clone)]
pub struct ClipboardFormat {
    delimiter: u8,
    quote: u8,
    terminator: csv::Terminator,
    candidates: Vec<u8>,
}

impl Default for ClipboardFormat {
    fn default() -> Self {
        Self::new()
    }
}

fn ascii(c: char) -> Option<u8> {
    u8::try_from(c).ok().filter(u8::is_ascii)
}

impl ClipboardFormat {
    /// Tab separated, double-quoted, `\n` terminated.
    pub fn new() -> Self {
        Self {
            delimiter: b'\t',
            quote: b'"',
            terminator: csv::Terminator::Any(b'\n'),
            candidates: vec![b'\t', b','],
        }
    }

    /// Settings taken from the sheet options. Non-ASCII characters fall back
    /// to the defaults.
    pub fn from_options(options: &SheetOptions) -> Self {
        let mut format = Self::new();
        if let Some(d) = ascii(options.delimiter) {
            format.delimiter = d;
        }
        if let Some(q) = ascii(options.quote_char) {
            format.quote = q;
        }
        format.terminator = match options.line_terminator.as_str() {
            "\r\n" => csv::Terminator::CRLF,
            other => match other.chars().next().and_then(ascii) {
                Some(b) => csv::Terminator::Any(b),
                None => csv::Terminator::Any(b'\n'),
            },
        };
        let candidates: Vec<u8> = options.paste_delimiters.iter().copied().filter_map(ascii).collect();
        format.candidates = if candidates.is_empty() {
            vec![format.delimiter]
        } else {
            candidates
        };
        format
    }

    pub fn delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn quote(mut self, quote: u8) -> Self {
        self.quote = quote;
        self
    }

    pub fn terminator(mut self, terminator: csv::Terminator) -> Self {
        self.terminator = terminator;
        self
    }

    /// Delimiters tried, in order of preference, when reading.
    pub fn candidates(mut self, candidates: Vec<u8>) -> Self {
        self.candidates = candidates;
        self
    }

    fn writer_builder(&self) -> csv::WriterBuilder {
        let mut builder = csv::WriterBuilder::new();
        builder
            .delimiter(self.delimiter)
            .quote(self.quote)
            .terminator(self.terminator)
            .quote_style(csv::QuoteStyle::Necessary)
            .flexible(true)
            .has_headers(false);
        builder
    }

    fn reader_builder(&self, delimiter: u8) -> csv::ReaderBuilder {
        let mut builder = csv::ReaderBuilder::new();
        builder
            .delimiter(delimiter)
            .quote(self.quote)
            .flexible(true)
            .has_headers(false);
        // CRLF on the reader accepts `\r`, `\n` and `\r\n` alike.
        if let Some(b) = self.record_byte() {
            builder.terminator(csv::Terminator::Any(b));
        }
        builder
    }

    /// The single byte ending a record, or `None` for ordinary line breaks.
    fn record_byte(&self) -> Option<u8> {
        match self.terminator {
            csv::Terminator::Any(b) if b != b'\n' && b != b'\r' => Some(b),
            _ => None,
        }
    }

    fn first_record<'a>(&self, text: &'a str) -> &'a str {
        match self.record_byte() {
            Some(b) => text.split(char::from(b)).next().unwrap_or_default(),
            None => text.lines().next().unwrap_or_default(),
        }
    }

    /// Pick the delimiter for `text`: the candidate seen most often in its
    /// first record, or the first candidate when none appears.
    pub fn sniff(&self, text: &str) -> u8 {
        let first_line = self.first_record(text);
        let fallback = self.candidates.first().copied().unwrap_or(self.delimiter);
        self.candidates
            .iter()
            .map(|&d| (first_line.bytes().filter(|&b| b == d).count(), d))
            .filter(|&(count, _)| count > 0)
            // Earlier candidates win ties.
            .fold(None, |best: Option<(usize, u8)>, (count, d)| match best {
                Some((best_count, _)) if best_count >= count => best,
                _ => Some((count, d)),
            })
            .map_or(fallback, |(_, d)| d)
    }
}

/// Write a block of cell texts as clipboard text.
pub fn encode_block(rows: &[Vec<String>], format: &ClipboardFormat) -> Result<String, ClipboardError> {
    if let [row] = rows
        && let [cell] = row.as_slice()
        && !cell.contains(['\n', '\r'])
        && format.record_byte().is_none_or(|b| !cell.contains(char::from(b)))
    {
        return Ok(cell.clone());
    }
    let mut writer = format.writer_builder().from_writer(Vec::new());
    for row in rows {
        writer
            .write_record(row)
            .map_err(|e| ClipboardError::Write(e.to_string()))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ClipboardError::Write(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| ClipboardError::Write(e.to_string()))
}

/// Parse clipboard text into a rectangular block of cell texts.
///
/// Short rows are padded with empty strings to the widest row.
pub fn decode_block(text: &str, format: &ClipboardFormat) -> Result<Vec<Vec<String>>, ClipboardError> {
    if text.is_empty() {
        return Err(ClipboardError::Empty);
    }
    let delimiter = format.sniff(text);
    let mut reader = format.reader_builder(delimiter).from_reader(text.as_bytes());
    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ClipboardError::Parse(e.to_string()))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    if width == 0 {
        return Err(ClipboardError::Empty);
    }
    for row in &mut rows {
        row.resize(width, String::new());
    }
    Ok(rows)
}
