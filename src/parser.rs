mod window;

use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::config::ParserConfig;
use crate::error::{ParseError, PatternError};
use crate::filter::{Filter, FilterChain};
use crate::format_type::FormatType;
use crate::pattern::CompiledPattern;

pub use window::ResultWindow;

/// One value extracted from a log line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogRecordPart {
    pub format_type: FormatType,
    pub value: String,
}

impl LogRecordPart {
    pub fn new(format_type: FormatType, value: String) -> Self {
        LogRecordPart { format_type, value }
    }
}

/// A line that matched the pattern and passed all filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LogResult {
    line_number: usize,
    text: String,
    #[serde(rename = "fields")]
    parts: Vec<LogRecordPart>,
}

impl LogResult {
    pub fn new(line_number: usize, text: String, parts: Vec<LogRecordPart>) -> Self {
        LogResult {
            line_number,
            text,
            parts,
        }
    }

    /// 1-based position of the line in the input, counting every line read.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// The line as read, without its terminator.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn parts(&self) -> &[LogRecordPart] {
        &self.parts
    }

    /// First value extracted for `format_type`.
    pub fn get(&self, format_type: FormatType) -> Option<&str> {
        self.parts
            .iter()
            .find(|part| part.format_type == format_type)
            .map(|part| part.value.as_str())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LogRecordPart> {
        self.parts.iter()
    }
}

impl<'a> IntoIterator for &'a LogResult {
    type Item = &'a LogRecordPart;
    type IntoIter = std::slice::Iter<'a, LogRecordPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.iter()
    }
}

/// Parses log output written with a known format pattern.
///
/// ```
/// use logpattern::{Level, LevelFilter, Parser};
///
/// let parser = Parser::new("%d{HH:mm:ss} %-5p %m")
///     .unwrap()
///     .with_filter(LevelFilter::at_least(Level::Warn));
/// let input = "10:00:00 INFO  started\n10:00:01 ERROR failed\n";
/// let results = parser.parse(input.as_bytes()).unwrap();
/// assert_eq!(results.len(), 1);
/// assert_eq!(results[0].line_number(), 2);
/// ```
#[derive(Debug)]
pub struct Parser {
    pattern: CompiledPattern,
    filters: FilterChain,
    config: ParserConfig,
}

impl Parser {
    pub fn new(format_pattern: &str) -> Result<Self, PatternError> {
        Self::with_config(format_pattern, ParserConfig::default())
    }

    pub fn with_config(format_pattern: &str, config: ParserConfig) -> Result<Self, PatternError> {
        let pattern = CompiledPattern::compile(format_pattern)?;
        Ok(Self::from_pattern(pattern, config))
    }

    pub fn from_pattern(pattern: CompiledPattern, config: ParserConfig) -> Self {
        Parser {
            pattern,
            filters: FilterChain::new(),
            config,
        }
    }

    pub fn add_filter(&mut self, filter: Box<dyn Filter>) {
        self.filters.add_filter(filter);
    }

    pub fn with_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.add_filter(Box::new(filter));
        self
    }

    /// Remove the filter at `index`, counting in the order filters were added.
    pub fn remove_filter(&mut self, index: usize) -> Option<Box<dyn Filter>> {
        self.filters.remove_filter(index)
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    pub fn pattern(&self) -> &CompiledPattern {
        &self.pattern
    }

    pub fn filters(&self) -> &FilterChain {
        &self.filters
    }

    pub fn max_results(&self) -> usize {
        self.config.max_results
    }

    /// Limit results to the last `max_results` accepted lines, 0 for all.
    pub fn set_max_results(&mut self, max_results: usize) {
        self.config.max_results = max_results;
    }

    /// Parse every line of `input`.
    pub fn parse<R: BufRead>(&self, input: R) -> Result<Vec<LogResult>, ParseError> {
        run(&self.pattern, &self.filters, input, self.config.max_results)
    }

    /// Parse a log file.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<Vec<LogResult>, ParseError> {
        let file = File::open(path)?;
        // An empty buffer reads as end of input
        let capacity = self.config.buffer_size.max(1);
        self.parse(BufReader::with_capacity(capacity, file))
    }
}

/// Match every line of `input` against `pattern` and keep those accepted by
/// `filters`.
///
/// Line numbers count every line read. When `max_results` is non-zero only the
/// last `max_results` accepted lines are returned, in input order. Bytes that
/// are not valid UTF-8 are replaced with U+FFFD. A read error aborts the run
/// and discards what was collected.
pub fn run<R: BufRead>(
    pattern: &CompiledPattern,
    filters: &FilterChain,
    mut input: R,
    max_results: usize,
) -> Result<Vec<LogResult>, ParseError> {
    let mut window = ResultWindow::new(max_results);
    let mut line_number = 0;
    let mut matched = 0;
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if input.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        line_number += 1;

        let line = String::from_utf8_lossy(strip_terminator(&buf)).into_owned();

        let Some(fields) = pattern.match_line(&line)? else {
            continue;
        };
        matched += 1;

        if filters.evaluate(&fields) {
            let parts = fields.iter().map(|field| field.to_record_part()).collect();
            window.push(LogResult::new(line_number, line, parts));
        }
    }

    tracing::debug!(
        lines = line_number,
        matched,
        accepted = window.accepted(),
        returned = window.len(),
        "finished parsing"
    );

    Ok(window.into_vec())
}

/// Drop a trailing `\n` or `\r\n`.
fn strip_terminator(line: &[u8]) -> &[u8] {
    match line.strip_suffix(b"\n") {
        Some(line) => line.strip_suffix(b"\r").unwrap_or(line),
        None => line,
    }
}
