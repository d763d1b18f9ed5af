use once_cell::sync::Lazy;
use regex::Regex;
use std::str::FromStr;

use crate::error::{ParseError, PatternError};
use crate::format_part::FormatPart;
use crate::format_type::FormatType;
use crate::LogRecordPart;

/// Tokenizer for format patterns: either a run of literal text, or a single
/// `%[-][min][.max]X[{argument}]` directive.
static FORMAT_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        // greedily match all non-format characters
        r"(?s)([^%]+)",
        // or a directive with optional justify flag and minimum width
        r"|%(-)?(\d+)?",
        // optional maximum width
        r"(?:\.(\d+))?",
        // the format character
        r"(.)",
        // optional argument
        r"(?:\{([^}]*)\})?",
    ))
    .expect("valid format token regex")
});

/// A format pattern compiled into its directives and a regex that matches
/// the lines it produces.
///
/// Capture group `i` of the regex belongs to the `i`-th capturing part
/// (everything except `%n` and `%%`). The pattern holds no mutable state and
/// can be shared between threads and parser runs.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    source: String,
    parts: Vec<FormatPart>,
    capturing: Vec<usize>,
    regex: Regex,
    use_new_line: bool,
}

/// A value captured for one directive of a matched line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch<'p> {
    pub part: &'p FormatPart,
    pub value: String,
}

impl FieldMatch<'_> {
    pub fn format_type(&self) -> FormatType {
        self.part.format_type()
    }

    pub fn to_record_part(&self) -> LogRecordPart {
        LogRecordPart::new(self.format_type(), self.value.clone())
    }
}

impl CompiledPattern {
    /// Compile a format pattern such as `%d{HH:mm:ss,SSS} %-5p [%c] (%t) %s%n`.
    pub fn compile(pattern: &str) -> Result<Self, PatternError> {
        let mut regex_pattern = String::new();
        let mut parts = Vec::new();
        let mut last_end = 0;

        for caps in FORMAT_TOKEN.captures_iter(pattern) {
            let whole = caps.get(0).expect("group 0 is always present");
            if whole.start() != last_end {
                return Err(PatternError::IncompleteDirective {
                    offset: last_end,
                    text: pattern[last_end..whole.start()].to_string(),
                });
            }
            last_end = whole.end();

            if let Some(text) = caps.get(1) {
                regex_pattern.push_str(&sanitize(text.as_str()));
                continue;
            }

            let Some((offset, ch)) = caps
                .get(5)
                .and_then(|m| m.as_str().chars().next().map(|ch| (m.start(), ch)))
            else {
                return Err(PatternError::IncompleteDirective {
                    offset: whole.start(),
                    text: whole.as_str().to_string(),
                });
            };
            let format_type = FormatType::from_char(ch, offset)?;

            let minimum_width = parse_width(caps.get(3))?;
            let maximum_width = parse_width(caps.get(4))?;
            let left_justify = caps.get(2).is_some();
            let argument = caps.get(6).map(|m| m.as_str().to_string());

            regex_pattern.push_str(format_type.to_regex());
            parts.push(FormatPart::new(
                format_type,
                argument,
                left_justify,
                minimum_width,
                maximum_width,
            ));
        }

        if last_end != pattern.len() {
            return Err(PatternError::IncompleteDirective {
                offset: last_end,
                text: pattern[last_end..].to_string(),
            });
        }

        let regex = Regex::new(&regex_pattern).map_err(|source| PatternError::Regex {
            pattern: regex_pattern.clone(),
            source,
        })?;

        let capturing: Vec<usize> = parts
            .iter()
            .enumerate()
            .filter(|(_, part)| part.format_type().is_capturing())
            .map(|(i, _)| i)
            .collect();

        let groups = regex.captures_len() - 1;
        if groups != capturing.len() {
            return Err(PatternError::GroupMismatch {
                groups,
                parts: capturing.len(),
            });
        }

        let use_new_line = parts
            .iter()
            .any(|part| part.format_type() == FormatType::NewLine);

        tracing::debug!(pattern, regex = %regex, parts = parts.len(), "compiled format pattern");

        Ok(CompiledPattern {
            source: pattern.to_string(),
            parts,
            capturing,
            regex,
            use_new_line,
        })
    }

    /// The format pattern this was compiled from.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn parts(&self) -> &[FormatPart] {
        &self.parts
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Number of parts that produce a value when a line matches.
    pub fn capture_count(&self) -> usize {
        self.capturing.len()
    }

    /// True when the pattern contains `%n`; lines then get their terminator
    /// back before matching.
    pub fn is_terminator_sensitive(&self) -> bool {
        self.use_new_line
    }

    /// Match a single line (without its terminator).
    ///
    /// Returns `Ok(None)` when the pattern does not match. The regex is applied
    /// repeatedly over the line, and every match adds its values in order, so
    /// a line holding several records yields all of them.
    pub fn match_line(&self, line: &str) -> Result<Option<Vec<FieldMatch<'_>>>, ParseError> {
        let text = if self.use_new_line {
            let mut text = String::with_capacity(line.len() + 1);
            text.push_str(line);
            text.push('\n');
            std::borrow::Cow::Owned(text)
        } else {
            std::borrow::Cow::Borrowed(line)
        };

        let mut fields = Vec::new();
        let mut matched = false;

        for caps in self.regex.captures_iter(&text) {
            matched = true;
            let groups = caps.len() - 1;
            if groups > self.capturing.len() {
                return Err(ParseError::GroupMismatch {
                    groups,
                    parts: self.capturing.len(),
                });
            }

            for (group, &part_index) in self.capturing.iter().enumerate().take(groups) {
                let value = caps.get(group + 1).map_or("", |m| m.as_str());
                fields.push(FieldMatch {
                    part: &self.parts[part_index],
                    value: value.trim().to_string(),
                });
            }
        }

        Ok(matched.then_some(fields))
    }
}

impl FromStr for CompiledPattern {
    type Err = PatternError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CompiledPattern::compile(s)
    }
}

fn parse_width(digits: Option<regex::Match<'_>>) -> Result<usize, PatternError> {
    match digits {
        None => Ok(0),
        Some(m) => m.as_str().parse().map_err(|_| PatternError::InvalidWidth {
            value: m.as_str().to_string(),
            offset: m.start(),
        }),
    }
}

/// Escape literal pattern text for embedding into the regex.
pub(crate) fn sanitize(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' | '(' | ')' | '[' | ']' | '{' | '}' | '$' | '^' | '.' | '*' | '+' | '|' | '?' => {
                result.push('\\');
                result.push(ch);
            }
            '\t' => result.push_str(r"\t"),
            _ => result.push(ch),
        }
    }
    result
}
