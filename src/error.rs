/// Errors raised while compiling a format pattern. All of them are fatal:
/// a pattern that fails here never produces a `CompiledPattern`.
#[derive(Debug, thiserror::Error)]
pub enum PatternError {
    #[error("Invalid format character '{ch}' at offset {offset}")]
    UnknownFormatChar { ch: char, offset: usize },

    #[error("Incomplete format directive at offset {offset}: '{text}'")]
    IncompleteDirective { offset: usize, text: String },

    #[error("Invalid width '{value}' at offset {offset}")]
    InvalidWidth { value: String, offset: usize },

    #[error("Compiled expression has {groups} groups but the pattern has {parts} capturing parts")]
    GroupMismatch { groups: usize, parts: usize },

    #[error("Failed to compile regex '{pattern}': {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("Group count {groups} is greater than the format size {parts}")]
    GroupMismatch { groups: usize, parts: usize },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Reasons a filter could not interpret a field. These never leave the
/// filter chain; a field that fails to interpret is rejected.
#[derive(Debug, thiserror::Error)]
pub enum FilterError {
    #[error("Unknown log level: '{0}'")]
    UnknownLevel(String),

    #[error("Unsupported date pattern letter '{letter}' in '{pattern}'")]
    UnsupportedDatePattern { pattern: String, letter: char },

    #[error("Unterminated quote in date pattern '{0}'")]
    UnterminatedQuote(String),

    #[error("Cannot parse '{value}' with date pattern '{pattern}': {reason}")]
    DateParse {
        value: String,
        pattern: String,
        reason: String,
    },
}
