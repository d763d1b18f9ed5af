use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

use crate::error::PatternError;

/// The kind of value a format directive writes, keyed by its format character.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatType {
    Category,
    ClassName,
    Date,
    Exception,
    ExceptionExtended,
    SourceFileName,
    ResourceKey,
    Color,
    SourceLocation,
    SourceLineNumber,
    Message,
    SourceMethod,
    NewLine,
    Level,
    LocalizedLevel,
    RelativeTime,
    Thread,
    SimpleMessage,
    Ndc,
    Mdc,
    Timezone,
    Percentage,
}

impl FormatType {
    pub const ALL: [FormatType; 22] = [
        FormatType::Category,
        FormatType::ClassName,
        FormatType::Date,
        FormatType::Exception,
        FormatType::ExceptionExtended,
        FormatType::SourceFileName,
        FormatType::ResourceKey,
        FormatType::Color,
        FormatType::SourceLocation,
        FormatType::SourceLineNumber,
        FormatType::Message,
        FormatType::SourceMethod,
        FormatType::NewLine,
        FormatType::Level,
        FormatType::LocalizedLevel,
        FormatType::RelativeTime,
        FormatType::Thread,
        FormatType::SimpleMessage,
        FormatType::Ndc,
        FormatType::Mdc,
        FormatType::Timezone,
        FormatType::Percentage,
    ];

    /// The character following `%` that selects this type.
    pub fn format_char(&self) -> char {
        match self {
            FormatType::Category => 'c',
            FormatType::ClassName => 'C',
            FormatType::Date => 'd',
            FormatType::Exception => 'e',
            FormatType::ExceptionExtended => 'E',
            FormatType::SourceFileName => 'F',
            FormatType::ResourceKey => 'k',
            FormatType::Color => 'K',
            FormatType::SourceLocation => 'l',
            FormatType::SourceLineNumber => 'L',
            FormatType::Message => 'm',
            FormatType::SourceMethod => 'M',
            FormatType::NewLine => 'n',
            FormatType::Level => 'p',
            FormatType::LocalizedLevel => 'P',
            FormatType::RelativeTime => 'r',
            FormatType::Thread => 't',
            FormatType::SimpleMessage => 's',
            FormatType::Ndc => 'x',
            FormatType::Mdc => 'X',
            FormatType::Timezone => 'z',
            FormatType::Percentage => '%',
        }
    }

    /// Regex fragment matching the text this type produces in a log line.
    pub fn to_regex(&self) -> &'static str {
        match self {
            FormatType::Category => r"(\D+)",
            FormatType::ClassName => r"(\S+)",
            FormatType::Date => r"(.+)",
            FormatType::Exception => r"(.*)",
            FormatType::ExceptionExtended => r"(.*)",
            FormatType::SourceFileName => r"(\S+)",
            FormatType::ResourceKey => r"(\S+)",
            FormatType::Color => r"(\S+)",
            FormatType::SourceLocation => r"(\S+)",
            FormatType::SourceLineNumber => r"(\S+)",
            FormatType::Message => r"(.+)",
            FormatType::SourceMethod => r"(\S+)",
            FormatType::NewLine => r"\n",
            FormatType::Level => r"(\D+)",
            FormatType::LocalizedLevel => r"(\D+)",
            FormatType::RelativeTime => r"(\S+)",
            FormatType::Thread => r"(.+)",
            FormatType::SimpleMessage => r"(.+)",
            FormatType::Ndc => r"(.+)",
            FormatType::Mdc => r"(.+)",
            FormatType::Timezone => r"(\S+)",
            FormatType::Percentage => "%",
        }
    }

    /// Whether the regex fragment contributes a capture group.
    pub fn is_capturing(&self) -> bool {
        !matches!(self, FormatType::NewLine | FormatType::Percentage)
    }

    pub fn is_date(&self) -> bool {
        matches!(self, FormatType::Date)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FormatType::Category => "category",
            FormatType::ClassName => "class_name",
            FormatType::Date => "date",
            FormatType::Exception => "exception",
            FormatType::ExceptionExtended => "exception_extended",
            FormatType::SourceFileName => "source_file_name",
            FormatType::ResourceKey => "resource_key",
            FormatType::Color => "color",
            FormatType::SourceLocation => "source_location",
            FormatType::SourceLineNumber => "source_line_number",
            FormatType::Message => "message",
            FormatType::SourceMethod => "source_method",
            FormatType::NewLine => "new_line",
            FormatType::Level => "level",
            FormatType::LocalizedLevel => "localized_level",
            FormatType::RelativeTime => "relative_time",
            FormatType::Thread => "thread",
            FormatType::SimpleMessage => "simple_message",
            FormatType::Ndc => "ndc",
            FormatType::Mdc => "mdc",
            FormatType::Timezone => "timezone",
            FormatType::Percentage => "percentage",
        }
    }

    /// Look up the type for a format character.
    ///
    /// `offset` is only used to report where the bad character sits in the
    /// pattern being compiled.
    pub fn from_char(ch: char, offset: usize) -> Result<Self, PatternError> {
        FORMAT_CHARS
            .get(&ch)
            .copied()
            .ok_or(PatternError::UnknownFormatChar { ch, offset })
    }
}

impl fmt::Display for FormatType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

static FORMAT_CHARS: Lazy<HashMap<char, FormatType>> = Lazy::new(|| {
    FormatType::ALL
        .iter()
        .map(|format_type| (format_type.format_char(), *format_type))
        .collect()
});
