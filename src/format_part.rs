use serde::Serialize;
use std::fmt;

use crate::format_type::FormatType;

/// One `%` directive of a format pattern, e.g. `%-5p` or `%d{HH:mm:ss}`.
///
/// Parts are created by the pattern compiler and never change afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormatPart {
    format_type: FormatType,
    argument: Option<String>,
    left_justify: bool,
    minimum_width: usize,
    maximum_width: usize,
}

impl FormatPart {
    pub(crate) fn new(
        format_type: FormatType,
        argument: Option<String>,
        left_justify: bool,
        minimum_width: usize,
        maximum_width: usize,
    ) -> Self {
        FormatPart {
            format_type,
            argument,
            left_justify,
            minimum_width,
            maximum_width,
        }
    }

    pub fn format_type(&self) -> FormatType {
        self.format_type
    }

    /// The text between `{` and `}` after the format character, if any.
    /// For dates this is the date pattern.
    pub fn argument(&self) -> Option<&str> {
        self.argument.as_deref()
    }

    pub fn is_left_justify(&self) -> bool {
        self.left_justify
    }

    /// Minimum width the value was padded to, 0 when unset.
    pub fn minimum_width(&self) -> usize {
        self.minimum_width
    }

    /// Maximum width the value was truncated to, 0 when unset.
    pub fn maximum_width(&self) -> usize {
        self.maximum_width
    }
}

/// Writes the directive back in pattern syntax.
impl fmt::Display for FormatPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("%")?;
        if self.left_justify {
            f.write_str("-")?;
        }
        if self.minimum_width > 0 {
            write!(f, "{}", self.minimum_width)?;
        }
        if self.maximum_width > 0 {
            write!(f, ".{}", self.maximum_width)?;
        }
        write!(f, "{}", self.format_type.format_char())?;
        if let Some(argument) = &self.argument {
            write!(f, "{{{}}}", argument)?;
        }
        Ok(())
    }
}
