use crate::colors::ColorScheme;
use crate::format_type::FormatType;
use crate::formatters::ResultFormatter;
use crate::parser::LogResult;

/// Standard logfmt formatter with colored output
///
/// Each result becomes `line=N` followed by one `key=value` pair per
/// extracted field, in pattern order, keyed by the field type name.
pub struct LogfmtFormatter {
    colors: ColorScheme,
}

impl LogfmtFormatter {
    pub fn new(use_colors: bool) -> Self {
        Self {
            colors: ColorScheme::new(use_colors),
        }
    }

    /// Format a single key=value pair with appropriate colors
    pub fn format_key_value_pair(&self, format_type: FormatType, value: &str) -> String {
        let key = format_type.name();
        let colored_key = if self.colors.key.is_empty() {
            key.to_string()
        } else {
            format!("{}{}{}", self.colors.key, key, self.colors.reset)
        };

        let equals = if self.colors.equals.is_empty() {
            "=".to_string()
        } else {
            format!("{}={}", self.colors.equals, self.colors.reset)
        };

        format!("{}{}{}", colored_key, equals, self.format_value(format_type, value))
    }

    fn format_value(&self, format_type: FormatType, value: &str) -> String {
        let color = if format_type == FormatType::Level {
            self.colors.level_color(value)
        } else {
            ""
        };

        let quoted_value = if needs_quoting(value) {
            format!("\"{}\"", escape_quotes(value))
        } else {
            value.to_string()
        };

        if color.is_empty() {
            quoted_value
        } else {
            format!("{}{}{}", color, quoted_value, self.colors.reset)
        }
    }
}

impl ResultFormatter for LogfmtFormatter {
    fn format_result(&self, result: &LogResult) -> String {
        let mut pairs = Vec::with_capacity(result.parts().len() + 1);
        pairs.push(format!(
            "line={}{}{}",
            self.colors.line_number,
            result.line_number(),
            self.colors.reset
        ));
        for part in result {
            pairs.push(self.format_key_value_pair(part.format_type, &part.value));
        }
        pairs.join(" ")
    }
}

/// Check if value needs to be quoted in logfmt
fn needs_quoting(value: &str) -> bool {
    value.is_empty()
        || value
            .chars()
            .any(|c| c.is_whitespace() || c == '"' || c == '=' || c.is_control())
}

/// Escape quotes and backslashes in values
fn escape_quotes(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
