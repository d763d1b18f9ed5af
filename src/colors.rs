/// ANSI color codes for result output
#[derive(Debug, Clone)]
pub struct ColorScheme {
    pub key: &'static str,         // Cyan for field names
    pub equals: &'static str,      // White for = separator
    pub line_number: &'static str, // Blue for line numbers
    pub level_error: &'static str, // Red for error/fatal levels
    pub level_warn: &'static str,  // Yellow for warn levels
    pub level_info: &'static str,  // White for info levels
    pub level_debug: &'static str, // Gray for debug/trace levels
    pub reset: &'static str,       // Reset to default color
}

impl ColorScheme {
    pub fn new(use_colors: bool) -> Self {
        if use_colors {
            Self {
                key: "\x1b[36m",
                equals: "\x1b[37m",
                line_number: "\x1b[34m",
                level_error: "\x1b[31m",
                level_warn: "\x1b[33m",
                level_info: "\x1b[37m",
                level_debug: "\x1b[90m",
                reset: "\x1b[0m",
            }
        } else {
            // All empty strings for no-color mode
            Self {
                key: "",
                equals: "",
                line_number: "",
                level_error: "",
                level_warn: "",
                level_info: "",
                level_debug: "",
                reset: "",
            }
        }
    }

    /// Color for a level value, by severity. Unknown levels stay uncolored.
    pub fn level_color(&self, level: &str) -> &'static str {
        use crate::level::Level;

        match level.parse::<Level>() {
            Ok(Level::All) | Ok(Level::Off) | Err(_) => "",
            Ok(level) if level.is_at_least(Level::Error) => self.level_error,
            Ok(level) if level.is_at_least(Level::Warn) => self.level_warn,
            Ok(level) if level.is_at_least(Level::Info) => self.level_info,
            Ok(_) => self.level_debug,
        }
    }
}
