use super::Filter;
use crate::error::FilterError;
use crate::format_part::FormatPart;
use crate::format_type::FormatType;
use crate::level::Level;

/// Keeps records by their `%p` level.
///
/// Inclusive mode keeps levels at least as severe as the threshold, plus
/// `ALL`. Exclusive mode keeps only the threshold level itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelFilter {
    level: Level,
    exclusive: bool,
}

impl LevelFilter {
    pub fn new(level: Level, exclusive: bool) -> Self {
        LevelFilter { level, exclusive }
    }

    pub fn at_least(level: Level) -> Self {
        Self::new(level, false)
    }

    pub fn exactly(level: Level) -> Self {
        Self::new(level, true)
    }

    pub fn level(&self) -> Level {
        self.level
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }
}

impl Filter for LevelFilter {
    fn allow_type(&self, format_type: FormatType) -> bool {
        format_type == FormatType::Level
    }

    fn accept(&self, _part: &FormatPart, value: &str) -> Result<bool, FilterError> {
        let level: Level = value.parse()?;
        if self.exclusive {
            Ok(level == self.level)
        } else {
            Ok(level == Level::All || level.is_at_least(self.level))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn level_part() -> FormatPart {
        FormatPart::new(FormatType::Level, None, true, 5, 0)
    }

    #[test]
    fn test_inclusive() {
        let filter = LevelFilter::at_least(Level::Warning);
        let part = level_part();

        assert!(filter.accept(&part, "ERROR").unwrap());
        assert!(filter.accept(&part, "WARN").unwrap());
        assert!(filter.accept(&part, "FATAL").unwrap());
        assert!(!filter.accept(&part, "DEBUG").unwrap());
        assert!(!filter.accept(&part, "INFO").unwrap());
        assert!(filter.accept(&part, "ALL").unwrap());
    }

    #[test]
    fn test_all_passes_any_threshold() {
        let filter = LevelFilter::at_least(Level::Off);
        assert!(filter.accept(&level_part(), "ALL").unwrap());
        assert!(!filter.accept(&level_part(), "FATAL").unwrap());
    }

    #[test]
    fn test_exclusive() {
        let filter = LevelFilter::exactly(Level::Warning);
        let part = level_part();

        assert!(filter.accept(&part, "WARNING").unwrap());
        assert!(!filter.accept(&part, "WARN").unwrap());
        assert!(!filter.accept(&part, "ERROR").unwrap());
        assert!(!filter.accept(&part, "ALL").unwrap());
    }

    #[test]
    fn test_unknown_level_is_error() {
        let filter = LevelFilter::at_least(Level::Info);
        assert!(matches!(
            filter.accept(&level_part(), "CHATTY"),
            Err(FilterError::UnknownLevel(_))
        ));
    }

    #[test]
    fn test_scope() {
        let filter = LevelFilter::at_least(Level::Info);
        assert!(filter.allow_type(FormatType::Level));
        assert!(!filter.allow_type(FormatType::LocalizedLevel));
        assert!(!filter.allow_type(FormatType::Message));
    }
}
