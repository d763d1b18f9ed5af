use chrono::{DateTime, FixedOffset, NaiveDateTime};

use super::date_format::{wall_clock, DatePattern, DEFAULT_DATE_PATTERN};
use super::Filter;
use crate::error::FilterError;
use crate::format_part::FormatPart;
use crate::format_type::FormatType;

/// Keeps records whose date lies within `[low, high]`.
///
/// The record date is read with the date pattern of its `%d{...}` directive.
/// The bounds go through the same pattern (written, then read back) before
/// comparing, so a pattern that only logs `HH:mm:ss` compares at that
/// precision and ignores the calendar day of the bounds.
///
/// Bounds are written in their own offset. For patterns without a zone that
/// means their wall-clock time is compared with the logged wall-clock time;
/// with a zone, both sides are compared as instants. Naive bounds are taken
/// at a zero offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateTimeFilter {
    low: Option<DateTime<FixedOffset>>,
    high: Option<DateTime<FixedOffset>>,
}

impl DateTimeFilter {
    pub fn new(low: NaiveDateTime, high: NaiveDateTime) -> Self {
        Self::between(Some(wall_clock(low)), Some(wall_clock(high)))
    }

    /// Only a lower bound.
    pub fn since(low: NaiveDateTime) -> Self {
        Self::between(Some(wall_clock(low)), None)
    }

    /// Only an upper bound.
    pub fn until(high: NaiveDateTime) -> Self {
        Self::between(None, Some(wall_clock(high)))
    }

    /// Either bound may be open.
    pub fn between(low: Option<DateTime<FixedOffset>>, high: Option<DateTime<FixedOffset>>) -> Self {
        DateTimeFilter { low, high }
    }

    pub fn low(&self) -> Option<DateTime<FixedOffset>> {
        self.low
    }

    pub fn high(&self) -> Option<DateTime<FixedOffset>> {
        self.high
    }
}

impl Filter for DateTimeFilter {
    fn allow_type(&self, format_type: FormatType) -> bool {
        format_type.is_date()
    }

    fn accept(&self, part: &FormatPart, value: &str) -> Result<bool, FilterError> {
        let pattern = DatePattern::new(part.argument().unwrap_or(DEFAULT_DATE_PATTERN))?;
        let record = pattern.parse(value)?;

        if let Some(low) = &self.low {
            if record < pattern.truncate(low)? {
                return Ok(false);
            }
        }
        if let Some(high) = &self.high {
            if record > pattern.truncate(high)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}
