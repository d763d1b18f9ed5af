use chrono::{
    DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Offset, TimeZone, Timelike, Utc,
};
use std::fmt::Write;

use crate::error::FilterError;

/// Date pattern the log manager uses for `%d` without an argument.
pub const DEFAULT_DATE_PATTERN: &str = "yyyy-MM-dd HH:mm:ss,SSS";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Month,
    Day,
    DayOfYear,
    Weekday,
    WeekdayNumber,
    AmPm,
    /// `H`, 0-23
    Hour0To23,
    /// `k`, 1-24
    Hour1To24,
    /// `K`, 0-11
    Hour0To11,
    /// `h`, 1-12
    Hour1To12,
    Minute,
    Second,
    Millisecond,
    Zone,
    Rfc822Zone,
    IsoZone,
}

impl Field {
    fn from_letter(letter: char) -> Option<Self> {
        let field = match letter {
            'y' => Field::Year,
            'M' | 'L' => Field::Month,
            'd' => Field::Day,
            'D' => Field::DayOfYear,
            'E' => Field::Weekday,
            'u' => Field::WeekdayNumber,
            'a' => Field::AmPm,
            'H' => Field::Hour0To23,
            'k' => Field::Hour1To24,
            'K' => Field::Hour0To11,
            'h' => Field::Hour1To12,
            'm' => Field::Minute,
            's' => Field::Second,
            'S' => Field::Millisecond,
            'z' => Field::Zone,
            'Z' => Field::Rfc822Zone,
            'X' => Field::IsoZone,
            _ => return None,
        };
        Some(field)
    }

    fn is_zone(self) -> bool {
        matches!(self, Field::Zone | Field::Rfc822Zone | Field::IsoZone)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
    Literal(String),
    Field { field: Field, width: usize },
}

impl Token {
    fn is_numeric(&self) -> bool {
        match self {
            Token::Literal(_) => false,
            Token::Field { field, width } => match field {
                Field::Month => *width < 3,
                Field::Weekday | Field::AmPm => false,
                field => !field.is_zone(),
            },
        }
    }
}

/// Values read from a date string before they are resolved into a date.
#[derive(Debug, Default)]
struct Fields {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    day_of_year: Option<u32>,
    hour: Option<u32>,
    twelve_hour: bool,
    pm: bool,
    minute: Option<u32>,
    second: Option<u32>,
    millisecond: Option<u32>,
    offset: Option<FixedOffset>,
}

/// A `SimpleDateFormat`-style date pattern such as `yyyy-MM-dd HH:mm:ss,SSS`.
///
/// Parsing follows the log manager's formatter: fields the pattern does not
/// carry default to the epoch, so `HH:mm:ss` reads as a time on 1970-01-01.
/// A weekday is read but never checked against the date. Without a zone
/// field the result carries a zero offset and stands for the wall-clock time
/// as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePattern {
    source: String,
    tokens: Vec<Token>,
}

impl DatePattern {
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let mut date = DatePattern {
            source: pattern.to_string(),
            tokens: Vec::new(),
        };

        let mut chars = pattern.chars().peekable();
        while let Some(ch) = chars.next() {
            if ch == '\'' {
                // '' is a literal quote, anything else opens quoted text
                if chars.peek() == Some(&'\'') {
                    chars.next();
                    date.push_literal('\'');
                    continue;
                }

                let mut closed = false;
                while let Some(inner) = chars.next() {
                    if inner == '\'' {
                        if chars.peek() == Some(&'\'') {
                            chars.next();
                            date.push_literal('\'');
                            continue;
                        }
                        closed = true;
                        break;
                    }
                    date.push_literal(inner);
                }

                if !closed {
                    return Err(FilterError::UnterminatedQuote(pattern.to_string()));
                }
            } else if ch.is_ascii_alphabetic() {
                let mut width = 1;
                while chars.peek() == Some(&ch) {
                    chars.next();
                    width += 1;
                }
                let field =
                    Field::from_letter(ch).ok_or_else(|| FilterError::UnsupportedDatePattern {
                        pattern: pattern.to_string(),
                        letter: ch,
                    })?;
                date.tokens.push(Token::Field { field, width });
            } else {
                date.push_literal(ch);
            }
        }

        Ok(date)
    }

    /// The `SimpleDateFormat` pattern as given.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// True when the pattern writes a time zone, so parsed dates are instants.
    pub fn has_zone(&self) -> bool {
        self.tokens
            .iter()
            .any(|token| matches!(token, Token::Field { field, .. } if field.is_zone()))
    }

    fn push_literal(&mut self, ch: char) {
        if let Some(Token::Literal(text)) = self.tokens.last_mut() {
            text.push(ch);
        } else {
            self.tokens.push(Token::Literal(ch.to_string()));
        }
    }

    /// Parse text written with this pattern. Text after the last field is
    /// ignored.
    pub fn parse(&self, value: &str) -> Result<DateTime<FixedOffset>, FilterError> {
        let mut fields = Fields::default();
        let mut rest = value;

        for (index, token) in self.tokens.iter().enumerate() {
            rest = match token {
                Token::Literal(text) => rest
                    .strip_prefix(text.as_str())
                    .ok_or_else(|| self.parse_error(value, format!("expected '{}'", text)))?,
                Token::Field { field, width } => {
                    // Abutting numeric fields are read at their pattern width
                    let abutting = token.is_numeric()
                        && self.tokens.get(index + 1).is_some_and(Token::is_numeric);
                    let fixed = abutting.then_some(*width);
                    self.read_field(&mut fields, *field, *width, fixed, rest.trim_start(), value)?
                }
            };
        }

        self.resolve(fields, value)
    }

    fn read_field<'a>(
        &self,
        fields: &mut Fields,
        field: Field,
        width: usize,
        fixed: Option<usize>,
        rest: &'a str,
        value: &str,
    ) -> Result<&'a str, FilterError> {
        let missing = |what: &str| self.parse_error(value, format!("expected {}", what));

        match field {
            Field::Month if width >= 3 => {
                let (index, rest) = read_name(rest, &MONTHS).ok_or_else(|| missing("a month name"))?;
                fields.month = Some(index as u32 + 1);
                Ok(rest)
            }
            Field::Weekday => {
                let (_, rest) = read_name(rest, &WEEKDAYS).ok_or_else(|| missing("a weekday name"))?;
                Ok(rest)
            }
            Field::AmPm => {
                let (index, rest) =
                    read_name(rest, &["AM", "PM"]).ok_or_else(|| missing("AM or PM"))?;
                fields.pm = index == 1;
                Ok(rest)
            }
            Field::Zone | Field::Rfc822Zone | Field::IsoZone => {
                let (offset, rest) = read_offset(rest).ok_or_else(|| missing("a zone offset"))?;
                fields.offset = Some(offset);
                Ok(rest)
            }
            _ => {
                let (number, digits, rest) =
                    read_number(rest, fixed).ok_or_else(|| missing("a number"))?;
                match field {
                    Field::Year if width <= 2 && digits == 2 => {
                        // Two-digit years: 00-68 are 20xx, 69-99 are 19xx
                        let century = if number < 69 { 2000 } else { 1900 };
                        fields.year = Some(century + number as i32);
                    }
                    Field::Year => fields.year = Some(number as i32),
                    Field::Month => fields.month = Some(number),
                    Field::Day => fields.day = Some(number),
                    Field::DayOfYear => fields.day_of_year = Some(number),
                    Field::WeekdayNumber => {}
                    Field::Hour0To23 => fields.hour = Some(number),
                    Field::Hour1To24 => fields.hour = Some(if number == 24 { 0 } else { number }),
                    Field::Hour0To11 => {
                        fields.hour = Some(number);
                        fields.twelve_hour = true;
                    }
                    Field::Hour1To12 => {
                        fields.hour = Some(if number == 12 { 0 } else { number });
                        fields.twelve_hour = true;
                    }
                    Field::Minute => fields.minute = Some(number),
                    Field::Second => fields.second = Some(number),
                    Field::Millisecond => fields.millisecond = Some(number),
                    _ => {}
                }
                Ok(rest)
            }
        }
    }

    fn resolve(&self, fields: Fields, value: &str) -> Result<DateTime<FixedOffset>, FilterError> {
        let out_of_range = || self.parse_error(value, "field out of range".to_string());

        let year = fields.year.unwrap_or(1970);
        let date = match (fields.day_of_year, fields.month, fields.day) {
            (Some(day_of_year), None, None) => NaiveDate::from_yo_opt(year, day_of_year),
            (_, month, day) => NaiveDate::from_ymd_opt(year, month.unwrap_or(1), day.unwrap_or(1)),
        }
        .ok_or_else(out_of_range)?;

        let millisecond = fields.millisecond.unwrap_or(0);
        if millisecond > 999 {
            return Err(out_of_range());
        }

        let mut hour = fields.hour.unwrap_or(0);
        if fields.twelve_hour {
            if hour > 11 {
                return Err(out_of_range());
            }
            if fields.pm {
                hour += 12;
            }
        }

        let naive = date
            .and_hms_milli_opt(
                hour,
                fields.minute.unwrap_or(0),
                fields.second.unwrap_or(0),
                millisecond,
            )
            .ok_or_else(out_of_range)?;

        let offset = fields.offset.unwrap_or_else(|| Utc.fix());
        offset
            .from_local_datetime(&naive)
            .single()
            .ok_or_else(out_of_range)
    }

    fn parse_error(&self, value: &str, reason: String) -> FilterError {
        FilterError::DateParse {
            value: value.to_string(),
            pattern: self.source.clone(),
            reason,
        }
    }

    /// Write a date the way this pattern would, using the date's own offset
    /// for wall-clock fields and zones.
    pub fn format(&self, date: &DateTime<FixedOffset>) -> String {
        let local = date.naive_local();
        let offset = date.offset();
        let mut out = String::new();

        for token in &self.tokens {
            let (field, width) = match token {
                Token::Literal(text) => {
                    out.push_str(text);
                    continue;
                }
                Token::Field { field, width } => (*field, *width),
            };

            let _ = match field {
                Field::Year if width == 2 => write!(out, "{:02}", local.year().rem_euclid(100)),
                Field::Year => write!(out, "{:0w$}", local.year(), w = width),
                Field::Month if width >= 4 => write!(out, "{}", MONTHS[local.month0() as usize]),
                Field::Month if width == 3 => {
                    write!(out, "{}", &MONTHS[local.month0() as usize][..3])
                }
                Field::Month => write!(out, "{:0w$}", local.month(), w = width),
                Field::Day => write!(out, "{:0w$}", local.day(), w = width),
                Field::DayOfYear => write!(out, "{:0w$}", local.ordinal(), w = width),
                Field::Weekday => {
                    let name = WEEKDAYS[local.weekday().num_days_from_monday() as usize];
                    if width >= 4 {
                        write!(out, "{}", name)
                    } else {
                        write!(out, "{}", &name[..3])
                    }
                }
                Field::WeekdayNumber => {
                    write!(out, "{:0w$}", local.weekday().number_from_monday(), w = width)
                }
                Field::AmPm => write!(out, "{}", if local.hour() < 12 { "AM" } else { "PM" }),
                Field::Hour0To23 => write!(out, "{:0w$}", local.hour(), w = width),
                Field::Hour1To24 => {
                    let hour = if local.hour() == 0 { 24 } else { local.hour() };
                    write!(out, "{:0w$}", hour, w = width)
                }
                Field::Hour0To11 => write!(out, "{:0w$}", local.hour() % 12, w = width),
                Field::Hour1To12 => {
                    let hour = match local.hour() % 12 {
                        0 => 12,
                        hour => hour,
                    };
                    write!(out, "{:0w$}", hour, w = width)
                }
                Field::Minute => write!(out, "{:0w$}", local.minute(), w = width),
                Field::Second => write!(out, "{:0w$}", local.second(), w = width),
                Field::Millisecond => {
                    let millis = local.nanosecond() / 1_000_000 % 1000;
                    write!(out, "{:0w$}", millis, w = width)
                }
                Field::Zone => write_offset(&mut out, offset, "GMT", Some(":"), "GMT"),
                Field::Rfc822Zone => write_offset(&mut out, offset, "", Some(""), "+0000"),
                Field::IsoZone => match width {
                    1 => write_offset(&mut out, offset, "", None, "Z"),
                    2 => write_offset(&mut out, offset, "", Some(""), "Z"),
                    _ => write_offset(&mut out, offset, "", Some(":"), "Z"),
                },
            };
        }

        out
    }

    /// Reduce a date to the precision this pattern can express.
    pub fn truncate(&self, date: &DateTime<FixedOffset>) -> Result<DateTime<FixedOffset>, FilterError> {
        self.parse(&self.format(date))
    }
}

/// Case-insensitive match of a name or its three-letter abbreviation.
/// Returns the index of the matched name.
fn read_name<'a>(rest: &'a str, names: &[&str]) -> Option<(usize, &'a str)> {
    names
        .iter()
        .enumerate()
        .flat_map(|(index, name)| {
            let short = &name[..name.len().min(3)];
            [(index, *name), (index, short)]
        })
        .filter(|(_, name)| {
            rest.get(..name.len())
                .is_some_and(|head| head.eq_ignore_ascii_case(name))
        })
        .max_by_key(|(_, name)| name.len())
        .map(|(index, name)| (index, &rest[name.len()..]))
}

/// Read a run of digits, exactly `fixed` of them when given.
/// Returns the value, the digit count and the remaining text.
fn read_number(rest: &str, fixed: Option<usize>) -> Option<(u32, usize, &str)> {
    let available = rest.bytes().take_while(u8::is_ascii_digit).count();
    let len = match fixed {
        Some(width) if available >= width => width,
        Some(_) => return None,
        None => available.min(9),
    };
    if len == 0 {
        return None;
    }
    let number = rest[..len].parse().ok()?;
    Some((number, len, &rest[len..]))
}

/// Read `Z`, `GMT`/`UTC` with an optional offset, or a bare `+HH`, `+HHMM`
/// or `+HH:MM` offset.
fn read_offset(rest: &str) -> Option<(FixedOffset, &str)> {
    for prefix in ["GMT", "UTC"] {
        if let Some(after) = rest
            .get(..prefix.len())
            .filter(|head| head.eq_ignore_ascii_case(prefix))
            .map(|_| &rest[prefix.len()..])
        {
            if after.starts_with(['+', '-']) {
                return read_signed_offset(after);
            }
            return Some((Utc.fix(), after));
        }
    }
    if let Some(after) = rest.strip_prefix('Z') {
        return Some((Utc.fix(), after));
    }
    read_signed_offset(rest)
}

fn read_signed_offset(rest: &str) -> Option<(FixedOffset, &str)> {
    let sign = match rest.as_bytes().first()? {
        b'+' => 1,
        b'-' => -1,
        _ => return None,
    };
    let rest = &rest[1..];
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();

    let (hours, minutes, rest): (i32, i32, &str) = match digits {
        1 | 2 => {
            let hours = rest[..digits].parse().ok()?;
            let rest = &rest[digits..];
            match rest.strip_prefix(':') {
                Some(after) if after.len() >= 2 && after.bytes().take(2).all(|b| b.is_ascii_digit()) => {
                    (hours, after[..2].parse().ok()?, &after[2..])
                }
                _ => (hours, 0, rest),
            }
        }
        4 => (rest[..2].parse().ok()?, rest[2..4].parse().ok()?, &rest[4..]),
        _ => return None,
    };

    if hours > 23 || minutes > 59 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).map(|offset| (offset, rest))
}

/// Write `offset` as `<prefix>+HH`, followed by `<separator>MM` when a
/// separator is given, or `zero` for UTC.
fn write_offset(
    out: &mut String,
    offset: &FixedOffset,
    prefix: &str,
    separator: Option<&str>,
    zero: &str,
) -> std::fmt::Result {
    let seconds = offset.local_minus_utc();
    if seconds == 0 {
        return out.write_str(zero);
    }
    let sign = if seconds < 0 { '-' } else { '+' };
    let minutes = seconds.abs() / 60;
    write!(out, "{}{}{:02}", prefix, sign, minutes / 60)?;
    match separator {
        Some(separator) => write!(out, "{}{:02}", separator, minutes % 60),
        None => Ok(()),
    }
}

/// A naive date taken as wall-clock time with a zero offset.
pub(crate) fn wall_clock(date: NaiveDateTime) -> DateTime<FixedOffset> {
    Utc.fix().from_utc_datetime(&date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn datetime(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32, ms: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, mo, d)
            .unwrap()
            .and_hms_milli_opt(h, mi, s, ms)
            .unwrap()
    }

    fn parse(pattern: &str, value: &str) -> NaiveDateTime {
        DatePattern::new(pattern)
            .unwrap()
            .parse(value)
            .unwrap()
            .naive_local()
    }

    #[test]
    fn test_unsupported_letter() {
        let err = DatePattern::new("yyyy G").unwrap_err();
        assert!(matches!(
            err,
            FilterError::UnsupportedDatePattern { letter: 'G', .. }
        ));
        assert!(DatePattern::new("HH 'open").is_err());
    }

    #[test]
    fn test_quoted_literals() {
        let pattern = DatePattern::new("yyyy-MM-dd'T'HH:mm '100%' ''").unwrap();
        assert_eq!(
            pattern.format(&wall_clock(datetime(2024, 3, 15, 8, 9, 0, 0))),
            "2024-03-15T08:09 100% '"
        );
        assert_eq!(
            parse("yyyy-MM-dd'T'HH:mm", "2024-03-15T08:09"),
            datetime(2024, 3, 15, 8, 9, 0, 0)
        );
    }

    #[test]
    fn test_parse_time_only() {
        assert_eq!(
            parse("HH:mm:ss,SSS", "12:34:56,789"),
            datetime(1970, 1, 1, 12, 34, 56, 789)
        );
    }

    #[test]
    fn test_parse_full() {
        assert_eq!(
            parse(DEFAULT_DATE_PATTERN, "2024-03-15 08:09:10,011"),
            datetime(2024, 3, 15, 8, 9, 10, 11)
        );
    }

    #[test]
    fn test_parse_date_without_time() {
        assert_eq!(
            parse("yyyy/MM/dd", "2024/03/15"),
            datetime(2024, 3, 15, 0, 0, 0, 0)
        );
        assert_eq!(parse("yyyy D", "2024 60"), datetime(2024, 2, 29, 0, 0, 0, 0));
    }

    #[test]
    fn test_month_and_year_forms() {
        assert_eq!(
            parse("dd MMM yy", "05 mar 24"),
            datetime(2024, 3, 5, 0, 0, 0, 0)
        );
        assert_eq!(
            parse("d MMMM yyyy", "5 September 1999"),
            datetime(1999, 9, 5, 0, 0, 0, 0)
        );
        assert_eq!(parse("yy", "98").date(), NaiveDate::from_ymd_opt(1998, 1, 1).unwrap());
    }

    #[test]
    fn test_hour_1_to_24() {
        assert_eq!(parse("kk:mm", "24:00"), datetime(1970, 1, 1, 0, 0, 0, 0));
        assert_eq!(parse("kk:mm", "13:30"), datetime(1970, 1, 1, 13, 30, 0, 0));

        let pattern = DatePattern::new("kk:mm").unwrap();
        assert_eq!(pattern.format(&wall_clock(datetime(1970, 1, 1, 0, 15, 0, 0))), "24:15");
    }

    #[test]
    fn test_hour_0_to_11() {
        assert_eq!(parse("K:mm a", "0:30 PM"), datetime(1970, 1, 1, 12, 30, 0, 0));
        assert_eq!(parse("K:mm a", "11:59 am"), datetime(1970, 1, 1, 11, 59, 0, 0));
        assert_eq!(parse("hh:mm a", "12:05 AM"), datetime(1970, 1, 1, 0, 5, 0, 0));
        assert_eq!(parse("hh:mm", "07:05"), datetime(1970, 1, 1, 7, 5, 0, 0));

        let pattern = DatePattern::new("K:mm a").unwrap();
        assert_eq!(pattern.format(&wall_clock(datetime(1970, 1, 1, 12, 30, 0, 0))), "0:30 PM");
    }

    #[test]
    fn test_weekday_not_checked() {
        // 1970-01-01 was a Thursday
        assert_eq!(parse("EEE HH:mm", "Mon 10:00"), datetime(1970, 1, 1, 10, 0, 0, 0));
        assert_eq!(
            parse("EEEE, yyyy-MM-dd", "Friday, 2024-03-15"),
            datetime(2024, 3, 15, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_milliseconds_are_a_count() {
        assert_eq!(parse("HH:mm:ss.S", "10:00:00.5"), datetime(1970, 1, 1, 10, 0, 0, 5));
        assert_eq!(parse("HH:mm:ss.S", "10:00:00.500"), datetime(1970, 1, 1, 10, 0, 0, 500));
        assert!(DatePattern::new("HH:mm:ss.S").unwrap().parse("10:00:00.1000").is_err());
    }

    #[test]
    fn test_abutting_numeric_fields() {
        assert_eq!(
            parse("yyyyMMddHHmmss", "20240315080910"),
            datetime(2024, 3, 15, 8, 9, 10, 0)
        );
    }

    #[test]
    fn test_zones() {
        let pattern = DatePattern::new("yyyy-MM-dd HH:mm Z").unwrap();
        assert!(pattern.has_zone());
        let date = pattern.parse("2024-03-15 10:00 +0200").unwrap();
        assert_eq!(date.naive_utc(), datetime(2024, 3, 15, 8, 0, 0, 0));
        assert_eq!(pattern.format(&date), "2024-03-15 10:00 +0200");

        let iso = DatePattern::new("HH:mmXXX").unwrap();
        assert_eq!(
            iso.parse("10:00-05:30").unwrap().naive_utc(),
            datetime(1970, 1, 1, 15, 30, 0, 0)
        );
        assert_eq!(iso.parse("10:00Z").unwrap().naive_utc(), datetime(1970, 1, 1, 10, 0, 0, 0));

        let general = DatePattern::new("HH:mm z").unwrap();
        assert_eq!(
            general.parse("10:00 GMT+01:00").unwrap().naive_utc(),
            datetime(1970, 1, 1, 9, 0, 0, 0)
        );
        assert_eq!(
            general.parse("10:00 UTC").unwrap().naive_utc(),
            datetime(1970, 1, 1, 10, 0, 0, 0)
        );
        // Zone names other than GMT and UTC are ambiguous
        assert!(general.parse("10:00 CET").is_err());

        assert!(!DatePattern::new("HH:mm").unwrap().has_zone());
    }

    #[test]
    fn test_parse_garbage() {
        let pattern = DatePattern::new("HH:mm:ss").unwrap();
        assert!(pattern.parse("not a time").is_err());
        assert!(pattern.parse("").is_err());
        assert!(pattern.parse("25:00:00").is_err());
    }

    #[test]
    fn test_truncate_drops_precision() {
        let pattern = DatePattern::new("HH:mm:ss").unwrap();
        let truncated = pattern
            .truncate(&wall_clock(datetime(2024, 6, 1, 12, 0, 0, 999)))
            .unwrap();
        assert_eq!(truncated.naive_local(), datetime(1970, 1, 1, 12, 0, 0, 0));
    }
}
