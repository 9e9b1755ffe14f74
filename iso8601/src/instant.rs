// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Offset-qualified instants, the endpoints of ISO 8601 time intervals.

use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use chumsky::extra::ParserExtra;
use chumsky::input::{Input, Stream};
use chumsky::prelude::*;
use chumsky::span::SimpleSpan;
use jiff::tz::{Offset, TimeZone};
use jiff::{Timestamp, civil};

use crate::duration::CalendarDuration;
use crate::error::FormatError;

/// An absolute point in time together with the UTC offset it is written in.
///
/// Two instants are equal when they denote the same point in time, whatever
/// their offsets: `2016-04-08T10:25:30+09:00` equals `2016-04-08T01:25:30Z`.
#[derive(Debug, Clone, Copy)]
pub struct Instant {
    timestamp: Timestamp,
    offset: Offset,
}

impl Instant {
    /// Create an instant from a timestamp, written in the given offset.
    ///
    /// Offsets with a seconds part are written as `±HH:MM:SS`.
    #[must_use]
    pub const fn from_timestamp(timestamp: Timestamp, offset: Offset) -> Self {
        Self { timestamp, offset }
    }

    /// Create a UTC instant from milliseconds since the Unix epoch.
    ///
    /// ## Errors
    ///
    /// `OutOfRange` if the value is outside the range `jiff` supports.
    pub fn from_millis(millis: i64) -> Result<Self, FormatError> {
        Timestamp::from_millisecond(millis)
            .map(|timestamp| Self::from_timestamp(timestamp, Offset::UTC))
            .map_err(|_| {
                FormatError::OutOfRange(format!("{millis} milliseconds since the Unix epoch"))
            })
    }

    /// Parse an instant such as `2016-04-08T10:25:30+09:00`.
    ///
    /// Fractional seconds are optional, and a leading `-` marks a year before
    /// 0000. The offset is mandatory and may be `Z`, `±HH:MM`, `±HHMM` or
    /// `±HH:MM:SS`.
    ///
    /// ## Errors
    ///
    /// `InvalidInstant` if the text does not match, or names a date or time
    /// that does not exist.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidInstant(text.to_owned());
        let raw = raw_instant::<'_, _, extra::Default>()
            .parse(Stream::from_iter(text.chars()))
            .into_result()
            .map_err(|_| invalid())?;
        raw.resolve().ok_or_else(invalid)
    }

    /// Format as `YYYY-MM-DDTHH:MM:SS[.fff]±HH:MM`, or with `Z` for UTC.
    ///
    /// Years before 0000 are written as `-YYYY`, and an offset with a seconds
    /// part as `±HH:MM:SS`, so every instant parses back to itself.
    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// The point in time.
    #[must_use]
    pub const fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// The offset this instant is written in.
    #[must_use]
    pub const fn offset(&self) -> Offset {
        self.offset
    }

    /// The same instant written in UTC.
    #[must_use]
    pub const fn to_utc(self) -> Self {
        Self::from_timestamp(self.timestamp, Offset::UTC)
    }

    /// The civil date-time of this instant in its own offset.
    #[must_use]
    pub fn civil_date_time(&self) -> civil::DateTime {
        self.offset.to_datetime(self.timestamp)
    }

    /// Add a duration with calendar semantics in this instant's offset, so
    /// `2003-02-15T00:00:00Z` plus `P2M` is `2003-04-15T00:00:00Z`.
    ///
    /// ## Errors
    ///
    /// `OutOfRange` if the result is outside the range `jiff` supports.
    pub fn checked_add(&self, duration: &CalendarDuration) -> Result<Self, FormatError> {
        let span = duration.to_span()?;
        self.shift(span)
            .ok_or_else(|| FormatError::OutOfRange(format!("{self} + {duration}")))
    }

    /// Subtract a duration with calendar semantics, as the addition of the
    /// negated duration.
    ///
    /// ## Errors
    ///
    /// `OutOfRange` if the result is outside the range `jiff` supports.
    pub fn checked_sub(&self, duration: &CalendarDuration) -> Result<Self, FormatError> {
        let span = duration.to_span()?.negate();
        self.shift(span)
            .ok_or_else(|| FormatError::OutOfRange(format!("{self} - {duration}")))
    }

    fn shift(&self, span: jiff::Span) -> Option<Self> {
        self.timestamp
            .to_zoned(TimeZone::fixed(self.offset))
            .checked_add(span)
            .ok()
            .map(|zoned| Self::from_timestamp(zoned.timestamp(), self.offset))
    }
}

impl PartialEq for Instant {
    fn eq(&self, other: &Self) -> bool {
        self.timestamp == other.timestamp
    }
}

impl Eq for Instant {}

impl PartialOrd for Instant {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Instant {
    fn cmp(&self, other: &Self) -> Ordering {
        self.timestamp.cmp(&other.timestamp)
    }
}

impl Hash for Instant {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.timestamp.hash(state);
    }
}

impl From<Timestamp> for Instant {
    fn from(timestamp: Timestamp) -> Self {
        Self::from_timestamp(timestamp, Offset::UTC)
    }
}

impl Display for Instant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dt = self.civil_date_time();
        if dt.year() < 0 {
            f.write_str("-")?;
        }
        write!(
            f,
            "{:04}-{:02}-{:02}T{:02}:{:02}:{:02}",
            dt.year().unsigned_abs(),
            dt.month(),
            dt.day(),
            dt.hour(),
            dt.minute(),
            dt.second()
        )?;

        match dt.subsec_nanosecond() {
            0 => {}
            nanos if nanos % 1_000_000 == 0 => write!(f, ".{:03}", nanos / 1_000_000)?,
            nanos => write!(f, ".{nanos:09}")?,
        }

        let seconds = self.offset.seconds();
        if seconds == 0 {
            return f.write_str("Z");
        }
        let sign = if seconds < 0 { '-' } else { '+' };
        let seconds = seconds.unsigned_abs();
        write!(f, "{sign}{:02}:{:02}", seconds / 3600, seconds % 3600 / 60)?;
        match seconds % 60 {
            0 => Ok(()),
            rest => write!(f, ":{rest:02}"),
        }
    }
}

impl FromStr for Instant {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Fields of an instant as written, before calendar validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawInstant {
    negative_year: bool,
    year: u32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
    second: u32,
    nanosecond: u32,
    offset: RawOffset,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RawOffset {
    negative: bool,
    hours: u32,
    minutes: u32,
    seconds: u32,
}

impl RawOffset {
    const UTC: Self = Self {
        negative: false,
        hours: 0,
        minutes: 0,
        seconds: 0,
    };
}

impl RawInstant {
    fn resolve(self) -> Option<Instant> {
        let year = i16::try_from(self.year).ok()?;
        let year = if self.negative_year { -year } else { year };
        let datetime = civil::DateTime::new(
            year,
            i8::try_from(self.month).ok()?,
            i8::try_from(self.day).ok()?,
            i8::try_from(self.hour).ok()?,
            i8::try_from(self.minute).ok()?,
            i8::try_from(self.second).ok()?,
            i32::try_from(self.nanosecond).ok()?,
        )
        .ok()?;

        let RawOffset {
            hours,
            minutes,
            seconds,
            ..
        } = self.offset;
        if minutes >= 60 || seconds >= 60 {
            return None;
        }
        let seconds = i32::try_from(hours * 3600 + minutes * 60 + seconds).ok()?;
        let seconds = if self.offset.negative { -seconds } else { seconds };
        let offset = Offset::from_seconds(seconds).ok()?;

        let timestamp = offset.to_timestamp(datetime).ok()?;
        Some(Instant::from_timestamp(timestamp, offset))
    }
}

/// Format Definition:
///
/// ```txt
/// instant      = date "T" time [fraction] offset
///
/// date         = ["-"] 4DIGIT "-" 2DIGIT "-" 2DIGIT
/// time         = 2DIGIT ":" 2DIGIT ":" 2DIGIT
/// fraction     = "." 1*9DIGIT
/// offset       = "Z" / ("+" / "-") 2DIGIT [":"] 2DIGIT [":" 2DIGIT]
/// ```
fn raw_instant<'src, I, E>() -> impl Parser<'src, I, RawInstant, E>
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    let date = just('-')
        .or_not()
        .then(number(4))
        .then_ignore(just('-'))
        .then(number(2))
        .then_ignore(just('-'))
        .then(number(2));

    let time = number(2)
        .then_ignore(just(':'))
        .then(number(2))
        .then_ignore(just(':'))
        .then(number(2));

    // right-pad to nanoseconds
    let fraction = just('.')
        .ignore_then(digit().repeated().at_least(1).at_most(9).collect::<Vec<_>>())
        .map(|digits: Vec<u32>| {
            (0..9).fold(0, |acc, i| 10 * acc + digits.get(i).copied().unwrap_or(0))
        });

    let numeric_offset = select! { c @ ('+' | '-') => c }
        .then(number(2))
        .then_ignore(just(':').or_not())
        .then(number(2))
        .then(just(':').ignore_then(number(2)).or_not())
        .map(|(((sign, hours), minutes), seconds)| RawOffset {
            negative: sign == '-',
            hours,
            minutes,
            seconds: seconds.unwrap_or(0),
        });
    let offset = choice((just('Z').to(RawOffset::UTC), numeric_offset));

    date.then_ignore(just('T'))
        .then(time)
        .then(fraction.or_not())
        .then(offset)
        .map(
            |((((((sign, year), month), day), time), nanosecond), offset)| RawInstant {
                negative_year: sign.is_some(),
                year,
                month,
                day,
                hour: time.0.0,
                minute: time.0.1,
                second: time.1,
                nanosecond: nanosecond.unwrap_or(0),
                offset,
            },
        )
}

/// Exactly `count` decimal digits.
fn number<'src, I, E>(count: usize) -> impl Parser<'src, I, u32, E> + Clone
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    digit()
        .repeated()
        .exactly(count)
        .collect::<Vec<_>>()
        .map(|digits: Vec<u32>| digits.into_iter().fold(0, |acc, d| 10 * acc + d))
}

fn digit<'src, I, E>() -> impl Parser<'src, I, u32, E> + Clone
where
    I: Input<'src, Token = char, Span = SimpleSpan>,
    E: ParserExtra<'src, I>,
{
    select! { c @ '0'..='9' => u32::from(c) - u32::from('0') }
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;

    use super::*;

    fn instant(src: &str) -> Instant {
        Instant::parse(src).unwrap()
    }

    #[test]
    fn parses_instants() {
        #[rustfmt::skip]
        let success_cases = [
            ("2016-04-08T10:25:30+09:00",     1_460_078_730, 9 * 3600),
            ("2016-04-08T10:25:30+0900",      1_460_078_730, 9 * 3600),
            ("2016-04-08T01:25:30Z",          1_460_078_730, 0),
            ("2007-03-01T13:00:00Z",          1_172_754_000, 0),
            ("1970-01-01T00:00:00-05:30",     19_800,        -(5 * 3600 + 30 * 60)),
            ("2024-02-29T23:59:59+00:00",     1_709_251_199, 0),
        ];
        for (src, seconds, offset) in success_cases {
            let parsed = instant(src);
            assert_eq!(parsed.timestamp().as_second(), seconds, "Failed to parse: {src}");
            assert_eq!(parsed.offset().seconds(), offset, "Failed to parse: {src}");
        }
    }

    #[test]
    fn parses_fractional_seconds() {
        let parsed = instant("2024-01-17T10:36:51.232+09:00");
        assert_eq!(parsed.timestamp().as_millisecond(), 1_705_455_411_232);

        let parsed = instant("2024-05-09T08:51:32.348421919Z");
        assert_eq!(parsed.timestamp().subsec_nanosecond(), 348_421_919);
    }

    #[test]
    fn rejects_invalid_instants() {
        let fail_cases = [
            "",                               // empty string
            "2024-05-09T08:14:27",            // missing offset
            "2024-05-09",                     // missing time
            "2024-05-09 08:14:27Z",           // space separator
            "2024-5-09T08:14:27Z",            // short month
            "2023-02-29T00:00:00Z",           // not a leap year
            "2024-13-01T00:00:00Z",           // invalid month
            "2024-01-01T24:00:00Z",           // invalid hour
            "2024-01-01T00:00:00+09:60",      // invalid offset minute
            "2024-01-01T00:00:00+09:00:60",   // invalid offset second
            "2024-01-01T00:00:00+09:00:",     // empty offset second
            "--2024-01-01T00:00:00Z",         // doubled year sign
            "2024-01-01T00:00:00+99:00",      // offset out of range
            "2024-01-01T00:00:00.Z",          // empty fraction
            "2024-01-01T00:00:00.1234567891Z", // fraction too long
            "2024-01-01T00:00:00Zjunk",       // trailing input
            "not-a-date",
        ];
        for src in fail_cases {
            assert_eq!(
                Instant::parse(src),
                Err(FormatError::InvalidInstant(src.to_owned())),
                "Parse {src} should fail"
            );
        }
    }

    #[test]
    fn formats_instants() {
        #[rustfmt::skip]
        let cases = [
            ("2016-04-08T10:25:30+0900",      "2016-04-08T10:25:30+09:00"),
            ("2016-04-08T10:25:30+00:00",     "2016-04-08T10:25:30Z"),
            ("1970-01-01T00:00:00-05:30",     "1970-01-01T00:00:00-05:30"),
            ("2024-01-17T10:36:51.232+09:00", "2024-01-17T10:36:51.232+09:00"),
            ("2024-05-09T08:51:32.5Z",        "2024-05-09T08:51:32.500Z"),
            ("2024-05-09T08:51:32.348421919Z", "2024-05-09T08:51:32.348421919Z"),
        ];
        for (src, expected) in cases {
            assert_eq!(instant(src).format(), expected);
        }
    }

    #[test]
    fn compares_by_point_in_time() {
        let tokyo = instant("2016-04-08T10:25:30+09:00");
        let utc = instant("2016-04-08T01:25:30Z");
        assert_eq!(tokyo, utc);
        assert_eq!(tokyo.to_utc().format(), "2016-04-08T01:25:30Z");
        assert!(instant("2016-04-08T01:25:31Z") > tokyo);
    }

    #[test]
    fn creates_from_millis() {
        let parsed = Instant::from_millis(1_705_455_411_232).unwrap();
        assert_eq!(parsed, instant("2024-01-17T10:36:51.232+09:00"));
        assert_eq!(parsed.format(), "2024-01-17T01:36:51.232Z");
        assert!(matches!(
            Instant::from_millis(i64::MAX),
            Err(FormatError::OutOfRange(_))
        ));
    }

    #[test]
    fn adds_calendar_months() {
        let months = CalendarDuration::parse("P2M").unwrap();

        let start = instant("2003-02-15T00:00:00Z");
        let end = start.checked_add(&months).unwrap();
        assert_eq!(end.format(), "2003-04-15T00:00:00Z");
        assert_eq!(
            end.timestamp().duration_since(start.timestamp()),
            SignedDuration::from_hours(59 * 24)
        );

        let start = instant("2003-07-15T00:00:00Z");
        let end = start.checked_add(&months).unwrap();
        assert_eq!(end.format(), "2003-09-15T00:00:00Z");
        assert_eq!(
            end.timestamp().duration_since(start.timestamp()),
            SignedDuration::from_hours(62 * 24)
        );

        // clamps to the last day of a shorter month
        let end = instant("2024-01-31T12:00:00+09:00")
            .checked_add(&CalendarDuration::parse("P1M").unwrap())
            .unwrap();
        assert_eq!(end.format(), "2024-02-29T12:00:00+09:00");
    }

    #[test]
    fn subtracts_calendar_durations() {
        let end = instant("2008-05-11T15:30:00Z");
        let start = end
            .checked_sub(&CalendarDuration::parse("P1Y2M10DT2H30M").unwrap())
            .unwrap();
        assert_eq!(start.format(), "2007-03-01T13:00:00Z");
    }

    #[test]
    fn reports_out_of_range_arithmetic() {
        let one_year = CalendarDuration {
            years: Some(1),
            ..CalendarDuration::new()
        };
        let result = instant("9999-12-01T00:00:00Z").checked_add(&one_year);
        assert!(matches!(result, Err(FormatError::OutOfRange(_))));

        let result = instant("-9999-02-01T00:00:00Z").checked_sub(&one_year);
        assert!(matches!(result, Err(FormatError::OutOfRange(_))));

        let many_years = CalendarDuration {
            years: Some(19_999),
            ..CalendarDuration::new()
        };
        let result = instant("2000-01-01T00:00:00Z").checked_add(&many_years);
        assert!(matches!(result, Err(FormatError::OutOfRange(_))));
    }

    #[test]
    fn round_trips_offsets_with_seconds() {
        let offset = Offset::from_seconds(3601).unwrap();
        let value = Instant::from_timestamp(Timestamp::UNIX_EPOCH, offset);
        assert_eq!(value.format(), "1970-01-01T01:00:01+01:00:01");

        let parsed = instant("1970-01-01T01:00:01+01:00:01");
        assert_eq!(parsed.timestamp(), Timestamp::UNIX_EPOCH);
        assert_eq!(parsed.offset().seconds(), 3601);

        let offset = Offset::from_seconds(-(5 * 3600 + 30 * 60 + 15)).unwrap();
        let value = Instant::from_timestamp(Timestamp::UNIX_EPOCH, offset);
        assert_eq!(value.format(), "1969-12-31T18:29:45-05:30:15");
        assert_eq!(instant(&value.format()).offset(), offset);
    }

    #[test]
    fn round_trips_negative_years() {
        let parsed = instant("-0248-03-01T12:00:00Z");
        assert_eq!(parsed.civil_date_time().year(), -248);
        assert_eq!(parsed.format(), "-0248-03-01T12:00:00Z");

        let value = Instant::from_millis(-70_000_000_000_000).unwrap();
        let text = value.format();
        assert!(text.starts_with('-'), "{text}");
        assert_eq!(instant(&text), value);
    }

    #[test]
    fn round_trips_the_supported_range() {
        let max_offset = Offset::from_seconds(93_599).unwrap();
        let min_offset = Offset::from_seconds(-93_599).unwrap();
        let cases = [
            Instant::from(Timestamp::MIN),
            Instant::from(Timestamp::MAX),
            Instant::from_timestamp(Timestamp::MIN, min_offset),
            Instant::from_timestamp(Timestamp::MAX, max_offset),
            Instant::from_timestamp(Timestamp::MAX, min_offset),
        ];
        for value in cases {
            let text = value.format();
            let parsed = Instant::parse(&text).unwrap_or_else(|e| panic!("{text}: {e}"));
            assert_eq!(parsed, value, "{text}");
            assert_eq!(parsed.offset(), value.offset(), "{text}");
        }
    }
}
