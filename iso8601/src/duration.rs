// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Duration values as defined in ISO 8601 Section 4.4.3.
//!
//! # Architecture
//!
//! ```text
//! Duration Text → Lexer → Token Stream → Scanner → Magnitudes → Carry Fold → CalendarDuration
//! ```
//!
//! # Format
//!
//! ```txt
//! duration = "P" (dur-week / dur-date [dur-time] / dur-time)
//!
//! dur-week = number "W"
//! dur-date = [number "Y"] [number "M"] [number "D"]
//! dur-time = "T" [number "H"] [number "M"] [number "S"]  ; at least one
//! number   = 1*DIGIT ["." 1*DIGIT]
//! ```

use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::FormatError;
use crate::lexer::{Span, SpannedToken, Token, tokenize};

const PERIOD_MARKER: char = 'P';
const TIME_MARKER: char = 'T';

/// Canonical text of a duration with every component zero or unset.
pub const ZERO_DURATION: &str = "PT0S";

const MONTHS_PER_YEAR: f64 = 12.0;
const DAYS_PER_WEEK: f64 = 7.0;
const HOURS_PER_DAY: f64 = 24.0;
const MINUTES_PER_HOUR: f64 = 60.0;
const SECONDS_PER_MINUTE: f64 = 60.0;

/// A calendar duration, e.g. `P3Y6M4DT12H30M5S`.
///
/// Each component is either unset (`None`, not written in the source and
/// omitted on output) or an explicit value, which may be zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct CalendarDuration {
    /// Years (Y)
    pub years: Option<u32>,
    /// Months (M in the date section)
    pub months: Option<u32>,
    /// Weeks (W)
    pub weeks: Option<u32>,
    /// Days (D)
    pub days: Option<u32>,
    /// Hours (H)
    pub hours: Option<u32>,
    /// Minutes (M in the time section)
    pub minutes: Option<u32>,
    /// Seconds (S), rounded to a whole number while parsing
    pub seconds: Option<u32>,
}

impl CalendarDuration {
    /// Create a duration with every component unset.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            years: None,
            months: None,
            weeks: None,
            days: None,
            hours: None,
            minutes: None,
            seconds: None,
        }
    }

    /// Parse an ISO 8601 duration, e.g. `P3Y6M4DT12H30M5S` or `P8W`.
    ///
    /// A week duration is converted to days. Fractional components are carried
    /// into the next smaller unit (years into months, days into hours, hours
    /// into minutes, minutes into seconds), and the seconds are rounded to the
    /// nearest whole second.
    ///
    /// ## Errors
    ///
    /// - `MissingPeriodMarker` if the text does not start with `P`
    /// - `UnsupportedMonthFraction` if the month magnitude is fractional
    /// - `InvalidDuration` for anything else that is not the grammar above
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let Some(body) = text.strip_prefix(PERIOD_MARKER) else {
            return Err(FormatError::MissingPeriodMarker(text.to_owned()));
        };

        let magnitudes = scan(body).map_err(|err| {
            tracing::debug!(text, %err, "rejected duration");
            FormatError::InvalidDuration(text.to_owned())
        })?;

        magnitudes.resolve(text)
    }

    /// Format as ISO 8601 text.
    ///
    /// Components are written in the order `Y M W D T H M S`. Unless
    /// `emit_zero_or_unset` is set, zero and unset components are skipped, and
    /// the time marker is only written when a time component is non-zero. With
    /// `emit_zero_or_unset`, every component is written, and a duration without
    /// any non-zero component becomes `PT0S`.
    ///
    /// Components are never rebalanced: 90 minutes stay `PT90M`.
    #[must_use]
    pub fn format(&self, emit_zero_or_unset: bool) -> String {
        if emit_zero_or_unset && self.is_zero() {
            return ZERO_DURATION.to_owned();
        }

        let mut out = String::from(PERIOD_MARKER);
        push_component(&mut out, self.years, 'Y', emit_zero_or_unset);
        push_component(&mut out, self.months, 'M', emit_zero_or_unset);
        push_component(&mut out, self.weeks, 'W', emit_zero_or_unset);
        push_component(&mut out, self.days, 'D', emit_zero_or_unset);

        let has_time = [self.hours, self.minutes, self.seconds]
            .into_iter()
            .any(|v| v.unwrap_or(0) != 0);
        if has_time || emit_zero_or_unset {
            out.push(TIME_MARKER);
            push_component(&mut out, self.hours, 'H', emit_zero_or_unset);
            push_component(&mut out, self.minutes, 'M', emit_zero_or_unset);
            push_component(&mut out, self.seconds, 'S', emit_zero_or_unset);
        }
        out
    }

    /// Format with the given options, see [`CalendarDuration::format`].
    #[must_use]
    pub fn format_with(&self, options: FormatOptions) -> String {
        self.format(options.emit_zero_or_unset)
    }

    /// Whether every component is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.components().iter().all(Option::is_none)
    }

    /// Whether every component is unset or zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.components().iter().all(|v| v.unwrap_or(0) == 0)
    }

    /// Convert to a `jiff::Span` for calendar-aware arithmetic.
    ///
    /// ## Errors
    ///
    /// `OutOfRange` if a component exceeds the limits of `jiff::Span`.
    pub fn to_span(&self) -> Result<jiff::Span, FormatError> {
        let out_of_range = |_: jiff::Error| FormatError::OutOfRange(format!("duration {self}"));

        let mut span = jiff::Span::new();
        if let Some(v) = self.years {
            span = span.try_years(i64::from(v)).map_err(out_of_range)?;
        }
        if let Some(v) = self.months {
            span = span.try_months(i64::from(v)).map_err(out_of_range)?;
        }
        if let Some(v) = self.weeks {
            span = span.try_weeks(i64::from(v)).map_err(out_of_range)?;
        }
        if let Some(v) = self.days {
            span = span.try_days(i64::from(v)).map_err(out_of_range)?;
        }
        if let Some(v) = self.hours {
            span = span.try_hours(i64::from(v)).map_err(out_of_range)?;
        }
        if let Some(v) = self.minutes {
            span = span.try_minutes(i64::from(v)).map_err(out_of_range)?;
        }
        if let Some(v) = self.seconds {
            span = span.try_seconds(i64::from(v)).map_err(out_of_range)?;
        }
        Ok(span)
    }

    const fn components(&self) -> [Option<u32>; 7] {
        [
            self.years,
            self.months,
            self.weeks,
            self.days,
            self.hours,
            self.minutes,
            self.seconds,
        ]
    }
}

impl Display for CalendarDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format(false))
    }
}

impl FromStr for CalendarDuration {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Options for [`CalendarDuration::format_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    /// Write zero and unset components instead of skipping them.
    pub emit_zero_or_unset: bool,
}

/// Parse an ISO 8601 duration, see [`CalendarDuration::parse`].
///
/// ## Errors
///
/// See [`CalendarDuration::parse`].
pub fn parse_duration(text: &str) -> Result<CalendarDuration, FormatError> {
    CalendarDuration::parse(text)
}

/// Format a duration as ISO 8601 text, see [`CalendarDuration::format`].
#[must_use]
pub fn format_duration(duration: &CalendarDuration, emit_zero_or_unset: bool) -> String {
    duration.format(emit_zero_or_unset)
}

fn push_component(out: &mut String, value: Option<u32>, designator: char, emit_zero: bool) {
    let value = value.unwrap_or(0);
    if value != 0 || emit_zero {
        out.push_str(&value.to_string());
        out.push(designator);
    }
}

/// Units in the order they must appear in a duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Unit {
    Year,
    Month,
    Week,
    Day,
    Hour,
    Minute,
    Second,
}

impl Unit {
    /// Resolve a designator token; `M` means months before `T` and minutes after.
    const fn from_designator(token: Token<'_>, section: Section) -> Option<Self> {
        match (section, token) {
            (Section::Date, Token::Year) => Some(Self::Year),
            (Section::Date, Token::MonthOrMinute) => Some(Self::Month),
            (Section::Date, Token::Week) => Some(Self::Week),
            (Section::Date, Token::Day) => Some(Self::Day),
            (Section::Time, Token::Hour) => Some(Self::Hour),
            (Section::Time, Token::MonthOrMinute) => Some(Self::Minute),
            (Section::Time, Token::Second) => Some(Self::Second),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Date,
    Time,
}

/// Why the scanner rejected a duration body.
#[derive(Debug, Clone, thiserror::Error)]
enum ScanError<'src> {
    #[error("unexpected {token} at {span}")]
    UnexpectedToken { token: Token<'src>, span: Span },

    #[error("magnitude at {0} has no designator")]
    MissingDesignator(Span),

    #[error("designator at {0} has no magnitude")]
    MissingMagnitude(Span),

    #[error("designator at {0} is repeated or out of order")]
    OutOfOrder(Span),

    #[error("week designator combined with other designators at {0}")]
    MixedWeek(Span),

    #[error("time marker at {0} is not followed by a time component")]
    EmptyTime(Span),

    #[error("magnitude at {0} is not a number")]
    InvalidMagnitude(Span),
}

/// Raw magnitudes as written in the source, before carry-over.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Magnitudes {
    years: Option<f64>,
    months: Option<f64>,
    weeks: Option<f64>,
    days: Option<f64>,
    hours: Option<f64>,
    minutes: Option<f64>,
    seconds: Option<f64>,
}

impl Magnitudes {
    fn set(&mut self, unit: Unit, value: f64) {
        let slot = match unit {
            Unit::Year => &mut self.years,
            Unit::Month => &mut self.months,
            Unit::Week => &mut self.weeks,
            Unit::Day => &mut self.days,
            Unit::Hour => &mut self.hours,
            Unit::Minute => &mut self.minutes,
            Unit::Second => &mut self.seconds,
        };
        *slot = Some(value);
    }

    /// Run the carry fold from years down to seconds.
    fn resolve(self, text: &str) -> Result<CalendarDuration, FormatError> {
        if let Some(weeks) = self.weeks {
            return Ok(CalendarDuration {
                days: whole(Some(weeks * DAYS_PER_WEEK), f64::floor, text)?,
                ..CalendarDuration::new()
            });
        }

        let mut carry = Carry::default();
        let years = carry.absorb(self.years, 0.0);
        let months = carry.absorb(self.months, MONTHS_PER_YEAR);
        if carry.is_pending() {
            return Err(FormatError::UnsupportedMonthFraction(text.to_owned()));
        }

        // Nothing is pending past the month check, so days start fresh.
        let days = carry.absorb(self.days, 0.0);
        let hours = carry.absorb(self.hours, HOURS_PER_DAY);
        let minutes = carry.absorb(self.minutes, MINUTES_PER_HOUR);
        let seconds = carry.absorb(self.seconds, SECONDS_PER_MINUTE);

        Ok(CalendarDuration {
            years: whole(years, f64::floor, text)?,
            months: whole(months, f64::floor, text)?,
            weeks: None,
            days: whole(days, f64::floor, text)?,
            hours: whole(hours, f64::floor, text)?,
            minutes: whole(minutes, f64::floor, text)?,
            seconds: whole(seconds, f64::round, text)?,
        })
    }
}

/// Fractional remainder handed from one unit to the next smaller one.
#[derive(Debug, Default)]
struct Carry(f64);

impl Carry {
    /// Add the pending remainder, scaled by `ratio`, to `own`. The fraction of
    /// the sum becomes the new remainder.
    ///
    /// An unset unit becomes set only when something non-zero is carried in.
    fn absorb(&mut self, own: Option<f64>, ratio: f64) -> Option<f64> {
        let carried = self.0 * ratio;
        let total = match own {
            Some(own) => Some(own + carried),
            None if carried > 0.0 => Some(carried),
            None => None,
        };
        self.0 = total.map_or(0.0, f64::fract);
        total
    }

    fn is_pending(&self) -> bool {
        self.0 > 0.0
    }
}

/// Convert a magnitude to a whole component with the given rounding.
fn whole(
    value: Option<f64>,
    rounding: fn(f64) -> f64,
    text: &str,
) -> Result<Option<u32>, FormatError> {
    value
        .map(|value| {
            let value = rounding(value);
            if value.is_finite() && (0.0..=f64::from(u32::MAX)).contains(&value) {
                #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let value = value as u32;
                Ok(value)
            } else {
                Err(FormatError::InvalidDuration(text.to_owned()))
            }
        })
        .transpose()
}

/// Scan the duration body (the text after `P`) into raw magnitudes.
///
/// The scanner walks the token stream once, tracking the current section and
/// the last unit seen, so designators must appear in strictly descending
/// order of size.
fn scan(body: &str) -> Result<Magnitudes, ScanError<'_>> {
    let mut tokens = tokenize(body);
    let mut magnitudes = Magnitudes::default();
    let mut section = Section::Date;
    let mut last: Option<Unit> = None;
    let mut open_time_marker: Option<Span> = None;

    while let Some(SpannedToken(token, span)) = tokens.next() {
        match token {
            Token::Number(number) => {
                let Some(SpannedToken(designator, designator_span)) = tokens.next() else {
                    return Err(ScanError::MissingDesignator(span));
                };

                let unit = Unit::from_designator(designator, section).ok_or(
                    ScanError::UnexpectedToken {
                        token: designator,
                        span: designator_span,
                    },
                )?;

                if last == Some(Unit::Week) || (unit == Unit::Week && last.is_some()) {
                    return Err(ScanError::MixedWeek(designator_span));
                }
                if last.is_some_and(|last| unit <= last) {
                    return Err(ScanError::OutOfOrder(designator_span));
                }

                let value = lexical::parse::<f64, _>(number)
                    .map_err(|_| ScanError::InvalidMagnitude(span))?;
                magnitudes.set(unit, value);
                last = Some(unit);
                open_time_marker = None;
            }

            Token::Time if section == Section::Date => {
                if last == Some(Unit::Week) {
                    return Err(ScanError::MixedWeek(span));
                }
                section = Section::Time;
                open_time_marker = Some(span);
            }

            Token::Time | Token::Error => return Err(ScanError::UnexpectedToken { token, span }),

            Token::Year
            | Token::MonthOrMinute
            | Token::Week
            | Token::Day
            | Token::Hour
            | Token::Second => return Err(ScanError::MissingMagnitude(span)),
        }
    }

    match open_time_marker {
        Some(span) => Err(ScanError::EmptyTime(span)),
        None => Ok(magnitudes),
    }
}
