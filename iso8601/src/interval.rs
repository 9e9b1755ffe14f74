// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Time intervals as defined in ISO 8601 Section 4.4.4.
//!
//! ```txt
//! interval = instant "/" instant
//!          / instant "/" duration
//!          / duration "/" instant
//! ```
//!
//! Duration-relative forms are resolved to two instants at parse time, with
//! calendar arithmetic in the fixed offset of the written endpoint.

use std::fmt::{self, Display};
use std::str::FromStr;

use jiff::SignedDuration;

use crate::duration::CalendarDuration;
use crate::error::FormatError;
use crate::instant::Instant;

const SEPARATOR: char = '/';

/// A time interval between two instants.
///
/// The start is not required to precede the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Interval {
    start: Instant,
    end: Instant,
}

impl Interval {
    /// Create an interval from its endpoints.
    #[must_use]
    pub const fn new(start: Instant, end: Instant) -> Self {
        Self { start, end }
    }

    /// Parse an interval in any of its three forms.
    ///
    /// ## Errors
    ///
    /// `InvalidInterval` if the text is not two `/`-separated parts, or no
    /// form resolves to a pair of instants.
    pub fn parse(text: &str) -> Result<Self, FormatError> {
        let Some((head, tail)) = text.split_once(SEPARATOR) else {
            tracing::debug!(text, "rejected interval, expected one separator");
            return Err(FormatError::InvalidInterval(text.to_owned()));
        };
        if head.is_empty() || tail.is_empty() || tail.contains(SEPARATOR) {
            tracing::debug!(text, "rejected interval, expected two non-empty parts");
            return Err(FormatError::InvalidInterval(text.to_owned()));
        }

        let interval = Form::ALL
            .into_iter()
            .find_map(|form| form.resolve(head, tail).map(|interval| (form, interval)));

        match interval {
            Some((form, interval)) => {
                tracing::trace!(text, ?form, "resolved interval");
                Ok(interval)
            }
            None => {
                tracing::debug!(text, "rejected interval, no form matched");
                Err(FormatError::InvalidInterval(text.to_owned()))
            }
        }
    }

    /// Format as `<start>/<end>`.
    #[must_use]
    pub fn format(&self) -> String {
        self.to_string()
    }

    /// The start of the interval.
    #[must_use]
    pub const fn start(&self) -> Instant {
        self.start
    }

    /// The end of the interval.
    #[must_use]
    pub const fn end(&self) -> Instant {
        self.end
    }

    /// The signed time from start to end.
    #[must_use]
    pub fn length(&self) -> SignedDuration {
        self.end.timestamp().duration_since(self.start.timestamp())
    }

    /// The same interval with both endpoints written in UTC.
    #[must_use]
    pub const fn to_utc(self) -> Self {
        Self::new(self.start.to_utc(), self.end.to_utc())
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{SEPARATOR}{}", self.start, self.end)
    }
}

impl FromStr for Interval {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Parse an interval in any of its three forms.
///
/// ## Errors
///
/// See [`Interval::parse`].
pub fn parse_interval(text: &str) -> Result<Interval, FormatError> {
    Interval::parse(text)
}

/// Format an interval as `<start>/<end>`.
#[must_use]
pub fn format_interval(interval: &Interval) -> String {
    interval.format()
}

/// The written form of an interval, tried in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Form {
    StartEnd,
    StartDuration,
    DurationEnd,
}

impl Form {
    const ALL: [Self; 3] = [Self::StartEnd, Self::StartDuration, Self::DurationEnd];

    fn resolve(self, head: &str, tail: &str) -> Option<Interval> {
        match self {
            Self::StartEnd => {
                let start = Instant::parse(head).ok()?;
                let end = Instant::parse(tail).ok()?;
                Some(Interval::new(start, end))
            }
            Self::StartDuration => {
                let start = Instant::parse(head).ok()?;
                let duration = CalendarDuration::parse(tail).ok()?;
                let end = start.checked_add(&duration).ok()?;
                Some(Interval::new(start, end))
            }
            Self::DurationEnd => {
                let duration = CalendarDuration::parse(head).ok()?;
                let end = Instant::parse(tail).ok()?;
                let start = end.checked_sub(&duration).ok()?;
                Some(Interval::new(start, end))
            }
        }
    }
}
