// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

/// Errors raised while parsing ISO 8601 durations, instants and intervals.
///
/// Every variant carries the offending source text.
#[non_exhaustive]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The duration text does not start with the period marker `P`.
    #[error("'{0}' does not start with the period marker 'P'")]
    MissingPeriodMarker(String),

    /// A designator section is malformed, holds a non-numeric magnitude, or
    /// mixes the week form with other designators.
    #[error("'{0}' is not a valid duration, expected PnYnMnDTnHnMnS or PnW")]
    InvalidDuration(String),

    /// A month magnitude was fractional. Months have no uniform length, so
    /// there is nothing to carry the fraction into.
    #[error("'{0}' has a fractional month, fractions aren't supported for the month position")]
    UnsupportedMonthFraction(String),

    /// The interval text is not `<start>/<end>`, `<start>/<duration>` or
    /// `<duration>/<end>`.
    #[error("'{0}' is not a valid interval, expected <start>/<end>, <start>/<duration> or <duration>/<end>")]
    InvalidInterval(String),

    /// The instant text is not an offset-qualified date-time.
    #[error("'{0}' is not a valid instant, expected YYYY-MM-DDTHH:MM:SS followed by 'Z' or a UTC offset")]
    InvalidInstant(String),

    /// Calendar arithmetic left the supported range of instants.
    #[error("{0} is out of the supported range")]
    OutOfRange(String),
}
