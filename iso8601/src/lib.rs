// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Parse and format ISO 8601 durations and time intervals.
//!
//! ```
//! use isochron_iso8601::{CalendarDuration, Interval};
//!
//! let duration = CalendarDuration::parse("PT0.5H45S").unwrap();
//! assert_eq!(duration.minutes, Some(30));
//! assert_eq!(duration.seconds, Some(45));
//! assert_eq!(duration.format(false), "PT30M45S");
//!
//! let interval = Interval::parse("2016-04-08T10:25:30+09:00/PT32S").unwrap();
//! assert_eq!(interval.length().as_secs(), 32);
//! ```

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(clippy::single_match_else, clippy::match_bool)]

mod duration;
mod error;
mod instant;
mod interval;
pub mod lexer;
#[cfg(feature = "serde")]
mod serde_impl;

pub use crate::duration::{
    CalendarDuration, FormatOptions, ZERO_DURATION, format_duration, parse_duration,
};
pub use crate::error::FormatError;
pub use crate::instant::Instant;
pub use crate::interval::{Interval, format_interval, parse_interval};
