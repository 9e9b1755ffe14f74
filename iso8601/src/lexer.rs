// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Lexer for the body of ISO 8601 durations (everything after the leading `P`).

use std::fmt::{self, Display};

use logos::Logos;

/// Tokenize a duration body into `SpannedToken`s.
///
/// Characters that belong to no token are reported as `Token::Error` rather
/// than stopping the stream, so the scanner can point at them.
pub fn tokenize(src: &str) -> impl Iterator<Item = SpannedToken<'_>> {
    Token::lexer(src).spanned().map(|(tok, span)| match tok {
        Ok(tok) => SpannedToken(tok, Span::new(span.start, span.end)),
        Err(()) => SpannedToken(Token::Error, Span::new(span.start, span.end)),
    })
}

/// Token emitted by the duration lexer
#[derive(PartialEq, Eq, Clone, Copy, Logos)]
pub enum Token<'a> {
    /// Unsigned decimal magnitude, `.` as the decimal mark
    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Number(&'a str),

    /// Time section marker (T)
    #[token("T")]
    Time,

    /// Year designator (Y)
    #[token("Y")]
    Year,

    /// Month or minute designator (M), depending on the section
    #[token("M")]
    MonthOrMinute,

    /// Week designator (W)
    #[token("W")]
    Week,

    /// Day designator (D)
    #[token("D")]
    Day,

    /// Hour designator (H)
    #[token("H")]
    Hour,

    /// Second designator (S)
    #[token("S")]
    Second,

    /// Error token for lexing errors
    Error,
}

impl Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(s) => write!(f, "Number({s})"),
            Self::Time => write!(f, "T"),
            Self::Year => write!(f, "Y"),
            Self::MonthOrMinute => write!(f, "M"),
            Self::Week => write!(f, "W"),
            Self::Day => write!(f, "D"),
            Self::Hour => write!(f, "H"),
            Self::Second => write!(f, "S"),
            Self::Error => write!(f, "Error"),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

/// Byte range of a token in the duration body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    /// Start offset, inclusive
    pub start: usize,
    /// End offset, exclusive
    pub end: usize,
}

impl Span {
    /// Create a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

/// A token with its associated span in the duration body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpannedToken<'src>(pub Token<'src>, pub Span);

impl Display for SpannedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.0, self.1)
    }
}
