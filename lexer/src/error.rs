//! Error handling.

use nom::{
    error::{ErrorKind as NomErrorKind, ParseError},
    Slice,
};

use core::fmt;

use crate::{InputSpan, Location, Spanned};

/// Lexing error kind.
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Input is not in ASCII.
    NonAsciiInput,
    /// Error converting a numeric literal.
    Literal(anyhow::Error),
    /// No token starts with this character.
    UnexpectedChar,
    /// Block comment is not terminated with `*/`.
    UnfinishedComment,
    /// Other lexing error.
    Other {
        /// `nom`-defined error kind.
        kind: NomErrorKind,
    },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonAsciiInput => formatter.write_str("Non-ASCII inputs are not supported"),
            Self::Literal(err) => write!(formatter, "Invalid literal: {err}"),
            Self::UnexpectedChar => formatter.write_str("Unexpected character"),
            Self::UnfinishedComment => formatter.write_str("Unfinished block comment"),
            Self::Other { .. } => formatter.write_str("Cannot tokenize sequence"),
        }
    }
}

impl std::error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Literal(err) => Some(err.as_ref()),
            _ => None,
        }
    }
}

/// Lexing error with the associated code span.
#[derive(Debug)]
pub struct SpannedError<'a> {
    inner: Spanned<'a, ErrorKind>,
}

impl<'a> SpannedError<'a> {
    pub(crate) fn new(span: InputSpan<'a>, kind: ErrorKind) -> Self {
        Self {
            inner: Spanned::new(span, kind),
        }
    }

    /// Returns the kind of this error.
    pub fn kind(&self) -> &ErrorKind {
        &self.inner.extra
    }

    /// Returns the span of this error.
    pub fn span(&self) -> Spanned<'a> {
        self.inner.with_no_extra()
    }

    /// Returns the position of this error in the source.
    pub fn location(&self) -> Location {
        Location::from(&self.inner)
    }
}

impl fmt::Display for SpannedError<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            formatter,
            "{}:{}: {}",
            self.inner.location_line(),
            self.inner.get_column(),
            self.inner.extra
        )
    }
}

impl std::error::Error for SpannedError<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(&self.inner.extra)
    }
}

impl<'a> ParseError<InputSpan<'a>> for SpannedError<'a> {
    fn from_error_kind(mut input: InputSpan<'a>, kind: NomErrorKind) -> Self {
        if !input.fragment().is_empty() {
            // Truncate the error span to the first offending char.
            let len = input.fragment().chars().next().map_or(0, char::len_utf8);
            input = input.slice(..len);
        }

        let error_kind = match kind {
            NomErrorKind::Char | NomErrorKind::Tag | NomErrorKind::Alt => ErrorKind::UnexpectedChar,
            NomErrorKind::TakeUntil => ErrorKind::UnfinishedComment,
            _ => ErrorKind::Other { kind },
        };
        SpannedError::new(input, error_kind)
    }

    fn append(_: InputSpan<'a>, _: NomErrorKind, other: Self) -> Self {
        other
    }
}
