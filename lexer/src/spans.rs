//! Types related to spanning tokenized code.

use crate::SpannedError;

/// Code span used as the `nom` input.
pub type InputSpan<'a> = nom_locate::LocatedSpan<&'a str, ()>;
/// Lexing outcome generalized by the type returned on success.
pub type NomResult<'a, T> = nom::IResult<InputSpan<'a>, T, SpannedError<'a>>;

/// Code fragment together with its position in the source.
///
/// Unlike `LocatedSpan` from [`nom_locate`], this type does not allow to reach
/// the surrounding code, so it is safe to copy and compare freely.
///
/// [`nom_locate`]: https://crates.io/crates/nom_locate
#[derive(Debug, Clone, Copy)]
pub struct LocatedSpan<Span, T = ()> {
    offset: usize,
    line: u32,
    column: usize,
    fragment: Span,

    /// Extra information attached to the span, e.g., the token kind.
    pub extra: T,
}

impl<Span: PartialEq, T: PartialEq> PartialEq for LocatedSpan<Span, T> {
    fn eq(&self, other: &Self) -> bool {
        self.offset == other.offset && self.fragment == other.fragment && self.extra == other.extra
    }
}

impl<Span, T> LocatedSpan<Span, T> {
    /// Byte offset of the fragment start relative to the lexer input. Starts at 0.
    pub fn location_offset(&self) -> usize {
        self.offset
    }

    /// Line of the fragment start. Starts at 1.
    pub fn location_line(&self) -> u32 {
        self.line
    }

    /// Column of the fragment start. Starts at 1.
    pub fn get_column(&self) -> usize {
        self.column
    }

    /// The spanned part of the input.
    pub fn fragment(&self) -> &Span {
        &self.fragment
    }
}

impl<Span: Copy, T> LocatedSpan<Span, T> {
    /// Copies this span with the provided `extra` field.
    pub fn copy_with_extra<U>(&self, value: U) -> LocatedSpan<Span, U> {
        LocatedSpan {
            offset: self.offset,
            line: self.line,
            column: self.column,
            fragment: self.fragment,
            extra: value,
        }
    }

    /// Removes `extra` field from this span.
    pub fn with_no_extra(&self) -> LocatedSpan<Span> {
        self.copy_with_extra(())
    }
}

/// Value with an associated code span.
pub type Spanned<'a, T = ()> = LocatedSpan<&'a str, T>;

impl<'a, T> Spanned<'a, T> {
    pub(crate) fn new(span: InputSpan<'a>, extra: T) -> Self {
        Self {
            offset: span.location_offset(),
            line: span.location_line(),
            column: span.get_utf8_column(),
            fragment: *span.fragment(),
            extra,
        }
    }
}

impl<'a, T> From<nom_locate::LocatedSpan<&'a str, T>> for Spanned<'a, T> {
    fn from(value: nom_locate::LocatedSpan<&'a str, T>) -> Self {
        Self {
            offset: value.location_offset(),
            line: value.location_line(),
            column: value.get_utf8_column(),
            fragment: *value.fragment(),
            extra: value.extra,
        }
    }
}

/// Owned version of the span position, without the code fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// Line number, starting at 1.
    pub line: u32,
    /// Column number, starting at 1.
    pub column: usize,
}

impl<Span, T> From<&LocatedSpan<Span, T>> for Location {
    fn from(span: &LocatedSpan<Span, T>) -> Self {
        Self {
            line: span.line,
            column: span.column,
        }
    }
}

impl core::fmt::Display for Location {
    fn fmt(&self, formatter: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(formatter, "{}:{}", self.line, self.column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spans_track_lines_and_columns() {
        let input = InputSpan::new("a\n  bc");
        let span = Spanned::new(input, ());
        assert_eq!(span.location_line(), 1);
        assert_eq!(span.get_column(), 1);

        let (rest, _) = nom::bytes::complete::take::<_, _, nom::error::Error<_>>(4_usize)(input)
            .unwrap();
        let span = Spanned::from(rest);
        assert_eq!(*span.fragment(), "bc");
        assert_eq!(Location::from(&span), Location { line: 2, column: 3 });
        assert_eq!(Location::from(&span).to_string(), "2:3");
    }

    #[test]
    fn replacing_extra_keeps_position() {
        let span = Spanned::new(InputSpan::new("foo"), 1_u8).copy_with_extra(2_u8);
        assert_eq!(span.extra, 2);
        assert_eq!(*span.fragment(), "foo");
        let no_extra = span.with_no_extra();
        assert_eq!(no_extra.location_offset(), 0);
    }
}
