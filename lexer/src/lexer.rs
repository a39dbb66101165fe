//! `nom`-based lexer.

use nom::{
    branch::alt,
    bytes::complete::{tag, tag_no_case, take, take_until, take_while, take_while1},
    character::complete::{char as tag_char, digit0, digit1, hex_digit1, one_of},
    combinator::{consumed, cut, map, opt, peek, recognize},
    error::{ErrorKind as NomErrorKind, ParseError},
    multi::many0,
    sequence::{delimited, pair, preceded, tuple},
    Err as NomErr, Parser,
};

use crate::{
    ErrorKind, InputSpan, Keyword, NomResult, NumberLiteral, Spanned, SpannedError, Token,
    TokenKind,
};

/// Whitespace and comments.
fn ws(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    let comment = preceded(tag("//"), take_while(|c: char| c != '\n'));
    let long_comment = delimited(tag("/*"), cut(take_until("*/")), tag("*/"));
    let ws_line = alt((
        take_while1(|c: char| c.is_ascii_whitespace()),
        comment,
        long_comment,
    ));
    recognize(many0(ws_line)).parse(input)
}

fn hex_number(input: InputSpan<'_>) -> NomResult<'_, NumberLiteral> {
    let (rest, digits) = preceded(tag_no_case("0x"), cut(hex_digit1)).parse(input)?;
    let value = u64::from_str_radix(digits.fragment(), 16).map_err(|err| {
        NomErr::Failure(SpannedError::new(digits, ErrorKind::Literal(err.into())))
    })?;
    // Literals wider than `i64::MAX` wrap around to negative numbers.
    #[allow(clippy::cast_possible_wrap)]
    let value = value as i64;
    Ok((rest, NumberLiteral::Integer(value)))
}

fn decimal_number(input: InputSpan<'_>) -> NomResult<'_, NumberLiteral> {
    let fraction = pair(tag_char('.'), digit0);
    let exponent = tuple((one_of("eE"), opt(one_of("+-")), cut(digit1)));
    let (rest, (literal, (_, fraction, exponent))) =
        consumed(tuple((digit1, opt(fraction), opt(exponent)))).parse(input)?;

    let literal_str = *literal.fragment();
    let number = if fraction.is_some() || exponent.is_some() {
        literal_str.parse::<f64>().map(NumberLiteral::Float).map_err(anyhow::Error::from)
    } else {
        literal_str
            .parse::<i64>()
            .map(NumberLiteral::Integer)
            .map_err(anyhow::Error::from)
    };
    let number = number
        .map_err(|err| NomErr::Failure(SpannedError::new(literal, ErrorKind::Literal(err))))?;
    Ok((rest, number))
}

fn number(input: InputSpan<'_>) -> NomResult<'_, NumberLiteral> {
    alt((hex_number, decimal_number)).parse(input)
}

/// Identifier or keyword, like `a_foo`, `Bar` or `RETURN`.
fn word(input: InputSpan<'_>) -> NomResult<'_, InputSpan<'_>> {
    preceded(
        peek(one_of("abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ_")),
        take_while1(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    )
    .parse(input)
}

fn symbol(input: InputSpan<'_>) -> NomResult<'_, TokenKind> {
    for (lexeme, kind) in TokenKind::SYMBOLS {
        if input.fragment().starts_with(lexeme) {
            let (rest, _) = take(lexeme.len())(input)?;
            return Ok((rest, kind));
        }
    }
    Err(NomErr::Error(SpannedError::from_error_kind(
        input,
        NomErrorKind::Tag,
    )))
}

fn token(input: InputSpan<'_>) -> NomResult<'_, Token<'_>> {
    let number = map(number, TokenKind::Number);
    let word = map(word, |word: InputSpan<'_>| {
        Keyword::from_word(word.fragment()).map_or(TokenKind::Identifier, TokenKind::Keyword)
    });
    let (rest, (span, kind)) = consumed(alt((number, word, symbol))).parse(input)?;
    Ok((rest, Spanned::new(span, kind)))
}

fn unwrap_nom_error<'a>(
    err: NomErr<SpannedError<'a>>,
    input: InputSpan<'a>,
) -> SpannedError<'a> {
    match err {
        NomErr::Error(err) | NomErr::Failure(err) => err,
        // Only complete parsers are used, so this cannot occur in practice.
        NomErr::Incomplete(_) => SpannedError::from_error_kind(input, NomErrorKind::Complete),
    }
}

/// Iterator over tokens in the source code.
///
/// Whitespace, `// line` and `/* block */` comments are skipped. Iteration stops
/// after the first error.
///
/// # Examples
///
/// ```
/// # use scalar_expr_lexer::{Keyword, Lexer, NumberLiteral, TokenKind};
/// let tokens: Vec<_> = Lexer::new("return x + 0x10;")
///     .map(|token| token.map(|token| token.extra))
///     .collect::<Result<_, _>>()?;
/// assert_eq!(
///     tokens,
///     [
///         TokenKind::Keyword(Keyword::Return),
///         TokenKind::Identifier,
///         TokenKind::Plus,
///         TokenKind::Number(NumberLiteral::Integer(16)),
///         TokenKind::Semicolon,
///     ]
/// );
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    rest: InputSpan<'a>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over the provided source code.
    pub fn new(source: &'a str) -> Self {
        Self {
            rest: InputSpan::new(source),
            finished: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, SpannedError<'a>> {
        let (rest, _) = ws(self.rest).map_err(|err| unwrap_nom_error(err, self.rest))?;
        self.rest = rest;
        let Some(first_char) = rest.fragment().chars().next() else {
            return Ok(None);
        };
        if !first_char.is_ascii() {
            let (_, char_span) = take::<_, _, SpannedError<'_>>(1_usize)(rest)
                .map_err(|err| unwrap_nom_error(err, rest))?;
            return Err(SpannedError::new(char_span, ErrorKind::NonAsciiInput));
        }

        let (rest, token) = token(rest).map_err(|err| unwrap_nom_error(err, rest))?;
        self.rest = rest;
        Ok(Some(token))
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, SpannedError<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let item = self.next_token().transpose();
        if !matches!(item, Some(Ok(_))) {
            self.finished = true;
        }
        item
    }
}

/// Tokenizes the provided code completely.
pub fn tokenize(source: &str) -> Result<Vec<Token<'_>>, SpannedError<'_>> {
    Lexer::new(source).collect()
}
