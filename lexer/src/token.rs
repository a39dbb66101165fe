//! Token types.

use core::fmt;

use crate::Spanned;

/// Numeric literal recognized by the lexer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberLiteral {
    /// Integer literal, decimal or hexadecimal.
    Integer(i64),
    /// Decimal literal with a fractional part and / or an exponent.
    Float(f64),
}

impl fmt::Display for NumberLiteral {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(value) => fmt::Display::fmt(value, formatter),
            Self::Float(value) => fmt::Debug::fmt(value, formatter),
        }
    }
}

/// Reserved word. Keywords are matched case-insensitively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum Keyword {
    /// `true`
    True,
    /// `false`
    False,
    /// `infinity`
    Infinity,
    /// `nan`
    NaN,
    /// `if`
    If,
    /// `else`
    Else,
    /// `return`
    Return,
}

impl Keyword {
    const ALL: [Self; 7] = [
        Self::True,
        Self::False,
        Self::Infinity,
        Self::NaN,
        Self::If,
        Self::Else,
        Self::Return,
    ];

    /// Returns the canonical (lowercase) spelling of the keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::True => "true",
            Self::False => "false",
            Self::Infinity => "infinity",
            Self::NaN => "nan",
            Self::If => "if",
            Self::Else => "else",
            Self::Return => "return",
        }
    }

    /// Attempts to interpret `word` as a keyword, ignoring ASCII case.
    pub fn from_word(word: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|keyword| keyword.as_str().eq_ignore_ascii_case(word))
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq)]
#[non_exhaustive]
pub enum TokenKind {
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `;`
    Semicolon,
    /// `=`
    Assign,

    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// `&`
    Amp,
    /// `&&`
    AmpAmp,
    /// `|`
    Pipe,
    /// `||`
    PipePipe,
    /// `^`
    Caret,
    /// `!`
    Bang,
    /// `~`
    Tilde,
    /// `<<`
    ShiftLeft,
    /// `>>`
    ShiftRight,
    /// `>>>`
    UnsignedShiftRight,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `==`
    Equal,
    /// `===`
    StrictEqual,
    /// `!=`
    NotEqual,
    /// `!==`
    StrictNotEqual,

    /// Reserved word.
    Keyword(Keyword),
    /// Identifier, such as `foo` or `_bar1`.
    Identifier,
    /// Numeric literal.
    Number(NumberLiteral),
}

impl TokenKind {
    /// Punctuation and operators, sorted so that longer lexemes go first.
    pub(crate) const SYMBOLS: [(&'static str, Self); 30] = [
        (">>>", Self::UnsignedShiftRight),
        ("===", Self::StrictEqual),
        ("!==", Self::StrictNotEqual),
        ("&&", Self::AmpAmp),
        ("||", Self::PipePipe),
        ("<<", Self::ShiftLeft),
        (">>", Self::ShiftRight),
        ("<=", Self::LessEqual),
        (">=", Self::GreaterEqual),
        ("==", Self::Equal),
        ("!=", Self::NotEqual),
        ("(", Self::LeftParen),
        (")", Self::RightParen),
        ("{", Self::LeftBrace),
        ("}", Self::RightBrace),
        (",", Self::Comma),
        (";", Self::Semicolon),
        ("=", Self::Assign),
        ("+", Self::Plus),
        ("-", Self::Minus),
        ("*", Self::Star),
        ("/", Self::Slash),
        ("%", Self::Percent),
        ("&", Self::Amp),
        ("|", Self::Pipe),
        ("^", Self::Caret),
        ("!", Self::Bang),
        ("~", Self::Tilde),
        ("<", Self::Less),
        (">", Self::Greater),
    ];

    /// Returns the fixed lexeme of this token kind, if it has one.
    pub fn as_symbol(&self) -> Option<&'static str> {
        Self::SYMBOLS
            .iter()
            .find_map(|(symbol, kind)| (kind == self).then_some(*symbol))
    }

    /// Checks whether this token is an identifier.
    pub fn is_identifier(&self) -> bool {
        matches!(self, Self::Identifier)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(keyword) => write!(formatter, "`{keyword}`"),
            Self::Identifier => formatter.write_str("identifier"),
            Self::Number(_) => formatter.write_str("number"),
            other => {
                let symbol = other.as_symbol().unwrap_or("?");
                write!(formatter, "`{symbol}`")
            }
        }
    }
}

/// Token together with its span in the source code.
pub type Token<'a> = Spanned<'a, TokenKind>;
