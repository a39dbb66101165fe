//! Tokenizer for scalar expressions.
//!
//! The lexer splits source code into [`Token`]s, each of which carries its [`TokenKind`]
//! together with the code fragment and its position in the source ([`Spanned`]).
//! The token stream is consumed by the compiler in the `scalar-expr` crate.
//!
//! # Lexical structure
//!
//! - Whitespace, `// line` and `/* block */` comments are skipped.
//! - Identifiers match `[A-Za-z_][A-Za-z0-9_]*`.
//! - Keywords `true`, `false`, `infinity`, `nan`, `if`, `else` and `return`
//!   are recognized regardless of case.
//! - Numbers are decimal integers (`42`), decimals with a fraction and / or an exponent
//!   (`1.5`, `2e-3`) and hexadecimal integers (`0xff`). Hex literals can use all 64 bits;
//!   those not fitting into `i64` wrap around.
//! - Operators are matched greedily, so that `>>>` is a single token rather than `>>` and `>`.
//!
//! # Examples
//!
//! ```
//! use scalar_expr_lexer::{tokenize, Keyword, TokenKind};
//!
//! let tokens = tokenize("IF (x >= 1) { y = 0x1F; }")?;
//! assert_eq!(tokens.len(), 12);
//! assert_eq!(tokens[0].extra, TokenKind::Keyword(Keyword::If));
//! assert_eq!(*tokens[9].fragment(), "0x1F");
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

#![doc(html_root_url = "https://docs.rs/scalar-expr-lexer/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

pub use crate::{
    error::{ErrorKind, SpannedError},
    lexer::{tokenize, Lexer},
    spans::{InputSpan, LocatedSpan, Location, NomResult, Spanned},
    token::{Keyword, NumberLiteral, Token, TokenKind},
};

mod error;
mod lexer;
mod spans;
mod token;
