//! Compiler and stack-based evaluator for scalar expressions.
//!
//! # How it works
//!
//! 1. Source code is split into tokens by the [`scalar-expr-lexer`] crate.
//! 2. The [`Compiler`] turns the tokens into a sequence of compiled [`Node`]s in postfix
//!   order, resolving function names with a [`FunctionResolver`]. If the nodes do not read
//!   variables or call impure functions, they are evaluated right away, and the resulting
//!   [`Expression`] is a literal.
//! 3. Expressions are [interned](Expression::intern()): expressions with equal compiled
//!   form share a single instance, identified by a content [`Digest`].
//! 4. An [`Expression`] is evaluated against a [`VariableContext`]. The evaluation [`Stack`]
//!   and the context can be reused across evaluations, so that a warmed-up evaluation
//!   does not allocate.
//!
//! # Syntax
//!
//! A *phrase* is an expression built from literals (`42`, `0x1f`, `1.5e3`, `true`, `false`,
//! `infinity`, `nan`), variables, function calls (`max(x, 1)`), parentheses and operators.
//! Binary operators, from the tightest binding to the loosest:
//!
//! | Operators | Description |
//! |-----------|-------------|
//! | `*` `/` `%` | Multiplication, division, remainder |
//! | `+` `-` | Addition, subtraction |
//! | `<<` `>>` `>>>` | Shifts |
//! | `<` `<=` `>` `>=` | Order comparisons |
//! | `==` `!=` `===` `!==` | Loose and strict equality |
//! | `&` | Bitwise AND |
//! | `^` | Bitwise XOR |
//! | `\|` | Bitwise OR |
//! | `&&` | Logical AND |
//! | `\|\|` | Logical OR |
//!
//! Unary operators `+` (absolute value), `-`, `!` and `~` bind tighter than all binary ones.
//!
//! A *block* is a list of statements, optionally enclosed in braces:
//!
//! - `name = phrase;` assigns a variable;
//! - `return phrase;` finishes evaluation with the specified output;
//! - `if (phrase) block` and `if (phrase) block else block` execute blocks conditionally.
//!
//! # Semantics
//!
//! [`Value`]s are booleans, 64-bit signed integers or 64-bit floats. Binary operations convert
//! operands to the wider kind (`Boolean < Integer < Float`) first; see [`Value`] docs for
//! the details, e.g., integer division by zero, which produces `NaN`.
//!
//! Undefined variables evaluate to `false`. The output of an expression is the operand of the
//! executed `return` statement, if any; otherwise, the last computed value of the phrase;
//! otherwise, `false`.
//!
//! # Examples
//!
//! ```
//! use scalar_expr::{env::VariableContext, fns::CommonFunctions, parse_expression_block, Value};
//!
//! let expr = parse_expression_block(
//!     r#"
//!     speed = clamp(speed + accel * dt, 0, 10);
//!     if (speed === 10) {
//!         return -1;
//!     }
//!     return speed;
//!     "#,
//!     Some(&CommonFunctions),
//! )?;
//!
//! let mut context = VariableContext::new();
//! context.set("dt", Value::float(0.5)).set("accel", Value::integer(4));
//! let outputs: Vec<_> = (0..6)
//!     .map(|_| expr.evaluate_in(&mut context))
//!     .collect::<Result<_, _>>()?;
//! assert_eq!(outputs[0], Value::float(2.0));
//! assert_eq!(outputs[4], Value::float(10.0));
//! // `clamp` returns its integer upper bound, which is strictly equal to `10`.
//! assert_eq!(outputs[5], Value::integer(-1));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```
//!
//! [`scalar-expr-lexer`]: https://docs.rs/scalar-expr-lexer/
//! [`Node`]: crate::exec::Node
//! [`FunctionResolver`]: crate::fns::FunctionResolver
//! [`VariableContext`]: crate::env::VariableContext
//! [`Stack`]: crate::exec::Stack

#![doc(html_root_url = "https://docs.rs/scalar-expr/0.1.0")]
#![warn(missing_docs, missing_debug_implementations)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]

use std::sync::Arc;

pub use self::{
    compiler::{CompileOptions, Compiler},
    digest::Digest,
    error::{Diagnostic, ErrorKind, EvalError, EvalResult, ParseError},
    expression::Expression,
    intern::InternTable,
    values::{Value, ValueKind},
};

mod compiler;
mod digest;
pub mod env;
pub mod error;
pub mod exec;
mod expression;
pub mod fns;
mod intern;
mod values;

use crate::fns::{EmptyResolver, FunctionResolver};

/// Compiles a single phrase with default [`CompileOptions`].
///
/// # Examples
///
/// ```
/// # use scalar_expr::{parse_single_expression, Value};
/// let expr = parse_single_expression("1 === 1.0 || 5 / 0 != 5 / 0", None)?;
/// assert_eq!(expr.as_literal(), Some(Value::TRUE));
/// # Ok::<_, scalar_expr::ParseError>(())
/// ```
pub fn parse_single_expression(
    source: &str,
    resolver: Option<&dyn FunctionResolver>,
) -> Result<Arc<Expression>, ParseError> {
    Compiler::with_resolver(resolver.unwrap_or(&EmptyResolver)).parse_phrase(source)
}

/// Compiles a block of statements with default [`CompileOptions`].
pub fn parse_expression_block(
    source: &str,
    resolver: Option<&dyn FunctionResolver>,
) -> Result<Arc<Expression>, ParseError> {
    Compiler::with_resolver(resolver.unwrap_or(&EmptyResolver)).parse_block(source)
}
