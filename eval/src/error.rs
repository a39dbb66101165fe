//! Compilation and evaluation errors.

use core::fmt;

use scalar_expr_lexer::{Location, Spanned, SpannedError};

/// Kind of a compilation [`Diagnostic`].
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum ErrorKind {
    /// Error produced by the lexer.
    Lex(String),
    /// Token that is invalid at the current position.
    UnexpectedToken {
        /// Human-readable description of what was expected.
        expected: &'static str,
        /// Code fragment of the encountered token.
        found: String,
    },
    /// Input ended prematurely.
    UnexpectedEnd {
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
    /// Operators and operands do not form a valid expression, e.g., `1 +` or `()`.
    InvalidExpression,
    /// Assignment to a name that resolves to a function.
    FunctionAssignment {
        /// Function name.
        name: String,
    },
    /// Explanatory note attached to a preceding diagnostic.
    Note(String),
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex(message) => formatter.write_str(message),
            Self::UnexpectedToken { expected, found } => {
                write!(formatter, "expected {expected}, got `{found}`")
            }
            Self::UnexpectedEnd { expected } => {
                write!(formatter, "expected {expected}, got end of input")
            }
            Self::InvalidExpression => formatter.write_str("expected valid expression"),
            Self::FunctionAssignment { name } => write!(
                formatter,
                "expected variable or expression statement; `{name}` is a function name"
            ),
            Self::Note(message) => write!(formatter, "note: {message}"),
        }
    }
}

/// Single message about a compilation failure.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    kind: ErrorKind,
    location: Option<Location>,
}

impl Diagnostic {
    pub(crate) fn new(kind: ErrorKind, location: Option<Location>) -> Self {
        Self { kind, location }
    }

    /// Returns the kind of this diagnostic.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the location of the code this diagnostic refers to, if any.
    pub fn location(&self) -> Option<Location> {
        self.location
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(location) = self.location {
            write!(formatter, "{location}: ")?;
        }
        fmt::Display::fmt(&self.kind, formatter)
    }
}

/// Error compiling source code or a token stream.
///
/// The error contains one or more [`Diagnostic`]s: the first one describes the failure,
/// and the following ones provide context for it. When displayed, each diagnostic
/// is printed on a separate line.
///
/// # Examples
///
/// ```
/// # use scalar_expr::{parse_expression_block, ErrorKind};
/// let err = parse_expression_block("x = 1 +;", None).unwrap_err();
/// assert_eq!(err.diagnostics()[0].kind(), &ErrorKind::InvalidExpression);
/// assert_eq!(err.to_string(), "1:8: expected valid expression");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    diagnostics: Vec<Diagnostic>,
}

impl ParseError {
    pub(crate) fn new<T>(kind: ErrorKind, span: Option<&Spanned<'_, T>>) -> Self {
        Self {
            diagnostics: vec![Diagnostic::new(kind, span.map(Location::from))],
        }
    }

    #[must_use]
    pub(crate) fn with_note<T>(mut self, message: String, span: &Spanned<'_, T>) -> Self {
        let location = Some(Location::from(span));
        self.diagnostics
            .push(Diagnostic::new(ErrorKind::Note(message), location));
        self
    }

    /// Returns all diagnostics in this error. The returned slice is never empty.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Returns the main diagnostic of this error.
    pub fn main_diagnostic(&self) -> &Diagnostic {
        &self.diagnostics[0]
    }
}

impl From<SpannedError<'_>> for ParseError {
    fn from(err: SpannedError<'_>) -> Self {
        let kind = ErrorKind::Lex(err.kind().to_string());
        Self {
            diagnostics: vec![Diagnostic::new(kind, Some(err.location()))],
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, diagnostic) in self.diagnostics.iter().enumerate() {
            if i > 0 {
                formatter.write_str("\n")?;
            }
            fmt::Display::fmt(diagnostic, formatter)?;
        }
        Ok(())
    }
}

impl std::error::Error for ParseError {}

/// Errors that can occur during evaluation of compiled expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum EvalError {
    /// Operation attempted to pop a value from an empty stack. This indicates
    /// a malformed node sequence or a misbehaving native function.
    StackUnderflow {
        /// Name of the operation that failed.
        operation: String,
    },
    /// Native function has reported an error.
    Native {
        /// Function name.
        function: String,
        /// Error message.
        message: String,
    },
}

impl EvalError {
    pub(crate) fn stack_underflow(operation: impl Into<String>) -> Self {
        Self::StackUnderflow {
            operation: operation.into(),
        }
    }

    /// Creates a native function error.
    pub fn native(function: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Native {
            function: function.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StackUnderflow { operation } => {
                write!(formatter, "stack underflow while executing {operation}")
            }
            Self::Native { function, message } => {
                write!(formatter, "failed executing native function `{function}`: {message}")
            }
        }
    }
}

impl std::error::Error for EvalError {}

/// Result of evaluating an expression.
pub type EvalResult<T> = Result<T, EvalError>;
