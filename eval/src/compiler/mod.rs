//! Compilation of token streams into [`Expression`]s.

use core::fmt;
use std::sync::Arc;

use bitflags::bitflags;
use scalar_expr_lexer::{Lexer, Token};

use crate::{
    env::VariableContext,
    error::ParseError,
    exec::{Branch, Node, Stack},
    fns::{EmptyResolver, FunctionResolver},
    Expression, Value,
};

mod expr;

use self::expr::Parser;

bitflags! {
    /// Options controlling post-processing of compiled expressions.
    ///
    /// The default value enables all options.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct CompileOptions: u8 {
        /// Evaluate expressions without variable reads and non-foldable function calls
        /// at compile time, turning them into literals.
        const FOLD_CONSTANTS = 1 << 0;
        /// Return [interned](Expression::intern()) expressions.
        const INTERN = 1 << 1;
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self::all()
    }
}

/// Compiler of phrases (single expressions) and statement blocks.
///
/// # Examples
///
/// ```
/// use scalar_expr::{fns::CommonFunctions, Compiler, Value};
///
/// let compiler = Compiler::with_resolver(&CommonFunctions);
/// let expr = compiler.parse_block(r#"
///     if (min(x, 3) > 2) {
///         return 1;
///     } else {
///         y = x * 0.5;
///     }
///     return y;
/// "#)?;
///
/// let mut context = [("x", Value::integer(5))].into_iter().collect();
/// assert_eq!(expr.evaluate_in(&mut context)?, Value::integer(1));
/// let mut context = [("x", Value::integer(-5))].into_iter().collect();
/// assert_eq!(expr.evaluate_in(&mut context)?, Value::float(-2.5));
///
/// // Constant expressions are folded into literals.
/// let expr = compiler.parse_phrase("max(2, 3) * 4")?;
/// assert_eq!(expr.as_literal(), Some(Value::integer(12)));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct Compiler<'r> {
    resolver: &'r dyn FunctionResolver,
    options: CompileOptions,
}

impl fmt::Debug for Compiler<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Compiler")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Compiler<'_> {
    fn default() -> Self {
        Compiler::new()
    }
}

impl Compiler<'static> {
    /// Creates a compiler without functions and with default options.
    pub fn new() -> Self {
        Self::with_resolver(&EmptyResolver)
    }
}

impl<'r> Compiler<'r> {
    /// Creates a compiler using the specified function resolver.
    pub fn with_resolver(resolver: &'r dyn FunctionResolver) -> Self {
        Self {
            resolver,
            options: CompileOptions::default(),
        }
    }

    /// Sets compilation options.
    #[must_use]
    pub fn with_options(mut self, options: CompileOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the compilation options.
    pub fn options(&self) -> CompileOptions {
        self.options
    }

    /// Compiles a single phrase from the source code.
    pub fn parse_phrase(&self, source: &str) -> Result<Arc<Expression>, ParseError> {
        let tokens = tokenize(source)?;
        let nodes = Parser::new(&tokens, self.resolver).top_phrase()?;
        Ok(self.finish(nodes, Some(source)))
    }

    /// Compiles a block of statements from the source code.
    pub fn parse_block(&self, source: &str) -> Result<Arc<Expression>, ParseError> {
        let tokens = tokenize(source)?;
        let nodes = Parser::new(&tokens, self.resolver).top_block()?;
        Ok(self.finish(nodes, Some(source)))
    }

    /// Compiles a single phrase from a token stream. The stream must be exhausted
    /// by the phrase.
    pub fn compile_phrase<'a>(
        &self,
        tokens: impl IntoIterator<Item = Token<'a>>,
    ) -> Result<Arc<Expression>, ParseError> {
        let tokens: Vec<_> = tokens.into_iter().collect();
        let nodes = Parser::new(&tokens, self.resolver).top_phrase()?;
        Ok(self.finish(nodes, None))
    }

    /// Compiles a block of statements from a token stream. The block may be enclosed
    /// in braces.
    pub fn compile_block<'a>(
        &self,
        tokens: impl IntoIterator<Item = Token<'a>>,
    ) -> Result<Arc<Expression>, ParseError> {
        let tokens: Vec<_> = tokens.into_iter().collect();
        let nodes = Parser::new(&tokens, self.resolver).top_block()?;
        Ok(self.finish(nodes, None))
    }

    fn finish(&self, nodes: Vec<Node>, source: Option<&str>) -> Arc<Expression> {
        let root = Branch::unconditional(nodes);
        let mut expr = if self.options.contains(CompileOptions::FOLD_CONSTANTS) {
            fold(root)
        } else {
            Expression::from_branch(root)
        };
        if let Some(source) = source {
            expr = expr.with_source(source);
        }

        let expr = Arc::new(expr);
        if self.options.contains(CompileOptions::INTERN) {
            expr.intern()
        } else {
            expr
        }
    }
}

fn tokenize(source: &str) -> Result<Vec<Token<'_>>, ParseError> {
    Lexer::new(source)
        .collect::<Result<_, _>>()
        .map_err(ParseError::from)
}

fn fold(root: Branch) -> Expression {
    if !root.is_foldable() {
        return Expression::from_branch(root);
    }

    let mut stack = Stack::new();
    let mut context = VariableContext::new();
    let output = root.execute(&mut stack, &mut context).map(|_| {
        context
            .return_value()
            .or_else(|| stack.peek())
            .unwrap_or(Value::FALSE)
    });
    match output {
        Ok(value) => {
            tracing::debug!(%value, "folded constant expression");
            Expression::literal(value)
        }
        Err(err) => {
            tracing::warn!(%err, "failed folding constant expression; keeping compiled nodes");
            Expression::from_branch(root)
        }
    }
}
