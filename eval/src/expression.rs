//! Compiled expressions.

use core::{fmt, hash};
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::{
    env::VariableContext,
    error::EvalResult,
    exec::{
        serial::{self, CanonicalWriter},
        Branch, Stack,
    },
    Digest, InternTable, Value,
};

#[derive(Debug)]
enum Repr {
    Literal(Value),
    Nodes(Branch),
}

/// Compiled expression: either a literal [`Value`] or a root [`Branch`] of compiled nodes.
///
/// Expressions are produced by the [`Compiler`](crate::Compiler) and are immutable. They are
/// compared and hashed by their [`Digest`]: two expressions with the same digest are
/// interchangeable, and [interning](Self::intern()) maps them to a single canonical instance.
///
/// # Examples
///
/// ```
/// use scalar_expr::{env::VariableContext, exec::Stack, parse_expression_block, Value};
///
/// let expr = parse_expression_block("if (x > 0) { y = x * 2; } return y;", None)?;
/// assert!(!expr.is_literal());
///
/// let mut stack = Stack::new();
/// let mut context = VariableContext::new();
/// context.set("y", Value::integer(0));
/// for x in 0..3 {
///     context.set("x", Value::integer(x));
///     let output = expr.evaluate_with(&mut stack, &mut context)?;
///     assert_eq!(output, context["y"]);
/// }
/// assert_eq!(context["y"], Value::integer(4));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Expression {
    repr: Repr,
    source: Option<String>,
    digest: OnceCell<Digest>,
}

impl Expression {
    /// Creates an expression that always evaluates to the specified value.
    pub fn literal(value: Value) -> Self {
        Self::new(Repr::Literal(value))
    }

    /// Creates an expression executing the specified root branch.
    pub fn from_branch(root: Branch) -> Self {
        Self::new(Repr::Nodes(root))
    }

    fn new(repr: Repr) -> Self {
        Self {
            repr,
            source: None,
            digest: OnceCell::new(),
        }
    }

    /// Attaches the source code to this expression. The source is informational; it does not
    /// influence the digest.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the source code of this expression, if it is known.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Checks whether this expression is a literal.
    pub fn is_literal(&self) -> bool {
        matches!(self.repr, Repr::Literal(_))
    }

    /// Returns the literal value of this expression, if it is a literal.
    pub fn as_literal(&self) -> Option<Value> {
        match self.repr {
            Repr::Literal(value) => Some(value),
            Repr::Nodes(_) => None,
        }
    }

    /// Returns the root branch of this expression, unless it is a literal.
    pub fn root(&self) -> Option<&Branch> {
        match &self.repr {
            Repr::Literal(_) => None,
            Repr::Nodes(root) => Some(root),
        }
    }

    /// Evaluates this expression with a fresh stack and an empty variable context.
    pub fn evaluate(&self) -> EvalResult<Value> {
        self.evaluate_in(&mut VariableContext::new())
    }

    /// Evaluates this expression with a fresh stack in the specified context.
    pub fn evaluate_in(&self, context: &mut VariableContext) -> EvalResult<Value> {
        self.evaluate_with(&mut Stack::new(), context)
    }

    /// Evaluates this expression reusing the provided stack.
    ///
    /// The output is the operand of the executed `return` statement, if any; otherwise,
    /// the value on top of the stack; otherwise, `false`. The stack is cleared before
    /// evaluation, as well as the [return value](VariableContext::return_value()) in
    /// the context.
    pub fn evaluate_with(
        &self,
        stack: &mut Stack,
        context: &mut VariableContext,
    ) -> EvalResult<Value> {
        stack.clear();
        context.take_return_value();
        match &self.repr {
            Repr::Literal(value) => Ok(*value),
            Repr::Nodes(root) => run(root, stack, context),
        }
    }

    /// Returns the canonical byte encoding of this expression, which is the input
    /// of its [digest](Self::digest()). The encoding does not include the source code.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut writer = CanonicalWriter::new();
        match &self.repr {
            Repr::Literal(value) => {
                writer.write_u8(serial::EXPR_LITERAL);
                writer.write_value(*value);
            }
            Repr::Nodes(root) => {
                writer.write_u8(serial::EXPR_NODES);
                root.write_canonical(&mut writer);
            }
        }
        writer.into_bytes()
    }

    /// Returns the digest of this expression. The digest is computed on the first call
    /// and cached afterwards.
    pub fn digest(&self) -> Digest {
        *self.digest.get_or_init(|| self.compute_digest())
    }

    /// Computes the digest of this expression, bypassing the cache.
    pub fn compute_digest(&self) -> Digest {
        Digest::of(&self.canonical_bytes())
    }

    /// Returns the canonical instance of this expression from the [global intern table],
    /// inserting this expression if the table does not contain an equal one.
    ///
    /// [global intern table]: InternTable::global()
    ///
    /// # Examples
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use scalar_expr::{CompileOptions, Compiler};
    /// let compiler = Compiler::new().with_options(CompileOptions::FOLD_CONSTANTS);
    /// let first = compiler.parse_phrase("x + 1")?;
    /// let second = compiler.parse_phrase("x+1 // same code")?;
    /// assert!(!Arc::ptr_eq(&first, &second));
    /// assert_eq!(first, second);
    ///
    /// let first = first.intern();
    /// let second = second.intern();
    /// assert!(Arc::ptr_eq(&first, &second));
    /// # Ok::<_, scalar_expr::ParseError>(())
    /// ```
    #[must_use]
    pub fn intern(self: Arc<Self>) -> Arc<Self> {
        InternTable::global().intern(self)
    }
}

fn run(root: &Branch, stack: &mut Stack, context: &mut VariableContext) -> EvalResult<Value> {
    // `return` has already stored its operand in the context.
    let _flow = root.execute(stack, context)?;
    let output = context.return_value().or_else(|| stack.peek());
    Ok(output.unwrap_or(Value::FALSE))
}

impl PartialEq for Expression {
    fn eq(&self, other: &Self) -> bool {
        self.digest() == other.digest()
    }
}

impl Eq for Expression {}

impl hash::Hash for Expression {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.digest().hash(state);
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.repr, &self.source) {
            (Repr::Literal(value), _) => fmt::Display::fmt(value, formatter),
            (Repr::Nodes(_), Some(source)) => formatter.write_str(source),
            (Repr::Nodes(_), None) => write!(formatter, "digest:{}", self.digest()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exec::{BinaryOp, Directive};

    fn sum_of_variables() -> Expression {
        Expression::from_branch(Branch::unconditional(vec![
            Directive::PushVariable("x".to_owned()).into(),
            Directive::PushVariable("y".to_owned()).into(),
            Directive::Binary(BinaryOp::Add).into(),
        ]))
    }

    #[test]
    fn literal_expressions() {
        let expr = Expression::literal(Value::integer(42));
        assert!(expr.is_literal());
        assert_eq!(expr.as_literal(), Some(Value::integer(42)));
        assert!(expr.root().is_none());
        assert_eq!(expr.evaluate().unwrap(), Value::integer(42));
        assert_eq!(expr.to_string(), "42");
        assert_eq!(expr.canonical_bytes()[..2], [serial::EXPR_LITERAL, 1]);
    }

    #[test]
    fn evaluating_nodes() {
        let expr = sum_of_variables();
        let mut context: VariableContext = [("x", Value::integer(2)), ("y", Value::float(0.5))]
            .into_iter()
            .collect();
        assert_eq!(expr.evaluate_in(&mut context).unwrap(), Value::float(2.5));
        assert_eq!(expr.evaluate().unwrap(), Value::FALSE);
    }

    #[test]
    fn stale_return_value_is_cleared() {
        let expr = sum_of_variables();
        let mut stack = Stack::new();
        stack.push(Value::integer(100));
        let mut context = VariableContext::new();
        context.set(crate::env::RETURN_VARIABLE, Value::integer(-1));
        context.set("x", Value::integer(1));

        let output = expr.evaluate_with(&mut stack, &mut context).unwrap();
        assert_eq!(output, Value::integer(1));
        assert_eq!(stack.len(), 1);
        assert_eq!(context.return_value(), None);
    }

    #[test]
    fn literal_evaluation_resets_stack_and_return_value() {
        let expr = Expression::literal(Value::float(2.5));
        let mut stack = Stack::new();
        stack.push(Value::integer(100));
        let mut context = VariableContext::new();
        context.set(crate::env::RETURN_VARIABLE, Value::integer(-1));
        context.set("x", Value::integer(1));

        let output = expr.evaluate_with(&mut stack, &mut context).unwrap();
        assert_eq!(output, Value::float(2.5));
        assert!(stack.is_empty());
        assert_eq!(context.return_value(), None);
        assert_eq!(context.get("x"), Some(Value::integer(1)));
    }

    #[test]
    fn empty_block_evaluates_to_false() {
        let expr = Expression::from_branch(Branch::unconditional(vec![]));
        assert_eq!(expr.evaluate().unwrap(), Value::FALSE);
    }

    #[test]
    fn digest_is_cached_and_ignores_source() {
        let expr = sum_of_variables().with_source("x + y");
        let digest = expr.digest();
        assert_eq!(expr.digest(), digest);
        assert_eq!(expr.compute_digest(), digest);
        assert_eq!(expr.to_string(), "x + y");

        let other = sum_of_variables();
        assert_eq!(other, expr);
        assert_eq!(other.to_string(), format!("digest:{digest}"));
        assert_ne!(Expression::literal(Value::TRUE), expr);
    }

    #[test]
    fn literal_and_nodes_have_distinct_digests() {
        let literal = Expression::literal(Value::integer(1));
        let nodes = Expression::from_branch(Branch::unconditional(vec![
            Directive::Push(Value::integer(1)).into(),
        ]));
        assert_ne!(literal.digest(), nodes.digest());
    }
}
