//! Compiled nodes and their execution.
//!
//! A compiled expression is a sequence of [`Node`]s in postfix order. Each node is executed
//! against an evaluation [`Stack`] and a [`VariableContext`]:
//!
//! - A [`Directive`] pops 0, 1 or 2 operands and pushes a single result, except for
//!   [`Directive::Pop`] and [`Directive::Return`], which pop a value into a variable
//!   and push nothing.
//! - A [`Branch`] executes its condition, pops the result and executes one of its blocks.
//! - A [`FunctionCall`] delegates to a [`NativeFn`].
//!
//! Execution returns [`ControlFlow::Break`] once a `return` statement is executed;
//! this stops evaluation of the entire expression.

use core::{fmt, ops::ControlFlow};
use std::sync::Arc;

use crate::{
    env::{VariableContext, RETURN_VARIABLE},
    error::{EvalError, EvalResult},
    fns::NativeFn,
    Value,
};

mod ops;
pub(crate) mod serial;
mod stack;

pub use self::{
    ops::{BinaryOp, OpPriority, Opcode, UnaryOp},
    stack::Stack,
};
use self::serial::CanonicalWriter;

fn pop(stack: &mut Stack, operation: impl fmt::Display) -> EvalResult<Value> {
    stack
        .pop()
        .ok_or_else(|| EvalError::stack_underflow(operation.to_string()))
}

/// Elementary stack operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Directive {
    /// Pushes a literal value.
    Push(Value),
    /// Pushes the value of the named variable, or `false` if the variable is not defined.
    PushVariable(String),
    /// Pops a value and assigns it to the named variable.
    Pop(String),
    /// Pops a value, assigns it to [`RETURN_VARIABLE`] and stops evaluation.
    Return,
    /// Pops a value and pushes the result of a unary operation on it.
    Unary(UnaryOp),
    /// Pops two values and pushes the result of a binary operation on them.
    Binary(BinaryOp),
}

impl Directive {
    /// Returns the opcode of this directive.
    pub fn opcode(&self) -> Opcode {
        match self {
            Self::Push(_) => Opcode::Push,
            Self::PushVariable(_) => Opcode::PushVariable,
            Self::Pop(_) => Opcode::Pop,
            Self::Return => Opcode::Return,
            Self::Unary(op) => Opcode::from(*op),
            Self::Binary(op) => Opcode::from(*op),
        }
    }

    /// Checks whether this directive can be evaluated at compile time. Reading and writing
    /// variables cannot.
    pub fn is_foldable(&self) -> bool {
        !matches!(self, Self::PushVariable(_) | Self::Pop(_))
    }

    /// Executes this directive.
    pub fn execute(
        &self,
        stack: &mut Stack,
        context: &mut VariableContext,
    ) -> EvalResult<ControlFlow<()>> {
        match self {
            Self::Push(value) => stack.push(*value),
            Self::PushVariable(name) => {
                stack.push(context.get(name).unwrap_or(Value::FALSE));
            }
            Self::Pop(name) => {
                let value = pop(stack, Opcode::Pop)?;
                context.set(name, value);
            }
            Self::Return => {
                let value = pop(stack, Opcode::Return)?;
                context.set(RETURN_VARIABLE, value);
                return Ok(ControlFlow::Break(()));
            }
            Self::Unary(op) => {
                let value = pop(stack, op)?;
                stack.push(op.apply(value));
            }
            Self::Binary(op) => {
                let rhs = pop(stack, op)?;
                let lhs = pop(stack, op)?;
                stack.push(op.apply(lhs, rhs));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    fn write_canonical(&self, writer: &mut CanonicalWriter) {
        writer.write_varint(self.opcode().ordinal().into());
        match self {
            Self::Push(value) => {
                writer.write_bool(true);
                writer.write_u8(serial::OPERAND_VALUE);
                writer.write_value(*value);
            }
            Self::PushVariable(name) | Self::Pop(name) => {
                writer.write_bool(true);
                writer.write_u8(serial::OPERAND_NAME);
                writer.write_str(name);
            }
            Self::Return | Self::Unary(_) | Self::Binary(_) => writer.write_bool(false),
        }
    }
}

/// Conditional execution of blocks of nodes.
///
/// The condition block must leave exactly one value on the stack. If this value is truthy,
/// the success block is executed; otherwise, the failure block (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct Branch {
    condition: Vec<Node>,
    success: Vec<Node>,
    failure: Option<Vec<Node>>,
}

impl Branch {
    /// Creates a branch.
    pub fn new(condition: Vec<Node>, success: Vec<Node>, failure: Option<Vec<Node>>) -> Self {
        Self {
            condition,
            success,
            failure,
        }
    }

    /// Creates a branch that always executes `nodes`.
    pub fn unconditional(nodes: Vec<Node>) -> Self {
        Self::new(vec![Directive::Push(Value::TRUE).into()], nodes, None)
    }

    /// Returns the condition block.
    pub fn condition(&self) -> &[Node] {
        &self.condition
    }

    /// Returns the block executed if the condition holds.
    pub fn success(&self) -> &[Node] {
        &self.success
    }

    /// Returns the block executed if the condition does not hold.
    pub fn failure(&self) -> Option<&[Node]> {
        self.failure.as_deref()
    }

    /// Checks whether all nodes of this branch can be evaluated at compile time.
    pub fn is_foldable(&self) -> bool {
        let failure = self.failure.as_deref().unwrap_or_default();
        [self.condition.as_slice(), self.success.as_slice(), failure]
            .into_iter()
            .flatten()
            .all(Node::is_foldable)
    }

    /// Executes this branch.
    pub fn execute(
        &self,
        stack: &mut Stack,
        context: &mut VariableContext,
    ) -> EvalResult<ControlFlow<()>> {
        let _flow = execute_block(&self.condition, stack, context)?;
        let condition = pop(stack, "branch condition")?;
        if condition.as_bool() {
            execute_block(&self.success, stack, context)
        } else if let Some(failure) = &self.failure {
            execute_block(failure, stack, context)
        } else {
            Ok(ControlFlow::Continue(()))
        }
    }

    pub(crate) fn write_canonical(&self, writer: &mut CanonicalWriter) {
        write_block(&self.condition, writer);
        write_block(&self.success, writer);
        writer.write_bool(self.failure.is_some());
        if let Some(failure) = &self.failure {
            write_block(failure, writer);
        }
    }
}

/// Call of a native function. Arguments are taken from the stack.
#[derive(Clone)]
pub struct FunctionCall {
    function: Arc<dyn NativeFn>,
}

impl fmt::Debug for FunctionCall {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FunctionCall")
            .field("name", &self.function.name())
            .field("arg_count", &self.function.arg_count())
            .finish()
    }
}

/// Calls are compared by the function name (ignoring case) and arity, which is consistent
/// with the canonical serialization.
impl PartialEq for FunctionCall {
    fn eq(&self, other: &Self) -> bool {
        self.function.arg_count() == other.function.arg_count()
            && self.function.name().eq_ignore_ascii_case(other.function.name())
    }
}

impl FunctionCall {
    /// Creates a call of the specified function.
    pub fn new(function: Arc<dyn NativeFn>) -> Self {
        Self { function }
    }

    /// Returns the called function.
    pub fn function(&self) -> &Arc<dyn NativeFn> {
        &self.function
    }

    /// Checks whether the function can be evaluated at compile time.
    pub fn is_foldable(&self) -> bool {
        self.function.is_foldable()
    }

    /// Executes the call.
    pub fn execute(
        &self,
        stack: &mut Stack,
        context: &mut VariableContext,
    ) -> EvalResult<ControlFlow<()>> {
        self.function.evaluate(stack, &*context)?;
        Ok(ControlFlow::Continue(()))
    }

    fn write_canonical(&self, writer: &mut CanonicalWriter) {
        writer.write_str(&self.function.name().to_ascii_lowercase());
        writer.write_varint(self.function.arg_count() as u64);
    }
}

/// Compiled node.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Elementary stack operation.
    Directive(Directive),
    /// Conditional execution.
    Branch(Branch),
    /// Native function call.
    Call(FunctionCall),
}

impl From<Directive> for Node {
    fn from(directive: Directive) -> Self {
        Self::Directive(directive)
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Self {
        Self::Branch(branch)
    }
}

impl From<FunctionCall> for Node {
    fn from(call: FunctionCall) -> Self {
        Self::Call(call)
    }
}

impl Node {
    /// Checks whether this node can be evaluated at compile time.
    pub fn is_foldable(&self) -> bool {
        match self {
            Self::Directive(directive) => directive.is_foldable(),
            Self::Branch(branch) => branch.is_foldable(),
            Self::Call(call) => call.is_foldable(),
        }
    }

    /// Executes this node.
    pub fn execute(
        &self,
        stack: &mut Stack,
        context: &mut VariableContext,
    ) -> EvalResult<ControlFlow<()>> {
        match self {
            Self::Directive(directive) => directive.execute(stack, context),
            Self::Branch(branch) => branch.execute(stack, context),
            Self::Call(call) => call.execute(stack, context),
        }
    }

    fn write_canonical(&self, writer: &mut CanonicalWriter) {
        match self {
            Self::Directive(directive) => {
                writer.write_u8(serial::NODE_DIRECTIVE);
                directive.write_canonical(writer);
            }
            Self::Branch(branch) => {
                writer.write_u8(serial::NODE_BRANCH);
                branch.write_canonical(writer);
            }
            Self::Call(call) => {
                writer.write_u8(serial::NODE_CALL);
                call.write_canonical(writer);
            }
        }
    }
}

/// Executes a sequence of nodes, stopping on a `return` statement.
pub fn execute_block(
    nodes: &[Node],
    stack: &mut Stack,
    context: &mut VariableContext,
) -> EvalResult<ControlFlow<()>> {
    for node in nodes {
        if node.execute(stack, context)?.is_break() {
            return Ok(ControlFlow::Break(()));
        }
    }
    Ok(ControlFlow::Continue(()))
}

fn write_block(nodes: &[Node], writer: &mut CanonicalWriter) {
    writer.write_varint(nodes.len() as u64);
    for node in nodes {
        node.write_canonical(writer);
    }
}
