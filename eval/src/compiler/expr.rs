//! Recursive-descent parsing of statements and precedence climbing for phrases.

use std::sync::Arc;

use scalar_expr_lexer::{Keyword, NumberLiteral, Token, TokenKind};

use crate::{
    error::{ErrorKind, ParseError},
    exec::{BinaryOp, Branch, Directive, FunctionCall, Node, OpPriority, UnaryOp},
    fns::{FunctionResolver, NativeFn},
    Value,
};

fn unary_op(kind: TokenKind) -> Option<UnaryOp> {
    Some(match kind {
        TokenKind::Plus => UnaryOp::Absolute,
        TokenKind::Minus => UnaryOp::Negate,
        TokenKind::Bang => UnaryOp::LogicalNot,
        TokenKind::Tilde => UnaryOp::Not,
        _ => return None,
    })
}

fn binary_op(kind: TokenKind) -> Option<BinaryOp> {
    Some(match kind {
        TokenKind::Plus => BinaryOp::Add,
        TokenKind::Minus => BinaryOp::Subtract,
        TokenKind::Star => BinaryOp::Multiply,
        TokenKind::Slash => BinaryOp::Divide,
        TokenKind::Percent => BinaryOp::Modulo,
        TokenKind::Amp => BinaryOp::And,
        TokenKind::Pipe => BinaryOp::Or,
        TokenKind::Caret => BinaryOp::Xor,
        TokenKind::AmpAmp => BinaryOp::LogicalAnd,
        TokenKind::PipePipe => BinaryOp::LogicalOr,
        TokenKind::ShiftLeft => BinaryOp::LeftShift,
        TokenKind::ShiftRight => BinaryOp::RightShift,
        TokenKind::UnsignedShiftRight => BinaryOp::RightShiftPadded,
        TokenKind::Less => BinaryOp::Less,
        TokenKind::LessEqual => BinaryOp::LessOrEqual,
        TokenKind::Greater => BinaryOp::Greater,
        TokenKind::GreaterEqual => BinaryOp::GreaterOrEqual,
        TokenKind::Equal => BinaryOp::Equal,
        TokenKind::NotEqual => BinaryOp::NotEqual,
        TokenKind::StrictEqual => BinaryOp::StrictEqual,
        TokenKind::StrictNotEqual => BinaryOp::StrictNotEqual,
        _ => return None,
    })
}

fn literal(kind: TokenKind) -> Option<Value> {
    Some(match kind {
        TokenKind::Number(NumberLiteral::Integer(value)) => Value::integer(value),
        TokenKind::Number(NumberLiteral::Float(value)) => Value::float(value),
        TokenKind::Keyword(Keyword::True) => Value::TRUE,
        TokenKind::Keyword(Keyword::False) => Value::FALSE,
        TokenKind::Keyword(Keyword::Infinity) => Value::float(f64::INFINITY),
        TokenKind::Keyword(Keyword::NaN) => Value::float(f64::NAN),
        _ => return None,
    })
}

/// Operator awaiting its operands on the operator stack.
#[derive(Debug, Clone, Copy)]
enum PendingOp {
    Unary(UnaryOp),
    Binary(BinaryOp),
}

impl PendingOp {
    fn priority(self) -> OpPriority {
        match self {
            Self::Unary(_) => OpPriority::Unary,
            Self::Binary(op) => op.priority(),
        }
    }
}

/// Operator stack together with the number of values the emitted nodes leave on the stack.
#[derive(Debug, Default)]
struct PhraseState {
    ops: Vec<PendingOp>,
    pending_values: usize,
}

impl PhraseState {
    /// Emits a directive for `op`. Returns `false` if there are not enough values
    /// for the operation.
    fn emit(&mut self, op: PendingOp, nodes: &mut Vec<Node>) -> bool {
        let (arity, directive) = match op {
            PendingOp::Unary(op) => (1, Directive::Unary(op)),
            PendingOp::Binary(op) => (2, Directive::Binary(op)),
        };
        if self.pending_values < arity {
            return false;
        }
        self.pending_values -= arity - 1;
        nodes.push(directive.into());
        true
    }

    /// Emits all stacked operators binding tighter than `op`, then pushes `op` on the stack.
    fn push_binary(&mut self, op: BinaryOp, nodes: &mut Vec<Node>) -> bool {
        while let Some(&top) = self.ops.last() {
            let should_reduce = top.priority() > op.priority()
                || (top.priority() == op.priority() && !op.is_right_assoc());
            if !should_reduce {
                break;
            }
            self.ops.pop();
            if !self.emit(top, nodes) {
                return false;
            }
        }
        self.ops.push(PendingOp::Binary(op));
        true
    }

    fn finish(mut self, nodes: &mut Vec<Node>) -> bool {
        while let Some(op) = self.ops.pop() {
            if !self.emit(op, nodes) {
                return false;
            }
        }
        self.pending_values == 1
    }
}

/// Parser over a slice of tokens.
pub(super) struct Parser<'t, 'a> {
    tokens: &'t [Token<'a>],
    position: usize,
    resolver: &'t dyn FunctionResolver,
}

impl<'t, 'a> Parser<'t, 'a> {
    pub fn new(tokens: &'t [Token<'a>], resolver: &'t dyn FunctionResolver) -> Self {
        Self {
            tokens,
            position: 0,
            resolver,
        }
    }

    fn peek(&self) -> Option<&'t Token<'a>> {
        self.tokens.get(self.position)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|token| token.extra)
    }

    fn unexpected(&self, expected: &'static str) -> ParseError {
        if let Some(token) = self.peek() {
            let kind = ErrorKind::UnexpectedToken {
                expected,
                found: (*token.fragment()).to_owned(),
            };
            ParseError::new(kind, Some(token))
        } else {
            ParseError::new::<()>(ErrorKind::UnexpectedEnd { expected }, None)
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<(), ParseError> {
        if self.peek_kind() == Some(kind) {
            self.position += 1;
            Ok(())
        } else {
            Err(self.unexpected(expected))
        }
    }

    fn expect_end(&self) -> Result<(), ParseError> {
        if self.peek().is_some() {
            Err(self.unexpected("end of input"))
        } else {
            Ok(())
        }
    }

    /// Parses a phrase spanning all tokens.
    pub fn top_phrase(mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = vec![];
        self.phrase(&mut nodes)?;
        self.expect_end()?;
        Ok(nodes)
    }

    /// Parses a block spanning all tokens, either a braced statement list
    /// or a bare list of statements.
    pub fn top_block(mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = vec![];
        if self.peek_kind() == Some(TokenKind::LeftBrace) {
            self.braced_statements(&mut nodes)?;
        } else {
            while self.peek().is_some() {
                self.statement(&mut nodes)?;
            }
        }
        self.expect_end()?;
        Ok(nodes)
    }

    fn braced_statements(&mut self, nodes: &mut Vec<Node>) -> Result<(), ParseError> {
        self.expect(TokenKind::LeftBrace, "`{`")?;
        while self.peek_kind() != Some(TokenKind::RightBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected("`}`"));
            }
            self.statement(nodes)?;
        }
        self.position += 1;
        Ok(())
    }

    fn block(&mut self) -> Result<Vec<Node>, ParseError> {
        let mut nodes = vec![];
        if self.peek_kind() == Some(TokenKind::LeftBrace) {
            self.braced_statements(&mut nodes)?;
        } else {
            self.statement(&mut nodes)?;
        }
        Ok(nodes)
    }

    fn statement(&mut self, nodes: &mut Vec<Node>) -> Result<(), ParseError> {
        let Some(token) = self.peek() else {
            return Err(self.unexpected("statement"));
        };

        match token.extra {
            TokenKind::Keyword(Keyword::If) => {
                self.position += 1;
                self.expect(TokenKind::LeftParen, "`(` after `if`")?;
                let mut condition = vec![];
                self.phrase(&mut condition)?;
                self.expect(TokenKind::RightParen, "`)` after condition")?;

                let success = self.block()?;
                let failure = if self.peek_kind() == Some(TokenKind::Keyword(Keyword::Else)) {
                    self.position += 1;
                    Some(self.block()?)
                } else {
                    None
                };
                nodes.push(Branch::new(condition, success, failure).into());
            }

            TokenKind::Keyword(Keyword::Return) => {
                self.position += 1;
                self.phrase(nodes)?;
                self.expect(TokenKind::Semicolon, "`;` after statement")?;
                nodes.push(Directive::Return.into());
            }

            TokenKind::Identifier => {
                let name = *token.fragment();
                if self.resolver.contains(name) {
                    let err = ParseError::new(
                        ErrorKind::FunctionAssignment {
                            name: name.to_owned(),
                        },
                        Some(token),
                    );
                    return Err(err);
                }
                self.position += 1;
                self.expect(TokenKind::Assign, "`=` in assignment")?;
                self.phrase(nodes)?;
                self.expect(TokenKind::Semicolon, "`;` after statement")?;
                nodes.push(Directive::Pop(name.to_owned()).into());
            }

            _ => return Err(self.unexpected("statement")),
        }
        Ok(())
    }

    /// Parses a phrase using precedence climbing. Operand nodes are emitted as soon as
    /// they are encountered, and operator nodes once they are reduced, so `nodes` are
    /// in postfix order.
    fn phrase(&mut self, nodes: &mut Vec<Node>) -> Result<(), ParseError> {
        let mut state = PhraseState::default();
        let mut expects_value = true;

        while let Some(token) = self.peek() {
            if expects_value {
                if let Some(value) = literal(token.extra) {
                    nodes.push(Directive::Push(value).into());
                } else if let Some(op) = unary_op(token.extra) {
                    state.ops.push(PendingOp::Unary(op));
                    self.position += 1;
                    continue;
                } else if token.extra == TokenKind::LeftParen {
                    self.position += 1;
                    self.phrase(nodes)?;
                    self.expect(TokenKind::RightParen, "`)` after expression")?;
                    state.pending_values += 1;
                    expects_value = false;
                    continue;
                } else if token.extra == TokenKind::Identifier {
                    let name = *token.fragment();
                    if let Some(function) = self.resolver.resolve(name) {
                        self.position += 1;
                        self.call(token, function, nodes)?;
                        state.pending_values += 1;
                        expects_value = false;
                        continue;
                    }
                    nodes.push(Directive::PushVariable(name.to_owned()).into());
                } else {
                    break;
                }
                self.position += 1;
                state.pending_values += 1;
                expects_value = false;
            } else {
                let Some(op) = binary_op(token.extra) else {
                    break;
                };
                if !state.push_binary(op, nodes) {
                    return Err(ParseError::new(ErrorKind::InvalidExpression, Some(token)));
                }
                self.position += 1;
                expects_value = true;
            }
        }

        if state.finish(nodes) {
            Ok(())
        } else {
            let err = if let Some(token) = self.peek() {
                ParseError::new(ErrorKind::InvalidExpression, Some(token))
            } else {
                ParseError::new::<()>(ErrorKind::InvalidExpression, None)
            };
            Err(err)
        }
    }

    /// Parses arguments of a function call; `name` is the already consumed function name.
    fn call(
        &mut self,
        name: &Token<'a>,
        function: Arc<dyn NativeFn>,
        nodes: &mut Vec<Node>,
    ) -> Result<(), ParseError> {
        let note = || format!("in arguments of function `{}`", function.name());
        self.expect(TokenKind::LeftParen, "`(` after function name")
            .map_err(|err| err.with_note(note(), name))?;

        let arg_count = function.arg_count();
        if arg_count == 0 {
            self.expect(TokenKind::RightParen, "`)` after function arguments")
                .map_err(|err| err.with_note(note(), name))?;
        }
        for i in 0..arg_count {
            self.phrase(nodes)
                .map_err(|err| err.with_note(note(), name))?;
            let (kind, expected) = if i + 1 == arg_count {
                (TokenKind::RightParen, "`)` after function arguments")
            } else {
                (TokenKind::Comma, "`,` after a function argument")
            };
            self.expect(kind, expected)
                .map_err(|err| err.with_note(note(), name))?;
        }

        nodes.push(FunctionCall::new(function).into());
        Ok(())
    }
}
