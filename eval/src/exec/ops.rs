//! Operation-related types.

use core::fmt;

use crate::Value;

/// Priority of an operation. Greater priorities bind tighter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum OpPriority {
    /// Boolean OR (`||`).
    LogicalOr,
    /// Boolean AND (`&&`).
    LogicalAnd,
    /// Bitwise OR (`|`).
    BitOr,
    /// Bitwise XOR (`^`).
    BitXor,
    /// Bitwise AND (`&`).
    BitAnd,
    /// Equality comparisons: `==`, `===`, `!=`, `!==`.
    Equality,
    /// Order comparisons: `<`, `<=`, `>`, `>=`.
    Relational,
    /// Shifts: `<<`, `>>`, `>>>`.
    Shift,
    /// Addition or subtraction: `+` or `-`.
    AddOrSub,
    /// Multiplication, division or remainder: `*`, `/` or `%`.
    MulDivOrRem,
    /// Unary operations.
    Unary,
}

/// Unary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// Absolute value (unary `+`).
    Absolute,
    /// Negation (unary `-`).
    Negate,
    /// Logical negation (`!`).
    LogicalNot,
    /// Bitwise complement (`~`).
    Not,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Absolute => "absolute value",
            Self::Negate => "negation",
            Self::LogicalNot => "logical negation",
            Self::Not => "bitwise complement",
        })
    }
}

impl UnaryOp {
    /// Returns the string representation of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Absolute => "+",
            Self::Negate => "-",
            Self::LogicalNot => "!",
            Self::Not => "~",
        }
    }

    /// Applies this operation to a value.
    pub fn apply(self, value: Value) -> Value {
        match self {
            Self::Absolute => value.abs(),
            Self::Negate => -value,
            Self::LogicalNot => value.logical_not(),
            Self::Not => !value,
        }
    }
}

/// Binary operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// Addition (`+`).
    Add,
    /// Subtraction (`-`).
    Subtract,
    /// Multiplication (`*`).
    Multiply,
    /// Division (`/`).
    Divide,
    /// Remainder (`%`).
    Modulo,
    /// Bitwise AND (`&`).
    And,
    /// Bitwise OR (`|`).
    Or,
    /// Bitwise XOR (`^`).
    Xor,
    /// Boolean AND (`&&`).
    LogicalAnd,
    /// Boolean OR (`||`).
    LogicalOr,
    /// Left shift (`<<`).
    LeftShift,
    /// Sign-propagating right shift (`>>`).
    RightShift,
    /// Zero-filling right shift (`>>>`).
    RightShiftPadded,
    /// "Lesser than" comparison.
    Less,
    /// "Lesser or equal" comparison.
    LessOrEqual,
    /// "Greater than" comparison.
    Greater,
    /// "Greater or equal" comparison.
    GreaterOrEqual,
    /// Numeric equality (`==`).
    Equal,
    /// Numeric non-equality (`!=`).
    NotEqual,
    /// Strict equality (`===`).
    StrictEqual,
    /// Strict non-equality (`!==`).
    StrictNotEqual,
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Add => "addition",
            Self::Subtract => "subtraction",
            Self::Multiply => "multiplication",
            Self::Divide => "division",
            Self::Modulo => "remainder",
            Self::And => "bitwise AND",
            Self::Or => "bitwise OR",
            Self::Xor => "bitwise XOR",
            Self::LogicalAnd => "AND",
            Self::LogicalOr => "OR",
            Self::LeftShift => "left shift",
            Self::RightShift => "right shift",
            Self::RightShiftPadded => "padded right shift",
            Self::Less => "lesser comparison",
            Self::LessOrEqual => "lesser-or-equal comparison",
            Self::Greater => "greater comparison",
            Self::GreaterOrEqual => "greater-or-equal comparison",
            Self::Equal => "equality comparison",
            Self::NotEqual => "non-equality comparison",
            Self::StrictEqual => "strict equality comparison",
            Self::StrictNotEqual => "strict non-equality comparison",
        })
    }
}

impl BinaryOp {
    /// Returns the string representation of this operation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Modulo => "%",
            Self::And => "&",
            Self::Or => "|",
            Self::Xor => "^",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::LeftShift => "<<",
            Self::RightShift => ">>",
            Self::RightShiftPadded => ">>>",
            Self::Less => "<",
            Self::LessOrEqual => "<=",
            Self::Greater => ">",
            Self::GreaterOrEqual => ">=",
            Self::Equal => "==",
            Self::NotEqual => "!=",
            Self::StrictEqual => "===",
            Self::StrictNotEqual => "!==",
        }
    }

    /// Returns the priority of this operation.
    pub fn priority(self) -> OpPriority {
        match self {
            Self::LogicalOr => OpPriority::LogicalOr,
            Self::LogicalAnd => OpPriority::LogicalAnd,
            Self::Or => OpPriority::BitOr,
            Self::Xor => OpPriority::BitXor,
            Self::And => OpPriority::BitAnd,
            Self::Equal | Self::NotEqual | Self::StrictEqual | Self::StrictNotEqual => {
                OpPriority::Equality
            }
            Self::Less | Self::LessOrEqual | Self::Greater | Self::GreaterOrEqual => {
                OpPriority::Relational
            }
            Self::LeftShift | Self::RightShift | Self::RightShiftPadded => OpPriority::Shift,
            Self::Add | Self::Subtract => OpPriority::AddOrSub,
            Self::Multiply | Self::Divide | Self::Modulo => OpPriority::MulDivOrRem,
        }
    }

    /// Checks whether this operation is right-associative. Since both operands
    /// are always evaluated, this has no observable effect on results.
    pub fn is_right_assoc(self) -> bool {
        matches!(self, Self::LogicalOr)
    }

    /// Applies this operation to the provided operands.
    pub fn apply(self, lhs: Value, rhs: Value) -> Value {
        match self {
            Self::Add => lhs + rhs,
            Self::Subtract => lhs - rhs,
            Self::Multiply => lhs * rhs,
            Self::Divide => lhs / rhs,
            Self::Modulo => lhs % rhs,
            Self::And => lhs & rhs,
            Self::Or => lhs | rhs,
            Self::Xor => lhs ^ rhs,
            Self::LogicalAnd => lhs.logical_and(rhs),
            Self::LogicalOr => lhs.logical_or(rhs),
            Self::LeftShift => lhs << rhs,
            Self::RightShift => lhs >> rhs,
            Self::RightShiftPadded => lhs.unsigned_shr(rhs),
            Self::Less => lhs.less(rhs),
            Self::LessOrEqual => lhs.less_or_equal(rhs),
            Self::Greater => lhs.greater(rhs),
            Self::GreaterOrEqual => lhs.greater_or_equal(rhs),
            Self::Equal => lhs.loose_eq(rhs),
            Self::NotEqual => lhs.loose_ne(rhs),
            Self::StrictEqual => lhs.strict_eq(rhs),
            Self::StrictNotEqual => lhs.strict_ne(rhs),
        }
    }
}

/// Flat enumeration of directive kinds. The numeric value of an opcode
/// ([`Self::ordinal()`]) is used in canonical serialization and must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Opcode {
    /// Pushes a literal value.
    Push = 0,
    /// Pushes the value of a variable.
    PushVariable = 1,
    /// Pops a value into a variable.
    Pop = 2,
    /// Pops a value into the return variable and stops evaluation.
    Return = 3,
    /// [`UnaryOp::Absolute`]
    Absolute = 4,
    /// [`UnaryOp::Negate`]
    Negate = 5,
    /// [`UnaryOp::LogicalNot`]
    LogicalNot = 6,
    /// [`UnaryOp::Not`]
    Not = 7,
    /// [`BinaryOp::Add`]
    Add = 8,
    /// [`BinaryOp::Subtract`]
    Subtract = 9,
    /// [`BinaryOp::Multiply`]
    Multiply = 10,
    /// [`BinaryOp::Divide`]
    Divide = 11,
    /// [`BinaryOp::Modulo`]
    Modulo = 12,
    /// [`BinaryOp::And`]
    And = 13,
    /// [`BinaryOp::Or`]
    Or = 14,
    /// [`BinaryOp::Xor`]
    Xor = 15,
    /// [`BinaryOp::LogicalAnd`]
    LogicalAnd = 16,
    /// [`BinaryOp::LogicalOr`]
    LogicalOr = 17,
    /// [`BinaryOp::LeftShift`]
    LeftShift = 18,
    /// [`BinaryOp::RightShift`]
    RightShift = 19,
    /// [`BinaryOp::RightShiftPadded`]
    RightShiftPadded = 20,
    /// [`BinaryOp::Less`]
    Less = 21,
    /// [`BinaryOp::LessOrEqual`]
    LessOrEqual = 22,
    /// [`BinaryOp::Greater`]
    Greater = 23,
    /// [`BinaryOp::GreaterOrEqual`]
    GreaterOrEqual = 24,
    /// [`BinaryOp::Equal`]
    Equal = 25,
    /// [`BinaryOp::NotEqual`]
    NotEqual = 26,
    /// [`BinaryOp::StrictEqual`]
    StrictEqual = 27,
    /// [`BinaryOp::StrictNotEqual`]
    StrictNotEqual = 28,
}

impl Opcode {
    /// Returns the stable ordinal of this opcode.
    pub fn ordinal(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, formatter)
    }
}

impl From<UnaryOp> for Opcode {
    fn from(op: UnaryOp) -> Self {
        match op {
            UnaryOp::Absolute => Self::Absolute,
            UnaryOp::Negate => Self::Negate,
            UnaryOp::LogicalNot => Self::LogicalNot,
            UnaryOp::Not => Self::Not,
        }
    }
}

impl From<BinaryOp> for Opcode {
    fn from(op: BinaryOp) -> Self {
        match op {
            BinaryOp::Add => Self::Add,
            BinaryOp::Subtract => Self::Subtract,
            BinaryOp::Multiply => Self::Multiply,
            BinaryOp::Divide => Self::Divide,
            BinaryOp::Modulo => Self::Modulo,
            BinaryOp::And => Self::And,
            BinaryOp::Or => Self::Or,
            BinaryOp::Xor => Self::Xor,
            BinaryOp::LogicalAnd => Self::LogicalAnd,
            BinaryOp::LogicalOr => Self::LogicalOr,
            BinaryOp::LeftShift => Self::LeftShift,
            BinaryOp::RightShift => Self::RightShift,
            BinaryOp::RightShiftPadded => Self::RightShiftPadded,
            BinaryOp::Less => Self::Less,
            BinaryOp::LessOrEqual => Self::LessOrEqual,
            BinaryOp::Greater => Self::Greater,
            BinaryOp::GreaterOrEqual => Self::GreaterOrEqual,
            BinaryOp::Equal => Self::Equal,
            BinaryOp::NotEqual => Self::NotEqual,
            BinaryOp::StrictEqual => Self::StrictEqual,
            BinaryOp::StrictNotEqual => Self::StrictNotEqual,
        }
    }
}
