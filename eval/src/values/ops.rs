//! Operations on `Value`s.

use core::{cmp::Ordering, ops};

use super::{Value, ValueKind};

/// Operands of a binary operation converted to their common kind.
enum Promoted {
    Boolean(bool, bool),
    Integer(i64, i64),
    Float(f64, f64),
}

impl Promoted {
    fn new(lhs: Value, rhs: Value) -> Self {
        match lhs.kind.wider(rhs.kind) {
            ValueKind::Boolean => Self::Boolean(lhs.as_bool(), rhs.as_bool()),
            ValueKind::Integer => Self::Integer(lhs.as_i64(), rhs.as_i64()),
            ValueKind::Float => Self::Float(lhs.as_f64(), rhs.as_f64()),
        }
    }
}

macro_rules! impl_arithmetic_op {
    ($trait:ident, $method:ident, |$a:ident, $b:ident| {
        Boolean => $bool_expr:expr,
        Integer => $int_expr:expr,
        Float => $float_expr:expr $(,)?
    }) => {
        impl ops::$trait for Value {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                match Promoted::new(self, rhs) {
                    Promoted::Boolean($a, $b) => $bool_expr,
                    Promoted::Integer($a, $b) => $int_expr,
                    Promoted::Float($a, $b) => $float_expr,
                }
            }
        }
    };
}

impl_arithmetic_op!(Add, add, |a, b| {
    Boolean => Value::boolean(a || b),
    Integer => Value::integer(a.wrapping_add(b)),
    Float => Value::float(a + b),
});

impl_arithmetic_op!(Sub, sub, |a, b| {
    Boolean => Value::boolean(a && !b),
    Integer => Value::integer(a.wrapping_sub(b)),
    Float => Value::float(a - b),
});

impl_arithmetic_op!(Mul, mul, |a, b| {
    Boolean => Value::boolean(a && b),
    Integer => Value::integer(a.wrapping_mul(b)),
    Float => Value::float(a * b),
});

impl_arithmetic_op!(Div, div, |a, b| {
    Boolean => {
        let _ = b;
        Value::boolean(a)
    },
    Integer => {
        if b == 0 {
            Value::float(f64::NAN)
        } else {
            Value::integer(a.wrapping_div(b))
        }
    },
    Float => Value::float(a / b),
});

impl_arithmetic_op!(Rem, rem, |a, b| {
    Boolean => {
        let _ = b;
        Value::boolean(a)
    },
    Integer => {
        if b == 0 {
            Value::float(f64::NAN)
        } else {
            Value::integer(a.wrapping_rem(b))
        }
    },
    Float => Value::float(a % b),
});

macro_rules! impl_bitwise_op {
    ($trait:ident, $method:ident, $op:tt) => {
        impl ops::$trait for Value {
            type Output = Self;

            fn $method(self, rhs: Self) -> Self {
                let kind = self.kind.wider(rhs.kind);
                let lhs = self.convert_to(kind).raw;
                let rhs = rhs.convert_to(kind).raw;
                Value::from_raw(kind, lhs $op rhs)
            }
        }
    };
}

impl_bitwise_op!(BitAnd, bitand, &);
impl_bitwise_op!(BitOr, bitor, |);
impl_bitwise_op!(BitXor, bitxor, ^);

/// Bitwise complement of the raw payload. For booleans, this is logical negation.
impl ops::Not for Value {
    type Output = Self;

    fn not(self) -> Self {
        Self::from_raw(self.kind, !self.raw)
    }
}

impl ops::Neg for Value {
    type Output = Self;

    fn neg(self) -> Self {
        match self.kind {
            ValueKind::Boolean => Self::boolean(!self.as_bool()),
            ValueKind::Integer => Self::integer(self.as_i64().wrapping_neg()),
            ValueKind::Float => Self::float(-self.as_f64()),
        }
    }
}

/// Shift operations act on the raw payload of the left operand and preserve its kind.
/// Booleans are not shifted.
impl ops::Shl for Value {
    type Output = Self;

    fn shl(self, rhs: Self) -> Self {
        match self.kind {
            ValueKind::Boolean => self,
            kind => Self::from_raw(kind, self.raw << shift_amount(rhs)),
        }
    }
}

/// Sign-propagating right shift.
impl ops::Shr for Value {
    type Output = Self;

    #[allow(clippy::cast_possible_wrap, clippy::cast_sign_loss)]
    fn shr(self, rhs: Self) -> Self {
        match self.kind {
            ValueKind::Boolean => self,
            kind => Self::from_raw(kind, ((self.raw as i64) >> shift_amount(rhs)) as u64),
        }
    }
}

/// Shift amount is the low 6 bits of the integer interpretation of the value.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shift_amount(value: Value) -> u32 {
    (value.as_i64() & 63) as u32
}

impl Value {
    /// Zero-filling right shift (`>>>`).
    #[must_use]
    pub fn unsigned_shr(self, rhs: Self) -> Self {
        match self.kind {
            ValueKind::Boolean => self,
            kind => Self::from_raw(kind, self.raw >> shift_amount(rhs)),
        }
    }

    /// Absolute value (unary `+`). Booleans are returned as is; integers use wrapping
    /// semantics, so that `abs(i64::MIN) == i64::MIN`.
    #[must_use]
    pub fn abs(self) -> Self {
        match self.kind {
            ValueKind::Boolean => self,
            ValueKind::Integer => Self::integer(self.as_i64().wrapping_abs()),
            ValueKind::Float => Self::float(self.as_f64().abs()),
        }
    }

    /// Logical negation (unary `!`) preserving the value kind: truthy values map to zero
    /// of the same kind, falsy ones to `true`, `-1` or `1.0` respectively.
    #[must_use]
    pub fn logical_not(self) -> Self {
        let is_falsy = !self.as_bool();
        match self.kind {
            ValueKind::Boolean => Self::boolean(is_falsy),
            ValueKind::Integer => Self::integer(if is_falsy { -1 } else { 0 }),
            ValueKind::Float => Self::float(if is_falsy { 1.0 } else { 0.0 }),
        }
    }

    /// Logical conjunction (`&&`) of the truthiness of both values.
    #[must_use]
    pub fn logical_and(self, rhs: Self) -> Self {
        Self::boolean(self.as_bool() && rhs.as_bool())
    }

    /// Logical disjunction (`||`) of the truthiness of both values.
    #[must_use]
    pub fn logical_or(self, rhs: Self) -> Self {
        Self::boolean(self.as_bool() || rhs.as_bool())
    }

    fn compare(self, rhs: Self, predicate: fn(Ordering) -> bool) -> Self {
        Self::boolean(self.numeric_cmp(rhs).map_or(false, predicate))
    }

    /// Numeric `<` comparison.
    #[must_use]
    pub fn less(self, rhs: Self) -> Self {
        self.compare(rhs, Ordering::is_lt)
    }

    /// Numeric `<=` comparison.
    #[must_use]
    pub fn less_or_equal(self, rhs: Self) -> Self {
        self.compare(rhs, Ordering::is_le)
    }

    /// Numeric `>` comparison.
    #[must_use]
    pub fn greater(self, rhs: Self) -> Self {
        self.compare(rhs, Ordering::is_gt)
    }

    /// Numeric `>=` comparison.
    #[must_use]
    pub fn greater_or_equal(self, rhs: Self) -> Self {
        self.compare(rhs, Ordering::is_ge)
    }

    /// Numeric equality (`==`). `NaN` is not equal to anything, including itself.
    #[must_use]
    pub fn loose_eq(self, rhs: Self) -> Self {
        self.compare(rhs, Ordering::is_eq)
    }

    /// Numeric inequality (`!=`).
    #[must_use]
    pub fn loose_ne(self, rhs: Self) -> Self {
        Self::boolean(!self.loose_eq(rhs).as_bool())
    }

    /// Strict equality (`===`) of kinds and raw payloads.
    #[must_use]
    pub fn strict_eq(self, rhs: Self) -> Self {
        Self::boolean(self == rhs)
    }

    /// Strict inequality (`!==`).
    #[must_use]
    pub fn strict_ne(self, rhs: Self) -> Self {
        Self::boolean(self != rhs)
    }
}
