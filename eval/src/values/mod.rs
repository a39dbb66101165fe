//! Values used by the evaluator.

use core::{cmp::Ordering, fmt};

mod ops;

/// Kind of a [`Value`].
///
/// Kinds are ordered by "width": `Boolean < Integer < Float`. Binary arithmetic
/// converts both operands to the wider kind before operating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum ValueKind {
    /// Boolean value.
    Boolean = 0,
    /// 64-bit signed integer.
    Integer = 1,
    /// 64-bit IEEE 754 floating-point number.
    Float = 2,
}

impl ValueKind {
    /// Returns the ordinal of this kind used in canonical serialization.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    /// Returns the wider of two kinds.
    pub fn wider(self, other: Self) -> Self {
        self.max(other)
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(match self {
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Float => "float",
        })
    }
}

/// Scalar value: a [`ValueKind`] together with a 64-bit raw payload.
///
/// The payload is interpreted according to the kind:
///
/// - `Boolean`: all bits zero for `false`, all bits set for `true`
/// - `Integer`: two's complement bit pattern of an `i64`
/// - `Float`: IEEE 754 bit pattern of an `f64`
///
/// Equality of values ([`PartialEq`]) is *strict*: it compares kinds and raw payloads,
/// which corresponds to the `===` operator. In particular, `NaN` values with the same
/// bit pattern are equal to each other. Numeric comparisons are available as methods,
/// e.g. [`Self::loose_eq()`].
///
/// # Examples
///
/// ```
/// # use scalar_expr::{Value, ValueKind};
/// let x = Value::from(3_i64) + Value::from(0.5);
/// assert_eq!(x.kind(), ValueKind::Float);
/// assert_eq!(x.as_f64(), 3.5);
/// assert!(Value::from(1_i64).loose_eq(Value::from(1.0)).as_bool());
/// assert_ne!(Value::from(1_i64), Value::from(1.0));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Value {
    kind: ValueKind,
    raw: u64,
}

impl Value {
    /// Boolean `true`.
    pub const TRUE: Self = Self::boolean(true);
    /// Boolean `false`.
    pub const FALSE: Self = Self::boolean(false);

    /// Creates a boolean value.
    pub const fn boolean(value: bool) -> Self {
        Self {
            kind: ValueKind::Boolean,
            raw: if value { u64::MAX } else { 0 },
        }
    }

    /// Creates an integer value.
    #[allow(clippy::cast_sign_loss)] // bit reinterpretation
    pub const fn integer(value: i64) -> Self {
        Self {
            kind: ValueKind::Integer,
            raw: value as u64,
        }
    }

    /// Creates a floating-point value.
    pub fn float(value: f64) -> Self {
        Self {
            kind: ValueKind::Float,
            raw: value.to_bits(),
        }
    }

    /// Creates a value from the kind and the raw payload. Boolean payloads are normalized,
    /// so that any non-zero payload becomes `true`.
    pub const fn from_raw(kind: ValueKind, raw: u64) -> Self {
        match kind {
            ValueKind::Boolean => Self::boolean(raw != 0),
            _ => Self { kind, raw },
        }
    }

    /// Returns the kind of this value.
    pub fn kind(self) -> ValueKind {
        self.kind
    }

    /// Returns the raw 64-bit payload of this value.
    pub fn raw_bits(self) -> u64 {
        self.raw
    }

    /// Interprets this value as a boolean. Booleans and integers are truthy if non-zero;
    /// floats are truthy if they are neither zero nor `NaN`.
    pub fn as_bool(self) -> bool {
        match self.kind {
            ValueKind::Boolean | ValueKind::Integer => self.raw != 0,
            ValueKind::Float => {
                let value = f64::from_bits(self.raw);
                !value.is_nan() && value != 0.0
            }
        }
    }

    /// Interprets this value as an integer. `true` converts to `-1` (all bits set);
    /// floats are truncated towards zero, saturating at the `i64` bounds, with `NaN`
    /// converting to 0.
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub fn as_i64(self) -> i64 {
        match self.kind {
            ValueKind::Boolean | ValueKind::Integer => self.raw as i64,
            ValueKind::Float => f64::from_bits(self.raw) as i64,
        }
    }

    /// Interprets this value as a float. `true` converts to `1.0`.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn as_f64(self) -> f64 {
        match self.kind {
            ValueKind::Boolean => {
                if self.raw == 0 {
                    0.0
                } else {
                    1.0
                }
            }
            ValueKind::Integer => self.raw as i64 as f64,
            ValueKind::Float => f64::from_bits(self.raw),
        }
    }

    /// Converts this value to the specified kind.
    #[must_use]
    pub fn convert_to(self, kind: ValueKind) -> Self {
        if self.kind == kind {
            return self;
        }
        match kind {
            ValueKind::Boolean => Self::boolean(self.as_bool()),
            ValueKind::Integer => Self::integer(self.as_i64()),
            ValueKind::Float => Self::float(self.as_f64()),
        }
    }

    /// Checks whether this value is a float `NaN`.
    pub fn is_nan(self) -> bool {
        self.kind == ValueKind::Float && f64::from_bits(self.raw).is_nan()
    }

    /// Checks whether this value is an infinite float.
    pub fn is_infinite(self) -> bool {
        self.kind == ValueKind::Float && f64::from_bits(self.raw).is_infinite()
    }

    /// Compares values numerically, by converting both to floats. Returns `None` if
    /// either of values is `NaN`.
    pub fn numeric_cmp(self, other: Self) -> Option<Ordering> {
        self.as_f64().partial_cmp(&other.as_f64())
    }
}

impl Default for Value {
    fn default() -> Self {
        Self::FALSE
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::integer(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::float(value)
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Boolean => formatter.debug_tuple("Boolean").field(&self.as_bool()).finish(),
            ValueKind::Integer => formatter.debug_tuple("Integer").field(&self.as_i64()).finish(),
            ValueKind::Float => formatter.debug_tuple("Float").field(&self.as_f64()).finish(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ValueKind::Boolean => fmt::Display::fmt(&self.as_bool(), formatter),
            ValueKind::Integer => fmt::Display::fmt(&self.as_i64(), formatter),
            ValueKind::Float => {
                let value = self.as_f64();
                if value.is_nan() {
                    formatter.write_str("NaN")
                } else if value.is_infinite() {
                    let sign = if value < 0.0 { "-" } else { "" };
                    write!(formatter, "{sign}Infinity")
                } else {
                    fmt::Debug::fmt(&value, formatter)
                }
            }
        }
    }
}
