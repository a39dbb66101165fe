//! Commonly used math functions.

use core::{f64::consts, fmt};
use std::sync::Arc;

use super::{pop_args, FunctionResolver, NativeFn};
use crate::{env::VariableSet, error::EvalResult, exec::Stack, Value, ValueKind};

/// Math function from [`CommonFunctions`].
///
/// All functions are pure, and thus [foldable](NativeFn::is_foldable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum MathFn {
    /// Minimum of two values, `min(x, y)`. Values are compared numerically; the result retains
    /// the kind of the selected argument.
    Min,
    /// Maximum of two values, `max(x, y)`.
    Max,
    /// Sine, `sin(x)`.
    Sin,
    /// Cosine, `cos(x)`.
    Cos,
    /// Restricts a value to the range, `clamp(x, min, max)`.
    Clamp,
    /// Wraps a value into the half-open range, `wrap(x, min, max)`.
    Wrap,
    /// Linear interpolation, `lerp(factor, x, y)`; equals `x` for `factor == 0` and `y`
    /// for `factor == 1`.
    Lerp,
    /// Converts a value to boolean.
    Bool,
    /// Converts a value to integer. Floats are truncated and saturated.
    Int,
    /// Converts a value to float.
    Float,
    /// Packs integer color components into an ARGB integer, `color(r, g, b, a)`.
    /// Components are truncated to 8 bits.
    Color,
    /// Packs floating-point color components in the `[0, 1]` range into an ARGB integer,
    /// `colorf(r, g, b, a)`.
    ColorF,
    /// Converts degrees to radians.
    Deg2Rad,
    /// Converts radians to degrees.
    Rad2Deg,
    /// The π constant, `pi()`.
    Pi,
    /// Euler's number, `e()`.
    E,
}

impl fmt::Display for MathFn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl MathFn {
    /// All math functions.
    pub const ALL: [Self; 16] = [
        Self::Min,
        Self::Max,
        Self::Sin,
        Self::Cos,
        Self::Clamp,
        Self::Wrap,
        Self::Lerp,
        Self::Bool,
        Self::Int,
        Self::Float,
        Self::Color,
        Self::ColorF,
        Self::Deg2Rad,
        Self::Rad2Deg,
        Self::Pi,
        Self::E,
    ];

    /// Returns the name of this function in lowercase.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Max => "max",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Clamp => "clamp",
            Self::Wrap => "wrap",
            Self::Lerp => "lerp",
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Float => "float",
            Self::Color => "color",
            Self::ColorF => "colorf",
            Self::Deg2Rad => "deg2rad",
            Self::Rad2Deg => "rad2deg",
            Self::Pi => "pi",
            Self::E => "e",
        }
    }

    /// Finds a function by its name, ignoring case.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|function| function.as_str().eq_ignore_ascii_case(name))
    }

    fn arity(self) -> usize {
        match self {
            Self::Pi | Self::E => 0,
            Self::Sin
            | Self::Cos
            | Self::Bool
            | Self::Int
            | Self::Float
            | Self::Deg2Rad
            | Self::Rad2Deg => 1,
            Self::Min | Self::Max => 2,
            Self::Clamp | Self::Wrap | Self::Lerp => 3,
            Self::Color | Self::ColorF => 4,
        }
    }

    fn apply(self, stack: &mut Stack) -> EvalResult<Value> {
        let name = self.as_str();
        Ok(match self {
            Self::Pi => Value::float(consts::PI),
            Self::E => Value::float(consts::E),

            Self::Sin => map_float(pop_args(stack, name)?, f64::sin),
            Self::Cos => map_float(pop_args(stack, name)?, f64::cos),
            Self::Deg2Rad => map_float(pop_args(stack, name)?, f64::to_radians),
            Self::Rad2Deg => map_float(pop_args(stack, name)?, f64::to_degrees),
            Self::Bool => convert(pop_args(stack, name)?, ValueKind::Boolean),
            Self::Int => convert(pop_args(stack, name)?, ValueKind::Integer),
            Self::Float => convert(pop_args(stack, name)?, ValueKind::Float),

            Self::Min => {
                let [x, y] = pop_args(stack, name)?;
                min(x, y)
            }
            Self::Max => {
                let [x, y] = pop_args(stack, name)?;
                max(x, y)
            }
            Self::Clamp => {
                let [x, low, high] = pop_args(stack, name)?;
                max(low, min(x, high))
            }
            Self::Wrap => {
                let [x, low, high] = pop_args(stack, name)?;
                wrap(x, low, high)
            }
            Self::Lerp => {
                let [factor, x, y] = pop_args(stack, name)?;
                let (factor, x, y) = (factor.as_f64(), x.as_f64(), y.as_f64());
                Value::float(factor * (y - x) + x)
            }

            Self::Color => {
                let [r, g, b, a] = pop_args(stack, name)?;
                pack_argb([a, r, g, b].map(Value::as_i64))
            }
            Self::ColorF => {
                let [r, g, b, a] = pop_args(stack, name)?;
                #[allow(clippy::cast_possible_truncation)]
                pack_argb([a, r, g, b].map(|component| (component.as_f64() * 255.0) as i64))
            }
        })
    }
}

fn map_float([x]: [Value; 1], map: fn(f64) -> f64) -> Value {
    Value::float(map(x.as_f64()))
}

fn convert([x]: [Value; 1], kind: ValueKind) -> Value {
    x.convert_to(kind)
}

fn min(x: Value, y: Value) -> Value {
    if y.less(x).as_bool() {
        y
    } else {
        x
    }
}

fn max(x: Value, y: Value) -> Value {
    if y.greater(x).as_bool() {
        y
    } else {
        x
    }
}

fn wrap(x: Value, low: Value, high: Value) -> Value {
    let kind = x.kind().wider(low.kind()).wider(high.kind());
    if kind == ValueKind::Float {
        let (x, low, high) = (x.as_f64(), low.as_f64(), high.as_f64());
        return Value::float(low + (x - low).rem_euclid(high - low));
    }

    let (x, low, high) = (x.as_i64(), low.as_i64(), high.as_i64());
    let range = high.wrapping_sub(low);
    if range == 0 {
        Value::integer(low)
    } else {
        let offset = x.wrapping_sub(low).wrapping_rem_euclid(range);
        Value::integer(low.wrapping_add(offset))
    }
}

fn pack_argb(components: [i64; 4]) -> Value {
    let packed = components
        .into_iter()
        .fold(0_i64, |acc, component| (acc << 8) | (component & 0xff));
    Value::integer(packed)
}

impl NativeFn for MathFn {
    fn name(&self) -> &str {
        self.as_str()
    }

    fn arg_count(&self) -> usize {
        self.arity()
    }

    fn evaluate(&self, stack: &mut Stack, _variables: &dyn VariableSet) -> EvalResult<()> {
        let output = self.apply(stack)?;
        stack.push(output);
        Ok(())
    }
}

/// Resolver for [`MathFn`]s. Function names are case-insensitive.
///
/// # Examples
///
/// ```
/// use scalar_expr::{fns::CommonFunctions, parse_single_expression, Value};
///
/// let expr = parse_single_expression("CLAMP(x * 2, 0, 10)", Some(&CommonFunctions))?;
/// let mut context = [("x", Value::integer(7))].into_iter().collect();
/// assert_eq!(expr.evaluate_in(&mut context)?, Value::integer(10));
///
/// let expr = parse_single_expression("color(0x12, 0x34, 0x56, 255)", Some(&CommonFunctions))?;
/// assert_eq!(expr.evaluate()?, Value::integer(0xff12_3456));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct CommonFunctions;

impl CommonFunctions {
    /// Iterates over all functions provided by this resolver.
    pub fn iter() -> impl Iterator<Item = Arc<dyn NativeFn>> {
        MathFn::ALL
            .into_iter()
            .map(|function| Arc::new(function) as Arc<dyn NativeFn>)
    }
}

impl FunctionResolver for CommonFunctions {
    fn resolve(&self, name: &str) -> Option<Arc<dyn NativeFn>> {
        let function = MathFn::from_name(name)?;
        Some(Arc::new(function))
    }

    fn contains(&self, name: &str) -> bool {
        MathFn::from_name(name).is_some()
    }
}
