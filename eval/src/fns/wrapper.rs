//! Wrapper for closures on fixed-size argument arrays.

use core::{fmt, marker::PhantomData};

use super::{pop_args, NativeFn};
use crate::{
    env::VariableSet,
    error::{EvalError, EvalResult},
    exec::Stack,
    Value,
};

/// Wraps a function enriching it with the name and the number of args.
/// This is a slightly shorter way to create wrappers compared to calling [`FnWrapper::new()`].
///
/// See [`FnWrapper`] for more details on function requirements.
pub fn wrap<Out, F, const N: usize>(name: impl Into<String>, function: F) -> FnWrapper<Out, F, N>
where
    F: Fn([Value; N]) -> Out,
{
    FnWrapper::new(name, function)
}

/// Output of a wrapped function that can be converted into an evaluation result.
pub trait IntoEvalResult {
    /// Performs the conversion. `function` is the name of the function producing the output.
    fn into_eval_result(self, function: &str) -> EvalResult<Value>;
}

macro_rules! impl_into_eval_result {
    ($($ty:ty),+) => {
        $(
        impl IntoEvalResult for $ty {
            fn into_eval_result(self, _function: &str) -> EvalResult<Value> {
                Ok(self.into())
            }
        }
        )+
    };
}

impl_into_eval_result!(Value, bool, i64, f64);

impl<T: IntoEvalResult, E: fmt::Display> IntoEvalResult for Result<T, E> {
    fn into_eval_result(self, function: &str) -> EvalResult<Value> {
        match self {
            Ok(value) => value.into_eval_result(function),
            Err(err) => Err(EvalError::native(function, err.to_string())),
        }
    }
}

/// Wrapper of a function on `N` [`Value`]s.
///
/// The wrapped function takes a `[Value; N]` array with the arguments in the call order.
/// Its output may be a [`Value`], a `bool`, an `i64`, an `f64`, or a `Result` of these
/// with a displayable error; see [`IntoEvalResult`].
///
/// # Examples
///
/// ```
/// use scalar_expr::{fns::{self, MapResolver}, Compiler, Value};
///
/// let mut resolver = MapResolver::new();
/// resolver
///     .insert(fns::wrap("hypot", |[x, y]: [Value; 2]| x.as_f64().hypot(y.as_f64())))
///     .insert(fns::wrap("checked_sqrt", |[x]: [Value; 1]| {
///         let x = x.as_f64();
///         if x >= 0.0 { Ok(x.sqrt()) } else { Err("negative argument") }
///     }));
///
/// let compiler = Compiler::with_resolver(&resolver);
/// let expr = compiler.parse_phrase("hypot(3, 4)")?;
/// assert_eq!(expr.evaluate()?, Value::float(5.0));
///
/// let expr = compiler.parse_phrase("checked_sqrt(x)")?;
/// assert!(expr.evaluate().is_ok());
/// let mut context = [("x", Value::integer(-1))].into_iter().collect();
/// let err = expr.evaluate_in(&mut context).unwrap_err();
/// assert!(err.to_string().contains("negative argument"));
/// # Ok::<_, Box<dyn std::error::Error>>(())
/// ```
pub struct FnWrapper<Out, F, const N: usize> {
    name: String,
    function: F,
    is_foldable: bool,
    _output: PhantomData<fn() -> Out>,
}

impl<Out, F, const N: usize> fmt::Debug for FnWrapper<Out, F, N> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("FnWrapper")
            .field("name", &self.name)
            .field("arg_count", &N)
            .field("is_foldable", &self.is_foldable)
            .finish_non_exhaustive()
    }
}

impl<Out, F: Clone, const N: usize> Clone for FnWrapper<Out, F, N> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            function: self.function.clone(),
            is_foldable: self.is_foldable,
            _output: PhantomData,
        }
    }
}

impl<Out, F, const N: usize> FnWrapper<Out, F, N>
where
    F: Fn([Value; N]) -> Out,
{
    /// Creates a new wrapper. The wrapped function is considered [foldable](NativeFn::is_foldable).
    pub fn new(name: impl Into<String>, function: F) -> Self {
        Self {
            name: name.into(),
            function,
            is_foldable: true,
            _output: PhantomData,
        }
    }

    /// Marks the function as impure, so that its calls are never evaluated at compile time.
    #[must_use]
    pub fn non_foldable(mut self) -> Self {
        self.is_foldable = false;
        self
    }
}

impl<Out, F, const N: usize> NativeFn for FnWrapper<Out, F, N>
where
    Out: IntoEvalResult,
    F: Fn([Value; N]) -> Out + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn arg_count(&self) -> usize {
        N
    }

    fn is_foldable(&self) -> bool {
        self.is_foldable
    }

    fn evaluate(&self, stack: &mut Stack, _variables: &dyn VariableSet) -> EvalResult<()> {
        let args = pop_args::<N>(stack, &self.name)?;
        let output = (self.function)(args).into_eval_result(&self.name)?;
        stack.push(output);
        Ok(())
    }
}
