//! Native functions and their resolution.
//!
//! # Defining native functions
//!
//! There are two ways to define new native functions:
//!
//! - Implement [`NativeFn`] manually. This is the most versatile approach, but it can be overly
//!   verbose.
//! - Use [`FnWrapper`] or the [`wrap`] function, which build a function from a closure
//!   taking a fixed-size array of [`Value`]s.
//!
//! Functions are made available to the compiler with a [`FunctionResolver`]. The crate provides
//! a [`MapResolver`] for ad-hoc function sets, a [`MultiResolver`] chaining several
//! resolvers, and [`CommonFunctions`] with frequently used math functions.
//!
//! # Examples
//!
//! ```
//! use scalar_expr::{fns::{self, CommonFunctions, MapResolver, MultiResolver}, Compiler, Value};
//!
//! let mut custom = MapResolver::new();
//! custom.insert(fns::wrap("sqr", |[x]: [Value; 1]| x * x));
//! let resolver = MultiResolver::new().with(custom).with(CommonFunctions);
//!
//! let expr = Compiler::with_resolver(&resolver).parse_phrase("sqr(3) + MAX(1, 2.5)")?;
//! assert_eq!(expr.evaluate()?, Value::float(11.5));
//! # Ok::<_, Box<dyn std::error::Error>>(())
//! ```

use hashbrown::HashMap;

use core::fmt;
use std::sync::Arc;

use crate::{
    env::VariableSet,
    error::{EvalError, EvalResult},
    exec::Stack,
    Value,
};

mod common;
mod wrapper;

pub use self::{
    common::{CommonFunctions, MathFn},
    wrapper::{wrap, FnWrapper, IntoEvalResult},
};

/// Function on a fixed number of [`Value`]s.
///
/// Native functions are defined in the Rust code and then can be called from expressions.
/// A function pops its [`arg_count()`](Self::arg_count) arguments from the stack
/// and pushes exactly one result.
pub trait NativeFn: Send + Sync {
    /// Returns the function name. Names are case-insensitive.
    fn name(&self) -> &str;

    /// Returns the number of arguments the function takes.
    fn arg_count(&self) -> usize;

    /// Checks whether the function is pure, i.e., its calls with constant args can be evaluated
    /// at compile time. The default implementation returns `true`.
    fn is_foldable(&self) -> bool {
        true
    }

    /// Executes the function. The arguments are the topmost [`arg_count()`](Self::arg_count)
    /// values on the `stack`, with the last argument on the top.
    fn evaluate(&self, stack: &mut Stack, variables: &dyn VariableSet) -> EvalResult<()>;
}

impl fmt::Debug for dyn NativeFn {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NativeFn")
            .field("name", &self.name())
            .field("arg_count", &self.arg_count())
            .finish()
    }
}

/// Pops `N` arguments of a native function from the stack.
pub fn pop_args<const N: usize>(stack: &mut Stack, function: &str) -> EvalResult<[Value; N]> {
    stack
        .pop_args()
        .ok_or_else(|| EvalError::stack_underflow(format!("function `{function}`")))
}

/// Provider of [`NativeFn`]s for the compiler.
///
/// Resolution must be consistent, and it should ignore the case of the function name.
pub trait FunctionResolver {
    /// Resolves a function by its name.
    fn resolve(&self, name: &str) -> Option<Arc<dyn NativeFn>>;

    /// Checks whether a function with the specified name exists.
    fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }
}

impl<R: FunctionResolver + ?Sized> FunctionResolver for &R {
    fn resolve(&self, name: &str) -> Option<Arc<dyn NativeFn>> {
        (**self).resolve(name)
    }

    fn contains(&self, name: &str) -> bool {
        (**self).contains(name)
    }
}

/// Resolver without any functions.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResolver;

impl FunctionResolver for EmptyResolver {
    fn resolve(&self, _name: &str) -> Option<Arc<dyn NativeFn>> {
        None
    }

    fn contains(&self, _name: &str) -> bool {
        false
    }
}

/// Resolver backed by a map of named functions.
#[derive(Debug, Clone, Default)]
pub struct MapResolver {
    functions: HashMap<String, Arc<dyn NativeFn>>,
}

impl MapResolver {
    /// Creates an empty resolver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a function, replacing a previously inserted function with the same name.
    pub fn insert<F: NativeFn + 'static>(&mut self, function: F) -> &mut Self {
        self.insert_arc(Arc::new(function))
    }

    /// Inserts a shared function.
    pub fn insert_arc(&mut self, function: Arc<dyn NativeFn>) -> &mut Self {
        let name = function.name().to_ascii_lowercase();
        self.functions.insert(name, function);
        self
    }

    /// Returns the number of functions in this resolver.
    pub fn len(&self) -> usize {
        self.functions.len()
    }

    /// Checks whether this resolver is empty.
    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl FunctionResolver for MapResolver {
    fn resolve(&self, name: &str) -> Option<Arc<dyn NativeFn>> {
        self.functions.get(&name.to_ascii_lowercase()).cloned()
    }
}

impl FromIterator<Arc<dyn NativeFn>> for MapResolver {
    fn from_iter<I: IntoIterator<Item = Arc<dyn NativeFn>>>(iter: I) -> Self {
        let mut resolver = Self::new();
        for function in iter {
            resolver.insert_arc(function);
        }
        resolver
    }
}

/// Resolver delegating to a list of resolvers. The first resolver that contains a function
/// with the requested name wins.
#[derive(Default)]
pub struct MultiResolver<'a> {
    resolvers: Vec<Box<dyn FunctionResolver + 'a>>,
}

impl fmt::Debug for MultiResolver<'_> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MultiResolver")
            .field("len", &self.resolvers.len())
            .finish()
    }
}

impl<'a> MultiResolver<'a> {
    /// Creates a resolver without delegates.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a resolver with the lowest precedence.
    #[must_use]
    pub fn with(mut self, resolver: impl FunctionResolver + 'a) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }
}

impl FunctionResolver for MultiResolver<'_> {
    fn resolve(&self, name: &str) -> Option<Arc<dyn NativeFn>> {
        self.resolvers
            .iter()
            .find(|resolver| resolver.contains(name))
            .and_then(|resolver| resolver.resolve(name))
    }

    fn contains(&self, name: &str) -> bool {
        self.resolvers.iter().any(|resolver| resolver.contains(name))
    }
}
