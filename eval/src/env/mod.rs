//! [`VariableContext`] and other types related to variable storage.

use core::{fmt, ops};

use crate::Value;

/// Name of the reserved variable receiving the operand of a `return` statement.
///
/// The name is not a valid identifier, so it cannot clash with variables in the code.
pub const RETURN_VARIABLE: &str = "#return";

/// Read-only view of named [`Value`]s.
pub trait VariableSet {
    /// Returns the value of the variable with the specified name, or `None` if the variable
    /// is not defined.
    fn get(&self, name: &str) -> Option<Value>;

    /// Checks whether the variable with the specified name is defined.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<S: core::hash::BuildHasher> VariableSet for hashbrown::HashMap<String, Value, S> {
    fn get(&self, name: &str) -> Option<Value> {
        hashbrown::HashMap::get(self, name).copied()
    }
}

/// Mutable set of named [`Value`]s read and written by expressions.
///
/// Variables are stored in a vector sorted by name, so lookups are binary searches
/// and insertions shift the tail of the vector. For the handful of variables a typical
/// expression touches, this outperforms hash maps and does not allocate on updates.
///
/// Note that the context implements the [`Index`](ops::Index) trait, which allows to eloquently
/// access variables. Similarly, [`FromIterator`] / [`Extend`] traits allow to construct contexts.
///
/// # Examples
///
/// ```
/// use scalar_expr::{env::VariableContext, Value};
///
/// let mut context: VariableContext = [("y", Value::from(2_i64)), ("x", Value::TRUE)]
///     .into_iter()
///     .collect();
/// context.set("z", Value::float(0.5));
///
/// assert_eq!(context["x"], Value::TRUE);
/// assert_eq!(context.get("w"), None);
/// let names: Vec<_> = context.iter().map(|(name, _)| name).collect();
/// assert_eq!(names, ["x", "y", "z"]);
/// ```
#[derive(Clone, Default, PartialEq)]
pub struct VariableContext {
    entries: Vec<(String, Value)>,
}

impl fmt::Debug for VariableContext {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_map()
            .entries(self.entries.iter().map(|(name, value)| (name, value)))
            .finish()
    }
}

impl VariableContext {
    /// Default number of pre-allocated entries.
    pub const DEFAULT_CAPACITY: usize = 4;

    /// Creates an empty context with [the default capacity](Self::DEFAULT_CAPACITY).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates an empty context with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, name: &str) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|(entry_name, _)| entry_name.as_str().cmp(name))
    }

    /// Returns the value of the variable, or `None` if the variable is not defined.
    pub fn get(&self, name: &str) -> Option<Value> {
        let idx = self.position(name).ok()?;
        Some(self.entries[idx].1)
    }

    /// Checks whether the context contains a variable with the specified name.
    pub fn contains(&self, name: &str) -> bool {
        self.position(name).is_ok()
    }

    /// Sets the variable value, inserting the variable if necessary.
    pub fn set(&mut self, name: &str, value: Value) -> &mut Self {
        match self.position(name) {
            Ok(idx) => self.entries[idx].1 = value,
            Err(idx) => self.entries.insert(idx, (name.to_owned(), value)),
        }
        self
    }

    /// Removes the variable from the context, returning its value.
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.position(name).ok()?;
        Some(self.entries.remove(idx).1)
    }

    /// Removes all variables from the context.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Returns the number of variables in the context.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the context is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over variables in the lexicographic order of their names.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, Value)> + '_ {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
    }

    /// Returns the value produced by the last executed `return` statement, if any.
    pub fn return_value(&self) -> Option<Value> {
        self.get(RETURN_VARIABLE)
    }

    pub(crate) fn take_return_value(&mut self) -> Option<Value> {
        self.remove(RETURN_VARIABLE)
    }
}

impl VariableSet for VariableContext {
    fn get(&self, name: &str) -> Option<Value> {
        VariableContext::get(self, name)
    }
}

impl ops::Index<&str> for VariableContext {
    type Output = Value;

    fn index(&self, index: &str) -> &Self::Output {
        let idx = self
            .position(index)
            .unwrap_or_else(|_| panic!("Variable `{index}` is not defined"));
        &self.entries[idx].1
    }
}

impl<S: AsRef<str>> Extend<(S, Value)> for VariableContext {
    fn extend<I: IntoIterator<Item = (S, Value)>>(&mut self, iter: I) {
        for (name, value) in iter {
            self.set(name.as_ref(), value);
        }
    }
}

impl<S: AsRef<str>> FromIterator<(S, Value)> for VariableContext {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut context = Self::new();
        context.extend(iter);
        context
    }
}
