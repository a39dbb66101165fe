//! Process-wide deduplication of compiled expressions.

use std::sync::Arc;

use dashmap::{mapref::entry::Entry, DashMap};
use once_cell::sync::Lazy;

use crate::{Digest, Expression, Value};

static GLOBAL: Lazy<InternTable> = Lazy::new(InternTable::with_constants);

/// Table mapping [`Digest`]s to canonical [`Expression`] instances.
///
/// The table is safe to use from multiple threads: concurrent [`intern()`](Self::intern())
/// calls for equal expressions always return the same canonical instance. Entries are never
/// evicted.
#[derive(Debug, Default)]
pub struct InternTable {
    entries: DashMap<Digest, Arc<Expression>>,
}

impl InternTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    fn with_constants() -> Self {
        let table = Self::new();
        let constants = [
            Value::TRUE,
            Value::FALSE,
            Value::integer(0),
            Value::integer(1),
            Value::float(0.0),
            Value::float(1.0),
            Value::float(f64::INFINITY),
            Value::float(f64::NAN),
        ];
        for value in constants {
            let _ = table.intern(Arc::new(Expression::literal(value)));
        }
        table
    }

    /// Returns the global table used by [`Expression::intern()`]. The global table
    /// is pre-populated with common literals, such as `true`, `0` and `1.0`.
    pub fn global() -> &'static Self {
        &GLOBAL
    }

    /// Returns the canonical instance for `expr`, inserting `expr` if the table does not
    /// contain an expression with the same digest.
    pub fn intern(&self, expr: Arc<Expression>) -> Arc<Expression> {
        let digest = expr.digest();
        match self.entries.entry(digest) {
            Entry::Occupied(entry) => {
                tracing::trace!(%digest, "reusing interned expression");
                Arc::clone(entry.get())
            }
            Entry::Vacant(entry) => {
                tracing::trace!(%digest, %expr, "interning expression");
                entry.insert(Arc::clone(&expr));
                expr
            }
        }
    }

    /// Gets the canonical expression with the specified digest.
    pub fn get(&self, digest: &Digest) -> Option<Arc<Expression>> {
        self.entries.get(digest).map(|entry| Arc::clone(entry.value()))
    }

    /// Checks whether the table contains an expression with the specified digest.
    pub fn contains(&self, digest: &Digest) -> bool {
        self.entries.contains_key(digest)
    }

    /// Returns the number of interned expressions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Checks whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
