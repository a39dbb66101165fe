//! Evaluation stack.

use crate::Value;

/// LIFO stack of [`Value`]s used during evaluation.
///
/// The stack keeps its slots allocated across evaluations: [`Self::clear()`] only resets
/// the length, and capacity doubles when exhausted. Thus, after a warm-up, evaluating
/// an expression does not allocate.
#[derive(Debug, Clone)]
pub struct Stack {
    slots: Vec<Value>,
    len: usize,
}

impl Default for Stack {
    fn default() -> Self {
        Self::new()
    }
}

impl Stack {
    /// Default number of pre-allocated slots.
    pub const DEFAULT_CAPACITY: usize = 8;

    /// Creates a stack with [the default capacity](Self::DEFAULT_CAPACITY).
    pub fn new() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }

    /// Creates a stack with the specified number of pre-allocated slots.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![Value::FALSE; capacity.max(1)],
            len: 0,
        }
    }

    /// Returns the number of values on the stack.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Checks whether the stack is empty.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the number of currently allocated slots.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Pushes a value onto the stack.
    pub fn push(&mut self, value: Value) {
        if self.len == self.slots.len() {
            let new_capacity = self.slots.len() * 2;
            self.slots.resize(new_capacity, Value::FALSE);
        }
        self.slots[self.len] = value;
        self.len += 1;
    }

    /// Pops the topmost value, or returns `None` if the stack is empty.
    pub fn pop(&mut self) -> Option<Value> {
        self.len = self.len.checked_sub(1)?;
        Some(self.slots[self.len])
    }

    /// Returns the topmost value without popping it.
    pub fn peek(&self) -> Option<Value> {
        let top = self.len.checked_sub(1)?;
        Some(self.slots[top])
    }

    /// Pops `N` topmost values and returns them in the order they were pushed,
    /// i.e., the topmost value is the last one. If the stack contains less than `N` values,
    /// returns `None` and leaves the stack intact.
    ///
    /// # Examples
    ///
    /// ```
    /// # use scalar_expr::{exec::Stack, Value};
    /// let mut stack = Stack::new();
    /// stack.push(1_i64.into());
    /// stack.push(2_i64.into());
    /// let [x, y] = stack.pop_args().unwrap();
    /// assert_eq!((x, y), (Value::integer(1), Value::integer(2)));
    /// assert!(stack.is_empty());
    /// ```
    pub fn pop_args<const N: usize>(&mut self) -> Option<[Value; N]> {
        let start = self.len.checked_sub(N)?;
        let args = core::array::from_fn(|i| self.slots[start + i]);
        self.len = start;
        Some(args)
    }

    /// Removes all values from the stack. Allocated slots are retained.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Iterates over values on the stack from the bottom to the top.
    pub fn iter(&self) -> impl Iterator<Item = Value> + '_ {
        self.slots[..self.len].iter().copied()
    }
}
