//! Defining the environment in which the program executes.

use std::collections::HashMap;

use super::value::Value;

/// Name of the implicit last-result slot.
///
/// Every environment predefines it; bare expression statements store their
/// value there, and `O RLY?` branches on it.
pub const IT: &str = "IT";

/// A single scope record: variable names to values.
///
/// Scopes are chained through the interpreter's environment stack: the
/// global environment sits at the bottom, and each function invocation
/// pushes a fresh environment whose parent is the caller's. Lookup walks
/// the stack from the innermost scope outwards.
#[derive(Debug)]
pub struct Env<'ctx> {
    /// Map between variable names and their current values.
    vars: HashMap<&'ctx str, Value>,
}

impl<'ctx> Env<'ctx> {
    /// Creates a new environment, with only the implicit `IT` slot bound.
    pub fn new() -> Self {
        let mut vars = HashMap::new();
        vars.insert(IT, Value::Noob);
        Self { vars }
    }

    /// Is `name` bound in this scope?
    pub fn contains(&self, name: &str) -> bool {
        self.vars.contains_key(name)
    }

    /// Gets the value bound to `name` in this scope.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Binds `name` in this scope, declaring or overwriting it.
    pub fn insert(&mut self, name: &'ctx str, value: Value) {
        self.vars.insert(name, value);
    }
}

impl Default for Env<'_> {
    fn default() -> Self {
        Self::new()
    }
}
