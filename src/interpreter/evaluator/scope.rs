use std::{
    collections::{HashMap, HashSet},
    ops::{Deref, DerefMut},
};

use crate::interpreter::value::core::Value;

/// The variable bindings of one evaluation.
///
/// A scope is seeded from the host's variables, which are remembered as
/// *external*: while an external name still holds a value, assignments to it
/// keep the host's value. Loop bindings are introduced through
/// [`Scope::shadow`], which restores the previous bindings when the returned
/// guard is dropped.
#[derive(Debug, Clone, Default)]
pub struct Scope {
    vars:     HashMap<String, Value>,
    external: HashSet<String>,
}

impl Scope {
    /// Creates a scope holding the host's variables, all marked external.
    #[must_use]
    pub fn seeded(variables: &HashMap<String, Value>) -> Self {
        Self { vars:     variables.clone(),
               external: variables.keys().cloned().collect(), }
    }

    /// Looks up a variable.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Binds `name` to `value`, replacing any previous binding.
    pub fn set(&mut self, name: &str, value: Value) {
        self.vars.insert(name.to_string(), value);
    }

    /// Returns the host's value for `name` if it was seeded externally and is
    /// still bound.
    #[must_use]
    pub fn external_value(&self, name: &str) -> Option<&Value> {
        if self.external.contains(name) {
            return self.vars.get(name);
        }
        None
    }

    /// Saves the current bindings of `names` and returns a guard through which
    /// the scope can be used. When the guard is dropped every saved name is
    /// restored to its previous value, or unbound if it had none.
    ///
    /// # Example
    /// ```
    /// use std::collections::HashMap;
    ///
    /// use calcula::interpreter::{evaluator::scope::Scope, value::core::Value};
    ///
    /// let mut scope = Scope::seeded(&HashMap::from([("x".to_string(), Value::from(1))]));
    /// {
    ///     let mut frame = scope.shadow(&["x", "acc"]);
    ///     frame.set("x", Value::from(10));
    ///     frame.set("acc", Value::from(0));
    ///     assert_eq!(frame.get("x"), Some(&Value::from(10)));
    /// }
    /// assert_eq!(scope.get("x"), Some(&Value::from(1)));
    /// assert_eq!(scope.get("acc"), None);
    /// ```
    pub fn shadow(&mut self, names: &[&str]) -> Binding<'_> {
        let saved = names.iter()
                         .map(|name| (name.to_string(), self.vars.get(*name).cloned()))
                         .collect();
        Binding { scope: self,
                  saved }
    }

    /// Consumes the scope and returns its final bindings.
    #[must_use]
    pub fn into_variables(self) -> HashMap<String, Value> {
        self.vars
    }
}

/// Restores shadowed bindings on drop. See [`Scope::shadow`].
pub struct Binding<'s> {
    scope: &'s mut Scope,
    saved: Vec<(String, Option<Value>)>,
}

impl Deref for Binding<'_> {
    type Target = Scope;

    fn deref(&self) -> &Scope {
        self.scope
    }
}

impl DerefMut for Binding<'_> {
    fn deref_mut(&mut self) -> &mut Scope {
        self.scope
    }
}

impl Drop for Binding<'_> {
    fn drop(&mut self) {
        // Reverse order so a name saved twice ends with its oldest value.
        while let Some((name, previous)) = self.saved.pop() {
            match previous {
                Some(value) => {
                    self.scope.vars.insert(name, value);
                },
                None => {
                    self.scope.vars.remove(&name);
                },
            }
        }
    }
}
