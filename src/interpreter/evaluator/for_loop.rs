use tracing::trace;

use crate::{
    ast::{Accumulator, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            scope::Scope,
        },
        value::{array::homogeneous, core::Value},
    },
};

impl Context {
    /// Evaluates a `for` expression.
    ///
    /// The iterable must be an array, or a string, which is iterated one
    /// Unicode code point at a time. Two forms are supported:
    ///
    /// 1. **Map form:** `for x in xs [when guard] then body` collects one body
    ///    result per item that passes the guard into a homogeneous array.
    ///
    /// 2. **Accumulator form:** `for x in xs [when guard] into acc = init then
    ///    body` evaluates `init` once, then for each item binds `acc` to the
    ///    running value and replaces it with the body's result. Items failing
    ///    the guard leave the accumulator untouched. The final accumulator is
    ///    the result.
    ///
    /// The loop variable and the accumulator name are local to the loop: their
    /// outer bindings are shadowed while it runs and restored afterwards,
    /// including when the loop fails.
    ///
    /// # Example
    /// ```
    /// use calcula::{interpreter::{evaluator::core::Context, value::core::Value}, parse};
    ///
    /// let context = Context::new();
    ///
    /// let squares = parse("for x in [1, 2, 3] when x != 2 then x * x").unwrap();
    /// assert_eq!(context.evaluate(&squares).unwrap().to_string(), "[1, 9]");
    ///
    /// let sum = parse("for x in 1..=5 into sum = 0 then sum + x").unwrap();
    /// assert_eq!(context.evaluate(&sum).unwrap(), Value::from(15));
    /// ```
    pub fn eval_for(&self,
                    variable: &str,
                    iterable: &Node,
                    guard: Option<&Node>,
                    accumulator: Option<&Accumulator>,
                    body: &Node,
                    scope: &mut Scope)
                    -> EvalResult<Value> {
        let items = iteration_items(self.eval(iterable, scope)?)?;

        match accumulator {
            None => {
                let mut frame = scope.shadow(&[variable]);
                let mut results = Vec::with_capacity(items.len());

                for item in items {
                    frame.set(variable, item);
                    if !self.passes_guard(guard, &mut frame)? {
                        continue;
                    }
                    results.push(self.eval(body, &mut frame)?);
                }

                trace!(variable, collected = results.len(), "for loop finished");
                homogeneous(results)
            },
            Some(Accumulator { name, initial }) => {
                let mut acc = self.eval(initial, scope)?;
                let mut frame = scope.shadow(&[variable, name.as_str()]);
                let mut iterations = 0_usize;

                for item in items {
                    frame.set(variable, item);
                    frame.set(name, acc.clone());
                    if !self.passes_guard(guard, &mut frame)? {
                        continue;
                    }
                    acc = self.eval(body, &mut frame)?;
                    iterations += 1;
                }

                trace!(variable, accumulator = %name, iterations, "for loop finished");
                Ok(acc)
            },
        }
    }

    fn passes_guard(&self, guard: Option<&Node>, scope: &mut Scope) -> EvalResult<bool> {
        match guard {
            Some(guard) => self.eval(guard, scope)?.as_bool("for guard"),
            None => Ok(true),
        }
    }
}

/// Turns an evaluated iterable into the values bound to the loop variable.
fn iteration_items(iterable: Value) -> EvalResult<Vec<Value>> {
    match iterable {
        Value::Array(elements) => Ok(elements.iter().cloned().collect()),
        Value::String(text) => Ok(text.chars().map(|ch| Value::String(ch.to_string())).collect()),
        other => Err(RuntimeError::type_error(format!("for expects an array or a string to \
                                                       iterate, found {}",
                                                      other.value_type()))),
    }
}
