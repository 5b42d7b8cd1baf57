use std::rc::Rc;

use crate::{
    ast::Node,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            scope::Scope,
        },
        value::core::Value,
    },
    util::num::{i64_to_f64, resolve_index},
};

/// Reads one element of an array, or one character of a string.
///
/// The index must be an integer; negative indices count from the end.
///
/// # Example
/// ```
/// use calcula::interpreter::{evaluator::index::index_value, value::core::Value};
///
/// assert_eq!(index_value(&Value::from("héllo"), &Value::from(-4)).unwrap(), Value::from("é"));
/// assert!(index_value(&Value::from("abc"), &Value::from(3)).is_err());
/// assert!(index_value(&Value::from(12), &Value::from(0)).is_err());
/// ```
pub fn index_value(object: &Value, index: &Value) -> EvalResult<Value> {
    let index = index.as_integer("index")?;

    match object {
        Value::Array(elements) => Ok(elements[resolve_index(index, elements.len())?].clone()),
        Value::String(text) => {
            let length = text.chars().count();
            let position = resolve_index(index, length)?;
            text.chars()
                .nth(position)
                .map(|ch| Value::String(ch.to_string()))
                .ok_or(RuntimeError::IndexOutOfBounds { index, length })
        },
        other => Err(RuntimeError::type_error(format!("Cannot index a {}",
                                                      other.value_type()))),
    }
}

/// Builds the array of integers from `start` up to `end`.
///
/// Both bounds must be integers with `start <= end`. The upper bound is
/// included only when `inclusive` is set, so `3..3` is empty while `3..=3` is
/// `[3]`.
///
/// # Example
/// ```
/// use calcula::interpreter::{evaluator::index::range_values, value::core::Value};
///
/// assert_eq!(range_values(1, 4, false).unwrap().len(), 3);
/// assert_eq!(range_values(1, 4, true).unwrap().last(), Some(&Value::from(4)));
/// assert!(range_values(5, 1, true).is_err());
/// ```
pub fn range_values(start: i64, end: i64, inclusive: bool) -> EvalResult<Vec<Value>> {
    if start > end {
        return Err(RuntimeError::InvalidRange { start, end });
    }

    let values = if inclusive {
        (start..=end).map(|n| Value::Number(i64_to_f64(n))).collect()
    } else {
        (start..end).map(|n| Value::Number(i64_to_f64(n))).collect()
    };
    Ok(values)
}

impl Context {
    /// Evaluates `object[index]`.
    pub fn eval_index(&self, object: &Node, index: &Node, scope: &mut Scope) -> EvalResult<Value> {
        let object = self.eval(object, scope)?;
        let index = self.eval(index, scope)?;
        index_value(&object, &index)
    }

    /// Evaluates `start..end` or `start..=end`.
    pub fn eval_range(&self,
                      start: &Node,
                      end: &Node,
                      inclusive: bool,
                      scope: &mut Scope)
                      -> EvalResult<Value> {
        let start = self.eval(start, scope)?.as_integer("range start")?;
        let end = self.eval(end, scope)?.as_integer("range end")?;
        Ok(Value::Array(Rc::new(range_values(start, end, inclusive)?)))
    }
}
