use std::{cmp::Ordering, rc::Rc};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{array, core::Value},
    },
    util::num::{resolve_index, usize_to_f64},
};

/// Sum of an array of numbers; `0` for an empty array.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::array::sum};
///
/// let numbers = Value::Array(vec![Value::from(1), Value::from(2.5)].into());
/// assert_eq!(sum(&[numbers]).unwrap(), Value::Number(3.5));
/// ```
pub fn sum(args: &[Value]) -> EvalResult<Value> {
    let total = numbers("SUM", &args[0])?.into_iter().fold(0.0, |total, n| total + n);
    Ok(Value::Number(total))
}

/// Arithmetic mean of an array of numbers.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for an empty array.
pub fn average(args: &[Value]) -> EvalResult<Value> {
    let numbers = numbers("AVERAGE", &args[0])?;
    if numbers.is_empty() {
        return Err(RuntimeError::invalid_argument("AVERAGE", "array is empty"));
    }
    let total: f64 = numbers.iter().sum();
    Ok(Value::Number(total / usize_to_f64(numbers.len())))
}

/// Number of elements in an array.
pub fn count(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::Number(usize_to_f64(args[0].as_array("COUNT")?.len())))
}

/// The element at `index` (`0` for `FIRST`, `-1` for `LAST`).
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for an empty array.
pub fn end(name: &str, args: &[Value], index: i64) -> EvalResult<Value> {
    let elements = args[0].as_array(name)?;
    let position = resolve_index(index, elements.len())
        .map_err(|_| RuntimeError::invalid_argument(name, "array is empty"))?;
    Ok(elements[position].clone())
}

/// Reverses an array, or the characters of a string.
pub fn reverse(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
        other => {
            let mut elements = other.as_array("REVERSE")?.to_vec();
            elements.reverse();
            Ok(Value::Array(Rc::new(elements)))
        },
    }
}

/// Sorts an array ascending.
///
/// Numbers sort by IEEE total order, strings lexicographically,
/// `false` before `true`, and temporal values chronologically.
///
/// # Errors
/// A type error for arrays of arrays.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::array::sort};
///
/// let words = Value::Array(vec![Value::from("b"), Value::from("a")].into());
/// assert_eq!(sort(&[words]).unwrap().to_string(), r#"["a", "b"]"#);
/// ```
pub fn sort(args: &[Value]) -> EvalResult<Value> {
    let mut elements = args[0].as_array("SORT")?.to_vec();
    if let Some(Value::Array(_)) = elements.first() {
        return Err(RuntimeError::type_error("SORT cannot order arrays"));
    }
    elements.sort_by(order);
    Ok(Value::Array(Rc::new(elements)))
}

/// Flattens nested arrays into one array.
pub fn flatten(args: &[Value]) -> EvalResult<Value> {
    array::flatten(args[0].as_array("FLATTEN")?)
}

/// Returns the array's numbers, or a type error naming `name`.
fn numbers(name: &str, value: &Value) -> EvalResult<Vec<f64>> {
    value.as_array(name)?
         .iter()
         .map(|element| element.as_number(name))
         .collect()
}

/// Orders two elements of a homogeneous array.
fn order(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Number(a), Value::Number(b)) => a.total_cmp(b),
        (Value::String(a), Value::String(b)) => a.cmp(b),
        (Value::Boolean(a), Value::Boolean(b)) => a.cmp(b),
        (Value::Date(a), Value::Date(b)) => a.cmp(b),
        (Value::Time(a), Value::Time(b)) => a.cmp(b),
        (Value::DateTime(a), Value::DateTime(b)) => a.cmp(b),
        _ => Ordering::Equal,
    }
}
