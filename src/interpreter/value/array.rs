use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// Checks that all elements share one runtime type.
///
/// Empty arrays are trivially homogeneous. Nested arrays only need to agree
/// on being arrays; their contents were validated when they were built.
///
/// # Errors
/// Returns [`RuntimeError::HeterogeneousArray`] naming the first element's type
/// and the first type that differs from it.
pub fn check_homogeneous(elements: &[Value]) -> EvalResult<()> {
    let Some(first) = elements.first() else {
        return Ok(());
    };
    let expected = first.value_type();

    match elements.iter().map(Value::value_type).find(|found| *found != expected) {
        Some(found) => Err(RuntimeError::HeterogeneousArray { expected, found }),
        None => Ok(()),
    }
}

/// Builds an array value after validating homogeneity.
///
/// # Example
/// ```
/// use calcula::interpreter::value::{array::homogeneous, core::Value};
///
/// let ok = homogeneous(vec![Value::Number(1.0), Value::Number(2.0)]);
/// assert!(ok.is_ok());
///
/// let mixed = homogeneous(vec![Value::Number(1.0), Value::from("a")]);
/// assert!(mixed.is_err());
/// ```
pub fn homogeneous(elements: Vec<Value>) -> EvalResult<Value> {
    check_homogeneous(&elements)?;
    Ok(Value::Array(Rc::new(elements)))
}

/// Concatenates two arrays; the result must itself be homogeneous.
pub fn concat(left: &[Value], right: &[Value]) -> EvalResult<Value> {
    let mut elements = Vec::with_capacity(left.len() + right.len());
    elements.extend_from_slice(left);
    elements.extend_from_slice(right);
    homogeneous(elements)
}

/// Flattens one level of nesting; non-array elements are kept as they are.
pub fn flatten(elements: &[Value]) -> EvalResult<Value> {
    let mut flat = Vec::new();
    for element in elements {
        match element {
            Value::Array(inner) => flat.extend(inner.iter().cloned()),
            other => flat.push(other.clone()),
        }
    }
    homogeneous(flat)
}
