use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
    util::num::{f64_to_count, usize_to_f64},
};

/// Length of a string in characters, or of an array in elements.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::string::len};
///
/// assert_eq!(len(&[Value::from("héllo")]).unwrap(), Value::from(5));
/// ```
pub fn len(args: &[Value]) -> EvalResult<Value> {
    let length = match &args[0] {
        Value::String(s) => s.chars().count(),
        Value::Array(elements) => elements.len(),
        other => return Err(other.expected(ValueType::String, "LEN")),
    };
    Ok(Value::Number(usize_to_f64(length)))
}

/// Applies a string-to-string function to the single argument.
pub fn map(name: &str, args: &[Value], op: fn(&str) -> String) -> EvalResult<Value> {
    Ok(Value::String(op(args[0].as_str(name)?)))
}

/// `CONTAINS(text, part)` tests for a substring; `CONTAINS(array, value)`
/// tests for an element.
pub fn contains(args: &[Value]) -> EvalResult<Value> {
    let found = match &args[0] {
        Value::String(text) => text.contains(args[1].as_str("CONTAINS")?),
        Value::Array(elements) => elements.contains(&args[1]),
        other => return Err(other.expected(ValueType::String, "CONTAINS")),
    };
    Ok(Value::Boolean(found))
}

/// `REPLACE(text, from, to)` replaces every occurrence of `from`.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] when `from` is empty.
pub fn replace(args: &[Value]) -> EvalResult<Value> {
    let text = args[0].as_str("REPLACE")?;
    let from = args[1].as_str("REPLACE")?;
    let to = args[2].as_str("REPLACE")?;
    if from.is_empty() {
        return Err(RuntimeError::invalid_argument("REPLACE", "search text must not be empty"));
    }
    Ok(Value::String(text.replace(from, to)))
}

/// `REPEAT(text, count)`
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for negative counts and
/// [`RuntimeError::NonIntegral`] for fractional ones.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::string::repeat};
///
/// assert_eq!(repeat(&[Value::from("ab"), Value::from(3)]).unwrap(), Value::from("ababab"));
/// assert!(repeat(&[Value::from("ab"), Value::from(-1)]).is_err());
/// ```
pub fn repeat(args: &[Value]) -> EvalResult<Value> {
    let text = args[0].as_str("REPEAT")?;
    let count = f64_to_count(args[1].as_number("REPEAT")?, "REPEAT")?;
    Ok(Value::String(text.repeat(count)))
}

/// `SPLIT(text, separator)` returns an array of strings. An empty separator
/// splits into characters.
pub fn split(args: &[Value]) -> EvalResult<Value> {
    let text = args[0].as_str("SPLIT")?;
    let separator = args[1].as_str("SPLIT")?;

    let parts: Vec<Value> = if separator.is_empty() {
        text.chars().map(|ch| Value::String(ch.to_string())).collect()
    } else {
        text.split(separator).map(Value::from).collect()
    };
    Ok(Value::Array(Rc::new(parts)))
}

/// `JOIN(array [, separator])` concatenates the elements' display forms. The
/// separator defaults to the empty string.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::string::join};
///
/// let parts = Value::Array(vec![Value::from(1), Value::from(2)].into());
/// assert_eq!(join(&[parts, Value::from("-")]).unwrap(), Value::from("1-2"));
/// ```
pub fn join(args: &[Value]) -> EvalResult<Value> {
    let elements = args[0].as_array("JOIN")?;
    let separator = match args.get(1) {
        Some(separator) => separator.as_str("JOIN")?,
        None => "",
    };

    let joined = elements.iter()
                         .map(ToString::to_string)
                         .collect::<Vec<_>>()
                         .join(separator);
    Ok(Value::String(joined))
}
