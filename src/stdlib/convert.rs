use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
};

/// The display form of any value, as the CLI prints it.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::convert::string};
///
/// assert_eq!(string(&[Value::Number(3.0)]).unwrap(), Value::from("3"));
/// assert_eq!(string(&[Value::Boolean(true)]).unwrap(), Value::from("true"));
/// ```
pub fn string(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::String(args[0].to_string()))
}

/// Converts a string or boolean to a number; numbers pass through.
///
/// Strings are parsed after trimming surrounding whitespace. `true` is `1`
/// and `false` is `0`.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for strings that are not numbers, and a
/// type error for other values.
pub fn number(args: &[Value]) -> EvalResult<Value> {
    let number = match &args[0] {
        Value::Number(n) => *n,
        Value::Boolean(b) => f64::from(u8::from(*b)),
        Value::String(s) => s.trim().parse().map_err(|_| {
                                                 RuntimeError::invalid_argument("NUMBER",
                                                                                format!("{s:?} is not a number"))
                                             })?,
        other => {
            return Err(RuntimeError::type_error(format!("NUMBER cannot convert a {}",
                                                        other.value_type())));
        },
    };
    Ok(Value::Number(number))
}

/// The name of the value's runtime type, such as `"number"` or `"date"`.
pub fn type_name(args: &[Value]) -> EvalResult<Value> {
    Ok(Value::String(args[0].value_type().to_string()))
}
