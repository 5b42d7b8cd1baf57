use crate::{
    error::RuntimeError,
    interpreter::{evaluator::core::EvalResult, value::core::Value},
    stdlib::integer_argument,
};

/// Absolute value of a number.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::math::abs};
///
/// assert_eq!(abs(&[Value::Number(-2.5)]).unwrap(), Value::Number(2.5));
/// ```
pub fn abs(args: &[Value]) -> EvalResult<Value> {
    unary("ABS", args, f64::abs)
}

/// Applies a number-to-number function to the single argument.
pub fn unary(name: &str, args: &[Value], op: fn(f64) -> f64) -> EvalResult<Value> {
    Ok(Value::Number(op(args[0].as_number(name)?)))
}

/// Rounds half away from zero, optionally to a number of decimal places.
///
/// A negative number of places rounds to tens, hundreds and so on.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::math::round};
///
/// assert_eq!(round(&[Value::Number(2.5)]).unwrap(), Value::Number(3.0));
/// assert_eq!(round(&[Value::Number(-1.234), Value::Number(1.0)]).unwrap(), Value::Number(-1.2));
/// assert_eq!(round(&[Value::Number(1250.0), Value::Number(-2.0)]).unwrap(), Value::Number(1300.0));
/// ```
pub fn round(args: &[Value]) -> EvalResult<Value> {
    let value = args[0].as_number("ROUND")?;
    let Some(places) = args.get(1) else {
        return Ok(Value::Number(value.round()));
    };

    let places: i32 = integer_argument(places, "ROUND", "number of decimal places")?;
    let factor = 10f64.powi(places.abs());
    let rounded = if places >= 0 {
        (value * factor).round() / factor
    } else {
        (value / factor).round() * factor
    };
    Ok(Value::Number(rounded))
}

/// Square root of a non-negative number.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for negative numbers.
pub fn sqrt(args: &[Value]) -> EvalResult<Value> {
    let value = args[0].as_number("SQRT")?;
    if value < 0.0 {
        return Err(RuntimeError::invalid_argument("SQRT",
                                                  format!("cannot take the square root of {value}")));
    }
    Ok(Value::Number(value.sqrt()))
}

/// `POW(base, exponent)`, the function form of `^`.
pub fn pow(args: &[Value]) -> EvalResult<Value> {
    let base = args[0].as_number("POW")?;
    let exponent = args[1].as_number("POW")?;
    Ok(Value::Number(base.powf(exponent)))
}

/// Computes the minimum or maximum of numbers.
///
/// Accepts either several numbers or a single array of numbers. The operation
/// is selected by `name`, which must be `"MIN"` or `"MAX"`.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for an empty array, or a type error for
/// anything that is not a number.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::math::extremum};
///
/// let r = extremum("MIN", &[Value::from(3), Value::from(7)]).unwrap();
/// assert_eq!(r, Value::from(3));
///
/// let numbers = Value::Array(vec![Value::from(2), Value::from(9), Value::from(4)].into());
/// assert_eq!(extremum("MAX", &[numbers]).unwrap(), Value::from(9));
/// ```
pub fn extremum(name: &str, args: &[Value]) -> EvalResult<Value> {
    let values = match args {
        [Value::Array(elements)] => elements.as_slice(),
        _ => args,
    };

    let mut numbers = values.iter().map(|value| value.as_number(name));
    let first = numbers.next()
                       .ok_or_else(|| RuntimeError::invalid_argument(name, "array is empty"))??;

    numbers.try_fold(first, |best, next| {
               let next = next?;
               Ok::<_, RuntimeError>(if name == "MIN" { best.min(next) } else { best.max(next) })
           })
           .map(Value::Number)
}
