use chrono::{NaiveTime, Timelike};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
    stdlib::integer_argument,
};

/// Format accepted by `TIME(text)`.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// `TIME(hour, minute, second)` or `TIME("HH:MM:SS")`.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for components outside a day, such as
/// hour 24, and for unparsable text.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::time::time};
///
/// let noon = time(&[Value::from(12), Value::from(30), Value::from(0)]).unwrap();
/// assert_eq!(noon.to_string(), "12:30:00");
/// assert!(time(&[Value::from(24), Value::from(0), Value::from(0)]).is_err());
/// ```
pub fn time(args: &[Value]) -> EvalResult<Value> {
    if let [text] = args {
        let text = text.as_str("TIME")?;
        let invalid =
            || RuntimeError::invalid_argument("TIME", format!("{text:?} is not an HH:MM:SS time"));
        return NaiveTime::parse_from_str(text, TIME_FORMAT).map(Value::Time)
                                                           .map_err(|_| invalid());
    }

    let (hour, minute, second) = clock(&args[0..3], "TIME")?;
    NaiveTime::from_hms_opt(hour, minute, second)
        .map(Value::Time)
        .ok_or_else(|| invalid_time("TIME", hour, minute, second))
}

/// `HOUR`, `MINUTE` or `SECOND` of a time or datetime.
pub fn component(name: &str, args: &[Value]) -> EvalResult<Value> {
    let time = match &args[0] {
        Value::Time(time) => *time,
        Value::DateTime(datetime) => datetime.time(),
        other => return Err(other.expected(ValueType::Time, name)),
    };
    let component = match name {
        "HOUR" => time.hour(),
        "MINUTE" => time.minute(),
        _ => time.second(),
    };
    Ok(Value::Number(f64::from(component)))
}

/// Reads hour, minute and second arguments.
pub(crate) fn clock(args: &[Value], function: &str) -> EvalResult<(u32, u32, u32)> {
    Ok((integer_argument(&args[0], function, "hour")?,
        integer_argument(&args[1], function, "minute")?,
        integer_argument(&args[2], function, "second")?))
}

pub(crate) fn invalid_time(function: &str, hour: u32, minute: u32, second: u32) -> RuntimeError {
    RuntimeError::invalid_argument(function,
                                   format!("{hour:02}:{minute:02}:{second:02} is not a time of day"))
}
