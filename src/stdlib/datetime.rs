use chrono::{NaiveDate, NaiveDateTime};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
    stdlib::{
        integer_argument,
        time::{clock, invalid_time},
    },
};

/// Format accepted by `DATETIME(text)`.
pub const DATETIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Builds a datetime from text, from a date and a time, or from six
/// components.
///
/// - `DATETIME("YYYY-MM-DDTHH:MM:SS")`
/// - `DATETIME(date, time)`
/// - `DATETIME(year, month, day, hour, minute, second)`
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for invalid components or unparsable
/// text.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::datetime::datetime};
///
/// let parts = [2024, 5, 1, 8, 15, 0].map(Value::from);
/// let built = datetime(&parts).unwrap();
/// assert_eq!(built, datetime(&[Value::from("2024-05-01T08:15:00")]).unwrap());
/// assert_eq!(built.to_string(), "2024-05-01T08:15:00");
/// ```
pub fn datetime(args: &[Value]) -> EvalResult<Value> {
    match args {
        [text] => {
            let text = text.as_str("DATETIME")?;
            let invalid = || {
                RuntimeError::invalid_argument("DATETIME",
                                               format!("{text:?} is not a YYYY-MM-DDTHH:MM:SS datetime"))
            };
            NaiveDateTime::parse_from_str(text, DATETIME_FORMAT).map(Value::DateTime)
                                                                .map_err(|_| invalid())
        },
        [Value::Date(date), Value::Time(time)] => Ok(Value::DateTime(date.and_time(*time))),
        [Value::Date(_), other] => Err(other.expected(ValueType::Time, "DATETIME")),
        [other, _] => Err(other.expected(ValueType::Date, "DATETIME")),
        _ => {
            let year: i32 = integer_argument(&args[0], "DATETIME", "year")?;
            let month: u32 = integer_argument(&args[1], "DATETIME", "month")?;
            let day: u32 = integer_argument(&args[2], "DATETIME", "day")?;
            let invalid = || {
                RuntimeError::invalid_argument("DATETIME",
                                               format!("{year}-{month}-{day} is not a calendar date"))
            };
            let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;
            let (hour, minute, second) = clock(&args[3..6], "DATETIME")?;
            date.and_hms_opt(hour, minute, second)
                .map(Value::DateTime)
                .ok_or_else(|| invalid_time("DATETIME", hour, minute, second))
        },
    }
}

/// The date part of a datetime.
pub fn to_date(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::DateTime(datetime) => Ok(Value::Date(datetime.date())),
        Value::Date(date) => Ok(Value::Date(*date)),
        other => Err(other.expected(ValueType::DateTime, "TO_DATE")),
    }
}

/// The time part of a datetime.
pub fn to_time(args: &[Value]) -> EvalResult<Value> {
    match &args[0] {
        Value::DateTime(datetime) => Ok(Value::Time(datetime.time())),
        Value::Time(time) => Ok(Value::Time(*time)),
        other => Err(other.expected(ValueType::DateTime, "TO_TIME")),
    }
}
