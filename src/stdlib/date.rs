use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Value, ValueType},
    },
    stdlib::integer_argument,
    util::num::i64_to_f64,
};

/// Format accepted by `DATE(text)`, the one dates display in.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// `DATE(year, month, day)` or `DATE("YYYY-MM-DD")`.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] for components that do not form a
/// calendar date, such as February 30th, and for unparsable text.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::date::date};
///
/// let built = date(&[Value::from(2024), Value::from(2), Value::from(29)]).unwrap();
/// assert_eq!(built, date(&[Value::from("2024-02-29")]).unwrap());
/// assert!(date(&[Value::from(2023), Value::from(2), Value::from(29)]).is_err());
/// ```
pub fn date(args: &[Value]) -> EvalResult<Value> {
    if let [text] = args {
        let text = text.as_str("DATE")?;
        let invalid =
            || RuntimeError::invalid_argument("DATE", format!("{text:?} is not a YYYY-MM-DD date"));
        return NaiveDate::parse_from_str(text, DATE_FORMAT).map(Value::Date)
                                                           .map_err(|_| invalid());
    }

    let year: i32 = integer_argument(&args[0], "DATE", "year")?;
    let month: u32 = integer_argument(&args[1], "DATE", "month")?;
    let day: u32 = integer_argument(&args[2], "DATE", "day")?;
    let invalid = || {
        RuntimeError::invalid_argument("DATE", format!("{year}-{month}-{day} is not a calendar date"))
    };
    NaiveDate::from_ymd_opt(year, month, day).map(Value::Date)
                                             .ok_or_else(invalid)
}

/// `YEAR`, `MONTH` or `DAY` of a date or datetime.
pub fn component(name: &str, args: &[Value]) -> EvalResult<Value> {
    let date = as_date(&args[0], name)?;
    let component = match name {
        "YEAR" => f64::from(date.year()),
        "MONTH" => f64::from(date.month()),
        _ => f64::from(date.day()),
    };
    Ok(Value::Number(component))
}

/// `ADD_DAYS(date, days)` shifts a date or datetime by whole days; `days`
/// may be negative.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] when the result leaves the supported
/// calendar range.
pub fn add_days(args: &[Value]) -> EvalResult<Value> {
    let days = args[1].as_integer("ADD_DAYS")?;
    let delta = TimeDelta::try_days(days);
    let shifted = match &args[0] {
        Value::Date(date) => delta.and_then(|delta| date.checked_add_signed(delta)).map(Value::Date),
        Value::DateTime(datetime) => {
            delta.and_then(|delta| datetime.checked_add_signed(delta)).map(Value::DateTime)
        },
        other => return Err(other.expected(ValueType::Date, "ADD_DAYS")),
    };
    shifted.ok_or_else(|| RuntimeError::invalid_argument("ADD_DAYS", "date out of range"))
}

/// `DAYS_BETWEEN(from, to)` counts the days from `from` to `to`; negative when
/// `to` comes first.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::date::{date, days_between}};
///
/// let from = date(&[Value::from("2024-01-01")]).unwrap();
/// let to = date(&[Value::from("2024-03-01")]).unwrap();
/// assert_eq!(days_between(&[from, to]).unwrap(), Value::from(60));
/// ```
pub fn days_between(args: &[Value]) -> EvalResult<Value> {
    let from = as_date(&args[0], "DAYS_BETWEEN")?;
    let to = as_date(&args[1], "DAYS_BETWEEN")?;
    Ok(Value::Number(i64_to_f64(to.signed_duration_since(from).num_days())))
}

/// `AGE(birth, reference)` counts the full years from `birth` to `reference`.
///
/// # Errors
/// [`RuntimeError::InvalidArgument`] when `birth` is after `reference`.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, stdlib::date::{age, date}};
///
/// let birth = date(&[Value::from("2000-06-15")]).unwrap();
/// let before = date(&[Value::from("2024-06-14")]).unwrap();
/// let on = date(&[Value::from("2024-06-15")]).unwrap();
/// assert_eq!(age(&[birth.clone(), before]).unwrap(), Value::from(23));
/// assert_eq!(age(&[birth, on]).unwrap(), Value::from(24));
/// ```
pub fn age(args: &[Value]) -> EvalResult<Value> {
    let birth = as_date(&args[0], "AGE")?;
    let reference = as_date(&args[1], "AGE")?;
    if birth > reference {
        return Err(RuntimeError::invalid_argument("AGE",
                                                  format!("birth date {birth} is after {reference}")));
    }

    let mut years = reference.year() - birth.year();
    if (reference.month(), reference.day()) < (birth.month(), birth.day()) {
        years -= 1;
    }
    Ok(Value::Number(f64::from(years)))
}

/// Returns the date of a date or datetime value.
pub(crate) fn as_date(value: &Value, context: &str) -> EvalResult<NaiveDate> {
    match value {
        Value::Date(date) => Ok(*date),
        Value::DateTime(datetime) => Ok(datetime.date()),
        other => Err(other.expected(ValueType::Date, context)),
    }
}
