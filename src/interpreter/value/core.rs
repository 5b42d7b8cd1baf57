use std::rc::Rc;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::{
    error::RuntimeError, interpreter::evaluator::core::EvalResult, util::num::f64_to_i64_checked,
};

/// Represents a runtime value in the interpreter.
///
/// Equality is structural: arrays compare element by element, and values of
/// different types are never equal.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A double precision number; the language has no separate integer type.
    Number(f64),
    /// A UTF-8 string.
    String(String),
    /// A boolean value (`true` or `false`).
    /// Produced by comparison and logical operators, required by `if`
    /// conditions and `for` guards.
    Boolean(bool),
    /// A calendar date.
    Date(NaiveDate),
    /// A wall-clock time.
    Time(NaiveTime),
    /// A date and time without a time zone.
    DateTime(NaiveDateTime),
    /// A homogeneous array of values.
    Array(Rc<Vec<Self>>),
}

/// The runtime type of a [`Value`], used in error messages and for the array
/// homogeneity invariant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    /// [`Value::Number`]
    Number,
    /// [`Value::String`]
    String,
    /// [`Value::Boolean`]
    Boolean,
    /// [`Value::Date`]
    Date,
    /// [`Value::Time`]
    Time,
    /// [`Value::DateTime`]
    DateTime,
    /// [`Value::Array`]
    Array,
}

impl std::fmt::Display for ValueType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Date => "date",
            Self::Time => "time",
            Self::DateTime => "datetime",
            Self::Array => "array",
        };
        write!(f, "{name}")
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<NaiveDate> for Value {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for Value {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(v: NaiveDateTime) -> Self {
        Self::DateTime(v)
    }
}

impl Value {
    /// Returns the runtime type of the value.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        match self {
            Self::Number(_) => ValueType::Number,
            Self::String(_) => ValueType::String,
            Self::Boolean(_) => ValueType::Boolean,
            Self::Date(_) => ValueType::Date,
            Self::Time(_) => ValueType::Time,
            Self::DateTime(_) => ValueType::DateTime,
            Self::Array(_) => ValueType::Array,
        }
    }

    /// Returns the number, or a type error naming `context`.
    ///
    /// # Example
    /// ```
    /// use calcula::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Number(2.0).as_number("test").unwrap(), 2.0);
    /// assert!(Value::Boolean(true).as_number("test").is_err());
    /// ```
    pub fn as_number(&self, context: &str) -> EvalResult<f64> {
        match self {
            Self::Number(n) => Ok(*n),
            other => Err(other.expected(ValueType::Number, context)),
        }
    }

    /// Returns the number as an exact integer.
    pub fn as_integer(&self, context: &str) -> EvalResult<i64> {
        f64_to_i64_checked(self.as_number(context)?)
    }

    /// Returns the boolean, or a type error naming `context`.
    pub fn as_bool(&self, context: &str) -> EvalResult<bool> {
        match self {
            Self::Boolean(b) => Ok(*b),
            other => Err(other.expected(ValueType::Boolean, context)),
        }
    }

    /// Returns the string slice, or a type error naming `context`.
    pub fn as_str(&self, context: &str) -> EvalResult<&str> {
        match self {
            Self::String(s) => Ok(s),
            other => Err(other.expected(ValueType::String, context)),
        }
    }

    /// Returns the array elements, or a type error naming `context`.
    pub fn as_array(&self, context: &str) -> EvalResult<&[Self]> {
        match self {
            Self::Array(elements) => Ok(elements),
            other => Err(other.expected(ValueType::Array, context)),
        }
    }

    /// Builds the type error for a value that is not of the `expected` type.
    #[must_use]
    pub fn expected(&self, expected: ValueType, context: &str) -> RuntimeError {
        RuntimeError::type_error(format!("{context} expects a {expected}, found {}",
                                         self.value_type()))
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) if *n == 0.0 => write!(f, "0"),
            Self::Number(n) => write!(f, "{n}"),
            Self::String(s) => write!(f, "{s}"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::Time(t) => write!(f, "{}", t.format("%H:%M:%S")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%dT%H:%M:%S")),
            Self::Array(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match element {
                        Self::String(s) => write!(f, "{s:?}")?,
                        other => write!(f, "{other}")?,
                    }
                }
                write!(f, "]")
            },
        }
    }
}
