use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{EvalResult, Function},
        value::core::Value,
    },
};

/// Array functions: aggregates and reordering.
pub mod array;
/// Conversions between value types.
pub mod convert;
/// Calendar dates.
pub mod date;
/// Dates with a time of day.
pub mod datetime;
/// Numeric functions.
pub mod math;
/// String functions.
pub mod string;
/// Times of day.
pub mod time;

/// Signature of a standard library function.
///
/// A builtin receives its evaluated arguments, already checked against its
/// [`Arity`].
type BuiltinFn = fn(&[Value]) -> EvalResult<Value>;

/// Specifies the allowed number of arguments for a builtin.
///
/// - `Exact(n)` means the builtin must receive exactly `n` arguments.
/// - `OneOf(slice)` means the builtin accepts any arity listed in `slice`.
/// - `AtLeast(n)` means the builtin accepts `n` or more arguments.
#[derive(Clone, Copy)]
enum Arity {
    Exact(usize),
    OneOf(&'static [usize]),
    AtLeast(usize),
}

/// Defines builtin functions by generating a lookup table and a name list.
///
/// Each entry provides:
/// - a string name,
/// - an arity specification,
/// - a function pointer implementing the builtin.
///
/// The macro produces `BuiltinDef` (internal metadata), `BUILTIN_TABLE` (the
/// static table [`functions`] registers) and `BUILTIN_FUNCTIONS` (the public
/// list of names).
macro_rules! builtin_functions {
    (
        $(
            $name:literal => {
                arity: $arity:expr,
                func: $func:expr $(,)?
            }
        ),* $(,)?
    ) => {
        struct BuiltinDef {
            name:  &'static str,
            arity: Arity,
            func:  BuiltinFn,
        }
        static BUILTIN_TABLE: &[BuiltinDef] = &[
            $(
                BuiltinDef { name: $name, arity: $arity, func: $func },
            )*
        ];
        /// Names of every standard library function.
        pub const BUILTIN_FUNCTIONS: &[&str] = &[
            $($name,)*
        ];
    };
}

builtin_functions! {
    "ABS"          => { arity: Arity::Exact(1), func: math::abs },
    "ROUND"        => { arity: Arity::OneOf(&[1, 2]), func: math::round },
    "FLOOR"        => { arity: Arity::Exact(1), func: |args| math::unary("FLOOR", args, f64::floor) },
    "CEIL"         => { arity: Arity::Exact(1), func: |args| math::unary("CEIL", args, f64::ceil) },
    "SQRT"         => { arity: Arity::Exact(1), func: math::sqrt },
    "POW"          => { arity: Arity::Exact(2), func: math::pow },
    "MIN"          => { arity: Arity::AtLeast(1), func: |args| math::extremum("MIN", args) },
    "MAX"          => { arity: Arity::AtLeast(1), func: |args| math::extremum("MAX", args) },
    "LEN"          => { arity: Arity::Exact(1), func: string::len },
    "UPPER"        => { arity: Arity::Exact(1), func: |args| string::map("UPPER", args, str::to_uppercase) },
    "LOWER"        => { arity: Arity::Exact(1), func: |args| string::map("LOWER", args, str::to_lowercase) },
    "TRIM"         => { arity: Arity::Exact(1), func: |args| string::map("TRIM", args, |s| s.trim().to_string()) },
    "CONTAINS"     => { arity: Arity::Exact(2), func: string::contains },
    "REPLACE"      => { arity: Arity::Exact(3), func: string::replace },
    "REPEAT"       => { arity: Arity::Exact(2), func: string::repeat },
    "SPLIT"        => { arity: Arity::Exact(2), func: string::split },
    "JOIN"         => { arity: Arity::OneOf(&[1, 2]), func: string::join },
    "SUM"          => { arity: Arity::Exact(1), func: array::sum },
    "AVERAGE"      => { arity: Arity::Exact(1), func: array::average },
    "COUNT"        => { arity: Arity::Exact(1), func: array::count },
    "FIRST"        => { arity: Arity::Exact(1), func: |args| array::end("FIRST", args, 0) },
    "LAST"         => { arity: Arity::Exact(1), func: |args| array::end("LAST", args, -1) },
    "REVERSE"      => { arity: Arity::Exact(1), func: array::reverse },
    "SORT"         => { arity: Arity::Exact(1), func: array::sort },
    "FLATTEN"      => { arity: Arity::Exact(1), func: array::flatten },
    "STRING"       => { arity: Arity::Exact(1), func: convert::string },
    "NUMBER"       => { arity: Arity::Exact(1), func: convert::number },
    "TYPE"         => { arity: Arity::Exact(1), func: convert::type_name },
    "DATE"         => { arity: Arity::OneOf(&[1, 3]), func: date::date },
    "YEAR"         => { arity: Arity::Exact(1), func: |args| date::component("YEAR", args) },
    "MONTH"        => { arity: Arity::Exact(1), func: |args| date::component("MONTH", args) },
    "DAY"          => { arity: Arity::Exact(1), func: |args| date::component("DAY", args) },
    "ADD_DAYS"     => { arity: Arity::Exact(2), func: date::add_days },
    "DAYS_BETWEEN" => { arity: Arity::Exact(2), func: date::days_between },
    "AGE"          => { arity: Arity::Exact(2), func: date::age },
    "TIME"         => { arity: Arity::OneOf(&[1, 3]), func: time::time },
    "HOUR"         => { arity: Arity::Exact(1), func: |args| time::component("HOUR", args) },
    "MINUTE"       => { arity: Arity::Exact(1), func: |args| time::component("MINUTE", args) },
    "SECOND"       => { arity: Arity::Exact(1), func: |args| time::component("SECOND", args) },
    "DATETIME"     => { arity: Arity::OneOf(&[1, 2, 6]), func: datetime::datetime },
    "TO_DATE"      => { arity: Arity::Exact(1), func: datetime::to_date },
    "TO_TIME"      => { arity: Arity::Exact(1), func: datetime::to_time },
}

impl Arity {
    /// Tests whether the given argument count satisfies this arity constraint.
    ///
    /// Returns `true` if the count is permitted, `false` otherwise.
    fn check(&self, n: usize) -> bool {
        match self {
            Self::Exact(m) => n == *m,
            Self::OneOf(arr) => arr.contains(&n),
            Self::AtLeast(m) => n >= *m,
        }
    }

    /// Describes the accepted counts for error messages.
    fn describe(&self) -> String {
        match self {
            Self::Exact(m) => m.to_string(),
            Self::OneOf(arr) => arr.iter()
                                   .map(ToString::to_string)
                                   .collect::<Vec<_>>()
                                   .join(" or "),
            Self::AtLeast(m) => format!("at least {m}"),
        }
    }
}

/// Returns every standard library function, ready to be registered in a
/// [`Context`](crate::interpreter::evaluator::core::Context).
///
/// Each function checks its argument count before running and fails with
/// [`RuntimeError::ArgumentCountMismatch`] otherwise.
///
/// # Example
/// ```
/// use calcula::{
///     error::RuntimeError, evaluate_source, interpreter::evaluator::core::Context,
///     interpreter::value::core::Value, Error,
/// };
///
/// let context = Context::new().with_stdlib();
/// assert_eq!(evaluate_source("ROUND(SQRT(2), 2)", &context).unwrap(), Value::Number(1.41));
/// assert!(matches!(evaluate_source("ABS(1, 2)", &context),
///                  Err(Error::Runtime(RuntimeError::ArgumentCountMismatch { .. }))));
/// ```
pub fn functions() -> impl Iterator<Item = (String, Function)> {
    BUILTIN_TABLE.iter().map(|builtin| {
                            let function: Function = Rc::new(move |args: &[Value]| {
                                if !builtin.arity.check(args.len()) {
                                    return Err(RuntimeError::ArgumentCountMismatch {
                                        function: builtin.name.to_string(),
                                        expected: builtin.arity.describe(),
                                        found:    args.len(),
                                    });
                                }
                                (builtin.func)(args)
                            });
                            (builtin.name.to_string(), function)
                        })
}

/// Converts an integer argument into a calendar or clock component type.
///
/// ## Errors
/// [`RuntimeError::NonIntegral`] for fractional numbers, or
/// [`RuntimeError::InvalidArgument`] when the integer does not fit `T`.
fn integer_argument<T: TryFrom<i64>>(value: &Value, function: &str, what: &str) -> EvalResult<T> {
    let integer = value.as_integer(function)?;
    T::try_from(integer).map_err(|_| {
                            RuntimeError::invalid_argument(function,
                                                           format!("{what} {integer} is out of range"))
                        })
}
