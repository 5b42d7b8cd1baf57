use crate::{error::RuntimeError, interpreter::evaluator::core::EvalResult};

/// Largest integer exactly representable as an `f64` (`2^53 - 1`).
pub const MAX_SAFE_INTEGER: i64 = 9_007_199_254_740_991;

/// Converts an `f64` to `i64` if the value is finite, integral and within the
/// range of exactly representable integers.
///
/// ## Errors
/// Returns [`RuntimeError::NonIntegral`] for fractional, non-finite or
/// out-of-range values.
///
/// ## Example
/// ```
/// use calcula::{error::RuntimeError, util::num::f64_to_i64_checked};
///
/// assert_eq!(f64_to_i64_checked(-3.0).unwrap(), -3);
/// assert!(matches!(f64_to_i64_checked(1.5), Err(RuntimeError::NonIntegral { .. })));
/// assert!(f64_to_i64_checked(f64::NAN).is_err());
/// ```
#[allow(clippy::cast_possible_truncation)]
#[allow(clippy::cast_precision_loss)]
pub fn f64_to_i64_checked(value: f64) -> EvalResult<i64> {
    if !value.is_finite() || value.fract() != 0.0 || value.abs() > MAX_SAFE_INTEGER as f64 {
        return Err(RuntimeError::NonIntegral { value });
    }
    Ok(value as i64)
}

/// Converts an `i64` to `f64`, which is lossless for every integer the
/// language can produce.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn i64_to_f64(value: i64) -> f64 {
    value as f64
}

/// Converts a length or count into an `f64`.
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub const fn usize_to_f64(value: usize) -> f64 {
    value as f64
}

/// Converts a number into a non-negative count, such as a repetition count.
///
/// ## Errors
/// Returns [`RuntimeError::NonIntegral`] for non-integers and
/// [`RuntimeError::InvalidArgument`] for negative values.
pub fn f64_to_count(value: f64, function: &str) -> EvalResult<usize> {
    let integer = f64_to_i64_checked(value)?;
    usize::try_from(integer).map_err(|_| {
                                RuntimeError::invalid_argument(function,
                                                               format!("count must not be negative, found {integer}"))
                            })
}

/// Resolves a possibly negative index against a length.
///
/// Negative indices count from the end, so `-1` is the last element.
///
/// ## Errors
/// Returns [`RuntimeError::IndexOutOfBounds`] when the resolved position does
/// not fall inside `0..length`.
///
/// ## Example
/// ```
/// use calcula::util::num::resolve_index;
///
/// assert_eq!(resolve_index(1, 3).unwrap(), 1);
/// assert_eq!(resolve_index(-1, 3).unwrap(), 2);
/// assert!(resolve_index(3, 3).is_err());
/// assert!(resolve_index(-4, 3).is_err());
/// ```
pub fn resolve_index(index: i64, length: usize) -> EvalResult<usize> {
    let out_of_bounds = || RuntimeError::IndexOutOfBounds { index, length };
    let signed_length = i64::try_from(length).map_err(|_| out_of_bounds())?;
    let position = if index < 0 { signed_length + index } else { index };

    if position < 0 || position >= signed_length {
        return Err(out_of_bounds());
    }
    usize::try_from(position).map_err(|_| out_of_bounds())
}
