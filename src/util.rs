/// Numeric conversion helpers.
///
/// The language has a single number type (`f64`), but indices, range bounds
/// and calendar components must be integers. These helpers perform the
/// conversions without silent truncation and report a [`RuntimeError`] when a
/// value is fractional, non-finite or out of range.
///
/// [`RuntimeError`]: crate::error::RuntimeError
pub mod num;
