use crate::interpreter::value::core::ValueType;

/// Broad classes of runtime failures, for hosts that handle errors by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// An operand or argument had the wrong type.
    Type,
    /// A value was outside the domain of an operation.
    Range,
    /// A variable or function name could not be resolved.
    UndefinedReference,
    /// A malformed tree reached the evaluator.
    Internal,
}

/// Represents all errors that can occur during evaluation and constant folding.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RuntimeError {
    /// A value had an unexpected or incompatible type.
    #[error("Type error: {details}")]
    TypeError {
        /// Details about the type mismatch.
        details: String,
    },
    /// An array would contain elements of different types.
    #[error("Array elements must all have the same type: expected {expected}, found {found}")]
    HeterogeneousArray {
        /// Type of the first element.
        expected: ValueType,
        /// Type of the first element that differs.
        found:    ValueType,
    },
    /// Attempted division by zero.
    #[error("Division by zero")]
    DivisionByZero,
    /// Attempted modulo by zero.
    #[error("Modulo by zero")]
    ModuloByZero,
    /// Tried to access an array or string element outside its bounds.
    #[error("Index {index} out of bounds for length {length}")]
    IndexOutOfBounds {
        /// The requested index, as written.
        index:  i64,
        /// Length of the indexed value.
        length: usize,
    },
    /// A range whose start lies after its end.
    #[error("Invalid range: start {start} is greater than end {end}")]
    InvalidRange {
        /// Lower bound.
        start: i64,
        /// Upper bound.
        end:   i64,
    },
    /// A number was used where an integer is required.
    #[error("Expected an integer but found {value}")]
    NonIntegral {
        /// The offending value.
        value: f64,
    },
    /// An argument was outside the domain of a function.
    #[error("Invalid argument to {function}: {details}")]
    InvalidArgument {
        /// Name of the function.
        function: String,
        /// Why the argument is invalid.
        details:  String,
    },
    /// The wrong number of arguments was supplied to a function.
    #[error("{function} expects {expected} argument(s) but received {found}")]
    ArgumentCountMismatch {
        /// Name of the function.
        function: String,
        /// Description of the accepted counts.
        expected: String,
        /// Number of arguments received.
        found:    usize,
    },
    /// Tried to read a variable that is not bound.
    #[error("Undefined variable '{name}'")]
    UndefinedVariable {
        /// Name of the variable.
        name: String,
    },
    /// Called a function the context does not provide.
    #[error("Undefined function '{name}'")]
    UndefinedFunction {
        /// Name of the function.
        name: String,
    },
    /// A `?` placeholder was evaluated outside a pipe's argument list.
    #[error("Placeholder '?' is only valid inside a pipe expression")]
    PlaceholderOutsidePipe,
    /// A program without statements.
    #[error("Cannot evaluate an empty program")]
    EmptyProgram,
}

impl RuntimeError {
    /// Shorthand for a [`RuntimeError::TypeError`].
    #[must_use]
    pub fn type_error(details: impl Into<String>) -> Self {
        Self::TypeError { details: details.into() }
    }

    /// Shorthand for a [`RuntimeError::InvalidArgument`].
    #[must_use]
    pub fn invalid_argument(function: &str, details: impl Into<String>) -> Self {
        Self::InvalidArgument { function: function.to_string(),
                                details:  details.into(), }
    }

    /// Returns the category the error belongs to.
    ///
    /// # Example
    /// ```
    /// use calcula::error::{ErrorCategory, RuntimeError};
    ///
    /// assert_eq!(RuntimeError::DivisionByZero.category(), ErrorCategory::Range);
    /// ```
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::TypeError { .. }
            | Self::HeterogeneousArray { .. }
            | Self::NonIntegral { .. }
            | Self::ArgumentCountMismatch { .. } => ErrorCategory::Type,
            Self::DivisionByZero
            | Self::ModuloByZero
            | Self::IndexOutOfBounds { .. }
            | Self::InvalidRange { .. }
            | Self::InvalidArgument { .. } => ErrorCategory::Range,
            Self::UndefinedVariable { .. } | Self::UndefinedFunction { .. } => {
                ErrorCategory::UndefinedReference
            },
            Self::PlaceholderOutsidePipe | Self::EmptyProgram => ErrorCategory::Internal,
        }
    }

    /// Returns `true` for the errors constant folding must surface eagerly.
    #[must_use]
    pub const fn is_zero_divisor(&self) -> bool {
        matches!(self, Self::DivisionByZero | Self::ModuloByZero)
    }
}
