/// Parsing errors.
///
/// Lexical and syntax errors. Every parse error carries the exact byte span of
/// the offending input so a host can point at it.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all errors raised while evaluating a program, or while the
/// optimizer folds constants eagerly. Type mismatches, domain errors such as
/// division by zero, and undefined references all live here.
pub mod runtime_error;

pub use parse_error::{LineColumn, ParseError, to_line_column};
pub use runtime_error::{ErrorCategory, RuntimeError};

/// Top-level error for operations that both parse and evaluate.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The source failed to lex or parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program failed during optimization or evaluation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
