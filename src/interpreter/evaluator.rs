/// Binary operator evaluation logic.
///
/// Handles arithmetic, concatenation, comparisons and the short-circuiting
/// logical operators. The value-level entry point is shared with the
/// optimizer's constant folder.
pub mod binary;

/// Unary operator evaluation logic.
///
/// Implements arithmetic negation and logical NOT.
pub mod unary;

/// Core evaluation logic and context management.
///
/// Contains the main evaluation engine and the runtime context holding the
/// host's variables and functions.
pub mod core;

/// Variable bindings for one evaluation.
///
/// The scope map plus the guard that shadows loop bindings and restores them
/// when dropped.
pub mod scope;

/// Evaluation of for-loop expressions.
///
/// Map and accumulator forms, guards, and loop-local bindings.
pub mod for_loop;

/// Function evaluation.
///
/// Calls and pipes: name lookup, argument evaluation and placeholder
/// substitution.
pub mod function;

/// Indexing and ranges.
///
/// Integer-only indices with negative indices counting from the end, and
/// integer ranges.
pub mod index;
