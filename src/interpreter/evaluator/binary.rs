/// Operator dispatch.
///
/// [`core::apply_binary`] is the single definition of what a binary operator
/// does to two values. The evaluator and the optimizer's constant folder both
/// call it, so folding can never disagree with evaluation.
pub mod core;

/// Arithmetic on numbers plus string and array concatenation.
pub mod scalar;

/// Structural equality and typed ordering.
pub mod comparison;

/// Short-circuiting `&&` and `||`.
pub mod logic;
