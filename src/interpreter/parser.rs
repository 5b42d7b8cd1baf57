/// Parser entry point and comment attachment.
///
/// Splits the token stream into top-level statements, distributes the
/// comments collected by the lexer over them, and decides whether a
/// `Program` wrapper is needed.
pub mod core;

/// Precedence climbing over infix operators.
///
/// Holds the binding-power table and the infix handlers for assignment,
/// ranges, pipes and the binary operators, plus postfix indexing.
pub mod expression;

/// Prefix constructs.
///
/// Literals, identifiers and calls, unary operators, grouping, array
/// literals, and the `if` and `for` expressions.
pub mod prefix;

/// Utility functions for the parser.
///
/// The token cursor and the comma-separated list helper shared by array
/// literals, calls and pipes.
pub mod utils;
