//! # calcula
//!
//! calcula is an embeddable formula language written in Rust.
//! It parses, analyzes, optimizes and evaluates small programs made of
//! expressions: arithmetic, strings, arrays, conditionals, `for`
//! comprehensions with accumulators, and `|>` pipes into host functions.
//!
//! ```
//! use calcula::{evaluate_source, interpreter::{evaluator::core::Context, value::core::Value}};
//!
//! let context = Context::new().with_variable("rate", 0.5);
//! let total = evaluate_source("for p in [10, 20, 30] when p > 10 into sum = 0 then sum + p * rate",
//!                             &context).unwrap();
//! assert_eq!(total, Value::Number(25.0));
//! ```

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::collections::{HashMap, HashSet};

pub use crate::{
    analyzer::{extract_assigned_variables, extract_input_variables},
    codegen::generate,
    error::{Error, to_line_column},
};
use crate::{
    ast::{Node, NodeRef},
    error::{ParseError, RuntimeError},
    interpreter::{evaluator::core::Context, parser::core::parse_program, value::core::Value},
};

/// Read-only queries over a parsed program.
///
/// This module answers questions a host asks before evaluating: which
/// variables a program defines, which of them are plain inputs, and which
/// names an expression reads. The optimizer relies on the same queries to
/// decide what it may rewrite.
///
/// # Responsibilities
/// - Lists input and assigned variables in a stable order.
/// - Computes free variables, respecting `for` loop scoping.
pub mod analyzer;
/// Defines the structure of parsed code.
///
/// This module declares the `Node` type and the closed `NodeKind` enum that
/// represent programs as a tree. The AST is built by the parser, rewritten by
/// the optimizer, printed by the code generator and walked by the evaluator.
///
/// # Responsibilities
/// - Defines a node variant for every language construct.
/// - Carries comments as metadata on nodes.
/// - Shares subtrees through reference counting so rewrites stay cheap.
pub mod ast;
/// Turns an AST back into source text.
pub mod codegen;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while lexing, parsing,
/// optimizing or evaluating code. Parse errors carry byte spans, runtime
/// errors carry enough detail to explain themselves, and both convert into
/// the crate-level [`Error`].
///
/// # Responsibilities
/// - Defines error enums for all failure modes.
/// - Groups runtime errors into categories a host can match on.
/// - Maps byte offsets to line and column for user feedback.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and value
/// representations into a complete runtime.
///
/// # Responsibilities
/// - Coordinates all core components: lexer, parser, evaluator, and value
///   types.
/// - Provides entry points for parsing and evaluating user code.
/// - Manages the flow of data and errors between phases.
pub mod interpreter;
/// Semantics-preserving rewrites of the AST.
///
/// # Responsibilities
/// - Folds constant expressions with the evaluator's own operator semantics.
/// - Propagates variables that provably hold one literal.
/// - Removes assignments nothing reads.
pub mod optimizer;
/// The standard library of host functions.
///
/// These functions are ordinary host functions: a [`Context`] gets them
/// through [`Context::with_stdlib`] and may replace any of them.
pub mod stdlib;
/// General utilities for safe numeric conversion and helpers.
///
/// This module provides reusable helpers and conversion routines that are used
/// throughout the interpreter, the optimizer and the standard library.
///
/// # Responsibilities
/// - Safely convert between `i64`, `usize`, and `f64` without silent data
///   loss.
/// - Resolve negative indices against a length.
pub mod util;

/// Parses source code into an AST.
///
/// A single statement is returned as-is; several statements are wrapped in a
/// `Program` node.
///
/// # Errors
/// Returns the first [`ParseError`], with the byte span of the offending
/// input.
///
/// # Examples
/// ```
/// use calcula::{ast::NodeKind, parse};
///
/// let node = parse("total = price * 2").unwrap();
/// assert!(matches!(node.kind, NodeKind::Assignment { .. }));
///
/// let error = parse("1 +").unwrap_err();
/// assert_eq!(error.message, "Unexpected end of input");
/// ```
pub fn parse(source: &str) -> Result<NodeRef, ParseError> {
    parse_program(source)
}

/// Optimizes an AST. See [`optimizer::optimize`].
///
/// # Errors
/// Returns the division or modulo by zero that constant folding hit.
pub fn optimize(node: &NodeRef,
                external: Option<&HashSet<String>>)
                -> Result<NodeRef, RuntimeError> {
    optimizer::optimize(node, external)
}

/// Evaluates an AST against a context and returns the value of its last
/// statement.
///
/// # Errors
/// Returns the first [`RuntimeError`] raised while walking the tree.
pub fn evaluate(node: &Node, context: &Context) -> Result<Value, RuntimeError> {
    context.evaluate(node)
}

/// Evaluates an AST and returns every variable binding at the end of the
/// run, the context's own variables included.
///
/// # Errors
/// Returns the first [`RuntimeError`] raised while walking the tree.
///
/// # Examples
/// ```
/// use calcula::{evaluate_scope, interpreter::{evaluator::core::Context, value::core::Value}, parse};
///
/// let program = parse("a = 2; b = a * base").unwrap();
/// let scope = evaluate_scope(&program, &Context::new().with_variable("base", 5)).unwrap();
/// assert_eq!(scope["b"], Value::Number(10.0));
/// assert_eq!(scope["base"], Value::Number(5.0));
/// ```
pub fn evaluate_scope(node: &Node,
                      context: &Context)
                      -> Result<HashMap<String, Value>, RuntimeError> {
    context.evaluate_scope(node)
}

/// Parses and evaluates source code in one step.
///
/// # Errors
/// Returns an [`Error::Parse`] or an [`Error::Runtime`].
///
/// # Examples
/// ```
/// use calcula::{evaluate_source, interpreter::{evaluator::core::Context, value::core::Value}, Error};
///
/// let context = Context::new().with_stdlib();
/// assert_eq!(evaluate_source("[3, 1, 2] |> SORT(?)", &context).unwrap().to_string(), "[1, 2, 3]");
///
/// // 'x' is not defined
/// assert!(matches!(evaluate_source("x + 1", &context), Err(Error::Runtime(_))));
/// assert!(matches!(evaluate_source("x +", &context), Err(Error::Parse(_))));
/// ```
pub fn evaluate_source(source: &str, context: &Context) -> Result<Value, Error> {
    let node = parse(source)?;
    Ok(context.evaluate(&node)?)
}
