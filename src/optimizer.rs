use std::{collections::HashSet, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Accumulator, NodeKind, NodeRef, statements_of},
    interpreter::evaluator::core::EvalResult,
};

/// Constant folding.
///
/// Evaluates operators, conditionals, indexing and ranges whose operands are
/// all literals, using the same operator semantics as the evaluator.
pub mod fold;

/// Constant propagation.
///
/// Replaces reads of variables that are provably assigned one literal, once,
/// and that the host cannot override.
pub mod propagate;

/// Dead-code elimination.
///
/// Drops top-level assignments whose variable is never read afterwards.
pub mod dead_code;

/// Rewrites a tree into an equivalent one that is cheaper to evaluate.
///
/// The passes are constant folding, then constant propagation (only when
/// `external` is given), then dead-code elimination. Eliminating code can
/// leave a variable with a single assignment, so the passes repeat until the
/// tree stops changing; every round either removes statements or replaces
/// reads, so the number of rounds is bounded by the size of the program.
///
/// `external` names the variables a host may override when it evaluates the
/// result. Those are never propagated. `None` means any variable may be
/// overridden, and nothing is propagated at all.
///
/// # Errors
/// Folding evaluates literal operations eagerly, so a literal division or
/// modulo by zero fails here with the same [`RuntimeError`] evaluation would
/// raise.
///
/// [`RuntimeError`]: crate::error::RuntimeError
///
/// # Example
/// ```
/// use std::collections::HashSet;
///
/// use calcula::{ast::NodeKind, optimize, parse};
///
/// let folded = optimize(&parse("2 + 3 * 4").unwrap(), None).unwrap();
/// assert_eq!(folded.kind, NodeKind::NumberLiteral { value: 14.0 });
///
/// let program = parse("x = 5; x + 10").unwrap();
/// let propagated = optimize(&program, Some(&HashSet::new())).unwrap();
/// assert_eq!(propagated.kind, NodeKind::NumberLiteral { value: 15.0 });
/// ```
pub fn optimize(node: &NodeRef, external: Option<&HashSet<String>>) -> EvalResult<NodeRef> {
    let max_rounds = statements_of(node).len() + 2;
    let mut current = Rc::clone(node);

    for round in 1..=max_rounds {
        let mut next = fold::fold(&current)?;
        if let Some(external) = external {
            next = propagate::propagate(&next, external)?;
        }
        next = dead_code::eliminate_dead_code(&next);

        if next == current {
            break;
        }
        debug!(round, "optimizer round changed the tree");
        current = next;
    }

    Ok(current)
}

/// Rebuilds `node` with every direct child replaced by `rewrite(child)`.
///
/// Children are visited in evaluation order, so the first error a rewrite
/// raises is the one evaluation would raise first. The original handle is
/// returned when no child changed, and a rebuilt node keeps `node`'s
/// comments.
pub(crate) fn rewrite_children<E>(node: &NodeRef,
                                  mut rewrite: impl FnMut(&NodeRef) -> Result<NodeRef, E>)
                                  -> Result<NodeRef, E> {
    let mut changed = false;
    let mut visit = |child: &NodeRef| -> Result<NodeRef, E> {
        let rewritten = rewrite(child)?;
        changed |= !Rc::ptr_eq(child, &rewritten);
        Ok(rewritten)
    };

    let kind = match &node.kind {
        NodeKind::Program { statements } => {
            NodeKind::Program { statements: statements.iter().map(&mut visit).collect::<Result<_, _>>()? }
        },
        NodeKind::ArrayLiteral { elements } => {
            NodeKind::ArrayLiteral { elements: elements.iter().map(&mut visit).collect::<Result<_, _>>()? }
        },
        NodeKind::BinaryOp { left,
                             operator,
                             right, } => NodeKind::BinaryOp { left:     visit(left)?,
                                                              operator: *operator,
                                                              right:    visit(right)?, },
        NodeKind::UnaryOp { operator, argument } => {
            NodeKind::UnaryOp { operator: *operator,
                                argument: visit(argument)?, }
        },
        NodeKind::FunctionCall { name, args } => {
            NodeKind::FunctionCall { name: name.clone(),
                                     args: args.iter().map(&mut visit).collect::<Result<_, _>>()?, }
        },
        NodeKind::Assignment { name, value } => NodeKind::Assignment { name:  name.clone(),
                                                                       value: visit(value)?, },
        NodeKind::IfExpression { condition,
                                 consequent,
                                 alternate, } => {
            NodeKind::IfExpression { condition:  visit(condition)?,
                                     consequent: visit(consequent)?,
                                     alternate:  visit(alternate)?, }
        },
        NodeKind::ForExpression { variable,
                                  iterable,
                                  guard,
                                  accumulator,
                                  body, } => {
            let iterable = visit(iterable)?;
            let accumulator = match accumulator {
                Some(Accumulator { name, initial }) => Some(Accumulator { name:    name.clone(),
                                                                          initial: visit(initial)?, }),
                None => None,
            };
            let guard = match guard {
                Some(guard) => Some(visit(guard)?),
                None => None,
            };
            NodeKind::ForExpression { variable: variable.clone(),
                                      iterable,
                                      guard,
                                      accumulator,
                                      body: visit(body)? }
        },
        NodeKind::IndexAccess { object, index } => NodeKind::IndexAccess { object: visit(object)?,
                                                                           index:  visit(index)?, },
        NodeKind::RangeExpression { start,
                                    end,
                                    inclusive, } => NodeKind::RangeExpression { start:     visit(start)?,
                                                                                end:       visit(end)?,
                                                                                inclusive: *inclusive, },
        NodeKind::PipeExpression { value, name, args } => {
            let value = visit(value)?;
            NodeKind::PipeExpression { value,
                                       name: name.clone(),
                                       args: args.iter().map(&mut visit).collect::<Result<_, _>>()? }
        },
        NodeKind::NumberLiteral { .. }
        | NodeKind::StringLiteral { .. }
        | NodeKind::BooleanLiteral { .. }
        | NodeKind::Identifier { .. }
        | NodeKind::Placeholder => return Ok(Rc::clone(node)),
    };

    if changed {
        Ok(node.rebuild(kind))
    } else {
        Ok(Rc::clone(node))
    }
}
