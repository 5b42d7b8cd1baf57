use std::{collections::HashSet, convert::Infallible, rc::Rc};

use tracing::debug;

use crate::{
    analyzer::{assignment_counts, loop_bindings},
    ast::{Accumulator, Node, NodeKind, NodeRef},
    interpreter::evaluator::core::EvalResult,
    optimizer::{fold::fold, rewrite_children},
};

/// A variable that can be replaced by its value.
struct Constant {
    /// Index of the defining top-level statement.
    statement: usize,
    name:      String,
    literal:   NodeRef,
}

/// Substitutes constant variables and re-folds until nothing changes.
///
/// A variable is constant when it is assigned exactly once in the whole tree,
/// by a top-level statement whose value is a literal, and it is neither in
/// `external` nor bound by any `for` loop. Its reads in later statements are
/// replaced by the literal, except inside a loop's guard and body where a
/// loop binding of the same name shadows it. Reads before the assignment are
/// left alone; they fail at evaluation, and must keep failing.
///
/// Folding after a substitution can turn further assignments into literals,
/// so the substitution repeats. Each round propagates at least one new name,
/// which bounds the rounds by the number of assigned names.
///
/// # Errors
/// Returns the errors re-folding raises, such as a division by a propagated
/// zero.
///
/// # Example
/// ```
/// use std::collections::HashSet;
///
/// use calcula::{codegen::generate, optimizer::propagate::propagate, parse};
///
/// let program = parse("a = 2; b = a * 3; c = b + n; c").unwrap();
/// let propagated = propagate(&program, &HashSet::new()).unwrap();
/// assert_eq!(generate(&propagated), "a = 2\nb = 6\nc = 6 + n\nc");
///
/// let external = HashSet::from(["a".to_string()]);
/// let kept = propagate(&program, &external).unwrap();
/// assert_eq!(generate(&kept), "a = 2\nb = a * 3\nc = b + n\nc");
/// ```
pub fn propagate(node: &NodeRef, external: &HashSet<String>) -> EvalResult<NodeRef> {
    let counts = assignment_counts(node);
    let excluded = loop_bindings(node);
    let mut propagated: HashSet<String> = HashSet::new();
    let mut current = Rc::clone(node);

    for round in 1..=counts.len() + 1 {
        let NodeKind::Program { statements } = &current.kind else {
            break;
        };

        let constants: Vec<Constant> =
            statements.iter()
                      .enumerate()
                      .filter_map(|(statement, candidate)| match &candidate.kind {
                          NodeKind::Assignment { name, value }
                              if value.is_literal()
                                 && counts.get(name) == Some(&1)
                                 && !external.contains(name)
                                 && !excluded.contains(name)
                                 && !propagated.contains(name) =>
                          {
                              Some(Constant { statement,
                                              name: name.clone(),
                                              literal: Rc::clone(value) })
                          },
                          _ => None,
                      })
                      .collect();

        if constants.is_empty() {
            break;
        }

        let mut rewritten = statements.clone();
        for constant in &constants {
            for statement in rewritten.iter_mut().skip(constant.statement + 1) {
                *statement = substitute(statement, &constant.name, &constant.literal);
            }
        }

        debug!(round,
               names = ?constants.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
               "propagated constants");
        propagated.extend(constants.into_iter().map(|constant| constant.name));
        current = fold(&current.rebuild(NodeKind::Program { statements: rewritten }))?;
    }

    Ok(current)
}

/// Replaces every read of `name` in `node` with `literal`, keeping the
/// comments of each replaced identifier.
fn substitute(node: &NodeRef, name: &str, literal: &Node) -> NodeRef {
    match &node.kind {
        NodeKind::Identifier { name: read } if read == name => node.rebuild(literal.kind.clone()),
        NodeKind::ForExpression { variable,
                                  iterable,
                                  guard,
                                  accumulator,
                                  body, }
            if variable == name
               || accumulator.as_ref().is_some_and(|acc| acc.name == name) =>
        {
            // Only the parts evaluated outside the loop see the outer binding.
            let iterable = substitute(iterable, name, literal);
            let accumulator = accumulator.as_ref().map(|acc| Accumulator {
                name:    acc.name.clone(),
                initial: substitute(&acc.initial, name, literal),
            });
            node.rebuild(NodeKind::ForExpression { variable: variable.clone(),
                                                   iterable,
                                                   guard: guard.clone(),
                                                   accumulator,
                                                   body: Rc::clone(body) })
        },
        _ => {
            let Ok(rewritten) = rewrite_children(node, |child| {
                                    Ok::<_, Infallible>(substitute(child, name, literal))
                                });
            rewritten
        },
    }
}
