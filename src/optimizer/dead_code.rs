use std::rc::Rc;

use tracing::debug;

use crate::{
    analyzer::referenced_identifiers,
    ast::{Node, NodeKind, NodeRef},
};

/// Removes top-level assignments whose variable is not read afterwards.
///
/// Statements are scanned from last to first. The last statement is the
/// program's result and is always kept. Other non-assignments are kept too,
/// and every kept statement adds the variables it reads to the live set. An
/// assignment survives only if its name is live at that point, or if its
/// value contains an assignment of its own, whose effect later statements may
/// depend on.
///
/// A dropped statement takes its comments with it. When one statement
/// remains, the `Program` wrapper is removed and the program's own comments
/// move onto that statement.
///
/// # Example
/// ```
/// use calcula::{codegen::generate, optimizer::dead_code::eliminate_dead_code, parse};
///
/// let program = parse("x = 10; y = 20").unwrap();
/// assert_eq!(generate(&eliminate_dead_code(&program)), "y = 20");
///
/// let chain = parse("a = 1; b = a; unused = 3; c = b; c * 2").unwrap();
/// assert_eq!(generate(&eliminate_dead_code(&chain)), "a = 1\nb = a\nc = b\nc * 2");
/// ```
#[must_use]
pub fn eliminate_dead_code(node: &NodeRef) -> NodeRef {
    let NodeKind::Program { statements } = &node.kind else {
        return Rc::clone(node);
    };
    let Some((last, rest)) = statements.split_last() else {
        return Rc::clone(node);
    };

    let mut live = referenced_identifiers(last);
    let mut kept = vec![Rc::clone(last)];

    for statement in rest.iter().rev() {
        if let NodeKind::Assignment { name, value } = &statement.kind
           && !live.contains(name)
           && !contains_assignment(value)
        {
            continue;
        }
        live.extend(referenced_identifiers(statement));
        kept.push(Rc::clone(statement));
    }

    if kept.len() == statements.len() {
        return Rc::clone(node);
    }
    debug!(removed = statements.len() - kept.len(), "eliminated dead statements");

    kept.reverse();
    match kept.as_slice() {
        [only] => node.wrap_comments(only),
        _ => node.rebuild(NodeKind::Program { statements: kept }),
    }
}

fn contains_assignment(node: &Node) -> bool {
    matches!(node.kind, NodeKind::Assignment { .. })
    || node.children().into_iter().any(|child| contains_assignment(child))
}
