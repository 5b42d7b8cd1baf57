use std::collections::{HashMap, HashSet};

use crate::ast::{Node, NodeKind, NodeRef, statements_of};

/// Returns the names of top-level assignments whose value reads no variable.
///
/// Such assignments (`rate = 0.2`, `name = UPPER("x")`) are the program's
/// inputs: a host typically lets users override them, so the list is a
/// reasonable default for the optimizer's external-variable set. Names are
/// reported in definition order, once each.
///
/// # Example
/// ```
/// use calcula::{extract_input_variables, parse};
///
/// let program = parse("rate = 0.2; base = 100; tax = base * rate; tax").unwrap();
/// assert_eq!(extract_input_variables(&program), vec!["rate", "base"]);
/// ```
#[must_use]
pub fn extract_input_variables(node: &NodeRef) -> Vec<String> {
    let mut names = Vec::new();

    for statement in statements_of(node) {
        if let NodeKind::Assignment { name, value } = &statement.kind
           && referenced_identifiers(value).is_empty()
           && !names.contains(name)
        {
            names.push(name.clone());
        }
    }

    names
}

/// Returns every assigned name, in the order the assignments take effect,
/// once each.
///
/// Nested assignments count too; an assignment's value is evaluated before
/// its own name is bound, so `a = (b = 1)` reports `b` before `a`. Loop
/// variables and accumulator names are bindings, not assignments, and are not
/// reported.
///
/// # Example
/// ```
/// use calcula::{extract_assigned_variables, parse};
///
/// let program = parse("x = 1; y = (z = x + 1) * 2; x = 3").unwrap();
/// assert_eq!(extract_assigned_variables(&program), vec!["x", "z", "y"]);
/// ```
#[must_use]
pub fn extract_assigned_variables(node: &Node) -> Vec<String> {
    fn visit(node: &Node, names: &mut Vec<String>) {
        for child in node.children() {
            visit(child, names);
        }
        if let NodeKind::Assignment { name, .. } = &node.kind
           && !names.contains(name)
        {
            names.push(name.clone());
        }
    }

    let mut names = Vec::new();
    visit(node, &mut names);
    names
}

/// Returns the variables a node reads from its enclosing scope.
///
/// A `for` loop's variable and accumulator are local to its guard and body,
/// so reads of them there are not reported. The iterable and the
/// accumulator's initial value are evaluated outside the loop and are
/// reported normally.
///
/// # Example
/// ```
/// use calcula::{analyzer::referenced_identifiers, parse};
///
/// let node = parse("for x in xs into acc = start then acc + x * k").unwrap();
/// let mut names: Vec<String> = referenced_identifiers(&node).into_iter().collect();
/// names.sort();
/// assert_eq!(names, vec!["k", "start", "xs"]);
/// ```
#[must_use]
pub fn referenced_identifiers(node: &Node) -> HashSet<String> {
    let mut names = HashSet::new();
    collect_references(node, &mut Vec::new(), &mut names);
    names
}

fn collect_references<'n>(node: &'n Node,
                          locals: &mut Vec<&'n str>,
                          names: &mut HashSet<String>) {
    match &node.kind {
        NodeKind::Identifier { name } => {
            if !locals.contains(&name.as_str()) {
                names.insert(name.clone());
            }
        },
        NodeKind::ForExpression { variable,
                                  iterable,
                                  guard,
                                  accumulator,
                                  body, } => {
            collect_references(iterable, locals, names);
            if let Some(accumulator) = accumulator {
                collect_references(&accumulator.initial, locals, names);
            }

            let depth = locals.len();
            locals.push(variable);
            if let Some(accumulator) = accumulator {
                locals.push(&accumulator.name);
            }
            if let Some(guard) = guard {
                collect_references(guard, locals, names);
            }
            collect_references(body, locals, names);
            locals.truncate(depth);
        },
        _ => {
            for child in node.children() {
                collect_references(child, locals, names);
            }
        },
    }
}

/// Counts how often each name is assigned anywhere in the tree, including
/// inside nested expressions and loop bodies.
#[must_use]
pub fn assignment_counts(node: &Node) -> HashMap<String, usize> {
    fn visit(node: &Node, counts: &mut HashMap<String, usize>) {
        if let NodeKind::Assignment { name, .. } = &node.kind {
            *counts.entry(name.clone()).or_default() += 1;
        }
        for child in node.children() {
            visit(child, counts);
        }
    }

    let mut counts = HashMap::new();
    visit(node, &mut counts);
    counts
}

/// Returns every name bound by a `for` loop anywhere in the tree, as a loop
/// variable or as an accumulator.
#[must_use]
pub fn loop_bindings(node: &Node) -> HashSet<String> {
    fn visit(node: &Node, names: &mut HashSet<String>) {
        if let NodeKind::ForExpression { variable,
                                         accumulator,
                                         .. } = &node.kind
        {
            names.insert(variable.clone());
            if let Some(accumulator) = accumulator {
                names.insert(accumulator.name.clone());
            }
        }
        for child in node.children() {
            visit(child, names);
        }
    }

    let mut names = HashSet::new();
    visit(node, &mut names);
    names
}
