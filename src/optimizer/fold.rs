use std::rc::Rc;

use crate::{
    ast::{BinaryOperator, Node, NodeKind, NodeRef},
    interpreter::{
        evaluator::{
            binary::core::apply_binary,
            core::EvalResult,
            index::{index_value, range_values},
            unary::apply_unary,
        },
        value::{array::homogeneous, core::Value},
    },
    optimizer::rewrite_children,
    util::num::f64_to_i64_checked,
};

/// Largest range the folder expands into an array literal. Larger ranges are
/// left for evaluation to build.
pub const MAX_FOLDED_RANGE: i64 = 10_000;

/// Folds constant subexpressions, bottom-up.
///
/// - Unary and binary operators whose operands are all literals are replaced
///   by their result. Results that have no literal form, such as infinities,
///   are left unfolded.
/// - `&&` and `||` fold as soon as their left operand decides the result, in
///   which case the right operand is discarded unfolded, exactly as
///   evaluation would skip it.
/// - An `if` with a literal condition is replaced by the chosen branch; the
///   other branch is discarded without being folded.
/// - Indexing a literal array or string with a literal integer folds when the
///   index is in bounds.
/// - A range with literal integer bounds folds into an array literal of at
///   most [`MAX_FOLDED_RANGE`] elements.
/// - Calls and pipes never fold; only their arguments are folded.
///
/// # Errors
/// Division and modulo by zero between literals fail here, as they would
/// during evaluation. Every other failing operation, such as a type mismatch,
/// is left in place for evaluation to report.
///
/// # Example
/// ```
/// use calcula::{codegen::generate, optimizer::fold::fold, parse};
///
/// let folded = fold(&parse("x * (2 + 3) + [10, 20][-1]").unwrap()).unwrap();
/// assert_eq!(generate(&folded), "x * 5 + 20");
///
/// let chosen = fold(&parse("if 1 > 2 then 1 / 0 else \"ok\"").unwrap()).unwrap();
/// assert_eq!(generate(&chosen), "\"ok\"");
/// ```
pub fn fold(node: &NodeRef) -> EvalResult<NodeRef> {
    match &node.kind {
        NodeKind::IfExpression { condition,
                                 consequent,
                                 alternate, } => {
            let folded_condition = fold(condition)?;
            if let NodeKind::BooleanLiteral { value } = folded_condition.kind {
                let chosen = fold(if value { consequent } else { alternate })?;
                return Ok(node.wrap_comments(&chosen));
            }

            let folded_consequent = fold(consequent)?;
            let folded_alternate = fold(alternate)?;
            if Rc::ptr_eq(&folded_condition, condition)
               && Rc::ptr_eq(&folded_consequent, consequent)
               && Rc::ptr_eq(&folded_alternate, alternate)
            {
                return Ok(Rc::clone(node));
            }
            Ok(node.rebuild(NodeKind::IfExpression { condition:  folded_condition,
                                                     consequent: folded_consequent,
                                                     alternate:  folded_alternate, }))
        },
        NodeKind::BinaryOp { left,
                             operator,
                             right, } if operator.is_logical() => {
            fold_logical(node, left, *operator, right)
        },
        _ => {
            let node = rewrite_children(node, fold)?;
            fold_node(&node)
        },
    }
}

/// `false && _` is `false` and `true || _` is `true`; the right operand is
/// then never folded, so errors it would raise stay unraised.
fn fold_logical(node: &NodeRef,
                left: &NodeRef,
                operator: BinaryOperator,
                right: &NodeRef)
                -> EvalResult<NodeRef> {
    let folded_left = fold(left)?;
    let decisive = operator == BinaryOperator::Or;

    if let NodeKind::BooleanLiteral { value } = folded_left.kind
       && value == decisive
    {
        return Ok(node.rebuild(NodeKind::BooleanLiteral { value }));
    }

    let folded_right = fold(right)?;
    if let (NodeKind::BooleanLiteral { .. }, NodeKind::BooleanLiteral { value }) =
        (&folded_left.kind, &folded_right.kind)
    {
        return Ok(node.rebuild(NodeKind::BooleanLiteral { value: *value }));
    }

    if Rc::ptr_eq(&folded_left, left) && Rc::ptr_eq(&folded_right, right) {
        return Ok(Rc::clone(node));
    }
    Ok(node.rebuild(NodeKind::BinaryOp { left: folded_left,
                                         operator,
                                         right: folded_right }))
}

/// Folds a node whose children are already folded.
fn fold_node(node: &NodeRef) -> EvalResult<NodeRef> {
    let folded = match &node.kind {
        NodeKind::BinaryOp { left,
                             operator,
                             right, } => {
            let (Some(left), Some(right)) = (literal_value(left), literal_value(right)) else {
                return Ok(Rc::clone(node));
            };
            match apply_binary(*operator, &left, &right) {
                Ok(value) => value,
                Err(error) if error.is_zero_divisor() => return Err(error),
                Err(_) => return Ok(Rc::clone(node)),
            }
        },
        NodeKind::UnaryOp { operator, argument } => {
            let Some(operand) = literal_value(argument) else {
                return Ok(Rc::clone(node));
            };
            match apply_unary(*operator, &operand) {
                Ok(value) => value,
                Err(_) => return Ok(Rc::clone(node)),
            }
        },
        NodeKind::IndexAccess { object, index } => {
            let (Some(object), Some(index)) = (literal_value(object), literal_value(index)) else {
                return Ok(Rc::clone(node));
            };
            match index_value(&object, &index) {
                Ok(value) => value,
                Err(_) => return Ok(Rc::clone(node)),
            }
        },
        NodeKind::RangeExpression { start,
                                    end,
                                    inclusive, } => {
            let (Some(start), Some(end)) = (literal_integer(start), literal_integer(end)) else {
                return Ok(Rc::clone(node));
            };
            let length = end - start + i64::from(*inclusive);
            if start > end || length > MAX_FOLDED_RANGE {
                return Ok(Rc::clone(node));
            }
            match range_values(start, end, *inclusive) {
                Ok(values) => Value::Array(Rc::new(values)),
                Err(_) => return Ok(Rc::clone(node)),
            }
        },
        _ => return Ok(Rc::clone(node)),
    };

    Ok(literal_kind(&folded).map_or_else(|| Rc::clone(node), |kind| node.rebuild(kind)))
}

/// Returns the value of a literal node, or `None` if the node is not a
/// literal.
///
/// # Example
/// ```
/// use calcula::{interpreter::value::core::Value, optimizer::fold::literal_value, parse};
///
/// assert_eq!(literal_value(&parse("\"a\"").unwrap()), Some(Value::from("a")));
/// assert_eq!(literal_value(&parse("[1, 2]").unwrap()).map(|v| v.to_string()),
///            Some("[1, 2]".to_string()));
/// assert_eq!(literal_value(&parse("x").unwrap()), None);
/// ```
#[must_use]
pub fn literal_value(node: &Node) -> Option<Value> {
    match &node.kind {
        NodeKind::NumberLiteral { value } => Some(Value::Number(*value)),
        NodeKind::StringLiteral { value } => Some(Value::String(value.clone())),
        NodeKind::BooleanLiteral { value } => Some(Value::Boolean(*value)),
        NodeKind::ArrayLiteral { elements } => {
            let values = elements.iter()
                                 .map(|element| literal_value(element))
                                 .collect::<Option<Vec<_>>>()?;
            homogeneous(values).ok()
        },
        _ => None,
    }
}

/// Converts a value back into a literal node kind, if it has one.
///
/// Non-finite numbers and temporal values have no literal syntax.
#[must_use]
pub fn literal_kind(value: &Value) -> Option<NodeKind> {
    match value {
        Value::Number(n) if n.is_finite() => Some(NodeKind::NumberLiteral { value: *n }),
        Value::String(s) => Some(NodeKind::StringLiteral { value: s.clone() }),
        Value::Boolean(b) => Some(NodeKind::BooleanLiteral { value: *b }),
        Value::Array(elements) => {
            let elements = elements.iter()
                                   .map(|element| literal_kind(element).map(Node::new))
                                   .collect::<Option<Vec<_>>>()?;
            Some(NodeKind::ArrayLiteral { elements })
        },
        _ => None,
    }
}

fn literal_integer(node: &Node) -> Option<i64> {
    match node.kind {
        NodeKind::NumberLiteral { value } => f64_to_i64_checked(value).ok(),
        _ => None,
    }
}
