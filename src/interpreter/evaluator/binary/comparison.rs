use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::{binary::core::unsupported, core::EvalResult},
        value::core::Value,
    },
};

/// Evaluates a comparison of the form `Value <Operator> Value`.
///
/// `==` and `!=` use structural equality: arrays compare element by element
/// and values of different types are simply unequal. The ordering operators
/// need two numbers, two strings (compared lexically), or two temporal values
/// of the same kind.
///
/// # Example
/// ```
/// use calcula::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::comparison::compare, value::core::Value},
/// };
///
/// let r = compare(BinaryOperator::Less, &Value::from("apple"), &Value::from("banana"));
/// assert_eq!(r.unwrap(), Value::Boolean(true));
///
/// assert!(compare(BinaryOperator::Less, &Value::from(1), &Value::from("2")).is_err());
/// ```
pub fn compare(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use BinaryOperator::{Equal, Greater, GreaterEqual, Less, LessEqual, NotEqual};

    let result = match operator {
        Equal => left == right,
        NotEqual => left != right,
        Less | Greater | LessEqual | GreaterEqual => match (left, right) {
            // IEEE semantics: every ordering test involving NaN is false.
            (Value::Number(a), Value::Number(b)) => match operator {
                Less => a < b,
                Greater => a > b,
                LessEqual => a <= b,
                _ => a >= b,
            },
            _ => {
                let Some(ordering) = order(left, right) else {
                    return Err(unsupported(operator, left, right));
                };
                match operator {
                    Less => ordering.is_lt(),
                    Greater => ordering.is_gt(),
                    LessEqual => ordering.is_le(),
                    _ => ordering.is_ge(),
                }
            },
        },
        _ => return Err(unsupported(operator, left, right)),
    };

    Ok(Value::Boolean(result))
}

/// Orders two non-numeric values of the same comparable type, or returns
/// `None` for mismatched and unordered types.
fn order(left: &Value, right: &Value) -> Option<Ordering> {
    match (left, right) {
        (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
        (Value::Date(a), Value::Date(b)) => Some(a.cmp(b)),
        (Value::Time(a), Value::Time(b)) => Some(a.cmp(b)),
        (Value::DateTime(a), Value::DateTime(b)) => Some(a.cmp(b)),
        _ => None,
    }
}
