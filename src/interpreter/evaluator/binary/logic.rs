use crate::{
    ast::{BinaryOperator, Node},
    interpreter::{
        evaluator::{binary::core::unsupported, core::{Context, EvalResult}, scope::Scope},
        value::core::Value,
    },
};

/// Evaluates `&&` or `||` on two values that are both already known.
///
/// Both operands must be booleans. This is the strict form the constant
/// folder uses; evaluation goes through [`Context::eval_short_circuit`].
///
/// # Example
/// ```
/// use calcula::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::logic::logic, value::core::Value},
/// };
///
/// let r = logic(BinaryOperator::Or, &Value::Boolean(false), &Value::Boolean(true));
/// assert_eq!(r.unwrap(), Value::Boolean(true));
/// ```
pub fn logic(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    match (operator, left, right) {
        (BinaryOperator::And, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a && *b)),
        (BinaryOperator::Or, Value::Boolean(a), Value::Boolean(b)) => Ok(Value::Boolean(*a || *b)),
        _ => Err(unsupported(operator, left, right)),
    }
}

impl Context {
    /// Evaluates `&&` or `||` with short-circuiting.
    ///
    /// The left operand must be a boolean. The right operand is evaluated,
    /// and type-checked, only when the left one does not decide the result.
    pub(crate) fn eval_short_circuit(&self,
                                     left: &Node,
                                     operator: BinaryOperator,
                                     right: &Node,
                                     scope: &mut Scope)
                                     -> EvalResult<Value> {
        let context = if operator == BinaryOperator::And { "'&&'" } else { "'||'" };
        let left = self.eval(left, scope)?.as_bool(context)?;

        match (operator, left) {
            (BinaryOperator::And, false) => Ok(Value::Boolean(false)),
            (BinaryOperator::Or, true) => Ok(Value::Boolean(true)),
            _ => Ok(Value::Boolean(self.eval(right, scope)?.as_bool(context)?)),
        }
    }
}
