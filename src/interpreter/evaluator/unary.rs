use crate::{
    ast::{Node, UnaryOperator},
    interpreter::{
        evaluator::{
            core::{Context, EvalResult},
            scope::Scope,
        },
        value::core::Value,
    },
};

/// Applies a unary operator to an evaluated operand.
///
/// `-` negates a number and `!` inverts a boolean; any other operand type is
/// a type error.
///
/// # Example
/// ```
/// use calcula::{
///     ast::UnaryOperator,
///     interpreter::{evaluator::unary::apply_unary, value::core::Value},
/// };
///
/// assert_eq!(apply_unary(UnaryOperator::Negate, &Value::from(2)).unwrap(), Value::from(-2));
/// assert_eq!(apply_unary(UnaryOperator::Not, &Value::Boolean(true)).unwrap(),
///            Value::Boolean(false));
/// assert!(apply_unary(UnaryOperator::Not, &Value::from(1)).is_err());
/// ```
pub fn apply_unary(operator: UnaryOperator, operand: &Value) -> EvalResult<Value> {
    match operator {
        UnaryOperator::Negate => Ok(Value::Number(-operand.as_number("unary '-'")?)),
        UnaryOperator::Not => Ok(Value::Boolean(!operand.as_bool("unary '!'")?)),
    }
}

impl Context {
    /// Evaluates a unary operation.
    pub fn eval_unary_op(&self,
                         operator: UnaryOperator,
                         argument: &Node,
                         scope: &mut Scope)
                         -> EvalResult<Value> {
        let operand = self.eval(argument, scope)?;
        apply_unary(operator, &operand)
    }
}
