use crate::{
    ast::{BinaryOperator, Node},
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::{comparison::compare, logic::logic, scalar::arithmetic},
            core::{Context, EvalResult},
            scope::Scope,
        },
        value::core::Value,
    },
};

/// Applies a binary operator to two already evaluated values.
///
/// This function routes the operation to specialized handlers depending on
/// the operator. Arithmetic goes to [`arithmetic`], equality and ordering to
/// [`compare`], and `&&`/`||` to [`logic`], which requires both operands to be
/// booleans. Short-circuiting is the caller's job; see
/// [`Context::eval_binary_op`].
///
/// # Parameters
/// - `operator`: The operator.
/// - `left`: Left operand.
/// - `right`: Right operand.
///
/// # Returns
/// An `EvalResult<Value>` containing the evaluated result.
///
/// # Example
/// ```
/// use calcula::{
///     ast::BinaryOperator,
///     interpreter::{evaluator::binary::core::apply_binary, value::core::Value},
/// };
///
/// let sum = apply_binary(BinaryOperator::Add, &Value::from(3), &Value::from(4));
/// assert_eq!(sum.unwrap(), Value::from(7));
///
/// let joined = apply_binary(BinaryOperator::Add, &Value::from("ab"), &Value::from("c"));
/// assert_eq!(joined.unwrap(), Value::from("abc"));
///
/// let cross = apply_binary(BinaryOperator::Equal, &Value::from(1), &Value::from("1"));
/// assert_eq!(cross.unwrap(), Value::Boolean(false));
/// ```
pub fn apply_binary(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use BinaryOperator::{
        Add, And, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mod, Mul, NotEqual, Or,
        Pow, Sub,
    };

    match operator {
        Add | Sub | Mul | Div | Mod | Pow => arithmetic(operator, left, right),
        Equal | NotEqual | Less | Greater | LessEqual | GreaterEqual => {
            compare(operator, left, right)
        },
        And | Or => logic(operator, left, right),
    }
}

/// Builds the type error for an operator that does not apply to the operand
/// types.
#[must_use]
pub fn unsupported(operator: BinaryOperator, left: &Value, right: &Value) -> RuntimeError {
    RuntimeError::type_error(format!("Cannot apply '{operator}' to {} and {}",
                                     left.value_type(),
                                     right.value_type()))
}

impl Context {
    /// Evaluates `left <operator> right`.
    ///
    /// `&&` and `||` evaluate their right side only when the left side does
    /// not already decide the result. Every other operator evaluates both
    /// sides, left first, and hands the values to [`apply_binary`].
    pub fn eval_binary_op(&self,
                          left: &Node,
                          operator: BinaryOperator,
                          right: &Node,
                          scope: &mut Scope)
                          -> EvalResult<Value> {
        if operator.is_logical() {
            return self.eval_short_circuit(left, operator, right, scope);
        }

        let left = self.eval(left, scope)?;
        let right = self.eval(right, scope)?;
        apply_binary(operator, &left, &right)
    }
}
