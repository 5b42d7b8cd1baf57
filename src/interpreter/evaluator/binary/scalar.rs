use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{binary::core::unsupported, core::EvalResult},
        value::{array::concat, core::Value},
    },
};

/// Evaluates an arithmetic operator.
///
/// All six operators work on two numbers. `+` additionally concatenates two
/// strings, or two arrays (the result must be homogeneous). `/` and `%`
/// reject a zero divisor; `%` takes the sign of the dividend.
///
/// # Example
/// ```
/// use calcula::{
///     ast::BinaryOperator,
///     error::RuntimeError,
///     interpreter::{evaluator::binary::scalar::arithmetic, value::core::Value},
/// };
///
/// let r = arithmetic(BinaryOperator::Mod, &Value::from(-7), &Value::from(3)).unwrap();
/// assert_eq!(r, Value::from(-1));
///
/// let e = arithmetic(BinaryOperator::Div, &Value::from(1), &Value::from(0)).unwrap_err();
/// assert_eq!(e, RuntimeError::DivisionByZero);
/// ```
pub fn arithmetic(operator: BinaryOperator, left: &Value, right: &Value) -> EvalResult<Value> {
    use BinaryOperator::{Add, Div, Mod, Mul, Pow, Sub};

    match (left, right) {
        (Value::Number(a), Value::Number(b)) => {
            let (a, b) = (*a, *b);
            let result = match operator {
                Add => a + b,
                Sub => a - b,
                Mul => a * b,
                Div => {
                    if b == 0.0 {
                        return Err(RuntimeError::DivisionByZero);
                    }
                    a / b
                },
                Mod => {
                    if b == 0.0 {
                        return Err(RuntimeError::ModuloByZero);
                    }
                    a % b
                },
                Pow => a.powf(b),
                _ => return Err(unsupported(operator, left, right)),
            };
            Ok(Value::Number(result))
        },
        (Value::String(a), Value::String(b)) if operator == Add => {
            Ok(Value::String(format!("{a}{b}")))
        },
        (Value::Array(a), Value::Array(b)) if operator == Add => concat(a, b),
        _ => Err(unsupported(operator, left, right)),
    }
}
