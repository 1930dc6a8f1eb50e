use crate::{
    ast::UnaryOperator,
    error::RuntimeError,
    interpreter::{value::Value, vm::core::RuntimeResult},
};

/// Applies a unary operator.
///
/// `!` yields `Int(1)` for falsy operands and `Int(0)` otherwise; `-` and
/// `+` keep the operand's type.
///
/// # Errors
/// `Overflow` when negating `i64::MIN`.
///
/// # Example
/// ```
/// use minilang::{
///     ast::UnaryOperator,
///     interpreter::{value::Value, vm::unary::eval_unary},
/// };
///
/// assert_eq!(eval_unary(UnaryOperator::Not, Value::Float(0.0)).unwrap(), Value::Int(1));
/// assert_eq!(eval_unary(UnaryOperator::Negate, Value::Int(4)).unwrap(), Value::Int(-4));
/// ```
pub fn eval_unary(op: UnaryOperator, operand: Value) -> RuntimeResult<Value> {
    match (op, operand) {
        (UnaryOperator::Not, value) => Ok(Value::Int(i64::from(!value.is_truthy()))),
        (UnaryOperator::Negate, Value::Int(n)) => {
            n.checked_neg().map(Value::Int).ok_or(RuntimeError::Overflow)
        },
        (UnaryOperator::Negate, Value::Float(x)) => Ok(Value::Float(-x)),
        (UnaryOperator::Plus, value) => Ok(value),
    }
}
