use std::cmp::Ordering;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{value::Value, vm::core::RuntimeResult},
};

/// Evaluates a binary operation between two values.
///
/// `+ - *` stay integral when both operands are `Int` and promote both to
/// `Float` otherwise. `/` always produces a `Float`. Comparisons of mixed
/// operands compare the promoted values and always produce `Int(0)` or
/// `Int(1)`.
///
/// # Errors
/// - `Overflow` when integer arithmetic overflows.
/// - `DivisionByZero` for a zero divisor.
///
/// # Example
/// ```
/// use minilang::{
///     ast::BinaryOperator,
///     interpreter::{value::Value, vm::binary::eval_binary},
/// };
///
/// let half = eval_binary(BinaryOperator::Div, Value::Int(5), Value::Int(2)).unwrap();
/// assert_eq!(half, Value::Float(2.5));
///
/// let sum = eval_binary(BinaryOperator::Add, Value::Float(1.0), Value::Int(2)).unwrap();
/// assert_eq!(sum, Value::Float(3.0));
/// ```
pub fn eval_binary(op: BinaryOperator, left: Value, right: Value) -> RuntimeResult<Value> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
    };

    match op {
        Add => eval_arithmetic(left, right, i64::checked_add, |a, b| a + b),
        Sub => eval_arithmetic(left, right, i64::checked_sub, |a, b| a - b),
        Mul => eval_arithmetic(left, right, i64::checked_mul, |a, b| a * b),
        Div => eval_division(left, right),
        Equal => Ok(eval_comparison(left, right, |o| o == Some(Ordering::Equal))),
        NotEqual => Ok(eval_comparison(left, right, |o| o != Some(Ordering::Equal))),
        Less => Ok(eval_comparison(left, right, |o| o == Some(Ordering::Less))),
        LessEqual => {
            Ok(eval_comparison(left, right, |o| {
                matches!(o, Some(Ordering::Less | Ordering::Equal))
            }))
        },
        Greater => Ok(eval_comparison(left, right, |o| o == Some(Ordering::Greater))),
        GreaterEqual => {
            Ok(eval_comparison(left, right, |o| {
                matches!(o, Some(Ordering::Greater | Ordering::Equal))
            }))
        },
    }
}

fn eval_arithmetic(left: Value,
                   right: Value,
                   integral: fn(i64, i64) -> Option<i64>,
                   real: fn(f64, f64) -> f64)
                   -> RuntimeResult<Value> {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => integral(a, b).map(Value::Int)
                                                        .ok_or(RuntimeError::Overflow),
        _ => Ok(Value::Float(real(left.as_float(), right.as_float()))),
    }
}

fn eval_division(left: Value, right: Value) -> RuntimeResult<Value> {
    let divisor = right.as_float();
    if divisor == 0.0 {
        return Err(RuntimeError::DivisionByZero);
    }
    Ok(Value::Float(left.as_float() / divisor))
}

fn eval_comparison(left: Value,
                   right: Value,
                   holds: fn(Option<Ordering>) -> bool)
                   -> Value {
    let ordering = match (left, right) {
        (Value::Int(a), Value::Int(b)) => Some(a.cmp(&b)),
        _ => left.as_float().partial_cmp(&right.as_float()),
    };
    Value::Int(i64::from(holds(ordering)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_arithmetic_stays_integral() {
        assert_eq!(eval_binary(BinaryOperator::Mul, Value::Int(6), Value::Int(7)).unwrap(),
                   Value::Int(42));
    }

    #[test]
    fn division_is_always_float() {
        assert_eq!(eval_binary(BinaryOperator::Div, Value::Int(4), Value::Int(2)).unwrap(),
                   Value::Float(2.0));
    }

    #[test]
    fn division_by_zero_is_error() {
        assert!(matches!(eval_binary(BinaryOperator::Div, Value::Int(1), Value::Float(0.0)),
                         Err(RuntimeError::DivisionByZero)));
    }

    #[test]
    fn overflow_is_error() {
        assert!(matches!(eval_binary(BinaryOperator::Add, Value::Int(i64::MAX), Value::Int(1)),
                         Err(RuntimeError::Overflow)));
    }

    #[test]
    fn mixed_comparisons_promote() {
        assert_eq!(eval_binary(BinaryOperator::Equal, Value::Int(2), Value::Float(2.0)).unwrap(),
                   Value::Int(1));
        assert_eq!(eval_binary(BinaryOperator::Less, Value::Float(2.5), Value::Int(2)).unwrap(),
                   Value::Int(0));
        assert_eq!(eval_binary(BinaryOperator::GreaterEqual, Value::Int(3), Value::Int(3))
                   .unwrap(),
                   Value::Int(1));
    }

    #[test]
    fn large_integers_compare_after_rounding_promotion() {
        let big = Value::Int(9_007_199_254_740_993);
        assert_eq!(eval_binary(BinaryOperator::Less, big, Value::Float(1.5)).unwrap(),
                   Value::Int(0));
        assert_eq!(eval_binary(BinaryOperator::Add, big, Value::Float(0.0)).unwrap(),
                   Value::Float(9_007_199_254_740_992.0));
    }

    #[test]
    fn nan_is_unordered() {
        let nan = Value::Float(f64::NAN);
        assert_eq!(eval_binary(BinaryOperator::Equal, nan, nan).unwrap(), Value::Int(0));
        assert_eq!(eval_binary(BinaryOperator::NotEqual, nan, nan).unwrap(), Value::Int(1));
    }
}
