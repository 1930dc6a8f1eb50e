use std::fmt;

use crate::{
    ast::{Literal, Type},
    error::RuntimeError,
    interpreter::vm::core::RuntimeResult,
};

/// Represents a runtime value in the machine.
///
/// Every value is tagged with one of the two language types. Comparisons and
/// logical negation produce `Int` values `0` or `1`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    /// A 64-bit integer value.
    Int(i64),
    /// A double precision floating-point value.
    Float(f64),
}

impl From<Literal> for Value {
    fn from(literal: Literal) -> Self {
        match literal {
            Literal::Int(n) => Self::Int(n),
            Literal::Float(x) => Self::Float(x),
        }
    }
}

impl Value {
    /// The value's type tag.
    #[must_use]
    pub const fn ty(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
        }
    }

    /// The default value of an uninitialized declaration.
    #[must_use]
    pub const fn zero(ty: Type) -> Self {
        match ty {
            Type::Int => Self::Int(0),
            Type::Float => Self::Float(0.0),
        }
    }

    /// Any nonzero value is truthy.
    ///
    /// # Example
    /// ```
    /// use minilang::interpreter::value::Value;
    ///
    /// assert!(Value::Int(-3).is_truthy());
    /// assert!(!Value::Float(0.0).is_truthy());
    /// ```
    #[must_use]
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(n) => *n != 0,
            Self::Float(x) => *x != 0.0,
        }
    }

    /// Converts the value to an `f64`, promoting integers.
    ///
    /// Integers beyond `2^53` round to the nearest representable `f64`.
    ///
    /// # Example
    /// ```
    /// use minilang::interpreter::value::Value;
    ///
    /// assert_eq!(Value::Int(3).as_float(), 3.0);
    /// assert_eq!(Value::Int(9_007_199_254_740_993).as_float(), 9_007_199_254_740_992.0);
    /// ```
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub const fn as_float(&self) -> f64 {
        match self {
            Self::Int(n) => *n as f64,
            Self::Float(x) => *x,
        }
    }

    /// Converts the value for storage into a variable of type `ty`.
    ///
    /// Integers widen into `float` destinations; floats never narrow into
    /// `int` destinations.
    ///
    /// # Errors
    /// `NarrowingAssignment` naming `name` when a float targets an `int`.
    pub fn coerce_to(self, ty: Type, name: &str) -> RuntimeResult<Self> {
        match (ty, self) {
            (Type::Int, Self::Int(_)) | (Type::Float, Self::Float(_)) => Ok(self),
            (Type::Float, Self::Int(_)) => Ok(Self::Float(self.as_float())),
            (Type::Int, Self::Float(_)) => {
                Err(RuntimeError::NarrowingAssignment { name:     name.to_string(),
                                                        expected: Type::Int,
                                                        found:    Type::Float, })
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            // `{:?}` keeps the fractional part of integral floats (`3.0`).
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}
