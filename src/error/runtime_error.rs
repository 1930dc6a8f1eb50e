use thiserror::Error;

use crate::ast::{Position, Type};

#[derive(Debug, Error)]
/// Represents all errors that can occur while executing three-address code.
pub enum RuntimeError {
    /// A variable was declared twice in the same frame.
    #[error("Runtime error: Duplicate declaration of '{name}'.")]
    DuplicateDeclaration {
        /// The name of the variable.
        name: String,
    },
    /// A variable was read or written without being declared.
    #[error("Runtime error: Undeclared variable '{name}'.")]
    UndeclaredVariable {
        /// The name of the variable.
        name: String,
    },
    /// A `float` value was stored into an `int` variable.
    #[error("Runtime error: Type error: cannot assign {found} to {expected} '{name}'.")]
    NarrowingAssignment {
        /// The destination variable.
        name:     String,
        /// The destination's declared type.
        expected: Type,
        /// The type of the stored value.
        found:    Type,
    },
    /// A temporary was read before any instruction wrote it.
    #[error("Runtime error: Temporary '{temp}' read before it was written.")]
    UninitializedTemporary {
        /// The temporary's printed name.
        temp: String,
    },
    /// A jump names a label that is not defined in the instruction stream.
    #[error("Runtime error: Jump to undefined label '{label}'.")]
    UndefinedLabel {
        /// The missing label.
        label: String,
    },
    /// A label is defined more than once.
    #[error("Runtime error: Label '{label}' is defined more than once.")]
    DuplicateLabel {
        /// The repeated label.
        label: String,
    },
    /// `exit_scope` executed with only the global frame left.
    #[error("Runtime error: Scope exit without a matching scope entry.")]
    ScopeUnderflow,
    /// Attempted division by zero.
    #[error("Runtime error: Division by zero.")]
    DivisionByZero,
    /// Integer arithmetic overflowed.
    #[error("Runtime error: Integer overflow while trying to compute result.")]
    Overflow,
    /// Writing printed output failed.
    #[error("Runtime error: Failed to write output: {0}")]
    Output(#[from] std::io::Error),
    /// An error raised by an instruction lowered from a known source
    /// position.
    #[error("Error on line {line}, column {column}: {error}")]
    Located {
        /// The source line of the failing construct.
        line:   usize,
        /// The source column of the failing construct.
        column: usize,
        /// The error itself.
        error:  Box<Self>,
    },
}

impl RuntimeError {
    /// Attaches the source position of the failing instruction.
    #[must_use]
    pub fn at(self, pos: Position) -> Self {
        match self {
            Self::Located { .. } => self,
            error => Self::Located { line:   pos.line,
                                     column: pos.column,
                                     error:  Box::new(error), },
        }
    }

    /// The error with any attached position stripped.
    ///
    /// # Example
    /// ```
    /// use minilang::{ast::Position, error::RuntimeError};
    ///
    /// let err = RuntimeError::DivisionByZero.at(Position::new(3, 9));
    ///
    /// assert!(matches!(err.root(), RuntimeError::DivisionByZero));
    /// assert_eq!(err.position(), Some(Position::new(3, 9)));
    /// assert_eq!(err.to_string(),
    ///            "Error on line 3, column 9: Runtime error: Division by zero.");
    /// ```
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Located { error, .. } => error.root(),
            error => error,
        }
    }

    /// The source position of the failing construct, when known.
    #[must_use]
    pub const fn position(&self) -> Option<Position> {
        match self {
            Self::Located { line, column, .. } => Some(Position::new(*line, *column)),
            _ => None,
        }
    }
}
