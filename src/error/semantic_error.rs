use thiserror::Error;

use crate::ast::Type;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all violations found by the semantic analyzer.
pub enum SemanticError {
    /// The name is already declared in the same scope.
    #[error("Error on line {line}, column {column}: Duplicate declaration of '{name}'.")]
    DuplicateDeclaration {
        /// The name of the variable.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// The name is not declared in any enclosing scope.
    #[error("Error on line {line}, column {column}: Undeclared variable '{name}'.")]
    UndeclaredVariable {
        /// The name of the variable.
        name:   String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// A `float` value flows into an `int` destination.
    #[error("Error on line {line}, column {column}: Cannot assign {found} to {expected} '{name}'.")]
    NarrowingAssignment {
        /// The destination variable.
        name:     String,
        /// The destination's declared type.
        expected: Type,
        /// The type of the assigned expression.
        found:    Type,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
}
