use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during tokenization.
pub enum LexError {
    /// No token rule matches the character.
    #[error("Error on line {line}, column {column}: Unexpected character '{character}'.")]
    UnexpectedCharacter {
        /// The offending character.
        character: char,
        /// The source line where the error occurred.
        line:      usize,
        /// The source column where the error occurred.
        column:    usize,
    },
    /// A `/*` comment that is never closed.
    #[error("Error on line {line}, column {column}: Unterminated block comment.")]
    UnterminatedComment {
        /// The line of the opening `/*`.
        line:   usize,
        /// The column of the opening `/*`.
        column: usize,
    },
    /// A numeric literal that cannot be represented.
    #[error("Error on line {line}, column {column}: Invalid numeric literal '{lexeme}'.")]
    InvalidNumber {
        /// The literal as written.
        lexeme: String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
}
