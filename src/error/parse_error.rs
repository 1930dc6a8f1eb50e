use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Represents all errors that can occur during parsing.
pub enum ParseError {
    /// Found an unexpected token while parsing.
    #[error("Error on line {line}, column {column}: Expected {expected}, found '{found}'.")]
    UnexpectedToken {
        /// What the grammar required at this point.
        expected: String,
        /// The lexeme that was found instead.
        found:    String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Reached the end of input unexpectedly.
    #[error("Error on line {line}, column {column}: Expected {expected}, found end of input.")]
    UnexpectedEndOfInput {
        /// What the grammar required at this point.
        expected: String,
        /// The source line where the error occurred.
        line:     usize,
        /// The source column where the error occurred.
        column:   usize,
    },
    /// Found extra tokens after the closing `end`.
    #[error("Error on line {line}, column {column}: Unexpected '{token}' after 'end'.")]
    UnexpectedTrailingTokens {
        /// The first extra token.
        token:  String,
        /// The source line where the error occurred.
        line:   usize,
        /// The source column where the error occurred.
        column: usize,
    },
    /// Statements or expressions are nested deeper than the parser allows.
    #[error("Error on line {line}, column {column}: Nesting exceeds {limit} levels.")]
    NestingTooDeep {
        /// The maximum nesting depth.
        limit:  usize,
        /// The source line where the limit was crossed.
        line:   usize,
        /// The source column where the limit was crossed.
        column: usize,
    },
}
