/// Lexical errors.
///
/// Raised while turning source text into tokens: unrecognized characters,
/// unterminated block comments and numeric literals that do not fit.
pub mod lex_error;
/// Parsing errors.
///
/// Defines all error types that can occur while building the syntax tree
/// from tokens. Parsing stops at the first offending token.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised while the virtual machine
/// executes three-address code. Most mirror the semantic checks because the
/// machine may run a program that was never analyzed.
pub mod runtime_error;
/// Semantic errors.
///
/// Raised by the static checker: duplicate declarations, undeclared names
/// and narrowing assignments.
pub mod semantic_error;

use thiserror::Error;

pub use lex_error::LexError;
pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;
pub use semantic_error::SemanticError;

/// The stage family an [`Error`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Raised by the lexer.
    Lexical,
    /// Raised by the parser.
    Syntactic,
    /// Raised by the semantic analyzer.
    Semantic,
    /// Raised by the virtual machine.
    Runtime,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Lexical => "lexical",
            Self::Syntactic => "syntax",
            Self::Semantic => "semantic",
            Self::Runtime => "runtime",
        };
        write!(f, "{name}")
    }
}

/// Any failure of the compilation pipeline.
///
/// Exactly one of these is produced per failed run; no stage accumulates
/// more than its first error.
#[derive(Debug, Error)]
pub enum Error {
    /// The source text could not be tokenized.
    #[error(transparent)]
    Lex(#[from] LexError),
    /// The token stream does not match the grammar.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The program is syntactically valid but ill-typed or ill-scoped.
    #[error(transparent)]
    Semantic(#[from] SemanticError),
    /// Execution failed.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    /// The stage family that produced this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Lex(_) => ErrorKind::Lexical,
            Self::Parse(_) => ErrorKind::Syntactic,
            Self::Semantic(_) => ErrorKind::Semantic,
            Self::Runtime(_) => ErrorKind::Runtime,
        }
    }
}
