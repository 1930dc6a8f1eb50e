/// Entry points and shared result type.
///
/// Parses the `start ... end` frame of a program and exposes
/// `parse_expression`, the top of the expression precedence ladder.
pub mod core;

/// Statement parsing.
///
/// Declarations, assignments, `print`, `if`/`else`, `while` and blocks.
pub mod statement;

/// Binary operator parsing.
///
/// One left-associative level per precedence tier: equality, comparison,
/// additive and multiplicative.
pub mod binary;

/// Unary and primary expression parsing.
///
/// Handles prefix operators and atoms: literals, variables and
/// parenthesized expressions.
pub mod unary;

/// Utility functions for the parser.
///
/// Token expectations and uniform error construction.
pub mod utils;
