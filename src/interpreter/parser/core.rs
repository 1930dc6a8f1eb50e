use std::iter::Peekable;

use tracing::debug;

use crate::{
    ast::{Expr, Program},
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{binary::parse_equality, statement::parse_statements, utils::expect},
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Deepest nesting of statements, parentheses, prefix operators and operator
/// chains accepted before parsing fails with `NestingTooDeep`.
///
/// Every later stage walks the tree recursively, so this bound also bounds
/// their stack use.
pub const MAX_NESTING_DEPTH: usize = 200;

/// Parses a complete program.
///
/// Grammar: `program := "start" statement* "end"`
///
/// Anything other than the end-of-input sentinel after the closing `end` is
/// rejected.
///
/// # Parameters
/// - `tokens`: Token iterator over the full output of the lexer.
///
/// # Returns
/// The parsed [`Program`].
pub fn parse_program<'a, I>(tokens: &mut Peekable<I>) -> ParseResult<Program>
    where I: Iterator<Item = &'a Token>
{
    expect(tokens, &TokenKind::Start, "'start' at program start")?;
    let statements = parse_statements(tokens, 0)?;
    expect(tokens, &TokenKind::End, "'end' at program end")?;

    match tokens.next() {
        Some(token) if !token.is_eof() => {
            Err(ParseError::UnexpectedTrailingTokens { token:  token.lexeme.clone(),
                                                       line:   token.line,
                                                       column: token.column, })
        },
        _ => {
            debug!(statements = statements.len(), "parsed program");
            Ok(Program { statements })
        },
    }
}

/// Parses a full expression.
///
/// This is the entry point for expression parsing.
/// It begins at the lowest-precedence level, equality, and recursively
/// descends through the precedence hierarchy.
///
/// Grammar: `expression := equality`
///
/// `depth` is the nesting depth of the enclosing construct.
pub fn parse_expression<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    parse_equality(tokens, depth)
}
