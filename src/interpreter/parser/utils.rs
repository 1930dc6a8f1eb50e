use std::iter::Peekable;

use crate::{
    ast::Position,
    error::ParseError,
    interpreter::{
        lexer::{Token, TokenKind},
        parser::core::{MAX_NESTING_DEPTH, ParseResult},
    },
};

/// Builds the error for a token that does not fit the grammar.
///
/// The end-of-input sentinel (or a missing token) becomes
/// `UnexpectedEndOfInput`; anything else becomes `UnexpectedToken`.
pub(in crate::interpreter::parser) fn unexpected(token: Option<&Token>,
                                                 expected: &str)
                                                 -> ParseError {
    match token {
        Some(token) if !token.is_eof() => {
            ParseError::UnexpectedToken { expected: expected.to_string(),
                                          found:    token.lexeme.clone(),
                                          line:     token.line,
                                          column:   token.column, }
        },
        Some(token) => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                          line:     token.line,
                                                          column:   token.column, },
        None => ParseError::UnexpectedEndOfInput { expected: expected.to_string(),
                                                   line:     0,
                                                   column:   0, },
    }
}

/// Enters one more nesting level at `token`.
///
/// # Errors
/// `NestingTooDeep` once `depth` has reached [`MAX_NESTING_DEPTH`].
pub(in crate::interpreter::parser) fn descend(depth: usize,
                                              token: &Token)
                                              -> ParseResult<usize> {
    if depth >= MAX_NESTING_DEPTH {
        return Err(ParseError::NestingTooDeep { limit:  MAX_NESTING_DEPTH,
                                                line:   token.line,
                                                column: token.column, });
    }
    Ok(depth + 1)
}

/// Consumes the next token, requiring it to be of `kind`.
///
/// Only meaningful for payload-free kinds such as punctuation and keywords.
///
/// # Errors
/// Returns a `ParseError` describing `expected` if the next token differs.
pub(in crate::interpreter::parser) fn expect<'a, I>(tokens: &mut Peekable<I>,
                                                    kind: &TokenKind,
                                                    expected: &str)
                                                    -> ParseResult<&'a Token>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(token) if token.kind == *kind => Ok(token),
        other => Err(unexpected(other, expected)),
    }
}

/// Consumes an identifier and returns its name and position.
///
/// # Errors
/// Returns a `ParseError` if the next token is not an identifier.
pub(in crate::interpreter::parser) fn expect_identifier<'a, I>(tokens: &mut Peekable<I>,
                                                               expected: &str)
                                                               -> ParseResult<(String, Position)>
    where I: Iterator<Item = &'a Token>
{
    match tokens.next() {
        Some(Token { kind: TokenKind::Identifier(name),
                     line,
                     column,
                     .. }) => Ok((name.clone(), Position::new(*line, *column))),
        other => Err(unexpected(other, expected)),
    }
}
