use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{core::ParseResult, unary::parse_unary, utils::descend},
    },
};

/// Parses equality expressions.
///
/// Grammar: `equality := comparison (("==" | "!=") comparison)*`
pub fn parse_equality<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    parse_left_associative(tokens, depth, parse_comparison, |op| {
        matches!(op, BinaryOperator::Equal | BinaryOperator::NotEqual)
    })
}

/// Parses relational expressions.
///
/// Grammar: `comparison := term (("<" | "<=" | ">" | ">=") term)*`
pub fn parse_comparison<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    parse_left_associative(tokens, depth, parse_term, |op| {
        matches!(op,
                 BinaryOperator::Less
                 | BinaryOperator::LessEqual
                 | BinaryOperator::Greater
                 | BinaryOperator::GreaterEqual)
    })
}

/// Parses addition and subtraction expressions.
///
/// Grammar: `term := factor (("+" | "-") factor)*`
pub fn parse_term<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    parse_left_associative(tokens, depth, parse_factor, |op| {
        matches!(op, BinaryOperator::Add | BinaryOperator::Sub)
    })
}

/// Parses multiplication and division expressions.
///
/// Grammar: `factor := unary (("*" | "/") unary)*`
pub fn parse_factor<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    parse_left_associative(tokens, depth, parse_unary, |op| {
        matches!(op, BinaryOperator::Mul | BinaryOperator::Div)
    })
}

/// Folds `operand (op operand)*` into a left-leaning tree, where `op` is any
/// operator accepted by `accepts`.
///
/// Each fold deepens the tree by one level and counts towards the nesting
/// limit.
fn parse_left_associative<'a, I, F, A>(tokens: &mut Peekable<I>,
                                       mut depth: usize,
                                       operand: F,
                                       accepts: A)
                                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>,
          F: Fn(&mut Peekable<I>, usize) -> ParseResult<Expr>,
          A: Fn(BinaryOperator) -> bool
{
    let mut left = operand(tokens, depth)?;

    while let Some(token) = tokens.peek().copied() {
        let op = match token_to_binary_operator(&token.kind) {
            Some(op) if accepts(op) => op,
            _ => break,
        };
        depth = descend(depth, token)?;
        tokens.next();

        let right = operand(tokens, depth)?;
        left = Expr::Binary { left: Box::new(left),
                              op,
                              right: Box::new(right),
                              pos: token.position() };
    }

    Ok(left)
}

/// Maps a token to its corresponding binary operator.
///
/// Returns `None` for all tokens that are not binary operators.
///
/// # Example
/// ```
/// use minilang::{
///     ast::BinaryOperator,
///     interpreter::{lexer::TokenKind, parser::binary::token_to_binary_operator},
/// };
///
/// assert_eq!(token_to_binary_operator(&TokenKind::Plus),
///            Some(BinaryOperator::Add));
/// assert_eq!(token_to_binary_operator(&TokenKind::Equals), None);
/// ```
#[must_use]
pub const fn token_to_binary_operator(token: &TokenKind) -> Option<BinaryOperator> {
    match token {
        TokenKind::Plus => Some(BinaryOperator::Add),
        TokenKind::Minus => Some(BinaryOperator::Sub),
        TokenKind::Star => Some(BinaryOperator::Mul),
        TokenKind::Slash => Some(BinaryOperator::Div),
        TokenKind::EqualEqual => Some(BinaryOperator::Equal),
        TokenKind::BangEqual => Some(BinaryOperator::NotEqual),
        TokenKind::Less => Some(BinaryOperator::Less),
        TokenKind::LessEqual => Some(BinaryOperator::LessEqual),
        TokenKind::Greater => Some(BinaryOperator::Greater),
        TokenKind::GreaterEqual => Some(BinaryOperator::GreaterEqual),
        _ => None,
    }
}
