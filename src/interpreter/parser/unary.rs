use std::iter::Peekable;

use crate::{
    ast::{Expr, Literal, UnaryOperator},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{descend, expect, unexpected},
        },
    },
};

/// Parses a unary expression.
///
/// Supports prefix operators `!`, `-` and `+`. Unary operators are
/// right-associative, so an input like `!-x` is parsed as `!( -x )`.
///
/// Grammar:
/// ```text
///     unary := ("!" | "-" | "+") unary
///            | primary
/// ```
pub(crate) fn parse_unary<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    let Some(token) = tokens.peek().copied() else {
        return Err(unexpected(None, "an expression"));
    };

    let op = match token.kind {
        TokenKind::Bang => UnaryOperator::Not,
        TokenKind::Minus => UnaryOperator::Negate,
        TokenKind::Plus => UnaryOperator::Plus,
        _ => return parse_primary(tokens, depth),
    };
    let depth = descend(depth, token)?;
    tokens.next();

    let operand = parse_unary(tokens, depth)?;
    Ok(Expr::Unary { op,
                     operand: Box::new(operand),
                     pos: token.position() })
}

/// Parses a primary (atomic) expression.
///
/// Grammar:
/// ```text
///     primary := NUMBER | IDENT | "(" expression ")"
/// ```
pub(crate) fn parse_primary<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a Token>
{
    let Some(token) = tokens.next() else {
        return Err(unexpected(None, "an expression"));
    };
    let pos = token.position();

    match &token.kind {
        TokenKind::Int(n) => Ok(Expr::Literal { value: Literal::Int(*n),
                                                pos }),
        TokenKind::Float(x) => Ok(Expr::Literal { value: Literal::Float(*x),
                                                  pos }),
        TokenKind::Identifier(name) => Ok(Expr::Variable { name: name.clone(),
                                                           pos }),
        TokenKind::LParen => {
            let expr = parse_expression(tokens, descend(depth, token)?)?;
            expect(tokens, &TokenKind::RParen, "')' after expression")?;
            Ok(expr)
        },
        _ => Err(unexpected(Some(token), "an expression")),
    }
}
