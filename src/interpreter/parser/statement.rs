use std::iter::Peekable;

use crate::{
    ast::{Statement, Type},
    interpreter::{
        lexer::{Token, TokenKind},
        parser::{
            core::{ParseResult, parse_expression},
            utils::{descend, expect, expect_identifier, unexpected},
        },
    },
};

/// Parses statements until `end`, `}` or the end of input.
///
/// The terminator is left in the stream for the caller to consume.
pub fn parse_statements<'a, I>(tokens: &mut Peekable<I>,
                               depth: usize)
                               -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a Token>
{
    let mut statements = Vec::new();

    while let Some(token) = tokens.peek() {
        if matches!(token.kind, TokenKind::End | TokenKind::RBrace | TokenKind::Eof) {
            break;
        }
        statements.push(parse_statement(tokens, depth)?);
    }

    Ok(statements)
}

/// Parses a single statement.
///
/// The leading token decides the construct:
/// - `int` / `float`: a variable declaration,
/// - `print`: a print statement,
/// - `if` / `while`: control flow,
/// - `{`: a block,
/// - an identifier: an assignment. Bare expression statements do not exist,
///   so the identifier must be followed by `=`.
///
/// # Errors
/// Returns a `ParseError` at the first token that does not fit, or
/// `NestingTooDeep` when `depth` reaches the nesting limit.
pub fn parse_statement<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let Some(token) = tokens.peek().copied() else {
        return Err(unexpected(None, "a statement"));
    };
    let depth = descend(depth, token)?;

    match token.kind {
        TokenKind::IntKeyword => parse_declaration(tokens, Type::Int, depth),
        TokenKind::FloatKeyword => parse_declaration(tokens, Type::Float, depth),
        TokenKind::Print => parse_print(tokens, depth),
        TokenKind::If => parse_if(tokens, depth),
        TokenKind::While => parse_while(tokens, depth),
        TokenKind::LBrace => parse_block(tokens, depth),
        TokenKind::Identifier(_) => parse_assignment(tokens, depth),
        _ => Err(unexpected(Some(token), "a statement")),
    }
}

/// Parses `("int" | "float") IDENT ("=" expression)? ";"`.
fn parse_declaration<'a, I>(tokens: &mut Peekable<I>,
                            ty: Type,
                            depth: usize)
                            -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let keyword = tokens.next().ok_or_else(|| unexpected(None, "a type"))?;
    let pos = keyword.position();

    let (name, _) = expect_identifier(tokens, &format!("identifier after '{ty}'"))?;

    let init = match tokens.peek() {
        Some(Token { kind: TokenKind::Equals,
                     .. }) => {
            tokens.next();
            Some(parse_expression(tokens, depth)?)
        },
        _ => None,
    };

    expect(tokens, &TokenKind::Semicolon, "';' after declaration")?;

    Ok(Statement::VarDecl { ty, name, init, pos })
}

/// Parses `IDENT "=" expression ";"`.
fn parse_assignment<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let (name, pos) = expect_identifier(tokens, "a variable name")?;
    expect(tokens, &TokenKind::Equals, &format!("'=' after '{name}'"))?;
    let value = parse_expression(tokens, depth)?;
    expect(tokens, &TokenKind::Semicolon, "';' after assignment")?;

    Ok(Statement::Assign { name, value, pos })
}

/// Parses `"print" "(" expression ")" ";"`.
fn parse_print<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let pos = expect(tokens, &TokenKind::Print, "'print'")?.position();
    expect(tokens, &TokenKind::LParen, "'(' after 'print'")?;
    let expr = parse_expression(tokens, depth)?;
    expect(tokens, &TokenKind::RParen, "')' after print expression")?;
    expect(tokens, &TokenKind::Semicolon, "';' after print")?;

    Ok(Statement::Print { expr, pos })
}

/// Parses `"if" "(" expression ")" statement ("else" statement)?`.
///
/// A dangling `else` binds to the nearest `if`.
fn parse_if<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let pos = expect(tokens, &TokenKind::If, "'if'")?.position();
    expect(tokens, &TokenKind::LParen, "'(' after 'if'")?;
    let condition = parse_expression(tokens, depth)?;
    expect(tokens, &TokenKind::RParen, "')' after if condition")?;

    let then_branch = Box::new(parse_statement(tokens, depth)?);

    let else_branch = match tokens.peek() {
        Some(Token { kind: TokenKind::Else,
                     .. }) => {
            tokens.next();
            Some(Box::new(parse_statement(tokens, depth)?))
        },
        _ => None,
    };

    Ok(Statement::If { condition,
                       then_branch,
                       else_branch,
                       pos })
}

/// Parses `"while" "(" expression ")" statement`.
fn parse_while<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let pos = expect(tokens, &TokenKind::While, "'while'")?.position();
    expect(tokens, &TokenKind::LParen, "'(' after 'while'")?;
    let condition = parse_expression(tokens, depth)?;
    expect(tokens, &TokenKind::RParen, "')' after while condition")?;

    let body = Box::new(parse_statement(tokens, depth)?);

    Ok(Statement::While { condition, body, pos })
}

/// Parses a block delimited by braces.
///
/// Grammar: `block := "{" statement* "}"`
fn parse_block<'a, I>(tokens: &mut Peekable<I>, depth: usize) -> ParseResult<Statement>
    where I: Iterator<Item = &'a Token>
{
    let pos = expect(tokens, &TokenKind::LBrace, "'{'")?.position();
    let statements = parse_statements(tokens, depth)?;
    expect(tokens, &TokenKind::RBrace, "'}' to close block")?;

    Ok(Statement::Block { statements, pos })
}
