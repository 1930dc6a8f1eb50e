//! # minilang
//!
//! minilang is a staged compiler and virtual machine for a small, statically
//! typed imperative language written in Rust.
//!
//! A program is a sequence of statements between `start` and `end`. It has
//! `int` and `float` variables, `print`, `if`/`else`, `while`, nested blocks
//! with lexical scoping, and C-like arithmetic and comparison operators.
//! Source text flows through five stages, each usable on its own:
//!
//! 1. [`tokenize`]: source text into positioned tokens.
//! 2. [`parse`]: tokens into an abstract syntax tree.
//! 3. [`analyze`]: scope and type checking.
//! 4. [`generate`]: lowering into three-address code.
//! 5. [`execute`]: running the three-address code.
//!
//! [`run`] chains all five.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use std::io::Write;

use crate::{
    ast::Program,
    error::{Error, ParseError, RuntimeError, SemanticError},
    interpreter::{
        lexer::Token, parser::core::parse_program, semantic::SemanticAnalyzer,
        tac::{TacGenerator, TacProgram},
        vm::Machine,
    },
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` and `Statement` trees built by the parser
/// and consumed by the semantic analyzer and the code generator, together
/// with the operator enums and the static typing rules.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Attaches source positions to every node for error reporting.
pub mod ast;
/// Provides unified error types for every stage.
///
/// This module defines one error enum per stage (lexing, parsing, semantic
/// analysis, execution) and the top-level [`Error`](error::Error) that wraps
/// them. Every compile-time error carries the line and column it refers to.
pub mod error;
/// Implements the pipeline stages.
///
/// # Responsibilities
/// - Lexer, parser, semantic analyzer, TAC generator and virtual machine.
/// - The scope stack shared by the analyzer and the machine.
/// - Runtime values and their operator semantics.
pub mod interpreter;

pub use crate::interpreter::lexer::tokenize;

/// Parses a token stream into a [`Program`].
///
/// `tokens` is the full output of [`tokenize`], including the trailing
/// `EOF` token.
///
/// # Errors
/// The first [`ParseError`] encountered.
///
/// # Examples
/// ```
/// use minilang::{parse, tokenize};
///
/// let tokens = tokenize("start int x = 1; end").unwrap();
/// let program = parse(&tokens).unwrap();
/// assert_eq!(program.statements.len(), 1);
///
/// let tokens = tokenize("start int x = ; end").unwrap();
/// assert!(parse(&tokens).is_err());
/// ```
pub fn parse(tokens: &[Token]) -> Result<Program, ParseError> {
    parse_program(&mut tokens.iter().peekable())
}

/// Checks scoping and typing rules.
///
/// # Errors
/// The first [`SemanticError`] in source order.
pub fn analyze(program: &Program) -> Result<(), SemanticError> {
    SemanticAnalyzer::new().analyze(program)
}

/// Lowers a [`Program`] into three-address code.
///
/// Temporary and label numbering starts at 1 on every call, so the same
/// program always yields the same listing.
#[must_use]
pub fn generate(program: &Program) -> TacProgram {
    TacGenerator::new().generate(program)
}

/// Executes three-address code on a fresh machine.
///
/// Each `print` writes one line to `out`.
///
/// # Errors
/// The first [`RuntimeError`] raised during execution.
pub fn execute<W: Write>(program: &TacProgram, out: &mut W) -> Result<(), RuntimeError> {
    Machine::new().execute(program, out)
}

/// Compiles and runs a program, writing its printed output to `out`.
///
/// All five stages run in order; the first failing stage stops the
/// pipeline. Output printed before a runtime error has already been written.
///
/// # Errors
/// An [`Error`] of the kind of the stage that failed.
///
/// # Examples
/// ```
/// use minilang::{error::ErrorKind, run};
///
/// let mut out = Vec::new();
/// run("start int x = 3; print(x); end", &mut out).unwrap();
/// assert_eq!(String::from_utf8(out).unwrap(), "3\n");
///
/// let err = run("start int x = 1.5; end", &mut Vec::new()).unwrap_err();
/// assert_eq!(err.kind(), ErrorKind::Semantic);
/// ```
pub fn run<W: Write>(source: &str, out: &mut W) -> Result<(), Error> {
    let tokens = tokenize(source)?;
    let program = parse(&tokens)?;
    analyze(&program)?;
    let tac = generate(&program);
    execute(&tac, out)?;
    Ok(())
}

/// Compiles and runs a program, collecting its printed output.
///
/// # Errors
/// An [`Error`] of the kind of the stage that failed.
///
/// # Examples
/// ```
/// use minilang::run_to_string;
///
/// let out = run_to_string("start float f = 3; print(f); print(5 / 2); end").unwrap();
/// assert_eq!(out, "3.0\n2.5\n");
/// ```
pub fn run_to_string(source: &str) -> Result<String, Error> {
    let mut out = Vec::new();
    run(source, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}
