/// The lexer module turns source text into positioned tokens.
///
/// The lexer is the first stage of the pipeline. It skips whitespace and
/// both comment forms, tracks line and column for every token, and ends the
/// stream with an `EOF` token.
///
/// # Responsibilities
/// - Recognizes keywords, identifiers, integer and float literals, operators
///   and punctuation using longest match.
/// - Reports unexpected characters and unterminated block comments with
///   their location.
pub mod lexer;
/// The parser module builds the abstract syntax tree (AST) from tokens.
///
/// The parser is a recursive-descent parser with one function per grammar
/// rule. It consumes the whole token stream, `start` through `end`, and
/// reports the first token that does not fit the grammar.
pub mod parser;
/// Lexically nested name-resolution frames shared by the analyzer and the
/// virtual machine.
pub mod scope;
/// The semantic module checks a parsed program before it is lowered.
///
/// # Responsibilities
/// - Rejects duplicate declarations within one frame.
/// - Rejects uses of names not visible from the current frame.
/// - Rejects storing a `float` into an `int` variable.
pub mod semantic;
/// Three-address code: the instruction set and the AST lowering pass.
pub mod tac;
/// Runtime values manipulated by the virtual machine.
pub mod value;
/// The virtual machine module executes three-address code.
///
/// The machine walks the instruction stream with a program counter, keeps a
/// table of temporaries and a stack of variable frames, and writes printed
/// values to any `std::io::Write`.
///
/// # Responsibilities
/// - Implements arithmetic, division, comparison and logical operators with
///   numeric promotion.
/// - Enforces declared variable types on every store.
/// - Reports runtime errors such as division by zero or overflow.
pub mod vm;
