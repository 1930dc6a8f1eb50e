use logos::{FilterResult, Lexer, Logos, Skip};
use tracing::debug;

use crate::{
    ast::Position,
    error::LexError,
};

/// Classifies a lexical token in the source input.
///
/// Numeric literals and identifiers carry their payload; every other kind is
/// fully described by its variant. `Eof` is never matched by a rule and is
/// appended by [`tokenize`] as the end-of-input sentinel.
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(extras = LexerExtras)]
#[logos(error = LexFault)]
pub enum TokenKind {
    /// Float literal tokens, such as `2.5` or `3.`.
    #[regex(r"[0-9]+\.[0-9]*", parse_float)]
    Float(f64),
    /// Integer literal tokens, such as `42`.
    #[regex(r"[0-9]+", parse_integer)]
    Int(i64),
    /// `start`
    #[token("start")]
    Start,
    /// `end`
    #[token("end")]
    End,
    /// `int`
    #[token("int")]
    IntKeyword,
    /// `float`
    #[token("float")]
    FloatKeyword,
    /// `if`
    #[token("if")]
    If,
    /// `else`
    #[token("else")]
    Else,
    /// `while`
    #[token("while")]
    While,
    /// `print`
    #[token("print")]
    Print,
    /// Identifier tokens; variable names such as `x` or `total_2`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `// Comments.`
    #[token("//", line_comment)]
    Comment,
    /// `/* Block comments, possibly spanning lines. */`
    #[token("/*", block_comment)]
    BlockComment,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `!`
    #[token("!")]
    Bang,
    /// `=`
    #[token("=")]
    Equals,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `,`
    #[token(",")]
    Comma,
    /// Line breaks; only advance the line counter.
    #[token("\n", newline)]
    NewLine,
    /// Spaces, tabs, carriage returns and feeds.
    #[regex(r"[ \t\r\f]+", logos::skip)]
    Ignored,
    /// End-of-input sentinel.
    Eof,
}

impl TokenKind {
    /// Upper-case name of the kind, as shown in token listings.
    ///
    /// # Example
    /// ```
    /// use minilang::interpreter::lexer::TokenKind;
    ///
    /// assert_eq!(TokenKind::Int(3).name(), "NUMBER");
    /// assert_eq!(TokenKind::GreaterEqual.name(), "GTE");
    /// ```
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Float(_) | Self::Int(_) => "NUMBER",
            Self::Start => "START",
            Self::End => "END",
            Self::IntKeyword => "INT",
            Self::FloatKeyword => "FLOAT",
            Self::If => "IF",
            Self::Else => "ELSE",
            Self::While => "WHILE",
            Self::Print => "PRINT",
            Self::Identifier(_) => "IDENT",
            Self::EqualEqual => "EQEQ",
            Self::BangEqual => "NEQ",
            Self::LessEqual => "LTE",
            Self::GreaterEqual => "GTE",
            Self::Plus => "PLUS",
            Self::Minus => "MINUS",
            Self::Star => "STAR",
            Self::Slash => "SLASH",
            Self::Bang => "BANG",
            Self::Equals => "EQUAL",
            Self::Less => "LT",
            Self::Greater => "GT",
            Self::LParen => "LPAREN",
            Self::RParen => "RPAREN",
            Self::LBrace => "LBRACE",
            Self::RBrace => "RBRACE",
            Self::Semicolon => "SEMI",
            Self::Comma => "COMMA",
            Self::Eof => "EOF",
            // Rule carriers whose callbacks always skip; never part of a token stream.
            Self::Comment | Self::BlockComment | Self::NewLine | Self::Ignored => "",
        }
    }
}

/// A classified, positioned unit of lexical input.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The token's classification, including any literal payload.
    pub kind:   TokenKind,
    /// The exact source text matched; empty for `Eof`.
    pub lexeme: String,
    /// Line where the token starts.
    pub line:   usize,
    /// Column where the token starts.
    pub column: usize,
}

impl Token {
    /// The token's start as a [`Position`].
    #[must_use]
    pub const fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    /// Returns `true` for the end-of-input sentinel.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self.kind, TokenKind::Eof)
    }
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line and the byte offset where it begins, so that
/// columns can be derived from token spans.
#[derive(Debug)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line:       usize,
    /// Byte offset of the first character of the current line.
    pub line_start: usize,
}

impl Default for LexerExtras {
    fn default() -> Self {
        Self { line:       1,
               line_start: 0, }
    }
}

/// Failure reasons reported by individual token rules.
///
/// Positions are attached afterwards by [`tokenize`], which turns a fault
/// into a [`LexError`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LexFault {
    /// No rule matched.
    #[default]
    UnexpectedCharacter,
    /// A `/*` without a closing `*/`.
    UnterminatedComment,
    /// A digit run that does not fit its numeric type.
    InvalidNumber,
}

/// Tokenizes the complete source text.
///
/// The returned sequence always ends with exactly one `Eof` token. Lexing
/// stops at the first character no rule accepts.
///
/// # Errors
/// Returns a [`LexError`] carrying the offending character (or literal) and
/// its line and column.
///
/// # Example
/// ```
/// use minilang::interpreter::lexer::{TokenKind, tokenize};
///
/// let tokens = tokenize("start int x = 3; end").unwrap();
///
/// assert_eq!(tokens[1].kind, TokenKind::IntKeyword);
/// assert_eq!(tokens[4].kind, TokenKind::Int(3));
/// assert!(tokens.last().unwrap().is_eof());
/// ```
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer_with_extras(source, LexerExtras::default());

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let line = lexer.extras.line;
        let column = column_of(source, lexer.extras.line_start, span.start);

        match result {
            Ok(kind) => tokens.push(Token { kind,
                                            lexeme: lexer.slice().to_string(),
                                            line,
                                            column }),
            Err(LexFault::UnterminatedComment) => {
                return Err(LexError::UnterminatedComment { line, column });
            },
            Err(LexFault::InvalidNumber) => {
                return Err(LexError::InvalidNumber { lexeme: lexer.slice().to_string(),
                                                     line,
                                                     column });
            },
            Err(LexFault::UnexpectedCharacter) => {
                let character = lexer.slice().chars().next().unwrap_or('\0');
                return Err(LexError::UnexpectedCharacter { character,
                                                           line,
                                                           column });
            },
        }
    }

    tokens.push(Token { kind:   TokenKind::Eof,
                        lexeme: String::new(),
                        line:   lexer.extras.line,
                        column: column_of(source, lexer.extras.line_start, source.len()), });

    debug!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}

/// Converts a byte offset into a 1-based character column.
fn column_of(source: &str, line_start: usize, offset: usize) -> usize {
    source.get(line_start..offset)
          .map_or(1, |prefix| prefix.chars().count() + 1)
}

/// Advances the line counter past a `\n`.
fn newline(lex: &mut Lexer<TokenKind>) -> Skip {
    lex.extras.line += 1;
    lex.extras.line_start = lex.span().end;
    Skip
}

/// Skips everything up to (not including) the next line break.
fn line_comment(lex: &mut Lexer<TokenKind>) -> Skip {
    let remainder = lex.remainder();
    let length = remainder.find('\n').unwrap_or(remainder.len());
    lex.bump(length);
    Skip
}

/// Skips a block comment, keeping line tracking in sync with any newlines
/// it contains. A comment that never closes consumes the rest of the input
/// and is reported as an error at its opening `/*`.
fn block_comment(lex: &mut Lexer<TokenKind>) -> FilterResult<(), LexFault> {
    let remainder = lex.remainder();
    let Some(close) = remainder.find("*/") else {
        lex.bump(remainder.len());
        return FilterResult::Error(LexFault::UnterminatedComment);
    };

    let body_start = lex.span().end;
    for (index, _) in remainder[..close].match_indices('\n') {
        lex.extras.line += 1;
        lex.extras.line_start = body_start + index + 1;
    }

    lex.bump(close + 2);
    FilterResult::Skip
}

/// Parses a floating-point literal from the current token slice.
///
/// # Errors
/// `LexFault::InvalidNumber` if the slice is not a valid float.
fn parse_float(lex: &Lexer<TokenKind>) -> Result<f64, LexFault> {
    lex.slice().parse().map_err(|_| LexFault::InvalidNumber)
}

/// Parses an integer literal from the current token slice.
///
/// # Errors
/// `LexFault::InvalidNumber` if the value does not fit in an `i64`.
fn parse_integer(lex: &Lexer<TokenKind>) -> Result<i64, LexFault> {
    lex.slice().parse().map_err(|_| LexFault::InvalidNumber)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).unwrap()
                        .into_iter()
                        .map(|t| t.kind)
                        .collect()
    }

    #[test]
    fn two_character_operators_win_over_single() {
        assert_eq!(kinds("<= < == = != ! >="),
                   vec![TokenKind::LessEqual,
                        TokenKind::Less,
                        TokenKind::EqualEqual,
                        TokenKind::Equals,
                        TokenKind::BangEqual,
                        TokenKind::Bang,
                        TokenKind::GreaterEqual,
                        TokenKind::Eof]);
    }

    #[test]
    fn numbers_split_on_second_dot() {
        assert_eq!(kinds("12 3.5 7."),
                   vec![TokenKind::Int(12),
                        TokenKind::Float(3.5),
                        TokenKind::Float(7.0),
                        TokenKind::Eof]);

        let err = tokenize("1.2.3").unwrap_err();
        assert_eq!(err,
                   LexError::UnexpectedCharacter { character: '.',
                                                   line:      1,
                                                   column:    4, });
    }

    #[test]
    fn keywords_and_identifiers() {
        assert_eq!(kinds("start starting _end end"),
                   vec![TokenKind::Start,
                        TokenKind::Identifier("starting".to_string()),
                        TokenKind::Identifier("_end".to_string()),
                        TokenKind::End,
                        TokenKind::Eof]);
    }

    #[test]
    fn tracks_lines_and_columns_across_comments() {
        let tokens = tokenize("start // note\n  /* a\n b */ x\nend").unwrap();
        let x = &tokens[1];

        assert_eq!(x.lexeme, "x");
        assert_eq!((x.line, x.column), (3, 7));
        assert_eq!((tokens[2].line, tokens[2].column), (4, 1));
    }

    #[test]
    fn unterminated_block_comment_is_an_error() {
        let err = tokenize("start\n  /* never closed\nend").unwrap_err();
        assert_eq!(err, LexError::UnterminatedComment { line: 2, column: 3 });
    }

    #[test]
    fn unexpected_character_reports_position() {
        let err = tokenize("start\nint x = 3 # 4;").unwrap_err();
        assert_eq!(err,
                   LexError::UnexpectedCharacter { character: '#',
                                                   line:      2,
                                                   column:    11, });
    }

    #[test]
    fn oversized_integer_is_rejected() {
        assert!(matches!(tokenize("99999999999999999999"),
                         Err(LexError::InvalidNumber { .. })));
    }

    #[test]
    fn skipped_input_never_reaches_the_listing() {
        let tokens = tokenize("start // line\n\t/* block\n */ print(1); \r\n end").unwrap();

        assert_eq!(tokens.len(), 8);
        for token in &tokens {
            assert!(!token.kind.name().is_empty(), "{token:?} has no listing name");
        }
    }

    #[test]
    fn lexing_is_deterministic() {
        let source = "start float f = 1.5; while (f < 10) { f = f * 2; } end";
        assert_eq!(tokenize(source).unwrap(), tokenize(source).unwrap());
    }
}
