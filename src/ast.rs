use std::fmt;

/// A location in the source text.
///
/// Lines and columns both start at 1. Columns count characters, not bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    /// Line number in the source code.
    pub line:   usize,
    /// Column number in the source code.
    pub column: usize,
}

impl Position {
    /// Creates a position from a line and a column.
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The two declarable types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    /// A 64-bit signed integer (`int`).
    Int,
    /// A 64-bit floating-point number (`float`).
    Float,
}

impl Type {
    /// Returns the type of an arithmetic result: `float` dominates.
    ///
    /// ## Example
    /// ```
    /// use minilang::ast::Type;
    ///
    /// assert_eq!(Type::unify(Type::Int, Type::Int), Type::Int);
    /// assert_eq!(Type::unify(Type::Int, Type::Float), Type::Float);
    /// ```
    #[must_use]
    pub const fn unify(left: Self, right: Self) -> Self {
        match (left, right) {
            (Self::Int, Self::Int) => Self::Int,
            _ => Self::Float,
        }
    }

    /// Checks whether a value of type `source` may be stored into a
    /// destination of type `self`.
    ///
    /// Widening (`int` into `float`) is allowed; narrowing is not.
    #[must_use]
    pub const fn accepts(self, source: Self) -> bool {
        !matches!((self, source), (Self::Int, Self::Float))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
        }
    }
}

/// A numeric literal as written in the source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Literal {
    /// An integer literal such as `42`.
    Int(i64),
    /// A float literal such as `2.5` or `3.`.
    Float(f64),
}

impl Literal {
    /// The static type of the literal.
    #[must_use]
    pub const fn ty(&self) -> Type {
        match self {
            Self::Int(_) => Type::Int,
            Self::Float(_) => Type::Float,
        }
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(x) => write!(f, "{x:?}"),
        }
    }
}

/// An expression node.
///
/// Every node owns its children; the tree has no back-references.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A numeric literal.
    Literal {
        /// The constant value.
        value: Literal,
        /// Where the literal starts.
        pos:   Position,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Where the name starts.
        pos:  Position,
    },
    /// A prefix operator applied to one operand.
    Unary {
        /// The unary operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Where the operator starts.
        pos:     Position,
    },
    /// An infix operator applied to two operands.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Where the operator token is.
        pos:   Position,
    },
}

impl Expr {
    /// Gets the source position of `self`.
    /// ## Example
    /// ```
    /// use minilang::ast::{Expr, Position};
    ///
    /// let expr = Expr::Variable { name: "x".to_string(),
    ///                             pos:  Position::new(5, 3), };
    ///
    /// assert_eq!(expr.position(), Position::new(5, 3));
    /// ```
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::Literal { pos, .. }
            | Self::Variable { pos, .. }
            | Self::Unary { pos, .. }
            | Self::Binary { pos, .. } => *pos,
        }
    }
}

/// A statement node.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `int x;`, `float y = expr;`
    VarDecl {
        /// The declared type.
        ty:   Type,
        /// The name being declared.
        name: String,
        /// The optional initializer.
        init: Option<Expr>,
        /// Position of the type keyword.
        pos:  Position,
    },
    /// `x = expr;`
    Assign {
        /// The variable being assigned.
        name:  String,
        /// The value which is being assigned.
        value: Expr,
        /// Position of the variable name.
        pos:   Position,
    },
    /// `print(expr);`
    Print {
        /// The printed expression.
        expr: Expr,
        /// Position of the `print` keyword.
        pos:  Position,
    },
    /// `{ stmt* }`
    Block {
        /// Statements inside the block.
        statements: Vec<Self>,
        /// Position of the opening brace.
        pos:        Position,
    },
    /// `if (cond) stmt else stmt`
    If {
        /// The branch condition.
        condition:   Expr,
        /// Executed when the condition is truthy.
        then_branch: Box<Self>,
        /// Executed otherwise, if present.
        else_branch: Option<Box<Self>>,
        /// Position of the `if` keyword.
        pos:         Position,
    },
    /// `while (cond) stmt`
    While {
        /// Re-evaluated before every iteration.
        condition: Expr,
        /// The loop body.
        body:      Box<Self>,
        /// Position of the `while` keyword.
        pos:       Position,
    },
}

impl Statement {
    /// Gets the source position of `self`.
    #[must_use]
    pub const fn position(&self) -> Position {
        match self {
            Self::VarDecl { pos, .. }
            | Self::Assign { pos, .. }
            | Self::Print { pos, .. }
            | Self::Block { pos, .. }
            | Self::If { pos, .. }
            | Self::While { pos, .. } => *pos,
        }
    }
}

/// A whole program: the statements between `start` and `end`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Program {
    /// Top-level statements in source order.
    pub statements: Vec<Statement>,
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Logical NOT (`!x`), yields `0` or `1`.
    Not,
    /// Arithmetic negation (`-x`).
    Negate,
    /// Unary plus (`+x`), the identity.
    Plus,
}

impl UnaryOperator {
    /// Static result type for an operand of type `operand`.
    #[must_use]
    pub const fn result_type(self, operand: Type) -> Type {
        match self {
            Self::Not => Type::Int,
            Self::Negate | Self::Plus => operand,
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Not => "!",
            Self::Negate => "-",
            Self::Plus => "+",
        };
        write!(f, "{operator}")
    }
}

/// Represents a binary operator.
///
/// Binary operators include arithmetic and comparisons.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Division (`/`)
    Div,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
}

impl BinaryOperator {
    /// Returns `true` for `+ - * /`.
    #[must_use]
    pub const fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    /// Static result type of the operator applied to `left` and `right`.
    ///
    /// Arithmetic unifies its operands; comparisons always yield `int`.
    ///
    /// ## Example
    /// ```
    /// use minilang::ast::{BinaryOperator, Type};
    ///
    /// assert_eq!(BinaryOperator::Mul.result_type(Type::Int, Type::Float), Type::Float);
    /// assert_eq!(BinaryOperator::Less.result_type(Type::Float, Type::Float), Type::Int);
    /// ```
    #[must_use]
    pub const fn result_type(self, left: Type, right: Type) -> Type {
        if self.is_arithmetic() {
            Type::unify(left, right)
        } else {
            Type::Int
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, Div, Equal, Greater, GreaterEqual, Less, LessEqual, Mul, NotEqual, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
        };
        write!(f, "{operator}")
    }
}
