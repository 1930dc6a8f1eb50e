use std::fmt;

use crate::{
    ast::{BinaryOperator, Position, Type, UnaryOperator},
    interpreter::value::Value,
};

/// A generator-introduced, single-assignment value holder (`t<N>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Temp(pub u32);

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

/// A jump target (`L<N>`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Label(pub u32);

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// A source operand: a program variable or a temporary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// A named variable, resolved through the scope stack at run time.
    Var(String),
    /// A temporary computed earlier in the stream.
    Temp(Temp),
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Var(name) => write!(f, "{name}"),
            Self::Temp(temp) => write!(f, "{temp}"),
        }
    }
}

/// One three-address instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// `dest := value`
    Const {
        /// The constant.
        value: Value,
        /// The receiving temporary.
        dest:  Temp,
    },
    /// `dest := src`, where `dest` is a declared variable.
    Copy {
        /// The value source.
        src:  Operand,
        /// The variable being written.
        dest: String,
    },
    /// `dest := op arg`
    Unary {
        /// The operator.
        op:   UnaryOperator,
        /// The operand.
        arg:  Operand,
        /// The receiving temporary.
        dest: Temp,
    },
    /// `dest := left op right`
    Binary {
        /// The operator.
        op:    BinaryOperator,
        /// Left operand.
        left:  Operand,
        /// Right operand.
        right: Operand,
        /// The receiving temporary.
        dest:  Temp,
    },
    /// Emits the operand's value.
    Print {
        /// The printed operand.
        arg: Operand,
    },
    /// Marks a jump target; a no-op when executed.
    Label(Label),
    /// Unconditional jump.
    Goto(Label),
    /// Jumps when `cond` is truthy (nonzero), falls through otherwise.
    IfGoto {
        /// The tested operand.
        cond:   Operand,
        /// Where to go when `cond` is truthy.
        target: Label,
    },
    /// Declares `name` in the innermost frame with its type's zero value.
    Declare {
        /// The declared name.
        name: String,
        /// The declared type.
        ty:   Type,
    },
    /// Pushes a frame.
    EnterScope,
    /// Pops the innermost frame.
    ExitScope,
}

impl Instruction {
    /// The opcode column of the quadruple form.
    #[must_use]
    pub fn opcode(&self) -> String {
        match self {
            Self::Const { .. } => "const".to_string(),
            Self::Copy { .. } => "copy".to_string(),
            Self::Unary { op, .. } => format!("unary_{op}"),
            Self::Binary { op, .. } => op.to_string(),
            Self::Print { .. } => "print".to_string(),
            Self::Label(_) => "label".to_string(),
            Self::Goto(_) => "goto".to_string(),
            Self::IfGoto { .. } => "if_goto".to_string(),
            Self::Declare { .. } => "declare".to_string(),
            Self::EnterScope => "enter_scope".to_string(),
            Self::ExitScope => "exit_scope".to_string(),
        }
    }

    /// The instruction as `(opcode, arg1, arg2, result)`.
    ///
    /// # Example
    /// ```
    /// use minilang::{
    ///     ast::BinaryOperator,
    ///     interpreter::tac::{Instruction, Operand, Temp},
    /// };
    ///
    /// let add = Instruction::Binary { op:    BinaryOperator::Add,
    ///                                 left:  Operand::Var("x".to_string()),
    ///                                 right: Operand::Temp(Temp(1)),
    ///                                 dest:  Temp(2), };
    ///
    /// assert_eq!(add.quad(),
    ///            ("+".to_string(),
    ///             Some("x".to_string()),
    ///             Some("t1".to_string()),
    ///             Some("t2".to_string())));
    /// ```
    #[must_use]
    pub fn quad(&self) -> (String, Option<String>, Option<String>, Option<String>) {
        let (arg1, arg2, result) = match self {
            Self::Const { value, dest } => (Some(value.to_string()), None, Some(dest.to_string())),
            Self::Copy { src, dest } => (Some(src.to_string()), None, Some(dest.clone())),
            Self::Unary { arg, dest, .. } => (Some(arg.to_string()), None, Some(dest.to_string())),
            Self::Binary { left,
                           right,
                           dest,
                           .. } => {
                (Some(left.to_string()), Some(right.to_string()), Some(dest.to_string()))
            },
            Self::Print { arg } => (Some(arg.to_string()), None, None),
            Self::Label(label) | Self::Goto(label) => (None, None, Some(label.to_string())),
            Self::IfGoto { cond, target } => (Some(cond.to_string()), None, Some(target.to_string())),
            Self::Declare { name, ty } => (Some(ty.to_string()), None, Some(name.clone())),
            Self::EnterScope | Self::ExitScope => (None, None, None),
        };
        (self.opcode(), arg1, arg2, result)
    }

    /// The label this instruction may transfer control to, if any.
    #[must_use]
    pub const fn jump_target(&self) -> Option<Label> {
        match self {
            Self::Goto(label) | Self::IfGoto { target: label, .. } => Some(*label),
            _ => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (opcode, arg1, arg2, result) = self.quad();
        let slot = |s: Option<String>| s.unwrap_or_else(|| "_".to_string());
        write!(f, "({opcode}, {}, {}, {})", slot(arg1), slot(arg2), slot(result))
    }
}

/// The complete output of one generation run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TacProgram {
    /// Instructions in execution order.
    pub instructions: Vec<Instruction>,
    /// Source position of the construct each instruction was lowered from,
    /// index for index. May be shorter than `instructions` for hand-built
    /// programs; instructions without a position report errors without one.
    pub positions:    Vec<Position>,
    /// Number of temporaries allocated (`t1` ..= `tN`).
    pub temp_count:   u32,
    /// Number of labels allocated (`L1` ..= `LN`).
    pub label_count:  u32,
}

impl TacProgram {
    /// Number of instructions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` when no instruction was generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}

impl fmt::Display for TacProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for instruction in &self.instructions {
            writeln!(f, "{instruction}")?;
        }
        Ok(())
    }
}
