use tracing::debug;

use crate::{
    ast::{Expr, Position, Program, Statement},
    interpreter::{
        tac::instruction::{Instruction, Label, Operand, TacProgram, Temp},
        value::Value,
    },
};

/// Lowers a [`Program`] into a linear [`TacProgram`].
///
/// Lowering is a pure function of the tree: the only state is the pair of
/// counters, both starting at 1 for every generator. Every literal, unary
/// and binary node allocates exactly one temporary; variables are referenced
/// by name.
///
/// Blocks, and non-block `if`/`else`/`while` bodies, are wrapped in
/// `enter_scope` / `exit_scope` so the machine sees the same frames as the
/// analyzer. Declarations emit `declare` before their initializer is
/// evaluated, then a `copy` into the variable.
#[derive(Debug)]
pub struct TacGenerator {
    code:       Vec<Instruction>,
    positions:  Vec<Position>,
    next_temp:  u32,
    next_label: u32,
}

impl Default for TacGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl TacGenerator {
    /// Creates a generator with fresh counters.
    #[must_use]
    pub const fn new() -> Self {
        Self { code:       Vec::new(),
               positions:  Vec::new(),
               next_temp:  1,
               next_label: 1, }
    }

    /// Consumes the generator and lowers `program`.
    ///
    /// # Example
    /// ```
    /// use minilang::{interpreter::tac::TacGenerator, parse, tokenize};
    ///
    /// let tokens = tokenize("start int x = 3; print(x); end").unwrap();
    /// let program = parse(&tokens).unwrap();
    /// let tac = TacGenerator::new().generate(&program);
    ///
    /// let listing: Vec<String> = tac.instructions.iter().map(ToString::to_string).collect();
    /// assert_eq!(listing,
    ///            ["(declare, int, _, x)",
    ///             "(const, 3, _, t1)",
    ///             "(copy, t1, _, x)",
    ///             "(print, x, _, _)"]);
    /// ```
    #[must_use]
    pub fn generate(mut self, program: &Program) -> TacProgram {
        for statement in &program.statements {
            self.emit_statement(statement);
        }

        debug!(instructions = self.code.len(),
               temps = self.next_temp - 1,
               labels = self.next_label - 1,
               "generated three-address code");

        TacProgram { instructions: self.code,
                     positions:    self.positions,
                     temp_count:   self.next_temp - 1,
                     label_count:  self.next_label - 1, }
    }

    fn new_temp(&mut self) -> Temp {
        let temp = Temp(self.next_temp);
        self.next_temp += 1;
        temp
    }

    fn new_label(&mut self) -> Label {
        let label = Label(self.next_label);
        self.next_label += 1;
        label
    }

    fn emit(&mut self, instruction: Instruction, pos: Position) {
        self.code.push(instruction);
        self.positions.push(pos);
    }

    fn emit_statement(&mut self, statement: &Statement) {
        let pos = statement.position();
        match statement {
            Statement::VarDecl { ty, name, init, .. } => {
                self.emit(Instruction::Declare { name: name.clone(),
                                                 ty:   *ty, },
                          pos);
                if let Some(init) = init {
                    let src = self.emit_expr(init);
                    self.emit(Instruction::Copy { src,
                                                  dest: name.clone() },
                              pos);
                }
            },
            Statement::Assign { name, value, .. } => {
                let src = self.emit_expr(value);
                self.emit(Instruction::Copy { src,
                                              dest: name.clone() },
                          pos);
            },
            Statement::Print { expr, .. } => {
                let arg = self.emit_expr(expr);
                self.emit(Instruction::Print { arg }, pos);
            },
            Statement::Block { statements, .. } => {
                self.emit(Instruction::EnterScope, pos);
                for statement in statements {
                    self.emit_statement(statement);
                }
                self.emit(Instruction::ExitScope, pos);
            },
            Statement::If { condition,
                            then_branch,
                            else_branch,
                            .. } => {
                let cond = self.emit_expr(condition);
                let on_true = self.new_label();
                let end = self.new_label();

                match else_branch {
                    None => {
                        self.emit(Instruction::IfGoto { cond,
                                                        target: on_true },
                                  pos);
                        self.emit(Instruction::Goto(end), pos);
                        self.emit(Instruction::Label(on_true), pos);
                        self.emit_branch(then_branch);
                        self.emit(Instruction::Label(end), pos);
                    },
                    Some(else_branch) => {
                        let on_false = self.new_label();
                        self.emit(Instruction::IfGoto { cond,
                                                        target: on_true },
                                  pos);
                        self.emit(Instruction::Goto(on_false), pos);
                        self.emit(Instruction::Label(on_true), pos);
                        self.emit_branch(then_branch);
                        self.emit(Instruction::Goto(end), pos);
                        self.emit(Instruction::Label(on_false), pos);
                        self.emit_branch(else_branch);
                        self.emit(Instruction::Label(end), pos);
                    },
                }
            },
            Statement::While { condition, body, .. } => {
                let start = self.new_label();
                let on_true = self.new_label();
                let end = self.new_label();

                self.emit(Instruction::Label(start), pos);
                let cond = self.emit_expr(condition);
                self.emit(Instruction::IfGoto { cond,
                                                target: on_true },
                          pos);
                self.emit(Instruction::Goto(end), pos);
                self.emit(Instruction::Label(on_true), pos);
                self.emit_branch(body);
                self.emit(Instruction::Goto(start), pos);
                self.emit(Instruction::Label(end), pos);
            },
        }
    }

    /// Lowers an `if`/`else`/`while` body inside exactly one frame.
    fn emit_branch(&mut self, body: &Statement) {
        if matches!(body, Statement::Block { .. }) {
            self.emit_statement(body);
        } else {
            let pos = body.position();
            self.emit(Instruction::EnterScope, pos);
            self.emit_statement(body);
            self.emit(Instruction::ExitScope, pos);
        }
    }

    fn emit_expr(&mut self, expr: &Expr) -> Operand {
        let pos = expr.position();
        match expr {
            Expr::Variable { name, .. } => Operand::Var(name.clone()),
            Expr::Literal { value, .. } => {
                let dest = self.new_temp();
                self.emit(Instruction::Const { value: Value::from(*value),
                                               dest },
                          pos);
                Operand::Temp(dest)
            },
            Expr::Unary { op, operand, .. } => {
                let arg = self.emit_expr(operand);
                let dest = self.new_temp();
                self.emit(Instruction::Unary { op: *op, arg, dest }, pos);
                Operand::Temp(dest)
            },
            Expr::Binary { left, op, right, .. } => {
                let left = self.emit_expr(left);
                let right = self.emit_expr(right);
                let dest = self.new_temp();
                self.emit(Instruction::Binary { op: *op,
                                                left,
                                                right,
                                                dest },
                          pos);
                Operand::Temp(dest)
            },
        }
    }
}
