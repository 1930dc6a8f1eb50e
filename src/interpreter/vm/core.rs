use std::{collections::HashMap, io::Write};

use tracing::{debug, trace};

use crate::{
    ast::Type,
    error::RuntimeError,
    interpreter::{
        scope::ScopeStack,
        tac::{Instruction, Label, Operand, TacProgram, Temp},
        value::Value,
        vm::{binary::eval_binary, unary::eval_unary},
    },
};

/// Result type used by the virtual machine.
///
/// Every instruction either succeeds or stops the machine with a
/// `RuntimeError` describing the failure.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

/// A variable's storage: its declared type and current value.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Slot {
    ty:    Type,
    value: Value,
}

/// Executes three-address code.
///
/// The machine holds a stack of variable frames (the bottom one is the
/// global frame) and a flat table of temporaries. Variables declared at the
/// global level outlive a call to [`Machine::execute`]; every frame pushed
/// during a call is released when the call returns, whether it succeeds or
/// fails.
#[derive(Debug, Default)]
pub struct Machine {
    scopes: ScopeStack<Slot>,
    temps:  HashMap<Temp, Value>,
}

impl Machine {
    /// Creates a machine with an empty global frame.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live variable frames, the global frame included.
    #[must_use]
    pub fn scope_depth(&self) -> usize {
        self.scopes.depth()
    }

    /// Current value of the innermost visible variable called `name`.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Value> {
        self.scopes.resolve(name).map(|slot| slot.value)
    }

    /// Runs `program`, writing one line per `print` to `out`.
    ///
    /// Labels are resolved before the first instruction executes, so a
    /// malformed stream fails without producing output.
    ///
    /// # Errors
    /// The first [`RuntimeError`] raised by an instruction, wrapped in
    /// `Located` when the program records the instruction's source position,
    /// or an `UndefinedLabel`/`DuplicateLabel` error for a malformed stream.
    ///
    /// # Example
    /// ```
    /// use minilang::{generate, interpreter::vm::Machine, parse, tokenize};
    ///
    /// let tokens = tokenize("start int x = 2; x = x * 21; print(x); end").unwrap();
    /// let tac = generate(&parse(&tokens).unwrap());
    ///
    /// let mut out = Vec::new();
    /// let mut machine = Machine::new();
    /// machine.execute(&tac, &mut out).unwrap();
    ///
    /// assert_eq!(String::from_utf8(out).unwrap(), "42\n");
    /// assert_eq!(machine.scope_depth(), 1);
    /// ```
    pub fn execute<W: Write>(&mut self, program: &TacProgram, out: &mut W) -> RuntimeResult<()> {
        let labels = resolve_labels(&program.instructions)?;
        let base = self.scopes.depth();
        self.temps.clear();

        let result = self.run(program, &labels, base, out);

        self.scopes.unwind_to(base);
        match &result {
            Ok(steps) => debug!(steps, "execution finished"),
            Err(e) => debug!(error = %e, "execution aborted"),
        }
        result.map(|_| ())
    }

    /// The fetch-execute loop. Returns the number of instructions executed.
    fn run<W: Write>(&mut self,
                     program: &TacProgram,
                     labels: &HashMap<Label, usize>,
                     base: usize,
                     out: &mut W)
                     -> RuntimeResult<usize> {
        let mut pc = 0;
        let mut steps = 0;

        while let Some(instruction) = program.instructions.get(pc) {
            let jump = self.step(instruction, labels, base, out)
                           .map_err(|e| match program.positions.get(pc) {
                               Some(pos) => e.at(*pos),
                               None => e,
                           })?;
            pc = jump.unwrap_or(pc + 1);
            steps += 1;
        }

        Ok(steps)
    }

    /// Executes one instruction. Returns the jump destination, if control
    /// does not fall through.
    fn step<W: Write>(&mut self,
                      instruction: &Instruction,
                      labels: &HashMap<Label, usize>,
                      base: usize,
                      out: &mut W)
                      -> RuntimeResult<Option<usize>> {
        match instruction {
            Instruction::Const { value, dest } => {
                self.temps.insert(*dest, *value);
            },
            Instruction::Copy { src, dest } => {
                let value = self.read(src)?;
                self.store(dest, value)?;
            },
            Instruction::Unary { op, arg, dest } => {
                let value = eval_unary(*op, self.read(arg)?)?;
                self.temps.insert(*dest, value);
            },
            Instruction::Binary { op,
                                  left,
                                  right,
                                  dest, } => {
                let value = eval_binary(*op, self.read(left)?, self.read(right)?)?;
                self.temps.insert(*dest, value);
            },
            Instruction::Print { arg } => {
                let value = self.read(arg)?;
                writeln!(out, "{value}")?;
            },
            Instruction::Label(_) => {},
            Instruction::Goto(target) => {
                trace!(%target, "jump");
                return Ok(Some(labels[target]));
            },
            Instruction::IfGoto { cond, target } => {
                if self.read(cond)?.is_truthy() {
                    trace!(%target, "conditional jump taken");
                    return Ok(Some(labels[target]));
                }
            },
            Instruction::Declare { name, ty } => {
                let slot = Slot { ty:    *ty,
                                  value: Value::zero(*ty), };
                if !self.scopes.declare(name, slot) {
                    return Err(RuntimeError::DuplicateDeclaration { name: name.clone() });
                }
            },
            Instruction::EnterScope => {
                self.scopes.push();
                trace!(depth = self.scopes.depth(), "enter scope");
            },
            Instruction::ExitScope => {
                if self.scopes.depth() <= base || !self.scopes.pop() {
                    return Err(RuntimeError::ScopeUnderflow);
                }
                trace!(depth = self.scopes.depth(), "exit scope");
            },
        }

        Ok(None)
    }

    fn read(&self, operand: &Operand) -> RuntimeResult<Value> {
        match operand {
            Operand::Var(name) => {
                self.lookup(name)
                    .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.clone() })
            },
            Operand::Temp(temp) => {
                self.temps
                    .get(temp)
                    .copied()
                    .ok_or_else(|| RuntimeError::UninitializedTemporary { temp: temp.to_string() })
            },
        }
    }

    fn store(&mut self, name: &str, value: Value) -> RuntimeResult<()> {
        let slot = self.scopes
                       .resolve_mut(name)
                       .ok_or_else(|| RuntimeError::UndeclaredVariable { name: name.to_string() })?;
        slot.value = value.coerce_to(slot.ty, name)?;
        Ok(())
    }
}

/// Maps every label to the index of the instruction following it.
fn resolve_labels(code: &[Instruction]) -> RuntimeResult<HashMap<Label, usize>> {
    let mut labels = HashMap::new();
    for (index, instruction) in code.iter().enumerate() {
        if let Instruction::Label(label) = instruction
           && labels.insert(*label, index + 1).is_some()
        {
            return Err(RuntimeError::DuplicateLabel { label: label.to_string() });
        }
    }

    if let Some(target) = code.iter()
                              .filter_map(Instruction::jump_target)
                              .find(|target| !labels.contains_key(target))
    {
        return Err(RuntimeError::UndefinedLabel { label: target.to_string() });
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{BinaryOperator, Position};

    fn run(code: Vec<Instruction>) -> (Machine, RuntimeResult<()>, String) {
        let program = TacProgram { instructions: code,
                                   ..TacProgram::default() };
        let mut machine = Machine::new();
        let mut out = Vec::new();
        let result = machine.execute(&program, &mut out);
        (machine, result, String::from_utf8(out).unwrap())
    }

    fn var(name: &str) -> Operand {
        Operand::Var(name.to_string())
    }

    #[test]
    fn declared_variables_start_at_zero() {
        let (machine, result, out) =
            run(vec![Instruction::Declare { name: "f".to_string(),
                                            ty:   Type::Float, },
                     Instruction::Print { arg: var("f") }]);

        assert!(result.is_ok());
        assert_eq!(out, "0.0\n");
        assert_eq!(machine.lookup("f"), Some(Value::Float(0.0)));
    }

    #[test]
    fn int_is_widened_on_store_into_float() {
        let (machine, result, _) =
            run(vec![Instruction::Declare { name: "f".to_string(),
                                            ty:   Type::Float, },
                     Instruction::Const { value: Value::Int(3),
                                          dest:  Temp(1), },
                     Instruction::Copy { src:  Operand::Temp(Temp(1)),
                                         dest: "f".to_string(), }]);

        assert!(result.is_ok());
        assert_eq!(machine.lookup("f"), Some(Value::Float(3.0)));
    }

    #[test]
    fn float_store_into_int_is_rejected() {
        let (_, result, _) = run(vec![Instruction::Declare { name: "x".to_string(),
                                                             ty:   Type::Int, },
                                      Instruction::Const { value: Value::Float(1.5),
                                                           dest:  Temp(1), },
                                      Instruction::Copy { src:  Operand::Temp(Temp(1)),
                                                          dest: "x".to_string(), }]);

        assert!(matches!(result,
                         Err(RuntimeError::NarrowingAssignment { expected: Type::Int,
                                                                 found: Type::Float,
                                                                 .. })));
    }

    #[test]
    fn unwritten_temporary_is_an_error() {
        let (_, result, _) = run(vec![Instruction::Print { arg: Operand::Temp(Temp(7)) }]);
        assert!(matches!(result, Err(RuntimeError::UninitializedTemporary { ref temp }) if temp == "t7"));
    }

    #[test]
    fn frames_are_released_on_error() {
        let (machine, result, _) =
            run(vec![Instruction::EnterScope,
                     Instruction::EnterScope,
                     Instruction::Const { value: Value::Int(1),
                                          dest:  Temp(1), },
                     Instruction::Const { value: Value::Int(0),
                                          dest:  Temp(2), },
                     Instruction::Binary { op:    BinaryOperator::Div,
                                           left:  Operand::Temp(Temp(1)),
                                           right: Operand::Temp(Temp(2)),
                                           dest:  Temp(3), }]);

        assert!(matches!(result, Err(RuntimeError::DivisionByZero)));
        assert_eq!(machine.scope_depth(), 1);
    }

    #[test]
    fn errors_carry_the_failing_instruction_position() {
        let program = TacProgram { instructions: vec![Instruction::Print { arg: var("ghost") }],
                                   positions:    vec![Position::new(4, 3)],
                                   ..TacProgram::default() };
        let err = Machine::new().execute(&program, &mut Vec::new()).unwrap_err();

        assert!(matches!(err.root(), RuntimeError::UndeclaredVariable { name } if name == "ghost"));
        assert_eq!(err.position(), Some(Position::new(4, 3)));
    }

    #[test]
    fn unbalanced_exit_scope_underflows() {
        let (_, result, _) = run(vec![Instruction::ExitScope]);
        assert!(matches!(result, Err(RuntimeError::ScopeUnderflow)));
    }

    #[test]
    fn labels_are_checked_before_execution() {
        let (_, result, out) = run(vec![Instruction::Const { value: Value::Int(1),
                                                             dest:  Temp(1), },
                                        Instruction::Print { arg: Operand::Temp(Temp(1)) },
                                        Instruction::Goto(Label(9))]);
        assert!(matches!(result, Err(RuntimeError::UndefinedLabel { ref label }) if label == "L9"));
        assert!(out.is_empty());

        let (_, result, _) = run(vec![Instruction::Label(Label(1)), Instruction::Label(Label(1))]);
        assert!(matches!(result, Err(RuntimeError::DuplicateLabel { .. })));
    }

    #[test]
    fn inner_frame_shadows_and_then_restores() {
        let (machine, result, out) =
            run(vec![Instruction::Declare { name: "a".to_string(),
                                            ty:   Type::Int, },
                     Instruction::EnterScope,
                     Instruction::Declare { name: "a".to_string(),
                                            ty:   Type::Float, },
                     Instruction::Print { arg: var("a") },
                     Instruction::ExitScope,
                     Instruction::Print { arg: var("a") }]);

        assert!(result.is_ok());
        assert_eq!(out, "0.0\n0\n");
        assert_eq!(machine.scope_depth(), 1);
    }
}
