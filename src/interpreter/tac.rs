/// Instruction, operand and label definitions.
///
/// Every instruction is a quadruple `(opcode, arg1, arg2, result)`; the enum
/// gives each opcode exactly the operands it uses.
pub mod instruction;

/// Lowering from the syntax tree to three-address code.
///
/// Owns the temporary and label counters for one compilation, so separate
/// compilations never share names.
pub mod generator;

pub use generator::TacGenerator;
pub use instruction::{Instruction, Label, Operand, TacProgram, Temp};
