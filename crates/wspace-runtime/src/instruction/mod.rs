//! Instruction set of the whitespace machine
//!
//! 24 opcodes in five families: I/O, stack manipulation, arithmetic,
//! control flow, and heap access. An [`Instruction`] pairs an opcode with
//! its single integer operand; zero-arity opcodes store 0.

mod binary;
mod text;

use std::fmt;
use std::str::FromStr;

use crate::error::FormatError;

/// Shape of an opcode's operand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandKind {
    /// No operand
    None,
    /// Signed integer literal (PUSH) or count/index (COPY, DROP)
    Integer,
    /// Non-negative label number (LABEL, CALL, JMP, JMPZERO, JMPNEG)
    Label,
}

/// Opcode (24 instructions)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    // ===== I/O =====
    /// Pop an address, read one character from the channel into the heap
    Readch,
    /// Pop an address, read one integer from the channel into the heap
    Readi,
    /// Pop a value, write it to the channel as a character
    Writech,
    /// Pop a value, write it to the channel as a decimal integer
    Writei,

    // ===== Stack manipulation =====
    /// Push the literal operand
    Push,
    /// Duplicate the top of the stack
    Dup,
    /// Exchange the top two stack elements
    Swap,
    /// Pop and discard the top of the stack
    Pop,
    /// Push a copy of the element at operand depth below the top
    Copy,
    /// Remove operand-many elements below the top, keeping the top
    Drop,

    // ===== Arithmetic =====
    /// Pop b, pop a, push a + b
    Add,
    /// Pop b, pop a, push a - b
    Sub,
    /// Pop b, pop a, push a * b
    Mul,
    /// Pop b, pop a, push a / b (truncating); faults when b is 0
    Div,
    /// Pop b, pop a, push a % b; faults when b is 0
    Mod,

    // ===== Control flow =====
    /// Jump-target marker for the operand label; executes as a no-op
    Label,
    /// Push pc + 1 on the call-return stack and branch to the label
    Call,
    /// Branch to the label
    Jmp,
    /// Pop a value; branch to the label when it is zero
    Jmpzero,
    /// Pop a value; branch to the label when it is negative
    Jmpneg,
    /// Pop the call-return stack into pc
    Ret,
    /// Terminate the machine
    Exit,

    // ===== Heap access =====
    /// Pop value, pop address, heap[address] = value
    Store,
    /// Pop address, push heap[address] (default 0)
    Load,
}

impl Operation {
    /// Lowercase mnemonic used by the text format
    pub fn mnemonic(self) -> &'static str {
        match self {
            Operation::Readch => "readch",
            Operation::Readi => "readi",
            Operation::Writech => "writech",
            Operation::Writei => "writei",
            Operation::Push => "push",
            Operation::Dup => "dup",
            Operation::Swap => "swap",
            Operation::Pop => "pop",
            Operation::Copy => "copy",
            Operation::Drop => "drop",
            Operation::Add => "add",
            Operation::Sub => "sub",
            Operation::Mul => "mul",
            Operation::Div => "div",
            Operation::Mod => "mod",
            Operation::Label => "label",
            Operation::Call => "call",
            Operation::Jmp => "jmp",
            Operation::Jmpzero => "jmpzero",
            Operation::Jmpneg => "jmpneg",
            Operation::Ret => "ret",
            Operation::Exit => "exit",
            Operation::Store => "store",
            Operation::Load => "load",
        }
    }

    /// Operand shape for this opcode
    pub fn operand_kind(self) -> OperandKind {
        match self {
            Operation::Push | Operation::Copy | Operation::Drop => OperandKind::Integer,
            Operation::Label
            | Operation::Call
            | Operation::Jmp
            | Operation::Jmpzero
            | Operation::Jmpneg => OperandKind::Label,
            _ => OperandKind::None,
        }
    }
}

/// A single machine instruction: opcode plus operand
///
/// Immutable value type; equality and hashing are by value. The operand is
/// stored as 0 for opcodes that take none.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Instruction {
    op: Operation,
    param: i64,
}

impl Instruction {
    /// Build an instruction from opcode and operand
    pub fn new(op: Operation, param: i64) -> Self {
        Instruction { op, param }
    }

    fn nullary(op: Operation) -> Self {
        Instruction { op, param: 0 }
    }

    /// Opcode of this instruction
    pub fn op(&self) -> Operation {
        self.op
    }

    /// Integer operand (0 for zero-arity opcodes)
    pub fn param(&self) -> i64 {
        self.param
    }

    /// Encode into the whitespace binary form
    pub fn encode(&self) -> String {
        binary::encode(self)
    }

    /// Decode one instruction from the start of `code`
    ///
    /// Returns the number of bytes consumed alongside the instruction.
    /// `code` must contain only the three alphabet bytes (space, tab,
    /// newline); [`Program::assemble`](crate::Program::assemble) strips
    /// everything else beforehand.
    pub fn decode(code: &[u8]) -> Result<(usize, Instruction), FormatError> {
        binary::decode(code)
    }

    pub fn readch() -> Self {
        Self::nullary(Operation::Readch)
    }
    pub fn readi() -> Self {
        Self::nullary(Operation::Readi)
    }
    pub fn writech() -> Self {
        Self::nullary(Operation::Writech)
    }
    pub fn writei() -> Self {
        Self::nullary(Operation::Writei)
    }

    pub fn push(value: i64) -> Self {
        Instruction::new(Operation::Push, value)
    }
    pub fn dup() -> Self {
        Self::nullary(Operation::Dup)
    }
    pub fn swap() -> Self {
        Self::nullary(Operation::Swap)
    }
    pub fn pop() -> Self {
        Self::nullary(Operation::Pop)
    }
    pub fn copy(stack_position: i64) -> Self {
        Instruction::new(Operation::Copy, stack_position)
    }
    pub fn drop(count: i64) -> Self {
        Instruction::new(Operation::Drop, count)
    }

    pub fn add() -> Self {
        Self::nullary(Operation::Add)
    }
    pub fn sub() -> Self {
        Self::nullary(Operation::Sub)
    }
    pub fn mul() -> Self {
        Self::nullary(Operation::Mul)
    }
    pub fn div() -> Self {
        Self::nullary(Operation::Div)
    }
    pub fn modulo() -> Self {
        Self::nullary(Operation::Mod)
    }

    pub fn label(label: i64) -> Self {
        Instruction::new(Operation::Label, label)
    }
    pub fn call(label: i64) -> Self {
        Instruction::new(Operation::Call, label)
    }
    pub fn jmp(label: i64) -> Self {
        Instruction::new(Operation::Jmp, label)
    }
    pub fn jmpzero(label: i64) -> Self {
        Instruction::new(Operation::Jmpzero, label)
    }
    pub fn jmpneg(label: i64) -> Self {
        Instruction::new(Operation::Jmpneg, label)
    }
    pub fn ret() -> Self {
        Self::nullary(Operation::Ret)
    }
    pub fn exit() -> Self {
        Self::nullary(Operation::Exit)
    }

    pub fn store() -> Self {
        Self::nullary(Operation::Store)
    }
    pub fn load() -> Self {
        Self::nullary(Operation::Load)
    }
}

/// Renders the text form: lowercase mnemonic, then the decimal operand for
/// opcodes that take one
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        text::encode(self, f)
    }
}

/// Parses the text form produced by [`Display`](fmt::Display)
impl FromStr for Instruction {
    type Err = FormatError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        text::decode(line)
    }
}
