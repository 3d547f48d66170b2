//! Mnemonic text codec for single instructions
//!
//! One instruction per line: lowercase mnemonic, a single space, then the
//! decimal operand for opcodes that take one.

use std::fmt;

use super::{Instruction, OperandKind, Operation};
use crate::error::FormatError;

pub(super) fn encode(instr: &Instruction, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match instr.op().operand_kind() {
        OperandKind::None => f.write_str(instr.op().mnemonic()),
        OperandKind::Integer | OperandKind::Label => {
            write!(f, "{} {}", instr.op().mnemonic(), instr.param())
        }
    }
}

pub(super) fn decode(line: &str) -> Result<Instruction, FormatError> {
    let mut parts = line.split(' ');
    let mnemonic = parts.next().unwrap_or_default();
    let argument = parts.next();
    let extra = parts.count();
    if extra > 0 {
        return Err(FormatError::TooManyTokens { found: extra + 2 });
    }

    let op = lookup(mnemonic)?;
    let param = match op.operand_kind() {
        OperandKind::None => 0,
        OperandKind::Integer => parse_integer(op, argument)?,
        OperandKind::Label => {
            let value = parse_integer(op, argument)?;
            if value < 0 {
                return Err(FormatError::NegativeLabel { value });
            }
            value
        }
    };
    Ok(Instruction::new(op, param))
}

/// Case-insensitive mnemonic lookup
fn lookup(mnemonic: &str) -> Result<Operation, FormatError> {
    match mnemonic.to_ascii_lowercase().as_str() {
        "readch" => Ok(Operation::Readch),
        "readi" => Ok(Operation::Readi),
        "writech" => Ok(Operation::Writech),
        "writei" => Ok(Operation::Writei),

        "push" => Ok(Operation::Push),
        "dup" => Ok(Operation::Dup),
        "swap" => Ok(Operation::Swap),
        "pop" => Ok(Operation::Pop),
        "copy" => Ok(Operation::Copy),
        "drop" => Ok(Operation::Drop),

        "add" => Ok(Operation::Add),
        "sub" => Ok(Operation::Sub),
        "mul" => Ok(Operation::Mul),
        "div" => Ok(Operation::Div),
        "mod" => Ok(Operation::Mod),

        "label" => Ok(Operation::Label),
        "call" => Ok(Operation::Call),
        "jmp" => Ok(Operation::Jmp),
        "jmpzero" => Ok(Operation::Jmpzero),
        "jmpneg" => Ok(Operation::Jmpneg),
        "ret" => Ok(Operation::Ret),
        "exit" => Ok(Operation::Exit),

        "store" => Ok(Operation::Store),
        "load" => Ok(Operation::Load),

        _ => Err(FormatError::UnknownMnemonic {
            name: mnemonic.to_string(),
        }),
    }
}

fn parse_integer(op: Operation, argument: Option<&str>) -> Result<i64, FormatError> {
    let token = argument.ok_or(FormatError::MissingOperand {
        mnemonic: op.mnemonic(),
    })?;
    token.parse().map_err(|_| FormatError::InvalidOperand {
        token: token.to_string(),
    })
}
