//! Whitespace binary codec for single instructions
//!
//! The wire alphabet is space, tab, newline. An instruction is a 2-4 symbol
//! opcode prefix, followed by an integer encoding for operand-bearing
//! opcodes. The prefix table is a prefix code: the first symbol selects the
//! instruction family, the following symbols the sub-opcode, so decoding
//! needs no delimiters.
//!
//! Integers are MSB-first binary digits (tab = 1, space = 0) terminated by a
//! newline; zero is the bare terminator. The signed form used by PUSH, COPY
//! and DROP prepends one sign symbol (space = non-negative, tab = negative).

use super::{Instruction, OperandKind, Operation};
use crate::error::FormatError;

const SPACE: u8 = b' ';
const TAB: u8 = b'\t';
const LF: u8 = b'\n';

/// Opcode prefix in wire symbols
fn prefix(op: Operation) -> &'static str {
    match op {
        Operation::Readch => "\t\n\t ",
        Operation::Readi => "\t\n\t\t",
        Operation::Writech => "\t\n  ",
        Operation::Writei => "\t\n \t",

        Operation::Push => "  ",
        Operation::Dup => " \n ",
        Operation::Swap => " \n\t",
        Operation::Pop => " \n\n",
        Operation::Copy => " \t ",
        Operation::Drop => " \t\n",

        Operation::Add => "\t   ",
        Operation::Sub => "\t  \t",
        Operation::Mul => "\t  \n",
        Operation::Div => "\t \t ",
        Operation::Mod => "\t \t\t",

        Operation::Label => "\n  ",
        Operation::Call => "\n \t",
        Operation::Jmp => "\n \n",
        Operation::Jmpzero => "\n\t ",
        Operation::Jmpneg => "\n\t\t",
        Operation::Ret => "\n\t\n",
        Operation::Exit => "\n\n\n",

        Operation::Store => "\t\t ",
        Operation::Load => "\t\t\t",
    }
}

/// Encode one instruction into wire symbols
pub(super) fn encode(instr: &Instruction) -> String {
    let mut out = String::from(prefix(instr.op()));
    match instr.op().operand_kind() {
        OperandKind::None => {}
        OperandKind::Integer => push_signed(instr.param(), &mut out),
        OperandKind::Label => push_unsigned(instr.param() as u64, &mut out),
    }
    out
}

/// Decode one instruction from the start of `code`, returning the consumed
/// byte count
pub(super) fn decode(code: &[u8]) -> Result<(usize, Instruction), FormatError> {
    let (mut len, op) = decode_opcode(code)?;
    let param = match op.operand_kind() {
        OperandKind::None => 0,
        OperandKind::Integer => {
            let (n, value) = decode_signed(&code[len..])?;
            len += n;
            value
        }
        OperandKind::Label => {
            let (n, value) = decode_unsigned(&code[len..])?;
            len += n;
            value
        }
    };
    Ok((len, Instruction::new(op, param)))
}

/// Match the opcode prefix, family symbol first
fn decode_opcode(code: &[u8]) -> Result<(usize, Operation), FormatError> {
    use Operation::*;

    if code.is_empty() {
        return Err(FormatError::Truncated);
    }
    let sym = |i: usize| code.get(i).copied().ok_or(FormatError::Truncated);

    match code[0] {
        // Stack manipulation family
        SPACE => match sym(1)? {
            SPACE => Ok((2, Push)),
            LF => match sym(2)? {
                SPACE => Ok((3, Dup)),
                TAB => Ok((3, Swap)),
                LF => Ok((3, Pop)),
                _ => Err(FormatError::UnknownPrefix),
            },
            TAB => match sym(2)? {
                SPACE => Ok((3, Copy)),
                LF => Ok((3, Drop)),
                _ => Err(FormatError::UnknownPrefix),
            },
            _ => Err(FormatError::UnknownPrefix),
        },
        // Arithmetic, heap, and I/O families
        TAB => match sym(1)? {
            SPACE => match (sym(2)?, sym(3)?) {
                (SPACE, SPACE) => Ok((4, Add)),
                (SPACE, TAB) => Ok((4, Sub)),
                (SPACE, LF) => Ok((4, Mul)),
                (TAB, SPACE) => Ok((4, Div)),
                (TAB, TAB) => Ok((4, Mod)),
                _ => Err(FormatError::UnknownPrefix),
            },
            TAB => match sym(2)? {
                SPACE => Ok((3, Store)),
                TAB => Ok((3, Load)),
                _ => Err(FormatError::UnknownPrefix),
            },
            LF => match (sym(2)?, sym(3)?) {
                (TAB, SPACE) => Ok((4, Readch)),
                (TAB, TAB) => Ok((4, Readi)),
                (SPACE, SPACE) => Ok((4, Writech)),
                (SPACE, TAB) => Ok((4, Writei)),
                _ => Err(FormatError::UnknownPrefix),
            },
            _ => Err(FormatError::UnknownPrefix),
        },
        // Control-flow family
        LF => match sym(1)? {
            SPACE => match sym(2)? {
                SPACE => Ok((3, Label)),
                TAB => Ok((3, Call)),
                LF => Ok((3, Jmp)),
                _ => Err(FormatError::UnknownPrefix),
            },
            TAB => match sym(2)? {
                SPACE => Ok((3, Jmpzero)),
                TAB => Ok((3, Jmpneg)),
                LF => Ok((3, Ret)),
                _ => Err(FormatError::UnknownPrefix),
            },
            LF => match sym(2)? {
                LF => Ok((3, Exit)),
                _ => Err(FormatError::UnknownPrefix),
            },
            _ => Err(FormatError::UnknownPrefix),
        },
        _ => Err(FormatError::UnknownPrefix),
    }
}

/// Append the unsigned encoding of `value`: MSB-first bits, then terminator
fn push_unsigned(value: u64, out: &mut String) {
    if value != 0 {
        let bits = 64 - value.leading_zeros();
        for i in (0..bits).rev() {
            out.push(if (value >> i) & 1 == 1 { '\t' } else { ' ' });
        }
    }
    out.push('\n');
}

/// Append the signed encoding: sign symbol, then the magnitude
fn push_signed(value: i64, out: &mut String) {
    out.push(if value < 0 { '\t' } else { ' ' });
    push_unsigned(value.unsigned_abs(), out);
}

/// Accumulate digits until the terminator symbol
///
/// Wrapping on overflow: a 64-bit pattern decodes back to the i64 it was
/// encoded from, wider inputs wrap like the host integer they target.
fn decode_unsigned(code: &[u8]) -> Result<(usize, i64), FormatError> {
    let mut value: i64 = 0;
    for (i, &byte) in code.iter().enumerate() {
        match byte {
            LF => return Ok((i + 1, value)),
            TAB => value = value.wrapping_mul(2).wrapping_add(1),
            _ => value = value.wrapping_mul(2),
        }
    }
    Err(FormatError::UnterminatedInteger)
}

fn decode_signed(code: &[u8]) -> Result<(usize, i64), FormatError> {
    let sign = *code.first().ok_or(FormatError::MissingSign)?;
    if sign == LF {
        return Err(FormatError::InvalidSign);
    }
    let (len, magnitude) = decode_unsigned(&code[1..])?;
    let value = if sign == TAB {
        magnitude.wrapping_neg()
    } else {
        magnitude
    };
    Ok((len + 1, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unsigned_code(value: u64) -> String {
        let mut out = String::new();
        push_unsigned(value, &mut out);
        out
    }

    #[test]
    fn unsigned_zero_is_bare_terminator() {
        assert_eq!(unsigned_code(0), "\n");
        assert_eq!(decode_unsigned(b"\n"), Ok((1, 0)));
    }

    #[test]
    fn unsigned_five_is_three_bits() {
        // 5 = 101 binary = tab space tab
        assert_eq!(unsigned_code(5), "\t \t\n");
        assert_eq!(decode_unsigned(b"\t \t\n"), Ok((4, 5)));
    }

    #[test]
    fn unsigned_without_terminator_fails() {
        assert_eq!(
            decode_unsigned(b"\t \t"),
            Err(FormatError::UnterminatedInteger)
        );
    }

    #[test]
    fn signed_differs_only_in_sign_symbol() {
        let mut pos = String::new();
        let mut neg = String::new();
        push_signed(5, &mut pos);
        push_signed(-5, &mut neg);
        assert_eq!(pos, " \t \t\n");
        assert_eq!(neg, "\t\t \t\n");
        assert_eq!(decode_signed(pos.as_bytes()), Ok((5, 5)));
        assert_eq!(decode_signed(neg.as_bytes()), Ok((5, -5)));
    }

    #[test]
    fn signed_rejects_terminator_in_sign_position() {
        assert_eq!(decode_signed(b"\n"), Err(FormatError::InvalidSign));
        assert_eq!(decode_signed(b""), Err(FormatError::MissingSign));
    }

    #[test]
    fn decode_rejects_unknown_prefix() {
        // I/O family has no newline sub-opcodes
        assert_eq!(decode(b"\t\n\n\n"), Err(FormatError::UnknownPrefix));
    }

    #[test]
    fn decode_rejects_truncated_prefix() {
        assert_eq!(decode(b""), Err(FormatError::Truncated));
        assert_eq!(decode(b"\t"), Err(FormatError::Truncated));
    }

    #[test]
    fn push_missing_terminator_fails() {
        // "  " prefix, " " sign, digits but no newline
        assert_eq!(
            decode(b"   \t\t"),
            Err(FormatError::UnterminatedInteger)
        );
    }
}
