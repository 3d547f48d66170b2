//! Program container
//!
//! An immutable ordered sequence of instructions plus a label index built
//! once at construction. Instruction indices are the addresses used by
//! control-flow resolution.

use std::collections::HashMap;
use std::fmt;

use crate::error::FormatError;
use crate::instruction::{Instruction, Operation};

/// The three wire-alphabet bytes; everything else is a comment
fn is_code_byte(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n')
}

/// An immutable sequence of instructions
///
/// Equality is by instruction sequence. The label index maps a label number
/// to the instruction index of its first LABEL marker; it is derived from
/// the sequence and never changes afterwards.
#[derive(Debug, Clone)]
pub struct Program {
    instructions: Vec<Instruction>,
    labels: HashMap<i64, usize>,
}

impl Program {
    /// Build a program from an instruction sequence
    pub fn new(instructions: Vec<Instruction>) -> Self {
        let mut labels = HashMap::new();
        for (index, instr) in instructions.iter().enumerate() {
            if instr.op() == Operation::Label {
                // first marker for a label number wins
                labels.entry(instr.param()).or_insert(index);
            }
        }
        Program {
            instructions,
            labels,
        }
    }

    /// Instructions in execution order
    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Instruction index of the LABEL marker for `label`, if any
    pub fn label_target(&self, label: i64) -> Option<usize> {
        self.labels.get(&label).copied()
    }

    /// Decode a whole program from whitespace source
    ///
    /// Every byte outside the three-symbol alphabet is stripped as comment
    /// noise first; instructions are then decoded back to back until the
    /// buffer is exhausted. The first decode error aborts assembly, with the
    /// offset into the stripped buffer attached.
    pub fn assemble(source: &str) -> Result<Program, FormatError> {
        let code: Vec<u8> = source
            .bytes()
            .filter(|&byte| is_code_byte(byte))
            .collect();
        let mut offset = 0;
        let mut instructions = Vec::new();
        while offset < code.len() {
            let (consumed, instr) =
                Instruction::decode(&code[offset..]).map_err(|e| e.at_offset(offset))?;
            offset += consumed;
            instructions.push(instr);
        }
        Ok(Program::new(instructions))
    }

    /// Encode the whole program into whitespace source
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for instr in &self.instructions {
            out.push_str(&instr.encode());
        }
        out
    }

    /// Decode a program from mnemonic text, one instruction per line
    ///
    /// Exactly one trailing empty line is tolerated, so input ending in the
    /// separator round-trips. A blank line anywhere else is an invalid
    /// instruction.
    pub fn from_text(text: &str) -> Result<Program, FormatError> {
        let mut lines: Vec<&str> = text.split('\n').collect();
        if lines.last() == Some(&"") {
            lines.pop();
        }
        let mut instructions = Vec::with_capacity(lines.len());
        for (number, line) in lines.iter().enumerate() {
            let instr = line
                .parse::<Instruction>()
                .map_err(|e| e.at_line(number + 1))?;
            instructions.push(instr);
        }
        Ok(Program::new(instructions))
    }

    /// Render the program as mnemonic text, one line per instruction with a
    /// trailing separator
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for instr in &self.instructions {
            out.push_str(&instr.to_string());
            out.push('\n');
        }
        out
    }
}

impl PartialEq for Program {
    fn eq(&self, other: &Self) -> bool {
        self.instructions == other.instructions
    }
}

impl Eq for Program {}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

impl FromIterator<Instruction> for Program {
    fn from_iter<T: IntoIterator<Item = Instruction>>(iter: T) -> Self {
        Program::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_index_keeps_first_marker() {
        let program = Program::new(vec![
            Instruction::label(1),
            Instruction::exit(),
            Instruction::label(1),
        ]);
        assert_eq!(program.label_target(1), Some(0));
        assert_eq!(program.label_target(2), None);
    }

    #[test]
    fn assemble_strips_comment_bytes() {
        let annotated = "push-one:   \t\nthen-exit:\n\n\n";
        let program = Program::assemble(annotated).unwrap();
        assert_eq!(
            program.instructions(),
            &[Instruction::push(1), Instruction::exit()]
        );
    }

    #[test]
    fn assemble_error_carries_offset() {
        // a lone tab is a truncated prefix
        let err = Program::assemble("\t").unwrap_err();
        assert!(matches!(err, FormatError::AtOffset { offset: 0, .. }));
    }
}
