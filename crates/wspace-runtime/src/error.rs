//! Error types for the codec and the execution engine
//!
//! Two disjoint taxonomies:
//! - [`FormatError`]: malformed binary or text input, raised at
//!   assemble/decode time and never recovered from silently.
//! - [`RuntimeFault`]: fatal execution faults; the engine makes no attempt
//!   to recover and the host is expected to abort the run.

use thiserror::Error;

/// Decode/assembly error for the binary and text instruction formats
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// Buffer ended before a full opcode prefix could be read
    #[error("not enough data to parse instruction")]
    Truncated,
    /// Leading symbols match no opcode prefix
    #[error("unknown instruction prefix")]
    UnknownPrefix,
    /// Signed integer operand with no sign symbol before the terminator
    #[error("integer is missing a sign symbol")]
    MissingSign,
    /// The line-terminator symbol appeared in the sign position
    #[error("sign symbol of an integer cannot be the terminator")]
    InvalidSign,
    /// Integer operand ran out of buffer before its terminator symbol
    #[error("integer is missing its terminator symbol")]
    UnterminatedInteger,
    /// Mnemonic not in the opcode table
    #[error("unknown mnemonic \"{name}\"")]
    UnknownMnemonic { name: String },
    /// Opcode requires an operand but none was given
    #[error("mnemonic \"{mnemonic}\" requires an operand")]
    MissingOperand { mnemonic: &'static str },
    /// Operand token is not a decimal integer
    #[error("invalid operand \"{token}\": not a decimal integer")]
    InvalidOperand { token: String },
    /// Label-family operand must be non-negative
    #[error("label operand must be non-negative, got {value}")]
    NegativeLabel { value: i64 },
    /// A line split into more than mnemonic + operand
    #[error("instruction is at most a mnemonic and one operand, found {found} tokens")]
    TooManyTokens { found: usize },
    /// Binary decode failure with the byte offset where it occurred
    #[error("decode error at offset {offset}: {source}")]
    AtOffset {
        offset: usize,
        #[source]
        source: Box<FormatError>,
    },
    /// Text decode failure with the 1-based source line
    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<FormatError>,
    },
}

impl FormatError {
    /// Annotate this error with the byte offset it was raised at
    pub(crate) fn at_offset(self, offset: usize) -> FormatError {
        FormatError::AtOffset {
            offset,
            source: Box::new(self),
        }
    }

    /// Annotate this error with the 1-based line it was raised at
    pub(crate) fn at_line(self, line: usize) -> FormatError {
        FormatError::AtLine {
            line,
            source: Box::new(self),
        }
    }
}

/// Fatal fault raised while executing a program
#[derive(Debug, Error)]
pub enum RuntimeFault {
    /// Pop from an empty operand stack
    #[error("cannot pop from an empty stack")]
    StackUnderflow,
    /// COPY index at or beyond the current stack depth
    #[error("copy index {index} out of range for stack depth {depth}")]
    CopyOutOfRange { index: i64, depth: usize },
    /// DROP count exceeding the elements below the top
    #[error("drop count {count} out of range for stack depth {depth}")]
    DropOutOfRange { count: i64, depth: usize },
    /// DIV or MOD with a zero divisor
    #[error("division by zero")]
    DivisionByZero,
    /// Branch to a label with no LABEL marker in the program
    #[error("label {label} was not found")]
    UndefinedLabel { label: i64 },
    /// RET with an empty call-return stack
    #[error("return with an empty call-return stack")]
    ReturnStackUnderflow,
    /// Program counter past the last instruction without an EXIT
    #[error("program counter {pc} out of range for {len} instructions")]
    PcOutOfRange { pc: usize, len: usize },
    /// WRITECH value that is not a Unicode scalar value
    #[error("value {value} is not a valid character code point")]
    InvalidCharacter { value: i64 },
    /// I/O channel failure during READCH/READI/WRITECH/WRITEI
    #[error("i/o channel error: {0}")]
    Io(#[from] std::io::Error),
}
