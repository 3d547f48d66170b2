//! wspace Runtime - Whitespace virtual machine
//!
//! This library provides the complete execution core for the whitespace
//! instruction set:
//! - Binary (whitespace wire) and mnemonic text instruction codecs
//! - Program assembly and disassembly
//! - A stack-and-heap execution engine with pluggable I/O
//!
//! # Example
//!
//! ```
//! use wspace_runtime::{Instruction, MemoryChannel, Program, VM};
//!
//! let program = Program::new(vec![
//!     Instruction::push(1),
//!     Instruction::push(2),
//!     Instruction::add(),
//!     Instruction::writei(),
//!     Instruction::exit(),
//! ]);
//! let mut vm = VM::new(program, MemoryChannel::new());
//! vm.run().unwrap();
//! assert_eq!(vm.into_channel().output(), "3");
//! ```

/// Runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod error;
pub mod instruction;
pub mod io;
pub mod program;
pub mod vm;

// Re-export commonly used types
pub use error::{FormatError, RuntimeFault};
pub use instruction::{Instruction, OperandKind, Operation};
pub use io::{IoChannel, MemoryChannel, StdioChannel};
pub use program::Program;
pub use vm::{MachineState, VM};
