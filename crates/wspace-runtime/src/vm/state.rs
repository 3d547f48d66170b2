//! Mutable machine state
//!
//! One state per engine, created fresh for a run and owned exclusively by
//! it; nothing here is shared between engines.

use std::collections::HashMap;

/// Complete mutable state of one running machine
///
/// - `heap`: sparse integer-addressed store; unset addresses read as 0.
/// - `stack`: the operand stack, top at the end.
/// - `return_addresses`: saved program counters pushed by CALL, popped by
///   RET.
/// - `pc`: index of the next instruction to execute; meaningless once
///   `terminated` is set.
/// - `terminated`: set by EXIT, never cleared.
#[derive(Debug, Default)]
pub struct MachineState {
    pub heap: HashMap<i64, i64>,
    pub stack: Vec<i64>,
    pub return_addresses: Vec<usize>,
    pub pc: usize,
    pub terminated: bool,
}

impl MachineState {
    /// Fresh initial state: pc 0, everything empty, not terminated
    pub fn new() -> Self {
        Self::default()
    }
}
