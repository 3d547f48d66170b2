//! Execution engine
//!
//! A single-threaded stack machine over a fixed [`Program`] and an injected
//! [`IoChannel`]. Each engine owns its [`MachineState`] exclusively; running
//! several programs concurrently means one engine per program.

mod state;

pub use state::MachineState;

use crate::error::RuntimeFault;
use crate::instruction::Operation;
use crate::io::IoChannel;
use crate::program::Program;

/// Virtual machine bound to one program and one I/O channel
pub struct VM<C: IoChannel> {
    program: Program,
    channel: C,
    state: MachineState,
}

impl<C: IoChannel> VM<C> {
    /// Create a machine at the initial state: pc 0, empty stack and heap
    pub fn new(program: Program, channel: C) -> Self {
        VM {
            program,
            channel,
            state: MachineState::new(),
        }
    }

    /// True once EXIT has executed
    pub fn is_finished(&self) -> bool {
        self.state.terminated
    }

    /// The machine state, for inspection by hosts and tests
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// The bound program
    pub fn program(&self) -> &Program {
        &self.program
    }

    /// Consume the machine, returning the channel (e.g. to read captured
    /// output after a run)
    pub fn into_channel(self) -> C {
        self.channel
    }

    fn pop(&mut self) -> Result<i64, RuntimeFault> {
        self.state.stack.pop().ok_or(RuntimeFault::StackUnderflow)
    }

    fn push(&mut self, value: i64) {
        self.state.stack.push(value);
    }

    /// Instruction index of the LABEL marker for `label`
    fn find_label(&self, label: i64) -> Result<usize, RuntimeFault> {
        self.program
            .label_target(label)
            .ok_or(RuntimeFault::UndefinedLabel { label })
    }

    /// Execute exactly one instruction
    ///
    /// Advances the program counter by one unless the instruction branched.
    /// Faults if the counter is already past the last instruction, which is
    /// what falling off the end without an EXIT looks like.
    pub fn step(&mut self) -> Result<(), RuntimeFault> {
        let Some(&instr) = self.program.instructions().get(self.state.pc) else {
            return Err(RuntimeFault::PcOutOfRange {
                pc: self.state.pc,
                len: self.program.len(),
            });
        };
        let mut branch_taken = false;

        match instr.op() {
            Operation::Readch => {
                let address = self.pop()?;
                let ch = self.channel.read_char()?;
                self.state.heap.insert(address, ch as i64);
            }
            Operation::Readi => {
                let address = self.pop()?;
                let value = self.channel.read_int()?;
                self.state.heap.insert(address, value);
            }
            Operation::Writech => {
                let value = self.pop()?;
                let ch = u32::try_from(value)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or(RuntimeFault::InvalidCharacter { value })?;
                self.channel.write_char(ch)?;
            }
            Operation::Writei => {
                let value = self.pop()?;
                self.channel.write_int(value)?;
            }

            Operation::Push => {
                self.push(instr.param());
            }
            Operation::Dup => {
                let item = self.pop()?;
                self.push(item);
                self.push(item);
            }
            Operation::Swap => {
                let item1 = self.pop()?;
                let item2 = self.pop()?;
                self.push(item1);
                self.push(item2);
            }
            Operation::Pop => {
                self.pop()?;
            }
            Operation::Copy => {
                let depth = self.state.stack.len();
                let index = usize::try_from(instr.param())
                    .ok()
                    .filter(|&n| n < depth)
                    .ok_or(RuntimeFault::CopyOutOfRange {
                        index: instr.param(),
                        depth,
                    })?;
                self.push(self.state.stack[depth - index - 1]);
            }
            Operation::Drop => {
                // slide: the top survives, n elements below it go
                let count = instr.param().max(0);
                let depth = self.state.stack.len();
                let count = usize::try_from(count)
                    .ok()
                    .filter(|&n| n + 1 <= depth)
                    .ok_or(RuntimeFault::DropOutOfRange {
                        count: instr.param(),
                        depth,
                    })?;
                let top = self.state.stack[depth - 1];
                self.state.stack.truncate(depth - 1 - count);
                self.state.stack.push(top);
            }

            Operation::Add => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(a.wrapping_add(b));
            }
            Operation::Sub => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(a.wrapping_sub(b));
            }
            Operation::Mul => {
                let b = self.pop()?;
                let a = self.pop()?;
                self.push(a.wrapping_mul(b));
            }
            Operation::Div => {
                let b = self.pop()?;
                let a = self.pop()?;
                if b == 0 {
                    return Err(RuntimeFault::DivisionByZero);
                }
                self.push(a.wrapping_div(b));
            }
            Operation::Mod => {
                let b = self.pop()?;
                let a = self.pop()?;
                if b == 0 {
                    return Err(RuntimeFault::DivisionByZero);
                }
                self.push(a.wrapping_rem(b));
            }

            Operation::Label => {
                // jump-target marker only
            }
            Operation::Call => {
                let target = self.find_label(instr.param())?;
                self.state.return_addresses.push(self.state.pc + 1);
                self.state.pc = target;
                branch_taken = true;
            }
            Operation::Jmp => {
                self.state.pc = self.find_label(instr.param())?;
                branch_taken = true;
            }
            Operation::Jmpzero => {
                if self.pop()? == 0 {
                    self.state.pc = self.find_label(instr.param())?;
                    branch_taken = true;
                }
            }
            Operation::Jmpneg => {
                if self.pop()? < 0 {
                    self.state.pc = self.find_label(instr.param())?;
                    branch_taken = true;
                }
            }
            Operation::Ret => {
                self.state.pc = self
                    .state
                    .return_addresses
                    .pop()
                    .ok_or(RuntimeFault::ReturnStackUnderflow)?;
                branch_taken = true;
            }
            Operation::Exit => {
                self.state.terminated = true;
            }

            Operation::Store => {
                let value = self.pop()?;
                let address = self.pop()?;
                self.state.heap.insert(address, value);
            }
            Operation::Load => {
                let address = self.pop()?;
                let value = self.state.heap.get(&address).copied().unwrap_or(0);
                self.push(value);
            }
        }

        if !branch_taken {
            self.state.pc += 1;
        }
        Ok(())
    }

    /// Step until the machine terminates
    ///
    /// Never imposes an iteration limit; a program with no reachable EXIT
    /// loops forever, which is a property of the modeled language. A fault
    /// aborts the run and leaves the state as of the faulting instruction.
    pub fn run(&mut self) -> Result<(), RuntimeFault> {
        while !self.is_finished() {
            self.step()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;
    use crate::io::MemoryChannel;

    fn machine(instructions: Vec<Instruction>) -> VM<MemoryChannel> {
        VM::new(Program::new(instructions), MemoryChannel::new())
    }

    #[test]
    fn exit_terminates_after_one_step_with_empty_state() {
        let mut vm = machine(vec![Instruction::exit()]);
        vm.step().unwrap();
        assert!(vm.is_finished());
        assert!(vm.state().stack.is_empty());
        assert!(vm.state().heap.is_empty());
    }

    #[test]
    fn stepping_past_the_end_faults() {
        let mut vm = machine(vec![Instruction::push(1)]);
        vm.step().unwrap();
        assert!(matches!(
            vm.step(),
            Err(RuntimeFault::PcOutOfRange { pc: 1, len: 1 })
        ));
    }

    #[test]
    fn drop_keeps_the_top_element() {
        let mut vm = machine(vec![
            Instruction::push(10),
            Instruction::push(20),
            Instruction::push(30),
            Instruction::drop(2),
            Instruction::exit(),
        ]);
        vm.run().unwrap();
        assert_eq!(vm.state().stack, vec![30]);
    }

    #[test]
    fn drop_with_negative_count_is_a_no_op() {
        let mut vm = machine(vec![
            Instruction::push(1),
            Instruction::drop(-3),
            Instruction::exit(),
        ]);
        vm.run().unwrap();
        assert_eq!(vm.state().stack, vec![1]);
    }

    #[test]
    fn copy_pushes_element_at_depth() {
        let mut vm = machine(vec![
            Instruction::push(10),
            Instruction::push(20),
            Instruction::push(30),
            Instruction::copy(2),
            Instruction::exit(),
        ]);
        vm.run().unwrap();
        assert_eq!(vm.state().stack, vec![10, 20, 30, 10]);
    }
}
