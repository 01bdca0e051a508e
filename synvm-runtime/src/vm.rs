//! Virtual Machine for SYNVM

use crate::error::{Result, RuntimeError};
use crate::execute::{execute, Flow};
use crate::io::{IOHandler, LineSource};
use crate::memory::Memory;
use crate::state::{HaltReason, MachineStatus, VMState};
use std::io::Write;
use synvm_spec::{Instruction, Program, Word};

/// VM configuration
#[derive(Debug, Clone, Default)]
pub struct VMConfig {
    /// Stop after this many instructions; `None` runs until the program halts
    pub max_cycles: Option<u64>,

    /// Log every executed instruction at trace level
    pub trace: bool,
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub cycles: u64,

    /// Reason for halting
    pub halt_reason: HaltReason,

    /// Number of characters written by OUT
    pub chars_written: u64,
}

/// Outcome of a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Instruction executed, machine still running
    Continue,
    /// Machine is halted
    Halted(HaltReason),
}

/// SYNVM Virtual Machine
pub struct VM<I, O> {
    /// VM state (registers, PC, stack)
    state: VMState,

    /// Memory subsystem
    memory: Memory,

    /// I/O handler
    io: IOHandler<I, O>,

    /// Configuration
    config: VMConfig,
}

impl<I: LineSource, O: Write> VM<I, O> {
    /// Create a new VM with a program loaded at address 0
    pub fn new(program: &Program, input: I, output: O, config: VMConfig) -> Self {
        let mut memory = Memory::new();
        memory.load_program(program);
        tracing::debug!("loaded program: {}", program);

        Self {
            state: VMState::new(),
            memory,
            io: IOHandler::new(input, output),
            config,
        }
    }

    /// Decode a raw program image and create a VM for it
    pub fn from_bytes(bytes: &[u8], input: I, output: O, config: VMConfig) -> Result<Self> {
        let program = Program::from_bytes(bytes)?;
        Ok(Self::new(&program, input, output, config))
    }

    /// Run the VM until halt
    pub fn run(&mut self) -> Result<ExecutionResult> {
        let halt_reason = loop {
            if let Step::Halted(reason) = self.step()? {
                break reason;
            }
        };

        self.io
            .flush()
            .map_err(|source| RuntimeError::Io { pc: self.state.pc, source })?;

        Ok(ExecutionResult {
            cycles: self.state.cycles,
            halt_reason,
            chars_written: self.io.written(),
        })
    }

    /// Fetch, decode and execute one instruction
    ///
    /// Errors move the machine to the faulted state; stepping a halted or
    /// faulted machine does nothing.
    pub fn step(&mut self) -> Result<Step> {
        match self.state.status {
            MachineStatus::Running => {}
            MachineStatus::Halted(reason) => return Ok(Step::Halted(reason)),
            MachineStatus::Faulted(fault) => return Err(RuntimeError::Faulted(fault)),
        }

        if let Some(limit) = self.config.max_cycles {
            if self.state.cycles >= limit {
                tracing::debug!(cycles = self.state.cycles, "cycle limit reached");
                self.state.halt(HaltReason::CycleLimit);
                return Ok(Step::Halted(HaltReason::CycleLimit));
            }
        }

        match self.execute_next() {
            Ok(step) => Ok(step),
            Err(err) => {
                if let Some(fault) = err.fault() {
                    tracing::warn!(pc = fault.pc, "machine faulted: {}", err);
                    self.state.fault(fault);
                }
                Err(err)
            }
        }
    }

    fn execute_next(&mut self) -> Result<Step> {
        let inst = self.fetch_and_decode()?;

        if self.config.trace {
            tracing::trace!(
                cycle = self.state.cycles,
                pc = self.state.pc,
                regs = ?self.state.registers,
                "{}",
                inst
            );
        }

        let flow = execute(&inst, &mut self.state, &mut self.memory, &mut self.io)?;
        self.state.inc_cycles();

        match flow {
            Flow::Next => self.state.pc += inst.size() as Word,
            Flow::Jump(target) => self.state.pc = target,
            Flow::Halt(reason) => {
                tracing::debug!(pc = self.state.pc, cycles = self.state.cycles, ?reason, "halted");
                self.state.halt(reason);
                return Ok(Step::Halted(reason));
            }
        }

        Ok(Step::Continue)
    }

    /// Fetch and decode the instruction at the program counter
    fn fetch_and_decode(&self) -> Result<Instruction> {
        let pc = self.state.pc;
        let words = self
            .memory
            .window(pc as usize)
            .map_err(|address| RuntimeError::AddressOutOfBounds { pc, address })?;

        Instruction::decode(words, &self.state.registers)
            .map_err(|source| RuntimeError::Decode { pc, source })
    }

    /// Get current state (for debugging)
    pub fn state(&self) -> &VMState {
        &self.state
    }

    /// Get memory (for debugging)
    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn io(&self) -> &IOHandler<I, O> {
        &self.io
    }

    pub fn config(&self) -> &VMConfig {
        &self.config
    }

    /// Tear down the VM and hand back the input source and output sink
    pub fn into_parts(self) -> (I, O) {
        self.io.into_parts()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Fault, FaultKind};
    use synvm_spec::{Operand, Register};

    type TestVM = VM<&'static [u8], Vec<u8>>;

    const R0: Word = 32768;
    const R1: Word = 32769;

    fn vm_from_words(words: Vec<Word>) -> TestVM {
        vm_with_input(words, "")
    }

    fn vm_with_input(words: Vec<Word>, input: &'static str) -> TestVM {
        let program = Program::new(words).unwrap();
        VM::new(&program, input.as_bytes(), Vec::new(), VMConfig::default())
    }

    fn output(vm: &TestVM) -> String {
        String::from_utf8(vm.io().output().clone()).unwrap()
    }

    #[test]
    fn test_vm_basic_execution() {
        // set r0 'A'; out r0; halt
        let mut vm = vm_from_words(vec![1, R0, 65, 19, R0, 0]);
        let result = vm.run().unwrap();

        assert_eq!(result.halt_reason, HaltReason::Halt);
        assert_eq!(result.cycles, 3);
        assert_eq!(result.chars_written, 1);
        assert_eq!(output(&vm), "A");
    }

    #[test]
    fn test_vm_empty_program_halts() {
        // Zeroed memory is a halt instruction
        let mut vm = vm_from_words(vec![]);
        let result = vm.run().unwrap();
        assert_eq!(result.halt_reason, HaltReason::Halt);
        assert_eq!(result.cycles, 1);
    }

    #[test]
    fn test_vm_step() {
        let mut vm = vm_from_words(vec![21, 21, 0]);

        assert_eq!(vm.step().unwrap(), Step::Continue);
        assert_eq!(vm.state().pc, 1);
        assert_eq!(vm.step().unwrap(), Step::Continue);
        assert_eq!(vm.step().unwrap(), Step::Halted(HaltReason::Halt));
        assert_eq!(vm.state().pc, 2);

        // Halted is absorbing
        assert_eq!(vm.step().unwrap(), Step::Halted(HaltReason::Halt));
        assert_eq!(vm.state().cycles, 3);
    }

    #[test]
    fn test_vm_pc_advances_by_instruction_size() {
        // add r0 1 2; noop; jt 0 99; halt
        let mut vm = vm_from_words(vec![9, R0, 1, 2, 21, 7, 0, 99, 0]);

        vm.step().unwrap();
        assert_eq!(vm.state().pc, 4);
        vm.step().unwrap();
        assert_eq!(vm.state().pc, 5);
        vm.step().unwrap();
        assert_eq!(vm.state().pc, 8);
        assert_eq!(vm.step().unwrap(), Step::Halted(HaltReason::Halt));
    }

    #[test]
    fn test_vm_ret_on_empty_stack() {
        let mut vm = vm_from_words(vec![18]);
        let result = vm.run().unwrap();
        assert_eq!(result.halt_reason, HaltReason::Return);
    }

    #[test]
    fn test_vm_cycle_limit() {
        // Infinite loop: jmp 0
        let program = Program::new(vec![6, 0]).unwrap();
        let config = VMConfig { max_cycles: Some(100), ..VMConfig::default() };
        let mut vm: TestVM = VM::new(&program, "".as_bytes(), Vec::new(), config);
        let result = vm.run().unwrap();

        assert_eq!(result.halt_reason, HaltReason::CycleLimit);
        assert_eq!(result.cycles, 100);
        assert_eq!(vm.state().status, MachineStatus::Halted(HaltReason::CycleLimit));
    }

    #[test]
    fn test_vm_fault_is_recorded() {
        // noop; pop r0
        let mut vm = vm_from_words(vec![21, 3, R0]);
        let err = vm.run().unwrap_err();

        assert_eq!(err.kind(), FaultKind::StackUnderflow);
        assert_eq!(err.pc(), Some(1));
        let fault = Fault { kind: FaultKind::StackUnderflow, pc: 1 };
        assert_eq!(vm.state().status, MachineStatus::Faulted(fault));

        // Faulted is absorbing
        let again = vm.step().unwrap_err();
        assert!(matches!(again, RuntimeError::Faulted(f) if f == fault));
        assert_eq!(vm.state().cycles, 1);
    }

    #[test]
    fn test_vm_invalid_opcode() {
        let mut vm = vm_from_words(vec![21, 22]);
        let err = vm.run().unwrap_err();
        assert_eq!(err.kind(), FaultKind::InvalidOpcode);
        assert_eq!(err.pc(), Some(1));
    }

    #[test]
    fn test_vm_opcode_from_register() {
        // set r0 19; <r0> 90; halt
        let mut vm = vm_from_words(vec![1, R0, 19, R0, 90, 0]);
        let result = vm.run().unwrap();

        assert_eq!(output(&vm), "Z");
        assert_eq!(result.halt_reason, HaltReason::Halt);
        assert_eq!(result.cycles, 3);
    }

    #[test]
    fn test_vm_opcode_word_classification() {
        // Above the register range the opcode word is an invalid value
        let mut vm = vm_from_words(vec![32776]);
        assert_eq!(vm.run().unwrap_err().kind(), FaultKind::InvalidOperand);

        // A register holding a non-opcode value is an unknown opcode
        let mut vm = vm_from_words(vec![1, R1, 300, R1]);
        let err = vm.run().unwrap_err();
        assert_eq!(err.kind(), FaultKind::InvalidOpcode);
        assert_eq!(err.pc(), Some(3));
    }

    #[test]
    fn test_vm_invalid_operand() {
        let mut vm = vm_from_words(vec![19, 32776]);
        let err = vm.run().unwrap_err();
        assert_eq!(err.kind(), FaultKind::InvalidOperand);
        assert_eq!(err.pc(), Some(0));
    }

    #[test]
    fn test_vm_truncated_at_end_of_memory() {
        let mut words = vec![0; synvm_spec::MEMORY_SIZE];
        words[0] = 6;
        words[1] = 32767;
        words[32767] = 9; // add with no room for operands
        let mut vm = vm_from_words(words);

        let err = vm.run().unwrap_err();
        assert_eq!(err.kind(), FaultKind::InvalidOperand);
        assert_eq!(err.pc(), Some(32767));
    }

    #[test]
    fn test_vm_jump_past_memory() {
        // rmem r1 5 (reads 40000); jmp r1
        let mut vm = vm_from_words(vec![15, R1, 5, 6, R1, 40000]);
        let err = vm.run().unwrap_err();
        assert!(matches!(
            err,
            RuntimeError::AddressOutOfBounds { pc: 40000, address: 40000 }
        ));
        assert_eq!(err.kind(), FaultKind::InvalidOperand);
    }

    #[test]
    fn test_vm_input_echo() {
        // in r0; out r0; in r0; out r0; halt
        let mut vm = vm_with_input(vec![20, R0, 19, R0, 20, R0, 19, R0, 0], "ok\n");
        vm.run().unwrap();
        assert_eq!(output(&vm), "ok");
        assert_eq!(vm.io().pending(), 1);
    }

    #[test]
    fn test_vm_self_modifying_code() {
        // wmem 6 0 overwrites the out below with halt
        let program = Program::from_instructions(&[
            Instruction::Wmem { addr: Operand::Literal(6), a: Operand::Literal(0) },
            Instruction::Set { rd: Register::R0, a: Operand::Literal(66) },
            Instruction::Out { a: Operand::Register(Register::R0) },
            Instruction::Halt,
        ])
        .unwrap();
        let mut vm: TestVM = VM::new(&program, "".as_bytes(), Vec::new(), VMConfig::default());

        let result = vm.run().unwrap();
        assert_eq!(result.cycles, 3);
        assert_eq!(result.chars_written, 0);
        assert_eq!(vm.memory().read(6), Ok(0));
    }

    #[test]
    fn test_vm_from_bytes() {
        let vm: Result<TestVM> =
            VM::from_bytes(&[0, 0, 1], "".as_bytes(), Vec::new(), VMConfig::default());
        let err = vm.err().unwrap();
        assert_eq!(err.kind(), FaultKind::MalformedProgram);
        assert_eq!(err.pc(), None);
    }

    #[test]
    fn test_vm_trace_config() {
        let program = Program::new(vec![21, 0]).unwrap();
        let config = VMConfig { trace: true, ..VMConfig::default() };
        let mut vm: TestVM = VM::new(&program, "".as_bytes(), Vec::new(), config);

        assert!(vm.config().trace);
        assert_eq!(vm.run().unwrap().cycles, 2);
    }
}
