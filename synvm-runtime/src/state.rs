//! VM state for SYNVM

use crate::error::Fault;
use synvm_spec::{Operand, Register, Word, NUM_REGISTERS};

/// VM state
#[derive(Debug, Clone, Default)]
pub struct VMState {
    /// Registers (r0-r7)
    pub registers: [Word; NUM_REGISTERS],

    /// Program counter
    pub pc: Word,

    /// Operand and return-address stack
    pub stack: Vec<Word>,

    /// Executed instruction count
    pub cycles: u64,

    /// Lifecycle status
    pub status: MachineStatus,
}

/// Why the machine stopped without a fault
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// HALT instruction
    Halt,
    /// RET with an empty stack
    Return,
    /// Configured cycle limit reached
    CycleLimit,
}

/// Machine lifecycle; `Halted` and `Faulted` are terminal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MachineStatus {
    #[default]
    Running,
    Halted(HaltReason),
    Faulted(Fault),
}

impl MachineStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, MachineStatus::Running)
    }
}

impl VMState {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn read_reg(&self, reg: Register) -> Word {
        self.registers[reg.index()]
    }

    #[inline]
    pub fn write_reg(&mut self, reg: Register, value: Word) {
        self.registers[reg.index()] = value;
    }

    /// Resolve a value operand against the register file
    #[inline]
    pub fn resolve(&self, operand: Operand) -> Word {
        operand.resolve(&self.registers)
    }

    #[inline]
    pub fn push(&mut self, value: Word) {
        self.stack.push(value);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<Word> {
        self.stack.pop()
    }

    #[inline]
    pub fn is_halted(&self) -> bool {
        self.status.is_terminal()
    }

    /// Stop execution successfully
    pub fn halt(&mut self, reason: HaltReason) {
        self.status = MachineStatus::Halted(reason);
    }

    /// Stop execution on a fatal error
    pub fn fault(&mut self, fault: Fault) {
        self.status = MachineStatus::Faulted(fault);
    }

    #[inline]
    pub fn inc_cycles(&mut self) {
        self.cycles += 1;
    }
}
