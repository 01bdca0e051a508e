//! # Error Types for SYNVM

use crate::Word;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpecError {
    // Program format errors
    #[error("Malformed program: odd byte length {0}")]
    OddLength(usize),

    #[error("Malformed program: {words} words exceed memory size of {max} words")]
    ProgramTooLarge { words: usize, max: usize },

    // Instruction errors
    #[error("Invalid opcode: {0}")]
    InvalidOpcode(Word),

    #[error("Invalid operand: {0} is neither a literal nor a register")]
    InvalidOperand(Word),

    #[error("Invalid destination: {0} is not a register")]
    InvalidDestination(Word),

    #[error("Truncated instruction: opcode {opcode} needs {needed} words, {available} available")]
    TruncatedInstruction {
        opcode: Word,
        needed: usize,
        available: usize,
    },
}

impl SpecError {
    /// Check if this error comes from the program image rather than an instruction
    pub fn is_malformed_program(&self) -> bool {
        matches!(
            self,
            SpecError::OddLength(_) | SpecError::ProgramTooLarge { .. }
        )
    }

    /// Check if this error was raised by an operand word
    pub fn is_operand_error(&self) -> bool {
        matches!(
            self,
            SpecError::InvalidOperand(_)
                | SpecError::InvalidDestination(_)
                | SpecError::TruncatedInstruction { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;
