//! Operand classification
//!
//! Every instruction word after the opcode is one of:
//! - `0..=32767`: a literal value
//! - `32768..=32775`: a reference to register r0-r7
//! - `32776..`: invalid
//!
//! [`Operand::from_word`] is the only place the invalid boundary is checked.

use crate::error::{Result, SpecError};
use crate::register::{Register, NUM_REGISTERS};
use crate::{Word, INVALID_BASE, REGISTER_BASE};
use std::fmt;

/// Value operand (literal or register read)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Operand {
    Literal(Word),
    Register(Register),
}

impl Operand {
    /// Classify a raw instruction word
    pub fn from_word(word: Word) -> Result<Self> {
        match word {
            w if w < REGISTER_BASE => Ok(Operand::Literal(w)),
            w if w < INVALID_BASE => Ok(Operand::Register(Register::from_word(w)?)),
            w => Err(SpecError::InvalidOperand(w)),
        }
    }

    /// Encode back into an instruction word
    pub fn to_word(self) -> Word {
        match self {
            Operand::Literal(value) => value,
            Operand::Register(reg) => reg.to_word(),
        }
    }

    /// Resolve against a register file
    #[inline]
    pub fn resolve(self, registers: &[Word; NUM_REGISTERS]) -> Word {
        match self {
            Operand::Literal(value) => value,
            Operand::Register(reg) => registers[reg.index()],
        }
    }
}

impl From<Register> for Operand {
    fn from(reg: Register) -> Self {
        Operand::Register(reg)
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operand::Literal(value) => write!(f, "{}", value),
            Operand::Register(reg) => write!(f, "{}", reg),
        }
    }
}
