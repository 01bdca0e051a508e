//! Register definitions for SYNVM

use crate::error::{Result, SpecError};
use crate::{Word, REGISTER_BASE};
use std::fmt;

/// Number of registers
pub const NUM_REGISTERS: usize = 8;

/// Register (r0-r7), encoded in instruction words as 32768-32775
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Register {
    R0 = 0,
    R1 = 1,
    R2 = 2,
    R3 = 3,
    R4 = 4,
    R5 = 5,
    R6 = 6,
    R7 = 7,
}

impl Register {
    pub const ALL: [Register; NUM_REGISTERS] = [
        Self::R0,
        Self::R1,
        Self::R2,
        Self::R3,
        Self::R4,
        Self::R5,
        Self::R6,
        Self::R7,
    ];

    #[inline]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Decode a destination word; only 32768..=32775 name a register
    pub fn from_word(word: Word) -> Result<Self> {
        word.checked_sub(REGISTER_BASE)
            .and_then(|index| Self::from_index(index as usize))
            .ok_or(SpecError::InvalidDestination(word))
    }

    /// The instruction word naming this register
    #[inline]
    pub fn to_word(self) -> Word {
        REGISTER_BASE + self as Word
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::R0 => "r0",
            Self::R1 => "r1",
            Self::R2 => "r2",
            Self::R3 => "r3",
            Self::R4 => "r4",
            Self::R5 => "r5",
            Self::R6 => "r6",
            Self::R7 => "r7",
        }
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
