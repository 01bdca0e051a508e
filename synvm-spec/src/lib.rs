//! # SYNVM Specification
//!
//! 16-bit word machine with 8 registers, an unbounded stack and 32768 words
//! of memory.
//!
//! ## Key Features
//! - 15-bit arithmetic (every result is reduced modulo 32768)
//! - Register references share the word space: 32768..=32775 name r0..r7
//! - 22 instructions, each with a fixed operand count
//! - Program images are little-endian word sequences loaded at address 0

pub mod error;
pub mod register;
pub mod operand;
pub mod opcode;
pub mod instruction;
pub mod program;

pub use error::{SpecError, Result};
pub use register::{Register, NUM_REGISTERS};
pub use operand::Operand;
pub use opcode::Opcode;
pub use instruction::Instruction;
pub use program::Program;

/// Word size (16-bit)
pub type Word = u16;

/// Arithmetic modulus; also the number of addressable memory words
pub const MODULUS: u32 = 32768;

/// Memory size in words
pub const MEMORY_SIZE: usize = 32768;

/// Largest literal value
pub const MAX_LITERAL: Word = 32767;

/// First word that names a register (r0)
pub const REGISTER_BASE: Word = 32768;

/// First word that is neither a literal nor a register reference
pub const INVALID_BASE: Word = REGISTER_BASE + NUM_REGISTERS as Word;

/// Reduce a value modulo 32768
#[inline]
pub const fn reduce(value: u32) -> Word {
    (value % MODULUS) as Word
}
