//! # Program Image
//!
//! A program image is a flat sequence of little-endian 16-bit words, loaded
//! into memory starting at address 0.
//!
//! Binary format:
//! ```text
//! Offset  Size  Field
//! ──────────────────────────────────
//! 0x00    2     word 0 (LE)
//! 0x02    2     word 1 (LE)
//! ...
//! 2n      2     word n (LE), n < 32768
//! ```

use crate::error::{Result, SpecError};
use crate::instruction::Instruction;
use crate::{Word, MEMORY_SIZE};
use std::fmt;

/// Initial memory image
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    words: Vec<Word>,
}

impl Program {
    /// Create a program from raw words
    pub fn new(words: Vec<Word>) -> Result<Self> {
        if words.len() > MEMORY_SIZE {
            return Err(SpecError::ProgramTooLarge {
                words: words.len(),
                max: MEMORY_SIZE,
            });
        }
        Ok(Self { words })
    }

    /// Deserialize from bytes
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % 2 != 0 {
            return Err(SpecError::OddLength(bytes.len()));
        }

        let words = bytes
            .chunks_exact(2)
            .map(|pair| Word::from_le_bytes([pair[0], pair[1]]))
            .collect();

        Self::new(words)
    }

    /// Serialize to bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        self.words.iter().flat_map(|w| w.to_le_bytes()).collect()
    }

    /// Assemble an image from already-decoded instructions
    pub fn from_instructions(instructions: &[Instruction]) -> Result<Self> {
        Self::new(instructions.iter().flat_map(Instruction::encode).collect())
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} words ({} bytes)", self.words.len(), self.words.len() * 2)
    }
}
