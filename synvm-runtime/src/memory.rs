//! Memory subsystem
//!
//! 32768 words, zero-initialized. Every access is bounds-checked; an address
//! past the end is reported back to the caller instead of panicking.

use synvm_spec::{Program, Word, MEMORY_SIZE};

#[derive(Debug, Clone)]
pub struct Memory {
    data: Box<[Word]>,
}

impl Memory {
    pub fn new() -> Self {
        Memory {
            data: vec![0; MEMORY_SIZE].into_boxed_slice(),
        }
    }

    /// Copy a program image to address 0
    pub fn load_program(&mut self, program: &Program) {
        // Program guarantees it fits
        let words = program.words();
        self.data[..words.len()].copy_from_slice(words);
    }

    /// Read a word; `Err(address)` if out of bounds
    #[inline]
    pub fn read(&self, address: usize) -> Result<Word, usize> {
        self.data.get(address).copied().ok_or(address)
    }

    /// Write a word; `Err(address)` if out of bounds
    #[inline]
    pub fn write(&mut self, address: usize, value: Word) -> Result<(), usize> {
        let slot = self.data.get_mut(address).ok_or(address)?;
        *slot = value;
        Ok(())
    }

    /// Words from `address` to the end of memory, for instruction decoding
    pub fn window(&self, address: usize) -> Result<&[Word], usize> {
        self.data.get(address..).filter(|w| !w.is_empty()).ok_or(address)
    }

    pub fn as_slice(&self) -> &[Word] {
        &self.data
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

impl Default for Memory {
    fn default() -> Self {
        Self::new()
    }
}
