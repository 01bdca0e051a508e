//! I/O handling
//!
//! Input arrives a line at a time from a [`LineSource`] and is handed to the
//! program one character at a time. Output goes straight to a `Write` sink.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use synvm_spec::Word;

/// Blocking source of input lines
pub trait LineSource {
    /// Next line including its terminator, or `None` once the source is closed
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

impl<R: BufRead> LineSource for R {
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        match BufRead::read_line(self, &mut line)? {
            0 => Ok(None),
            _ => Ok(Some(line)),
        }
    }
}

#[derive(Debug)]
pub struct IOHandler<I, O> {
    input: I,
    output: O,
    pending: VecDeque<char>,
    written: u64,
}

impl<I: LineSource, O: Write> IOHandler<I, O> {
    pub fn new(input: I, output: O) -> Self {
        IOHandler {
            input,
            output,
            pending: VecDeque::new(),
            written: 0,
        }
    }

    /// Next input character, pulling a new line when the buffer is empty
    ///
    /// Returns `Ok(None)` if the source is closed.
    pub fn read_char(&mut self) -> io::Result<Option<char>> {
        while self.pending.is_empty() {
            // Prompts must be visible before blocking
            self.output.flush()?;
            match self.input.read_line()? {
                Some(line) => self.pending.extend(line.chars()),
                None => return Ok(None),
            }
        }
        Ok(self.pending.pop_front())
    }

    /// Emit one character; invalid code points become U+FFFD
    pub fn write_char(&mut self, value: Word) -> io::Result<()> {
        let c = char::from_u32(value as u32).unwrap_or(char::REPLACEMENT_CHARACTER);
        let mut buf = [0u8; 4];
        self.output.write_all(c.encode_utf8(&mut buf).as_bytes())?;
        self.written += 1;
        Ok(())
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.output.flush()
    }

    /// Characters still buffered from the last line
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Number of characters emitted so far
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn into_parts(self) -> (I, O) {
        (self.input, self.output)
    }
}
