//! SYNVM Instruction Set
//!
//! An instruction is one opcode word followed by a fixed number of operand
//! words. Destination operands must name a register; every other operand is
//! a value (literal or register read). The opcode word is itself a value, so
//! a register reference in opcode position runs the opcode held in that
//! register.
//!
//! ## Formats
//! - none:       [op]
//! - value:      [op][a]
//! - dest:       [op][rd]
//! - dest/value: [op][rd][a]
//! - cond/addr:  [op][a][b]
//! - ternary:    [op][rd][a][b]

use crate::error::{Result, SpecError};
use crate::opcode::Opcode;
use crate::operand::Operand;
use crate::register::{Register, NUM_REGISTERS};
use crate::Word;
use std::fmt;

/// SYNVM Instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    // ========== System ==========
    /// HALT: stop execution
    Halt,

    /// NOOP: no operation
    Noop,

    // ========== Moves ==========
    /// SET: rd = a
    Set { rd: Register, a: Operand },

    /// PUSH: push a
    Push { a: Operand },

    /// POP: rd = pop()
    Pop { rd: Register },

    // ========== Compare ==========
    /// EQ: rd = (a == b) ? 1 : 0
    Eq { rd: Register, a: Operand, b: Operand },

    /// GT: rd = (a > b) ? 1 : 0
    Gt { rd: Register, a: Operand, b: Operand },

    // ========== Control Flow ==========
    /// JMP: pc = target
    Jmp { target: Operand },

    /// JT: if cond != 0 { pc = target }
    Jt { cond: Operand, target: Operand },

    /// JF: if cond == 0 { pc = target }
    Jf { cond: Operand, target: Operand },

    /// CALL: push(pc + 2); pc = target
    Call { target: Operand },

    /// RET: pc = pop(), halt if the stack is empty
    Ret,

    // ========== Arithmetic ==========
    /// ADD: rd = (a + b) % 32768
    Add { rd: Register, a: Operand, b: Operand },

    /// MULT: rd = (a * b) % 32768
    Mult { rd: Register, a: Operand, b: Operand },

    /// MOD: rd = a % b
    Mod { rd: Register, a: Operand, b: Operand },

    // ========== Bitwise ==========
    /// AND: rd = a & b
    And { rd: Register, a: Operand, b: Operand },

    /// OR: rd = a | b
    Or { rd: Register, a: Operand, b: Operand },

    /// NOT: rd = !a & 0x7FFF
    Not { rd: Register, a: Operand },

    // ========== Memory ==========
    /// RMEM: rd = mem[addr]
    Rmem { rd: Register, addr: Operand },

    /// WMEM: mem[addr] = a
    Wmem { addr: Operand, a: Operand },

    // ========== I/O ==========
    /// OUT: write character a
    Out { a: Operand },

    /// IN: rd = next input character
    In { rd: Register },
}

impl Instruction {
    /// Decode the instruction starting at `words[0]`
    ///
    /// `registers` resolves a register reference in opcode position. Every
    /// operand word is classified here, including a `jt`/`jf` target that
    /// execution may skip. Only the words belonging to the instruction are
    /// inspected; trailing words are ignored.
    pub fn decode(words: &[Word], registers: &[Word; NUM_REGISTERS]) -> Result<Self> {
        let (&op_word, rest) = words
            .split_first()
            .ok_or(SpecError::TruncatedInstruction { opcode: 0, needed: 1, available: 0 })?;
        let opcode = Opcode::from_word(Operand::from_word(op_word)?.resolve(registers))?;

        if rest.len() < opcode.arity() {
            return Err(SpecError::TruncatedInstruction {
                opcode: opcode.to_word(),
                needed: opcode.size(),
                available: words.len(),
            });
        }

        let value = |i: usize| Operand::from_word(rest[i]);
        let dest = |i: usize| Register::from_word(rest[i]);

        let inst = match opcode {
            Opcode::Halt => Instruction::Halt,
            Opcode::Set => Instruction::Set { rd: dest(0)?, a: value(1)? },
            Opcode::Push => Instruction::Push { a: value(0)? },
            Opcode::Pop => Instruction::Pop { rd: dest(0)? },
            Opcode::Eq => Instruction::Eq { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::Gt => Instruction::Gt { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::Jmp => Instruction::Jmp { target: value(0)? },
            Opcode::Jt => Instruction::Jt { cond: value(0)?, target: value(1)? },
            Opcode::Jf => Instruction::Jf { cond: value(0)?, target: value(1)? },
            Opcode::Add => Instruction::Add { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::Mult => Instruction::Mult { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::Mod => Instruction::Mod { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::And => Instruction::And { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::Or => Instruction::Or { rd: dest(0)?, a: value(1)?, b: value(2)? },
            Opcode::Not => Instruction::Not { rd: dest(0)?, a: value(1)? },
            Opcode::Rmem => Instruction::Rmem { rd: dest(0)?, addr: value(1)? },
            Opcode::Wmem => Instruction::Wmem { addr: value(0)?, a: value(1)? },
            Opcode::Call => Instruction::Call { target: value(0)? },
            Opcode::Ret => Instruction::Ret,
            Opcode::Out => Instruction::Out { a: value(0)? },
            Opcode::In => Instruction::In { rd: dest(0)? },
            Opcode::Noop => Instruction::Noop,
        };

        Ok(inst)
    }

    /// Get the opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Halt => Opcode::Halt,
            Instruction::Noop => Opcode::Noop,
            Instruction::Set { .. } => Opcode::Set,
            Instruction::Push { .. } => Opcode::Push,
            Instruction::Pop { .. } => Opcode::Pop,
            Instruction::Eq { .. } => Opcode::Eq,
            Instruction::Gt { .. } => Opcode::Gt,
            Instruction::Jmp { .. } => Opcode::Jmp,
            Instruction::Jt { .. } => Opcode::Jt,
            Instruction::Jf { .. } => Opcode::Jf,
            Instruction::Call { .. } => Opcode::Call,
            Instruction::Ret => Opcode::Ret,
            Instruction::Add { .. } => Opcode::Add,
            Instruction::Mult { .. } => Opcode::Mult,
            Instruction::Mod { .. } => Opcode::Mod,
            Instruction::And { .. } => Opcode::And,
            Instruction::Or { .. } => Opcode::Or,
            Instruction::Not { .. } => Opcode::Not,
            Instruction::Rmem { .. } => Opcode::Rmem,
            Instruction::Wmem { .. } => Opcode::Wmem,
            Instruction::Out { .. } => Opcode::Out,
            Instruction::In { .. } => Opcode::In,
        }
    }

    /// Instruction length in words
    #[inline]
    pub fn size(&self) -> usize {
        self.opcode().size()
    }

    /// Operand words in encoding order
    fn operand_words(&self) -> Vec<Word> {
        match *self {
            Instruction::Halt | Instruction::Noop | Instruction::Ret => vec![],
            Instruction::Push { a } | Instruction::Out { a } => vec![a.to_word()],
            Instruction::Jmp { target } | Instruction::Call { target } => vec![target.to_word()],
            Instruction::Pop { rd } | Instruction::In { rd } => vec![rd.to_word()],
            Instruction::Set { rd, a } | Instruction::Not { rd, a } => {
                vec![rd.to_word(), a.to_word()]
            }
            Instruction::Rmem { rd, addr } => vec![rd.to_word(), addr.to_word()],
            Instruction::Wmem { addr, a } => vec![addr.to_word(), a.to_word()],
            Instruction::Jt { cond, target } | Instruction::Jf { cond, target } => {
                vec![cond.to_word(), target.to_word()]
            }
            Instruction::Eq { rd, a, b }
            | Instruction::Gt { rd, a, b }
            | Instruction::Add { rd, a, b }
            | Instruction::Mult { rd, a, b }
            | Instruction::Mod { rd, a, b }
            | Instruction::And { rd, a, b }
            | Instruction::Or { rd, a, b } => vec![rd.to_word(), a.to_word(), b.to_word()],
        }
    }

    /// Encode to instruction words, with a literal opcode
    pub fn encode(&self) -> Vec<Word> {
        let mut words = Vec::with_capacity(self.size());
        words.push(self.opcode().to_word());
        words.extend(self.operand_words());
        words
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.opcode())?;
        // Operand words decode back to operands; registers print by name
        for word in self.operand_words() {
            match Operand::from_word(word) {
                Ok(operand) => write!(f, " {}", operand)?,
                Err(_) => write!(f, " {}", word)?,
            }
        }
        Ok(())
    }
}
