//! # SYNVM Opcode Definitions
//!
//! Opcodes occupy one whole word and take the values 0-21.
//!
//! ## Opcode Families
//! - 0, 18, 21: System (HALT, RET, NOOP)
//! - 1-3: Register/stack moves (SET, PUSH, POP)
//! - 4-5: Compare (EQ, GT)
//! - 6-8, 17: Control flow (JMP, JT, JF, CALL)
//! - 9-14: Arithmetic and bitwise (ADD, MULT, MOD, AND, OR, NOT)
//! - 15-16: Memory (RMEM, WMEM)
//! - 19-20: Character I/O (OUT, IN)

use crate::error::{Result, SpecError};
use crate::Word;

/// Instruction opcode (values 0-21)
#[repr(u16)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Opcode {
    /// HALT: stop execution
    Halt = 0,
    /// SET a b: a = b
    Set = 1,
    /// PUSH a: push a onto the stack
    Push = 2,
    /// POP a: a = pop()
    Pop = 3,
    /// EQ a b c: a = (b == c) ? 1 : 0
    Eq = 4,
    /// GT a b c: a = (b > c) ? 1 : 0
    Gt = 5,
    /// JMP a: pc = a
    Jmp = 6,
    /// JT a b: if a != 0, pc = b
    Jt = 7,
    /// JF a b: if a == 0, pc = b
    Jf = 8,
    /// ADD a b c: a = (b + c) % 32768
    Add = 9,
    /// MULT a b c: a = (b * c) % 32768
    Mult = 10,
    /// MOD a b c: a = b % c
    Mod = 11,
    /// AND a b c: a = b & c
    And = 12,
    /// OR a b c: a = b | c
    Or = 13,
    /// NOT a b: a = 15-bit complement of b
    Not = 14,
    /// RMEM a b: a = mem[b]
    Rmem = 15,
    /// WMEM a b: mem[a] = b
    Wmem = 16,
    /// CALL a: push next pc, pc = a
    Call = 17,
    /// RET: pc = pop(), halt on empty stack
    Ret = 18,
    /// OUT a: write character a
    Out = 19,
    /// IN a: a = next input character
    In = 20,
    /// NOOP: no operation
    Noop = 21,
}

impl Opcode {
    /// Number of opcodes
    pub const COUNT: usize = 22;

    pub const ALL: [Opcode; Self::COUNT] = [
        Opcode::Halt,
        Opcode::Set,
        Opcode::Push,
        Opcode::Pop,
        Opcode::Eq,
        Opcode::Gt,
        Opcode::Jmp,
        Opcode::Jt,
        Opcode::Jf,
        Opcode::Add,
        Opcode::Mult,
        Opcode::Mod,
        Opcode::And,
        Opcode::Or,
        Opcode::Not,
        Opcode::Rmem,
        Opcode::Wmem,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Out,
        Opcode::In,
        Opcode::Noop,
    ];

    /// Try to convert from an instruction word
    pub fn from_word(word: Word) -> Result<Self> {
        Self::ALL
            .get(word as usize)
            .copied()
            .ok_or(SpecError::InvalidOpcode(word))
    }

    /// Convert to an instruction word
    #[inline]
    pub const fn to_word(self) -> Word {
        self as Word
    }

    /// Number of operand words following the opcode
    #[inline]
    pub const fn arity(self) -> usize {
        match self {
            Opcode::Halt | Opcode::Ret | Opcode::Noop => 0,
            Opcode::Push
            | Opcode::Pop
            | Opcode::Jmp
            | Opcode::Call
            | Opcode::Out
            | Opcode::In => 1,
            Opcode::Set | Opcode::Jt | Opcode::Jf | Opcode::Not | Opcode::Rmem | Opcode::Wmem => 2,
            Opcode::Eq
            | Opcode::Gt
            | Opcode::Add
            | Opcode::Mult
            | Opcode::Mod
            | Opcode::And
            | Opcode::Or => 3,
        }
    }

    /// Total instruction length in words
    #[inline]
    pub const fn size(self) -> usize {
        1 + self.arity()
    }

    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Halt => "halt",
            Opcode::Set => "set",
            Opcode::Push => "push",
            Opcode::Pop => "pop",
            Opcode::Eq => "eq",
            Opcode::Gt => "gt",
            Opcode::Jmp => "jmp",
            Opcode::Jt => "jt",
            Opcode::Jf => "jf",
            Opcode::Add => "add",
            Opcode::Mult => "mult",
            Opcode::Mod => "mod",
            Opcode::And => "and",
            Opcode::Or => "or",
            Opcode::Not => "not",
            Opcode::Rmem => "rmem",
            Opcode::Wmem => "wmem",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Out => "out",
            Opcode::In => "in",
            Opcode::Noop => "noop",
        }
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
