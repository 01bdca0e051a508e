//! Instruction execution for SYNVM

use crate::error::{Result, RuntimeError};
use crate::io::{IOHandler, LineSource};
use crate::memory::Memory;
use crate::state::{HaltReason, VMState};
use std::io::Write;
use synvm_spec::{reduce, Instruction, Word, MAX_LITERAL};

/// What the program counter does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fall through past the instruction and its operands
    Next,
    /// Continue at an explicit address
    Jump(Word),
    /// Stop successfully
    Halt(HaltReason),
}

#[inline]
fn flag(condition: bool) -> Word {
    condition as Word
}

/// Execute single instruction
///
/// `state.pc` must still point at the instruction; it is used for return
/// addresses and error locations and is not modified here.
pub fn execute<I: LineSource, O: Write>(
    inst: &Instruction,
    state: &mut VMState,
    memory: &mut Memory,
    io: &mut IOHandler<I, O>,
) -> Result<Flow> {
    let pc = state.pc;

    let flow = match *inst {
        // ========== System ==========
        Instruction::Halt => Flow::Halt(HaltReason::Halt),

        Instruction::Noop => Flow::Next,

        // ========== Moves ==========
        Instruction::Set { rd, a } => {
            let value = state.resolve(a);
            state.write_reg(rd, value);
            Flow::Next
        }

        Instruction::Push { a } => {
            let value = state.resolve(a);
            state.push(value);
            Flow::Next
        }

        Instruction::Pop { rd } => {
            let value = state.pop().ok_or(RuntimeError::StackUnderflow { pc })?;
            state.write_reg(rd, value);
            Flow::Next
        }

        // ========== Compare ==========
        Instruction::Eq { rd, a, b } => {
            let result = flag(state.resolve(a) == state.resolve(b));
            state.write_reg(rd, result);
            Flow::Next
        }

        Instruction::Gt { rd, a, b } => {
            let result = flag(state.resolve(a) > state.resolve(b));
            state.write_reg(rd, result);
            Flow::Next
        }

        // ========== Control Flow ==========
        Instruction::Jmp { target } => Flow::Jump(state.resolve(target)),

        Instruction::Jt { cond, target } => {
            if state.resolve(cond) != 0 {
                Flow::Jump(state.resolve(target))
            } else {
                Flow::Next
            }
        }

        Instruction::Jf { cond, target } => {
            if state.resolve(cond) == 0 {
                Flow::Jump(state.resolve(target))
            } else {
                Flow::Next
            }
        }

        Instruction::Call { target } => {
            let target = state.resolve(target);
            state.push(pc + inst.size() as Word);
            Flow::Jump(target)
        }

        Instruction::Ret => match state.pop() {
            Some(address) => Flow::Jump(address),
            None => Flow::Halt(HaltReason::Return),
        },

        // ========== Arithmetic ==========
        Instruction::Add { rd, a, b } => {
            let result = reduce(state.resolve(a) as u32 + state.resolve(b) as u32);
            state.write_reg(rd, result);
            Flow::Next
        }

        Instruction::Mult { rd, a, b } => {
            let result = reduce(state.resolve(a) as u32 * state.resolve(b) as u32);
            state.write_reg(rd, result);
            Flow::Next
        }

        Instruction::Mod { rd, a, b } => {
            let divisor = state.resolve(b);
            if divisor == 0 {
                return Err(RuntimeError::DivisionByZero { pc });
            }
            let result = state.resolve(a) % divisor;
            state.write_reg(rd, result);
            Flow::Next
        }

        // ========== Bitwise ==========
        Instruction::And { rd, a, b } => {
            let result = reduce((state.resolve(a) & state.resolve(b)) as u32);
            state.write_reg(rd, result);
            Flow::Next
        }

        Instruction::Or { rd, a, b } => {
            let result = reduce((state.resolve(a) | state.resolve(b)) as u32);
            state.write_reg(rd, result);
            Flow::Next
        }

        Instruction::Not { rd, a } => {
            let result = !state.resolve(a) & MAX_LITERAL;
            state.write_reg(rd, result);
            Flow::Next
        }

        // ========== Memory ==========
        Instruction::Rmem { rd, addr } => {
            let address = state.resolve(addr) as usize;
            let value = memory
                .read(address)
                .map_err(|address| RuntimeError::AddressOutOfBounds { pc, address })?;
            state.write_reg(rd, value);
            Flow::Next
        }

        Instruction::Wmem { addr, a } => {
            let address = state.resolve(addr) as usize;
            let value = state.resolve(a);
            memory
                .write(address, value)
                .map_err(|address| RuntimeError::AddressOutOfBounds { pc, address })?;
            Flow::Next
        }

        // ========== I/O ==========
        Instruction::Out { a } => {
            io.write_char(state.resolve(a))
                .map_err(|source| RuntimeError::Io { pc, source })?;
            Flow::Next
        }

        Instruction::In { rd } => {
            let c = io
                .read_char()
                .map_err(|source| RuntimeError::Io { pc, source })?
                .ok_or(RuntimeError::InputExhausted { pc })?;
            state.write_reg(rd, reduce(c as u32));
            Flow::Next
        }
    };

    Ok(flow)
}
