//! # SYNVM Runtime
//!
//! Execute SYNVM program images.
//!
//! The machine has 32768 words of memory, eight registers, an unbounded
//! stack and line-buffered character I/O. It runs until a `halt`, a `ret`
//! with an empty stack, or a fault.
//!
//! ## Features
//!
//! - **22 instructions**: the complete SYNVM instruction set
//! - **8 registers**: r0-r7, addressed by operand words 32768-32775
//! - **Faults as values**: every fatal error is returned with its kind and address
//! - **Pluggable I/O**: any [`LineSource`] for input, any `Write` for output
//!
//! ## Example
//!
//! ```rust
//! use synvm_runtime::{VM, VMConfig, HaltReason};
//! use synvm_spec::Program;
//!
//! // set r0 'A'; out r0; halt
//! let program = Program::new(vec![1, 32768, 65, 19, 32768, 0]).unwrap();
//! let mut vm = VM::new(&program, std::io::empty(), Vec::new(), VMConfig::default());
//! let result = vm.run().unwrap();
//!
//! assert_eq!(result.halt_reason, HaltReason::Halt);
//! assert_eq!(vm.io().output(), b"A");
//! ```

pub mod error;
pub mod state;
pub mod memory;
pub mod io;
pub mod execute;
pub mod vm;

pub use state::{VMState, HaltReason, MachineStatus};
pub use memory::Memory;
pub use io::{IOHandler, LineSource};
pub use vm::{VM, VMConfig, ExecutionResult, Step};
pub use error::{RuntimeError, Fault, FaultKind};

/// Simple execution helper
///
/// Runs a program image against the given input and returns everything it
/// wrote.
pub fn run(bytes: &[u8], input: &[u8]) -> Result<Vec<u8>, RuntimeError> {
    let mut vm = VM::from_bytes(bytes, input, Vec::new(), VMConfig::default())?;
    vm.run()?;
    let (_, output) = vm.into_parts();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use synvm_spec::{Instruction, Operand, Program, Register};

    #[test]
    fn test_public_exports() {
        let _ = VMConfig::default();
        let _ = HaltReason::Halt;
        let _ = Memory::new();
        let _ = MachineStatus::default();
    }

    #[test]
    fn test_vmconfig_default() {
        let config = VMConfig::default();
        assert_eq!(config.max_cycles, None);
        assert!(!config.trace);
    }

    #[test]
    fn test_run_helper() {
        let program = Program::from_instructions(&[
            Instruction::In { rd: Register::R0 },
            Instruction::Add {
                rd: Register::R0,
                a: Operand::Register(Register::R0),
                b: Operand::Literal(1),
            },
            Instruction::Out { a: Operand::Register(Register::R0) },
            Instruction::Halt,
        ])
        .unwrap();

        let output = run(&program.to_bytes(), b"H\n").unwrap();
        assert_eq!(output, b"I");
    }

    #[test]
    fn test_run_helper_reports_load_errors() {
        let err = run(&[0], b"").unwrap_err();
        assert_eq!(err.kind(), FaultKind::MalformedProgram);
    }

    #[test]
    fn test_halt_reason_variants() {
        let reasons = vec![HaltReason::Halt, HaltReason::Return, HaltReason::CycleLimit];

        for reason in reasons {
            let _ = format!("{:?}", reason);
        }
    }
}
