//! Runtime error types for SYNVM

use std::fmt;
use synvm_spec::{SpecError, Word};
use thiserror::Error;

/// Category of a fatal machine error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaultKind {
    MalformedProgram,
    InvalidOpcode,
    InvalidOperand,
    StackUnderflow,
    DivisionByZero,
    /// Input source closed or failed, or the output sink failed
    Io,
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultKind::MalformedProgram => "malformed program",
            FaultKind::InvalidOpcode => "invalid opcode",
            FaultKind::InvalidOperand => "invalid operand",
            FaultKind::StackUnderflow => "stack underflow",
            FaultKind::DivisionByZero => "division by zero",
            FaultKind::Io => "i/o failure",
        };
        write!(f, "{}", name)
    }
}

/// Recorded fault: what went wrong and at which instruction address
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fault {
    pub kind: FaultKind,
    pub pc: Word,
}

impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} at {}", self.kind, self.pc)
    }
}

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("Load error: {0}")]
    Load(#[from] SpecError),

    #[error("Decode error at {pc}: {source}")]
    Decode {
        pc: Word,
        #[source]
        source: SpecError,
    },

    #[error("Stack underflow at {pc}")]
    StackUnderflow { pc: Word },

    #[error("Division by zero at {pc}")]
    DivisionByZero { pc: Word },

    #[error("Memory address {address} out of bounds at {pc}")]
    AddressOutOfBounds { pc: Word, address: usize },

    #[error("Input exhausted at {pc}")]
    InputExhausted { pc: Word },

    #[error("I/O error at {pc}: {source}")]
    Io {
        pc: Word,
        #[source]
        source: std::io::Error,
    },

    #[error("Machine already faulted: {0}")]
    Faulted(Fault),
}

impl RuntimeError {
    /// Classify this error
    pub fn kind(&self) -> FaultKind {
        match self {
            RuntimeError::Load(_) => FaultKind::MalformedProgram,
            RuntimeError::Decode { source, .. } => {
                if source.is_operand_error() {
                    FaultKind::InvalidOperand
                } else if source.is_malformed_program() {
                    FaultKind::MalformedProgram
                } else {
                    FaultKind::InvalidOpcode
                }
            }
            RuntimeError::StackUnderflow { .. } => FaultKind::StackUnderflow,
            RuntimeError::DivisionByZero { .. } => FaultKind::DivisionByZero,
            RuntimeError::AddressOutOfBounds { .. } => FaultKind::InvalidOperand,
            RuntimeError::InputExhausted { .. } | RuntimeError::Io { .. } => FaultKind::Io,
            RuntimeError::Faulted(fault) => fault.kind,
        }
    }

    /// Address of the faulting instruction; `None` for load errors
    pub fn pc(&self) -> Option<Word> {
        match self {
            RuntimeError::Load(_) => None,
            RuntimeError::Decode { pc, .. }
            | RuntimeError::StackUnderflow { pc }
            | RuntimeError::DivisionByZero { pc }
            | RuntimeError::AddressOutOfBounds { pc, .. }
            | RuntimeError::InputExhausted { pc }
            | RuntimeError::Io { pc, .. } => Some(*pc),
            RuntimeError::Faulted(fault) => Some(fault.pc),
        }
    }

    /// Kind and location, if this error happened while executing
    pub fn fault(&self) -> Option<Fault> {
        self.pc().map(|pc| Fault { kind: self.kind(), pc })
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_stack_underflow_display() {
        let err = RuntimeError::StackUnderflow { pc: 12 };
        assert_eq!(err.to_string(), "Stack underflow at 12");
    }

    #[test]
    fn test_division_by_zero_display() {
        let err = RuntimeError::DivisionByZero { pc: 0x1000 };
        assert_eq!(err.to_string(), "Division by zero at 4096");
    }

    #[test]
    fn test_decode_display() {
        let err = RuntimeError::Decode { pc: 7, source: SpecError::InvalidOpcode(99) };
        assert_eq!(err.to_string(), "Decode error at 7: Invalid opcode: 99");
    }

    #[test]
    fn test_address_out_of_bounds_display() {
        let err = RuntimeError::AddressOutOfBounds { pc: 3, address: 32768 };
        assert_eq!(err.to_string(), "Memory address 32768 out of bounds at 3");
    }

    #[test]
    fn test_faulted_display() {
        let err = RuntimeError::Faulted(Fault { kind: FaultKind::StackUnderflow, pc: 5 });
        assert_eq!(err.to_string(), "Machine already faulted: stack underflow at 5");
    }

    #[test]
    fn test_spec_error_from() {
        let runtime_err: RuntimeError = SpecError::OddLength(5).into();
        assert!(runtime_err.to_string().contains("odd byte length 5"));
        assert_eq!(runtime_err.kind(), FaultKind::MalformedProgram);
        assert_eq!(runtime_err.pc(), None);
        assert_eq!(runtime_err.fault(), None);
    }

    #[test]
    fn test_decode_kinds() {
        let cases = [
            (SpecError::InvalidOpcode(22), FaultKind::InvalidOpcode),
            (SpecError::InvalidOperand(40000), FaultKind::InvalidOperand),
            (SpecError::InvalidDestination(3), FaultKind::InvalidOperand),
            (SpecError::OddLength(3), FaultKind::MalformedProgram),
            (
                SpecError::TruncatedInstruction { opcode: 9, needed: 4, available: 1 },
                FaultKind::InvalidOperand,
            ),
        ];

        for (source, kind) in cases {
            let err = RuntimeError::Decode { pc: 40, source };
            assert_eq!(err.kind(), kind);
            assert_eq!(err.fault(), Some(Fault { kind, pc: 40 }));
        }
    }

    #[test]
    fn test_io_kind() {
        let err = RuntimeError::Io {
            pc: 9,
            source: IoError::new(ErrorKind::BrokenPipe, "pipe closed"),
        };
        assert_eq!(err.kind(), FaultKind::Io);
        assert!(err.to_string().contains("pipe closed"));

        let err = RuntimeError::InputExhausted { pc: 9 };
        assert_eq!(err.kind(), FaultKind::Io);
    }

    #[test]
    fn test_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RuntimeError>();
    }
}
