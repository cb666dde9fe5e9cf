use thiserror::Error;

use crate::opcode::Opcode;

/// Any error that can stop the machine mid-run.
///
/// No condition here is recoverable, the machine is all-or-nothing
/// per instruction.
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum ProcessError {
    #[error("Invalid opcode state '{0}'.")]
    Opcode(#[from] OpcodeError),
    #[error("Invalid stack state '{0}'.")]
    Stack(#[from] StackError),
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum OpcodeError {
    #[error("An unsupported opcode was used {0:#06X?}.")]
    InvalidOpcode(Opcode),
    #[error("Memory access out of bounds at {pointer:#06X}, memory size is {len:#06X}.")]
    MemoryOutOfBounds { pointer: usize, len: usize },
}

#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum StackError {
    #[error("Stack is full!")]
    Full,
    #[error("Stack is empty!")]
    Empty,
}

/// Errors raised while loading a program, before any instruction
/// has executed.
#[derive(Error, Debug)]
pub enum RomError {
    #[error("Unable to read the program file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Can't load. Program size too big ({size} bytes, at most {max} fit).")]
    TooLarge { size: usize, max: usize },
}
