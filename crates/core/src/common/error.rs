//! Assembly Error Definitions.
//!
//! This module defines the error type produced while parsing assembly source.
//! It provides:
//! 1. **Error Representation:** One variant per class of malformed input.
//! 2. **Error Handling:** Integration with the standard Rust error traits.
//!
//! Per the simulator's error policy, the program text is the source of truth:
//! the file-loading edge reports these to stderr and terminates, while the
//! parser itself stays a pure `Result`-returning function.

use std::fmt;

/// Errors raised while assembling a program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AsmError {
    /// A token in opcode position is not a known mnemonic.
    ///
    /// The associated values are the 1-based source line and the token.
    UnknownOpcode { line: usize, token: String },

    /// An operand token could not be parsed (bad register, immediate,
    /// or memory operand syntax).
    MalformedOperand { line: usize, token: String },

    /// An instruction line ended before all required operands were read.
    MissingOperand { line: usize },

    /// A branch names a label that no instruction defines.
    UnknownLabel { label: String },
}

impl fmt::Display for AsmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AsmError::UnknownOpcode { line, token } => {
                write!(f, "line {}: invalid opcode: {}", line, token)
            }
            AsmError::MalformedOperand { line, token } => {
                write!(f, "line {}: malformed operand: {}", line, token)
            }
            AsmError::MissingOperand { line } => {
                write!(f, "line {}: missing operand", line)
            }
            AsmError::UnknownLabel { label } => {
                write!(f, "undefined label: {}", label)
            }
        }
    }
}

impl std::error::Error for AsmError {}
