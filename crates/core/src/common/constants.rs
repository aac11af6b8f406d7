//! Global Simulator Constants.
//!
//! This module defines the architectural constants shared across the simulator:
//! 1. **Sentinel:** The bit pattern marking a register slot as undefined.
//! 2. **Register File Sizes:** Integer and floating-point register counts.
//! 3. **Pipeline Shape:** Stage and special-purpose register counts.

/// Bit pattern marking a 32-bit register slot as "undefined".
///
/// Registers, latch fields, and stage registers are initialized to this value,
/// and observability reads return it for fields a stage does not use. The
/// engine never treats it specially as data.
pub const UNDEFINED: u32 = 0xFFFF_FFFF;

/// Number of integer general-purpose registers (`R0`-`R31`).
pub const NUM_GP_REGISTERS: usize = 32;

/// Number of floating-point registers (`F0`-`F31`).
pub const NUM_FP_REGISTERS: usize = 32;

/// Number of pipeline stages (IF, ID, EX, MEM, WB).
pub const NUM_STAGES: usize = 5;

/// Number of named special-purpose stage registers.
pub const NUM_SP_REGISTERS: usize = 9;

/// Maximum number of functional units the execution stage tracks.
pub const MAX_UNITS: usize = 10;

/// Size of a data-memory word in bytes.
pub const WORD_SIZE: u32 = 4;
