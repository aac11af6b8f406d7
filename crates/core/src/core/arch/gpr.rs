//! Integer General-Purpose Register File.
//!
//! Maintains the 32 integer registers (`R0`-`R31`). Unlike a hardware
//! register file there is no hardwired zero register: `R0` is an ordinary
//! slot that test programs seed explicitly, and every register starts out
//! holding the undefined sentinel.

use crate::common::constants::{NUM_GP_REGISTERS, UNDEFINED};

/// Integer register file.
pub struct Gpr {
    regs: [u32; NUM_GP_REGISTERS],
}

impl Gpr {
    /// Creates a register file with every register undefined.
    pub fn new() -> Self {
        Self {
            regs: [UNDEFINED; NUM_GP_REGISTERS],
        }
    }

    /// Reads a register. Out-of-range indices read as zero.
    pub fn read(&self, idx: usize) -> u32 {
        self.regs.get(idx).copied().unwrap_or(0)
    }

    /// Writes a register. Out-of-range indices are ignored.
    pub fn write(&mut self, idx: usize, val: u32) {
        if let Some(slot) = self.regs.get_mut(idx) {
            *slot = val;
        }
    }

    /// Refills every register with the undefined sentinel.
    pub fn reset(&mut self) {
        self.regs = [UNDEFINED; NUM_GP_REGISTERS];
    }
}

impl Default for Gpr {
    fn default() -> Self {
        Self::new()
    }
}
