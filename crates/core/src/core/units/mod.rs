//! Functional Units.
//!
//! This module models the execution stage's functional units:
//! 1. **Unit Table:** A vector of typed units, each with a latency and a
//!    busy countdown.
//! 2. **Allocation:** `find_free` returns the first idle unit of a class.
//! 3. **Timing:** `decrement_busy` runs exactly once per clock cycle.
//!
//! When the table is empty the execute stage bypasses it entirely and every
//! operation completes in a single cycle, which is the integer-pipeline
//! configuration.

use serde::Deserialize;
use std::fmt;

use crate::isa::instruction::Instruction;
use crate::isa::Opcode;

/// The ALU result table.
pub mod alu;

/// Functional unit classes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UnitKind {
    /// Integer ALU; also serves branches, loads, and stores.
    Integer,
    /// Single-precision adder/subtractor.
    Adder,
    /// Single-precision multiplier.
    Multiplier,
    /// Single-precision divider.
    Divider,
}

impl UnitKind {
    /// Conventional unit name.
    pub fn name(self) -> &'static str {
        match self {
            UnitKind::Integer => "INTEGER",
            UnitKind::Adder => "ADDER",
            UnitKind::Multiplier => "MULTIPLIER",
            UnitKind::Divider => "DIVIDER",
        }
    }
}

impl fmt::Display for UnitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit class an opcode executes on, or `None` for opcodes that never
/// occupy a unit (`NOP`, `EOP`).
pub fn unit_for(opcode: Opcode) -> Option<UnitKind> {
    match opcode {
        Opcode::Adds | Opcode::Subs => Some(UnitKind::Adder),
        Opcode::Mults => Some(UnitKind::Multiplier),
        Opcode::Divs => Some(UnitKind::Divider),
        Opcode::Eop | Opcode::Nop => None,
        _ => Some(UnitKind::Integer),
    }
}

/// A single functional unit.
pub struct ExecUnit {
    /// Unit class.
    pub kind: UnitKind,
    /// Occupancy in clock cycles per instruction.
    pub latency: u32,
    /// Remaining busy cycles; zero means free.
    pub busy: u32,
    /// Instruction currently using the unit.
    pub instruction: Instruction,
}

/// The execution stage's unit table.
#[derive(Default)]
pub struct UnitPool {
    units: Vec<ExecUnit>,
}

impl UnitPool {
    /// Adds `instances` units of the given class and latency.
    pub fn configure(&mut self, kind: UnitKind, latency: u32, instances: u32) {
        for _ in 0..instances {
            self.units.push(ExecUnit {
                kind,
                latency,
                busy: 0,
                instruction: Instruction::nop(),
            });
        }
    }

    /// True when no units have been configured.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// Index of the first idle unit of the given class, if any.
    pub fn find_free(&self, kind: UnitKind) -> Option<usize> {
        self.units
            .iter()
            .position(|unit| unit.kind == kind && unit.busy == 0)
    }

    /// Marks a unit busy for its full latency and records its instruction.
    pub fn issue(&mut self, index: usize, instruction: Instruction) {
        let unit = &mut self.units[index];
        unit.busy = unit.latency;
        unit.instruction = instruction;
    }

    /// Remaining busy cycles of a unit.
    pub fn busy(&self, index: usize) -> u32 {
        self.units[index].busy
    }

    /// Configured latency of a unit.
    pub fn latency(&self, index: usize) -> u32 {
        self.units[index].latency
    }

    /// Counts down every busy unit by one cycle. Call once per clock cycle.
    pub fn decrement_busy(&mut self) {
        for unit in &mut self.units {
            if unit.busy > 0 {
                unit.busy -= 1;
            }
        }
    }

    /// Frees every unit without forgetting the configuration.
    pub fn clear_busy(&mut self) {
        for unit in &mut self.units {
            unit.busy = 0;
            unit.instruction = Instruction::nop();
        }
    }

    /// The configured units.
    pub fn units(&self) -> &[ExecUnit] {
        &self.units
    }
}
