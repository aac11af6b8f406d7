//! Pipeline latch structure for inter-stage communication.
//!
//! One latch type serves all four inter-stage positions (IF/ID, ID/EX,
//! EX/MEM, MEM/WB); each stage fills only the fields the instruction uses at
//! that point and leaves the rest holding the undefined sentinel, which is
//! exactly what the observability interface reports.

use crate::common::constants::UNDEFINED;
use crate::isa::instruction::Instruction;

/// State carried between two adjacent pipeline stages for one instruction.
#[derive(Clone, Debug)]
pub struct PipelineLatch {
    /// Address of the instruction following this one.
    pub npc: u32,
    /// The instruction itself.
    pub ir: Instruction,
    /// First operand read in decode.
    pub a: u32,
    /// Second operand read in decode; carries store data for `SW`/`SWS`.
    pub b: u32,
    /// Immediate field.
    pub imm: u32,
    /// Execute-stage result or effective address.
    pub alu_output: u32,
    /// Word loaded by the memory stage.
    pub lmd: u32,
    /// Branch predicate outcome (1 taken, 0 not taken).
    pub cond: u32,
}

impl PipelineLatch {
    /// A bubble: `NOP` with every data field undefined.
    pub fn bubble() -> Self {
        Self {
            npc: UNDEFINED,
            ir: Instruction::nop(),
            a: UNDEFINED,
            b: UNDEFINED,
            imm: UNDEFINED,
            alu_output: UNDEFINED,
            lmd: UNDEFINED,
            cond: UNDEFINED,
        }
    }
}

impl Default for PipelineLatch {
    fn default() -> Self {
        Self::bubble()
    }
}
