//! ALU result table and branch predicates.
//!
//! Both functions are total over [`Opcode`]; opcodes with no ALU meaning
//! produce the undefined sentinel rather than an error, because the engine
//! trusts the loader.

use crate::common::constants::UNDEFINED;
use crate::isa::Opcode;

/// Computes the execute-stage result for an opcode.
///
/// `a`/`b` are the latch operands (raw bits for FP opcodes), `imm` the
/// immediate, and `npc` the instruction's next-PC used by branch targets.
pub fn alu(opcode: Opcode, a: u32, b: u32, imm: u32, npc: u32) -> u32 {
    match opcode {
        Opcode::Add => a.wrapping_add(b),
        Opcode::Addi => a.wrapping_add(imm),
        Opcode::Sub => a.wrapping_sub(b),
        Opcode::Subi => a.wrapping_sub(imm),
        Opcode::Xor => a ^ b,
        Opcode::Lw | Opcode::Sw | Opcode::Lws | Opcode::Sws => a.wrapping_add(imm),
        Opcode::Beqz
        | Opcode::Bnez
        | Opcode::Bltz
        | Opcode::Bgtz
        | Opcode::Blez
        | Opcode::Bgez
        | Opcode::Jump => npc.wrapping_add(imm),
        Opcode::Adds => (f32::from_bits(a) + f32::from_bits(b)).to_bits(),
        Opcode::Subs => (f32::from_bits(a) - f32::from_bits(b)).to_bits(),
        Opcode::Mults => (f32::from_bits(a) * f32::from_bits(b)).to_bits(),
        Opcode::Divs => (f32::from_bits(a) / f32::from_bits(b)).to_bits(),
        Opcode::Eop | Opcode::Nop => UNDEFINED,
    }
}

/// Evaluates a branch predicate on the `A` operand, read as signed.
///
/// `JUMP` is always taken; every non-branch opcode is never taken.
pub fn branch_taken(opcode: Opcode, a: u32) -> bool {
    let value = a as i32;
    match opcode {
        Opcode::Beqz => value == 0,
        Opcode::Bnez => value != 0,
        Opcode::Bltz => value < 0,
        Opcode::Bgtz => value > 0,
        Opcode::Blez => value <= 0,
        Opcode::Bgez => value >= 0,
        Opcode::Jump => true,
        _ => false,
    }
}
