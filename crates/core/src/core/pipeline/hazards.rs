//! Data and Control Hazard Detection.
//!
//! This module implements the logic for keeping the pipeline consistent when
//! dependencies exist between in-flight instructions. It provides:
//! 1. **RAW Detection:** Matches the decoded instruction's sources against
//!    the destinations of the instructions already downstream.
//! 2. **Control Detection:** Flags a branch entering decode so fetch can
//!    inject bubbles behind it.
//!
//! `assess` is a pure function over a snapshot of the latch contents taken
//! at the start of the cycle; the cycle driver owns all stall bookkeeping.

use crate::isa::instruction::Instruction;

/// Instruction registers of the three downstream latches, captured at the
/// start of the cycle (before any stage has advanced).
#[derive(Clone, Debug, Default)]
pub struct LatchSnapshot {
    /// Instruction executing this cycle.
    pub id_ex: Instruction,
    /// Instruction in the memory stage this cycle.
    pub ex_mem: Instruction,
    /// Instruction committing this cycle.
    pub mem_wb: Instruction,
}

/// A stall decision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stall {
    /// Number of bubble cycles to insert.
    pub cycles: u64,
    /// Branch stall: fetch injects the bubbles while the branch itself
    /// advances through decode.
    pub branch: bool,
}

/// True when `producer` writes a register that `consumer` reads, in either
/// register file. Bubbles, stores, and branches write no register and can
/// never match.
fn conflicts(consumer: &Instruction, producer: &Instruction) -> bool {
    if let Some(dest) = producer.int_dest() {
        if consumer.int_sources().iter().flatten().any(|&src| src == dest) {
            return true;
        }
    }
    if let Some(dest) = producer.fp_dest() {
        if consumer.fp_sources().iter().flatten().any(|&src| src == dest) {
            return true;
        }
    }
    false
}

/// Decides whether the instruction entering decode must stall.
///
/// The nearest producer wins: a dependence on the instruction one ahead
/// costs two bubbles (its result is committed two cycles from now), while a
/// dependence on either of the two older in-flight instructions costs one.
/// A branch with no data hazard stalls fetch for two cycles; when a branch
/// also carries a data hazard the data stall is served first and the branch
/// stall begins as it clears.
///
/// # Arguments
///
/// * `decoded` - The instruction currently in IF/ID.
/// * `latches` - Cycle-start snapshot of the downstream latches.
///
/// # Returns
///
/// The required stall, or `None` when decode may proceed.
pub fn assess(decoded: &Instruction, latches: &LatchSnapshot) -> Option<Stall> {
    if conflicts(decoded, &latches.id_ex) {
        return Some(Stall {
            cycles: 2,
            branch: false,
        });
    }
    if conflicts(decoded, &latches.ex_mem) {
        return Some(Stall {
            cycles: 1,
            branch: false,
        });
    }
    if conflicts(decoded, &latches.mem_wb) {
        return Some(Stall {
            cycles: 1,
            branch: false,
        });
    }
    if decoded.opcode.is_branch() {
        return Some(Stall {
            cycles: 2,
            branch: true,
        });
    }
    None
}
