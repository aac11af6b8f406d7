//! Functional Unit Pool Tests.

use dlx_core::core::units::{unit_for, UnitKind, UnitPool};
use dlx_core::isa::instruction::Instruction;
use dlx_core::isa::Opcode;

#[test]
fn opcode_to_unit_class() {
    assert_eq!(unit_for(Opcode::Add), Some(UnitKind::Integer));
    assert_eq!(unit_for(Opcode::Lw), Some(UnitKind::Integer));
    assert_eq!(unit_for(Opcode::Sws), Some(UnitKind::Integer));
    assert_eq!(unit_for(Opcode::Bnez), Some(UnitKind::Integer));
    assert_eq!(unit_for(Opcode::Jump), Some(UnitKind::Integer));
    assert_eq!(unit_for(Opcode::Adds), Some(UnitKind::Adder));
    assert_eq!(unit_for(Opcode::Subs), Some(UnitKind::Adder));
    assert_eq!(unit_for(Opcode::Mults), Some(UnitKind::Multiplier));
    assert_eq!(unit_for(Opcode::Divs), Some(UnitKind::Divider));
    assert_eq!(unit_for(Opcode::Nop), None);
    assert_eq!(unit_for(Opcode::Eop), None);
}

#[test]
fn empty_pool() {
    let pool = UnitPool::default();
    assert!(pool.is_empty());
    assert_eq!(pool.find_free(UnitKind::Integer), None);
}

#[test]
fn find_free_returns_first_idle_of_class() {
    let mut pool = UnitPool::default();
    pool.configure(UnitKind::Integer, 1, 1);
    pool.configure(UnitKind::Multiplier, 4, 2);

    assert_eq!(pool.find_free(UnitKind::Multiplier), Some(1));
    pool.issue(1, Instruction::nop());
    assert_eq!(
        pool.find_free(UnitKind::Multiplier),
        Some(2),
        "second multiplier picks up the next issue"
    );
    pool.issue(2, Instruction::nop());
    assert_eq!(pool.find_free(UnitKind::Multiplier), None);
    assert_eq!(
        pool.find_free(UnitKind::Integer),
        Some(0),
        "other classes are unaffected"
    );
    assert_eq!(pool.find_free(UnitKind::Divider), None);
}

#[test]
fn issue_sets_busy_to_latency() {
    let mut pool = UnitPool::default();
    pool.configure(UnitKind::Divider, 10, 1);
    assert_eq!(pool.busy(0), 0);
    pool.issue(0, Instruction::nop());
    assert_eq!(pool.busy(0), 10);
    assert_eq!(pool.latency(0), 10);
}

#[test]
fn decrement_frees_unit_after_latency_cycles() {
    let mut pool = UnitPool::default();
    pool.configure(UnitKind::Adder, 3, 1);
    pool.issue(0, Instruction::nop());

    for expected in (0..3).rev() {
        pool.decrement_busy();
        assert_eq!(pool.busy(0), expected);
    }
    assert_eq!(pool.find_free(UnitKind::Adder), Some(0));

    // Further decrements do not underflow.
    pool.decrement_busy();
    assert_eq!(pool.busy(0), 0);
}

#[test]
fn clear_busy_keeps_configuration() {
    let mut pool = UnitPool::default();
    pool.configure(UnitKind::Multiplier, 4, 1);
    pool.issue(0, Instruction::nop());
    pool.clear_busy();
    assert_eq!(pool.busy(0), 0);
    assert_eq!(pool.units().len(), 1);
    assert_eq!(pool.latency(0), 4);
}
