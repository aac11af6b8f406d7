//! End-to-End Pipeline Scenarios.
//!
//! Whole-program runs asserting terminal architectural state, cycle counts,
//! and stall accounting against hand-drawn pipeline diagrams.

use dlx_core::common::constants::UNDEFINED;
use dlx_core::core::units::UnitKind;
use dlx_core::isa::{Opcode, SpRegister, Stage};
use dlx_core::Simulator;

use crate::common::harness::TestContext;

// ══════════════════════════════════════════════════════════
// 1. Straight-line arithmetic
// ══════════════════════════════════════════════════════════

const ARITH: &str = "ADDI R1 R0 5\nADDI R2 R0 7\nADD R3 R1 R2\nEOP";

#[test]
fn arithmetic_with_one_raw_hazard() {
    let sim = TestContext::new(1024, 0).seed(0, 0).load(ARITH).run();

    assert_eq!(sim.get_gp_register(1), 5);
    assert_eq!(sim.get_gp_register(2), 7);
    assert_eq!(sim.get_gp_register(3), 12);
    assert_eq!(sim.get_instructions_executed(), 3);
    assert_eq!(sim.get_stalls(), 2, "one RAW pair costs two bubbles");
    assert_eq!(sim.get_clock_cycles(), 9);
    assert!((sim.get_ipc() - 3.0 / 9.0).abs() < 1e-6);
}

#[test]
fn back_to_back_dependent_adds_cost_two_stalls() {
    let sim = TestContext::new(1024, 0)
        .seed(0, 0)
        .load("ADDI R1 R0 1\nADD R2 R1 R1\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(2), 2);
    assert_eq!(sim.stats.stalls_data, 2);
    assert_eq!(sim.get_stalls(), 2);
}

// ══════════════════════════════════════════════════════════
// 2. Memory traffic and latency
// ══════════════════════════════════════════════════════════

const STORE_LOAD: &str = "ADDI R1 R0 0x42\nSW R1 0(R0)\nLW R2 0(R0)\nEOP";

#[test]
fn store_then_load_round_trips_through_memory() {
    let sim = TestContext::new(1024, 0).seed(0, 0).load(STORE_LOAD).run();

    assert_eq!(sim.get_gp_register(2), 0x42);
    // Little-endian: 42 00 00 00.
    assert_eq!(sim.read_memory(0), 0x42);
    assert_eq!(sim.get_stalls(), 2, "store waits on its data register");
    assert_eq!(sim.get_clock_cycles(), 9);
}

#[test]
fn memory_latency_freezes_the_pipeline() {
    let sim = TestContext::new(1024, 2).seed(0, 0).load(STORE_LOAD).run();

    assert_eq!(sim.get_gp_register(2), 0x42);
    assert_eq!(
        sim.get_clock_cycles(),
        13,
        "two extra cycles per memory access over the latency-0 run"
    );
    assert_eq!(sim.stats.stalls_memory, 4, "memory waits count as stalls");
    assert_eq!(sim.get_stalls(), 6);
}

#[test]
fn load_use_dependency_costs_two_stalls() {
    let sim = TestContext::new(1024, 0)
        .seed(0, 0)
        .seed_memory(0, 7)
        .load("LW R1 0(R0)\nADD R2 R1 R1\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(2), 14);
    assert_eq!(sim.get_stalls(), 2);
    assert_eq!(sim.get_clock_cycles(), 8);
}

#[test]
fn pending_stall_waits_out_a_memory_freeze() {
    // The consumer's data stall is still pending when the load starts its
    // two memory-wait cycles; the stall must not expire mid-freeze.
    let sim = TestContext::new(1024, 2)
        .seed(0, 0)
        .seed_memory(0, 7)
        .load("LW R1 0(R0)\nADD R2 R1 R1\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(2), 14, "consumer reads the loaded value");
    assert_eq!(sim.stats.stalls_data, 2);
    assert_eq!(sim.stats.stalls_memory, 2);
    assert_eq!(sim.get_clock_cycles(), 10);
}

#[test]
fn seeded_word_is_loaded_little_endian() {
    let sim = TestContext::new(1024, 0)
        .seed(0, 0)
        .seed_memory(8, 0xDEAD_BEEF)
        .load("LW R1 8(R0)\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(1) as u32, 0xDEAD_BEEF);
    assert_eq!(sim.get_clock_cycles(), 5);
}

// ══════════════════════════════════════════════════════════
// 3. Control flow
// ══════════════════════════════════════════════════════════

const BRANCH_TAKEN: &str =
    "ADDI R1 R0 1\nBNEZ R1 END\nADDI R2 R0 99\nEND: ADDI R3 R0 7\nEOP";

#[test]
fn taken_branch_squashes_the_fall_through_path() {
    let sim = TestContext::new(1024, 0).seed(0, 0).load(BRANCH_TAKEN).run();

    assert_eq!(
        sim.get_gp_register(2) as u32,
        UNDEFINED,
        "the squashed instruction never writes back"
    );
    assert_eq!(sim.get_gp_register(3), 7);
    assert_eq!(sim.get_instructions_executed(), 3);
    assert_eq!(sim.stats.stalls_data, 2);
    assert_eq!(sim.stats.stalls_control, 2);
    assert_eq!(sim.get_clock_cycles(), 11);
}

#[test]
fn not_taken_branch_falls_through() {
    let source = "ADDI R1 R0 0\nBNEZ R1 END\nADDI R2 R0 99\nEND: ADDI R3 R0 7\nEOP";
    let sim = TestContext::new(1024, 0).seed(0, 0).load(source).run();

    assert_eq!(sim.get_gp_register(2), 99);
    assert_eq!(sim.get_gp_register(3), 7);
    assert_eq!(sim.get_instructions_executed(), 4);
    assert_eq!(sim.get_stalls(), 4, "the branch bubble is paid either way");
    assert_eq!(sim.get_clock_cycles(), 12);
}

#[test]
fn taken_branch_costs_exactly_two_bubbles() {
    let source = "BEQZ R0 TAKEN\nADDI R1 R0 1\nTAKEN: ADDI R2 R0 2\nEOP";
    let sim = TestContext::new(1024, 0).seed(0, 0).load(source).run();

    assert_eq!(sim.get_gp_register(1) as u32, UNDEFINED);
    assert_eq!(sim.get_gp_register(2), 2);
    assert_eq!(sim.get_instructions_executed(), 2);
    assert_eq!(sim.stats.stalls_control, 2);
    assert_eq!(sim.get_stalls(), 2);
    assert_eq!(sim.get_clock_cycles(), 8);
}

#[test]
fn jump_is_unconditional() {
    let source = "ADDI R1 R0 1\nJUMP END\nADDI R2 R0 99\nEND: ADDI R3 R0 7\nEOP";
    let sim = TestContext::new(1024, 0).seed(0, 0).load(source).run();

    assert_eq!(sim.get_gp_register(2) as u32, UNDEFINED);
    assert_eq!(sim.get_gp_register(3), 7);
    assert_eq!(sim.stats.stalls_control, 2);
    assert_eq!(sim.get_clock_cycles(), 9);
}

#[test]
fn countdown_loop_runs_to_zero() {
    let source = "ADDI R1 R0 2\nLOOP: SUBI R1 R1 1\nBNEZ R1 LOOP\nEOP";
    let sim = TestContext::new(1024, 0).seed(0, 0).load(source).run();

    assert_eq!(sim.get_gp_register(1), 0);
    assert_eq!(sim.get_instructions_executed(), 5);
    assert_eq!(sim.stats.stalls_data, 6, "each SUBI->BNEZ pair re-stalls");
    assert_eq!(sim.stats.stalls_control, 4, "one taken, one fall-through");
    assert_eq!(sim.get_clock_cycles(), 19);
}

// ══════════════════════════════════════════════════════════
// 4. Producer distance
// ══════════════════════════════════════════════════════════

#[test]
fn producer_two_ahead_costs_one_stall() {
    let sim = TestContext::new(1024, 0)
        .seed(0, 0)
        .load("ADDI R1 R0 5\nNOP\nADD R3 R1 R1\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(3), 10);
    assert_eq!(sim.get_stalls(), 1);
}

#[test]
fn producer_three_ahead_costs_one_stall() {
    let sim = TestContext::new(1024, 0)
        .seed(0, 0)
        .load("ADDI R1 R0 5\nNOP\nNOP\nADD R3 R1 R1\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(3), 10);
    assert_eq!(sim.get_stalls(), 1);
}

#[test]
fn producer_four_ahead_needs_no_stall() {
    let sim = TestContext::new(1024, 0)
        .seed(0, 0)
        .load("ADDI R1 R0 5\nNOP\nNOP\nNOP\nADD R3 R1 R1\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(3), 10);
    assert_eq!(sim.get_stalls(), 0);
}

// ══════════════════════════════════════════════════════════
// 5. Floating point and functional units
// ══════════════════════════════════════════════════════════

const FP_MULTIPLY: &str = "LWS F1 0(R0)\nLWS F2 4(R0)\nMULTS F3 F1 F2\nEOP";

fn fp_context(mult_latency: u32) -> TestContext {
    TestContext::new(1024, 0)
        .with_unit(UnitKind::Integer, 1, 1)
        .with_unit(UnitKind::Multiplier, mult_latency, 1)
        .seed(0, 0)
        .seed_memory(0, 2.5f32.to_bits())
        .seed_memory(4, 4.0f32.to_bits())
}

#[test]
fn fp_multiply_with_slow_multiplier() {
    let sim = fp_context(4).load(FP_MULTIPLY).run();

    assert_eq!(sim.get_fp_register(3), 10.0);
    assert_eq!(sim.get_instructions_executed(), 3);
    assert_eq!(sim.stats.stalls_data, 2, "load-use on F2");
    assert_eq!(
        sim.stats.stalls_unit, 3,
        "a latency-4 multiplier holds EX for latency - 1 extra cycles"
    );
    assert_eq!(sim.get_clock_cycles(), 12);
}

#[test]
fn unit_latency_one_behaves_like_the_integer_pipeline() {
    let sim = fp_context(1).load(FP_MULTIPLY).run();
    assert_eq!(sim.get_fp_register(3), 10.0);
    assert_eq!(sim.stats.stalls_unit, 0);
    assert_eq!(sim.get_clock_cycles(), 9);
}

#[test]
fn int_and_fp_registers_do_not_alias_in_flight() {
    // LW writes R2 while MULTS reads F2 one cycle later: no hazard.
    let sim = TestContext::new(1024, 0)
        .with_unit(UnitKind::Integer, 1, 1)
        .with_unit(UnitKind::Multiplier, 1, 1)
        .seed(0, 0)
        .seed_memory(0, 9)
        .load("LW R2 0(R0)\nMULTS F3 F2 F2\nEOP")
        .run();
    assert_eq!(sim.get_gp_register(2), 9);
    assert_eq!(sim.get_stalls(), 0);
}

#[test]
fn fp_store_writes_float_bits() {
    let sim = TestContext::new(1024, 0)
        .with_unit(UnitKind::Integer, 1, 1)
        .with_unit(UnitKind::Adder, 2, 1)
        .seed(0, 0)
        .seed_memory(0, 1.5f32.to_bits())
        .seed_memory(4, 0.75f32.to_bits())
        .load("LWS F1 0(R0)\nLWS F2 4(R0)\nADDS F3 F1 F2\nSWS F3 8(R0)\nEOP")
        .run();
    assert_eq!(sim.get_fp_register(3), 2.25);
    assert_eq!(sim.read_memory(8), 2.25f32.to_bits());
}

// ══════════════════════════════════════════════════════════
// 6. Termination, reset, and observability
// ══════════════════════════════════════════════════════════

#[test]
fn eop_alone_drains_the_pipeline() {
    let sim = TestContext::new(64, 0).load("EOP").run();
    assert_eq!(sim.get_clock_cycles(), 4, "EOP reaches writeback in 4 cycles");
    assert_eq!(sim.get_instructions_executed(), 0);
    assert_eq!(sim.get_stalls(), 0);
    assert_eq!(sim.get_ipc(), 0.0);
}

#[test]
fn run_zero_after_completion_is_a_no_op() {
    let mut sim = TestContext::new(1024, 0).seed(0, 0).load(ARITH).run();
    let cycles = sim.get_clock_cycles();
    sim.run(0);
    sim.run(5);
    assert_eq!(sim.get_clock_cycles(), cycles);
    assert!(sim.finished());
}

#[test]
fn bounded_run_stops_at_eop() {
    let mut ctx = TestContext::new(1024, 0).seed(0, 0).load(ARITH);
    ctx.sim.run(100);
    assert_eq!(ctx.sim.get_clock_cycles(), 9, "EOP halts a bounded run early");
}

#[test]
fn cycles_advance_one_per_tick() {
    let mut ctx = TestContext::new(1024, 0).seed(0, 0).load(ARITH);
    for expected in 1..=5 {
        ctx.sim.run(1);
        assert_eq!(ctx.sim.get_clock_cycles(), expected);
    }
    assert!(!ctx.sim.finished());
}

#[test]
fn stage_registers_mirror_the_latches_mid_flight() {
    let mut ctx = TestContext::new(1024, 0).seed(0, 0).load(ARITH);
    ctx.sim.run(3);
    let sim = &ctx.sim;

    // Cycle 3: first ADDI just executed, second just decoded, ADD fetched.
    assert_eq!(sim.get_sp_register(SpRegister::Pc, Stage::If), 12);
    assert_eq!(sim.get_sp_register(SpRegister::Npc, Stage::Id), 12);
    assert_eq!(
        sim.get_sp_register(SpRegister::Ir, Stage::Id),
        Opcode::Add.code()
    );
    assert_eq!(sim.get_sp_register(SpRegister::Npc, Stage::Ex), 8);
    assert_eq!(sim.get_sp_register(SpRegister::A, Stage::Ex), 0);
    assert_eq!(sim.get_sp_register(SpRegister::Imm, Stage::Ex), 7);
    assert_eq!(sim.get_sp_register(SpRegister::B, Stage::Ex), UNDEFINED);
    assert_eq!(sim.get_sp_register(SpRegister::AluOutput, Stage::Mem), 5);
    assert_eq!(sim.get_sp_register(SpRegister::Lmd, Stage::Id), UNDEFINED);
}

#[test]
fn program_counter_starts_at_the_base_address() {
    let mut sim = Simulator::new(64, 0);
    assert_eq!(sim.get_sp_register(SpRegister::Pc, Stage::If), UNDEFINED);
    sim.load_source("EOP", 0x100).unwrap();
    assert_eq!(sim.get_sp_register(SpRegister::Pc, Stage::If), 0x100);
}

#[test]
fn reset_restores_construction_state() {
    let mut sim = TestContext::new(256, 0).seed(0, 0).load(STORE_LOAD).run();
    sim.reset();

    for reg in 0..32 {
        assert_eq!(sim.get_gp_register(reg) as u32, UNDEFINED);
        assert_eq!(sim.get_fp_register(reg).to_bits(), UNDEFINED);
    }
    assert_eq!(sim.read_memory(0), 0xFFFF_FFFF);
    for stage in Stage::ALL {
        for reg in SpRegister::ALL {
            if reg == SpRegister::Ir {
                continue; // IR keeps its custom encoding and reads as NOP
            }
            assert_eq!(
                sim.get_sp_register(reg, stage),
                UNDEFINED,
                "{} at {} after reset",
                reg,
                stage
            );
        }
    }
    assert_eq!(sim.get_clock_cycles(), 0);
    assert_eq!(sim.get_instructions_executed(), 0);
    assert_eq!(sim.get_stalls(), 0);
    assert!(!sim.finished());
}

#[test]
fn unused_stage_registers_read_undefined() {
    let sim = TestContext::new(1024, 0).seed(0, 0).load(ARITH).run();
    assert_eq!(sim.get_sp_register(SpRegister::Lmd, Stage::If), UNDEFINED);
    assert_eq!(sim.get_sp_register(SpRegister::A, Stage::Mem), UNDEFINED);
    assert_eq!(sim.get_sp_register(SpRegister::Imm, Stage::Wb), UNDEFINED);
    assert_eq!(sim.get_sp_register(SpRegister::Pc, Stage::Wb), UNDEFINED);
}

#[test]
fn out_of_range_register_reads_are_silent() {
    let sim = Simulator::new(64, 0);
    assert_eq!(sim.get_gp_register(99), 0);
    assert_eq!(sim.get_fp_register(99), 0.0);
}
