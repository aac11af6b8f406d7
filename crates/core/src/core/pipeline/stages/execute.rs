use crate::core::pipeline::latches::PipelineLatch;
use crate::core::units;
use crate::core::units::alu::{alu, branch_taken};
use crate::core::Simulator;
use crate::isa::Opcode;

fn squashed() -> PipelineLatch {
    PipelineLatch {
        alu_output: 0,
        ..PipelineLatch::bubble()
    }
}

pub fn execute_stage(sim: &mut Simulator) {
    if sim.memory_stall {
        return;
    }

    // A multi-cycle unit occupies the stage until its countdown reaches
    // one; each waiting cycle sends a bubble downstream.
    if let Some(index) = sim.ex_inflight {
        if sim.units.busy(index) > 1 {
            sim.ex_mem = squashed();
            sim.stats.stalls_unit += 1;
            return;
        }
        sim.ex_inflight = None;
        sim.ex_stall = false;
        complete(sim);
        return;
    }

    match sim.id_ex.ir.opcode {
        Opcode::Nop => {
            sim.ex_mem = squashed();
            sim.no_branches = true;
            return;
        }
        Opcode::Eop => {
            let mut latch = PipelineLatch::bubble();
            latch.ir = sim.id_ex.ir.clone();
            sim.ex_mem = latch;
            sim.no_branches = true;
            return;
        }
        _ => {}
    }

    if !sim.units.is_empty() {
        if let Some(kind) = units::unit_for(sim.id_ex.ir.opcode) {
            match sim.units.find_free(kind) {
                None => {
                    sim.ex_stall = true;
                    sim.ex_mem = squashed();
                    sim.stats.stalls_unit += 1;
                    return;
                }
                Some(index) => {
                    sim.units.issue(index, sim.id_ex.ir.clone());
                    if sim.units.latency(index) > 1 {
                        if sim.trace {
                            eprintln!(
                                "EX  op={} occupies {} for {} cycles",
                                sim.id_ex.ir.opcode,
                                kind,
                                sim.units.latency(index)
                            );
                        }
                        sim.ex_inflight = Some(index);
                        sim.ex_stall = true;
                        sim.ex_mem = squashed();
                        sim.stats.stalls_unit += 1;
                        return;
                    }
                }
            }
        }
    }

    complete(sim);
}

fn complete(sim: &mut Simulator) {
    let input = sim.id_ex.clone();
    let opcode = input.ir.opcode;
    let output = alu(opcode, input.a, input.b, input.imm, input.npc);

    let mut latch = PipelineLatch::bubble();
    latch.b = input.b;
    latch.alu_output = output;

    if opcode.is_branch() {
        let taken = branch_taken(opcode, input.a);
        latch.cond = taken as u32;
        if taken {
            sim.branch_target = Some(input.ir.label.clone());
            sim.no_branches = false;
        } else {
            sim.branch_target = None;
            sim.no_branches = true;
        }
        if sim.trace {
            eprintln!("EX  op={} taken={}", opcode, taken);
        }
    } else {
        sim.no_branches = true;
        if sim.trace {
            eprintln!("EX  op={} alu={:#010x}", opcode, output);
        }
    }

    latch.ir = input.ir;
    sim.ex_stall = false;
    sim.ex_mem = latch;
}
