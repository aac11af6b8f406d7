use crate::core::pipeline::latches::PipelineLatch;
use crate::core::Simulator;
use crate::isa::instruction::Instruction;
use crate::isa::Opcode;

pub fn fetch_stage(sim: &mut Simulator) {
    if sim.memory_stall || sim.ex_stall {
        return;
    }

    if sim.stalls > 0 {
        // Branch stall squashes the slot behind the branch; a data stall
        // just holds the fetched instruction in place.
        if sim.branch_stall {
            sim.if_id = PipelineLatch::bubble();
        }
        return;
    }

    if let Some(label) = sim.branch_target.take() {
        if let Some(&target) = sim.labels.get(&label) {
            if sim.trace {
                eprintln!("IF  redirect -> {} (idx={})", label, target);
            }
            sim.inst_index = target;
        }
    }

    let ir = sim
        .instr_memory
        .get(sim.inst_index)
        .cloned()
        .unwrap_or_else(Instruction::end_of_program);

    if sim.trace {
        eprintln!("IF  idx={} op={}", sim.inst_index, ir.opcode);
    }

    let opcode = ir.opcode;
    let mut latch = PipelineLatch::bubble();
    latch.ir = ir;

    if opcode == Opcode::Eop {
        // EOP neither advances the PC nor counts as an instruction.
        latch.npc = sim.if_id.npc;
    } else {
        sim.pc = sim
            .instr_base_address
            .wrapping_add(4 * (sim.inst_index as u32 + 1));
        latch.npc = sim.pc;
        sim.inst_index += 1;
        sim.stats.instructions += 1;
    }

    sim.if_id = latch;
}
