use crate::core::pipeline::hazards::{self, LatchSnapshot};
use crate::core::pipeline::latches::PipelineLatch;
use crate::core::Simulator;
use crate::isa::Opcode;

pub fn decode_stage(sim: &mut Simulator, latches: &LatchSnapshot) {
    if sim.memory_stall || sim.ex_stall {
        return;
    }

    if sim.stalls == 0 {
        if let Some(stall) = hazards::assess(&sim.if_id.ir, latches) {
            sim.stalls = stall.cycles;
            sim.stall_set_cycle = sim.stats.cycles;
            sim.stall_freeze_offset = 0;
            sim.branch_stall = stall.branch;
            if sim.trace {
                eprintln!(
                    "ID  hazard op={} stall={} branch={}",
                    sim.if_id.ir.opcode, stall.cycles, stall.branch
                );
            }
        }
    } else if sim.stats.cycles >= sim.stall_set_cycle + sim.stalls + sim.stall_freeze_offset {
        if sim.branch_stall {
            sim.stats.stalls_control += sim.stalls;
        } else {
            sim.stats.stalls_data += sim.stalls;
        }
        sim.stalls = 0;
        sim.branch_stall = false;
        // The instruction that waited out a data stall may itself be a
        // branch; its control stall starts the moment it can decode.
        if sim.if_id.ir.opcode.is_branch() {
            sim.stalls = 2;
            sim.stall_set_cycle = sim.stats.cycles;
            sim.stall_freeze_offset = 0;
            sim.branch_stall = true;
        }
    }

    if sim.stalls > 0 && !sim.branch_stall {
        sim.id_ex = PipelineLatch::bubble();
        return;
    }

    let ir = sim.if_id.ir.clone();
    let mut latch = PipelineLatch::bubble();

    match ir.opcode {
        Opcode::Add | Opcode::Sub | Opcode::Xor => {
            latch.a = sim.gpr.read(ir.src1);
            latch.b = sim.gpr.read(ir.src2);
        }
        Opcode::Addi | Opcode::Subi | Opcode::Lw | Opcode::Lws => {
            latch.a = sim.gpr.read(ir.src1);
            latch.imm = ir.immediate;
        }
        Opcode::Sw => {
            // The register to store occupies src1 syntactically but is
            // consumed as data: it travels in B, the base address in A.
            latch.a = sim.gpr.read(ir.src2);
            latch.b = sim.gpr.read(ir.src1);
            latch.imm = ir.immediate;
        }
        Opcode::Sws => {
            latch.a = sim.gpr.read(ir.src2);
            latch.b = sim.fpr.read_bits(ir.src1);
            latch.imm = ir.immediate;
        }
        Opcode::Adds | Opcode::Subs | Opcode::Mults | Opcode::Divs => {
            latch.a = sim.fpr.read_bits(ir.src1);
            latch.b = sim.fpr.read_bits(ir.src2);
        }
        Opcode::Beqz
        | Opcode::Bnez
        | Opcode::Bltz
        | Opcode::Bgtz
        | Opcode::Blez
        | Opcode::Bgez => {
            latch.a = sim.gpr.read(ir.src1);
            latch.imm = ir.immediate;
        }
        Opcode::Jump => {
            latch.imm = ir.immediate;
        }
        Opcode::Nop | Opcode::Eop => {}
    }

    if ir.opcode != Opcode::Nop {
        latch.npc = sim.if_id.npc;
    }

    if sim.trace && ir.opcode != Opcode::Nop {
        eprintln!(
            "ID  op={} a={:#010x} b={:#010x} imm={:#010x}",
            ir.opcode, latch.a, latch.b, latch.imm
        );
    }

    latch.ir = ir;
    sim.id_ex = latch;
}
