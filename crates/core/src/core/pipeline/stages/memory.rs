use crate::core::pipeline::latches::PipelineLatch;
use crate::core::Simulator;
use crate::isa::Opcode;

pub fn memory_stage(sim: &mut Simulator) {
    let opcode = sim.ex_mem.ir.opcode;
    let latency = sim.data_memory.latency();

    if latency > 0 && opcode.is_mem_access() {
        if sim.mem_wait < latency {
            sim.memory_stall = true;
            sim.mem_wait += 1;
            sim.stats.stalls_memory += 1;
            // A pending decode stall must wait out the freeze as well.
            if sim.stalls > 0 {
                sim.stall_freeze_offset += 1;
            }
            if sim.trace {
                eprintln!("MEM op={} wait {}/{}", opcode, sim.mem_wait, latency);
            }
            return;
        }
        sim.memory_stall = false;
        sim.mem_wait = 0;
    }

    let input = sim.ex_mem.clone();
    let mut latch = PipelineLatch::bubble();
    latch.cond = input.cond;

    match opcode {
        Opcode::Lw | Opcode::Lws => {
            latch.lmd = sim.data_memory.read_word(input.alu_output);
            if sim.trace {
                eprintln!("MEM load [{:#010x}] -> {:#010x}", input.alu_output, latch.lmd);
            }
        }
        Opcode::Sw | Opcode::Sws => {
            sim.data_memory.write_word(input.alu_output, input.b);
            if sim.trace {
                eprintln!("MEM store [{:#010x}] <- {:#010x}", input.alu_output, input.b);
            }
        }
        _ => {
            latch.alu_output = input.alu_output;
        }
    }

    latch.ir = input.ir;
    sim.mem_wb = latch;
}
