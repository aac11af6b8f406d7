//! Simulator core: architectural state, pipeline latches, and cycle driver.
//!
//! This module owns the whole machine:
//! 1. **State:** Instruction/data memory, register files, latches, and the
//!    functional-unit table.
//! 2. **Cycle Driver:** `tick` advances writeback, memory, execute, decode,
//!    and fetch in reverse pipeline order every clock cycle.
//! 3. **Hazard Bookkeeping:** Pending-stall counters, branch-target latch,
//!    memory-latency countdown, and end-of-program detection.
//! 4. **Observability:** The stage-register, register-file, and counter
//!    accessors the test harness inspects.

use std::collections::HashMap;

/// Architectural register files.
pub mod arch;
/// Data memory.
pub mod memory;
/// Latches, hazard unit, and stage functions.
pub mod pipeline;
/// Functional units and ALU.
pub mod units;

use crate::common::constants::{NUM_FP_REGISTERS, NUM_GP_REGISTERS, UNDEFINED};
use crate::common::error::AsmError;
use crate::config::SimConfig;
use crate::isa::instruction::Instruction;
use crate::isa::{Opcode, SpRegister, Stage};
use crate::sim::loader::{self, Program};
use crate::stats::SimStats;
use arch::{Fpr, Gpr};
use memory::DataMemory;
use pipeline::hazards::LatchSnapshot;
use pipeline::latches::PipelineLatch;
use pipeline::stages;
use units::{UnitKind, UnitPool};

/// Cycle-accurate five-stage pipeline simulator.
///
/// A `Simulator` is a closed, deterministic state machine: construct it,
/// load a program, call [`run`](Simulator::run), then inspect registers,
/// memory, and counters. `reset` returns it to its construction-time state.
pub struct Simulator {
    pub(crate) instr_memory: Vec<Instruction>,
    pub(crate) labels: HashMap<String, usize>,
    pub(crate) instr_base_address: u32,
    pub(crate) data_memory: DataMemory,
    pub(crate) gpr: Gpr,
    pub(crate) fpr: Fpr,
    pub(crate) units: UnitPool,

    pub(crate) if_id: PipelineLatch,
    pub(crate) id_ex: PipelineLatch,
    pub(crate) ex_mem: PipelineLatch,
    pub(crate) mem_wb: PipelineLatch,

    pub(crate) pc: u32,
    pub(crate) inst_index: usize,

    // Pending hazard stall: size, the cycle it was raised, and how many
    // cycles the pipeline has been frozen by memory since.
    pub(crate) stalls: u64,
    pub(crate) stall_set_cycle: u64,
    pub(crate) stall_freeze_offset: u64,
    pub(crate) branch_stall: bool,

    pub(crate) branch_target: Option<String>,
    pub(crate) no_branches: bool,

    pub(crate) memory_stall: bool,
    pub(crate) mem_wait: u32,

    pub(crate) ex_stall: bool,
    pub(crate) ex_inflight: Option<usize>,

    done: bool,

    /// Per-stage trace output on stderr.
    pub trace: bool,
    /// Cycle, instruction, and stall counters.
    pub stats: SimStats,
}

impl Simulator {
    /// Creates a simulator with a data memory of `data_memory_size` bytes
    /// and `data_memory_latency` cycles of access latency.
    ///
    /// Registers start undefined, data memory starts as all `0xFF`, and the
    /// pipeline starts full of bubbles.
    pub fn new(data_memory_size: usize, data_memory_latency: u32) -> Self {
        Self {
            instr_memory: Vec::new(),
            labels: HashMap::new(),
            instr_base_address: 0,
            data_memory: DataMemory::new(data_memory_size, data_memory_latency),
            gpr: Gpr::new(),
            fpr: Fpr::new(),
            units: UnitPool::default(),
            if_id: PipelineLatch::bubble(),
            id_ex: PipelineLatch::bubble(),
            ex_mem: PipelineLatch::bubble(),
            mem_wb: PipelineLatch::bubble(),
            pc: UNDEFINED,
            inst_index: 0,
            stalls: 0,
            stall_set_cycle: 0,
            stall_freeze_offset: 0,
            branch_stall: false,
            branch_target: None,
            no_branches: true,
            memory_stall: false,
            mem_wait: 0,
            ex_stall: false,
            ex_inflight: None,
            done: false,
            trace: false,
            stats: SimStats::default(),
        }
    }

    /// Builds a simulator from a full configuration.
    pub fn from_config(config: &SimConfig) -> Self {
        let mut sim = Self::new(config.memory.size_bytes, config.memory.latency);
        for unit in &config.units {
            sim.init_exec_unit(unit.kind, unit.latency, unit.instances);
        }
        sim.trace = config.general.trace;
        sim
    }

    /// Adds `instances` execution units of the given class and latency.
    ///
    /// Call before [`load_program`](Simulator::load_program). With no units
    /// configured every operation executes in one cycle.
    pub fn init_exec_unit(&mut self, kind: UnitKind, latency: u32, instances: u32) {
        self.units.configure(kind, latency, instances);
    }

    /// Loads the assembly program in `path` at `base_address`.
    ///
    /// Parse and file errors are reported to stderr and terminate the
    /// process; the program text is the source of truth.
    pub fn load_program(&mut self, path: &str, base_address: u32) {
        let program = loader::load_file(path);
        self.install(program, base_address);
    }

    /// Loads a program from in-memory assembly source.
    pub fn load_source(&mut self, source: &str, base_address: u32) -> Result<(), AsmError> {
        let program = loader::parse_program(source)?;
        self.install(program, base_address);
        Ok(())
    }

    fn install(&mut self, program: Program, base_address: u32) {
        self.instr_memory = program.instructions;
        self.labels = program.labels;
        self.instr_base_address = base_address;
        self.pc = base_address;
        self.inst_index = 0;
    }

    /// Runs for `cycles` clock cycles, or to completion when `cycles` is 0.
    ///
    /// The program is complete once a committed `EOP` reaches writeback with
    /// no branch in flight; further calls are no-ops.
    pub fn run(&mut self, cycles: u64) {
        if cycles == 0 {
            while !self.done {
                self.tick();
            }
        } else {
            for _ in 0..cycles {
                if self.done {
                    break;
                }
                self.tick();
            }
        }
    }

    /// Advances the simulator by one clock cycle.
    pub fn tick(&mut self) {
        if self.done {
            return;
        }
        self.stats.cycles += 1;

        // The hazard unit judges against the latch contents as they stood
        // at the start of the cycle, not the values stages write this cycle.
        let snapshot = LatchSnapshot {
            id_ex: self.id_ex.ir.clone(),
            ex_mem: self.ex_mem.ir.clone(),
            mem_wb: self.mem_wb.ir.clone(),
        };

        stages::writeback_stage(self);
        stages::memory_stage(self);
        stages::execute_stage(self);
        stages::decode_stage(self, &snapshot);
        stages::fetch_stage(self);

        self.units.decrement_busy();

        if self.mem_wb.ir.opcode == Opcode::Eop && self.no_branches {
            if self.trace {
                eprintln!("--- end of program at cycle {} ---", self.stats.cycles);
            }
            self.done = true;
        }
    }

    /// True once the loaded program has run to completion.
    pub fn finished(&self) -> bool {
        self.done
    }

    /// Resets the simulator to its construction-time state.
    ///
    /// Registers return to the undefined sentinel, data memory to `0xFF`,
    /// latches to bubbles; the program, label map, and all counters are
    /// cleared. Configured execution units survive with their busy
    /// countdowns cleared.
    pub fn reset(&mut self) {
        self.instr_memory.clear();
        self.labels.clear();
        self.instr_base_address = 0;
        self.data_memory.reset();
        self.gpr.reset();
        self.fpr.reset();
        self.units.clear_busy();
        self.if_id = PipelineLatch::bubble();
        self.id_ex = PipelineLatch::bubble();
        self.ex_mem = PipelineLatch::bubble();
        self.mem_wb = PipelineLatch::bubble();
        self.pc = UNDEFINED;
        self.inst_index = 0;
        self.stalls = 0;
        self.stall_set_cycle = 0;
        self.stall_freeze_offset = 0;
        self.branch_stall = false;
        self.branch_target = None;
        self.no_branches = true;
        self.memory_stall = false;
        self.mem_wait = 0;
        self.ex_stall = false;
        self.ex_inflight = None;
        self.done = false;
        self.stats = SimStats::default();
    }

    /// Value of the named special register at the entrance of `stage`, or
    /// the undefined sentinel if that stage does not use the field.
    ///
    /// `IR` reads back as the opcode's raw code; the remaining fields mirror
    /// the latch outputs of the classical pipeline diagram.
    pub fn get_sp_register(&self, reg: SpRegister, stage: Stage) -> u32 {
        match stage {
            Stage::If => match reg {
                SpRegister::Pc => self.pc,
                _ => UNDEFINED,
            },
            Stage::Id => match reg {
                SpRegister::Npc => self.if_id.npc,
                SpRegister::Ir => self.if_id.ir.opcode.code(),
                _ => UNDEFINED,
            },
            Stage::Ex => match reg {
                SpRegister::Npc => self.id_ex.npc,
                SpRegister::A => self.id_ex.a,
                SpRegister::B => self.id_ex.b,
                SpRegister::Imm => self.id_ex.imm,
                SpRegister::Ir => self.id_ex.ir.opcode.code(),
                _ => UNDEFINED,
            },
            Stage::Mem => match reg {
                SpRegister::AluOutput => self.ex_mem.alu_output,
                SpRegister::B => self.ex_mem.b,
                SpRegister::Cond => self.ex_mem.cond,
                SpRegister::Ir => self.ex_mem.ir.opcode.code(),
                _ => UNDEFINED,
            },
            Stage::Wb => match reg {
                SpRegister::AluOutput => self.mem_wb.alu_output,
                SpRegister::Lmd => self.mem_wb.lmd,
                SpRegister::Cond => self.mem_wb.cond,
                SpRegister::Ir => self.mem_wb.ir.opcode.code(),
                _ => UNDEFINED,
            },
        }
    }

    /// Value of an integer general-purpose register; zero when out of range.
    pub fn get_gp_register(&self, reg: usize) -> i32 {
        if reg < NUM_GP_REGISTERS {
            self.gpr.read(reg) as i32
        } else {
            0
        }
    }

    /// Seeds an integer general-purpose register.
    pub fn set_gp_register(&mut self, reg: usize, value: i32) {
        self.gpr.write(reg, value as u32);
    }

    /// Alias of [`get_gp_register`](Simulator::get_gp_register).
    pub fn get_int_register(&self, reg: usize) -> i32 {
        self.get_gp_register(reg)
    }

    /// Alias of [`set_gp_register`](Simulator::set_gp_register).
    pub fn set_int_register(&mut self, reg: usize, value: i32) {
        self.set_gp_register(reg, value);
    }

    /// Value of a floating-point register; zero when out of range.
    pub fn get_fp_register(&self, reg: usize) -> f32 {
        self.fpr.read_f32(reg)
    }

    /// Seeds a floating-point register.
    pub fn set_fp_register(&mut self, reg: usize, value: f32) {
        self.fpr.write_f32(reg, value);
    }

    /// Clock cycles simulated so far.
    pub fn get_clock_cycles(&self) -> u64 {
        self.stats.cycles
    }

    /// Non-`EOP` instructions fetched into the pipeline.
    pub fn get_instructions_executed(&self) -> u64 {
        self.stats.instructions
    }

    /// Total stall cycles inserted (data, control, memory, and unit waits).
    pub fn get_stalls(&self) -> u64 {
        self.stats.total_stalls()
    }

    /// Instructions per cycle.
    pub fn get_ipc(&self) -> f32 {
        self.stats.ipc()
    }

    /// Writes a little-endian word to data memory. Test hook.
    pub fn write_memory(&mut self, address: u32, value: u32) {
        self.data_memory.write_word(address, value);
    }

    /// Reads a little-endian word from data memory. Test hook.
    pub fn read_memory(&self, address: u32) -> u32 {
        self.data_memory.read_word(address)
    }

    /// Prints data memory in `[start, end)` to stdout.
    pub fn print_memory(&self, start: u32, end: u32) {
        self.data_memory.print_range(start, end);
    }

    /// Prints every defined special-purpose and architectural register.
    pub fn print_registers(&self) {
        println!("Special purpose registers:");
        for stage in Stage::ALL {
            println!("Stage: {}", stage);
            for reg in SpRegister::ALL {
                if matches!(reg, SpRegister::Ir | SpRegister::Cond) {
                    continue;
                }
                let value = self.get_sp_register(reg, stage);
                if value != UNDEFINED {
                    println!("{} = {} / {:#x}", reg, value, value);
                }
            }
        }
        println!("General purpose registers:");
        for i in 0..NUM_GP_REGISTERS {
            let value = self.gpr.read(i);
            if value != UNDEFINED {
                println!("R{} = {} / {:#x}", i, value as i32, value);
            }
        }
        let defined: Vec<usize> = (0..NUM_FP_REGISTERS)
            .filter(|&i| self.fpr.read_bits(i) != UNDEFINED)
            .collect();
        if !defined.is_empty() {
            println!("Floating point registers:");
            for i in defined {
                println!("F{} = {} / {:#x}", i, self.fpr.read_f32(i), self.fpr.read_bits(i));
            }
        }
    }
}
