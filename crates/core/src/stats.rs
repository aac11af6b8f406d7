//! Simulation statistics collection and reporting.
//!
//! This module tracks performance counters for the simulator:
//! 1. **Cycle and IPC:** Total cycles, fetched instructions, and the
//!    derived instructions-per-cycle figure.
//! 2. **Stalls:** Bubble counts broken out by cause (data hazard, control
//!    hazard, memory wait, functional-unit wait).

/// Simulation counters.
///
/// `instructions` counts non-`EOP` instructions fetched into the pipeline;
/// under assume-not-taken speculation squashed slots are never fetched, so
/// for a completed run this equals the committed count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimStats {
    /// Clock cycles simulated.
    pub cycles: u64,
    /// Instructions fetched (excluding `EOP`).
    pub instructions: u64,
    /// Bubbles inserted for read-after-write hazards.
    pub stalls_data: u64,
    /// Bubbles inserted behind branches.
    pub stalls_control: u64,
    /// Cycles a load or store held the memory stage.
    pub stalls_memory: u64,
    /// Cycles a multi-cycle functional unit held the execute stage.
    pub stalls_unit: u64,
}

impl SimStats {
    /// Total stall cycles across all causes.
    pub fn total_stalls(&self) -> u64 {
        self.stalls_data + self.stalls_control + self.stalls_memory + self.stalls_unit
    }

    /// Instructions per cycle.
    pub fn ipc(&self) -> f32 {
        let cycles = if self.cycles == 0 { 1 } else { self.cycles };
        self.instructions as f32 / cycles as f32
    }

    /// Prints the statistics report to stdout.
    pub fn print(&self) {
        let cycles = if self.cycles == 0 { 1 } else { self.cycles };
        let pct = |n: u64| (n as f64 / cycles as f64) * 100.0;
        println!("==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts                {}", self.instructions);
        println!("sim_ipc                  {:.4}", self.ipc());
        println!("----------------------------------------------------------");
        println!("STALL BREAKDOWN");
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            pct(self.stalls_data)
        );
        println!(
            "  stalls.control         {} ({:.2}%)",
            self.stalls_control,
            pct(self.stalls_control)
        );
        println!(
            "  stalls.memory          {} ({:.2}%)",
            self.stalls_memory,
            pct(self.stalls_memory)
        );
        println!(
            "  stalls.unit            {} ({:.2}%)",
            self.stalls_unit,
            pct(self.stalls_unit)
        );
        println!(
            "  stalls.total           {} ({:.2}%)",
            self.total_stalls(),
            pct(self.total_stalls())
        );
        println!("==========================================================");
    }
}
