//! Pipeline simulator CLI.
//!
//! This binary provides a single entry point for running assembly programs
//! through the cycle-accurate pipeline model. It performs:
//! 1. **Configuration:** Defaults, a JSON config file, or command-line
//!    overrides for memory and functional units.
//! 2. **Execution:** Loads the program, runs to completion or for a fixed
//!    cycle budget, and prints the statistics report.
//! 3. **Inspection:** Optional register and memory dumps after the run.

use clap::{Parser, Subcommand};
use std::{fs, process};

use dlx_core::core::units::UnitKind;
use dlx_core::{SimConfig, Simulator};

#[derive(Parser, Debug)]
#[command(
    name = "dlxsim",
    version,
    about = "Cycle-accurate five-stage DLX pipeline simulator",
    long_about = "Run an assembly program through the pipeline model.\n\nExamples:\n  dlxsim run asm/no_dep.asm\n  dlxsim run asm/mem.asm --mem-latency 2 --registers\n  dlxsim run asm/fp.asm --unit MULTIPLIER:4 --unit INTEGER:1 --dump-memory 0:32"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run an assembly program.
    Run {
        /// Assembly source file.
        file: String,

        /// JSON configuration file (command-line flags override it).
        #[arg(long)]
        config: Option<String>,

        /// Data memory size in bytes.
        #[arg(long)]
        mem_size: Option<usize>,

        /// Data memory latency in clock cycles.
        #[arg(long)]
        mem_latency: Option<u32>,

        /// Cycles to simulate; 0 runs to completion.
        #[arg(long, default_value_t = 0)]
        cycles: u64,

        /// Functional unit spec KIND:LATENCY[:INSTANCES], repeatable.
        #[arg(long)]
        unit: Vec<String>,

        /// Emit per-stage trace lines to stderr.
        #[arg(long)]
        trace: bool,

        /// Print the register files after the run.
        #[arg(long)]
        registers: bool,

        /// Print a data memory range LO:HI after the run.
        #[arg(long)]
        dump_memory: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            file,
            config,
            mem_size,
            mem_latency,
            cycles,
            unit,
            trace,
            registers,
            dump_memory,
        } => cmd_run(
            file,
            config,
            mem_size,
            mem_latency,
            cycles,
            unit,
            trace,
            registers,
            dump_memory,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn cmd_run(
    file: String,
    config_path: Option<String>,
    mem_size: Option<usize>,
    mem_latency: Option<u32>,
    cycles: u64,
    unit_specs: Vec<String>,
    trace: bool,
    registers: bool,
    dump_memory: Option<String>,
) {
    let mut config = match config_path {
        Some(path) => load_config(&path),
        None => SimConfig::default(),
    };
    if let Some(size) = mem_size {
        config.memory.size_bytes = size;
    }
    if let Some(latency) = mem_latency {
        config.memory.latency = latency;
    }
    if trace {
        config.general.trace = true;
    }

    let mut sim = Simulator::from_config(&config);
    for spec in &unit_specs {
        let (kind, latency, instances) = parse_unit_spec(spec);
        sim.init_exec_unit(kind, latency, instances);
    }

    println!(
        "Configuration: memory {} bytes, latency {} cycles",
        config.memory.size_bytes, config.memory.latency
    );
    println!();

    sim.load_program(&file, config.general.base_address);
    sim.run(cycles);

    sim.stats.print();

    if registers {
        println!();
        sim.print_registers();
    }
    if let Some(range) = dump_memory {
        let (lo, hi) = parse_range(&range);
        println!();
        sim.print_memory(lo, hi);
    }
}

/// Reads a JSON [`SimConfig`], exiting with a diagnostic on failure.
fn load_config(path: &str) -> SimConfig {
    let text = fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("error: open file {} failed: {}", path, e);
        process::exit(1);
    });
    serde_json::from_str(&text).unwrap_or_else(|e| {
        eprintln!("error: {}: {}", path, e);
        process::exit(1);
    })
}

/// Parses `KIND:LATENCY[:INSTANCES]`, e.g. `MULTIPLIER:4` or `INTEGER:1:2`.
fn parse_unit_spec(spec: &str) -> (UnitKind, u32, u32) {
    try_parse_unit_spec(spec).unwrap_or_else(|| {
        eprintln!(
            "error: bad unit spec '{}', expected KIND:LATENCY[:INSTANCES]",
            spec
        );
        process::exit(1);
    })
}

fn try_parse_unit_spec(spec: &str) -> Option<(UnitKind, u32, u32)> {
    let mut parts = spec.split(':');
    let kind = match parts.next()? {
        "INTEGER" => UnitKind::Integer,
        "ADDER" => UnitKind::Adder,
        "MULTIPLIER" => UnitKind::Multiplier,
        "DIVIDER" => UnitKind::Divider,
        _ => return None,
    };
    let latency = parts.next()?.parse().ok()?;
    let instances = match parts.next() {
        Some(s) => s.parse().ok()?,
        None => 1,
    };
    if parts.next().is_some() {
        return None;
    }
    Some((kind, latency, instances))
}

/// Parses `LO:HI` as a memory range, decimal or `0x`-prefixed hex.
fn parse_range(range: &str) -> (u32, u32) {
    let parse = |s: &str| -> Option<u32> {
        if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
            u32::from_str_radix(hex, 16).ok()
        } else {
            s.parse().ok()
        }
    };
    range
        .split_once(':')
        .and_then(|(lo, hi)| Some((parse(lo)?, parse(hi)?)))
        .unwrap_or_else(|| {
            eprintln!("error: bad memory range '{}', expected LO:HI", range);
            process::exit(1);
        })
}
