//! Cycle-accurate five-stage DLX pipeline simulator library.
//!
//! This crate implements a classical in-order pipelined processor model with
//! the following:
//! 1. **Core:** Pipeline (fetch, decode, execute, memory, writeback),
//!    integer/FP register files, and hazard detection.
//! 2. **Timing:** Configurable data-memory latency and multi-cycle
//!    functional units with busy tracking.
//! 3. **ISA:** A small DLX-style instruction set with a single-precision
//!    floating-point extension.
//! 4. **Simulation:** Assembly loader, configuration, statistics, and an
//!    observability interface over the stage-entrance latches.

/// Common types and constants (sentinel, sizes, errors).
pub mod common;
/// Simulator configuration (defaults and hierarchical config structures).
pub mod config;
/// Simulator core (pipeline, register files, memory, units).
pub mod core;
/// Instruction set (opcodes, stages, special registers, instructions).
pub mod isa;
/// Assembly loader.
pub mod sim;
/// Statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `SimConfig::default()` or deserialize from JSON.
pub use crate::config::SimConfig;
/// Main simulator type; construct with `Simulator::new` or `Simulator::from_config`.
pub use crate::core::Simulator;
