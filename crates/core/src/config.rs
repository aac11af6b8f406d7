//! Configuration system for the pipeline simulator.
//!
//! This module defines the configuration structures used to parameterize a
//! [`Simulator`](crate::Simulator). It provides:
//! 1. **Defaults:** Baseline constants for memory size, latency, and units.
//! 2. **Structures:** Hierarchical config for general, memory, and
//!    functional-unit settings.
//!
//! Configuration is supplied as JSON (the CLI accepts a config file) or via
//! `SimConfig::default()`; there are no TOML files.
//!
//! # Examples
//!
//! ```
//! use dlx_core::config::SimConfig;
//!
//! let config = SimConfig::default();
//! assert_eq!(config.memory.size_bytes, 1024);
//! assert_eq!(config.memory.latency, 0);
//! assert!(config.units.is_empty());
//! ```

use serde::Deserialize;

use crate::core::units::UnitKind;

/// Default configuration constants.
mod defaults {
    /// Data memory size in bytes.
    pub const DATA_MEMORY_SIZE: usize = 1024;

    /// Data memory access latency in clock cycles.
    pub const DATA_MEMORY_LATENCY: u32 = 0;

    /// Base address programs are loaded at.
    pub const BASE_ADDRESS: u32 = 0;

    /// Functional unit latency in clock cycles.
    pub const UNIT_LATENCY: u32 = 1;

    /// Functional unit instances per configuration entry.
    pub const UNIT_INSTANCES: u32 = 1;
}

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct SimConfig {
    /// General simulation settings.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Data memory parameters.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Functional unit table; empty for the plain integer pipeline.
    #[serde(default)]
    pub units: Vec<UnitConfig>,
}

/// General simulation settings.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    /// Emit per-stage trace lines to stderr.
    #[serde(default)]
    pub trace: bool,

    /// Instruction base address programs are loaded at.
    #[serde(default = "GeneralConfig::default_base_address")]
    pub base_address: u32,
}

impl GeneralConfig {
    fn default_base_address() -> u32 {
        defaults::BASE_ADDRESS
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            trace: false,
            base_address: defaults::BASE_ADDRESS,
        }
    }
}

/// Data memory parameters.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Memory size in bytes.
    #[serde(default = "MemoryConfig::default_size")]
    pub size_bytes: usize,

    /// Access latency in clock cycles.
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u32,
}

impl MemoryConfig {
    fn default_size() -> usize {
        defaults::DATA_MEMORY_SIZE
    }

    fn default_latency() -> u32 {
        defaults::DATA_MEMORY_LATENCY
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::DATA_MEMORY_SIZE,
            latency: defaults::DATA_MEMORY_LATENCY,
        }
    }
}

/// One functional-unit configuration entry.
#[derive(Debug, Clone, Deserialize)]
pub struct UnitConfig {
    /// Unit class (`"INTEGER"`, `"ADDER"`, `"MULTIPLIER"`, `"DIVIDER"`).
    pub kind: UnitKind,

    /// Unit latency in clock cycles.
    #[serde(default = "UnitConfig::default_latency")]
    pub latency: u32,

    /// Number of units of this class to add.
    #[serde(default = "UnitConfig::default_instances")]
    pub instances: u32,
}

impl UnitConfig {
    fn default_latency() -> u32 {
        defaults::UNIT_LATENCY
    }

    fn default_instances() -> u32 {
        defaults::UNIT_INSTANCES
    }
}
