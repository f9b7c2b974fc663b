//! Error types for the simulation harness.

use schelling_core::SimError;
use thiserror::Error;

/// Configuration values outside their documented ranges.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Grid side must be positive
    #[error("Grid size must be positive")]
    ZeroGridSize,

    /// N * N does not fit in the address space
    #[error("Grid size {0} has more cells than can be addressed")]
    GridTooLarge(usize),

    /// Agent total overflows
    #[error("Agent counts {count_a} + {count_b} overflow")]
    AgentCountOverflow { count_a: usize, count_b: usize },

    /// More agents than cells
    #[error("{agents} agents do not fit on a grid of {cells} cells")]
    TooManyAgents { agents: usize, cells: usize },

    /// Threshold outside [0, 1]
    #[error("Similarity threshold {0} is outside [0, 1]")]
    ThresholdOutOfRange(f64),
}

/// Anything that can stop a harness run.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Simulation error: {0}")]
    Sim(#[from] SimError),

    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}
