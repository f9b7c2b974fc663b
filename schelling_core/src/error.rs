//! Error types for the Schelling simulation core.

use crate::types::Position;
use thiserror::Error;

/// Errors raised by grid mutation and random placement.
///
/// Neither is retried internally: the offending call aborts and the grid
/// keeps the state it had before that call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimError {
    /// Target cell of a placement or move already holds an occupant.
    #[error("Cell ({x}, {y}) is already occupied")]
    OccupiedCell { x: usize, y: usize },

    /// Agent ID outside the population it was handed to.
    #[error("Unknown agent #{id} in a population of {len}")]
    UnknownAgent { id: usize, len: usize },

    /// More agents than empty cells were handed to random placement.
    #[error("Not enough empty cells ({empty_cells}) for {agents} agents")]
    Capacity { agents: usize, empty_cells: usize },
}

impl SimError {
    /// Creates an occupied-cell error for `pos`.
    pub fn occupied(pos: Position) -> Self {
        Self::OccupiedCell { x: pos.x, y: pos.y }
    }

    /// Creates a capacity error.
    pub fn capacity(agents: usize, empty_cells: usize) -> Self {
        Self::Capacity { agents, empty_cells }
    }
}
