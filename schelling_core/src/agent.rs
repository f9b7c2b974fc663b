//! Agents - residents with a fixed type and a similarity preference.

use crate::grid::{moore_neighborhood, Grid, NEIGHBORHOOD_RADIUS};
use crate::types::{AgentType, NeighborCounts, Position};
use serde::Serialize;

/// Default similarity threshold (want 30%+ similar neighbors).
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.3;

/// Stable identifier of an agent within its population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AgentId(pub usize);

impl AgentId {
    /// Returns the index into the owning population.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

/// A resident of the grid.
///
/// Type and threshold are fixed at construction. The position is the only
/// mutable field and is written exclusively by the population's
/// grid-synchronized operations.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Agent {
    id: AgentId,
    kind: AgentType,
    /// Minimum fraction of occupied neighbors that must share `kind`
    threshold: f64,
    /// `None` until placed on a grid
    position: Option<Position>,
}

impl Agent {
    /// Creates an unplaced agent.
    pub fn new(id: AgentId, kind: AgentType, threshold: f64) -> Self {
        Self {
            id,
            kind,
            threshold,
            position: None,
        }
    }

    pub fn id(&self) -> AgentId {
        self.id
    }

    pub fn kind(&self) -> AgentType {
        self.kind
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn position(&self) -> Option<Position> {
        self.position
    }

    pub fn is_placed(&self) -> bool {
        self.position.is_some()
    }

    pub(crate) fn set_position(&mut self, position: Option<Position>) {
        self.position = position;
    }

    /// Toroidal Moore neighborhood of the agent's own position.
    ///
    /// Row-major offset order. Empty for an unplaced agent.
    pub fn neighbor_positions(&self, side: usize) -> Vec<Position> {
        match self.position {
            Some(pos) => moore_neighborhood(pos, NEIGHBORHOOD_RADIUS, side).collect(),
            None => Vec::new(),
        }
    }

    /// Tallies the agent's neighborhood on `grid`.
    pub fn neighbor_counts(&self, grid: &Grid) -> NeighborCounts {
        let mut counts = NeighborCounts::default();
        for pos in self.neighbor_positions(grid.side()) {
            counts.record(grid.occupant(pos));
        }
        counts
    }

    /// Same-type fraction among non-empty neighbors.
    ///
    /// `None` when the agent is unplaced or has no occupied neighbor.
    pub fn similarity(&self, grid: &Grid) -> Option<f64> {
        self.neighbor_counts(grid).similarity(self.kind)
    }

    /// Whether the neighborhood meets the agent's threshold.
    ///
    /// Empty cells do not count toward the denominator. An agent with no
    /// occupied neighbor is unhappy for every threshold, including 0.0.
    pub fn is_happy(&self, grid: &Grid) -> bool {
        self.accepts(self.similarity(grid))
    }

    /// Threshold test on an already computed similarity.
    ///
    /// A NaN threshold is never met.
    pub fn accepts(&self, similarity: Option<f64>) -> bool {
        similarity.is_some_and(|similarity| similarity >= self.threshold)
    }
}
