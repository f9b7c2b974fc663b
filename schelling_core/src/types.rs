//! Common value types shared by the grid, agents and metrics.

use serde::Serialize;

/// The two resident types of the model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum AgentType {
    /// Type A residents (rendered red by most front ends)
    A,
    /// Type B residents (rendered blue by most front ends)
    B,
}

impl AgentType {
    /// Returns the opposite type.
    pub fn other(self) -> Self {
        match self {
            AgentType::A => AgentType::B,
            AgentType::B => AgentType::A,
        }
    }

    /// Single-character glyph used by the text rendering.
    pub fn glyph(self) -> char {
        match self {
            AgentType::A => 'A',
            AgentType::B => 'B',
        }
    }
}

impl std::fmt::Display for AgentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AgentType::A => write!(f, "type_a"),
            AgentType::B => write!(f, "type_b"),
        }
    }
}

/// A cell coordinate on the lattice.
///
/// Ordering is by `x`, then `y`, which is the scan order of
/// [`Grid::empty_cells`](crate::Grid::empty_cells).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Reduces both coordinates modulo `side` (toroidal wraparound).
    pub fn wrapped(self, side: usize) -> Self {
        Self {
            x: self.x % side,
            y: self.y % side,
        }
    }

    /// Applies a signed offset with wraparound on a `side`-sized torus.
    pub fn offset(self, dx: i64, dy: i64, side: usize) -> Self {
        let n = side as i64;
        Self {
            x: (self.x as i64 + dx).rem_euclid(n) as usize,
            y: (self.y as i64 + dy).rem_euclid(n) as usize,
        }
    }
}

impl From<(usize, usize)> for Position {
    fn from((x, y): (usize, usize)) -> Self {
        Self { x, y }
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Three-way tally of a neighborhood.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NeighborCounts {
    pub type_a: usize,
    pub type_b: usize,
    pub empty: usize,
}

impl NeighborCounts {
    /// Adds one cell's occupant to the tally.
    pub fn record(&mut self, occupant: Option<AgentType>) {
        match occupant {
            Some(AgentType::A) => self.type_a += 1,
            Some(AgentType::B) => self.type_b += 1,
            None => self.empty += 1,
        }
    }

    /// Number of non-empty neighbor cells.
    pub fn occupied(&self) -> usize {
        self.type_a + self.type_b
    }

    /// Number of neighbors sharing `kind`.
    pub fn same_as(&self, kind: AgentType) -> usize {
        match kind {
            AgentType::A => self.type_a,
            AgentType::B => self.type_b,
        }
    }

    /// Total cells inspected.
    pub fn total(&self) -> usize {
        self.occupied() + self.empty
    }

    /// Fraction of non-empty neighbors sharing `kind`.
    ///
    /// Empty cells are ignored entirely. Returns `None` when no neighbor
    /// is occupied.
    pub fn similarity(&self, kind: AgentType) -> Option<f64> {
        match self.occupied() {
            0 => None,
            occupied => Some(self.same_as(kind) as f64 / occupied as f64),
        }
    }
}

/// Agent totals per type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeCounts {
    pub type_a: usize,
    pub type_b: usize,
}

impl TypeCounts {
    pub fn total(&self) -> usize {
        self.type_a + self.type_b
    }
}
