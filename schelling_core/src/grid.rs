//! The occupancy lattice.
//!
//! A square torus of side `N` where every cell is empty or tagged with one
//! [`AgentType`]. The grid owns only the tags; agent objects live in the
//! [`Population`](crate::Population), which keeps its position fields in
//! sync through the grid's mutation operations.

use crate::error::SimError;
use crate::types::{AgentType, NeighborCounts, Position};

/// Default lattice side length.
pub const DEFAULT_GRID_SIZE: usize = 50;

/// Moore neighborhood radius (8 neighbors).
pub const NEIGHBORHOOD_RADIUS: usize = 1;

/// Enumerates the toroidal Moore neighborhood of `center`.
///
/// Yields every cell within Chebyshev distance `radius`, excluding the
/// center itself, in row-major offset order (`dx` outer, `dy` inner).
/// Coordinates wrap modulo `side`, so cells on the board edge get a full
/// neighborhood. Cells are distinct as long as `side > 2 * radius`.
pub fn moore_neighborhood(
    center: Position,
    radius: usize,
    side: usize,
) -> impl Iterator<Item = Position> {
    let r = radius as i64;
    (-r..=r)
        .flat_map(move |dx| (-r..=r).map(move |dy| (dx, dy)))
        .filter(|&(dx, dy)| dx != 0 || dy != 0)
        .map(move |(dx, dy)| center.offset(dx, dy, side))
}

/// Square toroidal occupancy grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    /// Side length N
    side: usize,

    /// Row-major cells, index = x * side + y
    cells: Vec<Option<AgentType>>,
}

impl Grid {
    /// Creates an empty `side` x `side` grid.
    ///
    /// # Panics
    /// Panics if `side` is zero.
    pub fn new(side: usize) -> Self {
        assert!(side > 0, "grid side must be positive");
        Self {
            side,
            cells: vec![None; side * side],
        }
    }

    /// Returns the side length N.
    pub fn side(&self) -> usize {
        self.side
    }

    /// Returns N².
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    fn index(&self, pos: Position) -> usize {
        let pos = pos.wrapped(self.side);
        pos.x * self.side + pos.y
    }

    /// Returns the occupant of a cell (coordinates wrap).
    pub fn occupant(&self, pos: Position) -> Option<AgentType> {
        self.cells[self.index(pos)]
    }

    /// Returns true if the cell holds no occupant.
    pub fn is_empty_at(&self, pos: Position) -> bool {
        self.occupant(pos).is_none()
    }

    /// All empty cells in ascending coordinate order.
    pub fn empty_cells(&self) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, cell)| cell.is_none())
            .map(|(i, _)| Position::new(i / self.side, i % self.side))
            .collect()
    }

    /// Tags an empty cell with `kind`.
    ///
    /// # Errors
    /// `SimError::OccupiedCell` if the cell already holds an occupant; the
    /// grid is left unchanged.
    pub fn place(&mut self, pos: Position, kind: AgentType) -> Result<(), SimError> {
        let idx = self.index(pos);
        if self.cells[idx].is_some() {
            return Err(SimError::occupied(pos.wrapped(self.side)));
        }
        self.cells[idx] = Some(kind);
        Ok(())
    }

    /// Clears a cell. Clearing an empty cell is not an error.
    pub fn remove(&mut self, pos: Position) {
        let idx = self.index(pos);
        self.cells[idx] = None;
    }

    /// Moves an occupant of type `kind` from `from` to `to`.
    ///
    /// The destination is checked before anything is touched, so a failed
    /// move leaves both cells as they were.
    ///
    /// # Errors
    /// `SimError::OccupiedCell` if `to` already holds an occupant.
    pub fn move_occupant(
        &mut self,
        from: Position,
        to: Position,
        kind: AgentType,
    ) -> Result<(), SimError> {
        let to_idx = self.index(to);
        if self.cells[to_idx].is_some() {
            return Err(SimError::occupied(to.wrapped(self.side)));
        }
        let from_idx = self.index(from);
        self.cells[from_idx] = None;
        self.cells[to_idx] = Some(kind);
        Ok(())
    }

    /// Tallies occupant types over the Moore neighborhood of `pos`.
    pub fn neighbor_counts(&self, pos: Position, radius: usize) -> NeighborCounts {
        let mut counts = NeighborCounts::default();
        for neighbor in moore_neighborhood(pos.wrapped(self.side), radius, self.side) {
            counts.record(self.occupant(neighbor));
        }
        counts
    }

    /// Number of non-empty cells.
    pub fn occupied_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_some()).count()
    }

    /// Fraction of non-empty cells over N².
    pub fn occupancy_rate(&self) -> f64 {
        self.occupied_count() as f64 / self.cell_count() as f64
    }

    /// Read-only copy of the occupant matrix, indexed `[x][y]`.
    pub fn snapshot(&self) -> Vec<Vec<Option<AgentType>>> {
        self.cells
            .chunks(self.side)
            .map(|row| row.to_vec())
            .collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks(self.side) {
            let line: String = row
                .iter()
                .map(|&cell| cell.map_or('.', AgentType::glyph))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
