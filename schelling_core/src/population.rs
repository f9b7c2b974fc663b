//! Population - the ordered agent collection and its factory.
//!
//! Every mutation path here updates the grid and the agent's recorded
//! position within the same call, and leaves both untouched on error.

use crate::agent::{Agent, AgentId};
use crate::error::SimError;
use crate::grid::Grid;
use crate::types::{AgentType, Position, TypeCounts};
use schelling_env::SchellingContext;
use tracing::debug;

/// An ordered collection of agents.
///
/// Order only matters for deterministic iteration; `AgentId`s are
/// indices into this collection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Population {
    agents: Vec<Agent>,
}

impl Population {
    /// Creates an empty population.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a new unplaced agent and returns its ID.
    pub fn spawn(&mut self, kind: AgentType, threshold: f64) -> AgentId {
        let id = AgentId(self.agents.len());
        self.agents.push(Agent::new(id, kind, threshold));
        id
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// All agents in population order.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Agent> {
        self.agents.iter()
    }

    pub fn get(&self, id: AgentId) -> Option<&Agent> {
        self.agents.get(id.index())
    }

    /// Agent totals per type.
    pub fn counts_by_type(&self) -> TypeCounts {
        self.agents
            .iter()
            .fold(TypeCounts::default(), |mut counts, agent| {
                match agent.kind() {
                    AgentType::A => counts.type_a += 1,
                    AgentType::B => counts.type_b += 1,
                }
                counts
            })
    }

    /// Number of agents currently on a grid.
    pub fn placed_count(&self) -> usize {
        self.agents.iter().filter(|agent| agent.is_placed()).count()
    }

    fn agent_mut(&mut self, id: AgentId) -> Result<&mut Agent, SimError> {
        let len = self.agents.len();
        self.agents
            .get_mut(id.index())
            .ok_or(SimError::UnknownAgent { id: id.index(), len })
    }

    /// Puts an agent on `pos`.
    ///
    /// An agent that is already placed is moved instead.
    ///
    /// # Errors
    /// `SimError::OccupiedCell` if `pos` is occupied, and
    /// `SimError::UnknownAgent` if `id` does not belong to this population.
    pub fn place_agent(
        &mut self,
        grid: &mut Grid,
        id: AgentId,
        pos: Position,
    ) -> Result<(), SimError> {
        self.move_agent(grid, id, pos).map(|_| ())
    }

    /// Moves an agent to `destination` and returns the cell it vacated.
    ///
    /// An unplaced agent is placed instead and `None` is returned.
    ///
    /// # Errors
    /// `SimError::OccupiedCell` if `destination` is occupied, and
    /// `SimError::UnknownAgent` if `id` does not belong to this population.
    pub fn move_agent(
        &mut self,
        grid: &mut Grid,
        id: AgentId,
        destination: Position,
    ) -> Result<Option<Position>, SimError> {
        let agent = self.agent_mut(id)?;
        let vacated = match agent.position() {
            Some(from) => {
                grid.move_occupant(from, destination, agent.kind())?;
                Some(from)
            }
            None => {
                grid.place(destination, agent.kind())?;
                None
            }
        };
        agent.set_position(Some(destination.wrapped(grid.side())));
        Ok(vacated)
    }

    /// Takes an agent off the grid and returns the cell it vacated.
    ///
    /// `Ok(None)` for an agent that was not placed.
    ///
    /// # Errors
    /// `SimError::UnknownAgent` if `id` does not belong to this population.
    pub fn remove_agent(&mut self, grid: &mut Grid, id: AgentId) -> Result<Option<Position>, SimError> {
        let agent = self.agent_mut(id)?;
        let Some(pos) = agent.position() else {
            return Ok(None);
        };
        grid.remove(pos);
        agent.set_position(None);
        Ok(Some(pos))
    }
}

impl<'a> IntoIterator for &'a Population {
    type Item = &'a Agent;
    type IntoIter = std::slice::Iter<'a, Agent>;

    fn into_iter(self) -> Self::IntoIter {
        self.agents.iter()
    }
}

/// Builds `count_a` type A agents followed by `count_b` type B agents,
/// all sharing `threshold` and all unplaced.
pub fn create_population(count_a: usize, count_b: usize, threshold: f64) -> Population {
    create_population_with(count_a, count_b, |_, _| threshold)
}

/// Like [`create_population`], with a per-agent threshold.
///
/// `threshold_for` receives the agent's type and its index within that
/// type's block.
pub fn create_population_with<F>(count_a: usize, count_b: usize, mut threshold_for: F) -> Population
where
    F: FnMut(AgentType, usize) -> f64,
{
    let mut population = Population::new();
    for i in 0..count_a {
        population.spawn(AgentType::A, threshold_for(AgentType::A, i));
    }
    for i in 0..count_b {
        population.spawn(AgentType::B, threshold_for(AgentType::B, i));
    }
    population
}

/// Places every agent on a distinct random empty cell.
///
/// Draws one uniform permutation of the empty cells and hands them out in
/// population order.
///
/// # Errors
/// `SimError::Capacity` if the population outnumbers the empty cells. The
/// grid is untouched in that case.
pub fn place_randomly<C: SchellingContext>(
    population: &mut Population,
    grid: &mut Grid,
    ctx: &mut C,
) -> Result<(), SimError> {
    let mut empty = grid.empty_cells();
    if population.len() > empty.len() {
        return Err(SimError::capacity(population.len(), empty.len()));
    }

    ctx.shuffle(&mut empty);

    for (i, pos) in empty.into_iter().take(population.len()).enumerate() {
        population.place_agent(grid, AgentId(i), pos)?;
    }

    debug!(
        "Placed {} agents on a {}x{} grid (occupancy {:.3})",
        population.len(),
        grid.side(),
        grid.side(),
        grid.occupancy_rate()
    );
    Ok(())
}
