//! Schelling Core - Residential Segregation Simulation Engine
//!
//! Two types of agents live on a toroidal grid and relocate when too few of
//! their occupied neighbors share their type. This crate holds the engine:
//! 1. **Grid**: occupancy lattice with wraparound Moore neighborhoods
//! 2. **Agents & Population**: typed residents, factory, random placement
//! 3. **Metrics**: segregation index and happiness rate
//! 4. **Step engine**: per-step relocation plus a convergence driver
//!
//! All state is passed explicitly and all randomness comes from an injected
//! [`SchellingContext`](schelling_env::SchellingContext).

pub mod types;
pub mod error;
pub mod grid;
pub mod agent;
pub mod population;
pub mod metrics;
pub mod engine;

// Re-export key types for convenience
pub use types::{AgentType, NeighborCounts, Position, TypeCounts};
pub use error::SimError;
pub use grid::{moore_neighborhood, Grid, DEFAULT_GRID_SIZE, NEIGHBORHOOD_RADIUS};
pub use agent::{Agent, AgentId, DEFAULT_SIMILARITY_THRESHOLD};
pub use population::{create_population, create_population_with, place_randomly, Population};
pub use metrics::{happiness_rate, sample, segregation_index, unhappy_agents, MetricsSample};
pub use engine::{equilibrium, run_until_converged, step, RunHistory, StepOutcome, StepReport, Termination};
