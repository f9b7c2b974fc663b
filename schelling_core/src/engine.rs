//! The step engine - relocation of unhappy agents and the convergence driver.
//!
//! # One step
//!
//! ```text
//! unhappy = unhappy_agents()       -- empty? => AllHappy (no-op)
//! empty   = grid.empty_cells()     -- empty? => NoVacancy (no-op)
//! ctx.shuffle(unhappy)
//! for agent in unhappy:
//!     dest = empty.remove(ctx.pick_index(empty.len()))
//!     empty.push(agent.position)   -- reusable later in this same step
//!     move agent -> dest
//! ```
//!
//! Happiness is recomputed from scratch every step; nothing is cached
//! across steps because a single move can flip its neighbors.

use crate::agent::AgentId;
use crate::error::SimError;
use crate::grid::Grid;
use crate::metrics::{sample, unhappy_agents, MetricsSample};
use crate::population::Population;
use schelling_env::SchellingContext;
use serde::Serialize;
use tracing::{debug, info};

/// What a single step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StepOutcome {
    /// At least one agent relocated
    Moved,
    /// No placed agent was unhappy; the step was a no-op
    AllHappy,
    /// No empty cell existed; the step was a no-op
    NoVacancy,
}

impl StepOutcome {
    /// True for the two terminal outcomes.
    pub fn is_noop(&self) -> bool {
        !matches!(self, StepOutcome::Moved)
    }
}

/// Result of [`step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StepReport {
    pub outcome: StepOutcome,
    /// Agents relocated during the step
    pub moved: usize,
    /// Unhappy placed agents at the start of the step
    pub unhappy_before: usize,
}

/// Why a run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Termination {
    /// Every placed agent is happy
    AllHappy,
    /// No empty cell to move into
    NoVacancy,
    /// Step budget used up before equilibrium
    BudgetExhausted,
}

impl Termination {
    /// True if the run reached equilibrium.
    pub fn is_converged(&self) -> bool {
        !matches!(self, Termination::BudgetExhausted)
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::AllHappy => write!(f, "all_happy"),
            Termination::NoVacancy => write!(f, "no_vacancy"),
            Termination::BudgetExhausted => write!(f, "budget_exhausted"),
        }
    }
}

/// Time series collected by [`run_until_converged`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunHistory {
    /// Metrics before the first step
    pub initial: MetricsSample,
    /// One sample per executed (non-no-op) step
    pub samples: Vec<MetricsSample>,
    pub termination: Termination,
}

impl RunHistory {
    /// Number of steps that relocated at least one agent.
    pub fn steps_executed(&self) -> usize {
        self.samples.len()
    }

    /// Latest sample, falling back to the initial state.
    pub fn final_sample(&self) -> &MetricsSample {
        self.samples.last().unwrap_or(&self.initial)
    }

    pub fn segregation_series(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.segregation_index).collect()
    }

    pub fn happiness_series(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.happiness_rate).collect()
    }
}

/// Unhappy agents that are actually on the grid, in population order.
fn relocation_candidates(population: &Population, grid: &Grid) -> Vec<AgentId> {
    unhappy_agents(population.agents(), grid)
        .into_iter()
        .filter(|agent| agent.is_placed())
        .map(|agent| agent.id())
        .collect()
}

/// Reports whether the state is at equilibrium, without drawing randomness.
pub fn equilibrium(population: &Population, grid: &Grid) -> Option<Termination> {
    if relocation_candidates(population, grid).is_empty() {
        Some(Termination::AllHappy)
    } else if grid.occupied_count() == grid.cell_count() {
        Some(Termination::NoVacancy)
    } else {
        None
    }
}

/// Runs one discrete time step.
///
/// Draw order: one shuffle of the unhappy list, then one destination pick
/// per relocated agent. A cell vacated earlier in the step is a valid
/// destination for later agents in the same step. Unplaced agents are
/// never relocated.
///
/// # Errors
/// `SimError::OccupiedCell` only if the grid and population were out of
/// sync before the call.
pub fn step<C: SchellingContext>(
    population: &mut Population,
    grid: &mut Grid,
    ctx: &mut C,
) -> Result<StepReport, SimError> {
    let mut unhappy = relocation_candidates(population, grid);
    let unhappy_before = unhappy.len();
    if unhappy.is_empty() {
        return Ok(StepReport {
            outcome: StepOutcome::AllHappy,
            moved: 0,
            unhappy_before,
        });
    }

    let mut empty = grid.empty_cells();
    if empty.is_empty() {
        return Ok(StepReport {
            outcome: StepOutcome::NoVacancy,
            moved: 0,
            unhappy_before,
        });
    }

    ctx.shuffle(&mut unhappy);

    let mut moved = 0;
    for id in unhappy {
        if empty.is_empty() {
            break;
        }
        let destination = empty.remove(ctx.pick_index(empty.len()));
        if let Some(vacated) = population.move_agent(grid, id, destination)? {
            empty.push(vacated);
        }
        moved += 1;
    }

    Ok(StepReport {
        outcome: StepOutcome::Moved,
        moved,
        unhappy_before,
    })
}

/// Repeats [`step`] until a no-op step or `max_steps` steps have run.
///
/// One metrics sample is recorded per executed step; the terminating
/// no-op step records none.
pub fn run_until_converged<C: SchellingContext>(
    population: &mut Population,
    grid: &mut Grid,
    ctx: &mut C,
    max_steps: usize,
) -> Result<RunHistory, SimError> {
    let initial = sample(population.agents(), grid, 0);
    let mut samples = Vec::new();
    let mut termination = Termination::BudgetExhausted;

    for step_index in 1..=max_steps {
        let report = step(population, grid, ctx)?;
        match report.outcome {
            StepOutcome::AllHappy => {
                termination = Termination::AllHappy;
                break;
            }
            StepOutcome::NoVacancy => {
                termination = Termination::NoVacancy;
                break;
            }
            StepOutcome::Moved => {
                let s = sample(population.agents(), grid, step_index as u64);
                debug!(
                    "step {} | moved={} | unhappy={} | seg={:.3} | happy={:.3}",
                    step_index, report.moved, s.unhappy, s.segregation_index, s.happiness_rate
                );
                samples.push(s);
            }
        }
    }

    // The last budgeted step may itself have reached equilibrium
    if termination == Termination::BudgetExhausted {
        if let Some(reached) = equilibrium(population, grid) {
            termination = reached;
        }
    }

    info!(
        "Run finished after {} steps: {} (seed={})",
        samples.len(),
        termination,
        ctx.seed()
    );

    Ok(RunHistory {
        initial,
        samples,
        termination,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::population::{create_population, place_randomly};
    use crate::types::{AgentType, Position};
    use schelling_env::SeededContext;

    fn placed(count_a: usize, count_b: usize, threshold: f64, side: usize, seed: u64) -> (Population, Grid) {
        let mut grid = Grid::new(side);
        let mut population = create_population(count_a, count_b, threshold);
        place_randomly(&mut population, &mut grid, &mut SeededContext::new(seed)).unwrap();
        (population, grid)
    }

    fn assert_in_sync(population: &Population, grid: &Grid) {
        assert_eq!(grid.occupied_count(), population.placed_count());
        for agent in population {
            let pos = agent.position().unwrap();
            assert_eq!(grid.occupant(pos), Some(agent.kind()));
        }
    }

    #[test]
    fn test_step_noop_when_all_happy() {
        let mut grid = Grid::new(10);
        let mut population = create_population(2, 0, 0.3);
        population.place_agent(&mut grid, AgentId(0), Position::new(3, 3)).unwrap();
        population.place_agent(&mut grid, AgentId(1), Position::new(3, 4)).unwrap();
        let grid_before = grid.clone();
        let population_before = population.clone();
        let mut ctx = SeededContext::new(1);

        let report = step(&mut population, &mut grid, &mut ctx).unwrap();

        assert_eq!(report.outcome, StepOutcome::AllHappy);
        assert_eq!(report.moved, 0);
        assert_eq!(grid, grid_before);
        assert_eq!(population, population_before);
        assert_eq!(ctx.draws(), 0);
    }

    #[test]
    fn test_step_noop_when_grid_full() {
        let (mut population, mut grid) = placed(8, 8, 1.0, 4, 5);
        assert!(grid.empty_cells().is_empty());
        let grid_before = grid.clone();

        let report = step(&mut population, &mut grid, &mut SeededContext::new(2)).unwrap();

        assert_eq!(report.outcome, StepOutcome::NoVacancy);
        assert!(report.unhappy_before > 0);
        assert_eq!(grid, grid_before);
    }

    #[test]
    fn test_step_moves_every_unhappy_agent_when_room() {
        let (mut population, mut grid) = placed(20, 20, 0.3, 50, 9);
        let unhappy_before = relocation_candidates(&population, &grid);
        let before = population.clone();

        let report = step(&mut population, &mut grid, &mut SeededContext::new(9)).unwrap();

        assert_eq!(report.outcome, StepOutcome::Moved);
        assert_eq!(report.moved, unhappy_before.len());
        for id in unhappy_before {
            assert_ne!(
                before.get(id).unwrap().position(),
                population.get(id).unwrap().position()
            );
        }
        assert_in_sync(&population, &grid);
    }

    #[test]
    fn test_step_happy_agents_stay_put() {
        let (mut population, mut grid) = placed(200, 200, 0.3, 30, 21);
        let happy: Vec<(AgentId, Option<Position>)> = population
            .iter()
            .filter(|a| a.is_happy(&grid))
            .map(|a| (a.id(), a.position()))
            .collect();

        step(&mut population, &mut grid, &mut SeededContext::new(21)).unwrap();

        for (id, pos) in happy {
            assert_eq!(population.get(id).unwrap().position(), pos);
        }
    }

    #[test]
    fn test_step_single_vacancy_is_reused_within_step() {
        // 3x3 grid, 8 isolated-by-type agents, one hole
        let mut grid = Grid::new(3);
        let mut population = Population::new();
        for pos in grid.empty_cells().into_iter().take(8) {
            let kind = if (pos.x + pos.y) % 2 == 0 { AgentType::A } else { AgentType::B };
            let id = population.spawn(kind, 1.0);
            population.place_agent(&mut grid, id, pos).unwrap();
        }
        let unhappy = relocation_candidates(&population, &grid).len();
        assert!(unhappy >= 2);

        let report = step(&mut population, &mut grid, &mut SeededContext::new(4)).unwrap();

        // Each mover frees the cell the next one takes
        assert_eq!(report.moved, unhappy);
        assert_eq!(grid.empty_cells().len(), 1);
        assert_in_sync(&population, &grid);
    }

    #[test]
    fn test_step_skips_unplaced_agents() {
        let mut grid = Grid::new(10);
        let mut population = create_population(1, 0, 0.3);
        let mut ctx = SeededContext::new(0);

        let report = step(&mut population, &mut grid, &mut ctx).unwrap();

        assert_eq!(report.outcome, StepOutcome::AllHappy);
        assert!(!population.get(AgentId(0)).unwrap().is_placed());
    }

    #[test]
    fn test_step_is_deterministic_per_seed() {
        let run = |seed| {
            let (mut population, mut grid) = placed(100, 100, 0.5, 30, 3);
            let mut ctx = SeededContext::new(seed);
            for _ in 0..5 {
                step(&mut population, &mut grid, &mut ctx).unwrap();
            }
            grid
        };
        assert_eq!(run(77), run(77));
    }

    #[test]
    fn test_step_draw_order() {
        let (mut population, mut grid) = placed(30, 30, 0.3, 40, 13);
        let mut ctx = SeededContext::new(13);

        let report = step(&mut population, &mut grid, &mut ctx).unwrap();

        // One shuffle, then one pick per moved agent
        assert_eq!(ctx.draws(), 1 + report.moved as u64);
    }

    #[test]
    fn test_step_matches_manual_replay() {
        let (mut population, mut grid) = placed(200, 200, 0.5, 30, 17);
        let mut ctx = SeededContext::new(5);
        let mut replay_ctx = ctx.clone();

        // Replay: shuffle unhappy placed ids once, then for each id take
        // `empty[pick]` out and append the vacated cell to the end.
        let mut order: Vec<AgentId> = unhappy_agents(population.agents(), &grid)
            .into_iter()
            .filter(|agent| agent.is_placed())
            .map(|agent| agent.id())
            .collect();
        assert!(!order.is_empty());
        replay_ctx.shuffle(&mut order);

        let mut expected: Vec<Option<Position>> =
            population.iter().map(|agent| agent.position()).collect();
        let mut empty = grid.empty_cells();
        for id in &order {
            let destination = empty.remove(replay_ctx.pick_index(empty.len()));
            if let Some(vacated) = expected[id.index()].replace(destination) {
                empty.push(vacated);
            }
        }

        let report = step(&mut population, &mut grid, &mut ctx).unwrap();

        assert_eq!(report.moved, order.len());
        let actual: Vec<Option<Position>> =
            population.iter().map(|agent| agent.position()).collect();
        assert_eq!(actual, expected);
        assert_eq!(ctx.draws(), replay_ctx.draws());
        assert_in_sync(&population, &grid);
    }

    #[test]
    fn test_run_stops_immediately_when_converged() {
        let mut grid = Grid::new(10);
        let mut population = create_population(2, 0, 0.3);
        population.place_agent(&mut grid, AgentId(0), Position::new(0, 0)).unwrap();
        population.place_agent(&mut grid, AgentId(1), Position::new(9, 9)).unwrap();

        let history =
            run_until_converged(&mut population, &mut grid, &mut SeededContext::new(1), 50).unwrap();

        assert_eq!(history.termination, Termination::AllHappy);
        assert_eq!(history.steps_executed(), 0);
        assert_eq!(history.final_sample(), &history.initial);
        assert_eq!(history.initial.happiness_rate, 1.0);
    }

    #[test]
    fn test_run_respects_budget() {
        let (mut population, mut grid) = placed(300, 300, 0.9, 30, 8);

        let history =
            run_until_converged(&mut population, &mut grid, &mut SeededContext::new(8), 3).unwrap();

        assert!(history.steps_executed() <= 3);
        assert_eq!(history.segregation_series().len(), history.steps_executed());
        assert_eq!(history.happiness_series().len(), history.steps_executed());
        for (i, s) in history.samples.iter().enumerate() {
            assert_eq!(s.step, i as u64 + 1);
        }
        assert_in_sync(&population, &grid);
    }

    #[test]
    fn test_equilibrium_reports_full_grid() {
        let (population, grid) = placed(8, 8, 1.0, 4, 5);
        assert_eq!(equilibrium(&population, &grid), Some(Termination::NoVacancy));
    }
}
