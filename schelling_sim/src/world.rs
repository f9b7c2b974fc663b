//! SimWorld - the run container.

use crate::error::{ConfigError, HarnessError};

use schelling_core::{
    create_population, place_randomly, run_until_converged, sample, step, Grid, MetricsSample,
    Population, RunHistory, StepReport, DEFAULT_GRID_SIZE, DEFAULT_SIMILARITY_THRESHOLD,
};
use schelling_env::{SchellingContext, SeededContext};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Master seed for determinism
    pub seed: u64,

    /// Grid side length N
    pub grid_size: usize,

    /// Number of type A agents
    pub count_a: usize,

    /// Number of type B agents
    pub count_b: usize,

    /// Similarity threshold shared by every agent
    pub threshold: f64,

    /// Step budget for `run`
    pub max_steps: usize,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            grid_size: DEFAULT_GRID_SIZE,
            count_a: 1000,
            count_b: 1000,
            threshold: DEFAULT_SIMILARITY_THRESHOLD,
            max_steps: 100,
        }
    }
}

impl SimConfig {
    /// Sets the seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the agent counts.
    pub fn with_counts(mut self, count_a: usize, count_b: usize) -> Self {
        self.count_a = count_a;
        self.count_b = count_b;
        self
    }

    /// Sets the similarity threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Sets the step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Sets the grid side length.
    pub fn with_grid_size(mut self, grid_size: usize) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Checks the documented ranges: N > 0, counts fit, threshold in [0, 1].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        let cells = self
            .grid_size
            .checked_mul(self.grid_size)
            .ok_or(ConfigError::GridTooLarge(self.grid_size))?;
        let agents = self
            .count_a
            .checked_add(self.count_b)
            .ok_or(ConfigError::AgentCountOverflow {
                count_a: self.count_a,
                count_b: self.count_b,
            })?;
        if agents > cells {
            return Err(ConfigError::TooManyAgents { agents, cells });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::ThresholdOutOfRange(self.threshold));
        }
        Ok(())
    }
}

/// The SimWorld - owns the grid, the population and the random source.
pub struct SimWorld {
    /// Configuration
    pub config: SimConfig,

    /// Single seeded random source for placement and stepping
    context: SeededContext,

    grid: Grid,

    population: Population,

    /// Steps that relocated at least one agent
    step_count: u64,
}

impl SimWorld {
    /// Validates the configuration, builds the population and places it.
    pub fn new(config: SimConfig) -> Result<Self, HarnessError> {
        config.validate()?;

        let mut context = SeededContext::new(config.seed);
        let mut grid = Grid::new(config.grid_size);
        let mut population = create_population(config.count_a, config.count_b, config.threshold);
        place_randomly(&mut population, &mut grid, &mut context)?;

        info!(
            "World ready: {}x{} grid, {}+{} agents, threshold={:.2} (seed={})",
            config.grid_size,
            config.grid_size,
            config.count_a,
            config.count_b,
            config.threshold,
            context.seed()
        );

        Ok(Self {
            config,
            context,
            grid,
            population,
            step_count: 0,
        })
    }

    /// Advances the simulation by one step.
    pub fn step(&mut self) -> Result<StepReport, HarnessError> {
        let report = step(&mut self.population, &mut self.grid, &mut self.context)?;
        if !report.outcome.is_noop() {
            self.step_count += 1;
        }
        Ok(report)
    }

    /// Runs to equilibrium or until `max_steps` steps have run.
    ///
    /// Sample step numbers continue from any steps already taken.
    pub fn run(&mut self) -> Result<RunHistory, HarnessError> {
        let mut history = run_until_converged(
            &mut self.population,
            &mut self.grid,
            &mut self.context,
            self.config.max_steps,
        )?;

        let offset = self.step_count;
        history.initial.step += offset;
        for s in &mut history.samples {
            s.step += offset;
        }
        self.step_count += history.steps_executed() as u64;

        Ok(history)
    }

    /// Metrics for the current state.
    pub fn metrics(&self) -> MetricsSample {
        sample(self.population.agents(), &self.grid, self.step_count)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    /// Returns the number of executed steps.
    pub fn step_count(&self) -> u64 {
        self.step_count
    }

    pub fn seed(&self) -> u64 {
        self.context.seed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;
    use schelling_core::Termination;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        assert_eq!(
            SimConfig::default().with_grid_size(0).validate(),
            Err(ConfigError::ZeroGridSize)
        );
        assert_eq!(
            SimConfig::default().with_grid_size(10).with_counts(60, 41).validate(),
            Err(ConfigError::TooManyAgents {
                agents: 101,
                cells: 100
            })
        );
        assert_eq!(
            SimConfig::default().with_threshold(1.5).validate(),
            Err(ConfigError::ThresholdOutOfRange(1.5))
        );
        assert!(SimConfig::default().with_threshold(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_config_validation_rejects_overflowing_sizes() {
        let side = 1usize << (usize::BITS / 2);
        assert_eq!(
            SimConfig::default().with_grid_size(side).validate(),
            Err(ConfigError::GridTooLarge(side))
        );
        assert_eq!(
            SimConfig::default().with_grid_size(usize::MAX).validate(),
            Err(ConfigError::GridTooLarge(usize::MAX))
        );
        assert_eq!(
            SimConfig::default().with_counts(usize::MAX, 1).validate(),
            Err(ConfigError::AgentCountOverflow {
                count_a: usize::MAX,
                count_b: 1
            })
        );
        assert!(matches!(
            SimWorld::new(SimConfig::default().with_grid_size(side)),
            Err(HarnessError::Config(ConfigError::GridTooLarge(_)))
        ));
    }

    #[test]
    fn test_sim_world_creation() {
        let config = SimConfig::default().with_counts(30, 20).with_grid_size(20);
        let world = SimWorld::new(config).unwrap();

        assert_eq!(world.grid().occupied_count(), 50);
        assert_eq!(world.population().counts_by_type().type_a, 30);
        assert_eq!(world.step_count(), 0);
        assert_eq!(world.seed(), 42);
        assert_relative_eq!(world.metrics().occupancy, 50.0 / 400.0);
    }

    #[test]
    fn test_sim_world_rejects_invalid_config() {
        let config = SimConfig::default().with_grid_size(3).with_counts(5, 5);
        assert!(matches!(
            SimWorld::new(config),
            Err(HarnessError::Config(ConfigError::TooManyAgents { .. }))
        ));
    }

    #[test]
    fn test_sim_world_step_and_run_number_samples() {
        let config = SimConfig::default()
            .with_counts(150, 150)
            .with_threshold(0.5)
            .with_max_steps(5);
        let mut world = SimWorld::new(config).unwrap();

        let report = world.step().unwrap();
        assert!(!report.outcome.is_noop());
        assert_eq!(world.step_count(), 1);

        let history = world.run().unwrap();
        assert_eq!(history.initial.step, 1);
        if let Some(first) = history.samples.first() {
            assert_eq!(first.step, 2);
        }
        assert_eq!(world.step_count(), 1 + history.steps_executed() as u64);
    }

    #[test]
    fn test_sim_world_determinism() {
        let config = SimConfig::default().with_counts(100, 100).with_max_steps(20);

        let mut world1 = SimWorld::new(config.clone()).unwrap();
        let mut world2 = SimWorld::new(config).unwrap();

        assert_eq!(world1.run().unwrap(), world2.run().unwrap());
        assert_eq!(world1.grid(), world2.grid());
    }

    #[test]
    fn test_sim_world_full_grid_stops_immediately() {
        let config = SimConfig::default()
            .with_grid_size(6)
            .with_counts(18, 18)
            .with_threshold(1.0);
        let mut world = SimWorld::new(config).unwrap();

        let history = world.run().unwrap();

        assert_eq!(history.termination, Termination::NoVacancy);
        assert_eq!(world.step_count(), 0);
        assert_eq!(world.metrics().occupancy, 1.0);
    }

    proptest! {
        #[test]
        fn prop_run_keeps_grid_and_population_in_sync(
            seed in any::<u64>(),
            count_a in 0usize..60,
            count_b in 0usize..60,
            threshold in 0.0f64..=1.0,
        ) {
            let config = SimConfig::default()
                .with_seed(seed)
                .with_grid_size(12)
                .with_counts(count_a, count_b)
                .with_threshold(threshold)
                .with_max_steps(10);
            let mut world = SimWorld::new(config).unwrap();
            world.run().unwrap();

            prop_assert_eq!(world.grid().occupied_count(), count_a + count_b);
            for agent in world.population() {
                let pos = agent.position().unwrap();
                prop_assert_eq!(world.grid().occupant(pos), Some(agent.kind()));
            }
        }
    }
}
