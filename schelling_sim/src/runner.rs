//! Scenario runner - executes scenarios and collects results.

use crate::scenarios::ScenarioId;
use crate::error::HarnessError;
use crate::world::{SimConfig, SimWorld};

use schelling_core::{MetricsSample, RunHistory, Termination};
use serde::Serialize;
use tracing::{info, warn};

/// Results from running a scenario.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioResult {
    /// Scenario (or "custom") that was run
    pub scenario: String,

    /// Seed used
    pub seed: u64,

    /// Whether the run passed its assertion
    pub passed: bool,

    /// Steps that relocated at least one agent
    pub steps: usize,

    /// Why the run stopped (absent if it never started)
    pub termination: Option<Termination>,

    /// Metrics before the first step
    pub initial: Option<MetricsSample>,

    /// Metrics at the end of the run
    #[serde(rename = "final")]
    pub final_metrics: Option<MetricsSample>,

    /// Failure message if any
    pub failure_reason: Option<String>,
}

impl ScenarioResult {
    fn failed(scenario: &str, seed: u64, err: HarnessError) -> Self {
        Self {
            scenario: scenario.to_string(),
            seed,
            passed: false,
            steps: 0,
            termination: None,
            initial: None,
            final_metrics: None,
            failure_reason: Some(err.to_string()),
        }
    }
}

/// A finished world together with its recorded history.
pub type FinishedRun = (SimWorld, RunHistory);

/// Runs scenarios for one seed.
pub struct ScenarioRunner {
    /// Configuration seed
    seed: u64,

    /// Overrides the scenario's own step budget
    max_steps: Option<usize>,
}

impl ScenarioRunner {
    /// Creates a new scenario runner.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_steps: None,
        }
    }

    /// Overrides the step budget of every scenario.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = Some(max_steps);
        self
    }

    /// Runs a scenario and returns the result.
    pub fn run(&self, scenario: ScenarioId) -> ScenarioResult {
        self.run_with_history(scenario).0
    }

    /// Runs a scenario and keeps the finished world and its history.
    pub fn run_with_history(&self, scenario: ScenarioId) -> (ScenarioResult, Option<FinishedRun>) {
        info!("Starting scenario: {} (seed={})", scenario.name(), self.seed);
        info!("  {}", scenario.description());

        let mut config = scenario.config(self.seed);
        if let Some(max_steps) = self.max_steps {
            config.max_steps = max_steps;
        }

        self.run_checked(scenario.name(), config, |history| scenario.check(history))
    }

    /// Runs an ad-hoc configuration; passes unless the run errors.
    pub fn run_config(&self, config: SimConfig) -> (ScenarioResult, Option<FinishedRun>) {
        info!("Starting custom run (seed={})", config.seed);
        self.run_checked("custom", config, |_| Ok(()))
    }

    /// Builds the world, runs it, and applies `check`.
    ///
    /// The finished world is returned alongside the result so callers can
    /// render or export it.
    pub fn run_checked<F>(
        &self,
        name: &str,
        config: SimConfig,
        check: F,
    ) -> (ScenarioResult, Option<FinishedRun>)
    where
        F: Fn(&RunHistory) -> Result<(), String>,
    {
        let seed = config.seed;
        let outcome = SimWorld::new(config).and_then(|mut world| {
            let history = world.run()?;
            Ok((world, history))
        });

        let (world, history) = match outcome {
            Ok(run) => run,
            Err(e) => {
                warn!("{} (seed={}) aborted: {}", name, seed, e);
                return (ScenarioResult::failed(name, seed, e), None);
            }
        };

        let verdict = check(&history);
        let final_sample = *history.final_sample();
        info!(
            "  {} after {} steps | segregation {:.3} -> {:.3} | happy {:.1}%",
            history.termination,
            history.steps_executed(),
            history.initial.segregation_index,
            final_sample.segregation_index,
            final_sample.happiness_rate * 100.0
        );

        let result = ScenarioResult {
            scenario: name.to_string(),
            seed,
            passed: verdict.is_ok(),
            steps: history.steps_executed(),
            termination: Some(history.termination),
            initial: Some(history.initial),
            final_metrics: Some(final_sample),
            failure_reason: verdict.err(),
        };
        (result, Some((world, history)))
    }
}
