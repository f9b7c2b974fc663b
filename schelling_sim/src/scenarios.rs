//! Named scenario presets with their acceptance checks.

use crate::world::SimConfig;
use schelling_core::RunHistory;

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioId {
    /// SCH-001: 50+50 agents, threshold 0.3, must reach equilibrium in 100 steps
    SparseConvergence,

    /// SCH-002: 200+200 agents, threshold 0.3, segregation must exceed 0.5
    MildPreference,

    /// SCH-003: 100+100 agents, threshold 0.7, segregation must exceed 0.75
    StrongPreference,

    /// SCH-004: 1000+1000 agents (80% occupancy), segregation must not drop
    DenseCity,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::SparseConvergence,
            ScenarioId::MildPreference,
            ScenarioId::StrongPreference,
            ScenarioId::DenseCity,
        ]
    }

    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::SparseConvergence => "sparse_convergence",
            ScenarioId::MildPreference => "mild_preference",
            ScenarioId::StrongPreference => "strong_preference",
            ScenarioId::DenseCity => "dense_city",
        }
    }

    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::SparseConvergence => "50+50 agents at 4% occupancy reach equilibrium within 100 steps",
            ScenarioId::MildPreference => "Mild 30% preference still yields segregation above 0.5",
            ScenarioId::StrongPreference => "Strong 70% preference yields segregation above 0.75",
            ScenarioId::DenseCity => "80% occupancy, 100 steps: segregation never falls below its start",
        }
    }

    /// Builds the run configuration for this scenario.
    pub fn config(&self, seed: u64) -> SimConfig {
        let base = SimConfig::default().with_seed(seed);
        match self {
            ScenarioId::SparseConvergence => base.with_counts(50, 50).with_threshold(0.3).with_max_steps(100),
            ScenarioId::MildPreference => base.with_counts(200, 200).with_threshold(0.3).with_max_steps(500),
            ScenarioId::StrongPreference => base.with_counts(100, 100).with_threshold(0.7).with_max_steps(1000),
            ScenarioId::DenseCity => base.with_counts(1000, 1000).with_threshold(0.3).with_max_steps(100),
        }
    }

    /// Checks the scenario's assertion against a finished run.
    pub fn check(&self, history: &RunHistory) -> Result<(), String> {
        let final_seg = history.final_sample().segregation_index;
        match self {
            ScenarioId::SparseConvergence => {
                if history.termination.is_converged() {
                    Ok(())
                } else {
                    Err(format!(
                        "{} agents still unhappy after {} steps",
                        history.final_sample().unhappy,
                        history.steps_executed()
                    ))
                }
            }
            ScenarioId::MildPreference => at_least(final_seg, 0.5),
            ScenarioId::StrongPreference => at_least(final_seg, 0.75),
            ScenarioId::DenseCity => {
                let initial = history.initial.segregation_index;
                if final_seg >= initial {
                    Ok(())
                } else {
                    Err(format!("Segregation fell from {:.3} to {:.3}", initial, final_seg))
                }
            }
        }
    }
}

fn at_least(value: f64, bound: f64) -> Result<(), String> {
    if value > bound {
        Ok(())
    } else {
        Err(format!("Segregation index {:.3} does not exceed {:.2}", value, bound))
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sparse_convergence" | "sparse" | "sch-001" => Ok(ScenarioId::SparseConvergence),
            "mild_preference" | "mild" | "sch-002" => Ok(ScenarioId::MildPreference),
            "strong_preference" | "strong" | "sch-003" => Ok(ScenarioId::StrongPreference),
            "dense_city" | "dense" | "sch-004" => Ok(ScenarioId::DenseCity),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
