//! Schelling Metrics Module
//! ========================
//!
//! Aggregate statistics over a population/grid pair:
//! - **Segregation index**: population mean of each agent's same-type
//!   neighbor fraction, skipping isolated agents
//! - **Happiness rate**: fraction of agents whose threshold is met
//!
//! Both are pure reads and independent of population order.

use crate::agent::Agent;
use crate::grid::Grid;
use serde::Serialize;

/// Mean same-type neighbor fraction over all non-isolated agents.
///
/// Agents with no occupied neighbor (or no position) are excluded from
/// both numerator and denominator. Returns 0.0 when no agent qualifies,
/// including for an empty population.
pub fn segregation_index(agents: &[Agent], grid: &Grid) -> f64 {
    let (total, counted) = agents
        .iter()
        .filter_map(|agent| agent.similarity(grid))
        .fold((0.0, 0usize), |(sum, n), similarity| (sum + similarity, n + 1));

    if counted == 0 {
        0.0
    } else {
        total / counted as f64
    }
}

/// Fraction of agents that are happy; 0.0 for an empty population.
pub fn happiness_rate(agents: &[Agent], grid: &Grid) -> f64 {
    if agents.is_empty() {
        return 0.0;
    }
    let happy = agents.iter().filter(|agent| agent.is_happy(grid)).count();
    happy as f64 / agents.len() as f64
}

/// Unhappy agents, in population order.
pub fn unhappy_agents<'a>(agents: &'a [Agent], grid: &Grid) -> Vec<&'a Agent> {
    agents.iter().filter(|agent| !agent.is_happy(grid)).collect()
}

/// One row of the per-step time series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricsSample {
    /// Step index (0 = state before the first step)
    pub step: u64,
    /// Segregation index in [0, 1]
    pub segregation_index: f64,
    /// Happiness rate in [0, 1]
    pub happiness_rate: f64,
    /// Number of unhappy agents
    pub unhappy: usize,
    /// Fraction of occupied cells
    pub occupancy: f64,
}

/// Computes all metrics for the current state in a single pass.
pub fn sample(agents: &[Agent], grid: &Grid, step: u64) -> MetricsSample {
    let mut similarity_sum = 0.0;
    let mut counted = 0usize;
    let mut unhappy = 0usize;

    for agent in agents {
        let similarity = agent.similarity(grid);
        if let Some(similarity) = similarity {
            similarity_sum += similarity;
            counted += 1;
        }
        if !agent.accepts(similarity) {
            unhappy += 1;
        }
    }

    MetricsSample {
        step,
        segregation_index: if counted == 0 {
            0.0
        } else {
            similarity_sum / counted as f64
        },
        happiness_rate: if agents.is_empty() {
            0.0
        } else {
            (agents.len() - unhappy) as f64 / agents.len() as f64
        },
        unhappy,
        occupancy: grid.occupancy_rate(),
    }
}
