//! JSON exporter for charting front ends.
//!
//! Exports the per-step metrics series and the final occupant matrix.
//! This is a one-way dump; runs are never loaded back.

use crate::error::HarnessError;
use crate::world::{SimConfig, SimWorld};

use schelling_core::{MetricsSample, RunHistory, Termination};
use serde::Serialize;
use std::fs::File;
use std::io::Write;

/// Complete simulation export.
#[derive(Debug, Clone, Serialize)]
pub struct SimExport {
    /// Scenario name
    pub scenario: String,

    /// Effective configuration (includes the seed)
    pub config: SimConfig,

    /// Metrics before the first step
    pub initial: MetricsSample,

    /// One frame per executed step
    pub frames: Vec<MetricsSample>,

    /// Why the run stopped
    pub termination: Termination,

    /// Final results
    pub passed: bool,

    /// Final grid, one string per row (`.` empty, `A`, `B`)
    pub final_grid: Vec<String>,
}

impl SimExport {
    /// Collects an export from a finished run.
    pub fn from_run(scenario: &str, world: &SimWorld, history: &RunHistory, passed: bool) -> Self {
        Self {
            scenario: scenario.to_string(),
            config: world.config.clone(),
            initial: history.initial,
            frames: history.samples.clone(),
            termination: history.termination,
            passed,
            final_grid: world.grid().to_string().lines().map(str::to_string).collect(),
        }
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, HarnessError> {
        serde_json::to_string_pretty(self).map_err(|e| HarnessError::Export(e.into()))
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: &str) -> Result<(), HarnessError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}
