//! Schelling Simulation Harness
//!
//! Wraps the `schelling_core` engine in a reproducible run container and a
//! set of named scenarios with pass/fail assertions.
//!
//! # Determinism
//!
//! Every run owns a single `SeededContext`. Placement and every step draw
//! from it in a fixed order, so a run is fully reproduced by its seed.
//!
//! # Usage
//!
//! ```ignore
//! use schelling_sim::{SimWorld, SimConfig};
//!
//! let config = SimConfig {
//!     seed: 42,
//!     count_a: 200,
//!     count_b: 200,
//!     ..Default::default()
//! };
//!
//! let mut world = SimWorld::new(config)?;
//! let history = world.run()?;
//! println!("segregation = {:.3}", history.final_sample().segregation_index);
//! ```

mod error;
mod world;
mod runner;
mod exporter;
pub mod scenarios;

pub use error::{ConfigError, HarnessError};
pub use world::{SimConfig, SimWorld};
pub use runner::{FinishedRun, ScenarioResult, ScenarioRunner};
pub use exporter::SimExport;
