//! Schelling Environment Abstraction Layer
//!
//! This crate provides the randomness capability the simulation core is
//! handed explicitly, so the same engine runs in both **Production**
//! (OS entropy) and **Deterministic** (seeded ChaCha) environments.
//!
//! # Core Concept
//!
//! The step engine never reaches for a global RNG. Every draw it makes
//! (the per-step shuffle, each destination pick) goes through a
//! [`SchellingContext`] the caller owns and passes in. Deriving all entropy
//! from a single 64-bit seed makes any run reproducible via its seed number.
//!
//! # Example
//!
//! ```
//! use schelling_env::{SchellingContext, SeededContext};
//!
//! let mut ctx = SeededContext::new(42);
//! let mut order = vec![1, 2, 3, 4];
//! ctx.shuffle(&mut order);
//! let pick = ctx.pick_index(order.len());
//! assert!(pick < 4);
//! ```

mod context;
mod seeded;
mod entropy_impl;

pub use context::SchellingContext;
pub use seeded::SeededContext;
pub use entropy_impl::EntropyContext;
