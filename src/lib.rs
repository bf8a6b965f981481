// Allow unwrap and unreadable literals in tests (test code is not production)
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::unreadable_literal))]
//! Genprog: a generational genetic programming engine.
//!
//! This crate evolves populations of candidate programs toward minimizing a
//! user-supplied fitness function:
//! - Expression-tree genomes with five structural mutation operators
//! - Pluggable selection, crossover, mutation and fitness strategies
//! - Sequential, thread-pool and worker-pool fitness evaluation
//! - Seedable randomness threaded through every operator
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │         CLI (genprog binary)        │
//! ├─────────────────────────────────────┤
//! │      Generational driver (gp)       │
//! ├─────────────────────────────────────┤
//! │   Strategies │ Evaluation engine    │
//! ├─────────────────────────────────────┤
//! │   Genomes │ Population │ DataSet    │
//! └─────────────────────────────────────┘
//! ```

pub mod error;
pub mod gp;

pub use error::{GpError, GpResult};

// Re-export the core driver types at crate root for convenience
pub use gp::{Chromosome, Evolution, EvolutionConfig, Population};
