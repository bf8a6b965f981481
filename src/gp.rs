//! Genetic programming engine.
//!
//! This module provides a generational evolutionary framework. Candidate
//! programs are chromosomes; the driver evolves a population of them toward
//! minimizing a fitness function, calling every strategy through a small
//! trait so representations and operators can be swapped freely.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────┐
//! │        Generational Driver          │
//! ├─────────────────────────────────────┤
//! │   Fitness Evaluation Engine         │
//! │  sequential │ thread pool │ workers │
//! ├─────────────────────────────────────┤
//! │            Population               │
//! ├─────────────────────────────────────┤
//! │  Selection │ Crossover │ Mutation   │
//! ├─────────────────────────────────────┤
//! │   Tree genome │ Bit-string genome   │
//! └─────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```no_run
//! use genprog::gp::{
//!     DataSet, Evolution, EvolutionConfig, Fitness, MeanSquaredError, MutationStrategy,
//!     Operators, RampedHalfAndHalf, SequentialEvaluator, SubtreeCrossover,
//!     TournamentSelection, TreeChromosome, TreeConfig, TreeMutation,
//! };
//! use std::sync::Arc;
//!
//! # fn main() -> genprog::GpResult<()> {
//! let rows: Vec<Vec<f64>> = (0..20).map(|i| vec![f64::from(i) / 10.0]).collect();
//! let data = Arc::new(DataSet::from_function(1, &rows, |x| x[0] * x[0] + 1.0)?);
//!
//! let config = EvolutionConfig::default();
//! let tree = Arc::new(TreeConfig::default());
//! let operators = Operators::new(
//!     TournamentSelection::new(config.tournament_arity)?,
//!     SubtreeCrossover,
//!     TreeMutation::new(MutationStrategy::Subtree),
//! );
//! let fitness: Arc<dyn Fitness<TreeChromosome>> = Arc::new(MeanSquaredError::new(data));
//! let evaluator = Box::new(SequentialEvaluator::new(fitness));
//! let mut init = RampedHalfAndHalf::new(tree, config.population_size)?;
//!
//! let result = Evolution::new(config, operators, evaluator, &mut init)?.run()?;
//! println!("{} -> {:?}", result.best, result.best_fitness);
//! # Ok(())
//! # }
//! ```

mod bits;
mod chromosome;
mod crossover;
mod dataset;
mod evaluation;
mod evolution;
mod fitness;
mod initializer;
mod mutation;
mod population;
mod selection;
mod tree;

pub use bits::BitChromosome;
pub use chromosome::{Chromosome, compare_fitness};
pub use crossover::{Crossover, NativeCrossover, SubtreeCrossover, UniformCrossover};
pub use dataset::DataSet;
pub use evaluation::{Evaluator, SequentialEvaluator, ThreadPoolEvaluator, WorkerPoolEvaluator};
pub use evolution::{
    Evolution, EvolutionConfig, EvolutionResult, GenerationState, GenerationStats, LogProgress,
    Operators, Stagnation, TerminationListener,
};
pub use fitness::{Fitness, MeanAbsoluteError, MeanSquaredError};
pub use initializer::{Initializer, RampedHalfAndHalf, RandomBits};
pub use mutation::{
    BitFlipMutation, Mutation, MutationStrategy, NativeMutation, SwapMutation, TreeMutation,
};
pub use population::{FitnessStats, Population};
pub use selection::{Selection, TournamentSelection};
pub use tree::{Node, Op, TreeChromosome, TreeConfig};
