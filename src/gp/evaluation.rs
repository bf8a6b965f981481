//! Fitness evaluation engine.
//!
//! Every model implements [`Evaluator`]: score each chromosome of a
//! population, write the fitness back in place and return a copy of the best
//! one. The models differ only in scheduling:
//!
//! ```text
//! ┌──────────────┬──────────────────────────────────────────────┐
//! │ Sequential   │ caller thread, population order              │
//! ├──────────────┼──────────────────────────────────────────────┤
//! │ ThreadPool   │ rayon pool, one task per chromosome          │
//! ├──────────────┼──────────────────────────────────────────────┤
//! │ WorkerPool   │ long-lived workers, task/result channels,    │
//! │              │ one Stop sentinel per worker on shutdown     │
//! └──────────────┴──────────────────────────────────────────────┘
//! ```
//!
//! Results from the parallel models arrive in any order. The best is a
//! min-fold over [`compare_fitness`](crate::gp::compare_fitness), so the
//! order does not matter. Any fitness error aborts the batch and reaches
//! the caller.

mod sequential;
mod thread_pool;
mod worker_pool;

pub use sequential::SequentialEvaluator;
pub use thread_pool::ThreadPoolEvaluator;
pub use worker_pool::WorkerPoolEvaluator;

use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::population::Population;

/// Scores a whole population.
pub trait Evaluator<C: Chromosome>: Send {
    /// Compute and store the fitness of every chromosome in `population`.
    ///
    /// Returns a copy of the best chromosome, or `None` for an empty
    /// population.
    ///
    /// # Errors
    ///
    /// Returns the first fitness error encountered; the generation that
    /// requested the evaluation must not advance.
    fn evaluate(&mut self, population: &mut Population<C>) -> GpResult<Option<C>>;
}

/// Attach the failing chromosome's index to a fitness error.
fn failed(index: usize, error: &GpError) -> GpError {
    match error {
        GpError::Evaluation { message, .. } => GpError::Evaluation {
            index,
            message: message.clone(),
        },
        other => GpError::Evaluation {
            index,
            message: other.to_string(),
        },
    }
}

/// Keep whichever of `best` and `candidate` ranks first; `best` wins ties.
fn keep_best<'a, C: Chromosome>(best: Option<&'a C>, candidate: &'a C) -> Option<&'a C> {
    match best {
        Some(current) if !candidate.is_better_than(current) => Some(current),
        _ => Some(candidate),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::bits::BitChromosome;

    #[test]
    fn test_keep_best() {
        let mut a = BitChromosome::new(vec![true]);
        a.set_fitness(2.0);
        let mut b = BitChromosome::new(vec![false]);
        b.set_fitness(1.0);
        let mut c = BitChromosome::new(vec![false, false]);
        c.set_fitness(1.0);

        let best = [&a, &b, &c].into_iter().fold(None, keep_best);
        assert_eq!(best, Some(&b));
    }
}
