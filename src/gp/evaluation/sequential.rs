//! Single-threaded evaluation in population order.

use super::{Evaluator, failed, keep_best};
use crate::error::GpResult;
use crate::gp::chromosome::Chromosome;
use crate::gp::fitness::Fitness;
use crate::gp::population::Population;
use std::fmt;
use std::sync::Arc;

/// Evaluates on the calling thread.
pub struct SequentialEvaluator<C: Chromosome> {
    fitness: Arc<dyn Fitness<C>>,
}

impl<C: Chromosome> SequentialEvaluator<C> {
    /// Evaluator scoring with `fitness`.
    #[must_use]
    pub fn new(fitness: Arc<dyn Fitness<C>>) -> Self {
        Self { fitness }
    }
}

impl<C: Chromosome> fmt::Debug for SequentialEvaluator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SequentialEvaluator").finish_non_exhaustive()
    }
}

impl<C: Chromosome> Evaluator<C> for SequentialEvaluator<C> {
    fn evaluate(&mut self, population: &mut Population<C>) -> GpResult<Option<C>> {
        for (index, chromosome) in population.iter_mut().enumerate() {
            let fitness = self
                .fitness
                .calc(chromosome)
                .map_err(|e| failed(index, &e))?;
            chromosome.set_fitness(fitness);
        }
        Ok(population.iter().fold(None, keep_best).cloned())
    }
}
