//! Evaluation on a dedicated rayon thread pool.

use super::{Evaluator, failed, keep_best};
use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::fitness::Fitness;
use crate::gp::population::Population;
use log::debug;
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::fmt;
use std::sync::Arc;
use std::thread;

/// Evaluates one task per chromosome on a fixed-size pool.
///
/// [`Evaluator::evaluate`] blocks until every task has finished, so no task
/// is in flight once it returns. Dropping the evaluator stops the pool.
pub struct ThreadPoolEvaluator<C: Chromosome> {
    fitness: Arc<dyn Fitness<C>>,
    pool: ThreadPool,
}

impl<C: Chromosome> ThreadPoolEvaluator<C> {
    /// Pool sized to the available hardware parallelism.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] if the pool cannot be built.
    pub fn new(fitness: Arc<dyn Fitness<C>>) -> GpResult<Self> {
        let threads = thread::available_parallelism().map_or(1, usize::from);
        Self::with_threads(fitness, threads)
    }

    /// Pool of exactly `threads` workers.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] if `threads` is zero or the pool
    /// cannot be built.
    pub fn with_threads(fitness: Arc<dyn Fitness<C>>, threads: usize) -> GpResult<Self> {
        if threads == 0 {
            return Err(GpError::Configuration(
                "thread pool needs at least one thread".to_string(),
            ));
        }
        let pool = ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("genprog-eval-{i}"))
            .build()
            .map_err(|e| GpError::Configuration(format!("failed to build thread pool: {e}")))?;
        debug!("thread-pool evaluator started with {threads} threads");
        Ok(Self { fitness, pool })
    }

    /// Number of pool threads.
    #[must_use]
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl<C: Chromosome> fmt::Debug for ThreadPoolEvaluator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPoolEvaluator")
            .field("threads", &self.threads())
            .finish_non_exhaustive()
    }
}

impl<C: Chromosome> Evaluator<C> for ThreadPoolEvaluator<C> {
    fn evaluate(&mut self, population: &mut Population<C>) -> GpResult<Option<C>> {
        let fitness = &self.fitness;
        let best = self.pool.install(|| {
            population
                .as_mut_slice()
                .par_iter_mut()
                .enumerate()
                .map(|(index, chromosome)| {
                    let value = fitness.calc(chromosome).map_err(|e| failed(index, &e))?;
                    chromosome.set_fitness(value);
                    let chromosome: &C = chromosome;
                    Ok::<_, GpError>(Some(chromosome))
                })
                .try_reduce(
                    || None,
                    |left, right| {
                        Ok(match right {
                            Some(candidate) => keep_best(left, candidate),
                            None => left,
                        })
                    },
                )
        })?;
        Ok(best.cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::bits::BitChromosome;
    use crate::gp::evaluation::SequentialEvaluator;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[allow(clippy::cast_precision_loss)]
    fn zero_count() -> Arc<dyn Fitness<BitChromosome>> {
        Arc::new(|c: &BitChromosome| -> GpResult<f64> {
            Ok((c.len() - c.count_ones()) as f64)
        })
    }

    #[test]
    fn test_matches_sequential() {
        let mut rng = SmallRng::seed_from_u64(42);
        let pop: Population<BitChromosome> =
            (0..64).map(|_| BitChromosome::random(32, &mut rng)).collect();

        let mut sequential_pop = pop.clone();
        let mut parallel_pop = pop;
        let sequential = SequentialEvaluator::new(zero_count())
            .evaluate(&mut sequential_pop)
            .unwrap()
            .unwrap();
        let parallel = ThreadPoolEvaluator::with_threads(zero_count(), 4)
            .unwrap()
            .evaluate(&mut parallel_pop)
            .unwrap()
            .unwrap();

        assert_eq!(sequential.fitness(), parallel.fitness());
        assert_eq!(sequential_pop, parallel_pop);
    }

    #[test]
    fn test_error_reports_index() {
        let fitness: Arc<dyn Fitness<BitChromosome>> =
            Arc::new(|c: &BitChromosome| -> GpResult<f64> {
                if c.len() == 3 {
                    Err(GpError::InvalidArgument("bad length".to_string()))
                } else {
                    Ok(0.0)
                }
            });
        let mut pop: Population<BitChromosome> =
            (1..=5).map(|n| BitChromosome::new(vec![true; n])).collect();
        let result = ThreadPoolEvaluator::with_threads(fitness, 2)
            .unwrap()
            .evaluate(&mut pop);
        assert!(matches!(result, Err(GpError::Evaluation { index: 2, .. })));
    }

    #[test]
    fn test_zero_threads_rejected() {
        assert!(ThreadPoolEvaluator::with_threads(zero_count(), 0).is_err());
    }

    #[test]
    fn test_default_size() {
        let evaluator = ThreadPoolEvaluator::new(zero_count()).unwrap();
        assert!(evaluator.threads() >= 1);
    }
}
