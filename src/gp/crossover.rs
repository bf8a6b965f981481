//! Crossover operators.
//!
//! Crossover combines genetic material from two parents into two children.
//! Parents are only read; children are fresh copies without fitness.

use crate::error::{GpError, GpResult};
use crate::gp::bits::BitChromosome;
use crate::gp::chromosome::Chromosome;
use crate::gp::tree::TreeChromosome;
use rand::RngCore;
use std::fmt;

/// A recombination policy applied by the generational driver.
pub trait Crossover<C: Chromosome>: Send + fmt::Debug {
    /// Produce two children from `first` and `second`.
    fn crossover(&self, first: &C, second: &C, rng: &mut dyn RngCore) -> (C, C);
}

/// Swap one uniformly chosen subtree between the parents.
///
/// A child that would exceed the configured maximum depth is replaced by a
/// copy of its own parent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubtreeCrossover;

impl Crossover<TreeChromosome> for SubtreeCrossover {
    fn crossover(
        &self,
        first: &TreeChromosome,
        second: &TreeChromosome,
        rng: &mut dyn RngCore,
    ) -> (TreeChromosome, TreeChromosome) {
        first.subtree_crossover(second, rng)
    }
}

/// Take every gene from either parent with equal odds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UniformCrossover;

impl Crossover<BitChromosome> for UniformCrossover {
    fn crossover(
        &self,
        first: &BitChromosome,
        second: &BitChromosome,
        rng: &mut dyn RngCore,
    ) -> (BitChromosome, BitChromosome) {
        first.uniform_crossover(second, rng)
    }
}

/// Delegates to the representation's own [`Chromosome::crossover`].
///
/// Missing children are filled with copies of the parents so the result is
/// always a pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeCrossover {
    rate: f64,
}

impl NativeCrossover {
    /// Policy calling `Chromosome::crossover` with `rate`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] unless `rate` lies within `[0, 1]`.
    pub fn new(rate: f64) -> GpResult<Self> {
        Ok(Self {
            rate: GpError::check_unit("crossover rate", rate)?,
        })
    }
}

impl<C: Chromosome> Crossover<C> for NativeCrossover {
    fn crossover(&self, first: &C, second: &C, rng: &mut dyn RngCore) -> (C, C) {
        let mut children = first.crossover(second, self.rate, rng).into_iter();
        let a = children.next().unwrap_or_else(|| first.make_copy());
        let b = children.next().unwrap_or_else(|| second.make_copy());
        (a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::tree::TreeConfig;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;
    use std::sync::Arc;

    #[test]
    fn test_subtree_crossover_respects_depth() {
        let mut rng = SmallRng::seed_from_u64(42);
        let config = Arc::new(TreeConfig::default());
        for _ in 0..200 {
            let a = TreeChromosome::random_full(Arc::clone(&config), 4, &mut rng).unwrap();
            let b = TreeChromosome::random_grow(Arc::clone(&config), 6, &mut rng).unwrap();
            let (c, d) = SubtreeCrossover.crossover(&a, &b, &mut rng);
            assert!(c.depth() <= config.max_depth);
            assert!(d.depth() <= config.max_depth);
            assert!(c.root().is_well_formed());
            assert!(d.root().is_well_formed());
        }
    }

    #[test]
    fn test_parents_untouched() {
        let mut rng = SmallRng::seed_from_u64(5);
        let config = Arc::new(TreeConfig::default());
        let mut a = TreeChromosome::random_full(Arc::clone(&config), 3, &mut rng).unwrap();
        a.set_fitness(1.0);
        let before = a.clone();
        let b = TreeChromosome::random_full(config, 3, &mut rng).unwrap();
        let _ = SubtreeCrossover.crossover(&a, &b, &mut rng);
        assert_eq!(a, before);
    }

    #[test]
    fn test_native_crossover_rate_zero_copies() {
        let mut rng = SmallRng::seed_from_u64(9);
        let a = BitChromosome::new(vec![true; 8]);
        let b = BitChromosome::new(vec![false; 8]);
        let crossover = NativeCrossover::new(0.0).unwrap();
        let (c, d) = crossover.crossover(&a, &b, &mut rng);
        assert_eq!(c, a);
        assert_eq!(d, b);
    }

    #[test]
    fn test_native_crossover_rejects_rate() {
        assert!(NativeCrossover::new(1.5).is_err());
        assert!(NativeCrossover::new(f64::NAN).is_err());
    }

    #[test]
    fn test_uniform_crossover_conserves_bits() {
        let mut rng = SmallRng::seed_from_u64(11);
        let a = BitChromosome::new(vec![true; 32]);
        let b = BitChromosome::new(vec![false; 32]);
        let (c, d) = UniformCrossover.crossover(&a, &b, &mut rng);
        assert_eq!(c.count_ones() + d.count_ones(), 32);
    }
}
