//! Initial population generators.

use crate::error::GpResult;
use crate::gp::bits::BitChromosome;
use crate::gp::chromosome::Chromosome;
use crate::gp::tree::{TreeChromosome, TreeConfig};
use rand::RngCore;
use std::fmt;
use std::sync::Arc;

/// Produces the chromosomes of generation zero.
pub trait Initializer<C: Chromosome>: fmt::Debug {
    /// Generate the initial chromosomes.
    fn generate(&mut self, rng: &mut dyn RngCore) -> Vec<C>;
}

/// Ramped half-and-half tree construction.
///
/// Depths cycle through `1..=init_depth`; within each depth, trees alternate
/// between grow and full construction.
#[derive(Debug, Clone)]
pub struct RampedHalfAndHalf {
    config: Arc<TreeConfig>,
    size: usize,
}

impl RampedHalfAndHalf {
    /// Generator of `size` trees shaped by `config`.
    ///
    /// # Errors
    ///
    /// Propagates [`TreeConfig::validate`] failures.
    pub fn new(config: Arc<TreeConfig>, size: usize) -> GpResult<Self> {
        config.validate()?;
        Ok(Self { config, size })
    }
}

impl Initializer<TreeChromosome> for RampedHalfAndHalf {
    fn generate(&mut self, rng: &mut dyn RngCore) -> Vec<TreeChromosome> {
        let ramp = self.config.init_depth.max(1);
        (0..self.size)
            .map(|i| {
                let depth = 1 + (i / 2) % ramp;
                let config = Arc::clone(&self.config);
                if i % 2 == 0 {
                    TreeChromosome::grown(config, depth, rng)
                } else {
                    TreeChromosome::filled(config, depth, rng)
                }
            })
            .collect()
    }
}

/// Uniformly random bit strings of a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RandomBits {
    size: usize,
    length: usize,
}

impl RandomBits {
    /// Generator of `size` strings of `length` bits.
    #[must_use]
    pub fn new(size: usize, length: usize) -> Self {
        Self { size, length }
    }
}

impl Initializer<BitChromosome> for RandomBits {
    fn generate(&mut self, rng: &mut dyn RngCore) -> Vec<BitChromosome> {
        (0..self.size)
            .map(|_| BitChromosome::random(self.length, rng))
            .collect()
    }
}
