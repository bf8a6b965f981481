//! Fixed-length bit-string genome.

use crate::gp::chromosome::Chromosome;
use rand::{Rng, RngCore};
use std::fmt;

/// A string of bits with its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct BitChromosome {
    genes: Vec<bool>,
    fitness: Option<f64>,
}

impl BitChromosome {
    /// Unevaluated chromosome over `genes`.
    #[must_use]
    pub fn new(genes: Vec<bool>) -> Self {
        Self {
            genes,
            fitness: None,
        }
    }

    /// Uniformly random bits.
    #[must_use]
    pub fn random<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Self {
        Self::new((0..len).map(|_| rng.gen_bool(0.5)).collect())
    }

    /// The bits.
    #[must_use]
    pub fn genes(&self) -> &[bool] {
        &self.genes
    }

    /// Number of bits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    /// Whether there are no bits.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Number of set bits.
    #[must_use]
    pub fn count_ones(&self) -> usize {
        self.genes.iter().filter(|&&bit| bit).count()
    }

    /// Copy with every bit flipped independently with probability `rate`.
    #[must_use]
    pub fn flip_bits<R: Rng + ?Sized>(&self, rate: f64, rng: &mut R) -> Self {
        Self::new(
            self.genes
                .iter()
                .map(|&bit| if rng.r#gen::<f64>() < rate { !bit } else { bit })
                .collect(),
        )
    }

    /// Two children taking each position from either parent with equal odds.
    #[must_use]
    pub fn uniform_crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let (first, second): (Vec<bool>, Vec<bool>) = self
            .genes
            .iter()
            .zip(&other.genes)
            .map(|(&a, &b)| if rng.gen_bool(0.5) { (a, b) } else { (b, a) })
            .unzip();
        (Self::new(first), Self::new(second))
    }
}

impl Chromosome for BitChromosome {
    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    fn crossover(&self, other: &Self, rate: f64, rng: &mut dyn RngCore) -> Vec<Self> {
        if rng.r#gen::<f64>() < rate {
            let (a, b) = self.uniform_crossover(other, rng);
            vec![a, b]
        } else {
            vec![self.clone(), other.clone()]
        }
    }

    fn mutate(&self, rate: f64, rng: &mut dyn RngCore) -> Self {
        if self.genes.is_empty() || rng.r#gen::<f64>() >= rate {
            return self.clone();
        }
        let mut genes = self.genes.clone();
        let i = rng.gen_range(0..genes.len());
        genes[i] = !genes[i];
        Self::new(genes)
    }
}

impl fmt::Display for BitChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &bit in &self.genes {
            f.write_str(if bit { "1" } else { "0" })?;
        }
        Ok(())
    }
}
