//! Ordered population of chromosomes.
//!
//! Sorting always uses [`compare_fitness`] and is stable, so individuals with
//! equal fitness keep their insertion order.

// Statistics use intentional casts
#![allow(clippy::cast_precision_loss)]

use crate::error::{GpError, GpResult};
use crate::gp::chromosome::{Chromosome, compare_fitness};
use crate::gp::initializer::Initializer;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Insertion-ordered collection of chromosomes of one representation.
#[derive(Debug, Clone, PartialEq)]
pub struct Population<C> {
    chromosomes: Vec<C>,
}

impl<C> Default for Population<C> {
    fn default() -> Self {
        Self {
            chromosomes: Vec::new(),
        }
    }
}

impl<C: Chromosome> Population<C> {
    /// Empty population.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty population with room for `capacity` chromosomes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            chromosomes: Vec::with_capacity(capacity),
        }
    }

    /// Population holding whatever `initializer` generates.
    pub fn from_initializer(initializer: &mut dyn Initializer<C>, rng: &mut dyn RngCore) -> Self {
        Self {
            chromosomes: initializer.generate(rng),
        }
    }

    /// Chromosome at `index`.
    #[must_use]
    pub fn get_chromosome(&self, index: usize) -> Option<&C> {
        self.chromosomes.get(index)
    }

    /// Mutable chromosome at `index`.
    pub fn get_chromosome_mut(&mut self, index: usize) -> Option<&mut C> {
        self.chromosomes.get_mut(index)
    }

    /// Replace the chromosome at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::InvalidArgument`] if `index` is out of range.
    pub fn set_chromosome(&mut self, index: usize, chromosome: C) -> GpResult<()> {
        let len = self.chromosomes.len();
        let slot = self.chromosomes.get_mut(index).ok_or_else(|| {
            GpError::InvalidArgument(format!("index {index} out of range for population of {len}"))
        })?;
        *slot = chromosome;
        Ok(())
    }

    /// Position of the first chromosome equal to `chromosome`.
    #[must_use]
    pub fn index_of(&self, chromosome: &C) -> Option<usize>
    where
        C: PartialEq,
    {
        self.chromosomes.iter().position(|c| c == chromosome)
    }

    /// Append a chromosome.
    pub fn add_chromosome(&mut self, chromosome: C) {
        self.chromosomes.push(chromosome);
    }

    /// Number of chromosomes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.chromosomes.len()
    }

    /// Whether the population is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chromosomes.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, C> {
        self.chromosomes.iter()
    }

    /// Iterate mutably in insertion order.
    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, C> {
        self.chromosomes.iter_mut()
    }

    /// The chromosomes as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.chromosomes
    }

    /// The chromosomes as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.chromosomes
    }

    /// Remove and return every chromosome, leaving the population empty.
    pub fn take_all(&mut self) -> Vec<C> {
        std::mem::take(&mut self.chromosomes)
    }

    /// Sort ascending by fitness, best first.
    pub fn sort_by_fitness(&mut self) {
        self.chromosomes.sort_by(|a, b| compare_fitness(a.fitness(), b.fitness()));
    }

    /// Best chromosome; the first one wins ties.
    #[must_use]
    pub fn best(&self) -> Option<&C> {
        self.chromosomes.iter().reduce(|best, c| {
            if c.is_better_than(best) { c } else { best }
        })
    }

    /// New population holding copies of the `elitism` best chromosomes.
    #[must_use]
    pub fn next_generation(&self, elitism: usize) -> Self {
        let mut sorted = self.clone();
        sorted.sort_by_fitness();
        sorted.chromosomes.truncate(elitism);
        sorted
    }

    /// Sort in place, keep the best `length` chromosomes and return a copy of
    /// the best one.
    pub fn trim(&mut self, length: usize) -> Option<C> {
        self.sort_by_fitness();
        let best = self.chromosomes.first().cloned();
        self.chromosomes.truncate(length);
        best
    }

    /// Fitness statistics over evaluated, non-NaN chromosomes.
    #[must_use]
    pub fn stats(&self) -> FitnessStats {
        let fitness: Vec<f64> = self
            .chromosomes
            .iter()
            .filter_map(Chromosome::fitness)
            .filter(|f| !f.is_nan())
            .collect();
        FitnessStats::from_fitness(&fitness)
    }
}

impl<C> From<Vec<C>> for Population<C> {
    fn from(chromosomes: Vec<C>) -> Self {
        Self { chromosomes }
    }
}

impl<C> FromIterator<C> for Population<C> {
    fn from_iter<I: IntoIterator<Item = C>>(iter: I) -> Self {
        Self {
            chromosomes: iter.into_iter().collect(),
        }
    }
}

impl<C> IntoIterator for Population<C> {
    type Item = C;
    type IntoIter = std::vec::IntoIter<C>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.into_iter()
    }
}

impl<'a, C> IntoIterator for &'a Population<C> {
    type Item = &'a C;
    type IntoIter = std::slice::Iter<'a, C>;

    fn into_iter(self) -> Self::IntoIter {
        self.chromosomes.iter()
    }
}

/// Summary of a population's fitness values. Lower is better.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitnessStats {
    /// Lowest fitness.
    pub best: f64,
    /// Mean fitness.
    pub mean: f64,
    /// Highest fitness.
    pub worst: f64,
    /// Standard deviation of fitness.
    pub std_dev: f64,
}

impl FitnessStats {
    /// Statistics over `fitness`. Infinite values propagate into the result.
    #[must_use]
    pub fn from_fitness(fitness: &[f64]) -> Self {
        if fitness.is_empty() {
            return Self {
                best: f64::NAN,
                mean: f64::NAN,
                worst: f64::NAN,
                std_dev: f64::NAN,
            };
        }

        let mean = fitness.iter().sum::<f64>() / fitness.len() as f64;
        let best = fitness.iter().copied().fold(f64::INFINITY, f64::min);
        let worst = fitness.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let variance = fitness.iter().map(|f| (f - mean).powi(2)).sum::<f64>()
            / fitness.len() as f64;

        Self {
            best,
            mean,
            worst,
            std_dev: variance.sqrt(),
        }
    }
}
