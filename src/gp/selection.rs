//! Selection operators.
//!
//! Selection picks the parents that reproduce. The driver only sees the
//! [`Selection`] trait; [`TournamentSelection`] is the stock implementation.

use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::population::Population;
use rand::RngCore;
use rand::seq::SliceRandom;
use std::fmt;

/// Picks a pair of parents from a population.
pub trait Selection<C: Chromosome>: Send + fmt::Debug {
    /// Select `(winner, runner_up)`, with `winner` never worse than
    /// `runner_up`.
    ///
    /// # Errors
    ///
    /// Fails when the population cannot support the selection scheme.
    fn select<'a>(
        &self,
        population: &'a Population<C>,
        rng: &mut dyn RngCore,
    ) -> GpResult<(&'a C, &'a C)>;

    /// Competitors per draw, for schemes that have a fixed count.
    fn competitors(&self) -> Option<usize> {
        None
    }
}

/// Tournament selection without replacement.
///
/// Each draw shuffles the population's indices, takes the first `arity` and
/// keeps the fittest. Two independent draws form the parent pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TournamentSelection {
    arity: usize,
}

impl TournamentSelection {
    /// Tournament of `arity` competitors.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] when `arity` is zero.
    pub fn new(arity: usize) -> GpResult<Self> {
        if arity == 0 {
            return Err(GpError::Configuration(
                "tournament arity must be at least 1".to_string(),
            ));
        }
        Ok(Self { arity })
    }

    /// Number of competitors per tournament.
    #[must_use]
    pub fn arity(&self) -> usize {
        self.arity
    }

    fn tournament<'a, C: Chromosome>(
        &self,
        population: &'a Population<C>,
        indices: &mut [usize],
        rng: &mut dyn RngCore,
    ) -> Option<&'a C> {
        indices.shuffle(rng);
        indices[..self.arity]
            .iter()
            .filter_map(|&i| population.get_chromosome(i))
            .reduce(|best, c| if c.is_better_than(best) { c } else { best })
    }
}

impl<C: Chromosome> Selection<C> for TournamentSelection {
    fn select<'a>(
        &self,
        population: &'a Population<C>,
        rng: &mut dyn RngCore,
    ) -> GpResult<(&'a C, &'a C)> {
        if population.len() < self.arity {
            return Err(GpError::InvalidArgument(format!(
                "population of {} is smaller than tournament arity {}",
                population.len(),
                self.arity
            )));
        }

        let mut indices: Vec<usize> = (0..population.len()).collect();
        let empty = || GpError::InvalidArgument("population is empty".to_string());
        let first = self.tournament(population, &mut indices, rng).ok_or_else(empty)?;
        let second = self.tournament(population, &mut indices, rng).ok_or_else(empty)?;

        if second.is_better_than(first) {
            Ok((second, first))
        } else {
            Ok((first, second))
        }
    }

    fn competitors(&self) -> Option<usize> {
        Some(self.arity)
    }
}
