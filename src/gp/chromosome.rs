//! The chromosome contract shared by every genome representation.
//!
//! Fitness is an error measure: lower is better. Unevaluated chromosomes
//! carry no fitness. The ordering used everywhere in the crate is
//! [`compare_fitness`]: every non-NaN value ranks before NaN, and NaN ranks
//! before an unset fitness.

use rand::RngCore;
use std::cmp::Ordering;
use std::fmt;

/// A candidate solution with a representation and a fitness value.
pub trait Chromosome: Clone + Send + Sync + fmt::Debug {
    /// Current fitness, or `None` when not yet evaluated.
    fn fitness(&self) -> Option<f64>;

    /// Record an evaluated fitness.
    fn set_fitness(&mut self, fitness: f64);

    /// Forget the fitness, e.g. after the representation changed.
    fn clear_fitness(&mut self);

    /// Recombine with `other`. Recombination happens with probability `rate`;
    /// otherwise copies of both parents are returned.
    fn crossover(&self, other: &Self, rate: f64, rng: &mut dyn RngCore) -> Vec<Self>;

    /// Return a mutated copy. With probability `rate` the copy receives one
    /// edit and loses its fitness; otherwise it is an unchanged clone.
    #[must_use]
    fn mutate(&self, rate: f64, rng: &mut dyn RngCore) -> Self;

    /// Deep copy, fitness included.
    #[must_use]
    fn make_copy(&self) -> Self {
        self.clone()
    }

    /// Whether this chromosome ranks strictly before `other`.
    fn is_better_than(&self, other: &Self) -> bool {
        compare_fitness(self.fitness(), other.fitness()) == Ordering::Less
    }
}

/// Total order over optional fitness values, best first.
#[must_use]
pub fn compare_fitness(a: Option<f64>, b: Option<f64>) -> Ordering {
    fn rank(f: Option<f64>) -> u8 {
        match f {
            Some(v) if !v.is_nan() => 0,
            Some(_) => 1,
            None => 2,
        }
    }

    match (a, b) {
        (Some(x), Some(y)) if !x.is_nan() && !y.is_nan() => {
            x.partial_cmp(&y).unwrap_or(Ordering::Equal)
        }
        _ => rank(a).cmp(&rank(b)),
    }
}
