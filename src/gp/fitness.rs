//! Fitness functions.
//!
//! A fitness function maps a chromosome to an error measure; lower is
//! better. Functions must not touch population state, which lets the
//! evaluation engine call them from several threads at once.

// Error averages divide by the sample count
#![allow(clippy::cast_precision_loss)]

use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::dataset::DataSet;
use crate::gp::tree::TreeChromosome;
use std::sync::Arc;

/// Computes a chromosome's fitness.
pub trait Fitness<C: Chromosome>: Send + Sync {
    /// Fitness of `chromosome`.
    ///
    /// # Errors
    ///
    /// Fails when the chromosome cannot be scored.
    fn calc(&self, chromosome: &C) -> GpResult<f64>;
}

impl<C, F> Fitness<C> for F
where
    C: Chromosome,
    F: Fn(&C) -> GpResult<f64> + Send + Sync,
{
    fn calc(&self, chromosome: &C) -> GpResult<f64> {
        self(chromosome)
    }
}

fn check_dataset(data: &DataSet, tree: &TreeChromosome) -> GpResult<()> {
    if data.is_empty() {
        return Err(GpError::InvalidArgument("dataset has no samples".to_string()));
    }
    if data.output_arity() == 0 {
        return Err(GpError::InvalidArgument("dataset has no outputs".to_string()));
    }
    let needed = tree.config().num_variables;
    if data.input_arity() < needed {
        return Err(GpError::InvalidArgument(format!(
            "dataset provides {} inputs but trees use {needed} variables",
            data.input_arity()
        )));
    }
    Ok(())
}

fn mean_error(data: &DataSet, tree: &TreeChromosome, loss: fn(f64) -> f64) -> GpResult<f64> {
    check_dataset(data, tree)?;
    let total: f64 = data
        .samples()
        .map(|(input, output)| loss(tree.eval(input) - output[0]))
        .sum();
    Ok(total / data.len() as f64)
}

/// Mean squared error of a tree's output against the first output column.
#[derive(Debug, Clone)]
pub struct MeanSquaredError {
    data: Arc<DataSet>,
}

impl MeanSquaredError {
    /// Score trees against `data`.
    #[must_use]
    pub fn new(data: Arc<DataSet>) -> Self {
        Self { data }
    }

    /// The samples scored against.
    #[must_use]
    pub fn data(&self) -> &DataSet {
        &self.data
    }
}

impl Fitness<TreeChromosome> for MeanSquaredError {
    fn calc(&self, chromosome: &TreeChromosome) -> GpResult<f64> {
        mean_error(&self.data, chromosome, |e| e * e)
    }
}

/// Mean absolute error of a tree's output against the first output column.
#[derive(Debug, Clone)]
pub struct MeanAbsoluteError {
    data: Arc<DataSet>,
}

impl MeanAbsoluteError {
    /// Score trees against `data`.
    #[must_use]
    pub fn new(data: Arc<DataSet>) -> Self {
        Self { data }
    }
}

impl Fitness<TreeChromosome> for MeanAbsoluteError {
    fn calc(&self, chromosome: &TreeChromosome) -> GpResult<f64> {
        mean_error(&self.data, chromosome, f64::abs)
    }
}
