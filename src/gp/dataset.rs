//! Labeled sample matrix used by regression fitness functions.
//!
//! Samples are stored row-major in two flat buffers, one for inputs and one
//! for outputs, so every sample is a pair of contiguous slices.

// Split sizes round a scaled sample count
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::error::{GpError, GpResult};
use rand::RngCore;
use rand::seq::SliceRandom;

/// Fixed-arity input/output samples.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSet {
    input_arity: usize,
    output_arity: usize,
    inputs: Vec<f64>,
    outputs: Vec<f64>,
}

impl DataSet {
    /// Empty dataset with the given arities.
    #[must_use]
    pub fn new(input_arity: usize, output_arity: usize) -> Self {
        Self {
            input_arity,
            output_arity,
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// Append one sample.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::InvalidArgument`] when either slice has the wrong
    /// length.
    pub fn push_sample(&mut self, input: &[f64], output: &[f64]) -> GpResult<()> {
        if input.len() != self.input_arity || output.len() != self.output_arity {
            return Err(GpError::InvalidArgument(format!(
                "sample of shape {}x{} does not match dataset shape {}x{}",
                input.len(),
                output.len(),
                self.input_arity,
                self.output_arity
            )));
        }
        self.inputs.extend_from_slice(input);
        self.outputs.extend_from_slice(output);
        Ok(())
    }

    /// Tabulate a single-output function over the given input rows.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::InvalidArgument`] when a row has the wrong length.
    pub fn from_function<F>(input_arity: usize, rows: &[Vec<f64>], f: F) -> GpResult<Self>
    where
        F: Fn(&[f64]) -> f64,
    {
        let mut data = Self::new(input_arity, 1);
        for row in rows {
            data.push_sample(row, &[f(row)])?;
        }
        Ok(data)
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.output_arity == 0 {
            self.inputs.len().checked_div(self.input_arity).unwrap_or(0)
        } else {
            self.outputs.len() / self.output_arity
        }
    }

    /// Whether there are no samples.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values per input row.
    #[must_use]
    pub fn input_arity(&self) -> usize {
        self.input_arity
    }

    /// Values per output row.
    #[must_use]
    pub fn output_arity(&self) -> usize {
        self.output_arity
    }

    /// Inputs of sample `index`.
    #[must_use]
    pub fn input(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.input_arity)?;
        if index >= self.len() {
            return None;
        }
        self.inputs.get(start..start + self.input_arity)
    }

    /// Outputs of sample `index`.
    #[must_use]
    pub fn output(&self, index: usize) -> Option<&[f64]> {
        let start = index.checked_mul(self.output_arity)?;
        if index >= self.len() {
            return None;
        }
        self.outputs.get(start..start + self.output_arity)
    }

    /// Iterate `(input, output)` pairs in sample order.
    pub fn samples(&self) -> impl Iterator<Item = (&[f64], &[f64])> + '_ {
        (0..self.len()).filter_map(|i| Some((self.input(i)?, self.output(i)?)))
    }

    /// Split into non-overlapping training and testing sets.
    ///
    /// Samples are assigned through a full random permutation. The training
    /// set receives `ceil(percent * len)` samples, the testing set the rest.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] unless `percent` lies within `[0, 1]`.
    pub fn split(&self, percent: f64, rng: &mut dyn RngCore) -> GpResult<(Self, Self)> {
        let (train_idx, test_idx) = self.split_indices(percent, rng)?;
        Ok((self.subset(&train_idx), self.subset(&test_idx)))
    }

    /// The permutation behind [`DataSet::split`], as index lists.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] unless `percent` lies within `[0, 1]`.
    pub fn split_indices(
        &self,
        percent: f64,
        rng: &mut dyn RngCore,
    ) -> GpResult<(Vec<usize>, Vec<usize>)> {
        let percent = GpError::check_unit("split percent", percent)?;
        let mut indices: Vec<usize> = (0..self.len()).collect();
        indices.shuffle(rng);
        let train = ((percent * indices.len() as f64).ceil() as usize).min(indices.len());
        let test = indices.split_off(train);
        Ok((indices, test))
    }

    fn subset(&self, indices: &[usize]) -> Self {
        let mut data = Self::new(self.input_arity, self.output_arity);
        for &i in indices {
            if let (Some(input), Some(output)) = (self.input(i), self.output(i)) {
                data.inputs.extend_from_slice(input);
                data.outputs.extend_from_slice(output);
            }
        }
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn sample_data(n: usize) -> DataSet {
        let rows: Vec<Vec<f64>> = (0..n).map(|i| vec![i as f64]).collect();
        DataSet::from_function(1, &rows, |x| x[0] * 10.0).unwrap()
    }

    #[test]
    fn test_accessors() {
        let data = sample_data(3);
        assert_eq!(data.len(), 3);
        assert_eq!(data.input(2), Some(&[2.0][..]));
        assert_eq!(data.output(2), Some(&[20.0][..]));
        assert_eq!(data.input(3), None);
        assert_eq!(data.samples().count(), 3);
    }

    #[test]
    fn test_push_sample_checks_shape() {
        let mut data = DataSet::new(2, 1);
        assert!(data.push_sample(&[1.0], &[1.0]).is_err());
        assert!(data.push_sample(&[1.0, 2.0], &[3.0]).is_ok());
        assert_eq!(data.len(), 1);
    }

    #[test]
    fn test_split_half_of_ten() {
        let mut rng = SmallRng::seed_from_u64(42);
        let data = sample_data(10);
        let (train, test) = data.split_indices(0.5, &mut rng).unwrap();
        assert_eq!(train.len(), 5);
        assert_eq!(test.len(), 5);

        let mut all: Vec<usize> = train.iter().chain(&test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..10).collect::<Vec<_>>());
    }

    #[test]
    fn test_split_rounds_up() {
        let mut rng = SmallRng::seed_from_u64(1);
        let data = sample_data(7);
        let (train, test) = data.split(0.5, &mut rng).unwrap();
        assert_eq!(train.len(), 4);
        assert_eq!(test.len(), 3);

        let mut labels: Vec<f64> = train
            .samples()
            .chain(test.samples())
            .map(|(_, out)| out[0])
            .collect();
        labels.sort_by(f64::total_cmp);
        assert_eq!(labels, vec![0.0, 10.0, 20.0, 30.0, 40.0, 50.0, 60.0]);
    }

    #[test]
    fn test_split_bounds() {
        let mut rng = SmallRng::seed_from_u64(3);
        let data = sample_data(4);
        let (train, test) = data.split(0.0, &mut rng).unwrap();
        assert_eq!((train.len(), test.len()), (0, 4));
        let (train, test) = data.split(1.0, &mut rng).unwrap();
        assert_eq!((train.len(), test.len()), (4, 0));
    }

    #[test]
    fn test_split_rejects_percent() {
        let mut rng = SmallRng::seed_from_u64(3);
        let data = sample_data(4);
        assert!(matches!(
            data.split(1.01, &mut rng),
            Err(GpError::OutOfRange { .. })
        ));
        assert!(data.split(-0.1, &mut rng).is_err());
        assert!(data.split(f64::NAN, &mut rng).is_err());
    }
}
