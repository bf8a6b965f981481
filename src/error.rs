//! Error types for the evolutionary engine.

use thiserror::Error;

/// Errors raised by configuration, strategies, evaluation and the driver.
#[derive(Debug, Error)]
pub enum GpError {
    /// A configuration value is invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A ratio or percentage lies outside `[0, 1]`.
    #[error("{name} must be within [0, 1], got {value}")]
    OutOfRange {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// A strategy tag was not recognized.
    #[error("unknown strategy: {0:?}")]
    UnknownStrategy(String),

    /// An argument violates an operation's contract.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A fitness computation failed.
    #[error("evaluation of chromosome {index} failed: {message}")]
    Evaluation {
        /// Position of the chromosome in the evaluated population.
        index: usize,
        /// Failure description.
        message: String,
    },

    /// The worker pool cannot accept or complete work.
    #[error("worker pool error: {0}")]
    WorkerPool(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl GpError {
    /// Reject `value` unless it lies within `[0, 1]`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] for values outside the unit interval
    /// and for NaN.
    pub fn check_unit(name: &'static str, value: f64) -> GpResult<f64> {
        if (0.0..=1.0).contains(&value) {
            Ok(value)
        } else {
            Err(Self::OutOfRange { name, value })
        }
    }
}

/// Result type used throughout the crate.
pub type GpResult<T> = Result<T, GpError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_unit_accepts_bounds() {
        assert!(GpError::check_unit("rate", 0.0).is_ok());
        assert!(GpError::check_unit("rate", 1.0).is_ok());
    }

    #[test]
    fn test_check_unit_rejects_nan_and_outside() {
        assert!(matches!(
            GpError::check_unit("rate", f64::NAN),
            Err(GpError::OutOfRange { name: "rate", .. })
        ));
        assert!(GpError::check_unit("rate", -0.1).is_err());
        assert!(GpError::check_unit("rate", 1.5).is_err());
    }

    #[test]
    fn test_display() {
        let err = GpError::Evaluation {
            index: 3,
            message: "division failed".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "evaluation of chromosome 3 failed: division failed"
        );
    }
}
