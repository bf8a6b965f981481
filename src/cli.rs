//! CLI command implementations for Genprog.

pub(crate) mod config;
pub(crate) mod evolve;

mod output;

use clap::ValueEnum;
use genprog::GpError;
use serde::Serialize;
use std::error::Error;
use std::fmt;

/// Output format for the `evolve` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Fitness evaluation model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum EvaluatorKind {
    /// Evaluate on the main thread.
    Sequential,
    /// Evaluate on a rayon thread pool.
    ThreadPool,
    /// Evaluate on long-lived worker threads fed by a task queue.
    WorkerPool,
}

/// Built-in regression target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Target {
    /// x^4 + x^3 + x^2 + x
    Quartic,
    /// sin(x) + x / 2
    Sine,
    /// 2 x0 - x1 + 0.5
    Plane,
}

impl Target {
    /// Number of input variables.
    pub(crate) fn arity(self) -> usize {
        match self {
            Self::Quartic | Self::Sine => 1,
            Self::Plane => 2,
        }
    }

    /// Value of the target at `x`.
    pub(crate) fn eval(self, x: &[f64]) -> f64 {
        match self {
            Self::Quartic => {
                let v = x[0];
                v * v * v * v + v * v * v + v * v + v
            }
            Self::Sine => x[0].sin() + x[0] / 2.0,
            Self::Plane => 2.0 * x[0] - x[1] + 0.5,
        }
    }

    /// Formula for display.
    pub(crate) fn formula(self) -> &'static str {
        match self {
            Self::Quartic => "x0^4 + x0^3 + x0^2 + x0",
            Self::Sine => "sin(x0) + x0 / 2",
            Self::Plane => "2 * x0 - x1 + 0.5",
        }
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GpError> for CliError {
    fn from(e: GpError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(e.to_string())
    }
}
