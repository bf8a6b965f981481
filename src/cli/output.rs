//! Output formatting utilities for CLI.

use crate::cli::{EvaluatorKind, Target};
use genprog::gp::{EvolutionConfig, EvolutionResult, GenerationStats, TreeChromosome};
use serde::Serialize;

/// JSON-serializable run result.
#[derive(Debug, Serialize)]
pub(super) struct JsonRunResult<'a> {
    /// Regression target.
    pub(super) target: Target,
    /// Target formula.
    pub(super) formula: &'static str,
    /// Best evolved expression.
    pub(super) expression: String,
    /// Training error of the best expression (null if unevaluated).
    pub(super) train_mse: Option<f64>,
    /// Held-out error (null without a test set).
    pub(super) test_mse: Option<f64>,
    /// Generations completed.
    pub(super) generations: usize,
    /// Whether a target or listener stopped the run.
    pub(super) terminated_early: bool,
    /// Wall-clock duration.
    pub(super) elapsed_seconds: f64,
    /// Evaluation model used.
    pub(super) evaluator: EvaluatorKind,
    /// Per-generation statistics.
    pub(super) history: &'a [GenerationStats],
    /// Effective configuration.
    pub(super) config: &'a EvolutionConfig,
}

impl<'a> JsonRunResult<'a> {
    /// Create from an evolution result.
    pub(super) fn new(
        target: Target,
        evaluator: EvaluatorKind,
        config: &'a EvolutionConfig,
        result: &'a EvolutionResult<TreeChromosome>,
        test_mse: Option<f64>,
    ) -> Self {
        Self {
            target,
            formula: target.formula(),
            expression: result.best.to_string(),
            train_mse: result.best_fitness,
            test_mse,
            generations: result.generations,
            terminated_early: result.terminated_early,
            elapsed_seconds: result.elapsed_seconds,
            evaluator,
            history: &result.history,
            config,
        }
    }
}

/// Format a run result as human-readable text.
pub(super) fn format_text(
    target: Target,
    result: &EvolutionResult<TreeChromosome>,
    test_mse: Option<f64>,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Target: {}\n", target.formula()));
    output.push_str(&format!("  Best: {}\n", result.best));
    match result.best_fitness {
        Some(mse) => output.push_str(&format!("  Train MSE: {mse:.6}\n")),
        None => output.push_str("  Train MSE: n/a\n"),
    }
    if let Some(mse) = test_mse {
        output.push_str(&format!("  Test MSE: {mse:.6}\n"));
    }
    output.push_str(&format!(
        "  Generations: {}{}\n",
        result.generations,
        if result.terminated_early { " (stopped early)" } else { "" }
    ));
    output.push_str(&format!("  Elapsed: {:.2}s\n", result.elapsed_seconds));

    output
}
