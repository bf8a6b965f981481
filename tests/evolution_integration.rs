//! End-to-end runs of the generational driver.
//!
//! These tests evolve expression trees against a small regression problem
//! and check that the run is reproducible regardless of the evaluation model.
//!
//! Run with: cargo test --release evolution_integration

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::float_cmp)]

use std::sync::Arc;

use genprog::gp::{
    DataSet, Evaluator, Evolution, EvolutionConfig, Fitness, GenerationState, MeanSquaredError,
    MutationStrategy, Operators, RampedHalfAndHalf, SequentialEvaluator, Stagnation,
    SubtreeCrossover, ThreadPoolEvaluator, TournamentSelection, TreeChromosome, TreeConfig,
    TreeMutation, WorkerPoolEvaluator,
};
use genprog::{GpError, GpResult};

fn quadratic() -> Arc<DataSet> {
    let rows: Vec<Vec<f64>> = (0..30).map(|i| vec![f64::from(i) / 15.0 - 1.0]).collect();
    Arc::new(DataSet::from_function(1, &rows, |x| x[0] * x[0] + x[0]).unwrap())
}

fn tree_config(mutation: MutationStrategy) -> Arc<TreeConfig> {
    Arc::new(TreeConfig {
        max_depth: 5,
        init_depth: 3,
        mutation,
        ..TreeConfig::default()
    })
}

fn regression(
    config: EvolutionConfig,
    mutation: MutationStrategy,
    evaluator: Box<dyn Evaluator<TreeChromosome>>,
) -> GpResult<Evolution<TreeChromosome>> {
    let operators = Operators::new(
        TournamentSelection::new(config.tournament_arity)?,
        SubtreeCrossover,
        TreeMutation::new(mutation),
    );
    let mut init = RampedHalfAndHalf::new(tree_config(mutation), config.population_size)?;
    Evolution::new(config, operators, evaluator, &mut init)
}

fn small_config() -> EvolutionConfig {
    EvolutionConfig::default()
        .with_population_size(60)
        .with_max_generations(15)
        .with_mutation_rate(0.3)
        .with_seed(2024)
}

fn mse() -> Arc<dyn Fitness<TreeChromosome>> {
    Arc::new(MeanSquaredError::new(quadratic()))
}

#[test]
fn test_regression_improves_for_every_mutation() {
    for strategy in MutationStrategy::ALL {
        let evaluator = Box::new(SequentialEvaluator::new(mse()));
        let mut evolution = regression(small_config(), strategy, evaluator).unwrap();
        let initial = evolution.history()[0].best_fitness;
        let result = evolution.run().unwrap();

        let best = result.best_fitness.unwrap();
        assert!(best <= initial, "{strategy}: {best} > {initial}");
        assert!(result.best.depth() <= 5);
        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness <= pair[0].best_fitness);
        }
    }
}

#[test]
fn test_evaluation_model_does_not_change_the_run() {
    let evaluators: Vec<Box<dyn Evaluator<TreeChromosome>>> = vec![
        Box::new(SequentialEvaluator::new(mse())),
        Box::new(ThreadPoolEvaluator::with_threads(mse(), 4).unwrap()),
        Box::new(WorkerPoolEvaluator::new(mse(), 4).unwrap()),
    ];

    let results: Vec<_> = evaluators
        .into_iter()
        .map(|evaluator| {
            regression(small_config(), MutationStrategy::Subtree, evaluator)
                .unwrap()
                .run()
                .unwrap()
        })
        .collect();

    for result in &results[1..] {
        assert_eq!(result.best.root(), results[0].best.root());
        assert_eq!(result.history, results[0].history);
    }
}

#[test]
fn test_target_fitness_stops_run() {
    let config = small_config()
        .with_max_generations(0)
        .with_target_fitness(f64::INFINITY);
    let evaluator = Box::new(SequentialEvaluator::new(mse()));
    let result = regression(config, MutationStrategy::Subtree, evaluator)
        .unwrap()
        .run()
        .unwrap();

    assert!(result.terminated_early);
    assert_eq!(result.generations, 0);
}

#[test]
fn test_listeners_stop_unbounded_run() {
    let config = small_config().with_max_generations(0);
    let evaluator = Box::new(SequentialEvaluator::new(mse()));
    let mut evolution = regression(config, MutationStrategy::Point, evaluator)
        .unwrap()
        .with_listener(Stagnation::new(3))
        .with_listener(|state: &mut GenerationState<'_, TreeChromosome>| {
            if state.generation() >= 200 {
                state.terminate();
            }
        });

    let result = evolution.run().unwrap();
    assert!(result.terminated_early);
    assert!(result.generations <= 200);
    assert_eq!(result.history.len(), result.generations + 1);
}

#[test]
fn test_config_file_drives_run() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("evolution.json");
    std::fs::write(
        &path,
        r#"{"population_size": 24, "max_generations": 4, "seed": 9}"#,
    )
    .unwrap();

    let config = EvolutionConfig::load(&path).unwrap();
    assert_eq!(config.crossover_rate, EvolutionConfig::default().crossover_rate);

    let evaluator = Box::new(SequentialEvaluator::new(mse()));
    let mut evolution = regression(config.clone(), MutationStrategy::Hoist, evaluator).unwrap();
    let result = evolution.run().unwrap();
    assert_eq!(result.generations, 4);
    assert_eq!(evolution.population().len(), 24);

    let saved = dir.path().join("saved.json");
    config.save(&saved).unwrap();
    assert_eq!(EvolutionConfig::load(&saved).unwrap(), config);
}

#[test]
fn test_invalid_config_file_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"tournament_arity": 0}"#).unwrap();
    assert!(EvolutionConfig::load(&path).is_err());
    assert!(matches!(
        EvolutionConfig::load(&dir.path().join("missing.json")),
        Err(GpError::Io(_))
    ));
}
