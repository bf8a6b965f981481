//! CLI command for symbolic regression runs.

// Progress positions and sample coordinates use intentional casts
#![allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]

use crate::cli::output::{JsonRunResult, format_text};
use crate::cli::{CliError, EvaluatorKind, OutputFormat, Target};
use genprog::gp::{
    DataSet, Evaluator, Evolution, EvolutionConfig, Fitness, GenerationState, LogProgress,
    MeanSquaredError, Operators, RampedHalfAndHalf, SequentialEvaluator, SubtreeCrossover,
    ThreadPoolEvaluator, TournamentSelection, TreeChromosome, TreeConfig, TreeMutation,
    WorkerPoolEvaluator,
};
use genprog::GpResult;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::path::PathBuf;
use std::sync::Arc;

/// Options of the evolve command.
#[derive(Debug, Clone)]
pub(crate) struct EvolveArgs {
    pub(crate) config: Option<PathBuf>,
    pub(crate) target: Target,
    pub(crate) population: Option<usize>,
    pub(crate) generations: Option<usize>,
    pub(crate) seed: Option<u64>,
    pub(crate) target_fitness: Option<f64>,
    pub(crate) evaluator: EvaluatorKind,
    pub(crate) threads: Option<usize>,
    pub(crate) mutation: String,
    pub(crate) max_depth: usize,
    pub(crate) samples: usize,
    pub(crate) split: f64,
    pub(crate) format: OutputFormat,
    pub(crate) progress: bool,
}

/// Execute the evolve command.
pub(crate) fn execute(args: &EvolveArgs) -> Result<(), CliError> {
    let config = evolution_config(args)?;
    let mutation = TreeMutation::from_tag(&args.mutation)?;
    let tree = Arc::new(TreeConfig {
        max_depth: args.max_depth,
        init_depth: args.max_depth.min(TreeConfig::default().init_depth),
        num_variables: args.target.arity(),
        mutation: mutation.strategy(),
        ..TreeConfig::default()
    });
    tree.validate()?;

    let mut rng = SmallRng::seed_from_u64(config.seed);
    let data = sample_target(args.target, args.samples, &mut rng)?;
    let (train, test) = data.split(args.split, &mut rng)?;
    if train.is_empty() {
        return Err(CliError::new("training set is empty; raise --samples or --split"));
    }
    info!(
        "fitting {} on {} training and {} testing samples",
        args.target.formula(),
        train.len(),
        test.len()
    );

    let fitness: Arc<dyn Fitness<TreeChromosome>> =
        Arc::new(MeanSquaredError::new(Arc::new(train)));
    let evaluator = build_evaluator(args.evaluator, args.threads, fitness)?;
    let operators = Operators::new(
        TournamentSelection::new(config.tournament_arity)?,
        SubtreeCrossover,
        mutation,
    );
    let mut init = RampedHalfAndHalf::new(tree, config.population_size)?;

    let max_generations = config.max_generations;
    let mut evolution = Evolution::new(config.clone(), operators, evaluator, &mut init)?
        .with_listener(LogProgress::every(10));

    let progress = args.progress.then(|| progress_bar(max_generations));
    if let Some(pb) = &progress {
        let pb = pb.clone();
        evolution.add_listener(move |state: &mut GenerationState<'_, TreeChromosome>| {
            pb.set_position(state.generation() as u64);
            pb.set_message(format!("best {:.6}", state.stats().best_fitness));
        });
    }

    let result = evolution.run()?;
    if let Some(pb) = progress {
        pb.finish_with_message("done");
    }

    let test_mse = if test.is_empty() {
        None
    } else {
        Some(MeanSquaredError::new(Arc::new(test)).calc(&result.best)?)
    };

    match args.format {
        OutputFormat::Text => print!("{}", format_text(args.target, &result, test_mse)),
        OutputFormat::Json => {
            let json = JsonRunResult::new(args.target, args.evaluator, &config, &result, test_mse);
            println!("{}", serde_json::to_string_pretty(&json)?);
        }
    }
    Ok(())
}

/// Load the configuration file, if any, and apply command-line overrides.
fn evolution_config(args: &EvolveArgs) -> GpResult<EvolutionConfig> {
    let mut config = match &args.config {
        Some(path) => EvolutionConfig::load(path)?,
        None => EvolutionConfig::default(),
    };
    if let Some(population) = args.population {
        config.population_size = population;
    }
    if let Some(generations) = args.generations {
        config.max_generations = generations;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if args.target_fitness.is_some() {
        config.target_fitness = args.target_fitness;
    }
    config.validate()?;
    Ok(config)
}

/// Draw `samples` uniform points from `[-1, 1]^arity` and tabulate `target`.
fn sample_target(target: Target, samples: usize, rng: &mut SmallRng) -> GpResult<DataSet> {
    let rows: Vec<Vec<f64>> = (0..samples)
        .map(|_| (0..target.arity()).map(|_| rng.gen_range(-1.0..=1.0)).collect())
        .collect();
    DataSet::from_function(target.arity(), &rows, |x| target.eval(x))
}

fn build_evaluator(
    kind: EvaluatorKind,
    threads: Option<usize>,
    fitness: Arc<dyn Fitness<TreeChromosome>>,
) -> GpResult<Box<dyn Evaluator<TreeChromosome>>> {
    let threads =
        threads.unwrap_or_else(|| std::thread::available_parallelism().map_or(1, usize::from));
    Ok(match kind {
        EvaluatorKind::Sequential => Box::new(SequentialEvaluator::new(fitness)),
        EvaluatorKind::ThreadPool => Box::new(ThreadPoolEvaluator::with_threads(fitness, threads)?),
        EvaluatorKind::WorkerPool => Box::new(WorkerPoolEvaluator::new(fitness, threads)?),
    })
}

const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} generations {msg}";

fn progress_bar(generations: usize) -> ProgressBar {
    if generations == 0 {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] gen {pos} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        return pb;
    }
    let pb = ProgressBar::new(generations as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(BAR_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    pb
}
