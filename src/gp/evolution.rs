//! Generational driver.
//!
//! Each generation the driver carries the elite over unchanged, fills the
//! rest of the next population through selection, crossover and mutation,
//! evaluates it, trims it back to size and reports to the termination
//! listeners:
//!
//! ```text
//! population ──► elites ─────────────────────────┐
//!      │                                         ▼
//!      └──► select ──► crossover ──► mutate ──► next ──► evaluate ──► trim
//!                                                                       │
//!                       listeners ◄── stats ◄── best ◄──────────────────┘
//! ```
//!
//! A failed evaluation aborts the generation and leaves the previous
//! population in place.

// Elapsed time and statistics use intentional casts
#![allow(clippy::cast_precision_loss)]

use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::crossover::Crossover;
use crate::gp::evaluation::Evaluator;
use crate::gp::initializer::Initializer;
use crate::gp::mutation::Mutation;
use crate::gp::population::Population;
use crate::gp::selection::Selection;
use log::{debug, info};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Instant;

/// Configuration for the evolution process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionConfig {
    /// Chromosomes per generation.
    pub population_size: usize,
    /// Probability that a selected pair is recombined.
    pub crossover_rate: f64,
    /// Probability that a child is mutated.
    pub mutation_rate: f64,
    /// Competitors per tournament. [`Evolution::new`] rejects a selection
    /// operator whose own competitor count differs.
    pub tournament_arity: usize,
    /// Best chromosomes carried unchanged into the next generation.
    pub elitism: usize,
    /// Stop once the best fitness is at or below this value.
    pub target_fitness: Option<f64>,
    /// Generation cap; 0 runs until a listener or the target stops the run.
    pub max_generations: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

impl Default for EvolutionConfig {
    fn default() -> Self {
        Self {
            population_size: 100,
            crossover_rate: 0.9,
            mutation_rate: 0.1,
            tournament_arity: 4,
            elitism: 2,
            target_fitness: None,
            max_generations: 100,
            seed: 42,
        }
    }
}

impl EvolutionConfig {
    /// Sets the population size.
    #[must_use]
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the generation cap.
    #[must_use]
    pub fn with_max_generations(mut self, n: usize) -> Self {
        self.max_generations = n;
        self
    }

    /// Sets the crossover rate.
    #[must_use]
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the mutation rate.
    #[must_use]
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the tournament arity.
    #[must_use]
    pub fn with_tournament_arity(mut self, arity: usize) -> Self {
        self.tournament_arity = arity;
        self
    }

    /// Sets the elite count.
    #[must_use]
    pub fn with_elitism(mut self, elitism: usize) -> Self {
        self.elitism = elitism;
        self
    }

    /// Sets the stop threshold.
    #[must_use]
    pub fn with_target_fitness(mut self, target: f64) -> Self {
        self.target_fitness = Some(target);
        self
    }

    /// Sets the RNG seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Check every option. Nothing is clamped.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] for rates outside `[0, 1]` and
    /// [`GpError::Configuration`] for inconsistent sizes.
    pub fn validate(&self) -> GpResult<()> {
        GpError::check_unit("crossover rate", self.crossover_rate)?;
        GpError::check_unit("mutation rate", self.mutation_rate)?;
        if self.population_size == 0 {
            return Err(GpError::Configuration(
                "population size must be at least 1".to_string(),
            ));
        }
        if self.tournament_arity == 0 || self.tournament_arity > self.population_size {
            return Err(GpError::Configuration(format!(
                "tournament arity {} must be within 1..={}",
                self.tournament_arity, self.population_size
            )));
        }
        if self.elitism > self.population_size {
            return Err(GpError::Configuration(format!(
                "elitism {} exceeds population size {}",
                self.elitism, self.population_size
            )));
        }
        if self.target_fitness.is_some_and(f64::is_nan) {
            return Err(GpError::Configuration(
                "target fitness must not be NaN".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// default values.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Json`] for malformed input and any
    /// [`EvolutionConfig::validate`] failure.
    pub fn from_json_str(json: &str) -> GpResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Io`] if the file cannot be read, otherwise as
    /// [`EvolutionConfig::from_json_str`].
    pub fn load(path: &Path) -> GpResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Write the configuration as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> GpResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// The strategies the driver calls through.
#[derive(Debug)]
pub struct Operators<C: Chromosome> {
    /// Parent selection.
    pub selection: Box<dyn Selection<C>>,
    /// Recombination.
    pub crossover: Box<dyn Crossover<C>>,
    /// Mutation.
    pub mutation: Box<dyn Mutation<C>>,
}

impl<C: Chromosome> Operators<C> {
    /// Bundle three strategies.
    pub fn new(
        selection: impl Selection<C> + 'static,
        crossover: impl Crossover<C> + 'static,
        mutation: impl Mutation<C> + 'static,
    ) -> Self {
        Self {
            selection: Box::new(selection),
            crossover: Box::new(crossover),
            mutation: Box::new(mutation),
        }
    }
}

/// Statistics for a single generation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GenerationStats {
    /// Generation number; 0 is the initial population.
    pub generation: usize,
    /// Best fitness in this generation.
    pub best_fitness: f64,
    /// Mean fitness.
    pub mean_fitness: f64,
    /// Worst fitness.
    pub worst_fitness: f64,
    /// Fitness standard deviation.
    pub fitness_std: f64,
}

impl GenerationStats {
    fn of<C: Chromosome>(generation: usize, population: &Population<C>) -> Self {
        let stats = population.stats();
        Self {
            generation,
            best_fitness: stats.best,
            mean_fitness: stats.mean,
            worst_fitness: stats.worst,
            fitness_std: stats.std_dev,
        }
    }
}

/// Driver state handed to listeners after each generation.
#[derive(Debug)]
pub struct GenerationState<'a, C: Chromosome> {
    generation: usize,
    best: &'a C,
    population: &'a Population<C>,
    stats: &'a GenerationStats,
    terminate: bool,
}

impl<C: Chromosome> GenerationState<'_, C> {
    /// Number of the generation just completed.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Best chromosome found so far.
    #[must_use]
    pub fn best(&self) -> &C {
        self.best
    }

    /// The current population, sorted best first.
    #[must_use]
    pub fn population(&self) -> &Population<C> {
        self.population
    }

    /// Statistics of the generation just completed.
    #[must_use]
    pub fn stats(&self) -> &GenerationStats {
        self.stats
    }

    /// Ask the driver to stop after this generation.
    pub fn terminate(&mut self) {
        self.terminate = true;
    }

    /// Whether a stop has been requested.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminate
    }
}

/// Hook invoked once per completed generation.
pub trait TerminationListener<C: Chromosome> {
    /// Inspect the driver; call [`GenerationState::terminate`] to stop.
    fn on_generation(&mut self, state: &mut GenerationState<'_, C>);
}

impl<C, F> TerminationListener<C> for F
where
    C: Chromosome,
    F: FnMut(&mut GenerationState<'_, C>),
{
    fn on_generation(&mut self, state: &mut GenerationState<'_, C>) {
        self(state);
    }
}

/// Logs generation statistics at `info` level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LogProgress {
    every: usize,
}

impl LogProgress {
    /// Log every `n`th generation.
    #[must_use]
    pub fn every(n: usize) -> Self {
        Self { every: n.max(1) }
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::every(1)
    }
}

impl<C: Chromosome> TerminationListener<C> for LogProgress {
    fn on_generation(&mut self, state: &mut GenerationState<'_, C>) {
        if state.generation().is_multiple_of(self.every) {
            let stats = state.stats();
            info!(
                "Gen {:>5}: best={:.6} mean={:.6} std={:.6}",
                stats.generation, stats.best_fitness, stats.mean_fitness, stats.fitness_std
            );
        }
    }
}

/// Stops the run when the best fitness has not improved for `patience`
/// generations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stagnation {
    patience: usize,
    best: Option<f64>,
    stale: usize,
}

impl Stagnation {
    /// Allow `patience` generations without improvement.
    #[must_use]
    pub fn new(patience: usize) -> Self {
        Self {
            patience,
            best: None,
            stale: 0,
        }
    }
}

impl<C: Chromosome> TerminationListener<C> for Stagnation {
    fn on_generation(&mut self, state: &mut GenerationState<'_, C>) {
        let current = state.best().fitness();
        let improved = match (current, self.best) {
            (Some(now), Some(before)) => now < before,
            (Some(now), None) => !now.is_nan(),
            (None, _) => false,
        };
        if improved {
            self.best = current;
            self.stale = 0;
        } else {
            self.stale += 1;
        }
        if self.stale >= self.patience {
            debug!("no improvement for {} generations", self.stale);
            state.terminate();
        }
    }
}

/// Outcome of [`Evolution::run`].
#[derive(Debug, Clone)]
pub struct EvolutionResult<C> {
    /// Best chromosome found.
    pub best: C,
    /// Its fitness.
    pub best_fitness: Option<f64>,
    /// Generations completed.
    pub generations: usize,
    /// Statistics per generation, starting with the initial population.
    pub history: Vec<GenerationStats>,
    /// Whether a target, listener or explicit request stopped the run
    /// before the generation cap.
    pub terminated_early: bool,
    /// Total time in seconds.
    pub elapsed_seconds: f64,
}

/// The generational evolution loop.
pub struct Evolution<C: Chromosome> {
    config: EvolutionConfig,
    operators: Operators<C>,
    evaluator: Box<dyn Evaluator<C>>,
    listeners: Vec<Box<dyn TerminationListener<C>>>,
    population: Population<C>,
    best: C,
    generation: usize,
    history: Vec<GenerationStats>,
    terminated: bool,
    rng: SmallRng,
    started: Instant,
}

impl<C: Chromosome> Evolution<C> {
    /// Validate `config`, build generation zero with `initializer` and
    /// evaluate it.
    ///
    /// # Errors
    ///
    /// Returns configuration errors, [`GpError::Configuration`] when the
    /// initializer produces the wrong number of chromosomes, and any
    /// evaluation error.
    pub fn new(
        config: EvolutionConfig,
        operators: Operators<C>,
        mut evaluator: Box<dyn Evaluator<C>>,
        initializer: &mut dyn Initializer<C>,
    ) -> GpResult<Self> {
        config.validate()?;
        if let Some(competitors) = operators.selection.competitors() {
            if competitors != config.tournament_arity {
                return Err(GpError::Configuration(format!(
                    "selection uses {competitors} competitors but tournament_arity is {}",
                    config.tournament_arity
                )));
            }
        }
        let started = Instant::now();
        let mut rng = SmallRng::seed_from_u64(config.seed);

        let mut population = Population::from_initializer(initializer, &mut rng);
        if population.len() != config.population_size {
            return Err(GpError::Configuration(format!(
                "initializer produced {} chromosomes, expected {}",
                population.len(),
                config.population_size
            )));
        }

        evaluator.evaluate(&mut population)?;
        let best = population
            .trim(config.population_size)
            .ok_or_else(|| GpError::Configuration("initial population is empty".to_string()))?;
        let stats = GenerationStats::of(0, &population);
        info!(
            "initial population of {} evaluated, best fitness {:.6}",
            population.len(),
            stats.best_fitness
        );

        let mut evolution = Self {
            config,
            operators,
            evaluator,
            listeners: Vec::new(),
            population,
            best,
            generation: 0,
            history: vec![stats],
            terminated: false,
            rng,
            started,
        };
        evolution.check_target();
        Ok(evolution)
    }

    /// Register a listener called after every generation.
    pub fn add_listener(&mut self, listener: impl TerminationListener<C> + 'static) {
        self.listeners.push(Box::new(listener));
    }

    /// Builder form of [`Evolution::add_listener`].
    #[must_use]
    pub fn with_listener(mut self, listener: impl TerminationListener<C> + 'static) -> Self {
        self.add_listener(listener);
        self
    }

    /// Run one generation.
    ///
    /// # Errors
    ///
    /// Returns selection or evaluation errors. The current population is
    /// left untouched when this fails.
    pub fn step(&mut self) -> GpResult<()> {
        let size = self.config.population_size;
        let mut next = self.population.next_generation(self.config.elitism);

        while next.len() < size {
            let (first, second) = self
                .operators
                .selection
                .select(&self.population, &mut self.rng)?;
            let (a, b) = if self.rng.r#gen::<f64>() < self.config.crossover_rate {
                self.operators.crossover.crossover(first, second, &mut self.rng)
            } else {
                (first.make_copy(), second.make_copy())
            };

            for child in [a, b] {
                if next.len() >= size {
                    break;
                }
                let child = if self.rng.r#gen::<f64>() < self.config.mutation_rate {
                    self.operators.mutation.mutate(&child, &mut self.rng)
                } else {
                    child
                };
                next.add_chromosome(child);
            }
        }

        self.evaluator.evaluate(&mut next)?;
        let generation_best = next.trim(size);
        self.population = next;
        self.generation += 1;

        if let Some(candidate) = generation_best {
            if candidate.is_better_than(&self.best) {
                debug!(
                    "generation {} improved best fitness to {:?}",
                    self.generation,
                    candidate.fitness()
                );
                self.best = candidate;
            }
        }

        let stats = GenerationStats::of(self.generation, &self.population);
        self.history.push(stats);
        self.check_target();

        let mut state = GenerationState {
            generation: self.generation,
            best: &self.best,
            population: &self.population,
            stats: &stats,
            terminate: false,
        };
        for listener in &mut self.listeners {
            listener.on_generation(&mut state);
        }
        if state.terminate {
            debug!("listener stopped the run at generation {}", self.generation);
            self.terminated = true;
        }
        Ok(())
    }

    /// Step until terminated or the generation cap is reached.
    ///
    /// # Errors
    ///
    /// Returns the first [`Evolution::step`] error.
    pub fn run(&mut self) -> GpResult<EvolutionResult<C>> {
        while !self.terminated
            && (self.config.max_generations == 0 || self.generation < self.config.max_generations)
        {
            self.step()?;
        }
        info!(
            "evolution finished after {} generations, best fitness {:?}",
            self.generation,
            self.best.fitness()
        );
        Ok(self.result())
    }

    /// Stop before the next generation.
    pub fn terminate(&mut self) {
        self.terminated = true;
    }

    /// Whether the run has been stopped.
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        self.terminated
    }

    /// Snapshot of the run so far.
    #[must_use]
    pub fn result(&self) -> EvolutionResult<C> {
        EvolutionResult {
            best: self.best.clone(),
            best_fitness: self.best.fitness(),
            generations: self.generation,
            history: self.history.clone(),
            terminated_early: self.terminated,
            elapsed_seconds: self.started.elapsed().as_secs_f64(),
        }
    }

    /// The current population, sorted best first.
    #[must_use]
    pub fn population(&self) -> &Population<C> {
        &self.population
    }

    /// Best chromosome found so far.
    #[must_use]
    pub fn best(&self) -> &C {
        &self.best
    }

    /// Generations completed.
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    /// Statistics per generation.
    #[must_use]
    pub fn history(&self) -> &[GenerationStats] {
        &self.history
    }

    /// The configuration in use.
    #[must_use]
    pub fn config(&self) -> &EvolutionConfig {
        &self.config
    }

    fn check_target(&mut self) {
        let Some(target) = self.config.target_fitness else {
            return;
        };
        if self.best.fitness().is_some_and(|f| f <= target) {
            info!(
                "target fitness {target} reached at generation {}",
                self.generation
            );
            self.terminated = true;
        }
    }
}

impl<C: Chromosome> fmt::Debug for Evolution<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evolution")
            .field("config", &self.config)
            .field("operators", &self.operators)
            .field("generation", &self.generation)
            .field("population_size", &self.population.len())
            .field("best_fitness", &self.best.fitness())
            .field("listeners", &self.listeners.len())
            .field("terminated", &self.terminated)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gp::bits::BitChromosome;
    use crate::gp::crossover::UniformCrossover;
    use crate::gp::evaluation::SequentialEvaluator;
    use crate::gp::fitness::Fitness;
    use crate::gp::initializer::RandomBits;
    use crate::gp::mutation::BitFlipMutation;
    use crate::gp::selection::TournamentSelection;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    const BITS: usize = 24;

    #[allow(clippy::cast_precision_loss)]
    fn zero_count() -> Arc<dyn Fitness<BitChromosome>> {
        Arc::new(|c: &BitChromosome| -> GpResult<f64> {
            Ok((c.len() - c.count_ones()) as f64)
        })
    }

    fn one_max(config: EvolutionConfig) -> GpResult<Evolution<BitChromosome>> {
        let operators = Operators::new(
            TournamentSelection::new(config.tournament_arity)?,
            UniformCrossover,
            BitFlipMutation::new(1.0 / BITS as f64)?,
        );
        let mut init = RandomBits::new(config.population_size, BITS);
        let evaluator = Box::new(SequentialEvaluator::new(zero_count()));
        Evolution::new(config, operators, evaluator, &mut init)
    }

    fn small_config() -> EvolutionConfig {
        EvolutionConfig::default()
            .with_population_size(30)
            .with_max_generations(40)
            .with_tournament_arity(3)
            .with_mutation_rate(0.5)
            .with_seed(7)
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(EvolutionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_configs() {
        let base = EvolutionConfig::default();
        assert!(matches!(
            base.clone().with_crossover_rate(1.5).validate(),
            Err(GpError::OutOfRange { .. })
        ));
        assert!(matches!(
            base.clone().with_mutation_rate(-0.1).validate(),
            Err(GpError::OutOfRange { .. })
        ));
        assert!(base.clone().with_population_size(0).validate().is_err());
        assert!(base.clone().with_tournament_arity(101).validate().is_err());
        assert!(base.clone().with_elitism(101).validate().is_err());
        assert!(base.with_target_fitness(f64::NAN).validate().is_err());
    }

    #[test]
    fn test_json_defaults_missing_fields() {
        let config = EvolutionConfig::from_json_str(r#"{"population_size": 12, "elitism": 1}"#)
            .unwrap();
        assert_eq!(config.population_size, 12);
        assert_eq!(config.elitism, 1);
        assert_eq!(config.seed, EvolutionConfig::default().seed);
        assert!(EvolutionConfig::from_json_str(r#"{"mutation_rate": 2.0}"#).is_err());
        assert!(matches!(
            EvolutionConfig::from_json_str("not json"),
            Err(GpError::Json(_))
        ));
    }

    #[test]
    fn test_one_max_improves() {
        let mut evolution = one_max(small_config()).unwrap();
        let initial = evolution.history()[0].best_fitness;
        let result = evolution.run().unwrap();

        assert_eq!(result.generations, 40);
        assert_eq!(result.history.len(), 41);
        assert!(!result.terminated_early);
        assert!(result.best_fitness.unwrap() < initial);
        assert_eq!(evolution.population().len(), 30);
    }

    #[test]
    fn test_elitism_keeps_best_monotone() {
        let mut evolution = one_max(small_config().with_elitism(1)).unwrap();
        let result = evolution.run().unwrap();
        for pair in result.history.windows(2) {
            assert!(pair[1].best_fitness <= pair[0].best_fitness);
        }
    }

    #[test]
    fn test_same_seed_same_run() {
        let a = one_max(small_config()).unwrap().run().unwrap();
        let b = one_max(small_config()).unwrap().run().unwrap();
        assert_eq!(a.best, b.best);
        assert_eq!(a.history, b.history);
    }

    #[test]
    fn test_target_fitness_stops_early() {
        let config = small_config().with_max_generations(0).with_target_fitness(3.0);
        let result = one_max(config).unwrap().run().unwrap();
        assert!(result.terminated_early);
        assert!(result.best_fitness.unwrap() <= 3.0);
    }

    #[test]
    fn test_listener_terminates() {
        let mut evolution = one_max(small_config()).unwrap().with_listener(
            |state: &mut GenerationState<'_, BitChromosome>| {
                if state.generation() == 3 {
                    state.terminate();
                }
            },
        );
        let result = evolution.run().unwrap();
        assert_eq!(result.generations, 3);
        assert!(result.terminated_early);
    }

    #[test]
    fn test_stagnation_listener() {
        let config = small_config()
            .with_max_generations(500)
            .with_target_fitness(-1.0);
        let mut evolution = one_max(config).unwrap().with_listener(Stagnation::new(5));
        let result = evolution.run().unwrap();
        assert!(result.terminated_early);
        assert!(result.generations < 500);
    }

    #[test]
    fn test_initializer_size_mismatch() {
        let config = small_config();
        let operators = Operators::new(
            TournamentSelection::new(3).unwrap(),
            UniformCrossover,
            BitFlipMutation::new(0.1).unwrap(),
        );
        let mut init = RandomBits::new(10, BITS);
        let evaluator = Box::new(SequentialEvaluator::new(zero_count()));
        assert!(matches!(
            Evolution::new(config, operators, evaluator, &mut init),
            Err(GpError::Configuration(_))
        ));
    }

    #[test]
    fn test_failed_evaluation_keeps_population() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let fitness: Arc<dyn Fitness<BitChromosome>> =
            Arc::new(move |c: &BitChromosome| -> GpResult<f64> {
                if counter.fetch_add(1, Ordering::SeqCst) >= 30 {
                    return Err(GpError::InvalidArgument("fitness offline".to_string()));
                }
                Ok(c.count_ones() as f64)
            });

        let config = small_config();
        let operators = Operators::new(
            TournamentSelection::new(3).unwrap(),
            UniformCrossover,
            BitFlipMutation::new(0.1).unwrap(),
        );
        let mut init = RandomBits::new(30, BITS);
        let evaluator = Box::new(SequentialEvaluator::new(fitness));
        let mut evolution = Evolution::new(config, operators, evaluator, &mut init).unwrap();

        let before = evolution.population().clone();
        assert!(matches!(
            evolution.step(),
            Err(GpError::Evaluation { .. })
        ));
        assert_eq!(evolution.population(), &before);
        assert_eq!(evolution.generation(), 0);
        assert!(evolution.run().is_err());
    }

    #[test]
    fn test_selection_arity_must_match_config() {
        let config = small_config();
        let operators = Operators::new(
            TournamentSelection::new(config.tournament_arity + 1).unwrap(),
            UniformCrossover,
            BitFlipMutation::new(0.1).unwrap(),
        );
        let mut init = RandomBits::new(config.population_size, BITS);
        let evaluator = Box::new(SequentialEvaluator::new(zero_count()));
        assert!(matches!(
            Evolution::new(config, operators, evaluator, &mut init),
            Err(GpError::Configuration(_))
        ));
    }
}
