//! Property-based tests for tree genomes and population ordering.
//!
//! Run with: cargo test --release prop_tree

#![allow(missing_docs)]
#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::sync::Arc;

use genprog::gp::{
    BitChromosome, Chromosome, Mutation, MutationStrategy, Population, Selection,
    TournamentSelection, TreeChromosome, TreeConfig, TreeMutation, compare_fitness,
};

fn config(max_depth: usize, num_variables: usize) -> Arc<TreeConfig> {
    Arc::new(TreeConfig {
        max_depth,
        init_depth: max_depth.min(3),
        num_variables,
        ..TreeConfig::default()
    })
}

fn scored(fitness: &[f64]) -> Population<BitChromosome> {
    fitness
        .iter()
        .map(|&f| {
            let mut c = BitChromosome::new(vec![false; 4]);
            c.set_fitness(f);
            c
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    /// No mutation ever produces a tree deeper than the configured limit.
    #[test]
    fn prop_mutation_respects_max_depth(
        seed in any::<u64>(),
        max_depth in 1usize..8,
        strategy in 0usize..MutationStrategy::ALL.len(),
    ) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = TreeChromosome::random_grow(config(max_depth, 2), max_depth, &mut rng).unwrap();
        let mutation = TreeMutation::new(MutationStrategy::ALL[strategy]);
        let child = mutation.mutate(&tree, &mut rng);

        prop_assert!(child.depth() <= max_depth);
        prop_assert!(child.root().is_well_formed());
        prop_assert_eq!(child.fitness(), None);
    }

    /// Shrink and hoist never grow a tree.
    #[test]
    fn prop_shrink_and_hoist_never_grow(seed in any::<u64>(), max_depth in 1usize..8) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = TreeChromosome::random_full(config(max_depth, 1), max_depth, &mut rng).unwrap();
        for strategy in [MutationStrategy::Shrink, MutationStrategy::Hoist] {
            let child = TreeMutation::new(strategy).mutate(&tree, &mut rng);
            prop_assert!(child.depth() <= tree.depth());
            prop_assert!(child.node_count() <= tree.node_count());
        }
    }

    /// Subtree crossover keeps both offspring within the depth limit.
    #[test]
    fn prop_subtree_crossover_bounded(seed in any::<u64>(), max_depth in 1usize..7) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let cfg = config(max_depth, 3);
        let a = TreeChromosome::random_full(Arc::clone(&cfg), max_depth, &mut rng).unwrap();
        let b = TreeChromosome::random_grow(cfg, max_depth, &mut rng).unwrap();
        let (c, d) = a.subtree_crossover(&b, &mut rng);

        prop_assert!(c.depth() <= max_depth);
        prop_assert!(d.depth() <= max_depth);
        prop_assert_eq!(c.fitness(), None);
    }

    /// Evaluation is total: any input row yields a number or NaN, never a panic.
    #[test]
    fn prop_eval_total(seed in any::<u64>(), x in -1e6f64..1e6, y in -1e6f64..1e6) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let tree = TreeChromosome::random_grow(config(6, 2), 6, &mut rng).unwrap();
        let _ = tree.eval(&[x, y]);
    }

    /// Trimming keeps the best `length` chromosomes in fitness order.
    #[test]
    fn prop_trim_keeps_best(
        fitness in prop::collection::vec(-1e3f64..1e3, 1..40),
        length in 0usize..50,
    ) {
        let mut population = scored(&fitness);
        let best = population.trim(length).unwrap();

        let mut sorted = fitness.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));
        prop_assert_eq!(best.fitness(), Some(sorted[0]));
        prop_assert_eq!(population.len(), length.min(fitness.len()));
        let kept: Vec<f64> = population.iter().filter_map(Chromosome::fitness).collect();
        prop_assert_eq!(kept, sorted[..length.min(fitness.len())].to_vec());
    }

    /// A tournament returns its better parent first.
    #[test]
    fn prop_tournament_pair_ordered(
        fitness in prop::collection::vec(-1e3f64..1e3, 2..30),
        arity in 1usize..5,
        seed in any::<u64>(),
    ) {
        prop_assume!(arity <= fitness.len());
        let population = scored(&fitness);
        let selection = TournamentSelection::new(arity).unwrap();
        let mut rng = SmallRng::seed_from_u64(seed);
        let (first, second) = selection.select(&population, &mut rng).unwrap();

        prop_assert_ne!(
            compare_fitness(first.fitness(), second.fitness()),
            std::cmp::Ordering::Greater
        );
    }
}
