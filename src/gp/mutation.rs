//! Mutation operators for genetic programming.
//!
//! Every operator works on a copy: the argument is never edited in place and
//! the returned chromosome carries no fitness. Tree mutations first pick one
//! node uniformly at random and then apply one of five structural edits,
//! chosen by [`MutationStrategy`].

// The depth-biased budget scales a depth by a float factor
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]

use crate::error::{GpError, GpResult};
use crate::gp::bits::BitChromosome;
use crate::gp::chromosome::Chromosome;
use crate::gp::tree::{Node, Op, TreeChromosome, TreeConfig};
use rand::seq::SliceRandom;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

/// Attempts at drawing a terminal different from the current one.
const POINT_RETRIES: usize = 50;

/// Depth growth allowed per biased subtree mutation.
const DEPTH_GROWTH_FACTOR: f64 = 1.15;

/// A mutation policy applied by the generational driver.
pub trait Mutation<C: Chromosome>: Send + fmt::Debug {
    /// Return a mutated copy of `chromosome`.
    fn mutate(&self, chromosome: &C, rng: &mut dyn RngCore) -> C;
}

/// Structural edit applied by [`TreeMutation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MutationStrategy {
    /// Swap the operator of one node for a compatible one.
    Point,
    /// Regrow the subtree below one node within the depth limit.
    Subtree,
    /// Regrow a subtree with a budget derived from the current tree depth.
    SubtreeBiased,
    /// Promote a subtree to be the whole program.
    Hoist,
    /// Collapse a subtree into a terminal.
    Shrink,
}

impl MutationStrategy {
    /// Every strategy, in tag order.
    pub const ALL: [Self; 5] = [
        Self::Point,
        Self::Subtree,
        Self::SubtreeBiased,
        Self::Hoist,
        Self::Shrink,
    ];

    /// Configuration tag of this strategy.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Subtree => "subtree",
            Self::SubtreeBiased => "subtree-biased",
            Self::Hoist => "hoist",
            Self::Shrink => "shrink",
        }
    }
}

impl FromStr for MutationStrategy {
    type Err = GpError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "point" => Ok(Self::Point),
            "subtree" => Ok(Self::Subtree),
            "subtree-biased" | "subtree_biased" => Ok(Self::SubtreeBiased),
            "hoist" => Ok(Self::Hoist),
            "shrink" => Ok(Self::Shrink),
            _ => Err(GpError::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for MutationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Tree mutation policy with a fixed strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeMutation {
    strategy: MutationStrategy,
}

impl TreeMutation {
    /// Policy applying `strategy`.
    #[must_use]
    pub fn new(strategy: MutationStrategy) -> Self {
        Self { strategy }
    }

    /// Policy named by a configuration tag.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::UnknownStrategy`] for an unrecognized tag.
    pub fn from_tag(tag: &str) -> GpResult<Self> {
        tag.parse().map(Self::new)
    }

    /// The configured strategy.
    #[must_use]
    pub fn strategy(&self) -> MutationStrategy {
        self.strategy
    }
}

impl Mutation<TreeChromosome> for TreeMutation {
    fn mutate(&self, chromosome: &TreeChromosome, rng: &mut dyn RngCore) -> TreeChromosome {
        mutate_tree(chromosome, self.strategy, rng)
    }
}

/// Apply one structural mutation to a copy of `tree`.
pub(crate) fn mutate_tree<R: Rng + ?Sized>(
    tree: &TreeChromosome,
    strategy: MutationStrategy,
    rng: &mut R,
) -> TreeChromosome {
    let mut child = tree.make_copy();
    child.clear_fitness();
    let config = Arc::clone(child.config());
    let tree_depth = child.depth();
    let (path, node_depth) = child.any_node(rng);

    if strategy == MutationStrategy::Hoist {
        if !path.is_empty() {
            if let Some(subtree) = child.root().node_at(&path).cloned() {
                child.replace_root(subtree);
            }
        }
        return child;
    }

    let Some(node) = child.root_mut().node_at_mut(&path) else {
        return child;
    };
    match strategy {
        MutationStrategy::Point => point_mutation(node, &config, rng),
        MutationStrategy::Subtree => {
            let budget = config.max_depth.saturating_sub(node_depth);
            *node = Node::grow(&config, budget, rng);
        }
        MutationStrategy::SubtreeBiased => {
            let limit = ((tree_depth as f64 * DEPTH_GROWTH_FACTOR).ceil() as usize)
                .max(1)
                .min(config.max_depth);
            *node = Node::grow(&config, limit.saturating_sub(node_depth), rng);
        }
        MutationStrategy::Shrink => {
            *node = Node::random_terminal(&config, rng);
        }
        MutationStrategy::Hoist => {}
    }
    child
}

/// Replace the node's operator, keeping its arity.
fn point_mutation<R: Rng + ?Sized>(node: &mut Node, config: &TreeConfig, rng: &mut R) {
    if node.is_leaf() {
        let terminals = config.terminals();
        for _ in 0..POINT_RETRIES {
            let op = terminals[rng.gen_range(0..terminals.len())];
            if op != node.op {
                node.op = op;
                node.reroll_terminal(config, rng);
                return;
            }
        }
    } else {
        let arity = node.op.arity();
        let candidates: Vec<Op> = config
            .functions
            .iter()
            .copied()
            .filter(|&op| op.arity() == arity && op != node.op)
            .collect();
        if let Some(&op) = candidates.choose(rng) {
            node.op = op;
        }
    }
}

/// Flip every bit independently with probability `rate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitFlipMutation {
    rate: f64,
}

impl BitFlipMutation {
    /// Policy flipping each bit with probability `rate`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] unless `rate` lies within `[0, 1]`.
    pub fn new(rate: f64) -> GpResult<Self> {
        Ok(Self {
            rate: GpError::check_unit("bit flip rate", rate)?,
        })
    }
}

impl Mutation<BitChromosome> for BitFlipMutation {
    fn mutate(&self, chromosome: &BitChromosome, rng: &mut dyn RngCore) -> BitChromosome {
        chromosome.flip_bits(self.rate, rng)
    }
}

/// Exchange two distinct genes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapMutation;

impl Mutation<BitChromosome> for SwapMutation {
    fn mutate(&self, chromosome: &BitChromosome, rng: &mut dyn RngCore) -> BitChromosome {
        let mut genes = chromosome.genes().to_vec();
        if genes.len() >= 2 {
            let i = rng.gen_range(0..genes.len());
            let offset = rng.gen_range(1..genes.len());
            let j = (i + offset) % genes.len();
            genes.swap(i, j);
        }
        BitChromosome::new(genes)
    }
}

/// Delegates to the representation's own [`Chromosome::mutate`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NativeMutation {
    rate: f64,
}

impl NativeMutation {
    /// Policy calling `Chromosome::mutate` with `rate`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::OutOfRange`] unless `rate` lies within `[0, 1]`.
    pub fn new(rate: f64) -> GpResult<Self> {
        Ok(Self {
            rate: GpError::check_unit("mutation rate", rate)?,
        })
    }
}

impl<C: Chromosome> Mutation<C> for NativeMutation {
    fn mutate(&self, chromosome: &C, rng: &mut dyn RngCore) -> C {
        chromosome.mutate(self.rate, rng)
    }
}
