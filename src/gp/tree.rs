//! Expression-tree genome.
//!
//! A tree is a strictly owned recursive structure: every [`Node`] owns its
//! children and nothing points back up. Nodes are addressed by paths of
//! child indices from the root, which is all the structural operators need.
//!
//! Depth is counted in edges, so a lone terminal has depth 0.

use crate::error::{GpError, GpResult};
use crate::gp::chromosome::Chromosome;
use crate::gp::mutation::{MutationStrategy, mutate_tree};
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Divisors and logarithm arguments closer to zero than this are protected.
const PROTECTED_EPSILON: f64 = 1e-9;

/// Operator tag of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Op {
    // === Terminals ===
    /// Constant stored in the node.
    Const,
    /// Reference to an input variable.
    Var,

    // === Unary operators ===
    /// Negation.
    Neg,
    /// Sine.
    Sin,
    /// Cosine.
    Cos,
    /// Exponential.
    Exp,
    /// Protected natural logarithm of the absolute value (0 near zero).
    Log,

    // === Binary operators ===
    /// Addition.
    Add,
    /// Subtraction.
    Sub,
    /// Multiplication.
    Mul,
    /// Protected division (1 when the divisor is near zero).
    Div,
}

impl Op {
    /// Every terminal operator.
    pub const TERMINALS: [Self; 2] = [Self::Const, Self::Var];

    /// Every non-terminal operator.
    pub const FUNCTIONS: [Self; 9] = [
        Self::Neg,
        Self::Sin,
        Self::Cos,
        Self::Exp,
        Self::Log,
        Self::Add,
        Self::Sub,
        Self::Mul,
        Self::Div,
    ];

    /// Number of operands.
    #[must_use]
    pub fn arity(self) -> usize {
        match self {
            Self::Const | Self::Var => 0,
            Self::Neg | Self::Sin | Self::Cos | Self::Exp | Self::Log => 1,
            Self::Add | Self::Sub | Self::Mul | Self::Div => 2,
        }
    }

    /// Whether this operator is a leaf.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        self.arity() == 0
    }

    /// Apply a non-terminal operator to already evaluated operands.
    ///
    /// Terminals yield NaN; their value lives in the node.
    #[must_use]
    pub fn apply(self, args: &[f64]) -> f64 {
        let a = args.first().copied().unwrap_or(f64::NAN);
        let b = args.get(1).copied().unwrap_or(f64::NAN);
        match self {
            Self::Const | Self::Var => f64::NAN,
            Self::Neg => -a,
            Self::Sin => a.sin(),
            Self::Cos => a.cos(),
            Self::Exp => a.exp(),
            Self::Log => {
                if a.abs() < PROTECTED_EPSILON {
                    0.0
                } else {
                    a.abs().ln()
                }
            }
            Self::Add => a + b,
            Self::Sub => a - b,
            Self::Mul => a * b,
            Self::Div => {
                if b.abs() < PROTECTED_EPSILON {
                    1.0
                } else {
                    a / b
                }
            }
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Var => "var",
            Self::Neg => "-",
            Self::Sin => "sin",
            Self::Cos => "cos",
            Self::Exp => "exp",
            Self::Log => "log",
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
        }
    }
}

/// Construction and mutation parameters for tree genomes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeConfig {
    /// Maximum depth any tree may reach.
    pub max_depth: usize,
    /// Maximum depth of trees built by the initializer.
    pub init_depth: usize,
    /// Number of input variables terminals may reference.
    pub num_variables: usize,
    /// Lower bound for random constants.
    pub constant_min: f64,
    /// Upper bound for random constants.
    pub constant_max: f64,
    /// Non-terminal operators available to construction and mutation.
    pub functions: Vec<Op>,
    /// Mutation applied by [`Chromosome::mutate`].
    pub mutation: MutationStrategy,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            max_depth: 6,
            init_depth: 4,
            num_variables: 1,
            constant_min: -5.0,
            constant_max: 5.0,
            functions: vec![Op::Add, Op::Sub, Op::Mul, Op::Div],
            mutation: MutationStrategy::Subtree,
        }
    }
}

impl TreeConfig {
    /// Check the configuration for contradictions.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] when the function set is empty or
    /// holds terminals, when the constant range is inverted or its bounds or
    /// width are not finite, or when `init_depth` exceeds `max_depth`.
    pub fn validate(&self) -> GpResult<()> {
        if self.functions.is_empty() {
            return Err(GpError::Configuration(
                "function set must not be empty".to_string(),
            ));
        }
        if let Some(op) = self.functions.iter().find(|op| op.is_terminal()) {
            return Err(GpError::Configuration(format!(
                "function set contains terminal {op:?}"
            )));
        }
        if !self.constant_min.is_finite()
            || !self.constant_max.is_finite()
            || self.constant_min > self.constant_max
            || !(self.constant_max - self.constant_min).is_finite()
        {
            return Err(GpError::Configuration(format!(
                "invalid constant range [{}, {}]",
                self.constant_min, self.constant_max
            )));
        }
        if self.init_depth > self.max_depth {
            return Err(GpError::Configuration(format!(
                "init_depth {} exceeds max_depth {}",
                self.init_depth, self.max_depth
            )));
        }
        Ok(())
    }

    /// Terminal operators usable with this configuration.
    #[must_use]
    pub fn terminals(&self) -> &'static [Op] {
        if self.num_variables == 0 {
            &[Op::Const]
        } else {
            &[Op::Const, Op::Var]
        }
    }
}

/// A node of an expression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Operator tag.
    pub op: Op,
    /// Constant value (meaningful for [`Op::Const`]).
    pub value: f64,
    /// Variable index (meaningful for [`Op::Var`]).
    pub var: usize,
    /// Operands, exactly `op.arity()` of them.
    pub children: Vec<Node>,
}

impl Node {
    /// A constant leaf.
    #[must_use]
    pub fn constant(value: f64) -> Self {
        Self {
            op: Op::Const,
            value,
            var: 0,
            children: Vec::new(),
        }
    }

    /// A variable leaf.
    #[must_use]
    pub fn variable(index: usize) -> Self {
        Self {
            op: Op::Var,
            value: 0.0,
            var: index,
            children: Vec::new(),
        }
    }

    /// An operator node over `children`.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::InvalidArgument`] if `op` is a terminal or the
    /// number of children differs from its arity.
    pub fn function(op: Op, children: Vec<Node>) -> GpResult<Self> {
        if op.is_terminal() || children.len() != op.arity() {
            return Err(GpError::InvalidArgument(format!(
                "{op:?} takes {} operands, got {}",
                op.arity(),
                children.len()
            )));
        }
        Ok(Self {
            op,
            value: 0.0,
            var: 0,
            children,
        })
    }

    /// A random terminal drawn from the configured terminal set.
    #[must_use]
    pub fn random_terminal<R: Rng + ?Sized>(config: &TreeConfig, rng: &mut R) -> Self {
        let terminals = config.terminals();
        let op = terminals[rng.gen_range(0..terminals.len())];
        Self::terminal(op, config, rng)
    }

    /// Grow construction: every node below the depth limit is drawn from the
    /// full primitive set, so branches stop at varying depths.
    #[must_use]
    pub fn grow<R: Rng + ?Sized>(config: &TreeConfig, depth: usize, rng: &mut R) -> Self {
        if depth == 0 || config.functions.is_empty() {
            return Self::random_terminal(config, rng);
        }
        let terminals = config.terminals();
        let pick = rng.gen_range(0..terminals.len() + config.functions.len());
        if pick < terminals.len() {
            Self::terminal(terminals[pick], config, rng)
        } else {
            let op = config.functions[pick - terminals.len()];
            let children = (0..op.arity())
                .map(|_| Self::grow(config, depth - 1, rng))
                .collect();
            Self::branch(op, children)
        }
    }

    /// Full construction: every branch reaches exactly `depth`.
    #[must_use]
    pub fn full<R: Rng + ?Sized>(config: &TreeConfig, depth: usize, rng: &mut R) -> Self {
        if depth == 0 || config.functions.is_empty() {
            return Self::random_terminal(config, rng);
        }
        let op = config.functions[rng.gen_range(0..config.functions.len())];
        let children = (0..op.arity())
            .map(|_| Self::full(config, depth - 1, rng))
            .collect();
        Self::branch(op, children)
    }

    fn terminal<R: Rng + ?Sized>(op: Op, config: &TreeConfig, rng: &mut R) -> Self {
        let mut node = Self {
            op,
            value: 0.0,
            var: 0,
            children: Vec::new(),
        };
        node.reroll_terminal(config, rng);
        node
    }

    fn branch(op: Op, children: Vec<Node>) -> Self {
        Self {
            op,
            value: 0.0,
            var: 0,
            children,
        }
    }

    /// Draw a fresh constant value or variable index for a terminal.
    pub(crate) fn reroll_terminal<R: Rng + ?Sized>(&mut self, config: &TreeConfig, rng: &mut R) {
        match self.op {
            Op::Const => {
                self.value = rng.gen_range(config.constant_min..=config.constant_max);
            }
            Op::Var if config.num_variables > 0 => {
                self.var = rng.gen_range(0..config.num_variables);
            }
            _ => {}
        }
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Longest root-to-leaf path below this node, in edges.
    #[must_use]
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 0usize)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }

    /// Number of nodes in this subtree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Node::node_count).sum::<usize>()
    }

    /// Path and depth of the node at preorder position `index`.
    #[must_use]
    pub fn locate(&self, index: usize) -> Option<(Vec<usize>, usize)> {
        let mut stack = vec![(self, Vec::new())];
        let mut position = 0;
        while let Some((node, path)) = stack.pop() {
            if position == index {
                let depth = path.len();
                return Some((path, depth));
            }
            position += 1;
            for (i, child) in node.children.iter().enumerate().rev() {
                let mut child_path = path.clone();
                child_path.push(i);
                stack.push((child, child_path));
            }
        }
        None
    }

    /// The node at `path`, if the path exists.
    #[must_use]
    pub fn node_at(&self, path: &[usize]) -> Option<&Node> {
        path.iter().try_fold(self, |node, &i| node.children.get(i))
    }

    /// Mutable access to the node at `path`.
    pub fn node_at_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter().try_fold(self, |node, &i| node.children.get_mut(i))
    }

    /// Whether every node's child count matches its operator's arity.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        self.children.len() == self.op.arity() && self.children.iter().all(Node::is_well_formed)
    }

    /// Evaluate against one input row. Missing variables read as NaN.
    #[must_use]
    pub fn eval(&self, inputs: &[f64]) -> f64 {
        match self.op {
            Op::Const => self.value,
            Op::Var => inputs.get(self.var).copied().unwrap_or(f64::NAN),
            op => {
                let args: Vec<f64> = self.children.iter().map(|c| c.eval(inputs)).collect();
                op.apply(&args)
            }
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.op, self.children.as_slice()) {
            (Op::Const, _) => write!(f, "{:.3}", self.value),
            (Op::Var, _) => write!(f, "x{}", self.var),
            (Op::Neg, [a]) => write!(f, "-({a})"),
            (op, [a]) => write!(f, "{}({a})", op.symbol()),
            (op, [a, b]) => write!(f, "({a} {} {b})", op.symbol()),
            (op, _) => write!(f, "{}(?)", op.symbol()),
        }
    }
}

/// A tree-encoded program with its fitness.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeChromosome {
    root: Node,
    fitness: Option<f64>,
    config: Arc<TreeConfig>,
}

impl TreeChromosome {
    /// Wrap an existing tree.
    ///
    /// # Errors
    ///
    /// Returns [`GpError::Configuration`] for an invalid `config` and
    /// [`GpError::InvalidArgument`] if the tree is malformed or deeper than
    /// `config.max_depth`.
    pub fn new(root: Node, config: Arc<TreeConfig>) -> GpResult<Self> {
        config.validate()?;
        if !root.is_well_formed() {
            return Err(GpError::InvalidArgument(
                "child count does not match operator arity".to_string(),
            ));
        }
        let depth = root.depth();
        if depth > config.max_depth {
            return Err(GpError::InvalidArgument(format!(
                "tree depth {depth} exceeds max_depth {}",
                config.max_depth
            )));
        }
        Ok(Self {
            root,
            fitness: None,
            config,
        })
    }

    /// A random tree built with grow construction up to `depth`.
    ///
    /// # Errors
    ///
    /// Propagates [`TreeConfig::validate`] failures.
    pub fn random_grow<R>(config: Arc<TreeConfig>, depth: usize, rng: &mut R) -> GpResult<Self>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        Ok(Self::grown(config, depth, rng))
    }

    /// A random tree built with full construction to `depth`.
    ///
    /// # Errors
    ///
    /// Propagates [`TreeConfig::validate`] failures.
    pub fn random_full<R>(config: Arc<TreeConfig>, depth: usize, rng: &mut R) -> GpResult<Self>
    where
        R: Rng + ?Sized,
    {
        config.validate()?;
        Ok(Self::filled(config, depth, rng))
    }

    /// Grow construction against a config that has already been validated.
    pub(crate) fn grown<R>(config: Arc<TreeConfig>, depth: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let root = Node::grow(&config, depth.min(config.max_depth), rng);
        Self {
            root,
            fitness: None,
            config,
        }
    }

    /// Full construction against a config that has already been validated.
    pub(crate) fn filled<R>(config: Arc<TreeConfig>, depth: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let root = Node::full(&config, depth.min(config.max_depth), rng);
        Self {
            root,
            fitness: None,
            config,
        }
    }

    /// Root node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut Node {
        &mut self.root
    }

    pub(crate) fn replace_root(&mut self, root: Node) {
        self.root = root;
    }

    /// Shared construction parameters.
    #[must_use]
    pub fn config(&self) -> &Arc<TreeConfig> {
        &self.config
    }

    /// Depth of the whole tree.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Pick a node uniformly at random; returns its path and depth.
    pub fn any_node<R: Rng + ?Sized>(&self, rng: &mut R) -> (Vec<usize>, usize) {
        let index = rng.gen_range(0..self.node_count());
        self.root.locate(index).unwrap_or_default()
    }

    /// Evaluate the program against one input row.
    #[must_use]
    pub fn eval(&self, inputs: &[f64]) -> f64 {
        self.root.eval(inputs)
    }

    /// Swap uniformly chosen subtrees between copies of both parents.
    ///
    /// A child deeper than `max_depth` is replaced by a copy of its parent.
    #[must_use]
    pub fn subtree_crossover<R: Rng + ?Sized>(&self, other: &Self, rng: &mut R) -> (Self, Self) {
        let mut first = self.clone();
        let mut second = other.clone();
        let (path_a, _) = first.any_node(rng);
        let (path_b, _) = second.any_node(rng);

        let (Some(donor_a), Some(donor_b)) = (
            first.root.node_at(&path_a).cloned(),
            second.root.node_at(&path_b).cloned(),
        ) else {
            return (first, second);
        };

        if let Some(slot) = first.root.node_at_mut(&path_a) {
            *slot = donor_b;
            first.fitness = None;
        }
        if let Some(slot) = second.root.node_at_mut(&path_b) {
            *slot = donor_a;
            second.fitness = None;
        }

        if first.depth() > first.config.max_depth {
            first = self.clone();
        }
        if second.depth() > second.config.max_depth {
            second = other.clone();
        }
        (first, second)
    }
}

impl Chromosome for TreeChromosome {
    fn fitness(&self) -> Option<f64> {
        self.fitness
    }

    fn set_fitness(&mut self, fitness: f64) {
        self.fitness = Some(fitness);
    }

    fn clear_fitness(&mut self) {
        self.fitness = None;
    }

    fn crossover(&self, other: &Self, rate: f64, rng: &mut dyn RngCore) -> Vec<Self> {
        if rng.r#gen::<f64>() < rate {
            let (a, b) = self.subtree_crossover(other, rng);
            vec![a, b]
        } else {
            vec![self.clone(), other.clone()]
        }
    }

    fn mutate(&self, rate: f64, rng: &mut dyn RngCore) -> Self {
        if rng.r#gen::<f64>() < rate {
            mutate_tree(self, self.config.mutation, rng)
        } else {
            self.clone()
        }
    }
}

impl fmt::Display for TreeChromosome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)
    }
}
