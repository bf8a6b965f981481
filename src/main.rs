//! Genprog CLI - evolve expression trees against built-in regression targets.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

mod cli;

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

/// Genprog - a generational genetic programming engine
#[derive(Parser, Debug)]
#[command(name = "genprog")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Evolve a program that fits a built-in target function
    Evolve {
        /// JSON evolution configuration (missing fields use defaults)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Target function to fit
        #[arg(short = 'T', long, default_value = "quartic")]
        target: cli::Target,

        /// Population size (overrides the configuration)
        #[arg(short, long)]
        population: Option<usize>,

        /// Generation cap, 0 for unlimited (overrides the configuration)
        #[arg(short, long)]
        generations: Option<usize>,

        /// Random seed (overrides the configuration)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Stop once the training error is at or below this value
        #[arg(long)]
        target_fitness: Option<f64>,

        /// Fitness evaluation model
        #[arg(short, long, default_value = "sequential")]
        evaluator: cli::EvaluatorKind,

        /// Worker threads for the parallel evaluators (default: CPU count)
        #[arg(short = 'j', long)]
        threads: Option<usize>,

        /// Mutation strategy: point, subtree, subtree-biased, hoist or shrink
        #[arg(short, long, default_value = "subtree")]
        mutation: String,

        /// Maximum tree depth
        #[arg(long, default_value = "6")]
        max_depth: usize,

        /// Number of samples drawn from the target
        #[arg(long, default_value = "100")]
        samples: usize,

        /// Fraction of samples used for training; the rest is held out
        #[arg(long, default_value = "0.7")]
        split: f64,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,

        /// Show progress bar
        #[arg(long)]
        progress: bool,
    },

    /// Print the default evolution configuration as JSON
    Config {
        /// Write to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let args = Args::parse();

    let level = match args.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let result = match args.command {
        Commands::Evolve {
            config,
            target,
            population,
            generations,
            seed,
            target_fitness,
            evaluator,
            threads,
            mutation,
            max_depth,
            samples,
            split,
            format,
            progress,
        } => cli::evolve::execute(&cli::evolve::EvolveArgs {
            config,
            target,
            population,
            generations,
            seed,
            target_fitness,
            evaluator,
            threads,
            mutation,
            max_depth,
            samples,
            split,
            format,
            progress,
        }),

        Commands::Config { output } => cli::config::execute(output.as_deref()),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
