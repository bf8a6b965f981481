//! CLI command printing the default configuration.

use crate::cli::CliError;
use genprog::EvolutionConfig;
use std::path::Path;

/// Execute the config command.
pub(crate) fn execute(output: Option<&Path>) -> Result<(), CliError> {
    let config = EvolutionConfig::default();
    match output {
        Some(path) => {
            config.save(path)?;
            println!("Wrote default configuration to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(&config)?),
    }
    Ok(())
}
