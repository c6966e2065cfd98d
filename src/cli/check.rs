//! Detect capability conflicts without resolving them.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::PathBuf;

use crate::resolver::ResolverChain;
use crate::scenario::{GraphBuilder, Scenario};

use super::{CliConfig, OutputFormat};

/// Register every capability provider in the scenario and list the conflicts
/// found. No resolver runs and the graph is left untouched.
#[derive(Args, Debug)]
pub struct CheckCommand {
    /// Scenario file describing the dependency graph
    pub file: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl CheckCommand {
    pub fn execute(self, _config: &CliConfig) -> Result<()> {
        let scenario = Scenario::load(&self.file)?;
        let mut builder = GraphBuilder::new(&scenario, ResolverChain::empty())?;
        let conflicts = builder.discover();

        match self.format {
            OutputFormat::Json => {
                let entries: Vec<_> = conflicts
                    .iter()
                    .map(|c| {
                        serde_json::json!({
                            "capability": c.capability.to_string(),
                            "modules": c.modules.iter().map(ToString::to_string).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&serde_json::json!({ "conflicts": entries }))?);
            }
            OutputFormat::Text if conflicts.is_empty() => {
                println!("{} No capability conflicts", "✓".green());
            }
            OutputFormat::Text => {
                println!("{} {} capability conflict(s):", "⚠".yellow(), conflicts.len());
                for conflict in &conflicts {
                    let modules: Vec<String> = conflict.modules.iter().map(ToString::to_string).collect();
                    println!("  {} provided by {}", conflict.capability.to_string().cyan(), modules.join(", "));
                }
            }
        }
        Ok(())
    }
}
