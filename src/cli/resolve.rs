//! Resolve the capability conflicts of a scenario.

use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

use crate::config::ResolutionConfig;
use crate::scenario::{GraphBuilder, Scenario};

use super::{CliConfig, OutputFormat};

/// Build the scenario graph, drain every capability conflict through the
/// configured resolver chain and print the report.
///
/// Exits with an error when a conflict stays unresolved or a component is
/// rejected; the report is printed first either way.
#[derive(Args, Debug)]
pub struct ResolveCommand {
    /// Scenario file describing the dependency graph
    pub file: PathBuf,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

impl ResolveCommand {
    pub fn execute(self, config: &CliConfig) -> Result<()> {
        let resolution = ResolutionConfig::load_with_optional(config.config_path.clone())?;
        let chain = resolution.build_chain()?;
        tracing::debug!("Resolver chain: {}", chain.names().join(", "));

        let scenario = Scenario::load(&self.file)?;
        let report = GraphBuilder::new(&scenario, chain)?.resolve()?;

        match self.format {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
            OutputFormat::Text => print!("{}", report.render_text()),
        }

        match report.failure() {
            Some(error) => Err(error.into()),
            None => Ok(()),
        }
    }
}
