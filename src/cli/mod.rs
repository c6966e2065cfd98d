//! Command-line interface for capres.
//!
//! Each command lives in its own module with its argument struct and execution
//! logic.
//!
//! # Available Commands
//!
//! - `resolve` - Build a scenario graph, resolve its capability conflicts and
//!   print the outcome
//! - `check` - Detect capability conflicts in a scenario without resolving them
//!
//! # Usage
//!
//! ```bash
//! capres resolve graph.toml
//! capres resolve graph.toml --format json
//! capres --config ./rules.toml resolve graph.toml
//! capres -v check graph.toml
//! ```
//!
//! # Global Options
//!
//! - `--verbose` / `-v`: debug logging
//! - `--quiet` / `-q`: errors only
//! - `--config` / `-c`: resolution config file, see
//!   [`ResolutionConfig`](crate::config::ResolutionConfig)
//!
//! Logging goes to stderr so `--format json` output stays machine readable.
//! `RUST_LOG` takes precedence over both flags.

mod check;
mod resolve;

pub use check::CheckCommand;
pub use resolve::ResolveCommand;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Settings shared by every command, derived from the global flags.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub log_level: String,

    /// Resolution config file overriding the default location.
    pub config_path: Option<PathBuf>,
}

/// Output format for command results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, human readable text.
    #[default]
    Text,
    /// Pretty-printed JSON on stdout.
    Json,
}

/// Resolve capability conflicts in dependency graphs.
#[derive(Parser, Debug)]
#[command(name = "capres", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable debug logging. Mutually exclusive with `--quiet`.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log errors.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to the resolution config file.
    ///
    /// Defaults to `$CAPRES_CONFIG_PATH`, then `~/.capres/config.toml`.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Resolve capability conflicts in a scenario and print the outcome
    Resolve(ResolveCommand),

    /// List capability conflicts in a scenario without resolving them
    Check(CheckCommand),
}

impl Cli {
    /// Run the selected command.
    pub fn execute(self) -> Result<()> {
        let config = self.build_config();
        match self.command {
            Commands::Resolve(cmd) => cmd.execute(&config),
            Commands::Check(cmd) => cmd.execute(&config),
        }
    }

    #[must_use]
    pub fn build_config(&self) -> CliConfig {
        let log_level = if self.verbose {
            "capres=debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        };

        CliConfig {
            log_level: log_level.to_string(),
            config_path: self.config.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_config_levels() {
        let cli = Cli::parse_from(["capres", "resolve", "graph.toml"]);
        assert_eq!(cli.build_config().log_level, "warn");
        assert_eq!(cli.build_config().config_path, None);

        let cli = Cli::parse_from(["capres", "-v", "--config", "rules.toml", "check", "graph.toml"]);
        let config = cli.build_config();
        assert_eq!(config.log_level, "capres=debug");
        assert_eq!(config.config_path, Some(PathBuf::from("rules.toml")));

        let cli = Cli::parse_from(["capres", "resolve", "graph.toml", "--quiet"]);
        assert_eq!(cli.build_config().log_level, "error");
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["capres", "-v", "-q", "check", "graph.toml"]).is_err());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::parse_from(["capres", "resolve", "graph.toml", "--format", "json"]);
        match cli.command {
            Commands::Resolve(cmd) => assert_eq!(cmd.format, OutputFormat::Json),
            Commands::Check(_) => panic!("expected resolve"),
        }
    }
}
