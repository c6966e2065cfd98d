//! capres - capability conflict resolution for dependency graphs
//!
//! Modules in a dependency graph may declare *capabilities*: `group:name`
//! identifiers, optionally versioned, for something they provide. Every module
//! also implicitly provides its own coordinates. Two selected nodes claiming the
//! same capability cannot coexist; capres detects those conflicts while the graph
//! is built and resolves them through an ordered chain of resolvers, recording
//! why each surviving component was chosen.
//!
//! # Modules
//!
//! - [`capability`] - Module and capability identifiers
//! - [`graph`] - Arena of nodes and components the resolver operates on
//! - [`resolver`] - Conflict registry, resolution sessions and the resolver chain
//! - [`version`] - Capability version ordering
//! - [`config`] - Resolution config (`~/.capres/config.toml`)
//! - [`scenario`] - TOML graph descriptions and a reference graph builder
//! - [`cli`] - The `capres` command-line interface
//! - [`core`] - Error types and user-facing error reporting
//!
//! # Example
//!
//! ```rust,no_run
//! use capres::config::ResolutionConfig;
//! use capres::scenario::{GraphBuilder, Scenario};
//!
//! # fn example() -> anyhow::Result<()> {
//! let config = ResolutionConfig::load()?;
//! let scenario = Scenario::from_toml(r#"
//! root = "com.acme:app:1.0"
//!
//! [[components]]
//! id = "com.acme:app:1.0"
//! dependencies = ["org:a:1.0", "org:b:1.0"]
//!
//! [[components]]
//! id = "org:a:1.0"
//! capabilities = ["org:cap:2.0"]
//!
//! [[components]]
//! id = "org:b:1.0"
//! capabilities = ["org:cap:1.0"]
//! "#)?;
//!
//! let report = GraphBuilder::new(&scenario, config.build_chain()?)?.resolve()?;
//! println!("{}", report.render_text());
//! # Ok(())
//! # }
//! ```

pub mod capability;
pub mod cli;
pub mod config;
pub mod core;
pub mod graph;
pub mod resolver;
pub mod scenario;
pub mod version;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
