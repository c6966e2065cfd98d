//! Reference graph builder driven by TOML scenario files.
//!
//! A [`Scenario`] lists components, their dependencies and the capabilities they
//! declare. [`GraphBuilder`] lays the scenario out in a
//! [`GraphArena`](crate::graph::GraphArena), walks it from the root, feeds every
//! capability provider to the [`ConflictRegistry`](crate::resolver::ConflictRegistry)
//! and drains the conflict queue, producing a [`ResolutionReport`].
//!
//! ```rust,no_run
//! use capres::resolver::ResolverChain;
//! use capres::scenario::{GraphBuilder, Scenario};
//!
//! # fn example() -> anyhow::Result<()> {
//! let scenario = Scenario::load(std::path::Path::new("graph.toml"))?;
//! let report = GraphBuilder::new(&scenario, ResolverChain::default())?.resolve()?;
//! if let Some(error) = report.failure() {
//!     return Err(error.into());
//! }
//! # Ok(())
//! # }
//! ```

mod builder;
mod definition;
mod report;

pub use builder::{ConflictRecord, DetectedConflict, GraphBuilder};
pub use definition::{ComponentSpec, DEFAULT_VARIANT, Scenario};
pub use report::{ConflictReport, ConflictStatus, NodeReport, RejectionReport, ResolutionReport};
