//! Capability conflict detection and resolution.
//!
//! Several nodes of a dependency graph may claim the same capability. Exactly one
//! of them may survive per capability; the rest are evicted or their components
//! rejected, with the outcome recorded as a selection reason.
//!
//! # Flow
//!
//! 1. While walking the graph, the builder calls
//!    [`ConflictRegistry::register_candidate`] for every capability-providing node.
//!    Newly detected conflicts are queued (each capability at most once).
//! 2. When the builder wants to advance it loops on
//!    [`ConflictRegistry::has_conflicts`] / [`ConflictRegistry::resolve_next_conflict`].
//! 3. Each resolution restricts the conflict to nodes still selected, builds a
//!    [`ResolutionDetails`] session and offers it to the [`ResolverChain`] in order.
//!    The first resolver that selects a candidate wins.
//!
//! # Example
//!
//! ```rust,no_run
//! use capres::graph::GraphArena;
//! use capres::resolver::{Candidate, ConflictRegistry, HighestVersionResolver, ResolverChain};
//!
//! # fn example() -> capres::core::Result<()> {
//! let mut arena = GraphArena::new();
//! let a = arena.add_component("org:a:1.0".parse()?, false);
//! let b = arena.add_component("org:b:1.0".parse()?, false);
//! let na = arena.add_node(a, "runtime", vec!["org:cap:2.0".parse()?]);
//! let nb = arena.add_node(b, "runtime", vec!["org:cap:1.0".parse()?]);
//! arena.select(na);
//! arena.select(nb);
//!
//! let mut registry = ConflictRegistry::new(ResolverChain::empty().with(HighestVersionResolver));
//! registry.register_candidate(&arena, &Candidate::explicit(na, "org:cap:2.0".parse()?));
//! let outcome = registry.register_candidate(&arena, &Candidate::explicit(nb, "org:cap:1.0".parse()?));
//! assert!(outcome.conflict_exists());
//!
//! while registry.has_conflicts() {
//!     registry.resolve_next_conflict(&mut arena, |_| {})?;
//! }
//! assert!(arena.node(nb).is_evicted());
//! # Ok(())
//! # }
//! ```

mod candidate;
mod chain;
mod conflict;
mod details;
mod registry;
mod shared;
mod strategies;

pub use candidate::{Candidate, ConflictOutcome};
pub use chain::{CapabilityResolver, ResolverChain};
pub use conflict::CapabilityConflict;
pub use details::{CandidateDetails, ResolutionDetails};
pub use registry::{ConflictRegistry, ConflictResolution};
pub use shared::SharedConflictRegistry;
pub use strategies::{
    CapabilityRule, HighestVersionResolver, LastCandidateResolver, RejectRemainingResolver,
    UserRulesResolver,
};
