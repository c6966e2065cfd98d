//! Dependency graph arena consumed by the capability conflict registry.
//!
//! The resolution engine owns nodes and components; the conflict registry only
//! keeps [`NodeId`] handles and reads or mutates state through [`GraphArena`].
//! Every mutation the registry performs (evict, add a selection cause, reject a
//! component, restart it) goes through the arena so its invariants live in one
//! place.
//!
//! # Model
//!
//! - A **component** is one module version ([`ModuleVersionId`](crate::capability::ModuleVersionId)).
//!   It may be the root of the graph and accumulates [`SelectionReason`]s.
//! - A **node** is one variant of a component. Nodes carry their explicitly
//!   declared capabilities and a selected/evicted flag.
//! - Edges are dependencies between nodes, stored in a `petgraph` [`DiGraph`](petgraph::graph::DiGraph).

mod arena;
mod selection;
mod state;

pub use arena::GraphArena;
pub use selection::{SelectionCause, SelectionReason};
pub use state::{CapabilityRejection, ComponentState, NodeState};

use petgraph::graph::NodeIndex;
use std::fmt;

/// Stable handle to a node in a [`GraphArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(NodeIndex);

impl NodeId {
    pub fn index(self) -> usize {
        self.0.index()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node#{}", self.0.index())
    }
}

/// Stable handle to a component in a [`GraphArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentHandle(usize);

impl ComponentHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for ComponentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "component#{}", self.0)
    }
}
