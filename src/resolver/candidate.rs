//! Registration requests and their outcomes.

use crate::capability::{CapabilityDescriptor, CapabilityId, ModuleId};
use crate::graph::NodeId;

/// A request to record that `node` provides `capability`.
///
/// `implicit_providers` are nodes that provide the same capability without
/// declaring it, typically because their module coordinates are the capability.
#[derive(Debug, Clone)]
pub struct Candidate {
    node: NodeId,
    capability: CapabilityDescriptor,
    implicit_providers: Vec<NodeId>,
}

impl Candidate {
    pub fn new(node: NodeId, capability: CapabilityDescriptor, implicit_providers: Vec<NodeId>) -> Self {
        Self {
            node,
            capability,
            implicit_providers,
        }
    }

    /// A candidate with no implicit co-providers.
    pub fn explicit(node: NodeId, capability: CapabilityDescriptor) -> Self {
        Self::new(node, capability, Vec::new())
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn capability(&self) -> &CapabilityDescriptor {
        &self.capability
    }

    pub fn implicit_providers(&self) -> &[NodeId] {
        &self.implicit_providers
    }
}

/// Result of registering a [`Candidate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictOutcome {
    NoConflict,
    Conflict {
        capability: CapabilityId,
        /// Distinct modules providing the capability, in discovery order.
        modules: Vec<ModuleId>,
    },
}

impl ConflictOutcome {
    pub fn conflict_exists(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    pub fn participating_modules(&self) -> &[ModuleId] {
        match self {
            Self::NoConflict => &[],
            Self::Conflict {
                modules,
                ..
            } => modules,
        }
    }

    pub fn with_participating_modules(&self, mut visit: impl FnMut(&ModuleId)) {
        for module in self.participating_modules() {
            visit(module);
        }
    }
}
