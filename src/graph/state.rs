//! Per-node and per-component state held by the [`GraphArena`](super::GraphArena).

use crate::capability::{CapabilityDescriptor, ModuleVersionId};

use super::selection::SelectionReason;
use super::{ComponentHandle, NodeId};

/// One variant of one component in the graph.
#[derive(Debug, Clone)]
pub struct NodeState {
    pub(super) component: ComponentHandle,
    pub(super) variant: String,
    /// Capabilities the variant declares explicitly.
    pub(super) capabilities: Vec<CapabilityDescriptor>,
    pub(super) selected: bool,
    pub(super) evicted: bool,
}

impl NodeState {
    pub fn component(&self) -> ComponentHandle {
        self.component
    }

    pub fn variant_name(&self) -> &str {
        &self.variant
    }

    pub fn declared_capabilities(&self) -> &[CapabilityDescriptor] {
        &self.capabilities
    }

    /// Selected and not evicted since.
    pub fn is_selected(&self) -> bool {
        self.selected && !self.evicted
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted
    }
}

/// Record of a component being rejected because it lost a capability conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityRejection {
    pub capability: CapabilityDescriptor,
    /// The other nodes that claimed the capability.
    pub conflicting: Vec<NodeId>,
}

/// All nodes of one module version in the graph.
#[derive(Debug, Clone)]
pub struct ComponentState {
    pub(super) id: ModuleVersionId,
    pub(super) root: bool,
    pub(super) nodes: Vec<NodeId>,
    pub(super) causes: Vec<SelectionReason>,
    pub(super) rejection: Option<CapabilityRejection>,
    pub(super) restarts: usize,
}

impl ComponentState {
    pub fn id(&self) -> &ModuleVersionId {
        &self.id
    }

    pub fn is_root(&self) -> bool {
        self.root
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn causes(&self) -> &[SelectionReason] {
        &self.causes
    }

    pub fn rejection(&self) -> Option<&CapabilityRejection> {
        self.rejection.as_ref()
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// How many times the component was forced to reselect.
    pub fn restarts(&self) -> usize {
        self.restarts
    }
}
