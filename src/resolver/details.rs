//! The resolution session handed to each resolver in the chain.

use std::collections::HashSet;

use crate::capability::{CapabilityDescriptor, CapabilityId, ModuleId, ModuleVersionId};
use crate::core::{CapresError, Result};
use crate::graph::{ComponentHandle, GraphArena, NodeId};

use super::conflict::CapabilityConflict;

/// One node competing in a session, as seen by resolvers.
///
/// Candidates are plain values; act on them through
/// [`ResolutionDetails::select`], [`ResolutionDetails::evict`] and
/// [`ResolutionDetails::reject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateDetails {
    node: NodeId,
    component: ComponentHandle,
    id: ModuleVersionId,
    variant: String,
    capability: CapabilityDescriptor,
}

impl CandidateDetails {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn component(&self) -> ComponentHandle {
        self.component
    }

    /// Identity of the owning component.
    pub fn id(&self) -> &ModuleVersionId {
        &self.id
    }

    pub fn module(&self) -> &ModuleId {
        &self.id.module
    }

    pub fn variant_name(&self) -> &str {
        &self.variant
    }

    /// The capability version this candidate declares.
    pub fn capability(&self) -> &CapabilityDescriptor {
        &self.capability
    }
}

/// A single-use, mutable view over one conflict's live candidates.
pub struct ResolutionDetails<'a> {
    arena: &'a mut GraphArena,
    conflict: &'a CapabilityConflict,
    evicted: HashSet<NodeId>,
    selected: Option<NodeId>,
    reason: Option<String>,
}

impl<'a> ResolutionDetails<'a> {
    pub(crate) fn new(arena: &'a mut GraphArena, conflict: &'a CapabilityConflict) -> Self {
        Self {
            arena,
            conflict,
            evicted: HashSet::new(),
            selected: None,
            reason: None,
        }
    }

    pub fn capability(&self) -> &CapabilityId {
        self.conflict.capability()
    }

    /// Read access to the graph, for resolvers that need more than the candidate view.
    pub fn arena(&self) -> &GraphArena {
        &*self.arena
    }

    /// Number of nodes that took part in the session, evicted ones included.
    pub fn participant_count(&self) -> usize {
        self.conflict.len()
    }

    /// Distinct capability versions claimed by the session's nodes.
    pub fn capability_versions(&self) -> Vec<CapabilityDescriptor> {
        self.conflict.descriptors().iter().cloned().collect()
    }

    /// Non-evicted candidates declaring exactly `version`.
    pub fn candidates(&self, version: &CapabilityDescriptor) -> Vec<CandidateDetails> {
        let capability = self.conflict.capability();
        self.conflict
            .nodes()
            .iter()
            .filter(|node| !self.evicted.contains(*node))
            .filter_map(|&node| {
                let declared = self.arena.find_capability(node, &capability.group, &capability.name)?;
                if declared.version != version.version {
                    return None;
                }
                let state = self.arena.node(node);
                Some(CandidateDetails {
                    node,
                    component: state.component(),
                    id: self.arena.component(state.component()).id().clone(),
                    variant: state.variant_name().to_string(),
                    capability: declared,
                })
            })
            .collect()
    }

    /// Every non-evicted candidate, grouped by version in discovery order.
    pub fn all_candidates(&self) -> Vec<CandidateDetails> {
        self.conflict.descriptors().iter().flat_map(|version| self.candidates(version)).collect()
    }

    /// Evict the candidate's node from the graph and from this session.
    pub fn evict(&mut self, candidate: &CandidateDetails) {
        if self.evicted.insert(candidate.node) {
            self.arena.evict(candidate.node);
        }
    }

    /// Make the candidate the session's result. Call at most once per session.
    pub fn select(&mut self, candidate: &CandidateDetails) {
        tracing::debug!(
            "Selected {} for capability {}",
            self.arena.describe(candidate.node),
            self.conflict.capability()
        );
        self.selected = Some(candidate.node);
    }

    /// Reject the candidate's component for this conflict and force it to reselect.
    ///
    /// The node stays in the graph so the conflict can still be reported.
    pub fn reject(&mut self, candidate: &CandidateDetails) {
        let others: Vec<NodeId> =
            self.conflict.nodes().iter().copied().filter(|n| *n != candidate.node).collect();
        self.arena.reject_for_capability_conflict(
            candidate.component,
            candidate.capability.clone(),
            others,
        );
        self.arena.select_and_restart_module(candidate.component);
    }

    /// Explain the eventual selection.
    pub fn by_reason(&mut self, description: impl Into<String>) {
        self.reason = Some(description.into());
    }

    /// Visit each distinct module among the session's nodes once, in discovery order.
    pub fn with_participating_modules(&self, mut visit: impl FnMut(&ModuleId)) {
        let mut seen = HashSet::new();
        for node in self.conflict.nodes() {
            let module = self.arena.module_of(*node);
            if seen.insert(module) {
                visit(module);
            }
        }
    }

    pub fn participating_modules(&self) -> Vec<ModuleId> {
        let mut modules = Vec::new();
        self.with_participating_modules(|m| modules.push(m.clone()));
        modules
    }

    pub fn has_result(&self) -> bool {
        self.selected.is_some()
    }

    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected
    }

    /// Component of the selected node.
    ///
    /// # Errors
    ///
    /// Returns [`CapresError::NoSelection`] if no candidate was selected.
    pub fn selected(&self) -> Result<ComponentHandle> {
        self.selected.map(|node| self.arena.node(node).component()).ok_or_else(|| {
            CapresError::NoSelection {
                capability: self.conflict.capability().to_string(),
            }
        })
    }

    pub fn reason(&self) -> Option<&str> {
        self.reason.as_deref()
    }

    pub(crate) fn into_selection(self) -> (Option<NodeId>, Option<String>) {
        (self.selected, self.reason)
    }
}
