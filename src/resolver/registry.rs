//! The capability conflict registry.
//!
//! The graph builder calls [`ConflictRegistry::register_candidate`] for every node
//! it discovers providing a capability. Conflicts are detected incrementally and
//! queued; the builder later drains the queue one conflict at a time with
//! [`ConflictRegistry::resolve_next_conflict`], which snapshots the nodes still
//! selected and runs the [`ResolverChain`].

use indexmap::IndexSet;
use std::collections::{HashMap, VecDeque};

use crate::capability::{CapabilityId, ModuleId, ModuleVersionId};
use crate::core::{CapresError, Result};
use crate::graph::{ComponentHandle, GraphArena, NodeId, SelectionReason};

use super::candidate::{Candidate, ConflictOutcome};
use super::chain::ResolverChain;
use super::conflict::CapabilityConflict;
use super::details::ResolutionDetails;

/// What happened to one dequeued conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictResolution {
    /// Every participant was evicted before resolution, or a lone survivor was
    /// left that no resolver picked; nothing to do.
    Skipped {
        capability: CapabilityId,
    },
    /// A resolver selected a node.
    Resolved {
        capability: CapabilityId,
        selected: NodeId,
        component: ComponentHandle,
        resolver: String,
        /// Live nodes in the session.
        participants: usize,
    },
    /// Every resolver declined.
    Unresolved {
        capability: CapabilityId,
        modules: Vec<ModuleId>,
    },
}

impl ConflictResolution {
    pub fn capability(&self) -> &CapabilityId {
        match self {
            Self::Skipped {
                capability,
            }
            | Self::Resolved {
                capability,
                ..
            }
            | Self::Unresolved {
                capability,
                ..
            } => capability,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved { .. })
    }

    /// The user-facing failure for an unresolved conflict, if this is one.
    pub fn to_error(&self) -> Option<CapresError> {
        match self {
            Self::Unresolved {
                capability,
                modules,
            } => Some(CapresError::UnresolvedCapabilityConflict {
                capability: capability.to_string(),
                modules: modules.iter().map(ToString::to_string).collect(),
            }),
            _ => None,
        }
    }
}

/// Tracks capability providers, pending conflicts and their resolution.
#[derive(Debug)]
pub struct ConflictRegistry {
    chain: ResolverChain,
    /// Every node seen providing each capability, in first-seen order.
    providers: HashMap<CapabilityId, IndexSet<NodeId>>,
    /// Capabilities awaiting resolution, each at most once.
    pending: VecDeque<CapabilityId>,
    /// Latest known conflict set per pending capability.
    conflicts: HashMap<CapabilityId, CapabilityConflict>,
}

impl ConflictRegistry {
    pub fn new(chain: ResolverChain) -> Self {
        Self {
            chain,
            providers: HashMap::new(),
            pending: VecDeque::new(),
            conflicts: HashMap::new(),
        }
    }

    pub fn chain(&self) -> &ResolverChain {
        &self.chain
    }

    /// Record that a node provides a capability and detect a resulting conflict.
    ///
    /// Never mutates the graph. A conflict is reported only when, after the
    /// root-cycle exclusion, more than one node claims the capability.
    pub fn register_candidate(&mut self, arena: &GraphArena, candidate: &Candidate) -> ConflictOutcome {
        let capability = candidate.capability().capability_id();
        tracing::trace!(
            "Registering {} as provider of {}",
            arena.describe(candidate.node()),
            candidate.capability()
        );

        let nodes = self.providers.entry(capability.clone()).or_default();
        nodes.extend(candidate.implicit_providers().iter().copied());

        if !(nodes.insert(candidate.node()) && nodes.len() > 1) {
            return ConflictOutcome::NoConflict;
        }

        let mut candidates = nodes.clone();
        // A root module reached again through a transitive dependency is tolerated
        // for graphs that already contain such cycles: the transitive copies of the
        // root module do not compete with the root itself.
        if let Some(root_module) =
            candidates.iter().find(|n| arena.is_root(**n)).map(|n| arena.module_of(*n).clone())
        {
            candidates.retain(|n| arena.is_root(*n) || *arena.module_of(*n) != root_module);
        }

        if candidates.len() <= 1 {
            return ConflictOutcome::NoConflict;
        }

        let mut modules: Vec<ModuleId> = Vec::new();
        for node in &candidates {
            let module = arena.module_of(*node);
            if !modules.contains(module) {
                modules.push(module.clone());
            }
        }

        let conflict = CapabilityConflict::new(capability.clone(), candidates, arena);
        if self.conflicts.insert(capability.clone(), conflict).is_none() {
            tracing::debug!(
                "Capability conflict on {} between {}",
                capability,
                modules.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            self.pending.push_back(capability.clone());
        }

        ConflictOutcome::Conflict {
            capability,
            modules,
        }
    }

    /// Whether any conflict is waiting to be resolved.
    pub fn has_conflicts(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Capabilities waiting for resolution, oldest first.
    pub fn pending(&self) -> impl Iterator<Item = &CapabilityId> {
        self.pending.iter()
    }

    /// The tracked conflict set for a pending capability.
    pub fn conflict(&self, capability: &CapabilityId) -> Option<&CapabilityConflict> {
        self.conflicts.get(capability)
    }

    /// Resolve the oldest pending conflict.
    ///
    /// The conflict is first restricted to nodes still selected in `arena`, and
    /// that snapshot replaces the provider set for the capability. `on_resolved`
    /// is invoked with the session only when a resolver commits.
    ///
    /// # Errors
    ///
    /// Returns [`CapresError::NoPendingConflict`] if nothing is queued; callers
    /// must check [`has_conflicts`](Self::has_conflicts) first.
    pub fn resolve_next_conflict(
        &mut self,
        arena: &mut GraphArena,
        on_resolved: impl FnOnce(&ResolutionDetails<'_>),
    ) -> Result<ConflictResolution> {
        let capability = self.pending.pop_front().ok_or(CapresError::NoPendingConflict)?;
        let conflict = match self.conflicts.remove(&capability) {
            Some(tracked) => tracked.with_selected_nodes(arena),
            None => CapabilityConflict::new(capability.clone(), IndexSet::new(), arena),
        };
        self.providers.insert(capability.clone(), conflict.nodes().clone());

        if conflict.is_empty() {
            tracing::debug!("Every provider of {} left the graph; skipping", capability);
            return Ok(ConflictResolution::Skipped {
                capability,
            });
        }

        // TODO: a conflict left with only default-capability providers is really a
        // version conflict and could be handed back to the version resolver.
        tracing::debug!("Resolving {} across {} node(s)", capability, conflict.len());

        let mut details = ResolutionDetails::new(arena, &conflict);
        let Some(resolver) = self.chain.resolve(&mut details).map(str::to_string) else {
            if conflict.len() == 1 {
                tracing::debug!("Only one provider of {} is left; nothing to resolve", capability);
                return Ok(ConflictResolution::Skipped {
                    capability,
                });
            }
            let modules = details.participating_modules();
            tracing::warn!(
                "No resolver could choose a provider for {} among {}",
                capability,
                modules.iter().map(ToString::to_string).collect::<Vec<_>>().join(", ")
            );
            return Ok(ConflictResolution::Unresolved {
                capability,
                modules,
            });
        };

        on_resolved(&details);
        let (selected, reason) = details.into_selection();
        let selected = selected.ok_or_else(|| CapresError::NoSelection {
            capability: capability.to_string(),
        })?;
        let component = arena.node(selected).component();

        if conflict.len() > 1 {
            let mut cause = SelectionReason::conflict_resolution();
            if let Some(reason) = reason {
                cause = cause.with_description(reason);
            }
            arena.add_cause(component, cause);
        }

        Ok(ConflictResolution::Resolved {
            capability,
            selected,
            component,
            resolver,
            participants: conflict.len(),
        })
    }

    /// Whether any node was ever registered for `capability`, conflicting or not.
    pub fn has_seen_non_default_capability_explicitly(&self, capability: &CapabilityId) -> bool {
        self.providers.contains_key(capability)
    }

    /// Whether a queued conflict involves a node of component `id`.
    ///
    /// Only explicitly tracked conflict nodes are inspected.
    pub fn has_known_conflict_for(&self, arena: &GraphArena, id: &ModuleVersionId) -> bool {
        if self.pending.is_empty() {
            return false;
        }

        self.conflicts
            .values()
            .flat_map(|conflict| conflict.nodes().iter())
            .any(|node| arena.component_of(*node).id() == id)
    }
}

impl Default for ConflictRegistry {
    fn default() -> Self {
        Self::new(ResolverChain::default())
    }
}
