//! Conflict sets: the nodes currently claiming one capability.

use indexmap::IndexSet;

use crate::capability::{CapabilityDescriptor, CapabilityId};
use crate::graph::{GraphArena, NodeId};

/// Nodes competing for one capability, plus the distinct versions they claim.
///
/// `nodes` keeps first-seen order so resolution is deterministic for a given
/// discovery order. `descriptors` is always derived from `nodes` at construction.
#[derive(Debug, Clone)]
pub struct CapabilityConflict {
    capability: CapabilityId,
    nodes: IndexSet<NodeId>,
    descriptors: IndexSet<CapabilityDescriptor>,
}

impl CapabilityConflict {
    pub fn new(capability: CapabilityId, nodes: IndexSet<NodeId>, arena: &GraphArena) -> Self {
        let descriptors = nodes
            .iter()
            .filter_map(|node| arena.find_capability(*node, &capability.group, &capability.name))
            .collect();
        Self {
            capability,
            nodes,
            descriptors,
        }
    }

    /// A copy restricted to nodes that are still selected in the graph.
    ///
    /// Nodes may be evicted for unrelated reasons between detection and
    /// resolution, so the result may be empty.
    pub fn with_selected_nodes(&self, arena: &GraphArena) -> Self {
        let nodes = self.nodes.iter().copied().filter(|node| arena.is_selected(*node)).collect();
        Self::new(self.capability.clone(), nodes, arena)
    }

    pub fn capability(&self) -> &CapabilityId {
        &self.capability
    }

    pub fn nodes(&self) -> &IndexSet<NodeId> {
        &self.nodes
    }

    pub fn descriptors(&self) -> &IndexSet<CapabilityDescriptor> {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_descriptors_follow_live_nodes() {
        let mut arena = GraphArena::new();
        let a = arena.add_component("org:a:1.0".parse().unwrap(), false);
        let b = arena.add_component("org:b:1.0".parse().unwrap(), false);
        let na = arena.add_node(a, "runtime", vec!["org:cap:1.0".parse().unwrap()]);
        let nb = arena.add_node(b, "runtime", vec!["org:cap:2.0".parse().unwrap()]);
        arena.select(na);
        arena.select(nb);

        let conflict =
            CapabilityConflict::new(CapabilityId::new("org", "cap"), [na, nb].into_iter().collect(), &arena);
        assert_eq!(conflict.descriptors().len(), 2);

        arena.evict(nb);
        let live = conflict.with_selected_nodes(&arena);
        assert_eq!(live.len(), 1);
        assert!(live.contains(na));
        assert_eq!(live.descriptors().len(), 1);
        assert_eq!(live.descriptors()[0].version.as_deref(), Some("1.0"));
    }
}
