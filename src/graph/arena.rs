//! The [`GraphArena`]: owner of every node and component.

use petgraph::Direction;
use petgraph::graph::DiGraph;
use std::collections::{HashMap, VecDeque};

use crate::capability::{CapabilityDescriptor, ModuleId, ModuleVersionId};

use super::selection::{SelectionCause, SelectionReason};
use super::state::{CapabilityRejection, ComponentState, NodeState};
use super::{ComponentHandle, NodeId};

/// Arena of nodes and components addressed by stable handles.
///
/// Handles are only meaningful for the arena that produced them; indexing with a
/// foreign handle panics the same way indexing a `Vec` out of bounds does.
#[derive(Debug, Default)]
pub struct GraphArena {
    graph: DiGraph<NodeState, ()>,
    components: Vec<ComponentState>,
    by_id: HashMap<ModuleVersionId, ComponentHandle>,
    root: Option<ComponentHandle>,
    pending_restarts: VecDeque<ComponentHandle>,
}

impl GraphArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a component, or return the existing handle for the same id.
    ///
    /// The first component added with `root = true` becomes the graph root.
    pub fn add_component(&mut self, id: ModuleVersionId, root: bool) -> ComponentHandle {
        if let Some(&handle) = self.by_id.get(&id) {
            return handle;
        }

        let handle = ComponentHandle(self.components.len());
        let root = root && self.root.is_none();
        let causes = if root {
            vec![SelectionReason::new(SelectionCause::Root)]
        } else {
            Vec::new()
        };
        self.components.push(ComponentState {
            id: id.clone(),
            root,
            nodes: Vec::new(),
            causes,
            rejection: None,
            restarts: 0,
        });
        self.by_id.insert(id, handle);
        if root {
            self.root = Some(handle);
        }
        handle
    }

    /// Add a variant node to `component` declaring `capabilities` explicitly.
    pub fn add_node(
        &mut self,
        component: ComponentHandle,
        variant: impl Into<String>,
        capabilities: Vec<CapabilityDescriptor>,
    ) -> NodeId {
        let index = self.graph.add_node(NodeState {
            component,
            variant: variant.into(),
            capabilities,
            selected: false,
            evicted: false,
        });
        let node = NodeId(index);
        self.components[component.0].nodes.push(node);
        node
    }

    /// Record that `from` depends on `to`.
    pub fn add_dependency(&mut self, from: NodeId, to: NodeId) {
        if !self.graph.contains_edge(from.0, to.0) {
            self.graph.add_edge(from.0, to.0, ());
        }
    }

    /// Outgoing dependencies of `node`, in insertion order.
    pub fn dependencies(&self, node: NodeId) -> Vec<NodeId> {
        // petgraph walks edges newest first
        let mut deps: Vec<NodeId> =
            self.graph.neighbors_directed(node.0, Direction::Outgoing).map(NodeId).collect();
        deps.reverse();
        deps
    }

    pub fn contains(&self, node: NodeId) -> bool {
        node.0.index() < self.graph.node_count()
    }

    pub fn node(&self, node: NodeId) -> &NodeState {
        &self.graph[node.0]
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.graph.node_indices().map(NodeId)
    }

    pub fn component(&self, handle: ComponentHandle) -> &ComponentState {
        &self.components[handle.0]
    }

    pub fn component_handles(&self) -> impl Iterator<Item = ComponentHandle> {
        (0..self.components.len()).map(ComponentHandle)
    }

    pub fn component_of(&self, node: NodeId) -> &ComponentState {
        self.component(self.node(node).component)
    }

    pub fn find_component(&self, id: &ModuleVersionId) -> Option<ComponentHandle> {
        self.by_id.get(id).copied()
    }

    pub fn root(&self) -> Option<ComponentHandle> {
        self.root
    }

    /// Whether `node` belongs to the root component.
    pub fn is_root(&self, node: NodeId) -> bool {
        self.component_of(node).root
    }

    pub fn module_of(&self, node: NodeId) -> &ModuleId {
        &self.component_of(node).id.module
    }

    pub fn is_selected(&self, node: NodeId) -> bool {
        self.node(node).is_selected()
    }

    /// Look up the capability `group:name` as provided by `node`.
    ///
    /// An explicit declaration wins; otherwise a node answers for its own module
    /// coordinates with its component version.
    pub fn find_capability(
        &self,
        node: NodeId,
        group: &str,
        name: &str,
    ) -> Option<CapabilityDescriptor> {
        let state = self.node(node);
        if let Some(declared) = state.capabilities.iter().find(|c| c.is(group, name)) {
            return Some(declared.clone());
        }

        let id = &self.components[state.component.0].id;
        if id.module.group == group && id.module.name == name {
            return Some(id.default_capability());
        }
        None
    }

    /// Human readable `group:name:version (variant)` label for diagnostics.
    pub fn describe(&self, node: NodeId) -> String {
        let state = self.node(node);
        format!("{} ({})", self.components[state.component.0].id, state.variant)
    }

    /// Mark `node` as selected into the graph.
    pub fn select(&mut self, node: NodeId) {
        let state = &mut self.graph[node.0];
        if !state.evicted {
            state.selected = true;
        }
    }

    /// Remove `node` from further consideration. Other nodes of its component are untouched.
    pub fn evict(&mut self, node: NodeId) {
        let state = &mut self.graph[node.0];
        if state.evicted {
            return;
        }
        state.evicted = true;
        state.selected = false;
        tracing::info!("Evicted {}", self.describe(node));
    }

    pub fn add_cause(&mut self, component: ComponentHandle, reason: SelectionReason) {
        self.components[component.0].causes.push(reason);
    }

    /// Reject `component` because it lost the conflict on `capability` to `conflicting`.
    pub fn reject_for_capability_conflict(
        &mut self,
        component: ComponentHandle,
        capability: CapabilityDescriptor,
        conflicting: Vec<NodeId>,
    ) {
        let others: Vec<String> = conflicting.iter().map(|n| self.describe(*n)).collect();
        tracing::info!(
            "Rejected {} for capability {} (conflicts with {})",
            self.components[component.0].id,
            capability,
            others.join(", ")
        );

        let state = &mut self.components[component.0];
        state.causes.push(
            SelectionReason::new(SelectionCause::Rejection)
                .with_description(format!("cannot provide {capability} alongside {}", others.join(", "))),
        );
        state.rejection = Some(CapabilityRejection {
            capability,
            conflicting,
        });
    }

    /// Keep `component` in the graph but force it to reselect among its alternatives.
    pub fn select_and_restart_module(&mut self, component: ComponentHandle) {
        let state = &mut self.components[component.0];
        state.restarts += 1;
        tracing::info!("Restarting selection of {} (restart #{})", state.id, state.restarts);
        if !self.pending_restarts.contains(&component) {
            self.pending_restarts.push_back(component);
        }
    }

    /// Drain the components that were restarted since the last call, oldest first.
    pub fn take_restarts(&mut self) -> Vec<ComponentHandle> {
        self.pending_restarts.drain(..).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(s: &str) -> ModuleVersionId {
        s.parse().unwrap()
    }

    #[test]
    fn test_first_root_wins() {
        let mut arena = GraphArena::new();
        let app = arena.add_component(mv("org:app:1.0"), true);
        let other = arena.add_component(mv("org:other:1.0"), true);

        assert_eq!(arena.root(), Some(app));
        assert!(arena.component(app).is_root());
        assert!(!arena.component(other).is_root());
        assert_eq!(arena.component(app).causes()[0].cause, SelectionCause::Root);
    }

    #[test]
    fn test_add_component_is_idempotent() {
        let mut arena = GraphArena::new();
        let a = arena.add_component(mv("org:a:1.0"), false);
        let again = arena.add_component(mv("org:a:1.0"), false);
        assert_eq!(a, again);
        assert_eq!(arena.component_handles().count(), 1);
    }

    #[test]
    fn test_find_capability_prefers_declared() {
        let mut arena = GraphArena::new();
        let a = arena.add_component(mv("org:a:1.0"), false);
        let declared: CapabilityDescriptor = "org:a:9.9".parse().unwrap();
        let node = arena.add_node(a, "runtime", vec![declared.clone()]);
        let plain = arena.add_node(a, "api", vec![]);

        assert_eq!(arena.find_capability(node, "org", "a"), Some(declared));
        assert_eq!(arena.find_capability(plain, "org", "a").unwrap().version.as_deref(), Some("1.0"));
        assert_eq!(arena.find_capability(plain, "org", "b"), None);
    }

    #[test]
    fn test_evict_clears_selection() {
        let mut arena = GraphArena::new();
        let a = arena.add_component(mv("org:a:1.0"), false);
        let node = arena.add_node(a, "runtime", vec![]);

        arena.select(node);
        assert!(arena.is_selected(node));

        arena.evict(node);
        assert!(!arena.is_selected(node));
        assert!(arena.node(node).is_evicted());

        // evicted nodes cannot come back
        arena.select(node);
        assert!(!arena.is_selected(node));
    }

    #[test]
    fn test_dependencies_keep_insertion_order() {
        let mut arena = GraphArena::new();
        let c = arena.add_component(mv("org:a:1.0"), false);
        let a = arena.add_node(c, "a", vec![]);
        let b = arena.add_node(c, "b", vec![]);
        let d = arena.add_node(c, "d", vec![]);
        arena.add_dependency(a, b);
        arena.add_dependency(a, d);
        arena.add_dependency(a, b);

        assert_eq!(arena.dependencies(a), vec![b, d]);
    }

    #[test]
    fn test_reject_and_restart() {
        let mut arena = GraphArena::new();
        let a = arena.add_component(mv("org:a:1.0"), false);
        let b = arena.add_component(mv("org:b:1.0"), false);
        let na = arena.add_node(a, "runtime", vec![]);
        let nb = arena.add_node(b, "runtime", vec![]);
        let cap: CapabilityDescriptor = "org:cap:1.0".parse().unwrap();

        arena.reject_for_capability_conflict(a, cap.clone(), vec![nb]);
        arena.select_and_restart_module(a);
        arena.select_and_restart_module(a);

        let state = arena.component(a);
        assert!(state.is_rejected());
        assert_eq!(state.rejection().unwrap().conflicting, vec![nb]);
        assert_eq!(state.restarts(), 2);
        assert_eq!(arena.take_restarts(), vec![a]);
        assert!(arena.take_restarts().is_empty());
        assert!(!arena.node(na).is_evicted());
    }
}
