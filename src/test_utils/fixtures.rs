//! Graph fixtures for resolver tests.

use crate::capability::CapabilityDescriptor;
use crate::graph::{GraphArena, NodeId};

/// Parse a `group:name[:version]` capability, panicking on bad input.
pub fn cap(notation: &str) -> CapabilityDescriptor {
    notation.parse().unwrap_or_else(|e| panic!("bad capability '{notation}': {e}"))
}

/// Builds a [`GraphArena`] where every added node is already selected.
///
/// # Example
///
/// ```rust,no_run
/// use capres::test_utils::ArenaFixture;
///
/// let mut fx = ArenaFixture::new();
/// let app = fx.root("com.acme:app:1.0");
/// let lib = fx.node("org:lib:2.0", &["org:logging:1.0"]);
/// fx.depends(app, lib);
/// ```
#[derive(Debug, Default)]
pub struct ArenaFixture {
    pub arena: GraphArena,
}

impl ArenaFixture {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the root component with one selected node.
    pub fn root(&mut self, id: &str) -> NodeId {
        self.add(id, true, "default", &[])
    }

    /// Add a non-root component with one selected `runtime` node.
    pub fn node(&mut self, id: &str, capabilities: &[&str]) -> NodeId {
        self.add(id, false, "runtime", capabilities)
    }

    /// Add another selected variant to a (possibly existing) component.
    pub fn variant(&mut self, id: &str, variant: &str, capabilities: &[&str]) -> NodeId {
        self.add(id, false, variant, capabilities)
    }

    pub fn depends(&mut self, from: NodeId, to: NodeId) {
        self.arena.add_dependency(from, to);
    }

    fn add(&mut self, id: &str, root: bool, variant: &str, capabilities: &[&str]) -> NodeId {
        let id = id.parse().unwrap_or_else(|e| panic!("bad module id '{id}': {e}"));
        let component = self.arena.add_component(id, root);
        let node =
            self.arena.add_node(component, variant, capabilities.iter().map(|c| cap(c)).collect());
        self.arena.select(node);
        node
    }
}
