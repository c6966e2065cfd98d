//! Drives the conflict registry over a [`Scenario`] the way a graph builder does.

use indexmap::IndexMap;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::capability::{CapabilityId, ModuleId};
use crate::core::{CapresError, Result};
use crate::graph::{ComponentHandle, GraphArena, NodeId, SelectionCause, SelectionReason};
use crate::resolver::{Candidate, ConflictOutcome, ConflictRegistry, ConflictResolution, ResolverChain};

use super::definition::Scenario;
use super::report::ResolutionReport;

/// A conflict found while registering candidates, before any resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedConflict {
    pub capability: CapabilityId,
    pub modules: Vec<ModuleId>,
}

/// One drained conflict and the modules that took part when it was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConflictRecord {
    pub resolution: ConflictResolution,
    pub participants: Vec<ModuleId>,
}

/// Builds a [`GraphArena`] from a scenario and resolves its capability conflicts.
#[derive(Debug)]
pub struct GraphBuilder {
    arena: GraphArena,
    registry: ConflictRegistry,
    root: NodeId,
    /// Nodes reached from the root, breadth-first.
    visited: Vec<NodeId>,
    detected: IndexMap<CapabilityId, Vec<ModuleId>>,
}

impl GraphBuilder {
    /// Lay out every component of `scenario` in a fresh arena. Nothing is selected yet.
    ///
    /// # Errors
    ///
    /// Returns [`CapresError::ScenarioError`] if the root or a dependency is not
    /// declared, which [`Scenario::from_toml`] already rules out.
    pub fn new(scenario: &Scenario, chain: ResolverChain) -> Result<Self> {
        let mut arena = GraphArena::new();
        let mut nodes = HashMap::with_capacity(scenario.components.len());

        for spec in &scenario.components {
            let component = arena.add_component(spec.id.clone(), spec.id == scenario.root);
            let node = arena.add_node(component, spec.variant.clone(), spec.capabilities.clone());
            nodes.insert(spec.id.clone(), node);
        }

        for spec in &scenario.components {
            let from = nodes[&spec.id];
            for dependency in &spec.dependencies {
                let to = *nodes.get(dependency).ok_or_else(|| CapresError::ScenarioError {
                    message: format!("{} depends on undeclared component {dependency}", spec.id),
                })?;
                arena.add_dependency(from, to);
            }
        }

        let root = *nodes.get(&scenario.root).ok_or_else(|| CapresError::ScenarioError {
            message: format!("root {} is not declared as a component", scenario.root),
        })?;

        Ok(Self {
            arena,
            registry: ConflictRegistry::new(chain),
            root,
            visited: Vec::new(),
            detected: IndexMap::new(),
        })
    }

    pub fn arena(&self) -> &GraphArena {
        &self.arena
    }

    pub fn registry(&self) -> &ConflictRegistry {
        &self.registry
    }

    /// Select every node reachable from the root and register its capabilities.
    ///
    /// Explicit capabilities are registered first, with every selected node of the
    /// same module coordinates as implicit providers. A node's own default
    /// capability is registered afterwards, and only when some node declared it
    /// explicitly. Returns conflicts in the order they were first detected.
    pub fn discover(&mut self) -> Vec<DetectedConflict> {
        if self.visited.is_empty() {
            self.walk();
            self.register_explicit();
            self.register_defaults();
        }

        self.detected
            .iter()
            .map(|(capability, modules)| DetectedConflict {
                capability: capability.clone(),
                modules: modules.clone(),
            })
            .collect()
    }

    fn walk(&mut self) {
        let mut queue = VecDeque::from([self.root]);
        let mut seen = HashSet::from([self.root]);

        while let Some(node) = queue.pop_front() {
            self.arena.select(node);
            self.visited.push(node);
            for dependency in self.arena.dependencies(node) {
                if seen.insert(dependency) {
                    let component = self.arena.node(dependency).component();
                    let requester = self.arena.describe(node);
                    self.arena.add_cause(
                        component,
                        SelectionReason::new(SelectionCause::Requested).with_description(requester),
                    );
                    queue.push_back(dependency);
                }
            }
        }
        tracing::debug!("Selected {} node(s) reachable from the root", self.visited.len());
    }

    fn register_explicit(&mut self) {
        for &node in &self.visited {
            for capability in self.arena.node(node).declared_capabilities().to_vec() {
                let id = capability.capability_id();
                let implicit: Vec<NodeId> = self
                    .visited
                    .iter()
                    .copied()
                    .filter(|n| id.matches_module(self.arena.module_of(*n)))
                    .collect();
                let outcome = self
                    .registry
                    .register_candidate(&self.arena, &Candidate::new(node, capability, implicit));
                record(&mut self.detected, id, outcome);
            }
        }
    }

    fn register_defaults(&mut self) {
        for &node in &self.visited {
            let capability = self.arena.component_of(node).id().default_capability();
            let id = capability.capability_id();
            if !self.registry.has_seen_non_default_capability_explicitly(&id) {
                continue;
            }
            let outcome =
                self.registry.register_candidate(&self.arena, &Candidate::explicit(node, capability));
            record(&mut self.detected, id, outcome);
        }
    }

    /// Discover, then resolve queued conflicts until none remain.
    ///
    /// # Errors
    ///
    /// Propagates precondition failures from the registry. An unresolved conflict
    /// is not an error here; it is reported in the returned [`ResolutionReport`].
    ///
    /// Components restarted by a rejection are collected into the report. Each
    /// scenario component has exactly one variant, so a restart has no alternative
    /// to move to and nothing is registered again.
    pub fn resolve(mut self) -> Result<ResolutionReport> {
        self.discover();

        let mut records = Vec::new();
        let mut restarted: Vec<ComponentHandle> = Vec::new();
        while self.registry.has_conflicts() {
            let mut participants = Vec::new();
            let resolution = self.registry.resolve_next_conflict(&mut self.arena, |details| {
                participants = details.participating_modules();
            })?;

            match &resolution {
                ConflictResolution::Resolved {
                    capability,
                    selected,
                    resolver,
                    ..
                } => tracing::info!(
                    "Resolved {} in favour of {} ({})",
                    capability,
                    self.arena.describe(*selected),
                    resolver
                ),
                ConflictResolution::Unresolved {
                    modules,
                    ..
                } => participants.clone_from(modules),
                ConflictResolution::Skipped {
                    ..
                } => {}
            }

            records.push(ConflictRecord {
                resolution,
                participants,
            });

            for component in self.arena.take_restarts() {
                if restarted.contains(&component) {
                    continue;
                }
                tracing::debug!(
                    "{} has no other variant to reselect; keeping its rejection",
                    self.arena.component(component).id()
                );
                restarted.push(component);
            }
        }

        Ok(ResolutionReport::build(&self.arena, &records, &restarted))
    }
}

fn record(
    detected: &mut IndexMap<CapabilityId, Vec<ModuleId>>,
    capability: CapabilityId,
    outcome: ConflictOutcome,
) {
    if let ConflictOutcome::Conflict {
        modules,
        ..
    } = outcome
    {
        detected.insert(capability, modules);
    }
}
