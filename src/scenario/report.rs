//! Serializable outcome of a resolution run.

use colored::Colorize;
use serde::Serialize;
use std::fmt::Write as _;

use crate::core::CapresError;
use crate::graph::{ComponentHandle, GraphArena, NodeId, SelectionReason};
use crate::resolver::ConflictResolution;

use super::builder::ConflictRecord;

/// A node with the selection reasons of its component.
#[derive(Debug, Clone, Serialize)]
pub struct NodeReport {
    pub component: String,
    pub variant: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reasons: Vec<SelectionReason>,
}

impl NodeReport {
    fn new(arena: &GraphArena, node: NodeId) -> Self {
        let component = arena.component_of(node);
        Self {
            component: component.id().to_string(),
            variant: arena.node(node).variant_name().to_string(),
            reasons: component.causes().to_vec(),
        }
    }
}

/// A component that lost a capability conflict.
#[derive(Debug, Clone, Serialize)]
pub struct RejectionReport {
    pub component: String,
    pub capability: String,
    pub conflicts_with: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictStatus {
    Resolved,
    Unresolved,
    Skipped,
}

/// What happened to one capability conflict.
#[derive(Debug, Clone, Serialize)]
pub struct ConflictReport {
    pub capability: String,
    pub status: ConflictStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolver: Option<String>,
    pub participants: Vec<String>,
}

/// Final state of the graph after every conflict has been drained.
#[derive(Debug, Clone, Serialize)]
pub struct ResolutionReport {
    pub root: Option<String>,
    pub selected: Vec<NodeReport>,
    pub evicted: Vec<NodeReport>,
    pub rejected: Vec<RejectionReport>,
    /// Components forced to reselect, in restart order. A scenario component has
    /// a single variant, so a restarted component keeps its node and its rejection.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub restarted: Vec<String>,
    pub conflicts: Vec<ConflictReport>,
}

impl ResolutionReport {
    pub(crate) fn build(arena: &GraphArena, records: &[ConflictRecord], restarted: &[ComponentHandle]) -> Self {
        let root = arena.root().map(|handle| arena.component(handle).id().to_string());

        let mut selected = Vec::new();
        let mut evicted = Vec::new();
        for node in arena.node_ids() {
            let state = arena.node(node);
            if state.is_evicted() {
                evicted.push(NodeReport::new(arena, node));
            } else if state.is_selected() {
                selected.push(NodeReport::new(arena, node));
            }
        }

        let rejected = arena
            .component_handles()
            .filter_map(|handle| {
                let component = arena.component(handle);
                component.rejection().map(|rejection| RejectionReport {
                    component: component.id().to_string(),
                    capability: rejection.capability.to_string(),
                    conflicts_with: rejection.conflicting.iter().map(|n| arena.describe(*n)).collect(),
                })
            })
            .collect();

        let conflicts = records
            .iter()
            .map(|record| {
                let participants = record.participants.iter().map(ToString::to_string).collect();
                match &record.resolution {
                    ConflictResolution::Resolved {
                        capability,
                        selected,
                        resolver,
                        ..
                    } => ConflictReport {
                        capability: capability.to_string(),
                        status: ConflictStatus::Resolved,
                        selected: Some(arena.describe(*selected)),
                        resolver: Some(resolver.clone()),
                        participants,
                    },
                    ConflictResolution::Unresolved {
                        capability,
                        ..
                    } => ConflictReport {
                        capability: capability.to_string(),
                        status: ConflictStatus::Unresolved,
                        selected: None,
                        resolver: None,
                        participants,
                    },
                    ConflictResolution::Skipped {
                        capability,
                    } => ConflictReport {
                        capability: capability.to_string(),
                        status: ConflictStatus::Skipped,
                        selected: None,
                        resolver: None,
                        participants,
                    },
                }
            })
            .collect();

        Self {
            root,
            selected,
            evicted,
            rejected,
            restarted: restarted.iter().map(|handle| arena.component(*handle).id().to_string()).collect(),
            conflicts,
        }
    }

    /// No conflict was left unresolved and no component was rejected.
    pub fn is_success(&self) -> bool {
        self.failure().is_none()
    }

    /// The error a caller should surface, if resolution did not succeed.
    ///
    /// An unresolved conflict takes precedence over rejected components.
    pub fn failure(&self) -> Option<CapresError> {
        if let Some(conflict) = self.conflicts.iter().find(|c| c.status == ConflictStatus::Unresolved) {
            return Some(CapresError::UnresolvedCapabilityConflict {
                capability: conflict.capability.clone(),
                modules: conflict.participants.clone(),
            });
        }
        if !self.rejected.is_empty() {
            return Some(CapresError::RejectedComponents {
                components: self.rejected.iter().map(|r| r.component.clone()).collect(),
            });
        }
        None
    }

    /// Colored, human readable rendering.
    pub fn render_text(&self) -> String {
        let mut out = String::new();

        if let Some(root) = &self.root {
            let _ = writeln!(out, "{} {}", "Root:".bold(), root);
        }

        if self.conflicts.is_empty() {
            let _ = writeln!(out, "{} No capability conflicts", "✓".green());
        } else {
            let _ = writeln!(out, "\n{}", "Capability conflicts:".bold());
            for conflict in &self.conflicts {
                let participants = conflict.participants.join(", ");
                match conflict.status {
                    ConflictStatus::Resolved => {
                        let _ = writeln!(
                            out,
                            "  {} {} -> {} [{}] (among {})",
                            "✓".green(),
                            conflict.capability.cyan(),
                            conflict.selected.as_deref().unwrap_or_default(),
                            conflict.resolver.as_deref().unwrap_or_default(),
                            participants
                        );
                    }
                    ConflictStatus::Unresolved => {
                        let _ = writeln!(
                            out,
                            "  {} {} unresolved between {}",
                            "✗".red(),
                            conflict.capability.cyan(),
                            participants
                        );
                    }
                    ConflictStatus::Skipped => {
                        let _ = writeln!(
                            out,
                            "  {} {} skipped, at most one provider was still in the graph",
                            "-".dimmed(),
                            conflict.capability.cyan()
                        );
                    }
                }
            }
        }

        let _ = writeln!(out, "\n{}", "Selected:".bold());
        for node in &self.selected {
            let _ = writeln!(out, "  {} ({})", node.component, node.variant.dimmed());
            for reason in &node.reasons {
                let _ = writeln!(out, "      {}", reason.to_string().dimmed());
            }
        }

        if !self.evicted.is_empty() {
            let _ = writeln!(out, "\n{}", "Evicted:".bold());
            for node in &self.evicted {
                let _ = writeln!(out, "  {} {} ({})", "⚠".yellow(), node.component, node.variant);
            }
        }

        if !self.rejected.is_empty() {
            let _ = writeln!(out, "\n{}", "Rejected:".bold());
            for rejection in &self.rejected {
                let _ = writeln!(
                    out,
                    "  {} {} cannot provide {} alongside {}",
                    "✗".red(),
                    rejection.component,
                    rejection.capability,
                    rejection.conflicts_with.join(", ")
                );
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::{CapabilityId, ModuleId};
    use crate::test_utils::ArenaFixture;

    #[test]
    fn test_report_lists_evicted_and_resolved() {
        let mut fixture = ArenaFixture::new();
        fixture.root("com.acme:app:1.0");
        let a = fixture.node("org:a:1.0", &["org:cap:2.0"]);
        let b = fixture.node("org:b:1.0", &["org:cap:1.0"]);
        fixture.arena.evict(b);

        let component = fixture.arena.node(a).component();
        let records = vec![ConflictRecord {
            resolution: ConflictResolution::Resolved {
                capability: CapabilityId::new("org", "cap"),
                selected: a,
                component,
                resolver: "highest-version".to_string(),
                participants: 2,
            },
            participants: vec![ModuleId::new("org", "a"), ModuleId::new("org", "b")],
        }];

        let report = ResolutionReport::build(&fixture.arena, &records, &[]);
        assert_eq!(report.root.as_deref(), Some("com.acme:app:1.0"));
        assert_eq!(report.evicted.len(), 1);
        assert_eq!(report.evicted[0].component, "org:b:1.0");
        assert!(report.is_success());

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["conflicts"][0]["status"], "resolved");
        assert_eq!(json["conflicts"][0]["participants"][1], "org:b");

        colored::control::set_override(false);
        let text = report.render_text();
        assert!(text.contains("org:cap -> org:a:1.0"));
        assert!(text.contains("Evicted:"));
        assert!(json.get("restarted").is_none());
    }

    #[test]
    fn test_skipped_conflict_with_single_survivor() {
        let mut fixture = ArenaFixture::new();
        fixture.root("com.acme:app:1.0");
        fixture.node("org:c:1.0", &["org:other:2.0"]);

        let records = vec![ConflictRecord {
            resolution: ConflictResolution::Skipped {
                capability: CapabilityId::new("org", "other"),
            },
            participants: Vec::new(),
        }];

        let report = ResolutionReport::build(&fixture.arena, &records, &[]);
        assert!(report.is_success());
        assert_eq!(report.conflicts[0].status, ConflictStatus::Skipped);

        colored::control::set_override(false);
        let text = report.render_text();
        assert!(text.contains("org:other skipped, at most one provider was still in the graph"));
    }

    #[test]
    fn test_failure_prefers_unresolved_conflict() {
        let report = ResolutionReport {
            root: None,
            selected: Vec::new(),
            evicted: Vec::new(),
            rejected: vec![RejectionReport {
                component: "org:a:1.0".to_string(),
                capability: "org:cap:1.0".to_string(),
                conflicts_with: vec!["org:b:1.0 (default)".to_string()],
            }],
            restarted: vec!["org:a:1.0".to_string()],
            conflicts: vec![ConflictReport {
                capability: "org:cap".to_string(),
                status: ConflictStatus::Unresolved,
                selected: None,
                resolver: None,
                participants: vec!["org:a".to_string(), "org:b".to_string()],
            }],
        };

        assert!(!report.is_success());
        assert_eq!(
            report.failure().unwrap().to_string(),
            "Cannot select a module for capability 'org:cap': provided by org:a, org:b"
        );
    }
}
