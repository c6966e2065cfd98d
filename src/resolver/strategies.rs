//! Built-in resolution strategies.
//!
//! | Name               | Behaviour                                                        |
//! |--------------------|------------------------------------------------------------------|
//! | `user-rules`       | Apply per-capability rules from the resolution config            |
//! | `highest-version`  | Select the sole candidate declaring the highest capability version |
//! | `last-candidate`   | Select the only candidate left, if there is exactly one          |
//! | `reject-remaining` | Reject every candidate; never selects                            |

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::capability::{CapabilityId, ModuleId};
use crate::version::VersionComparator;

use super::chain::CapabilityResolver;
use super::details::{CandidateDetails, ResolutionDetails};

/// Select `winner` and evict every other live candidate.
fn select_and_evict_others(
    details: &mut ResolutionDetails<'_>,
    winner: &CandidateDetails,
    all: &[CandidateDetails],
) {
    for candidate in all {
        if candidate.node() != winner.node() {
            details.evict(candidate);
        }
    }
    details.select(winner);
}

/// Select the unique candidate with the highest declared capability version.
///
/// Declines when no candidate declares a version or when several candidates
/// share the highest one.
fn select_highest_version(details: &mut ResolutionDetails<'_>, reason: Option<&str>) -> bool {
    let all = details.all_candidates();
    let highest = VersionComparator::highest(
        all.iter().filter_map(|c| c.capability().version.as_deref()),
    );
    let Some(highest) = highest else {
        return false;
    };

    let top: Vec<&CandidateDetails> = all
        .iter()
        .filter(|c| {
            c.capability()
                .version
                .as_deref()
                .is_some_and(|v| VersionComparator::compare(v, highest) == Ordering::Equal)
        })
        .collect();
    let [winner] = top.as_slice() else {
        tracing::debug!(
            "{} candidates declare {} at version {}; not choosing",
            top.len(),
            details.capability(),
            highest
        );
        return false;
    };
    let winner = (*winner).clone();
    let reason = reason.map_or_else(
        || {
            let mut others: Vec<String> = Vec::new();
            for candidate in all.iter().filter(|c| c.module() != winner.module()) {
                let module = candidate.module().to_string();
                if !others.contains(&module) {
                    others.push(module);
                }
            }
            format!(
                "latest version of capability {} (competing with {})",
                details.capability(),
                others.join(", ")
            )
        },
        str::to_string,
    );
    select_and_evict_others(details, &winner, &all);
    details.by_reason(reason);
    true
}

/// A user-configured rule for one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapabilityRule {
    /// Prefer the candidate from `module`.
    Select {
        module: ModuleId,
        because: Option<String>,
    },
    /// Prefer the candidate with the highest capability version.
    SelectHighestVersion {
        because: Option<String>,
    },
}

/// Applies [`CapabilityRule`]s keyed by capability.
#[derive(Debug, Clone, Default)]
pub struct UserRulesResolver {
    rules: HashMap<CapabilityId, CapabilityRule>,
}

impl UserRulesResolver {
    pub fn new(rules: HashMap<CapabilityId, CapabilityRule>) -> Self {
        Self {
            rules,
        }
    }

    pub fn rule_for(&self, capability: &CapabilityId) -> Option<&CapabilityRule> {
        self.rules.get(capability)
    }
}

impl CapabilityResolver for UserRulesResolver {
    fn name(&self) -> &str {
        "user-rules"
    }

    fn resolve(&self, details: &mut ResolutionDetails<'_>) {
        let Some(rule) = self.rules.get(details.capability()) else {
            return;
        };

        match rule {
            CapabilityRule::Select {
                module,
                because,
            } => {
                let all = details.all_candidates();
                let Some(winner) = all.iter().find(|c| c.module() == module).cloned() else {
                    tracing::debug!(
                        "Rule for {} selects {}, which is not among the candidates",
                        details.capability(),
                        module
                    );
                    return;
                };
                let reason = because.clone().unwrap_or_else(|| {
                    format!("{module} selected by rule for capability {}", details.capability())
                });
                select_and_evict_others(details, &winner, &all);
                details.by_reason(reason);
            }
            CapabilityRule::SelectHighestVersion {
                because,
            } => {
                select_highest_version(details, because.as_deref());
            }
        }
    }
}

/// Prefer the candidate declaring the highest capability version.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighestVersionResolver;

impl CapabilityResolver for HighestVersionResolver {
    fn name(&self) -> &str {
        "highest-version"
    }

    fn resolve(&self, details: &mut ResolutionDetails<'_>) {
        select_highest_version(details, None);
    }
}

/// Select the only candidate left, which covers conflicts that shrank to one node.
#[derive(Debug, Clone, Copy, Default)]
pub struct LastCandidateResolver;

impl CapabilityResolver for LastCandidateResolver {
    fn name(&self) -> &str {
        "last-candidate"
    }

    fn resolve(&self, details: &mut ResolutionDetails<'_>) {
        let all = details.all_candidates();
        if let [only] = all.as_slice() {
            details.select(only);
        }
    }
}

/// Reject every remaining candidate. Never commits, so the conflict is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct RejectRemainingResolver;

impl CapabilityResolver for RejectRemainingResolver {
    fn name(&self) -> &str {
        "reject-remaining"
    }

    fn resolve(&self, details: &mut ResolutionDetails<'_>) {
        for candidate in details.all_candidates() {
            details.reject(&candidate);
        }
    }
}
