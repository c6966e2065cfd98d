use capres::capability::{CapabilityId, ModuleId, ModuleVersionId};
use capres::config::ResolutionConfig;
use capres::core::CapresError;
use capres::graph::SelectionCause;
use capres::resolver::{
    HighestVersionResolver, LastCandidateResolver, RejectRemainingResolver, ResolverChain,
};
use capres::scenario::{ConflictStatus, GraphBuilder, Scenario};
use capres::test_utils::init_test_logging;

use crate::common::TWO_PROVIDERS;

fn highest_version_chain() -> ResolverChain {
    ResolverChain::empty()
        .with(HighestVersionResolver)
        .with(LastCandidateResolver)
        .with(RejectRemainingResolver)
}

#[test]
fn test_prefer_newest_capability_version() {
    init_test_logging(None);
    let scenario = Scenario::from_toml(TWO_PROVIDERS).unwrap();
    let mut builder = GraphBuilder::new(&scenario, highest_version_chain()).unwrap();

    let detected = builder.discover();
    assert_eq!(detected.len(), 1);
    assert_eq!(detected[0].capability, CapabilityId::new("org", "cap"));

    let report = builder.resolve().unwrap();
    assert!(report.is_success());
    assert_eq!(report.conflicts[0].status, ConflictStatus::Resolved);
    assert_eq!(report.evicted.len(), 1);
    assert_eq!(report.evicted[0].component, "org:b:1.0");

    let winner = report.selected.iter().find(|n| n.component == "org:a:1.0").unwrap();
    let cause = winner
        .reasons
        .iter()
        .find(|r| r.cause == SelectionCause::ConflictResolution)
        .unwrap();
    assert!(cause.description.as_deref().unwrap().contains("org:b"));
}

#[test]
fn test_eviction_shrinks_later_conflict() {
    // org:b provides both capabilities; losing org:cap removes it from org:other too
    let scenario = Scenario::from_toml(
        r#"
root = "com.acme:app:1.0"

[[components]]
id = "com.acme:app:1.0"
dependencies = ["org:a:1.0", "org:b:1.0", "org:c:1.0"]

[[components]]
id = "org:a:1.0"
capabilities = ["org:cap:2.0"]

[[components]]
id = "org:b:1.0"
capabilities = ["org:cap:1.0", "org:other:1.0"]

[[components]]
id = "org:c:1.0"
capabilities = ["org:other:2.0"]
"#,
    )
    .unwrap();

    let report = GraphBuilder::new(&scenario, highest_version_chain()).unwrap().resolve().unwrap();
    assert!(report.is_success());
    assert_eq!(report.conflicts.len(), 2);

    // org:other is left with org:c alone and resolved without a competing module
    let other = &report.conflicts[1];
    assert_eq!(other.capability, "org:other");
    assert_eq!(other.status, ConflictStatus::Resolved);
    assert_eq!(other.selected.as_deref(), Some("org:c:1.0 (default)"));
    assert_eq!(other.participants, vec!["org:c".to_string()]);
}

#[test]
fn test_root_cycle_is_not_a_conflict() {
    // The root module shows up again transitively at another version
    let scenario = Scenario::from_toml(
        r#"
root = "com.acme:app:2.0"

[[components]]
id = "com.acme:app:2.0"
dependencies = ["org:lib:1.0"]
capabilities = ["com.acme:app-api:2.0"]

[[components]]
id = "org:lib:1.0"
dependencies = ["com.acme:app:1.0"]

[[components]]
id = "com.acme:app:1.0"
capabilities = ["com.acme:app-api:1.0"]
"#,
    )
    .unwrap();

    let mut builder = GraphBuilder::new(&scenario, ResolverChain::default()).unwrap();
    assert!(builder.discover().is_empty());
    assert!(!builder.registry().has_conflicts());
    assert!(builder.resolve().unwrap().is_success());
}

#[test]
fn test_default_chain_rejects_both_components() {
    let scenario = Scenario::from_toml(TWO_PROVIDERS).unwrap();
    let report = GraphBuilder::new(&scenario, ResolverChain::default()).unwrap().resolve().unwrap();

    let rejected: Vec<&str> = report.rejected.iter().map(|r| r.component.as_str()).collect();
    assert_eq!(rejected, vec!["org:a:1.0", "org:b:1.0"]);

    match report.failure() {
        Some(CapresError::UnresolvedCapabilityConflict {
            capability,
            modules,
        }) => {
            assert_eq!(capability, "org:cap");
            assert_eq!(modules, vec!["org:a".to_string(), "org:b".to_string()]);
        }
        other => panic!("unexpected failure: {other:?}"),
    }
}

#[test]
fn test_config_rules_drive_resolution() {
    let config = ResolutionConfig::from_toml(
        r#"
[rules."org:cap"]
select-highest-version = true
because = "newest API"
"#,
    )
    .unwrap();

    let scenario = Scenario::from_toml(TWO_PROVIDERS).unwrap();
    let report = GraphBuilder::new(&scenario, config.build_chain().unwrap()).unwrap().resolve().unwrap();

    assert!(report.is_success());
    assert_eq!(report.conflicts[0].resolver.as_deref(), Some("user-rules"));
    let winner = report.selected.iter().find(|n| n.component == "org:a:1.0").unwrap();
    assert!(winner.reasons.iter().any(|r| r.description.as_deref() == Some("newest API")));
}

#[test]
fn test_scenario_lookup_helpers() {
    let scenario = Scenario::from_toml(TWO_PROVIDERS).unwrap();
    let a = scenario.component(&ModuleVersionId::new("org", "a", "1.0")).unwrap();
    assert_eq!(a.capabilities[0].capability_id().to_string(), "org:cap");

    let mut builder = GraphBuilder::new(&scenario, ResolverChain::default()).unwrap();
    builder.discover();
    let arena = builder.arena();
    let handle = arena.find_component(&a.id).unwrap();
    assert_eq!(arena.component(handle).id().module, ModuleId::new("org", "a"));
    assert!(
        builder
            .registry()
            .has_known_conflict_for(arena, &ModuleVersionId::new("org", "b", "1.0"))
    );
}
