use crate::common::{TWO_PROVIDERS, TestProject};

#[test]
fn test_user_rule_selects_module() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();
    project
        .write_config(
            r#"
[rules."org:cap"]
select = "org:b"
because = "org:b is the supported implementation"
"#,
        )
        .unwrap();

    let output = project.run_capres(&["resolve", "graph.toml", "--format", "json"]).unwrap();
    output.assert_success();

    let report = output.json();
    assert_eq!(report["conflicts"][0]["selected"], "org:b:1.0 (default)");
    assert_eq!(report["conflicts"][0]["resolver"], "user-rules");
    assert_eq!(report["evicted"][0]["component"], "org:a:1.0");

    let winner = report["selected"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["component"] == "org:b:1.0")
        .unwrap();
    assert!(
        winner["reasons"]
            .as_array()
            .unwrap()
            .iter()
            .any(|r| r["description"] == "org:b is the supported implementation")
    );
}

#[test]
fn test_explicit_config_flag_overrides_env() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();
    project.write_config(r#"strategies = ["reject-remaining"]"#).unwrap();
    let rules = project
        .write_scenario("rules.toml", r#"strategies = ["highest-version"]"#)
        .unwrap();

    project
        .run_capres(&["--config", rules.to_str().unwrap(), "resolve", "graph.toml"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("[highest-version]");
}

#[test]
fn test_unknown_strategy_is_reported() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();
    project.write_config(r#"strategies = ["coin-flip"]"#).unwrap();

    project
        .run_capres(&["resolve", "graph.toml"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("Unknown resolution strategy: coin-flip")
        .assert_stderr_contains("Valid strategies are");
}

#[test]
fn test_rule_for_absent_module_falls_through() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();
    project
        .write_config(
            r#"
strategies = ["user-rules", "highest-version"]

[rules."org:cap"]
select = "org:elsewhere"
"#,
        )
        .unwrap();

    let report = project
        .run_capres(&["resolve", "graph.toml", "--format", "json"])
        .unwrap()
        .assert_success()
        .json();
    assert_eq!(report["conflicts"][0]["resolver"], "highest-version");
}
