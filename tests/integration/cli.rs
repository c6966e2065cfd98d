use assert_cmd::Command;
use predicates::prelude::*;

use crate::common::{TWO_PROVIDERS, TestProject};

const HIGHEST_VERSION: &str = r#"strategies = ["highest-version", "reject-remaining"]"#;

/// Without rules the default chain cannot pick between two providers.
#[test]
fn test_resolve_unresolved_conflict_fails() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();

    let output = project.run_capres(&["resolve", "graph.toml"]).unwrap();
    output
        .assert_failure()
        .assert_stdout_contains("org:cap unresolved between org:a, org:b")
        .assert_stdout_contains("Rejected:")
        .assert_stderr_contains("Cannot select a module for capability 'org:cap': provided by org:a, org:b")
        .assert_stderr_contains("suggestion");
    assert_eq!(output.code, Some(1));
}

#[test]
fn test_resolve_highest_version_text() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();
    project.write_config(HIGHEST_VERSION).unwrap();

    project
        .run_capres(&["resolve", "graph.toml"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("Root: com.acme:app:1.0")
        .assert_stdout_contains("org:cap -> org:a:1.0 (default) [highest-version]")
        .assert_stdout_contains("Evicted:")
        .assert_stdout_contains("org:b:1.0 (default)");
}

#[test]
fn test_resolve_json_report() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();
    project.write_config(HIGHEST_VERSION).unwrap();

    let output = project.run_capres(&["resolve", "graph.toml", "--format", "json"]).unwrap();
    output.assert_success();

    let report = output.json();
    assert_eq!(report["root"], "com.acme:app:1.0");
    assert_eq!(report["conflicts"][0]["capability"], "org:cap");
    assert_eq!(report["conflicts"][0]["status"], "resolved");
    assert_eq!(report["conflicts"][0]["selected"], "org:a:1.0 (default)");
    assert_eq!(report["evicted"][0]["component"], "org:b:1.0");
    assert!(report["rejected"].as_array().unwrap().is_empty());

    let winner = report["selected"]
        .as_array()
        .unwrap()
        .iter()
        .find(|node| node["component"] == "org:a:1.0")
        .unwrap();
    let reasons = winner["reasons"].as_array().unwrap();
    let resolution = reasons.iter().find(|r| r["cause"] == "conflict-resolution").unwrap();
    assert!(resolution["description"].as_str().unwrap().contains("org:b"));
}

#[test]
fn test_check_lists_conflicts() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();

    project
        .run_capres(&["check", "graph.toml"])
        .unwrap()
        .assert_success()
        .assert_stdout_contains("1 capability conflict(s)")
        .assert_stdout_contains("org:cap provided by org:a, org:b");

    let output = project.run_capres(&["check", "graph.toml", "--format", "json"]).unwrap();
    output.assert_success();
    let json = output.json();
    assert_eq!(json["conflicts"][0]["capability"], "org:cap");
    assert_eq!(json["conflicts"][0]["modules"][1], "org:b");
}

#[test]
fn test_check_without_conflicts() {
    let project = TestProject::new().unwrap();
    project
        .write_scenario(
            "graph.toml",
            r#"
root = "com.acme:app:1.0"

[[components]]
id = "com.acme:app:1.0"
dependencies = ["org:a:1.0"]

[[components]]
id = "org:a:1.0"
capabilities = ["org:cap:1.0"]
"#,
        )
        .unwrap();

    Command::cargo_bin("capres")
        .unwrap()
        .args(["check", "graph.toml"])
        .current_dir(project.project_path())
        .env("CAPRES_CONFIG_PATH", project.config_path())
        .env("NO_COLOR", "1")
        .assert()
        .success()
        .stdout(predicate::str::contains("No capability conflicts"));
}

#[test]
fn test_missing_scenario_file() {
    let project = TestProject::new().unwrap();

    Command::cargo_bin("capres")
        .unwrap()
        .args(["resolve", "missing.toml"])
        .current_dir(project.project_path())
        .env("CAPRES_CONFIG_PATH", project.config_path())
        .env("NO_COLOR", "1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read scenario"))
        .stderr(predicate::str::contains("Check that the file exists"));
}

#[test]
fn test_invalid_scenario_reports_problem() {
    let project = TestProject::new().unwrap();
    project
        .write_scenario(
            "graph.toml",
            r#"
root = "com.acme:app:1.0"

[[components]]
id = "com.acme:app:1.0"
dependencies = ["org:ghost:1.0"]
"#,
        )
        .unwrap();

    project
        .run_capres(&["check", "graph.toml"])
        .unwrap()
        .assert_failure()
        .assert_stderr_contains("depends on undeclared component org:ghost:1.0");
}

#[test]
fn test_verbose_and_quiet_are_exclusive() {
    let project = TestProject::new().unwrap();
    project.write_scenario("graph.toml", TWO_PROVIDERS).unwrap();

    let output = project.run_capres(&["-v", "-q", "check", "graph.toml"]).unwrap();
    output.assert_failure();
    assert_eq!(output.code, Some(2));
}
