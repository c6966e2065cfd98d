//! Shared helpers for the integration suite.

#![allow(dead_code)]

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Two unrelated modules claiming `org:cap`, `org:a` at 2.0 and `org:b` at 1.0.
pub const TWO_PROVIDERS: &str = r#"
root = "com.acme:app:1.0"

[[components]]
id = "com.acme:app:1.0"
dependencies = ["org:a:1.0", "org:b:1.0"]

[[components]]
id = "org:a:1.0"
capabilities = ["org:cap:2.0"]

[[components]]
id = "org:b:1.0"
capabilities = ["org:cap:1.0"]
"#;

/// An isolated directory holding scenario and config files.
///
/// The resolution config path always points inside the temp directory so a
/// config in the user's home never leaks into a test.
pub struct TestProject {
    _temp_dir: TempDir, // Keep alive for RAII cleanup
    project_dir: PathBuf,
    config_path: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let project_dir = temp_dir.path().join("project");
        let config_path = temp_dir.path().join(".capres").join("config.toml");
        fs::create_dir_all(&project_dir)?;

        Ok(Self {
            _temp_dir: temp_dir,
            project_dir,
            config_path,
        })
    }

    pub fn project_path(&self) -> &Path {
        &self.project_dir
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Write a scenario file and return its path.
    pub fn write_scenario(&self, name: &str, content: &str) -> Result<PathBuf> {
        let path = self.project_dir.join(name);
        fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    /// Write the resolution config picked up through `CAPRES_CONFIG_PATH`.
    pub fn write_config(&self, content: &str) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.config_path, content)?;
        Ok(())
    }

    /// Run capres in the project directory
    pub fn run_capres(&self, args: &[&str]) -> Result<CommandOutput> {
        let capres_binary = env!("CARGO_BIN_EXE_capres");
        let output = Command::new(capres_binary)
            .args(args)
            .current_dir(&self.project_dir)
            .env("CAPRES_CONFIG_PATH", &self.config_path)
            .env("NO_COLOR", "1")
            .env_remove("RUST_LOG")
            .output()
            .context("Failed to run capres command")?;

        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        })
    }
}

/// Command output helper
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
    pub code: Option<i32>,
}

impl CommandOutput {
    pub fn assert_success(&self) -> &Self {
        assert!(
            self.success,
            "Command failed with code {:?}\nStderr: {}",
            self.code, self.stderr
        );
        self
    }

    pub fn assert_failure(&self) -> &Self {
        assert!(!self.success, "Command unexpectedly succeeded\nStdout: {}", self.stdout);
        self
    }

    pub fn assert_stdout_contains(&self, text: &str) -> &Self {
        assert!(
            self.stdout.contains(text),
            "Expected stdout to contain '{}'\nActual stdout: {}",
            text,
            self.stdout
        );
        self
    }

    pub fn assert_stderr_contains(&self, text: &str) -> &Self {
        assert!(
            self.stderr.contains(text),
            "Expected stderr to contain '{}'\nActual stderr: {}",
            text,
            self.stderr
        );
        self
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.stdout)
            .unwrap_or_else(|e| panic!("stdout is not JSON ({e}):\n{}", self.stdout))
    }
}
