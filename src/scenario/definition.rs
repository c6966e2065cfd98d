//! TOML graph descriptions.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

use crate::capability::{CapabilityDescriptor, ModuleVersionId};
use crate::core::CapresError;

/// Variant name used when a component does not name one.
pub const DEFAULT_VARIANT: &str = "default";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ScenarioFile {
    root: String,
    #[serde(default)]
    components: Vec<ComponentFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
struct ComponentFile {
    id: String,
    #[serde(default)]
    variant: Option<String>,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    capabilities: Vec<String>,
}

/// One module version in a scenario, with a single variant node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentSpec {
    pub id: ModuleVersionId,
    pub variant: String,
    /// Ids of other components in the same scenario.
    pub dependencies: Vec<ModuleVersionId>,
    pub capabilities: Vec<CapabilityDescriptor>,
}

/// A validated dependency graph description.
///
/// ```toml
/// root = "com.acme:app:1.0"
///
/// [[components]]
/// id = "com.acme:app:1.0"
/// dependencies = ["org:a:1.0", "org:b:1.0"]
///
/// [[components]]
/// id = "org:a:1.0"
/// capabilities = ["com.acme:cap:2.0"]
///
/// [[components]]
/// id = "org:b:1.0"
/// variant = "runtime"
/// capabilities = ["com.acme:cap:1.0"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub root: ModuleVersionId,
    pub components: Vec<ComponentSpec>,
}

impl Scenario {
    /// Read and validate a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario from {}", path.display()))?;
        Self::from_toml(&content)
            .with_context(|| format!("Invalid scenario in {}", path.display()))
    }

    /// Parse and validate a scenario document.
    ///
    /// # Errors
    ///
    /// - [`CapresError::TomlError`] for malformed TOML
    /// - [`CapresError::InvalidCapabilityNotation`] for a malformed id or capability
    /// - [`CapresError::ScenarioError`] for a duplicate component, a dependency on an
    ///   undeclared component, or an undeclared root
    pub fn from_toml(content: &str) -> Result<Self, CapresError> {
        let file: ScenarioFile = toml::from_str(content)?;

        let root: ModuleVersionId = file.root.parse()?;
        let mut components = Vec::with_capacity(file.components.len());
        for component in file.components {
            components.push(ComponentSpec {
                id: component.id.parse()?,
                variant: component.variant.unwrap_or_else(|| DEFAULT_VARIANT.to_string()),
                dependencies: component
                    .dependencies
                    .iter()
                    .map(|d| d.parse::<ModuleVersionId>())
                    .collect::<Result<Vec<_>, _>>()?,
                capabilities: component
                    .capabilities
                    .iter()
                    .map(|c| c.parse::<CapabilityDescriptor>())
                    .collect::<Result<Vec<_>, _>>()?,
            });
        }

        let scenario = Self {
            root,
            components,
        };
        scenario.validate()?;
        Ok(scenario)
    }

    fn validate(&self) -> Result<(), CapresError> {
        let mut declared = HashSet::new();
        for component in &self.components {
            if !declared.insert(&component.id) {
                return Err(CapresError::ScenarioError {
                    message: format!("component {} is declared more than once", component.id),
                });
            }
        }

        if !declared.contains(&self.root) {
            return Err(CapresError::ScenarioError {
                message: format!("root {} is not declared as a component", self.root),
            });
        }

        for component in &self.components {
            if let Some(missing) = component.dependencies.iter().find(|d| !declared.contains(d)) {
                return Err(CapresError::ScenarioError {
                    message: format!("{} depends on undeclared component {missing}", component.id),
                });
            }
        }
        Ok(())
    }

    pub fn component(&self, id: &ModuleVersionId) -> Option<&ComponentSpec> {
        self.components.iter().find(|c| &c.id == id)
    }
}
