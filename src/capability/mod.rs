//! Capability and module identity value types.
//!
//! A capability is a `group:name` feature identifier that a node may claim to
//! provide, independently of its own module coordinates. The version is attached
//! to each claim ([`CapabilityDescriptor`]) rather than to the identifier
//! ([`CapabilityId`]), so two nodes claiming `org:cap:1.0` and `org:cap:2.0` are
//! competing for the same capability.
//!
//! Every module also implicitly provides the capability named after its own
//! coordinates; see [`ModuleVersionId::default_capability`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::CapresError;

/// Split a colon separated notation into exactly `min..=max` non-empty parts.
fn split_notation(notation: &str, min: usize, max: usize) -> Result<Vec<&str>, CapresError> {
    let parts: Vec<&str> = notation.trim().split(':').collect();
    if parts.len() < min || parts.len() > max || parts.iter().any(|p| p.trim().is_empty()) {
        return Err(CapresError::InvalidCapabilityNotation {
            notation: notation.to_string(),
        });
    }
    Ok(parts.into_iter().map(str::trim).collect())
}

/// Identity of a module, independent of version (`group:name`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleId {
    pub group: String,
    pub name: String,
}

impl ModuleId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

impl FromStr for ModuleId {
    type Err = CapresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_notation(s, 2, 2)?;
        Ok(Self::new(parts[0], parts[1]))
    }
}

/// Identity of one version of a module (`group:name:version`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModuleVersionId {
    pub module: ModuleId,
    pub version: String,
}

impl ModuleVersionId {
    pub fn new(
        group: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            module: ModuleId::new(group, name),
            version: version.into(),
        }
    }

    /// The capability every module provides by virtue of its coordinates.
    pub fn default_capability(&self) -> CapabilityDescriptor {
        CapabilityDescriptor::new(
            self.module.group.clone(),
            self.module.name.clone(),
            Some(self.version.clone()),
        )
    }
}

impl fmt::Display for ModuleVersionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.module, self.version)
    }
}

impl FromStr for ModuleVersionId {
    type Err = CapresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_notation(s, 3, 3)?;
        Ok(Self::new(parts[0], parts[1], parts[2]))
    }
}

/// Version-less capability identifier; the key conflicts are tracked under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CapabilityId {
    pub group: String,
    pub name: String,
}

impl CapabilityId {
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }

    /// Stable string form, `group:name`.
    pub fn id(&self) -> String {
        self.to_string()
    }

    /// Whether this capability is the coordinate-derived one of `module`.
    pub fn matches_module(&self, module: &ModuleId) -> bool {
        self.group == module.group && self.name == module.name
    }
}

impl fmt::Display for CapabilityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.group, self.name)
    }
}

impl FromStr for CapabilityId {
    type Err = CapresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_notation(s, 2, 2)?;
        Ok(Self::new(parts[0], parts[1]))
    }
}

/// One claim of a capability, with the version the claiming node declares.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapabilityDescriptor {
    pub group: String,
    pub name: String,
    pub version: Option<String>,
}

impl CapabilityDescriptor {
    pub fn new(group: impl Into<String>, name: impl Into<String>, version: Option<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
            version,
        }
    }

    pub fn capability_id(&self) -> CapabilityId {
        CapabilityId::new(self.group.clone(), self.name.clone())
    }

    pub fn is(&self, group: &str, name: &str) -> bool {
        self.group == group && self.name == name
    }
}

impl fmt::Display for CapabilityDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.version {
            Some(version) => write!(f, "{}:{}:{}", self.group, self.name, version),
            None => write!(f, "{}:{}", self.group, self.name),
        }
    }
}

impl FromStr for CapabilityDescriptor {
    type Err = CapresError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts = split_notation(s, 2, 3)?;
        Ok(Self::new(parts[0], parts[1], parts.get(2).map(|v| (*v).to_string())))
    }
}
