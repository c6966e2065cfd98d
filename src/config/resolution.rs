//! Resolution configuration: strategy order and per-capability rules.
//!
//! # File Location
//!
//! - `$CAPRES_CONFIG_PATH` if set
//! - **Unix/macOS**: `~/.capres/config.toml`
//! - **Windows**: `%LOCALAPPDATA%\capres\config.toml`
//!
//! A missing file means the default configuration.
//!
//! # File Format
//!
//! ```toml
//! strategies = ["user-rules", "highest-version", "last-candidate", "reject-remaining"]
//!
//! [rules."org.slf4j:slf4j-impl"]
//! select = "ch.qos.logback:logback-classic"
//! because = "logback is our standard binding"
//!
//! [rules."com.acme:logging"]
//! select-highest-version = true
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::capability::{CapabilityId, ModuleId};
use crate::core::CapresError;
use crate::resolver::{
    CapabilityResolver, CapabilityRule, HighestVersionResolver, LastCandidateResolver,
    RejectRemainingResolver, ResolverChain, UserRulesResolver,
};

/// Environment variable overriding the config file location.
pub const CONFIG_PATH_ENV: &str = "CAPRES_CONFIG_PATH";

/// Strategy names accepted in `strategies`, in their default order.
pub const DEFAULT_STRATEGIES: &[&str] = &["user-rules", "last-candidate", "reject-remaining"];

fn default_strategies() -> Vec<String> {
    DEFAULT_STRATEGIES.iter().map(|s| (*s).to_string()).collect()
}

/// How to resolve capability conflicts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ResolutionConfig {
    /// Resolver names, tried in order.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<String>,

    /// Rules keyed by capability notation (`group:name`).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleConfig>,
}

impl Default for ResolutionConfig {
    fn default() -> Self {
        Self {
            strategies: default_strategies(),
            rules: BTreeMap::new(),
        }
    }
}

/// One `[rules."group:name"]` table. Exactly one of `select` and
/// `select-highest-version` must be given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RuleConfig {
    /// Module (`group:name`) to prefer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub select_highest_version: bool,

    /// Recorded as the selection reason.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub because: Option<String>,
}

impl RuleConfig {
    fn to_rule(&self, capability: &str) -> Result<CapabilityRule, CapresError> {
        match (&self.select, self.select_highest_version) {
            (Some(module), false) => Ok(CapabilityRule::Select {
                module: module.parse::<ModuleId>()?,
                because: self.because.clone(),
            }),
            (None, true) => Ok(CapabilityRule::SelectHighestVersion {
                because: self.because.clone(),
            }),
            (Some(_), true) => Err(CapresError::ConfigError {
                message: format!(
                    "rule for '{capability}' sets both 'select' and 'select-highest-version'"
                ),
            }),
            (None, false) => Err(CapresError::ConfigError {
                message: format!(
                    "rule for '{capability}' needs either 'select' or 'select-highest-version'"
                ),
            }),
        }
    }
}

impl ResolutionConfig {
    /// Load from `$CAPRES_CONFIG_PATH` or the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        Self::load_with_optional(None)
    }

    /// Load from `path` when given, otherwise as [`load`](Self::load) does.
    /// A missing file yields the default configuration.
    pub fn load_with_optional(path: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => Self::default_path()?,
        };
        if path.exists() {
            Self::load_from(&path)
        } else {
            tracing::debug!("No resolution config at {}; using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Load from a specific file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a valid config.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read resolution config from {}", path.display()))?;

        Self::from_toml(&content)
            .with_context(|| format!("Failed to parse resolution config from {}", path.display()))
    }

    /// Parse and validate a config document.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(CapresError::from)?;
        config.build_chain()?;
        Ok(config)
    }

    /// `$CAPRES_CONFIG_PATH`, or the platform config location.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        let config_dir = if cfg!(target_os = "windows") {
            dirs::data_local_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine local data directory"))?
                .join("capres")
        } else {
            dirs::home_dir()
                .ok_or_else(|| anyhow::anyhow!("Unable to determine home directory"))?
                .join(".capres")
        };

        Ok(config_dir.join("config.toml"))
    }

    /// Parsed rules keyed by capability.
    ///
    /// # Errors
    ///
    /// Fails on a malformed capability or module notation, or an ambiguous rule.
    pub fn rules(&self) -> Result<HashMap<CapabilityId, CapabilityRule>, CapresError> {
        let mut rules = HashMap::with_capacity(self.rules.len());
        for (capability, rule) in &self.rules {
            rules.insert(capability.parse::<CapabilityId>()?, rule.to_rule(capability)?);
        }
        Ok(rules)
    }

    /// Build the resolver chain named by `strategies`.
    ///
    /// # Errors
    ///
    /// Returns [`CapresError::UnknownStrategy`] for an unrecognised name, or any
    /// error from [`rules`](Self::rules).
    pub fn build_chain(&self) -> Result<ResolverChain, CapresError> {
        let mut resolvers: Vec<Box<dyn CapabilityResolver>> = Vec::with_capacity(self.strategies.len());
        for name in &self.strategies {
            let resolver: Box<dyn CapabilityResolver> = match name.as_str() {
                "user-rules" => Box::new(UserRulesResolver::new(self.rules()?)),
                "highest-version" => Box::new(HighestVersionResolver),
                "last-candidate" => Box::new(LastCandidateResolver),
                "reject-remaining" => Box::new(RejectRemainingResolver),
                other => {
                    return Err(CapresError::UnknownStrategy {
                        name: other.to_string(),
                    });
                }
            };
            resolvers.push(resolver);
        }
        Ok(ResolverChain::new(resolvers))
    }
}
