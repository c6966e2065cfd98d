//! Error handling for capres
//!
//! This module provides the error taxonomy and user-friendly error reporting for
//! capability conflict resolution. Like the rest of the crate, the error system is
//! designed around two principles:
//! 1. **Strongly-typed errors** for precise handling inside the resolution engine
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Error Categories
//!
//! - **Precondition violations**: [`CapresError::NoPendingConflict`],
//!   [`CapresError::NoSelection`]. These signal a logic error in the caller (the
//!   graph builder), not a problem with user input.
//! - **Resolution failures**: [`CapresError::UnresolvedCapabilityConflict`] and
//!   [`CapresError::RejectedComponents`], raised when no resolver in the chain
//!   commits a selection.
//! - **Configuration**: [`CapresError::ConfigError`], [`CapresError::UnknownStrategy`],
//!   [`CapresError::InvalidCapabilityNotation`], [`CapresError::ScenarioError`].
//! - **Conversions**: [`std::io::Error`] and [`toml::de::Error`] convert
//!   automatically.
//!
//! # Examples
//!
//! ```rust,no_run
//! use capres::core::{CapresError, ErrorContext, user_friendly_error};
//!
//! let error = CapresError::UnresolvedCapabilityConflict {
//!     capability: "org.slf4j:slf4j-impl".to_string(),
//!     modules: vec!["org.slf4j:slf4j-simple".to_string(), "ch.qos.logback:logback-classic".to_string()],
//! };
//! let ctx = user_friendly_error(anyhow::Error::from(error));
//! ctx.display();
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for capres operations.
#[derive(Error, Debug)]
pub enum CapresError {
    /// `resolve_next_conflict` was called while the pending queue was empty.
    ///
    /// Callers must check `has_conflicts()` before resolving.
    #[error("No capability conflict is pending resolution")]
    NoPendingConflict,

    /// The selected component of a session was read before any candidate was selected.
    #[error("No candidate has been selected for capability '{capability}'")]
    NoSelection {
        /// Capability id of the session
        capability: String,
    },

    /// Every resolver in the chain declined to pick a provider.
    ///
    /// # Fields
    /// - `capability`: The capability id in conflict
    /// - `modules`: Modules that all provide the capability
    #[error("Cannot select a module for capability '{capability}': provided by {}", modules.join(", "))]
    UnresolvedCapabilityConflict {
        /// The capability id in conflict
        capability: String,
        /// Every participating module, in discovery order
        modules: Vec<String>,
    },

    /// One or more components were rejected because of a capability conflict.
    #[error("Components rejected because of capability conflicts: {}", components.join(", "))]
    RejectedComponents {
        /// Components that were rejected
        components: Vec<String>,
    },

    /// Resolution configuration is invalid.
    #[error("Invalid resolution configuration: {message}")]
    ConfigError {
        /// Description of the problem
        message: String,
    },

    /// The configured strategy list names a resolver that does not exist.
    #[error("Unknown resolution strategy: {name}")]
    UnknownStrategy {
        /// The unrecognized strategy name
        name: String,
    },

    /// A `group:name` (or `group:name:version`) notation could not be parsed.
    #[error("Invalid capability notation: '{notation}'")]
    InvalidCapabilityNotation {
        /// The notation as written
        notation: String,
    },

    /// A graph scenario file is malformed or inconsistent.
    #[error("Invalid graph scenario: {message}")]
    ScenarioError {
        /// Description of the problem
        message: String,
    },

    /// IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    /// Other error
    #[error("{message}")]
    Other {
        /// Generic error message
        message: String,
    },
}

impl Clone for CapresError {
    fn clone(&self) -> Self {
        match self {
            Self::NoPendingConflict => Self::NoPendingConflict,
            Self::NoSelection {
                capability,
            } => Self::NoSelection {
                capability: capability.clone(),
            },
            Self::UnresolvedCapabilityConflict {
                capability,
                modules,
            } => Self::UnresolvedCapabilityConflict {
                capability: capability.clone(),
                modules: modules.clone(),
            },
            Self::RejectedComponents {
                components,
            } => Self::RejectedComponents {
                components: components.clone(),
            },
            Self::ConfigError {
                message,
            } => Self::ConfigError {
                message: message.clone(),
            },
            Self::UnknownStrategy {
                name,
            } => Self::UnknownStrategy {
                name: name.clone(),
            },
            Self::InvalidCapabilityNotation {
                notation,
            } => Self::InvalidCapabilityNotation {
                notation: notation.clone(),
            },
            Self::ScenarioError {
                message,
            } => Self::ScenarioError {
                message: message.clone(),
            },
            // io::Error is not Clone
            Self::IoError(e) => Self::Other {
                message: format!("IO error: {e}"),
            },
            Self::TomlError(e) => Self::Other {
                message: format!("TOML parsing error: {e}"),
            },
            Self::Other {
                message,
            } => Self::Other {
                message: message.clone(),
            },
        }
    }
}

/// Error wrapper carrying a suggestion and extra details for CLI display.
#[derive(Debug)]
pub struct ErrorContext {
    /// The underlying capres error
    pub error: CapresError,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context with no suggestion or details.
    #[must_use]
    pub const fn new(error: CapresError) -> Self {
        Self {
            error,
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error.
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error.
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr: error in red, details in yellow, suggestion in green.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error into an [`ErrorContext`] with suggestions where we have them.
///
/// Known [`CapresError`] variants get tailored hints. IO and TOML errors are mapped
/// onto the closest variant. Anything else is reported with its full cause chain.
#[must_use]
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(CapresError::TomlError(toml_error)) = error.downcast_ref::<CapresError>() {
        return ErrorContext::new(CapresError::Other {
            message: format!("{error}: {toml_error}"),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    if let Some(capres_error) = error.downcast_ref::<CapresError>() {
        return create_error_context(capres_error.clone());
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>()
        && io_error.kind() == std::io::ErrorKind::NotFound
    {
        return ErrorContext::new(CapresError::Other {
            message: error.to_string(),
        })
        .with_suggestion("Check that the file exists and the path is correct");
    }

    if let Some(toml_error) = error.downcast_ref::<toml::de::Error>() {
        return ErrorContext::new(CapresError::ScenarioError {
            message: toml_error.to_string(),
        })
        .with_suggestion("Check the TOML syntax. Verify quotes, brackets, and table headers");
    }

    let mut message = error.to_string();
    let chain: Vec<String> = error.chain().skip(1).map(std::string::ToString::to_string).collect();

    if !chain.is_empty() {
        message.push_str("\n\nCaused by:");
        for (i, cause) in chain.iter().enumerate() {
            message.push_str(&format!("\n  {}: {}", i + 1, cause));
        }
    }

    ErrorContext::new(CapresError::Other {
        message,
    })
}

fn create_error_context(error: CapresError) -> ErrorContext {
    match &error {
        CapresError::UnresolvedCapabilityConflict {
            capability,
            ..
        } => ErrorContext::new(error.clone())
            .with_suggestion(format!(
                "Add a rule for '{capability}' under [rules] in the resolution config to pick a provider"
            ))
            .with_details(
                "Several modules declare the same capability and no resolution strategy could choose between them",
            ),
        CapresError::RejectedComponents {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Exclude one of the conflicting modules or add a capability rule")
            .with_details("Rejected components cannot contribute to the resolved graph"),
        CapresError::UnknownStrategy {
            ..
        } => ErrorContext::new(error).with_suggestion(
            "Valid strategies are: user-rules, highest-version, last-candidate, reject-remaining",
        ),
        CapresError::InvalidCapabilityNotation {
            ..
        } => ErrorContext::new(error)
            .with_suggestion("Capabilities are written as 'group:name' or 'group:name:version'"),
        CapresError::NoPendingConflict
        | CapresError::NoSelection {
            ..
        } => ErrorContext::new(error)
            .with_details("This is an internal error in the resolution engine"),
        _ => ErrorContext::new(error),
    }
}
