//! Selection reasons recorded on components.

use serde::Serialize;
use std::fmt;

/// Why a component ended up in (or was pushed out of) the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionCause {
    /// The component is the root of the graph.
    Root,
    /// Some other node depends on the component.
    Requested,
    /// The component won a capability conflict.
    ConflictResolution,
    /// The component lost a capability conflict and was rejected.
    Rejection,
}

impl fmt::Display for SelectionCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Root => "root",
            Self::Requested => "requested",
            Self::ConflictResolution => "conflict resolution",
            Self::Rejection => "rejection",
        };
        f.write_str(text)
    }
}

/// A [`SelectionCause`] with an optional human readable explanation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionReason {
    pub cause: SelectionCause,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SelectionReason {
    pub const fn new(cause: SelectionCause) -> Self {
        Self {
            cause,
            description: None,
        }
    }

    pub const fn conflict_resolution() -> Self {
        Self::new(SelectionCause::ConflictResolution)
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

impl fmt::Display for SelectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.description {
            Some(description) => write!(f, "{}: {}", self.cause, description),
            None => write!(f, "{}", self.cause),
        }
    }
}
