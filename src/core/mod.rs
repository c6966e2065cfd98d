//! Core types shared across capres
//!
//! This module holds the error taxonomy used by every other module:
//! - **Strongly-typed errors** ([`CapresError`]) returned by the resolution engine
//! - **User-friendly contexts** ([`ErrorContext`]) with suggestions for CLI users
//! - [`user_friendly_error`] to turn any [`anyhow::Error`] into something printable
//!
//! Library operations return [`Result`], application layers (config loading, the
//! scenario driver, the CLI) use [`anyhow::Result`] and attach context as errors
//! bubble up.

pub mod error;

pub use error::{CapresError, ErrorContext, user_friendly_error};

/// Result alias for operations that fail with a [`CapresError`].
pub type Result<T> = std::result::Result<T, CapresError>;
