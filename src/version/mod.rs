//! Version handling for capability claims.
//!
//! See [`comparison::VersionComparator`] for the ordering used when a resolver
//! prefers the highest declared capability version.

pub mod comparison;

pub use comparison::VersionComparator;
