//! Integration test suite for capres
//!
//! End-to-end tests of the library's resolution pipeline and of the `capres`
//! binary.
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: `resolve` and `check` commands, output formats, exit codes
//! - **config**: Resolution config discovery and strategy selection
//! - **resolution**: Library-level scenarios driven through `GraphBuilder`

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli;
mod config;
mod resolution;
