//! Configuration for capres.
//!
//! The only configuration is [`ResolutionConfig`]: which resolution strategies
//! run, in which order, and the per-capability rules the `user-rules` strategy
//! applies. It lives in a TOML file outside any project, see
//! [`ResolutionConfig::default_path`].

mod resolution;

pub use resolution::{CONFIG_PATH_ENV, DEFAULT_STRATEGIES, ResolutionConfig, RuleConfig};
