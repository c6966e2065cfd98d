//! The resolver chain: pluggable strategies tried in a fixed order.

use std::fmt;

use super::details::ResolutionDetails;
use super::strategies::{LastCandidateResolver, RejectRemainingResolver};

/// A capability conflict resolution strategy.
///
/// A resolver inspects the session and either commits a selection (by calling
/// [`ResolutionDetails::select`]) or leaves it untouched to decline. It may
/// evict or reject candidates either way.
pub trait CapabilityResolver: Send + Sync + fmt::Debug {
    /// Short name used in configuration and diagnostics.
    fn name(&self) -> &str;

    fn resolve(&self, details: &mut ResolutionDetails<'_>);
}

/// Ordered list of resolvers; the first one to commit a selection wins.
#[derive(Debug)]
pub struct ResolverChain {
    resolvers: Vec<Box<dyn CapabilityResolver>>,
}

impl ResolverChain {
    pub fn new(resolvers: Vec<Box<dyn CapabilityResolver>>) -> Self {
        Self {
            resolvers,
        }
    }

    /// A chain with no resolvers; every conflict stays unresolved.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    #[must_use]
    pub fn with(mut self, resolver: impl CapabilityResolver + 'static) -> Self {
        self.resolvers.push(Box::new(resolver));
        self
    }

    pub fn len(&self) -> usize {
        self.resolvers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        self.resolvers.iter().map(|r| r.name()).collect()
    }

    /// Offer the session to each resolver in order.
    ///
    /// Returns the name of the resolver that committed, or `None` if all declined.
    pub fn resolve(&self, details: &mut ResolutionDetails<'_>) -> Option<&str> {
        for resolver in &self.resolvers {
            resolver.resolve(details);
            if details.has_result() {
                return Some(resolver.name());
            }
            tracing::trace!("Resolver '{}' declined {}", resolver.name(), details.capability());
        }
        None
    }
}

impl Default for ResolverChain {
    /// Pick a sole remaining candidate, otherwise reject everyone.
    fn default() -> Self {
        Self::empty().with(LastCandidateResolver).with(RejectRemainingResolver)
    }
}
