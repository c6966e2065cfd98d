//! Thread-safe access to a [`ConflictRegistry`] for parallel graph walkers.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::graph::GraphArena;

use super::candidate::{Candidate, ConflictOutcome};
use super::registry::ConflictRegistry;

/// A [`ConflictRegistry`] behind one coarse lock.
///
/// Several workers may register candidates concurrently against a shared,
/// read-only arena. Resolution stays sequential: take the lock (or unwrap the
/// registry with [`into_inner`](Self::into_inner)) on the builder thread.
#[derive(Debug, Clone)]
pub struct SharedConflictRegistry {
    inner: Arc<Mutex<ConflictRegistry>>,
}

impl SharedConflictRegistry {
    pub fn new(registry: ConflictRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// Lock the registry. A worker that panicked mid-registration leaves the
    /// maps consistent, so poisoning is ignored.
    pub fn lock(&self) -> MutexGuard<'_, ConflictRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn register_candidate(&self, arena: &GraphArena, candidate: &Candidate) -> ConflictOutcome {
        self.lock().register_candidate(arena, candidate)
    }

    pub fn has_conflicts(&self) -> bool {
        self.lock().has_conflicts()
    }

    /// Take the registry back once every other handle has been dropped.
    pub fn into_inner(self) -> Option<ConflictRegistry> {
        Arc::try_unwrap(self.inner).ok().map(|m| m.into_inner().unwrap_or_else(PoisonError::into_inner))
    }
}
