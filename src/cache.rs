//! Dependency-validated context caching.
//!
//! The cache keeps, per logical step name, the computed execution context
//! and the set of dependency names it was computed from. A validated fetch
//! returns the context only when the recorded dependencies still cover the
//! request and the context reports itself valid. The cache never
//! invalidates entries proactively; entries are only ever superseded by a
//! later `record`/`store` or removed explicitly by the owning engine.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::{PoolError, PoolResult};

/// Implemented by cached artifacts that can self-report validity.
///
/// The cache treats the artifact as a black box apart from this query;
/// a `false` answer gates the artifact out of every validated fetch, even
/// when the dependency check passes.
pub trait Validity {
    /// Whether the artifact may still be reused without recomputation.
    fn is_valid(&self) -> bool;
}

/// Which freshness check [`DependencyValidatedCache::fetch_if_fresh`] applies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessPolicy {
    /// Every requested dependency must be present in the recorded set;
    /// extra recorded names do not fail the check. This reproduces the
    /// long-standing directional behavior of the engines this crate was
    /// extracted from: an entry recorded against a broader dependency set
    /// validates a narrower request.
    #[default]
    Subset,
    /// Requested and recorded sets must be equal.
    Exact,
}

/// Outcome of a validated cache lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheDecision<C> {
    /// The dependency check passed and the artifact reports itself valid.
    Fresh(C),
    /// An entry exists under the name but failed the dependency check or
    /// its own validity query.
    Stale,
    /// No dependency set is recorded under the name.
    Absent,
}

impl<C> CacheDecision<C> {
    /// Collapses the decision into the artifact, dropping the
    /// stale/absent distinction.
    #[must_use]
    pub fn into_fresh(self) -> Option<C> {
        match self {
            Self::Fresh(artifact) => Some(artifact),
            Self::Stale | Self::Absent => None,
        }
    }

    /// Returns true for [`CacheDecision::Fresh`].
    #[must_use]
    pub const fn is_fresh(&self) -> bool {
        matches!(self, Self::Fresh(_))
    }
}

#[derive(Debug)]
struct CacheState<C> {
    deps: HashMap<String, HashSet<String>>,
    artifacts: HashMap<String, C>,
}

impl<C> Default for CacheState<C> {
    fn default() -> Self {
        Self {
            deps: HashMap::new(),
            artifacts: HashMap::new(),
        }
    }
}

/// Thread-safe cache of computed contexts keyed by logical step name.
///
/// Two co-scoped maps live under one lock: name → recorded dependency set
/// and name → artifact. `record` and `store` are independent; callers
/// establish a usable entry by calling both, in either order, or use
/// [`insert`] to publish both under a single write lock so no reader ever
/// observes a dependency set with no matching artifact generation.
///
/// There is no in-flight-computation lock: after a miss, two threads may
/// race to recompute the same name, and the last writer wins.
///
/// [`insert`]: DependencyValidatedCache::insert
#[derive(Debug)]
pub struct DependencyValidatedCache<C> {
    state: RwLock<CacheState<C>>,
    policy: FreshnessPolicy,
}

impl<C> DependencyValidatedCache<C> {
    /// Creates an empty cache with the default [`FreshnessPolicy::Subset`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(FreshnessPolicy::default())
    }

    /// Creates an empty cache with an explicit freshness policy.
    #[must_use]
    pub fn with_policy(policy: FreshnessPolicy) -> Self {
        Self {
            state: RwLock::new(CacheState::default()),
            policy,
        }
    }

    /// Returns the freshness policy this cache applies.
    #[must_use]
    pub const fn policy(&self) -> FreshnessPolicy {
        self.policy
    }
}

impl<C: Validity + Clone> DependencyValidatedCache<C> {
    /// Records the dependency set `name`'s artifact was computed from.
    ///
    /// Duplicates collapse and ordering is irrelevant. Replaces any prior
    /// set for `name`.
    pub fn record<I, S>(&self, name: impl Into<String>, deps: I) -> PoolResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: HashSet<String> = deps.into_iter().map(Into::into).collect();
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("cache.record"))?;
        state.deps.insert(name.into(), set);
        Ok(())
    }

    /// Stores the artifact under `name`, replacing any prior artifact.
    ///
    /// Independent of [`record`]; the two may be called in either order.
    ///
    /// [`record`]: DependencyValidatedCache::record
    pub fn store(&self, name: impl Into<String>, artifact: C) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("cache.store"))?;
        state.artifacts.insert(name.into(), artifact);
        Ok(())
    }

    /// Records the dependency set and stores the artifact under one write
    /// lock, so both halves of the entry belong to the same generation.
    pub fn insert<I, S>(&self, name: impl Into<String>, deps: I, artifact: C) -> PoolResult<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let set: HashSet<String> = deps.into_iter().map(Into::into).collect();
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("cache.insert"))?;
        state.deps.insert(name.clone(), set);
        state.artifacts.insert(name, artifact);
        Ok(())
    }

    /// Unconditional fetch, ignoring dependency validation entirely.
    ///
    /// Used when the caller already knows the dependencies match.
    pub fn fetch(&self, name: &str) -> PoolResult<Option<C>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("cache.fetch"))?;
        Ok(state.artifacts.get(name).cloned())
    }

    /// Validated fetch: the artifact under `name`, but only while fresh.
    ///
    /// Stale and absent entries are both reported as `None`; callers that
    /// need the distinction use [`probe`].
    ///
    /// [`probe`]: DependencyValidatedCache::probe
    pub fn fetch_if_fresh<I, S>(&self, name: &str, deps: I) -> PoolResult<Option<C>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(self.probe(name, deps)?.into_fresh())
    }

    /// Validated lookup with a three-way outcome.
    ///
    /// A request with zero dependency names against a recorded empty set is
    /// vacuously covered; the decision then rests entirely on the
    /// artifact's own validity.
    pub fn probe<I, S>(&self, name: &str, deps: I) -> PoolResult<CacheDecision<C>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let requested: HashSet<String> = deps.into_iter().map(Into::into).collect();
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("cache.probe"))?;

        let Some(recorded) = state.deps.get(name) else {
            trace!(name, "no dependency set recorded");
            return Ok(CacheDecision::Absent);
        };

        let covered = match self.policy {
            FreshnessPolicy::Subset => requested.iter().all(|dep| recorded.contains(dep)),
            FreshnessPolicy::Exact => requested == *recorded,
        };
        if !covered {
            trace!(name, "dependency set mismatch");
            return Ok(CacheDecision::Stale);
        }

        match state.artifacts.get(name) {
            None => {
                trace!(name, "dependency set recorded but no artifact stored");
                Ok(CacheDecision::Absent)
            }
            Some(artifact) if artifact.is_valid() => {
                trace!(name, "cache hit");
                Ok(CacheDecision::Fresh(artifact.clone()))
            }
            Some(_) => {
                trace!(name, "artifact reports itself invalid");
                Ok(CacheDecision::Stale)
            }
        }
    }

    /// Atomically returns the recorded dependency set and the artifact
    /// under `name`, when both are present.
    pub fn entry(&self, name: &str) -> PoolResult<Option<(HashSet<String>, C)>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("cache.entry"))?;
        match (state.deps.get(name), state.artifacts.get(name)) {
            (Some(deps), Some(artifact)) => Ok(Some((deps.clone(), artifact.clone()))),
            _ => Ok(None),
        }
    }

    /// Returns the dependency set recorded for `name`, if any.
    pub fn recorded_deps(&self, name: &str) -> PoolResult<Option<HashSet<String>>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("cache.recorded_deps"))?;
        Ok(state.deps.get(name).cloned())
    }

    /// Removes the entry under `name` (dependency set and artifact),
    /// returning the removed artifact.
    ///
    /// The cache itself never evicts; this is the hook for the owning
    /// engine to drop entries of completed steps.
    pub fn remove(&self, name: &str) -> PoolResult<Option<C>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("cache.remove"))?;
        state.deps.remove(name);
        Ok(state.artifacts.remove(name))
    }

    /// Removes every entry.
    pub fn clear(&self) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("cache.clear"))?;
        state.deps.clear();
        state.artifacts.clear();
        Ok(())
    }

    /// Returns the number of names with a stored artifact.
    pub fn len(&self) -> PoolResult<usize> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("cache.len"))?;
        Ok(state.artifacts.len())
    }

    /// Returns true if no artifact is stored.
    pub fn is_empty(&self) -> PoolResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Snapshot of the names with a stored artifact, in no particular order.
    pub fn names(&self) -> PoolResult<Vec<String>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("cache.names"))?;
        Ok(state.artifacts.keys().cloned().collect())
    }
}

impl<C> Default for DependencyValidatedCache<C> {
    fn default() -> Self {
        Self::new()
    }
}
