//! Error types for mogpool.
//!
//! Absence is never an error in this crate: lookups return `Ok(None)` and
//! the caller decides whether to recompute. The only internal failure mode
//! of these in-memory structures is a poisoned lock.

use thiserror::Error;

/// Errors that can occur during pool and cache operations.
#[derive(Debug, Error)]
pub enum PoolError {
    /// Backing-store failure (poisoned lock).
    #[error("Pool backend error: {0}")]
    Backend(String),
}

impl PoolError {
    pub(crate) fn poisoned(context: &'static str) -> Self {
        Self::Backend(format!("poisoned lock: {context}"))
    }
}

/// Result type alias for pool operations.
pub type PoolResult<T> = Result<T, PoolError>;
