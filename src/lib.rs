//! # mogpool — fidelity-scoped pools and dependency-validated caching
//!
//! mogpool is the cache registry behind a workflow engine: a set of keyed
//! pools that associate a mogram (a unit of executable work, identified by
//! an opaque [`MogramId`]) with its fidelity selections, service
//! signatures, and entries, plus a dependency-validated cache that decides
//! whether a previously computed execution context may be reused.
//!
//! ## Core Concepts
//!
//! - **Mogram**: a unit of executable work owned by an external engine
//! - **Fidelity**: a named variant/implementation choice for a step
//! - **Context**: an opaque computed artifact that self-reports validity
//! - **Dependency set**: the named inputs a cached artifact was computed against
//!
//! ## Usage
//!
//! ```rust
//! use mogpool::{DependencyValidatedCache, Validity};
//!
//! #[derive(Clone)]
//! struct Context {
//!     expired: bool,
//! }
//!
//! impl Validity for Context {
//!     fn is_valid(&self) -> bool {
//!         !self.expired
//!     }
//! }
//!
//! let cache = DependencyValidatedCache::new();
//! cache.insert("step1", ["build"], Context { expired: false })?;
//!
//! // Reuse the context while its dependencies still cover the request.
//! assert!(cache.fetch_if_fresh("step1", ["build"])?.is_some());
//! # Ok::<(), mogpool::PoolError>(())
//! ```
//!
//! The crate owns no wire protocol and performs no I/O; every operation is
//! a synchronous in-memory lookup or update, and all failure other than a
//! poisoned lock is expressed as absence in the return value.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod cache;
pub mod error;
pub mod identity;
pub mod pool;
pub mod registry;
pub mod table;

// Re-export primary types at crate root for convenience
pub use cache::{CacheDecision, DependencyValidatedCache, FreshnessPolicy, Validity};
pub use error::{PoolError, PoolResult};
pub use identity::{Fidelity, Identified, MogramId};
pub use pool::FidelityPool;
pub use registry::{EntryTable, FidelityTable, Registry, SignatureTable};
pub use table::{KeyedTable, SelectionMode};
