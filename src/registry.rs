//! Shared collection of per-mogram pools.
//!
//! The registry gives the workflow engine a single place to fetch "the
//! pools for this mogram": fidelity selections, service signatures,
//! entries, and derivative entries. It is pure storage — no validation
//! logic lives here; that is [`crate::DependencyValidatedCache`]'s job.
//!
//! The registry is an explicitly constructed value owned by the engine's
//! lifetime, not a process-global singleton, so tests stay hermetic and
//! two engines in one process cannot pollute each other.

use std::sync::RwLock;

use crate::error::{PoolError, PoolResult};
use crate::identity::{Fidelity, Identified, MogramId};
use crate::pool::FidelityPool;
use crate::table::KeyedTable;

/// Table of fidelity selections: step fidelity → chosen fidelity.
pub type FidelityTable = KeyedTable<Fidelity, Fidelity>;

/// Table of service signatures keyed by fidelity.
pub type SignatureTable<S> = KeyedTable<Fidelity, S>;

/// Table of entries keyed by entry name.
pub type EntryTable<E> = KeyedTable<String, E>;

#[derive(Debug)]
struct Pools<S, E> {
    fidelities: FidelityPool<Fidelity, Fidelity>,
    signatures: FidelityPool<Fidelity, S>,
    entries: FidelityPool<String, E>,
    derivatives: FidelityPool<String, E>,
}

impl<S, E> Default for Pools<S, E> {
    fn default() -> Self {
        Self {
            fidelities: FidelityPool::new(),
            signatures: FidelityPool::new(),
            entries: FidelityPool::new(),
            derivatives: FidelityPool::new(),
        }
    }
}

/// Registry of named pools indexed by mogram identity.
///
/// Generic over the opaque signature (`S`) and entry (`E`) artifact types
/// the engine pools; both are used only as map values and never
/// interpreted. All accessors return a clone of the stored table, and an
/// absent table is reported as `None`, distinct from an empty one.
///
/// The whole registry sits behind one `RwLock`, so a `put`/`get` pair on a
/// single mogram is linearizable and a reader never observes a partially
/// written table.
#[derive(Debug)]
pub struct Registry<S, E> {
    state: RwLock<Pools<S, E>>,
}

impl<S, E> Registry<S, E> {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(Pools::default()),
        }
    }
}

impl<S: Clone, E: Clone> Registry<S, E> {
    /// Returns the fidelity-selection table for `id`, if registered.
    pub fn fidelity_table(&self, id: MogramId) -> PoolResult<Option<FidelityTable>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("registry.fidelity_table"))?;
        Ok(state.fidelities.table(id).cloned())
    }

    /// Registers (or replaces) the fidelity-selection table for `id`.
    pub fn put_fidelity_table(&self, id: MogramId, table: FidelityTable) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.put_fidelity_table"))?;
        state.fidelities.insert_table(id, table);
        Ok(())
    }

    /// Removes and returns the fidelity-selection table for `id`.
    pub fn remove_fidelity_table(&self, id: MogramId) -> PoolResult<Option<FidelityTable>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.remove_fidelity_table"))?;
        Ok(state.fidelities.remove_table(id))
    }

    /// [`fidelity_table`] for an identity-bearing owner.
    ///
    /// [`fidelity_table`]: Registry::fidelity_table
    pub fn fidelity_table_of(&self, owner: &impl Identified) -> PoolResult<Option<FidelityTable>> {
        self.fidelity_table(owner.mogram_id())
    }

    /// Returns the signature table for `id`, if registered.
    pub fn signature_table(&self, id: MogramId) -> PoolResult<Option<SignatureTable<S>>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("registry.signature_table"))?;
        Ok(state.signatures.table(id).cloned())
    }

    /// Registers (or replaces) the signature table for `id`.
    pub fn put_signature_table(&self, id: MogramId, table: SignatureTable<S>) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.put_signature_table"))?;
        state.signatures.insert_table(id, table);
        Ok(())
    }

    /// Removes and returns the signature table for `id`.
    pub fn remove_signature_table(&self, id: MogramId) -> PoolResult<Option<SignatureTable<S>>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.remove_signature_table"))?;
        Ok(state.signatures.remove_table(id))
    }

    /// [`signature_table`] for an identity-bearing owner.
    ///
    /// [`signature_table`]: Registry::signature_table
    pub fn signature_table_of(
        &self,
        owner: &impl Identified,
    ) -> PoolResult<Option<SignatureTable<S>>> {
        self.signature_table(owner.mogram_id())
    }

    /// Returns the entry table for `id`, if registered.
    pub fn entry_table(&self, id: MogramId) -> PoolResult<Option<EntryTable<E>>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("registry.entry_table"))?;
        Ok(state.entries.table(id).cloned())
    }

    /// Registers (or replaces) the entry table for `id`.
    pub fn put_entry_table(&self, id: MogramId, table: EntryTable<E>) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.put_entry_table"))?;
        state.entries.insert_table(id, table);
        Ok(())
    }

    /// Removes and returns the entry table for `id`.
    pub fn remove_entry_table(&self, id: MogramId) -> PoolResult<Option<EntryTable<E>>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.remove_entry_table"))?;
        Ok(state.entries.remove_table(id))
    }

    /// [`entry_table`] for an identity-bearing owner.
    ///
    /// [`entry_table`]: Registry::entry_table
    pub fn entry_table_of(&self, owner: &impl Identified) -> PoolResult<Option<EntryTable<E>>> {
        self.entry_table(owner.mogram_id())
    }

    /// Returns the derivative-entry table for `id`, if registered.
    pub fn derivative_table(&self, id: MogramId) -> PoolResult<Option<EntryTable<E>>> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("registry.derivative_table"))?;
        Ok(state.derivatives.table(id).cloned())
    }

    /// Registers (or replaces) the derivative-entry table for `id`.
    pub fn put_derivative_table(&self, id: MogramId, table: EntryTable<E>) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.put_derivative_table"))?;
        state.derivatives.insert_table(id, table);
        Ok(())
    }

    /// Removes and returns the derivative-entry table for `id`.
    pub fn remove_derivative_table(&self, id: MogramId) -> PoolResult<Option<EntryTable<E>>> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.remove_derivative_table"))?;
        Ok(state.derivatives.remove_table(id))
    }

    /// [`derivative_table`] for an identity-bearing owner.
    ///
    /// [`derivative_table`]: Registry::derivative_table
    pub fn derivative_table_of(
        &self,
        owner: &impl Identified,
    ) -> PoolResult<Option<EntryTable<E>>> {
        self.derivative_table(owner.mogram_id())
    }

    /// Returns true if `id` has a table registered in any pool.
    pub fn contains_mogram(&self, id: MogramId) -> PoolResult<bool> {
        let state = self
            .state
            .read()
            .map_err(|_| PoolError::poisoned("registry.contains_mogram"))?;
        Ok(state.fidelities.contains_mogram(id)
            || state.signatures.contains_mogram(id)
            || state.entries.contains_mogram(id)
            || state.derivatives.contains_mogram(id))
    }

    /// Drops every table registered for `id`, across all four pools.
    ///
    /// The hook for the owning engine to evict a completed mogram.
    pub fn drop_mogram(&self, id: MogramId) -> PoolResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|_| PoolError::poisoned("registry.drop_mogram"))?;
        state.fidelities.remove_table(id);
        state.signatures.remove_table(id);
        state.entries.remove_table(id);
        state.derivatives.remove_table(id);
        Ok(())
    }
}

impl<S, E> Default for Registry<S, E> {
    fn default() -> Self {
        Self::new()
    }
}
