//! Mogram identity and fidelity names.
//!
//! Every pool in this crate is scoped first by the identity of a mogram —
//! a unit of executable work tracked by an external workflow engine. The
//! engine mints the identity; this crate only ever uses it as an opaque
//! map key.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Globally unique, stable mogram identifier.
///
/// Once created, a `MogramId` never changes. The workflow engine that owns
/// the mogram generates it; pools and caches never interpret it.
///
/// # Examples
///
/// ```
/// use mogpool::MogramId;
///
/// let id = MogramId::new();
/// assert!(!id.is_nil());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MogramId(Uuid);

impl MogramId {
    /// Creates a new random mogram ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a mogram ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }

    /// Returns true if this is a nil (all zeros) UUID.
    #[must_use]
    pub fn is_nil(&self) -> bool {
        self.0.is_nil()
    }

    /// Creates a nil mogram ID (for testing or sentinel values).
    #[must_use]
    pub const fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for MogramId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MogramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for MogramId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<MogramId> for Uuid {
    fn from(id: MogramId) -> Self {
        id.0
    }
}

/// The name of one variant of an executable step.
///
/// A fidelity identifies which implementation choice the engine runs for a
/// step. It is an opaque name: this crate never parses or normalizes it,
/// only compares and hashes it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fidelity(String);

impl Fidelity {
    /// Creates a fidelity from a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the fidelity name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fidelity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fidelity {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for Fidelity {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Implemented by values that carry the identity of their owning mogram.
///
/// Registry accessors accept any `Identified` value directly, so callers
/// holding an identity-bearing object (a task handle, an exertion record)
/// need not extract the raw [`MogramId`] themselves.
pub trait Identified {
    /// The owning mogram's identity.
    fn mogram_id(&self) -> MogramId;
}

impl Identified for MogramId {
    fn mogram_id(&self) -> MogramId {
        *self
    }
}

impl<T: Identified + ?Sized> Identified for &T {
    fn mogram_id(&self) -> MogramId {
        (**self).mogram_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mogram_id_is_unique_and_round_trips_through_uuid() {
        let a = MogramId::new();
        let b = MogramId::new();
        assert_ne!(a, b);

        let uuid: Uuid = a.into();
        assert_eq!(MogramId::from_uuid(uuid), a);
        assert_eq!(a.as_uuid(), &uuid);
    }

    #[test]
    fn nil_id_is_nil() {
        assert!(MogramId::nil().is_nil());
        assert!(!MogramId::new().is_nil());
    }

    #[test]
    fn fidelity_compares_by_name() {
        let fast: Fidelity = "fast".into();
        assert_eq!(fast, Fidelity::new("fast"));
        assert_ne!(fast, Fidelity::new("exact"));
        assert_eq!(fast.as_str(), "fast");
        assert_eq!(fast.to_string(), "fast");
    }

    #[test]
    fn identified_is_implemented_for_raw_ids_and_references() {
        struct Task {
            id: MogramId,
        }
        impl Identified for Task {
            fn mogram_id(&self) -> MogramId {
                self.id
            }
        }

        let task = Task { id: MogramId::new() };
        assert_eq!(task.mogram_id(), task.id);
        assert_eq!((&task).mogram_id(), task.id);
        assert_eq!(task.id.mogram_id(), task.id);
    }

    #[test]
    fn serde_is_transparent() {
        let id = MogramId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));

        let fi = Fidelity::new("fast");
        assert_eq!(serde_json::to_string(&fi).unwrap(), "\"fast\"");
    }
}
