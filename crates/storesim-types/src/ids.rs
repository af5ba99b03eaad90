//! Customer identifier.
//!
//! Customer IDs are plain integers assigned by the caller (the random
//! generator, the HTTP add path, or an external registry). The store
//! guarantees an ID is never present twice in the roster, but it does not
//! mint IDs on its own except through its allocator.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Unique identifier for a customer in the store.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[serde(transparent)]
#[ts(export, export_to = "bindings/")]
pub struct CustomerId(#[ts(type = "number")] pub u64);

impl CustomerId {
    /// Wrap a raw integer ID.
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Return the inner integer value.
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl core::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CustomerId {
    fn from(raw: u64) -> Self {
        Self(raw)
    }
}

impl From<CustomerId> for u64 {
    fn from(id: CustomerId) -> Self {
        id.0
    }
}
