//! Opaque callback identifiers.

use std::borrow::Borrow;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier returned by [`CallbackRegistry::add_callback`](crate::CallbackRegistry::add_callback).
///
/// Ids are unique per call, across threads, without taking the registry lock:
/// a process-wide counter is combined with a random UUID. Callers must not
/// rely on any ordering between ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CallbackId(String);

impl CallbackId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("{seq:x}-{}", Uuid::new_v4().simple()))
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the identifier, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CallbackId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CallbackId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CallbackId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for CallbackId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for CallbackId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}
