use std::sync::atomic::{AtomicU64, Ordering};

use uuid::Uuid;

/// Source of fresh opaque identifiers for records and groups.
pub trait IdSource {
    fn next_id(&self) -> String;
}

/// Random v4 UUIDs, the default for interactive sessions.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic `prefix-N` identifiers for fixtures and replays.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new("id")
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// For paths that rebuild existing records and never mint identifiers.
pub(crate) struct NoIds;

impl IdSource for NoIds {
    fn next_id(&self) -> String {
        String::new()
    }
}

impl<T: IdSource + ?Sized> IdSource for &T {
    fn next_id(&self) -> String {
        (**self).next_id()
    }
}
