//! Write-once registry of the stores referenced by one search.

use std::sync::{Mutex, MutexGuard, PoisonError};

use indexmap::IndexMap;

use crate::stores::StoreRecord;

/// Collects `store id → address` for every store that ends up in a search
/// response.
///
/// One instance lives for exactly one request and is shared by reference
/// between all concurrently running store adapters. The only mutation is
/// [`insert_if_absent`](Self::insert_if_absent): the first adapter to report a
/// store id owns that entry, and later reports are ignored.
#[derive(Debug, Default)]
pub struct StoreAddressMap {
    entries: Mutex<IndexMap<String, StoreRecord>>,
}

impl StoreAddressMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `store_id` unless it is already present.
    ///
    /// Returns `true` if this call inserted the entry. `record` is only cloned
    /// on insert.
    pub fn insert_if_absent(&self, store_id: &str, record: &StoreRecord) -> bool {
        let mut entries = self.lock();
        if entries.contains_key(store_id) {
            return false;
        }
        entries.insert(store_id.to_owned(), record.clone());
        true
    }

    #[must_use]
    pub fn contains(&self, store_id: &str) -> bool {
        self.lock().contains_key(store_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Consumes the registry, yielding entries in first-insertion order.
    #[must_use]
    pub fn into_inner(self) -> IndexMap<String, StoreRecord> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // Inserts never panic while holding the guard, so a poisoned map is still
    // consistent.
    fn lock(&self) -> MutexGuard<'_, IndexMap<String, StoreRecord>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
