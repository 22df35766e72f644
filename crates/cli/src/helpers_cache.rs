//! Local TTL cache for the backend helper tables.
//!
//! Qualifications, legal natures and CNAE codes change rarely, so one fetch
//! a day is plenty. Entries older than the TTL read as a miss; `--refresh`
//! skips the read entirely.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use viability_api::{HelperEntry, HelperTable};
use viability_store::{LocalStore, Namespace};
use viability_types::unix_ms_now;

pub(crate) const HELPERS_TTL_MS: u64 = 24 * 60 * 60 * 1000;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CachedTable {
    fetched_at_ms: u64,
    entries: Vec<HelperEntry>,
}

pub(crate) struct HelpersCache<'a> {
    store: &'a LocalStore,
}

impl<'a> HelpersCache<'a> {
    pub(crate) fn new(store: &'a LocalStore) -> Self {
        Self { store }
    }

    /// Entries fetched within the TTL, or `None` on a miss or stale hit.
    pub(crate) fn fresh(&self, table: HelperTable) -> Option<Vec<HelperEntry>> {
        let tables: HashMap<String, CachedTable> = self.store.get(Namespace::Helpers)?;
        let cached = tables.get(table.as_str())?;
        let age_ms = unix_ms_now().saturating_sub(cached.fetched_at_ms);
        if age_ms > HELPERS_TTL_MS {
            log::debug!(
                "Helper table {} cached {age_ms}ms ago; refetching",
                table.as_str()
            );
            return None;
        }
        Some(cached.entries.clone())
    }

    pub(crate) fn put(&self, table: HelperTable, entries: &[HelperEntry]) {
        let mut tables: HashMap<String, CachedTable> =
            self.store.get(Namespace::Helpers).unwrap_or_default();
        tables.insert(
            table.as_str().to_string(),
            CachedTable {
                fetched_at_ms: unix_ms_now(),
                entries: entries.to_vec(),
            },
        );
        self.store.set(Namespace::Helpers, &tables);
    }
}
