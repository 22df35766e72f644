use viability_scoring::UsageSnapshot;
use viability_store::{LocalStore, Namespace};
use viability_types::MAX_ATTEMPTS;

/// Per-session analysis budget, persisted in the `usage` namespace.
///
/// Read-modify-write without locking: concurrent processes may lose
/// increments. Missing or corrupt state reads as zero.
#[derive(Debug, Clone)]
pub struct UsageCounter {
    store: LocalStore,
}

impl UsageCounter {
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        Self { store }
    }

    /// Analyses consumed so far.
    #[must_use]
    pub fn count(&self) -> u32 {
        self.store.get::<u32>(Namespace::Usage).unwrap_or(0)
    }

    /// Consume one analysis and return the new total.
    pub fn increment(&self) -> u32 {
        let next = self.count().saturating_add(1);
        self.store.set(Namespace::Usage, &next);
        next
    }

    /// True once the session spent its budget.
    #[must_use]
    pub fn limit_reached(&self) -> bool {
        self.count() >= MAX_ATTEMPTS
    }

    pub fn reset(&self) {
        self.store.remove(Namespace::Usage);
    }

    /// Snapshot handed to the scoring engine.
    #[must_use]
    pub fn snapshot(&self) -> UsageSnapshot {
        UsageSnapshot::new(self.count(), MAX_ATTEMPTS)
    }
}
