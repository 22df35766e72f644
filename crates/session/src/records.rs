use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use viability_store::{LocalStore, Namespace};
use viability_types::{Analysis, CompanyData};

type Listener = Box<dyn Fn(&[Analysis]) + Send + Sync>;

/// Handle returned by [`RecordManager::subscribe`]; pass it back to
/// [`RecordManager::unsubscribe`] to stop receiving snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The analysis record list, its payload map and the current-record
/// pointer.
///
/// Every mutation persists first, then synchronously hands the fresh full
/// list to every subscriber. The list is re-read from the store on each
/// access; there is no in-memory copy to drift.
pub struct RecordManager {
    store: LocalStore,
    next_listener: AtomicU64,
    listeners: Mutex<Vec<(u64, Listener)>>,
}

impl RecordManager {
    #[must_use]
    pub fn new(store: LocalStore) -> Self {
        Self {
            store,
            next_listener: AtomicU64::new(1),
            listeners: Mutex::new(Vec::new()),
        }
    }

    /// All records, oldest first; the most recently stored sits last.
    #[must_use]
    pub fn all(&self) -> Vec<Analysis> {
        self.store.get(Namespace::Analyses).unwrap_or_default()
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<Analysis> {
        self.all().into_iter().find(|record| record.id == id)
    }

    /// Insert or replace `record`. A replaced record moves to the end of
    /// the list.
    pub fn store(&self, record: Analysis) {
        let mut records = self.all();
        records.retain(|existing| existing.id != record.id);
        records.push(record);
        self.store.set(Namespace::Analyses, &records);
        self.notify(&records);
    }

    /// Remove the record and its stored payload. Returns whether a record
    /// existed under `id`.
    pub fn delete(&self, id: &str) -> bool {
        let mut records = self.all();
        let before = records.len();
        records.retain(|record| record.id != id);
        if records.len() == before {
            return false;
        }

        self.store.set(Namespace::Analyses, &records);
        let mut payloads = self.payloads();
        if payloads.remove(id).is_some() {
            self.store.set(Namespace::Payloads, &payloads);
        }
        self.notify(&records);
        true
    }

    fn payloads(&self) -> HashMap<String, CompanyData> {
        self.store.get(Namespace::Payloads).unwrap_or_default()
    }

    /// Persist the payload `record_id` was scored with.
    pub fn save_payload(&self, record_id: &str, company: &CompanyData) {
        let mut payloads = self.payloads();
        payloads.insert(record_id.to_string(), company.clone());
        self.store.set(Namespace::Payloads, &payloads);
    }

    #[must_use]
    pub fn payload(&self, record_id: &str) -> Option<CompanyData> {
        self.payloads().remove(record_id)
    }

    pub fn set_current(&self, id: &str) {
        self.store.set(Namespace::Current, &id);
    }

    #[must_use]
    pub fn current_id(&self) -> Option<String> {
        self.store.get(Namespace::Current)
    }

    pub fn clear_current(&self) {
        self.store.remove(Namespace::Current);
    }

    /// Register a listener invoked synchronously with the full list after
    /// every mutation.
    pub fn subscribe(
        &self,
        listener: impl Fn(&[Analysis]) + Send + Sync + 'static,
    ) -> SubscriptionId {
        let id = self.next_listener.fetch_add(1, Ordering::Relaxed);
        self.listeners
            .lock()
            .expect("listener registry poisoned")
            .push((id, Box::new(listener)));
        SubscriptionId(id)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.listeners
            .lock()
            .expect("listener registry poisoned")
            .retain(|(listener_id, _)| *listener_id != id.0);
    }

    fn notify(&self, records: &[Analysis]) {
        let listeners = self.listeners.lock().expect("listener registry poisoned");
        for (_, listener) in listeners.iter() {
            listener(records);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use viability_types::AnalysisStatus;

    fn manager() -> (tempfile::TempDir, RecordManager) {
        let dir = tempfile::tempdir().expect("tempdir");
        let manager = RecordManager::new(LocalStore::open(dir.path()));
        (dir, manager)
    }

    fn record(id: &str) -> Analysis {
        Analysis {
            id: id.to_string(),
            title: format!("Analysis {id}"),
            cnae: "4781-4/00".to_string(),
            address: "Rua da Aurora, 100".to_string(),
            city: "Recife".to_string(),
            uf: "PE".to_string(),
            status: AnalysisStatus::Incompleta,
            score: None,
            created_at_ms: 1,
            updated_at_ms: 1,
            complete: false,
        }
    }

    #[test]
    fn store_appends_in_order() {
        let (_dir, manager) = manager();
        manager.store(record("a"));
        manager.store(record("b"));
        let ids: Vec<String> = manager.all().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn updated_record_moves_to_the_end() {
        let (_dir, manager) = manager();
        manager.store(record("a"));
        manager.store(record("b"));

        let mut updated = record("a");
        updated.score = Some(70);
        manager.store(updated);

        let records = manager.all();
        let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(records[1].score, Some(70));
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn get_finds_by_id() {
        let (_dir, manager) = manager();
        manager.store(record("a"));
        assert_eq!(manager.get("a").map(|r| r.id), Some("a".to_string()));
        assert_eq!(manager.get("missing"), None);
    }

    #[test]
    fn delete_removes_record_and_payload() {
        let (_dir, manager) = manager();
        manager.store(record("a"));
        manager.save_payload("a", &CompanyData::placeholder());

        assert!(manager.delete("a"));
        assert_eq!(manager.all(), Vec::new());
        assert_eq!(manager.payload("a"), None);
        assert!(!manager.delete("a"));
    }

    #[test]
    fn payload_round_trips() {
        let (_dir, manager) = manager();
        let company = CompanyData {
            cidade: "Fortaleza".to_string(),
            uf: "CE".to_string(),
            ..CompanyData::default()
        };
        manager.save_payload("a", &company);
        assert_eq!(manager.payload("a"), Some(company));
        assert_eq!(manager.payload("b"), None);
    }

    #[test]
    fn current_pointer_round_trips() {
        let (_dir, manager) = manager();
        assert_eq!(manager.current_id(), None);
        manager.set_current("analysis_9");
        assert_eq!(manager.current_id(), Some("analysis_9".to_string()));
        manager.clear_current();
        assert_eq!(manager.current_id(), None);
    }

    #[test]
    fn subscribers_get_the_full_list_synchronously() {
        let (_dir, manager) = manager();
        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = manager.subscribe(move |records| {
            sink.lock().expect("sink").push(records.len());
        });

        manager.store(record("a"));
        manager.store(record("b"));
        assert_eq!(*seen.lock().expect("sink"), vec![1, 2]);

        manager.unsubscribe(id);
        manager.store(record("c"));
        assert_eq!(*seen.lock().expect("sink"), vec![1, 2]);
    }

    #[test]
    fn delete_notifies_once() {
        let (_dir, manager) = manager();
        manager.store(record("a"));
        manager.save_payload("a", &CompanyData::placeholder());

        let seen: Arc<Mutex<Vec<usize>>> = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        manager.subscribe(move |records| {
            sink.lock().expect("sink").push(records.len());
        });

        manager.delete("a");
        assert_eq!(*seen.lock().expect("sink"), vec![0]);
    }

    #[test]
    fn records_survive_a_new_manager_over_the_same_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let manager = RecordManager::new(LocalStore::open(dir.path()));
            manager.store(record("a"));
        }
        let manager = RecordManager::new(LocalStore::open(dir.path()));
        assert_eq!(manager.all().len(), 1);
    }
}
