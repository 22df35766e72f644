use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};

use viability_store::{LocalStore, Namespace};
use viability_types::CompanyData;

use crate::RecordManager;

/// Quiet period before a form edit is persisted.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(500);

/// Pending-edit state: every edit replaces the held payload and re-arms
/// the deadline, so only the newest payload is ever flushed.
#[derive(Debug, Default)]
struct PendingDraft {
    draft: Option<CompanyData>,
    deadline: Option<Instant>,
}

impl PendingDraft {
    fn record_edit(&mut self, draft: CompanyData, debounce: Duration) {
        self.draft = Some(draft);
        self.deadline = Some(Instant::now() + debounce);
    }

    fn next_deadline(&self) -> Option<Instant> {
        self.deadline
    }

    fn take(&mut self) -> Option<CompanyData> {
        self.deadline = None;
        self.draft.take()
    }
}

enum Command {
    Edit(CompanyData),
    Flush(oneshot::Sender<()>),
}

/// Debounced autosave of the analysis form.
///
/// A flush writes the `draft` namespace and, when a current record exists,
/// refreshes its title and payload through the [`RecordManager`]. Last
/// write wins.
pub struct DraftAutosaver {
    tx: mpsc::Sender<Command>,
    handle: JoinHandle<()>,
}

impl DraftAutosaver {
    /// Spawn the autosave task over `store`.
    #[must_use]
    pub fn spawn(store: LocalStore, manager: Arc<RecordManager>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::channel(64);
        let handle = tokio::spawn(run(store, manager, debounce, rx));
        Self { tx, handle }
    }

    /// Queue a form edit; persisted once the debounce window closes.
    pub async fn edit(&self, draft: CompanyData) {
        if self.tx.send(Command::Edit(draft)).await.is_err() {
            log::warn!("Draft autosaver is gone; edit dropped");
        }
    }

    /// Persist any pending edit immediately.
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(done_tx)).await.is_ok() {
            let _ = done_rx.await;
        }
    }

    /// Flush and stop the task.
    pub async fn shutdown(self) {
        self.flush().await;
        let Self { tx, handle } = self;
        drop(tx);
        let _ = handle.await;
    }
}

async fn run(
    store: LocalStore,
    manager: Arc<RecordManager>,
    debounce: Duration,
    mut rx: mpsc::Receiver<Command>,
) {
    let mut pending = PendingDraft::default();
    loop {
        let deadline = pending.next_deadline();
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Edit(draft)) => pending.record_edit(draft, debounce),
                Some(Command::Flush(done)) => {
                    if let Some(draft) = pending.take() {
                        persist(&store, &manager, &draft);
                    }
                    let _ = done.send(());
                }
                None => {
                    if let Some(draft) = pending.take() {
                        persist(&store, &manager, &draft);
                    }
                    break;
                }
            },
            () = sleep_until_or_forever(deadline) => {
                if let Some(draft) = pending.take() {
                    persist(&store, &manager, &draft);
                }
            }
        }
    }
}

async fn sleep_until_or_forever(deadline: Option<Instant>) {
    match deadline {
        Some(at) => time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

fn persist(store: &LocalStore, manager: &RecordManager, draft: &CompanyData) {
    store.set(Namespace::Draft, draft);
    if let Some(id) = manager.current_id() {
        if let Some(mut record) = manager.get(&id) {
            record.refresh_from(draft);
            manager.store(record);
            manager.save_payload(&id, draft);
        }
    }
    log::debug!("Draft autosaved");
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use viability_types::Analysis;

    fn draft(city: &str) -> CompanyData {
        CompanyData {
            cidade: city.to_string(),
            uf: "SP".to_string(),
            cnae: "4781-4/00".to_string(),
            ..CompanyData::default()
        }
    }

    #[test]
    fn edits_rearm_the_deadline() {
        let mut pending = PendingDraft::default();
        assert_eq!(pending.next_deadline(), None);

        pending.record_edit(draft("Santos"), Duration::from_millis(500));
        let first = pending.next_deadline().expect("armed");

        pending.record_edit(draft("Campinas"), Duration::from_millis(500));
        let second = pending.next_deadline().expect("still armed");
        assert!(second >= first);
    }

    #[test]
    fn take_disarms_and_yields_the_newest_draft() {
        let mut pending = PendingDraft::default();
        pending.record_edit(draft("Santos"), Duration::from_millis(500));
        pending.record_edit(draft("Campinas"), Duration::from_millis(500));

        let flushed = pending.take().expect("pending draft");
        assert_eq!(flushed.cidade, "Campinas");
        assert_eq!(pending.next_deadline(), None);
        assert_eq!(pending.take(), None);
    }

    #[tokio::test]
    async fn flush_persists_the_last_edit_only() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path());
        let manager = Arc::new(RecordManager::new(store.clone()));

        let saver = DraftAutosaver::spawn(store.clone(), manager, Duration::from_secs(60));
        saver.edit(draft("Santos")).await;
        saver.edit(draft("Campinas")).await;
        saver.flush().await;

        let saved: CompanyData = store.get(Namespace::Draft).expect("draft saved");
        assert_eq!(saved.cidade, "Campinas");
        saver.shutdown().await;
    }

    #[tokio::test]
    async fn flush_without_edits_writes_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path());
        let manager = Arc::new(RecordManager::new(store.clone()));

        let saver = DraftAutosaver::spawn(store.clone(), manager, AUTOSAVE_DEBOUNCE);
        saver.flush().await;
        assert_eq!(store.get::<CompanyData>(Namespace::Draft), None);
        saver.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_period_triggers_the_save() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path());
        let manager = Arc::new(RecordManager::new(store.clone()));

        let saver = DraftAutosaver::spawn(store.clone(), manager, AUTOSAVE_DEBOUNCE);
        saver.edit(draft("Niterói")).await;
        time::advance(AUTOSAVE_DEBOUNCE + Duration::from_millis(50)).await;
        // Flush is a no-op if the timer already fired; either path leaves
        // the same document behind.
        saver.flush().await;

        let saved: CompanyData = store.get(Namespace::Draft).expect("draft saved");
        assert_eq!(saved.cidade, "Niterói");
        saver.shutdown().await;
    }

    #[tokio::test]
    async fn flush_refreshes_the_current_record() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = LocalStore::open(dir.path());
        let manager = Arc::new(RecordManager::new(store.clone()));

        let record = Analysis::draft(&draft("Santos"));
        let id = record.id.clone();
        manager.store(record);
        manager.set_current(&id);

        let saver = DraftAutosaver::spawn(
            store.clone(),
            Arc::clone(&manager),
            Duration::from_secs(60),
        );
        saver.edit(draft("Campinas")).await;
        saver.flush().await;
        saver.shutdown().await;

        let refreshed = manager.get(&id).expect("record kept");
        assert_eq!(refreshed.title, "CNAE 4781-4/00 · Campinas/SP");
        let payload = manager.payload(&id).expect("payload saved");
        assert_eq!(payload.cidade, "Campinas");
    }
}
