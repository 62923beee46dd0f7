use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex as StdMutex,
};

use chrono::Utc;
use log::{error, info, warn};
use tokio::sync::Mutex;

use crate::{
    models::{SessionRecord, SessionSummary},
    store::SessionStore,
};

/// Newest-first session history, authoritative for rendering and reports.
///
/// The persisted copy is loaded exactly once, at construction and before
/// any user-driven mutation; afterwards every mutation rewrites the store
/// wholesale in the background. Write failures are logged and the
/// in-memory list stays authoritative until the next mutation retries.
#[derive(Clone)]
pub struct SessionLog {
    records: Arc<Mutex<Vec<SessionRecord>>>,
    store: Arc<dyn SessionStore>,
    /// Sequence of the most recently queued snapshot.
    write_seq: Arc<AtomicU64>,
    /// Serializes store writes; holds the highest sequence written so far.
    writer: Arc<StdMutex<u64>>,
}

impl SessionLog {
    pub fn open(store: Arc<dyn SessionStore>) -> Self {
        let records = match store.load() {
            Ok(records) => {
                info!("loaded {} persisted sessions", records.len());
                records
            }
            Err(err) => {
                warn!("failed to load session history: {err:#}; starting empty");
                Vec::new()
            }
        };

        Self {
            records: Arc::new(Mutex::new(records)),
            store,
            write_seq: Arc::new(AtomicU64::new(0)),
            writer: Arc::new(StdMutex::new(0)),
        }
    }

    /// Turn a finalized summary into a record: assign identity and the
    /// completion timestamp, prepend, persist.
    pub async fn record(&self, summary: SessionSummary) -> SessionRecord {
        let record = SessionRecord::from_summary(summary, Utc::now());
        let snapshot = {
            let mut records = self.records.lock().await;
            records.insert(0, record.clone());
            records.clone()
        };
        info!(
            "recorded session {}: {}s in {}",
            record.id, record.actual_duration_seconds, record.category
        );
        self.persist(snapshot);
        record
    }

    /// Remove at most one record by id. Absent ids are a no-op, which makes
    /// repeated deletes of the same id idempotent.
    pub async fn delete(&self, id: &str) -> bool {
        let snapshot = {
            let mut records = self.records.lock().await;
            match records.iter().position(|record| record.id == id) {
                Some(index) => {
                    records.remove(index);
                    Some(records.clone())
                }
                None => None,
            }
        };

        match snapshot {
            Some(snapshot) => {
                info!("deleted session {id}");
                self.persist(snapshot);
                true
            }
            None => false,
        }
    }

    pub async fn all(&self) -> Vec<SessionRecord> {
        self.records.lock().await.clone()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.lock().await.is_empty()
    }

    /// Background write of the full list. Each snapshot carries a sequence
    /// number; a snapshot that reaches the writer after a newer one has
    /// already landed is dropped, so the store never regresses to an older
    /// copy no matter how the blocking pool schedules the saves.
    fn persist(&self, records: Vec<SessionRecord>) {
        let seq = self.write_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let store = self.store.clone();
        let writer = self.writer.clone();
        tokio::task::spawn_blocking(move || {
            let mut last_written = match writer.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            if seq <= *last_written {
                return;
            }
            match store.save(&records) {
                Ok(()) => *last_written = seq,
                Err(err) => error!("failed to persist session history: {err:#}"),
            }
        });
    }
}
