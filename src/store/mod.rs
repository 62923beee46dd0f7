mod json;

pub use json::JsonSessionStore;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use anyhow::{bail, Result};

use crate::models::SessionRecord;

/// Durable whole-list persistence for session records.
///
/// Every `save` replaces the entire stored payload; the in-memory list
/// stays authoritative between successful writes, so a failed save is
/// reported and retried naturally by the next mutation.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Result<Vec<SessionRecord>>;
    fn save(&self, records: &[SessionRecord]) -> Result<()>;
}

/// In-memory store for tests and previews. Saves can be switched to fail
/// to exercise the fire-and-forget persistence path.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<SessionRecord>>,
    fail_saves: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<SessionRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            fail_saves: AtomicBool::new(false),
        }
    }

    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Last successfully saved payload.
    pub fn saved(&self) -> Vec<SessionRecord> {
        self.records.lock().unwrap().clone()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self) -> Result<Vec<SessionRecord>> {
        Ok(self.records.lock().unwrap().clone())
    }

    fn save(&self, records: &[SessionRecord]) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            bail!("simulated storage write failure");
        }
        *self.records.lock().unwrap() = records.to_vec();
        Ok(())
    }
}
