pub mod config;
pub mod lifecycle;
pub mod models;
pub mod reports;
pub mod sessions;
pub mod store;
pub mod timer;

use std::{path::Path, sync::Arc};

use anyhow::Result;

pub use config::{ConfigStore, TimerConfig, UserPrefs};
pub use lifecycle::{AppPhase, LifecycleObserver};
pub use models::{SessionRecord, SessionSummary};
pub use sessions::SessionLog;
pub use store::{JsonSessionStore, MemoryStore, SessionStore};
pub use timer::{StepDirection, TimerController, TimerEvent, TimerSnapshot};

/// Wired-up application core: session history, timer controller, user
/// preferences, and the lifecycle publisher the embedding shell reports
/// phase changes through.
pub struct FocusApp {
    pub sessions: SessionLog,
    pub timer: TimerController,
    pub prefs: ConfigStore,
    pub lifecycle: LifecycleObserver,
}

impl FocusApp {
    /// Open the app core against a data directory, loading persisted
    /// history once and applying saved preferences to the initial
    /// selection.
    pub async fn open(data_dir: &Path) -> Result<Self> {
        let store = JsonSessionStore::new(data_dir.join("sessions.json"))?;
        let sessions = SessionLog::open(Arc::new(store));

        let prefs = ConfigStore::new(data_dir.join("prefs.json"))?;
        let config = TimerConfig::default();
        let timer = TimerController::new(sessions.clone(), config);

        {
            let saved = prefs.prefs();
            if let Some(minutes) = saved.default_minutes {
                timer.set_minutes(minutes).await;
            }
            if let Some(category) = saved.default_category.as_deref() {
                timer.select_category(category).await;
            }
        }

        let lifecycle = LifecycleObserver::new();
        timer.watch_lifecycle(lifecycle.subscribe()).await;

        Ok(Self {
            sessions,
            timer,
            prefs,
            lifecycle,
        })
    }

    /// Tear down background tasks. Safe to call more than once.
    pub async fn shutdown(&self) {
        self.timer.shutdown().await;
    }
}
