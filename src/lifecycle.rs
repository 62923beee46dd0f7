use serde::{Deserialize, Serialize};
use tokio::sync::watch;

/// Execution phase of the host application, as reported by the embedding
/// shell. The timer reacts only to transitions into `Background` while a
/// countdown is running.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AppPhase {
    Active,
    Inactive,
    Background,
}

/// Publisher side of the app-phase subscription. The embedding shell holds
/// this and calls [`LifecycleObserver::report`] on every phase change; the
/// controller consumes receivers from [`LifecycleObserver::subscribe`].
pub struct LifecycleObserver {
    tx: watch::Sender<AppPhase>,
}

impl LifecycleObserver {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AppPhase::Active);
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<AppPhase> {
        self.tx.subscribe()
    }

    pub fn report(&self, phase: AppPhase) {
        let _ = self.tx.send(phase);
    }
}

impl Default for LifecycleObserver {
    fn default() -> Self {
        Self::new()
    }
}
