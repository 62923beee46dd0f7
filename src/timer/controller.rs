use std::sync::Arc;

use anyhow::{anyhow, Result};
use log::info;
use serde::Serialize;
use tokio::{
    sync::{broadcast, watch, Mutex},
    task::JoinHandle,
    time,
};
use tokio_util::sync::CancellationToken;

use crate::{
    config::TimerConfig,
    lifecycle::AppPhase,
    models::SessionRecord,
    sessions::SessionLog,
    timer::{
        state::{FinalizeReason, TickOutcome, TimerPhase, TimerState},
        stepper::{HoldStepper, StepDirection},
    },
};

#[derive(Debug, Serialize, Clone)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub phase: TimerPhase,
    /// `MM:SS` remaining time, ready for display.
    pub display: String,
}

impl TimerSnapshot {
    fn of(state: &TimerState) -> Self {
        Self {
            phase: state.phase(),
            display: state.display_time(),
            state: state.clone(),
        }
    }
}

/// Notifications broadcast to the presentation layer.
#[derive(Debug, Clone)]
pub enum TimerEvent {
    StateChanged(TimerSnapshot),
    SessionCompleted(SessionRecord),
}

/// Async shell around [`TimerState`]: owns the one-second ticker, the
/// lifecycle watcher, and the hold-repeat stepper, and turns finished
/// countdowns into persisted records through the session log.
#[derive(Clone)]
pub struct TimerController {
    state: Arc<Mutex<TimerState>>,
    log: SessionLog,
    config: TimerConfig,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    hold: Arc<Mutex<HoldStepper>>,
    lifecycle: Arc<Mutex<Option<(CancellationToken, JoinHandle<()>)>>>,
    events: broadcast::Sender<TimerEvent>,
}

impl TimerController {
    pub fn new(log: SessionLog, config: TimerConfig) -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            state: Arc::new(Mutex::new(TimerState::new(&config))),
            log,
            config,
            ticker: Arc::new(Mutex::new(None)),
            hold: Arc::new(Mutex::new(HoldStepper::new())),
            lifecycle: Arc::new(Mutex::new(None)),
            events,
        }
    }

    pub fn config(&self) -> &TimerConfig {
        &self.config
    }

    pub fn subscribe(&self) -> broadcast::Receiver<TimerEvent> {
        self.events.subscribe()
    }

    pub async fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot::of(&*self.state.lock().await)
    }

    pub async fn start(&self) -> Result<TimerSnapshot> {
        {
            let mut state = self.state.lock().await;
            if !state.start() {
                return Err(anyhow!("timer already running"));
            }
        }
        self.spawn_ticker().await;
        info!("countdown started");
        self.emit_state_changed().await;
        Ok(self.snapshot().await)
    }

    pub async fn pause(&self) -> Result<TimerSnapshot> {
        self.cancel_ticker().await;
        let paused = { self.state.lock().await.pause() };
        if paused {
            info!("countdown paused");
            self.emit_state_changed().await;
        }
        Ok(self.snapshot().await)
    }

    pub async fn resume(&self) -> Result<TimerSnapshot> {
        {
            let mut state = self.state.lock().await;
            if !state.resume() {
                return Err(anyhow!("no paused session to resume"));
            }
        }
        self.spawn_ticker().await;
        info!("countdown resumed");
        self.emit_state_changed().await;
        Ok(self.snapshot().await)
    }

    /// Manual end. Records the elapsed time if the countdown ever advanced;
    /// a session that never ticked is silently discarded either way.
    pub async fn stop(&self) -> Result<Option<SessionRecord>> {
        self.cancel_ticker().await;
        let summary = {
            self.state
                .lock()
                .await
                .finalize(FinalizeReason::Stopped)
        };
        let record = match summary {
            Some(summary) => {
                info!(
                    "session stopped after {}s of {}s",
                    summary.actual_duration_seconds, summary.target_duration_seconds
                );
                Some(self.log.record(summary).await)
            }
            None => {
                info!("session discarded: countdown never advanced");
                None
            }
        };
        self.emit_state_changed().await;
        if let Some(record) = &record {
            let _ = self
                .events
                .send(TimerEvent::SessionCompleted(record.clone()));
        }
        Ok(record)
    }

    pub async fn set_minutes(&self, minutes: u32) -> TimerSnapshot {
        let changed = {
            self.state
                .lock()
                .await
                .set_minutes(minutes as i64, &self.config)
        };
        if changed {
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    pub async fn step_minutes(&self, delta: i64) -> TimerSnapshot {
        let changed = { self.state.lock().await.step_minutes(delta, &self.config) };
        if changed {
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    /// Quick-select chip. Values outside the configured presets are ignored.
    pub async fn quick_select(&self, minutes: u32) -> TimerSnapshot {
        if self.config.quick_presets.contains(&minutes) {
            self.set_minutes(minutes).await
        } else {
            self.snapshot().await
        }
    }

    pub async fn select_category(&self, name: &str) -> TimerSnapshot {
        let changed = { self.state.lock().await.select_category(name, &self.config) };
        if changed {
            self.emit_state_changed().await;
        }
        self.snapshot().await
    }

    /// Press-and-hold on the stepper: one ±1 step immediately, then ±5
    /// steps per hold interval until [`TimerController::end_hold`].
    pub async fn begin_hold(&self, direction: StepDirection) -> TimerSnapshot {
        let snapshot = self.step_minutes(direction.unit()).await;

        // Selection is locked once a session has started; repeats would be
        // no-ops too, so don't arm the task at all.
        if snapshot.state.has_started {
            return snapshot;
        }

        let controller = self.clone();
        let hold_interval = self.config.hold_interval;
        let step = self.config.hold_step_minutes as i64 * direction.unit();
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(hold_interval);
            interval.tick().await;
            loop {
                interval.tick().await;
                controller.step_minutes(step).await;
            }
        });

        self.hold.lock().await.arm(handle);
        snapshot
    }

    pub async fn end_hold(&self) {
        self.hold.lock().await.release();
    }

    /// Subscribe to host app phase changes. A transition into `Background`
    /// while running pauses the countdown and counts a distraction.
    pub async fn watch_lifecycle(&self, mut phases: watch::Receiver<AppPhase>) {
        let token = CancellationToken::new();
        let child = token.clone();
        let controller = self.clone();

        let handle = tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    changed = phases.changed() => {
                        if changed.is_err() {
                            break;
                        }
                        let phase = *phases.borrow_and_update();
                        if phase == AppPhase::Background {
                            controller.handle_backgrounded().await;
                        }
                    }
                }
            }
        });

        let mut guard = self.lifecycle.lock().await;
        if let Some((old_token, old_handle)) = guard.take() {
            old_token.cancel();
            old_handle.abort();
        }
        *guard = Some((token, handle));
    }

    /// Screen unmount: cancel the ticker, the hold task, and the lifecycle
    /// watcher so nothing mutates state after disposal.
    pub async fn shutdown(&self) {
        self.cancel_ticker().await;
        self.end_hold().await;
        let mut guard = self.lifecycle.lock().await;
        if let Some((token, handle)) = guard.take() {
            token.cancel();
            handle.abort();
        }
    }

    async fn handle_backgrounded(&self) {
        let counted = { self.state.lock().await.backgrounded() };
        if counted {
            self.cancel_ticker().await;
            info!("app backgrounded mid-run; paused and counted a distraction");
            self.emit_state_changed().await;
        }
    }

    async fn spawn_ticker(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let state = self.state.clone();
        let log = self.log.clone();
        let events = self.events.clone();
        let tick_interval = self.config.tick_interval;

        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            // The first interval tick completes immediately; consume it so
            // the countdown only decrements on real boundaries.
            interval.tick().await;
            loop {
                interval.tick().await;

                let (outcome, snapshot) = {
                    let mut guard = state.lock().await;
                    let outcome = guard.tick();
                    (outcome, TimerSnapshot::of(&guard))
                };

                match outcome {
                    TickOutcome::NotRunning => break,
                    TickOutcome::Ticking => {
                        let _ = events.send(TimerEvent::StateChanged(snapshot));
                    }
                    TickOutcome::Finished => {
                        let _ = events.send(TimerEvent::StateChanged(snapshot));

                        let summary = {
                            state.lock().await.finalize(FinalizeReason::Completed)
                        };
                        if let Some(summary) = summary {
                            info!(
                                "session completed: {}s in {}",
                                summary.actual_duration_seconds, summary.category
                            );
                            let record = log.record(summary).await;
                            let _ = events.send(TimerEvent::SessionCompleted(record));
                        }

                        let final_snapshot = {
                            TimerSnapshot::of(&*state.lock().await)
                        };
                        let _ = events.send(TimerEvent::StateChanged(final_snapshot));
                        break;
                    }
                }
            }
        });

        *ticker_guard = Some(handle);
    }

    async fn cancel_ticker(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
        }
    }

    async fn emit_state_changed(&self) {
        let snapshot = self.snapshot().await;
        let _ = self.events.send(TimerEvent::StateChanged(snapshot));
    }
}
