use serde::{Deserialize, Serialize};

use crate::{config::TimerConfig, models::SessionSummary};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum TimerPhase {
    Idle,
    Running,
    Paused,
}

/// How a session ended: the countdown reached zero, or the user ended it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinalizeReason {
    Completed,
    Stopped,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    NotRunning,
    Ticking,
    Finished,
}

/// Countdown state for one timer screen instance.
///
/// Plain data with small mutating transitions; the async shell around it
/// lives in [`super::controller`]. All invariants of the session lifecycle
/// are enforced here so they can be tested without a runtime.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub category: String,
    pub selected_minutes: u32,
    pub session_duration_seconds: u32,
    pub seconds_left: u32,
    pub is_running: bool,
    /// True once the countdown has started since the last full reset; locks
    /// category and duration editing even while paused.
    pub has_started: bool,
    pub distractions: u32,
}

impl TimerState {
    pub fn new(config: &TimerConfig) -> Self {
        let minutes = config.clamp_minutes(config.default_minutes as i64);
        Self {
            category: config.default_category(),
            selected_minutes: minutes,
            session_duration_seconds: minutes * 60,
            seconds_left: minutes * 60,
            is_running: false,
            has_started: false,
            distractions: 0,
        }
    }

    pub fn phase(&self) -> TimerPhase {
        if self.is_running {
            TimerPhase::Running
        } else if self.has_started {
            TimerPhase::Paused
        } else {
            TimerPhase::Idle
        }
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.session_duration_seconds - self.seconds_left
    }

    /// `MM:SS` rendering of the remaining time.
    pub fn display_time(&self) -> String {
        format!("{:02}:{:02}", self.seconds_left / 60, self.seconds_left % 60)
    }

    /// Begin or continue the countdown. Returns false while already running.
    pub fn start(&mut self) -> bool {
        if self.is_running {
            return false;
        }
        // Stale zero from a prior run: re-arm before counting down again.
        if self.seconds_left == 0 {
            self.seconds_left = self.session_duration_seconds;
            self.distractions = 0;
        }
        self.has_started = true;
        self.is_running = true;
        true
    }

    /// One-second boundary. Decrements first and reports `Finished` when the
    /// result reaches zero, so a full run records exactly the target
    /// duration and "00:00" is representable.
    pub fn tick(&mut self) -> TickOutcome {
        if !self.is_running {
            return TickOutcome::NotRunning;
        }
        self.seconds_left = self.seconds_left.saturating_sub(1);
        if self.seconds_left == 0 {
            TickOutcome::Finished
        } else {
            TickOutcome::Ticking
        }
    }

    pub fn pause(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.is_running || !self.has_started {
            return false;
        }
        self.is_running = true;
        true
    }

    /// Host app moved to the background. Only an active run pauses and
    /// counts a distraction; foregrounding never auto-resumes.
    pub fn backgrounded(&mut self) -> bool {
        if !self.is_running {
            return false;
        }
        self.is_running = false;
        self.distractions += 1;
        true
    }

    /// End the session. A session that never advanced is discarded; anything
    /// else yields a summary. Either way the ephemeral state resets while
    /// the category/duration selection is preserved.
    pub fn finalize(&mut self, _reason: FinalizeReason) -> Option<SessionSummary> {
        let elapsed = self.elapsed_seconds();
        let summary = if elapsed == 0 {
            None
        } else {
            Some(SessionSummary {
                category: self.category.clone(),
                target_duration_seconds: self.session_duration_seconds,
                actual_duration_seconds: elapsed,
                distractions: self.distractions,
            })
        };
        self.reset_ephemeral();
        summary
    }

    /// Set the planned duration. Locked once started; clamped to the
    /// configured range. Any accepted change re-arms the countdown.
    pub fn set_minutes(&mut self, minutes: i64, config: &TimerConfig) -> bool {
        if self.has_started {
            return false;
        }
        let minutes = config.clamp_minutes(minutes);
        self.selected_minutes = minutes;
        self.session_duration_seconds = minutes * 60;
        self.seconds_left = self.session_duration_seconds;
        self.distractions = 0;
        self.is_running = false;
        true
    }

    pub fn step_minutes(&mut self, delta: i64, config: &TimerConfig) -> bool {
        self.set_minutes(self.selected_minutes as i64 + delta, config)
    }

    /// Switch category. Locked once started; unknown names are rejected.
    pub fn select_category(&mut self, name: &str, config: &TimerConfig) -> bool {
        if self.has_started || !config.is_category(name) {
            return false;
        }
        self.category = name.to_string();
        self.seconds_left = self.session_duration_seconds;
        self.distractions = 0;
        true
    }

    fn reset_ephemeral(&mut self) {
        self.seconds_left = self.session_duration_seconds;
        self.distractions = 0;
        self.is_running = false;
        self.has_started = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> (TimerState, TimerConfig) {
        let config = TimerConfig::default();
        (TimerState::new(&config), config)
    }

    fn run_ticks(state: &mut TimerState, n: u32) -> TickOutcome {
        let mut outcome = TickOutcome::NotRunning;
        for _ in 0..n {
            outcome = state.tick();
        }
        outcome
    }

    #[test]
    fn defaults_come_from_config() {
        let (state, config) = state();
        assert_eq!(state.selected_minutes, 25);
        assert_eq!(state.session_duration_seconds, 1500);
        assert_eq!(state.seconds_left, 1500);
        assert_eq!(state.category, config.default_category());
        assert_eq!(state.phase(), TimerPhase::Idle);
    }

    #[test]
    fn full_run_records_target_duration() {
        // Pins the tick boundary: decrement first, finish when the result
        // reaches zero, so 1500 ticks complete a 25-minute session.
        let (mut state, _) = state();
        assert!(state.start());

        assert_eq!(run_ticks(&mut state, 1499), TickOutcome::Ticking);
        assert_eq!(state.seconds_left, 1);
        assert_eq!(state.tick(), TickOutcome::Finished);
        assert_eq!(state.seconds_left, 0);
        assert_eq!(state.display_time(), "00:00");

        let summary = state.finalize(FinalizeReason::Completed).unwrap();
        assert_eq!(summary.actual_duration_seconds, 1500);
        assert_eq!(summary.target_duration_seconds, 1500);
    }

    #[test]
    fn completed_run_with_one_background_transition() {
        let (mut state, _) = state();
        state.start();
        run_ticks(&mut state, 700);

        assert!(state.backgrounded());
        assert_eq!(state.phase(), TimerPhase::Paused);
        assert_eq!(state.distractions, 1);
        // Ticks while paused must not decrement.
        assert_eq!(state.tick(), TickOutcome::NotRunning);
        assert_eq!(state.seconds_left, 800);

        assert!(state.resume());
        assert_eq!(run_ticks(&mut state, 800), TickOutcome::Finished);

        let summary = state.finalize(FinalizeReason::Completed).unwrap();
        assert_eq!(summary.actual_duration_seconds, 1500);
        assert_eq!(summary.distractions, 1);

        assert_eq!(state.seconds_left, 1500);
        assert!(!state.is_running);
        assert!(!state.has_started);
        assert_eq!(state.distractions, 0);
    }

    #[test]
    fn backgrounding_while_not_running_is_ignored() {
        // Already paused: no second pause, no extra distraction.
        let (mut state, _) = state();
        state.start();
        run_ticks(&mut state, 10);
        state.backgrounded();
        assert_eq!(state.distractions, 1);

        assert!(!state.backgrounded());
        assert_eq!(state.distractions, 1);
        assert_eq!(state.phase(), TimerPhase::Paused);
        assert_eq!(state.seconds_left, 1490);

        // Idle, never started: same.
        let (mut idle, _) = self::state();
        assert!(!idle.backgrounded());
        assert_eq!(idle.distractions, 0);
        assert_eq!(idle.phase(), TimerPhase::Idle);
    }

    #[test]
    fn manual_stop_records_partial_elapsed() {
        let (mut state, config) = state();
        state.set_minutes(10, &config);
        state.start();
        run_ticks(&mut state, 200);
        assert_eq!(state.seconds_left, 400);

        let summary = state.finalize(FinalizeReason::Stopped).unwrap();
        assert_eq!(summary.actual_duration_seconds, 200);
        assert_eq!(summary.target_duration_seconds, 600);
    }

    #[test]
    fn zero_elapsed_finalize_is_discarded() {
        let (mut state, _) = state();
        state.start();
        assert!(state.finalize(FinalizeReason::Stopped).is_none());
        assert_eq!(state.seconds_left, 1500);
        assert!(!state.has_started);

        // Never started at all.
        assert!(state.finalize(FinalizeReason::Stopped).is_none());
    }

    #[test]
    fn elapsed_stays_within_target_bounds() {
        let (mut state, config) = state();
        state.set_minutes(1, &config);
        state.start();
        for _ in 0..200 {
            state.tick();
        }
        // Decrement saturates at zero even if ticks keep arriving.
        assert_eq!(state.seconds_left, 0);
        let summary = state.finalize(FinalizeReason::Completed).unwrap();
        assert!(summary.actual_duration_seconds > 0);
        assert!(summary.actual_duration_seconds <= summary.target_duration_seconds);
    }

    #[test]
    fn minutes_clamped_over_any_step_sequence() {
        let (mut state, config) = state();
        for _ in 0..100 {
            state.step_minutes(5, &config);
            assert!(state.selected_minutes <= config.max_minutes);
        }
        assert_eq!(state.selected_minutes, 60);
        for _ in 0..300 {
            state.step_minutes(-1, &config);
            assert!(state.selected_minutes >= config.min_minutes);
        }
        assert_eq!(state.selected_minutes, 1);
    }

    #[test]
    fn selection_locked_while_started() {
        let (mut state, config) = state();
        state.start();
        state.pause();

        assert!(!state.set_minutes(10, &config));
        assert!(!state.step_minutes(1, &config));
        assert!(!state.select_category("Work", &config));
        assert_eq!(state.selected_minutes, 25);
        assert_eq!(state.category, config.default_category());

        // Unlocks after finalize (ran one second so a record is produced).
        state.resume();
        state.tick();
        assert!(state.finalize(FinalizeReason::Stopped).is_some());
        assert!(state.set_minutes(10, &config));
        assert!(state.select_category("Work", &config));
    }

    #[test]
    fn duration_change_rearms_countdown() {
        let (mut state, config) = state();
        state.start();
        run_ticks(&mut state, 30);
        state.finalize(FinalizeReason::Stopped);

        state.set_minutes(10, &config);
        assert_eq!(state.session_duration_seconds, 600);
        assert_eq!(state.seconds_left, 600);
        assert_eq!(state.distractions, 0);
        assert!(!state.is_running);
    }

    #[test]
    fn unknown_category_rejected() {
        let (mut state, config) = state();
        assert!(!state.select_category("Skydiving", &config));
        assert!(state.select_category("Reading", &config));
        assert_eq!(state.category, "Reading");
    }

    #[test]
    fn start_rearms_after_stale_zero() {
        let (mut state, _) = state();
        state.start();
        while !matches!(state.tick(), TickOutcome::Finished) {}
        state.pause();
        // seconds_left stuck at zero without a finalize; restarting re-arms.
        assert_eq!(state.seconds_left, 0);
        assert!(state.start());
        assert_eq!(state.seconds_left, 1500);
        assert_eq!(state.distractions, 0);
    }

    #[test]
    fn display_time_formats_with_padding() {
        let (mut state, config) = state();
        state.set_minutes(10, &config);
        assert_eq!(state.display_time(), "10:00");
        state.start();
        state.tick();
        assert_eq!(state.display_time(), "09:59");
    }
}
