//! Timer state machine
//!
//! Owns the countdown, the wall clock stamp, and the stopwatch. While the
//! countdown runs, `remaining_time` is always recomputed from an absolute
//! deadline (`target_end_time`), so scheduler jitter on the tick never
//! accumulates.

use crate::events::TimerEvent;
use lectern_core::{
    Clock, RunState, TimerCommand, TimerMode, TimerSeed, TimerState, DEFAULT_TIMER_DURATION_SECS,
    DEFAULT_TIMEZONE,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Initial settings for a freshly constructed machine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerConfig {
    /// Countdown baseline in seconds
    pub default_duration_secs: u64,

    pub default_mode: TimerMode,

    /// IANA timezone for the clock display
    pub default_timezone: String,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            default_duration_secs: DEFAULT_TIMER_DURATION_SECS,
            default_mode: TimerMode::Timer,
            default_timezone: DEFAULT_TIMEZONE.to_string(),
        }
    }
}

/// Longest countdown the machine accepts: 99:59:59
///
/// Larger durations, added time, and seeds are clamped to it.
pub const MAX_DURATION_SECS: u64 = 359_999;

/// `secs` as milliseconds, clamped to [`MAX_DURATION_SECS`]
fn secs_to_ms(secs: u64) -> i64 {
    secs.min(MAX_DURATION_SECS) as i64 * 1000
}

/// Absolute deadline `secs` after `now`
fn deadline(now: i64, secs: u64) -> i64 {
    now.saturating_add(secs_to_ms(secs))
}

/// Whole seconds left until `target`, rounded up
fn remaining_until(target: i64, now: i64) -> u64 {
    let ms = target.saturating_sub(now);
    if ms <= 0 {
        0
    } else {
        ((ms + 999) / 1000) as u64
    }
}

/// Countdown / clock / stopwatch state machine
///
/// Pure and synchronous: commands and ticks mutate state and queue
/// [`TimerEvent`]s, which the owner collects with [`drain_events`].
///
/// [`drain_events`]: TimerMachine::drain_events
pub struct TimerMachine {
    state: TimerState,

    /// Absolute deadline (epoch ms) while the countdown runs
    target_end_time: Option<i64>,

    /// Epoch ms the stopwatch would have started at, had it never paused
    stopwatch_start_time: Option<i64>,

    /// `(remaining_time, current second)` last put on the wire
    last_display: Option<(u64, i64)>,

    clock: Arc<dyn Clock>,

    pending_events: Vec<TimerEvent>,
}

impl TimerMachine {
    /// Create a stopped machine from `config`
    pub fn new(clock: Arc<dyn Clock>, config: TimerConfig) -> Self {
        let now = clock.now_ms();
        let duration = config.default_duration_secs.min(MAX_DURATION_SECS);
        let state = TimerState {
            mode: config.default_mode,
            remaining_time: duration,
            timer_duration: duration,
            original_duration: duration,
            timezone: config.default_timezone,
            current_time: now,
            ..TimerState::default()
        };

        let last_display = Some((state.remaining_time, now.div_euclid(1000)));

        Self {
            state,
            target_end_time: None,
            stopwatch_start_time: None,
            last_display,
            clock,
            pending_events: Vec::new(),
        }
    }

    // ===== Commands =====

    /// Apply a command and queue a full snapshot
    ///
    /// Commands missing their argument are dropped without a broadcast.
    /// Transitions that are invalid from the current state (pausing a
    /// stopped timer, ...) change nothing but still re-broadcast the
    /// snapshot.
    pub fn handle_command(&mut self, command: TimerCommand) {
        let now = self.clock.now_ms();
        self.state.current_time = now;
        let name = command.name();

        match command {
            TimerCommand::Start => self.start(now),
            TimerCommand::Pause => self.pause(now),
            TimerCommand::Resume => self.resume(now),
            TimerCommand::Reset => self.reset(),
            TimerCommand::SetDuration { duration } => {
                let Some(duration) = duration else {
                    debug!(command = name, "Ignoring command without duration");
                    return;
                };
                self.set_duration(duration);
            }
            TimerCommand::AddTime { seconds } => {
                let Some(seconds) = seconds else {
                    debug!(command = name, "Ignoring command without seconds");
                    return;
                };
                self.add_time(seconds);
            }
            TimerCommand::RemoveTime { seconds } => {
                let Some(seconds) = seconds else {
                    debug!(command = name, "Ignoring command without seconds");
                    return;
                };
                self.remove_time(seconds);
            }
            TimerCommand::SetMode { mode } => {
                let Some(mode) = mode else {
                    debug!(command = name, "Ignoring command without mode");
                    return;
                };
                self.set_mode(mode, now);
            }
            TimerCommand::SetTimezone { timezone } => {
                let Some(timezone) = timezone.filter(|tz| !tz.trim().is_empty()) else {
                    debug!(command = name, "Ignoring command without timezone");
                    return;
                };
                self.state.timezone = timezone;
            }
            TimerCommand::StopwatchStart => self.stopwatch_start(now),
            TimerCommand::StopwatchPause => self.stopwatch_pause(now),
            TimerCommand::StopwatchResume => self.stopwatch_resume(now),
            TimerCommand::StopwatchReset => self.stopwatch_reset(),
        }

        debug!(
            command = name,
            state = ?self.state.state,
            remaining = self.state.remaining_time,
            "Timer command applied"
        );
        self.emit_state_changed();
    }

    /// Seed mode, timezone, and baseline from persisted settings
    pub fn apply_seed(&mut self, seed: TimerSeed) {
        if let Some(mode) = seed.mode {
            self.state.mode = mode;
        }
        if let Some(timezone) = seed.timezone.filter(|tz| !tz.trim().is_empty()) {
            self.state.timezone = timezone;
        }
        if let Some(duration) = seed.original_duration {
            let duration = duration.min(MAX_DURATION_SECS);
            self.state.original_duration = duration;
            if self.state.state == RunState::Stopped {
                self.state.remaining_time = duration;
                self.state.timer_duration = duration;
            }
        }

        self.state.current_time = self.clock.now_ms();
        self.emit_state_changed();
    }

    fn start(&mut self, now: i64) {
        if self.state.mode.includes_timer() {
            let duration = self.state.original_duration;
            self.state.remaining_time = duration;
            self.state.timer_duration = duration;
            self.target_end_time = Some(deadline(now, duration));
        }
        if self.state.mode.includes_clock() {
            self.state.start_time = Some(now);
        }
        self.state.state = RunState::Running;
    }

    fn pause(&mut self, now: i64) {
        if self.state.state != RunState::Running {
            return;
        }
        if let Some(target) = self.target_end_time.take() {
            self.state.remaining_time = remaining_until(target, now);
        }
        self.state.state = RunState::Paused;
    }

    fn resume(&mut self, now: i64) {
        if self.state.state != RunState::Paused {
            return;
        }
        self.target_end_time = Some(deadline(now, self.state.remaining_time));
        self.state.state = RunState::Running;
    }

    fn reset(&mut self) {
        self.state.state = RunState::Stopped;
        self.state.remaining_time = self.state.original_duration;
        self.state.timer_duration = self.state.original_duration;
        self.state.start_time = None;
        self.target_end_time = None;
    }

    fn set_duration(&mut self, duration: u64) {
        let duration = duration.min(MAX_DURATION_SECS);
        self.state.original_duration = duration;
        if self.state.state == RunState::Stopped {
            self.state.timer_duration = duration;
            self.state.remaining_time = duration;
        }
    }

    fn add_time(&mut self, seconds: u64) {
        if self.state.state == RunState::Stopped {
            let baseline = self.state.original_duration.saturating_add(seconds);
            self.set_duration(baseline);
            return;
        }

        let remaining = self
            .state
            .remaining_time
            .saturating_add(seconds)
            .min(MAX_DURATION_SECS);
        let added = remaining.saturating_sub(self.state.remaining_time);
        self.state.remaining_time = remaining;
        if let Some(target) = self.target_end_time.as_mut() {
            *target = target.saturating_add(secs_to_ms(added));
        }
        self.raise_duration();
    }

    fn remove_time(&mut self, seconds: u64) {
        if self.state.state == RunState::Stopped {
            let baseline = self.state.original_duration.saturating_sub(seconds);
            self.set_duration(baseline);
            return;
        }

        let remaining = self.state.remaining_time.saturating_sub(seconds);
        let removed = self.state.remaining_time - remaining;
        self.state.remaining_time = remaining;
        if let Some(target) = self.target_end_time.as_mut() {
            *target = target.saturating_sub(secs_to_ms(removed));
        }
        self.raise_duration();
    }

    /// Keep `timer_duration >= remaining_time`
    fn raise_duration(&mut self) {
        self.state.timer_duration = self.state.timer_duration.max(self.state.remaining_time);
    }

    fn set_mode(&mut self, mode: TimerMode, now: i64) {
        self.state.mode = mode;
        if mode.includes_clock() && self.state.start_time.is_none() {
            self.state.start_time = Some(now);
        }
    }

    // ===== Stopwatch =====

    fn stopwatch_start(&mut self, now: i64) {
        if self.state.stopwatch_state != RunState::Stopped {
            return;
        }
        self.state.stopwatch_elapsed_time = 0;
        self.stopwatch_start_time = Some(now);
        self.state.stopwatch_state = RunState::Running;
    }

    fn stopwatch_pause(&mut self, now: i64) {
        if self.state.stopwatch_state != RunState::Running {
            return;
        }
        if let Some(start) = self.stopwatch_start_time.take() {
            self.state.stopwatch_elapsed_time = now.saturating_sub(start).max(0) as u64;
        }
        self.state.stopwatch_state = RunState::Paused;
    }

    fn stopwatch_resume(&mut self, now: i64) {
        if self.state.stopwatch_state != RunState::Paused {
            return;
        }
        let elapsed = i64::try_from(self.state.stopwatch_elapsed_time).unwrap_or(i64::MAX);
        self.stopwatch_start_time = Some(now.saturating_sub(elapsed));
        self.state.stopwatch_state = RunState::Running;
    }

    fn stopwatch_reset(&mut self) {
        self.state.stopwatch_state = RunState::Stopped;
        self.state.stopwatch_elapsed_time = 0;
        self.stopwatch_start_time = None;
    }

    // ===== Tick =====

    /// Advance to the clock's current instant
    ///
    /// Queues a full snapshot when the countdown finishes, otherwise a
    /// lightweight tick when the displayed second changed or the stopwatch
    /// is running.
    pub fn tick(&mut self) {
        let now = self.clock.now_ms();
        self.state.current_time = now;

        if self.state.stopwatch_state == RunState::Running {
            if let Some(start) = self.stopwatch_start_time {
                self.state.stopwatch_elapsed_time = now.saturating_sub(start).max(0) as u64;
            }
        }

        if self.state.state == RunState::Running {
            if let Some(target) = self.target_end_time {
                let remaining = remaining_until(target, now);
                self.state.remaining_time = remaining;

                if remaining == 0 {
                    info!(
                        overshoot_ms = now.saturating_sub(target),
                        duration = self.state.timer_duration,
                        "Countdown finished"
                    );
                    self.state.state = RunState::Stopped;
                    self.target_end_time = None;
                    self.emit_state_changed();
                    return;
                }
            }
        }

        let stopwatch_running = self.state.stopwatch_state == RunState::Running;
        if stopwatch_running || self.last_display != Some(self.display_key()) {
            self.emit_tick();
        }
    }

    // ===== State Queries =====

    /// Current snapshot
    pub fn state(&self) -> &TimerState {
        &self.state
    }

    /// Absolute countdown deadline, if running
    pub fn target_end_time(&self) -> Option<i64> {
        self.target_end_time
    }

    // ===== Events =====

    /// Drain all pending events
    pub fn drain_events(&mut self) -> Vec<TimerEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Check if there are pending events
    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    fn display_key(&self) -> (u64, i64) {
        (
            self.state.remaining_time,
            self.state.current_time.div_euclid(1000),
        )
    }

    fn emit_state_changed(&mut self) {
        self.state.revision += 1;
        self.last_display = Some(self.display_key());
        self.pending_events
            .push(TimerEvent::StateChanged(self.state.clone()));
    }

    fn emit_tick(&mut self) {
        self.state.revision += 1;
        self.last_display = Some(self.display_key());
        self.pending_events.push(TimerEvent::Tick(self.state.to_tick()));
    }
}

impl std::fmt::Debug for TimerMachine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerMachine")
            .field("state", &self.state)
            .field("target_end_time", &self.target_end_time)
            .field("stopwatch_start_time", &self.stopwatch_start_time)
            .field("pending_events", &self.pending_events.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lectern_core::ManualClock;

    const T0: i64 = 1_700_000_000_000;

    fn machine() -> (TimerMachine, ManualClock) {
        let clock = ManualClock::new(T0);
        let machine = TimerMachine::new(Arc::new(clock.clone()), TimerConfig::default());
        (machine, clock)
    }

    #[test]
    fn remaining_rounds_up() {
        assert_eq!(remaining_until(T0 + 1000, T0), 1);
        assert_eq!(remaining_until(T0 + 1001, T0), 2);
        assert_eq!(remaining_until(T0 + 1, T0), 1);
        assert_eq!(remaining_until(T0, T0), 0);
        assert_eq!(remaining_until(T0 - 500, T0), 0);
    }

    #[test]
    fn start_sets_deadline_from_baseline() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::SetDuration {
            duration: Some(90),
        });
        m.handle_command(TimerCommand::Start);

        assert_eq!(m.state().state, RunState::Running);
        assert_eq!(m.state().remaining_time, 90);
        assert_eq!(m.state().timer_duration, 90);
        assert_eq!(m.target_end_time(), Some(T0 + 90_000));
        assert_eq!(m.state().start_time, None);
    }

    #[test]
    fn start_in_clock_mode_stamps_start_time() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::SetMode {
            mode: Some(TimerMode::Clock),
        });
        m.handle_command(TimerCommand::Start);

        assert_eq!(m.state().start_time, Some(T0));
        assert_eq!(m.target_end_time(), None);
    }

    #[test]
    fn pause_freezes_and_resume_recomputes() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::Start);
        clock.advance(10_400);
        m.handle_command(TimerCommand::Pause);

        assert_eq!(m.state().state, RunState::Paused);
        assert_eq!(m.state().remaining_time, 290);
        assert_eq!(m.target_end_time(), None);

        // Time spent paused does not count
        clock.advance(60_000);
        m.tick();
        assert_eq!(m.state().remaining_time, 290);

        m.handle_command(TimerCommand::Resume);
        assert_eq!(m.target_end_time(), Some(T0 + 70_400 + 290_000));
    }

    #[test]
    fn invalid_transitions_change_nothing() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::Pause);
        assert_eq!(m.state().state, RunState::Stopped);
        m.handle_command(TimerCommand::Resume);
        assert_eq!(m.state().state, RunState::Stopped);

        m.handle_command(TimerCommand::Start);
        m.handle_command(TimerCommand::Resume);
        assert_eq!(m.state().state, RunState::Running);
    }

    #[test]
    fn reset_restores_baseline() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::Start);
        clock.advance(5_000);
        m.tick();
        m.handle_command(TimerCommand::Reset);

        let state = m.state();
        assert_eq!(state.state, RunState::Stopped);
        assert_eq!(state.remaining_time, 300);
        assert_eq!(state.timer_duration, 300);
        assert_eq!(state.start_time, None);
        assert_eq!(m.target_end_time(), None);
    }

    #[test]
    fn set_duration_leaves_running_countdown_alone() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::Start);
        m.handle_command(TimerCommand::SetDuration {
            duration: Some(60),
        });

        assert_eq!(m.state().original_duration, 60);
        assert_eq!(m.state().remaining_time, 300);
        assert_eq!(m.state().timer_duration, 300);
    }

    #[test]
    fn missing_arguments_are_silent_noops() {
        let (mut m, _) = machine();
        let before = m.state().clone();

        m.handle_command(TimerCommand::SetDuration { duration: None });
        m.handle_command(TimerCommand::AddTime { seconds: None });
        m.handle_command(TimerCommand::RemoveTime { seconds: None });
        m.handle_command(TimerCommand::SetMode { mode: None });
        m.handle_command(TimerCommand::SetTimezone { timezone: None });
        m.handle_command(TimerCommand::SetTimezone {
            timezone: Some("  ".into()),
        });

        assert_eq!(m.state(), &before);
        assert!(!m.has_pending_events());
    }

    #[test]
    fn add_and_remove_time_when_stopped_move_baseline() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::AddTime { seconds: Some(60) });
        assert_eq!(m.state().original_duration, 360);
        assert_eq!(m.state().remaining_time, 360);

        m.handle_command(TimerCommand::RemoveTime {
            seconds: Some(1_000),
        });
        assert_eq!(m.state().original_duration, 0);
        assert_eq!(m.state().remaining_time, 0);
        assert_eq!(m.state().timer_duration, 0);
    }

    #[test]
    fn remove_time_while_running_pulls_deadline_in() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::Start);
        m.handle_command(TimerCommand::RemoveTime {
            seconds: Some(100),
        });

        assert_eq!(m.state().remaining_time, 200);
        assert_eq!(m.state().timer_duration, 300);
        assert_eq!(m.target_end_time(), Some(T0 + 200_000));

        m.handle_command(TimerCommand::RemoveTime {
            seconds: Some(500),
        });
        assert_eq!(m.state().remaining_time, 0);
        assert_eq!(m.target_end_time(), Some(T0));
    }

    #[test]
    fn oversized_durations_are_clamped() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::SetDuration {
            duration: Some(10_000_000_000_000_000),
        });
        assert_eq!(m.state().original_duration, MAX_DURATION_SECS);

        m.handle_command(TimerCommand::Start);
        assert_eq!(m.state().state, RunState::Running);
        assert_eq!(m.state().remaining_time, MAX_DURATION_SECS);
        assert_eq!(
            m.target_end_time(),
            Some(T0 + MAX_DURATION_SECS as i64 * 1000)
        );

        // Still running after a tick
        clock.advance(100);
        m.tick();
        assert_eq!(m.state().state, RunState::Running);
        assert_eq!(m.state().remaining_time, MAX_DURATION_SECS);
    }

    #[test]
    fn max_u64_duration_does_not_wrap() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::SetDuration {
            duration: Some(u64::MAX),
        });
        m.handle_command(TimerCommand::Start);
        assert!(m.target_end_time().unwrap() > T0);

        clock.advance(100);
        m.tick();
        assert_eq!(m.state().state, RunState::Running);
        assert!(m.state().timer_duration >= m.state().remaining_time);
    }

    #[test]
    fn huge_add_time_while_running_is_clamped() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::Start);
        m.handle_command(TimerCommand::AddTime {
            seconds: Some(u64::MAX),
        });

        assert_eq!(m.state().remaining_time, MAX_DURATION_SECS);
        assert_eq!(m.state().timer_duration, MAX_DURATION_SECS);
        assert_eq!(
            m.target_end_time(),
            Some(T0 + MAX_DURATION_SECS as i64 * 1000)
        );

        m.handle_command(TimerCommand::AddTime {
            seconds: Some(u64::MAX),
        });
        assert_eq!(m.state().remaining_time, MAX_DURATION_SECS);
        assert_eq!(
            m.target_end_time(),
            Some(T0 + MAX_DURATION_SECS as i64 * 1000)
        );
    }

    #[test]
    fn oversized_seed_is_clamped() {
        let (mut m, _) = machine();
        m.apply_seed(TimerSeed {
            original_duration: Some(u64::MAX),
            ..TimerSeed::default()
        });
        assert_eq!(m.state().original_duration, MAX_DURATION_SECS);
        assert_eq!(m.state().remaining_time, MAX_DURATION_SECS);
    }

    #[test]
    fn add_time_while_paused_raises_duration_without_deadline() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::Start);
        m.handle_command(TimerCommand::Pause);
        m.handle_command(TimerCommand::AddTime { seconds: Some(30) });

        assert_eq!(m.state().remaining_time, 330);
        assert_eq!(m.state().timer_duration, 330);
        assert_eq!(m.target_end_time(), None);
    }

    #[test]
    fn set_mode_keeps_countdown_running() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::Start);
        clock.advance(2_000);
        m.handle_command(TimerCommand::SetMode {
            mode: Some(TimerMode::Both),
        });

        assert_eq!(m.state().state, RunState::Running);
        assert_eq!(m.state().start_time, Some(T0 + 2_000));
        assert_eq!(m.target_end_time(), Some(T0 + 300_000));
    }

    #[test]
    fn timezone_is_stored_verbatim() {
        let (mut m, _) = machine();
        m.handle_command(TimerCommand::SetTimezone {
            timezone: Some("Europe/Ljubljana".into()),
        });
        assert_eq!(m.state().timezone, "Europe/Ljubljana");
    }

    #[test]
    fn stopwatch_lifecycle() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::StopwatchStart);
        clock.advance(1_250);
        m.tick();
        assert_eq!(m.state().stopwatch_elapsed_time, 1_250);

        m.handle_command(TimerCommand::StopwatchPause);
        clock.advance(10_000);
        m.tick();
        assert_eq!(m.state().stopwatch_state, RunState::Paused);
        assert_eq!(m.state().stopwatch_elapsed_time, 1_250);

        m.handle_command(TimerCommand::StopwatchResume);
        clock.advance(750);
        m.tick();
        assert_eq!(m.state().stopwatch_elapsed_time, 2_000);

        m.handle_command(TimerCommand::StopwatchReset);
        assert_eq!(m.state().stopwatch_state, RunState::Stopped);
        assert_eq!(m.state().stopwatch_elapsed_time, 0);
    }

    #[test]
    fn stopwatch_start_only_from_stopped() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::StopwatchStart);
        clock.advance(3_000);
        m.handle_command(TimerCommand::StopwatchStart);
        m.tick();
        assert_eq!(m.state().stopwatch_elapsed_time, 3_000);
    }

    #[test]
    fn every_event_has_a_fresh_revision() {
        let (mut m, clock) = machine();
        m.handle_command(TimerCommand::Start);
        for _ in 0..30 {
            clock.advance(100);
            m.tick();
        }
        m.handle_command(TimerCommand::Pause);

        let revisions: Vec<u64> = m.drain_events().iter().map(TimerEvent::revision).collect();
        assert!(revisions.len() >= 3);
        assert!(revisions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(*revisions.last().unwrap(), m.state().revision);
    }

    #[test]
    fn apply_seed_resets_stopped_baseline() {
        let (mut m, _) = machine();
        m.apply_seed(TimerSeed {
            mode: Some(TimerMode::Both),
            timezone: Some("America/Chicago".into()),
            original_duration: Some(900),
        });

        let state = m.state();
        assert_eq!(state.mode, TimerMode::Both);
        assert_eq!(state.timezone, "America/Chicago");
        assert_eq!(state.remaining_time, 900);
        assert_eq!(state.timer_duration, 900);
        assert!(matches!(
            m.drain_events().as_slice(),
            [TimerEvent::StateChanged(_)]
        ));
    }
}
