/// Timer types shared by the timer state machine and its mirrors
use serde::{Deserialize, Serialize};

/// What the timer display shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerMode {
    /// Countdown only
    #[default]
    Timer,
    /// Wall clock only
    Clock,
    /// Countdown and wall clock side by side
    Both,
}

impl TimerMode {
    /// Whether the countdown is part of this mode
    pub fn includes_timer(self) -> bool {
        matches!(self, Self::Timer | Self::Both)
    }

    /// Whether the wall clock is part of this mode
    pub fn includes_clock(self) -> bool {
        matches!(self, Self::Clock | Self::Both)
    }

    /// Convert to string representation
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timer => "timer",
            Self::Clock => "clock",
            Self::Both => "both",
        }
    }
}

impl std::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Run state of the countdown and of the stopwatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Stopped,
    Running,
    Paused,
}

/// Full timer snapshot
///
/// `remaining_time` is derived from an absolute deadline while running and
/// `timer_duration >= remaining_time` always holds, so progress never exceeds
/// 100%.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerState {
    pub mode: TimerMode,

    /// Countdown run state
    pub state: RunState,

    /// Whole seconds left on the countdown
    pub remaining_time: u64,

    /// Progress denominator in seconds
    pub timer_duration: u64,

    /// User-set baseline in seconds
    pub original_duration: u64,

    /// Epoch ms when clock mode was started
    pub start_time: Option<i64>,

    /// Epoch ms of the most recent tick
    pub current_time: i64,

    /// IANA timezone name for the clock display
    pub timezone: String,

    pub stopwatch_state: RunState,

    /// Stopwatch elapsed time in milliseconds
    pub stopwatch_elapsed_time: u64,

    /// Monotonic broadcast revision; mirrors drop anything older
    pub revision: u64,
}

/// Default countdown baseline (5 minutes)
pub const DEFAULT_TIMER_DURATION_SECS: u64 = 300;

/// Default timezone for the clock display
pub const DEFAULT_TIMEZONE: &str = "UTC";

impl Default for TimerState {
    fn default() -> Self {
        Self {
            mode: TimerMode::Timer,
            state: RunState::Stopped,
            remaining_time: DEFAULT_TIMER_DURATION_SECS,
            timer_duration: DEFAULT_TIMER_DURATION_SECS,
            original_duration: DEFAULT_TIMER_DURATION_SECS,
            start_time: None,
            current_time: 0,
            timezone: DEFAULT_TIMEZONE.to_string(),
            stopwatch_state: RunState::Stopped,
            stopwatch_elapsed_time: 0,
            revision: 0,
        }
    }
}

impl TimerState {
    /// Countdown progress in `[0.0, 1.0]`
    pub fn progress(&self) -> f64 {
        if self.timer_duration == 0 {
            return 0.0;
        }
        1.0 - (self.remaining_time as f64 / self.timer_duration as f64)
    }

    /// Lightweight tick view of this snapshot
    pub fn to_tick(&self) -> TimerTick {
        TimerTick {
            remaining_time: self.remaining_time,
            current_time: self.current_time,
            stopwatch_elapsed_time: self.stopwatch_elapsed_time,
            revision: self.revision,
        }
    }
}

/// Lightweight per-second (or continuous, for the stopwatch) update
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerTick {
    pub remaining_time: u64,
    pub current_time: i64,
    pub stopwatch_elapsed_time: u64,
    pub revision: u64,
}

/// Commands accepted by the timer state machine
///
/// Optional fields mirror the loosely-typed wire format: a command that
/// arrives without its argument is a no-op rather than an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum TimerCommand {
    Start,
    Pause,
    Resume,
    Reset,
    SetDuration {
        #[serde(default)]
        duration: Option<u64>,
    },
    AddTime {
        #[serde(default)]
        seconds: Option<u64>,
    },
    RemoveTime {
        #[serde(default)]
        seconds: Option<u64>,
    },
    SetMode {
        #[serde(default)]
        mode: Option<TimerMode>,
    },
    SetTimezone {
        #[serde(default)]
        timezone: Option<String>,
    },
    StopwatchStart,
    StopwatchPause,
    StopwatchResume,
    StopwatchReset,
}

impl TimerCommand {
    /// Command name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Resume => "resume",
            Self::Reset => "reset",
            Self::SetDuration { .. } => "setDuration",
            Self::AddTime { .. } => "addTime",
            Self::RemoveTime { .. } => "removeTime",
            Self::SetMode { .. } => "setMode",
            Self::SetTimezone { .. } => "setTimezone",
            Self::StopwatchStart => "stopwatchStart",
            Self::StopwatchPause => "stopwatchPause",
            Self::StopwatchResume => "stopwatchResume",
            Self::StopwatchReset => "stopwatchReset",
        }
    }
}

/// Partial state used to seed the timer once from persisted settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerSeed {
    #[serde(default)]
    pub mode: Option<TimerMode>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub original_duration: Option<u64>,
}
