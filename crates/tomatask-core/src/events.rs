use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::settings::PomodoroSettings;
use crate::timer::PomodoroMode;

/// Every state change of the pomodoro engine produces an Event.
/// The presentation layer renders them; the session uses
/// `TimerCompleted` to ring the alarm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: PomodoroMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: PomodoroMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: PomodoroMode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    /// The user skipped the rest of `from`.
    TimerSkipped {
        from: PomodoroMode,
        to: PomodoroMode,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    /// The countdown for `finished` reached zero and the engine advanced.
    TimerCompleted {
        finished: PomodoroMode,
        next: PomodoroMode,
        next_duration_secs: u32,
        completed_sessions: u32,
        at: DateTime<Utc>,
    },
    SettingsApplied {
        settings: PomodoroSettings,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn is_completion(&self) -> bool {
        matches!(self, Event::TimerCompleted { .. })
    }
}
