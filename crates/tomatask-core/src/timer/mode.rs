use serde::{Deserialize, Serialize};

use crate::settings::PomodoroSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PomodoroMode {
    Work,
    ShortBreak,
    LongBreak,
}

impl PomodoroMode {
    pub fn label(self) -> &'static str {
        match self {
            PomodoroMode::Work => "Work",
            PomodoroMode::ShortBreak => "Short Break",
            PomodoroMode::LongBreak => "Long Break",
        }
    }
}

/// Length of one `mode` interval under `settings`, in seconds.
pub fn duration_secs(mode: PomodoroMode, settings: &PomodoroSettings) -> u32 {
    let minutes = match mode {
        PomodoroMode::Work => settings.work_duration,
        PomodoroMode::ShortBreak => settings.short_break_duration,
        PomodoroMode::LongBreak => settings.long_break_duration,
    };
    minutes.saturating_mul(60)
}
