//! Pomodoro state machine.
//!
//! The engine is the single owner of timer state. It does not keep time
//! itself: the [`TickScheduler`](super::TickScheduler) calls `tick()` once
//! per elapsed second while the engine reports `is_counting()`.
//!
//! ## Transitions
//!
//! ```text
//! Work --(zero / skip)--> ShortBreak | LongBreak --(zero / skip)--> Work
//! ```
//!
//! A zero-crossing is handled entirely inside `tick()`: the countdown stops,
//! the engine advances once and a `TimerCompleted` event is returned for the
//! caller to ring the alarm. There is no separate observer that could fire
//! the advancement twice.

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::mode::{duration_secs, PomodoroMode};
use crate::events::Event;
use crate::settings::PomodoroSettings;

/// Read-only view for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub mode: PomodoroMode,
    pub remaining_secs: u32,
    pub total_secs: u32,
    pub running: bool,
    pub completed_sessions: u32,
    /// 0.0 .. 1.0 progress within the current interval.
    pub progress: f64,
    pub settings: PomodoroSettings,
}

#[derive(Debug, Clone)]
pub struct PomodoroEngine {
    settings: PomodoroSettings,
    mode: PomodoroMode,
    remaining_secs: u32,
    running: bool,
    completed_sessions: u32,
    /// No second of the current interval has elapsed yet.
    untouched: bool,
}

impl PomodoroEngine {
    /// Fresh engine: idle, in `Work`, with a full work interval.
    pub fn new(settings: PomodoroSettings) -> Self {
        Self {
            settings,
            mode: PomodoroMode::Work,
            remaining_secs: duration_secs(PomodoroMode::Work, &settings),
            running: false,
            completed_sessions: 0,
            untouched: true,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn mode(&self) -> PomodoroMode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// True while the tick scheduler should be active.
    pub fn is_counting(&self) -> bool {
        self.running && self.remaining_secs > 0
    }

    pub fn completed_sessions(&self) -> u32 {
        self.completed_sessions
    }

    pub fn settings(&self) -> &PomodoroSettings {
        &self.settings
    }

    pub fn total_secs(&self) -> u32 {
        duration_secs(self.mode, &self.settings)
    }

    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - f64::from(self.remaining_secs) / f64::from(total)).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> TimerSnapshot {
        TimerSnapshot {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs(),
            running: self.running,
            completed_sessions: self.completed_sessions,
            progress: self.progress(),
            settings: self.settings,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Returns `None` if already running.
    pub fn start(&mut self) -> Option<Event> {
        if self.running {
            return None;
        }
        self.running = true;
        tracing::debug!(mode = ?self.mode, remaining = self.remaining_secs, "Timer started");
        Some(Event::TimerStarted {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Returns `None` if not running.
    pub fn pause(&mut self) -> Option<Event> {
        if !self.running {
            return None;
        }
        self.running = false;
        tracing::debug!(mode = ?self.mode, remaining = self.remaining_secs, "Timer paused");
        Some(Event::TimerPaused {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Stop and refill the current mode. Mode and session count are kept.
    pub fn reset(&mut self) -> Event {
        self.running = false;
        self.remaining_secs = self.total_secs();
        self.untouched = true;
        Event::TimerReset {
            mode: self.mode,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    /// Stop and advance exactly as a zero-crossing would, without an alarm.
    pub fn skip(&mut self) -> Event {
        let from = self.mode;
        self.running = false;
        self.advance();
        tracing::debug!(?from, to = ?self.mode, "Interval skipped");
        Event::TimerSkipped {
            from,
            to: self.mode,
            completed_sessions: self.completed_sessions,
            at: Utc::now(),
        }
    }

    /// One elapsed second. Returns `Some(Event::TimerCompleted)` on the
    /// zero-crossing, after the engine has already advanced.
    pub fn tick(&mut self) -> Option<Event> {
        if !self.is_counting() {
            return None;
        }
        self.untouched = false;
        if self.remaining_secs > 1 {
            self.remaining_secs -= 1;
            return None;
        }

        self.remaining_secs = 0;
        self.running = false;
        let finished = self.mode;
        self.advance();
        tracing::info!(
            ?finished,
            next = ?self.mode,
            completed_sessions = self.completed_sessions,
            "Interval completed"
        );
        Some(Event::TimerCompleted {
            finished,
            next: self.mode,
            next_duration_secs: self.remaining_secs,
            completed_sessions: self.completed_sessions,
            at: Utc::now(),
        })
    }

    /// Swap in freshly resolved settings.
    ///
    /// While running, the countdown is left alone; only later resets and
    /// advancements see the new durations. While stopped, an interval with
    /// no elapsed seconds (or at zero) is refilled to the new length and a
    /// partially used one is capped at it.
    pub fn apply_settings(&mut self, settings: PomodoroSettings) -> Event {
        self.settings = settings;
        if !self.running {
            let new_total = self.total_secs();
            self.remaining_secs = if self.untouched || self.remaining_secs == 0 {
                new_total
            } else {
                self.remaining_secs.min(new_total)
            };
        }
        Event::SettingsApplied {
            settings,
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn advance(&mut self) {
        self.mode = match self.mode {
            PomodoroMode::Work => {
                self.completed_sessions += 1;
                let cadence = self.settings.sessions_before_long_break;
                if cadence > 0 && self.completed_sessions % cadence == 0 {
                    PomodoroMode::LongBreak
                } else {
                    PomodoroMode::ShortBreak
                }
            }
            PomodoroMode::ShortBreak | PomodoroMode::LongBreak => PomodoroMode::Work,
        };
        self.remaining_secs = self.total_secs();
        self.untouched = true;
    }
}
