//! # Tomatask Core Library
//!
//! Core logic for Tomatask, a personal task list with a pomodoro focus
//! timer. The CLI binary is a thin presentation layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer**: a single-writer state machine ([`PomodoroEngine`]) advanced
//!   by a one-second [`TickScheduler`], run inside a [`PomodoroSession`]
//! - **Alarm**: best-effort sound on interval completion with a
//!   synthesized-tone fallback
//! - **Settings**: per-user durations and volume, clamped on save and
//!   resolved against fixed defaults
//! - **Storage**: SQLite for settings and tasks, TOML for app configuration
//!
//! ## Key Components
//!
//! - [`PomodoroEngine`]: Core timer state machine
//! - [`PomodoroSession`]: Async driver that owns the engine
//! - [`SettingsResolver`]: Effective settings per identity
//! - [`Database`]: Settings and task persistence
//! - [`Config`]: Application configuration management

pub mod alarm;
pub mod display;
pub mod error;
pub mod events;
pub mod identity;
pub mod session;
pub mod settings;
pub mod storage;
pub mod task;
pub mod timer;

pub use alarm::{AlarmError, AlarmOutcome, AlarmPlayer, Notifier};
pub use error::{ConfigError, CoreError, DatabaseError};
pub use events::Event;
pub use identity::{Identity, UserId};
pub use session::{PomodoroSession, SessionCommand, SessionHandle};
pub use settings::{
    PomodoroSettings, SettingsResolver, SettingsStore, SettingsUpdate, DEFAULT_SETTINGS,
};
pub use storage::{Config, Database};
pub use task::{CompletionStats, DailyCount, Task, TaskPatch};
pub use timer::{duration_secs, PomodoroEngine, PomodoroMode, TickScheduler, TimerSnapshot};
