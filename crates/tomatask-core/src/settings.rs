//! Per-user pomodoro settings and the resolver that keeps them valid.
//!
//! Values are clamped when they are written, so anything read back from a
//! [`SettingsStore`] is already in range and [`resolve`] only has to fill in
//! the defaults for users who never saved anything.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::sync::Mutex;

use crate::error::Result;
use crate::identity::{Identity, UserId};

pub const WORK_DURATION_RANGE: RangeInclusive<u32> = 1..=60;
pub const SHORT_BREAK_RANGE: RangeInclusive<u32> = 1..=30;
pub const LONG_BREAK_RANGE: RangeInclusive<u32> = 1..=60;
pub const SESSIONS_RANGE: RangeInclusive<u32> = 1..=10;
pub const ALARM_VOLUME_RANGE: RangeInclusive<u32> = 0..=100;

/// Effective pomodoro configuration. Durations are whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PomodoroSettings {
    pub work_duration: u32,
    pub short_break_duration: u32,
    pub long_break_duration: u32,
    pub sessions_before_long_break: u32,
    pub alarm_volume: u32,
}

/// Used for anonymous users and users who never saved settings.
pub const DEFAULT_SETTINGS: PomodoroSettings = PomodoroSettings {
    work_duration: 25,
    short_break_duration: 5,
    long_break_duration: 15,
    sessions_before_long_break: 4,
    alarm_volume: 80,
};

impl Default for PomodoroSettings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}

impl PomodoroSettings {
    /// Merge `update` over `self`, clamping every provided field.
    pub fn merged(&self, update: &SettingsUpdate) -> Self {
        let pick = |value: Option<i64>, prior: u32, range: &RangeInclusive<u32>| {
            value.map(|v| clamp_to(v, range)).unwrap_or(prior)
        };
        Self {
            work_duration: pick(update.work_duration, self.work_duration, &WORK_DURATION_RANGE),
            short_break_duration: pick(
                update.short_break_duration,
                self.short_break_duration,
                &SHORT_BREAK_RANGE,
            ),
            long_break_duration: pick(
                update.long_break_duration,
                self.long_break_duration,
                &LONG_BREAK_RANGE,
            ),
            sessions_before_long_break: pick(
                update.sessions_before_long_break,
                self.sessions_before_long_break,
                &SESSIONS_RANGE,
            ),
            alarm_volume: pick(update.alarm_volume, self.alarm_volume, &ALARM_VOLUME_RANGE),
        }
    }
}

/// Partial settings update. Absent fields keep their prior value.
///
/// Inputs are signed so that out-of-range values (including negatives)
/// can be clamped rather than rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettingsUpdate {
    #[serde(default, alias = "workDuration")]
    pub work_duration: Option<i64>,
    #[serde(default, alias = "shortBreakDuration")]
    pub short_break_duration: Option<i64>,
    #[serde(default, alias = "longBreakDuration")]
    pub long_break_duration: Option<i64>,
    #[serde(default, alias = "sessionsBeforeLongBreak")]
    pub sessions_before_long_break: Option<i64>,
    #[serde(default, alias = "alarmVolume")]
    pub alarm_volume: Option<i64>,
}

impl SettingsUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

fn clamp_to(value: i64, range: &RangeInclusive<u32>) -> u32 {
    value.clamp(i64::from(*range.start()), i64::from(*range.end())) as u32
}

/// Persisted settings, or the defaults when nothing was persisted.
pub fn resolve(persisted: Option<PomodoroSettings>) -> PomodoroSettings {
    persisted.unwrap_or(DEFAULT_SETTINGS)
}

/// Durable per-user settings storage.
pub trait SettingsStore {
    fn get(&self, user: &UserId) -> Result<Option<PomodoroSettings>>;
    fn put(&self, user: &UserId, settings: &PomodoroSettings) -> Result<()>;
}

impl<S: SettingsStore + ?Sized> SettingsStore for &S {
    fn get(&self, user: &UserId) -> Result<Option<PomodoroSettings>> {
        (**self).get(user)
    }

    fn put(&self, user: &UserId, settings: &PomodoroSettings) -> Result<()> {
        (**self).put(user, settings)
    }
}

/// Process-local store, used in tests and for throwaway sessions.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    rows: Mutex<HashMap<UserId, PomodoroSettings>>,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemorySettingsStore {
    fn get(&self, user: &UserId) -> Result<Option<PomodoroSettings>> {
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rows.get(user).copied())
    }

    fn put(&self, user: &UserId, settings: &PomodoroSettings) -> Result<()> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        rows.insert(user.clone(), *settings);
        Ok(())
    }
}

/// Reads and saves settings for one identity on top of a [`SettingsStore`].
pub struct SettingsResolver<S> {
    store: S,
}

impl<S: SettingsStore> SettingsResolver<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Effective settings for `identity`. Never fails: anonymous users,
    /// users without a saved row and store errors all yield the defaults.
    pub fn effective(&self, identity: &Identity) -> PomodoroSettings {
        let Some(user) = identity.user() else {
            return DEFAULT_SETTINGS;
        };
        match self.store.get(user) {
            Ok(persisted) => resolve(persisted),
            Err(err) => {
                tracing::warn!(user = %user, error = %err, "Failed to read settings, using defaults");
                DEFAULT_SETTINGS
            }
        }
    }

    /// Clamp and merge `update` over the stored settings (or defaults),
    /// persist the result and return it.
    pub fn save(&self, identity: &Identity, update: &SettingsUpdate) -> Result<PomodoroSettings> {
        let user = identity.require()?;
        let existing = resolve(self.store.get(user)?);
        let merged = existing.merged(update);
        self.store.put(user, &merged)?;
        tracing::debug!(user = %user, ?merged, "Saved pomodoro settings");
        Ok(merged)
    }
}
