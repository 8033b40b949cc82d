//! Task records and completion statistics.
//!
//! Tasks are a sibling feature of the timer: the timer never reads them.
//! Storage lives in [`crate::storage::Database`].

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::identity::UserId;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub user_id: UserId,
    pub text: String,
    pub completed: bool,
    pub created_at: DateTime<Utc>,
    /// Manual ordering hint, unused by the default newest-first listing.
    #[serde(default)]
    pub order: Option<i64>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// Cleared from the list but still counted in statistics.
    #[serde(default)]
    pub hidden: bool,
}

impl Task {
    pub fn new(user_id: UserId, text: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            text: text.trim().to_string(),
            completed: false,
            created_at: Utc::now(),
            order: None,
            completed_at: None,
            hidden: false,
        }
    }

    /// Flip completion, stamping or clearing `completed_at`.
    pub fn toggle(&mut self, now: DateTime<Utc>) {
        self.completed = !self.completed;
        self.completed_at = if self.completed { Some(now) } else { None };
    }
}

/// Partial task update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskPatch {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
    #[serde(default)]
    pub order: Option<i64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.text.is_none() && self.completed.is_none() && self.order.is_none()
    }

    pub fn apply(&self, task: &mut Task) {
        if let Some(text) = &self.text {
            task.text = text.trim().to_string();
        }
        if let Some(completed) = self.completed {
            if completed != task.completed {
                task.toggle(Utc::now());
            }
        }
        if let Some(order) = self.order {
            task.order = Some(order);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub count: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Oldest day first.
    pub daily_counts: Vec<DailyCount>,
    pub total_completed: u32,
}

pub const STATS_WINDOW_DAYS: i64 = 7;

/// Completions per UTC day over the last seven days ending on `now`'s day.
/// Hidden tasks are included.
pub fn completion_stats(tasks: &[Task], now: DateTime<Utc>) -> CompletionStats {
    let completed: Vec<DateTime<Utc>> = tasks.iter().filter_map(|t| t.completed_at).collect();
    let today = now.date_naive();

    let daily_counts = (0..STATS_WINDOW_DAYS)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago);
            let count = completed.iter().filter(|at| at.date_naive() == date).count() as u32;
            DailyCount { date, count }
        })
        .collect();

    CompletionStats {
        daily_counts,
        total_completed: completed.len() as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn user() -> UserId {
        UserId::new("alice").unwrap()
    }

    fn completed_at(at: DateTime<Utc>) -> Task {
        let mut task = Task::new(user(), "x");
        task.toggle(at);
        task
    }

    #[test]
    fn new_task_trims_text() {
        let task = Task::new(user(), "  write report  ");
        assert_eq!(task.text, "write report");
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn toggle_stamps_and_clears_completion() {
        let mut task = Task::new(user(), "a");
        let now = Utc::now();
        task.toggle(now);
        assert!(task.completed);
        assert_eq!(task.completed_at, Some(now));
        task.toggle(now);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
    }

    #[test]
    fn stats_cover_seven_days_oldest_first() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 15, 0, 0).unwrap();
        let tasks = vec![
            completed_at(Utc.with_ymd_and_hms(2026, 3, 10, 0, 0, 0).unwrap()),
            completed_at(Utc.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()),
            completed_at(Utc.with_ymd_and_hms(2026, 3, 4, 23, 59, 59).unwrap()),
            completed_at(Utc.with_ymd_and_hms(2026, 3, 3, 12, 0, 0).unwrap()),
            Task::new(user(), "open"),
        ];

        let stats = completion_stats(&tasks, now);
        assert_eq!(stats.total_completed, 4);
        assert_eq!(stats.daily_counts.len(), 7);
        assert_eq!(
            stats.daily_counts[0].date,
            NaiveDate::from_ymd_opt(2026, 3, 4).unwrap()
        );
        assert_eq!(stats.daily_counts[0].count, 1);
        assert_eq!(stats.daily_counts[6].count, 2);
        let window_total: u32 = stats.daily_counts.iter().map(|d| d.count).sum();
        assert_eq!(window_total, 3);
    }

    #[test]
    fn empty_patch_changes_nothing() {
        let mut task = Task::new(user(), "keep");
        let before = task.clone();
        let patch = TaskPatch::default();
        assert!(patch.is_empty());
        patch.apply(&mut task);
        assert_eq!(task, before);
    }

    #[test]
    fn patch_completion_keeps_timestamp_consistent() {
        let mut task = Task::new(user(), "ship");
        TaskPatch {
            completed: Some(true),
            ..Default::default()
        }
        .apply(&mut task);
        assert!(task.completed);
        assert!(task.completed_at.is_some());

        TaskPatch {
            completed: Some(false),
            text: Some(" ship it ".into()),
            order: Some(3),
        }
        .apply(&mut task);
        assert!(!task.completed);
        assert!(task.completed_at.is_none());
        assert_eq!(task.text, "ship it");
        assert_eq!(task.order, Some(3));
    }
}
