//! Task storage on top of [`Database`].
//!
//! Every mutation requires an authenticated identity; reads by an
//! anonymous identity see nothing. Tasks owned by another user behave as
//! if they did not exist.

use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension, Row};
use uuid::Uuid;

use super::Database;
use crate::error::{CoreError, Result};
use crate::identity::{Identity, UserId};
use crate::task::{completion_stats, CompletionStats, Task, TaskPatch};

const TASK_COLUMNS: &str =
    "id, user_id, text, completed, created_at, sort_order, completed_at, hidden";

/// Parse datetime from RFC3339 string with fallback to current time
fn parse_datetime_fallback(dt_str: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(dt_str)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

fn row_to_task(row: &Row) -> Result<Task, rusqlite::Error> {
    let id: String = row.get(0)?;
    let user_id: String = row.get(1)?;
    let created_at: String = row.get(4)?;
    let completed_at: Option<String> = row.get(6)?;
    Ok(Task {
        id: Uuid::parse_str(&id).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
        })?,
        user_id: UserId::new(user_id).ok_or(rusqlite::Error::InvalidColumnType(
            1,
            "user_id".into(),
            rusqlite::types::Type::Text,
        ))?,
        text: row.get(2)?,
        completed: row.get(3)?,
        created_at: parse_datetime_fallback(&created_at),
        order: row.get(5)?,
        completed_at: completed_at.as_deref().map(parse_datetime_fallback),
        hidden: row.get(7)?,
    })
}

impl Database {
    fn load_task(&self, user: &UserId, id: Uuid) -> Result<Option<Task>> {
        let task = self
            .conn()
            .query_row(
                &format!("SELECT {TASK_COLUMNS} FROM todos WHERE id = ?1 AND user_id = ?2"),
                params![id.to_string(), user.as_str()],
                row_to_task,
            )
            .optional()?;
        Ok(task)
    }

    fn all_tasks(&self, user: &UserId) -> Result<Vec<Task>> {
        let mut stmt = self.conn().prepare(&format!(
            "SELECT {TASK_COLUMNS} FROM todos WHERE user_id = ?1 ORDER BY created_at DESC"
        ))?;
        let rows = stmt.query_map(params![user.as_str()], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    fn write_task(&self, task: &Task) -> Result<()> {
        self.conn().execute(
            "INSERT OR REPLACE INTO todos
                 (id, user_id, text, completed, created_at, sort_order, completed_at, hidden)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                task.id.to_string(),
                task.user_id.as_str(),
                task.text,
                task.completed,
                task.created_at.to_rfc3339(),
                task.order,
                task.completed_at.map(|at| at.to_rfc3339()),
                task.hidden,
            ],
        )?;
        Ok(())
    }

    fn owned_task(&self, user: &UserId, id: Uuid) -> Result<Task> {
        self.load_task(user, id)?
            .ok_or_else(|| CoreError::TaskNotFound { id: id.to_string() })
    }

    pub fn create_task(&self, identity: &Identity, text: &str) -> Result<Task> {
        let user = identity.require()?;
        let task = Task::new(user.clone(), text);
        self.write_task(&task)?;
        Ok(task)
    }

    /// Visible tasks, newest first.
    pub fn list_tasks(&self, identity: &Identity) -> Result<Vec<Task>> {
        let Some(user) = identity.user() else {
            return Ok(Vec::new());
        };
        Ok(self
            .all_tasks(user)?
            .into_iter()
            .filter(|t| !t.hidden)
            .collect())
    }

    pub fn get_task(&self, identity: &Identity, id: Uuid) -> Result<Option<Task>> {
        match identity.user() {
            Some(user) => self.load_task(user, id),
            None => Ok(None),
        }
    }

    pub fn update_task(&self, identity: &Identity, id: Uuid, patch: &TaskPatch) -> Result<Uuid> {
        let user = identity.require()?;
        let mut task = self.owned_task(user, id)?;
        if patch.is_empty() {
            return Ok(id);
        }
        patch.apply(&mut task);
        self.write_task(&task)?;
        Ok(id)
    }

    pub fn toggle_task(&self, identity: &Identity, id: Uuid) -> Result<Task> {
        let user = identity.require()?;
        let mut task = self.owned_task(user, id)?;
        task.toggle(Utc::now());
        self.write_task(&task)?;
        Ok(task)
    }

    pub fn remove_task(&self, identity: &Identity, id: Uuid) -> Result<Uuid> {
        let user = identity.require()?;
        self.owned_task(user, id)?;
        self.conn().execute(
            "DELETE FROM todos WHERE id = ?1 AND user_id = ?2",
            params![id.to_string(), user.as_str()],
        )?;
        Ok(id)
    }

    /// Hide completed tasks. They still count in statistics.
    pub fn clear_completed_tasks(&self, identity: &Identity) -> Result<usize> {
        let user = identity.require()?;
        let hidden = self.conn().execute(
            "UPDATE todos SET hidden = 1 WHERE user_id = ?1 AND completed = 1 AND hidden = 0",
            params![user.as_str()],
        )?;
        Ok(hidden)
    }

    pub fn clear_all_tasks(&self, identity: &Identity) -> Result<usize> {
        let user = identity.require()?;
        let deleted = self
            .conn()
            .execute("DELETE FROM todos WHERE user_id = ?1", params![user.as_str()])?;
        Ok(deleted)
    }

    pub fn completion_stats(&self, identity: &Identity, now: DateTime<Utc>) -> Result<CompletionStats> {
        let Some(user) = identity.user() else {
            return Ok(CompletionStats::default());
        };
        Ok(completion_stats(&self.all_tasks(user)?, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alice() -> Identity {
        Identity::from_option(UserId::new("alice"))
    }

    fn bob() -> Identity {
        Identity::from_option(UserId::new("bob"))
    }

    #[test]
    fn create_and_list_newest_first() {
        let db = Database::open_memory().unwrap();
        let first = db.create_task(&alice(), "first").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = db.create_task(&alice(), "  second ").unwrap();

        let tasks = db.list_tasks(&alice()).unwrap();
        assert_eq!(tasks.len(), 2);
        assert_eq!(tasks[0].id, second.id);
        assert_eq!(tasks[0].text, "second");
        assert_eq!(tasks[1].id, first.id);
    }

    #[test]
    fn anonymous_reads_nothing_and_cannot_write() {
        let db = Database::open_memory().unwrap();
        db.create_task(&alice(), "mine").unwrap();
        assert!(db.list_tasks(&Identity::Anonymous).unwrap().is_empty());
        assert!(matches!(
            db.create_task(&Identity::Anonymous, "x"),
            Err(CoreError::Unauthenticated)
        ));
        assert!(matches!(
            db.clear_all_tasks(&Identity::Anonymous),
            Err(CoreError::Unauthenticated)
        ));
    }

    #[test]
    fn foreign_tasks_are_not_found() {
        let db = Database::open_memory().unwrap();
        let task = db.create_task(&alice(), "mine").unwrap();
        assert!(db.get_task(&bob(), task.id).unwrap().is_none());
        assert!(matches!(
            db.toggle_task(&bob(), task.id),
            Err(CoreError::TaskNotFound { .. })
        ));
        assert!(matches!(
            db.remove_task(&bob(), task.id),
            Err(CoreError::TaskNotFound { .. })
        ));
        assert!(db.get_task(&alice(), task.id).unwrap().is_some());
    }

    #[test]
    fn update_trims_text_and_sets_order() {
        let db = Database::open_memory().unwrap();
        let task = db.create_task(&alice(), "draft").unwrap();
        let patch = TaskPatch {
            text: Some("  final  ".into()),
            order: Some(3),
            ..Default::default()
        };
        db.update_task(&alice(), task.id, &patch).unwrap();
        let stored = db.get_task(&alice(), task.id).unwrap().unwrap();
        assert_eq!(stored.text, "final");
        assert_eq!(stored.order, Some(3));

        assert_eq!(
            db.update_task(&alice(), task.id, &TaskPatch::default()).unwrap(),
            task.id
        );
    }

    #[test]
    fn toggle_round_trips_completed_at() {
        let db = Database::open_memory().unwrap();
        let task = db.create_task(&alice(), "a").unwrap();
        let done = db.toggle_task(&alice(), task.id).unwrap();
        assert!(done.completed);
        let stored = db.get_task(&alice(), task.id).unwrap().unwrap();
        assert!(stored.completed_at.is_some());

        let undone = db.toggle_task(&alice(), task.id).unwrap();
        assert!(!undone.completed);
        let stored = db.get_task(&alice(), task.id).unwrap().unwrap();
        assert!(stored.completed_at.is_none());
    }

    #[test]
    fn clear_completed_hides_but_keeps_stats() {
        let db = Database::open_memory().unwrap();
        let a = db.create_task(&alice(), "a").unwrap();
        db.create_task(&alice(), "b").unwrap();
        db.toggle_task(&alice(), a.id).unwrap();

        assert_eq!(db.clear_completed_tasks(&alice()).unwrap(), 1);
        let visible = db.list_tasks(&alice()).unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].text, "b");

        let stats = db.completion_stats(&alice(), Utc::now()).unwrap();
        assert_eq!(stats.total_completed, 1);
        assert_eq!(stats.daily_counts.last().unwrap().count, 1);
    }

    #[test]
    fn clear_all_only_touches_own_tasks() {
        let db = Database::open_memory().unwrap();
        db.create_task(&alice(), "a").unwrap();
        db.create_task(&bob(), "b").unwrap();
        assert_eq!(db.clear_all_tasks(&alice()).unwrap(), 1);
        assert!(db.list_tasks(&alice()).unwrap().is_empty());
        assert_eq!(db.list_tasks(&bob()).unwrap().len(), 1);
    }

    #[test]
    fn anonymous_stats_are_empty() {
        let db = Database::open_memory().unwrap();
        let stats = db.completion_stats(&Identity::Anonymous, Utc::now()).unwrap();
        assert!(stats.daily_counts.is_empty());
        assert_eq!(stats.total_completed, 0);
    }
}
