//! Task management commands for CLI.

use clap::Subcommand;
use tomatask_core::{Database, Identity, Task, TaskPatch};
use uuid::Uuid;

use crate::common::{signed_in, CliResult, Context};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task
    Add {
        /// Task text
        text: String,
    },
    /// List visible tasks, newest first
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Toggle a task between open and done
    Done {
        /// Task ID or unique prefix
        id: String,
    },
    /// Edit a task
    Edit {
        /// Task ID or unique prefix
        id: String,
        /// New text
        #[arg(long)]
        text: Option<String>,
        /// Manual ordering hint
        #[arg(long, allow_negative_numbers = true)]
        order: Option<i64>,
    },
    /// Delete a task
    Remove {
        /// Task ID or unique prefix
        id: String,
    },
    /// Hide completed tasks (they still count in stats)
    ClearCompleted,
    /// Delete every task
    ClearAll,
}

/// Accept a full UUID or a prefix matching exactly one visible task.
fn resolve_id(db: &Database, identity: &Identity, raw: &str) -> Result<Uuid, Box<dyn std::error::Error>> {
    if let Ok(id) = Uuid::parse_str(raw) {
        return Ok(id);
    }
    let prefix = raw.to_ascii_lowercase();
    let tasks = signed_in(db.list_tasks(identity))?;
    let mut matches = tasks.iter().filter(|t| t.id.to_string().starts_with(&prefix));
    match (matches.next(), matches.next()) {
        (Some(task), None) => Ok(task.id),
        (None, _) => Err(format!("task not found: {raw}").into()),
        (Some(_), Some(_)) => Err(format!("ambiguous task id: {raw}").into()),
    }
}

fn print_task(task: &Task) {
    let mark = if task.completed { "x" } else { " " };
    let short: String = task.id.to_string().chars().take(8).collect();
    println!("[{mark}] {short}  {}", task.text);
}

pub fn run(action: TaskAction) -> CliResult {
    let ctx = Context::load()?;
    let identity = ctx.identity();
    let db = &ctx.db;

    match action {
        TaskAction::Add { text } => {
            if text.trim().is_empty() {
                return Err("task text must not be blank".into());
            }
            let task = signed_in(db.create_task(&identity, &text))?;
            println!("Task created: {}", task.id);
        }
        TaskAction::List { json } => {
            let tasks = db.list_tasks(&identity)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks.");
            } else {
                tasks.iter().for_each(print_task);
            }
        }
        TaskAction::Done { id } => {
            let id = resolve_id(db, &identity, &id)?;
            let task = signed_in(db.toggle_task(&identity, id))?;
            print_task(&task);
        }
        TaskAction::Edit { id, text, order } => {
            let id = resolve_id(db, &identity, &id)?;
            if text.as_deref().is_some_and(|t| t.trim().is_empty()) {
                return Err("task text must not be blank".into());
            }
            let patch = TaskPatch {
                text,
                completed: None,
                order,
            };
            signed_in(db.update_task(&identity, id, &patch))?;
            println!("Task updated: {id}");
        }
        TaskAction::Remove { id } => {
            let id = resolve_id(db, &identity, &id)?;
            signed_in(db.remove_task(&identity, id))?;
            println!("Task deleted: {id}");
        }
        TaskAction::ClearCompleted => {
            let hidden = signed_in(db.clear_completed_tasks(&identity))?;
            println!("Cleared {hidden} completed task(s)");
        }
        TaskAction::ClearAll => {
            let deleted = signed_in(db.clear_all_tasks(&identity))?;
            println!("Deleted {deleted} task(s)");
        }
    }
    Ok(())
}
