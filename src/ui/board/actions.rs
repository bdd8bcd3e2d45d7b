//! Store actions issued by the board.
//!
//! Thin wrappers around the task store that validate input at the boundary
//! and report an outcome the app loop can surface in the status line.

use chrono::NaiveDate;

use crate::config::ProjectEntry;
use crate::error::{Error, Result};
use crate::task::{NewTask, TaskFields, TaskStore};

#[derive(Debug, Clone)]
pub struct CreateTaskInput {
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ActionOutcome {
    pub message: String,
    pub task_id: Option<u64>,
}

pub fn create_task(store: &TaskStore, input: CreateTaskInput) -> Result<ActionOutcome> {
    let description = input.description.trim();
    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }

    let id = store.create(NewTask {
        description: description.to_string(),
        due_date: input.due_date,
        project_id: input.project_id,
    })?;
    Ok(ActionOutcome {
        message: format!("created task #{id}"),
        task_id: Some(id),
    })
}

pub fn update_task(store: &TaskStore, id: u64, fields: TaskFields) -> Result<ActionOutcome> {
    store.update(id, fields)?;
    Ok(ActionOutcome {
        message: format!("updated task #{id}"),
        task_id: Some(id),
    })
}

pub fn delete_task(store: &TaskStore, id: u64) -> Result<ActionOutcome> {
    store.delete(id)?;
    Ok(ActionOutcome {
        message: format!("deleted task #{id}"),
        task_id: Some(id),
    })
}

/// Next catalog entry when cycling a task's project: none → first → … →
/// last → none.
pub fn next_project(catalog: &[ProjectEntry], current: Option<&str>) -> Option<String> {
    if catalog.is_empty() {
        return None;
    }
    match current {
        None => Some(catalog[0].id.clone()),
        Some(current) => {
            let position = catalog.iter().position(|entry| entry.id == current);
            match position {
                Some(position) if position + 1 < catalog.len() => {
                    Some(catalog[position + 1].id.clone())
                }
                // Last entry, or an id outside the catalog: cycle back to none.
                _ => None,
            }
        }
    }
}
