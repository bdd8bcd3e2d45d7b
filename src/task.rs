//! Task model and store adapter.
//!
//! Tasks are stored in a single JSON snapshot (`tasks.json`) keyed by an
//! auto-incrementing numeric id. Every mutation takes the store lock, reads
//! the snapshot, applies one change, and replaces the file atomically; that
//! per-record atomicity is the only concurrency guarantee the rest of the
//! crate relies on.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::lock::{FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::storage::Storage;

pub const TASKS_SCHEMA_VERSION: &str = "agenda.tasks.v1";

fn default_schema_version() -> String {
    TASKS_SCHEMA_VERSION.to_string()
}

fn default_next_id() -> u64 {
    1
}

/// A single task record.
///
/// `due_date` serializes as `YYYY-MM-DD` and parses back on read; `None`
/// means unscheduled. `project_id` is an opaque reference into the external
/// catalog; unknown ids are stored as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Fields accepted when creating a task. `completed` always starts false.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<String>,
}

/// The full set of mutable fields, written as one unit by `update`.
///
/// Updates overwrite rather than patch: the caller supplies every mutable
/// field, which keeps last-write-wins semantics at the store trivial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFields {
    pub description: String,
    pub completed: bool,
    pub due_date: Option<NaiveDate>,
    pub project_id: Option<String>,
}

/// Parse a user-supplied due date in the stored `YYYY-MM-DD` form.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| Error::InvalidDate(value.to_string()))
}

impl TaskFields {
    /// Snapshot the mutable fields of an existing task, for callers that
    /// change one field and write the rest back unchanged.
    pub fn from_task(task: &Task) -> Self {
        Self {
            description: task.description.clone(),
            completed: task.completed,
            due_date: task.due_date,
            project_id: task.project_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Snapshot {
    #[serde(default = "default_schema_version")]
    schema_version: String,
    #[serde(default = "default_next_id")]
    next_id: u64,
    #[serde(default)]
    tasks: Vec<Task>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            next_id: default_next_id(),
            tasks: Vec::new(),
        }
    }
}

/// Store adapter: create / read-all / update / delete over the snapshot file.
#[derive(Debug, Clone)]
pub struct TaskStore {
    storage: Storage,
}

impl TaskStore {
    pub fn new(storage: Storage) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Persist a new task with a freshly assigned id and `completed = false`.
    /// Returns the assigned id.
    pub fn create(&self, fields: NewTask) -> Result<u64> {
        let _lock = self.lock()?;
        let mut snapshot = self.load_snapshot()?;

        let id = snapshot.next_id;
        snapshot.next_id += 1;
        snapshot.tasks.push(Task {
            id,
            description: fields.description,
            completed: false,
            due_date: fields.due_date,
            project_id: fields.project_id,
        });

        self.save_snapshot(&snapshot)?;
        debug!(id, "created task");
        Ok(id)
    }

    /// The full collection of persisted tasks, in stored order.
    pub fn read_all(&self) -> Result<Vec<Task>> {
        Ok(self.load_snapshot()?.tasks)
    }

    /// Fetch a single task by id.
    pub fn get(&self, id: u64) -> Result<Task> {
        self.read_all()?
            .into_iter()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))
    }

    /// Overwrite the mutable fields of an existing task.
    pub fn update(&self, id: u64, fields: TaskFields) -> Result<()> {
        let _lock = self.lock()?;
        let mut snapshot = self.load_snapshot()?;

        let task = snapshot
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        task.description = fields.description;
        task.completed = fields.completed;
        task.due_date = fields.due_date;
        task.project_id = fields.project_id;

        self.save_snapshot(&snapshot)?;
        debug!(id, "updated task");
        Ok(())
    }

    /// Remove a task by id.
    pub fn delete(&self, id: u64) -> Result<()> {
        let _lock = self.lock()?;
        let mut snapshot = self.load_snapshot()?;

        let position = snapshot
            .tasks
            .iter()
            .position(|task| task.id == id)
            .ok_or(Error::TaskNotFound(id))?;
        snapshot.tasks.remove(position);

        self.save_snapshot(&snapshot)?;
        debug!(id, "deleted task");
        Ok(())
    }

    fn lock(&self) -> Result<FileLock> {
        FileLock::acquire(self.storage.lock_file(), DEFAULT_LOCK_TIMEOUT_MS)
    }

    fn load_snapshot(&self) -> Result<Snapshot> {
        let path = self.storage.tasks_file();
        if !path.exists() {
            // A store that was never written to reads as empty.
            return Ok(Snapshot::default());
        }
        self.storage.read_json(&path)
    }

    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<()> {
        self.storage.write_json(&self.storage.tasks_file(), snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, TaskStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = TaskStore::new(Storage::new(dir.path().join("data")));
        (dir, store)
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    #[test]
    fn read_all_on_fresh_store_is_empty() {
        let (_guard, store) = temp_store();
        assert!(store.read_all().expect("read").is_empty());
    }

    #[test]
    fn create_then_read_round_trips_all_fields_except_id() {
        let (_guard, store) = temp_store();

        let id = store
            .create(NewTask {
                description: "water the plants".to_string(),
                due_date: Some(date("2024-06-10")),
                project_id: Some("project-a".to_string()),
            })
            .expect("create");

        let tasks = store.read_all().expect("read");
        assert_eq!(tasks.len(), 1);
        let task = &tasks[0];
        assert_eq!(task.id, id);
        assert_eq!(task.description, "water the plants");
        assert!(!task.completed);
        assert_eq!(task.due_date, Some(date("2024-06-10")));
        assert_eq!(task.project_id.as_deref(), Some("project-a"));
    }

    #[test]
    fn ids_are_sequential_and_never_reused() {
        let (_guard, store) = temp_store();

        let first = store
            .create(NewTask {
                description: "one".to_string(),
                ..NewTask::default()
            })
            .expect("create");
        let second = store
            .create(NewTask {
                description: "two".to_string(),
                ..NewTask::default()
            })
            .expect("create");
        assert_eq!(second, first + 1);

        store.delete(second).expect("delete");
        let third = store
            .create(NewTask {
                description: "three".to_string(),
                ..NewTask::default()
            })
            .expect("create");
        assert_eq!(third, second + 1);
    }

    #[test]
    fn update_overwrites_every_mutable_field() {
        let (_guard, store) = temp_store();

        let id = store
            .create(NewTask {
                description: "draft report".to_string(),
                due_date: Some(date("2024-06-10")),
                project_id: Some("project-a".to_string()),
            })
            .expect("create");

        store
            .update(
                id,
                TaskFields {
                    description: "finish report".to_string(),
                    completed: true,
                    due_date: None,
                    project_id: None,
                },
            )
            .expect("update");

        let task = store.get(id).expect("get");
        assert_eq!(task.description, "finish report");
        assert!(task.completed);
        assert_eq!(task.due_date, None);
        assert_eq!(task.project_id, None);
    }

    #[test]
    fn update_missing_id_is_an_error() {
        let (_guard, store) = temp_store();
        let err = store
            .update(99, TaskFields::default())
            .expect_err("should fail");
        assert!(matches!(err, Error::TaskNotFound(99)));
    }

    #[test]
    fn delete_missing_id_is_an_error() {
        let (_guard, store) = temp_store();
        let err = store.delete(7).expect_err("should fail");
        assert!(matches!(err, Error::TaskNotFound(7)));
    }

    #[test]
    fn delete_leaves_other_tasks_in_stored_order() {
        let (_guard, store) = temp_store();
        for name in ["a", "b", "c"] {
            store
                .create(NewTask {
                    description: name.to_string(),
                    ..NewTask::default()
                })
                .expect("create");
        }

        store.delete(2).expect("delete");
        let descriptions: Vec<String> = store
            .read_all()
            .expect("read")
            .into_iter()
            .map(|task| task.description)
            .collect();
        assert_eq!(descriptions, vec!["a".to_string(), "c".to_string()]);
    }

    #[test]
    fn concurrent_creates_assign_distinct_ids() {
        let (_guard, store) = temp_store();

        let mut handles = Vec::new();
        for i in 0..4 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                store
                    .create(NewTask {
                        description: format!("task {i}"),
                        ..NewTask::default()
                    })
                    .expect("create")
            }));
        }

        let mut ids: Vec<u64> = handles
            .into_iter()
            .map(|handle| handle.join().expect("join"))
            .collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 4);
        assert_eq!(store.read_all().expect("read").len(), 4);
    }

    #[test]
    fn unknown_project_id_is_stored_as_is() {
        let (_guard, store) = temp_store();
        let id = store
            .create(NewTask {
                description: "stray".to_string(),
                project_id: Some("no-such-project".to_string()),
                ..NewTask::default()
            })
            .expect("create");
        let task = store.get(id).expect("get");
        assert_eq!(task.project_id.as_deref(), Some("no-such-project"));
    }
}
