//! Pure display-state helpers for the board.
//!
//! `TaskSnapshot` is the board's last known picture of the store. A mutation
//! patches it optimistically before the write lands; when the write fails the
//! whole snapshot is replaced from an authoritative re-fetch, which discards
//! the patch. `build_rows` flattens the grouped view into renderable lines.

use chrono::NaiveDate;

use crate::schedule::{self, Bucket};
use crate::task::{Task, TaskFields};

/// Last-known-good view of the store, plus any optimistic patches
#[derive(Debug, Clone, Default)]
pub struct TaskSnapshot {
    tasks: Vec<Task>,
}

impl TaskSnapshot {
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Replace the whole snapshot with an authoritative store read. This is
    /// both the initial load and the revert path after a failed write.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Optimistically overwrite a task's mutable fields before the store
    /// write completes. Returns false when the task is not present.
    pub fn apply_update(&mut self, id: u64, fields: &TaskFields) -> bool {
        match self.tasks.iter_mut().find(|task| task.id == id) {
            Some(task) => {
                task.description = fields.description.clone();
                task.completed = fields.completed;
                task.due_date = fields.due_date;
                task.project_id = fields.project_id.clone();
                true
            }
            None => false,
        }
    }

    /// Optimistically drop a task before the store delete completes.
    /// Returns false when the task is not present.
    pub fn apply_remove(&mut self, id: u64) -> bool {
        match self.tasks.iter().position(|task| task.id == id) {
            Some(position) => {
                self.tasks.remove(position);
                true
            }
            None => false,
        }
    }
}

/// One renderable line of the board
#[derive(Debug, Clone, PartialEq)]
pub enum Row {
    Header(Bucket),
    Task(Task),
    Empty(Bucket),
}

/// Flatten the grouped view into render rows. Groups keep their fixed order
/// and are present even when empty (an `Empty` row carries the placeholder).
pub fn build_rows(tasks: &[Task], today: NaiveDate) -> Vec<Row> {
    let mut rows = Vec::new();
    for group in schedule::group_by_due(tasks, today) {
        rows.push(Row::Header(group.bucket));
        if group.tasks.is_empty() {
            rows.push(Row::Empty(group.bucket));
        } else {
            for task in group.tasks {
                rows.push(Row::Task(task));
            }
        }
    }
    rows
}

/// Indices of the selectable (task) rows
pub fn selectable_rows(rows: &[Row]) -> Vec<usize> {
    rows.iter()
        .enumerate()
        .filter_map(|(index, row)| match row {
            Row::Task(_) => Some(index),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("date")
    }

    fn task(id: u64, completed: bool) -> Task {
        Task {
            id,
            description: format!("task {id}"),
            completed,
            due_date: None,
            project_id: None,
        }
    }

    #[test]
    fn optimistic_update_is_visible_immediately() {
        // A toggle shows up in the displayed snapshot before any store
        // confirmation arrives.
        let mut snapshot = TaskSnapshot::default();
        snapshot.replace_all(vec![task(3, false)]);

        let mut fields = TaskFields::from_task(snapshot.get(3).expect("task 3"));
        fields.completed = true;
        assert!(snapshot.apply_update(3, &fields));
        assert!(snapshot.get(3).expect("task 3").completed);
    }

    #[test]
    fn failed_delete_reverts_via_refetch() {
        // Optimistically removed, then the write fails: re-fetching ground
        // truth restores the task.
        let mut snapshot = TaskSnapshot::default();
        snapshot.replace_all(vec![task(4, false), task(5, false)]);

        assert!(snapshot.apply_remove(5));
        assert!(snapshot.get(5).is_none());

        let store_truth = vec![task(4, false), task(5, false)];
        snapshot.replace_all(store_truth);
        assert!(snapshot.get(5).is_some());
    }

    #[test]
    fn patching_an_absent_task_reports_failure() {
        let mut snapshot = TaskSnapshot::default();
        assert!(!snapshot.apply_update(9, &TaskFields::default()));
        assert!(!snapshot.apply_remove(9));
    }

    #[test]
    fn rows_cover_all_groups_with_placeholders() {
        let rows = build_rows(&[], date("2024-06-10"));
        // Five headers, five placeholders, nothing selectable.
        assert_eq!(rows.len(), 10);
        assert!(selectable_rows(&rows).is_empty());
        assert_eq!(rows[0], Row::Header(Bucket::Today));
        assert_eq!(rows[1], Row::Empty(Bucket::Today));
        assert_eq!(rows[8], Row::Header(Bucket::Unscheduled));
    }

    #[test]
    fn selectable_rows_skip_headers_and_placeholders() {
        let mut unscheduled = task(1, false);
        unscheduled.due_date = None;
        let mut due_today = task(2, false);
        due_today.due_date = Some(date("2024-06-10"));

        let rows = build_rows(&[unscheduled, due_today], date("2024-06-10"));
        let selectable = selectable_rows(&rows);
        assert_eq!(selectable.len(), 2);
        for index in selectable {
            assert!(matches!(rows[index], Row::Task(_)));
        }
    }
}
