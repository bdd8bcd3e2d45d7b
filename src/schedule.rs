//! Due-date bucketing for the grouped task views.
//!
//! Pure functions: given a task collection and a reference day, partition the
//! tasks into five fixed display groups. Membership is evaluated at
//! calendar-day granularity; time of day never participates. The partition is
//! total and mutually exclusive: every task lands in exactly one group.

use chrono::{Duration, NaiveDate};

use crate::task::Task;

/// Display groups, in fixed render order. The order of the variants is the
/// order groups are produced and shown, even when empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Today,
    Tomorrow,
    NextSevenDays,
    Upcoming,
    Unscheduled,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::Today,
        Bucket::Tomorrow,
        Bucket::NextSevenDays,
        Bucket::Upcoming,
        Bucket::Unscheduled,
    ];

    /// Stable identifier used in JSON output
    pub fn id(self) -> &'static str {
        match self {
            Bucket::Today => "today",
            Bucket::Tomorrow => "tomorrow",
            Bucket::NextSevenDays => "next-7-days",
            Bucket::Upcoming => "upcoming",
            Bucket::Unscheduled => "unscheduled",
        }
    }

    /// Heading shown above the group
    pub fn label(self) -> &'static str {
        match self {
            Bucket::Today => "Today",
            Bucket::Tomorrow => "Tomorrow",
            Bucket::NextSevenDays => "Next 7 days",
            Bucket::Upcoming => "Upcoming",
            Bucket::Unscheduled => "Unscheduled",
        }
    }

    /// Placeholder rendered when the group has no tasks
    pub fn empty_label(self) -> &'static str {
        match self {
            Bucket::Today => "No tasks for today",
            Bucket::Tomorrow => "No tasks for tomorrow",
            Bucket::NextSevenDays => "No tasks for the next 7 days",
            Bucket::Upcoming => "No upcoming tasks",
            Bucket::Unscheduled => "No unscheduled tasks",
        }
    }
}

/// Classify a single due date relative to `today`.
///
/// The windows are: the reference day itself, the day after, days +2..=+7,
/// and everything else with a date. The final arm is a catch-all, so the
/// Next-7-Days / Upcoming boundary can never claim a date twice, and overdue
/// dates land in Upcoming rather than in no group at all.
pub fn classify(due_date: Option<NaiveDate>, today: NaiveDate) -> Bucket {
    let due = match due_date {
        None => return Bucket::Unscheduled,
        Some(due) => due,
    };

    let tomorrow = today + Duration::days(1);
    let window_end = today + Duration::days(7);

    if due == today {
        Bucket::Today
    } else if due == tomorrow {
        Bucket::Tomorrow
    } else if due > tomorrow && due <= window_end {
        Bucket::NextSevenDays
    } else {
        Bucket::Upcoming
    }
}

/// One named group of tasks
#[derive(Debug, Clone, PartialEq)]
pub struct TaskGroup {
    pub bucket: Bucket,
    pub tasks: Vec<Task>,
}

/// Partition `tasks` into the five groups. Groups come back in the fixed
/// `Bucket::ALL` order and are present even when empty; within a group the
/// stored order of the input is preserved (no secondary sort).
pub fn group_by_due(tasks: &[Task], today: NaiveDate) -> Vec<TaskGroup> {
    let mut groups: Vec<TaskGroup> = Bucket::ALL
        .iter()
        .map(|bucket| TaskGroup {
            bucket: *bucket,
            tasks: Vec::new(),
        })
        .collect();

    for task in tasks {
        let bucket = classify(task.due_date, today);
        let slot = groups
            .iter_mut()
            .find(|group| group.bucket == bucket)
            .expect("every bucket has a group");
        slot.tasks.push(task.clone());
    }

    groups
}
