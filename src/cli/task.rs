//! agenda task command implementations.

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::schedule::{self, TaskGroup};
use crate::task::{parse_due_date, NewTask, Task, TaskFields};

use super::Context;

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn format_due(due_date: Option<NaiveDate>) -> String {
    due_date
        .map(|date| date.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "none".to_string())
}

fn format_task_line(task: &Task, config: &Config) -> String {
    let checkbox = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{checkbox} #{} {}", task.id, task.description);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" · due {}", due.format("%Y-%m-%d")));
    }
    if let Some(project) = task.project_id.as_deref() {
        line.push_str(&format!(" · {}", config.project_name(project)));
    }
    line
}

fn warn_unknown_project(human: &mut HumanOutput, config: &Config, project: Option<&str>) {
    if let Some(project) = project {
        if !config.has_project(project) {
            human.push_warning(format!(
                "project '{project}' is not in the configured catalog"
            ));
        }
    }
}

#[derive(Serialize)]
struct TaskReport {
    task: Task,
}

pub fn add(
    ctx: &Context,
    description: String,
    due: Option<String>,
    project: Option<String>,
) -> Result<()> {
    // Validation happens here, at the input boundary; an empty description
    // never reaches the store.
    let description = description.trim().to_string();
    if description.is_empty() {
        return Err(Error::EmptyDescription);
    }
    let due_date = due.as_deref().map(parse_due_date).transpose()?;

    let config = ctx.config()?;
    let store = ctx.store(&config)?;
    let id = store.create(NewTask {
        description,
        due_date,
        project_id: project.clone(),
    })?;
    let task = store.get(id)?;

    let mut human = HumanOutput::new(format!("agenda add: created task #{id}"));
    human.push_summary("description", task.description.clone());
    human.push_summary("due", format_due(task.due_date));
    human.push_summary(
        "project",
        task.project_id
            .as_deref()
            .map(|p| config.project_name(p).to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    warn_unknown_project(&mut human, &config, project.as_deref());
    human.push_next_step("agenda list".to_string());

    emit_success(ctx.output(), "add", &TaskReport { task }, Some(&human))
}

#[derive(Serialize)]
struct GroupReport {
    id: &'static str,
    name: &'static str,
    tasks: Vec<Task>,
}

#[derive(Serialize)]
struct ListReport {
    today: NaiveDate,
    total: usize,
    groups: Vec<GroupReport>,
}

pub fn list(
    ctx: &Context,
    project: Option<String>,
    completed: bool,
    pending: bool,
    today: Option<String>,
) -> Result<()> {
    let today = match today {
        Some(value) => parse_due_date(&value)?,
        None => local_today(),
    };

    let config = ctx.config()?;
    let store = ctx.store(&config)?;
    let mut tasks = store.read_all()?;
    if let Some(project) = project.as_deref() {
        tasks.retain(|task| task.project_id.as_deref() == Some(project));
    }
    if completed {
        tasks.retain(|task| task.completed);
    }
    if pending {
        tasks.retain(|task| !task.completed);
    }

    let groups = schedule::group_by_due(&tasks, today);

    if ctx.json {
        let report = ListReport {
            today,
            total: tasks.len(),
            groups: groups
                .into_iter()
                .map(|group| GroupReport {
                    id: group.bucket.id(),
                    name: group.bucket.label(),
                    tasks: group.tasks,
                })
                .collect(),
        };
        return emit_success(ctx.output(), "list", &report, None);
    }

    if !ctx.quiet {
        println!("{}", render_groups(&groups, &config));
    }
    Ok(())
}

fn render_groups(groups: &[TaskGroup], config: &Config) -> String {
    let mut lines = Vec::new();
    for (index, group) in groups.iter().enumerate() {
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(group.bucket.label().to_string());
        if group.tasks.is_empty() {
            lines.push(format!("  ({})", group.bucket.empty_label()));
        } else {
            for task in &group.tasks {
                lines.push(format!("  {}", format_task_line(task, config)));
            }
        }
    }
    lines.join("\n")
}

pub fn show(ctx: &Context, id: u64) -> Result<()> {
    let config = ctx.config()?;
    let store = ctx.store(&config)?;
    let task = store.get(id)?;

    let mut human = HumanOutput::new(format!("agenda show: task #{id}"));
    human.push_summary("description", task.description.clone());
    human.push_summary("completed", if task.completed { "yes" } else { "no" });
    human.push_summary("due", format_due(task.due_date));
    human.push_summary(
        "project",
        task.project_id
            .as_deref()
            .map(|p| config.project_name(p).to_string())
            .unwrap_or_else(|| "none".to_string()),
    );

    emit_success(ctx.output(), "show", &TaskReport { task }, Some(&human))
}

pub fn set_completed(ctx: &Context, id: u64, completed: bool) -> Result<()> {
    let config = ctx.config()?;
    let store = ctx.store(&config)?;

    let mut fields = TaskFields::from_task(&store.get(id)?);
    fields.completed = completed;
    store.update(id, fields)?;
    let task = store.get(id)?;

    let command = if completed { "done" } else { "reopen" };
    let header = if completed {
        format!("agenda done: completed task #{id}")
    } else {
        format!("agenda reopen: reopened task #{id}")
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("description", task.description.clone());

    emit_success(ctx.output(), command, &TaskReport { task }, Some(&human))
}

pub fn set_due(ctx: &Context, id: u64, date: Option<String>, clear: bool) -> Result<()> {
    let due_date = if clear {
        None
    } else {
        // clap enforces that exactly one of date / --clear is present
        date.as_deref().map(parse_due_date).transpose()?
    };

    let config = ctx.config()?;
    let store = ctx.store(&config)?;

    let mut fields = TaskFields::from_task(&store.get(id)?);
    fields.due_date = due_date;
    store.update(id, fields)?;
    let task = store.get(id)?;

    let mut human = HumanOutput::new(format!("agenda due: updated task #{id}"));
    human.push_summary("due", format_due(task.due_date));

    emit_success(ctx.output(), "due", &TaskReport { task }, Some(&human))
}

pub fn set_project(
    ctx: &Context,
    id: u64,
    project: Option<String>,
    clear: bool,
) -> Result<()> {
    let project_id = if clear { None } else { project };

    let config = ctx.config()?;
    let store = ctx.store(&config)?;

    let mut fields = TaskFields::from_task(&store.get(id)?);
    fields.project_id = project_id.clone();
    store.update(id, fields)?;
    let task = store.get(id)?;

    let mut human = HumanOutput::new(format!("agenda project: updated task #{id}"));
    human.push_summary(
        "project",
        task.project_id
            .as_deref()
            .map(|p| config.project_name(p).to_string())
            .unwrap_or_else(|| "none".to_string()),
    );
    warn_unknown_project(&mut human, &config, project_id.as_deref());

    emit_success(ctx.output(), "project", &TaskReport { task }, Some(&human))
}

pub fn remove(ctx: &Context, id: u64) -> Result<()> {
    let config = ctx.config()?;
    let store = ctx.store(&config)?;

    let task = store.get(id)?;
    store.delete(id)?;

    let mut human = HumanOutput::new(format!("agenda rm: deleted task #{id}"));
    human.push_summary("description", task.description.clone());

    emit_success(ctx.output(), "rm", &TaskReport { task }, Some(&human))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_date_accepts_iso_days() {
        assert_eq!(
            parse_due_date("2024-06-10").expect("parse"),
            NaiveDate::from_ymd_opt(2024, 6, 10).expect("date")
        );
    }

    #[test]
    fn parse_date_rejects_other_shapes() {
        for input in ["10/06/2024", "2024-6-10x", "tomorrow", ""] {
            assert!(
                matches!(parse_due_date(input), Err(Error::InvalidDate(_))),
                "accepted {input:?}"
            );
        }
    }

    #[test]
    fn task_line_shows_completion_due_and_project() {
        let config = Config::default();
        let task = Task {
            id: 3,
            description: "water the plants".to_string(),
            completed: true,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 10),
            project_id: Some("project-a".to_string()),
        };
        let line = format_task_line(&task, &config);
        assert_eq!(line, "[x] #3 water the plants · due 2024-06-10 · Project A");
    }
}
