//! agenda projects command implementation

use crate::config::ProjectEntry;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput};

use super::Context;

#[derive(serde::Serialize)]
struct ProjectsReport {
    projects: Vec<ProjectEntry>,
}

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;

    let mut human = HumanOutput::new("agenda projects: configured catalog");
    for entry in &config.projects {
        human.push_detail(format!("{}  {}", entry.id, entry.name));
    }
    if config.projects.is_empty() {
        human.push_detail("(no projects configured)".to_string());
    }

    let report = ProjectsReport {
        projects: config.projects.clone(),
    };
    emit_success(ctx.output(), "projects", &report, Some(&human))
}
