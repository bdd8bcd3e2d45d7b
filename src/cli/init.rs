//! agenda init command implementation
//!
//! Creates the data directory and a default configuration file so the other
//! commands have somewhere to work. Running it twice is harmless.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::storage::Storage;

use super::Context;

#[derive(serde::Serialize)]
struct InitReport {
    data_dir: PathBuf,
    created: InitCreated,
}

#[derive(serde::Serialize)]
struct InitCreated {
    config: bool,
    data_dir: bool,
}

pub fn run(ctx: &Context) -> Result<()> {
    let config = ctx.config()?;
    let storage = Storage::resolve(ctx.data_dir.clone(), &config)?;

    let created_data_dir = !storage.is_initialized();
    storage.init_dirs()?;

    let created_config = ensure_config(ctx, &config)?;

    let report = InitReport {
        data_dir: storage.data_dir().to_path_buf(),
        created: InitCreated {
            config: created_config,
            data_dir: created_data_dir,
        },
    };

    let mut created_items = Vec::new();
    if created_config {
        created_items.push("config");
    }
    if created_data_dir {
        created_items.push("data dir");
    }

    let header = if created_items.is_empty() {
        "agenda init: nothing to do".to_string()
    } else {
        "agenda init: initialized".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("data dir", storage.data_dir().display().to_string());
    human.push_summary(
        "created",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    human.push_next_step("agenda add \"<description>\"");
    human.push_next_step("agenda board");

    emit_success(ctx.output(), "init", &report, Some(&human))
}

fn ensure_config(ctx: &Context, config: &Config) -> Result<bool> {
    let path = match ctx.config_path.clone().or_else(Config::default_path) {
        Some(path) => path,
        // No config dir on this platform; defaults still apply everywhere.
        None => return Ok(false),
    };

    if path.exists() {
        if !path.is_file() {
            return Err(Error::OperationFailed(format!(
                "config path exists but is not a file: {}",
                path.display()
            )));
        }
        return Ok(false);
    }

    config.save(&path)?;
    Ok(true)
}
