//! Configuration loading and management
//!
//! Handles parsing of `agenda.toml` configuration files. The project catalog
//! lives here: it is externally defined, never persisted in the task store,
//! and passed explicitly into the layers that display it.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Name of the configuration file
pub const CONFIG_FILE: &str = "agenda.toml";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Optional override for the task store location
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Project catalog offered when assigning tasks
    #[serde(default = "default_projects")]
    pub projects: Vec<ProjectEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            projects: default_projects(),
        }
    }
}

/// One entry of the project catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectEntry {
    pub id: String,
    pub name: String,
}

fn default_projects() -> Vec<ProjectEntry> {
    vec![
        ProjectEntry {
            id: "project-a".to_string(),
            name: "Project A".to_string(),
        },
        ProjectEntry {
            id: "project-b".to_string(),
            name: "Project B".to_string(),
        },
        ProjectEntry {
            id: "project-c".to_string(),
            name: "Project C".to_string(),
        },
    ]
}

impl Config {
    /// Load configuration from an explicit path, or from the platform config
    /// directory. A missing file at the default location yields the default
    /// configuration; an explicitly named file must exist.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(Error::InvalidConfig(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::load_file(path)
            }
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_file(&path),
                _ => Ok(Self::default()),
            },
        }
    }

    fn load_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration to the given path, creating parent directories
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file location in the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "agenda").map(|dirs| dirs.config_dir().join(CONFIG_FILE))
    }

    /// Display name for a project id; falls back to the raw id for entries
    /// outside the catalog (unknown ids are accepted silently elsewhere)
    pub fn project_name<'a>(&'a self, id: &'a str) -> &'a str {
        self.projects
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| entry.name.as_str())
            .unwrap_or(id)
    }

    /// Whether the id is part of the configured catalog
    pub fn has_project(&self, id: &str) -> bool {
        self.projects.iter().any(|entry| entry.id == id)
    }

    fn validate(&self) -> Result<()> {
        for entry in &self.projects {
            if entry.id.trim().is_empty() {
                return Err(Error::InvalidConfig(
                    "project entry with an empty id".to_string(),
                ));
            }
        }
        Ok(())
    }
}
