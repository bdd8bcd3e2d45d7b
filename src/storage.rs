//! Storage layer for agenda
//!
//! All persistent state lives in one data directory:
//!
//! ```text
//! <data-dir>/
//!   tasks.json   # task snapshot, replaced atomically on every write
//!   tasks.lock   # flock guard for read-modify-write cycles
//! ```
//!
//! The directory is resolved from `--data-dir` / `AGENDA_DATA_DIR`, then the
//! `data_dir` key in `agenda.toml`, then the platform data directory.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::Config;
use crate::error::{Error, Result};

/// Name of the task snapshot file
pub const TASKS_FILE: &str = "tasks.json";

/// Name of the sidecar lock file
pub const LOCK_FILE: &str = "tasks.lock";

/// Storage manager for the agenda data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Resolve the data directory from an explicit override, the config, or
    /// the platform default, in that order.
    pub fn resolve(override_dir: Option<PathBuf>, config: &Config) -> Result<Self> {
        if let Some(dir) = override_dir {
            return Ok(Self::new(dir));
        }
        if let Some(dir) = config.data_dir.clone() {
            return Ok(Self::new(dir));
        }
        let dirs = ProjectDirs::from("", "", "agenda").ok_or_else(|| {
            Error::OperationFailed(
                "could not determine a data directory; pass --data-dir".to_string(),
            )
        })?;
        Ok(Self::new(dirs.data_dir().to_path_buf()))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path to the task snapshot file
    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir.join(TASKS_FILE)
    }

    /// Path to the lock file guarding snapshot mutations
    pub fn lock_file(&self) -> PathBuf {
        self.data_dir.join(LOCK_FILE)
    }

    /// Create the data directory
    pub fn init_dirs(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Check whether the data directory exists
    pub fn is_initialized(&self) -> bool {
        self.data_dir.exists()
    }

    // =========================================================================
    // File I/O helpers (atomic writes for safety)
    // =========================================================================

    /// Write JSON data atomically (write to temp, then rename)
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        self.write_atomic(path, json.as_bytes())
    }

    /// Read JSON data from a file
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<T> {
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(data)
    }

    /// Write data atomically using temp file + rename so concurrent readers
    /// never observe a partial snapshot.
    pub fn write_atomic(&self, path: &Path, data: &[u8]) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let temp_path = path.with_extension("tmp");

        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;

        fs::rename(&temp_path, path)?;

        Ok(())
    }
}
