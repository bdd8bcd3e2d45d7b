use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use tempfile::TempDir;

/// Isolated fixture: its own data directory and config file, wired into the
/// binary through the AGENDA_* environment variables.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        let env = Self { dir };
        // An empty config parses to the defaults (project-a/b/c catalog).
        env.write_config("");
        env
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn config_path(&self) -> PathBuf {
        self.dir.path().join("agenda.toml")
    }

    pub fn tasks_file(&self) -> PathBuf {
        self.data_dir().join("tasks.json")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.config_path(), contents).expect("write config");
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("agenda").expect("binary");
        cmd.env("AGENDA_DATA_DIR", self.data_dir());
        cmd.env("AGENDA_CONFIG", self.config_path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run a subcommand with `--json` and parse the output envelope.
    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .output()
            .expect("run agenda");
        assert!(
            output.status.success(),
            "agenda {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json envelope")
    }
}
