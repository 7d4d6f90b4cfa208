//! Common test utilities for folio integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't read or
//! write the user's `~/.config/folio/` directory.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
pub use tempfile::TempDir;

/// A test environment with an isolated config directory.
///
/// The `folio()` method returns a `Command` that sets `FOLIO_CONFIG_DIR`
/// per-invocation and clears `FOLIO_DATA`, making tests parallel-safe.
pub struct TestEnv {
    pub config_dir: TempDir,
    pub work_dir: TempDir,
}

impl TestEnv {
    /// Create a new test environment with isolated directories.
    pub fn new() -> Self {
        Self {
            config_dir: TempDir::new().unwrap(),
            work_dir: TempDir::new().unwrap(),
        }
    }

    /// Get a Command for the folio binary with isolated configuration.
    pub fn folio(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_folio"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("FOLIO_CONFIG_DIR", self.config_dir.path());
        cmd.env_remove("FOLIO_DATA");
        cmd.env_remove("FOLIO_OUTPUT_FORMAT");
        cmd.env_remove("FOLIO_LOG");
        cmd
    }

    /// Write a file into the work directory and return its path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.work_dir.path().join(name);
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Write a dataset into the work directory and return its path.
    pub fn dataset(&self, projects: &serde_json::Value) -> PathBuf {
        self.write("projects.json", &projects.to_string())
    }

    /// Get the path to the config directory.
    pub fn config_path(&self) -> &Path {
        self.config_dir.path()
    }

    /// Get the path to the work directory.
    pub fn path(&self) -> &Path {
        self.work_dir.path()
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Minimal project record for datasets built in tests.
pub fn project(id: &str, title: &str, category: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": format!("{} description", title),
        "category": category,
        "status": status,
        "priority": "medium",
        "progress": 50,
    })
}

/// Run a command and parse its stdout as JSON.
pub fn json_output(cmd: &mut Command) -> serde_json::Value {
    let output = cmd.output().unwrap();
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}
