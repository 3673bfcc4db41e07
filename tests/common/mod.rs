//! Shared testing utilities for sesh CLI tests.

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Testing harness providing an isolated working directory for one-shot
/// CLI exercises.
#[allow(dead_code)]
pub struct TestContext {
    root: TempDir,
    work_dir: PathBuf,
}

#[allow(dead_code)]
impl TestContext {
    /// Create a new isolated environment with a small fixture tree:
    /// `data1/` (three files), `data2/` (empty), `.data3/` (hidden) and
    /// `testD.txt`.
    pub fn new() -> Self {
        let root = TempDir::new().expect("Failed to create temp directory for tests");
        let work_dir = root.path().join("work");
        fs::create_dir_all(&work_dir).expect("Failed to create test work directory");

        fs::create_dir_all(work_dir.join("data1")).unwrap();
        fs::create_dir_all(work_dir.join("data2")).unwrap();
        fs::create_dir_all(work_dir.join(".data3")).unwrap();
        fs::write(work_dir.join("data1/test1.txt"), "TEST 1").unwrap();
        fs::write(work_dir.join("data1/test2.txt"), "TEST 2").unwrap();
        fs::write(work_dir.join("data1/empty.txt"), "").unwrap();
        fs::write(work_dir.join(".data3/.secret.txt"), "SECRET").unwrap();
        fs::write(work_dir.join("testD.txt"), "TEST D").unwrap();

        Self { root, work_dir }
    }

    /// Path to the working directory used for CLI invocations.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Build a one-shot invocation of the compiled `sesh` binary.
    pub fn cli(&self, command_line: &str) -> Command {
        let mut cmd = Command::cargo_bin("sesh").expect("Failed to locate sesh binary");
        cmd.current_dir(&self.work_dir).args(["-c", command_line]);
        cmd
    }

    /// Content of the history log, if present.
    pub fn history_log(&self) -> Option<String> {
        fs::read_to_string(self.work_dir.join(".history")).ok()
    }

    /// Path to the trash directory.
    pub fn trash_dir(&self) -> PathBuf {
        self.work_dir.join(".trash")
    }
}
