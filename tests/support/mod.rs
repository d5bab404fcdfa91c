use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use tempfile::TempDir;

pub struct TestStore {
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        fs::write(dir.path().join("todos.toml"), "").expect("write empty config");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    pub fn store_file(&self) -> PathBuf {
        self.store_dir().join("store.json")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.dir.path().join("todos.toml"), contents).expect("write config");
    }

    pub fn read_store(&self) -> serde_json::Value {
        let raw = fs::read_to_string(self.store_file()).expect("read store");
        serde_json::from_str(&raw).expect("store is json")
    }

    /// `todos` pointed at this store and an isolated config file.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todos").expect("binary");
        cmd.env("TODOS_DIR", self.store_dir())
            .env("TODOS_CONFIG", self.dir.path().join("todos.toml"))
            .env_remove("RUST_LOG");
        cmd
    }

    pub fn json(&self, args: &[&str]) -> serde_json::Value {
        let output = self
            .cmd()
            .arg("--json")
            .args(args)
            .output()
            .expect("run todos");
        assert!(
            output.status.success(),
            "todos {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("json output")
    }
}
