//! Shared helpers for ds CLI specs

use assert_cmd::assert::Assert;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Packager used by [`Project::configured`]
pub const PACKAGER: &str = "archive";

/// `ds` with no project around it
pub fn cli() -> CliBuilder {
    CliBuilder::new(None)
}

/// A temporary working directory for one spec
pub struct Project {
    dir: TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// A project with `ds.toml` (store under `store/`, drop box under
    /// `inbox/`), one repository `repo-1` and one submitted submission
    /// `sub-1` with a single file
    pub fn configured() -> Self {
        Self::with_connection_extra("")
    }

    /// Like [`Project::configured`], with extra `[..connection.extra]` lines
    pub fn with_connection_extra(extra: &str) -> Self {
        let project = Self::empty();
        project.file(
            "ds.toml",
            &format!(
                r#"[store]
root = "store"

[pool]
workers = 2
shutdown_timeout = "5s"

[packager.{packager}]
assembler = "bundle"
transport = "filesystem"

[packager.{packager}.connection]
collection = "{inbox}"

[packager.{packager}.connection.extra]
{extra}
"#,
                packager = PACKAGER,
                inbox = project.inbox().display(),
                extra = extra,
            ),
        );
        project.repository("repo-1", PACKAGER);
        project.submission("sub-1", &["repo-1"]);
        project
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn inbox(&self) -> PathBuf {
        self.path().join("inbox")
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn record(&self, kind: &str, id: &str, value: &Value) {
        self.file(
            &format!("store/{}/{}.json", kind, id),
            &serde_json::to_string_pretty(value).unwrap(),
        );
    }

    pub fn repository(&self, id: &str, packager: &str) {
        self.record(
            "repository",
            id,
            &json!({ "id": id, "name": id, "repository_key": packager }),
        );
    }

    /// A submitted submission whose one file lives in the project
    pub fn submission(&self, id: &str, repositories: &[&str]) {
        let file = format!("files/{}.txt", id);
        self.file(&file, &format!("content of {}", id));
        self.record(
            "submission",
            id,
            &json!({
                "id": id,
                "submitted": true,
                "metadata": { "title": format!("Article {}", id) },
                "files": [{
                    "name": format!("{}.txt", id),
                    "location": format!("file://{}", self.path().join(&file).display()),
                    "mime_type": "text/plain"
                }],
                "repositories": repositories,
            }),
        );
    }

    /// A deposit of `sub-1` to `repo-1`
    pub fn deposit(&self, id: &str, status: Option<&str>, status_ref: Option<&str>) {
        self.record(
            "deposit",
            id,
            &json!({
                "id": id,
                "status": status,
                "status_ref": status_ref,
                "submission": "sub-1",
                "repository": "repo-1",
            }),
        );
    }

    /// A statement document the filesystem status resolver can read
    pub fn statement(&self, rel: &str, state: &str) -> String {
        self.file(rel, &json!({ "state": state }).to_string());
        self.path().join(rel).display().to_string()
    }

    pub fn read_deposit(&self, id: &str) -> Value {
        let path = self.path().join(format!("store/deposit/{}.json", id));
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    /// Every stored deposit, ordered by file name
    pub fn deposits(&self) -> Vec<Value> {
        let dir = self.path().join("store/deposit");
        let Ok(entries) = std::fs::read_dir(dir) else {
            return Vec::new();
        };
        let mut paths: Vec<PathBuf> = entries
            .flatten()
            .map(|e| e.path())
            .filter(|p| p.extension().is_some_and(|e| e == "json"))
            .collect();
        paths.sort();
        paths
            .into_iter()
            .map(|p| serde_json::from_str(&std::fs::read_to_string(p).unwrap()).unwrap())
            .collect()
    }

    pub fn ds(&self) -> CliBuilder {
        CliBuilder::new(Some(self.path()))
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    fn new(dir: Option<&Path>) -> Self {
        let mut cmd = Command::cargo_bin("ds").unwrap();
        cmd.env_remove("RUST_LOG");
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        Self { cmd }
    }

    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn stdin(mut self, input: &str) -> Self {
        self.cmd.write_stdin(input.to_string());
        self
    }

    /// Run and expect exit status 0
    pub fn passes(self) -> Run {
        self.exits(0)
    }

    /// Run and expect exit status 1
    pub fn fails(self) -> Run {
        self.exits(1)
    }

    pub fn exits(mut self, code: i32) -> Run {
        Run {
            assert: self.cmd.assert().code(code),
        }
    }
}

pub struct Run {
    assert: Assert,
}

impl Run {
    pub fn stdout_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stdout(predicate::str::contains(expected)),
        }
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        Self {
            assert: self
                .assert
                .stdout(predicate::str::contains(unexpected).not()),
        }
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        Self {
            assert: self.assert.stderr(predicate::str::contains(expected)),
        }
    }
}
