//! Shared helpers for driving the `pumlsteps` binary.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

pub const LOGIN: &str = r#"@startuml
actor User
participant System
participant Database
' @step {"name": "Step 1: User Login", "newPage": false}
User -> System: Login Request
System -> Database: Validate Credentials
' @step {"name": "Step 2: Authentication", "newPage": false}
Database --> System: Credentials Valid
System --> User: Login Success
' @step {"name": "Step 3: Dashboard", "newPage": true}
User -> System: View Dashboard
@enduml
"#;

/// Source tree in a temp directory.
pub struct SourceTree {
    pub dir: TempDir,
}

impl SourceTree {
    pub fn create() -> Self {
        Self {
            dir: tempfile::tempdir().expect("create temp dir"),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, rel: &str, text: &str) -> PathBuf {
        let path = self.root().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, text).expect("write source");
        path
    }
}

fn command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_pumlsteps"));
    cmd.env_remove("RUST_LOG").env_remove("PUMLSTEPS_RENDERER");
    cmd
}

pub fn run(args: &[&str]) -> Output {
    command().args(args).output().expect("run pumlsteps")
}

pub fn run_with_stdin(args: &[&str], stdin: &str) -> Output {
    let mut child = command()
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn pumlsteps");
    if let Some(mut pipe) = child.stdin.take() {
        pipe.write_all(stdin.as_bytes()).expect("write stdin");
    }
    child.wait_with_output().expect("wait for pumlsteps")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
