#![allow(dead_code)]

use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

#[derive(Debug)]
pub struct BbRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl BbRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }

    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&extract_json_payload(&self.stdout))
            .unwrap_or_else(|err| panic!("stdout is not JSON ({err}): {}", self.stdout))
    }

    /// The structured error printed after any log lines on stderr.
    pub fn error_json(&self) -> serde_json::Value {
        let lines: Vec<&str> = self.stderr.lines().collect();
        let start = lines.iter().rposition(|line| *line == "{").unwrap_or(0);
        serde_json::from_str(&lines[start..].join("\n"))
            .unwrap_or_else(|err| panic!("stderr is not JSON ({err}): {}", self.stderr))
    }
}

pub struct BbWorkspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl BbWorkspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// A workspace with `bugboard init` already run.
    pub fn initialized() -> Self {
        let workspace = Self::new();
        let init = run_bugboard(&workspace, ["init"], "init");
        assert!(init.status.success(), "init failed: {}", init.stderr);
        workspace
    }

    pub fn config_path(&self) -> PathBuf {
        self.root.join(".bugboard").join("config.yaml")
    }
}

pub fn run_bugboard<I, S>(workspace: &BbWorkspace, args: I, label: &str) -> BbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bugboard_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

/// Run as a named actor with the given role.
pub fn run_as<I, S>(workspace: &BbWorkspace, actor: &str, role: &str, args: I, label: &str) -> BbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_bugboard_with_env(
        workspace,
        args,
        [("BUGBOARD_ACTOR", actor), ("BUGBOARD_ROLE", role)],
        label,
    )
}

pub fn run_bugboard_with_env<I, S, E, K, V>(
    workspace: &BbWorkspace,
    args: I,
    env_vars: E,
    label: &str,
) -> BbRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bugboard"));
    cmd.current_dir(&workspace.root);
    for key in [
        "BUGBOARD_ACTOR",
        "BUGBOARD_ROLE",
        "BUGBOARD_DIR",
        "BUGBOARD_DB",
        "BUGBOARD_JSON",
        "BUGBOARD_SYNC_MODE",
    ] {
        cmd.env_remove(key);
    }
    cmd.args(args);
    cmd.envs(env_vars);
    cmd.env("NO_COLOR", "1");
    cmd.env("RUST_LOG", "bugboard=debug");
    cmd.env("HOME", &workspace.root);

    let start = Instant::now();
    let output = cmd.output().expect("run bugboard");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let log_body = format!(
        "label: {label}\nduration: {:?}\nstatus: {}\nargs: {:?}\ncwd: {}\n\nstdout:\n{}\n\nstderr:\n{}\n",
        duration,
        output.status,
        cmd.get_args().collect::<Vec<_>>(),
        workspace.root.display(),
        stdout,
        stderr
    );
    fs::write(&log_path, log_body).expect("write log");

    BbRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

pub fn extract_json_payload(stdout: &str) -> String {
    let lines: Vec<&str> = stdout.lines().collect();
    for (idx, line) in lines.iter().enumerate() {
        let trimmed = line.trim_start();
        if trimmed.starts_with('[') || trimmed.starts_with('{') {
            return lines[idx..].join("\n").trim().to_string();
        }
    }
    stdout.trim().to_string()
}
