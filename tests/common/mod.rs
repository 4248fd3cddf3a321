//! Shared test utilities and fixtures
//!
//! Helpers for driving the `kiln` binary against a scratch home directory.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// A scratch home directory with an optional config file.
pub struct Sandbox {
    home: TempDir,
}

impl Sandbox {
    pub fn new() -> Self {
        Self {
            home: tempfile::tempdir().expect("create temp home"),
        }
    }

    pub fn home(&self) -> &Path {
        self.home.path()
    }

    /// Write `~/.kiln/config.toml` and return its path.
    pub fn write_default_config(&self, contents: &str) -> PathBuf {
        let dir = self.home().join(".kiln");
        std::fs::create_dir_all(&dir).expect("create config dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).expect("write config");
        path
    }

    /// Write a config file outside the default location.
    pub fn write_config(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.home().join(name);
        std::fs::write(&path, contents).expect("write config");
        path
    }

    /// A `kiln` command isolated from the caller's environment.
    pub fn command(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_kiln"));
        cmd.env("HOME", self.home())
            .env("USERPROFILE", self.home())
            .env_remove("KILN_CONFIG")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run `kiln` with `args`, feeding `stdin`.
    pub fn run(&self, args: &[&str], stdin: &str) -> Output {
        run_with(self.command().args(args), stdin)
    }
}

pub fn run_with(cmd: &mut Command, stdin: &str) -> Output {
    let mut child = cmd
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn kiln");
    child
        .stdin
        .take()
        .expect("stdin piped")
        .write_all(stdin.as_bytes())
        .expect("write stdin");
    child.wait_with_output().expect("wait for kiln")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
