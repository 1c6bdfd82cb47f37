//! # cpanel-api CLI Integration Test Common Helpers
//!
//! File: cli/tests/common.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! Shared helpers for the integration tests: locating the compiled binary and
//! installing fake API utilities into a temporary directory that is then put
//! on `PATH`. The fakes print a canned JSON document, echo each argument they
//! received on its own stderr line, and exit with a chosen code.
//!

// Different test files use different helpers.
#![allow(dead_code)]

pub use assert_cmd::Command;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// # Get cpanel-api Command (`cpanel_api_cmd`)
///
/// Creates an `assert_cmd::Command` for the compiled `cpanel-api` binary,
/// isolated from any user or project configuration.
///
/// ## Panics
/// Panics if the `cpanel-api` binary cannot be found via `Command::cargo_bin`.
pub fn cpanel_api_cmd() -> Command {
    let mut cmd = Command::cargo_bin("cpanel-api").expect("Failed to find cpanel-api binary for testing");
    cmd.env_remove("CPANEL_API_CONFIG").env_remove("RUST_LOG");
    cmd
}

/// A directory of fake API utilities.
pub struct FakeBin {
    pub dir: TempDir,
}

impl FakeBin {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("Failed to create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Installs `name` printing `stdout` and exiting with `rc`.
    #[cfg(unix)]
    pub fn install(&self, name: &str, stdout: &str, rc: i32) -> &Self {
        use std::os::unix::fs::PermissionsExt;

        let script = format!(
            "#!/bin/sh\nfor a in \"$@\"; do printf 'ARG:%s\\n' \"$a\" >&2; done\ncat <<'__JSON__'\n{}\n__JSON__\nexit {}\n",
            stdout, rc
        );
        let path = self.path().join(name);
        fs::write(&path, script).expect("Failed to write fake utility");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake utility executable");
        self
    }

    /// A `PATH` value with the fake directory first.
    pub fn path_env(&self) -> String {
        match std::env::var("PATH") {
            Ok(existing) if !existing.is_empty() => {
                format!("{}:{}", self.path().display(), existing)
            }
            _ => self.path().display().to_string(),
        }
    }

    /// `cpanel_api_cmd()` running inside the fake directory with it on `PATH`.
    pub fn cmd(&self) -> Command {
        let mut cmd = cpanel_api_cmd();
        cmd.env("PATH", self.path_env())
            .env("XDG_CONFIG_HOME", self.path())
            .current_dir(self.path());
        cmd
    }
}

impl Default for FakeBin {
    fn default() -> Self {
        Self::new()
    }
}
