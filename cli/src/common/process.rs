//! # Process Execution Utilities (`common::process`)
//!
//! File: cli/src/common/process.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! Wrapper around `std::process::Command` for running one external program
//! and capturing everything it produced. The program is executed directly
//! with an argument list; no shell is ever involved, so characters such as
//! `;`, `|`, `&`, `<`, `>` or `$` in an argument reach the program verbatim.
//!
//! ## Architecture
//!
//! - `CommandRunner`: the seam between the adapter and the operating system.
//! - `SystemRunner`: the real implementation, blocking until the child exits.
//! - `ProcessOutput`: return code plus raw stdout/stderr bytes.
//!
//! Tests substitute their own `CommandRunner` to script process results
//! without spawning anything.
//!
use std::io;
use std::process::{Command, ExitStatus, Stdio};
use tracing::debug;

/// Raw result of one finished process.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProcessOutput {
    /// Exit code; `-N` when the process was killed by signal `N`.
    pub return_code: i32,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Runs a program with an argument list and waits for it to finish.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput>;
}

/// Spawns real processes, resolving `program` through `PATH` when it is a bare name.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ProcessOutput> {
        debug!("Spawning '{}' with {} argument(s)", program, args.len());
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .output()?;

        let return_code = exit_code(output.status);
        debug!(
            "'{}' exited with {} ({} bytes stdout, {} bytes stderr)",
            program,
            return_code,
            output.stdout.len(),
            output.stderr.len()
        );

        Ok(ProcessOutput {
            return_code,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(unix)]
fn exit_code(status: ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status
        .code()
        .or_else(|| status.signal().map(|sig| -sig))
        .unwrap_or(-1)
}

#[cfg(not(unix))]
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(-1)
}

/// Strips every trailing `\r` and `\n` byte.
pub fn trim_line_endings(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .rposition(|b| *b != b'\n' && *b != b'\r')
        .map_or(0, |i| i + 1);
    &bytes[..end]
}
