//! # Execution Outcomes and Reports
//!
//! File: cli/src/cpanel/report.rs
//! Author: cpanel-api maintainers
//!
//! `ExecutionOutcome` is what was captured from the process; `Report` is the
//! normalized, serializable object handed back to the caller (on success, and
//! attached to most failures for diagnostics).
//!
use crate::common::process::{trim_line_endings, ProcessOutput};
use chrono::{DateTime, Local, TimeDelta};
use serde::Serialize;
use serde_json::Value;

/// Everything captured from one process run. Never modified after capture.
#[derive(Debug, Clone)]
pub struct ExecutionOutcome {
    pub return_code: i32,
    pub raw_stdout: Vec<u8>,
    pub raw_stderr: Vec<u8>,
    pub started_at: DateTime<Local>,
    pub ended_at: DateTime<Local>,
    pub duration: TimeDelta,
}

impl ExecutionOutcome {
    pub fn new(output: ProcessOutput, started_at: DateTime<Local>, ended_at: DateTime<Local>) -> Self {
        Self {
            return_code: output.return_code,
            raw_stdout: output.stdout,
            raw_stderr: output.stderr,
            started_at,
            ended_at,
            duration: ended_at - started_at,
        }
    }
}

/// The normalized result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// The argument vector that was executed.
    pub cmd: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    pub stdout: String,
    pub stderr: String,
    pub rc: i32,
    pub start: String,
    pub end: String,
    pub delta: String,
    /// Always true: read-only and mutating API calls cannot be told apart.
    pub changed: bool,
}

impl Report {
    /// Builds a report from the captured outcome. `result` and `data` come
    /// from the parsed envelope when there is one.
    pub fn new(
        cmd: Vec<String>,
        outcome: &ExecutionOutcome,
        result: Option<Value>,
        data: Option<Value>,
    ) -> Self {
        Self {
            cmd,
            result,
            data,
            stdout: String::from_utf8_lossy(trim_line_endings(&outcome.raw_stdout)).into_owned(),
            stderr: String::from_utf8_lossy(trim_line_endings(&outcome.raw_stderr)).into_owned(),
            rc: outcome.return_code,
            start: format_timestamp(&outcome.started_at),
            end: format_timestamp(&outcome.ended_at),
            delta: format_delta(outcome.duration),
            changed: true,
        }
    }
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S%.6f").to_string()
}

/// Renders a duration as `H:MM:SS.ffffff`, with a leading `-` when negative
/// (possible if the wall clock stepped backwards mid-call).
pub fn format_delta(delta: TimeDelta) -> String {
    let sign = if delta < TimeDelta::zero() { "-" } else { "" };
    let delta = delta.abs();
    let total_secs = delta.num_seconds();
    let micros = delta.subsec_nanos() / 1_000;
    format!(
        "{}{}:{:02}:{:02}.{:06}",
        sign,
        total_secs / 3600,
        (total_secs % 3600) / 60,
        total_secs % 60,
        micros
    )
}
