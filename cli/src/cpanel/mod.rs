//! # cPanel/WHM Command Adapter
//!
//! File: cli/src/cpanel/mod.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This module runs one cPanel/WHM command-line API call and turns whatever
//! happened into either a [`Report`] or a typed [`CpanelError`]. It handles:
//! - Validating the request before anything is spawned
//! - Building the argument vector (`argv`)
//! - Running the utility directly, never through a shell
//! - Parsing the JSON envelope and classifying it per API version (`envelope`)
//!
//! ## Architecture
//!
//! - `request`: `ApiVersion` and `InvocationRequest`
//! - `argv`: argument vector construction and value encoding
//! - `envelope`: result-section lookup and success/failure classification
//! - `report`: captured process outcome and the normalized report
//!
//! `CommandAdapter` is generic over [`CommandRunner`] so tests can script
//! process results. Each `execute` call is independent and blocks until the
//! child process has exited; there are no retries and no timeout at this level.
//!
//! ## Examples
//!
//! ```rust
//! let adapter = CommandAdapter::new(SystemRunner);
//! let request = InvocationRequest::new(
//!     ApiVersion::Uapi,
//!     None,
//!     Some("Mysql".into()),
//!     "create_user",
//!     args,
//! )?;
//! let report = adapter.execute(&request)?;
//! println!("{}", serde_json::to_string_pretty(&report)?);
//! ```
//!
pub mod argv;
pub mod envelope;
pub mod report;
pub mod request;

use crate::common::process::{CommandRunner, SystemRunner};
use crate::core::error::CpanelError;
use chrono::Local;
use envelope::{classify, ApiResult, Classification};
use report::{ExecutionOutcome, Report};
use request::InvocationRequest;
use std::path::PathBuf;
use tracing::{debug, info, trace, warn};

/// Executes API calls through a [`CommandRunner`].
#[derive(Debug, Clone, Default)]
pub struct CommandAdapter<R = SystemRunner> {
    runner: R,
    bin_dir: Option<PathBuf>,
}

impl<R: CommandRunner> CommandAdapter<R> {
    pub fn new(runner: R) -> Self {
        Self {
            runner,
            bin_dir: None,
        }
    }

    /// Look the utilities up in `dir` instead of on `PATH`.
    pub fn with_bin_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.bin_dir = dir;
        self
    }

    /// The argument vector `request` would run with, first element being the
    /// program actually executed.
    pub fn command_line(&self, request: &InvocationRequest) -> Result<Vec<String>, CpanelError> {
        request.validate()?;
        let mut cmd = argv::build_argv(request);
        if let Some(dir) = &self.bin_dir {
            cmd[0] = dir.join(request.version.as_str()).to_string_lossy().into_owned();
        }
        Ok(cmd)
    }

    /// Runs `request` once and normalizes the result.
    pub fn execute(&self, request: &InvocationRequest) -> Result<Report, CpanelError> {
        let cmd = self.command_line(request)?;
        info!(
            "Calling {} {}{} ({} argument(s))",
            request.version,
            request.module().map(|m| format!("{}::", m)).unwrap_or_default(),
            request.function,
            request.args.len()
        );
        trace!("Argument vector: {:?}", cmd);

        let started_at = Local::now();
        let output = self
            .runner
            .run(&cmd[0], &cmd[1..])
            .map_err(|source| CpanelError::Launch {
                program: cmd[0].clone(),
                source,
            })?;
        let ended_at = Local::now();
        let outcome = ExecutionOutcome::new(output, started_at, ended_at);
        debug!(
            "{} finished with rc={} after {}",
            request.version,
            outcome.return_code,
            report::format_delta(outcome.duration)
        );

        let parsed = ApiResult::parse(&outcome.raw_stdout);

        // A failed process is reported as such whatever its stdout says.
        if outcome.return_code != 0 {
            warn!("{} exited with non-zero return code {}", request.version, outcome.return_code);
            let (result, data) = match parsed {
                Ok(api) => (Some(api.result_section), api.data),
                Err(_) => (None, None),
            };
            return Err(CpanelError::Subprocess {
                report: Box::new(Report::new(cmd, &outcome, result, data)),
            });
        }

        let api = match parsed {
            Ok(api) => api,
            Err(detail) => {
                warn!("Could not parse {} output: {}", request.version, detail);
                return Err(CpanelError::ResponseParse {
                    detail,
                    report: Box::new(Report::new(cmd, &outcome, None, None)),
                });
            }
        };

        let classification = classify(request.version, &api.result_section);
        let report = Report::new(cmd, &outcome, Some(api.result_section), api.data);
        match classification {
            Classification::Success => Ok(report),
            Classification::Failure(reason) => {
                warn!("{} reported errors: {}", request.version, reason);
                Err(CpanelError::ApiSemantic {
                    reason,
                    report: Box::new(report),
                })
            }
        }
    }
}
