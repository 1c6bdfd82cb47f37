//! # cpanel-api Error Types
//!
//! File: cli/src/core/error.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This module defines the error types used throughout the cpanel-api
//! application. Adapter failures are typed so a caller can tell apart a bad
//! request, a failed process, an unreadable response and an API-level refusal.
//!
//! ## Architecture
//!
//! The error system consists of two main components:
//! - `CpanelError`: A custom error enum using `thiserror` for specific error types
//! - `Result<T>`: A type alias for `anyhow::Result<T>` for application plumbing
//!
//! Every error produced after the subprocess ran carries the diagnostic
//! [`Report`] (command line, stdout, stderr, return code, timing), reachable
//! through [`CpanelError::report`].
//!
//! ## Examples
//!
//! ```rust
//! match adapter.execute(&request) {
//!     Ok(report) => println!("{:?}", report.data),
//!     Err(e) => {
//!         eprintln!("{}", e);
//!         if let Some(report) = e.report() {
//!             eprintln!("rc={} stderr={}", report.rc, report.stderr);
//!         }
//!     }
//! }
//! ```
//!
use crate::cpanel::report::Report;
use thiserror::Error;

/// Custom error type for the cpanel-api application.
#[derive(Error, Debug)]
pub enum CpanelError {
    /// Problems with configuration files (not with an individual request).
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request itself is invalid; raised before any process is spawned.
    #[error("{0}")]
    InvalidRequest(String),

    #[error("failed to launch '{program}'")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("non-zero return code")]
    Subprocess { report: Box<Report> },

    #[error("failed to parse API response: {detail}")]
    ResponseParse { detail: String, report: Box<Report> },

    #[error("errors returned: {reason}")]
    ApiSemantic { reason: String, report: Box<Report> },

    #[error("Argument parsing error: {0}")]
    ArgumentParsing(String),
}

impl CpanelError {
    /// The diagnostic report captured for this failure, if the process ran.
    pub fn report(&self) -> Option<&Report> {
        match self {
            CpanelError::Subprocess { report }
            | CpanelError::ResponseParse { report, .. }
            | CpanelError::ApiSemantic { report, .. } => Some(report),
            _ => None,
        }
    }
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
