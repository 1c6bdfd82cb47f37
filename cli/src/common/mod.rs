//! # cpanel-api Common Utilities (`common`)
//!
//! File: cli/src/common/mod.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! Shared, domain-neutral helpers used by the adapter:
//!
//! - **`encoding`**: URL component escaping of argument values.
//! - **`process`**: Running an external program without a shell and capturing its output.
//!

/// Percent-encoding of argument values.
pub mod encoding;
/// Utilities for executing external processes and capturing their output.
pub mod process;
