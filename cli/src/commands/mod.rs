//! # cpanel-api Command Modules
//!
//! File: cli/src/commands/mod.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This module aggregates the subcommands of the cpanel-api CLI and makes
//! them accessible to the main application entry point (`main.rs`). Each
//! subcommand defines its own arguments structure and an async handler.
//!
//! ## Commands
//!
//! - `call`: Run one cPanel/WHM API function and print the normalized result
//!

/// Runs a single API function and prints its report. See `commands/call.rs`.
pub mod call;
