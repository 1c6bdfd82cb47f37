//! # cpanel-api Core Infrastructure
//!
//! File: cli/src/core/mod.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This module aggregates the core infrastructure components shared by the
//! command handlers and the adapter:
//! - `config`: Configuration loading, merging, and validation
//! - `error`: Error types and error handling utilities
//!
//! ## Usage
//!
//! ```rust
//! use crate::core::config; // For loading configuration
//! use crate::core::error::{CpanelError, Result}; // For error handling
//! ```
//!
pub mod config;
pub mod error;
