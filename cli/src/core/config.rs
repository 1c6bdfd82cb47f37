//! # cpanel-api Configuration System
//!
//! File: cli/src/core/config.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This module implements the configuration system for cpanel-api, handling
//! loading, merging, validation, and access to configuration data. It supports
//! a multi-level approach that combines defaults, user settings, and
//! project-specific overrides.
//!
//! ## Architecture
//!
//! Configuration sources (in order of precedence):
//! 1. An explicit file given with `--config` / `CPANEL_API_CONFIG` (used alone)
//! 2. Project-specific `.cpanel-api.toml` in current directory or ancestors
//! 3. User-specific `config.toml` in the platform config directory
//! 4. Default values defined in the code
//!
//! ## Examples
//!
//! ```toml
//! [defaults]
//! version = "whmapi1"
//! account = "bob"
//!
//! [execution]
//! bin_dir = "/usr/local/cpanel/bin"
//! timeout_secs = 60
//! ```
//!
//! ```rust
//! let cfg = config::load_config(None)?;
//! let version = cfg.defaults.version.unwrap_or_default();
//! let bin_dir = cfg.execution.bin_dir.as_deref();
//! ```
//!
use crate::core::error::{CpanelError, Result};
use crate::cpanel::request::ApiVersion;
use anyhow::{anyhow, Context};
use directories::ProjectDirs;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// Represents the main configuration structure, loaded from TOML files.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: RequestDefaults,
    #[serde(default)]
    pub execution: ExecutionConfig,
}

/// Values used when a request does not specify them.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct RequestDefaults {
    /// API version used when neither `--api` nor the parameter file names one.
    pub version: Option<ApiVersion>,
    /// Account passed as `--user=` when none is given.
    pub account: Option<String>,
}

/// How the API utilities are run.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExecutionConfig {
    /// Directory holding `uapi`, `whmapi1`, ... (can use ~). `PATH` lookup when unset.
    pub bin_dir: Option<String>,
    /// Caller-side deadline for one call, in seconds.
    pub timeout_secs: Option<u64>,
}

const PROJECT_CONFIG_FILENAME: &str = ".cpanel-api.toml";

/// Loads, merges, expands and validates configuration. When `explicit` is
/// given only that file is read.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    let mut merged_config = match explicit {
        Some(path) => {
            info!("Loading configuration from: {}", path.display());
            load_config_from_path(path)?
        }
        None => {
            let user_config = load_user_config()?;
            let project_config = load_project_config()?;
            merge_configs(user_config.unwrap_or_default(), project_config)
        }
    };
    expand_config_paths(&mut merged_config);
    validate_config(&merged_config).context("Configuration validation failed")?;
    debug!("Final loaded configuration: {:?}", merged_config);
    Ok(merged_config)
}

fn load_user_config() -> Result<Option<Config>> {
    if let Some(proj_dirs) = ProjectDirs::from("com", "cPanel", "cpanel-api") {
        let config_path = proj_dirs.config_dir().join("config.toml");
        if config_path.exists() {
            info!("Loading user configuration from: {}", config_path.display());
            load_config_from_path(&config_path).map(Some)
        } else {
            debug!(
                "User configuration file not found at {}",
                config_path.display()
            );
            Ok(None)
        }
    } else {
        warn!("Could not determine user config directory.");
        Ok(None)
    }
}

fn load_project_config() -> Result<Option<Config>> {
    let current_dir = std::env::current_dir().context("Failed to get current directory")?;
    if let Some(project_config_path) = find_project_config_path(&current_dir) {
        info!(
            "Loading project configuration from: {}",
            project_config_path.display()
        );
        load_config_from_path(&project_config_path).map(Some)
    } else {
        debug!("No project configuration file ({}) found.", PROJECT_CONFIG_FILENAME);
        Ok(None)
    }
}

/// Walks from `start` towards the root, stopping at the first `.git` directory.
fn find_project_config_path(start: &Path) -> Option<PathBuf> {
    let mut path = start;
    loop {
        let project_config = path.join(PROJECT_CONFIG_FILENAME);
        if project_config.is_file() {
            return Some(project_config);
        }
        if path.join(".git").is_dir() {
            debug!(
                "Found .git directory at {}, stopping project config search.",
                path.display()
            );
            return None;
        }
        path = path.parent()?;
    }
}

fn load_config_from_path(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path.display()))?;
    toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML from file: {}", path.display()))
}

/// Project values win field by field over user values.
fn merge_configs(user: Config, project: Option<Config>) -> Config {
    let Some(project) = project else {
        return user;
    };
    Config {
        defaults: RequestDefaults {
            version: project.defaults.version.or(user.defaults.version),
            account: project.defaults.account.or(user.defaults.account),
        },
        execution: ExecutionConfig {
            bin_dir: project.execution.bin_dir.or(user.execution.bin_dir),
            timeout_secs: project.execution.timeout_secs.or(user.execution.timeout_secs),
        },
    }
}

fn expand_config_paths(config: &mut Config) {
    if let Some(dir) = &mut config.execution.bin_dir {
        *dir = shellexpand::tilde(dir).into_owned();
        debug!("Expanded bin_dir: {}", dir);
    }
}

fn validate_config(config: &Config) -> Result<()> {
    if let Some(dir) = &config.execution.bin_dir {
        if dir.trim().is_empty() {
            return Err(anyhow!(CpanelError::Config(
                "execution.bin_dir cannot be empty.".to_string()
            )));
        }
        let path = PathBuf::from(dir);
        if !path.exists() {
            warn!("Configured bin_dir '{}' does not exist.", path.display());
        } else if !path.is_dir() {
            return Err(anyhow!(CpanelError::Config(format!(
                "Configured bin_dir '{}' exists but is not a directory.",
                path.display()
            ))));
        }
    }
    if config.execution.timeout_secs == Some(0) {
        return Err(anyhow!(CpanelError::Config(
            "execution.timeout_secs must be greater than zero.".to_string()
        )));
    }
    Ok(())
}
