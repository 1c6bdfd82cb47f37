//! # cpanel-api Main Entry Point
//!
//! File: cli/src/main.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This file serves as the main entry point for the cpanel-api CLI, a thin
//! automation adapter around the cPanel/WHM command-line API utilities
//! (`uapi`, `cpapi1`..`cpapi3`, `whmapi0`, `whmapi1`). It handles:
//! - Command-line argument parsing using Clap
//! - Setting up the logging system based on verbosity flags
//! - Loading configuration
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Get help
//! cpanel-api --help
//!
//! # Run a call with increased verbosity (logs go to stderr)
//! cpanel-api -vv call --module Mysql --function list_users
//! ```
//!
//! Command processing flow:
//! 1. Parse command-line args via Clap
//! 2. Configure logging based on verbosity level
//! 3. Load configuration (explicit file, or project + user files)
//! 4. Route to the command handler
//! 5. Display any error and exit non-zero
//!
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{fmt, EnvFilter};

mod commands; // Subcommand handlers (call)
mod common; // Shared utilities (process execution, encoding)
mod core; // Core infrastructure (errors, config)
mod cpanel; // The API adapter: requests, argument vectors, envelopes, reports

/// Defines the top-level command-line arguments structure using Clap's derive macros.
#[derive(Parser, Debug)]
#[command(
    name = "cpanel-api",
    about = "Run cPanel/WHM API functions without a shell and report JSON results",
    long_about = "Calls the cPanel/WHM command-line API utilities with URL-escaped arguments,\n\
                  parses their JSON output and prints a normalized report for automation tools.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
    /// Read configuration from this file only.
    #[arg(long, global = true, env = "CPANEL_API_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Enum defining all available top-level commands.
#[derive(Subcommand, Debug)]
enum Commands {
    #[command(alias = "c")]
    Call(commands::call::CallArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    // Argument values may carry passwords.
    tracing::trace!("Parsed CLI arguments: {:?}", cli);

    let command_result = match core::config::load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Call(args) => commands::call::handle_call(args, &config).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = command_result {
        tracing::debug!("Command execution failed: {:?}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}
