//! # cpanel-api Call Handler
//!
//! File: cli/src/commands/call.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! This module implements the `cpanel-api call` subcommand, which runs one
//! cPanel/WHM API function and prints the normalized result as JSON. It is the
//! caller side of the adapter: it gathers parameters, runs the call, and
//! turns the outcome into the document an orchestration system consumes.
//!
//! ## Architecture
//!
//! 1. Merge request parameters: flags, then `--params` file, then config defaults.
//! 2. Build and validate an `InvocationRequest`.
//! 3. With `--dry-run`, print the resolved request and argument vector and stop.
//! 4. Otherwise run the adapter on a blocking thread, bounded by `--timeout`
//!    (or `execution.timeout_secs`) when set.
//! 5. Print the report, or a `{"failed": true, "msg": ...}` document, on stdout.
//!
//! ## Usage
//!
//! ```bash
//! # Create a MySQL user for the current account
//! cpanel-api call --module Mysql --function create_user \
//!     --arg name=foo_test1 --arg password=changeme
//!
//! # WHM call as root, no module
//! cpanel-api call --api whmapi1 --function accountsummary --arg user=bob
//!
//! # Parameters from a JSON file, only show what would run
//! cpanel-api call --params create_user.json --dry-run
//! ```
//!
use crate::{
    common::process::{CommandRunner, SystemRunner},
    core::{
        config::Config,
        error::{CpanelError, Result},
    },
    cpanel::{
        report::Report,
        request::{ApiVersion, InvocationRequest},
        CommandAdapter,
    },
};
use anyhow::{anyhow, Context};
use clap::Parser;
use serde::Deserialize;
use serde_json::{json, Value};
use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use tracing::{debug, info};

/// # Call Arguments (`CallArgs`)
///
/// Every request field can come from a flag or from the `--params` file;
/// flags win.
#[derive(Parser, Debug)]
#[command(about = "Call a cPanel/WHM API function and print the normalized result as JSON")]
pub struct CallArgs {
    /// API utility to run (defaults to the configured version, then `uapi`).
    #[arg(long, value_enum, value_name = "VERSION")]
    api: Option<ApiVersion>,

    /// cPanel account to run the call as (`--user=` for the utility).
    #[arg(long)]
    account: Option<String>,

    /// Module containing the function. Required unless the API is whmapi0/whmapi1.
    #[arg(long)]
    module: Option<String>,

    /// Function to call.
    #[arg(long)]
    function: Option<String>,

    /// Function argument as KEY=VALUE. Repeatable; values are URL-escaped for you.
    #[arg(long = "arg", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    args: Vec<(String, String)>,

    /// JSON parameter file: {"version", "account", "module", "function", "args"}.
    #[arg(long, value_name = "FILE")]
    params: Option<PathBuf>,

    /// Print the argument vector that would be executed and exit.
    #[arg(long)]
    dry_run: bool,

    /// Give up waiting for the API utility after this many seconds.
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Print single-line JSON instead of pretty-printed JSON.
    #[arg(long)]
    compact: bool,
}

/// Contents of a `--params` file. All fields optional so flags can fill gaps.
#[derive(Deserialize, Debug, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct RequestParams {
    version: Option<ApiVersion>,
    account: Option<String>,
    module: Option<String>,
    function: Option<String>,
    #[serde(default)]
    args: BTreeMap<String, String>,
}

/// Splits `KEY=VALUE` at the first `=`.
fn parse_key_val(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, _)) if key.is_empty() => Err(format!("empty key in `{}`", s)),
        Some((key, value)) => Ok((key.to_string(), value.to_string())),
        None => Err(format!("expected KEY=VALUE, found `{}`", s)),
    }
}

/// # Handle Call Command (`handle_call`)
///
/// Runs the requested API function once.
///
/// ## Returns
///
/// * `Ok(())` after printing a successful report.
/// * `Err` after printing a failure document, so the process exits non-zero.
pub async fn handle_call(args: CallArgs, config: &Config) -> Result<()> {
    let adapter = CommandAdapter::new(SystemRunner)
        .with_bin_dir(config.execution.bin_dir.as_ref().map(PathBuf::from));
    let (request, cmd) = match prepare_request(&args, config, &adapter) {
        Ok(prepared) => prepared,
        Err(err) => {
            println!("{}", render(&rejection_document(&err), args.compact)?);
            return Err(err);
        }
    };

    if args.dry_run {
        info!("Dry run, not executing {}", request.version);
        let plan = json!({ "cmd": cmd, "request": request, "changed": false });
        println!("{}", render(&plan, args.compact)?);
        return Ok(());
    }

    let timeout = args
        .timeout
        .or(config.execution.timeout_secs)
        .map(Duration::from_secs);

    match run_adapter(adapter, request, timeout).await {
        Ok(Ok(report)) => {
            println!("{}", render(&report, args.compact)?);
            Ok(())
        }
        Ok(Err(err)) => {
            println!("{}", render(&failure_document(&err), args.compact)?);
            Err(anyhow!(err))
        }
        Err(err) => {
            println!(
                "{}",
                render(&json!({ "failed": true, "msg": err.to_string() }), args.compact)?
            );
            Err(err)
        }
    }
}

/// Everything that can reject a call before the utility is spawned: reading
/// the params file, merging parameters, and resolving the command line.
fn prepare_request<R: CommandRunner>(
    args: &CallArgs,
    config: &Config,
    adapter: &CommandAdapter<R>,
) -> Result<(InvocationRequest, Vec<String>)> {
    let params = match &args.params {
        Some(path) => load_params(path)?,
        None => RequestParams::default(),
    };
    let request = build_request(args, params, config)?;
    let cmd = adapter.command_line(&request)?;
    Ok((request, cmd))
}

fn load_params(path: &Path) -> Result<RequestParams> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON parameters from: {}", path.display()))
}

fn build_request(args: &CallArgs, params: RequestParams, config: &Config) -> Result<InvocationRequest> {
    let version = args
        .api
        .or(params.version)
        .or(config.defaults.version)
        .unwrap_or_default();
    let account = args
        .account
        .clone()
        .or(params.account)
        .or_else(|| config.defaults.account.clone());
    let module = args.module.clone().or(params.module);
    let function = args.function.clone().or(params.function).ok_or_else(|| {
        CpanelError::ArgumentParsing(
            "a function is required (use --function or the params file)".to_string(),
        )
    })?;

    let mut call_args = params.args;
    call_args.extend(args.args.iter().cloned());

    debug!(
        "Resolved request: version={}, account={:?}, module={:?}, function={}, {} argument(s)",
        version,
        account,
        module,
        function,
        call_args.len()
    );
    Ok(InvocationRequest::new(version, account, module, function, call_args)?)
}

/// Runs the blocking adapter call off the async runtime, with an optional deadline.
async fn run_adapter(
    adapter: CommandAdapter,
    request: InvocationRequest,
    timeout: Option<Duration>,
) -> Result<std::result::Result<Report, CpanelError>> {
    let task = tokio::task::spawn_blocking(move || adapter.execute(&request));
    let joined = match timeout {
        Some(limit) => tokio::time::timeout(limit, task)
            .await
            .map_err(|_| anyhow!("timed out after {} seconds", limit.as_secs()))?,
        None => task.await,
    };
    joined.context("API call task panicked")
}

/// `{"failed": true, "msg": ...}` plus the report fields when there is a report.
fn failure_document(err: &CpanelError) -> Value {
    let mut doc = err
        .report()
        .and_then(|report| serde_json::to_value(report).ok())
        .unwrap_or_else(|| json!({}));
    if let Some(map) = doc.as_object_mut() {
        map.insert("failed".to_string(), Value::Bool(true));
        map.insert("msg".to_string(), Value::String(error_chain(err)));
    }
    doc
}

/// Failure document for an error raised before anything ran.
fn rejection_document(err: &anyhow::Error) -> Value {
    match err.downcast_ref::<CpanelError>() {
        Some(err) => failure_document(err),
        None => json!({ "failed": true, "msg": format!("{:#}", err) }),
    }
}

/// The error message followed by each of its sources, `: `-separated.
fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn render<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.context("Failed to serialize output")
}
