//! # Argument Vector Construction
//!
//! File: cli/src/cpanel/argv.rs
//! Author: cpanel-api maintainers
//!
//! Turns an [`InvocationRequest`] into the exact list of strings handed to
//! the API utility:
//!
//! ```text
//! <version> --output=json [--user=<account>] [<module>] <function> [<key>=<encoded value>...]
//! ```
//!
//! The list is passed to exec as-is and never joined into a command line.
//!
use super::request::InvocationRequest;
use crate::common::encoding::encode_value;

pub fn build_argv(request: &InvocationRequest) -> Vec<String> {
    let mut argv = Vec::with_capacity(4 + request.args.len());
    argv.push(request.version.as_str().to_string());
    argv.push("--output=json".to_string());

    // Operator-supplied identifier, passed verbatim.
    if let Some(account) = request.account() {
        argv.push(format!("--user={}", account));
    }

    if request.version.requires_module() {
        if let Some(module) = request.module() {
            argv.push(module.to_string());
        }
    }

    argv.push(request.function.clone());

    for (key, value) in &request.args {
        argv.push(format!("{}={}", key, encode_value(value)));
    }

    argv
}
