//! # cpanel-api CLI Call Integration Tests
//!
//! File: cli/tests/call.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! End-to-end tests for `cpanel-api call`. Fake `uapi`/`whmapi1`/`cpapi2`
//! utilities are placed on `PATH`, so the real process layer runs while the
//! API responses stay under test control. Unix only, since the fakes are
//! `/bin/sh` scripts.
//!
#![cfg(unix)]

mod common;
use common::*;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;

fn stdout_json(output: &std::process::Output) -> Value {
    serde_json::from_slice(&output.stdout).expect("stdout should be a JSON document")
}

/// # Test Successful uapi Call (`test_call_uapi_success`)
///
/// The report carries the data section, the executed vector and `changed: true`.
#[test]
fn test_call_uapi_success() {
    let bin = FakeBin::new();
    bin.install("uapi", r#"{"result":{"data":{"id":1},"errors":[]}}"#, 0);

    let output = bin
        .cmd()
        .args([
            "call",
            "--module",
            "Mysql",
            "--function",
            "create_user",
            "--arg",
            "name=foo_test1",
            "--arg",
            "password=changeme",
        ])
        .assert()
        .success()
        .get_output()
        .clone();

    let report = stdout_json(&output);
    assert_eq!(report["data"], serde_json::json!({"id": 1}));
    assert_eq!(report["changed"], Value::Bool(true));
    assert_eq!(report["rc"], serde_json::json!(0));
    assert_eq!(
        report["cmd"],
        serde_json::json!([
            "uapi",
            "--output=json",
            "Mysql",
            "create_user",
            "name=foo_test1",
            "password=changeme"
        ])
    );
    assert!(report["stderr"].as_str().unwrap().contains("ARG:create_user"));
}

/// # Test Shell Metacharacters (`test_call_metacharacters_reach_utility_encoded`)
///
/// Values are URL-escaped and delivered as single arguments, with no shell
/// interpreting them on the way.
#[test]
fn test_call_metacharacters_reach_utility_encoded() {
    let bin = FakeBin::new();
    bin.install("uapi", r#"{"result":{"errors":null}}"#, 0);
    let marker = bin.path().join("pwned");

    bin.cmd()
        .args(["call", "--module", "Email", "--function", "add_pop", "--arg"])
        .arg(format!("password=x; touch {} | cat & echo <a >b", marker.display()))
        .assert()
        .success()
        .stdout(predicate::str::contains("%3B%20touch%20"))
        .stdout(predicate::str::contains("%7C%20cat%20%26%20echo%20%3Ca%20%3Eb"));

    assert!(!marker.exists());
}

/// # Test uapi Errors (`test_call_uapi_errors_fail`)
#[test]
fn test_call_uapi_errors_fail() {
    let bin = FakeBin::new();
    bin.install("uapi", r#"{"result":{"errors":["bad user"]}}"#, 0);

    let output = bin
        .cmd()
        .args(["call", "--module", "Mysql", "--function", "create_user"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error: errors returned: bad user"))
        .get_output()
        .clone();

    let doc = stdout_json(&output);
    assert_eq!(doc["failed"], Value::Bool(true));
    assert_eq!(doc["msg"], "errors returned: bad user");
}

/// # Test WHM Metadata Failure (`test_call_whmapi1_metadata_failure`)
#[test]
fn test_call_whmapi1_metadata_failure() {
    let bin = FakeBin::new();
    bin.install("whmapi1", r#"{"metadata":{"result":0,"reason":"no such user"}}"#, 0);

    bin.cmd()
        .args(["call", "--api", "whmapi1", "--function", "accountsummary", "--arg", "user=nobody"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("no such user"));
}

/// # Test Non-zero Return Code (`test_call_nonzero_rc_keeps_output`)
///
/// Exit code wins over a clean-looking envelope; stdout/stderr stay in the report.
#[test]
fn test_call_nonzero_rc_keeps_output() {
    let bin = FakeBin::new();
    bin.install("uapi", r#"{"result":{"errors":[]}}"#, 1);

    let output = bin
        .cmd()
        .args(["call", "--module", "Mysql", "--function", "list_users", "--compact"])
        .assert()
        .code(1)
        .get_output()
        .clone();

    let doc = stdout_json(&output);
    assert_eq!(doc["msg"], "non-zero return code");
    assert_eq!(doc["rc"], serde_json::json!(1));
    assert_eq!(doc["stdout"], r#"{"result":{"errors":[]}}"#);
    assert!(doc["stderr"].as_str().unwrap().contains("ARG:list_users"));
}

/// # Test Unparseable Output (`test_call_invalid_json`)
#[test]
fn test_call_invalid_json() {
    let bin = FakeBin::new();
    bin.install("uapi", "this is not json", 0);

    bin.cmd()
        .args(["call", "--module", "Mysql", "--function", "list_users"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("failed to parse API response"))
        .stdout(predicate::str::contains("this is not json"));
}

/// # Test Missing Module (`test_call_missing_module`)
///
/// Rejected before anything runs: no fake utility is installed at all.
#[test]
fn test_call_missing_module() {
    let bin = FakeBin::new();
    let output = bin
        .cmd()
        .args(["call", "--function", "create_user"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("api version requires the module argument"))
        .get_output()
        .clone();

    let doc = stdout_json(&output);
    assert_eq!(doc["failed"], true);
    assert_eq!(doc["msg"], "api version requires the module argument");
    assert!(doc.get("rc").is_none());
}

/// # Test Missing Function (`test_call_missing_function`)
#[test]
fn test_call_missing_function() {
    let bin = FakeBin::new();
    let output = bin
        .cmd()
        .args(["call", "--module", "Mysql", "--compact"])
        .assert()
        .failure()
        .get_output()
        .clone();

    let doc = stdout_json(&output);
    assert_eq!(doc["failed"], true);
    assert!(doc["msg"].as_str().unwrap().contains("a function is required"));
}

/// # Test Unreadable Params File (`test_call_unreadable_params_file`)
#[test]
fn test_call_unreadable_params_file() {
    let bin = FakeBin::new();
    let params = bin.path().join("params.json");
    fs::write(&params, "{\"module\": ").unwrap();

    let output = bin
        .cmd()
        .args(["call", "--dry-run", "--params"])
        .arg(&params)
        .assert()
        .failure()
        .get_output()
        .clone();

    let doc = stdout_json(&output);
    assert_eq!(doc["failed"], true);
    assert!(doc["msg"]
        .as_str()
        .unwrap()
        .starts_with("Failed to parse JSON parameters from:"));
}

/// # Test Missing Utility (`test_call_missing_utility`)
#[test]
fn test_call_missing_utility() {
    let bin = FakeBin::new();
    let config = bin.path().join("cfg.toml");
    fs::write(&config, format!("[execution]\nbin_dir = \"{}\"\n", bin.path().display())).unwrap();

    bin.cmd()
        .args(["--config"])
        .arg(&config)
        .args(["call", "--api", "whmapi0", "--function", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to launch"));
}

/// # Test Dry Run (`test_call_dry_run`)
#[test]
fn test_call_dry_run() {
    let bin = FakeBin::new();
    let output = bin
        .cmd()
        .args([
            "call",
            "--api",
            "cpapi2",
            "--account",
            "bob",
            "--module",
            "Email",
            "--function",
            "listpops",
            "--arg",
            "regex=a b",
            "--dry-run",
        ])
        .assert()
        .success()
        .get_output()
        .clone();

    let plan = stdout_json(&output);
    assert_eq!(
        plan["cmd"],
        serde_json::json!(["cpapi2", "--output=json", "--user=bob", "Email", "listpops", "regex=a%20b"])
    );
    assert_eq!(plan["changed"], Value::Bool(false));
    assert_eq!(plan["request"]["account"], "bob");
}

/// # Test Params File And Config Defaults (`test_call_params_file_with_config`)
///
/// Version comes from the config file, everything else from the params file,
/// and the utility is found through `execution.bin_dir`.
#[test]
fn test_call_params_file_with_config() {
    let bin = FakeBin::new();
    bin.install(
        "cpapi2",
        r#"{"cpanelresult":{"data":[{"email":"bob@example.com"}],"event":{"result":1}}}"#,
        0,
    );
    let config = bin.path().join("cpanel.toml");
    fs::write(
        &config,
        format!(
            "[defaults]\nversion = \"cpapi2\"\naccount = \"bob\"\n\n[execution]\nbin_dir = \"{}\"\ntimeout_secs = 30\n",
            bin.path().display()
        ),
    )
    .unwrap();
    let params = bin.path().join("params.json");
    fs::write(&params, r#"{"module": "Email", "function": "listpops"}"#).unwrap();

    let output = cpanel_api_cmd()
        .env("CPANEL_API_CONFIG", &config)
        .current_dir(bin.path())
        .args(["call", "--params"])
        .arg(&params)
        .assert()
        .success()
        .get_output()
        .clone();

    let report = stdout_json(&output);
    assert_eq!(report["data"][0]["email"], "bob@example.com");
    let expected_program = bin.path().join("cpapi2").display().to_string();
    assert_eq!(report["cmd"][0], Value::String(expected_program));
    assert_eq!(report["cmd"][2], "--user=bob");
}

/// # Test Timeout (`test_call_timeout`)
#[test]
fn test_call_timeout() {
    let bin = FakeBin::new();
    bin.install("uapi", r#"{"result":{}}"#, 0);
    // Replace the fake with one that outlives the deadline.
    let slow = bin.path().join("uapi");
    let script = fs::read_to_string(&slow).unwrap().replace("#!/bin/sh\n", "#!/bin/sh\nsleep 5\n");
    fs::write(&slow, script).unwrap();

    bin.cmd()
        .args(["call", "--module", "Mysql", "--function", "list_users", "--timeout", "1"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("timed out after 1 seconds"));
}

/// # Test Bad Argument Syntax (`test_call_rejects_malformed_arg`)
#[test]
fn test_call_rejects_malformed_arg() {
    cpanel_api_cmd()
        .args(["call", "--module", "Mysql", "--function", "f", "--arg", "novalue"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected KEY=VALUE"));
}
