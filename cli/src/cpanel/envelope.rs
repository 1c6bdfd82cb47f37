//! # API Response Envelopes
//!
//! File: cli/src/cpanel/envelope.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! Parsing and classification of the JSON document printed by the API
//! utilities. Each utility wraps its payload differently:
//!
//! - `uapi`: `{"result": {"data": ..., "errors": [...]}}`
//! - `cpapi1/2/3`: `{"cpanelresult": {"data": ..., "error": "..."}}`
//! - `whmapi0/1`: `{"metadata": {"result": 1, "reason": "OK"}, "data": ...}`
//!
//! [`ApiResult::parse`] locates the result section, [`classify`] decides
//! whether the call succeeded. Classification is a pure function of the
//! version and the result section.
//!
use super::request::ApiVersion;
use serde_json::Value;

/// Parsed API output.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult {
    pub envelope: Value,
    pub result_section: Value,
    pub data: Option<Value>,
}

impl ApiResult {
    /// Parses raw stdout. The document must be UTF-8 JSON whose top level is an object.
    pub fn parse(stdout: &[u8]) -> Result<Self, String> {
        let envelope: Value = serde_json::from_slice(stdout).map_err(|e| e.to_string())?;
        if !envelope.is_object() {
            return Err(format!(
                "expected a JSON object, found {}",
                json_kind(&envelope)
            ));
        }

        let result_section = envelope
            .get("result")
            .or_else(|| envelope.get("cpanelresult"))
            .cloned()
            .unwrap_or_else(|| envelope.clone());
        let data = result_section.get("data").cloned();

        Ok(Self {
            envelope,
            result_section,
            data,
        })
    }
}

/// Outcome of inspecting a result section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    Success,
    Failure(String),
}

pub fn classify(version: ApiVersion, result_section: &Value) -> Classification {
    match version {
        ApiVersion::Uapi => classify_uapi(result_section),
        v if v.is_cpapi() => classify_cpapi(result_section),
        _ => classify_whm(result_section),
    }
}

fn classify_uapi(section: &Value) -> Classification {
    match section.get("errors") {
        Some(Value::Array(errors)) if !errors.is_empty() => Classification::Failure(
            errors
                .iter()
                .map(render)
                .collect::<Vec<_>>()
                .join("; "),
        ),
        Some(other) if !other.is_array() && is_truthy(other) => {
            Classification::Failure(render(other))
        }
        _ => Classification::Success,
    }
}

fn classify_cpapi(section: &Value) -> Classification {
    match section.get("error") {
        Some(error) if is_truthy(error) => Classification::Failure(render(error)),
        _ => Classification::Success,
    }
}

fn classify_whm(section: &Value) -> Classification {
    let Some(metadata) = section.get("metadata") else {
        return Classification::Failure("no metadata in response".to_string());
    };
    // `false` counts as a zero result.
    let failed = match metadata.get("result") {
        Some(Value::Bool(result)) => !result,
        Some(result) => result.as_f64().is_some_and(|result| result == 0.0),
        None => false,
    };
    if !failed {
        return Classification::Success;
    }
    let reason = metadata
        .get("reason")
        .filter(|reason| !reason.is_null())
        .map(render)
        .unwrap_or_else(|| "no reason given".to_string());
    Classification::Failure(reason)
}

/// Loose truthiness: null, false, 0, "", [] and {} are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

/// Strings without quotes, everything else as compact JSON.
fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
