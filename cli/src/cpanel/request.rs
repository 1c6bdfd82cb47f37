//! # Invocation Requests
//!
//! File: cli/src/cpanel/request.rs
//! Author: cpanel-api maintainers
//!
//! ## Overview
//!
//! Typed description of one API call: which utility to run (`ApiVersion`),
//! which account to run it as, and which module/function to call with which
//! arguments. A request is validated when it is built so an invalid
//! version/module combination never reaches the process layer.
//!
//! Parameter files use the same field names an orchestration caller sends:
//!
//! ```json
//! {
//!   "version": "uapi",
//!   "module": "Mysql",
//!   "function": "create_user",
//!   "args": { "name": "foo_test1", "password": "changeme" }
//! }
//! ```
//!
use crate::core::error::CpanelError;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// The cPanel/WHM command-line API utilities. The lowercase name of each
/// variant is also the name of the executable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    #[default]
    #[value(name = "uapi")]
    Uapi,
    #[value(name = "cpapi1")]
    Cpapi1,
    #[value(name = "cpapi2")]
    Cpapi2,
    #[value(name = "cpapi3")]
    Cpapi3,
    #[value(name = "whmapi0")]
    Whmapi0,
    #[value(name = "whmapi1")]
    Whmapi1,
}

impl ApiVersion {
    /// Executable name, also the first token of the argument vector.
    pub fn as_str(self) -> &'static str {
        match self {
            ApiVersion::Uapi => "uapi",
            ApiVersion::Cpapi1 => "cpapi1",
            ApiVersion::Cpapi2 => "cpapi2",
            ApiVersion::Cpapi3 => "cpapi3",
            ApiVersion::Whmapi0 => "whmapi0",
            ApiVersion::Whmapi1 => "whmapi1",
        }
    }

    /// WHM utilities address functions directly, without a module name.
    pub fn is_whm(self) -> bool {
        matches!(self, ApiVersion::Whmapi0 | ApiVersion::Whmapi1)
    }

    pub fn is_cpapi(self) -> bool {
        matches!(
            self,
            ApiVersion::Cpapi1 | ApiVersion::Cpapi2 | ApiVersion::Cpapi3
        )
    }

    pub fn requires_module(self) -> bool {
        !self.is_whm()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One API call. Build with [`InvocationRequest::new`] to get validation up
/// front; [`crate::cpanel::CommandAdapter::execute`] validates again before
/// spawning anything.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InvocationRequest {
    #[serde(default)]
    pub version: ApiVersion,
    #[serde(default)]
    pub account: Option<String>,
    #[serde(default)]
    pub module: Option<String>,
    pub function: String,
    /// Sorted map, so the argument vector is reproducible from run to run.
    #[serde(default)]
    pub args: BTreeMap<String, String>,
}

impl InvocationRequest {
    pub fn new(
        version: ApiVersion,
        account: Option<String>,
        module: Option<String>,
        function: impl Into<String>,
        args: BTreeMap<String, String>,
    ) -> Result<Self, CpanelError> {
        let request = Self {
            version,
            account,
            module,
            function: function.into(),
            args,
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), CpanelError> {
        if self.version.requires_module() && self.module().is_none() {
            return Err(CpanelError::InvalidRequest(
                "api version requires the module argument".to_string(),
            ));
        }
        if self.function.trim().is_empty() {
            return Err(CpanelError::InvalidRequest(
                "the function argument is required".to_string(),
            ));
        }
        Ok(())
    }

    /// The account, treating an empty string as absent.
    pub fn account(&self) -> Option<&str> {
        self.account.as_deref().filter(|a| !a.is_empty())
    }

    /// The module, treating an empty string as absent.
    pub fn module(&self) -> Option<&str> {
        self.module.as_deref().filter(|m| !m.is_empty())
    }
}
