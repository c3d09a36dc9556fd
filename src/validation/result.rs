//! Rule Results
//!
//! What a single rule reports for a single region.

use serde::Serialize;

use crate::core::diagnostics::Finding;

/// Outcome of one rule over one region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Ok,
    Fail,
    Warn,
}

/// Result of evaluating a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleResult {
    pub status: Status,
    pub findings: Vec<Finding>,
    /// Informational note shown in the checklist (e.g. structure absent)
    pub detail: Option<String>,
}

impl Default for RuleResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl RuleResult {
    pub fn ok() -> Self {
        Self {
            status: Status::Ok,
            findings: Vec::new(),
            detail: None,
        }
    }

    /// Structural absence and similar notes: OK, with an explanation
    pub fn ok_with_detail(detail: impl Into<String>) -> Self {
        Self {
            detail: Some(detail.into()),
            ..Self::ok()
        }
    }

    pub fn warn(findings: Vec<Finding>) -> Self {
        Self {
            status: Status::Warn,
            findings,
            detail: None,
        }
    }

    pub fn fail(findings: Vec<Finding>) -> Self {
        Self {
            status: Status::Fail,
            findings,
            detail: None,
        }
    }

    /// FAIL when any finding exists, OK otherwise
    pub fn from_findings(findings: Vec<Finding>) -> Self {
        if findings.is_empty() {
            Self::ok()
        } else {
            Self::fail(findings)
        }
    }

    /// WARN when any finding exists, OK otherwise
    pub fn warn_if_any(findings: Vec<Finding>) -> Self {
        if findings.is_empty() {
            Self::ok()
        } else {
            Self::warn(findings)
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}
