//! Audit session configuration.
//!
//! Everything here is plain data; validation that can fail (glob and custom
//! rule pattern compilation, threshold checks) happens once in
//! [`crate::engine::AuditEngineBuilder::build`] so a scan never starts with a
//! half-valid configuration.

use crate::error::{AuditError, Result};
use crate::types::{Category, Severity};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanType {
    Owasp,
    Secrets,
    Iam,
    All,
}

impl ScanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanType::Owasp => "owasp",
            ScanType::Secrets => "secrets",
            ScanType::Iam => "iam",
            ScanType::All => "all",
        }
    }
}

impl FromStr for ScanType {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "owasp" => Ok(ScanType::Owasp),
            "secrets" => Ok(ScanType::Secrets),
            "iam" => Ok(ScanType::Iam),
            "all" => Ok(ScanType::All),
            other => Err(AuditError::InvalidScanType(other.to_string())),
        }
    }
}

/// A user-supplied pattern rule, merged into the catalog at engine build.
/// The pattern is compiled there; a malformed pattern fails the build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomRuleDef {
    pub id: String,
    pub name: String,
    pub description: String,
    pub pattern: String,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
    pub remediation: String,
}

#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Which detectors to run. `All` expands to every detector.
    pub scan_types: Vec<ScanType>,
    /// Findings strictly below this severity are filtered from the report.
    pub severity_threshold: Severity,
    /// Glob patterns for paths to skip.
    pub exclusions: Vec<String>,
    /// Global finding budget for the pattern scanner.
    pub max_findings: Option<usize>,
    /// Overall wall-clock budget; expiry yields a partial report.
    pub timeout: Option<Duration>,
    pub custom_rules: Vec<CustomRuleDef>,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            scan_types: vec![ScanType::All],
            severity_threshold: Severity::Low,
            exclusions: Vec::new(),
            max_findings: None,
            timeout: None,
            custom_rules: Vec::new(),
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_scan_types(mut self, scan_types: Vec<ScanType>) -> Self {
        self.scan_types = scan_types;
        self
    }

    pub fn with_severity_threshold(mut self, threshold: Severity) -> Self {
        self.severity_threshold = threshold;
        self
    }

    pub fn with_exclusion(mut self, pattern: impl Into<String>) -> Self {
        self.exclusions.push(pattern.into());
        self
    }

    pub fn with_max_findings(mut self, max: usize) -> Self {
        self.max_findings = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_custom_rule(mut self, rule: CustomRuleDef) -> Self {
        self.custom_rules.push(rule);
        self
    }

    /// True when the given detector kind should run.
    pub fn runs(&self, scan_type: ScanType) -> bool {
        self.scan_types
            .iter()
            .any(|t| *t == ScanType::All || *t == scan_type)
    }
}
