use crate::cvss::CvssScore;
use crate::error::{AuditError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Informational => "informational",
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }

    /// Weight used for the aggregate risk score.
    pub fn weight(&self) -> u32 {
        match self {
            Severity::Critical => 10,
            Severity::High => 7,
            Severity::Medium => 4,
            Severity::Low => 1,
            Severity::Informational => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

impl FromStr for Severity {
    type Err = AuditError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "informational" => Ok(Severity::Informational),
            "low" => Ok(Severity::Low),
            "medium" => Ok(Severity::Medium),
            "high" => Ok(Severity::High),
            "critical" => Ok(Severity::Critical),
            other => Err(AuditError::InvalidSeverity(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Injection,
    Xss,
    BrokenAuth,
    SensitiveData,
    BrokenAccessControl,
    SecurityMisconfiguration,
    Ssrf,
    SecretExposure,
    IamMisconfiguration,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Injection => "injection",
            Category::Xss => "xss",
            Category::BrokenAuth => "broken_auth",
            Category::SensitiveData => "sensitive_data",
            Category::BrokenAccessControl => "broken_access_control",
            Category::SecurityMisconfiguration => "security_misconfiguration",
            Category::Ssrf => "ssrf",
            Category::SecretExposure => "secret_exposure",
            Category::IamMisconfiguration => "iam_misconfiguration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub file: String,
    pub line: usize,
}

impl Location {
    pub fn new(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line,
        }
    }
}

/// Lifecycle status of a finding. The only mutable part of a finding.
///
/// Transitions: `open -> {confirmed, false_positive}`,
/// `confirmed -> {mitigated, accepted_risk}`. Everything else is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingStatus {
    Open,
    Confirmed,
    FalsePositive,
    Mitigated,
    AcceptedRisk,
}

impl FindingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingStatus::Open => "open",
            FindingStatus::Confirmed => "confirmed",
            FindingStatus::FalsePositive => "false_positive",
            FindingStatus::Mitigated => "mitigated",
            FindingStatus::AcceptedRisk => "accepted_risk",
        }
    }

    pub fn can_transition_to(&self, to: FindingStatus) -> bool {
        matches!(
            (self, to),
            (FindingStatus::Open, FindingStatus::Confirmed)
                | (FindingStatus::Open, FindingStatus::FalsePositive)
                | (FindingStatus::Confirmed, FindingStatus::Mitigated)
                | (FindingStatus::Confirmed, FindingStatus::AcceptedRisk)
        )
    }
}

/// One detected issue. Immutable once created, except for `status`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Finding {
    pub id: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub category: Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cvss: Option<CvssScore>,
    pub location: Location,
    pub evidence: String,
    pub remediation: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cwe: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cve: Option<String>,
    status: FindingStatus,
    pub detected_at: DateTime<Utc>,
}

impl Finding {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        category: Category,
        location: Location,
        evidence: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.into(),
            description: description.into(),
            severity,
            category,
            cvss: None,
            location,
            evidence: evidence.into(),
            remediation: remediation.into(),
            references: Vec::new(),
            cwe: None,
            cve: None,
            status: FindingStatus::Open,
            detected_at: Utc::now(),
        }
    }

    pub fn with_cvss(mut self, cvss: CvssScore) -> Self {
        self.cvss = Some(cvss);
        self
    }

    pub fn with_cwe(mut self, cwe: impl Into<String>) -> Self {
        self.cwe = Some(cwe.into());
        self
    }

    pub fn with_references(mut self, references: Vec<String>) -> Self {
        self.references = references;
        self
    }

    pub fn status(&self) -> FindingStatus {
        self.status
    }

    /// Move the finding through its status state machine.
    ///
    /// Returns `InvalidStatusTransition` for any move the state machine does
    /// not allow; terminal states reject every transition.
    pub fn transition(&mut self, to: FindingStatus) -> Result<()> {
        if !self.status.can_transition_to(to) {
            return Err(AuditError::InvalidStatusTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        self.status = to;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_finding() -> Finding {
        Finding::new(
            "Test finding",
            "A finding for tests",
            Severity::High,
            Category::Injection,
            Location::new("src/app.py", 10),
            "query = \"SELECT * FROM t WHERE id=\" + user_id",
            "Use parameterized queries",
        )
    }

    #[test]
    fn test_severity_as_str() {
        assert_eq!(Severity::Informational.as_str(), "informational");
        assert_eq!(Severity::Low.as_str(), "low");
        assert_eq!(Severity::Medium.as_str(), "medium");
        assert_eq!(Severity::High.as_str(), "high");
        assert_eq!(Severity::Critical.as_str(), "critical");
    }

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Informational < Severity::Low);
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("critical".parse::<Severity>().unwrap(), Severity::Critical);
        assert_eq!("HIGH".parse::<Severity>().unwrap(), Severity::High);
        assert!("severe".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_weights() {
        assert_eq!(Severity::Critical.weight(), 10);
        assert_eq!(Severity::High.weight(), 7);
        assert_eq!(Severity::Medium.weight(), 4);
        assert_eq!(Severity::Low.weight(), 1);
        assert_eq!(Severity::Informational.weight(), 0);
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
        let back: Severity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Severity::Critical);
    }

    #[test]
    fn test_category_serialization_snake_case() {
        let json = serde_json::to_string(&Category::BrokenAccessControl).unwrap();
        assert_eq!(json, "\"broken_access_control\"");
        let json = serde_json::to_string(&Category::IamMisconfiguration).unwrap();
        assert_eq!(json, "\"iam_misconfiguration\"");
    }

    #[test]
    fn test_category_as_str() {
        assert_eq!(Category::Injection.as_str(), "injection");
        assert_eq!(Category::Xss.as_str(), "xss");
        assert_eq!(Category::SecretExposure.as_str(), "secret_exposure");
        assert_eq!(
            Category::SecurityMisconfiguration.as_str(),
            "security_misconfiguration"
        );
    }

    #[test]
    fn test_new_finding_starts_open() {
        let finding = make_finding();
        assert_eq!(finding.status(), FindingStatus::Open);
        assert!(!finding.id.is_empty());
    }

    #[test]
    fn test_status_open_to_confirmed() {
        let mut finding = make_finding();
        finding.transition(FindingStatus::Confirmed).unwrap();
        assert_eq!(finding.status(), FindingStatus::Confirmed);
    }

    #[test]
    fn test_status_open_to_false_positive_is_terminal() {
        let mut finding = make_finding();
        finding.transition(FindingStatus::FalsePositive).unwrap();
        assert!(finding.transition(FindingStatus::Confirmed).is_err());
        assert!(finding.transition(FindingStatus::Open).is_err());
    }

    #[test]
    fn test_status_confirmed_to_mitigated() {
        let mut finding = make_finding();
        finding.transition(FindingStatus::Confirmed).unwrap();
        finding.transition(FindingStatus::Mitigated).unwrap();
        assert_eq!(finding.status(), FindingStatus::Mitigated);
    }

    #[test]
    fn test_status_confirmed_to_accepted_risk() {
        let mut finding = make_finding();
        finding.transition(FindingStatus::Confirmed).unwrap();
        finding.transition(FindingStatus::AcceptedRisk).unwrap();
        assert_eq!(finding.status(), FindingStatus::AcceptedRisk);
    }

    #[test]
    fn test_status_open_cannot_skip_to_mitigated() {
        let mut finding = make_finding();
        let err = finding.transition(FindingStatus::Mitigated).unwrap_err();
        assert!(err.to_string().contains("open -> mitigated"));
    }

    #[test]
    fn test_status_terminal_states_reject_everything() {
        for terminal in [FindingStatus::Mitigated, FindingStatus::FalsePositive] {
            for next in [
                FindingStatus::Open,
                FindingStatus::Confirmed,
                FindingStatus::AcceptedRisk,
            ] {
                assert!(!terminal.can_transition_to(next));
            }
        }
    }

    #[test]
    fn test_finding_serialization_skips_empty_optionals() {
        let finding = make_finding();
        let json = serde_json::to_string(&finding).unwrap();
        assert!(!json.contains("\"cwe\""));
        assert!(!json.contains("\"cve\""));
        assert!(!json.contains("\"references\""));
        assert!(json.contains("\"status\":\"open\""));
    }

    #[test]
    fn test_finding_with_cwe_serializes() {
        let finding = make_finding().with_cwe("CWE-89");
        let json = serde_json::to_string(&finding).unwrap();
        assert!(json.contains("\"cwe\":\"CWE-89\""));
    }
}
