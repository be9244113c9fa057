//! Audit report assembly.

mod aggregator;

use crate::types::Finding;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use aggregator::Aggregator;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    Immediate,
    ShortTerm,
    LongTerm,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    pub priority: RecommendationPriority,
    pub title: String,
    pub description: String,
}

/// The final artifact of an audit run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    pub id: String,
    /// Human-readable description of what was scanned.
    pub scope: String,
    pub executive_summary: String,
    /// Findings at or above the severity threshold, ordered by severity
    /// (descending), then file, then line.
    pub findings: Vec<Finding>,
    /// Count of findings detected before the severity threshold filter.
    pub total_findings: usize,
    /// Weighted risk score over the reported findings, 0 to 100.
    pub risk_score: f64,
    pub recommendations: Vec<Recommendation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
    /// The scan deadline expired before every detector finished.
    pub incomplete: bool,
    /// The finding budget cut the scan short.
    pub truncated: bool,
    pub generated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_serialization_snake_case() {
        let json = serde_json::to_string(&RecommendationPriority::ShortTerm).unwrap();
        assert_eq!(json, "\"short_term\"");
        let json = serde_json::to_string(&RecommendationPriority::Immediate).unwrap();
        assert_eq!(json, "\"immediate\"");
    }

    #[test]
    fn test_report_round_trips_through_serde() {
        let report = AuditReport {
            id: "r-1".to_string(),
            scope: "3 files".to_string(),
            executive_summary: "summary".to_string(),
            findings: Vec::new(),
            total_findings: 0,
            risk_score: 0.0,
            recommendations: Vec::new(),
            warnings: Vec::new(),
            incomplete: false,
            truncated: false,
            generated_at: Utc::now(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: AuditReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.scope, "3 files");
        assert!(!json.contains("\"warnings\""));
    }
}
