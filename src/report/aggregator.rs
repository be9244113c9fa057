//! Finding aggregation and report assembly.
//!
//! Pure transformation from merged detector output to a report: filter by
//! the severity threshold, order deterministically, score, and derive
//! recommendations. Running it twice over the same findings produces the
//! same report body.

use crate::detect::DetectorOutput;
use crate::report::{AuditReport, Recommendation, RecommendationPriority};
use crate::types::{Category, Finding, Severity};
use chrono::Utc;
use std::collections::HashMap;
use tracing::debug;

pub struct Aggregator {
    threshold: Severity,
}

impl Aggregator {
    pub fn new(threshold: Severity) -> Self {
        Self { threshold }
    }

    /// Assemble the report from merged detector output.
    pub fn build_report(&self, scope: impl Into<String>, output: DetectorOutput) -> AuditReport {
        let scope = scope.into();
        let total_findings = output.findings.len();

        let mut findings: Vec<Finding> = output
            .findings
            .into_iter()
            .filter(|f| f.severity >= self.threshold)
            .collect();
        sort_findings(&mut findings);

        let risk_score = risk_score(&findings);
        let recommendations = recommendations(&findings);
        let executive_summary = executive_summary(&scope, &findings, total_findings, risk_score);

        let mut warnings = output.warnings;
        if output.truncated {
            warnings.push("finding budget reached; the scan was truncated".to_string());
        }
        if output.incomplete {
            warnings.push("scan deadline expired; the report is partial".to_string());
        }

        debug!(
            total = total_findings,
            reported = findings.len(),
            risk_score,
            "report assembled"
        );

        AuditReport {
            id: uuid::Uuid::new_v4().to_string(),
            scope,
            executive_summary,
            findings,
            total_findings,
            risk_score,
            recommendations,
            warnings,
            incomplete: output.incomplete,
            truncated: output.truncated,
            generated_at: Utc::now(),
        }
    }
}

/// Severity descending, then file, then line. The sort is stable, so
/// detector output order breaks any remaining ties deterministically.
fn sort_findings(findings: &mut [Finding]) {
    findings.sort_by(|a, b| {
        b.severity
            .cmp(&a.severity)
            .then_with(|| a.location.file.cmp(&b.location.file))
            .then_with(|| a.location.line.cmp(&b.location.line))
    });
}

/// Weighted risk score over the reported findings, 0 to 100, one decimal.
///
/// Each finding contributes its severity weight out of a per-finding maximum
/// of 10, so a report of nothing but critical findings scores 100.
pub fn risk_score(findings: &[Finding]) -> f64 {
    if findings.is_empty() {
        return 0.0;
    }
    let weight_sum: u32 = findings.iter().map(|f| f.severity.weight()).sum();
    let raw = f64::from(weight_sum) / (findings.len() as f64 * 10.0) * 100.0;
    (raw * 10.0).round() / 10.0
}

fn recommendations(findings: &[Finding]) -> Vec<Recommendation> {
    let mut recs = Vec::new();

    if findings.iter().any(|f| f.severity == Severity::Critical) {
        recs.push(Recommendation {
            priority: RecommendationPriority::Immediate,
            title: "Remediate critical findings".to_string(),
            description: "Critical findings are remotely exploitable with severe impact; \
                          fix them before the next deployment"
                .to_string(),
        });
    }
    if findings
        .iter()
        .any(|f| f.category == Category::SecretExposure)
    {
        recs.push(Recommendation {
            priority: RecommendationPriority::Immediate,
            title: "Rotate exposed credentials and adopt a secrets manager".to_string(),
            description: "Treat every detected secret as compromised: rotate it, purge it \
                          from history, and move credentials into a secrets manager"
                .to_string(),
        });
    }
    if findings.iter().any(|f| f.severity == Severity::High) {
        recs.push(Recommendation {
            priority: RecommendationPriority::ShortTerm,
            title: "Schedule remediation of high-severity findings".to_string(),
            description: "Plan fixes for high-severity findings within the current sprint"
                .to_string(),
        });
    }
    recs.push(Recommendation {
        priority: RecommendationPriority::LongTerm,
        title: "Run security audits in CI".to_string(),
        description: "Integrate automated scanning into the CI pipeline so regressions are \
                      caught at review time"
            .to_string(),
    });
    recs
}

fn executive_summary(
    scope: &str,
    findings: &[Finding],
    total_findings: usize,
    risk_score: f64,
) -> String {
    if findings.is_empty() {
        return format!(
            "Audit of {scope} identified no reportable findings ({total_findings} total \
             before filtering). No critical vulnerabilities were identified."
        );
    }
    let count_of = |s: Severity| findings.iter().filter(|f| f.severity == s).count();

    let mut by_category: HashMap<Category, usize> = HashMap::new();
    for f in findings {
        *by_category.entry(f.category).or_insert(0) += 1;
    }
    let mut categories: Vec<(Category, usize)> = by_category.into_iter().collect();
    categories.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
    let category_tally = categories
        .iter()
        .map(|(c, n)| format!("{} ({n})", c.as_str()))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "Audit of {scope} identified {} reportable findings ({} critical, {} high, \
         {} medium, {} low, {} informational). Affected categories: {category_tally}. \
         Overall risk score: {risk_score}/100.",
        findings.len(),
        count_of(Severity::Critical),
        count_of(Severity::High),
        count_of(Severity::Medium),
        count_of(Severity::Low),
        count_of(Severity::Informational),
    )
}
