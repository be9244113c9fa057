//! End-to-end audit runs over an in-memory project.

use std::time::Duration;
use vulnaudit::{
    AuditEngine, Category, CustomRuleDef, Effect, FindingStatus, IamPermission, IamPolicy,
    RecommendationPriority, ScanTarget, ScanType, Severity, SourceFile,
};

fn sample_project() -> ScanTarget {
    ScanTarget::new()
        .with_files(vec![
            SourceFile::new(
                "app/db.py",
                "import sqlite3\n\
                 def get_user(user_id):\n\
                 \x20   query = \"SELECT * FROM users WHERE id=\" + user_id\n\
                 \x20   return db.execute(query)\n",
            ),
            SourceFile::new(
                "app/views.js",
                "function render(req, res) {\n\
                 \x20 el.innerHTML = \"<b>\" + req.query.name + \"</b>\";\n\
                 }\n",
            ),
            SourceFile::new(
                "deploy/config.sh",
                "#!/bin/sh\nexport AWS_ACCESS_KEY_ID=AKIAJ4X2PZ7Q9R8T1W5V\n",
            ),
        ])
        .with_policies(vec![IamPolicy {
            name: "ci-deployer".to_string(),
            provider: "aws".to_string(),
            permissions: vec![IamPermission {
                action: "*".to_string(),
                resource: "*".to_string(),
                effect: Effect::Allow,
                condition: serde_json::Map::new(),
            }],
            last_used: None,
        }])
}

#[test]
fn full_audit_reports_every_category() {
    let engine = AuditEngine::builder().build().unwrap();
    let report = engine.run(&sample_project());

    assert_eq!(report.scope, "3 files, 1 IAM policies");
    for category in [
        Category::Injection,
        Category::Xss,
        Category::SecretExposure,
        Category::IamMisconfiguration,
    ] {
        assert!(
            report.findings.iter().any(|f| f.category == category),
            "missing category {category:?}"
        );
    }
    assert!(report.risk_score > 0.0);
    assert!(report.total_findings >= report.findings.len());
    assert!(!report.incomplete);
    assert!(!report.truncated);
}

#[test]
fn findings_are_sorted_and_scored() {
    let engine = AuditEngine::builder().build().unwrap();
    let report = engine.run(&sample_project());

    // Severity descending throughout the report.
    for pair in report.findings.windows(2) {
        assert!(pair[0].severity >= pair[1].severity);
    }

    // Pattern findings carry a CVSS vector; secret findings carry none.
    let injection = report
        .findings
        .iter()
        .find(|f| f.category == Category::Injection)
        .unwrap();
    let cvss = injection.cvss.as_ref().unwrap();
    assert!(cvss.vector.starts_with("CVSS:3.1/"));
    assert_eq!(cvss.score, 9.1);

    let secret = report
        .findings
        .iter()
        .find(|f| f.category == Category::SecretExposure)
        .unwrap();
    assert!(secret.cvss.is_none());
    assert!(!secret.evidence.contains("AKIAJ4X2PZ7Q9R8T1W5V"));
}

#[test]
fn report_serializes_to_json() {
    let engine = AuditEngine::builder().build().unwrap();
    let report = engine.run(&sample_project());

    let json = serde_json::to_string_pretty(&report).unwrap();
    assert!(json.contains("\"executive_summary\""));
    assert!(json.contains("\"risk_score\""));
    assert!(json.contains("\"category\": \"injection\""));
    // The raw secret must not appear anywhere in the serialized report.
    assert!(!json.contains("AKIAJ4X2PZ7Q9R8T1W5V"));

    let back: vulnaudit::AuditReport = serde_json::from_str(&json).unwrap();
    assert_eq!(back.findings.len(), report.findings.len());
    assert_eq!(back.risk_score, report.risk_score);
}

#[test]
fn clean_project_reports_nothing() {
    let engine = AuditEngine::builder().build().unwrap();
    let target = ScanTarget::new().with_files(vec![SourceFile::new(
        "src/math.py",
        "def add(a, b):\n    return a + b\n",
    )]);
    let report = engine.run(&target);

    assert!(report.findings.is_empty());
    assert_eq!(report.risk_score, 0.0);
    assert!(report
        .executive_summary
        .contains("No critical vulnerabilities"));
    // The CI recommendation is always present, even for a clean run.
    assert_eq!(report.recommendations.len(), 1);
    assert_eq!(
        report.recommendations[0].priority,
        RecommendationPriority::LongTerm
    );
}

#[test]
fn malformed_policy_document_degrades_to_warning() {
    let engine = AuditEngine::builder()
        .with_scan_types(vec![ScanType::Iam])
        .build()
        .unwrap();
    let good = serde_json::json!({
        "name": "reader",
        "provider": "aws",
        "permissions": [
            {"action": "s3:GetObject", "resource": "*", "effect": "allow"}
        ]
    })
    .to_string();
    let target =
        ScanTarget::new().with_policy_docs(vec![good, "{\"name\": \"broken\"".to_string()]);
    let report = engine.run(&target);

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert_eq!(report.scope, "0 files, 2 IAM policies");
}

#[test]
fn custom_rule_and_exclusion_compose() {
    let engine = AuditEngine::builder()
        .with_scan_types(vec![ScanType::Owasp])
        .with_exclusion("generated/**")
        .with_custom_rule(CustomRuleDef {
            id: "CUSTOM-001".to_string(),
            name: "Deprecated crypto call".to_string(),
            description: "Calls the deprecated in-house crypto shim".to_string(),
            pattern: r"legacy_crypt\(".to_string(),
            category: Category::SensitiveData,
            cwe: Some("CWE-327".to_string()),
            remediation: "Use the vetted crypto module".to_string(),
        })
        .build()
        .unwrap();
    let target = ScanTarget::new().with_files(vec![
        SourceFile::new("app/crypto.py", "digest = legacy_crypt(data)"),
        SourceFile::new("generated/crypto.py", "digest = legacy_crypt(data)"),
    ]);
    let report = engine.run(&target);

    assert_eq!(report.findings.len(), 1);
    assert_eq!(report.findings[0].location.file, "app/crypto.py");
    assert_eq!(report.findings[0].cwe.as_deref(), Some("CWE-327"));
}

#[test]
fn finding_lifecycle_on_report_findings() {
    let engine = AuditEngine::builder().build().unwrap();
    let mut report = engine.run(&sample_project());

    let finding = &mut report.findings[0];
    assert_eq!(finding.status(), FindingStatus::Open);
    finding.transition(FindingStatus::Confirmed).unwrap();
    finding.transition(FindingStatus::Mitigated).unwrap();
    assert!(finding.transition(FindingStatus::Open).is_err());
}

#[test]
fn timeout_and_budget_yield_partial_reports() {
    let expired = AuditEngine::builder()
        .with_timeout(Duration::ZERO)
        .build()
        .unwrap();
    let report = expired.run(&sample_project());
    assert!(report.incomplete);

    let capped = AuditEngine::builder()
        .with_scan_types(vec![ScanType::Owasp])
        .with_max_findings(1)
        .build()
        .unwrap();
    let report = capped.run(&sample_project());
    assert!(report.truncated);
    assert_eq!(report.findings.len(), 1);
}

#[test]
fn severity_threshold_narrows_the_report() {
    let engine = AuditEngine::builder()
        .with_severity_threshold(Severity::Critical)
        .build()
        .unwrap();
    let report = engine.run(&sample_project());

    assert!(!report.findings.is_empty());
    assert!(report
        .findings
        .iter()
        .all(|f| f.severity == Severity::Critical));
    assert!(report.total_findings > report.findings.len());
}
