//! Rule-driven security audit engine.
//!
//! Three detectors (an OWASP-style pattern scanner, an entropy-gated secrets
//! detector, and an IAM policy analyzer) run over caller-supplied sources and
//! policies, grade what they find through a CVSS 3.1 base-score engine, and
//! feed one aggregator that assembles the final report.
//!
//! ```
//! use vulnaudit::{AuditEngine, ScanTarget, SourceFile};
//!
//! let engine = AuditEngine::builder().build()?;
//! let target = ScanTarget::new().with_files(vec![SourceFile::new(
//!     "app/db.py",
//!     r#"query = "SELECT * FROM users WHERE id=" + user_id"#,
//! )]);
//! let report = engine.run(&target);
//! assert!(!report.findings.is_empty());
//! # Ok::<(), vulnaudit::AuditError>(())
//! ```

pub mod config;
pub mod cvss;
pub mod detect;
pub mod engine;
pub mod error;
pub mod report;
pub mod rules;
pub mod source;
pub mod types;

pub use config::{AuditConfig, CustomRuleDef, ScanType};
pub use cvss::{calculate_score, severity_from_score, CvssMetrics, CvssScore};
pub use detect::{
    Detector, DetectorOutput, Effect, IamAnalyzer, IamPermission, IamPolicy, PatternScanner,
    ScanContext, ScanTarget, SecretsDetector,
};
pub use engine::{AuditEngine, AuditEngineBuilder};
pub use error::{AuditError, Result};
pub use report::{AuditReport, Recommendation, RecommendationPriority};
pub use rules::{Rule, RuleCatalog};
pub use source::{SourceFile, SourceModel};
pub use types::{Category, Finding, FindingStatus, Location, Severity};
