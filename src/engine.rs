//! Audit engine: configuration validation, detector composition, and the
//! scan entry point.
//!
//! Everything that can fail (threshold sanity, glob compilation, custom rule
//! patterns) fails at build time; `run` itself is infallible and always
//! yields a report, partial or not.

use crate::config::{AuditConfig, CustomRuleDef, ScanType};
use crate::detect::{
    Detector, DetectorOutput, FindingBudget, IamAnalyzer, PatternScanner, ScanContext, ScanTarget,
    SecretsDetector,
};
use crate::error::{AuditError, Result};
use crate::report::{Aggregator, AuditReport};
use crate::rules::{secret_patterns, Rule, RuleCatalog};
use crate::types::Severity;
use globset::{Glob, GlobSet, GlobSetBuilder};
use regex::Regex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

pub struct AuditEngine {
    config: AuditConfig,
    detectors: Vec<Box<dyn Detector>>,
}

impl std::fmt::Debug for AuditEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditEngine")
            .field("config", &self.config)
            .field(
                "detectors",
                &self.detectors.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl AuditEngine {
    pub fn builder() -> AuditEngineBuilder {
        AuditEngineBuilder::new()
    }

    /// Run the configured detectors over a target and assemble the report.
    pub fn run(&self, target: &ScanTarget) -> AuditReport {
        let policy_count = target.policies.len() + target.policy_docs.len();
        info!(
            files = target.files.len(),
            policies = policy_count,
            detectors = self.detectors.len(),
            "audit run start"
        );

        let ctx = ScanContext {
            deadline: self.config.timeout.map(|t| Instant::now() + t),
            budget: self.config.max_findings.map(FindingBudget::new),
        };

        let mut merged = DetectorOutput::default();
        for detector in &self.detectors {
            let output = detector.scan(target, &ctx);
            debug!(
                detector = detector.name(),
                findings = output.findings.len(),
                "detector finished"
            );
            merged.merge(output);
        }

        let scope = format!(
            "{} files, {} IAM policies",
            target.files.len(),
            policy_count
        );
        let report =
            Aggregator::new(self.config.severity_threshold).build_report(scope, merged);
        info!(
            reported = report.findings.len(),
            total = report.total_findings,
            risk_score = report.risk_score,
            "audit run finished"
        );
        report
    }
}

#[derive(Debug, Default)]
pub struct AuditEngineBuilder {
    config: AuditConfig,
}

impl AuditEngineBuilder {
    pub fn new() -> Self {
        Self {
            config: AuditConfig::default(),
        }
    }

    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_scan_types(mut self, scan_types: Vec<ScanType>) -> Self {
        self.config.scan_types = scan_types;
        self
    }

    pub fn with_severity_threshold(mut self, threshold: Severity) -> Self {
        self.config.severity_threshold = threshold;
        self
    }

    pub fn with_exclusion(mut self, pattern: impl Into<String>) -> Self {
        self.config.exclusions.push(pattern.into());
        self
    }

    pub fn with_max_findings(mut self, max: usize) -> Self {
        self.config.max_findings = Some(max);
        self
    }

    pub fn with_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.timeout = Some(timeout);
        self
    }

    pub fn with_custom_rule(mut self, rule: CustomRuleDef) -> Self {
        self.config.custom_rules.push(rule);
        self
    }

    /// Validate the configuration and assemble the detector set.
    pub fn build(self) -> Result<AuditEngine> {
        // Informational is a label for zero-score findings, not a filter;
        // accepting it would make the threshold a no-op by accident.
        if self.config.severity_threshold == Severity::Informational {
            return Err(AuditError::InvalidSeverity(
                "informational cannot be used as a threshold".to_string(),
            ));
        }

        let exclusions = compile_exclusions(&self.config.exclusions)?;
        let custom_rules = compile_custom_rules(&self.config.custom_rules)?;

        let mut detectors: Vec<Box<dyn Detector>> = Vec::new();
        if self.config.runs(ScanType::Owasp) {
            let catalog = RuleCatalog::builtin().with_rules(custom_rules);
            detectors.push(Box::new(PatternScanner::new(
                Arc::new(catalog),
                exclusions.clone(),
            )));
        }
        if self.config.runs(ScanType::Secrets) {
            detectors.push(Box::new(SecretsDetector::new(
                secret_patterns(),
                exclusions.clone(),
            )));
        }
        if self.config.runs(ScanType::Iam) {
            detectors.push(Box::new(IamAnalyzer::new()));
        }
        debug!(detectors = detectors.len(), "engine built");

        Ok(AuditEngine {
            config: self.config,
            detectors,
        })
    }
}

fn compile_exclusions(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let glob = Glob::new(pattern).map_err(|source| AuditError::InvalidExclusion {
            pattern: pattern.clone(),
            source,
        })?;
        builder.add(glob);
    }
    builder.build().map_err(|source| AuditError::InvalidExclusion {
        pattern: patterns.join(", "),
        source,
    })
}

fn compile_custom_rules(defs: &[CustomRuleDef]) -> Result<Vec<Rule>> {
    defs.iter()
        .map(|def| {
            let pattern =
                Regex::new(&def.pattern).map_err(|source| AuditError::InvalidRulePattern {
                    rule_id: def.id.clone(),
                    source,
                })?;
            let mut rule = Rule::new(
                &def.id,
                &def.name,
                &def.description,
                def.category,
                vec![pattern],
                &def.remediation,
            );
            if let Some(cwe) = &def.cwe {
                rule = rule.with_cwe(cwe);
            }
            Ok(rule)
        })
        .collect()
}
