//! Pattern vulnerability scanner.
//!
//! Lexical matching of catalog rules against source lines. This is
//! deliberately not a parser: expect both false positives and false
//! negatives, and grade every match through the CVSS engine.

use crate::cvss::calculate_score;
use crate::detect::{Detector, DetectorOutput, ScanContext, ScanTarget};
use crate::rules::{Rule, RuleCatalog};
use crate::source::{SourceFile, SourceModel};
use crate::types::{Finding, Location};
use globset::GlobSet;
use rayon::prelude::*;
use std::sync::Arc;
use tracing::{debug, trace};

/// Regex evaluation never sees more than this many bytes of one line,
/// bounding worst-case matching cost on pathological input.
const MAX_LINE_LEN: usize = 2048;

const MAX_EVIDENCE_LEN: usize = 200;

pub struct PatternScanner {
    catalog: Arc<RuleCatalog>,
    exclusions: GlobSet,
}

impl PatternScanner {
    pub fn new(catalog: Arc<RuleCatalog>, exclusions: GlobSet) -> Self {
        Self {
            catalog,
            exclusions,
        }
    }

    fn scan_file(&self, file: &SourceFile, ctx: &ScanContext) -> DetectorOutput {
        let mut out = DetectorOutput::default();

        // Cooperative cancellation at file boundaries only; an in-flight
        // file runs to completion, bounded by the per-line cap.
        if ctx.expired() {
            out.incomplete = true;
            return out;
        }
        if self.exclusions.is_match(file.path()) {
            trace!(file = file.path(), "excluded by glob");
            return out;
        }
        if file.is_binary() {
            out.warnings
                .push(format!("skipped binary file: {}", file.path()));
            return out;
        }
        if ctx.budget_exhausted() {
            out.truncated = true;
            return out;
        }

        for (line_idx, line) in file.lines().enumerate() {
            let line = truncate_at_char_boundary(line, MAX_LINE_LEN);
            for rule in self.catalog.rules() {
                // One finding per (rule, line); same-line repeats collapse.
                if !rule.matches(line) {
                    continue;
                }
                if !ctx.take_budget() {
                    out.truncated = true;
                    return out;
                }
                out.findings
                    .push(make_finding(rule, file.path(), line_idx + 1, line));
            }
        }

        if !out.findings.is_empty() {
            debug!(
                file = file.path(),
                count = out.findings.len(),
                "pattern findings"
            );
        }
        out
    }
}

impl Detector for PatternScanner {
    fn name(&self) -> &'static str {
        "pattern_scanner"
    }

    fn scan(&self, target: &ScanTarget, ctx: &ScanContext) -> DetectorOutput {
        trace!(
            files = target.files.len(),
            rules = self.catalog.len(),
            "pattern scan start"
        );
        target
            .files
            .par_iter()
            .map(|file| self.scan_file(file, ctx))
            .reduce(DetectorOutput::default, |mut acc, out| {
                acc.merge(out);
                acc
            })
    }
}

fn make_finding(rule: &Rule, path: &str, line: usize, evidence: &str) -> Finding {
    let cvss = calculate_score(&rule.template);
    let severity = cvss.severity();
    let mut finding = Finding::new(
        rule.name.clone(),
        rule.description.clone(),
        severity,
        rule.category,
        Location::new(path, line),
        truncate_at_char_boundary(evidence.trim(), MAX_EVIDENCE_LEN),
        rule.remediation.clone(),
    )
    .with_cvss(cvss)
    .with_references(rule.references.clone());
    if let Some(cwe) = &rule.cwe {
        finding = finding.with_cwe(cwe.clone());
    }
    finding
}

fn truncate_at_char_boundary(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}
