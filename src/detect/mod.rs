//! Detector capability layer.
//!
//! The three detector kinds (pattern scanner, secrets detector, IAM
//! analyzer) implement one [`Detector`] trait and are composed into the
//! audit session by injection; the aggregator never knows which one
//! produced a finding.

pub mod iam;
pub mod scanner;
pub mod secrets;

use crate::source::SourceFile;
use crate::types::Finding;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

pub use iam::{Effect, IamAnalyzer, IamPermission, IamPolicy};
pub use scanner::PatternScanner;
pub use secrets::SecretsDetector;

/// Everything a scan run can look at. Owned by the caller, read-only here.
#[derive(Debug, Default)]
pub struct ScanTarget {
    pub files: Vec<SourceFile>,
    pub policies: Vec<IamPolicy>,
    /// Raw IAM policy JSON documents, parsed during the scan with per-document
    /// recovery: a malformed document becomes a warning, not a failure.
    pub policy_docs: Vec<String>,
}

impl ScanTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_files(mut self, files: Vec<SourceFile>) -> Self {
        self.files = files;
        self
    }

    pub fn with_policies(mut self, policies: Vec<IamPolicy>) -> Self {
        self.policies = policies;
        self
    }

    pub fn with_policy_docs(mut self, docs: Vec<String>) -> Self {
        self.policy_docs = docs;
        self
    }
}

/// Shared global finding budget for a scan run.
#[derive(Debug)]
pub struct FindingBudget {
    cap: usize,
    used: AtomicUsize,
}

impl FindingBudget {
    pub fn new(cap: usize) -> Self {
        Self {
            cap,
            used: AtomicUsize::new(0),
        }
    }

    /// Reserve one finding slot. Returns false once the cap is reached.
    pub fn try_take(&self) -> bool {
        self.used
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                (used < self.cap).then_some(used + 1)
            })
            .is_ok()
    }

    pub fn exhausted(&self) -> bool {
        self.used.load(Ordering::Relaxed) >= self.cap
    }
}

/// Per-run context handed to every detector: deadline and finding budget.
#[derive(Debug, Default)]
pub struct ScanContext {
    pub deadline: Option<Instant>,
    pub budget: Option<FindingBudget>,
}

impl ScanContext {
    pub fn unbounded() -> Self {
        Self::default()
    }

    /// Cooperative cancellation check, consulted at file/policy boundaries.
    pub fn expired(&self) -> bool {
        self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Reserve a finding slot; unbounded when no budget is configured.
    pub fn take_budget(&self) -> bool {
        self.budget.as_ref().map_or(true, FindingBudget::try_take)
    }

    pub fn budget_exhausted(&self) -> bool {
        self.budget.as_ref().is_some_and(FindingBudget::exhausted)
    }
}

/// What one detector produced for one scan run.
#[derive(Debug, Default)]
pub struct DetectorOutput {
    pub findings: Vec<Finding>,
    pub warnings: Vec<String>,
    /// The finding budget cut this detector short.
    pub truncated: bool,
    /// The deadline expired before this detector finished.
    pub incomplete: bool,
}

impl DetectorOutput {
    pub fn merge(&mut self, other: DetectorOutput) {
        self.findings.extend(other.findings);
        self.warnings.extend(other.warnings);
        self.truncated |= other.truncated;
        self.incomplete |= other.incomplete;
    }
}

/// One detection capability: scan a target, emit findings.
pub trait Detector: Send + Sync {
    fn name(&self) -> &'static str;

    fn scan(&self, target: &ScanTarget, ctx: &ScanContext) -> DetectorOutput;
}
