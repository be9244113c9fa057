//! IAM policy analyzer.
//!
//! Structural checks over already-parsed policy documents: wildcard grants,
//! dangerous unconditioned actions, and stale policies. Deny statements are
//! never flagged; only what a policy allows can widen access.

use crate::cvss::{
    calculate_score, AttackComplexity, AttackVector, CvssMetrics, ImpactMetric,
    PrivilegesRequired, Scope, UserInteraction,
};
use crate::detect::{Detector, DetectorOutput, ScanContext, ScanTarget};
use crate::error::{AuditError, Result};
use crate::types::{Category, Finding, Location};
use chrono::{DateTime, Duration, Utc};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// A policy unused for this long is reported as stale.
const STALE_AFTER_DAYS: i64 = 90;

/// Actions that grant or escalate privileges. A permission naming one of
/// these without any condition is reported even when fully scoped.
const DANGEROUS_ACTIONS: &[&str] = &[
    "iam:CreateUser",
    "iam:CreateAccessKey",
    "iam:AttachRolePolicy",
    "iam:AttachUserPolicy",
    "iam:PutUserPolicy",
    "iam:PutRolePolicy",
    "iam:PassRole",
    "sts:AssumeRole",
    "s3:PutBucketPolicy",
    "kms:CreateGrant",
    "lambda:CreateFunction",
    "resourcemanager.projects.setIamPolicy",
    "iam.serviceAccounts.actAs",
    "Microsoft.Authorization/roleAssignments/write",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effect {
    Allow,
    Deny,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IamPermission {
    pub action: String,
    pub resource: String,
    pub effect: Effect,
    /// Provider-specific condition block; its presence alone is what the
    /// dangerous-action check looks at.
    #[serde(default, skip_serializing_if = "serde_json::Map::is_empty")]
    pub condition: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IamPolicy {
    pub name: String,
    pub provider: String,
    pub permissions: Vec<IamPermission>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_used: Option<DateTime<Utc>>,
}

impl IamPolicy {
    /// Parse one policy document. `name` is only used for error reporting
    /// when the document does not parse.
    pub fn from_json(name: &str, doc: &str) -> Result<Self> {
        serde_json::from_str(doc).map_err(|source| AuditError::PolicyParse {
            name: name.to_string(),
            source,
        })
    }
}

/// Wildcard-aware dangerous-action match. A trailing `*` in the granted
/// action matches every dangerous action sharing the prefix; a bare `*`
/// matches all of them.
fn grants_dangerous_action(action: &str) -> bool {
    if action == "*" {
        return true;
    }
    if let Some(prefix) = action.strip_suffix('*') {
        return DANGEROUS_ACTIONS.iter().any(|d| d.starts_with(prefix));
    }
    DANGEROUS_ACTIONS.contains(&action)
}

fn wildcard_action_metrics() -> CvssMetrics {
    CvssMetrics {
        attack_vector: AttackVector::Network,
        attack_complexity: AttackComplexity::Low,
        privileges_required: PrivilegesRequired::Low,
        user_interaction: UserInteraction::None,
        scope: Scope::Unchanged,
        confidentiality: ImpactMetric::High,
        integrity: ImpactMetric::High,
        availability: ImpactMetric::High,
    }
}

fn wildcard_resource_metrics() -> CvssMetrics {
    CvssMetrics {
        confidentiality: ImpactMetric::High,
        integrity: ImpactMetric::Low,
        availability: ImpactMetric::Low,
        ..wildcard_action_metrics()
    }
}

fn dangerous_action_metrics() -> CvssMetrics {
    CvssMetrics {
        confidentiality: ImpactMetric::High,
        integrity: ImpactMetric::High,
        availability: ImpactMetric::None,
        ..wildcard_action_metrics()
    }
}

fn stale_policy_metrics() -> CvssMetrics {
    CvssMetrics {
        attack_vector: AttackVector::Local,
        attack_complexity: AttackComplexity::High,
        privileges_required: PrivilegesRequired::High,
        user_interaction: UserInteraction::None,
        scope: Scope::Unchanged,
        confidentiality: ImpactMetric::High,
        integrity: ImpactMetric::None,
        availability: ImpactMetric::None,
    }
}

#[derive(Debug, Default)]
pub struct IamAnalyzer;

impl IamAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn analyze_policy(&self, policy: &IamPolicy, ctx: &ScanContext) -> DetectorOutput {
        let mut out = DetectorOutput::default();

        // Cooperative cancellation at policy boundaries.
        if ctx.expired() {
            out.incomplete = true;
            return out;
        }

        for (idx, perm) in policy.permissions.iter().enumerate() {
            if perm.effect == Effect::Deny {
                trace!(policy = policy.name, idx, "deny statement skipped");
                continue;
            }
            let ordinal = idx + 1;
            if perm.action.contains('*') {
                if !ctx.take_budget() {
                    out.truncated = true;
                    return out;
                }
                out.findings.push(wildcard_action_finding(policy, perm, ordinal));
            }
            if perm.resource == "*" {
                if !ctx.take_budget() {
                    out.truncated = true;
                    return out;
                }
                out.findings
                    .push(wildcard_resource_finding(policy, perm, ordinal));
            }
            if perm.condition.is_empty() && grants_dangerous_action(&perm.action) {
                if !ctx.take_budget() {
                    out.truncated = true;
                    return out;
                }
                out.findings
                    .push(dangerous_action_finding(policy, perm, ordinal));
            }
        }

        if let Some(last_used) = policy.last_used {
            if Utc::now() - last_used > Duration::days(STALE_AFTER_DAYS) {
                if !ctx.take_budget() {
                    out.truncated = true;
                    return out;
                }
                out.findings.push(stale_policy_finding(policy, last_used));
            }
        }

        if !out.findings.is_empty() {
            debug!(
                policy = policy.name,
                count = out.findings.len(),
                "iam findings"
            );
        }
        out
    }
}

impl Detector for IamAnalyzer {
    fn name(&self) -> &'static str {
        "iam_analyzer"
    }

    fn scan(&self, target: &ScanTarget, ctx: &ScanContext) -> DetectorOutput {
        // Raw documents parse with per-document recovery. One malformed
        // policy must not sink the scan.
        let mut parsed = Vec::new();
        let mut doc_warnings = Vec::new();
        for (idx, doc) in target.policy_docs.iter().enumerate() {
            match IamPolicy::from_json(&format!("policy_docs[{idx}]"), doc) {
                Ok(policy) => parsed.push(policy),
                Err(err) => {
                    warn!(idx, %err, "skipping malformed policy document");
                    doc_warnings.push(err.to_string());
                }
            }
        }

        let mut out = target
            .policies
            .par_iter()
            .chain(parsed.par_iter())
            .map(|policy| self.analyze_policy(policy, ctx))
            .reduce(DetectorOutput::default, |mut acc, item| {
                acc.merge(item);
                acc
            });
        out.warnings.extend(doc_warnings);
        out
    }
}

fn wildcard_action_finding(policy: &IamPolicy, perm: &IamPermission, ordinal: usize) -> Finding {
    let cvss = calculate_score(&wildcard_action_metrics());
    let severity = cvss.severity();
    Finding::new(
        "Wildcard action grant",
        format!(
            "Policy '{}' allows action '{}' on '{}', granting more operations than any workload needs",
            policy.name, perm.action, perm.resource
        ),
        severity,
        Category::IamMisconfiguration,
        Location::new(&policy.name, ordinal),
        format!("action: {}, resource: {}", perm.action, perm.resource),
        "Replace the wildcard with the explicit list of actions the workload performs",
    )
    .with_cvss(cvss)
    .with_cwe("CWE-269")
}

fn wildcard_resource_finding(policy: &IamPolicy, perm: &IamPermission, ordinal: usize) -> Finding {
    let cvss = calculate_score(&wildcard_resource_metrics());
    let severity = cvss.severity();
    Finding::new(
        "Wildcard resource grant",
        format!(
            "Policy '{}' allows '{}' on every resource instead of a scoped ARN or path",
            policy.name, perm.action
        ),
        severity,
        Category::IamMisconfiguration,
        Location::new(&policy.name, ordinal),
        format!("action: {}, resource: *", perm.action),
        "Scope the permission to the specific resources the workload touches",
    )
    .with_cvss(cvss)
    .with_cwe("CWE-732")
}

fn dangerous_action_finding(policy: &IamPolicy, perm: &IamPermission, ordinal: usize) -> Finding {
    let cvss = calculate_score(&dangerous_action_metrics());
    let severity = cvss.severity();
    Finding::new(
        "Privilege escalation action without condition",
        format!(
            "Policy '{}' grants '{}' unconditionally; this action can mint new credentials or widen access",
            policy.name, perm.action
        ),
        severity,
        Category::IamMisconfiguration,
        Location::new(&policy.name, ordinal),
        format!("action: {}, resource: {}", perm.action, perm.resource),
        "Constrain the grant with a condition (source, MFA, principal tag) or remove the action",
    )
    .with_cvss(cvss)
    .with_cwe("CWE-269")
}

fn stale_policy_finding(policy: &IamPolicy, last_used: DateTime<Utc>) -> Finding {
    let cvss = calculate_score(&stale_policy_metrics());
    let severity = cvss.severity();
    Finding::new(
        "Stale policy",
        format!(
            "Policy '{}' was last used on {} and exceeds the {STALE_AFTER_DAYS}-day inactivity window",
            policy.name,
            last_used.format("%Y-%m-%d")
        ),
        severity,
        Category::IamMisconfiguration,
        Location::new(&policy.name, 0),
        format!("last_used: {}", last_used.to_rfc3339()),
        "Remove policies that are no longer exercised to shrink the attack surface",
    )
    .with_cvss(cvss)
}
