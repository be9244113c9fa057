//! CVSS 3.1 base score calculation.
//!
//! Pure functions only: identical metrics always produce an identical score,
//! vector string, and severity label.

use crate::types::Severity;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackVector {
    Network,
    Adjacent,
    Local,
    Physical,
}

impl AttackVector {
    fn weight(&self) -> f64 {
        match self {
            AttackVector::Network => 0.85,
            AttackVector::Adjacent => 0.62,
            AttackVector::Local => 0.55,
            AttackVector::Physical => 0.20,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            AttackVector::Network => "N",
            AttackVector::Adjacent => "A",
            AttackVector::Local => "L",
            AttackVector::Physical => "P",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttackComplexity {
    Low,
    High,
}

impl AttackComplexity {
    fn weight(&self) -> f64 {
        match self {
            AttackComplexity::Low => 0.77,
            AttackComplexity::High => 0.44,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            AttackComplexity::Low => "L",
            AttackComplexity::High => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrivilegesRequired {
    None,
    Low,
    High,
}

impl PrivilegesRequired {
    /// PR weight depends on scope per the 3.1 specification.
    fn weight(&self, scope: Scope) -> f64 {
        match (self, scope) {
            (PrivilegesRequired::None, _) => 0.85,
            (PrivilegesRequired::Low, Scope::Unchanged) => 0.62,
            (PrivilegesRequired::Low, Scope::Changed) => 0.68,
            (PrivilegesRequired::High, Scope::Unchanged) => 0.27,
            (PrivilegesRequired::High, Scope::Changed) => 0.50,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            PrivilegesRequired::None => "N",
            PrivilegesRequired::Low => "L",
            PrivilegesRequired::High => "H",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInteraction {
    None,
    Required,
}

impl UserInteraction {
    fn weight(&self) -> f64 {
        match self {
            UserInteraction::None => 0.85,
            UserInteraction::Required => 0.62,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            UserInteraction::None => "N",
            UserInteraction::Required => "R",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Scope {
    Unchanged,
    Changed,
}

impl Scope {
    fn token(&self) -> &'static str {
        match self {
            Scope::Unchanged => "U",
            Scope::Changed => "C",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImpactMetric {
    None,
    Low,
    High,
}

impl ImpactMetric {
    fn weight(&self) -> f64 {
        match self {
            ImpactMetric::None => 0.0,
            ImpactMetric::Low => 0.22,
            ImpactMetric::High => 0.56,
        }
    }

    fn token(&self) -> &'static str {
        match self {
            ImpactMetric::None => "N",
            ImpactMetric::Low => "L",
            ImpactMetric::High => "H",
        }
    }
}

/// The eight CVSS 3.1 base metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CvssMetrics {
    pub attack_vector: AttackVector,
    pub attack_complexity: AttackComplexity,
    pub privileges_required: PrivilegesRequired,
    pub user_interaction: UserInteraction,
    pub scope: Scope,
    pub confidentiality: ImpactMetric,
    pub integrity: ImpactMetric,
    pub availability: ImpactMetric,
}

impl CvssMetrics {
    /// Canonical vector string, fixed field order AV/AC/PR/UI/S/C/I/A.
    pub fn vector(&self) -> String {
        format!(
            "CVSS:3.1/AV:{}/AC:{}/PR:{}/UI:{}/S:{}/C:{}/I:{}/A:{}",
            self.attack_vector.token(),
            self.attack_complexity.token(),
            self.privileges_required.token(),
            self.user_interaction.token(),
            self.scope.token(),
            self.confidentiality.token(),
            self.integrity.token(),
            self.availability.token(),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CvssScore {
    pub score: f64,
    pub vector: String,
    pub metrics: CvssMetrics,
}

impl CvssScore {
    pub fn severity(&self) -> Severity {
        severity_from_score(self.score)
    }
}

/// Compute the CVSS 3.1 base score for a set of metrics.
pub fn calculate_score(metrics: &CvssMetrics) -> CvssScore {
    let exploitability = 8.22
        * metrics.attack_vector.weight()
        * metrics.attack_complexity.weight()
        * metrics.privileges_required.weight(metrics.scope)
        * metrics.user_interaction.weight();

    let isc_base = 1.0
        - (1.0 - metrics.confidentiality.weight())
            * (1.0 - metrics.integrity.weight())
            * (1.0 - metrics.availability.weight());

    let (impact, raw) = match metrics.scope {
        Scope::Unchanged => {
            let impact = 6.42 * isc_base;
            (impact, (impact + exploitability).min(10.0))
        }
        Scope::Changed => {
            let impact = 7.52 * (isc_base - 0.029) - 3.25 * (isc_base - 0.02).powi(15);
            (impact, (1.08 * (impact + exploitability)).min(10.0))
        }
    };

    let score = if impact <= 0.0 {
        0.0
    } else {
        // Malformed weights can never leave this function out of range.
        round_up_one_decimal(raw).clamp(0.0, 10.0)
    };

    CvssScore {
        score,
        vector: metrics.vector(),
        metrics: *metrics,
    }
}

/// Severity label for a numeric score, per the fixed 3.1 breakpoints.
pub fn severity_from_score(score: f64) -> Severity {
    if score >= 9.0 {
        Severity::Critical
    } else if score >= 7.0 {
        Severity::High
    } else if score >= 4.0 {
        Severity::Medium
    } else if score >= 0.1 {
        Severity::Low
    } else {
        Severity::Informational
    }
}

fn round_up_one_decimal(value: f64) -> f64 {
    (value * 10.0).ceil() / 10.0
}
