use crate::cvss::{
    AttackComplexity, AttackVector, CvssMetrics, ImpactMetric, PrivilegesRequired, Scope,
    UserInteraction,
};
use crate::rules::builtin;
use crate::types::Category;
use regex::Regex;

/// A vulnerability detection rule. Compiled once, read-only for the life of
/// a scan.
#[derive(Debug, Clone)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: Category,
    pub cwe: Option<String>,
    pub patterns: Vec<Regex>,
    /// CVSS metric template applied to every match of this rule.
    pub template: CvssMetrics,
    pub remediation: String,
    pub references: Vec<String>,
}

impl Rule {
    pub fn new(
        id: &str,
        name: &str,
        description: &str,
        category: Category,
        patterns: Vec<Regex>,
        remediation: &str,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            category,
            cwe: None,
            patterns,
            template: default_template(category),
            remediation: remediation.to_string(),
            references: Vec::new(),
        }
    }

    pub fn with_cwe(mut self, cwe: &str) -> Self {
        self.cwe = Some(cwe.to_string());
        self
    }

    pub fn with_template(mut self, template: CvssMetrics) -> Self {
        self.template = template;
        self
    }

    pub fn with_reference(mut self, reference: &str) -> Self {
        self.references.push(reference.to_string());
        self
    }

    pub fn matches(&self, line: &str) -> bool {
        self.patterns.iter().any(|p| p.is_match(line))
    }
}

/// Default CVSS metric template for a vulnerability category, reflecting its
/// typical exploitability and impact profile.
pub fn default_template(category: Category) -> CvssMetrics {
    let base = CvssMetrics {
        attack_vector: AttackVector::Network,
        attack_complexity: AttackComplexity::Low,
        privileges_required: PrivilegesRequired::None,
        user_interaction: UserInteraction::None,
        scope: Scope::Unchanged,
        confidentiality: ImpactMetric::None,
        integrity: ImpactMetric::None,
        availability: ImpactMetric::None,
    };
    match category {
        // e.g. SQL injection: remote, trivial, reads and rewrites data
        Category::Injection => CvssMetrics {
            confidentiality: ImpactMetric::High,
            integrity: ImpactMetric::High,
            ..base
        },
        Category::Xss => CvssMetrics {
            user_interaction: UserInteraction::Required,
            scope: Scope::Changed,
            confidentiality: ImpactMetric::Low,
            integrity: ImpactMetric::Low,
            ..base
        },
        Category::BrokenAuth => CvssMetrics {
            confidentiality: ImpactMetric::High,
            integrity: ImpactMetric::Low,
            ..base
        },
        Category::SensitiveData => CvssMetrics {
            confidentiality: ImpactMetric::High,
            ..base
        },
        Category::BrokenAccessControl => CvssMetrics {
            privileges_required: PrivilegesRequired::Low,
            confidentiality: ImpactMetric::High,
            integrity: ImpactMetric::Low,
            ..base
        },
        Category::SecurityMisconfiguration => CvssMetrics {
            confidentiality: ImpactMetric::Low,
            integrity: ImpactMetric::Low,
            ..base
        },
        Category::Ssrf => CvssMetrics {
            scope: Scope::Changed,
            confidentiality: ImpactMetric::High,
            ..base
        },
        // Secret findings carry fixed severities and IAM rules carry their
        // own profiles; neither uses a category template, but every category
        // must map to something sane.
        Category::SecretExposure | Category::IamMisconfiguration => CvssMetrics {
            privileges_required: PrivilegesRequired::Low,
            confidentiality: ImpactMetric::High,
            integrity: ImpactMetric::High,
            ..base
        },
    }
}

/// Immutable rule table for one engine instance.
#[derive(Debug, Clone)]
pub struct RuleCatalog {
    rules: Vec<Rule>,
}

impl RuleCatalog {
    /// Catalog holding the builtin rule set.
    pub fn builtin() -> Self {
        Self {
            rules: builtin::all_rules().to_vec(),
        }
    }

    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// Append additional (e.g. user-supplied) rules.
    pub fn with_rules(mut self, extra: Vec<Rule>) -> Self {
        self.rules.extend(extra);
        self
    }

    pub fn get(&self, id: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.id == id)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
