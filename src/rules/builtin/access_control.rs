use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![ac_001(), ac_002()]
}

fn ac_001() -> Rule {
    Rule::new(
        "AC-001",
        "Authorization check bypassed",
        "Detects flags and helpers that skip permission checks",
        Category::BrokenAccessControl,
        vec![
            Regex::new(r"(?i)\b(?:skip|disable|bypass)[_-]?(?:authz|authorization|permissions?|acl)")
                .expect("AC-001: invalid regex"),
            Regex::new(r"(?i)\b(?:check[_-]?permissions?|authorize[_-]?request)\s*[:=]\s*(?:false|0)")
                .expect("AC-001: invalid regex"),
        ],
        "Enforce authorization on the server for every request; remove bypass switches from production paths",
    )
    .with_cwe("CWE-862")
    .with_reference("https://owasp.org/Top10/A01_2021-Broken_Access_Control/")
}

fn ac_002() -> Rule {
    Rule::new(
        "AC-002",
        "CORS allows any origin",
        "Detects wildcard cross-origin policies",
        Category::BrokenAccessControl,
        vec![
            Regex::new(r#"(?i)(?:access-control-allow-origin|allow[_-]?origins?)\b[^\n]*[:=(,]\s*[\["']*\*"#)
                .expect("AC-002: invalid regex"),
        ],
        "Allowlist trusted origins explicitly instead of `*`, especially on credentialed endpoints",
    )
    .with_cwe("CWE-942")
}
