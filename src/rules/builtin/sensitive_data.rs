use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![sd_001(), sd_002()]
}

fn sd_001() -> Rule {
    Rule::new(
        "SD-001",
        "Credential material written to logs",
        "Detects logging calls whose arguments mention passwords, tokens, or keys",
        Category::SensitiveData,
        vec![
            Regex::new(
                r"(?i)\b(?:console\.(?:log|error|warn)|print(?:ln)?!?|logger?\.(?:info|debug|warn|error))\s*\([^)]*(?:password|passwd|secret|api[_-]?key|access[_-]?token)",
            )
            .expect("SD-001: invalid regex"),
        ],
        "Redact credentials before logging; log identifiers, never secret values",
    )
    .with_cwe("CWE-532")
}

fn sd_002() -> Rule {
    Rule::new(
        "SD-002",
        "Credentials sent over cleartext HTTP",
        "Detects authentication endpoints addressed via http://",
        Category::SensitiveData,
        vec![
            Regex::new(r#"(?i)http://[^\s"']+/(?:login|auth|signin|token|oauth)"#)
                .expect("SD-002: invalid regex"),
        ],
        "Serve authentication flows exclusively over HTTPS",
    )
    .with_cwe("CWE-319")
    .with_reference("https://owasp.org/Top10/A02_2021-Cryptographic_Failures/")
}
