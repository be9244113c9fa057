use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![mc_001(), mc_002(), mc_003()]
}

fn mc_001() -> Rule {
    Rule::new(
        "MC-001",
        "Debug mode enabled",
        "Detects debug flags switched on in configuration or code",
        Category::SecurityMisconfiguration,
        vec![
            Regex::new(r#"(?i)\bdebug(?:[_-]?mode)?\s*[:=]\s*(?:true|1\b|["']true["'])"#)
                .expect("MC-001: invalid regex"),
            Regex::new(r"(?i)\bapp\.run\([^)]*debug\s*=\s*True").expect("MC-001: invalid regex"),
        ],
        "Disable debug mode outside development; debug handlers leak stack traces and internals",
    )
    .with_cwe("CWE-489")
}

fn mc_002() -> Rule {
    Rule::new(
        "MC-002",
        "TLS certificate verification disabled",
        "Detects clients configured to accept any certificate",
        Category::SecurityMisconfiguration,
        vec![
            Regex::new(r"(?i)verify\s*=\s*False").expect("MC-002: invalid regex"),
            Regex::new(r"(?i)rejectUnauthorized\s*:\s*false").expect("MC-002: invalid regex"),
            Regex::new(r"(?i)InsecureSkipVerify\s*:\s*true").expect("MC-002: invalid regex"),
            Regex::new(r"(?i)curl\s+[^\n]*(?:-k\b|--insecure)").expect("MC-002: invalid regex"),
        ],
        "Verify TLS certificates everywhere; pin or provision the expected CA instead of disabling checks",
    )
    .with_cwe("CWE-295")
}

fn mc_003() -> Rule {
    Rule::new(
        "MC-003",
        "World-writable permissions",
        "Detects chmod 777-style permission grants",
        Category::SecurityMisconfiguration,
        vec![
            Regex::new(r"chmod\s+(?:-R\s+)?0?777\b").expect("MC-003: invalid regex"),
            Regex::new(r"(?i)os\.chmod\([^)]*0o?777").expect("MC-003: invalid regex"),
        ],
        "Grant the minimum file mode required; avoid world-writable files and directories",
    )
    .with_cwe("CWE-732")
}
