use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![ba_001(), ba_002(), ba_003()]
}

fn ba_001() -> Rule {
    Rule::new(
        "BA-001",
        "Weak hash applied to credentials",
        "Detects MD5/SHA-1 hashing of password material",
        Category::BrokenAuth,
        vec![
            Regex::new(r"(?i)\b(?:md5|sha1)\s*\([^)]*(?:password|passwd|pwd|credential)")
                .expect("BA-001: invalid regex"),
            Regex::new(r#"(?i)hashlib\.(?:md5|sha1)\s*\("#).expect("BA-001: invalid regex"),
        ],
        "Hash credentials with a purpose-built KDF such as bcrypt, scrypt, or Argon2",
    )
    .with_cwe("CWE-916")
}

fn ba_002() -> Rule {
    Rule::new(
        "BA-002",
        "Authentication disabled",
        "Detects configuration flags that switch authentication off",
        Category::BrokenAuth,
        vec![
            Regex::new(r#"(?i)\b(?:auth|authentication)[_-]?(?:enabled|required)?\s*[:=]\s*(?:false|none|disabled|["'](?:false|none|disabled)["'])"#)
                .expect("BA-002: invalid regex"),
            Regex::new(r"(?i)\b(?:skip|disable|no)[_-]auth(?:entication)?\s*[:=]\s*(?:true|1)")
                .expect("BA-002: invalid regex"),
        ],
        "Require authentication on every non-public endpoint; gate any bypass behind explicit, audited configuration",
    )
    .with_cwe("CWE-287")
}

fn ba_003() -> Rule {
    Rule::new(
        "BA-003",
        "JWT accepts the none algorithm",
        "Detects tokens or verifiers configured with alg=none",
        Category::BrokenAuth,
        vec![
            Regex::new(r#"(?i)["']?alg(?:orithm)?s?["']?\s*[:=]\s*\[?\s*["']none["']"#)
                .expect("BA-003: invalid regex"),
        ],
        "Pin the expected signing algorithm when verifying JWTs and reject unsigned tokens",
    )
    .with_cwe("CWE-347")
}
