use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![in_001(), in_002(), in_003()]
}

fn in_001() -> Rule {
    Rule::new(
        "IN-001",
        "SQL built from string interpolation",
        "Detects SQL statements assembled with concatenation or interpolation, a classic SQL injection shape",
        Category::Injection,
        vec![
            // "SELECT ..." + variable (JS/Java/Python concatenation)
            Regex::new(r#"(?i)["'](?:select|insert|update|delete)\b[^"']*["']\s*(?:\+|\|\||%|\.format)"#)
                .expect("IN-001: invalid regex"),
            // Python f-string queries: f"SELECT ... {user_id}"
            Regex::new(r#"(?i)f["'](?:select|insert|update|delete)\b[^"']*\{"#)
                .expect("IN-001: invalid regex"),
            // execute("SELECT ..." ...) with interpolation markers
            Regex::new(r#"(?i)execute\s*\(\s*["'](?:select|insert|update|delete)\b[^"']*(?:%s|\$\d|\{)"#)
                .expect("IN-001: invalid regex"),
        ],
        "Use parameterized queries or prepared statements; never interpolate user input into SQL text",
    )
    .with_cwe("CWE-89")
    .with_reference("https://owasp.org/Top10/A03_2021-Injection/")
}

fn in_002() -> Rule {
    Rule::new(
        "IN-002",
        "Shell command built from dynamic input",
        "Detects process execution calls whose command string is assembled at runtime",
        Category::Injection,
        vec![
            Regex::new(
                r#"(?i)\b(?:os\.system|subprocess\.(?:call|run|Popen)|child_process\.exec|execSync|popen)\s*\([^)]*(?:\+|\$\{|%s|f["'])"#,
            )
            .expect("IN-002: invalid regex"),
            // shell=True hands the string to a shell regardless of origin
            Regex::new(r"(?i)subprocess\.[A-Za-z_]+\([^)]*shell\s*=\s*True")
                .expect("IN-002: invalid regex"),
        ],
        "Pass argument vectors instead of shell strings and avoid shell=True; validate any unavoidable input",
    )
    .with_cwe("CWE-78")
}

fn in_003() -> Rule {
    Rule::new(
        "IN-003",
        "Dynamic code evaluation of external input",
        "Detects eval of request- or user-derived data",
        Category::Injection,
        vec![
            Regex::new(r"(?i)\beval\s*\([^)]*(?:req\.|request\.|params|query|input|argv|user)")
                .expect("IN-003: invalid regex"),
            Regex::new(r"(?i)new\s+Function\s*\([^)]*(?:req\.|request\.|params|input)")
                .expect("IN-003: invalid regex"),
        ],
        "Never eval external input; use a data format parser or an allowlisted dispatch table",
    )
    .with_cwe("CWE-95")
}
