use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![ss_001()]
}

fn ss_001() -> Rule {
    Rule::new(
        "SS-001",
        "Outbound request to caller-controlled URL",
        "Detects HTTP client calls whose target URL derives from request data",
        Category::Ssrf,
        vec![
            Regex::new(
                r"(?i)\b(?:fetch|axios(?:\.(?:get|post))?|requests\.(?:get|post)|urllib\.request\.urlopen|http\.get)\s*\([^)]*(?:req\.|request\.|params|query\.|user[_-]?input)",
            )
            .expect("SS-001: invalid regex"),
            // URL assembled by concatenating caller data before the call
            Regex::new(
                r#"(?i)\b(?:fetch|requests\.(?:get|post)|axios\.get)\s*\(\s*[A-Za-z_]*(?:url|target|endpoint)\s*\+"#,
            )
            .expect("SS-001: invalid regex"),
        ],
        "Validate and allowlist outbound destinations; resolve and compare hosts, and block link-local and metadata addresses",
    )
    .with_cwe("CWE-918")
    .with_reference("https://owasp.org/Top10/A10_2021-Server-Side_Request_Forgery_%28SSRF%29/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ss_001_detects_caller_controlled_fetch() {
        let rule = ss_001();
        let cases = vec![
            ("const r = await fetch(req.query.url);", true),
            ("resp = requests.get(params['callback'])", true),
            ("data = urllib.request.urlopen(request.args['u'])", true),
            (r#"resp = requests.get("https://api.internal/status")"#, false),
        ];
        for (input, expected) in cases {
            assert_eq!(rule.matches(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_ss_001_detects_concatenated_url() {
        let rule = ss_001();
        assert!(rule.matches("fetch(baseUrl + userPath)"));
        assert!(!rule.matches(r#"fetch("https://fixed.example.com/health")"#));
    }

    #[test]
    fn test_ssrf_rule_metadata() {
        let rule = ss_001();
        assert_eq!(rule.category, Category::Ssrf);
        assert_eq!(rule.cwe.as_deref(), Some("CWE-918"));
    }
}
