use crate::rules::catalog::Rule;
use crate::types::Category;
use regex::Regex;

pub fn rules() -> Vec<Rule> {
    vec![xs_001(), xs_002()]
}

fn xs_001() -> Rule {
    Rule::new(
        "XS-001",
        "Unescaped HTML sink assignment",
        "Detects dynamic content flowing into innerHTML or equivalent raw-HTML sinks",
        Category::Xss,
        vec![
            Regex::new(r"\.innerHTML\s*=\s*[^;]*(?:\+|\$\{)").expect("XS-001: invalid regex"),
            Regex::new(r"\.outerHTML\s*=\s*[^;]*(?:\+|\$\{)").expect("XS-001: invalid regex"),
            Regex::new(r"dangerouslySetInnerHTML").expect("XS-001: invalid regex"),
        ],
        "Escape or sanitize dynamic content before rendering; prefer textContent or a templating engine with auto-escaping",
    )
    .with_cwe("CWE-79")
    .with_reference("https://owasp.org/Top10/A03_2021-Injection/")
}

fn xs_002() -> Rule {
    Rule::new(
        "XS-002",
        "document.write with dynamic input",
        "Detects document.write calls fed by concatenation or location-derived data",
        Category::Xss,
        vec![
            Regex::new(r"(?i)document\.write(?:ln)?\s*\([^)]*(?:\+|\$\{|location\.|document\.URL)")
                .expect("XS-002: invalid regex"),
        ],
        "Avoid document.write; build DOM nodes and assign text content instead",
    )
    .with_cwe("CWE-79")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xs_001_detects_raw_html_sinks() {
        let rule = xs_001();
        let cases = vec![
            (r#"el.innerHTML = "<b>" + userName + "</b>";"#, true),
            (r"el.innerHTML = `${comment}`;", true),
            (r#"el.innerHTML = "<hr/>";"#, false),
            (r#"<div dangerouslySetInnerHTML={{__html: body}} />"#, true),
            (r#"el.textContent = userName;"#, false),
        ];
        for (input, expected) in cases {
            assert_eq!(rule.matches(input), expected, "input: {input}");
        }
    }

    #[test]
    fn test_xs_002_detects_document_write() {
        let rule = xs_002();
        assert!(rule.matches(r#"document.write("<p>" + q + "</p>")"#));
        assert!(rule.matches(r"document.writeln(location.hash)"));
        assert!(!rule.matches(r#"document.write("static banner")"#));
    }

    #[test]
    fn test_xss_rules_metadata() {
        for rule in rules() {
            assert_eq!(rule.category, Category::Xss);
            assert_eq!(rule.cwe.as_deref(), Some("CWE-79"));
        }
    }
}
