use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("Invalid severity threshold: {0}")]
    InvalidSeverity(String),

    #[error("Invalid scan type: {0}")]
    InvalidScanType(String),

    #[error("Invalid exclusion glob: {pattern}")]
    InvalidExclusion {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Invalid pattern in rule {rule_id}")]
    InvalidRulePattern {
        rule_id: String,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to parse IAM policy: {name}")]
    PolicyParse {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid finding status transition: {from} -> {to}")]
    InvalidStatusTransition { from: String, to: String },

    #[error("Regex compilation error: {0}")]
    Regex(#[from] regex::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_severity() {
        let err = AuditError::InvalidSeverity("severe".to_string());
        assert_eq!(err.to_string(), "Invalid severity threshold: severe");
    }

    #[test]
    fn test_error_display_invalid_scan_type() {
        let err = AuditError::InvalidScanType("network".to_string());
        assert_eq!(err.to_string(), "Invalid scan type: network");
    }

    #[test]
    fn test_error_display_invalid_rule_pattern() {
        let source = regex::Regex::new("[unclosed").unwrap_err();
        let err = AuditError::InvalidRulePattern {
            rule_id: "CUSTOM-001".to_string(),
            source,
        };
        assert_eq!(err.to_string(), "Invalid pattern in rule CUSTOM-001");
    }

    #[test]
    fn test_error_display_status_transition() {
        let err = AuditError::InvalidStatusTransition {
            from: "mitigated".to_string(),
            to: "open".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid finding status transition: mitigated -> open"
        );
    }

    #[test]
    fn test_error_display_policy_parse() {
        let source = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err = AuditError::PolicyParse {
            name: "policy-3".to_string(),
            source,
        };
        assert_eq!(err.to_string(), "Failed to parse IAM policy: policy-3");
    }
}
