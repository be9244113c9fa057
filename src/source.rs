//! In-memory source representation.
//!
//! The detectors work on raw text through this capability boundary. Matching
//! is lexical, not parsed: a future per-language source model can replace
//! [`SourceFile`] behind [`SourceModel`] without touching the scanner or
//! aggregator contracts.

/// Read access to one unit of scannable text.
pub trait SourceModel: Send + Sync {
    fn path(&self) -> &str;

    fn content(&self) -> &str;

    fn lines(&self) -> std::str::Lines<'_> {
        self.content().lines()
    }

    /// Binary payloads are skipped per file rather than pattern-matched.
    fn is_binary(&self) -> bool {
        self.content().contains('\0')
    }
}

/// A `(path, content)` pair supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    path: String,
    content: String,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }
}

impl SourceModel for SourceFile {
    fn path(&self) -> &str {
        &self.path
    }

    fn content(&self) -> &str {
        &self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_accessors() {
        let file = SourceFile::new("src/app.py", "line one\nline two");
        assert_eq!(file.path(), "src/app.py");
        assert_eq!(file.lines().count(), 2);
        assert!(!file.is_binary());
    }

    #[test]
    fn test_binary_detection() {
        let file = SourceFile::new("bin/blob", "PK\u{3}\u{4}\0\0payload");
        assert!(file.is_binary());
    }

    #[test]
    fn test_empty_content() {
        let file = SourceFile::new("empty.txt", "");
        assert_eq!(file.lines().count(), 0);
        assert!(!file.is_binary());
    }
}
