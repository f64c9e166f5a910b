use anyhow::{anyhow, Result};
use regex::Regex;

const STEP_MARKER_PATTERN: &str = r"^\s*'\s*@step\s+(\{.*\})";

/// Recognizes `' @step {...}` comment lines and pulls out the brace payload.
pub(crate) struct MarkerDetector {
    pattern: Regex,
}

impl MarkerDetector {
    pub(crate) fn new() -> Result<Self> {
        let pattern = Regex::new(STEP_MARKER_PATTERN)
            .map_err(|err| anyhow!("invalid step marker pattern: {err}"))?;
        Ok(Self { pattern })
    }

    pub(crate) fn is_marker(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }

    /// Return the raw `{...}` payload of a marker line.
    ///
    /// Callers check `is_marker` first; a non-marker line is a usage error.
    pub(crate) fn extract_payload<'a>(&self, line: &'a str) -> Result<&'a str> {
        self.pattern
            .captures(line)
            .and_then(|caps| caps.get(1))
            .map(|payload| payload.as_str())
            .ok_or_else(|| anyhow!("line does not contain a step marker: {line}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_marker_with_leading_whitespace() {
        let detector = MarkerDetector::new().expect("compile marker");
        assert!(detector.is_marker(r#"' @step {"name": "A"}"#));
        assert!(detector.is_marker(r#"   '   @step {"name": "A"}"#));
        assert!(detector.is_marker("'@step {}"));
    }

    #[test]
    fn rejects_lines_without_marker_shape() {
        let detector = MarkerDetector::new().expect("compile marker");
        assert!(!detector.is_marker("@step {}"));
        assert!(!detector.is_marker("' @step"));
        assert!(!detector.is_marker("' a plain comment"));
        assert!(!detector.is_marker("User -> System: ' @step {}"));
        assert!(!detector.is_marker(""));
    }

    #[test]
    fn extracts_brace_payload() {
        let detector = MarkerDetector::new().expect("compile marker");
        let payload = detector
            .extract_payload(r#"  ' @step {"name": "Login", "extra": {"a": 1}}  "#)
            .expect("payload");
        assert_eq!(payload, r#"{"name": "Login", "extra": {"a": 1}}"#);
    }

    #[test]
    fn extracting_from_non_marker_is_an_error() {
        let detector = MarkerDetector::new().expect("compile marker");
        let err = detector
            .extract_payload("User -> System: hi")
            .expect_err("non-marker line");
        assert!(err.to_string().contains("does not contain a step marker"));
    }
}
