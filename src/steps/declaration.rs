use anyhow::{anyhow, Result};
use regex::{Regex, RegexBuilder};

// `participant Foo`, `actor "User 1" as U1`, `!include style.puml`
const DECLARATION_PATTERN: &str = r"^\s*(?:participant|actor|!include)\s+.*$";

/// Separates entity declarations from ordinary sequence content.
pub(crate) struct DeclarationClassifier {
    pattern: Regex,
}

impl DeclarationClassifier {
    pub(crate) fn new() -> Result<Self> {
        let pattern = RegexBuilder::new(DECLARATION_PATTERN)
            .case_insensitive(true)
            .build()
            .map_err(|err| anyhow!("invalid declaration pattern: {err}"))?;
        Ok(Self { pattern })
    }

    pub(crate) fn is_declaration(&self, line: &str) -> bool {
        self.pattern.is_match(line)
    }
}

/// `@startuml`/`@enduml` wrap the whole source; assembled step documents add
/// their own pair.
pub(crate) fn is_framing(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.starts_with("@startuml") || trimmed == "@enduml"
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}
