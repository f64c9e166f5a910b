use super::metadata::{Attributes, StepMetadata};
use serde::Serialize;

/// One cumulative snapshot of the diagram.
///
/// `declarations` followed by `content`, wrapped in a document preamble and
/// postamble, is a complete diagram on its own. Steps are only built by the
/// accumulator; once handed out they are read-only.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    #[serde(flatten)]
    metadata: StepMetadata,
    declarations: Vec<String>,
    content: Vec<String>,
}

impl Step {
    pub(super) fn new(metadata: StepMetadata) -> Self {
        Self {
            metadata,
            declarations: Vec::new(),
            content: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    pub fn new_page(&self) -> bool {
        self.metadata.new_page()
    }

    pub fn metadata(&self) -> &Attributes {
        self.metadata.attributes()
    }

    /// String-valued marker attribute such as `notes`.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.metadata.attribute_str(key)
    }

    pub fn declarations(&self) -> &[String] {
        &self.declarations
    }

    pub fn content(&self) -> &[String] {
        &self.content
    }

    /// Declarations then content, one `\n`-terminated line each.
    pub fn body(&self) -> String {
        let mut out = String::new();
        for line in self.declarations.iter().chain(self.content.iter()) {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    pub(super) fn push_declaration(&mut self, line: &str) {
        self.declarations.push(line.to_string());
    }

    pub(super) fn extend_declarations(&mut self, lines: &[String]) {
        self.declarations.extend_from_slice(lines);
    }

    pub(super) fn push_content(&mut self, line: &str) {
        self.content.push(line.to_string());
    }

    pub(super) fn extend_content(&mut self, lines: &[String]) {
        self.content.extend_from_slice(lines);
    }
}
