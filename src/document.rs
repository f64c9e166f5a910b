//! Standalone diagram sources for steps and the step-flow summary.
use crate::steps::{self, Step};
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Everything wrapped around a step body.
#[derive(Debug, Clone, Default)]
pub struct DocumentOptions {
    /// Style lines (framing already stripped) placed after `@startuml`.
    pub style: Option<String>,
    pub title_steps: bool,
}

/// Read a style source, dropping its own `@startuml`/`@enduml` lines.
pub fn load_style(path: &Path) -> Result<String> {
    let text =
        fs::read_to_string(path).with_context(|| format!("read style {}", path.display()))?;
    Ok(strip_framing(&text))
}

fn strip_framing(text: &str) -> String {
    let mut out = String::new();
    for line in text.lines() {
        if steps::is_framing(line) {
            continue;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim_end().to_string()
}

/// Complete diagram source for one step.
pub fn step_document(step: &Step, options: &DocumentOptions) -> String {
    let mut out = String::from("@startuml\n");
    if let Some(style) = options.style.as_deref().filter(|style| !style.is_empty()) {
        out.push_str(style);
        out.push('\n');
    }
    if options.title_steps {
        out.push_str(&format!("title {}\n", single_line(step.name())));
    }
    out.push('\n');
    out.push_str(&step.body());
    out.push_str("@enduml\n");
    out
}

/// Line breaks become PlantUML's literal `\n` so a label stays on its line.
fn single_line(label: &str) -> String {
    label
        .replace("\r\n", "\\n")
        .replace(['\r', '\n'], "\\n")
}

/// `step-NN-<slug>` for the 1-based step index.
pub fn step_file_stem(index: usize, name: &str) -> String {
    format!("step-{index:02}-{}", slugify(name))
}

/// Lowercase ASCII alphanumerics with every other run collapsed to `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_lowercase() || ch.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(ch);
        } else {
            pending_dash = true;
        }
    }
    if slug.is_empty() {
        "step".to_string()
    } else {
        slug
    }
}

/// Flow diagram with one box per step, in order.
pub fn summary_document(source_name: &str, steps: &[Step]) -> String {
    let mut out = String::from("@startuml\n");
    out.push_str("!theme plain\n");
    out.push_str(&format!("title {} - Step Flow\n", single_line(source_name)));
    out.push_str("skinparam monochrome true\n");
    out.push_str("skinparam shadowing false\n");
    out.push_str("skinparam defaultFontName Arial\n");
    out.push_str("skinparam defaultFontSize 12\n");
    out.push('\n');
    for (idx, step) in steps.iter().enumerate() {
        out.push_str(&format!(
            "rectangle \"{}\" as step{}\n",
            single_line(step.name()).replace('"', "'"),
            idx + 1
        ));
    }
    for idx in 1..steps.len() {
        out.push_str(&format!("step{} --> step{}\n", idx, idx + 1));
    }
    out.push_str("@enduml\n");
    out
}
