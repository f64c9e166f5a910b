//! Per-source generation: step documents, images, summary, viewer.
use crate::config::ImageFormat;
use crate::document::{self, DocumentOptions};
use crate::render::Renderer;
use crate::staging::Staging;
use crate::steps::{self, Step};
use crate::viewer;
use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::Path;

pub const SUMMARY_STEM: &str = "summary";
pub const VIEWER_FILE: &str = "index.html";
pub const MANIFEST_FILE: &str = "steps.json";

/// Step attribute shown as speaker notes in the slide deck.
const NOTES_ATTRIBUTE: &str = "notes";

pub struct GenerateOptions {
    pub document: DocumentOptions,
    /// `None` writes sources only.
    pub renderer: Option<Renderer>,
    pub image_format: ImageFormat,
    pub summary: bool,
}

/// A step as written to disk. Paths are relative to the diagram directory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedStep {
    pub index: usize,
    pub name: String,
    pub new_page: bool,
    pub attributes: BTreeMap<String, Value>,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub document: String,
    pub body: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedDiagram {
    /// Display name of the source file.
    pub source: String,
    /// Output subdirectory relative to the output root; empty for the root.
    pub rel_dir: String,
    pub steps: Vec<GeneratedStep>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary_image: Option<String>,
}

impl GeneratedDiagram {
    /// Path of a diagram-local file relative to the output root.
    pub fn output_rel(&self, file: &str) -> String {
        join_rel(&self.rel_dir, file)
    }
}

/// Parse one source and stage everything generated from it under `rel_dir`.
pub fn generate_diagram(
    source_path: &Path,
    rel_dir: &str,
    staging: &Staging,
    options: &GenerateOptions,
) -> Result<GeneratedDiagram> {
    let source_name = source_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| source_path.display().to_string());
    let steps = steps::parse_file(source_path)?;
    tracing::info!(source = %source_path.display(), steps = steps.len(), "parsed steps");

    let mut generated = Vec::with_capacity(steps.len());
    for (idx, step) in steps.iter().enumerate() {
        let generated_step = generate_step(idx + 1, step, rel_dir, staging, options)
            .with_context(|| format!("generate step {} of {}", idx + 1, source_name))?;
        generated.push(generated_step);
    }

    let summary_image = if options.summary {
        let summary = document::summary_document(&source_name, &steps);
        let summary_rel = join_rel(rel_dir, &format!("{SUMMARY_STEM}.puml"));
        staging.write_text(&summary_rel, &summary)?;
        render_image(&summary, SUMMARY_STEM, rel_dir, staging, options)
            .with_context(|| format!("render summary of {source_name}"))?
    } else {
        None
    };

    let diagram = GeneratedDiagram {
        source: source_name,
        rel_dir: rel_dir.to_string(),
        steps: generated,
        summary_image,
    };
    let page = viewer::viewer_page(&diagram)?;
    staging.write_text(&diagram.output_rel(VIEWER_FILE), &page)?;
    staging.write_json(&diagram.output_rel(MANIFEST_FILE), &diagram)?;
    Ok(diagram)
}

fn generate_step(
    index: usize,
    step: &Step,
    rel_dir: &str,
    staging: &Staging,
    options: &GenerateOptions,
) -> Result<GeneratedStep> {
    let stem = document::step_file_stem(index, step.name());
    let document = document::step_document(step, &options.document);
    let source = format!("{stem}.puml");
    staging.write_text(&join_rel(rel_dir, &source), &document)?;
    let image = render_image(&document, &stem, rel_dir, staging, options)?;
    tracing::debug!(index, name = step.name(), stem = %stem, "generated step");

    Ok(GeneratedStep {
        index,
        name: step.name().to_string(),
        new_page: step.new_page(),
        attributes: step.metadata().clone(),
        source,
        image,
        document,
        body: step.body(),
        notes: step.attribute_str(NOTES_ATTRIBUTE).map(str::to_string),
    })
}

fn render_image(
    document: &str,
    stem: &str,
    rel_dir: &str,
    staging: &Staging,
    options: &GenerateOptions,
) -> Result<Option<String>> {
    let Some(renderer) = options.renderer.as_ref() else {
        return Ok(None);
    };
    let bytes = renderer.render(document)?;
    let image = format!("{stem}.{}", options.image_format.extension());
    staging.write_bytes(&join_rel(rel_dir, &image), &bytes)?;
    Ok(Some(image))
}

pub fn join_rel(rel_dir: &str, file: &str) -> String {
    if rel_dir.is_empty() {
        file.to_string()
    } else {
        format!("{rel_dir}/{file}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SOURCE: &str = r#"@startuml
actor User
participant System
' @step {"name": "Step 1: User Login", "newPage": false, "notes": "start here"}
User -> System: Login Request
' @step {"name": "Step 2: Dashboard", "newPage": true}
User -> System: View Dashboard
@enduml
"#;

    fn options(renderer: Option<Renderer>) -> GenerateOptions {
        GenerateOptions {
            document: DocumentOptions {
                style: None,
                title_steps: true,
            },
            renderer,
            image_format: ImageFormat::Svg,
            summary: true,
        }
    }

    fn write_source(dir: &TempDir) -> std::path::PathBuf {
        let path = dir.path().join("login.puml");
        fs::write(&path, SOURCE).expect("write source");
        path
    }

    #[test]
    fn stages_sources_viewer_and_manifest() {
        let src = TempDir::new().expect("src");
        let out = TempDir::new().expect("out");
        let path = write_source(&src);
        let staging = Staging::new().expect("staging");

        let diagram =
            generate_diagram(&path, "login", &staging, &options(None)).expect("generate");
        staging.publish(out.path()).expect("publish");

        assert_eq!(diagram.source, "login.puml");
        assert_eq!(diagram.steps.len(), 2);
        assert_eq!(diagram.steps[0].source, "step-01-step-1-user-login.puml");
        assert_eq!(diagram.steps[0].notes.as_deref(), Some("start here"));
        assert!(diagram.steps[0].image.is_none());
        assert!(diagram.summary_image.is_none());

        let step_doc = fs::read_to_string(out.path().join("login/step-02-step-2-dashboard.puml"))
            .expect("read step 2");
        assert!(step_doc.contains("title Step 2: Dashboard\n"));
        assert!(step_doc.contains("actor User\nparticipant System\n"));
        assert!(!step_doc.contains("Login Request"));
        assert!(out.path().join("login/summary.puml").is_file());
        assert!(out.path().join("login/index.html").is_file());

        let manifest: Value = serde_json::from_str(
            &fs::read_to_string(out.path().join("login/steps.json")).expect("read manifest"),
        )
        .expect("parse manifest");
        assert_eq!(manifest["steps"][1]["newPage"], true);
        assert_eq!(manifest["relDir"], "login");
    }

    #[cfg(unix)]
    #[test]
    fn renders_images_through_renderer() {
        let Ok(renderer) = Renderer::from_command_line("cat") else {
            return;
        };
        let src = TempDir::new().expect("src");
        let out = TempDir::new().expect("out");
        let path = write_source(&src);
        let staging = Staging::new().expect("staging");

        let diagram =
            generate_diagram(&path, "", &staging, &options(Some(renderer))).expect("generate");
        staging.publish(out.path()).expect("publish");

        assert_eq!(
            diagram.steps[0].image.as_deref(),
            Some("step-01-step-1-user-login.svg")
        );
        assert_eq!(diagram.summary_image.as_deref(), Some("summary.svg"));
        let image = fs::read_to_string(out.path().join("step-01-step-1-user-login.svg"))
            .expect("read image");
        assert_eq!(image, diagram.steps[0].document);
    }

    #[test]
    fn join_rel_handles_root() {
        assert_eq!(join_rel("", "index.html"), "index.html");
        assert_eq!(join_rel("flows/login", "index.html"), "flows/login/index.html");
    }
}
