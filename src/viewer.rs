//! HTML pages: per-diagram step viewer, slide deck and root index.
use crate::generate::{GeneratedDiagram, VIEWER_FILE};
use crate::templates;
use anyhow::{Context, Result};
use serde::Serialize;

pub const DECK_FILE: &str = "deck.html";
pub const INDEX_FILE: &str = "index.html";

#[derive(Serialize)]
struct ViewerEntry<'a> {
    name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    image: Option<&'a str>,
    document: &'a str,
}

/// Step-by-step viewer for one diagram; image paths are diagram-local.
pub fn viewer_page(diagram: &GeneratedDiagram) -> Result<String> {
    let entries: Vec<ViewerEntry<'_>> = diagram
        .steps
        .iter()
        .map(|step| ViewerEntry {
            name: &step.name,
            image: step.image.as_deref(),
            document: &step.document,
        })
        .collect();
    let steps_json = serde_json::to_string(&entries).context("serialize viewer steps")?;
    Ok(fill_template(
        templates::VIEWER_HTML,
        &[
            ("{{TITLE}}", escape_html(&diagram.source).as_str()),
            ("{{STEPS_JSON}}", script_safe(&steps_json).as_str()),
        ],
    ))
}

/// One slide per diagram, one step per slide frame.
pub fn deck_page(title: &str, diagrams: &[GeneratedDiagram]) -> String {
    let mut slides = String::new();
    for diagram in diagrams {
        append_slide(&mut slides, diagram);
    }
    fill_template(
        templates::DECK_HTML,
        &[
            ("{{TITLE}}", escape_html(title).as_str()),
            ("{{SLIDES}}", slides.as_str()),
            ("{{DECK_JS}}", templates::DECK_JS),
        ],
    )
}

fn append_slide(out: &mut String, diagram: &GeneratedDiagram) {
    out.push_str(&format!(
        "    <section class=\"slide\" data-source=\"{}\">\n",
        escape_html(&diagram.source)
    ));
    out.push_str(&format!(
        "        <h2>{}</h2>\n",
        escape_html(slide_title(diagram))
    ));
    for step in &diagram.steps {
        out.push_str(&format!(
            "        <div class=\"step\" data-step-index=\"{}\">\n",
            step.index
        ));
        out.push_str(&format!("            <h3>{}</h3>\n", escape_html(&step.name)));
        match step.image.as_deref() {
            Some(image) => out.push_str(&format!(
                "            <img src=\"{}\" alt=\"{}\">\n",
                escape_html(&diagram.output_rel(image)),
                escape_html(&step.name)
            )),
            None => out.push_str(&format!(
                "            <pre class=\"diagram-source\">{}</pre>\n",
                escape_html(&step.document)
            )),
        }
        if let Some(notes) = step.notes.as_deref() {
            out.push_str(&format!(
                "            <p class=\"notes\">{}</p>\n",
                escape_html(notes)
            ));
        }
        out.push_str(&format!(
            "            <details><summary>Source</summary><pre>{}</pre></details>\n",
            escape_html(&step.body)
        ));
        out.push_str("        </div>\n");
    }
    out.push_str("    </section>\n");
}

fn slide_title(diagram: &GeneratedDiagram) -> &str {
    diagram
        .source
        .strip_suffix(".puml")
        .unwrap_or(&diagram.source)
}

/// Root page linking each diagram's viewer.
pub fn index_page(title: &str, diagrams: &[GeneratedDiagram]) -> String {
    let mut entries = String::new();
    for diagram in diagrams {
        let label = if diagram.rel_dir.is_empty() {
            diagram.source.as_str()
        } else {
            diagram.rel_dir.as_str()
        };
        entries.push_str(&format!(
            "        <li><a href=\"{}\">{}</a> ({} steps)</li>\n",
            escape_html(&diagram.output_rel(VIEWER_FILE)),
            escape_html(label),
            diagram.steps.len()
        ));
    }
    fill_template(
        templates::INDEX_HTML,
        &[
            ("{{TITLE}}", escape_html(title).as_str()),
            ("{{ENTRIES}}", entries.as_str()),
        ],
    )
}

/// Single pass over `template`; substituted text is never rescanned.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push_str("{{");
                rest = &tail[2..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

// JSON inside <script> must not close the element early.
fn script_safe(json: &str) -> String {
    json.replace("</", "<\\/")
}
