use crate::cli::{GenerateArgs, InitArgs, ParseArgs, ProcessArgs, RenderArgs};
use crate::config::{self, GeneratorConfig};
use crate::document::{self, DocumentOptions};
use crate::generate::{self, GenerateOptions, GeneratedDiagram};
use crate::render::Renderer;
use crate::sources;
use crate::staging::Staging;
use crate::steps::{self, Step};
use crate::util::display_path;
use crate::viewer;
use anyhow::{anyhow, Context, Result};
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

const STDIN_PATH: &str = "-";
const SEPARATOR: &str = "--------------------";

pub fn run_parse(args: ParseArgs) -> Result<()> {
    let steps = if args.file.as_os_str() == STDIN_PATH {
        let stdin = io::stdin();
        steps::parse_lines(stdin.lock().lines()).context("parse steps from stdin")?
    } else {
        steps::parse_file(&args.file)?
    };

    if args.json {
        let text = serde_json::to_string_pretty(&steps).context("serialize steps")?;
        println!("{text}");
        return Ok(());
    }
    print!("{}", parse_summary(&steps));
    Ok(())
}

fn parse_summary(steps: &[Step]) -> String {
    let options = DocumentOptions::default();
    let mut out = format!("Found {} steps in file\n", steps.len());
    for (idx, step) in steps.iter().enumerate() {
        out.push_str(&format!("\nStep {}: {}\n", idx + 1, step.name()));
        out.push_str(&format!("New Page: {}\n", step.new_page()));
        out.push_str(&format!("Declarations: {}\n", step.declarations().len()));
        out.push_str(&format!("Content Lines: {}\n", step.content().len()));
        out.push_str("\nPlantUML Content:\n");
        out.push_str(&document::step_document(step, &options));
        out.push_str(SEPARATOR);
        out.push('\n');
    }
    out
}

pub fn run_generate(args: GenerateArgs) -> Result<()> {
    let source_dir = parent_dir(&args.file);
    let config = resolve_config(&args.render, &source_dir)?;
    let options = generate_options(&args.render, &config)?;

    let staging = Staging::new()?;
    let diagram = generate::generate_diagram(&args.file, "", &staging, &options)?;
    let published = staging.publish(&args.out)?;
    tracing::info!(
        out = %args.out.display(),
        steps = diagram.steps.len(),
        files = published.len(),
        "published diagram"
    );
    println!(
        "Generated {} steps from {} into {}",
        diagram.steps.len(),
        diagram.source,
        args.out.display()
    );
    Ok(())
}

pub fn run_process(args: ProcessArgs) -> Result<()> {
    let config = resolve_config(&args.render, &args.source_dir)?;
    let options = generate_options(&args.render, &config)?;
    let found = sources::find_sources(
        &args.source_dir,
        config.style.as_deref(),
        std::slice::from_ref(&args.out),
    )?;
    if found.is_empty() {
        return Err(anyhow!(
            "no .{} sources found under {}",
            sources::SOURCE_EXTENSION,
            args.source_dir.display()
        ));
    }

    let staging = Staging::new()?;
    let mut diagrams: Vec<GeneratedDiagram> = Vec::with_capacity(found.len());
    for source in &found {
        tracing::debug!(source = %source.path.display(), stem = source.stem(), "processing");
        let diagram =
            generate::generate_diagram(&source.path, &source.rel_dir, &staging, &options)
                .with_context(|| format!("process {}", source.path.display()))?;
        diagrams.push(diagram);
    }

    let title = deck_title(&args.source_dir);
    staging.write_text(viewer::DECK_FILE, &viewer::deck_page(&title, &diagrams))?;
    staging.write_text(viewer::INDEX_FILE, &viewer::index_page(&title, &diagrams))?;
    let published = staging.publish(&args.out)?;

    let step_count: usize = diagrams.iter().map(|diagram| diagram.steps.len()).sum();
    tracing::info!(
        out = %args.out.display(),
        diagrams = diagrams.len(),
        steps = step_count,
        files = published.len(),
        "published deck"
    );
    for diagram in &diagrams {
        let viewer_path = args.out.join(diagram.output_rel(generate::VIEWER_FILE));
        println!(
            "{}: {} steps",
            display_path(&viewer_path, Some(&args.out)),
            diagram.steps.len()
        );
    }
    println!(
        "Generated {} diagrams ({} steps) into {}",
        diagrams.len(),
        step_count,
        args.out.display()
    );
    Ok(())
}

pub fn run_init(args: InitArgs) -> Result<()> {
    if args.print {
        println!("{}", config::config_stub()?);
        return Ok(());
    }
    let config_path = args.dir.join(config::CONFIG_FILE_NAME);
    if config_path.is_file() && !args.force {
        return Err(anyhow!(
            "config already exists at {} (use --force to overwrite)",
            config_path.display()
        ));
    }
    config::write_config(&config_path, &config::default_config())?;
    println!("wrote {}", config_path.display());
    Ok(())
}

/// Config file (explicit or next to the sources) with CLI flags on top.
fn resolve_config(args: &RenderArgs, source_dir: &Path) -> Result<GeneratorConfig> {
    let mut config = match args.config.as_deref() {
        Some(path) => config::load_config(path)?,
        None => config::load_config_optional(source_dir)?,
    };
    if let Some(format) = args.format {
        config.image_format = format;
    }
    if let Some(style) = args.style.as_ref() {
        config.style = Some(style.clone());
    }
    if args.no_summary {
        config.summary = false;
    }
    Ok(config)
}

fn generate_options(args: &RenderArgs, config: &GeneratorConfig) -> Result<GenerateOptions> {
    let style = config
        .style
        .as_deref()
        .map(document::load_style)
        .transpose()?;
    let renderer = if args.no_render {
        None
    } else {
        let command = args
            .renderer
            .clone()
            .unwrap_or_else(|| config::resolve_renderer(config));
        Some(Renderer::from_command_line(&command)?)
    };
    Ok(GenerateOptions {
        document: DocumentOptions {
            style,
            title_steps: config.title_steps,
        },
        renderer,
        image_format: config.image_format,
        summary: config.summary,
    })
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

fn deck_title(source_dir: &Path) -> String {
    source_dir
        .canonicalize()
        .ok()
        .and_then(|dir| dir.file_name().map(|name| name.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "Step diagrams".to_string())
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
