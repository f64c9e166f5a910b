//! Generator configuration.
//!
//! `pumlsteps.json` lives next to the diagram sources. Every field has a
//! default, so a missing file or an empty object are both valid; CLI flags
//! are layered on top by the workflow.
use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current schema version for `pumlsteps.json`.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;
/// Config file name looked up in the source directory.
pub const CONFIG_FILE_NAME: &str = "pumlsteps.json";
/// Environment override for the renderer command line.
pub const RENDERER_ENV: &str = "PUMLSTEPS_RENDERER";
/// PlantUML reading a diagram on stdin and writing the image to stdout.
pub const DEFAULT_RENDERER: &str = "plantuml -tsvg -pipe";

/// Image format produced by the renderer.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    #[default]
    Svg,
    Png,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Svg => "svg",
            ImageFormat::Png => "png",
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
#[serde(default)]
pub struct GeneratorConfig {
    pub schema_version: u32,
    /// Renderer command line, split with shell quoting rules.
    pub renderer: String,
    pub image_format: ImageFormat,
    /// Style source inlined into every step document.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<PathBuf>,
    /// Emit `title <step name>` in step documents.
    pub title_steps: bool,
    /// Emit the step-flow summary diagram.
    pub summary: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        default_config()
    }
}

pub fn default_config() -> GeneratorConfig {
    GeneratorConfig {
        schema_version: CONFIG_SCHEMA_VERSION,
        renderer: DEFAULT_RENDERER.to_string(),
        image_format: ImageFormat::Svg,
        style: None,
        title_steps: true,
        summary: true,
    }
}

/// Render a pretty JSON config stub for `init`.
pub fn config_stub() -> Result<String> {
    serde_json::to_string_pretty(&default_config()).context("serialize config stub")
}

/// Load and validate a config file. A relative `style` path is resolved
/// against the directory holding the config.
pub fn load_config(path: &Path) -> Result<GeneratorConfig> {
    let bytes = fs::read(path).with_context(|| format!("read config {}", path.display()))?;
    let mut config: GeneratorConfig = serde_json::from_slice(&bytes)
        .with_context(|| format!("parse config JSON {}", path.display()))?;
    validate_config(&config)?;
    if let (Some(style), Some(dir)) = (config.style.take(), path.parent()) {
        config.style = Some(if style.is_relative() {
            dir.join(style)
        } else {
            style
        });
    }
    Ok(config)
}

/// Load `pumlsteps.json` from `dir`, or defaults when it does not exist.
pub fn load_config_optional(dir: &Path) -> Result<GeneratorConfig> {
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.is_file() {
        tracing::debug!(path = %path.display(), "no config file; using defaults");
        return Ok(default_config());
    }
    load_config(&path)
}

pub fn write_config(path: &Path, config: &GeneratorConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let text = serde_json::to_string_pretty(config).context("serialize config")?;
    fs::write(path, text.as_bytes()).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn validate_config(config: &GeneratorConfig) -> Result<()> {
    if config.schema_version != CONFIG_SCHEMA_VERSION {
        return Err(anyhow!(
            "unsupported config schema_version {}",
            config.schema_version
        ));
    }
    if config.renderer.trim().is_empty() {
        return Err(anyhow!("renderer must be non-empty"));
    }
    Ok(())
}

/// Resolve the renderer command line: env override first, then config.
pub fn resolve_renderer(config: &GeneratorConfig) -> String {
    if let Ok(value) = std::env::var(RENDERER_ENV) {
        if !value.trim().is_empty() {
            return value;
        }
    }
    config.renderer.clone()
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
