//! Discovery of annotated diagram sources under a directory.
use crate::staging::collect_files_recursive;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

pub const SOURCE_EXTENSION: &str = "puml";
/// Shared style file; inlined into documents, never processed on its own.
pub const STYLE_FILE_NAME: &str = "style.puml";

/// A source file and the output subdirectory it maps to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    /// Path relative to the source root without extension, `/`-separated.
    pub rel_dir: String,
}

impl SourceFile {
    pub fn stem(&self) -> &str {
        self.rel_dir.rsplit('/').next().unwrap_or(&self.rel_dir)
    }
}

/// Every `*.puml` under `root`, sorted, minus style files and anything
/// inside `skip_dirs`.
pub fn find_sources(
    root: &Path,
    style: Option<&Path>,
    skip_dirs: &[PathBuf],
) -> Result<Vec<SourceFile>> {
    let root = root
        .canonicalize()
        .with_context(|| format!("resolve source directory {}", root.display()))?;
    let style = style.and_then(|path| path.canonicalize().ok());
    let skip_dirs: Vec<PathBuf> = skip_dirs
        .iter()
        .filter_map(|dir| dir.canonicalize().ok())
        .collect();

    let mut sources = Vec::new();
    for path in collect_files_recursive(&root)? {
        if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
            continue;
        }
        if path.file_name().and_then(|name| name.to_str()) == Some(STYLE_FILE_NAME) {
            continue;
        }
        if style.as_deref() == Some(path.as_path()) {
            continue;
        }
        if skip_dirs.iter().any(|dir| path.starts_with(dir)) {
            continue;
        }
        let rel = path
            .strip_prefix(&root)
            .context("strip source root prefix")?
            .with_extension("");
        let rel_dir = rel
            .components()
            .map(|component| component.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        sources.push(SourceFile { path, rel_dir });
    }
    tracing::debug!(root = %root.display(), count = sources.len(), "found sources");
    Ok(sources)
}
