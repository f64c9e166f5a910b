//! Staged output publishing.
//!
//! Generated files are written to a private staging tree first and only
//! copied into the output directory once every diagram succeeded. Publishing
//! backs up files it overwrites and restores them if a later copy fails.
use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct Staging {
    dir: TempDir,
}

impl Staging {
    pub fn new() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pumlsteps-")
            .tempdir()
            .context("create staging directory")?;
        Ok(Self { dir })
    }

    fn files_root(&self) -> PathBuf {
        self.dir.path().join("files")
    }

    fn backup_root(&self) -> PathBuf {
        self.dir.path().join("backup")
    }

    pub fn write_bytes(&self, rel_path: &str, bytes: &[u8]) -> Result<()> {
        let staging_path = self.files_root().join(rel_path);
        if let Some(parent) = staging_path.parent() {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }
        fs::write(&staging_path, bytes)
            .with_context(|| format!("write {}", staging_path.display()))?;
        Ok(())
    }

    pub fn write_text(&self, rel_path: &str, text: &str) -> Result<()> {
        self.write_bytes(rel_path, text.as_bytes())
    }

    pub fn write_json<T: serde::Serialize>(&self, rel_path: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(value).context("serialize staged JSON")?;
        self.write_bytes(rel_path, &bytes)
    }

    /// Copy every staged file into `out_root`, returning the published paths.
    pub fn publish(&self, out_root: &Path) -> Result<Vec<PathBuf>> {
        let files_root = self.files_root();
        let files = collect_files_recursive(&files_root)?;
        let backup_root = self.backup_root();
        let mut published = Vec::new();
        let mut backups: Vec<(PathBuf, PathBuf)> = Vec::new();
        let mut created: Vec<PathBuf> = Vec::new();
        for file in files {
            let rel = file
                .strip_prefix(&files_root)
                .context("strip staging prefix")?;
            let dest = out_root.join(rel);
            if dest.exists() {
                let backup = backup_root.join(rel);
                if let Err(err) = backup_file(&dest, &backup) {
                    rollback_publish(&backups, &created);
                    return Err(err);
                }
                backups.push((dest.clone(), backup));
            } else {
                created.push(dest.clone());
            }

            if let Err(err) = publish_file(&file, &dest) {
                rollback_publish(&backups, &created);
                return Err(err);
            }
            published.push(dest);
        }
        tracing::debug!(
            out = %out_root.display(),
            files = published.len(),
            overwritten = backups.len(),
            "published staged outputs"
        );
        Ok(published)
    }
}

pub fn collect_files_recursive(root: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    if !root.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(root).with_context(|| format!("read {}", root.display()))? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            files.extend(collect_files_recursive(&path)?);
        } else if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn backup_file(dest: &Path, backup: &Path) -> Result<()> {
    if let Some(parent) = backup.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    fs::copy(dest, backup).with_context(|| format!("backup {}", dest.display()))?;
    Ok(())
}

fn publish_file(source: &Path, dest: &Path) -> Result<()> {
    let parent = dest
        .parent()
        .ok_or_else(|| anyhow!("output path has no parent: {}", dest.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    let file_name = dest
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("staged");
    let tmp_path = parent.join(format!(".{file_name}.tmp"));
    fs::copy(source, &tmp_path).with_context(|| format!("publish {}", dest.display()))?;
    fs::rename(&tmp_path, dest).with_context(|| format!("publish {}", dest.display()))?;
    Ok(())
}

fn rollback_publish(backups: &[(PathBuf, PathBuf)], created: &[PathBuf]) {
    tracing::warn!(
        restored = backups.len(),
        removed = created.len(),
        "publish failed; rolling back"
    );
    for path in created {
        if path.exists() {
            let _ = fs::remove_file(path);
        }
    }
    for (dest, backup) in backups {
        let _ = fs::copy(backup, dest);
    }
}
