//! Step snapshots from annotated sequence-diagram sources.
//!
//! A source is ordinary PlantUML with `' @step {...}` comment markers. Each
//! marker opens a step; every step is a self-contained diagram body that
//! re-declares all entities seen so far and, unless the marker asks for a new
//! page, continues the previous step's content.
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

mod accumulator;
mod declaration;
mod marker;
mod metadata;
mod model;

use accumulator::Accumulator;

pub(crate) use declaration::is_framing;
pub use model::Step;

/// Build steps from a forward-only line source.
///
/// Read errors from the source are returned as-is; nothing is retried.
pub fn parse_lines<I>(lines: I) -> Result<Vec<Step>>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let mut accumulator = Accumulator::new()?;
    for line in lines {
        let line = line?;
        accumulator.feed(&line)?;
    }
    accumulator.finish()
}

pub fn parse_file(path: &Path) -> Result<Vec<Step>> {
    let file = File::open(path).with_context(|| format!("open {}", path.display()))?;
    let steps = parse_lines(BufReader::new(file).lines())
        .with_context(|| format!("parse steps from {}", path.display()))?;
    tracing::debug!(path = %path.display(), steps = steps.len(), "parsed source");
    Ok(steps)
}
