//! External diagram renderer.
//!
//! The renderer is any command that reads a diagram source on stdin and
//! writes the image to stdout (`plantuml -tsvg -pipe` by default).
use crate::util::truncate_bytes;
use anyhow::{anyhow, Context, Result};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Instant;

const STDERR_LIMIT: usize = 4096;

#[derive(Debug, Clone)]
pub struct Renderer {
    program: PathBuf,
    args: Vec<String>,
}

impl Renderer {
    /// Split a renderer command line and locate its executable.
    pub fn from_command_line(command: &str) -> Result<Self> {
        let mut args = shell_words::split(command)
            .with_context(|| format!("parse renderer command: {command}"))?;
        if args.is_empty() {
            return Err(anyhow!("renderer command is empty"));
        }
        let name = args.remove(0);
        let program = which::which(&name)
            .with_context(|| format!("renderer executable {name} not found"))?;
        tracing::debug!(program = %program.display(), ?args, "resolved renderer");
        Ok(Self { program, args })
    }

    /// Pipe `source` through the renderer and return the image bytes.
    pub fn render(&self, source: &str) -> Result<Vec<u8>> {
        let start = Instant::now();
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("spawn renderer {}", self.program.display()))?;

        // Feed stdin while stdout drains so large diagrams cannot fill both pipes.
        let stdin = child.stdin.take();
        let (written, output) = thread::scope(|scope| {
            let writer = scope.spawn(move || match stdin {
                Some(mut stdin) => stdin.write_all(source.as_bytes()),
                None => Ok(()),
            });
            let output = child.wait_with_output();
            (writer.join(), output)
        });
        let output = output.context("wait for renderer")?;
        tracing::info!(
            elapsed_ms = start.elapsed().as_millis(),
            source_bytes = source.len(),
            image_bytes = output.stdout.len(),
            "render complete"
        );

        if !output.status.success() {
            let stderr = truncate_bytes(&output.stderr, STDERR_LIMIT);
            return Err(anyhow!(
                "renderer failed with status {}: {}",
                output.status,
                stderr.trim()
            ));
        }
        match written {
            Ok(Ok(())) => {}
            // The renderer may stop reading once it has what it needs.
            Ok(Err(err)) if err.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(err)) => return Err(err).context("write diagram to renderer stdin"),
            Err(_) => return Err(anyhow!("renderer stdin writer panicked")),
        }
        if output.stdout.is_empty() {
            return Err(anyhow!("renderer produced no output"));
        }
        Ok(output.stdout)
    }
}
