//! CLI argument parsing.
use crate::config::ImageFormat;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "pumlsteps",
    version,
    about = "Progressive step diagrams and slide decks from annotated PlantUML",
    after_help = "Step markers are PlantUML comments of the form:\n  ' @step {\"name\": \"Step 1: Login\", \"newPage\": false}\n\nExamples:\n  pumlsteps parse diagrams/login.puml\n  pumlsteps generate diagrams/login.puml --out build/login\n  pumlsteps process diagrams --out build\n  pumlsteps init diagrams",
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct RootArgs {
    /// Log debug details to stderr (RUST_LOG takes precedence)
    #[arg(long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    Parse(ParseArgs),
    Generate(GenerateArgs),
    Process(ProcessArgs),
    Init(InitArgs),
}

#[derive(Parser, Debug)]
#[command(about = "Print the steps found in an annotated source")]
pub struct ParseArgs {
    /// Annotated PlantUML source (`-` reads stdin)
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Emit the steps as JSON
    #[arg(long)]
    pub json: bool,
}

/// Renderer and document settings that override `pumlsteps.json`.
#[derive(Args, Debug, Default)]
pub struct RenderArgs {
    /// Config file (defaults to pumlsteps.json next to the sources)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Renderer command reading a diagram on stdin and writing the image to stdout
    #[arg(long, value_name = "CMD", conflicts_with = "no_render")]
    pub renderer: Option<String>,

    /// Image format produced by the renderer
    #[arg(long, value_enum)]
    pub format: Option<ImageFormat>,

    /// Style source inlined into every step document
    #[arg(long, value_name = "PATH")]
    pub style: Option<PathBuf>,

    /// Write diagram sources and pages only, without rendering images
    #[arg(long)]
    pub no_render: bool,

    /// Skip the step-flow summary diagram
    #[arg(long)]
    pub no_summary: bool,
}

#[derive(Parser, Debug)]
#[command(about = "Generate step diagrams and a viewer for one source")]
pub struct GenerateArgs {
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Generate every source under a directory plus a slide deck")]
pub struct ProcessArgs {
    #[arg(value_name = "DIR")]
    pub source_dir: PathBuf,

    /// Output directory
    #[arg(long, value_name = "DIR")]
    pub out: PathBuf,

    #[command(flatten)]
    pub render: RenderArgs,
}

#[derive(Parser, Debug)]
#[command(about = "Write a default pumlsteps.json")]
pub struct InitArgs {
    /// Directory that holds the diagram sources
    #[arg(value_name = "DIR")]
    pub dir: PathBuf,

    /// Overwrite an existing pumlsteps.json
    #[arg(long, conflicts_with = "print")]
    pub force: bool,

    /// Print the default config to stdout instead of writing it
    #[arg(long)]
    pub print: bool,
}
