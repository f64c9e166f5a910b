mod cli;
mod config;
mod document;
mod generate;
mod render;
mod sources;
mod staging;
mod steps;
mod templates;
mod util;
mod viewer;
mod workflow;

use anyhow::Result;
use clap::Parser;
use cli::{Command, RootArgs};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = RootArgs::parse();
    init_logging(args.verbose);

    match args.command {
        Command::Parse(args) => workflow::run_parse(args),
        Command::Generate(args) => workflow::run_generate(args),
        Command::Process(args) => workflow::run_process(args),
        Command::Init(args) => workflow::run_init(args),
    }
}

// RUST_LOG wins over --verbose.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
