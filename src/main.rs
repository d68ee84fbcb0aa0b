//! CLI entry point: parses flags, discovers source files, runs the pipeline,
//! and writes `element.jsonl`/`relation.jsonl`.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "codegraph")]
#[command(about = "Static dependency-graph extraction for Java sources", long_about = None)]
pub struct Cli {
    /// Language tag to analyze (only "java" is registered today).
    #[arg(long, default_value = "java")]
    pub lang: String,

    /// Input root: a single file or a directory to walk.
    #[arg(long)]
    pub path: PathBuf,

    /// Basename regex restricting which discovered files are indexed.
    #[arg(long)]
    pub filter: Option<String>,

    /// Size of the worker thread pool used for both pipeline phases.
    #[arg(long, default_value_t = 4)]
    pub jobs: usize,

    /// Dump each file's AST as a sibling `.ast` file.
    #[arg(long)]
    pub output_ast: bool,

    /// AST dump style: "compact" (default) or "indented".
    #[arg(long, default_value = "compact")]
    pub format_ast: String,

    /// Destination directory for `element.jsonl`/`relation.jsonl`.
    #[arg(long, default_value = "out")]
    pub out_dir: PathBuf,

    /// Disable the built-in-prefix noise filter (on by default).
    #[arg(long)]
    pub no_noise_filter: bool,
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = commands::run(&cli) {
        tracing::error!(error = %err, "run failed");
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
