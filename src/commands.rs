//! Discovers source files, drives the pipeline, and serializes its output.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codegraph_core::ElementKind;
use codegraph_indexer::config::{AstDumpMode, PipelineConfig};
use codegraph_indexer::coordinator::Coordinator;
use codegraph_indexer::languages::LanguageRegistry;
use ignore::WalkBuilder;
use regex::Regex;

use crate::Cli;

/// Run a single indexing pass and write its JSONL artifacts.
pub fn run(cli: &Cli) -> Result<()> {
    let registry = LanguageRegistry::with_defaults();
    let language = registry.get(&cli.lang)?;

    let root = cli
        .path
        .canonicalize()
        .with_context(|| format!("resolving path {}", cli.path.display()))?;

    let filter = cli
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("compiling --filter regex")?;

    let file_paths = discover_files(&root, language.tag(), filter.as_ref())?;
    tracing::info!(count = file_paths.len(), "discovered source files");

    let mut config = PipelineConfig::new(cli.lang.clone(), root.clone()).with_jobs(cli.jobs);
    if cli.output_ast {
        let mode = match cli.format_ast.as_str() {
            "indented" => AstDumpMode::Indented,
            _ => AstDumpMode::Compact,
        };
        config = config.with_dump_ast(mode);
    }

    let coordinator = Coordinator::new(registry);
    let (mut relations, ctx) = coordinator.run(&config, &file_paths)?;

    if !cli.no_noise_filter {
        relations.retain(|r| {
            !language.is_noise(&r.source.qualified_name) && !language.is_noise(&r.target.qualified_name)
        });
    }

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("creating output directory {}", cli.out_dir.display()))?;

    let graph = ctx.graph.read().expect("graph lock poisoned");
    write_jsonl(
        &cli.out_dir.join("element.jsonl"),
        graph.all_nodes().filter(|e| e.kind != ElementKind::Unknown),
    )?;
    drop(graph);
    write_jsonl(&cli.out_dir.join("relation.jsonl"), relations.iter())?;

    tracing::info!(
        elements = ctx.graph.read().expect("graph lock poisoned").node_count(),
        relations = relations.len(),
        "wrote output"
    );
    Ok(())
}

fn write_jsonl<T: serde::Serialize>(path: &Path, items: impl Iterator<Item = T>) -> Result<()> {
    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Extension each registered language indexes by default. A single-file
/// `--path` is always indexed regardless of its extension.
fn default_extension(lang_tag: &str) -> Option<&'static str> {
    match lang_tag {
        "java" => Some("java"),
        _ => None,
    }
}

fn discover_files(root: &Path, lang_tag: &str, filter: Option<&Regex>) -> Result<Vec<PathBuf>> {
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }

    let extension = default_extension(lang_tag);
    let mut paths = Vec::new();
    for entry in WalkBuilder::new(root).build() {
        let entry = entry.context("walking input path")?;
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let path = entry.path();
        if let Some(ext) = extension {
            if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                continue;
            }
        }
        if let Some(re) = filter {
            let basename = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
            if !re.is_match(&basename) {
                continue;
            }
        }
        paths.push(path.to_path_buf());
    }
    Ok(paths)
}
