//! Orchestrates the two-phase pipeline: parallel symbol collection, a
//! sequential hierarchy-synthesis pass, parallel edge extraction, and a
//! final path-normalization sweep. One `Coordinator` wraps a `LanguageRegistry`
//! and drives every run through `Coordinator::run`.

use std::collections::HashSet;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use codegraph_core::{DependencyRelation, DependencyType, GlobalContext};
use rayon::prelude::*;

use crate::config::{AstDumpMode, PipelineConfig};
use crate::extractor::make_edge;
use crate::languages::{LanguageRegistry, LanguageSupport};
use crate::{parser, tree_cache};

pub struct Coordinator {
    registry: LanguageRegistry,
}

impl Coordinator {
    pub fn new(registry: LanguageRegistry) -> Self {
        Coordinator { registry }
    }

    /// Run the full pipeline over `file_paths`, returning every relation the
    /// run produced (hierarchy + structural + action) alongside the
    /// `GlobalContext` it built.
    pub fn run(
        &self,
        config: &PipelineConfig,
        file_paths: &[PathBuf],
    ) -> Result<(Vec<DependencyRelation>, GlobalContext)> {
        let language = self.registry.get(&config.language)?;
        let ctx = GlobalContext::new(language.resolver());

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(config.jobs)
            .build()
            .context("building rayon thread pool")?;

        // Phase 1 - parallel collection. The pool's `install` call is the
        // barrier: it returns only once every file has been parsed and
        // collected (or skipped after a logged failure).
        pool.install(|| {
            file_paths.par_iter().for_each(|path| {
                if let Err(err) = collect_one(&ctx, language.as_ref(), config, path) {
                    tracing::warn!(path = %path.display(), error = %err, "skipping file after Phase 1 failure");
                }
            });
        });

        let mut relations = synthesize_hierarchy(&ctx);

        // Phase 2 - parallel extraction over every file that survived Phase 1.
        let registered_paths: Vec<PathBuf> =
            ctx.file_contexts.iter().map(|entry| entry.key().clone()).collect();
        let phase2: Vec<DependencyRelation> = pool.install(|| {
            registered_paths
                .par_iter()
                .flat_map(|path| extract_one(&ctx, language.as_ref(), path))
                .collect()
        });
        relations.extend(phase2);

        for relation in &mut relations {
            normalize_relation(relation, &config.root);
        }

        // Defense in depth: every element's `.path` should already be root-relative
        // by construction (collect_one hands languages a relativized path), but
        // sweep the graph too in case a language implementation forgets.
        {
            let mut graph = ctx.graph.write().expect("graph lock poisoned");
            for element in graph.all_nodes_mut() {
                normalize_path(&mut element.path, &config.root);
            }
        }

        Ok((relations, ctx))
    }
}

fn collect_one(
    ctx: &GlobalContext,
    language: &dyn LanguageSupport,
    config: &PipelineConfig,
    path: &Path,
) -> Result<()> {
    let parsed = tree_cache::parse_file(language.grammar(), path)?;

    if let Some(mode) = config.dump_ast {
        let indented = matches!(mode, AstDumpMode::Indented);
        let dump = parser::dump_sexp(&parsed.tree, indented);
        let mut dump_name: OsString = path.as_os_str().to_os_string();
        dump_name.push(if indented { ".ast.txt" } else { ".ast" });
        std::fs::write(PathBuf::from(dump_name), dump)
            .with_context(|| format!("writing AST dump for {}", path.display()))?;
    }

    // Languages build every element's `.path` and QN from this argument, so
    // relativizing it here is what keeps `element.jsonl` and `File` QNs
    // root-relative without each language implementation doing it itself.
    // Disk I/O above still uses the real (possibly absolute) `path`.
    let rel_path = relative_to_root(path, &config.root);

    let file_ctx = language.collect(ctx, &rel_path, parsed.tree, parsed.source)?;
    ctx.register_file_context(file_ctx);
    Ok(())
}

/// Extract one file's relations, registering every edge (and any builtin or
/// `Unknown` placeholder the extractor materializes along the way) into the
/// shared `ctx` before converting to the self-contained `DependencyRelation`
/// form the orchestrator returns.
fn extract_one(ctx: &GlobalContext, language: &dyn LanguageSupport, path: &Path) -> Vec<DependencyRelation> {
    let edges = match language.extract(ctx, path) {
        Ok(edges) => edges,
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "skipping file after Phase 2 failure");
            return Vec::new();
        }
    };
    for edge in &edges {
        ctx.register_edge(edge.clone());
    }
    let graph = ctx.graph.read().expect("graph lock poisoned");
    edges.iter().filter_map(|e| graph.to_relation(e)).collect()
}

/// Package -> file, package -> sub-package, and file -> top-level-definition
/// `Contain` edges, derived from the now-complete `GlobalContext` in one
/// sequential pass. Dedup keys keep a re-run over unchanged input from
/// registering the same hierarchy edge twice.
fn synthesize_hierarchy(ctx: &GlobalContext) -> Vec<DependencyRelation> {
    let mut seen = HashSet::new();
    let mut edges = Vec::new();

    for entry in ctx.file_contexts.iter() {
        let file_ctx = entry.value();
        let file_qn = file_ctx.file_path.to_string_lossy().to_string();
        let Some(file_id) = ctx.lookup_qn(&file_qn) else { continue };

        if !file_ctx.package_name.is_empty() {
            if let Some(pkg_id) = ctx.lookup_qn(&file_ctx.package_name) {
                let key = format!("pf:{}>{file_qn}", file_ctx.package_name);
                if seen.insert(key) {
                    edges.push(make_edge(pkg_id, file_id, DependencyType::Contain, None, None));
                }
            }

            let mut prefix = String::new();
            for segment in file_ctx.package_name.split('.') {
                let parent_prefix = prefix.clone();
                prefix = if prefix.is_empty() {
                    segment.to_string()
                } else {
                    format!("{prefix}.{segment}")
                };
                if parent_prefix.is_empty() {
                    continue;
                }
                let key = format!("pp:{parent_prefix}>{prefix}");
                if seen.insert(key) {
                    if let (Some(parent_id), Some(child_id)) =
                        (ctx.lookup_qn(&parent_prefix), ctx.lookup_qn(&prefix))
                    {
                        edges.push(make_edge(parent_id, child_id, DependencyType::Contain, None, None));
                    }
                }
            }
        }

        for defs in file_ctx.definitions_by_sn.values() {
            for def in defs {
                if def.parent_qn.is_empty() || def.parent_qn == file_ctx.package_name {
                    let key = format!("ft:{file_qn}>{}", def.qualified_name);
                    if seen.insert(key) {
                        edges.push(make_edge(file_id, def.element_id, DependencyType::Contain, None, None));
                    }
                }
            }
        }
    }

    for edge in &edges {
        ctx.register_edge(edge.clone());
    }

    let graph = ctx.graph.read().expect("graph lock poisoned");
    edges.iter().filter_map(|e| graph.to_relation(e)).collect()
}

fn normalize_relation(relation: &mut DependencyRelation, root: &Path) {
    normalize_path(&mut relation.source.path, root);
    normalize_path(&mut relation.target.path, root);
}

fn normalize_path(path: &mut PathBuf, root: &Path) {
    if path.is_absolute() {
        *path = relative_to_root(path, root);
    }
}

/// Strip `root` off `path` if it's a prefix, leaving `path` untouched
/// otherwise (e.g. the single-file `--path` mode, where `root` already
/// equals the one file being indexed).
fn relative_to_root(path: &Path, root: &Path) -> PathBuf {
    path.strip_prefix(root).unwrap_or(path).to_path_buf()
}
